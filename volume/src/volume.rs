//! The volume contract shared by every driver.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use boxlite_volume_shared::errors::VolumeResult;
use serde::{Deserialize, Serialize};

use crate::fs::IdPair;

/// Name of the default local driver.
pub const DEFAULT_DRIVER_NAME: &str = "local";

/// Driver-specific creation options (e.g. `size=64m` for tmpfs).
pub type VolumeOptions = BTreeMap<String, String>;

/// Description of how a volume should be mounted.
///
/// Consumed by the runtime that performs the actual mount.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountOpts {
    /// Mount source (host path, or a filesystem tag such as `tmpfs`).
    pub source: String,
    /// Device or filesystem type (`bind`, `tmpfs`, ...).
    pub device: String,
    /// Filesystem-specific data string.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub data: String,
    /// Copy the image content at the mount point into the volume on first mount.
    #[serde(default)]
    pub com: bool,
}

impl MountOpts {
    /// Bind mount of a host path.
    pub fn bind(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            device: "bind".to_string(),
            ..Default::default()
        }
    }
}

/// A named unit of storage that containers mount.
pub trait Volume: Send + Sync + fmt::Debug {
    /// Volume name, unique within its driver.
    fn name(&self) -> &str;

    /// Name of the driver that created this volume.
    fn driver_name(&self) -> &str;

    /// Host path of the volume data.
    ///
    /// May be empty when a plugin cannot currently resolve it.
    fn path(&self) -> PathBuf;

    /// Describe the mount for this volume.
    ///
    /// May acquire resources (a plugin mount, a usage reference) that must be
    /// released with [`Volume::unmount`].
    fn mount_options(&self) -> VolumeResult<MountOpts>;

    /// Release whatever [`Volume::mount_options`] acquired.
    fn unmount(&self) -> VolumeResult<()>;

    /// Local view of this volume, if it is backed by a local registry.
    fn as_local(&self) -> Option<&dyn LocalVolume> {
        None
    }
}

/// A volume whose data lives in a directory under a local root.
pub trait LocalVolume: Volume {
    /// Create the data directory owned by `ids`.
    fn init(&self, ids: IdPair) -> VolumeResult<()>;

    /// Symlink-resolved location of the data directory.
    fn real_path(&self) -> VolumeResult<PathBuf>;

    /// Mounts currently holding this volume.
    fn active_mounts(&self) -> usize {
        0
    }

    /// Upcast to the generic volume handle.
    fn into_volume(self: Arc<Self>) -> Arc<dyn Volume>;
}
