//! Tmpfs volumes.
//!
//! The data directory only anchors the volume on disk; the mount itself is
//! a fresh tmpfs sized by the volume's options.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use boxlite_volume_shared::errors::VolumeResult;
use boxlite_volume_shared::layout::dirs;

use super::{Root, data_path, init_data_dir, resolve_real_path};
use crate::fs::IdPair;
use crate::volume::{LocalVolume, MountOpts, Volume, VolumeOptions};

/// Driver name of tmpfs volumes.
pub const DRIVER_NAME: &str = "tmpfs";

const DEFAULT_MODE: &str = "755";
const DEFAULT_SIZE: &str = "65536k";

/// Option key that requests copy-on-mount.
const COPY_ON_MOUNT: &str = "CoM";

/// Open the `tmpfs` driver root at `{scope}/tmpfs`.
pub fn new_root(scope: &Path, ids: IdPair) -> VolumeResult<Root> {
    Root::new(scope, DRIVER_NAME, dirs::TMPFS, ids, new_tmpfs_volume)
}

fn new_tmpfs_volume(
    name: &str,
    root: &Path,
    driver_name: &str,
    options: &VolumeOptions,
) -> Arc<dyn LocalVolume> {
    Arc::new(TmpfsVolume::new(name, root, driver_name, options))
}

#[derive(Debug)]
pub struct TmpfsVolume {
    name: String,
    driver_name: String,
    path: PathBuf,
    options: VolumeOptions,
}

impl TmpfsVolume {
    /// `mode` and `size` fall back to their defaults independently.
    pub fn new(name: &str, root: &Path, driver_name: &str, options: &VolumeOptions) -> Self {
        let mut options = options.clone();
        options
            .entry("mode".to_string())
            .or_insert_with(|| DEFAULT_MODE.to_string());
        options
            .entry("size".to_string())
            .or_insert_with(|| DEFAULT_SIZE.to_string());

        Self {
            name: name.to_string(),
            driver_name: driver_name.to_string(),
            path: data_path(root, name),
            options,
        }
    }

    /// Options the volume was created with, defaults included.
    pub fn options(&self) -> &VolumeOptions {
        &self.options
    }

    /// Flags the runtime should mount this tmpfs with.
    #[cfg(target_os = "linux")]
    pub fn mount_flags(&self) -> nix::mount::MsFlags {
        nix::mount::MsFlags::MS_NOSUID | nix::mount::MsFlags::MS_NODEV
    }
}

impl Volume for TmpfsVolume {
    fn name(&self) -> &str {
        &self.name
    }

    fn driver_name(&self) -> &str {
        &self.driver_name
    }

    fn path(&self) -> PathBuf {
        self.path.clone()
    }

    fn mount_options(&self) -> VolumeResult<MountOpts> {
        Ok(MountOpts {
            source: "tmpfs".to_string(),
            device: "tmpfs".to_string(),
            data: format!("mode={},size={}", self.options["mode"], self.options["size"]),
            com: self.options.contains_key(COPY_ON_MOUNT),
        })
    }

    fn unmount(&self) -> VolumeResult<()> {
        Ok(())
    }

    fn as_local(&self) -> Option<&dyn LocalVolume> {
        Some(self)
    }
}

impl LocalVolume for TmpfsVolume {
    fn init(&self, ids: IdPair) -> VolumeResult<()> {
        init_data_dir(&self.path, ids)
    }

    fn real_path(&self) -> VolumeResult<PathBuf> {
        resolve_real_path(&self.path)
    }

    fn into_volume(self: Arc<Self>) -> Arc<dyn Volume> {
        self
    }
}
