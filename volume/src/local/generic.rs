//! Generic local volumes.
//!
//! Describe an arbitrary local mount through the `type`, `device` and `o`
//! options, e.g. `type=ext4,device=/dev/vdb1`. Without options the volume is
//! a bind mount of its data directory, like the `local` driver.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use boxlite_volume_shared::errors::VolumeResult;
use boxlite_volume_shared::layout::dirs;

use super::{Root, data_path, init_data_dir, resolve_real_path};
use crate::fs::IdPair;
use crate::volume::{LocalVolume, MountOpts, Volume, VolumeOptions};

/// Driver name of generic local volumes.
pub const DRIVER_NAME: &str = "generic";

/// Filesystem type to mount.
pub const OPT_TYPE: &str = "type";
/// Mount source; defaults to the volume's data directory.
pub const OPT_DEVICE: &str = "device";
/// Filesystem-specific mount data.
pub const OPT_DATA: &str = "o";

/// Open the `generic` driver root at `{scope}/generic`.
pub fn new_root(scope: &Path, ids: IdPair) -> VolumeResult<Root> {
    Root::new(scope, DRIVER_NAME, dirs::GENERIC, ids, new_generic_volume)
}

fn new_generic_volume(
    name: &str,
    root: &Path,
    driver_name: &str,
    options: &VolumeOptions,
) -> Arc<dyn LocalVolume> {
    Arc::new(GenericVolume::new(name, root, driver_name, options))
}

#[derive(Debug)]
pub struct GenericVolume {
    name: String,
    driver_name: String,
    path: PathBuf,
    options: VolumeOptions,
}

impl GenericVolume {
    pub fn new(name: &str, root: &Path, driver_name: &str, options: &VolumeOptions) -> Self {
        Self {
            name: name.to_string(),
            driver_name: driver_name.to_string(),
            path: data_path(root, name),
            options: options.clone(),
        }
    }

    pub fn options(&self) -> &VolumeOptions {
        &self.options
    }
}

impl Volume for GenericVolume {
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
        let source = match self.options.get(OPT_DEVICE) {
            Some(device) => device.clone(),
            None => self.path.to_string_lossy().into_owned(),
        };

        Ok(MountOpts {
            source,
            device: self
                .options
                .get(OPT_TYPE)
                .cloned()
                .unwrap_or_else(|| "bind".to_string()),
            data: self.options.get(OPT_DATA).cloned().unwrap_or_default(),
            com: false,
        })
    }

    fn unmount(&self) -> VolumeResult<()> {
        Ok(())
    }

    fn as_local(&self) -> Option<&dyn LocalVolume> {
        Some(self)
    }
}

impl LocalVolume for GenericVolume {
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

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_without_options_binds_data_dir() {
        let v = GenericVolume::new("data", Path::new("/r"), DRIVER_NAME, &VolumeOptions::new());
        assert_eq!(v.mount_options().unwrap(), MountOpts::bind("/r/data/_data"));
    }

    #[test]
    fn test_options_describe_mount() {
        let options: VolumeOptions = [
            (OPT_TYPE, "ext4"),
            (OPT_DEVICE, "/dev/vdb1"),
            (OPT_DATA, "noatime"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let v = GenericVolume::new("data", Path::new("/r"), DRIVER_NAME, &options);
        let mount = v.mount_options().unwrap();
        assert_eq!(mount.source, "/dev/vdb1");
        assert_eq!(mount.device, "ext4");
        assert_eq!(mount.data, "noatime");
        // Data directory still anchors the volume on disk.
        assert_eq!(v.path(), PathBuf::from("/r/data/_data"));
    }

    #[test]
    fn test_root_uses_generic_base() {
        let tmp = TempDir::new().unwrap();
        let root = new_root(tmp.path(), IdPair::current()).unwrap();
        assert!(root.path().ends_with(dirs::GENERIC));

        let v = root.create("data", &VolumeOptions::new()).unwrap();
        assert_eq!(v.driver_name(), DRIVER_NAME);
        assert!(v.path().is_dir());
    }
}
