//! Bind volumes: the default `local` driver.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use boxlite_volume_shared::errors::VolumeResult;
use boxlite_volume_shared::layout::dirs;

use super::{Root, data_path, init_data_dir, resolve_real_path};
use crate::fs::IdPair;
use crate::volume::{DEFAULT_DRIVER_NAME, LocalVolume, MountOpts, Volume, VolumeOptions};

/// Open the `local` driver root at `{scope}/volumes`.
pub fn new_root(scope: &Path, ids: IdPair) -> VolumeResult<Root> {
    Root::new(scope, DEFAULT_DRIVER_NAME, dirs::VOLUMES, ids, new_bind_volume)
}

fn new_bind_volume(
    name: &str,
    root: &Path,
    driver_name: &str,
    _options: &VolumeOptions,
) -> Arc<dyn LocalVolume> {
    Arc::new(BindVolume::new(name, root, driver_name))
}

/// Volume whose data directory is bind mounted as is.
///
/// Counts the mounts handed out by [`Volume::mount_options`] so the root
/// can refuse to delete data that is still mounted.
#[derive(Debug)]
pub struct BindVolume {
    name: String,
    driver_name: String,
    path: PathBuf,
    mounts: AtomicUsize,
}

impl BindVolume {
    pub fn new(name: &str, root: &Path, driver_name: &str) -> Self {
        Self {
            name: name.to_string(),
            driver_name: driver_name.to_string(),
            path: data_path(root, name),
            mounts: AtomicUsize::new(0),
        }
    }
}

impl Volume for BindVolume {
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
        self.mounts.fetch_add(1, Ordering::AcqRel);
        Ok(MountOpts::bind(self.path.to_string_lossy()))
    }

    fn unmount(&self) -> VolumeResult<()> {
        // Saturating: an unmatched unmount must not wrap the counter.
        let _ = self
            .mounts
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
        Ok(())
    }

    fn as_local(&self) -> Option<&dyn LocalVolume> {
        Some(self)
    }
}

impl LocalVolume for BindVolume {
    fn init(&self, ids: IdPair) -> VolumeResult<()> {
        init_data_dir(&self.path, ids)
    }

    fn real_path(&self) -> VolumeResult<PathBuf> {
        resolve_real_path(&self.path)
    }

    fn active_mounts(&self) -> usize {
        self.mounts.load(Ordering::Acquire)
    }

    fn into_volume(self: Arc<Self>) -> Arc<dyn Volume> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_volume_paths() {
        let v = BindVolume::new("cache", Path::new("/var/lib/engine/volumes"), "local");
        assert_eq!(v.name(), "cache");
        assert_eq!(v.driver_name(), "local");
        assert_eq!(v.path(), PathBuf::from("/var/lib/engine/volumes/cache/_data"));
    }

    #[test]
    fn test_mount_options_is_bind_of_data_path() {
        let v = BindVolume::new("cache", Path::new("/var/lib/engine/volumes"), "local");
        let opts = v.mount_options().unwrap();
        assert_eq!(opts.source, "/var/lib/engine/volumes/cache/_data");
        assert_eq!(opts.device, "bind");
        assert!(opts.data.is_empty());
    }

    #[test]
    fn test_mount_counting() {
        let v = BindVolume::new("cache", Path::new("/r"), "local");
        assert_eq!(v.active_mounts(), 0);

        v.mount_options().unwrap();
        v.mount_options().unwrap();
        assert_eq!(v.active_mounts(), 2);

        v.unmount().unwrap();
        v.unmount().unwrap();
        v.unmount().unwrap();
        assert_eq!(v.active_mounts(), 0);
    }
}
