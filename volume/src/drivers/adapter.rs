//! Bridge from a plugin proxy to the uniform driver interface.

use std::path::PathBuf;
use std::sync::Arc;

use boxlite_volume_shared::errors::VolumeResult;
use parking_lot::Mutex;
use tracing::debug;

use super::{VolumeDriver, VolumeDriverProxy};
use crate::volume::{MountOpts, Volume, VolumeOptions};

/// Driver backed by a volume plugin.
///
/// Keeps no registry of its own: the plugin decides what exists.
#[derive(Clone)]
pub struct VolumeDriverAdapter {
    name: String,
    proxy: Arc<dyn VolumeDriverProxy>,
}

impl VolumeDriverAdapter {
    pub fn new(name: impl Into<String>, proxy: Arc<dyn VolumeDriverProxy>) -> Self {
        Self {
            name: name.into(),
            proxy,
        }
    }
}

impl std::fmt::Debug for VolumeDriverAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VolumeDriverAdapter")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl VolumeDriver for VolumeDriverAdapter {
    fn name(&self) -> &str {
        &self.name
    }

    fn create(&self, name: &str, options: &VolumeOptions) -> VolumeResult<Arc<dyn Volume>> {
        self.proxy.create(name, options)?;
        debug!(driver = %self.name, volume = name, "Created plugin volume");

        Ok(Arc::new(AdapterVolume {
            name: name.to_string(),
            driver_name: self.name.clone(),
            proxy: Arc::clone(&self.proxy),
            state: Mutex::new(MountState::Unmounted),
        }))
    }

    fn remove(&self, volume: &dyn Volume) -> VolumeResult<()> {
        self.proxy.remove(volume.name())
    }
}

/// Mount state of a plugin volume.
#[derive(Debug, Clone, PartialEq, Eq)]
enum MountState {
    Unmounted,
    /// Mounted by the plugin at this host path.
    Mounted(PathBuf),
}

/// Volume living in a plugin.
///
/// The host path is only known for sure while the volume is mounted; the
/// plugin is trusted about where that is.
pub struct AdapterVolume {
    name: String,
    driver_name: String,
    proxy: Arc<dyn VolumeDriverProxy>,
    state: Mutex<MountState>,
}

impl AdapterVolume {
    /// True between a successful `mount_options` and the matching `unmount`.
    pub fn is_mounted(&self) -> bool {
        matches!(*self.state.lock(), MountState::Mounted(_))
    }
}

impl std::fmt::Debug for AdapterVolume {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterVolume")
            .field("name", &self.name)
            .field("driver_name", &self.driver_name)
            .field("state", &*self.state.lock())
            .finish_non_exhaustive()
    }
}

impl Volume for AdapterVolume {
    fn name(&self) -> &str {
        &self.name
    }

    fn driver_name(&self) -> &str {
        &self.driver_name
    }

    /// Mount point while mounted, otherwise whatever the plugin reports.
    ///
    /// Plugin errors yield an empty path, meaning "unknown".
    fn path(&self) -> PathBuf {
        if let MountState::Mounted(path) = &*self.state.lock() {
            return path.clone();
        }

        self.proxy.path(&self.name).unwrap_or_else(|e| {
            debug!(driver = %self.driver_name, volume = %self.name, error = %e, "Plugin could not resolve volume path");
            PathBuf::new()
        })
    }

    /// Mounts the volume in the plugin; pair with [`Volume::unmount`].
    fn mount_options(&self) -> VolumeResult<MountOpts> {
        let mount_point = self.proxy.mount(&self.name)?;
        let opts = MountOpts::bind(mount_point.to_string_lossy());

        *self.state.lock() = MountState::Mounted(mount_point);
        Ok(opts)
    }

    fn unmount(&self) -> VolumeResult<()> {
        self.proxy.unmount(&self.name)?;
        *self.state.lock() = MountState::Unmounted;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::testing::{Call, FakeProxy};
    use boxlite_volume_shared::errors::VolumeError;

    fn adapter() -> (Arc<FakeProxy>, VolumeDriverAdapter) {
        let proxy = Arc::new(FakeProxy::new("/mnt/plugin"));
        let adapter = VolumeDriverAdapter::new("remote", proxy.clone());
        (proxy, adapter)
    }

    #[test]
    fn test_create_forwards_and_tags_driver() {
        let (proxy, adapter) = adapter();
        let mut options = VolumeOptions::new();
        options.insert("replicas".to_string(), "3".to_string());

        let volume = adapter.create("shared", &options).unwrap();

        assert_eq!(volume.name(), "shared");
        assert_eq!(volume.driver_name(), "remote");
        assert!(volume.as_local().is_none());
        assert_eq!(proxy.calls(), [Call::Create("shared".into(), options)]);
    }

    #[test]
    fn test_create_error_propagates() {
        let (proxy, adapter) = adapter();
        proxy.fail_next("quota exceeded");

        let err = adapter.create("shared", &VolumeOptions::new()).unwrap_err();
        assert!(matches!(err, VolumeError::Plugin(msg) if msg == "quota exceeded"));
    }

    #[test]
    fn test_remove_forwards_name() {
        let (proxy, adapter) = adapter();
        let volume = adapter.create("shared", &VolumeOptions::new()).unwrap();

        adapter.remove(volume.as_ref()).unwrap();
        assert_eq!(proxy.calls().last(), Some(&Call::Remove("shared".into())));
    }

    #[test]
    fn test_path_queries_plugin_when_unmounted() {
        let (proxy, adapter) = adapter();
        let volume = adapter.create("shared", &VolumeOptions::new()).unwrap();

        assert_eq!(volume.path(), PathBuf::from("/mnt/plugin/shared/path"));
        assert_eq!(proxy.count(|c| matches!(c, Call::Path(_))), 1);
    }

    #[test]
    fn test_path_error_is_empty() {
        let (proxy, adapter) = adapter();
        let volume = adapter.create("shared", &VolumeOptions::new()).unwrap();

        proxy.fail_next("plugin gone");
        assert_eq!(volume.path(), PathBuf::new());
    }

    #[test]
    fn test_mount_options_caches_mount_point() {
        let (proxy, adapter) = adapter();
        let volume = adapter.create("shared", &VolumeOptions::new()).unwrap();

        let opts = volume.mount_options().unwrap();
        assert_eq!(opts.source, "/mnt/plugin/shared/mount1");
        assert_eq!(opts.device, "bind");

        // Cached: no Path call reaches the plugin while mounted.
        assert_eq!(volume.path(), PathBuf::from(&opts.source));
        assert_eq!(volume.path(), PathBuf::from(&opts.source));
        assert_eq!(proxy.count(|c| matches!(c, Call::Path(_))), 0);
    }

    #[test]
    fn test_unmount_clears_cache() {
        let (proxy, adapter) = adapter();
        let volume = adapter.create("shared", &VolumeOptions::new()).unwrap();

        volume.mount_options().unwrap();
        volume.unmount().unwrap();

        assert_eq!(volume.path(), PathBuf::from("/mnt/plugin/shared/path"));
        assert_eq!(proxy.count(|c| matches!(c, Call::Path(_))), 1);
        assert_eq!(proxy.count(|c| matches!(c, Call::Unmount(_))), 1);
    }

    #[test]
    fn test_failed_mount_leaves_state_unmounted() {
        let proxy = Arc::new(FakeProxy::new("/mnt/plugin"));
        let adapter = VolumeDriverAdapter::new("remote", proxy.clone());
        let volume = adapter.create("shared", &VolumeOptions::new()).unwrap();

        proxy.fail_next("busy");
        assert!(volume.mount_options().is_err());
        assert_eq!(volume.path(), PathBuf::from("/mnt/plugin/shared/path"));
    }

    #[test]
    fn test_failed_unmount_keeps_mount_point() {
        let proxy = Arc::new(FakeProxy::new("/mnt/plugin"));
        let adapter = VolumeDriverAdapter::new("remote", proxy.clone());
        let created = adapter.create("shared", &VolumeOptions::new()).unwrap();
        let volume = AdapterVolume {
            name: created.name().to_string(),
            driver_name: created.driver_name().to_string(),
            proxy: proxy.clone(),
            state: Mutex::new(MountState::Unmounted),
        };

        volume.mount_options().unwrap();
        proxy.fail_next("device busy");
        assert!(volume.unmount().is_err());
        assert!(volume.is_mounted());
        assert_eq!(volume.path(), PathBuf::from("/mnt/plugin/shared/mount1"));
    }
}
