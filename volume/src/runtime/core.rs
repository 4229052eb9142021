//! VolumeRuntime - entry point for volume management.

use std::path::Path;
use std::sync::Arc;

use boxlite_volume_shared::errors::{VolumeError, VolumeResult};
use parking_lot::Mutex;
use tracing::info;

use super::options::VolumeRuntimeOptions;
use super::types::VolumeInfo;
use crate::drivers::{DriverStore, VolumeDriver, VolumeDriverAdapter, VolumeDriverProxy};
use crate::local::{self, Root};
use crate::volume::{DEFAULT_DRIVER_NAME, Volume, VolumeOptions};

/// Opens the local drivers of one home directory and routes calls by name.
///
/// Lookups by volume name only see local volumes; plugins keep their own
/// registry, so plugin volumes are handled through their driver.
pub struct VolumeRuntime {
    options: VolumeRuntimeOptions,
    roots: Vec<Arc<Root>>,
    drivers: DriverStore,
    /// Held across the cross-driver name check and the create.
    create_lock: Mutex<()>,
}

impl VolumeRuntime {
    /// Open (creating if needed) the `local`, `tmpfs` and `generic` roots.
    pub fn new(options: VolumeRuntimeOptions) -> VolumeResult<Self> {
        let home = options.home_dir.as_path();
        let ids = options.ids();

        let roots = vec![
            Arc::new(local::bind::new_root(home, ids)?),
            Arc::new(local::tmpfs::new_root(home, ids)?),
            Arc::new(local::generic::new_root(home, ids)?),
        ];

        let drivers = DriverStore::new();
        for root in &roots {
            drivers.register(Arc::clone(root) as Arc<dyn VolumeDriver>);
        }

        info!(home = %home.display(), owner = %ids, "Volume runtime ready");
        Ok(Self {
            options,
            roots,
            drivers,
            create_lock: Mutex::new(()),
        })
    }

    pub fn home_dir(&self) -> &Path {
        &self.options.home_dir
    }

    pub fn drivers(&self) -> &DriverStore {
        &self.drivers
    }

    /// Register a plugin under `name`.
    pub fn register_plugin(
        &self,
        name: &str,
        proxy: Arc<dyn VolumeDriverProxy>,
    ) -> VolumeResult<()> {
        let adapter = Arc::new(VolumeDriverAdapter::new(name, proxy));
        if !self.drivers.register(adapter) {
            return Err(VolumeError::Config(format!(
                "volume driver {name} is already registered"
            )));
        }
        Ok(())
    }

    /// Create a volume with `driver` (default: `local`).
    ///
    /// A name already taken by another local driver is refused; the same
    /// driver returns the existing volume.
    pub fn create(
        &self,
        name: &str,
        driver: Option<&str>,
        options: &VolumeOptions,
    ) -> VolumeResult<Arc<dyn Volume>> {
        let driver_name = driver.unwrap_or(DEFAULT_DRIVER_NAME);
        let driver = self.drivers.lookup(driver_name)?;

        let _guard = self.create_lock.lock();
        if let Some(owner) = self.owner_of(name)
            && owner.name() != driver_name
        {
            return Err(VolumeError::NameConflict {
                name: name.to_string(),
                driver: owner.name().to_string(),
            });
        }

        driver.create(name, options)
    }

    /// Look up a local volume by name.
    pub fn get(&self, name: &str) -> VolumeResult<Arc<dyn Volume>> {
        self.owner_of(name)
            .ok_or_else(|| VolumeError::NotFound(name.to_string()))?
            .get(name)
    }

    /// All local volumes, sorted by name.
    pub fn list(&self) -> Vec<Arc<dyn Volume>> {
        let mut volumes: Vec<_> = self.roots.iter().flat_map(|root| root.list()).collect();
        volumes.sort_by(|a, b| a.name().cmp(b.name()));
        volumes
    }

    /// Remove a local volume by name.
    pub fn remove(&self, name: &str) -> VolumeResult<()> {
        let root = self
            .owner_of(name)
            .ok_or_else(|| VolumeError::NotFound(name.to_string()))?;
        let volume = root.get(name)?;
        root.remove(volume.as_ref())
    }

    pub fn inspect(&self, name: &str) -> VolumeResult<VolumeInfo> {
        self.get(name).map(|v| VolumeInfo::new(v.as_ref()))
    }

    fn owner_of(&self, name: &str) -> Option<&Arc<Root>> {
        self.roots.iter().find(|root| root.get(name).is_ok())
    }
}
