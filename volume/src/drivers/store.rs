//! Name to driver lookup.

use std::collections::HashMap;
use std::sync::Arc;

use boxlite_volume_shared::errors::{VolumeError, VolumeResult};
use parking_lot::RwLock;
use tracing::debug;

use super::VolumeDriver;

/// Registered volume drivers, keyed by name.
#[derive(Default, Clone)]
pub struct DriverStore {
    drivers: Arc<RwLock<HashMap<String, Arc<dyn VolumeDriver>>>>,
}

impl DriverStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a driver under its own name.
    ///
    /// Returns false, leaving the existing driver in place, if the name is taken.
    pub fn register(&self, driver: Arc<dyn VolumeDriver>) -> bool {
        let name = driver.name().to_string();
        let mut drivers = self.drivers.write();
        if drivers.contains_key(&name) {
            return false;
        }

        debug!(driver = %name, "Registered volume driver");
        drivers.insert(name, driver);
        true
    }

    /// Returns false if no driver had that name.
    pub fn unregister(&self, name: &str) -> bool {
        self.drivers.write().remove(name).is_some()
    }

    pub fn lookup(&self, name: &str) -> VolumeResult<Arc<dyn VolumeDriver>> {
        self.drivers
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| VolumeError::DriverNotFound(name.to_string()))
    }

    /// Sorted names of all registered drivers.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.drivers.read().keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drivers::VolumeDriverAdapter;
    use crate::drivers::testing::FakeProxy;
    use crate::fs::IdPair;
    use crate::local::bind;
    use crate::volume::VolumeOptions;
    use tempfile::TempDir;

    #[test]
    fn test_register_and_lookup() {
        let tmp = TempDir::new().unwrap();
        let store = DriverStore::new();
        let root = bind::new_root(tmp.path(), IdPair::current()).unwrap();

        assert!(store.register(Arc::new(root)));
        assert!(store.register(Arc::new(VolumeDriverAdapter::new(
            "remote",
            Arc::new(FakeProxy::new("/mnt")),
        ))));

        assert_eq!(store.names(), ["local", "remote"]);

        let local = store.lookup("local").unwrap();
        let v = local.create("cache", &VolumeOptions::new()).unwrap();
        assert_eq!(v.driver_name(), "local");
    }

    #[test]
    fn test_register_duplicate_is_rejected() {
        let store = DriverStore::new();
        let first = Arc::new(VolumeDriverAdapter::new("remote", Arc::new(FakeProxy::new("/a"))));
        let second = Arc::new(VolumeDriverAdapter::new("remote", Arc::new(FakeProxy::new("/b"))));

        assert!(store.register(first));
        assert!(!store.register(second));
        assert_eq!(store.names().len(), 1);
    }

    #[test]
    fn test_lookup_unknown_and_unregister() {
        let store = DriverStore::new();
        assert!(matches!(
            store.lookup("nfs"),
            Err(VolumeError::DriverNotFound(n)) if n == "nfs"
        ));

        store.register(Arc::new(VolumeDriverAdapter::new("nfs", Arc::new(FakeProxy::new("/n")))));
        assert!(store.unregister("nfs"));
        assert!(!store.unregister("nfs"));
        assert!(store.lookup("nfs").is_err());
    }
}
