//! Volume drivers.
//!
//! Provides:
//! - `VolumeDriver` - uniform create/remove interface implemented by local roots and plugins
//! - `VolumeDriverAdapter` - presents a plugin behind a `VolumeDriverProxy` as a driver
//! - `DriverStore` - name to driver lookup

mod adapter;
mod proxy;
mod store;

pub use adapter::{AdapterVolume, VolumeDriverAdapter};
pub use proxy::VolumeDriverProxy;
pub use store::DriverStore;

use std::sync::Arc;

use boxlite_volume_shared::errors::VolumeResult;

use crate::volume::{Volume, VolumeOptions};

/// A backend that creates and removes volumes.
pub trait VolumeDriver: Send + Sync {
    /// Driver name, stamped on every volume it creates.
    fn name(&self) -> &str;

    /// Create a volume named `name`.
    fn create(&self, name: &str, options: &VolumeOptions) -> VolumeResult<Arc<dyn Volume>>;

    /// Remove a volume created by this driver.
    fn remove(&self, volume: &dyn Volume) -> VolumeResult<()>;
}

#[cfg(test)]
pub(crate) mod testing;
