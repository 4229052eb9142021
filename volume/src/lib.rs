//! Volume drivers for Boxlite.
//!
//! Two kinds of drivers produce [`Volume`]s:
//! - [`local::Root`]: a registry of directories under a managed root
//!   (`local`, `tmpfs` and `generic` variants)
//! - [`drivers::VolumeDriverAdapter`]: a bridge to an out-of-process plugin
//!   reached through a [`drivers::VolumeDriverProxy`]
//!
//! [`VolumeRuntime`] ties the local drivers and any registered plugins
//! together under one home directory.

pub mod drivers;
pub mod fs;
pub mod local;
pub mod runtime;
mod volume;

pub use boxlite_volume_shared::errors::{VolumeError, VolumeResult};
pub use drivers::{DriverStore, VolumeDriver, VolumeDriverAdapter, VolumeDriverProxy};
pub use fs::IdPair;
pub use runtime::{VolumeInfo, VolumeRuntime, VolumeRuntimeOptions};
pub use volume::{DEFAULT_DRIVER_NAME, LocalVolume, MountOpts, Volume, VolumeOptions};
