//! Contract of an out-of-process volume plugin.

use std::path::PathBuf;

use boxlite_volume_shared::errors::VolumeResult;

use crate::volume::VolumeOptions;

/// Calls into a volume plugin.
///
/// The transport behind it is opaque to this crate; timeouts and retries
/// belong to the implementation. Errors should be reported as
/// [`VolumeError::Plugin`](boxlite_volume_shared::errors::VolumeError::Plugin)
/// unless a more specific kind applies.
pub trait VolumeDriverProxy: Send + Sync {
    fn create(&self, name: &str, options: &VolumeOptions) -> VolumeResult<()>;

    fn remove(&self, name: &str) -> VolumeResult<()>;

    /// Host path of the volume, without mounting it.
    fn path(&self, name: &str) -> VolumeResult<PathBuf>;

    /// Mount the volume and return its host mount point.
    fn mount(&self, name: &str) -> VolumeResult<PathBuf>;

    fn unmount(&self, name: &str) -> VolumeResult<()>;
}
