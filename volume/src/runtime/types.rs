//! Public volume metadata.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::volume::Volume;

/// Metadata about a volume (returned by list and inspect).
///
/// Built without mounting anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VolumeInfo {
    pub name: String,
    pub driver: String,
    /// Host data path; empty if a plugin could not resolve it.
    pub mountpoint: PathBuf,
    /// Visibility of the volume; always `local` here.
    pub scope: String,
}

impl VolumeInfo {
    pub fn new(volume: &dyn Volume) -> Self {
        Self {
            name: volume.name().to_string(),
            driver: volume.driver_name().to_string(),
            mountpoint: volume.path(),
            scope: "local".to_string(),
        }
    }
}
