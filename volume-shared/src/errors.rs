//! Error types for volume operations.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for volume operations.
pub type VolumeResult<T> = std::result::Result<T, VolumeError>;

/// Errors returned by volume drivers and registries.
///
/// None of these are retried internally; retry policy belongs to the caller.
#[derive(Error, Debug)]
pub enum VolumeError {
    #[error("volume not found: {0}")]
    NotFound(String),

    #[error(
        "{0:?} includes invalid characters for a local volume name, only \"{chars}\" are allowed",
        chars = crate::layout::RESTRICTED_NAME_CHARS
    )]
    InvalidName(String),

    #[error("volume already exists under {0}")]
    AlreadyExists(PathBuf),

    /// The resolved path of a volume escapes the driver's managed root.
    #[error("unable to remove a directory outside of the volume root {root}: {path}")]
    ScopeViolation { root: PathBuf, path: PathBuf },

    #[error("unknown volume type: {0}")]
    TypeMismatch(String),

    #[error("volume {name} is in use ({mounts} active mounts)")]
    InUse { name: String, mounts: usize },

    #[error("volume name {name} is already in use by driver {driver}")]
    NameConflict { name: String, driver: String },

    #[error("volume driver not found: {0}")]
    DriverNotFound(String),

    #[error("volume plugin error: {0}")]
    Plugin(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl VolumeError {
    /// True for lookups of unknown volumes or drivers.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::DriverNotFound(_))
    }
}
