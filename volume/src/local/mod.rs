//! Local volume drivers.
//!
//! A [`Root`] owns one directory under the engine's scope and registers a
//! volume for each child directory. The concrete volume type is chosen by
//! the root's factory:
//! - [`bind`]: plain bind mount of the data directory (driver `local`)
//! - [`tmpfs`]: tmpfs mount described by `mode`/`size` options (driver `tmpfs`)
//! - [`generic`]: mount described by `type`/`device`/`o` options (driver `generic`)

pub mod bind;
pub mod generic;
mod root;
pub mod tmpfs;

pub use root::{Root, VolumeFactory};

use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use boxlite_volume_shared::errors::{VolumeError, VolumeResult};
use boxlite_volume_shared::layout::{RESTRICTED_NAME_PATTERN, VolumeRootLayout};
use regex::Regex;

use crate::fs::{IdPair, create_dir_all_owned};

/// Mode of volume data directories.
const DATA_DIR_MODE: u32 = 0o755;

static VOLUME_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(RESTRICTED_NAME_PATTERN).expect("restricted name pattern is a valid regex")
});

/// Reject names that could escape the root once used as a directory leaf.
pub fn validate_name(name: &str) -> VolumeResult<()> {
    if VOLUME_NAME.is_match(name) {
        Ok(())
    } else {
        Err(VolumeError::InvalidName(name.to_string()))
    }
}

/// Data path of a volume: {root}/{name}/_data
pub fn data_path(root: &Path, name: &str) -> PathBuf {
    VolumeRootLayout::new(root).data_dir(name)
}

/// Create a volume's data directory, refusing to reuse an existing one.
pub(crate) fn init_data_dir(path: &Path, ids: IdPair) -> VolumeResult<()> {
    let volume_dir = path.parent().unwrap_or(path);
    if std::fs::symlink_metadata(path).is_ok() {
        return Err(VolumeError::AlreadyExists(volume_dir.to_path_buf()));
    }

    create_dir_all_owned(path, DATA_DIR_MODE, ids, false).map_err(|e| {
        if e.kind() == io::ErrorKind::AlreadyExists {
            VolumeError::AlreadyExists(volume_dir.to_path_buf())
        } else {
            VolumeError::Io(e)
        }
    })
}

/// Resolve symlinks in a data path.
///
/// A data directory that does not exist (not created yet, or partially
/// removed) resolves to its parent so the scope check still has something
/// to look at.
pub(crate) fn resolve_real_path(path: &Path) -> VolumeResult<PathBuf> {
    match std::fs::canonicalize(path) {
        Ok(real) => Ok(real),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            let parent = path.parent().unwrap_or(path);
            match std::fs::canonicalize(parent) {
                Ok(real) => Ok(real),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(parent.to_path_buf()),
                Err(e) => Err(e.into()),
            }
        }
        Err(e) => Err(e.into()),
    }
}
