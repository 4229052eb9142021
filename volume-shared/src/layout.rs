//! On-disk layout of a volume root.
//!
//! Every local driver manages one root directory under its scope:
//! ```text
//! {scope}/
//! ├── volumes/               # VolumeRootLayout for the "local" driver
//! │   └── {name}/
//! │       └── _data/         # Volume data, bind mounted into containers
//! ├── tmpfs/                 # VolumeRootLayout for the "tmpfs" driver
//! └── vfs/dir/               # Legacy layout, only recognized on removal
//! ```

use std::path::{Path, PathBuf};

// ============================================================================
// CONSTANTS
// ============================================================================

/// Volume directory names.
pub mod dirs {
    /// Data directory inside each volume directory.
    ///
    /// Deliberately distinctive so data survives layout migrations.
    pub const DATA: &str = "_data";

    /// Root directory of the default ("local") driver.
    pub const VOLUMES: &str = "volumes";

    /// Root directory of the tmpfs driver.
    pub const TMPFS: &str = "tmpfs";

    /// Root directory of the generic local driver.
    pub const GENERIC: &str = "generic";

    /// Legacy volume directory, relative to the parent of a volume root.
    pub const LEGACY_VFS: &str = "vfs/dir";
}

/// Characters allowed in a volume name, in the form shown to users.
pub const RESTRICTED_NAME_CHARS: &str = "[a-zA-Z0-9][a-zA-Z0-9_.-]";

/// Full pattern a volume name must match.
///
/// Names become directory leaves, so separators and leading dots are excluded.
pub const RESTRICTED_NAME_PATTERN: &str = "^[a-zA-Z0-9][a-zA-Z0-9_.-]+$";

// ============================================================================
// VOLUME ROOT LAYOUT
// ============================================================================

/// Directory layout of one driver's managed root.
#[derive(Clone, Debug)]
pub struct VolumeRootLayout {
    root: PathBuf,
}

impl VolumeRootLayout {
    /// Create a layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the layout of `{scope}/{base}`.
    pub fn under(scope: &Path, base: &str) -> Self {
        Self::new(scope.join(base))
    }

    /// Managed root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Volume directory: {root}/{name}
    pub fn volume_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Data directory: {root}/{name}/_data
    pub fn data_dir(&self, name: &str) -> PathBuf {
        self.volume_dir(name).join(dirs::DATA)
    }

    /// Legacy volume directory: {dirname(root)}/vfs/dir
    ///
    /// Falls back to the root itself when it has no parent.
    pub fn legacy_dir(&self) -> PathBuf {
        self.root
            .parent()
            .unwrap_or(&self.root)
            .join(dirs::LEGACY_VFS)
    }
}
