//! Runtime configuration.

use std::path::{Path, PathBuf};

use boxlite_volume_shared::errors::{VolumeError, VolumeResult};
use serde::{Deserialize, Serialize};

use crate::fs::IdPair;

/// Environment variable overriding the default home directory.
pub const HOME_ENV: &str = "BOXLITE_HOME";

/// Options for opening a [`VolumeRuntime`](super::VolumeRuntime).
///
/// Loaded from a JSON file such as:
/// ```json
/// { "home_dir": "/var/lib/boxlite", "root_uid": 0, "root_gid": 0 }
/// ```
/// Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeRuntimeOptions {
    /// Scope directory all local volume roots live under.
    pub home_dir: PathBuf,
    /// Owner uid of created directories; defaults to the current user.
    pub root_uid: Option<u32>,
    /// Owner gid of created directories; defaults to the current group.
    pub root_gid: Option<u32>,
}

impl Default for VolumeRuntimeOptions {
    fn default() -> Self {
        Self {
            home_dir: default_home_dir(),
            root_uid: None,
            root_gid: None,
        }
    }
}

impl VolumeRuntimeOptions {
    /// Options rooted at `home_dir`.
    pub fn with_home(home_dir: impl Into<PathBuf>) -> Self {
        Self {
            home_dir: home_dir.into(),
            ..Self::default()
        }
    }

    /// Load options from a JSON file.
    pub fn load(path: &Path) -> VolumeResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            VolumeError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            VolumeError::Config(format!("failed to parse {}: {}", path.display(), e))
        })
    }

    /// Owner of created directories, falling back to the current process ids.
    pub fn ids(&self) -> IdPair {
        let current = IdPair::current();
        IdPair::new(
            self.root_uid.unwrap_or(current.uid),
            self.root_gid.unwrap_or(current.gid),
        )
    }
}

/// `$BOXLITE_HOME`, else `~/.boxlite`, else a directory under the temp dir.
fn default_home_dir() -> PathBuf {
    std::env::var_os(HOME_ENV)
        .map(PathBuf::from)
        .or_else(|| dirs::home_dir().map(|home| home.join(".boxlite")))
        .unwrap_or_else(|| std::env::temp_dir().join("boxlite"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_partial_config() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, r#"{ "home_dir": "/srv/boxlite", "root_gid": 42 }"#).unwrap();

        let options = VolumeRuntimeOptions::load(&path).unwrap();
        assert_eq!(options.home_dir, PathBuf::from("/srv/boxlite"));
        assert_eq!(options.root_uid, None);
        assert_eq!(options.ids().gid, 42);
        assert_eq!(options.ids().uid, IdPair::current().uid);
    }

    #[test]
    fn test_load_invalid_config() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = VolumeRuntimeOptions::load(&path).unwrap_err();
        assert!(matches!(err, VolumeError::Config(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = VolumeRuntimeOptions::load(Path::new("/nonexistent/boxvol.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn test_with_home() {
        let options = VolumeRuntimeOptions::with_home("/tmp/bv");
        assert_eq!(options.home_dir, PathBuf::from("/tmp/bv"));
        assert_eq!(options.ids(), IdPair::current());
    }
}
