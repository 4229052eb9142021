//! Registry of volumes under one managed root directory.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use boxlite_volume_shared::errors::{VolumeError, VolumeResult};
use boxlite_volume_shared::layout::VolumeRootLayout;
use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use super::validate_name;
use crate::drivers::VolumeDriver;
use crate::fs::{IdPair, create_dir_all_owned};
use crate::volume::{LocalVolume, Volume, VolumeOptions};

/// Mode of the managed root: owner only.
const ROOT_DIR_MODE: u32 = 0o700;

/// Builds the concrete volume for `(name, root, driver_name, options)`.
pub type VolumeFactory = fn(&str, &Path, &str, &VolumeOptions) -> Arc<dyn LocalVolume>;

/// Local volume driver backed by a directory.
///
/// The in-memory map is the source of truth for what exists and is rebuilt
/// from the directory listing on construction; nothing else is persisted.
/// Create and remove hold the lock across their filesystem work, so one slow
/// disk serializes every lifecycle operation of this root.
pub struct Root {
    name: String,
    scope: PathBuf,
    layout: VolumeRootLayout,
    ids: IdPair,
    factory: VolumeFactory,
    volumes: Mutex<HashMap<String, Arc<dyn LocalVolume>>>,
}

impl Root {
    /// Open the root `{scope}/{base}`, creating it if needed.
    ///
    /// Every existing child directory is registered as a volume without
    /// being initialized again.
    pub fn new(
        scope: impl Into<PathBuf>,
        name: &str,
        base: &str,
        ids: IdPair,
        factory: VolumeFactory,
    ) -> VolumeResult<Self> {
        let scope = scope.into();
        let nominal = VolumeRootLayout::under(&scope, base);
        create_dir_all_owned(nominal.root(), ROOT_DIR_MODE, ids, true)?;

        // Compare against the resolved root, since removal checks resolved paths.
        let layout = VolumeRootLayout::new(std::fs::canonicalize(nominal.root())?);

        let mut volumes = HashMap::new();
        let options = VolumeOptions::new();
        for entry in std::fs::read_dir(layout.root())? {
            let entry = entry?;
            match entry.file_name().into_string() {
                Ok(volume_name) => {
                    let volume = factory(&volume_name, layout.root(), name, &options);
                    volumes.insert(volume_name, volume);
                }
                Err(raw) => {
                    warn!(root = %layout.root().display(), entry = ?raw, "Skipping non UTF-8 volume directory");
                }
            }
        }

        debug!(
            driver = name,
            root = %layout.root().display(),
            count = volumes.len(),
            "Loaded volume root"
        );

        Ok(Self {
            name: name.to_string(),
            scope,
            layout,
            ids,
            factory,
            volumes: Mutex::new(volumes),
        })
    }

    /// Driver name stamped on every volume of this root.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Base directory the root was opened under.
    pub fn scope(&self) -> &Path {
        &self.scope
    }

    /// Resolved managed root directory.
    pub fn path(&self) -> &Path {
        self.layout.root()
    }

    /// Snapshot of every registered volume.
    ///
    /// Creates and removes racing with the caller are not reflected.
    pub fn list(&self) -> Vec<Arc<dyn Volume>> {
        self.volumes
            .lock()
            .values()
            .map(|v| Arc::clone(v).into_volume())
            .collect()
    }

    /// Look up a volume by name.
    pub fn get(&self, name: &str) -> VolumeResult<Arc<dyn Volume>> {
        let volume = self.volumes.lock().get(name).cloned();
        volume
            .map(|v| v.into_volume())
            .ok_or_else(|| VolumeError::NotFound(name.to_string()))
    }

    /// Create a volume, or return the existing one with the same name.
    ///
    /// `options` are only used when the volume is new.
    pub fn create(&self, name: &str, options: &VolumeOptions) -> VolumeResult<Arc<dyn Volume>> {
        validate_name(name)?;

        let mut volumes = self.volumes.lock();
        if let Some(existing) = volumes.get(name) {
            return Ok(Arc::clone(existing).into_volume());
        }

        let volume = (self.factory)(name, self.layout.root(), &self.name, options);
        volume.init(self.ids)?;
        volumes.insert(name.to_string(), Arc::clone(&volume));

        info!(driver = %self.name, volume = name, path = %volume.path().display(), "Created volume");
        Ok(volume.into_volume())
    }

    /// Delete a volume and all of its data.
    ///
    /// The volume must belong to this root. Its resolved data path must stay
    /// inside the managed root; otherwise nothing is deleted. The map entry
    /// is dropped only after the directories are gone.
    pub fn remove(&self, volume: &dyn Volume) -> VolumeResult<()> {
        let mut volumes = self.volumes.lock();

        let local = volume
            .as_local()
            .filter(|_| volume.driver_name() == self.name)
            .ok_or_else(|| {
                VolumeError::TypeMismatch(format!(
                    "{} (driver {}) is not managed by {}",
                    volume.name(),
                    volume.driver_name(),
                    self.name
                ))
            })?;

        // Same driver name, but opened under another scope.
        let owner_root = volume.path().parent().and_then(Path::parent).map(Path::to_path_buf);
        if owner_root.as_deref() != Some(self.layout.root()) {
            return Err(VolumeError::TypeMismatch(format!(
                "{} is not under {}",
                volume.path().display(),
                self.layout.root().display()
            )));
        }

        let mounts = local.active_mounts();
        if mounts > 0 {
            return Err(VolumeError::InUse {
                name: volume.name().to_string(),
                mounts,
            });
        }

        // The name picks the volume directory to delete; keep it a plain leaf.
        validate_name(volume.name())?;

        let real_path = local.real_path()?;
        self.ensure_scoped(&real_path)?;

        let volume_dir = self.layout.volume_dir(volume.name());

        remove_path(&real_path)?;
        remove_path(&volume_dir)?;
        volumes.remove(volume.name());

        info!(driver = %self.name, volume = volume.name(), "Removed volume");
        Ok(())
    }

    fn ensure_scoped(&self, real_path: &Path) -> VolumeResult<()> {
        if self.scoped_path(real_path) {
            return Ok(());
        }

        error!(
            root = %self.layout.root().display(),
            path = %real_path.display(),
            "Refusing to remove a path outside of the volume root"
        );
        Err(VolumeError::ScopeViolation {
            root: self.layout.root().to_path_buf(),
            path: real_path.to_path_buf(),
        })
    }

    /// True if `real_path` is strictly below the managed root, or below the
    /// legacy `vfs/dir` directory next to it.
    fn scoped_path(&self, real_path: &Path) -> bool {
        let root = self.layout.root();
        if real_path.starts_with(root) && real_path != root {
            return true;
        }

        #[cfg(unix)]
        {
            let legacy = self.layout.legacy_dir();
            if real_path.starts_with(&legacy) && real_path != legacy {
                return true;
            }
        }

        false
    }
}

impl std::fmt::Debug for Root {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Root")
            .field("name", &self.name)
            .field("path", &self.layout.root())
            .field("ids", &self.ids)
            .finish_non_exhaustive()
    }
}

impl VolumeDriver for Root {
    fn name(&self) -> &str {
        Root::name(self)
    }

    fn create(&self, name: &str, options: &VolumeOptions) -> VolumeResult<Arc<dyn Volume>> {
        Root::create(self, name, options)
    }

    fn remove(&self, volume: &dyn Volume) -> VolumeResult<()> {
        Root::remove(self, volume)
    }
}

/// Remove a directory tree; a path that is already gone counts as removed.
fn remove_path(path: &Path) -> VolumeResult<()> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
