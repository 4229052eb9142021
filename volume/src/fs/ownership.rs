//! Ownership-aware directory creation.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Host uid:gid pair that owns volume directories.
///
/// Produced by whatever id-mapping the caller applies; this crate only
/// applies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdPair {
    pub uid: u32,
    pub gid: u32,
}

impl IdPair {
    pub fn new(uid: u32, gid: u32) -> Self {
        Self { uid, gid }
    }

    /// The host root user.
    pub fn root() -> Self {
        Self::new(0, 0)
    }

    /// Real uid:gid of the current process.
    #[cfg(unix)]
    pub fn current() -> Self {
        Self::new(
            nix::unistd::getuid().as_raw(),
            nix::unistd::getgid().as_raw(),
        )
    }

    #[cfg(not(unix))]
    pub fn current() -> Self {
        Self::root()
    }
}

impl std::fmt::Display for IdPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.uid, self.gid)
    }
}

/// Create `path` and any missing parents with `mode`, owned by `ids`.
///
/// Only directories created by this call are chowned, unless
/// `chown_existing` is set, in which case an already existing `path` is
/// chowned as well. Fails if `path` exists and is not a directory.
pub fn create_dir_all_owned(
    path: &Path,
    mode: u32,
    ids: IdPair,
    chown_existing: bool,
) -> io::Result<()> {
    if let Ok(meta) = std::fs::metadata(path) {
        if !meta.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} exists and is not a directory", path.display()),
            ));
        }
        if chown_existing {
            chown_if_needed(path, ids)?;
        }
        return Ok(());
    }

    for dir in missing_ancestors(path).into_iter().rev() {
        match create_dir(&dir, mode) {
            Ok(()) => {}
            // Lost a race with another creator; fine as long as it is a directory.
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && dir.is_dir() => continue,
            Err(e) => return Err(e),
        }
        chown_if_needed(&dir, ids)?;
        tracing::trace!(path = %dir.display(), owner = %ids, "Created directory");
    }

    Ok(())
}

/// `path` and each ancestor that does not exist yet, deepest first.
fn missing_ancestors(path: &Path) -> Vec<PathBuf> {
    path.ancestors()
        .take_while(|p| !p.as_os_str().is_empty() && std::fs::symlink_metadata(p).is_err())
        .map(Path::to_path_buf)
        .collect()
}

#[cfg(unix)]
fn create_dir(dir: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    std::fs::DirBuilder::new().mode(mode).create(dir)
}

#[cfg(not(unix))]
fn create_dir(dir: &Path, _mode: u32) -> io::Result<()> {
    std::fs::create_dir(dir)
}

#[cfg(unix)]
fn chown_if_needed(path: &Path, ids: IdPair) -> io::Result<()> {
    use nix::unistd::{Gid, Uid, chown};
    use std::os::unix::fs::MetadataExt;

    let meta = std::fs::metadata(path)?;
    if meta.uid() == ids.uid && meta.gid() == ids.gid {
        return Ok(());
    }

    chown(
        path,
        Some(Uid::from_raw(ids.uid)),
        Some(Gid::from_raw(ids.gid)),
    )
    .map_err(io::Error::from)
}

#[cfg(not(unix))]
fn chown_if_needed(_path: &Path, _ids: IdPair) -> io::Result<()> {
    Ok(())
}
