//! In-memory plugin proxy for tests.

use std::path::PathBuf;

use boxlite_volume_shared::errors::{VolumeError, VolumeResult};
use parking_lot::Mutex;

use super::VolumeDriverProxy;
use crate::volume::VolumeOptions;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Create(String, VolumeOptions),
    Remove(String),
    Path(String),
    Mount(String),
    Unmount(String),
}

/// Records every call and answers with paths under `base`.
///
/// `mount` returns `{base}/{name}/mount{n}`, `path` returns `{base}/{name}/path`.
pub(crate) struct FakeProxy {
    base: PathBuf,
    calls: Mutex<Vec<Call>>,
    fail_next: Mutex<Option<String>>,
}

impl FakeProxy {
    pub(crate) fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            calls: Mutex::new(Vec::new()),
            fail_next: Mutex::new(None),
        }
    }

    /// Make the next call fail with `VolumeError::Plugin(msg)`.
    pub(crate) fn fail_next(&self, msg: &str) {
        *self.fail_next.lock() = Some(msg.to_string());
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub(crate) fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.lock().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) -> VolumeResult<()> {
        self.calls.lock().push(call);
        match self.fail_next.lock().take() {
            Some(msg) => Err(VolumeError::Plugin(msg)),
            None => Ok(()),
        }
    }
}

impl VolumeDriverProxy for FakeProxy {
    fn create(&self, name: &str, options: &VolumeOptions) -> VolumeResult<()> {
        self.record(Call::Create(name.to_string(), options.clone()))
    }

    fn remove(&self, name: &str) -> VolumeResult<()> {
        self.record(Call::Remove(name.to_string()))
    }

    fn path(&self, name: &str) -> VolumeResult<PathBuf> {
        self.record(Call::Path(name.to_string()))?;
        Ok(self.base.join(name).join("path"))
    }

    fn mount(&self, name: &str) -> VolumeResult<PathBuf> {
        self.record(Call::Mount(name.to_string()))?;
        let n = self.count(|c| matches!(c, Call::Mount(_)));
        Ok(self.base.join(name).join(format!("mount{n}")))
    }

    fn unmount(&self, name: &str) -> VolumeResult<()> {
        self.record(Call::Unmount(name.to_string()))
    }
}
