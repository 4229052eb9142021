//! Volume runtime: every driver of one home directory behind one handle.

mod core;
pub mod options;
pub mod types;

pub use self::core::VolumeRuntime;
pub use options::VolumeRuntimeOptions;
pub use types::VolumeInfo;
