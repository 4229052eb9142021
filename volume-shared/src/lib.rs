//! Types shared by the boxlite volume crates.
//!
//! - `errors`: the volume error taxonomy and result alias
//! - `layout`: on-disk directory layout of a volume root

pub mod errors;
pub mod layout;

pub use errors::{VolumeError, VolumeResult};
