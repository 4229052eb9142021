//! Filesystem utilities for host-side operations.
//!
//! Directory creation with explicit ownership, used when materializing
//! volume roots and data directories.

mod ownership;

pub use ownership::{IdPair, create_dir_all_owned};
