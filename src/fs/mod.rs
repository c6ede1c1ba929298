//! Filesystem utilities for run artifacts.
//!
//! Atomic writes keep every persisted record complete even if the process is
//! interrupted mid-write.

pub mod atomic;

pub use atomic::{atomic_write, atomic_write_file, remove_if_exists, write_durable};
