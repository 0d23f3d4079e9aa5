//! Cross-platform process spawning on top of the native spawn facilities.
//!
//! Child processes are started with `posix_spawn(3)` on Unix-like systems
//! and with `CreateProcessW` on Windows. Exactly one backend is compiled
//! into a given binary; the selection is probed once and stays fixed for
//! the life of the process.
//!
//! This crate only starts processes. Waiting, signaling, and reaping belong
//! to the caller, via the returned identifier.

pub mod capability;
pub mod cli;
pub mod error;
pub mod spawn;

pub use capability::{have_create_process, have_posix_spawn, supported};
pub use error::{Result, SpawnError};
pub use spawn::{spawn, spawnp, SpawnedProcess};
