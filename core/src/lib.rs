//! # qcmd core
//!
//! Turns registered entities into a hypervisor command line and, optionally,
//! runs it.
//!
//! * **[`compiler`]**: ordered registration and rendering of the argument vector.
//! * **[`numa`]**: the NUMA topology aggregate and its cross-entry rules.
//! * **[`launcher`]**: spawning the hypervisor (or any other tool) as a child process.
//! * **[`image`]**: disk image creation through the external image tool.

pub mod compiler;
pub mod image;
pub mod launcher;
pub mod numa;

pub use compiler::{Compiler, ExecuteError};
pub use launcher::{ExitOutcome, LaunchError, Launcher, ProcessLauncher};
