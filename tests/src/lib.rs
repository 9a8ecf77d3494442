//! Cross-crate scenarios: device facades registered with the compiler, NUMA
//! composition and execution through a mock launcher.

pub mod support;

mod command_line;
mod execution;
mod numa;
