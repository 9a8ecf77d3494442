//! # qcmd common
//!
//! The data model every other crate builds on:
//!
//! * **[`property`]**: typed `key=value` pairs and their single rendering rule.
//! * **[`option`]**: the frozen view of one switch, rendered to argument tokens.
//! * **[`entity`]**: the mutable builder that compiles into an option.
//! * **[`usable`]**: the traits the command compiler consumes.
//! * **[`error`]**: the construction / validation / composition taxonomy.

pub mod config;
pub mod disk;
pub mod entity;
pub mod error;
pub mod option;
pub mod property;
pub mod usable;

pub use disk::DiskFormat;
pub use entity::{Entity, Validator};
pub use error::{CompositionError, ConstructionError, QcmdError, ValidationError};
pub use option::CmdOption;
pub use property::{OptionEnum, Property, Value};
pub use usable::{Aggregate, Usable};
