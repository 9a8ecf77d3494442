//! Seams between the data model and the command compiler.

use crate::entity::Entity;
use crate::error::QcmdError;
use crate::option::CmdOption;

/// Anything that compiles to exactly one [`CmdOption`].
pub trait Usable {
    fn to_option(&self) -> Result<CmdOption, QcmdError>;
}

/// A coordinated group of entities that flattens to several options at once.
pub trait Aggregate {
    /// Returns every constituent option in registration order.
    fn flatten(&self) -> Result<Vec<CmdOption>, QcmdError>;
}

impl Usable for Entity {
    fn to_option(&self) -> Result<CmdOption, QcmdError> {
        self.compile()
    }
}

impl Usable for CmdOption {
    fn to_option(&self) -> Result<CmdOption, QcmdError> {
        Ok(self.clone())
    }
}

impl<U: Usable + ?Sized> Usable for Box<U> {
    fn to_option(&self) -> Result<CmdOption, QcmdError> {
        (**self).to_option()
    }
}
