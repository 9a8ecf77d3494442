//! # qcmd devices
//!
//! Typed facades over [`Entity`](qcmd_common::Entity). Each facade owns exactly
//! one entity and only translates typed setters into property calls, so every
//! rendering and validation rule lives in `qcmd-common`.
//!
//! Facades are consumed by value (`Drive::new().file(..).format(..)`) and
//! registered with the compiler like any other [`Usable`](qcmd_common::Usable).

/// Implements `Usable` and entity access for facades with an `entity` field.
macro_rules! facade {
    ($($facade:ty),* $(,)?) => {
        $(
            impl qcmd_common::Usable for $facade {
                fn to_option(&self) -> Result<qcmd_common::CmdOption, qcmd_common::QcmdError> {
                    self.entity.compile()
                }
            }

            impl $facade {
                pub fn entity(&self) -> &qcmd_common::Entity {
                    &self.entity
                }

                /// Escape hatch for properties without a typed setter.
                pub fn entity_mut(&mut self) -> &mut qcmd_common::Entity {
                    &mut self.entity
                }

                pub fn into_entity(self) -> qcmd_common::Entity {
                    self.entity
                }
            }
        )*
    };
}

pub(crate) use facade;

pub mod audio;
pub mod block;
pub mod device;
pub mod display;
pub mod machine;
pub mod monitor;
pub mod net;
pub mod object;
pub mod tpm;
