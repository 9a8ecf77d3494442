//! The top-level **command compiler**.
//!
//! A [`Compiler`] collects everything that should appear on one hypervisor
//! command line and renders it, in registration order, into the final argument
//! vector. Rendering is pure: calling [`Compiler::args`] twice on the same state
//! yields the same vector and nothing is cached between calls.
//!
//! **Architectural Note:**
//! The compiler only knows about the [`Usable`] and [`Aggregate`] seams. Device
//! facades, raw entities and pre-built options are all registered the same way,
//! so the compiler never grows device-specific knowledge.

use std::path::Path;

use qcmd_common::{Aggregate, CmdOption, QcmdError, Usable};
use thiserror::Error;
use tracing::{debug, info, trace};

use crate::launcher::{ExitOutcome, LaunchError, Launcher};

#[derive(Debug, Error)]
pub enum ExecuteError {
    #[error(transparent)]
    Compile(#[from] QcmdError),
    #[error(transparent)]
    Launch(#[from] LaunchError),
}

type BoxedUsable = Box<dyn Usable + Send + Sync>;

#[derive(Default)]
pub struct Compiler {
    usables: Vec<BoxedUsable>,
}

impl Compiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one usable after everything registered so far.
    pub fn add<U>(&mut self, usable: U) -> &mut Self
    where
        U: Usable + Send + Sync + 'static,
    {
        self.usables.push(Box::new(usable));
        self
    }

    pub fn add_all<I, U>(&mut self, usables: I) -> &mut Self
    where
        I: IntoIterator<Item = U>,
        U: Usable + Send + Sync + 'static,
    {
        for usable in usables {
            self.add(usable);
        }
        self
    }

    /// Flattens `aggregate` now and registers its options in order.
    ///
    /// On error nothing is registered.
    pub fn add_aggregate<A: Aggregate + ?Sized>(&mut self, aggregate: &A) -> Result<&mut Self, QcmdError> {
        let options: Vec<CmdOption> = aggregate.flatten()?;
        debug!(count = options.len(), "registering flattened aggregate");
        Ok(self.add_all(options))
    }

    /// Replaces the whole registration list with `usables`.
    pub fn set_options<I, U>(&mut self, usables: I) -> &mut Self
    where
        I: IntoIterator<Item = U>,
        U: Usable + Send + Sync + 'static,
    {
        self.usables.clear();
        self.add_all(usables)
    }

    pub fn len(&self) -> usize {
        self.usables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.usables.is_empty()
    }

    /// Compiles every registered usable, in registration order.
    pub fn options(&self) -> Result<Vec<CmdOption>, QcmdError> {
        self.usables.iter().map(|usable| usable.to_option()).collect()
    }

    /// The full hypervisor argument vector.
    pub fn args(&self) -> Result<Vec<String>, QcmdError> {
        let mut args: Vec<String> = Vec::new();

        for usable in &self.usables {
            let option: CmdOption = usable.to_option()?;
            trace!(option = %option, "rendering");
            args.extend(option.render());
        }

        debug!(options = self.usables.len(), tokens = args.len(), "rendered command line");
        Ok(args)
    }

    /// [`args`](Self::args) joined with single spaces.
    pub fn args_string(&self) -> Result<String, QcmdError> {
        Ok(self.args()?.join(" "))
    }

    /// Renders the argument vector once and hands it to `launcher`.
    pub async fn execute(&self, launcher: &dyn Launcher, program: &Path) -> Result<ExitOutcome, ExecuteError> {
        let args: Vec<String> = self.args()?;
        info!("Launching {} with {} arguments", program.display(), args.len());
        Ok(launcher.launch(program, &args).await?)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
