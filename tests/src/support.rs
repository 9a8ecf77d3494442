use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use qcmd_core::{ExitOutcome, LaunchError, Launcher};

/// A launcher that records every invocation instead of spawning anything.
pub struct MockLauncher {
    code: i32,
    calls: Mutex<Vec<(PathBuf, Vec<String>)>>,
}

impl MockLauncher {
    pub fn exiting_with(code: i32) -> Self {
        Self {
            code,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(PathBuf, Vec<String>)> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Launcher for MockLauncher {
    async fn launch(&self, program: &Path, args: &[String]) -> Result<ExitOutcome, LaunchError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((program.to_path_buf(), args.to_vec()));
        }
        Ok(ExitOutcome { code: Some(self.code) })
    }
}

/// Owned argument vector from string literals.
pub fn argv(args: &[&str]) -> Vec<String> {
    args.iter().map(|arg| arg.to_string()).collect()
}
