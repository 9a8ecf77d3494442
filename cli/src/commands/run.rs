use anyhow::{Context, bail};
use qcmd_common::config::Config;
use qcmd_core::{ExitOutcome, ProcessLauncher};
use tracing::{info, warn};

use super::VmArgs;
use crate::terminal::print;

pub async fn run(vm: &VmArgs, cfg: &Config) -> anyhow::Result<()> {
    let compiler = vm.compiler()?;

    if cfg.dry_run {
        let args: Vec<String> = compiler.args().context("failed to render the command line")?;
        print::command_line(&cfg.qemu_binary, &args, cfg.quiet);
        warn!("Dry run, the hypervisor was not started");
        return Ok(());
    }

    let outcome: ExitOutcome = compiler
        .execute(&ProcessLauncher, &cfg.qemu_binary)
        .await
        .with_context(|| format!("failed to run {}", cfg.qemu_binary.display()))?;

    match outcome.code {
        Some(0) => info!("Guest exited cleanly"),
        Some(code) => bail!("{} exited with code {code}", cfg.qemu_binary.display()),
        None => bail!("{} was terminated by a signal", cfg.qemu_binary.display()),
    }
    Ok(())
}
