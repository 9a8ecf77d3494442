use anyhow::Context;
use qcmd_common::config::Config;

use super::VmArgs;
use crate::terminal::print;

pub fn render(vm: &VmArgs, cfg: &Config) -> anyhow::Result<()> {
    let compiler = vm.compiler()?;
    let args: Vec<String> = compiler.args().context("failed to render the command line")?;

    print::command_line(&cfg.qemu_binary, &args, cfg.quiet);
    Ok(())
}
