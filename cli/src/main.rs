mod commands;
mod terminal;

use commands::{CommandLine, Commands, image, info, render, run};
use qcmd_common::config::Config;
use terminal::{logging, print};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose, commands.quiet);
    let cfg: Config = commands.config();

    print::banner(cfg.quiet);

    match commands.command {
        Commands::Info => {
            print::header("about the tool", cfg.quiet);
            info::info(&cfg);
            Ok(())
        }
        Commands::Render { vm } => {
            print::header("rendering command line", cfg.quiet);
            render::render(&vm, &cfg)
        }
        Commands::Run { vm } => {
            print::header("launching guest", cfg.quiet);
            run::run(&vm, &cfg).await
        }
        Commands::Img { action } => {
            print::header("disk image", cfg.quiet);
            image::image(action, &cfg).await
        }
    }
}
