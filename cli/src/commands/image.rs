use anyhow::Context;
use qcmd_common::config::Config;
use qcmd_core::ProcessLauncher;
use qcmd_core::image::{self, ImageConfig};
use tracing::warn;

use super::ImageAction;
use crate::terminal::print;

pub async fn image(action: ImageAction, cfg: &Config) -> anyhow::Result<()> {
    match action {
        ImageAction::Create {
            path,
            size,
            format,
            overwrite,
        } => {
            let config = ImageConfig::new(path, size).format(format).overwrite(overwrite);

            if cfg.dry_run {
                print::command_line(&cfg.img_binary, &config.args(), cfg.quiet);
                warn!("Dry run, no image was created");
                return Ok(());
            }

            image::create_image(&config, &ProcessLauncher, &cfg.img_binary)
                .await
                .with_context(|| format!("could not create {}", config.path.display()))
        }
    }
}
