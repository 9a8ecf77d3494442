//! # Disk Image Creation
//!
//! Thin wrapper around the external image tool (`qemu-img create`). The
//! argument vector is built here; spawning goes through the same [`Launcher`]
//! the hypervisor uses.

use std::path::{Path, PathBuf};

use qcmd_common::{DiskFormat, OptionEnum};
use thiserror::Error;
use tracing::info;

use crate::launcher::{ExitOutcome, LaunchError, Launcher};

const SIZE_SUFFIXES: &[char] = &['k', 'K', 'M', 'G', 'T', 'P', 'E'];

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("{} already exists, pass overwrite to replace it", .0.display())]
    Exists(PathBuf),
    #[error("invalid image size '{0}': expected a number with an optional k/M/G/T/P/E suffix")]
    InvalidSize(String),
    #[error(transparent)]
    Launch(#[from] LaunchError),
    #[error("image tool failed for {} (exit code {code:?})", path.display())]
    Failed { path: PathBuf, code: Option<i32> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageConfig {
    pub format: DiskFormat,
    pub path: PathBuf,
    pub size: String,
    pub overwrite: bool,
}

impl ImageConfig {
    pub fn new(path: impl Into<PathBuf>, size: impl Into<String>) -> Self {
        Self {
            format: DiskFormat::default(),
            path: path.into(),
            size: size.into(),
            overwrite: false,
        }
    }

    pub fn format(mut self, format: DiskFormat) -> Self {
        self.format = format;
        self
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Arguments for the image tool: `create -f <format> <path> <size>`.
    pub fn args(&self) -> Vec<String> {
        vec![
            "create".to_string(),
            "-f".to_string(),
            self.format.as_str().to_string(),
            self.path.to_string_lossy().into_owned(),
            self.size.clone(),
        ]
    }

    fn validate(&self) -> Result<(), ImageError> {
        if !is_valid_size(&self.size) {
            return Err(ImageError::InvalidSize(self.size.clone()));
        }
        if self.path.exists() && !self.overwrite {
            return Err(ImageError::Exists(self.path.clone()));
        }
        Ok(())
    }
}

/// Creates the image described by `config` using `img_binary`.
pub async fn create_image(
    config: &ImageConfig,
    launcher: &dyn Launcher,
    img_binary: &Path,
) -> Result<(), ImageError> {
    config.validate()?;

    let outcome: ExitOutcome = launcher.launch(img_binary, &config.args()).await?;
    if !outcome.success() {
        return Err(ImageError::Failed {
            path: config.path.clone(),
            code: outcome.code,
        });
    }

    info!("Created {} image at {}", config.format, config.path.display());
    Ok(())
}

fn is_valid_size(size: &str) -> bool {
    let digits: &str = size.strip_suffix(SIZE_SUFFIXES).unwrap_or(size);
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use crate::launcher::testing::RecordingLauncher;

    #[test]
    fn builds_create_arguments() {
        let cfg = ImageConfig::new("/tmp/disk.img", "10G").format(DiskFormat::Raw);
        assert_eq!(cfg.args(), vec!["create", "-f", "raw", "/tmp/disk.img", "10G"]);
    }

    #[test]
    fn size_validation() {
        assert!(is_valid_size("10G"));
        assert!(is_valid_size("512M"));
        assert!(is_valid_size("1048576"));
        assert!(!is_valid_size(""));
        assert!(!is_valid_size("G"));
        assert!(!is_valid_size("10GB"));
        assert!(!is_valid_size("ten"));
    }

    #[tokio::test]
    async fn refuses_existing_file_without_overwrite() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let cfg = ImageConfig::new(file.path(), "1G");
        let launcher = RecordingLauncher::exiting_with(0);

        let result = create_image(&cfg, &launcher, Path::new("qemu-img")).await;

        assert!(matches!(result, Err(ImageError::Exists(_))));
        assert!(launcher.calls().is_empty());
    }

    #[tokio::test]
    async fn overwrites_when_asked() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let cfg = ImageConfig::new(file.path(), "1G").overwrite(true);
        let launcher = RecordingLauncher::exiting_with(0);

        create_image(&cfg, &launcher, Path::new("qemu-img")).await.unwrap();

        let calls = launcher.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, PathBuf::from("qemu-img"));
        assert_eq!(calls[0].1[..3], ["create", "-f", "qcow2"]);
    }

    #[tokio::test]
    async fn reports_tool_failure() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = ImageConfig::new(dir.path().join("new.qcow2"), "2G");
        let launcher = RecordingLauncher::exiting_with(1);

        let result = create_image(&cfg, &launcher, Path::new("qemu-img")).await;

        assert!(matches!(result, Err(ImageError::Failed { code: Some(1), .. })));
    }
}
