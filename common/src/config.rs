use std::env;
use std::path::PathBuf;

pub const DEFAULT_QEMU_BINARY: &str = "qemu-system-x86_64";
pub const DEFAULT_IMG_BINARY: &str = "qemu-img";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Hypervisor executable handed to the launcher.
    pub qemu_binary: PathBuf,
    /// Image tool used for disk creation.
    pub img_binary: PathBuf,
    /// Render and print the command line without launching anything.
    pub dry_run: bool,
    /// 0 prints everything, 1 hides headers, 2 prints the bare argument vector.
    pub quiet: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            qemu_binary: PathBuf::from(DEFAULT_QEMU_BINARY),
            img_binary: PathBuf::from(DEFAULT_IMG_BINARY),
            dry_run: false,
            quiet: 0,
        }
    }
}

impl Config {
    /// Defaults, with `QCMD_QEMU` and `QCMD_QEMU_IMG` overriding the binaries.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        if let Some(qemu) = lookup("QCMD_QEMU").filter(|v| !v.is_empty()) {
            cfg.qemu_binary = PathBuf::from(qemu);
        }
        if let Some(img) = lookup("QCMD_QEMU_IMG").filter(|v| !v.is_empty()) {
            cfg.img_binary = PathBuf::from(img);
        }
        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_overrides_binaries() {
        let cfg = Config::from_lookup(|key| match key {
            "QCMD_QEMU" => Some("/opt/qemu/bin/qemu-system-aarch64".into()),
            "QCMD_QEMU_IMG" => Some(String::new()),
            _ => None,
        });

        assert_eq!(cfg.qemu_binary, PathBuf::from("/opt/qemu/bin/qemu-system-aarch64"));
        assert_eq!(cfg.img_binary, PathBuf::from(DEFAULT_IMG_BINARY));
        assert!(!cfg.dry_run);
    }
}
