pub mod image;
pub mod info;
pub mod render;
pub mod run;
pub mod vm;

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use qcmd_common::DiskFormat;
use qcmd_common::config::Config;
use qcmd_devices::machine::Accel;
use qcmd_devices::net::MacAddr;

use vm::NumaArg;

#[derive(Parser)]
#[command(name = "qcmd")]
#[command(about = "Builds and runs QEMU command lines from typed options.")]
#[command(version)]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Reduce output (-q hides headers, -qq prints only the command)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub quiet: u8,

    /// Hypervisor binary, overrides QCMD_QEMU
    #[arg(long, global = true, value_name = "PATH")]
    pub qemu: Option<PathBuf>,

    /// Image tool binary, overrides QCMD_QEMU_IMG
    #[arg(long, global = true, value_name = "PATH")]
    pub qemu_img: Option<PathBuf>,

    /// Print what would be executed without launching anything
    #[arg(long, global = true)]
    pub dry_run: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the tool version and the supported option families
    Info,
    /// Print the command line for a virtual machine
    #[command(alias = "r")]
    Render {
        #[command(flatten)]
        vm: VmArgs,
    },
    /// Build the command line and launch the hypervisor
    #[command(alias = "x")]
    Run {
        #[command(flatten)]
        vm: VmArgs,
    },
    /// Manage disk images
    #[command(alias = "i")]
    Img {
        #[command(subcommand)]
        action: ImageAction,
    },
}

#[derive(Subcommand)]
pub enum ImageAction {
    /// Create a new disk image
    #[command(alias = "c")]
    Create {
        path: PathBuf,
        /// Size with an optional k/M/G/T suffix, e.g. 20G
        size: String,
        #[arg(short, long, default_value = "qcow2")]
        format: DiskFormat,
        /// Replace an existing file
        #[arg(long)]
        overwrite: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct VmArgs {
    /// Guest memory, e.g. 512M or 3G
    #[arg(short, long, default_value = "1G")]
    pub memory: String,

    /// Number of virtual CPUs
    #[arg(long, default_value_t = 1)]
    pub smp: u32,

    /// Machine type, e.g. q35
    #[arg(long)]
    pub machine: Option<String>,

    #[arg(long, value_enum)]
    pub accel: Option<AccelArg>,

    /// CPU model, e.g. host
    #[arg(long)]
    pub cpu: Option<String>,

    /// Disk image attached as a virtio drive; may be repeated
    #[arg(short, long, value_name = "PATH")]
    pub drive: Vec<PathBuf>,

    /// Format for drives whose extension does not name one
    #[arg(long, default_value = "qcow2")]
    pub drive_format: DiskFormat,

    /// ISO attached as a read-only cdrom
    #[arg(long, value_name = "PATH")]
    pub cdrom: Option<PathBuf>,

    /// Add a user-mode network interface
    #[arg(long)]
    pub net: bool,

    /// Port forward for user networking, e.g. tcp::2222-:22; implies --net
    #[arg(long, value_name = "RULE")]
    pub hostfwd: Vec<String>,

    #[arg(long, default_value = "virtio-net-pci")]
    pub nic_model: String,

    #[arg(long)]
    pub mac: Option<MacAddr>,

    /// Unix socket for a QMP monitor
    #[arg(long, value_name = "PATH")]
    pub qmp: Option<PathBuf>,

    /// NUMA node as CPUS[:SIZE], e.g. 0-1:2G; one node per occurrence
    #[arg(long, value_name = "CPUS[:SIZE]")]
    pub numa: Vec<NumaArg>,

    #[arg(long)]
    pub kernel: Option<PathBuf>,

    #[arg(long, requires = "kernel")]
    pub initrd: Option<PathBuf>,

    /// Kernel command line
    #[arg(long, requires = "kernel")]
    pub append: Option<String>,

    /// VNC display number
    #[arg(long, conflicts_with = "nographic")]
    pub vnc: Option<u16>,

    /// Disable graphical output and use the serial console
    #[arg(long)]
    pub nographic: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccelArg {
    Kvm,
    Tcg,
    Hvf,
    Whpx,
}

impl From<AccelArg> for Accel {
    fn from(value: AccelArg) -> Self {
        match value {
            AccelArg::Kvm => Accel::Kvm,
            AccelArg::Tcg => Accel::Tcg,
            AccelArg::Hvf => Accel::Hvf,
            AccelArg::Whpx => Accel::Whpx,
        }
    }
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Environment defaults overridden by command-line flags.
    pub fn config(&self) -> Config {
        let mut cfg = Config::from_env();
        if let Some(qemu) = &self.qemu {
            cfg.qemu_binary = qemu.clone();
        }
        if let Some(img) = &self.qemu_img {
            cfg.img_binary = img.clone();
        }
        cfg.dry_run = self.dry_run;
        cfg.quiet = self.quiet;
        cfg
    }
}
