use std::fmt;
use std::str::FromStr;

use crate::property::{OptionEnum, Value};

/// Disk image formats understood by both `-drive format=` and the image tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DiskFormat {
    Raw,
    #[default]
    Qcow2,
    Vmdk,
    Vdi,
    Vhdx,
}

impl OptionEnum for DiskFormat {
    fn as_str(&self) -> &'static str {
        match self {
            DiskFormat::Raw => "raw",
            DiskFormat::Qcow2 => "qcow2",
            DiskFormat::Vmdk => "vmdk",
            DiskFormat::Vdi => "vdi",
            DiskFormat::Vhdx => "vhdx",
        }
    }
}

impl From<DiskFormat> for Value {
    fn from(format: DiskFormat) -> Self {
        Value::Enum(format.as_str())
    }
}

impl fmt::Display for DiskFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiskFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "raw" | "img" => Ok(DiskFormat::Raw),
            "qcow2" => Ok(DiskFormat::Qcow2),
            "vmdk" => Ok(DiskFormat::Vmdk),
            "vdi" => Ok(DiskFormat::Vdi),
            "vhdx" => Ok(DiskFormat::Vhdx),
            _ => Err(format!("unknown disk format: {s}")),
        }
    }
}
