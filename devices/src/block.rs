use std::path::Path;

use qcmd_common::{DiskFormat, Entity, OptionEnum, Value};

use crate::facade;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveInterface {
    Ide,
    Scsi,
    Sd,
    Mtd,
    Floppy,
    Pflash,
    Virtio,
    None,
}

impl OptionEnum for DriveInterface {
    fn as_str(&self) -> &'static str {
        match self {
            DriveInterface::Ide => "ide",
            DriveInterface::Scsi => "scsi",
            DriveInterface::Sd => "sd",
            DriveInterface::Mtd => "mtd",
            DriveInterface::Floppy => "floppy",
            DriveInterface::Pflash => "pflash",
            DriveInterface::Virtio => "virtio",
            DriveInterface::None => "none",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Media {
    Disk,
    Cdrom,
}

impl OptionEnum for Media {
    fn as_str(&self) -> &'static str {
        match self {
            Media::Disk => "disk",
            Media::Cdrom => "cdrom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheMode {
    None,
    Writeback,
    Writethrough,
    Directsync,
    Unsafe,
}

impl OptionEnum for CacheMode {
    fn as_str(&self) -> &'static str {
        match self {
            CacheMode::None => "none",
            CacheMode::Writeback => "writeback",
            CacheMode::Writethrough => "writethrough",
            CacheMode::Directsync => "directsync",
            CacheMode::Unsafe => "unsafe",
        }
    }
}

/// `-drive file=..,format=..,if=..[,...]`
#[derive(Debug, Clone)]
pub struct Drive {
    entity: Entity,
}

impl Default for Drive {
    fn default() -> Self {
        Self::new()
    }
}

impl Drive {
    pub fn new() -> Self {
        Self {
            entity: Entity::new("drive", ""),
        }
    }

    pub fn file(mut self, path: &Path) -> Self {
        self.entity.set_property("file", path);
        self
    }

    pub fn format(mut self, format: DiskFormat) -> Self {
        self.entity.set_property("format", format);
        self
    }

    pub fn interface(mut self, interface: DriveInterface) -> Self {
        self.entity.set_property("if", Value::Enum(interface.as_str()));
        self
    }

    pub fn media(mut self, media: Media) -> Self {
        self.entity.set_property("media", Value::Enum(media.as_str()));
        self
    }

    pub fn cache(mut self, cache: CacheMode) -> Self {
        self.entity.set_property("cache", Value::Enum(cache.as_str()));
        self
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.entity.set_property("id", id.into());
        self
    }

    pub fn index(mut self, index: u32) -> Self {
        self.entity.set_property("index", index);
        self
    }

    pub fn readonly(mut self, readonly: bool) -> Self {
        self.entity.set_property("readonly", readonly);
        self
    }

    pub fn snapshot(mut self, snapshot: bool) -> Self {
        self.entity.set_property("snapshot", snapshot);
        self
    }
}

facade!(Drive);
