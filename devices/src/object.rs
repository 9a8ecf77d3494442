//! # Objects
//!
//! `-object` creates backend objects referenced by id from other switches,
//! most often memory backends bound to NUMA nodes through `memdev=`.

use std::path::Path;

use qcmd_common::{CmdOption, Entity, OptionEnum, QcmdError, ValidationError, Value};

use crate::facade;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostMemPolicy {
    Default,
    Preferred,
    Bind,
    Interleave,
}

impl OptionEnum for HostMemPolicy {
    fn as_str(&self) -> &'static str {
        match self {
            HostMemPolicy::Default => "default",
            HostMemPolicy::Preferred => "preferred",
            HostMemPolicy::Bind => "bind",
            HostMemPolicy::Interleave => "interleave",
        }
    }
}

/// `-object memory-backend-ram|memory-backend-file,id=..,size=..[,...]`
#[derive(Debug, Clone)]
pub struct MemoryBackend {
    entity: Entity,
}

impl MemoryBackend {
    fn new(kind: &str, id: impl Into<String>, size: impl Into<String>) -> Self {
        let mut entity = Entity::new("object", kind);
        entity
            .validate_with(host_nodes_ascend)
            .set_property("id", id.into())
            .set_property("size", size.into());
        Self { entity }
    }

    pub fn ram(id: impl Into<String>, size: impl Into<String>) -> Self {
        Self::new("memory-backend-ram", id, size)
    }

    /// File-backed memory, e.g. on hugetlbfs.
    pub fn file(id: impl Into<String>, size: impl Into<String>, path: &Path) -> Self {
        let mut backend = Self::new("memory-backend-file", id, size);
        backend.entity.set_property("mem-path", path);
        backend
    }

    pub fn share(mut self, shared: bool) -> Self {
        self.entity.set_property("share", shared);
        self
    }

    pub fn prealloc(mut self, prealloc: bool) -> Self {
        self.entity.set_property("prealloc", prealloc);
        self
    }

    /// Host NUMA nodes the memory is allocated from, `first..=last`.
    /// A descending range is reported when the backend is compiled.
    pub fn host_nodes(mut self, first: u32, last: u32) -> Self {
        let nodes = if first == last {
            first.to_string()
        } else {
            format!("{first}-{last}")
        };
        self.entity.set_property("host-nodes", nodes);
        self
    }

    pub fn policy(mut self, policy: HostMemPolicy) -> Self {
        self.entity.set_property("policy", Value::Enum(policy.as_str()));
        self
    }

    pub fn id(&self) -> Option<&Value> {
        self.entity.property("id").map(|p| p.value())
    }
}

fn host_nodes_ascend(option: &CmdOption) -> Result<(), QcmdError> {
    let table = option.as_table();
    let Some((first, last)) = table.get("host-nodes").and_then(|nodes| nodes.split_once('-')) else {
        return Ok(());
    };

    match (first.parse::<u32>(), last.parse::<u32>()) {
        (Ok(start), Ok(end)) if start > end => Err(ValidationError::InvalidCpuRange { start, end }.into()),
        _ => Ok(()),
    }
}

/// `-object rng-random,id=..,filename=..`, the host side of `virtio-rng`.
#[derive(Debug, Clone)]
pub struct RngRandom {
    entity: Entity,
}

impl RngRandom {
    pub fn new(id: impl Into<String>) -> Self {
        let mut entity = Entity::new("object", "rng-random");
        entity
            .set_property("id", id.into())
            .set_property("filename", "/dev/urandom");
        Self { entity }
    }

    pub fn filename(mut self, path: &Path) -> Self {
        self.entity.set_property("filename", path);
        self
    }
}

facade!(MemoryBackend, RngRandom);
