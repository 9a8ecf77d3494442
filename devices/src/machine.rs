//! Machine-wide switches: memory, CPUs, machine type and direct kernel boot.

use std::path::Path;

use qcmd_common::{Entity, OptionEnum, Value};

use crate::facade;

/// `-m <size>[,slots=N,maxmem=SIZE]`
#[derive(Debug, Clone)]
pub struct Memory {
    entity: Entity,
}

impl Memory {
    /// `size` uses the hypervisor's suffixes, e.g. `512M` or `3G`.
    pub fn new(size: impl Into<String>) -> Self {
        Self {
            entity: Entity::new("m", size),
        }
    }

    pub fn slots(mut self, slots: u32) -> Self {
        self.entity.set_property("slots", slots);
        self
    }

    pub fn maxmem(mut self, size: impl Into<String>) -> Self {
        self.entity.set_property("maxmem", size.into());
        self
    }
}

/// `-smp <cpus>[,sockets=..,dies=..,cores=..,threads=..,maxcpus=..]`
#[derive(Debug, Clone)]
pub struct Smp {
    entity: Entity,
}

impl Smp {
    pub fn new(cpus: u32) -> Self {
        Self {
            entity: Entity::new("smp", cpus.to_string()),
        }
    }

    pub fn sockets(mut self, n: u32) -> Self {
        self.entity.set_property("sockets", n);
        self
    }

    pub fn dies(mut self, n: u32) -> Self {
        self.entity.set_property("dies", n);
        self
    }

    pub fn cores(mut self, n: u32) -> Self {
        self.entity.set_property("cores", n);
        self
    }

    pub fn threads(mut self, n: u32) -> Self {
        self.entity.set_property("threads", n);
        self
    }

    pub fn maxcpus(mut self, n: u32) -> Self {
        self.entity.set_property("maxcpus", n);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accel {
    Kvm,
    Tcg,
    Hvf,
    Whpx,
}

impl OptionEnum for Accel {
    fn as_str(&self) -> &'static str {
        match self {
            Accel::Kvm => "kvm",
            Accel::Tcg => "tcg",
            Accel::Hvf => "hvf",
            Accel::Whpx => "whpx",
        }
    }
}

/// `-machine <type>[,accel=..,hmat=on,...]`
#[derive(Debug, Clone)]
pub struct Machine {
    entity: Entity,
}

impl Machine {
    pub fn new(machine_type: impl Into<String>) -> Self {
        Self {
            entity: Entity::new("machine", machine_type),
        }
    }

    pub fn accel(mut self, accel: Accel) -> Self {
        self.entity.set_property("accel", Value::Enum(accel.as_str()));
        self
    }

    /// Required by the hypervisor before any `hmat-lb`/`hmat-cache` NUMA entry.
    pub fn hmat(mut self, enabled: bool) -> Self {
        self.entity.set_property("hmat", enabled);
        self
    }

    pub fn smm(mut self, enabled: bool) -> Self {
        self.entity.set_property("smm", enabled);
        self
    }

    /// Backs guest RAM with a memory backend object.
    pub fn memory_backend(mut self, id: impl Into<String>) -> Self {
        self.entity.set_property("memory-backend", id.into());
        self
    }
}

/// `-cpu <model>[,feature=on|off...]`
#[derive(Debug, Clone)]
pub struct Cpu {
    entity: Entity,
}

impl Cpu {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            entity: Entity::new("cpu", model),
        }
    }

    pub fn host() -> Self {
        Self::new("host")
    }

    pub fn feature(mut self, name: &str, enabled: bool) -> Self {
        self.entity.set_property(name, enabled);
        self
    }
}

facade!(Memory, Smp, Machine, Cpu);

/// `-kernel <path>`
pub fn kernel(path: &Path) -> Entity {
    Entity::raw("kernel", path.to_string_lossy())
}

/// `-initrd <path>`
pub fn initrd(path: &Path) -> Entity {
    Entity::raw("initrd", path.to_string_lossy())
}

/// `-append <cmdline>`, the kernel command line passed as one token.
pub fn append(cmdline: impl Into<String>) -> Entity {
    Entity::raw("append", cmdline)
}

/// A switch without arguments such as `nographic` or `enable-kvm`.
pub fn switch(flag: impl Into<String>) -> Entity {
    Entity::flag_only(flag)
}
