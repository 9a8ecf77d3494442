//! The generic `-device <driver>[,prop=value...]` switch, for drivers without
//! a dedicated facade.

use qcmd_common::{Entity, Value};

use crate::facade;

#[derive(Debug, Clone)]
pub struct Device {
    entity: Entity,
}

impl Device {
    pub fn new(driver: impl Into<String>) -> Self {
        Self {
            entity: Entity::new("device", driver),
        }
    }

    pub fn driver(&self) -> &str {
        self.entity.name()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.entity.set_property("id", id.into());
        self
    }

    pub fn bus(mut self, bus: impl Into<String>) -> Self {
        self.entity.set_property("bus", bus.into());
        self
    }

    pub fn prop(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.entity.set_property(key, value);
        self
    }
}

facade!(Device);

/// `virtio-rng-pci` fed by a `rng-random` object.
pub fn virtio_rng(rng: impl Into<String>) -> Device {
    Device::new("virtio-rng-pci").prop("rng", rng.into())
}
