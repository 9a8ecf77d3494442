use std::path::Path;

use qcmd_common::{Entity, OptionEnum};

use crate::facade;

/// `-tpmdev emulator,id=..,chardev=..` or `-tpmdev passthrough,id=..[,path=..]`
#[derive(Debug, Clone)]
pub struct Tpmdev {
    entity: Entity,
}

impl Tpmdev {
    /// A software TPM (swtpm) reachable through `chardev`.
    pub fn emulator(id: impl Into<String>, chardev: impl Into<String>) -> Self {
        let mut entity = Entity::new("tpmdev", "emulator");
        entity.set_property("id", id.into()).set_property("chardev", chardev.into());
        Self { entity }
    }

    /// The host TPM.
    pub fn passthrough(id: impl Into<String>) -> Self {
        let mut entity = Entity::new("tpmdev", "passthrough");
        entity.set_property("id", id.into());
        Self { entity }
    }

    pub fn path(mut self, path: &Path) -> Self {
        self.entity.set_property("path", path);
        self
    }

    pub fn cancel_path(mut self, path: &Path) -> Self {
        self.entity.set_property("cancel-path", path);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TpmModel {
    Tis,
    Crb,
    Spapr,
}

impl OptionEnum for TpmModel {
    fn as_str(&self) -> &'static str {
        match self {
            TpmModel::Tis => "tpm-tis",
            TpmModel::Crb => "tpm-crb",
            TpmModel::Spapr => "tpm-spapr",
        }
    }
}

/// `-device tpm-tis|tpm-crb,tpmdev=..`
#[derive(Debug, Clone)]
pub struct TpmDevice {
    entity: Entity,
}

impl TpmDevice {
    pub fn new(model: TpmModel, tpmdev: impl Into<String>) -> Self {
        let mut entity = Entity::new("device", model.as_str());
        entity.set_property("tpmdev", tpmdev.into());
        Self { entity }
    }
}

facade!(Tpmdev, TpmDevice);

#[cfg(test)]
mod tests {
    use super::*;
    use qcmd_common::Usable;

    #[test]
    fn swtpm_emulator() {
        let tpm = Tpmdev::emulator("tpm0", "chrtpm");
        let device = TpmDevice::new(TpmModel::Tis, "tpm0");

        assert_eq!(
            tpm.to_option().unwrap().render_string(),
            "-tpmdev emulator,id=tpm0,chardev=chrtpm"
        );
        assert_eq!(device.to_option().unwrap().render_string(), "-device tpm-tis,tpmdev=tpm0");
    }

    #[test]
    fn host_passthrough() {
        let tpm = Tpmdev::passthrough("tpm0").path(Path::new("/dev/tpm0"));
        assert_eq!(
            tpm.to_option().unwrap().render_string(),
            "-tpmdev passthrough,id=tpm0,path=/dev/tpm0"
        );
    }
}
