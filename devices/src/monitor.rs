//! # Monitor Options
//!
//! Only the switches that *request* a monitor live here; talking to it is not
//! this crate's business.
//!
//! [`Monitor`] carries the one cross-property rule of the device layer: the
//! `pretty` flag only applies to the machine-readable `control` mode, so a
//! `readline` monitor with `pretty` set fails to compile.

use std::path::Path;

use qcmd_common::{CmdOption, Entity, OptionEnum, QcmdError, ValidationError, Value};

use crate::facade;

/// `-chardev <backend>,id=..[,...]`
#[derive(Debug, Clone)]
pub struct Chardev {
    entity: Entity,
}

impl Chardev {
    fn new(backend: &str, id: impl Into<String>) -> Self {
        let mut entity = Entity::new("chardev", backend);
        entity.set_property("id", id.into());
        Self { entity }
    }

    /// A unix socket the hypervisor listens on without waiting for a client.
    pub fn socket(id: impl Into<String>, path: &Path) -> Self {
        let mut chardev = Self::new("socket", id);
        chardev
            .entity
            .set_property("path", path)
            .set_property("server", true)
            .set_property("wait", false);
        chardev
    }

    pub fn stdio(id: impl Into<String>) -> Self {
        Self::new("stdio", id)
    }

    pub fn pty(id: impl Into<String>) -> Self {
        Self::new("pty", id)
    }

    pub fn server(mut self, server: bool) -> Self {
        self.entity.set_property("server", server);
        self
    }

    pub fn wait(mut self, wait: bool) -> Self {
        self.entity.set_property("wait", wait);
        self
    }

    pub fn logfile(mut self, path: &Path) -> Self {
        self.entity.set_property("logfile", path);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorMode {
    /// The human-readable monitor.
    Readline,
    /// QMP, the machine-readable protocol.
    Control,
}

impl OptionEnum for MonitorMode {
    fn as_str(&self) -> &'static str {
        match self {
            MonitorMode::Readline => "readline",
            MonitorMode::Control => "control",
        }
    }
}

/// `-mon chardev=..[,mode=readline|control][,pretty=on|off]`
#[derive(Debug, Clone)]
pub struct Monitor {
    entity: Entity,
}

impl Monitor {
    pub fn new(chardev: impl Into<String>) -> Self {
        let mut entity = Entity::new("mon", "");
        entity
            .validate_with(pretty_requires_control)
            .set_property("chardev", chardev.into());
        Self { entity }
    }

    pub fn mode(mut self, mode: MonitorMode) -> Self {
        self.entity.set_property("mode", Value::Enum(mode.as_str()));
        self
    }

    /// Pretty-printed JSON; only valid with [`MonitorMode::Control`].
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.entity.set_property("pretty", pretty);
        self
    }
}

fn pretty_requires_control(option: &CmdOption) -> Result<(), QcmdError> {
    let table = option.as_table();
    let readline = table.get("mode").map(String::as_str) == Some(MonitorMode::Readline.as_str());

    if readline && table.contains_key("pretty") {
        return Err(ValidationError::IncompatibleProperties {
            flag: option.flag().to_string(),
            key: "pretty".to_string(),
            reason: "mode=readline".to_string(),
        }
        .into());
    }
    Ok(())
}

/// `-qmp <endpoint>,server=on,wait=off`
#[derive(Debug, Clone)]
pub struct Qmp {
    entity: Entity,
}

impl Qmp {
    fn new(endpoint: String) -> Self {
        let mut entity = Entity::new("qmp", endpoint);
        entity.set_property("server", true).set_property("wait", false);
        Self { entity }
    }

    pub fn unix(path: &Path) -> Self {
        Self::new(format!("unix:{}", path.display()))
    }

    pub fn tcp(host: &str, port: u16) -> Self {
        Self::new(format!("tcp:{host}:{port}"))
    }

    pub fn wait(mut self, wait: bool) -> Self {
        self.entity.set_property("wait", wait);
        self
    }
}

facade!(Chardev, Monitor, Qmp);

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
