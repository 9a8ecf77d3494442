//! # Network Backends and Devices
//!
//! * [`Netdev`]: a host-side backend (`-netdev user|tap|bridge,id=..`).
//! * [`NetDevice`]: the guest-side NIC attached to a backend (`-device <model>,netdev=..`).
//! * [`Nic`]: the `-nic` shortcut that combines both. It is derived from a
//!   [`Netdev`] by swapping the flag and dropping the backend `id`, so the
//!   backend setters are shared instead of duplicated.

use qcmd_common::{Entity, OptionEnum, Value};

use crate::facade;

pub use pnet::util::MacAddr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetBackend {
    User,
    Tap,
    Bridge,
}

impl OptionEnum for NetBackend {
    fn as_str(&self) -> &'static str {
        match self {
            NetBackend::User => "user",
            NetBackend::Tap => "tap",
            NetBackend::Bridge => "bridge",
        }
    }
}

/// `-netdev <backend>,id=<id>[,...]`
#[derive(Debug, Clone)]
pub struct Netdev {
    entity: Entity,
}

impl Netdev {
    pub fn new(backend: NetBackend, id: impl Into<String>) -> Self {
        let mut entity = Entity::new("netdev", backend.as_str());
        entity
            .repeatable("hostfwd")
            .repeatable("guestfwd")
            .repeatable("dnssearch")
            .set_property("id", id.into());
        Self { entity }
    }

    /// User-mode (slirp) networking.
    pub fn user(id: impl Into<String>) -> Self {
        Self::new(NetBackend::User, id)
    }

    pub fn tap(id: impl Into<String>) -> Self {
        Self::new(NetBackend::Tap, id)
    }

    pub fn bridge(id: impl Into<String>, bridge: impl Into<String>) -> Self {
        let mut netdev = Self::new(NetBackend::Bridge, id);
        netdev.entity.set_property("br", bridge.into());
        netdev
    }

    pub fn id(&self) -> Option<&Value> {
        self.entity.property("id").map(|p| p.value())
    }

    /// Guest network in CIDR form, e.g. `10.0.2.0/24`.
    pub fn net(mut self, cidr: impl Into<String>) -> Self {
        self.entity.set_property("net", cidr.into());
        self
    }

    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.entity.set_property("hostname", hostname.into());
        self
    }

    /// Port forward such as `tcp::2222-:22`. May be given several times.
    pub fn hostfwd(mut self, rule: impl Into<String>) -> Self {
        self.entity.set_property("hostfwd", rule.into());
        self
    }

    pub fn guestfwd(mut self, rule: impl Into<String>) -> Self {
        self.entity.set_property("guestfwd", rule.into());
        self
    }

    /// DNS search domain handed out over DHCP. May be given several times.
    pub fn dnssearch(mut self, domain: impl Into<String>) -> Self {
        self.entity.set_property("dnssearch", domain.into());
        self
    }

    pub fn restrict(mut self, restricted: bool) -> Self {
        self.entity.set_property("restrict", restricted);
        self
    }

    /// Host tap interface name.
    pub fn ifname(mut self, ifname: impl Into<String>) -> Self {
        self.entity.set_property("ifname", ifname.into());
        self
    }

    /// Tap setup script; `None` renders `script=no`.
    pub fn script(mut self, script: Option<&str>) -> Self {
        self.entity.set_property("script", script.unwrap_or("no"));
        self
    }

    pub fn downscript(mut self, script: Option<&str>) -> Self {
        self.entity.set_property("downscript", script.unwrap_or("no"));
        self
    }

    pub fn vhost(mut self, enabled: bool) -> Self {
        self.entity.set_property("vhost", enabled);
        self
    }

    /// Turns this backend into a `-nic` that also creates the guest device.
    pub fn into_nic(mut self, model: impl Into<String>) -> Nic {
        self.entity
            .set_option_flag("nic")
            .remove_property("id")
            .set_property("model", model.into());
        Nic {
            entity: self.entity,
        }
    }
}

/// `-nic <backend>[,...],model=<model>[,mac=..]`
#[derive(Debug, Clone)]
pub struct Nic {
    entity: Entity,
}

impl Nic {
    pub fn mac(mut self, mac: MacAddr) -> Self {
        self.entity.set_property("mac", mac_value(mac));
        self
    }
}

/// `-device <model>,netdev=<id>[,mac=..][,id=..]`
#[derive(Debug, Clone)]
pub struct NetDevice {
    entity: Entity,
}

impl NetDevice {
    /// `model` is the guest NIC driver, e.g. `e1000` or `virtio-net-pci`.
    pub fn new(model: impl Into<String>, netdev: impl Into<String>) -> Self {
        let mut entity = Entity::new("device", model);
        entity.set_property("netdev", netdev.into());
        Self { entity }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.entity.set_property("id", id.into());
        self
    }

    pub fn mac(mut self, mac: MacAddr) -> Self {
        self.entity.set_property("mac", mac_value(mac));
        self
    }

    pub fn bus(mut self, bus: impl Into<String>) -> Self {
        self.entity.set_property("bus", bus.into());
        self
    }
}

facade!(Netdev, Nic, NetDevice);

/// The prefix the hypervisor itself uses for generated addresses.
pub const QEMU_OUI: [u8; 3] = [0x52, 0x54, 0x00];

/// A random address under [`QEMU_OUI`].
pub fn random_mac() -> MacAddr {
    let [d, e, f]: [u8; 3] = rand::random();
    let [a, b, c] = QEMU_OUI;
    MacAddr::new(a, b, c, d, e, f)
}

/// Upper-case colon-separated hex, the form the hypervisor prints back.
fn mac_value(mac: MacAddr) -> String {
    let MacAddr(a, b, c, d, e, f) = mac;
    format!("{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{f:02X}")
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
