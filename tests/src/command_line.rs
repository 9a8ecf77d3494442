#![cfg(test)]
use std::path::Path;

use proptest::prelude::*;
use qcmd_common::{CmdOption, Entity, QcmdError, Usable, ValidationError, Value};
use qcmd_core::Compiler;
use qcmd_devices::block::{Drive, DriveInterface};
use qcmd_devices::machine::{Memory, Smp, switch};
use qcmd_devices::monitor::{Chardev, Monitor, MonitorMode};
use qcmd_devices::net::{MacAddr, NetDevice, Netdev};

use crate::support::argv;

/*************************************************************
                    Canonical command lines
**************************************************************/

#[test]
fn memory_then_smp() {
    let mut compiler = Compiler::new();
    compiler.add(Memory::new("3G")).add(Smp::new(2));

    assert_eq!(compiler.args().unwrap(), argv(&["-m", "3G", "-smp", "2"]));
}

#[test]
fn raw_entity_and_facade_agree() {
    let mut raw = Entity::new("device", "e1000");
    raw.set_property("mac", "8E:4E:E1:EA:B7:BB").set_property("netdev", "net0");

    assert_eq!(
        raw.compile().unwrap().render(),
        argv(&["-device", "e1000,mac=8E:4E:E1:EA:B7:BB,netdev=net0"])
    );

    let mac: MacAddr = "8E:4E:E1:EA:B7:BB".parse().unwrap();
    let facade = NetDevice::new("e1000", "net0").id("net0").mac(mac);
    assert_eq!(
        facade.to_option().unwrap().render_string(),
        "-device e1000,netdev=net0,id=net0,mac=8E:4E:E1:EA:B7:BB"
    );
}

#[test]
fn backend_and_frontend_in_registration_order() {
    let mut compiler = Compiler::new();
    compiler
        .add(Netdev::user("n1").hostfwd("tcp::2222-:22"))
        .add(NetDevice::new("virtio-net-pci", "n1"))
        .add(Drive::new().file(Path::new("disk.qcow2")).interface(DriveInterface::Virtio))
        .add(switch("nographic"));

    assert_eq!(
        compiler.args_string().unwrap(),
        "-netdev user,id=n1,hostfwd=tcp::2222-:22 \
         -device virtio-net-pci,netdev=n1 \
         -drive file=disk.qcow2,if=virtio \
         -nographic"
    );
}

#[test]
fn rendering_is_repeatable() {
    let mut compiler = Compiler::new();
    compiler.add(Memory::new("512M")).add(switch("enable-kvm"));

    let first = compiler.args().unwrap();
    assert_eq!(compiler.args().unwrap(), first);
    assert_eq!(compiler.len(), 2);
}

#[test]
fn set_options_replaces_previous_registrations() {
    let mut compiler = Compiler::new();
    compiler.add(Memory::new("1G"));
    compiler.set_options(vec![Smp::new(4), Smp::new(8)]);

    assert_eq!(compiler.args().unwrap(), argv(&["-smp", "4", "-smp", "8"]));
}

/*************************************************************
                 Validation surfaces at render time
**************************************************************/

#[test]
fn one_invalid_option_fails_the_whole_command() {
    let mut compiler = Compiler::new();
    compiler
        .add(Chardev::socket("mon0", Path::new("/run/mon.sock")))
        .add(Monitor::new("mon0").mode(MonitorMode::Readline).pretty(true))
        .add(Memory::new("1G"));

    assert!(matches!(
        compiler.args(),
        Err(QcmdError::Validation(ValidationError::IncompatibleProperties { .. }))
    ));
}

#[test]
fn duplicate_append_is_reported_by_compile() {
    let mut entity = Entity::new("device", "virtio-blk-pci");
    entity.append_property("drive", "hd0").append_property("drive", "hd1");

    assert_eq!(
        entity.compile(),
        Err(QcmdError::Validation(ValidationError::DuplicateKey {
            flag: "device".into(),
            key: "drive".into(),
        }))
    );
}

/*************************************************************
                       Round trips
**************************************************************/

#[test]
fn rendered_netdev_parses_back() {
    let netdev = Netdev::user("net0").hostfwd("tcp::80-:8080").dnssearch("a,b");
    let tokens = netdev.to_option().unwrap().render();
    let parsed = CmdOption::parse(&tokens).unwrap();

    assert_eq!(parsed.flag(), "netdev");
    assert_eq!(parsed.name(), Some("user"));
    let values: Vec<(&str, &Value)> = parsed.properties().iter().map(|p| (p.key(), p.value())).collect();
    assert_eq!(
        values,
        vec![
            ("id", &Value::Str("net0".into())),
            ("hostfwd", &Value::Str("tcp::80-:8080".into())),
            ("dnssearch", &Value::Str("a,b".into())),
        ]
    );
}

proptest! {
    #[test]
    fn compiler_output_is_the_concatenation_of_its_options(sizes in prop::collection::vec(1u32..64, 1..8)) {
        let mut compiler = Compiler::new();
        let mut expected: Vec<String> = Vec::new();
        for size in &sizes {
            compiler.add(Memory::new(format!("{size}G")));
            expected.extend(argv(&["-m", format!("{size}G").as_str()]));
        }
        prop_assert_eq!(compiler.args().unwrap(), expected);
    }
}
