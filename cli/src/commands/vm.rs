use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use qcmd_common::DiskFormat;
use qcmd_core::Compiler;
use qcmd_core::numa::{Numa, NumaNode};
use qcmd_devices::block::{Drive, DriveInterface, Media};
use qcmd_devices::display::Vnc;
use qcmd_devices::machine::{self, Cpu, Machine, Memory, Smp};
use qcmd_devices::monitor::Qmp;
use qcmd_devices::net::{self, MacAddr, Netdev};
use qcmd_devices::object::MemoryBackend;

use super::VmArgs;

const NETDEV_ID: &str = "net0";

/// One `--numa CPUS[:SIZE]` occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumaArg {
    /// `[cpu]` or `[first, last]`.
    pub cpus: Vec<u32>,
    pub memory: Option<String>,
}

impl FromStr for NumaArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (cpus, memory) = match s.split_once(':') {
            Some((cpus, mem)) if !mem.is_empty() => (cpus, Some(mem.to_string())),
            Some((cpus, _)) => (cpus, None),
            None => (s, None),
        };

        let parse = |part: &str| {
            part.trim()
                .parse::<u32>()
                .map_err(|e| format!("invalid CPU index '{part}' in '{s}': {e}"))
        };

        let cpus: Vec<u32> = match cpus.split_once('-') {
            Some((first, last)) => vec![parse(first)?, parse(last)?],
            None => vec![parse(cpus)?],
        };
        Ok(Self { cpus, memory })
    }
}

impl VmArgs {
    /// Registers every requested option in the order the hypervisor expects
    /// to read them.
    pub fn compiler(&self) -> anyhow::Result<Compiler> {
        let mut compiler = Compiler::new();

        if let Some(machine_type) = &self.machine {
            let mut machine = Machine::new(machine_type.as_str());
            if let Some(accel) = self.accel {
                machine = machine.accel(accel.into());
            }
            compiler.add(machine);
        } else if let Some(accel) = self.accel {
            compiler.add(Machine::new("").accel(accel.into()));
        }

        if let Some(model) = &self.cpu {
            compiler.add(Cpu::new(model.as_str()));
        }

        compiler.add(Memory::new(self.memory.as_str())).add(Smp::new(self.smp));

        if !self.numa.is_empty() {
            self.add_numa(&mut compiler)?;
        }

        for path in &self.drive {
            compiler.add(
                Drive::new()
                    .file(path)
                    .format(drive_format(path, self.drive_format))
                    .interface(DriveInterface::Virtio),
            );
        }
        if let Some(iso) = &self.cdrom {
            compiler.add(Drive::new().file(iso).media(Media::Cdrom).readonly(true));
        }

        if self.net || !self.hostfwd.is_empty() {
            let netdev = self
                .hostfwd
                .iter()
                .fold(Netdev::user(NETDEV_ID), |netdev, rule| netdev.hostfwd(rule.as_str()));
            let mac: MacAddr = self.mac.unwrap_or_else(net::random_mac);
            compiler.add(netdev.into_nic(self.nic_model.as_str()).mac(mac));
        }

        if let Some(socket) = &self.qmp {
            compiler.add(Qmp::unix(socket));
        }

        if self.nographic {
            compiler.add(machine::switch("nographic"));
        } else if let Some(display) = self.vnc {
            compiler.add(Vnc::new(display));
        }

        if let Some(kernel) = &self.kernel {
            compiler.add(machine::kernel(kernel));
            if let Some(initrd) = &self.initrd {
                compiler.add(machine::initrd(initrd));
            }
            if let Some(cmdline) = &self.append {
                compiler.add(machine::append(cmdline.as_str()));
            }
        }

        Ok(compiler)
    }

    fn add_numa(&self, compiler: &mut Compiler) -> anyhow::Result<()> {
        let mut numa = Numa::new();

        for (id, arg) in (0u32..).zip(&self.numa) {
            let mut node = NumaNode::new(id)
                .cpus(&arg.cpus)
                .with_context(|| format!("invalid CPU set for NUMA node {id}"))?;

            if let Some(size) = &arg.memory {
                let backend_id = format!("ram-node{id}");
                compiler.add(MemoryBackend::ram(backend_id.as_str(), size.as_str()));
                node = node.memdev(backend_id);
            }
            numa.add_node(node)?;
        }

        compiler
            .add_aggregate(&numa)
            .context("inconsistent NUMA topology")?;
        Ok(())
    }
}

/// The format named by the file extension, or `fallback`.
fn drive_format(path: &Path, fallback: DiskFormat) -> DiskFormat {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| ext.parse().ok())
        .unwrap_or(fallback)
}
