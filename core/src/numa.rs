//! # NUMA Topology Aggregate
//!
//! Groups every `-numa` entry of one machine and enforces the rules that span
//! more than one entry:
//!
//! * Distances, CPU assignments, HMAT attributes and node initiators may only
//!   reference nodes that were already added.
//! * A node id can only be added once.
//! * An `hmat-lb` entry carries either a latency or a bandwidth, never both, and
//!   must carry one of them before it can be flattened.
//!
//! Entries flatten in the order they were added, since the hypervisor reads
//! `-numa` options in command-line order.

use std::collections::BTreeSet;

use qcmd_common::{
    Aggregate, CmdOption, CompositionError, Entity, OptionEnum, QcmdError, ValidationError, Value,
};
use tracing::debug;

const NUMA_FLAG: &str = "numa";

/// One `-numa node` entry.
#[derive(Debug, Clone)]
pub struct NumaNode {
    id: u32,
    initiator: Option<u32>,
    entity: Entity,
}

impl NumaNode {
    pub fn new(id: u32) -> Self {
        let mut entity = Entity::new(NUMA_FLAG, "node");
        entity.repeatable("cpus").set_property("nodeid", id);
        Self {
            id,
            initiator: None,
            entity,
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Assigns one CPU (`[3]`) or an inclusive range (`[0, 3]`).
    ///
    /// May be called more than once; each call adds another `cpus=` element.
    pub fn cpus(mut self, cpus: &[u32]) -> Result<Self, QcmdError> {
        let spec: String = cpu_spec(cpus)?;
        self.entity.set_property("cpus", spec);
        Ok(self)
    }

    /// Backs the node with a memory backend object id.
    pub fn memdev(mut self, memdev: impl Into<String>) -> Self {
        self.entity.set_property("memdev", memdev.into());
        self
    }

    /// The node whose CPUs initiate memory accesses to this node.
    pub fn initiator(mut self, node: u32) -> Self {
        self.initiator = Some(node);
        self.entity.set_property("initiator", node);
        self
    }
}

/// One `-numa cpu` entry pinning a CPU topology slot to a node.
#[derive(Debug, Clone)]
pub struct NumaCpu {
    node: u32,
    entity: Entity,
}

impl NumaCpu {
    pub fn new(node: u32) -> Self {
        let mut entity = Entity::new(NUMA_FLAG, "cpu");
        entity.set_property("node-id", node);
        Self { node, entity }
    }

    pub fn socket_id(mut self, id: u32) -> Self {
        self.entity.set_property("socket-id", id);
        self
    }

    pub fn die_id(mut self, id: u32) -> Self {
        self.entity.set_property("die-id", id);
        self
    }

    pub fn core_id(mut self, id: u32) -> Self {
        self.entity.set_property("core-id", id);
        self
    }

    pub fn thread_id(mut self, id: u32) -> Self {
        self.entity.set_property("thread-id", id);
        self
    }
}

/// One `-numa dist` entry. Only [`Numa::add_distance`] can create it.
#[derive(Debug, Clone)]
pub struct NumaDistance {
    src: u32,
    dst: u32,
    entity: Entity,
}

impl NumaDistance {
    fn new(src: u32, dst: u32, val: u8) -> Self {
        let mut entity = Entity::new(NUMA_FLAG, "dist");
        entity
            .set_property("src", src)
            .set_property("dst", dst)
            .set_property("val", val);
        Self { src, dst, entity }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HmatHierarchy {
    Memory,
    FirstLevel,
    SecondLevel,
    ThirdLevel,
}

impl OptionEnum for HmatHierarchy {
    fn as_str(&self) -> &'static str {
        match self {
            HmatHierarchy::Memory => "memory",
            HmatHierarchy::FirstLevel => "first-level",
            HmatHierarchy::SecondLevel => "second-level",
            HmatHierarchy::ThirdLevel => "third-level",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HmatDataType {
    AccessLatency,
    ReadLatency,
    WriteLatency,
    AccessBandwidth,
    ReadBandwidth,
    WriteBandwidth,
}

impl HmatDataType {
    fn is_latency(&self) -> bool {
        matches!(
            self,
            HmatDataType::AccessLatency | HmatDataType::ReadLatency | HmatDataType::WriteLatency
        )
    }
}

impl OptionEnum for HmatDataType {
    fn as_str(&self) -> &'static str {
        match self {
            HmatDataType::AccessLatency => "access-latency",
            HmatDataType::ReadLatency => "read-latency",
            HmatDataType::WriteLatency => "write-latency",
            HmatDataType::AccessBandwidth => "access-bandwidth",
            HmatDataType::ReadBandwidth => "read-bandwidth",
            HmatDataType::WriteBandwidth => "write-bandwidth",
        }
    }
}

/// One `-numa hmat-lb` entry describing a single initiator→target link.
#[derive(Debug, Clone)]
pub struct HmatLb {
    initiator: u32,
    target: u32,
    data_type: HmatDataType,
    entity: Entity,
}

impl HmatLb {
    pub fn new(initiator: u32, target: u32, hierarchy: HmatHierarchy, data_type: HmatDataType) -> Self {
        let mut entity = Entity::new(NUMA_FLAG, "hmat-lb");
        entity
            .set_property("initiator", initiator)
            .set_property("target", target)
            .set_property("hierarchy", Value::Enum(hierarchy.as_str()))
            .set_property("data-type", Value::Enum(data_type.as_str()));
        Self {
            initiator,
            target,
            data_type,
            entity,
        }
    }

    /// Latency in nanoseconds. Fails if a bandwidth is already set.
    pub fn latency(mut self, nanoseconds: u32) -> Result<Self, QcmdError> {
        self.exclusive("latency", "bandwidth")?;
        if !self.data_type.is_latency() {
            return Err(self.mismatched("latency"));
        }
        self.entity.set_property("latency", nanoseconds);
        Ok(self)
    }

    /// Bandwidth such as `200M`. Fails if a latency is already set.
    pub fn bandwidth(mut self, bandwidth: impl Into<String>) -> Result<Self, QcmdError> {
        self.exclusive("bandwidth", "latency")?;
        if self.data_type.is_latency() {
            return Err(self.mismatched("bandwidth"));
        }
        self.entity.set_property("bandwidth", bandwidth.into());
        Ok(self)
    }

    fn exclusive(&self, setting: &str, other: &str) -> Result<(), QcmdError> {
        if self.entity.has_property(other) {
            return Err(ValidationError::ExclusiveAttributes {
                first: other.to_string(),
                second: setting.to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn mismatched(&self, key: &str) -> QcmdError {
        ValidationError::IncompatibleProperties {
            flag: NUMA_FLAG.to_string(),
            key: key.to_string(),
            reason: format!("data-type={}", self.data_type.as_str()),
        }
        .into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheAssociativity {
    None,
    Direct,
    Complex,
}

impl OptionEnum for CacheAssociativity {
    fn as_str(&self) -> &'static str {
        match self {
            CacheAssociativity::None => "none",
            CacheAssociativity::Direct => "direct",
            CacheAssociativity::Complex => "complex",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    None,
    WriteBack,
    WriteThrough,
}

impl OptionEnum for CachePolicy {
    fn as_str(&self) -> &'static str {
        match self {
            CachePolicy::None => "none",
            CachePolicy::WriteBack => "write-back",
            CachePolicy::WriteThrough => "write-through",
        }
    }
}

/// One `-numa hmat-cache` entry. Associativity, policy and line size are required.
#[derive(Debug, Clone)]
pub struct HmatCache {
    node: u32,
    entity: Entity,
}

impl HmatCache {
    const REQUIRED: [&'static str; 3] = ["associativity", "policy", "line"];

    pub fn new(node: u32, size: impl Into<String>, level: u8) -> Self {
        let mut entity = Entity::new(NUMA_FLAG, "hmat-cache");
        entity
            .set_property("node-id", node)
            .set_property("size", size.into())
            .set_property("level", level);
        Self { node, entity }
    }

    pub fn associativity(mut self, associativity: CacheAssociativity) -> Self {
        self.entity.set_property("associativity", Value::Enum(associativity.as_str()));
        self
    }

    pub fn policy(mut self, policy: CachePolicy) -> Self {
        self.entity.set_property("policy", Value::Enum(policy.as_str()));
        self
    }

    /// Cache line size in bytes.
    pub fn line(mut self, bytes: u32) -> Self {
        self.entity.set_property("line", bytes);
        self
    }
}

#[derive(Debug, Clone)]
enum NumaEntry {
    Node(NumaNode),
    Cpu(NumaCpu),
    Distance(NumaDistance),
    HmatLb(HmatLb),
    HmatCache(HmatCache),
}

impl NumaEntry {
    fn entity(&self) -> &Entity {
        match self {
            NumaEntry::Node(node) => &node.entity,
            NumaEntry::Cpu(cpu) => &cpu.entity,
            NumaEntry::Distance(dist) => &dist.entity,
            NumaEntry::HmatLb(lb) => &lb.entity,
            NumaEntry::HmatCache(cache) => &cache.entity,
        }
    }

    /// Every node this entry points at, labelled for error messages.
    fn references(&self) -> Vec<(&'static str, u32)> {
        match self {
            NumaEntry::Node(node) => node.initiator.map(|i| ("node initiator", i)).into_iter().collect(),
            NumaEntry::Cpu(cpu) => vec![("cpu", cpu.node)],
            NumaEntry::Distance(dist) => vec![("dist", dist.src), ("dist", dist.dst)],
            NumaEntry::HmatLb(lb) => vec![("hmat-lb", lb.initiator), ("hmat-lb", lb.target)],
            NumaEntry::HmatCache(cache) => vec![("hmat-cache", cache.node)],
        }
    }

    fn missing_attribute(&self) -> Option<CompositionError> {
        let (entry, missing): (&str, Option<&str>) = match self {
            NumaEntry::HmatLb(lb) => {
                let has_value = lb.entity.has_property("latency") || lb.entity.has_property("bandwidth");
                let key = if lb.data_type.is_latency() { "latency" } else { "bandwidth" };
                ("hmat-lb", (!has_value).then_some(key))
            }
            NumaEntry::HmatCache(cache) => (
                "hmat-cache",
                HmatCache::REQUIRED
                    .into_iter()
                    .find(|key| !cache.entity.has_property(key)),
            ),
            _ => return None,
        };

        missing.map(|attribute| CompositionError::MissingAttribute {
            entry: entry.to_string(),
            attribute: attribute.to_string(),
        })
    }
}

/// The NUMA topology of one machine.
#[derive(Debug, Clone, Default)]
pub struct Numa {
    nodes: BTreeSet<u32>,
    entries: Vec<NumaEntry>,
}

impl Numa {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered node ids, ascending.
    pub fn nodes(&self) -> impl Iterator<Item = u32> + '_ {
        self.nodes.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds a node. Its initiator, if any, must be itself or an earlier node.
    pub fn add_node(&mut self, node: NumaNode) -> Result<&mut Self, QcmdError> {
        if self.nodes.contains(&node.id) {
            return Err(CompositionError::DuplicateNode { node: node.id }.into());
        }
        if let Some(initiator) = node.initiator
            && initiator != node.id
        {
            self.require_node("node initiator", initiator)?;
        }

        self.nodes.insert(node.id);
        self.push(NumaEntry::Node(node))
    }

    pub fn add_cpu(&mut self, cpu: NumaCpu) -> Result<&mut Self, QcmdError> {
        self.require_node("cpu", cpu.node)?;
        self.push(NumaEntry::Cpu(cpu))
    }

    /// Records the distance from `src` to `dst`. Both nodes must already exist.
    pub fn add_distance(&mut self, src: u32, dst: u32, val: u8) -> Result<&mut Self, QcmdError> {
        self.require_node("dist", src)?;
        self.require_node("dist", dst)?;
        self.push(NumaEntry::Distance(NumaDistance::new(src, dst, val)))
    }

    pub fn add_hmat_lb(&mut self, lb: HmatLb) -> Result<&mut Self, QcmdError> {
        self.require_node("hmat-lb", lb.initiator)?;
        self.require_node("hmat-lb", lb.target)?;
        self.push(NumaEntry::HmatLb(lb))
    }

    pub fn add_hmat_cache(&mut self, cache: HmatCache) -> Result<&mut Self, QcmdError> {
        self.require_node("hmat-cache", cache.node)?;
        self.push(NumaEntry::HmatCache(cache))
    }

    fn push(&mut self, entry: NumaEntry) -> Result<&mut Self, QcmdError> {
        self.entries.push(entry);
        Ok(self)
    }

    fn require_node(&self, relation: &str, node: u32) -> Result<(), CompositionError> {
        if self.nodes.contains(&node) {
            return Ok(());
        }
        Err(CompositionError::UnknownNode {
            relation: relation.to_string(),
            node,
        })
    }

    /// Checks every entry is complete and points at registered nodes.
    pub fn validate(&self) -> Result<(), QcmdError> {
        for entry in &self.entries {
            for (relation, node) in entry.references() {
                self.require_node(relation, node)?;
            }
            if let Some(err) = entry.missing_attribute() {
                return Err(err.into());
            }
        }
        Ok(())
    }
}

impl Aggregate for Numa {
    fn flatten(&self) -> Result<Vec<CmdOption>, QcmdError> {
        self.validate()?;

        let options: Vec<CmdOption> = self
            .entries
            .iter()
            .map(|entry| entry.entity().compile())
            .collect::<Result<_, _>>()?;

        debug!(nodes = self.nodes.len(), entries = options.len(), "flattened numa topology");
        Ok(options)
    }
}

fn cpu_spec(cpus: &[u32]) -> Result<String, ValidationError> {
    match cpus {
        &[single] => Ok(single.to_string()),
        &[start, end] if start <= end => Ok(format!("{start}-{end}")),
        &[start, end] => Err(ValidationError::InvalidCpuRange { start, end }),
        _ => Err(ValidationError::CpuArity { count: cpus.len() }),
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(numa: &Numa) -> Vec<String> {
        numa.flatten()
            .unwrap()
            .iter()
            .map(CmdOption::render_string)
            .collect()
    }

    fn two_nodes() -> Numa {
        let mut numa = Numa::new();
        numa.add_node(NumaNode::new(0).cpus(&[0, 1]).unwrap().memdev("m0"))
            .unwrap()
            .add_node(NumaNode::new(1).cpus(&[2, 3]).unwrap().memdev("m1"))
            .unwrap();
        numa
    }

    #[test]
    fn cpu_spec_accepts_one_or_two_values() {
        assert_eq!(cpu_spec(&[4]), Ok("4".to_string()));
        assert_eq!(cpu_spec(&[0, 3]), Ok("0-3".to_string()));
        assert_eq!(cpu_spec(&[2, 2]), Ok("2-2".to_string()));
    }

    #[test]
    fn cpu_spec_rejects_other_arities() {
        assert_eq!(cpu_spec(&[1, 2, 3]), Err(ValidationError::CpuArity { count: 3 }));
        assert_eq!(cpu_spec(&[]), Err(ValidationError::CpuArity { count: 0 }));
        assert_eq!(
            cpu_spec(&[5, 1]),
            Err(ValidationError::InvalidCpuRange { start: 5, end: 1 })
        );
    }

    #[test]
    fn node_with_three_cpus_is_a_validation_error() {
        let err = NumaNode::new(0).cpus(&[1, 2, 3]).unwrap_err();
        assert_eq!(err, QcmdError::Validation(ValidationError::CpuArity { count: 3 }));
    }

    #[test]
    fn nodes_render_in_insertion_order() {
        let mut numa = Numa::new();
        numa.add_node(NumaNode::new(1).cpus(&[2]).unwrap()).unwrap();
        numa.add_node(NumaNode::new(0).cpus(&[0, 1]).unwrap().cpus(&[4, 5]).unwrap())
            .unwrap();

        assert_eq!(
            rendered(&numa),
            vec![
                "-numa node,nodeid=1,cpus=2",
                "-numa node,nodeid=0,cpus=0-1,cpus=4-5",
            ]
        );
        assert_eq!(numa.nodes().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn distance_between_known_nodes() {
        let mut numa = two_nodes();
        numa.add_distance(0, 1, 21).unwrap().add_distance(1, 0, 21).unwrap();

        assert_eq!(
            rendered(&numa)[2..],
            ["-numa dist,src=0,dst=1,val=21", "-numa dist,src=1,dst=0,val=21"]
        );
    }

    #[test]
    fn distance_to_unknown_node_leaves_entries_unchanged() {
        let mut numa = two_nodes();
        let before = numa.len();

        let err = numa.add_distance(0, 7, 20).unwrap_err();

        assert_eq!(
            err,
            QcmdError::Composition(CompositionError::UnknownNode {
                relation: "dist".into(),
                node: 7,
            })
        );
        assert_eq!(numa.len(), before);
    }

    #[test]
    fn duplicate_node_is_rejected() {
        let mut numa = two_nodes();
        assert_eq!(
            numa.add_node(NumaNode::new(1)).unwrap_err(),
            QcmdError::Composition(CompositionError::DuplicateNode { node: 1 })
        );
    }

    #[test]
    fn initiator_must_exist_unless_self() {
        let mut numa = Numa::new();
        numa.add_node(NumaNode::new(0).initiator(0)).unwrap();
        assert!(numa.add_node(NumaNode::new(1).initiator(0)).is_ok());
        assert!(matches!(
            numa.add_node(NumaNode::new(2).initiator(5)),
            Err(QcmdError::Composition(CompositionError::UnknownNode { node: 5, .. }))
        ));
    }

    #[test]
    fn cpu_entries_reference_nodes() {
        let mut numa = two_nodes();
        numa.add_cpu(NumaCpu::new(1).socket_id(1).core_id(0).thread_id(0)).unwrap();
        assert!(numa.add_cpu(NumaCpu::new(9)).is_err());

        assert_eq!(
            rendered(&numa).last().map(String::as_str),
            Some("-numa cpu,node-id=1,socket-id=1,core-id=0,thread-id=0")
        );
    }

    #[test]
    fn latency_then_bandwidth_fails_on_second_call() {
        let lb = HmatLb::new(0, 1, HmatHierarchy::Memory, HmatDataType::AccessLatency)
            .latency(5)
            .unwrap();

        assert_eq!(
            lb.bandwidth("200M").unwrap_err(),
            QcmdError::Validation(ValidationError::ExclusiveAttributes {
                first: "latency".into(),
                second: "bandwidth".into(),
            })
        );
    }

    #[test]
    fn bandwidth_then_latency_fails_on_second_call() {
        let lb = HmatLb::new(0, 1, HmatHierarchy::Memory, HmatDataType::AccessBandwidth)
            .bandwidth("200M")
            .unwrap();

        assert!(matches!(
            lb.latency(5),
            Err(QcmdError::Validation(ValidationError::ExclusiveAttributes { .. }))
        ));
    }

    #[test]
    fn latency_requires_latency_data_type() {
        let result = HmatLb::new(0, 0, HmatHierarchy::Memory, HmatDataType::ReadBandwidth).latency(5);
        assert!(matches!(
            result,
            Err(QcmdError::Validation(ValidationError::IncompatibleProperties { .. }))
        ));
    }

    #[test]
    fn hmat_entries_render() {
        let mut numa = two_nodes();
        let lb = HmatLb::new(0, 1, HmatHierarchy::Memory, HmatDataType::AccessLatency)
            .latency(10)
            .unwrap();
        let cache = HmatCache::new(1, "10K", 1)
            .associativity(CacheAssociativity::Direct)
            .policy(CachePolicy::WriteBack)
            .line(8);
        numa.add_hmat_lb(lb).unwrap().add_hmat_cache(cache).unwrap();

        assert_eq!(
            rendered(&numa)[2..],
            [
                "-numa hmat-lb,initiator=0,target=1,hierarchy=memory,data-type=access-latency,latency=10",
                "-numa hmat-cache,node-id=1,size=10K,level=1,associativity=direct,policy=write-back,line=8",
            ]
        );
    }

    #[test]
    fn flatten_requires_lb_value() {
        let mut numa = two_nodes();
        numa.add_hmat_lb(HmatLb::new(0, 1, HmatHierarchy::Memory, HmatDataType::ReadBandwidth))
            .unwrap();

        assert_eq!(
            numa.flatten().unwrap_err(),
            QcmdError::Composition(CompositionError::MissingAttribute {
                entry: "hmat-lb".into(),
                attribute: "bandwidth".into(),
            })
        );
    }

    #[test]
    fn flatten_requires_cache_attributes() {
        let mut numa = two_nodes();
        numa.add_hmat_cache(HmatCache::new(0, "8K", 1).associativity(CacheAssociativity::None))
            .unwrap();

        assert!(matches!(
            numa.flatten(),
            Err(QcmdError::Composition(CompositionError::MissingAttribute { ref attribute, .. }))
                if attribute == "policy"
        ));
    }

    #[test]
    fn hmat_references_unknown_target() {
        let mut numa = two_nodes();
        let lb = HmatLb::new(0, 3, HmatHierarchy::Memory, HmatDataType::AccessLatency)
            .latency(1)
            .unwrap();
        assert!(numa.add_hmat_lb(lb).is_err());
        assert_eq!(numa.len(), 2);
    }
}
