#![cfg(test)]
use qcmd_common::{Aggregate, CompositionError, QcmdError, ValidationError};
use qcmd_core::Compiler;
use qcmd_core::numa::{
    CacheAssociativity, CachePolicy, HmatCache, HmatDataType, HmatHierarchy, HmatLb, Numa, NumaCpu,
    NumaNode,
};
use qcmd_devices::machine::{Machine, Memory, Smp};
use qcmd_devices::object::MemoryBackend;

fn two_socket_topology() -> Numa {
    let mut numa = Numa::new();
    numa.add_node(NumaNode::new(0).cpus(&[0, 1]).unwrap().memdev("m0"))
        .unwrap()
        .add_node(NumaNode::new(1).cpus(&[2, 3]).unwrap().memdev("m1").initiator(0))
        .unwrap()
        .add_distance(0, 1, 21)
        .unwrap();
    numa
}

#[test]
fn hmat_machine_renders_in_order() {
    let mut numa = two_socket_topology();
    numa.add_cpu(NumaCpu::new(0).socket_id(0).core_id(0).thread_id(0))
        .unwrap()
        .add_hmat_lb(
            HmatLb::new(0, 1, HmatHierarchy::Memory, HmatDataType::AccessLatency)
                .latency(20)
                .unwrap(),
        )
        .unwrap()
        .add_hmat_lb(
            HmatLb::new(0, 1, HmatHierarchy::Memory, HmatDataType::AccessBandwidth)
                .bandwidth("200M")
                .unwrap(),
        )
        .unwrap()
        .add_hmat_cache(
            HmatCache::new(1, "10K", 1)
                .associativity(CacheAssociativity::Direct)
                .policy(CachePolicy::WriteBack)
                .line(8),
        )
        .unwrap();

    let mut compiler = Compiler::new();
    compiler
        .add(Machine::new("q35").hmat(true))
        .add(Memory::new("2G"))
        .add(Smp::new(4))
        .add(MemoryBackend::ram("m0", "1G"))
        .add(MemoryBackend::ram("m1", "1G"));
    compiler.add_aggregate(&numa).unwrap();

    let args = compiler.args().unwrap();
    let numa_args: Vec<&str> = args
        .windows(2)
        .filter(|pair| pair[0] == "-numa")
        .map(|pair| pair[1].as_str())
        .collect();

    assert_eq!(
        numa_args,
        vec![
            "node,nodeid=0,cpus=0-1,memdev=m0",
            "node,nodeid=1,cpus=2-3,memdev=m1,initiator=0",
            "dist,src=0,dst=1,val=21",
            "cpu,node-id=0,socket-id=0,core-id=0,thread-id=0",
            "hmat-lb,initiator=0,target=1,hierarchy=memory,data-type=access-latency,latency=20",
            "hmat-lb,initiator=0,target=1,hierarchy=memory,data-type=access-bandwidth,bandwidth=200M",
            "hmat-cache,node-id=1,size=10K,level=1,associativity=direct,policy=write-back,line=8",
        ]
    );
    assert_eq!(&args[..2], ["-machine", "q35,hmat=on"]);
}

#[test]
fn distance_to_unknown_node_leaves_topology_untouched() {
    let mut numa = two_socket_topology();
    let before = numa.flatten().unwrap();

    assert_eq!(
        numa.add_distance(0, 7, 30).unwrap_err(),
        QcmdError::Composition(CompositionError::UnknownNode {
            relation: "dist".into(),
            node: 7,
        })
    );
    assert_eq!(numa.flatten().unwrap(), before);
}

#[test]
fn failed_aggregate_registers_nothing() {
    let mut numa = two_socket_topology();
    numa.add_hmat_lb(HmatLb::new(0, 1, HmatHierarchy::Memory, HmatDataType::ReadLatency))
        .unwrap();

    let mut compiler = Compiler::new();
    compiler.add(Memory::new("1G"));

    assert!(compiler.add_aggregate(&numa).is_err());
    assert_eq!(compiler.len(), 1);
}

#[test]
fn latency_and_bandwidth_are_exclusive() {
    let lb = HmatLb::new(0, 1, HmatHierarchy::FirstLevel, HmatDataType::AccessLatency)
        .latency(5)
        .unwrap();

    assert_eq!(
        lb.bandwidth("1G").unwrap_err(),
        QcmdError::Validation(ValidationError::ExclusiveAttributes {
            first: "latency".into(),
            second: "bandwidth".into(),
        })
    );
}

#[test]
fn three_element_cpu_list_is_rejected() {
    assert_eq!(
        NumaNode::new(0).cpus(&[1, 2, 3]).unwrap_err(),
        QcmdError::Validation(ValidationError::CpuArity { count: 3 })
    );
}
