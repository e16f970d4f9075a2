//! End-to-end patches built from the stack-form words.

use patchbay_core::{NodeId, Patch, PatchConfig, PatchError};
use patchbay_nodes::{
    NodeRegistry, Probe, add, biscale, blsaw, butlp, dcblock, mul, probe_with_capacity, revsc,
    scale, sine,
};

/// The siren graph, terminated by a probe instead of a file writer.
fn siren(patch: &mut Patch, capacity: usize) -> Result<NodeId, PatchError> {
    // 0.1 1 sine 0 1 biscale bhold
    patch.push_constant(0.1)?;
    patch.push_constant(1.0)?;
    sine(patch)?;
    patch.push_constant(0.0)?;
    patch.push_constant(1.0)?;
    biscale(patch)?;
    let lfo = patch.hold_top()?;

    // lfo 100 600 scale 0.5 blsaw
    patch.push(lfo)?;
    patch.push_constant(100.0)?;
    patch.push_constant(600.0)?;
    scale(patch)?;
    patch.push_constant(0.5)?;
    blsaw(patch)?;

    // lfo 100 2000 scale butlp
    patch.push(lfo)?;
    patch.push_constant(100.0)?;
    patch.push_constant(2000.0)?;
    scale(patch)?;
    butlp(patch)?;

    // dup dup 0.97 10000 revsc drop 0.1 mul dcblock
    patch.dup()?;
    patch.dup()?;
    patch.push_constant(0.97)?;
    patch.push_constant(10000.0)?;
    revsc(patch)?;
    patch.drop()?;
    patch.push_constant(0.1)?;
    mul(patch)?;
    dcblock(patch)?;

    patch.unhold(lfo)?;
    add(patch)?;

    let ports = probe_with_capacity(patch, capacity)?;
    patch.drop()?;
    Ok(ports.node)
}

#[test]
fn sine_into_probe_for_one_second() {
    let mut patch = Patch::new(PatchConfig::default()).unwrap();
    patch.push_constant(440.0).unwrap();
    patch.push_constant(1.0).unwrap();
    sine(&mut patch).unwrap();
    let ports = probe_with_capacity(&mut patch, 0).unwrap();
    patch.drop().unwrap();

    let sr = u64::from(patch.sample_rate());
    patch.run(sr).unwrap();

    let probe = patch.unit::<Probe>(ports.node).unwrap();
    assert_eq!(probe.calls(), sr);
    assert!(probe.contiguous());
    assert_eq!(probe.first_sample(), Some(0));
    assert_eq!(probe.last_sample(), Some(sr - 1));
    assert!(probe.peak() > 0.99 && probe.peak() <= 1.0);
}

#[test]
fn siren_builds_with_balanced_stack() {
    let mut patch = Patch::new(PatchConfig::default()).unwrap();
    siren(&mut patch, 0).unwrap();
    assert!(patch.is_empty());
    assert_eq!(patch.free_buffers(), patch.buffer_capacity());
    assert_eq!(patch.node_count(), 11);

    let kinds: Vec<_> = patch.nodes().map(|n| n.kind()).collect();
    assert_eq!(
        kinds,
        [
            "sine", "biscale", "scale", "blsaw", "scale", "butlp", "revsc", "mul", "dcblock",
            "add", "probe"
        ]
    );
}

#[test]
fn siren_output_is_finite_and_audible() {
    let mut patch = Patch::new(PatchConfig::default()).unwrap();
    let probe = siren(&mut patch, 0).unwrap();
    patch.run(44100).unwrap();

    let probe = patch.unit::<Probe>(probe).unwrap();
    assert!(probe.contiguous());
    assert!(probe.peak().is_finite());
    assert!(probe.peak() > 0.01, "siren is silent");
    assert!(probe.peak() < 2.0, "siren is clipping hard: {}", probe.peak());
}

#[test]
fn siren_is_deterministic() {
    let render = || {
        let mut patch = Patch::new(PatchConfig::default()).unwrap();
        let probe = siren(&mut patch, 2048).unwrap();
        patch.run(2048).unwrap();
        patch.unit::<Probe>(probe).unwrap().values().to_vec()
    };
    let a = render();
    let b = render();
    assert_eq!(a.len(), 2048);
    assert!(a.iter().zip(&b).all(|(x, y)| x.to_bits() == y.to_bits()));
}

#[test]
fn registry_words_drive_the_same_graph() {
    let registry = NodeRegistry::new();
    let mut patch = Patch::new(PatchConfig::default()).unwrap();
    for v in [220.0, 0.5] {
        patch.push_constant(v).unwrap();
    }
    registry.build("sine", &mut patch).unwrap().unwrap();
    patch.push_constant(800.0).unwrap();
    registry.build("butlp", &mut patch).unwrap().unwrap();
    let probe = registry.build("probe", &mut patch).unwrap().unwrap();
    patch.drop().unwrap();
    patch.run(1000).unwrap();

    let probe = patch.unit::<Probe>(probe).unwrap();
    assert_eq!(probe.calls(), 1000);
    assert!(probe.peak() > 0.1);
}
