//! Property-based tests for the registered nodes.
//!
//! Every word is driven by constant inputs drawn at random and must keep its
//! outputs finite; the range mappers must stay inside their bounds.

use patchbay_core::{Patch, PatchConfig};
use patchbay_nodes::{NodeRegistry, biscale, sine};
use proptest::prelude::*;

fn all_words() -> Vec<&'static str> {
    NodeRegistry::new().all().map(|d| d.name).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Constant inputs in [-1, 1] scaled up to audio-range values never
    /// drive a node to NaN or infinity.
    #[test]
    fn every_word_has_finite_output(
        values in prop::array::uniform4(-1.0f32..=1.0f32),
        scale in prop::sample::select(vec![1.0f32, 100.0, 10000.0]),
        word_idx in 0usize..16,
    ) {
        let words = all_words();
        let word = words[word_idx % words.len()];
        let registry = NodeRegistry::new();
        let desc = registry.get(word).unwrap();

        let mut patch = Patch::new(PatchConfig::default()).unwrap();
        for v in values.iter().take(desc.inputs.len()) {
            patch.push_constant(v * scale).unwrap();
        }
        let id = registry.build(word, &mut patch).unwrap().unwrap();
        patch.run(512).unwrap();

        let outputs: Vec<_> = patch.node(id).unwrap().outputs().to_vec();
        for (name, cable) in outputs {
            let out = patch.value(cable).unwrap();
            prop_assert!(out.is_finite(), "{word}.{name} = {out} for inputs {values:?} x {scale}");
        }
    }

    /// A full-scale sine pushed through `biscale` stays within [min, max].
    #[test]
    fn biscale_stays_in_range(
        freq in 1.0f32..5000.0,
        min in -100.0f32..100.0,
        width in 0.0f32..100.0,
    ) {
        let max = min + width;
        let mut patch = Patch::new(PatchConfig::default()).unwrap();
        patch.push_constant(freq).unwrap();
        patch.push_constant(1.0).unwrap();
        sine(&mut patch).unwrap();
        patch.push_constant(min).unwrap();
        patch.push_constant(max).unwrap();
        let ports = biscale(&mut patch).unwrap();

        let tolerance = 1e-4 * (1.0 + min.abs() + max.abs());
        for _ in 0..256 {
            patch.tick().unwrap();
            let out = patch.value(ports.out).unwrap();
            prop_assert!(out >= min - tolerance && out <= max + tolerance,
                "{out} outside [{min}, {max}]");
        }
    }
}
