//! Criterion benchmarks for the patch tick engine (`patchbay-core`).
//!
//! Measures engine overhead independently of DSP cost using a trivial `Gain`
//! unit. Two axes:
//!
//! - **Build**: stack traffic and node registration for a linear chain
//! - **Tick**: `tick_block()` throughput for chains of varying length
//!
//! Run with: `cargo bench -p patchbay-core -- patch/`
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use patchbay_core::{CableBus, CableId, Patch, PatchConfig, PatchError, TickContext, Unit};

const CHAIN_LENGTHS: &[usize] = &[1, 8, 32, 63];

// ---------------------------------------------------------------------------
// Trivial Gain unit, isolates engine overhead from DSP cost
// ---------------------------------------------------------------------------

struct Gain {
    input: CableId,
    out: CableId,
}

impl Unit for Gain {
    fn compute(&mut self, bus: &mut CableBus<'_>, _ctx: &TickContext) {
        let v = bus.read(self.input) * 0.9;
        bus.write(self.out, v);
    }
}

fn gain(patch: &mut Patch) -> Result<(), PatchError> {
    let [src] = patch.pop_inputs::<1>()?;
    let mut node = patch.new_node("gain")?;
    let input = node.input("in", 0.0);
    let out = node.output("out");
    node.finish(Gain { input, out })?;
    patch.connect(src, input)?;
    patch.push_cable(out)?;
    Ok(())
}

fn make_chain(n: usize) -> Patch {
    let mut patch = Patch::new(PatchConfig::default()).unwrap();
    patch.push_constant(1.0).unwrap();
    for _ in 0..n {
        gain(&mut patch).unwrap();
    }
    patch.drop().unwrap();
    patch.start().unwrap();
    patch
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("patch/build");
    for &n in CHAIN_LENGTHS {
        group.bench_with_input(BenchmarkId::new("linear", n), &n, |b, &n| {
            b.iter(|| black_box(make_chain(n)));
        });
    }
    group.finish();
}

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("patch/tick_block");
    for &n in CHAIN_LENGTHS {
        let mut patch = make_chain(n);
        group.bench_function(BenchmarkId::new("linear", n), |b| {
            b.iter(|| {
                patch.tick_block().unwrap();
                black_box(patch.sample());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_tick);
criterion_main!(benches);
