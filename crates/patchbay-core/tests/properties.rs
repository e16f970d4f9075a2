//! Property-based tests for the patch construction stack.
//!
//! Drives random sequences of stack operations and checks depth arithmetic,
//! hold accounting, and the abort-on-error rule against a simple model.

use proptest::prelude::*;
use patchbay_core::{CableBus, CableId, Patch, PatchConfig, PatchError, PatchState, TickContext, Unit};

#[derive(Clone, Copy, Debug)]
enum Op {
    Push(f32),
    Dup,
    Drop,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (-1.0f32..=1.0f32).prop_map(Op::Push),
        Just(Op::Dup),
        Just(Op::Drop),
    ]
}

/// Sums two inputs; used to check deterministic output.
struct Sum {
    a: CableId,
    b: CableId,
    out: CableId,
    phase: f32,
}

impl Unit for Sum {
    fn compute(&mut self, bus: &mut CableBus<'_>, _ctx: &TickContext) {
        self.phase = (self.phase + 0.01) % 1.0;
        let v = bus.read(self.a) + bus.read(self.b) * self.phase;
        bus.write(self.out, v);
    }
}

fn build_sum(patch: &mut Patch) -> Result<(), PatchError> {
    let [a_src, b_src] = patch.pop_inputs::<2>()?;
    let mut node = patch.new_node("sum")?;
    let a = node.input("a", 0.0);
    let b = node.input("b", 0.0);
    let out = node.output("out");
    node.finish(Sum {
        a,
        b,
        out,
        phase: 0.0,
    })?;
    patch.connect(a_src, a)?;
    patch.connect(b_src, b)?;
    patch.push_cable(out)?;
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Every successful operation changes the depth by its documented amount,
    /// and the first failing one aborts the patch with the depth unchanged.
    #[test]
    fn depth_follows_operation_table(ops in prop::collection::vec(op(), 1..40)) {
        let mut patch = Patch::new(PatchConfig::default()).unwrap();
        for op in ops {
            let before = patch.depth();
            let result = match op {
                Op::Push(v) => patch.push_constant(v).map(|_| ()),
                Op::Dup => patch.dup(),
                Op::Drop => patch.drop(),
            };
            match result {
                Ok(()) => {
                    let expected = match op {
                        Op::Push(_) | Op::Dup => before + 1,
                        Op::Drop => before - 1,
                    };
                    prop_assert_eq!(patch.depth(), expected);
                }
                Err(err) => {
                    let capacity_error = matches!(
                        err,
                        PatchError::StackUnderflow { .. }
                            | PatchError::StackOverflow { .. }
                            | PatchError::AllocationExhausted { .. }
                    );
                    prop_assert!(capacity_error, "unexpected error {:?}", err);
                    prop_assert_eq!(patch.depth(), before);
                    prop_assert_eq!(patch.state(), PatchState::Aborted);
                    break;
                }
            }
        }
    }

    /// Free buffers plus distinct live stack entries always equals capacity.
    #[test]
    fn buffers_are_never_leaked(ops in prop::collection::vec(op(), 1..40)) {
        let mut patch = Patch::new(PatchConfig::default()).unwrap();
        for op in ops {
            let ok = match op {
                Op::Push(v) => patch.push_constant(v).is_ok(),
                Op::Dup => patch.dup().is_ok(),
                Op::Drop => patch.drop().is_ok(),
            };
            if !ok {
                break;
            }
            let mut live: Vec<_> = patch.stack_entries().to_vec();
            live.sort_by_key(|b| b.slot());
            live.dedup();
            prop_assert_eq!(patch.free_buffers() + live.len(), patch.buffer_capacity());
        }
    }

    /// `dup` followed by `drop` restores both the depth and the top's holds.
    #[test]
    fn dup_drop_restores_state(values in prop::collection::vec(-1.0f32..=1.0f32, 1..8)) {
        let mut patch = Patch::new(PatchConfig::default()).unwrap();
        for v in &values {
            patch.push_constant(*v).unwrap();
        }
        let top = patch.top().unwrap();
        let depth = patch.depth();
        let holds = patch.buffer_holds(top).unwrap();

        patch.dup().unwrap();
        patch.drop().unwrap();

        prop_assert_eq!(patch.depth(), depth);
        prop_assert_eq!(patch.buffer_holds(top).unwrap(), holds);
        prop_assert_eq!(patch.top(), Some(top));
    }

    /// `hold` then `unhold` leaves the free count unchanged.
    #[test]
    fn hold_unhold_is_neutral(pushes in 0usize..7) {
        let mut patch = Patch::new(PatchConfig::default()).unwrap();
        for i in 0..pushes {
            patch.push_constant(i as f32).unwrap();
        }
        let free = patch.free_buffers();
        let held = patch.hold().unwrap();
        prop_assert_eq!(patch.free_buffers(), free - 1);
        patch.unhold(held).unwrap();
        prop_assert_eq!(patch.free_buffers(), free);
    }

    /// Two identically built patches produce identical outputs.
    #[test]
    fn ticking_is_deterministic(a in -1.0f32..=1.0f32, b in -1.0f32..=1.0f32, ticks in 1u64..200) {
        let run = || {
            let mut patch = Patch::new(PatchConfig::default()).unwrap();
            patch.push_constant(a).unwrap();
            patch.push_constant(b).unwrap();
            build_sum(&mut patch).unwrap();
            let out = patch.hold_top().unwrap();
            let mut trace = Vec::new();
            for _ in 0..ticks {
                patch.tick().unwrap();
                trace.push(patch.buffer_value(out).unwrap());
            }
            trace
        };
        prop_assert_eq!(run(), run());
    }
}
