//! Stereo feedback reverb.
//!
//! Each channel runs eight parallel damped combs into four series allpasses
//! (the Freeverb topology). The right channel's delays are offset by a few
//! samples so the two tails decorrelate. Delay lengths are tuned at 44.1 kHz
//! and scaled to the patch sample rate.

use core::f32::consts::PI;

use patchbay_core::{CableBus, CableId, NodeId, Patch, PatchError, TickContext, Unit};

use crate::dsp::{AllpassFilter, CombFilter};
use crate::wire;

const COMB_TUNING: [usize; 8] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];
const ALLPASS_TUNING: [usize; 4] = [556, 441, 341, 225];
const STEREO_SPREAD: usize = 23;
const TUNING_RATE: f32 = 44100.0;
/// Keeps eight summed combs near unity for full-scale input.
const INPUT_GAIN: f32 = 0.015;

fn scaled(samples: usize, sample_rate: f32) -> usize {
    ((samples as f32 * sample_rate / TUNING_RATE).round() as usize).max(1)
}

/// Cables of a `revsc` node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevscPorts {
    /// The node.
    pub node: NodeId,
    /// Left input.
    pub in1: CableId,
    /// Right input.
    pub in2: CableId,
    /// Comb feedback, 0 to 0.99; higher is a longer tail.
    pub feedback: CableId,
    /// Cutoff of the damping lowpass inside the feedback loops, in Hz.
    pub lpfreq: CableId,
    /// Left output.
    pub out1: CableId,
    /// Right output.
    pub out2: CableId,
}

struct Channel {
    combs: [CombFilter; 8],
    allpasses: [AllpassFilter; 4],
}

impl Channel {
    fn new(sample_rate: f32, offset: usize) -> Self {
        Self {
            combs: core::array::from_fn(|i| {
                CombFilter::new(scaled(COMB_TUNING[i] + offset, sample_rate))
            }),
            allpasses: core::array::from_fn(|i| {
                AllpassFilter::new(scaled(ALLPASS_TUNING[i] + offset, sample_rate))
            }),
        }
    }

    fn configure(&mut self, feedback: f32, damp: f32) {
        for comb in &mut self.combs {
            comb.set_feedback(feedback);
            comb.set_damp(damp);
        }
    }

    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let x = input * INPUT_GAIN;
        let mut acc = 0.0;
        for comb in &mut self.combs {
            acc += comb.process(x);
        }
        for ap in &mut self.allpasses {
            acc = ap.process(acc);
        }
        acc
    }
}

/// Stereo comb/allpass reverb.
pub struct Revsc {
    ports: RevscPorts,
    left: Channel,
    right: Channel,
    feedback: f32,
    lpfreq: f32,
}

impl Revsc {
    /// Word in the patch language.
    pub const KIND: &'static str = "revsc";

    /// Creates the node with default feedback 0.97 and damping cutoff 10 kHz.
    pub fn build(patch: &mut Patch) -> Result<RevscPorts, PatchError> {
        let mut node = patch.new_node(Self::KIND)?;
        let sample_rate = node.sample_rate();
        let ports = RevscPorts {
            node: node.id(),
            in1: node.input("in1", 0.0),
            in2: node.input("in2", 0.0),
            feedback: node.input("feedback", 0.97),
            lpfreq: node.input("lpfreq", 10000.0),
            out1: node.output("out1"),
            out2: node.output("out2"),
        };
        node.finish(Self {
            ports,
            left: Channel::new(sample_rate, 0),
            right: Channel::new(sample_rate, STEREO_SPREAD),
            feedback: f32::NAN,
            lpfreq: f32::NAN,
        })?;
        Ok(ports)
    }
}

/// One-pole damping coefficient for a cutoff in Hz.
fn damping(lpfreq: f32, sample_rate: f32) -> f32 {
    let cutoff = lpfreq.clamp(1.0, sample_rate * 0.5);
    libm::expf(-2.0 * PI * cutoff / sample_rate)
}

impl Unit for Revsc {
    fn compute(&mut self, bus: &mut CableBus<'_>, ctx: &TickContext) {
        let p = self.ports;
        let feedback = bus.read(p.feedback);
        let lpfreq = bus.read(p.lpfreq);
        if feedback != self.feedback || lpfreq != self.lpfreq {
            let damp = damping(lpfreq, ctx.sample_rate);
            self.left.configure(feedback, damp);
            self.right.configure(feedback, damp);
            self.feedback = feedback;
            self.lpfreq = lpfreq;
        }
        let l = self.left.process(bus.read(p.in1));
        let r = self.right.process(bus.read(p.in2));
        bus.write(p.out1, l);
        bus.write(p.out2, r);
    }
}

/// `in1 in2 feedback lpfreq revsc -- out1 out2`
pub fn revsc(patch: &mut Patch) -> Result<RevscPorts, PatchError> {
    let sources = patch.pop_inputs::<4>()?;
    let ports = Revsc::build(patch)?;
    wire(
        patch,
        sources,
        [ports.in1, ports.in2, ports.feedback, ports.lpfreq],
    )?;
    patch.push_cable(ports.out1)?;
    patch.push_cable(ports.out2)?;
    Ok(ports)
}
