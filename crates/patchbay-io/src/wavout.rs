//! WAV file sink.
//!
//! `wavout` writes every sample of its input to a mono WAV file at the patch
//! sample rate and forwards the input unchanged on `out`. The file is created
//! when the node is built and its header is finalized when the patch is closed
//! (or dropped).

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use hound::WavWriter;
use patchbay_core::{
    CableBus, CableId, NodeId, Patch, PatchError, SetupContext, SetupError, TickContext, Unit,
};

use crate::wav::WavSpec;

/// Cables of a `wavout` node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavoutPorts {
    /// The node.
    pub node: NodeId,
    /// Signal written to disk.
    pub input: CableId,
    /// Passthrough of the input.
    pub out: CableId,
}

/// Mono WAV writer.
pub struct Wavout {
    ports: WavoutPorts,
    path: PathBuf,
    spec: WavSpec,
    writer: Option<WavWriter<BufWriter<File>>>,
    // First write error; later samples are discarded.
    error: Option<hound::Error>,
    frames: u64,
}

impl std::fmt::Debug for Wavout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wavout")
            .field("path", &self.path)
            .field("spec", &self.spec)
            .field("open", &self.writer.is_some())
            .field("frames", &self.frames)
            .finish()
    }
}

impl Wavout {
    /// Word in the patch language.
    pub const KIND: &'static str = "wavout";
    /// 32-bit IEEE float.
    pub const DEFAULT_BITS: u16 = 32;

    /// Creates a sink writing `path` with the given sample depth.
    ///
    /// Depths other than 16, 24 and 32 bits fail setup, as does a path that
    /// cannot be created.
    pub fn build(
        patch: &mut Patch,
        path: impl AsRef<Path>,
        bits_per_sample: u16,
    ) -> Result<WavoutPorts, PatchError> {
        let spec = WavSpec {
            channels: 1,
            sample_rate: patch.sample_rate(),
            bits_per_sample,
        };
        let mut node = patch.new_node(Self::KIND)?;
        let ports = WavoutPorts {
            node: node.id(),
            input: node.input("in", 0.0),
            out: node.output("out"),
        };
        node.finish(Self {
            ports,
            path: path.as_ref().to_path_buf(),
            spec,
            writer: None,
            error: None,
            frames: 0,
        })?;
        Ok(ports)
    }

    /// Output file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Samples handed to the writer so far.
    pub fn frames_written(&self) -> u64 {
        self.frames
    }

    /// True once the header has been finalized.
    pub fn is_finalized(&self) -> bool {
        self.writer.is_none()
    }

    fn write(writer: &mut WavWriter<BufWriter<File>>, bits: u16, v: f32) -> hound::Result<()> {
        let v = if v.is_finite() { v } else { 0.0 };
        match bits {
            32 => writer.write_sample(v),
            _ => {
                let full_scale = ((1i32 << (bits - 1)) - 1) as f32;
                writer.write_sample((v.clamp(-1.0, 1.0) * full_scale) as i32)
            }
        }
    }
}

impl Unit for Wavout {
    fn setup(&mut self, _ctx: &SetupContext) -> Result<(), SetupError> {
        let spec = self
            .spec
            .to_hound()
            .map_err(|e| SetupError::with_source(format!("cannot write {}", self.path.display()), e))?;
        let writer = WavWriter::create(&self.path, spec).map_err(|e| {
            SetupError::with_source(format!("cannot create {}", self.path.display()), e)
        })?;
        tracing::debug!(
            path = %self.path.display(),
            sample_rate = spec.sample_rate,
            bits = spec.bits_per_sample,
            "wav output opened"
        );
        self.writer = Some(writer);
        Ok(())
    }

    fn compute(&mut self, bus: &mut CableBus<'_>, _ctx: &TickContext) {
        let v = bus.read(self.ports.input);
        bus.write(self.ports.out, v);

        if self.error.is_some() {
            return;
        }
        if let Some(writer) = self.writer.as_mut() {
            match Self::write(writer, self.spec.bits_per_sample, v) {
                Ok(()) => self.frames += 1,
                Err(err) => self.error = Some(err),
            }
        }
    }

    fn teardown(&mut self) -> Result<(), SetupError> {
        let Some(writer) = self.writer.take() else {
            return Ok(());
        };
        let finalized = writer.finalize();
        if let Some(err) = self.error.take() {
            return Err(SetupError::with_source(
                format!("writing {} failed after {} frames", self.path.display(), self.frames),
                err,
            ));
        }
        finalized.map_err(|e| {
            SetupError::with_source(format!("cannot finalize {}", self.path.display()), e)
        })?;
        tracing::info!(
            path = %self.path.display(),
            frames = self.frames,
            "wav output finalized"
        );
        Ok(())
    }
}

/// `in wavout -- out`, writing 32-bit float samples.
pub fn wavout(patch: &mut Patch, path: impl AsRef<Path>) -> Result<WavoutPorts, PatchError> {
    wavout_with_depth(patch, path, Wavout::DEFAULT_BITS)
}

/// Stack-form `wavout` with an explicit sample depth.
pub fn wavout_with_depth(
    patch: &mut Patch,
    path: impl AsRef<Path>,
    bits_per_sample: u16,
) -> Result<WavoutPorts, PatchError> {
    let [source] = patch.pop_inputs::<1>()?;
    let ports = Wavout::build(patch, path, bits_per_sample)?;
    patch.connect(source, ports.input)?;
    patch.push_cable(ports.out)?;
    Ok(ports)
}

#[cfg(test)]
mod tests {
    use super::*;
    use patchbay_core::PatchConfig;

    #[test]
    fn sixteen_bit_samples_are_scaled_and_clamped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("int.wav");
        let mut patch = Patch::new(PatchConfig::default()).unwrap();
        patch.push_constant(2.0).unwrap();
        let ports = wavout_with_depth(&mut patch, &path, 16).unwrap();
        patch.drop().unwrap();
        patch.run(4).unwrap();
        assert_eq!(patch.unit::<Wavout>(ports.node).unwrap().frames_written(), 4);
        patch.close().unwrap();

        let reader = hound::WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().sample_format, hound::SampleFormat::Int);
        let samples: Vec<i16> = reader.into_samples().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![i16::MAX; 4]);
    }

    #[test]
    fn unsupported_depth_fails_setup() {
        let dir = tempfile::tempdir().unwrap();
        let mut patch = Patch::new(PatchConfig::default()).unwrap();
        patch.push_constant(0.0).unwrap();
        let err = wavout_with_depth(&mut patch, dir.path().join("x.wav"), 8).unwrap_err();
        assert!(matches!(err, PatchError::SinkSetupFailure { kind: "wavout", .. }));
    }
}
