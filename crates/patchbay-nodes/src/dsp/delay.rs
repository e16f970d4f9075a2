//! Fixed-length circular delay line.

/// Integer-length delay: every sample written comes back out `len()` writes
/// later.
///
/// The buffer is allocated once at construction and never reallocates.
#[derive(Debug, Clone)]
pub struct DelayLine {
    buffer: Vec<f32>,
    pos: usize,
}

impl DelayLine {
    /// Creates a delay of `samples` samples (at least one).
    pub fn new(samples: usize) -> Self {
        Self {
            buffer: vec![0.0; samples.max(1)],
            pos: 0,
        }
    }

    /// Returns the delay length in samples.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Always false; a delay line holds at least one sample.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns the oldest sample, the one the next write replaces.
    #[inline]
    pub fn front(&self) -> f32 {
        self.buffer[self.pos]
    }

    /// Overwrites the oldest sample and advances.
    #[inline]
    pub fn push(&mut self, sample: f32) {
        self.buffer[self.pos] = sample;
        self.pos += 1;
        if self.pos == self.buffer.len() {
            self.pos = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impulse_returns_after_length() {
        let mut line = DelayLine::new(5);
        line.push(1.0);
        for _ in 0..4 {
            assert_eq!(line.front(), 0.0);
            line.push(0.0);
        }
        assert_eq!(line.front(), 1.0);
    }

    #[test]
    fn zero_length_is_promoted() {
        let mut line = DelayLine::new(0);
        assert_eq!(line.len(), 1);
        line.push(0.5);
        assert_eq!(line.front(), 0.5);
    }
}
