//! Interval averaging of raw pressure readings

/// Accumulates raw readings between telemetry reductions
///
/// `add` runs every loop tick, `drain_average` once per sampling interval.
/// Only the control loop touches it, so draining needs no synchronisation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PressureSampler {
    sum: f64,
    count: u32,
}

impl PressureSampler {
    /// Empty accumulator
    pub const fn new() -> Self {
        Self { sum: 0.0, count: 0 }
    }

    /// Accumulate one reading
    pub fn add(&mut self, sample: f64) {
        self.sum += sample;
        self.count = self.count.saturating_add(1);
    }

    /// Mean of everything added since the last drain, or 0 when empty
    ///
    /// Resets the accumulator.
    pub fn drain_average(&mut self) -> f64 {
        let average = if self.count == 0 {
            0.0
        } else {
            self.sum / f64::from(self.count)
        };
        *self = Self::new();
        average
    }

    /// Readings waiting to be reduced
    pub fn len(&self) -> u32 {
        self.count
    }

    /// No readings pending
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drains_mean_and_resets() {
        let mut sampler = PressureSampler::new();
        sampler.add(100_000.0);
        sampler.add(100_010.0);
        sampler.add(100_020.0);

        assert_eq!(sampler.len(), 3);
        assert!((sampler.drain_average() - 100_010.0).abs() < 1e-9);
        assert!(sampler.is_empty());
        assert_eq!(sampler.drain_average(), 0.0);
    }
}
