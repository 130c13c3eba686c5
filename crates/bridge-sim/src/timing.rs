//! Random delays: exponential interarrival times and normally
//! distributed crossing times, scaled by the configured time scale.

use rand::Rng;
use rand_distr::{Distribution, Exp, Normal};
use std::time::Duration;

use crate::config::CrossingTime;
use crate::error::SimError;
use crate::Result;

/// Samples the gap before the next arrival.
#[derive(Debug, Clone, Copy)]
pub struct Arrivals {
    gap: Exp<f64>,
    time_scale: f64,
}

impl Arrivals {
    /// Exponential gaps with the given mean, in seconds.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] if the mean is not positive.
    pub fn new(mean: f64, time_scale: f64) -> Result<Self> {
        let gap = Exp::new(1.0 / mean)
            .map_err(|e| SimError::InvalidConfig(format!("interarrival mean {mean}: {e}")))?;
        Ok(Self { gap, time_scale })
    }

    /// Draws the next gap.
    pub fn next_gap<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        scaled(self.gap.sample(rng), self.time_scale)
    }
}

/// Samples time spent on the bridge.
#[derive(Debug, Clone, Copy)]
pub struct Crossings {
    time: Normal<f64>,
    time_scale: f64,
}

impl Crossings {
    /// Normal crossing times, clamped at zero.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] for a negative or non-finite
    /// standard deviation.
    pub fn new(crossing: CrossingTime, time_scale: f64) -> Result<Self> {
        let time = Normal::new(crossing.mean, crossing.std_dev).map_err(|e| {
            SimError::InvalidConfig(format!(
                "crossing time ({}, {}): {e}",
                crossing.mean, crossing.std_dev
            ))
        })?;
        Ok(Self { time, time_scale })
    }

    /// Draws one crossing time.
    pub fn next_crossing<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        scaled(self.time.sample(rng), self.time_scale)
    }
}

fn scaled(seconds: f64, time_scale: f64) -> Duration {
    let seconds = seconds * time_scale;
    if seconds.is_finite() && seconds > 0.0 {
        Duration::from_secs_f64(seconds)
    } else {
        Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_scaled_clamps_negative() {
        assert_eq!(scaled(-3.0, 1.0), Duration::ZERO);
        assert_eq!(scaled(2.0, 0.5), Duration::from_secs(1));
        assert_eq!(scaled(f64::NAN, 1.0), Duration::ZERO);
    }

    #[test]
    fn test_arrivals_mean_is_close() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let arrivals = Arrivals::new(0.5, 1.0).unwrap();
        let total: f64 = (0..10_000)
            .map(|_| arrivals.next_gap(&mut rng).as_secs_f64())
            .sum();
        let mean = total / 10_000.0;
        assert!((mean - 0.5).abs() < 0.05, "mean {mean}");
    }

    #[test]
    fn test_crossings_are_never_negative() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        // Mean close to zero: many raw samples fall below it.
        let crossings = Crossings::new(CrossingTime::new(0.1, 1.0), 1.0).unwrap();
        let zeros = (0..1_000)
            .map(|_| crossings.next_crossing(&mut rng))
            .filter(|d| d.is_zero())
            .count();
        assert!(zeros > 0);
    }

    #[test]
    fn test_time_scale_compresses_delays() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let crossings = Crossings::new(CrossingTime::new(30.0, 0.0), 0.001).unwrap();
        let sample = crossings.next_crossing(&mut rng).as_secs_f64();
        assert!((sample - 0.030).abs() < 1e-6, "{sample}");
    }

    #[test]
    fn test_same_seed_same_delays() {
        let arrivals = Arrivals::new(5.0, 1.0).unwrap();
        let draw = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            (0..5).map(|_| arrivals.next_gap(&mut rng)).collect::<Vec<_>>()
        };
        assert_eq!(draw(9), draw(9));
        assert_ne!(draw(9), draw(10));
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(Crossings::new(CrossingTime::new(1.0, -1.0), 1.0).is_err());
    }
}
