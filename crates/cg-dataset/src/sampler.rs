//! Monte Carlo sampling of the (pressure, mixture ratio, area ratio) domain.

use crate::error::ConfigError;
use cg_oracle::SampleTriple;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Half-open interval `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, v: f64) -> bool {
        v >= self.min && v < self.max
    }

    fn validate(&self, dimension: &'static str) -> Result<(), ConfigError> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(ConfigError::NonFiniteBound { dimension });
        }
        if self.min >= self.max {
            return Err(ConfigError::InvalidBounds {
                dimension,
                min: self.min,
                max: self.max,
            });
        }
        // Uniform sampling needs max - min to be representable.
        if !(self.max - self.min).is_finite() {
            return Err(ConfigError::UnsampleableWidth {
                dimension,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Sampling bounds for the three input dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainBounds {
    /// Chamber pressure [bar]
    pub pressure_bar: Interval,
    pub mixture_ratio: Interval,
    pub area_ratio: Interval,
}

impl Default for DomainBounds {
    fn default() -> Self {
        Self {
            pressure_bar: Interval::new(2.5, 750.0),
            mixture_ratio: Interval::new(0.01, 50.0),
            area_ratio: Interval::new(1.0, 200.0),
        }
    }
}

impl DomainBounds {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pressure_bar.validate("pressure")?;
        self.mixture_ratio.validate("mixture")?;
        self.area_ratio.validate("area_ratio")?;
        Ok(())
    }

    pub fn contains(&self, sample: &SampleTriple) -> bool {
        self.pressure_bar.contains(sample.pressure_bar)
            && self.mixture_ratio.contains(sample.mixture_ratio)
            && self.area_ratio.contains(sample.area_ratio)
    }
}

/// Uniform sampler over validated [`DomainBounds`].
#[derive(Debug, Clone)]
pub struct DomainSampler {
    bounds: DomainBounds,
    rng: StdRng,
}

impl DomainSampler {
    /// Sampler seeded from OS entropy.
    pub fn new(bounds: DomainBounds) -> Result<Self, ConfigError> {
        bounds.validate()?;
        Ok(Self {
            bounds,
            rng: StdRng::from_os_rng(),
        })
    }

    /// Reproducible sampler.
    pub fn with_seed(bounds: DomainBounds, seed: u64) -> Result<Self, ConfigError> {
        bounds.validate()?;
        Ok(Self {
            bounds,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn bounds(&self) -> &DomainBounds {
        &self.bounds
    }

    fn draw(rng: &mut StdRng, interval: &Interval) -> f64 {
        // Float rounding can land exactly on `max`.
        loop {
            let v = rng.random_range(interval.min..interval.max);
            if v < interval.max {
                return v;
            }
        }
    }

    pub fn sample(&mut self) -> SampleTriple {
        let pressure = Self::draw(&mut self.rng, &self.bounds.pressure_bar);
        let mixture = Self::draw(&mut self.rng, &self.bounds.mixture_ratio);
        let area = Self::draw(&mut self.rng, &self.bounds.area_ratio);
        SampleTriple::new(pressure, mixture, area)
    }

    pub fn sample_many(&mut self, n: usize) -> Vec<SampleTriple> {
        (0..n).map(|_| self.sample()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn default_bounds_are_valid() {
        assert!(DomainBounds::default().validate().is_ok());
    }

    #[test]
    fn inverted_and_empty_bounds_fail() {
        let mut bounds = DomainBounds::default();
        bounds.mixture_ratio = Interval::new(5.0, 5.0);
        assert!(matches!(
            DomainSampler::new(bounds),
            Err(ConfigError::InvalidBounds {
                dimension: "mixture",
                ..
            })
        ));

        let mut bounds = DomainBounds::default();
        bounds.pressure_bar = Interval::new(100.0, 10.0);
        assert!(DomainSampler::with_seed(bounds, 1).is_err());

        let mut bounds = DomainBounds::default();
        bounds.area_ratio = Interval::new(1.0, f64::INFINITY);
        assert!(matches!(
            DomainSampler::new(bounds),
            Err(ConfigError::NonFiniteBound { .. })
        ));
    }

    #[test]
    fn overflowing_width_fails_at_construction() {
        let mut bounds = DomainBounds::default();
        bounds.area_ratio = Interval::new(-1.0e308, 1.0e308);
        assert!(matches!(
            DomainSampler::with_seed(bounds, 3),
            Err(ConfigError::UnsampleableWidth {
                dimension: "area_ratio",
                ..
            })
        ));

        // Widest interval that still samples.
        bounds.area_ratio = Interval::new(-8.0e307, 8.0e307);
        let mut sampler = DomainSampler::with_seed(bounds, 3).unwrap();
        for s in sampler.sample_many(16) {
            assert!(bounds.contains(&s));
        }
    }

    #[test]
    fn seeded_samplers_repeat() {
        let bounds = DomainBounds::default();
        let a = DomainSampler::with_seed(bounds, 42).unwrap().sample_many(16);
        let b = DomainSampler::with_seed(bounds, 42).unwrap().sample_many(16);
        assert_eq!(a, b);
        let c = DomainSampler::with_seed(bounds, 43).unwrap().sample_many(16);
        assert_ne!(a, c);
    }

    #[test]
    fn tiny_interval_stays_half_open() {
        let bounds = DomainBounds {
            pressure_bar: Interval::new(1.0, 1.0 + f64::EPSILON),
            ..DomainBounds::default()
        };
        let mut sampler = DomainSampler::with_seed(bounds, 7).unwrap();
        for s in sampler.sample_many(200) {
            assert_eq!(s.pressure_bar, 1.0);
        }
    }

    fn interval() -> impl Strategy<Value = Interval> {
        (-1.0e3f64..1.0e3, 1.0e-6f64..1.0e3).prop_map(|(lo, width)| Interval::new(lo, lo + width))
    }

    proptest! {
        #[test]
        fn samples_lie_within_bounds(
            seed in any::<u64>(),
            pressure_bar in interval(),
            mixture_ratio in interval(),
            area_ratio in interval(),
        ) {
            let bounds = DomainBounds {
                pressure_bar,
                mixture_ratio,
                area_ratio,
            };
            prop_assume!(bounds.validate().is_ok());
            let mut sampler = DomainSampler::with_seed(bounds, seed).unwrap();
            for sample in sampler.sample_many(32) {
                prop_assert!(bounds.contains(&sample), "{sample}");
            }
        }
    }
}
