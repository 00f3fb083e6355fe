//! Oracle input: one point of the sampled domain.

use cg_core::units::bar_to_atm;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One Monte Carlo draw from the (pressure, mixture ratio, area ratio) domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleTriple {
    /// Chamber pressure [bar]
    pub pressure_bar: f64,
    /// Oxidizer-to-fuel mass ratio (dimensionless)
    pub mixture_ratio: f64,
    /// Nozzle exit-to-throat area ratio (dimensionless)
    pub area_ratio: f64,
}

impl SampleTriple {
    pub fn new(pressure_bar: f64, mixture_ratio: f64, area_ratio: f64) -> Self {
        Self {
            pressure_bar,
            mixture_ratio,
            area_ratio,
        }
    }

    /// Chamber pressure re-expressed in atmospheres.
    pub fn pressure_atm(&self) -> f64 {
        bar_to_atm(self.pressure_bar)
    }
}

impl fmt::Display for SampleTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(Pc={:.3} bar, O/F={:.4}, eps={:.3})",
            self.pressure_bar, self.mixture_ratio, self.area_ratio
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atm_reexpression() {
        let s = SampleTriple::new(1.01325, 2.0, 10.0);
        assert!((s.pressure_atm() - 1.0).abs() < 1e-12);
        assert!(s.to_string().contains("O/F=2.0000"));
    }
}
