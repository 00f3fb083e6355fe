//! Output-format flags passed to the oracle alongside each sample.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit system the oracle renders its report in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UnitSystem {
    /// SI output: pressures in bar, densities in kg/m³.
    #[default]
    Si,
    /// Legacy output: pressures in atm, densities in g/cm³.
    Atmospheres,
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Si => write!(f, "SI"),
            Self::Atmospheres => write!(f, "atm"),
        }
    }
}

/// Report formatting requested from the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    #[serde(default)]
    pub unit_system: UnitSystem,
    /// Full report (mole fractions, thermodynamic derivatives) instead of the short one.
    #[serde(default)]
    pub verbose: bool,
    /// Include the transport-property block.
    #[serde(default = "default_transport")]
    pub transport: bool,
}

fn default_transport() -> bool {
    true
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            unit_system: UnitSystem::Si,
            verbose: false,
            transport: true,
        }
    }
}

impl ReportOptions {
    pub fn with_unit_system(mut self, unit_system: UnitSystem) -> Self {
        self.unit_system = unit_system;
        self
    }
}
