//! Equilibrium oracle trait and the typed values it returns.

use crate::error::OracleResult;
use crate::propellant::PropellantPair;
use crate::request::ReportOptions;
use crate::sample::SampleTriple;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One value per engine station.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct StationTriple<T> {
    pub chamber: T,
    pub throat: T,
    pub exit: T,
}

impl<T> StationTriple<T> {
    pub fn new(chamber: T, throat: T, exit: T) -> Self {
        Self {
            chamber,
            throat,
            exit,
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> StationTriple<U> {
        StationTriple {
            chamber: f(self.chamber),
            throat: f(self.throat),
            exit: f(self.exit),
        }
    }

    /// Values in chamber, throat, exit order.
    pub fn as_array(&self) -> [&T; 3] {
        [&self.chamber, &self.throat, &self.exit]
    }
}

impl StationTriple<f64> {
    pub fn is_finite(&self) -> bool {
        self.chamber.is_finite() && self.throat.is_finite() && self.exit.is_finite()
    }
}

/// Transport properties at one station.
///
/// Units follow the oracle's SI output: cp [kJ/(kg·K)], viscosity [millipoise],
/// conductivity [mW/(cm·K)], Prandtl number (dimensionless).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct TransportQuad {
    pub specific_heat: f64,
    pub viscosity: f64,
    pub conductivity: f64,
    pub prandtl: f64,
}

impl TransportQuad {
    pub fn is_finite(&self) -> bool {
        self.specific_heat.is_finite()
            && self.viscosity.is_finite()
            && self.conductivity.is_finite()
            && self.prandtl.is_finite()
    }
}

/// Quantities the oracle hands back as numbers rather than through its report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectProperties {
    /// Density [kg/m³]
    pub density: StationTriple<f64>,
    /// Mach number at the nozzle exit
    pub mach_exit: f64,
    pub transport: StationTriple<TransportQuad>,
}

impl DirectProperties {
    pub fn is_finite(&self) -> bool {
        self.density.is_finite()
            && self.mach_exit.is_finite()
            && self.transport.chamber.is_finite()
            && self.transport.throat.is_finite()
            && self.transport.exit.is_finite()
    }
}

/// Text report exactly as the oracle rendered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReport(String);

impl RawReport {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn text(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for RawReport {
    fn from(text: String) -> Self {
        Self(text)
    }
}

impl From<&str> for RawReport {
    fn from(text: &str) -> Self {
        Self(text.to_string())
    }
}

impl fmt::Display for RawReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Capability set of a chemical-equilibrium oracle.
///
/// An instance is bound to one propellant pair for its whole lifetime.
/// Implementations must be `Send` so independent pairs can run on separate
/// worker threads; a single instance is never called concurrently.
pub trait EquilibriumOracle: Send {
    /// Backend name (for logging).
    fn name(&self) -> &str;

    /// Propellant pair this oracle was built for.
    fn propellants(&self) -> &PropellantPair;

    /// Run the equilibrium problem for `sample` and return the rendered report.
    ///
    /// A sample the solver cannot converge still yields `Ok`; the failure is
    /// visible in the report text.
    fn full_report(&self, sample: &SampleTriple, options: &ReportOptions)
    -> OracleResult<RawReport>;

    /// Density, exit Mach number and per-station transport properties as numbers.
    fn direct_properties(&self, sample: &SampleTriple) -> OracleResult<DirectProperties>;
}

impl<O: EquilibriumOracle + ?Sized> EquilibriumOracle for Box<O> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn propellants(&self) -> &PropellantPair {
        (**self).propellants()
    }

    fn full_report(
        &self,
        sample: &SampleTriple,
        options: &ReportOptions,
    ) -> OracleResult<RawReport> {
        (**self).full_report(sample, options)
    }

    fn direct_properties(&self, sample: &SampleTriple) -> OracleResult<DirectProperties> {
        (**self).direct_properties(sample)
    }
}
