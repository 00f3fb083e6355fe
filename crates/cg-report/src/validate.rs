//! Accept/reject policy for raw reports.

/// Present only when the solver produced every station up to the nozzle exit.
pub const STATION_MARKER: &str = "EXIT";

/// Emitted by the solver for any non-finite value.
pub const NON_FINITE_MARKER: &str = "NaN";

/// Outcome of [`inspect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    Valid,
    /// The report stops before the exit station.
    MissingStation,
    /// The report contains a non-finite value.
    NonFinite,
}

impl Validation {
    pub fn is_valid(self) -> bool {
        self == Self::Valid
    }
}

/// Classify a report. A non-finite marker wins over a missing station.
pub fn inspect(report: &str) -> Validation {
    if report.contains(NON_FINITE_MARKER) {
        Validation::NonFinite
    } else if !report.contains(STATION_MARKER) {
        Validation::MissingStation
    } else {
        Validation::Valid
    }
}

/// True iff the report reaches the exit station and holds no non-finite value.
pub fn is_valid(report: &str) -> bool {
    inspect(report).is_valid()
}
