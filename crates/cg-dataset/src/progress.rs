//! Generation counters and per-attempt progress events.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a sample did not become a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    /// Report stopped before the exit station
    MissingStation,
    /// Report contained non-finite values
    NonFinite,
    /// Report did not match the layout grammar
    Extraction,
    /// Accessor values unusable for this sample
    Accessor,
}

impl Rejection {
    /// Coarse category: convergence (the solver's doing) or extraction (ours).
    pub fn category(self) -> &'static str {
        match self {
            Self::MissingStation | Self::NonFinite => "convergence",
            Self::Extraction => "extraction",
            Self::Accessor => "accessor",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingStation => write!(f, "missing station"),
            Self::NonFinite => write!(f, "non-finite value"),
            Self::Extraction => write!(f, "unrecognized layout"),
            Self::Accessor => write!(f, "unusable accessor values"),
        }
    }
}

/// Counters for one `generate` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenerationStats {
    pub attempted: usize,
    pub accepted: usize,
    pub rejected_missing_station: usize,
    pub rejected_non_finite: usize,
    pub rejected_extraction: usize,
    pub rejected_accessor: usize,
}

impl GenerationStats {
    pub fn record(&mut self, rejection: Rejection) {
        match rejection {
            Rejection::MissingStation => self.rejected_missing_station += 1,
            Rejection::NonFinite => self.rejected_non_finite += 1,
            Rejection::Extraction => self.rejected_extraction += 1,
            Rejection::Accessor => self.rejected_accessor += 1,
        }
    }

    pub fn rejected(&self) -> usize {
        self.rejected_missing_station
            + self.rejected_non_finite
            + self.rejected_extraction
            + self.rejected_accessor
    }

    /// Convergence rejections (missing station + non-finite).
    pub fn rejected_convergence(&self) -> usize {
        self.rejected_missing_station + self.rejected_non_finite
    }

    pub fn acceptance_rate(&self) -> f64 {
        if self.attempted == 0 {
            0.0
        } else {
            self.accepted as f64 / self.attempted as f64
        }
    }

    /// Sum of counters from several runs.
    pub fn merged<'a>(stats: impl IntoIterator<Item = &'a GenerationStats>) -> Self {
        stats.into_iter().fold(Self::default(), |acc, s| Self {
            attempted: acc.attempted + s.attempted,
            accepted: acc.accepted + s.accepted,
            rejected_missing_station: acc.rejected_missing_station + s.rejected_missing_station,
            rejected_non_finite: acc.rejected_non_finite + s.rejected_non_finite,
            rejected_extraction: acc.rejected_extraction + s.rejected_extraction,
            rejected_accessor: acc.rejected_accessor + s.rejected_accessor,
        })
    }
}

/// Outcome of the latest attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    Accepted,
    Rejected(Rejection),
}

/// Emitted after every attempt.
#[derive(Debug, Clone)]
pub struct GenerationProgress {
    pub pair: String,
    pub target: usize,
    pub max_attempts: usize,
    pub stats: GenerationStats,
    pub last: AttemptOutcome,
    pub elapsed_wall_s: f64,
}

impl GenerationProgress {
    pub fn fraction_complete(&self) -> f64 {
        if self.target == 0 {
            1.0
        } else {
            self.stats.accepted as f64 / self.target as f64
        }
    }
}
