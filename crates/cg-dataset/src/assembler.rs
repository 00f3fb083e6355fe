//! Sample → report → rows loop with a bounded attempt budget.

use crate::error::{AssembleError, ConfigError};
use crate::progress::{AttemptOutcome, GenerationProgress, GenerationStats, Rejection};
use crate::sampler::DomainSampler;
use crate::schema::{Dataset, DatasetRow, StationRecord};
use cg_oracle::{EquilibriumOracle, OracleError, ReportOptions, SampleTriple};
use cg_report::{ParsedReport, ReportLayout, parse_report};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Attempts allowed per requested row when no ceiling is configured.
pub const ATTEMPTS_PER_ROW: usize = 1000;

/// Floor of the default attempt ceiling.
pub const MIN_DEFAULT_ATTEMPTS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AssemblerOptions {
    #[serde(default)]
    pub report: ReportOptions,
    /// Attempt ceiling; defaults to `target * 1000` (at least 1000)
    #[serde(default)]
    pub max_attempts: Option<usize>,
}

impl AssemblerOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_attempts == Some(0) {
            return Err(ConfigError::ZeroAttempts);
        }
        Ok(())
    }

    pub fn attempt_ceiling(&self, target: usize) -> usize {
        self.max_attempts.unwrap_or_else(|| {
            target
                .saturating_mul(ATTEMPTS_PER_ROW)
                .max(MIN_DEFAULT_ATTEMPTS)
        })
    }
}

pub type ProgressCallback = Box<dyn FnMut(&GenerationProgress) + Send>;

/// Drives one oracle until the dataset holds the requested number of rows.
pub struct DatasetAssembler<O> {
    oracle: O,
    sampler: DomainSampler,
    options: AssemblerOptions,
    layout: &'static ReportLayout,
    progress: Option<ProgressCallback>,
    stats: GenerationStats,
}

enum Attempt {
    Accepted(StationRecord),
    Rejected(Rejection),
}

impl<O: EquilibriumOracle> DatasetAssembler<O> {
    pub fn new(oracle: O, sampler: DomainSampler, options: AssemblerOptions) -> Self {
        Self {
            oracle,
            sampler,
            layout: ReportLayout::for_options(&options.report),
            options,
            progress: None,
            stats: GenerationStats::default(),
        }
    }

    /// Invoke `callback` after every attempt.
    pub fn with_progress(mut self, callback: impl FnMut(&GenerationProgress) + Send + 'static) -> Self {
        self.progress = Some(Box::new(callback));
        self
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn options(&self) -> &AssemblerOptions {
        &self.options
    }

    /// Counters of the most recent `generate` call, including failed ones.
    pub fn stats(&self) -> &GenerationStats {
        &self.stats
    }

    pub fn generate(&mut self, target: usize) -> Result<Dataset, AssembleError> {
        self.generate_with_stats(target).map(|(dataset, _)| dataset)
    }

    pub fn generate_with_stats(
        &mut self,
        target: usize,
    ) -> Result<(Dataset, GenerationStats), AssembleError> {
        self.options.validate()?;
        let pair = self.oracle.propellants().clone();
        let mut dataset = Dataset::new(pair.clone());
        self.stats = GenerationStats::default();
        if target == 0 {
            return Ok((dataset, self.stats));
        }

        let max_attempts = self.options.attempt_ceiling(target);
        let started = Instant::now();
        info!(
            pair = %pair,
            backend = self.oracle.name(),
            layout = self.layout.name,
            target,
            max_attempts,
            "Generating dataset"
        );

        while dataset.len() < target && self.stats.attempted < max_attempts {
            let sample = self.sampler.sample();
            self.stats.attempted += 1;

            let last = match self.attempt(&sample)? {
                Attempt::Accepted(record) => {
                    dataset.push(DatasetRow::new(&pair, sample, record));
                    self.stats.accepted += 1;
                    AttemptOutcome::Accepted
                }
                Attempt::Rejected(rejection) => {
                    self.stats.record(rejection);
                    debug!(
                        %sample,
                        reason = %rejection,
                        category = rejection.category(),
                        "Sample rejected"
                    );
                    AttemptOutcome::Rejected(rejection)
                }
            };

            if let Some(callback) = self.progress.as_mut() {
                callback(&GenerationProgress {
                    pair: pair.to_string(),
                    target,
                    max_attempts,
                    stats: self.stats,
                    last,
                    elapsed_wall_s: started.elapsed().as_secs_f64(),
                });
            }
        }

        let stats = self.stats;
        if dataset.len() < target {
            warn!(
                pair = %pair,
                accepted = stats.accepted,
                attempted = stats.attempted,
                "Attempt ceiling reached"
            );
            return Err(AssembleError::AttemptsExhausted {
                accepted: dataset.len(),
                attempted: stats.attempted,
            });
        }

        info!(
            pair = %pair,
            rows = dataset.len(),
            attempted = stats.attempted,
            rejected_convergence = stats.rejected_convergence(),
            rejected_extraction = stats.rejected_extraction,
            rejected_accessor = stats.rejected_accessor,
            elapsed_s = started.elapsed().as_secs_f64(),
            "Dataset complete"
        );
        Ok((dataset, stats))
    }

    fn attempt(&self, sample: &SampleTriple) -> Result<Attempt, OracleError> {
        let report = self.oracle.full_report(sample, &self.options.report)?;
        let thermo = match parse_report(report.text(), self.layout) {
            ParsedReport::Success(thermo) => thermo,
            ParsedReport::MissingStation => return Ok(Attempt::Rejected(Rejection::MissingStation)),
            ParsedReport::NonFinite => return Ok(Attempt::Rejected(Rejection::NonFinite)),
            ParsedReport::UnrecognizedLayout(err) => {
                debug!(%sample, error = %err, "Report did not match layout");
                return Ok(Attempt::Rejected(Rejection::Extraction));
            }
        };

        let direct = match self.oracle.direct_properties(sample) {
            Ok(direct) => direct,
            // A table the backend could not read is a per-sample failure.
            Err(OracleError::MalformedPlot { message }) => {
                debug!(%sample, %message, "Accessor output unreadable");
                return Ok(Attempt::Rejected(Rejection::Accessor));
            }
            Err(err) => return Err(err),
        };

        Ok(match StationRecord::new(thermo, direct) {
            Some(record) => Attempt::Accepted(record),
            None => Attempt::Rejected(Rejection::Accessor),
        })
    }
}
