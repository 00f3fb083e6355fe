//! Cross-check of the report and accessor channels.
//!
//! The report renders density and exit Mach number, which the direct
//! accessors also return. Comparing the two on the same samples shows whether
//! a backend's channels describe the same state.

use crate::sampler::DomainSampler;
use cg_core::numeric::relative_deviation;
use cg_oracle::{EquilibriumOracle, OracleResult, ReportOptions, SampleTriple, StationTriple};
use cg_report::{ReportLayout, is_valid, parse_overlap};
use tracing::{debug, info};

/// Relative deviations for one sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelComparison {
    pub sample: SampleTriple,
    pub density: StationTriple<f64>,
    pub mach_exit: f64,
}

impl ChannelComparison {
    pub fn max_deviation(&self) -> f64 {
        self.density
            .as_array()
            .into_iter()
            .copied()
            .fold(self.mach_exit, f64::max)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ConsistencyReport {
    pub comparisons: Vec<ChannelComparison>,
    /// Samples without a usable report
    pub skipped: usize,
}

impl ConsistencyReport {
    pub fn max_density_deviation(&self) -> f64 {
        self.comparisons
            .iter()
            .flat_map(|c| c.density.as_array().map(|v| *v))
            .fold(0.0, f64::max)
    }

    pub fn max_mach_deviation(&self) -> f64 {
        self.comparisons
            .iter()
            .map(|c| c.mach_exit)
            .fold(0.0, f64::max)
    }

    /// True if every compared value agrees within `tolerance` (relative).
    pub fn within(&self, tolerance: f64) -> bool {
        self.comparisons
            .iter()
            .all(|c| c.max_deviation() <= tolerance)
    }
}

/// Compare both channels on `samples` draws. Samples whose report is rejected are skipped.
pub fn check_channels<O: EquilibriumOracle + ?Sized>(
    oracle: &O,
    sampler: &mut DomainSampler,
    samples: usize,
    options: &ReportOptions,
) -> OracleResult<ConsistencyReport> {
    let layout = ReportLayout::for_options(options);
    let mut out = ConsistencyReport::default();

    for _ in 0..samples {
        let sample = sampler.sample();
        let report = oracle.full_report(&sample, options)?;
        if !is_valid(report.text()) {
            out.skipped += 1;
            continue;
        }
        let overlap = match parse_overlap(report.text(), layout) {
            Ok(overlap) => overlap,
            Err(err) => {
                debug!(%sample, error = %err, "Overlap rows not found");
                out.skipped += 1;
                continue;
            }
        };
        let direct = oracle.direct_properties(&sample)?;

        let density = StationTriple::new(
            relative_deviation(overlap.density.chamber, direct.density.chamber),
            relative_deviation(overlap.density.throat, direct.density.throat),
            relative_deviation(overlap.density.exit, direct.density.exit),
        );
        let mach_exit = relative_deviation(overlap.mach_exit, direct.mach_exit);
        out.comparisons.push(ChannelComparison {
            sample,
            density,
            mach_exit,
        });
    }

    info!(
        backend = oracle.name(),
        compared = out.comparisons.len(),
        skipped = out.skipped,
        max_density_dev = out.max_density_deviation(),
        max_mach_dev = out.max_mach_deviation(),
        "Channel check complete"
    );
    Ok(out)
}
