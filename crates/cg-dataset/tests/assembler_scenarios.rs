use std::cell::Cell;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use cg_dataset::{
    AssembleError, AssemblerOptions, DatasetAssembler, DomainBounds, DomainSampler, Interval,
};
use cg_oracle::{
    AnalyticOracle, DirectProperties, EquilibriumOracle, OracleError, OracleResult,
    PropellantPair, RawReport, ReportOptions, SampleTriple, UnitSystem,
};

fn analytic(fuel: &str, oxidizer: &str) -> AnalyticOracle {
    AnalyticOracle::new(PropellantPair::new(fuel, oxidizer)).unwrap()
}

fn seeded(seed: u64) -> DomainSampler {
    DomainSampler::with_seed(DomainBounds::default(), seed).unwrap()
}

/// How the scripted oracle answers attempt `n` (1-based).
#[derive(Clone, Copy)]
enum Script {
    NeverConverges,
    EverySecond,
    BrokenExecutable,
    UnreadablePlot,
}

/// Answers with a fixed converged CH4/LOX case, or a failure, as scripted.
struct ScriptedOracle {
    inner: AnalyticOracle,
    script: Script,
    calls: Cell<usize>,
}

impl ScriptedOracle {
    fn new(script: Script) -> Self {
        Self {
            inner: analytic("CH4", "LOX"),
            script,
            calls: Cell::new(0),
        }
    }

    fn fixed() -> SampleTriple {
        SampleTriple::new(20.0, 3.0, 10.0)
    }
}

impl EquilibriumOracle for ScriptedOracle {
    fn name(&self) -> &str {
        "scripted"
    }

    fn propellants(&self) -> &PropellantPair {
        self.inner.propellants()
    }

    fn full_report(&self, _sample: &SampleTriple, options: &ReportOptions) -> OracleResult<RawReport> {
        let n = self.calls.get() + 1;
        self.calls.set(n);
        match self.script {
            Script::NeverConverges => Ok(RawReport::new(" CHAMBER\n T, K  900.0\n CALCULATIONS STOPPED\n")),
            Script::EverySecond if n % 2 == 1 => Ok(RawReport::new(" CHAMBER   THROAT\n T, K  NaN\n")),
            Script::BrokenExecutable => Err(OracleError::ExitStatus {
                code: Some(2),
                stderr: "thermo.lib not found".to_string(),
            }),
            _ => self.inner.full_report(&Self::fixed(), options),
        }
    }

    fn direct_properties(&self, _sample: &SampleTriple) -> OracleResult<DirectProperties> {
        match self.script {
            Script::UnreadablePlot => Err(OracleError::MalformedPlot {
                message: "expected 3 station rows, found 1".to_string(),
            }),
            _ => self.inner.direct_properties(&Self::fixed()),
        }
    }
}

#[test]
fn single_row_over_default_domain() {
    let mut assembler =
        DatasetAssembler::new(analytic("CH4", "LOX"), seeded(2024), AssemblerOptions::default());
    let dataset = assembler.generate(1).unwrap();
    assert_eq!(dataset.len(), 1);

    let row = &dataset.rows()[0];
    assert_eq!(row.fuel, "CH4");
    assert_eq!(row.oxidizer, "LOX");
    assert!(DomainBounds::default().contains(&row.sample));
    let t = &row.record.thermo().temperature;
    assert!(t.chamber > t.throat, "{t:?}");
    assert!(t.throat > t.exit, "{t:?}");
    assert!(row.values().iter().all(|v| v.is_finite()));
}

#[test]
fn exact_row_count_and_consistent_stats() {
    let mut assembler =
        DatasetAssembler::new(analytic("RP-1", "LOX"), seeded(11), AssemblerOptions::default());
    let (dataset, stats) = assembler.generate_with_stats(25).unwrap();
    assert_eq!(dataset.len(), 25);
    assert_eq!(stats.accepted, 25);
    assert_eq!(stats.accepted + stats.rejected(), stats.attempted);
    assert!(stats.rejected_convergence() > 0, "default domain includes infeasible mixtures");
    assert_eq!(stats.rejected_extraction, 0);
    assert_eq!(assembler.stats(), &stats);
}

#[test]
fn rows_respect_custom_bounds() {
    let bounds = DomainBounds {
        pressure_bar: Interval::new(30.0, 40.0),
        mixture_ratio: Interval::new(4.0, 6.0),
        area_ratio: Interval::new(20.0, 30.0),
    };
    let sampler = DomainSampler::with_seed(bounds, 3).unwrap();
    let mut assembler = DatasetAssembler::new(analytic("LH2", "LOX"), sampler, AssemblerOptions::default());
    let (dataset, stats) = assembler.generate_with_stats(10).unwrap();
    assert_eq!(stats.attempted, 10);
    for row in dataset.rows() {
        assert!(bounds.contains(&row.sample));
        assert!(row.record.thermo().pressure_exit < row.record.thermo().pressure_throat);
    }
}

#[test]
fn atmosphere_reports_yield_bar_pressures() {
    let options = AssemblerOptions {
        report: ReportOptions::default().with_unit_system(UnitSystem::Atmospheres),
        max_attempts: None,
    };
    let mut atm = DatasetAssembler::new(analytic("CH4", "LOX"), seeded(5), options);
    let mut si = DatasetAssembler::new(analytic("CH4", "LOX"), seeded(5), AssemblerOptions::default());
    let a = atm.generate(5).unwrap();
    let b = si.generate(5).unwrap();
    for (ra, rb) in a.rows().iter().zip(b.rows()) {
        assert_eq!(ra.sample, rb.sample);
        let (pa, pb) = (ra.record.thermo().pressure_throat, rb.record.thermo().pressure_throat);
        assert!((pa - pb).abs() <= 2e-4 * pb, "{pa} vs {pb}");
    }
}

#[test]
fn ceiling_reports_exact_counts() {
    let options = AssemblerOptions {
        max_attempts: Some(17),
        ..Default::default()
    };
    let mut assembler = DatasetAssembler::new(ScriptedOracle::new(Script::NeverConverges), seeded(1), options);
    match assembler.generate(3) {
        Err(AssembleError::AttemptsExhausted { accepted, attempted }) => {
            assert_eq!(accepted, 0);
            assert_eq!(attempted, 17);
        }
        other => panic!("expected AttemptsExhausted, got {other:?}"),
    }
    assert_eq!(assembler.stats().rejected_missing_station, 17);
    assert_eq!(assembler.oracle().calls.get(), 17);
}

#[test]
fn partial_progress_before_ceiling() {
    let options = AssemblerOptions {
        max_attempts: Some(7),
        ..Default::default()
    };
    let mut assembler = DatasetAssembler::new(ScriptedOracle::new(Script::EverySecond), seeded(1), options);
    match assembler.generate(10) {
        Err(AssembleError::AttemptsExhausted { accepted, attempted }) => {
            assert_eq!(accepted, 3);
            assert_eq!(attempted, 7);
        }
        other => panic!("expected AttemptsExhausted, got {other:?}"),
    }
    assert_eq!(assembler.stats().rejected_non_finite, 4);
}

#[test]
fn stops_as_soon_as_target_is_met() {
    let mut assembler = DatasetAssembler::new(
        ScriptedOracle::new(Script::EverySecond),
        seeded(1),
        AssemblerOptions::default(),
    );
    let (dataset, stats) = assembler.generate_with_stats(4).unwrap();
    assert_eq!(dataset.len(), 4);
    assert_eq!(stats.attempted, 8);
}

#[test]
fn infrastructure_errors_are_fatal() {
    let mut assembler = DatasetAssembler::new(
        ScriptedOracle::new(Script::BrokenExecutable),
        seeded(1),
        AssemblerOptions::default(),
    );
    let err = assembler.generate(5).unwrap_err();
    assert!(matches!(err, AssembleError::Oracle(OracleError::ExitStatus { .. })));
    assert_eq!(assembler.oracle().calls.get(), 1);
}

#[test]
fn unreadable_accessor_output_rejects_the_sample() {
    let options = AssemblerOptions {
        max_attempts: Some(4),
        ..Default::default()
    };
    let mut assembler = DatasetAssembler::new(ScriptedOracle::new(Script::UnreadablePlot), seeded(1), options);
    assert!(matches!(
        assembler.generate(1),
        Err(AssembleError::AttemptsExhausted { accepted: 0, attempted: 4 })
    ));
    assert_eq!(assembler.stats().rejected_accessor, 4);
}

#[test]
fn progress_is_reported_after_every_attempt() {
    let seen = Arc::new(AtomicUsize::new(0));
    let last_accepted = Arc::new(AtomicUsize::new(0));
    let (seen_cb, accepted_cb) = (Arc::clone(&seen), Arc::clone(&last_accepted));

    let mut assembler = DatasetAssembler::new(analytic("N2H4", "N2O4"), seeded(8), AssemblerOptions::default())
        .with_progress(move |p| {
            seen_cb.fetch_add(1, Ordering::SeqCst);
            accepted_cb.store(p.stats.accepted, Ordering::SeqCst);
            assert!(p.fraction_complete() <= 1.0);
        });
    let (_, stats) = assembler.generate_with_stats(6).unwrap();
    assert_eq!(seen.load(Ordering::SeqCst), stats.attempted);
    assert_eq!(last_accepted.load(Ordering::SeqCst), 6);
}
