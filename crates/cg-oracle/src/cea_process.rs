//! NASA CEA backend driven through its executable.
//!
//! Each call writes a rocket-problem deck into the CEA data directory (where
//! `thermo.lib` and `trans.lib` live), runs the executable with the deck name
//! on stdin, and reads back `<case>.out` (the report) and `<case>.plt` (the
//! numeric table behind [`EquilibriumOracle::direct_properties`]).

use crate::deck::{PLOT_VARIABLES, render_deck};
use crate::error::{OracleError, OracleResult};
use crate::model::{DirectProperties, EquilibriumOracle, RawReport, StationTriple, TransportQuad};
use crate::propellant::PropellantPair;
use crate::request::{ReportOptions, UnitSystem};
use crate::sample::SampleTriple;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};

static CASE_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Location of the CEA executable and its data directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CeaConfig {
    /// Path to the CEA executable (e.g. `FCEA2`)
    pub executable: PathBuf,
    /// Directory holding `thermo.lib` / `trans.lib`; decks are written here
    pub data_dir: PathBuf,
    /// Keep `.inp`/`.out`/`.plt` files after each call
    #[serde(default)]
    pub keep_files: bool,
}

impl CeaConfig {
    pub fn new(executable: impl Into<PathBuf>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            data_dir: data_dir.into(),
            keep_files: false,
        }
    }
}

/// Output of one CEA run.
#[derive(Debug, Clone)]
struct CaseOutput {
    report: String,
    plot: Option<String>,
}

/// CEA executable oracle bound to one propellant pair.
pub struct CeaProcessOracle {
    pair: PropellantPair,
    config: CeaConfig,
    // The last SI run's plot table when it carried transport columns, so an
    // accessor call right after a report for the same sample does not run CEA twice.
    last_plot: RefCell<Option<(SampleTriple, String)>>,
}

impl CeaProcessOracle {
    pub const NAME: &'static str = "cea";

    pub fn new(pair: PropellantPair, config: CeaConfig) -> OracleResult<Self> {
        if pair.fuel.trim().is_empty() || pair.oxidizer.trim().is_empty() {
            return Err(OracleError::InvalidArg {
                what: "propellant identifiers must be non-empty",
            });
        }
        if !config.data_dir.is_dir() {
            return Err(OracleError::io(
                format!("CEA data directory {}", config.data_dir.display()),
                std::io::Error::new(std::io::ErrorKind::NotFound, "not a directory"),
            ));
        }
        Ok(Self {
            pair,
            config,
            last_plot: RefCell::new(None),
        })
    }

    pub fn config(&self) -> &CeaConfig {
        &self.config
    }

    fn next_case_name() -> String {
        // CEA truncates long case names; keep it short and unique per process.
        let n = CASE_COUNTER.fetch_add(1, Ordering::Relaxed);
        format!("cg{}x{}", std::process::id(), n)
    }

    fn run_case(&self, sample: &SampleTriple, options: &ReportOptions) -> OracleResult<CaseOutput> {
        let case = Self::next_case_name();
        let dir = &self.config.data_dir;
        let inp = dir.join(format!("{case}.inp"));
        let out = dir.join(format!("{case}.out"));
        let plt = dir.join(format!("{case}.plt"));

        let deck = render_deck(&self.pair, sample, options);
        trace!(case = %case, deck = %deck, "Writing CEA deck");
        fs::write(&inp, deck).map_err(|e| OracleError::io(format!("writing {}", inp.display()), e))?;

        let result = self.execute(&case).and_then(|()| {
            let report = read_output(&out)?;
            let plot = fs::read_to_string(&plt).ok();
            Ok(CaseOutput { report, plot })
        });

        if !self.config.keep_files {
            for path in [&inp, &out, &plt] {
                let _ = fs::remove_file(path);
            }
        }
        result
    }

    fn execute(&self, case: &str) -> OracleResult<()> {
        let mut child = Command::new(&self.config.executable)
            .current_dir(&self.config.data_dir)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| OracleError::Spawn {
                exe: self.config.executable.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            writeln!(stdin, "{case}")
                .map_err(|e| OracleError::io("sending case name to CEA", e))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|e| OracleError::io("waiting for CEA", e))?;
        if !output.status.success() {
            return Err(OracleError::ExitStatus {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

fn read_output(path: &Path) -> OracleResult<String> {
    if !path.exists() {
        return Err(OracleError::MissingOutput {
            path: path.to_path_buf(),
        });
    }
    fs::read_to_string(path).map_err(|e| OracleError::io(format!("reading {}", path.display()), e))
}

/// Read the chamber/throat/exit rows of a CEA `.plt` table.
///
/// Column names come from the `#` header when present, otherwise the
/// requested [`PLOT_VARIABLES`] order is assumed.
pub fn parse_plot_table(text: &str) -> OracleResult<DirectProperties> {
    let mut names: Vec<String> = PLOT_VARIABLES.iter().map(|s| s.to_string()).collect();
    let mut rows: Vec<Vec<f64>> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(header) = trimmed.strip_prefix('#') {
            let parsed: Vec<String> = header
                .split_whitespace()
                .map(|s| s.to_ascii_lowercase())
                .collect();
            if !parsed.is_empty() {
                names = parsed;
            }
            continue;
        }
        let row = trimmed
            .split_whitespace()
            .map(|tok| {
                tok.parse::<f64>().map_err(|_| OracleError::MalformedPlot {
                    message: format!("bad number '{tok}'"),
                })
            })
            .collect::<OracleResult<Vec<f64>>>()?;
        rows.push(row);
    }

    if rows.len() < 3 {
        return Err(OracleError::MalformedPlot {
            message: format!("expected 3 station rows, found {}", rows.len()),
        });
    }

    let column = |name: &str| -> OracleResult<StationTriple<f64>> {
        let idx = names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| OracleError::MalformedPlot {
                message: format!("missing column '{name}'"),
            })?;
        let cell = |row: &Vec<f64>| {
            row.get(idx).copied().ok_or_else(|| OracleError::MalformedPlot {
                message: format!("short row for column '{name}'"),
            })
        };
        Ok(StationTriple::new(cell(&rows[0])?, cell(&rows[1])?, cell(&rows[2])?))
    };

    let rho = column("rho")?;
    let mach = column("mach")?;
    let vis = column("vis")?;
    let cond = column("cond")?;
    let pran = column("pran")?;
    let cp = column("cp")?;

    let quad = |i: usize| TransportQuad {
        specific_heat: *cp.as_array()[i],
        viscosity: *vis.as_array()[i],
        conductivity: *cond.as_array()[i],
        prandtl: *pran.as_array()[i],
    };

    Ok(DirectProperties {
        density: rho,
        mach_exit: mach.exit,
        transport: StationTriple::new(quad(0), quad(1), quad(2)),
    })
}

impl EquilibriumOracle for CeaProcessOracle {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn propellants(&self) -> &PropellantPair {
        &self.pair
    }

    fn full_report(
        &self,
        sample: &SampleTriple,
        options: &ReportOptions,
    ) -> OracleResult<RawReport> {
        let output = self.run_case(sample, options)?;
        // Only a deck with `siunits` and `transport` yields a complete accessor table.
        let cached = match (options.unit_system, options.transport, output.plot) {
            (UnitSystem::Si, true, Some(plot)) => Some((*sample, plot)),
            _ => None,
        };
        *self.last_plot.borrow_mut() = cached;
        Ok(RawReport::new(output.report))
    }

    fn direct_properties(&self, sample: &SampleTriple) -> OracleResult<DirectProperties> {
        if let Some((cached_sample, plot)) = self.last_plot.borrow().as_ref()
            && cached_sample == sample
        {
            debug!("Reusing plot table from the preceding report run");
            return parse_plot_table(plot);
        }

        let output = self.run_case(sample, &ReportOptions::default())?;
        let plot = output.plot.ok_or_else(|| OracleError::MissingOutput {
            path: self.config.data_dir.join("<case>.plt"),
        })?;
        parse_plot_table(&plot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLOT: &str = "\
#        p            t          rho         mach          vis         cond         pran           cp
  2.0000E+01   3.3201E+03   1.5994E+00   0.0000E+00   1.0354E+00   5.4617E+00   4.2560E-01   5.6216E+00
  1.1449E+01   3.1274E+03   9.8212E-01   1.0000E+00   9.9247E-01   4.7932E+00   4.2420E-01   5.1038E+00
  1.8864E-01   1.9365E+03   2.5123E-02   3.5220E+00   6.9434E-01   1.4216E+00   5.0220E-01   2.0935E+00
";

    #[test]
    fn plot_table_columns_by_header() {
        let props = parse_plot_table(PLOT).unwrap();
        assert!((props.density.chamber - 1.5994).abs() < 1e-12);
        assert!((props.density.exit - 0.025123).abs() < 1e-12);
        assert!((props.mach_exit - 3.522).abs() < 1e-12);
        assert!((props.transport.throat.viscosity - 0.99247).abs() < 1e-12);
        assert!((props.transport.exit.prandtl - 0.5022).abs() < 1e-12);
        assert!((props.transport.chamber.specific_heat - 5.6216).abs() < 1e-12);
    }

    #[test]
    fn plot_table_without_header_uses_requested_order() {
        let body: String = PLOT.lines().skip(1).map(|l| format!("{l}\n")).collect();
        let props = parse_plot_table(&body).unwrap();
        assert!((props.transport.chamber.conductivity - 5.4617).abs() < 1e-12);
    }

    #[test]
    fn plot_table_rejects_short_tables() {
        let two_rows: String = PLOT.lines().take(3).map(|l| format!("{l}\n")).collect();
        assert!(matches!(
            parse_plot_table(&two_rows),
            Err(OracleError::MalformedPlot { .. })
        ));
        assert!(parse_plot_table("# p t\n1.0 x\n").is_err());
    }

    #[test]
    fn missing_data_dir_is_rejected() {
        let config = CeaConfig::new("FCEA2", "/definitely/not/a/cea/dir");
        let result = CeaProcessOracle::new(PropellantPair::new("CH4", "LOX"), config);
        assert!(matches!(result, Err(OracleError::Io { .. })));
    }

    #[test]
    fn missing_executable_is_a_spawn_error() {
        let dir = std::env::temp_dir();
        let config = CeaConfig::new("/definitely/not/an/executable/FCEA2", &dir);
        let oracle = CeaProcessOracle::new(PropellantPair::new("CH4", "LOX"), config).unwrap();
        let err = oracle
            .full_report(&SampleTriple::new(20.0, 3.0, 10.0), &ReportOptions::default())
            .unwrap_err();
        assert!(matches!(err, OracleError::Spawn { .. }));
    }
}
