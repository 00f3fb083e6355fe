mod error;

use cg_core::units::ATM_IN_BAR;
use cg_dataset::{
    AttemptOutcome, BackendConfig, DatasetAssembler, DatasetManifest, DatasetStore, DomainBounds,
    DomainSampler, GenerationProgress, GenerationStats, GeneratorConfig, check_channels, load_yaml,
    run_grid, write_domain_csv,
};
use cg_oracle::{CeaConfig, PropellantPair, PropellantRole, ReportOptions, UnitSystem, search};
use cg_report::{ParsedReport, ReportLayout, Validation, inspect, parse_overlap, parse_report};
use clap::{Args, Parser, Subcommand, ValueEnum};
use error::{CliError, CliResult};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "ceagen")]
#[command(about = "ceagen - CEA combustion dataset generator for surrogate models", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a dataset for one propellant pair
    Generate {
        /// Fuel identifier (e.g. CH4, RP-1, LH2)
        #[arg(long)]
        fuel: String,
        /// Oxidizer identifier (e.g. LOX, N2O4)
        #[arg(long)]
        oxidizer: String,
        /// Number of rows to generate
        #[arg(long)]
        rows: Option<usize>,
        /// Seed for reproducible sampling
        #[arg(long)]
        seed: Option<u64>,
        /// Generator YAML file (bounds, report options, backend)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Attempt ceiling (default: rows * 1000, at least 1000)
        #[arg(long)]
        max_attempts: Option<usize>,
        /// Request reports in atmospheres instead of SI
        #[arg(long)]
        atm: bool,
        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        backend: BackendArgs,
    },
    /// Generate datasets for every fuel × oxidizer pair in a config file
    Batch {
        /// Generator YAML file
        #[arg(long)]
        config: PathBuf,
        /// Output directory (overrides the file)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Export sampled inputs only (pressure, mixture, area_ratio)
    Domain {
        #[arg(long, default_value_t = 1000)]
        rows: usize,
        #[arg(long)]
        seed: Option<u64>,
        /// Generator YAML file supplying the bounds
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output CSV file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate and parse a saved report
    Inspect {
        /// Report text file
        report_file: PathBuf,
        /// Report was produced in atmospheres
        #[arg(long)]
        atm: bool,
    },
    /// Compare report-parsed values with the direct accessors
    Check {
        #[arg(long)]
        fuel: String,
        #[arg(long)]
        oxidizer: String,
        #[arg(long, default_value_t = 100)]
        samples: usize,
        #[arg(long)]
        seed: Option<u64>,
        /// Largest acceptable relative deviation
        #[arg(long, default_value_t = 1e-3)]
        tolerance: f64,
        #[command(flatten)]
        backend: BackendArgs,
    },
    /// List built-in propellants
    Propellants {
        /// Filter by id, name or alias
        query: Option<String>,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum BackendKind {
    Analytic,
    Cea,
}

#[derive(Args)]
struct BackendArgs {
    /// Oracle backend
    #[arg(long, value_enum)]
    backend: Option<BackendKind>,
    /// CEA executable (implies --backend cea)
    #[arg(long)]
    cea_exe: Option<PathBuf>,
    /// Directory with thermo.lib / trans.lib (defaults to the executable's directory)
    #[arg(long)]
    cea_data: Option<PathBuf>,
}

impl BackendArgs {
    /// Backend selected on the command line, if any.
    fn resolve(&self) -> CliResult<Option<BackendConfig>> {
        let kind = match (self.backend, &self.cea_exe) {
            (Some(kind), _) => kind,
            (None, Some(_)) => BackendKind::Cea,
            (None, None) => return Ok(None),
        };
        match kind {
            BackendKind::Analytic => Ok(Some(BackendConfig::Analytic)),
            BackendKind::Cea => {
                let exe = self.cea_exe.clone().ok_or_else(|| {
                    CliError::InvalidInput("--backend cea requires --cea-exe".to_string())
                })?;
                let data_dir = match &self.cea_data {
                    Some(dir) => dir.clone(),
                    None => exe
                        .parent()
                        .filter(|p| !p.as_os_str().is_empty())
                        .map(Path::to_path_buf)
                        .unwrap_or_else(|| PathBuf::from(".")),
                };
                Ok(Some(BackendConfig::Cea(CeaConfig::new(exe, data_dir))))
            }
        }
    }
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            fuel,
            oxidizer,
            rows,
            seed,
            config,
            max_attempts,
            atm,
            output,
            backend,
        } => {
            let mut cfg = match config {
                Some(path) => load_yaml(&path)?,
                None => GeneratorConfig::default(),
            };
            cfg.fuels = vec![fuel];
            cfg.oxidizers = vec![oxidizer];
            if let Some(rows) = rows {
                cfg.rows = rows;
            }
            if seed.is_some() {
                cfg.seed = seed;
            }
            if max_attempts.is_some() {
                cfg.max_attempts = max_attempts;
            }
            if atm {
                cfg.report.unit_system = UnitSystem::Atmospheres;
            }
            if let Some(output) = output {
                cfg.output_dir = output;
            }
            if let Some(b) = backend.resolve()? {
                cfg.backend = b;
            }
            cmd_generate(&cfg)
        }
        Commands::Batch { config, output } => {
            let mut cfg = load_yaml(&config)?;
            if let Some(output) = output {
                cfg.output_dir = output;
            }
            cmd_batch(&cfg)
        }
        Commands::Domain {
            rows,
            seed,
            config,
            output,
        } => {
            let bounds = match config {
                Some(path) => load_yaml(&path)?.bounds,
                None => DomainBounds::default(),
            };
            cmd_domain(bounds, rows, seed, output.as_deref())
        }
        Commands::Inspect { report_file, atm } => cmd_inspect(&report_file, atm),
        Commands::Check {
            fuel,
            oxidizer,
            samples,
            seed,
            tolerance,
            backend,
        } => {
            let backend = backend.resolve()?.unwrap_or_default();
            cmd_check(PropellantPair::new(fuel, oxidizer), &backend, samples, seed, tolerance)
        }
        Commands::Propellants { query } => cmd_propellants(query.as_deref()),
    }
}

fn sampler_for(bounds: DomainBounds, seed: Option<u64>) -> CliResult<DomainSampler> {
    Ok(match seed {
        Some(seed) => DomainSampler::with_seed(bounds, seed)?,
        None => DomainSampler::new(bounds)?,
    })
}

fn cmd_generate(cfg: &GeneratorConfig) -> CliResult<()> {
    cfg.validate()?;
    let pair = PropellantPair::new(cfg.fuels[0].clone(), cfg.oxidizers[0].clone());
    println!(
        "Generating {} rows for {} (backend: {}, units: {})",
        cfg.rows,
        pair,
        cfg.backend.name(),
        cfg.report.unit_system
    );

    let oracle = cfg.backend.build(pair.clone())?;
    let sampler = sampler_for(cfg.bounds, cfg.seed)?;
    info!(pair = %pair, seed = ?cfg.seed, output = %cfg.output_dir.display(), "Generate");
    let mut last_emit = Instant::now();
    let mut assembler = DatasetAssembler::new(oracle, sampler, cfg.assembler_options())
        .with_progress(move |progress| {
            let done = progress.stats.accepted == progress.target;
            if done || last_emit.elapsed().as_millis() >= 100 {
                render_progress(progress);
                last_emit = Instant::now();
            }
        });

    let result = assembler.generate_with_stats(cfg.rows);
    clear_progress_line();
    let (dataset, stats) = match result {
        Ok(ok) => ok,
        Err(err) => {
            print_stats(assembler.stats());
            return Err(err.into());
        }
    };

    let store = DatasetStore::new(cfg.output_dir.clone())?;
    let manifest = DatasetManifest::new(cfg, &dataset, stats, cfg.seed);
    let path = store.save(&dataset, &manifest)?;

    println!("✓ Wrote {} rows to {}", dataset.len(), path.display());
    println!("  Dataset id: {}", manifest.dataset_id);
    print_stats(&stats);
    Ok(())
}

fn cmd_batch(cfg: &GeneratorConfig) -> CliResult<()> {
    println!(
        "Running {} pairs × {} rows (backend: {})",
        cfg.pairs().len(),
        cfg.rows,
        cfg.backend.name()
    );
    let started = Instant::now();
    let outcomes = run_grid(cfg)?;
    let store = DatasetStore::new(cfg.output_dir.clone())?;

    let mut failed = 0;
    let mut all_stats = Vec::new();
    for outcome in &outcomes {
        match &outcome.result {
            Ok((dataset, stats)) => {
                let manifest = DatasetManifest::new(cfg, dataset, *stats, outcome.seed);
                let path = store.save(dataset, &manifest)?;
                println!(
                    "  ✓ {:<24} {:>7} rows  {:>9} attempts  -> {}",
                    outcome.pair.to_string(),
                    dataset.len(),
                    stats.attempted,
                    path.display()
                );
                all_stats.push(*stats);
            }
            Err(err) => {
                failed += 1;
                println!("  ✗ {:<24} {}", outcome.pair.to_string(), err);
            }
        }
    }

    let total = GenerationStats::merged(&all_stats);
    println!(
        "\nBatch finished in {:.1}s: {} ok, {} failed",
        started.elapsed().as_secs_f64(),
        outcomes.len() - failed,
        failed
    );
    print_stats(&total);

    if failed > 0 {
        return Err(CliError::BatchFailed {
            failed,
            total: outcomes.len(),
        });
    }
    Ok(())
}

fn cmd_domain(
    bounds: DomainBounds,
    rows: usize,
    seed: Option<u64>,
    output: Option<&Path>,
) -> CliResult<()> {
    let samples = sampler_for(bounds, seed)?.sample_many(rows);
    match output {
        Some(path) => {
            let mut buf = Vec::new();
            write_domain_csv(&mut buf, &samples)?;
            fs::write(path, buf)?;
            println!("✓ Exported {} samples to {}", samples.len(), path.display());
        }
        None => write_domain_csv(io::stdout().lock(), &samples)?,
    }
    Ok(())
}

fn cmd_inspect(report_file: &Path, atm: bool) -> CliResult<()> {
    let text = fs::read_to_string(report_file)?;
    let unit_system = if atm {
        UnitSystem::Atmospheres
    } else {
        UnitSystem::Si
    };
    let layout = ReportLayout::for_options(&ReportOptions::default().with_unit_system(unit_system));

    println!("Report: {} (layout {})", report_file.display(), layout.name);
    match inspect(&text) {
        Validation::Valid => println!("  Validation: valid"),
        Validation::MissingStation => println!("  Validation: rejected (no exit station)"),
        Validation::NonFinite => println!("  Validation: rejected (non-finite values)"),
    }

    match parse_report(&text, layout) {
        ParsedReport::Success(st) => {
            if atm {
                println!("  Pressures converted from atm (x{ATM_IN_BAR})");
            }
            println!("  pressure_throat  {:>12.6} bar", st.pressure_throat);
            println!("  pressure_exit    {:>12.6} bar", st.pressure_exit);
            let rows = [
                ("temperature", st.temperature),
                ("molar_mass", st.molar_mass),
                ("adiabat", st.adiabatic_index),
            ];
            println!("  {:<16} {:>12} {:>12} {:>12}", "", "chamber", "throat", "exit");
            for (name, v) in rows {
                println!(
                    "  {:<16} {:>12.6} {:>12.6} {:>12.6}",
                    name, v.chamber, v.throat, v.exit
                );
            }
            if let Ok(overlap) = parse_overlap(&text, layout) {
                let d = overlap.density;
                println!(
                    "  {:<16} {:>12.6} {:>12.6} {:>12.6}",
                    "rho", d.chamber, d.throat, d.exit
                );
                println!("  mach_exit        {:>12.6}", overlap.mach_exit);
            }
        }
        ParsedReport::UnrecognizedLayout(err) => println!("  Parse: {err}"),
        other => println!("  Parse: {}", other.category()),
    }
    Ok(())
}

fn cmd_check(
    pair: PropellantPair,
    backend: &BackendConfig,
    samples: usize,
    seed: Option<u64>,
    tolerance: f64,
) -> CliResult<()> {
    if !tolerance.is_finite() || tolerance < 0.0 {
        return Err(CliError::InvalidInput(format!("tolerance {tolerance}")));
    }
    println!("Checking {} channels on {} samples (backend: {})", pair, samples, backend.name());
    let oracle = backend.build(pair)?;
    let mut sampler = sampler_for(DomainBounds::default(), seed)?;
    let report = check_channels(&*oracle, &mut sampler, samples, &ReportOptions::default())?;

    println!("  Compared: {}", report.comparisons.len());
    println!("  Skipped:  {}", report.skipped);
    println!("  Max density deviation: {:.3e}", report.max_density_deviation());
    println!("  Max exit Mach deviation: {:.3e}", report.max_mach_deviation());

    if !report.within(tolerance) {
        return Err(CliError::ChannelMismatch {
            max_deviation: report
                .max_density_deviation()
                .max(report.max_mach_deviation()),
            tolerance,
        });
    }
    println!("✓ Channels agree within {tolerance:.1e}");
    Ok(())
}

fn cmd_propellants(query: Option<&str>) -> CliResult<()> {
    let entries = search(query.unwrap_or(""));
    if entries.is_empty() {
        println!("No propellants match");
        return Ok(());
    }
    for role in [PropellantRole::Fuel, PropellantRole::Oxidizer] {
        println!(
            "{}:",
            match role {
                PropellantRole::Fuel => "Fuels",
                PropellantRole::Oxidizer => "Oxidizers",
            }
        );
        for entry in entries.iter().filter(|e| e.role == role) {
            let species: Vec<String> = entry
                .cards
                .iter()
                .map(|c| format!("{} {:.1}%", c.species, c.wt_pct))
                .collect();
            println!(
                "  {:<12} {:<36} [{}]",
                entry.canonical_id,
                entry.display_name,
                species.join(", ")
            );
            if !entry.aliases.is_empty() {
                println!("  {:<12} aliases: {}", "", entry.aliases.join(", "));
            }
        }
    }
    Ok(())
}

fn clear_progress_line() {
    print!("\r{}\r", " ".repeat(120));
    let _ = io::stdout().flush();
}

fn render_progress(progress: &GenerationProgress) {
    let width = 28usize;
    let fraction = progress.fraction_complete().clamp(0.0, 1.0);
    let filled = ((fraction * width as f64).round() as usize).min(width);
    let bar = format!(
        "{}{}",
        "#".repeat(filled),
        "-".repeat(width.saturating_sub(filled))
    );
    let last = match progress.last {
        AttemptOutcome::Accepted => "accepted".to_string(),
        AttemptOutcome::Rejected(r) => format!("rejected: {r}"),
    };
    print!(
        "\r[{}] {:>6.2}%  rows={}/{}  attempts={}/{}  elapsed={:.1}s  {}",
        bar,
        fraction * 100.0,
        progress.stats.accepted,
        progress.target,
        progress.stats.attempted,
        progress.max_attempts,
        progress.elapsed_wall_s,
        last
    );
    let _ = io::stdout().flush();
}

fn print_stats(stats: &GenerationStats) {
    println!("\nGeneration summary:");
    println!("  Attempted: {}", stats.attempted);
    println!(
        "  Accepted:  {} ({:.1}%)",
        stats.accepted,
        100.0 * stats.acceptance_rate()
    );
    println!(
        "  Rejected (convergence): {} (missing station {}, non-finite {})",
        stats.rejected_convergence(),
        stats.rejected_missing_station,
        stats.rejected_non_finite
    );
    println!("  Rejected (extraction):  {}", stats.rejected_extraction);
    println!("  Rejected (accessor):    {}", stats.rejected_accessor);
}
