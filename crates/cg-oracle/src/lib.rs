//! cg-oracle: chemical-equilibrium backends for ceagen.
//!
//! Provides:
//! - Propellant catalog (fuels, oxidizers, blends and their CEA reactant cards)
//! - Sample triples and report options handed to a backend
//! - `EquilibriumOracle` trait: full text report + direct numeric accessors
//! - `CeaProcessOracle`: drives the NASA CEA executable through input decks
//! - `AnalyticOracle`: ideal-rocket stand-in that renders CEA-format reports
//!
//! # Architecture
//!
//! Everything downstream (report parsing, dataset assembly) talks to the
//! `EquilibriumOracle` trait only. An oracle instance is bound to one
//! propellant pair; independent pairs get independent instances.
//!
//! # Example
//!
//! ```
//! use cg_oracle::{AnalyticOracle, EquilibriumOracle, PropellantPair, ReportOptions, SampleTriple};
//!
//! let oracle = AnalyticOracle::new(PropellantPair::new("CH4", "LOX")).unwrap();
//! let sample = SampleTriple::new(20.0, 3.0, 10.0);
//! let report = oracle.full_report(&sample, &ReportOptions::default()).unwrap();
//! assert!(report.text().contains("EXIT"));
//! ```

pub mod analytic;
pub mod cea_process;
pub mod deck;
pub mod error;
pub mod model;
pub mod propellant;
pub mod request;
pub mod sample;

// Re-exports for ergonomics
pub use analytic::{AnalyticOracle, PairProfile};
pub use cea_process::{CeaConfig, CeaProcessOracle, parse_plot_table};
pub use error::{OracleError, OracleResult};
pub use model::{DirectProperties, EquilibriumOracle, RawReport, StationTriple, TransportQuad};
pub use propellant::{
    DEFAULT_FUELS, DEFAULT_OXIDIZERS, PropellantEntry, PropellantPair, PropellantRole, catalog,
    lookup, search,
};
pub use request::{ReportOptions, UnitSystem};
pub use sample::SampleTriple;
