//! cg-dataset: surrogate-model training data from an equilibrium oracle.
//!
//! Provides:
//! - `DomainSampler`: uniform Monte Carlo draws over validated bounds
//! - `DatasetAssembler`: bounded sample → report → row loop
//! - `GeneratorConfig`: YAML configuration with validation
//! - `batch::run_grid`: one independent assembler per propellant pair (rayon)
//! - `DatasetStore`: CSV files plus a JSON manifest
//! - `consistency::check_channels`: report vs accessor agreement

pub mod assembler;
pub mod batch;
pub mod config;
pub mod consistency;
pub mod error;
pub mod progress;
pub mod sampler;
pub mod schema;
pub mod store;

pub use assembler::{AssemblerOptions, DatasetAssembler};
pub use batch::{PairOutcome, run_grid, run_pair};
pub use config::{BackendConfig, GeneratorConfig, load_yaml, save_yaml};
pub use consistency::{ChannelComparison, ConsistencyReport, check_channels};
pub use error::{AssembleError, ConfigError, DatasetError, DatasetResult, StoreError, StoreResult};
pub use progress::{AttemptOutcome, GenerationProgress, GenerationStats, Rejection};
pub use sampler::{DomainBounds, DomainSampler, Interval};
pub use schema::{COLUMNS, Dataset, DatasetRow, StationRecord};
pub use store::{DatasetManifest, DatasetStore, StoreManifest, write_csv, write_domain_csv};
