//! Generator configuration file (YAML).

use crate::assembler::AssemblerOptions;
use crate::error::ConfigError;
use crate::sampler::DomainBounds;
use cg_oracle::{
    AnalyticOracle, CeaConfig, CeaProcessOracle, DEFAULT_FUELS, DEFAULT_OXIDIZERS,
    EquilibriumOracle, OracleResult, PropellantPair, ReportOptions,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Rows per pair when the file does not say.
pub const DEFAULT_ROWS: usize = 10_000;

/// Which oracle backs the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendConfig {
    #[default]
    Analytic,
    Cea(CeaConfig),
}

impl BackendConfig {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Analytic => AnalyticOracle::NAME,
            Self::Cea(_) => CeaProcessOracle::NAME,
        }
    }

    /// Instantiate an oracle bound to `pair`.
    pub fn build(&self, pair: PropellantPair) -> OracleResult<Box<dyn EquilibriumOracle>> {
        let oracle: Box<dyn EquilibriumOracle> = match self {
            Self::Analytic => Box::new(AnalyticOracle::new(pair)?),
            Self::Cea(cea) => Box::new(CeaProcessOracle::new(pair, cea.clone())?),
        };
        Ok(oracle)
    }
}

fn default_fuels() -> Vec<String> {
    DEFAULT_FUELS.iter().map(|s| s.to_string()).collect()
}

fn default_oxidizers() -> Vec<String> {
    DEFAULT_OXIDIZERS.iter().map(|s| s.to_string()).collect()
}

fn default_rows() -> usize {
    DEFAULT_ROWS
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("datasets")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_fuels")]
    pub fuels: Vec<String>,
    #[serde(default = "default_oxidizers")]
    pub oxidizers: Vec<String>,
    #[serde(default)]
    pub bounds: DomainBounds,
    /// Rows per propellant pair
    #[serde(default = "default_rows")]
    pub rows: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<usize>,
    /// Base seed; `None` draws from OS entropy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default)]
    pub report: ReportOptions,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            fuels: default_fuels(),
            oxidizers: default_oxidizers(),
            bounds: DomainBounds::default(),
            rows: DEFAULT_ROWS,
            max_attempts: None,
            seed: None,
            report: ReportOptions::default(),
            backend: BackendConfig::default(),
            output_dir: default_output_dir(),
        }
    }
}

impl GeneratorConfig {
    /// Single-pair configuration.
    pub fn for_pair(pair: &PropellantPair) -> Self {
        Self {
            fuels: vec![pair.fuel.clone()],
            oxidizers: vec![pair.oxidizer.clone()],
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fuels.is_empty() {
            return Err(ConfigError::EmptyPropellants { role: "fuels" });
        }
        if self.oxidizers.is_empty() {
            return Err(ConfigError::EmptyPropellants { role: "oxidizers" });
        }
        for name in self.fuels.iter().chain(&self.oxidizers) {
            if name.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "propellant",
                    reason: "identifiers must be non-empty".to_string(),
                });
            }
        }
        self.bounds.validate()?;
        self.assembler_options().validate()
    }

    /// Every (fuel, oxidizer) combination, fuel-major.
    pub fn pairs(&self) -> Vec<PropellantPair> {
        self.fuels
            .iter()
            .flat_map(|fuel| {
                self.oxidizers
                    .iter()
                    .map(move |ox| PropellantPair::new(fuel.clone(), ox.clone()))
            })
            .collect()
    }

    pub fn assembler_options(&self) -> AssemblerOptions {
        AssemblerOptions {
            report: self.report,
            max_attempts: self.max_attempts,
        }
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }
}

pub fn load_yaml(path: &Path) -> Result<GeneratorConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    GeneratorConfig::from_yaml_str(&content)
}

pub fn save_yaml(path: &Path, config: &GeneratorConfig) -> Result<(), ConfigError> {
    config.validate()?;
    std::fs::write(path, config.to_yaml_string()?)?;
    Ok(())
}
