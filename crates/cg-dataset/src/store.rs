//! CSV export and the dataset directory manifest.

use crate::config::GeneratorConfig;
use crate::error::{StoreError, StoreResult};
use crate::progress::GenerationStats;
use crate::schema::{COLUMNS, Dataset};
use cg_oracle::{PropellantPair, SampleTriple};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::info;

pub const MANIFEST_FILE: &str = "manifest.json";

/// Columns of the input-domain-only export.
pub const DOMAIN_COLUMNS: [&str; 3] = ["pressure", "mixture", "area_ratio"];

fn csv_field(text: &str) -> String {
    if text.contains([',', '"', '\n']) {
        format!("\"{}\"", text.replace('"', "\"\""))
    } else {
        text.to_string()
    }
}

/// Header plus one line per row, in [`COLUMNS`] order.
pub fn write_csv<W: Write>(mut writer: W, dataset: &Dataset) -> io::Result<()> {
    writeln!(writer, "{}", COLUMNS.join(","))?;
    for row in dataset.rows() {
        write!(writer, "{},{}", csv_field(&row.fuel), csv_field(&row.oxidizer))?;
        for v in row.values() {
            write!(writer, ",{v}")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

pub fn write_domain_csv<W: Write>(mut writer: W, samples: &[SampleTriple]) -> io::Result<()> {
    writeln!(writer, "{}", DOMAIN_COLUMNS.join(","))?;
    for s in samples {
        writeln!(writer, "{},{},{}", s.pressure_bar, s.mixture_ratio, s.area_ratio)?;
    }
    Ok(())
}

/// SHA-256 over the configuration that produced a pair's dataset.
pub fn compute_dataset_id(config: &GeneratorConfig, pair: &PropellantPair, seed: Option<u64>) -> String {
    let mut hasher = Sha256::new();

    let config_json = serde_json::to_string(config).unwrap_or_default();
    hasher.update(config_json.as_bytes());

    let pair_json = serde_json::to_string(pair).unwrap_or_default();
    hasher.update(pair_json.as_bytes());

    if let Some(seed) = seed {
        hasher.update(seed.to_le_bytes());
    }
    hasher.update(env!("CARGO_PKG_VERSION").as_bytes());

    format!("{:x}", hasher.finalize())
}

/// One dataset file in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetManifest {
    pub dataset_id: String,
    pub fuel: String,
    pub oxidizer: String,
    pub file: String,
    pub backend: String,
    pub timestamp: String,
    pub rows: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub stats: GenerationStats,
    pub generator_version: String,
}

impl DatasetManifest {
    pub fn new(
        config: &GeneratorConfig,
        dataset: &Dataset,
        stats: GenerationStats,
        seed: Option<u64>,
    ) -> Self {
        let pair = dataset.pair();
        Self {
            dataset_id: compute_dataset_id(config, pair, seed),
            fuel: pair.fuel.clone(),
            oxidizer: pair.oxidizer.clone(),
            file: format!("{}.csv", pair.file_stem()),
            backend: config.backend.name().to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            rows: dataset.len(),
            seed,
            stats,
            generator_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// `manifest.json` contents: one entry per pair, sorted by file name.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StoreManifest {
    pub datasets: Vec<DatasetManifest>,
}

/// Directory of `<fuel>_<oxidizer>.csv` files plus `manifest.json`.
#[derive(Clone)]
pub struct DatasetStore {
    root_dir: PathBuf,
}

impl DatasetStore {
    pub fn new(root_dir: PathBuf) -> StoreResult<Self> {
        if root_dir.exists() && !root_dir.is_dir() {
            return Err(StoreError::InvalidPath {
                message: format!("{} is not a directory", root_dir.display()),
            });
        }
        fs::create_dir_all(&root_dir)?;
        Ok(Self { root_dir })
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    pub fn csv_path(&self, pair: &PropellantPair) -> PathBuf {
        self.root_dir.join(format!("{}.csv", pair.file_stem()))
    }

    fn manifest_path(&self) -> PathBuf {
        self.root_dir.join(MANIFEST_FILE)
    }

    pub fn has_dataset(&self, pair: &PropellantPair) -> bool {
        self.csv_path(pair).exists()
    }

    /// Write the CSV and record it in the manifest, replacing any earlier entry for the pair.
    pub fn save(&self, dataset: &Dataset, manifest: &DatasetManifest) -> StoreResult<PathBuf> {
        let path = self.csv_path(dataset.pair());
        let mut buf = Vec::new();
        write_csv(&mut buf, dataset)?;
        fs::write(&path, buf)?;

        let mut index = self.load_manifest()?;
        index.datasets.retain(|entry| entry.file != manifest.file);
        index.datasets.push(manifest.clone());
        index.datasets.sort_by(|a, b| a.file.cmp(&b.file));
        fs::write(self.manifest_path(), serde_json::to_string_pretty(&index)?)?;

        info!(
            path = %path.display(),
            rows = dataset.len(),
            dataset_id = %manifest.dataset_id,
            "Dataset saved"
        );
        Ok(path)
    }

    /// Manifest contents; empty if none was written yet.
    pub fn load_manifest(&self) -> StoreResult<StoreManifest> {
        let path = self.manifest_path();
        if !path.exists() {
            return Ok(StoreManifest::default());
        }
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_quoting() {
        assert_eq!(csv_field("CH4"), "CH4");
        assert_eq!(csv_field("C2H8N2(L),UDMH"), "\"C2H8N2(L),UDMH\"");
        assert_eq!(csv_field("a\"b"), "\"a\"\"b\"");
    }

    #[test]
    fn empty_dataset_is_header_only() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &Dataset::new(PropellantPair::new("CH4", "LOX"))).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert_eq!(text.trim_end().split(',').collect::<Vec<_>>(), COLUMNS.to_vec());
    }

    #[test]
    fn domain_csv() {
        let mut buf = Vec::new();
        write_domain_csv(&mut buf, &[SampleTriple::new(20.0, 3.5, 10.0)]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "pressure,mixture,area_ratio\n20,3.5,10\n");
    }

    #[test]
    fn dataset_id_depends_on_inputs() {
        let config = GeneratorConfig::default();
        let pair = PropellantPair::new("CH4", "LOX");
        let a = compute_dataset_id(&config, &pair, Some(1));
        assert_eq!(a, compute_dataset_id(&config, &pair, Some(1)));
        assert_eq!(a.len(), 64);
        assert_ne!(a, compute_dataset_id(&config, &pair, Some(2)));
        assert_ne!(a, compute_dataset_id(&config, &PropellantPair::new("LH2", "LOX"), Some(1)));
        let more_rows = GeneratorConfig {
            rows: 5,
            ..GeneratorConfig::default()
        };
        assert_ne!(a, compute_dataset_id(&more_rows, &pair, Some(1)));
    }
}
