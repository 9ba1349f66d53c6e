//! TOML configuration
//!
//! Relative dataset and side-table paths resolve against `data_dir`. A
//! domain without a `dataset` is not built.

use crate::error::BuildError;
use crate::service::Domain;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory relative data paths are resolved against
    pub data_dir: PathBuf,
    /// Capacity of each exact-lookup cache; 0 disables memoization
    pub cache_capacity: usize,
    pub nouns: NounConfig,
    pub names: NameConfig,
    pub places: PlaceConfig,
}

/// Side tables shared by every domain
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SideFiles {
    pub holdable: Option<PathBuf>,
    pub rhyme: Option<PathBuf>,
    pub compound: Option<PathBuf>,
    pub labels: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NounConfig {
    pub dataset: Option<PathBuf>,
    /// Non-keyword subjects are kept when seen at least this many times
    pub min_sample_count: u32,
    /// Subjects seen at least this many times are "common"
    pub common_min_count: u32,
    #[serde(flatten)]
    pub side: SideFiles,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NameConfig {
    pub dataset: Option<PathBuf>,
    pub nicknames: Option<PathBuf>,
    /// Names ranked within this many places (US or world) are "common"
    pub common_max_rank: u32,
    #[serde(flatten)]
    pub side: SideFiles,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceConfig {
    pub dataset: Option<PathBuf>,
    /// Cities at least this populous are "common"
    pub common_min_population: u64,
    #[serde(flatten)]
    pub side: SideFiles,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            cache_capacity: 8192,
            nouns: NounConfig::default(),
            names: NameConfig::default(),
            places: PlaceConfig::default(),
        }
    }
}

impl Default for NounConfig {
    fn default() -> Self {
        Self {
            dataset: Some(PathBuf::from("combined_twentyquestions.jsonl")),
            min_sample_count: 2,
            common_min_count: 3,
            side: SideFiles {
                holdable: Some(PathBuf::from("holdable_flags.tsv")),
                rhyme: Some(PathBuf::from("rhyme_flags.tsv")),
                compound: None,
                labels: Some(PathBuf::from("thing_labels.tsv")),
            },
        }
    }
}

impl Default for NameConfig {
    fn default() -> Self {
        Self {
            dataset: Some(PathBuf::from("first_names.tsv")),
            nicknames: Some(PathBuf::from("nicknames_full.tsv")),
            common_max_rank: 200,
            side: SideFiles {
                rhyme: Some(PathBuf::from("rhyme_flags.tsv")),
                ..SideFiles::default()
            },
        }
    }
}

impl Default for PlaceConfig {
    fn default() -> Self {
        Self {
            dataset: Some(PathBuf::from("places.tsv")),
            common_min_population: 1_000_000,
            side: SideFiles::default(),
        }
    }
}

impl Config {
    /// Load a TOML config file
    pub fn load(path: &Path) -> Result<Self, BuildError> {
        let contents = std::fs::read_to_string(path).map_err(|source| BuildError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&contents).map_err(|source| BuildError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Config with every dataset and side table disabled
    pub fn empty() -> Self {
        Self {
            data_dir: PathBuf::new(),
            cache_capacity: 0,
            nouns: NounConfig {
                dataset: None,
                side: SideFiles::default(),
                ..NounConfig::default()
            },
            names: NameConfig {
                dataset: None,
                nicknames: None,
                side: SideFiles::default(),
                ..NameConfig::default()
            },
            places: PlaceConfig {
                dataset: None,
                side: SideFiles::default(),
                ..PlaceConfig::default()
            },
        }
    }

    /// Resolve a configured path against `data_dir`
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir.join(path)
        }
    }

    /// Resolved dataset path of `domain`, if configured
    pub fn dataset(&self, domain: Domain) -> Option<PathBuf> {
        let path = match domain {
            Domain::Nouns => self.nouns.dataset.as_deref(),
            Domain::Names => self.names.dataset.as_deref(),
            Domain::Places => self.places.dataset.as_deref(),
        };
        path.map(|p| self.resolve(p))
    }

    /// Fail fast when a configured dataset does not exist
    pub fn check_datasets(&self) -> Result<(), BuildError> {
        for domain in Domain::ALL {
            if let Some(path) = self.dataset(domain) {
                if !path.is_file() {
                    return Err(BuildError::MissingDataset { domain, path });
                }
            }
        }
        Ok(())
    }
}
