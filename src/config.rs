// src/config.rs
use crate::indicators::patterns::{ConsensusResolver, PatternCatalog, RankTable};
use crate::processor::{BatchConfig, BatchResolver, ErrorPolicy};
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Prefix for environment overrides, e.g. `SIGNAL__PROCESSING__PARALLEL=false`.
pub const ENV_PREFIX: &str = "SIGNAL";

/// Settings for the consensus resolver and its batch runner.
///
/// Layered as: built-in defaults, then an optional file (format picked from
/// the extension), then `SIGNAL__*` environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub patterns: PatternSettings,
    #[serde(default)]
    pub processing: ProcessingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatternSettings {
    /// Explicit identifier enumeration; the TA-Lib catalog when unset.
    #[serde(default)]
    pub identifiers: Option<Vec<String>>,
    /// JSON rank table; thepatternsite.com rankings when unset.
    #[serde(default)]
    pub rankings_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProcessingSettings {
    #[serde(default = "default_true")]
    pub parallel: bool,
    #[serde(default = "default_min_parallel_rows")]
    pub min_parallel_rows: usize,
    /// Worker thread count; one per CPU when unset.
    #[serde(default)]
    pub worker_threads: Option<usize>,
    #[serde(default)]
    pub on_error: ErrorPolicy,
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        Self {
            parallel: default_true(),
            min_parallel_rows: default_min_parallel_rows(),
            worker_threads: None,
            on_error: ErrorPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive; `RUST_LOG` is used when unset.
    #[serde(default)]
    pub filter: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_min_parallel_rows() -> usize {
    BatchConfig::default().min_parallel_rows
}

impl Settings {
    /// Load settings from an optional file plus the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        // Initialize environment
        dotenv::dotenv().ok();

        let mut builder = Config::builder();
        if let Some(path) = path {
            info!("Loading settings from {}", path.display());
            builder = builder.add_source(File::from(path));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("patterns.identifiers")
                .try_parsing(true),
        );

        let settings: Settings = builder
            .build()
            .context("Failed to assemble configuration sources")?
            .try_deserialize()
            .context("Failed to parse settings")?;

        debug!("Loaded settings: {:?}", settings);
        Ok(settings)
    }

    pub fn catalog(&self) -> Result<PatternCatalog> {
        match &self.patterns.identifiers {
            Some(identifiers) => PatternCatalog::new(identifiers.iter().cloned())
                .context("Invalid pattern identifier enumeration"),
            None => Ok(PatternCatalog::talib()),
        }
    }

    pub fn rankings(&self) -> Result<RankTable> {
        match &self.patterns.rankings_path {
            Some(path) => RankTable::from_json_file(path),
            None => Ok(RankTable::pattern_site()),
        }
    }

    pub fn build_resolver(&self) -> Result<ConsensusResolver> {
        let catalog = self.catalog()?;
        let rankings = self.rankings()?;
        info!(
            "Building consensus resolver over {} patterns with {} ranks",
            catalog.len(),
            rankings.len()
        );
        Ok(ConsensusResolver::new(catalog, rankings)?)
    }

    pub fn batch_config(&self) -> BatchConfig {
        let defaults = BatchConfig::default();
        BatchConfig {
            parallel: self.processing.parallel,
            min_parallel_rows: self.processing.min_parallel_rows,
            worker_threads: self.processing.worker_threads.unwrap_or(defaults.worker_threads),
            on_error: self.processing.on_error,
        }
    }

    pub fn build_batch_resolver(&self) -> Result<BatchResolver> {
        BatchResolver::new(self.build_resolver()?, self.batch_config())
    }
}
