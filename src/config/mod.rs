//! Configuration management for the corpus pipeline
//!
//! This module handles loading and validating configuration from environment
//! variables and TOML files, and resolves per-source data file paths.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::models::Source;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory configuration
    pub data: DataConfig,

    /// Data file names, resolved under `<data.root>/<source>/`
    pub files: FilesConfig,

    /// Mention-anchor statistics configuration
    pub anchors: AnchorConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Data directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Root directory holding one sub-directory per source
    pub root: PathBuf,
}

/// File names inside a source directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    pub entity_dictionary: String,
    pub raw_corpus: String,
    pub refined_corpus: String,
    pub annotated_corpus: String,
    pub mention_anchors: String,
    pub out_links: String,
    pub title_entities: String,
}

/// Mention-anchor statistics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnchorConfig {
    /// Minimum link probability (link count / frequency) kept by the filter
    pub link_prob_threshold: f64,

    /// Lines between progress log records
    pub progress_interval: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let root = std::env::var("XLINK_DATA_ROOT")
            .map(PathBuf::from)
            .unwrap_or(defaults.data.root);

        let link_prob_threshold = std::env::var("XLINK_LINK_PROB_THRESHOLD")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(defaults.anchors.link_prob_threshold);

        let progress_interval = std::env::var("XLINK_PROGRESS_INTERVAL")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(defaults.anchors.progress_interval);

        let level = std::env::var("XLINK_LOG_LEVEL").unwrap_or(defaults.logging.level);
        let format = std::env::var("XLINK_LOG_FORMAT").unwrap_or(defaults.logging.format);

        let config = Self {
            data: DataConfig { root },
            files: defaults.files,
            anchors: AnchorConfig {
                link_prob_threshold,
                progress_interval,
            },
            logging: LoggingConfig { level, format },
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

        let config: Self = toml::from_str(&content).map_err(|e| Error::Toml {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.data.root.as_os_str().is_empty() {
            return Err(Error::config("data.root cannot be empty"));
        }

        if !(0.0..=1.0).contains(&self.anchors.link_prob_threshold) {
            return Err(Error::config(format!(
                "anchors.link_prob_threshold must be between 0.0 and 1.0, got {}",
                self.anchors.link_prob_threshold
            )));
        }

        if self.anchors.progress_interval == 0 {
            return Err(Error::config(
                "anchors.progress_interval must be greater than 0",
            ));
        }

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            return Err(Error::config("logging.format must be 'text' or 'json'"));
        }

        Ok(())
    }

    /// Directory holding one source's data files
    pub fn source_dir(&self, source: Source) -> PathBuf {
        self.data.root.join(source.as_str())
    }

    /// Path of a file inside a source directory
    pub fn source_file(&self, source: Source, file_name: &str) -> PathBuf {
        self.source_dir(source).join(file_name)
    }

    pub fn entity_dictionary_path(&self, source: Source) -> PathBuf {
        self.source_file(source, &self.files.entity_dictionary)
    }

    pub fn raw_corpus_path(&self, source: Source) -> PathBuf {
        self.source_file(source, &self.files.raw_corpus)
    }

    pub fn refined_corpus_path(&self, source: Source) -> PathBuf {
        self.source_file(source, &self.files.refined_corpus)
    }

    pub fn annotated_corpus_path(&self, source: Source) -> PathBuf {
        self.source_file(source, &self.files.annotated_corpus)
    }

    pub fn mention_anchors_path(&self, source: Source) -> PathBuf {
        self.source_file(source, &self.files.mention_anchors)
    }

    pub fn out_links_path(&self, source: Source) -> PathBuf {
        self.source_file(source, &self.files.out_links)
    }

    pub fn title_entities_path(&self, source: Source) -> PathBuf {
        self.source_file(source, &self.files.title_entities)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig {
                root: PathBuf::from("data"),
            },
            files: FilesConfig {
                entity_dictionary: String::from("entity_id.txt"),
                raw_corpus: String::from("raw_abstract.txt"),
                refined_corpus: String::from("refined_abstract.txt"),
                annotated_corpus: String::from("standard_abstract.txt"),
                mention_anchors: String::from("mention_anchors.json"),
                out_links: String::from("out_links.json"),
                title_entities: String::from("title_entities.json"),
            },
            anchors: AnchorConfig {
                link_prob_threshold: 0.0001,
                progress_interval: 100_000,
            },
            logging: LoggingConfig {
                level: String::from("info"),
                format: String::from("text"),
            },
        }
    }
}
