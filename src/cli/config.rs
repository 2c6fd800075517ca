use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use boundary_relations::{AdminLevelSchema, GapPolicy};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatasetConfig {
    /// GeoJSON FeatureCollection; relative paths are resolved against the config file
    pub path: PathBuf,
    /// Property keys from root to leaf, e.g. ["country", "region", "district"]
    pub admin_levels: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum GapPolicyKind {
    #[default]
    Drop,
    Synthetic,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExtractionConfig {
    #[serde(default)]
    pub gap_policy: GapPolicyKind,
    #[serde(default = "default_unknown_label")]
    pub unknown_label: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            gap_policy: GapPolicyKind::default(),
            unknown_label: default_unknown_label(),
        }
    }
}

fn default_unknown_label() -> String {
    "Unknown".to_string()
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        let mut config: Config = toml::from_str(&content).context("Failed to parse config file")?;

        if config.dataset.path.is_relative() {
            if let Some(dir) = path.parent() {
                config.dataset.path = dir.join(&config.dataset.path);
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let schema = self.schema();
        if schema.is_empty() {
            bail!("dataset.admin_levels must name at least one level");
        }
        if let Some(key) = schema.duplicate_key() {
            bail!("dataset.admin_levels lists '{}' more than once", key);
        }
        if self.extraction.gap_policy == GapPolicyKind::Synthetic
            && self.extraction.unknown_label.trim().is_empty()
        {
            bail!("extraction.unknown_label must not be empty for the synthetic gap policy");
        }
        Ok(())
    }

    pub fn schema(&self) -> AdminLevelSchema {
        AdminLevelSchema::new(self.dataset.admin_levels.iter().cloned())
    }

    pub fn gap_policy(&self) -> GapPolicy {
        match self.extraction.gap_policy {
            GapPolicyKind::Drop => GapPolicy::Drop,
            GapPolicyKind::Synthetic => GapPolicy::Synthetic {
                label: self.extraction.unknown_label.clone(),
            },
        }
    }
}
