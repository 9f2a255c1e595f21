/*!
# RESYS Configuration

Directories the service reads ontologies and datasets from and writes results
to. Supports TOML and YAML configuration files.

```toml
[ontologies]
input_path = "ontologies/input"
output_path = "ontologies/output"
osore_path = "ontologies/osore"

[datasets]
input_path = "datasets/input"
output_path = "datasets/output"
```
*/

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the refactoring ontology inside `osore_path`
pub const OSORE_FILE_NAME: &str = "osore.owl";

/// Ontology directories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OntologyPaths {
    /// Uploaded OCEAN ontologies (never modified)
    #[serde(default = "default_ontology_input")]
    pub input_path: PathBuf,

    /// Replicated, augmented ontologies and zip packages
    #[serde(default = "default_ontology_output")]
    pub output_path: PathBuf,

    /// Directory holding `osore.owl`
    #[serde(default = "default_osore")]
    pub osore_path: PathBuf,
}

/// Correlation dataset directories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetPaths {
    #[serde(default = "default_dataset_input")]
    pub input_path: PathBuf,

    /// Exported CSV reports
    #[serde(default = "default_dataset_output")]
    pub output_path: PathBuf,
}

fn default_ontology_input() -> PathBuf {
    PathBuf::from("ontologies/input")
}

fn default_ontology_output() -> PathBuf {
    PathBuf::from("ontologies/output")
}

fn default_osore() -> PathBuf {
    PathBuf::from("ontologies/osore")
}

fn default_dataset_input() -> PathBuf {
    PathBuf::from("datasets/input")
}

fn default_dataset_output() -> PathBuf {
    PathBuf::from("datasets/output")
}

impl Default for OntologyPaths {
    fn default() -> Self {
        Self {
            input_path: default_ontology_input(),
            output_path: default_ontology_output(),
            osore_path: default_osore(),
        }
    }
}

impl Default for DatasetPaths {
    fn default() -> Self {
        Self {
            input_path: default_dataset_input(),
            output_path: default_dataset_output(),
        }
    }
}

/// Global configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResysConfig {
    #[serde(default)]
    pub ontologies: OntologyPaths,

    #[serde(default)]
    pub datasets: DatasetPaths,
}

impl ResysConfig {
    /// Configuration rooted at one base directory
    pub fn with_base_dir<P: AsRef<Path>>(base: P) -> Self {
        let base = base.as_ref();
        Self {
            ontologies: OntologyPaths {
                input_path: base.join("ontologies/input"),
                output_path: base.join("ontologies/output"),
                osore_path: base.join("ontologies/osore"),
            },
            datasets: DatasetPaths {
                input_path: base.join("datasets/input"),
                output_path: base.join("datasets/output"),
            },
        }
    }

    /// Load configuration, choosing the format by file extension
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Self::load_from_yaml(path),
            _ => Self::load_from_file(path),
        }
    }

    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).with_context(|| {
            format!("Failed to read config from {}", path.as_ref().display())
        })?;

        let config: Self = toml::from_str(&content).with_context(|| {
            format!("Failed to parse TOML config from {}", path.as_ref().display())
        })?;

        Ok(config)
    }

    /// Load configuration from YAML file
    pub fn load_from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).with_context(|| {
            format!("Failed to read config from {}", path.as_ref().display())
        })?;

        let config: Self = serde_yaml::from_str(&content).with_context(|| {
            format!("Failed to parse YAML config from {}", path.as_ref().display())
        })?;

        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write config to {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Full path of `osore.owl`
    pub fn osore_file(&self) -> PathBuf {
        self.ontologies.osore_path.join(OSORE_FILE_NAME)
    }

    /// Validate configuration; missing directories are reported, not fatal
    pub fn validate(&self) -> Result<Vec<String>> {
        let mut warnings = Vec::new();

        let directories = [
            ("ontologies.input_path", &self.ontologies.input_path),
            ("ontologies.output_path", &self.ontologies.output_path),
            ("ontologies.osore_path", &self.ontologies.osore_path),
            ("datasets.input_path", &self.datasets.input_path),
            ("datasets.output_path", &self.datasets.output_path),
        ];
        for (name, path) in directories {
            if !path.is_dir() {
                warnings.push(format!("{} does not exist: {}", name, path.display()));
            }
        }

        if self.ontologies.osore_path.is_dir() && !self.osore_file().is_file() {
            warnings.push(format!("{} not found", self.osore_file().display()));
        }

        Ok(warnings)
    }

    /// Create example configuration file
    pub fn create_example_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let config = Self::default();
        config.save_to_file(path)
    }
}
