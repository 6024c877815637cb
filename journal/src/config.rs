//! Journal configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Where the journal and its bundled data live, plus presentation-layer
/// polling cadence. All fields have defaults so an empty config is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalConfig {
    /// Directory holding the experience document.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Experience document file name.
    #[serde(default = "default_experiences_file")]
    pub experiences_file: String,

    /// Bundled reference dataset file name.
    #[serde(default = "default_substance_data_file")]
    pub substance_data_file: String,

    /// Bundled quick-add substance token list.
    #[serde(default = "default_substances_list_file")]
    pub substances_list_file: String,

    /// Bundled quick-add route token list.
    #[serde(default = "default_routes_list_file")]
    pub routes_list_file: String,

    /// How often the presentation layer re-reads "now" for active-ingestion
    /// and progress displays, in seconds.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_experiences_file() -> String {
    "experiences.json".to_string()
}
fn default_substance_data_file() -> String {
    "data.json".to_string()
}
fn default_substances_list_file() -> String {
    "substances.json".to_string()
}
fn default_routes_list_file() -> String {
    "routes.json".to_string()
}
fn default_refresh_interval() -> u64 {
    10
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            experiences_file: default_experiences_file(),
            substance_data_file: default_substance_data_file(),
            substances_list_file: default_substances_list_file(),
            routes_list_file: default_routes_list_file(),
            refresh_interval_secs: default_refresh_interval(),
        }
    }
}

impl JournalConfig {
    /// Load config from YAML.
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Root the data directory somewhere specific.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Full path of the experience document.
    pub fn experiences_path(&self) -> PathBuf {
        self.data_dir.join(&self.experiences_file)
    }

    /// Full path of a bundled data file.
    pub fn data_path(&self, file: &str) -> PathBuf {
        Path::new(&self.data_dir).join(file)
    }
}
