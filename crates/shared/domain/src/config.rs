use serde::Deserialize;
use std::path::PathBuf;

/// Settings the process needs before the directive document can be read.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Location of the directive document.
    pub document: DocumentConfig,
    pub log: LogConfig,
}

/// Where the directive document lives.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    pub path: PathBuf,
}

/// Startup logging. The `log` module may narrow the filter once the document is loaded.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub console: bool,
    pub path: Option<PathBuf>,
    pub json: bool,
    pub max_files: usize,
}

// --- Default ---

impl Default for DocumentConfig {
    fn default() -> Self {
        Self { path: PathBuf::from("conf/cradle.yaml") }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), console: true, path: None, json: false, max_files: 10 }
    }
}
