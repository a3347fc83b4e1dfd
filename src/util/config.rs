//! Configuration file support.
//!
//! Two optional locations are read:
//! - Global: `~/.analyzer/config.toml` - user-wide defaults
//! - Project: `<project>/.analyzer/config.toml` - project-specific overrides
//!
//! Project config takes precedence over global config. A missing file means
//! defaults; an unreadable one is reported and ignored.
//!
//! ```toml
//! [output]
//! dir = "deliverables/documentation"
//! file = "Documentation.html"
//!
//! [discovery]
//! exclude = ["tests/assets"]
//!
//! [analysis]
//! fail_fast = false
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "deliverables/documentation";

/// Default report file name.
pub const DEFAULT_OUTPUT_FILE: &str = "Documentation.html";

/// Directory suffix of the analyzer's own test fixtures.
pub const TEST_ASSET_DIR: &str = "tests/assets";

/// Analyzer configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Report output settings
    pub output: OutputConfig,

    /// Workflow discovery settings
    pub discovery: DiscoveryConfig,

    /// Analysis behavior
    pub analysis: AnalysisConfig,
}

/// Where the report is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory (relative paths resolve against the working directory)
    pub dir: PathBuf,

    /// Report file name
    pub file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            file: DEFAULT_OUTPUT_FILE.to_string(),
        }
    }
}

/// Which files count as workflows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Directory suffixes whose workflows are skipped
    pub exclude: Vec<String>,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        DiscoveryConfig {
            exclude: vec![TEST_ASSET_DIR.to_string()],
        }
    }
}

/// How broken workflows are handled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Abort on the first workflow that fails to parse instead of skipping it
    pub fail_fast: bool,
}

/// Section overrides as read from one file; unset keys do not override.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct PartialConfig {
    output: PartialOutput,
    discovery: PartialDiscovery,
    analysis: PartialAnalysis,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct PartialOutput {
    dir: Option<PathBuf>,
    file: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct PartialDiscovery {
    exclude: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct PartialAnalysis {
    fail_fast: Option<bool>,
}

impl Config {
    /// Load configuration from a single file, on top of the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = Config::default();
        config.merge(read_partial(path)?);
        Ok(config)
    }

    /// Merge another file's settings into this one (other takes precedence).
    fn merge(&mut self, other: PartialConfig) {
        if let Some(dir) = other.output.dir {
            self.output.dir = dir;
        }
        if let Some(file) = other.output.file {
            self.output.file = file;
        }
        if let Some(exclude) = other.discovery.exclude {
            self.discovery.exclude = exclude;
        }
        if let Some(fail_fast) = other.analysis.fail_fast {
            self.analysis.fail_fast = fail_fast;
        }
    }

    /// Merge a file if it exists, warning if it cannot be read.
    fn merge_file(&mut self, path: &Path) {
        if !path.exists() {
            return;
        }
        match read_partial(path) {
            Ok(partial) => {
                tracing::debug!("loaded config from {}", path.display());
                self.merge(partial);
            }
            Err(e) => tracing::warn!("Failed to load config from {}: {:#}", path.display(), e),
        }
    }

    /// Full path of the report, resolving a relative output dir against `cwd`.
    pub fn output_path(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.output.dir).join(&self.output.file)
    }
}

fn read_partial(path: &Path) -> Result<PartialConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file: {}", path.display()))?;

    toml::from_str(&contents)
        .with_context(|| format!("failed to parse config file: {}", path.display()))
}

/// Load merged configuration from global and project locations.
///
/// Order of precedence (highest to lowest):
/// 1. Project config (`<project>/.analyzer/config.toml`)
/// 2. Global config (`~/.analyzer/config.toml`)
/// 3. Defaults
pub fn load_config(global_path: Option<&Path>, project_path: &Path) -> Config {
    let mut config = Config::default();

    if let Some(global_path) = global_path {
        config.merge_file(global_path);
    }
    config.merge_file(project_path);

    config
}

/// Get the global config path (`~/.analyzer/config.toml`).
pub fn global_config_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|b| b.home_dir().join(".analyzer").join("config.toml"))
}

/// Get the project config path (`<project>/.analyzer/config.toml`).
pub fn project_config_path(project_root: &Path) -> PathBuf {
    project_root.join(".analyzer").join("config.toml")
}
