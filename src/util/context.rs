//! Global context for analyzer operations.
//!
//! Holds the directories a run works with and the configuration merged
//! for the target project.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::util::config::{global_config_path, load_config, project_config_path, Config};

/// Paths and configuration shared by one run.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    cwd: PathBuf,
    project_dir: PathBuf,
    config: Config,
}

impl GlobalContext {
    /// Create a context from the process environment.
    ///
    /// Without an explicit project directory, the parent of the current
    /// directory is analyzed.
    pub fn new(project_dir: Option<PathBuf>) -> Result<Self> {
        let cwd = env::current_dir().context("failed to get current directory")?;
        let project_dir = match project_dir {
            Some(dir) => dir,
            None => default_project_dir(&cwd)?,
        };
        Ok(Self::with_paths(cwd, project_dir))
    }

    /// Create a context for explicit paths, loading the project's config.
    pub fn with_paths(cwd: PathBuf, project_dir: PathBuf) -> Self {
        let project_dir = if project_dir.is_absolute() {
            project_dir
        } else {
            cwd.join(project_dir)
        };
        let config = load_config(
            global_config_path().as_deref(),
            &project_config_path(&project_dir),
        );
        GlobalContext {
            cwd,
            project_dir,
            config,
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Directory relative output paths resolve against.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// The project being analyzed.
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Where the report is written.
    pub fn output_path(&self) -> PathBuf {
        self.config.output_path(&self.cwd)
    }
}

fn default_project_dir(cwd: &Path) -> Result<PathBuf> {
    let canonical = cwd
        .canonicalize()
        .with_context(|| format!("failed to resolve {}", cwd.display()))?;
    Ok(canonical
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or(canonical))
}
