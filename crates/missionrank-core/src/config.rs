use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::limits::TraversalLimits;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub pagerank: PageRankConfig,
    #[serde(default)]
    pub limits: TraversalLimits,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Configuration for PageRank computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageRankConfig {
    /// Damping factor (probability of following a link vs teleporting).
    /// Default: 0.85.
    #[serde(default = "default_damping")]
    pub damping: f64,
    /// Convergence threshold: stop when L1 norm of rank delta < tolerance.
    /// Default: 1e-6.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Maximum number of iterations.
    /// Default: 100.
    #[serde(default = "default_max_iter")]
    pub max_iter: usize,
}

impl Default for PageRankConfig {
    fn default() -> Self {
        Self {
            damping: default_damping(),
            tolerance: default_tolerance(),
            max_iter: default_max_iter(),
        }
    }
}

/// Where the CLI writes result artifacts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
    #[serde(default = "default_true")]
    pub save: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            save: default_true(),
        }
    }
}

/// Load the scoring config.
///
/// Resolution order: `explicit` path (must exist), then
/// `<config dir>/missionrank/config.toml`, then built-in defaults.
///
/// # Errors
///
/// Returns an error if a config file exists but cannot be read or parsed, or
/// if `explicit` does not exist.
pub fn load_config(explicit: Option<&Path>) -> Result<ScoringConfig> {
    if let Some(path) = explicit {
        return read_config(path);
    }

    let Some(config_dir) = dirs::config_dir() else {
        return Ok(ScoringConfig::default());
    };

    let path = config_dir.join("missionrank/config.toml");
    if !path.exists() {
        return Ok(ScoringConfig::default());
    }

    read_config(&path)
}

fn read_config(path: &Path) -> Result<ScoringConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let config = toml::from_str::<ScoringConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    if !(0.0..1.0).contains(&config.pagerank.damping) {
        anyhow::bail!(
            "{}: pagerank.damping must be in [0, 1), got {}",
            path.display(),
            config.pagerank.damping
        );
    }

    Ok(config)
}

const fn default_true() -> bool {
    true
}

const fn default_damping() -> f64 {
    0.85
}

const fn default_tolerance() -> f64 {
    1e-6
}

const fn default_max_iter() -> usize {
    100
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("saved_files")
}
