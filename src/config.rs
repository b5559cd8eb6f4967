//! TOML configuration for the AKS engine.
//!
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration. CLI flags override file values.
//!
//! ```toml
//! parallel = true
//! threads = 8
//! r_search_limit = 1000000
//! progress_interval_secs = 30
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AksConfig {
    /// Check step-5 witnesses on rayon workers.
    pub parallel: bool,
    /// Rayon pool size; `None` uses all logical cores.
    pub threads: Option<usize>,
    /// Cap on the r search; `None` uses max(3, ⌈log₂ n⌉⁵).
    pub r_search_limit: Option<u64>,
    /// Seconds between witness progress log lines; 0 disables the reporter.
    pub progress_interval_secs: u64,
}

impl Default for AksConfig {
    fn default() -> Self {
        AksConfig {
            parallel: true,
            threads: None,
            r_search_limit: None,
            progress_interval_secs: 30,
        }
    }
}

impl AksConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: AksConfig = toml::from_str(s).context("invalid AKS configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml_str(&contents)
            .with_context(|| format!("failed to load config file {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.threads == Some(0) {
            anyhow::bail!("threads must be at least 1 (omit it to use all cores)");
        }
        if let Some(limit) = self.r_search_limit {
            if limit < 3 {
                anyhow::bail!("r_search_limit must be at least 3, got {}", limit);
            }
        }
        Ok(())
    }
}
