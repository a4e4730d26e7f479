//! Workspace Configuration
//!
//! Optional `calltrail.toml` at the workspace root. Every field has a
//! default; an absent file means an all-default config.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackError};

pub const CONFIG_FILE: &str = "calltrail.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the state database lives. Default: `.calltrail` under the
    /// workspace root.
    pub state_dir: Option<PathBuf>,

    /// Worker count for the parallel workspace scan.
    pub scan_workers: Option<usize>,

    /// Files at least this many bytes are memory-mapped when read.
    pub mmap_threshold: Option<u64>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|err| TrackError::Config(err.to_string()))
    }

    pub fn load_or_default(workspace_root: &Path) -> Result<Self> {
        let candidate = workspace_root.join(CONFIG_FILE);
        if candidate.exists() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    pub fn state_dir(&self, workspace_root: &Path) -> PathBuf {
        self.state_dir
            .clone()
            .unwrap_or_else(|| workspace_root.join(".calltrail"))
    }
}
