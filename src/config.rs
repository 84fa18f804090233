//! Optional per-workspace settings read from `lona.json`.

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::WorkspaceError;
use crate::target::Framework;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WorkspaceConfig {
    /// Framework used when none is given on the command line.
    #[serde(default)]
    pub framework: Option<Framework>,
    /// Globs, relative to the workspace root, excluded from discovery.
    #[serde(default)]
    pub ignore: Vec<String>,
}

impl WorkspaceConfig {
    /// A missing file yields the default config.
    pub fn load(path: &Path) -> Result<Self, WorkspaceError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path).map_err(|source| WorkspaceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: WorkspaceConfig =
            serde_json::from_str(&raw).map_err(|e| WorkspaceError::Config {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        // Globs are validated at load time.
        config.ignore_set().map_err(|message| WorkspaceError::Config {
            path: path.to_path_buf(),
            message,
        })?;
        Ok(config)
    }

    pub fn ignore_set(&self) -> Result<GlobSet, String> {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.ignore {
            let glob = Glob::new(pattern).map_err(|e| format!("invalid ignore glob: {e}"))?;
            builder.add(glob);
        }
        builder.build().map_err(|e| e.to_string())
    }
}
