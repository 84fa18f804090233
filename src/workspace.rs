//! Workspace Module for the Lona compiler
//!
//! A workspace is the nearest directory holding `colors.json`. It is resolved once
//! per run and treated as read-only afterwards.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::WorkspaceConfig;
use crate::error::WorkspaceError;

pub const COLORS_FILE: &str = "colors.json";
pub const TEXT_STYLES_FILE: &str = "textStyles.json";
pub const CONFIG_FILE: &str = "lona.json";
pub const COMPONENT_EXTENSION: &str = "component";

#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
    config: WorkspaceConfig,
}

impl Workspace {
    /// Walks from `start` (file or directory) towards the filesystem root and
    /// returns the first directory containing the color-token marker.
    pub fn locate(start: &Path) -> Result<Self, WorkspaceError> {
        let root = find_root(start).ok_or_else(|| WorkspaceError::NotFound {
            start: start.to_path_buf(),
        })?;
        Self::with_root(root)
    }

    /// Opens `root` directly; the marker must be present.
    pub fn open(root: &Path) -> Result<Self, WorkspaceError> {
        let root = absolute(root);
        if !root.join(COLORS_FILE).is_file() {
            return Err(WorkspaceError::MissingMarker { root });
        }
        Self::with_root(root)
    }

    fn with_root(root: PathBuf) -> Result<Self, WorkspaceError> {
        let config = WorkspaceConfig::load(&root.join(CONFIG_FILE))?;
        Ok(Self { root, config })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    pub fn colors_path(&self) -> PathBuf {
        self.root.join(COLORS_FILE)
    }

    pub fn text_styles_path(&self) -> PathBuf {
        self.root.join(TEXT_STYLES_FILE)
    }

    pub fn read_colors(&self) -> Result<String, WorkspaceError> {
        let path = self.colors_path();
        fs::read_to_string(&path).map_err(|source| WorkspaceError::Io { path, source })
    }

    /// `None` when the workspace has no text-style file.
    pub fn read_text_styles(&self) -> Result<Option<String>, WorkspaceError> {
        let path = self.text_styles_path();
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|source| WorkspaceError::Io { path, source })
    }

    /// Path of `file` relative to the workspace root, if it lies inside it.
    pub fn relative_path<'a>(&self, file: &'a Path) -> Option<&'a Path> {
        file.strip_prefix(&self.root).ok()
    }
}

fn absolute(path: &Path) -> PathBuf {
    path.canonicalize()
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

fn find_root(start: &Path) -> Option<PathBuf> {
    let start = absolute(start);
    let start_dir = if start.is_file() {
        start.parent()?.to_path_buf()
    } else {
        start
    };

    start_dir
        .ancestors()
        .find(|dir| dir.join(COLORS_FILE).is_file())
        .map(Path::to_path_buf)
}
