//! Discovery Module for the Lona compiler
//!
//! Walks a workspace for component descriptions and image assets. Results are a
//! fully materialized, lexicographically ordered list; processing happens
//! afterwards, one file at a time.

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

use crate::document::ComponentDocument;
use crate::error::{ConvertError, DecodeError, WorkspaceError};
use crate::render::ComponentLookup;
use crate::workspace::{Workspace, COMPONENT_EXTENSION, CONFIG_FILE};

pub const COMPONENT_GLOBS: &[&str] = &["**/*.component"];
pub const ASSET_GLOBS: &[&str] = &[
    "**/*.png",
    "**/*.jpg",
    "**/*.jpeg",
    "**/*.gif",
    "**/*.svg",
];

// ═══════════════════════════════════════════════════════════════════════════════
// FILE DISCOVERY
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiscoveredFiles {
    pub components: Vec<PathBuf>,
    pub assets: Vec<PathBuf>,
}

/// Finds component and asset files under the workspace. `exclude` (typically the
/// output directory) is never descended into.
pub fn discover(
    workspace: &Workspace,
    exclude: Option<&Path>,
) -> Result<DiscoveredFiles, WorkspaceError> {
    let ignore = workspace
        .config()
        .ignore_set()
        .map_err(|message| WorkspaceError::Config {
            path: workspace.root().join(CONFIG_FILE),
            message,
        })?;
    let exclude = exclude.and_then(|p| p.canonicalize().ok());

    let root = workspace.root();
    let components = find_files(root, &glob_set(COMPONENT_GLOBS), &ignore, exclude.as_deref());
    let assets = find_files(root, &glob_set(ASSET_GLOBS), &ignore, exclude.as_deref());
    Ok(DiscoveredFiles { components, assets })
}

fn glob_set(patterns: &[&str]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        if let Ok(glob) = Glob::new(pattern) {
            builder.add(glob);
        }
    }
    builder.build().unwrap_or_else(|_| GlobSet::empty())
}

fn find_files(
    root: &Path,
    patterns: &GlobSet,
    ignore: &GlobSet,
    exclude: Option<&Path>,
) -> Vec<PathBuf> {
    let mut files = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| match exclude {
            // The walk root itself is never excluded, even when it is the output.
            Some(excluded) if entry.depth() > 0 => entry
                .path()
                .canonicalize()
                .map(|p| p != excluded)
                .unwrap_or(true),
            _ => true,
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable path during discovery");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(root) else {
            continue;
        };
        if patterns.is_match(relative) && !ignore.is_match(relative) {
            files.push(entry.path().to_path_buf());
        }
    }

    files
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMPONENT LOADING
// ═══════════════════════════════════════════════════════════════════════════════

/// Component name from its file name, extension stripped.
pub fn component_name(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}

/// Reads and decodes one component file.
pub fn load_component(
    workspace: &Workspace,
    path: &Path,
) -> Result<ComponentDocument, ConvertError> {
    let source = fs::read_to_string(path).map_err(|e| ConvertError::io(path, e))?;
    let name = component_name(path)
        .ok_or_else(|| DecodeError::malformed("invalid component file name"))?;
    let relative = workspace
        .relative_path(path)
        .unwrap_or(path)
        .with_extension("");
    ComponentDocument::parse(&name, relative, &source)
}

/// Lazily decodes sibling components by name from the discovered file set.
pub struct WorkspaceComponents<'a> {
    workspace: &'a Workspace,
    index: HashMap<String, PathBuf>,
}

impl<'a> WorkspaceComponents<'a> {
    pub fn new(workspace: &'a Workspace, files: &[PathBuf]) -> Self {
        let mut index: HashMap<String, PathBuf> = HashMap::new();
        for path in files {
            let Some(name) = component_name(path) else {
                continue;
            };
            if let Some(existing) = index.get(&name) {
                warn!(
                    name = %name,
                    kept = %existing.display(),
                    ignored = %path.display(),
                    "duplicate component name"
                );
                continue;
            }
            index.insert(name, path.clone());
        }
        Self { workspace, index }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl ComponentLookup for WorkspaceComponents<'_> {
    fn lookup(&self, name: &str) -> Result<ComponentDocument, ConvertError> {
        let path = self
            .index
            .get(name)
            .ok_or_else(|| ConvertError::ComponentNotFound(name.to_string()))?;
        load_component(self.workspace, path)
    }
}

/// Extension check for paths given directly on the command line.
pub fn is_component_file(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == COMPONENT_EXTENSION)
}
