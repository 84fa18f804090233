//! Merge Module for the Lona compiler
//!
//! Regenerated files keep developer-owned regions of the file they replace. A
//! line containing `LONA: KEEP ABOVE` ends a preserved prefix; a line containing
//! `LONA: KEEP BELOW` starts a preserved suffix. Regions come only from the
//! existing file, never from the new content.
//!
//! When a marker occurs more than once, the first occurrence from the top wins.

use std::fs;
use std::io;
use std::path::Path;

pub const KEEP_ABOVE: &str = "LONA: KEEP ABOVE";
pub const KEEP_BELOW: &str = "LONA: KEEP BELOW";

/// Regions lifted out of an existing output file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreservedRegions {
    /// Lines from the start through the `KEEP ABOVE` marker line.
    pub prefix: Option<String>,
    /// Lines from the `KEEP BELOW` marker line through the end.
    pub suffix: Option<String>,
}

impl PreservedRegions {
    pub fn extract(existing: &str) -> Self {
        let lines: Vec<&str> = existing.split('\n').collect();

        let prefix = lines
            .iter()
            .position(|line| line.contains(KEEP_ABOVE))
            .map(|k| lines[..=k].join("\n"));
        let suffix = lines
            .iter()
            .position(|line| line.contains(KEEP_BELOW))
            .map(|k| lines[k..].join("\n"));

        Self { prefix, suffix }
    }

    pub fn is_empty(&self) -> bool {
        self.prefix.is_none() && self.suffix.is_none()
    }

    /// `prefix + "\n\n" + generated + "\n" + suffix`, omitting absent regions.
    pub fn apply(&self, generated: &str) -> String {
        let mut out = String::new();
        if let Some(prefix) = &self.prefix {
            out.push_str(prefix);
            out.push_str("\n\n");
        }
        out.push_str(generated);
        if let Some(suffix) = &self.suffix {
            out.push('\n');
            out.push_str(suffix);
        }
        out
    }
}

/// Splices the preserved regions of `existing` around `generated`.
pub fn merge(generated: &str, existing: Option<&str>) -> String {
    match existing {
        Some(existing) => PreservedRegions::extract(existing).apply(generated),
        None => generated.to_string(),
    }
}

/// Reads whatever is currently at `path` and merges `generated` with it.
pub fn merge_with_file(generated: &str, path: &Path) -> io::Result<String> {
    match fs::read_to_string(path) {
        Ok(existing) => Ok(merge(generated, Some(&existing))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(merge(generated, None)),
        Err(e) => Err(e),
    }
}
