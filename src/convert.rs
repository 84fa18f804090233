//! Convert Module for the Lona compiler
//!
//! The batch pipeline: tokens first, then static support files, then every
//! discovered component, then assets. Component failures are recorded in the
//! report and never stop the batch. Token failures are fatal since every
//! component depends on them.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::discovery::{self, WorkspaceComponents};
use crate::error::{ConvertError, FailureKind, TargetError};
use crate::merge;
use crate::target::{Framework, RenderContext, Target};
use crate::tokens::{Tokens, COLORS_OUTPUT, TEXT_STYLES_OUTPUT};
use crate::workspace::Workspace;

// ═══════════════════════════════════════════════════════════════════════════════
// REPORT
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileFailure {
    pub path: PathBuf,
    pub kind: FailureKind,
    pub message: String,
}

/// Everything one batch run wrote or skipped. All paths are absolute, rooted at
/// the canonical output directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertReport {
    pub tokens: Vec<PathBuf>,
    pub static_files: Vec<PathBuf>,
    /// Output paths of components that were written.
    pub converted: Vec<PathBuf>,
    /// Source paths of components and assets that failed.
    pub failures: Vec<FileFailure>,
    pub assets: Vec<PathBuf>,
}

impl ConvertReport {
    /// Components discovered, whether converted or failed.
    pub fn discovered(&self) -> usize {
        self.converted.len()
            + self
                .failures
                .iter()
                .filter(|f| f.kind != FailureKind::Asset)
                .count()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CONTEXT RESOLUTION
// ═══════════════════════════════════════════════════════════════════════════════

/// Framework precedence: explicit argument, then `lona.json`, then the target
/// default. A configured framework from another target is ignored for targets
/// that cannot use it, an explicit one is an error.
pub fn resolve_context(
    target: Target,
    framework: Option<Framework>,
    workspace: Option<&Workspace>,
) -> Result<RenderContext, TargetError> {
    if framework.is_some() {
        return RenderContext::new(target, framework);
    }
    let configured = workspace
        .and_then(|w| w.config().framework)
        .filter(|fw| target.frameworks().contains(fw));
    RenderContext::new(target, configured)
}

// ═══════════════════════════════════════════════════════════════════════════════
// BATCH CONVERSION
// ═══════════════════════════════════════════════════════════════════════════════

/// Output location of a workspace file: same relative directory, new extension.
pub fn output_path(workspace: &Workspace, file: &Path, output_dir: &Path, ext: &str) -> PathBuf {
    let relative = workspace.relative_path(file).unwrap_or(file);
    output_dir.join(relative).with_extension(ext)
}

pub fn convert_workspace(
    workspace: &Workspace,
    ctx: &RenderContext,
    output_dir: &Path,
) -> Result<ConvertReport, ConvertError> {
    info!(
        workspace = %workspace.root().display(),
        output = %output_dir.display(),
        target = %ctx.target,
        "converting workspace"
    );

    let tokens = Tokens::load(workspace)?;
    fs::create_dir_all(output_dir).map_err(|e| ConvertError::io(output_dir, e))?;
    let output_dir = output_dir
        .canonicalize()
        .map_err(|e| ConvertError::io(output_dir, e))?;
    let output_dir = output_dir.as_path();

    let mut report = ConvertReport::default();
    write_tokens(ctx, &tokens, output_dir, &mut report)?;
    write_static_files(ctx, output_dir, &mut report)?;

    let files = discovery::discover(workspace, Some(output_dir))?;
    let siblings = WorkspaceComponents::new(workspace, &files.components);
    debug!(
        components = files.components.len(),
        assets = files.assets.len(),
        "discovered workspace files"
    );

    for path in &files.components {
        let out = output_path(workspace, path, output_dir, ctx.extension());
        match convert_file(workspace, ctx, &tokens, &siblings, path, &out) {
            Ok(()) => {
                debug!(path = %path.display(), output = %out.display(), "converted component");
                report.converted.push(out);
            }
            Err(e) => {
                warn!(path = %path.display(), kind = %e.kind(), error = %e, "component failed");
                report.failures.push(FileFailure {
                    path: path.clone(),
                    kind: e.kind(),
                    message: e.to_string(),
                });
            }
        }
    }

    for path in &files.assets {
        let relative = workspace.relative_path(path).unwrap_or(path);
        let out = output_dir.join(relative);
        match copy_asset(path, &out) {
            Ok(()) => report.assets.push(out),
            Err(e) => {
                let kind = FailureKind::Asset;
                warn!(path = %path.display(), kind = %kind, error = %e, "asset copy failed");
                report.failures.push(FileFailure {
                    path: path.clone(),
                    kind,
                    message: e.to_string(),
                });
            }
        }
    }

    info!(
        converted = report.converted.len(),
        failed = report.failures.len(),
        assets = report.assets.len(),
        "conversion finished"
    );
    Ok(report)
}

fn write_tokens(
    ctx: &RenderContext,
    tokens: &Tokens,
    output_dir: &Path,
    report: &mut ConvertReport,
) -> Result<(), ConvertError> {
    let colors = ctx.render_colors(&tokens.colors);
    let colors_path = output_dir.join(COLORS_OUTPUT).with_extension(ctx.extension());
    write_file(&colors_path, &colors)?;
    report.tokens.push(colors_path);

    let text_styles = ctx.render_text_styles(&tokens.colors, &tokens.text_styles)?;
    let text_styles_path = output_dir
        .join(TEXT_STYLES_OUTPUT)
        .with_extension(ctx.extension());
    write_file(&text_styles_path, &text_styles)?;
    report.tokens.push(text_styles_path);
    Ok(())
}

fn write_static_files(
    ctx: &RenderContext,
    output_dir: &Path,
    report: &mut ConvertReport,
) -> Result<(), ConvertError> {
    for file in ctx.static_files() {
        let path = output_dir.join(file.path);
        write_file(&path, file.contents)?;
        report.static_files.push(path);
    }
    Ok(())
}

/// Parse, render, merge and write one component.
fn convert_file(
    workspace: &Workspace,
    ctx: &RenderContext,
    tokens: &Tokens,
    siblings: &WorkspaceComponents<'_>,
    path: &Path,
    out: &Path,
) -> Result<(), ConvertError> {
    let document = discovery::load_component(workspace, path)?;
    let generated =
        ctx.render_component(&tokens.colors, &tokens.text_styles, siblings, &document)?;
    let merged = merge::merge_with_file(&generated, out).map_err(|e| ConvertError::io(out, e))?;
    write_file(out, &merged)
}

fn write_file(path: &Path, contents: &str) -> Result<(), ConvertError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ConvertError::io(parent, e))?;
    }
    fs::write(path, contents).map_err(|e| ConvertError::io(path, e))
}

fn copy_asset(from: &Path, to: &Path) -> std::io::Result<()> {
    if from == to {
        return Ok(());
    }
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(from, to).map(|_| ())
}

// ═══════════════════════════════════════════════════════════════════════════════
// SINGLE COMPONENT
// ═══════════════════════════════════════════════════════════════════════════════

/// Renders one component without merging or writing. The workspace is located
/// from the component's own path unless given.
pub fn convert_component(
    ctx: &RenderContext,
    path: &Path,
    workspace: Option<&Workspace>,
) -> Result<String, ConvertError> {
    let located;
    let workspace = match workspace {
        Some(workspace) => workspace,
        None => {
            located = Workspace::locate(path)?;
            &located
        }
    };

    let tokens = Tokens::load(workspace)?;
    let path = path
        .canonicalize()
        .map_err(|e| ConvertError::io(path, e))?;
    let files = discovery::discover(workspace, None)?;
    let siblings = WorkspaceComponents::new(workspace, &files.components);

    let document = discovery::load_component(workspace, &path)?;
    ctx.render_component(&tokens.colors, &tokens.text_styles, &siblings, &document)
}
