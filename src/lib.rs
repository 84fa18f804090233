//! # Lona Compiler
//!
//! Converts a Lona workspace (color tokens, text styles, `.component` files and
//! image assets) into source for one target syntax.
//!
//! ## Pipeline Invariants
//!
//! 1. **Token order**: colors are parsed before text styles, and both are written
//!    before any component is rendered.
//! 2. **Failure isolation**: a component that fails to decode or render is logged
//!    with its classified kind (`LONA-ERR-*`) and the batch moves on.
//! 3. **Preserved regions**: a regenerated file keeps everything up to its first
//!    `LONA: KEEP ABOVE` line and from its first `LONA: KEEP BELOW` line.
//! 4. **Explicit context**: target and framework travel in a `RenderContext`;
//!    there is no ambient selection state.

#[cfg(feature = "napi")]
use napi_derive::napi;

pub mod config;
pub mod convert;
pub mod discovery;
pub mod document;
pub mod error;
pub mod merge;
pub mod render;
pub mod target;
pub mod tokens;
pub mod workspace;

#[cfg(test)]
mod convert_tests;
#[cfg(test)]
mod render_tests;

pub use convert::{convert_component, convert_workspace, resolve_context, ConvertReport};
pub use document::ComponentDocument;
pub use error::{ConvertError, DecodeError, FailureKind, TargetError, WorkspaceError};
pub use merge::merge;
pub use target::{Framework, RenderContext, Target};
pub use tokens::{convert_colors, convert_text_styles};
pub use workspace::Workspace;

// ═══════════════════════════════════════════════════════════════════════════════
// NODE BINDING
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(feature = "napi")]
fn native_context(
    target: &str,
    framework: Option<String>,
    workspace: Option<&Workspace>,
) -> napi::Result<RenderContext> {
    let target: Target = target
        .parse()
        .map_err(|e: TargetError| napi::Error::from_reason(e.to_string()))?;
    let framework = framework
        .map(|fw| fw.parse::<Framework>())
        .transpose()
        .map_err(|e| napi::Error::from_reason(e.to_string()))?;
    resolve_context(target, framework, workspace)
        .map_err(|e| napi::Error::from_reason(e.to_string()))
}

/// Converts a whole workspace and returns the report as JSON.
#[cfg(feature = "napi")]
#[napi]
pub fn convert_workspace_native(
    target: String,
    workspace: String,
    output: String,
    framework: Option<String>,
) -> napi::Result<serde_json::Value> {
    let workspace = Workspace::open(std::path::Path::new(&workspace))
        .map_err(|e| napi::Error::from_reason(e.to_string()))?;
    let ctx = native_context(&target, framework, Some(&workspace))?;
    let report = convert_workspace(&workspace, &ctx, std::path::Path::new(&output))
        .map_err(|e| napi::Error::from_reason(format!("[{}] {}", e.kind(), e)))?;
    serde_json::to_value(report).map_err(|e| napi::Error::from_reason(e.to_string()))
}

#[cfg(feature = "napi")]
#[napi]
pub fn convert_colors_native(target: String, colors: String) -> napi::Result<String> {
    let ctx = native_context(&target, None, None)?;
    convert_colors(&ctx, &colors).map_err(|e| napi::Error::from_reason(e.to_string()))
}
