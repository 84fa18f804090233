//! Error Module for the Lona compiler
//!
//! Boundary errors (`TargetError`, `WorkspaceError`) stop a run before any output
//! is produced. `ConvertError` is the per-file taxonomy the batch converter logs
//! and moves past.

use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// ERROR CODES
// ═══════════════════════════════════════════════════════════════════════════════

pub const ERR_DECODE: &str = "LONA-ERR-DECODE";
pub const ERR_UNKNOWN_PARAMETER: &str = "LONA-ERR-UNKNOWN-PARAMETER";
pub const ERR_UNKNOWN_EXPRESSION: &str = "LONA-ERR-UNKNOWN-EXPRESSION";
pub const ERR_COMPONENT_NOT_FOUND: &str = "LONA-ERR-COMPONENT-NOT-FOUND";
pub const ERR_ASSET: &str = "LONA-ERR-ASSET";
pub const ERR_OTHER: &str = "LONA-ERR-OTHER";

// ═══════════════════════════════════════════════════════════════════════════════
// BOUNDARY ERRORS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TargetError {
    #[error("unrecognized target '{0}' (expected one of: js, swift, xml)")]
    Unknown(String),

    #[error("unrecognized framework '{0}'")]
    UnknownFramework(String),

    /// A framework variant was requested that the target cannot render.
    #[error("framework '{framework}' is not available for target '{target}'")]
    FrameworkMismatch { target: String, framework: String },
}

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error(
        "no workspace found: no directory above {} contains colors.json; \
         specify the workspace explicitly with --workspace",
        start.display()
    )]
    NotFound { start: PathBuf },

    #[error("{} is not a workspace: colors.json is missing", root.display())]
    MissingMarker { root: PathBuf },

    #[error("invalid workspace config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

// ═══════════════════════════════════════════════════════════════════════════════
// DECODE ERRORS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("color '{id}' has an invalid value '{value}'")]
    InvalidColor { id: String, value: String },

    #[error("text style '{style}' references unknown color '{color}'")]
    UnknownColor { style: String, color: String },

    #[error("{0}")]
    Malformed(String),
}

impl DecodeError {
    pub fn malformed(message: impl Into<String>) -> Self {
        DecodeError::Malformed(message.into())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// PER-FILE CONVERSION ERRORS
// ═══════════════════════════════════════════════════════════════════════════════

/// Classification used when logging a failed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FailureKind {
    Decode,
    UnknownParameter,
    UnknownExpressionType,
    ComponentNotFound,
    /// An image that could not be copied to the output.
    Asset,
    Other,
}

impl FailureKind {
    pub fn code(self) -> &'static str {
        match self {
            FailureKind::Decode => ERR_DECODE,
            FailureKind::UnknownParameter => ERR_UNKNOWN_PARAMETER,
            FailureKind::UnknownExpressionType => ERR_UNKNOWN_EXPRESSION,
            FailureKind::ComponentNotFound => ERR_COMPONENT_NOT_FOUND,
            FailureKind::Asset => ERR_ASSET,
            FailureKind::Other => ERR_OTHER,
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("unknown parameter '{name}' in {context}")]
    UnknownParameter { context: String, name: String },

    #[error("unknown expression type '{0}'")]
    UnknownExpressionType(String),

    #[error("component not found: {0}")]
    ComponentNotFound(String),

    #[error("target '{target}' does not support {operation}")]
    Unsupported {
        target: &'static str,
        operation: &'static str,
    },

    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ConvertError {
    pub fn kind(&self) -> FailureKind {
        match self {
            ConvertError::Decode(_) => FailureKind::Decode,
            ConvertError::UnknownParameter { .. } => FailureKind::UnknownParameter,
            ConvertError::UnknownExpressionType(_) => FailureKind::UnknownExpressionType,
            ConvertError::ComponentNotFound(_) => FailureKind::ComponentNotFound,
            ConvertError::Unsupported { .. }
            | ConvertError::Workspace(_)
            | ConvertError::Io { .. } => FailureKind::Other,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn unknown_parameter(context: impl Into<String>, name: impl Into<String>) -> Self {
        ConvertError::UnknownParameter {
            context: context.into(),
            name: name.into(),
        }
    }
}

impl From<serde_json::Error> for ConvertError {
    fn from(err: serde_json::Error) -> Self {
        ConvertError::Decode(DecodeError::Json(err))
    }
}
