//! Render Module for the Lona compiler
//!
//! Per-target renderers plus the pieces they share: sibling resolution, value
//! resolution against tokens, and identifier/literal formatting.

pub mod js;
pub mod swift;
pub mod xml;

use std::collections::HashMap;
use std::path::{Component, Path};

use crate::document::{ComponentDocument, Layer, LayerKind, Literal, ParamType, ValueShape};
use crate::error::{ConvertError, DecodeError};
use crate::tokens::{ColorSet, Rgba, TextStyleSet};

// ═══════════════════════════════════════════════════════════════════════════════
// SIBLING LOOKUP
// ═══════════════════════════════════════════════════════════════════════════════

/// Resolves another component of the same workspace by name.
pub trait ComponentLookup {
    fn lookup(&self, name: &str) -> Result<ComponentDocument, ConvertError>;
}

impl ComponentLookup for HashMap<String, ComponentDocument> {
    fn lookup(&self, name: &str) -> Result<ComponentDocument, ConvertError> {
        self.get(name)
            .cloned()
            .ok_or_else(|| ConvertError::ComponentNotFound(name.to_string()))
    }
}

/// Sibling documents a component embeds, resolved and checked up front.
pub(crate) struct Siblings {
    documents: Vec<ComponentDocument>,
}

impl Siblings {
    /// Looks up every embedded component and checks the parameters passed to it,
    /// both as layer literals and through logic assignments.
    pub(crate) fn resolve(
        document: &ComponentDocument,
        lookup: &dyn ComponentLookup,
    ) -> Result<Self, ConvertError> {
        let mut documents = Vec::new();
        for name in document.referenced_components() {
            documents.push(lookup.lookup(name)?);
        }
        let siblings = Siblings { documents };

        for layer in document.layers() {
            let LayerKind::Component(name) = &layer.kind else {
                continue;
            };
            let sibling = siblings.get(name)?;
            for parameter in &layer.parameters {
                if sibling.param(&parameter.name).is_none() {
                    return Err(ConvertError::unknown_parameter(
                        format!("component '{name}'"),
                        parameter.name.clone(),
                    ));
                }
            }
        }
        for (layer_id, parameter) in document.assigned_parameters() {
            let Some(layer) = document.find_layer(layer_id) else {
                continue;
            };
            if let LayerKind::Component(name) = &layer.kind {
                if siblings.get(name)?.param(parameter).is_none() {
                    return Err(ConvertError::unknown_parameter(
                        format!("component '{name}'"),
                        parameter,
                    ));
                }
            }
        }
        Ok(siblings)
    }

    pub(crate) fn get(&self, name: &str) -> Result<&ComponentDocument, ConvertError> {
        self.documents
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| ConvertError::ComponentNotFound(name.to_string()))
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &ComponentDocument> {
        self.documents.iter()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// VALUE RESOLUTION
// ═══════════════════════════════════════════════════════════════════════════════

/// How a parameter value is interpreted by the renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValueKind {
    Color,
    Font,
    Plain,
}

impl ValueKind {
    pub(crate) fn for_layer(layer: &Layer, parameter: &str, siblings: &Siblings) -> Self {
        match &layer.kind {
            LayerKind::Component(name) => {
                let ty = siblings
                    .get(name)
                    .ok()
                    .and_then(|doc| doc.param(parameter))
                    .map(|p| p.ty);
                if ty == Some(ParamType::Color) {
                    ValueKind::Color
                } else {
                    ValueKind::Plain
                }
            }
            kind => match kind.parameter_shape(parameter) {
                Some(ValueShape::Color) => ValueKind::Color,
                _ if parameter == "font" => ValueKind::Font,
                _ => ValueKind::Plain,
            },
        }
    }
}

/// A literal after token resolution.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Resolved<'a> {
    ColorToken(&'a str),
    Color(Rgba),
    TextStyle(&'a str),
    Plain(&'a Literal),
}

pub(crate) fn resolve_literal<'a>(
    literal: &'a Literal,
    kind: ValueKind,
    colors: &ColorSet,
    text_styles: &TextStyleSet,
) -> Result<Resolved<'a>, ConvertError> {
    match (kind, literal) {
        (ValueKind::Color, Literal::String(value)) => {
            if colors.contains(value) {
                Ok(Resolved::ColorToken(value))
            } else {
                Rgba::parse(value).map(Resolved::Color).ok_or_else(|| {
                    DecodeError::malformed(format!("unknown color '{value}'")).into()
                })
            }
        }
        (ValueKind::Font, Literal::String(value)) => {
            if text_styles.get(value).is_some() {
                Ok(Resolved::TextStyle(value))
            } else {
                Err(DecodeError::malformed(format!("unknown text style '{value}'")).into())
            }
        }
        (_, literal) => Ok(Resolved::Plain(literal)),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// FORMATTING
// ═══════════════════════════════════════════════════════════════════════════════

pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

/// Double-quoted string literal valid in both JavaScript and Swift.
pub(crate) fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn words(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

fn guard_leading_digit(ident: String) -> String {
    if ident.starts_with(|c: char| c.is_ascii_digit()) || ident.is_empty() {
        format!("_{ident}")
    } else {
        ident
    }
}

/// `"Primary Button"` → `PrimaryButton`.
pub(crate) fn type_name(value: &str) -> String {
    guard_leading_digit(words(value).map(capitalize).collect())
}

/// `"Button Title"` → `buttonTitle`.
pub(crate) fn variable_name(value: &str) -> String {
    let mut out = String::new();
    for (i, word) in words(value).enumerate() {
        if i == 0 {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                out.push(first.to_ascii_lowercase());
                out.push_str(chars.as_str());
            }
        } else {
            out.push_str(&capitalize(word));
        }
    }
    guard_leading_digit(out)
}

/// ES-module import specifier from the file at `from` to the module at `to`.
/// Both are workspace-relative and extensionless.
pub(crate) fn import_path(from: &Path, to: &Path) -> String {
    let depth = from
        .parent()
        .map(|p| {
            p.components()
                .filter(|c| matches!(c, Component::Normal(_)))
                .count()
        })
        .unwrap_or(0);
    let target = to
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/");
    if depth == 0 {
        format!("./{target}")
    } else {
        format!("{}{target}", "../".repeat(depth))
    }
}

pub(crate) fn indent(level: usize) -> String {
    "  ".repeat(level)
}
