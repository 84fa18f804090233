//! # Component Document Module
//!
//! Decodes a `.component` file into a typed tree shared by every renderer.
//!
//! ## Key Invariants
//!
//! 1. **Single Decode**: The loosely-typed JSON is validated once, here. Renderers
//!    never inspect raw JSON.
//! 2. **Closed Vocabulary**: Built-in layers accept a fixed set of parameters. An
//!    unrecognized key is an unknown-parameter error, not a silent drop.
//! 3. **Closed Logic**: Only `AssignExpr` and `IfExpr` nodes exist. Anything else
//!    is an unknown-expression-type error.
//! 4. **Resolved Paths**: Every logic path names a declared component parameter or
//!    an existing layer. Parameters of embedded components are checked at render
//!    time, when the sibling document is available.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use crate::error::{ConvertError, DecodeError};
use crate::render::variable_name;
use crate::tokens::TOKEN_ID;

pub const VIEW_TYPE: &str = "Lona:View";
pub const TEXT_TYPE: &str = "Lona:Text";
pub const IMAGE_TYPE: &str = "Lona:Image";

// ═══════════════════════════════════════════════════════════════════════════════
// PARAMETER VOCABULARY
// ═══════════════════════════════════════════════════════════════════════════════

/// Value shape a built-in layer parameter accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    Color,
    Number,
    Boolean,
    Text,
}

const COMMON_PARAMETERS: &[(&str, ValueShape)] = &[
    ("backgroundColor", ValueShape::Color),
    ("borderColor", ValueShape::Color),
    ("borderRadius", ValueShape::Number),
    ("borderWidth", ValueShape::Number),
    ("opacity", ValueShape::Number),
    ("width", ValueShape::Number),
    ("height", ValueShape::Number),
    ("paddingTop", ValueShape::Number),
    ("paddingRight", ValueShape::Number),
    ("paddingBottom", ValueShape::Number),
    ("paddingLeft", ValueShape::Number),
    ("flexDirection", ValueShape::Text),
    ("alignItems", ValueShape::Text),
    ("justifyContent", ValueShape::Text),
    ("visible", ValueShape::Boolean),
];

const TEXT_PARAMETERS: &[(&str, ValueShape)] = &[
    ("text", ValueShape::Text),
    ("font", ValueShape::Text),
    ("numberOfLines", ValueShape::Number),
];

const IMAGE_PARAMETERS: &[(&str, ValueShape)] = &[
    ("image", ValueShape::Text),
    ("resizeMode", ValueShape::Text),
];

// ═══════════════════════════════════════════════════════════════════════════════
// IR TYPES
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ParamType {
    String,
    Boolean,
    Number,
    Color,
    #[serde(rename = "URL")]
    Url,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Param {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ParamType,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Number(f64),
    Bool(bool),
}

impl Literal {
    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Literal::String(s.clone())),
            Value::Number(n) => n.as_f64().map(Literal::Number),
            Value::Bool(b) => Some(Literal::Bool(*b)),
            _ => None,
        }
    }

    fn fits(&self, shape: ValueShape) -> bool {
        matches!(
            (self, shape),
            (Literal::String(_), ValueShape::Color | ValueShape::Text)
                | (Literal::Number(_), ValueShape::Number)
                | (Literal::Bool(_), ValueShape::Boolean)
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayerKind {
    View,
    Text,
    Image,
    /// An embedded sibling component, by name.
    Component(String),
}

impl LayerKind {
    fn from_type(ty: &str) -> Self {
        match ty {
            VIEW_TYPE => LayerKind::View,
            TEXT_TYPE => LayerKind::Text,
            IMAGE_TYPE => LayerKind::Image,
            other => LayerKind::Component(other.to_string()),
        }
    }

    /// Shape of a built-in parameter. Always `None` for embedded components.
    pub fn parameter_shape(&self, name: &str) -> Option<ValueShape> {
        let specific: &[(&str, ValueShape)] = match self {
            LayerKind::View => &[],
            LayerKind::Text => TEXT_PARAMETERS,
            LayerKind::Image => IMAGE_PARAMETERS,
            LayerKind::Component(_) => return None,
        };
        COMMON_PARAMETERS
            .iter()
            .chain(specific)
            .find(|(key, _)| *key == name)
            .map(|(_, shape)| *shape)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayerParameter {
    pub name: String,
    pub value: Literal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    pub id: String,
    pub kind: LayerKind,
    pub parameters: Vec<LayerParameter>,
    pub children: Vec<Layer>,
}

impl Layer {
    pub fn parameter(&self, name: &str) -> Option<&Literal> {
        self.parameters
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }

    fn walk<'a>(&'a self, out: &mut Vec<&'a Layer>) {
        out.push(self);
        for child in &self.children {
            child.walk(out);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Parameter(String),
    Literal(Literal),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogicNode {
    Assign {
        layer: String,
        parameter: String,
        content: Operand,
    },
    If {
        condition: Operand,
        body: Vec<LogicNode>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComponentDocument {
    pub name: String,
    /// Workspace-relative path with the extension stripped.
    pub path: PathBuf,
    pub params: Vec<Param>,
    pub root: Layer,
    pub logic: Vec<LogicNode>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// DECODING
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    params: Vec<Param>,
    root: RawLayer,
    #[serde(default)]
    logic: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct RawLayer {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    parameters: Map<String, Value>,
    #[serde(default)]
    children: Vec<RawLayer>,
}

impl ComponentDocument {
    pub fn parse(name: &str, path: impl Into<PathBuf>, raw: &str) -> Result<Self, ConvertError> {
        let raw: RawDocument = serde_json::from_str(raw)?;

        let mut seen = HashSet::new();
        for param in &raw.params {
            if !TOKEN_ID.is_match(&param.name) {
                return Err(DecodeError::malformed(format!(
                    "invalid parameter name '{}'",
                    param.name
                ))
                .into());
            }
            if !seen.insert(param.name.as_str()) {
                return Err(DecodeError::malformed(format!(
                    "duplicate parameter '{}'",
                    param.name
                ))
                .into());
            }
        }

        let mut layer_ids = HashMap::new();
        let root = decode_layer(raw.root, &mut layer_ids)?;
        if root.kind != LayerKind::View {
            return Err(DecodeError::malformed(format!(
                "root layer '{}' must be a {}",
                root.id, VIEW_TYPE
            ))
            .into());
        }

        let mut document = ComponentDocument {
            name: name.to_string(),
            path: path.into(),
            params: raw.params,
            root,
            logic: Vec::new(),
        };
        document.logic = raw
            .logic
            .iter()
            .map(|node| document.decode_logic(node))
            .collect::<Result<_, _>>()?;
        Ok(document)
    }

    pub fn param(&self, name: &str) -> Option<&Param> {
        self.params.iter().find(|p| p.name == name)
    }

    /// All layers, depth first, root included.
    pub fn layers(&self) -> Vec<&Layer> {
        let mut out = Vec::new();
        self.root.walk(&mut out);
        out
    }

    pub fn find_layer(&self, id: &str) -> Option<&Layer> {
        self.layers().into_iter().find(|l| l.id == id)
    }

    /// Names of embedded sibling components, first occurrence order.
    pub fn referenced_components(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.layers()
            .into_iter()
            .filter_map(|layer| match &layer.kind {
                LayerKind::Component(name) => Some(name.as_str()),
                _ => None,
            })
            .filter(|name| seen.insert(*name))
            .collect()
    }

    /// `(layer, parameter)` pairs written by logic, first occurrence order.
    pub fn assigned_parameters(&self) -> Vec<(&str, &str)> {
        fn collect<'a>(nodes: &'a [LogicNode], out: &mut Vec<(&'a str, &'a str)>) {
            for node in nodes {
                match node {
                    LogicNode::Assign {
                        layer, parameter, ..
                    } => {
                        let pair = (layer.as_str(), parameter.as_str());
                        if !out.contains(&pair) {
                            out.push(pair);
                        }
                    }
                    LogicNode::If { body, .. } => collect(body, out),
                }
            }
        }

        let mut out = Vec::new();
        collect(&self.logic, &mut out);
        out
    }

    fn decode_logic(&self, node: &Value) -> Result<LogicNode, ConvertError> {
        let ty = node
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| DecodeError::malformed("logic node is missing 'type'"))?;

        match ty {
            "AssignExpr" => {
                let assignee = node
                    .get("assignee")
                    .ok_or_else(|| DecodeError::malformed("AssignExpr is missing 'assignee'"))?;
                let (layer, parameter) = self.decode_assignee(assignee)?;
                let content = node
                    .get("content")
                    .ok_or_else(|| DecodeError::malformed("AssignExpr is missing 'content'"))?;
                Ok(LogicNode::Assign {
                    layer,
                    parameter,
                    content: self.decode_operand(content)?,
                })
            }
            "IfExpr" => {
                let condition = node
                    .get("condition")
                    .ok_or_else(|| DecodeError::malformed("IfExpr is missing 'condition'"))?;
                let body = match node.get("body") {
                    Some(Value::Array(items)) => items
                        .iter()
                        .map(|item| self.decode_logic(item))
                        .collect::<Result<_, _>>()?,
                    None => Vec::new(),
                    Some(_) => {
                        return Err(DecodeError::malformed("IfExpr 'body' must be a list").into())
                    }
                };
                let condition = self.decode_operand(condition)?;
                let is_boolean = match &condition {
                    Operand::Parameter(name) => {
                        self.param(name).map(|p| p.ty) == Some(ParamType::Boolean)
                    }
                    Operand::Literal(literal) => matches!(literal, Literal::Bool(_)),
                };
                if !is_boolean {
                    return Err(DecodeError::malformed("IfExpr condition must be a Boolean").into());
                }
                Ok(LogicNode::If { condition, body })
            }
            other => Err(ConvertError::UnknownExpressionType(other.to_string())),
        }
    }

    fn decode_assignee(&self, value: &Value) -> Result<(String, String), ConvertError> {
        match path_segments(value)?.as_slice() {
            ["layers", layer_id, parameter] => {
                let layer = self.find_layer(layer_id).ok_or_else(|| {
                    DecodeError::malformed(format!("assignment to unknown layer '{layer_id}'"))
                })?;
                if !matches!(layer.kind, LayerKind::Component(_))
                    && layer.kind.parameter_shape(parameter).is_none()
                {
                    return Err(ConvertError::unknown_parameter(
                        format!("layer '{}'", layer.id),
                        *parameter,
                    ));
                }
                Ok((layer.id.clone(), parameter.to_string()))
            }
            segments => Err(DecodeError::malformed(format!(
                "assignee must be a layer path, found {segments:?}"
            ))
            .into()),
        }
    }

    fn decode_operand(&self, value: &Value) -> Result<Operand, ConvertError> {
        if !value.is_array() {
            return Literal::from_json(value)
                .map(Operand::Literal)
                .ok_or_else(|| DecodeError::malformed(format!("invalid literal {value}")).into());
        }
        match path_segments(value)?.as_slice() {
            ["parameters", name] => {
                if self.param(name).is_none() {
                    return Err(ConvertError::unknown_parameter(
                        format!("component '{}'", self.name),
                        *name,
                    ));
                }
                Ok(Operand::Parameter(name.to_string()))
            }
            segments => Err(DecodeError::malformed(format!(
                "operand must be a parameter path, found {segments:?}"
            ))
            .into()),
        }
    }
}

fn path_segments(value: &Value) -> Result<Vec<&str>, DecodeError> {
    value
        .as_array()
        .and_then(|items| items.iter().map(Value::as_str).collect::<Option<Vec<_>>>())
        .ok_or_else(|| DecodeError::malformed(format!("invalid path {value}")))
}

/// `ids` maps each generated identifier to the layer id it came from, so ids
/// that differ only in case or punctuation are rejected too.
fn decode_layer(
    raw: RawLayer,
    ids: &mut HashMap<String, String>,
) -> Result<Layer, ConvertError> {
    if let Some(existing) = ids.insert(variable_name(&raw.id), raw.id.clone()) {
        let message = if existing == raw.id {
            format!("duplicate layer id '{}'", raw.id)
        } else {
            format!(
                "layer ids '{existing}' and '{}' produce the same identifier",
                raw.id
            )
        };
        return Err(DecodeError::malformed(message).into());
    }
    let kind = LayerKind::from_type(&raw.kind);

    let mut parameters = Vec::with_capacity(raw.parameters.len());
    for (name, value) in raw.parameters {
        let value = Literal::from_json(&value).ok_or_else(|| {
            DecodeError::malformed(format!(
                "parameter '{name}' on layer '{}' must be a string, number or boolean",
                raw.id
            ))
        })?;
        if !matches!(kind, LayerKind::Component(_)) {
            let shape = kind.parameter_shape(&name).ok_or_else(|| {
                ConvertError::unknown_parameter(format!("layer '{}'", raw.id), name.clone())
            })?;
            if !value.fits(shape) {
                return Err(DecodeError::malformed(format!(
                    "parameter '{name}' on layer '{}' expects a {shape:?} value",
                    raw.id
                ))
                .into());
            }
        }
        parameters.push(LayerParameter { name, value });
    }

    let children = raw
        .children
        .into_iter()
        .map(|child| decode_layer(child, ids))
        .collect::<Result<_, _>>()?;

    Ok(Layer {
        id: raw.id,
        kind,
        parameters,
        children,
    })
}
