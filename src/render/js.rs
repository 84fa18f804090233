//! JavaScript target: ES modules with React class components, for React Native
//! or React DOM.

use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::Path;

use super::{
    format_number, import_path, indent, quote, resolve_literal, type_name, variable_name,
    ComponentLookup, Resolved, Siblings, ValueKind,
};
use crate::document::{ComponentDocument, Layer, LayerKind, Literal, LogicNode, Operand};
use crate::error::{ConvertError, DecodeError};
use crate::target::{Framework, RenderContext};
use crate::tokens::{ColorSet, TextStyleSet, COLORS_OUTPUT, TEXT_STYLES_OUTPUT};

pub fn render_colors(colors: &ColorSet) -> String {
    let mut out = String::from("const colors = {\n");
    for token in colors.iter() {
        if let Some(comment) = &token.comment {
            let _ = writeln!(out, "  // {}", comment.replace('\n', " "));
        }
        let _ = writeln!(out, "  {}: {},", token.id, quote(&token.value.to_hex()));
    }
    out.push_str("};\n\nexport default colors;\n");
    out
}

pub fn render_text_styles(styles: &TextStyleSet) -> String {
    let mut out = String::new();
    if styles.iter().any(|s| s.color.is_some()) {
        let _ = writeln!(out, "import colors from \"./{COLORS_OUTPUT}\";\n");
    }
    out.push_str("const textStyles = {\n");
    for style in styles.iter() {
        let _ = writeln!(out, "  {}: {{", style.id);
        if let Some(family) = style.font_name.as_ref().or(style.font_family.as_ref()) {
            let _ = writeln!(out, "    fontFamily: {},", quote(family));
        }
        if let Some(weight) = style.font_weight {
            let _ = writeln!(out, "    fontWeight: \"{}\",", weight.0);
        }
        let numbers = [
            ("fontSize", style.font_size),
            ("lineHeight", style.line_height),
            ("letterSpacing", style.letter_spacing),
        ];
        for (key, value) in numbers {
            if let Some(value) = value {
                let _ = writeln!(out, "    {key}: {},", format_number(value));
            }
        }
        if let Some(color) = &style.color {
            let _ = writeln!(out, "    color: colors.{color},");
        }
        out.push_str("  },\n");
    }
    out.push_str("};\n\nexport default textStyles;\n");
    out
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMPONENTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Parameters that are element props or children rather than style entries.
const NON_STYLE_PARAMETERS: &[&str] = &[
    "text",
    "font",
    "image",
    "numberOfLines",
    "visible",
    "resizeMode",
];

pub fn render_component(
    ctx: &RenderContext,
    colors: &ColorSet,
    text_styles: &TextStyleSet,
    lookup: &dyn ComponentLookup,
    document: &ComponentDocument,
) -> Result<String, ConvertError> {
    let siblings = Siblings::resolve(document, lookup)?;
    let mut writer = ComponentWriter {
        dom: ctx.framework == Some(Framework::ReactDom),
        colors,
        text_styles,
        document,
        siblings: &siblings,
        uses_colors: false,
        uses_text_styles: false,
        elements: BTreeSet::new(),
    };

    let mut body = String::new();
    writer.write_variables(&mut body)?;
    writer.write_logic(&mut body, &document.logic, 2)?;
    if !body.is_empty() {
        body.push('\n');
    }
    body.push_str(&format!("{}return (\n", indent(2)));
    writer.write_layer(&mut body, &document.root, 3, true)?;
    body.push_str(&format!("{});\n", indent(2)));

    let mut out = String::from("import React from \"react\";\n");
    if !writer.dom && !writer.elements.is_empty() {
        let names: Vec<_> = writer.elements.iter().copied().collect();
        let _ = writeln!(out, "import {{ {} }} from \"react-native\";", names.join(", "));
    }
    out.push('\n');
    if writer.uses_colors {
        let path = import_path(&document.path, Path::new(COLORS_OUTPUT));
        let _ = writeln!(out, "import colors from \"{path}\";");
    }
    if writer.uses_text_styles {
        let path = import_path(&document.path, Path::new(TEXT_STYLES_OUTPUT));
        let _ = writeln!(out, "import textStyles from \"{path}\";");
    }
    for sibling in siblings.iter() {
        let path = import_path(&document.path, &sibling.path);
        let _ = writeln!(out, "import {} from \"{path}\";", type_name(&sibling.name));
    }
    if writer.uses_colors || writer.uses_text_styles || siblings.iter().next().is_some() {
        out.push('\n');
    }

    let _ = writeln!(
        out,
        "export default class {} extends React.Component {{",
        type_name(&document.name)
    );
    let _ = writeln!(out, "{}render() {{", indent(1));
    out.push_str(&body);
    let _ = writeln!(out, "{}}}", indent(1));
    out.push_str("}\n");
    Ok(out)
}

struct ComponentWriter<'a> {
    dom: bool,
    colors: &'a ColorSet,
    text_styles: &'a TextStyleSet,
    document: &'a ComponentDocument,
    siblings: &'a Siblings,
    uses_colors: bool,
    uses_text_styles: bool,
    elements: BTreeSet<&'static str>,
}

impl<'a> ComponentWriter<'a> {
    fn binding(layer: &str, parameter: &str) -> String {
        format!("{}${}", variable_name(layer), parameter)
    }

    fn is_assigned(&self, layer: &str, parameter: &str) -> bool {
        self.document
            .assigned_parameters()
            .contains(&(layer, parameter))
    }

    fn layer(&self, id: &str) -> Result<&'a Layer, ConvertError> {
        self.document
            .find_layer(id)
            .ok_or_else(|| DecodeError::malformed(format!("unknown layer '{id}'")).into())
    }

    fn literal(&mut self, literal: &Literal, kind: ValueKind) -> Result<String, ConvertError> {
        Ok(match resolve_literal(literal, kind, self.colors, self.text_styles)? {
            Resolved::ColorToken(id) => {
                self.uses_colors = true;
                format!("colors.{id}")
            }
            Resolved::Color(rgba) => quote(&rgba.to_hex()),
            Resolved::TextStyle(id) => {
                self.uses_text_styles = true;
                format!("textStyles.{id}")
            }
            Resolved::Plain(Literal::String(s)) => quote(s),
            Resolved::Plain(Literal::Number(n)) => format_number(*n),
            Resolved::Plain(Literal::Bool(b)) => b.to_string(),
        })
    }

    fn operand(&mut self, operand: &Operand, kind: ValueKind) -> Result<String, ConvertError> {
        match operand {
            Operand::Parameter(name) => Ok(format!("this.props.{name}")),
            Operand::Literal(literal) => self.literal(literal, kind),
        }
    }

    /// Current value of a layer parameter: its binding when logic writes it,
    /// otherwise its literal.
    fn value(&mut self, layer: &Layer, parameter: &str) -> Result<Option<String>, ConvertError> {
        if self.is_assigned(&layer.id, parameter) {
            return Ok(Some(Self::binding(&layer.id, parameter)));
        }
        match layer.parameter(parameter) {
            Some(literal) => {
                let kind = ValueKind::for_layer(layer, parameter, self.siblings);
                self.literal(literal, kind).map(Some)
            }
            None => Ok(None),
        }
    }

    fn write_variables(&mut self, out: &mut String) -> Result<(), ConvertError> {
        let document = self.document;
        for (layer_id, parameter) in document.assigned_parameters() {
            let layer = self.layer(layer_id)?;
            let initial = match layer.parameter(parameter) {
                Some(literal) => {
                    let kind = ValueKind::for_layer(layer, parameter, self.siblings);
                    self.literal(literal, kind)?
                }
                None => "undefined".to_string(),
            };
            let _ = writeln!(
                out,
                "{}let {} = {};",
                indent(2),
                Self::binding(layer_id, parameter),
                initial
            );
        }
        Ok(())
    }

    fn write_logic(
        &mut self,
        out: &mut String,
        nodes: &[LogicNode],
        level: usize,
    ) -> Result<(), ConvertError> {
        for node in nodes {
            match node {
                LogicNode::Assign {
                    layer,
                    parameter,
                    content,
                } => {
                    let target = self.layer(layer)?;
                    let kind = ValueKind::for_layer(target, parameter, self.siblings);
                    let value = self.operand(content, kind)?;
                    let _ = writeln!(
                        out,
                        "{}{} = {};",
                        indent(level),
                        Self::binding(layer, parameter),
                        value
                    );
                }
                LogicNode::If { condition, body } => {
                    let condition = self.operand(condition, ValueKind::Plain)?;
                    let _ = writeln!(out, "{}if ({}) {{", indent(level), condition);
                    self.write_logic(out, body, level + 1)?;
                    let _ = writeln!(out, "{}}}", indent(level));
                }
            }
        }
        Ok(())
    }

    fn element_name(&mut self, kind: &LayerKind) -> String {
        let name = match (kind, self.dom) {
            (LayerKind::View, false) => "View",
            (LayerKind::Text, false) => "Text",
            (LayerKind::Image, false) => "Image",
            (LayerKind::View, true) => "div",
            (LayerKind::Text, true) => "span",
            (LayerKind::Image, true) => "img",
            (LayerKind::Component(name), _) => return type_name(name),
        };
        if !self.dom {
            self.elements.insert(name);
        }
        name.to_string()
    }

    fn style_object(&mut self, layer: &Layer) -> Result<Option<String>, ConvertError> {
        let mut entries = Vec::new();
        if self.dom && layer.kind == LayerKind::View {
            entries.push("display: \"flex\"".to_string());
        }
        if let Some(font) = self.value(layer, "font")? {
            entries.push(format!("...{font}"));
        }

        let document = self.document;
        let mut names: Vec<&str> = layer
            .parameters
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        for (layer_id, parameter) in document.assigned_parameters() {
            if layer_id == layer.id && !names.contains(&parameter) {
                names.push(parameter);
            }
        }
        for name in names {
            if NON_STYLE_PARAMETERS.contains(&name) {
                continue;
            }
            if let Some(value) = self.value(layer, name)? {
                entries.push(format!("{name}: {value}"));
            }
        }
        if self.dom && layer.kind == LayerKind::Image {
            if let Some(mode) = self.value(layer, "resizeMode")? {
                entries.push(format!("objectFit: {}", dom_object_fit(&mode)));
            }
        }

        Ok((!entries.is_empty()).then(|| format!("{{ {} }}", entries.join(", "))))
    }

    fn write_layer(
        &mut self,
        out: &mut String,
        layer: &Layer,
        level: usize,
        is_root: bool,
    ) -> Result<(), ConvertError> {
        let visible = if is_root {
            None
        } else {
            self.value(layer, "visible")?
        };
        let (level, wrapped) = match visible.as_deref() {
            Some("false") => return Ok(()),
            None | Some("true") => (level, false),
            Some(condition) => {
                let _ = writeln!(out, "{}{{{} && (", indent(level), condition);
                (level + 1, true)
            }
        };

        let element = self.element_name(&layer.kind);
        let mut props = Vec::new();

        if let LayerKind::Component(name) = &layer.kind {
            let siblings = self.siblings;
            let sibling = siblings.get(name)?;
            for param in &sibling.params {
                if let Some(value) = self.value(layer, &param.name)? {
                    props.push(format!("{}={{{}}}", param.name, value));
                }
            }
        } else {
            if let Some(style) = self.style_object(layer)? {
                props.push(format!("style={{{style}}}"));
            }
            match layer.kind {
                LayerKind::Image => {
                    if let Some(image) = self.value(layer, "image")? {
                        if self.dom {
                            props.push(format!("src={{{image}}}"));
                        } else {
                            props.push(format!("source={{{{ uri: {image} }}}}"));
                        }
                    }
                    if !self.dom {
                        if let Some(mode) = self.value(layer, "resizeMode")? {
                            props.push(format!("resizeMode={{{mode}}}"));
                        }
                    }
                }
                LayerKind::Text if !self.dom => {
                    if let Some(lines) = self.value(layer, "numberOfLines")? {
                        props.push(format!("numberOfLines={{{lines}}}"));
                    }
                }
                _ => {}
            }
        }

        let open = if props.is_empty() {
            format!("<{element}")
        } else {
            format!("<{element} {}", props.join(" "))
        };

        let text = if layer.kind == LayerKind::Text {
            self.value(layer, "text")?
        } else {
            None
        };

        if let Some(text) = text {
            let _ = writeln!(out, "{}{open}>{{{text}}}</{element}>", indent(level));
        } else if layer.children.is_empty() {
            let _ = writeln!(out, "{}{open} />", indent(level));
        } else {
            let _ = writeln!(out, "{}{open}>", indent(level));
            for child in &layer.children {
                self.write_layer(out, child, level + 1, false)?;
            }
            let _ = writeln!(out, "{}</{element}>", indent(level));
        }

        if wrapped {
            let _ = writeln!(out, "{})}}", indent(level - 1));
        }
        Ok(())
    }
}

fn dom_object_fit(mode: &str) -> String {
    match mode {
        "\"stretch\"" => quote("fill"),
        "\"center\"" => quote("none"),
        other => other.to_string(),
    }
}
