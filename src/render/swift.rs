//! Swift target: UIKit or AppKit view classes. Text styles rely on the
//! `TextStyle.swift` support file copied into the output root.

use std::fmt::Write as _;

use super::{
    format_number, indent, quote, resolve_literal, type_name, variable_name, ComponentLookup,
    Resolved, Siblings, ValueKind,
};
use crate::document::{
    ComponentDocument, Layer, LayerKind, Literal, LogicNode, Operand, ParamType,
};
use crate::error::{ConvertError, DecodeError};
use crate::target::{Framework, RenderContext};
use crate::tokens::{ColorSet, FontWeight, Rgba, TextStyleSet};

/// Parameters applied once when views are created.
const LAYOUT_PARAMETERS: &[&str] = &[
    "width",
    "height",
    "paddingTop",
    "paddingRight",
    "paddingBottom",
    "paddingLeft",
    "flexDirection",
    "alignItems",
    "justifyContent",
];

fn is_appkit(ctx: &RenderContext) -> bool {
    ctx.framework == Some(Framework::AppKit)
}

fn framework_import(ctx: &RenderContext) -> &'static str {
    if is_appkit(ctx) {
        "import AppKit"
    } else {
        "import UIKit"
    }
}

fn color_literal(rgba: &Rgba) -> String {
    let channel = |v: u8| {
        let scaled = (f64::from(v) / 255.0 * 1000.0).round() / 1000.0;
        format_number(scaled)
    };
    format!(
        "#colorLiteral(red: {}, green: {}, blue: {}, alpha: {})",
        channel(rgba.r),
        channel(rgba.g),
        channel(rgba.b),
        channel(rgba.a)
    )
}

fn weight_name(weight: FontWeight) -> &'static str {
    match weight.0 {
        100 => "ultraLight",
        200 => "thin",
        300 => "light",
        500 => "medium",
        600 => "semibold",
        700 => "bold",
        800 => "heavy",
        900 => "black",
        _ => "regular",
    }
}

pub fn render_colors(ctx: &RenderContext, colors: &ColorSet) -> String {
    let mut out = format!("{}\n\npublic enum Colors {{\n", framework_import(ctx));
    for token in colors.iter() {
        if let Some(comment) = &token.comment {
            let _ = writeln!(out, "  /// {}", comment.replace('\n', " "));
        }
        let _ = writeln!(
            out,
            "  public static let {} = {}",
            token.id,
            color_literal(&token.value)
        );
    }
    out.push_str("}\n");
    out
}

pub fn render_text_styles(ctx: &RenderContext, styles: &TextStyleSet) -> String {
    let mut out = format!("{}\n\npublic enum TextStyles {{\n", framework_import(ctx));
    for style in styles.iter() {
        let mut args = Vec::new();
        if let Some(family) = &style.font_family {
            args.push(format!("family: {}", quote(family)));
        }
        if let Some(name) = &style.font_name {
            args.push(format!("name: {}", quote(name)));
        }
        if let Some(weight) = style.font_weight {
            args.push(format!("weight: .{}", weight_name(weight)));
        }
        if let Some(size) = style.font_size {
            args.push(format!("size: {}", format_number(size)));
        }
        if let Some(line_height) = style.line_height {
            args.push(format!("lineHeight: {}", format_number(line_height)));
        }
        if let Some(kerning) = style.letter_spacing {
            args.push(format!("kerning: {}", format_number(kerning)));
        }
        if let Some(color) = &style.color {
            args.push(format!("color: Colors.{color}"));
        }

        if args.is_empty() {
            let _ = writeln!(out, "  public static let {} = TextStyle()", style.id);
        } else {
            let _ = writeln!(
                out,
                "  public static let {} = TextStyle(\n    {})",
                style.id,
                args.join(",\n    ")
            );
        }
    }
    if let Some(default) = styles.default_style() {
        let _ = writeln!(out, "\n  public static let defaultStyle = {}", default.id);
    }
    out.push_str("}\n");
    out
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMPONENTS
// ═══════════════════════════════════════════════════════════════════════════════

pub fn render_component(
    ctx: &RenderContext,
    colors: &ColorSet,
    text_styles: &TextStyleSet,
    lookup: &dyn ComponentLookup,
    document: &ComponentDocument,
) -> Result<String, ConvertError> {
    let siblings = Siblings::resolve(document, lookup)?;
    for (layer_id, parameter) in document.assigned_parameters() {
        let built_in = document
            .find_layer(layer_id)
            .is_some_and(|l| !matches!(l.kind, LayerKind::Component(_)));
        if built_in && LAYOUT_PARAMETERS.contains(&parameter) {
            return Err(ConvertError::Unsupported {
                target: "swift",
                operation: "assigning layout parameters from logic",
            });
        }
    }

    let writer = ComponentWriter {
        appkit: is_appkit(ctx),
        colors,
        text_styles,
        document,
        siblings: &siblings,
    };
    let name = type_name(&document.name);
    let base = if writer.appkit { "NSView" } else { "UIView" };

    let mut out = format!("{}\n\n", framework_import(ctx));
    let _ = writeln!(out, "// MARK: - {name}\n");
    let _ = writeln!(out, "public class {name}: {base} {{\n");

    let _ = writeln!(out, "  // MARK: Lifecycle\n");
    let params: Vec<String> = document
        .params
        .iter()
        .map(|p| format!("{}: {}", p.name, writer.param_type(p.ty)))
        .collect();
    let _ = writeln!(out, "  public init({}) {{", params.join(", "));
    for param in &document.params {
        let _ = writeln!(out, "    self.{0} = {0}", param.name);
    }
    if !document.params.is_empty() {
        out.push('\n');
    }
    out.push_str("    super.init(frame: .zero)\n\n");
    out.push_str("    setUpViews()\n    update()\n  }\n\n");
    out.push_str("  public required init?(coder aDecoder: NSCoder) {\n");
    out.push_str("    fatalError(\"init(coder:) has not been implemented\")\n  }\n\n");

    if !document.params.is_empty() {
        let _ = writeln!(out, "  // MARK: Public\n");
        for param in &document.params {
            let _ = writeln!(
                out,
                "  public var {}: {} {{ didSet {{ update() }} }}",
                param.name,
                writer.param_type(param.ty)
            );
        }
        out.push('\n');
    }

    let _ = writeln!(out, "  // MARK: Private\n");
    let children: Vec<&Layer> = document.layers().into_iter().skip(1).collect();
    for layer in &children {
        let _ = writeln!(
            out,
            "  private var {} = {}",
            view_name(&layer.id),
            writer.constructor(layer)?
        );
    }
    if !children.is_empty() {
        out.push('\n');
    }

    out.push_str("  private func setUpViews() {\n");
    writer.write_set_up(&mut out, &document.root, true)?;
    out.push_str("  }\n\n");

    out.push_str("  private func update() {\n");
    for layer in document.layers() {
        writer.write_initial_values(&mut out, layer)?;
    }
    writer.write_logic(&mut out, &document.logic, 2)?;
    out.push_str("  }\n}\n");
    Ok(out)
}

fn view_name(layer_id: &str) -> String {
    format!("{}View", variable_name(layer_id))
}

struct ComponentWriter<'a> {
    appkit: bool,
    colors: &'a ColorSet,
    text_styles: &'a TextStyleSet,
    document: &'a ComponentDocument,
    siblings: &'a Siblings,
}

impl ComponentWriter<'_> {
    fn param_type(&self, ty: ParamType) -> &'static str {
        match ty {
            ParamType::String => "String",
            ParamType::Boolean => "Bool",
            ParamType::Number => "CGFloat",
            ParamType::Color if self.appkit => "NSColor",
            ParamType::Color => "UIColor",
            ParamType::Url => "URL",
        }
    }

    fn default_value(&self, ty: ParamType) -> &'static str {
        match ty {
            ParamType::String => "\"\"",
            ParamType::Boolean => "false",
            ParamType::Number => "0",
            ParamType::Color if self.appkit => "NSColor.clear",
            ParamType::Color => "UIColor.clear",
            ParamType::Url => "URL(fileURLWithPath: \"\")",
        }
    }

    /// Receiver prefix for a layer's properties; the root layer is `self`.
    fn receiver(&self, layer: &Layer) -> String {
        if layer.id == self.document.root.id {
            String::new()
        } else {
            format!("{}.", view_name(&layer.id))
        }
    }

    fn literal(&self, literal: &Literal, kind: ValueKind) -> Result<String, ConvertError> {
        Ok(match resolve_literal(literal, kind, self.colors, self.text_styles)? {
            Resolved::ColorToken(id) => format!("Colors.{id}"),
            Resolved::Color(rgba) => color_literal(&rgba),
            Resolved::TextStyle(id) => format!("TextStyles.{id}"),
            Resolved::Plain(Literal::String(s)) => quote(s),
            Resolved::Plain(Literal::Number(n)) => format_number(*n),
            Resolved::Plain(Literal::Bool(b)) => b.to_string(),
        })
    }

    fn operand(&self, operand: &Operand, kind: ValueKind) -> Result<String, ConvertError> {
        match operand {
            Operand::Parameter(name) => Ok(name.clone()),
            Operand::Literal(literal) => self.literal(literal, kind),
        }
    }

    fn constructor(&self, layer: &Layer) -> Result<String, ConvertError> {
        Ok(match (&layer.kind, self.appkit) {
            (LayerKind::View, false) => "UIView()".to_string(),
            (LayerKind::View, true) => "NSView()".to_string(),
            (LayerKind::Text, false) => "UILabel()".to_string(),
            (LayerKind::Text, true) => "NSTextField(labelWithString: \"\")".to_string(),
            (LayerKind::Image, false) => "UIImageView()".to_string(),
            (LayerKind::Image, true) => "NSImageView()".to_string(),
            (LayerKind::Component(name), _) => {
                let sibling = self.siblings.get(name)?;
                let mut args = Vec::new();
                for param in &sibling.params {
                    let value = match layer.parameter(&param.name) {
                        Some(literal) => {
                            let kind = ValueKind::for_layer(layer, &param.name, self.siblings);
                            self.literal(literal, kind)?
                        }
                        None => self.default_value(param.ty).to_string(),
                    };
                    args.push(format!("{}: {}", param.name, value));
                }
                format!("{}({})", type_name(name), args.join(", "))
            }
        })
    }

    fn write_set_up(
        &self,
        out: &mut String,
        layer: &Layer,
        is_root: bool,
    ) -> Result<(), ConvertError> {
        let receiver = self.receiver(layer);
        if self.appkit && !matches!(layer.kind, LayerKind::Component(_)) {
            let _ = writeln!(out, "    {receiver}wantsLayer = true");
        }
        for parameter in &layer.parameters {
            if !LAYOUT_PARAMETERS.contains(&parameter.name.as_str()) {
                continue;
            }
            if matches!(layer.kind, LayerKind::Component(_)) {
                continue;
            }
            let Literal::Number(value) = parameter.value else {
                continue;
            };
            let value = format_number(value);
            match parameter.name.as_str() {
                "width" | "height" => {
                    let _ = writeln!(
                        out,
                        "    {receiver}translatesAutoresizingMaskIntoConstraints = false"
                    );
                    let _ = writeln!(
                        out,
                        "    {receiver}{}Anchor.constraint(equalToConstant: {value}).isActive = true",
                        parameter.name
                    );
                }
                name if !self.appkit => {
                    let edge = match name {
                        "paddingTop" => "top",
                        "paddingRight" => "right",
                        "paddingBottom" => "bottom",
                        _ => "left",
                    };
                    let _ = writeln!(out, "    {receiver}layoutMargins.{edge} = {value}");
                }
                _ => {}
            }
        }

        for child in &layer.children {
            let container = if is_root {
                String::new()
            } else {
                receiver.clone()
            };
            let _ = writeln!(out, "    {container}addSubview({})", view_name(&child.id));
        }
        for child in &layer.children {
            self.write_set_up(out, child, false)?;
        }
        Ok(())
    }

    /// Assignment statement for one parameter, or `None` when it only affects layout.
    fn assignment(
        &self,
        layer: &Layer,
        parameter: &str,
        value: &str,
    ) -> Result<Option<String>, ConvertError> {
        let r = self.receiver(layer);
        if let LayerKind::Component(_) = layer.kind {
            return Ok(Some(format!("{r}{parameter} = {value}")));
        }
        let statement = match (parameter, self.appkit) {
            ("backgroundColor", false) => format!("{r}backgroundColor = {value}"),
            ("backgroundColor", true) => format!("{r}layer?.backgroundColor = {value}.cgColor"),
            ("borderColor", false) => format!("{r}layer.borderColor = {value}.cgColor"),
            ("borderColor", true) => format!("{r}layer?.borderColor = {value}.cgColor"),
            ("borderRadius", false) => format!("{r}layer.cornerRadius = {value}"),
            ("borderRadius", true) => format!("{r}layer?.cornerRadius = {value}"),
            ("borderWidth", false) => format!("{r}layer.borderWidth = {value}"),
            ("borderWidth", true) => format!("{r}layer?.borderWidth = {value}"),
            ("opacity", false) => format!("{r}alpha = {value}"),
            ("opacity", true) => format!("{r}alphaValue = {value}"),
            ("visible", _) => format!("{r}isHidden = !{value}"),
            ("text", false) => format!("{r}text = {value}"),
            ("text", true) => format!("{r}stringValue = {value}"),
            ("font", _) => format!("{r}font = {value}.font\n    {r}textColor = {value}.color"),
            ("numberOfLines", false) => format!("{r}numberOfLines = Int({value})"),
            ("numberOfLines", true) => format!("{r}maximumNumberOfLines = Int({value})"),
            ("image", _) => format!("{r}image = {value}"),
            ("resizeMode", false) => format!("{r}contentMode = {}", self.content_mode(value)?),
            ("resizeMode", true) => format!("{r}imageScaling = {}", self.content_mode(value)?),
            _ => return Ok(None),
        };
        Ok(Some(statement))
    }

    fn content_mode(&self, value: &str) -> Result<&'static str, ConvertError> {
        let mode = match (value.trim_matches('"'), self.appkit) {
            ("cover", false) => ".scaleAspectFill",
            ("contain", false) => ".scaleAspectFit",
            ("stretch", false) => ".scaleToFill",
            ("center", false) => ".center",
            ("cover" | "contain", true) => ".scaleProportionallyUpOrDown",
            ("stretch", true) => ".scaleAxesIndependently",
            ("center", true) => ".scaleNone",
            (other, _) => {
                return Err(DecodeError::malformed(format!("unknown resizeMode '{other}'")).into())
            }
        };
        Ok(mode)
    }

    fn image_value(&self, value: String, from_literal: bool) -> String {
        let image_type = if self.appkit { "NSImage" } else { "UIImage" };
        if from_literal {
            let name = value.trim_matches('"');
            let name = name.rsplit('/').next().unwrap_or(name);
            let name = name.rsplit_once('.').map(|(stem, _)| stem).unwrap_or(name);
            format!("{image_type}(named: {})", quote(name))
        } else if self.appkit {
            format!("NSImage(contentsOf: {value})")
        } else {
            format!("UIImage(contentsOfFile: {value}.path)")
        }
    }

    fn write_initial_values(&self, out: &mut String, layer: &Layer) -> Result<(), ConvertError> {
        if matches!(layer.kind, LayerKind::Component(_)) {
            // Literal arguments are passed to the initializer.
            return Ok(());
        }
        for parameter in &layer.parameters {
            let kind = ValueKind::for_layer(layer, &parameter.name, self.siblings);
            let mut value = self.literal(&parameter.value, kind)?;
            if parameter.name == "image" {
                value = self.image_value(value, true);
            }
            if let Some(statement) = self.assignment(layer, &parameter.name, &value)? {
                let _ = writeln!(out, "    {statement}");
            }
        }
        Ok(())
    }

    fn write_logic(
        &self,
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
                    let target = self.document.find_layer(layer).ok_or_else(|| {
                        DecodeError::malformed(format!("unknown layer '{layer}'"))
                    })?;
                    let kind = ValueKind::for_layer(target, parameter, self.siblings);
                    let mut value = self.operand(content, kind)?;
                    if parameter == "image" && !matches!(target.kind, LayerKind::Component(_)) {
                        value = self.image_value(value, matches!(content, Operand::Literal(_)));
                    }
                    if let Some(statement) = self.assignment(target, parameter, &value)? {
                        let statement =
                            statement.replace("\n    ", &format!("\n{}", indent(level)));
                        let _ = writeln!(out, "{}{}", indent(level), statement);
                    }
                }
                LogicNode::If { condition, body } => {
                    let condition = self.operand(condition, ValueKind::Plain)?;
                    let _ = writeln!(out, "{}if {} {{", indent(level), condition);
                    self.write_logic(out, body, level + 1)?;
                    let _ = writeln!(out, "{}}}", indent(level));
                }
            }
        }
        Ok(())
    }
}
