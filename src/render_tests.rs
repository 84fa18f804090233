//! Component renderer tests across targets.

#[cfg(test)]
mod tests {
    use crate::document::ComponentDocument;
    use crate::error::{ConvertError, FailureKind};
    use crate::target::{Framework, RenderContext, Target};
    use crate::tokens::{ColorSet, TextStyleSet};
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    const BUTTON: &str = r#"{
        "params": [{"name": "title", "type": "String"}],
        "root": {
            "id": "Container",
            "type": "Lona:View",
            "parameters": {"backgroundColor": "red"},
            "children": [
                {"id": "Label", "type": "Lona:Text", "parameters": {"text": "Press"}}
            ]
        },
        "logic": [
            {"type": "AssignExpr", "assignee": ["layers", "Label", "text"], "content": ["parameters", "title"]}
        ]
    }"#;

    const CARD: &str = r#"{
        "root": {
            "id": "Root",
            "type": "Lona:View",
            "children": [
                {"id": "Action", "type": "Button", "parameters": {"title": "Go"}}
            ]
        }
    }"#;

    struct Fixture {
        colors: ColorSet,
        text_styles: TextStyleSet,
        components: HashMap<String, ComponentDocument>,
    }

    impl Fixture {
        fn new() -> Self {
            let colors = ColorSet::parse(r##"{"red": "#FF0000"}"##).unwrap();
            let text_styles = TextStyleSet::parse(
                r#"{"styles": [{"id": "heading", "fontSize": 24, "color": "red"}]}"#,
                &colors,
            )
            .unwrap();
            let mut fixture = Fixture {
                colors,
                text_styles,
                components: HashMap::new(),
            };
            fixture.add("Button", "Button", BUTTON);
            fixture
        }

        fn add(&mut self, name: &str, path: &str, raw: &str) -> ComponentDocument {
            let doc = ComponentDocument::parse(name, path, raw).unwrap();
            self.components.insert(name.to_string(), doc.clone());
            doc
        }

        fn render(&self, ctx: RenderContext, doc: &ComponentDocument) -> Result<String, ConvertError> {
            ctx.render_component(&self.colors, &self.text_styles, &self.components, doc)
        }
    }

    fn js() -> RenderContext {
        RenderContext::for_target(Target::Js)
    }

    fn swift(framework: Framework) -> RenderContext {
        RenderContext::new(Target::Swift, Some(framework)).unwrap()
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // JS
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_js_react_native_component() {
        let mut fixture = Fixture::new();
        let button = fixture.add("Button", "Button", BUTTON);
        let out = fixture.render(js(), &button).unwrap();
        assert_eq!(
            out,
            r#"import React from "react";
import { Text, View } from "react-native";

import colors from "./Colors";

export default class Button extends React.Component {
  render() {
    let label$text = "Press";
    label$text = this.props.title;

    return (
      <View style={{ backgroundColor: colors.red }}>
        <Text>{label$text}</Text>
      </View>
    );
  }
}
"#
        );
    }

    #[test]
    fn test_js_react_dom_component() {
        let mut fixture = Fixture::new();
        let button = fixture.add("Button", "Button", BUTTON);
        let ctx = RenderContext::new(Target::Js, Some(Framework::ReactDom)).unwrap();
        let out = fixture.render(ctx, &button).unwrap();
        assert!(!out.contains("react-native"));
        assert!(out.contains("<div style={{ display: \"flex\", backgroundColor: colors.red }}>"));
        assert!(out.contains("<span>{label$text}</span>"));
    }

    #[test]
    fn test_js_embeds_sibling_component() {
        let mut fixture = Fixture::new();
        let card = fixture.add("Card", "cards/Card", CARD);
        let out = fixture.render(js(), &card).unwrap();
        assert!(out.contains("import Button from \"../Button\";"));
        assert!(out.contains("<Button title={\"Go\"} />"));
        assert!(!out.contains("import colors"));
    }

    #[test]
    fn test_js_nested_component_imports_tokens_relatively() {
        let mut fixture = Fixture::new();
        let field = fixture.add("Field", "forms/inputs/Field", BUTTON);
        let out = fixture.render(js(), &field).unwrap();
        assert!(out.contains("import colors from \"../../Colors\";"));
        assert!(out.contains("export default class Field extends React.Component {"));
    }

    #[test]
    fn test_js_text_style_and_literal_color() {
        let mut fixture = Fixture::new();
        let doc = fixture.add(
            "Title",
            "Title",
            r##"{"root": {"id": "Root", "type": "Lona:View", "parameters": {"borderColor": "#00FF00"},
                "children": [{"id": "Heading", "type": "Lona:Text", "parameters": {"font": "heading", "text": "Hi"}}]}}"##,
        );
        let out = fixture.render(js(), &doc).unwrap();
        assert!(out.contains("import textStyles from \"./TextStyles\";"));
        assert!(out.contains("<View style={{ borderColor: \"#00FF00\" }}>"));
        assert!(out.contains("<Text style={{ ...textStyles.heading }}>{\"Hi\"}</Text>"));
    }

    #[test]
    fn test_js_visibility() {
        let mut fixture = Fixture::new();
        let doc = fixture.add(
            "Toggle",
            "Toggle",
            r#"{
                "params": [{"name": "showLabel", "type": "Boolean"}],
                "root": {"id": "Root", "type": "Lona:View", "children": [
                    {"id": "Label", "type": "Lona:Text", "parameters": {"text": "Shown"}},
                    {"id": "Hidden", "type": "Lona:Text", "parameters": {"text": "Gone", "visible": false}}
                ]},
                "logic": [{"type": "AssignExpr", "assignee": ["layers", "Label", "visible"], "content": ["parameters", "showLabel"]}]
            }"#,
        );
        let out = fixture.render(js(), &doc).unwrap();
        assert!(out.contains("label$visible = this.props.showLabel;"));
        assert!(out.contains("{label$visible && ("));
        assert!(!out.contains("Gone"));
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // SWIFT
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_swift_uikit_component() {
        let mut fixture = Fixture::new();
        let button = fixture.add("Button", "Button", BUTTON);
        let out = fixture.render(swift(Framework::UiKit), &button).unwrap();
        assert!(out.starts_with("import UIKit\n"));
        assert!(out.contains("public class Button: UIView {"));
        assert!(out.contains("public init(title: String) {"));
        assert!(out.contains("public var title: String { didSet { update() } }"));
        assert!(out.contains("private var labelView = UILabel()"));
        assert!(out.contains("    addSubview(labelView)\n"));
        assert!(out.contains("    backgroundColor = Colors.red\n"));
        assert!(out.contains("    labelView.text = \"Press\"\n    labelView.text = title\n"));
    }

    #[test]
    fn test_swift_appkit_component() {
        let mut fixture = Fixture::new();
        let button = fixture.add("Button", "Button", BUTTON);
        let out = fixture.render(swift(Framework::AppKit), &button).unwrap();
        assert!(out.starts_with("import AppKit\n"));
        assert!(out.contains("public class Button: NSView {"));
        assert!(out.contains("wantsLayer = true"));
        assert!(out.contains("layer?.backgroundColor = Colors.red.cgColor"));
        assert!(out.contains("labelView.stringValue = title"));
    }

    #[test]
    fn test_swift_embeds_sibling_with_initializer() {
        let mut fixture = Fixture::new();
        let card = fixture.add("Card", "Card", CARD);
        let out = fixture.render(swift(Framework::UiKit), &card).unwrap();
        assert!(out.contains("private var actionView = Button(title: \"Go\")"));
    }

    #[test]
    fn test_swift_text_style() {
        let mut fixture = Fixture::new();
        let doc = fixture.add(
            "Title",
            "Title",
            r#"{"root": {"id": "Root", "type": "Lona:View",
                "children": [{"id": "Heading", "type": "Lona:Text", "parameters": {"font": "heading"}}]}}"#,
        );
        let out = fixture.render(swift(Framework::UiKit), &doc).unwrap();
        assert!(out.contains(
            "headingView.font = TextStyles.heading.font\n    headingView.textColor = TextStyles.heading.color"
        ));
    }

    #[test]
    fn test_swift_rejects_layout_assignment() {
        let mut fixture = Fixture::new();
        let doc = fixture.add(
            "Sized",
            "Sized",
            r#"{
                "params": [{"name": "size", "type": "Number"}],
                "root": {"id": "Root", "type": "Lona:View"},
                "logic": [{"type": "AssignExpr", "assignee": ["layers", "Root", "width"], "content": ["parameters", "size"]}]
            }"#,
        );
        let err = fixture.render(swift(Framework::UiKit), &doc).unwrap_err();
        assert!(matches!(err, ConvertError::Unsupported { target: "swift", .. }));
        assert_eq!(err.kind(), FailureKind::Other);

        assert!(fixture.render(js(), &doc).unwrap().contains("width: root$width"));
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // FAILURES
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_xml_has_no_component_renderer() {
        let mut fixture = Fixture::new();
        let button = fixture.add("Button", "Button", BUTTON);
        let err = fixture
            .render(RenderContext::for_target(Target::Xml), &button)
            .unwrap_err();
        assert!(matches!(err, ConvertError::Unsupported { target: "xml", .. }));
    }

    #[test]
    fn test_missing_sibling_is_component_not_found() {
        let mut fixture = Fixture::new();
        let doc = fixture.add(
            "Screen",
            "Screen",
            r#"{"root": {"id": "Root", "type": "Lona:View", "children": [{"id": "Nav", "type": "NavBar"}]}}"#,
        );
        for ctx in [js(), swift(Framework::UiKit)] {
            let err = fixture.render(ctx, &doc).unwrap_err();
            assert!(matches!(err, ConvertError::ComponentNotFound(ref n) if n == "NavBar"));
            assert_eq!(err.kind(), FailureKind::ComponentNotFound);
        }
    }

    #[test]
    fn test_unknown_sibling_parameter() {
        let mut fixture = Fixture::new();
        let doc = fixture.add(
            "Bad",
            "Bad",
            r#"{"root": {"id": "Root", "type": "Lona:View", "children": [
                {"id": "Action", "type": "Button", "parameters": {"label": "Go"}}
            ]}}"#,
        );
        let err = fixture.render(js(), &doc).unwrap_err();
        assert_eq!(err.kind(), FailureKind::UnknownParameter);
    }

    #[test]
    fn test_unknown_color_and_text_style() {
        let mut fixture = Fixture::new();
        let color = fixture.add(
            "Tinted",
            "Tinted",
            r#"{"root": {"id": "Root", "type": "Lona:View", "parameters": {"backgroundColor": "teal"}}}"#,
        );
        assert_eq!(
            fixture.render(js(), &color).unwrap_err().kind(),
            FailureKind::Decode
        );

        let font = fixture.add(
            "Styled",
            "Styled",
            r#"{"root": {"id": "Root", "type": "Lona:View", "children": [
                {"id": "T", "type": "Lona:Text", "parameters": {"font": "display"}}
            ]}}"#,
        );
        assert_eq!(
            fixture.render(swift(Framework::UiKit), &font).unwrap_err().kind(),
            FailureKind::Decode
        );
    }

    #[test]
    fn test_component_rendering_is_deterministic() {
        let mut fixture = Fixture::new();
        let card = fixture.add("Card", "Card", CARD);
        let first = fixture.render(swift(Framework::AppKit), &card).unwrap();
        let second = fixture.render(swift(Framework::AppKit), &card).unwrap();
        assert_eq!(first, second);
    }
}
