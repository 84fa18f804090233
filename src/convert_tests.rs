//! Batch conversion tests against temporary workspaces.

#[cfg(test)]
mod tests {
    use crate::convert::{convert_component, convert_workspace, output_path, resolve_context};
    use crate::error::{ConvertError, FailureKind};
    use crate::target::{Framework, RenderContext, Target};
    use crate::workspace::Workspace;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    const BUTTON: &str = r#"{
        "params": [{"name": "title", "type": "String"}],
        "root": {
            "id": "Container",
            "type": "Lona:View",
            "parameters": {"backgroundColor": "red"},
            "children": [{"id": "Label", "type": "Lona:Text", "parameters": {"text": "Press"}}]
        },
        "logic": [
            {"type": "AssignExpr", "assignee": ["layers", "Label", "text"], "content": ["parameters", "title"]}
        ]
    }"#;

    struct Fixture {
        dir: TempDir,
        out: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let fixture = Fixture {
                dir: tempfile::tempdir().unwrap(),
                out: tempfile::tempdir().unwrap(),
            };
            fixture.write("colors.json", r##"{"red": "#FF0000"}"##);
            fixture.write("Button.component", BUTTON);
            fixture
        }

        fn root(&self) -> &Path {
            self.dir.path()
        }

        fn output(&self) -> PathBuf {
            self.out.path().join("generated")
        }

        fn write(&self, relative: &str, contents: &str) {
            let path = self.root().join(relative);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, contents).unwrap();
        }

        fn workspace(&self) -> Workspace {
            Workspace::open(self.root()).unwrap()
        }

        /// Canonical output path, as recorded in reports.
        fn written(&self, relative: &str) -> PathBuf {
            self.output().canonicalize().unwrap().join(relative)
        }

        fn read(&self, relative: &str) -> String {
            fs::read_to_string(self.output().join(relative)).unwrap()
        }

        fn convert(&self, target: Target) -> crate::convert::ConvertReport {
            let workspace = self.workspace();
            let ctx = resolve_context(target, None, Some(&workspace)).unwrap();
            convert_workspace(&workspace, &ctx, &self.output()).unwrap()
        }
    }

    #[test]
    fn test_red_button_scenario() {
        let fixture = Fixture::new();
        let report = fixture.convert(Target::Js);

        assert_eq!(
            fixture.read("Colors.js"),
            "const colors = {\n  red: \"#FF0000\",\n};\n\nexport default colors;\n"
        );
        let button = fixture.read("Button.js");
        assert!(button.contains("backgroundColor: colors.red"));
        assert_eq!(report.converted, vec![fixture.written("Button.js")]);
        assert!(report.failures.is_empty());
        assert_eq!(
            report.tokens,
            vec![
                fixture.written("Colors.js"),
                fixture.written("TextStyles.js"),
            ]
        );

        // Rerun without markers overwrites with identical content.
        fixture.convert(Target::Js);
        assert_eq!(fixture.read("Button.js"), button);
    }

    #[test]
    fn test_rerun_discards_unmarked_edits() {
        let fixture = Fixture::new();
        fixture.convert(Target::Js);
        let generated = fixture.read("Button.js");

        fs::write(fixture.output().join("Button.js"), "// scratch\n").unwrap();
        fixture.convert(Target::Js);
        assert_eq!(fixture.read("Button.js"), generated);
    }

    #[test]
    fn test_keep_above_survives_regeneration() {
        let fixture = Fixture::new();
        fixture.convert(Target::Js);
        let generated = fixture.read("Button.js");

        let edited = format!(
            "import Analytics from \"./Analytics\";\n// LONA: KEEP ABOVE\n{generated}"
        );
        fs::write(fixture.output().join("Button.js"), edited).unwrap();
        fixture.convert(Target::Js);

        assert_eq!(
            fixture.read("Button.js"),
            format!("import Analytics from \"./Analytics\";\n// LONA: KEEP ABOVE\n\n{generated}")
        );
    }

    #[test]
    fn test_keep_below_survives_regeneration() {
        let fixture = Fixture::new();
        fixture.convert(Target::Swift);
        let generated = fixture.read("Button.swift");

        let edited = format!("{generated}// LONA: KEEP BELOW\nextension Button {{}}\n");
        fs::write(fixture.output().join("Button.swift"), edited).unwrap();
        fixture.convert(Target::Swift);

        assert_eq!(
            fixture.read("Button.swift"),
            format!("{generated}\n// LONA: KEEP BELOW\nextension Button {{}}\n")
        );
    }

    #[test]
    fn test_failures_are_isolated() {
        let fixture = Fixture::new();
        fixture.write("Broken.component", "{ not json");
        fixture.write(
            "Looping.component",
            r#"{"root": {"id": "v", "type": "Lona:View"}, "logic": [{"type": "WhileExpr"}]}"#,
        );
        fixture.write(
            "Screen.component",
            r#"{"root": {"id": "v", "type": "Lona:View", "children": [{"id": "n", "type": "NavBar"}]}}"#,
        );
        fixture.write(
            "Typo.component",
            r#"{"root": {"id": "v", "type": "Lona:View", "parameters": {"colour": "red"}}}"#,
        );

        let report = fixture.convert(Target::Js);
        assert_eq!(report.discovered(), 5);
        assert_eq!(report.converted.len(), 1);
        assert!(report.has_failures());

        let kinds: Vec<_> = report.failures.iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![
                FailureKind::Decode,
                FailureKind::UnknownExpressionType,
                FailureKind::ComponentNotFound,
                FailureKind::UnknownParameter,
            ]
        );
        assert!(fixture.output().join("Button.js").exists());
        assert!(!fixture.output().join("Broken.js").exists());
    }

    #[test]
    fn test_xml_components_fail_but_tokens_are_written() {
        let fixture = Fixture::new();
        let report = fixture.convert(Target::Xml);

        assert!(fixture.read("Colors.xml").contains("#FFFF0000"));
        assert_eq!(fixture.read("TextStyles.xml"), "");
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].kind, FailureKind::Other);
    }

    #[test]
    fn test_directory_structure_is_mirrored() {
        let fixture = Fixture::new();
        fixture.write("forms/Field.component", BUTTON);
        fixture.convert(Target::Js);

        let field = fixture.read("forms/Field.js");
        assert!(field.contains("import colors from \"../Colors\";"));
        assert_eq!(
            output_path(
                &fixture.workspace(),
                &fixture.workspace().root().join("forms/Field.component"),
                Path::new("/out"),
                "swift"
            ),
            Path::new("/out/forms/Field.swift")
        );
    }

    #[test]
    fn test_assets_are_copied_verbatim() {
        let fixture = Fixture::new();
        let bytes = [0x89, b'P', b'N', b'G', 0x00, 0xFF];
        fs::create_dir_all(fixture.root().join("images")).unwrap();
        fs::write(fixture.root().join("images/logo.png"), bytes).unwrap();
        fs::create_dir_all(fixture.output().join("images")).unwrap();
        fs::write(fixture.output().join("images/logo.png"), b"stale").unwrap();

        let report = fixture.convert(Target::Js);
        assert_eq!(report.assets, vec![fixture.written("images/logo.png")]);
        assert_eq!(
            fs::read(fixture.output().join("images/logo.png")).unwrap(),
            bytes.to_vec()
        );
    }

    #[test]
    fn test_swift_static_file_follows_framework() {
        let fixture = Fixture::new();
        let report = fixture.convert(Target::Swift);
        assert_eq!(report.static_files, vec![fixture.written("TextStyle.swift")]);
        assert!(fixture.read("TextStyle.swift").contains("import UIKit"));

        fixture.write("lona.json", r#"{"framework": "appkit"}"#);
        fixture.convert(Target::Swift);
        assert!(fixture.read("TextStyle.swift").contains("import AppKit"));
        assert!(fixture.read("Button.swift").contains("NSView"));
    }

    #[test]
    fn test_framework_precedence() {
        let fixture = Fixture::new();
        fixture.write("lona.json", r#"{"framework": "reactdom"}"#);
        let workspace = fixture.workspace();

        let configured = resolve_context(Target::Js, None, Some(&workspace)).unwrap();
        assert_eq!(configured.framework, Some(Framework::ReactDom));

        let explicit =
            resolve_context(Target::Js, Some(Framework::ReactNative), Some(&workspace)).unwrap();
        assert_eq!(explicit.framework, Some(Framework::ReactNative));

        // A js framework in the config does not apply to swift.
        let other = resolve_context(Target::Swift, None, Some(&workspace)).unwrap();
        assert_eq!(other.framework, Some(Framework::UiKit));

        assert!(resolve_context(Target::Swift, Some(Framework::ReactDom), None).is_err());
    }

    #[test]
    fn test_output_inside_workspace_is_not_rediscovered() {
        let fixture = Fixture::new();
        fixture.write("images/logo.png", "png");
        let workspace = fixture.workspace();
        let ctx = RenderContext::for_target(Target::Js);
        let output = fixture.root().join("build");

        convert_workspace(&workspace, &ctx, &output).unwrap();
        let report = convert_workspace(&workspace, &ctx, &output).unwrap();

        assert_eq!(report.assets.len(), 1);
        assert!(!output.join("build").exists());
    }

    #[test]
    fn test_converting_into_the_workspace_root() {
        let fixture = Fixture::new();
        fixture.write("images/logo.png", "png");
        let workspace = fixture.workspace();
        let ctx = RenderContext::for_target(Target::Js);

        let report = convert_workspace(&workspace, &ctx, fixture.root()).unwrap();
        assert_eq!(report.discovered(), 1);
        assert!(!report.has_failures());
        assert!(fixture.root().join("Button.js").exists());
        assert_eq!(report.assets, vec![workspace.root().join("images/logo.png")]);
        assert_eq!(
            fs::read_to_string(fixture.root().join("images/logo.png")).unwrap(),
            "png"
        );

        let rerun = convert_workspace(&workspace, &ctx, fixture.root()).unwrap();
        assert_eq!(rerun.converted, report.converted);
    }

    #[test]
    fn test_report_paths_are_canonical() {
        let fixture = Fixture::new();
        let workspace = fixture.workspace();
        let ctx = RenderContext::for_target(Target::Js);
        let indirect = fixture.out.path().join("scratch/../generated");

        let report = convert_workspace(&workspace, &ctx, &indirect).unwrap();
        assert_eq!(report.tokens[0], fixture.written("Colors.js"));
        assert_eq!(report.converted, vec![fixture.written("Button.js")]);
        assert!(report.converted[0].is_absolute());
    }

    #[test]
    fn test_asset_copy_failure_is_reported() {
        let fixture = Fixture::new();
        fixture.write("images/logo.png", "png");
        fixture.write("images/icon.png", "icon");
        // A directory where the copy should land makes it fail.
        fs::create_dir_all(fixture.output().join("images/logo.png")).unwrap();

        let report = fixture.convert(Target::Js);
        assert_eq!(report.discovered(), 1);
        assert_eq!(report.converted.len(), 1);
        assert_eq!(report.assets.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].kind, FailureKind::Asset);
        assert!(report.failures[0].path.ends_with("images/logo.png"));
        assert_eq!(fixture.read("images/icon.png"), "icon");
    }

    #[test]
    fn test_ignored_files_are_skipped() {
        let fixture = Fixture::new();
        fixture.write("lona.json", r#"{"ignore": ["drafts/**"]}"#);
        fixture.write("drafts/Broken.component", "{");

        let report = fixture.convert(Target::Js);
        assert_eq!(report.discovered(), 1);
        assert!(!report.has_failures());
    }

    #[test]
    fn test_bad_tokens_abort_before_components() {
        let fixture = Fixture::new();
        fixture.write("colors.json", r#"{"red": "not a color"}"#);
        let workspace = fixture.workspace();
        let ctx = RenderContext::for_target(Target::Js);

        let err = convert_workspace(&workspace, &ctx, &fixture.output()).unwrap_err();
        assert_eq!(err.kind(), FailureKind::Decode);
        assert!(!fixture.output().exists());
    }

    #[test]
    fn test_text_styles_are_rendered() {
        let fixture = Fixture::new();
        fixture.write(
            "textStyles.json",
            r#"{"styles": [{"id": "body", "fontSize": 14, "color": "red"}]}"#,
        );
        fixture.convert(Target::Js);
        let styles = fixture.read("TextStyles.js");
        assert!(styles.starts_with("import colors from \"./Colors\";"));
        assert!(styles.contains("fontSize: 14,"));
    }

    // ═══════════════════════════════════════════════════════════════════════════════
    // SINGLE COMPONENT
    // ═══════════════════════════════════════════════════════════════════════════════

    #[test]
    fn test_convert_component_matches_batch_output() {
        let fixture = Fixture::new();
        fixture.convert(Target::Js);

        let ctx = RenderContext::for_target(Target::Js);
        let single = convert_component(&ctx, &fixture.root().join("Button.component"), None).unwrap();
        assert_eq!(single, fixture.read("Button.js"));
    }

    #[test]
    fn test_convert_component_resolves_siblings() {
        let fixture = Fixture::new();
        fixture.write(
            "cards/Card.component",
            r#"{"root": {"id": "Root", "type": "Lona:View", "children": [
                {"id": "Action", "type": "Button", "parameters": {"title": "Go"}}
            ]}}"#,
        );
        let workspace = fixture.workspace();
        let ctx = RenderContext::for_target(Target::Js);

        let out = convert_component(
            &ctx,
            &fixture.root().join("cards/Card.component"),
            Some(&workspace),
        )
        .unwrap();
        assert!(out.contains("import Button from \"../Button\";"));
    }

    #[test]
    fn test_convert_component_outside_workspace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Loose.component");
        fs::write(&path, BUTTON).unwrap();

        let ctx = RenderContext::for_target(Target::Js);
        let err = convert_component(&ctx, &path, None).unwrap_err();
        assert!(matches!(err, ConvertError::Workspace(_)));
    }
}
