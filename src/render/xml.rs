//! XML target: Android resource files. Only colors have a markup form.

use std::fmt::Write as _;

use crate::tokens::ColorSet;

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn render_colors(colors: &ColorSet) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<resources>\n");
    for token in colors.iter() {
        if let Some(comment) = &token.comment {
            // `--` may not appear inside an XML comment.
            let _ = writeln!(out, "    <!-- {} -->", comment.replace("--", "- -"));
        }
        let _ = writeln!(
            out,
            "    <color name=\"{}\">{}</color>",
            escape(&token.id),
            token.value.to_argb_hex()
        );
    }
    out.push_str("</resources>\n");
    out
}
