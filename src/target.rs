//! Target Module for the Lona compiler
//!
//! The closed set of output syntaxes. Every renderer call receives a
//! `RenderContext`, which is the only place target and framework selection lives.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::document::ComponentDocument;
use crate::error::{ConvertError, DecodeError, TargetError};
use crate::render::{js, swift, xml, ComponentLookup};
use crate::tokens::{ColorSet, TextStyleSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Js,
    Swift,
    Xml,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    #[value(name = "reactnative")]
    ReactNative,
    #[value(name = "reactdom")]
    ReactDom,
    #[value(name = "uikit")]
    UiKit,
    #[value(name = "appkit")]
    AppKit,
}

/// A support file copied verbatim into the output root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticFile {
    pub path: &'static str,
    pub contents: &'static str,
}

const TEXT_STYLE_UIKIT: StaticFile = StaticFile {
    path: "TextStyle.swift",
    contents: include_str!("../static/swift/TextStyle.uikit.swift"),
};

const TEXT_STYLE_APPKIT: StaticFile = StaticFile {
    path: "TextStyle.swift",
    contents: include_str!("../static/swift/TextStyle.appkit.swift"),
};

impl Target {
    pub fn id(self) -> &'static str {
        match self {
            Target::Js => "js",
            Target::Swift => "swift",
            Target::Xml => "xml",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Target::Js => "js",
            Target::Swift => "swift",
            Target::Xml => "xml",
        }
    }

    pub fn frameworks(self) -> &'static [Framework] {
        match self {
            Target::Js => &[Framework::ReactNative, Framework::ReactDom],
            Target::Swift => &[Framework::UiKit, Framework::AppKit],
            Target::Xml => &[],
        }
    }

    pub fn default_framework(self) -> Option<Framework> {
        self.frameworks().first().copied()
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Target {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "js" => Ok(Target::Js),
            "swift" => Ok(Target::Swift),
            "xml" => Ok(Target::Xml),
            other => Err(TargetError::Unknown(other.to_string())),
        }
    }
}

impl Framework {
    pub fn id(self) -> &'static str {
        match self {
            Framework::ReactNative => "reactnative",
            Framework::ReactDom => "reactdom",
            Framework::UiKit => "uikit",
            Framework::AppKit => "appkit",
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Framework {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reactnative" => Ok(Framework::ReactNative),
            "reactdom" => Ok(Framework::ReactDom),
            "uikit" => Ok(Framework::UiKit),
            "appkit" => Ok(Framework::AppKit),
            other => Err(TargetError::UnknownFramework(other.to_string())),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RENDER CONTEXT
// ═══════════════════════════════════════════════════════════════════════════════

/// Immutable target selection threaded through every rendering call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext {
    pub target: Target,
    pub framework: Option<Framework>,
}

impl RenderContext {
    /// Resolves the framework variant, falling back to the target default.
    pub fn new(target: Target, framework: Option<Framework>) -> Result<Self, TargetError> {
        let framework = match framework {
            Some(fw) if target.frameworks().contains(&fw) => Some(fw),
            Some(fw) => {
                return Err(TargetError::FrameworkMismatch {
                    target: target.id().to_string(),
                    framework: fw.id().to_string(),
                })
            }
            None => target.default_framework(),
        };
        Ok(Self { target, framework })
    }

    pub fn for_target(target: Target) -> Self {
        Self {
            target,
            framework: target.default_framework(),
        }
    }

    pub fn extension(&self) -> &'static str {
        self.target.extension()
    }

    pub fn static_files(&self) -> &'static [StaticFile] {
        match (self.target, self.framework) {
            (Target::Swift, Some(Framework::AppKit)) => &[TEXT_STYLE_APPKIT],
            (Target::Swift, _) => &[TEXT_STYLE_UIKIT],
            (Target::Js, _) | (Target::Xml, _) => &[],
        }
    }

    pub fn render_colors(&self, colors: &ColorSet) -> String {
        match self.target {
            Target::Js => js::render_colors(colors),
            Target::Swift => swift::render_colors(self, colors),
            Target::Xml => xml::render_colors(colors),
        }
    }

    /// Targets without a text-style abstraction render nothing.
    pub fn render_text_styles(
        &self,
        colors: &ColorSet,
        styles: &TextStyleSet,
    ) -> Result<String, DecodeError> {
        styles.check_colors(colors)?;
        Ok(match self.target {
            Target::Js => js::render_text_styles(styles),
            Target::Swift => swift::render_text_styles(self, styles),
            Target::Xml => String::new(),
        })
    }

    pub fn render_component(
        &self,
        colors: &ColorSet,
        text_styles: &TextStyleSet,
        lookup: &dyn ComponentLookup,
        document: &ComponentDocument,
    ) -> Result<String, ConvertError> {
        match self.target {
            Target::Js => js::render_component(self, colors, text_styles, lookup, document),
            Target::Swift => swift::render_component(self, colors, text_styles, lookup, document),
            Target::Xml => Err(ConvertError::Unsupported {
                target: self.target.id(),
                operation: "component conversion",
            }),
        }
    }
}
