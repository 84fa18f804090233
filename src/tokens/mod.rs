//! Token Module for the Lona compiler
//!
//! Colors are always parsed before text styles, since text styles refer to
//! colors by id.

mod colors;
mod text_styles;

pub use colors::{ColorSet, ColorToken, Rgba};
pub(crate) use colors::TOKEN_ID;
pub use text_styles::{FontWeight, TextStyle, TextStyleSet};

use tracing::debug;

use crate::error::{ConvertError, DecodeError};
use crate::target::RenderContext;
use crate::workspace::Workspace;

pub const COLORS_OUTPUT: &str = "Colors";
pub const TEXT_STYLES_OUTPUT: &str = "TextStyles";

/// The resolved design tokens of one workspace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tokens {
    pub colors: ColorSet,
    pub text_styles: TextStyleSet,
}

impl Tokens {
    pub fn load(workspace: &Workspace) -> Result<Self, ConvertError> {
        let colors = ColorSet::parse(&workspace.read_colors()?)?;
        debug!(count = colors.len(), "parsed color tokens");

        let text_styles = match workspace.read_text_styles()? {
            Some(raw) => TextStyleSet::parse(&raw, &colors)?,
            None => TextStyleSet::default(),
        };
        debug!(count = text_styles.len(), "parsed text styles");

        Ok(Self {
            colors,
            text_styles,
        })
    }
}

/// Parses and renders a color file.
pub fn convert_colors(ctx: &RenderContext, raw: &str) -> Result<String, DecodeError> {
    let colors = ColorSet::parse(raw)?;
    Ok(ctx.render_colors(&colors))
}

/// Parses and renders a text-style file against already parsed colors.
pub fn convert_text_styles(
    ctx: &RenderContext,
    colors: &ColorSet,
    raw: &str,
) -> Result<String, DecodeError> {
    let styles = TextStyleSet::parse(raw, colors)?;
    ctx.render_text_styles(colors, &styles)
}
