use serde::Deserialize;

use super::colors::{ColorSet, TOKEN_ID};
use crate::error::DecodeError;

/// Numeric CSS-style weight, `100` through `900`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontWeight(pub u16);

impl FontWeight {
    fn parse(raw: &RawWeight) -> Option<Self> {
        let value = match raw {
            RawWeight::Number(n) => *n,
            RawWeight::Name(s) => match s.trim() {
                "normal" | "regular" => 400,
                "bold" => 700,
                other => other.parse().ok()?,
            },
        };
        (value % 100 == 0 && (100..=900).contains(&value)).then_some(FontWeight(value))
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawWeight {
    Number(u16),
    Name(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    pub id: String,
    pub name: Option<String>,
    pub font_family: Option<String>,
    pub font_name: Option<String>,
    pub font_weight: Option<FontWeight>,
    pub font_size: Option<f64>,
    pub line_height: Option<f64>,
    pub letter_spacing: Option<f64>,
    /// Color token id.
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTextStyle {
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    font_family: Option<String>,
    #[serde(default)]
    font_name: Option<String>,
    #[serde(default)]
    font_weight: Option<RawWeight>,
    #[serde(default)]
    font_size: Option<f64>,
    #[serde(default)]
    line_height: Option<f64>,
    #[serde(default)]
    letter_spacing: Option<f64>,
    #[serde(default)]
    color: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTextStyleFile {
    #[serde(default)]
    styles: Vec<RawTextStyle>,
    #[serde(default)]
    default_style_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextStyleSet {
    styles: Vec<TextStyle>,
    default_style: Option<String>,
}

impl TextStyleSet {
    /// Parses a text-style file. Color references are resolved against `colors`,
    /// which must already be parsed.
    pub fn parse(raw: &str, colors: &ColorSet) -> Result<Self, DecodeError> {
        let file: RawTextStyleFile = serde_json::from_str(raw)?;

        let mut set = TextStyleSet::default();
        for raw in file.styles {
            if !TOKEN_ID.is_match(&raw.id) {
                return Err(DecodeError::malformed(format!(
                    "invalid text style id '{}'",
                    raw.id
                )));
            }
            if set.get(&raw.id).is_some() {
                return Err(DecodeError::malformed(format!(
                    "duplicate text style id '{}'",
                    raw.id
                )));
            }
            let font_weight = match &raw.font_weight {
                Some(w) => Some(FontWeight::parse(w).ok_or_else(|| {
                    DecodeError::malformed(format!(
                        "text style '{}' has an invalid font weight",
                        raw.id
                    ))
                })?),
                None => None,
            };
            set.styles.push(TextStyle {
                id: raw.id,
                name: raw.name,
                font_family: raw.font_family,
                font_name: raw.font_name,
                font_weight,
                font_size: raw.font_size,
                line_height: raw.line_height,
                letter_spacing: raw.letter_spacing,
                color: raw.color,
            });
        }

        if let Some(default) = &file.default_style_name {
            if set.get(default).is_none() {
                return Err(DecodeError::malformed(format!(
                    "default text style '{}' is not defined",
                    default
                )));
            }
        }
        set.default_style = file.default_style_name;

        set.check_colors(colors)?;
        Ok(set)
    }

    /// Every color reference must name a token in `colors`.
    pub fn check_colors(&self, colors: &ColorSet) -> Result<(), DecodeError> {
        for style in &self.styles {
            if let Some(color) = &style.color {
                if !colors.contains(color) {
                    return Err(DecodeError::UnknownColor {
                        style: style.id.clone(),
                        color: color.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&TextStyle> {
        self.styles.iter().find(|s| s.id == id)
    }

    pub fn default_style(&self) -> Option<&TextStyle> {
        self.default_style.as_deref().and_then(|id| self.get(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &TextStyle> {
        self.styles.iter()
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}
