use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::error::DecodeError;

lazy_static! {
    static ref HEX_COLOR: Regex =
        Regex::new(r"^#([0-9a-fA-F]{3}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})$").unwrap();
    static ref RGB_COLOR: Regex = Regex::new(
        r"^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*([0-9]*\.?[0-9]+)\s*)?\)$"
    )
    .unwrap();
    pub(crate) static ref TOKEN_ID: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if let Some(cap) = HEX_COLOR.captures(value) {
            let hex = &cap[1];
            let channel = |s: &str| u8::from_str_radix(s, 16).ok();
            return match hex.len() {
                3 => {
                    let expand = |i: usize| channel(hex[i..i + 1].repeat(2).as_str());
                    Some(Rgba {
                        r: expand(0)?,
                        g: expand(1)?,
                        b: expand(2)?,
                        a: 255,
                    })
                }
                6 | 8 => Some(Rgba {
                    r: channel(&hex[0..2])?,
                    g: channel(&hex[2..4])?,
                    b: channel(&hex[4..6])?,
                    a: if hex.len() == 8 {
                        channel(&hex[6..8])?
                    } else {
                        255
                    },
                }),
                _ => None,
            };
        }

        let cap = RGB_COLOR.captures(value)?;
        let channel = |i: usize| cap[i].parse::<u8>().ok();
        let alpha = match cap.get(4) {
            Some(m) => {
                let a: f64 = m.as_str().parse().ok()?;
                if !(0.0..=1.0).contains(&a) {
                    return None;
                }
                (a * 255.0).round() as u8
            }
            None => 255,
        };
        Some(Rgba {
            r: channel(1)?,
            g: channel(2)?,
            b: channel(3)?,
            a: alpha,
        })
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 255
    }

    /// `#RRGGBB`, or `#RRGGBBAA` when translucent.
    pub fn to_hex(&self) -> String {
        if self.is_opaque() {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }

    /// Android resource order: `#AARRGGBB`.
    pub fn to_argb_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}{:02X}", self.a, self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColorToken {
    pub id: String,
    pub name: Option<String>,
    pub value: Rgba,
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawColor {
    id: String,
    #[serde(default)]
    name: Option<String>,
    value: String,
    #[serde(default)]
    comment: Option<String>,
}

/// Parsed color tokens, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorSet {
    tokens: Vec<ColorToken>,
}

impl ColorSet {
    pub fn parse(raw: &str) -> Result<Self, DecodeError> {
        let value: Value = serde_json::from_str(raw)?;
        let Value::Object(mut map) = value else {
            return Err(DecodeError::malformed("color file must be a JSON object"));
        };

        let structured = matches!(map.get("colors"), Some(Value::Array(_)));
        let raw_colors: Vec<RawColor> = if structured {
            let list = map.remove("colors").unwrap_or(Value::Null);
            serde_json::from_value(list)?
        } else {
            map.into_iter()
                .map(|(id, value)| match value {
                    Value::String(value) => Ok(RawColor {
                        id,
                        name: None,
                        value,
                        comment: None,
                    }),
                    other => Err(DecodeError::InvalidColor {
                        id,
                        value: other.to_string(),
                    }),
                })
                .collect::<Result<_, _>>()?
        };

        let mut set = ColorSet::default();
        for raw in raw_colors {
            if !TOKEN_ID.is_match(&raw.id) {
                return Err(DecodeError::malformed(format!(
                    "invalid color id '{}'",
                    raw.id
                )));
            }
            if set.contains(&raw.id) {
                return Err(DecodeError::malformed(format!(
                    "duplicate color id '{}'",
                    raw.id
                )));
            }
            let value = Rgba::parse(&raw.value).ok_or_else(|| DecodeError::InvalidColor {
                id: raw.id.clone(),
                value: raw.value.clone(),
            })?;
            set.tokens.push(ColorToken {
                id: raw.id,
                name: raw.name,
                value,
                comment: raw.comment,
            });
        }
        Ok(set)
    }

    pub fn get(&self, id: &str) -> Option<&ColorToken> {
        self.tokens.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColorToken> {
        self.tokens.iter()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
