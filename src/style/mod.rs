//! # Style System
//!
//! The typographic attributes a node carries: font family, size, weight,
//! slant, color, and the two line decorations.
//!
//! Styles are plain values. A node never holds its parent's style; it holds a
//! [`StyleOverride`] listing only the fields it sets, and the engine resolves
//! that against whatever style is inherited at fill time. Resolution copies
//! the parent and overwrites the explicitly-set fields, nothing more.

use serde::{Deserialize, Serialize};

/// Fully resolved style: every field has a concrete value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    /// Font family name (e.g. "Helvetica", "Courier").
    pub font_family: String,
    /// Font size in points.
    pub font_size: f64,
    pub font_weight: FontWeight,
    pub italic: bool,
    pub color: Color,
    pub underline: bool,
    pub strikethrough: bool,
    /// Line height as a multiplier of font size.
    pub line_height: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            font_family: "Helvetica".to_string(),
            font_size: 12.0,
            font_weight: FontWeight::Normal,
            italic: false,
            color: Color::BLACK,
            underline: false,
            strikethrough: false,
            line_height: 1.2,
        }
    }
}

impl Style {
    pub fn is_bold(&self) -> bool {
        matches!(self.font_weight, FontWeight::Bold)
    }

    /// Height of one line of text in this style.
    pub fn line_box(&self) -> f64 {
        self.font_size * self.line_height
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// The fields a node sets on top of its inherited style.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleOverride {
    pub font_family: Option<String>,
    pub font_size: Option<f64>,
    pub font_weight: Option<FontWeight>,
    pub italic: Option<bool>,
    pub color: Option<Color>,
    pub underline: Option<bool>,
    pub strikethrough: Option<bool>,
    pub line_height: Option<f64>,
}

impl StyleOverride {
    /// Copy `parent`, then overwrite the fields set on this override.
    pub fn resolve(&self, parent: &Style) -> Style {
        Style {
            font_family: self
                .font_family
                .clone()
                .unwrap_or_else(|| parent.font_family.clone()),
            font_size: self
                .font_size
                .filter(|s| *s > 0.0)
                .unwrap_or(parent.font_size),
            font_weight: self.font_weight.unwrap_or(parent.font_weight),
            italic: self.italic.unwrap_or(parent.italic),
            color: self.color.unwrap_or(parent.color),
            underline: self.underline.unwrap_or(parent.underline),
            strikethrough: self.strikethrough.unwrap_or(parent.strikethrough),
            line_height: self
                .line_height
                .filter(|l| *l > 0.0)
                .unwrap_or(parent.line_height),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == StyleOverride::default()
    }

    // ── Builder ────────────────────────────────────────────────

    pub fn family(mut self, family: &str) -> Self {
        self.font_family = Some(family.to_string());
        self
    }

    pub fn size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }

    pub fn bold(mut self) -> Self {
        self.font_weight = Some(FontWeight::Bold);
        self
    }

    pub fn weight(mut self, weight: FontWeight) -> Self {
        self.font_weight = Some(weight);
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = Some(true);
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn underline(mut self) -> Self {
        self.underline = Some(true);
        self
    }

    pub fn strikethrough(mut self) -> Self {
        self.strikethrough = Some(true);
        self
    }

    pub fn line_height(mut self, line_height: f64) -> Self {
        self.line_height = Some(line_height);
        self
    }
}

/// An RGB color, each channel in 0.0 - 1.0.
///
/// Deserializes from `{"r": .., "g": .., "b": ..}` or from a hex string.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "ColorValue")]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn gray(level: f64) -> Self {
        Self::rgb(level, level, level)
    }

    /// Parse `#rgb` or `#rrggbb`. Anything else is black.
    pub fn hex(hex: &str) -> Self {
        let hex = hex.trim_start_matches('#');
        if !hex.is_ascii() {
            return Self::BLACK;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).unwrap_or(0) as f64 / 255.0;
        match hex.len() {
            3 => Self::rgb(
                channel(&hex[0..1].repeat(2)),
                channel(&hex[1..2].repeat(2)),
                channel(&hex[2..3].repeat(2)),
            ),
            6 => Self::rgb(channel(&hex[0..2]), channel(&hex[2..4]), channel(&hex[4..6])),
            _ => Self::BLACK,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorValue {
    Hex(String),
    Rgb { r: f64, g: f64, b: f64 },
}

impl From<ColorValue> for Color {
    fn from(value: ColorValue) -> Self {
        match value {
            ColorValue::Hex(hex) => Color::hex(&hex),
            ColorValue::Rgb { r, g, b } => Color::rgb(r, g, b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_override_copies_parent() {
        let parent = Style {
            font_size: 9.0,
            color: Color::gray(0.5),
            ..Style::default()
        };
        assert_eq!(StyleOverride::default().resolve(&parent), parent);
    }

    #[test]
    fn override_replaces_only_set_fields() {
        let parent = Style {
            italic: true,
            ..Style::default()
        };
        let resolved = StyleOverride::default().size(20.0).bold().resolve(&parent);
        assert_eq!(resolved.font_size, 20.0);
        assert!(resolved.is_bold());
        assert!(resolved.italic, "italic is inherited");
        assert_eq!(resolved.font_family, "Helvetica");
    }

    #[test]
    fn non_positive_size_is_ignored() {
        let resolved = StyleOverride::default().size(0.0).resolve(&Style::default());
        assert_eq!(resolved.font_size, 12.0);
    }

    #[test]
    fn hex_colors() {
        let c = Color::hex("#ff0000");
        assert!((c.r - 1.0).abs() < 1e-9 && c.g == 0.0 && c.b == 0.0);
        let short = Color::hex("fff");
        assert_eq!(short, Color::WHITE);
        assert_eq!(Color::hex("nope"), Color::BLACK);
    }

    #[test]
    fn non_ascii_hex_is_black() {
        assert_eq!(Color::hex("#\u{e9}1"), Color::BLACK);
        assert_eq!(Color::hex("\u{4e2d}\u{4e2d}"), Color::BLACK);
    }

    #[test]
    fn color_from_json_hex_or_channels() {
        let hex: Color = serde_json::from_str(r##""#00ff00""##).expect("hex color");
        assert_eq!(hex, Color::rgb(0.0, 1.0, 0.0));
        let rgb: Color = serde_json::from_str(r#"{"r": 0.5, "g": 0.25, "b": 1}"#).expect("rgb color");
        assert_eq!(rgb, Color::rgb(0.5, 0.25, 1.0));

        let o: StyleOverride = serde_json::from_str(r##"{"color": "#fff"}"##).expect("valid override");
        assert_eq!(o.color, Some(Color::WHITE));
    }

    #[test]
    fn style_override_from_json() {
        let o: StyleOverride = serde_json::from_str(r#"{"fontSize": 18, "fontWeight": "Bold"}"#)
            .expect("valid override");
        assert_eq!(o.font_size, Some(18.0));
        assert_eq!(o.font_weight, Some(FontWeight::Bold));
        assert!(o.color.is_none());
    }
}
