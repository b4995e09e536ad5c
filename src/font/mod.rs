//! # Font Management
//!
//! Font selection and text measurement for the standard PDF fonts. These
//! fonts need no embedding, so the same [`StandardFont`] value drives both
//! layout (advance widths) and output (the PDF base font name).
//!
//! Families other than Helvetica and Courier fall back to Helvetica.

pub mod metrics;

use std::collections::HashMap;

pub use metrics::StandardFontMetrics;

use crate::canvas::Rect;
use crate::style::Style;

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct FontKey {
    pub family: String,
    pub bold: bool,
    pub italic: bool,
}

impl FontKey {
    pub fn of(style: &Style) -> Self {
        Self {
            family: style.font_family.clone(),
            bold: style.is_bold(),
            italic: style.italic,
        }
    }
}

/// The standard PDF fonts this engine can set text in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
    HelveticaBoldOblique,
    Courier,
    CourierBold,
    CourierOblique,
    CourierBoldOblique,
}

impl StandardFont {
    /// The PDF name for this font.
    pub fn pdf_name(&self) -> &'static str {
        match self {
            Self::Helvetica => "Helvetica",
            Self::HelveticaBold => "Helvetica-Bold",
            Self::HelveticaOblique => "Helvetica-Oblique",
            Self::HelveticaBoldOblique => "Helvetica-BoldOblique",
            Self::Courier => "Courier",
            Self::CourierBold => "Courier-Bold",
            Self::CourierOblique => "Courier-Oblique",
            Self::CourierBoldOblique => "Courier-BoldOblique",
        }
    }

    pub fn metrics(&self) -> StandardFontMetrics {
        match self {
            Self::Helvetica | Self::HelveticaOblique => metrics::HELVETICA_METRICS,
            Self::HelveticaBold | Self::HelveticaBoldOblique => metrics::HELVETICA_BOLD_METRICS,
            _ => metrics::COURIER_METRICS,
        }
    }
}

/// Maps family + weight + slant to a standard font.
#[derive(Debug, Clone)]
pub struct FontRegistry {
    fonts: HashMap<FontKey, StandardFont>,
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FontRegistry {
    pub fn new() -> Self {
        let standard_mappings = [
            (("Helvetica", false, false), StandardFont::Helvetica),
            (("Helvetica", true, false), StandardFont::HelveticaBold),
            (("Helvetica", false, true), StandardFont::HelveticaOblique),
            (("Helvetica", true, true), StandardFont::HelveticaBoldOblique),
            (("Courier", false, false), StandardFont::Courier),
            (("Courier", true, false), StandardFont::CourierBold),
            (("Courier", false, true), StandardFont::CourierOblique),
            (("Courier", true, true), StandardFont::CourierBoldOblique),
        ];

        let fonts = standard_mappings
            .into_iter()
            .map(|((family, bold, italic), font)| {
                (
                    FontKey {
                        family: family.to_string(),
                        bold,
                        italic,
                    },
                    font,
                )
            })
            .collect();

        Self { fonts }
    }

    /// Look up a font, falling back to the Helvetica face of the same weight
    /// and slant.
    pub fn resolve(&self, key: &FontKey) -> StandardFont {
        if let Some(font) = self.fonts.get(key) {
            return *font;
        }
        match (key.bold, key.italic) {
            (false, false) => StandardFont::Helvetica,
            (true, false) => StandardFont::HelveticaBold,
            (false, true) => StandardFont::HelveticaOblique,
            (true, true) => StandardFont::HelveticaBoldOblique,
        }
    }
}

/// Shared font context used by layout and PDF output.
#[derive(Debug, Clone, Default)]
pub struct FontContext {
    registry: FontRegistry,
}

impl FontContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn font_for(&self, style: &Style) -> StandardFont {
        self.registry.resolve(&FontKey::of(style))
    }

    /// Width of a string in points.
    pub fn measure_string(&self, text: &str, style: &Style) -> f64 {
        self.font_for(style)
            .metrics()
            .measure_string(text, style.font_size)
    }

    /// Width of a single space in points.
    pub fn space_width(&self, style: &Style) -> f64 {
        self.font_for(style).metrics().char_width(' ', style.font_size)
    }

    /// Distance from the top of a text line box to its baseline.
    pub fn baseline_offset(&self, style: &Style) -> f64 {
        let ascender = self.font_for(style).metrics().ascender as f64 / 1000.0;
        let half_leading = (style.line_box() - style.font_size) / 2.0;
        half_leading + ascender * style.font_size
    }

    /// Box covered by `text` drawn with its baseline starting at
    /// (`x`, `baseline`): the advance width, ascender to descender.
    pub fn text_extent(&self, text: &str, style: &Style, x: f64, baseline: f64) -> Rect {
        let metrics = self.font_for(style).metrics();
        let ascent = metrics.ascender as f64 / 1000.0 * style.font_size;
        let descent = -(metrics.descender as f64) / 1000.0 * style.font_size;
        Rect::new(
            x,
            baseline - ascent,
            metrics.measure_string(text, style.font_size),
            ascent + descent,
        )
    }
}
