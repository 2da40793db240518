//! Built-in font variants and font specifications.

use crate::pdf::Color;
use serde::{Deserialize, Serialize};

/// The two built-in proportional fonts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontVariant {
    /// Helvetica regular
    Helvetica,
    /// Helvetica bold
    HelveticaBold,
}

impl FontVariant {
    /// All variants, in resource-name order.
    pub const ALL: [FontVariant; 2] = [FontVariant::Helvetica, FontVariant::HelveticaBold];

    /// Symbolic resource name used in content streams (e.g. "F1").
    pub fn resource_name(&self) -> &'static str {
        match self {
            FontVariant::Helvetica => "F1",
            FontVariant::HelveticaBold => "F2",
        }
    }

    /// PDF BaseFont name.
    pub fn base_font(&self) -> &'static str {
        match self {
            FontVariant::Helvetica => "Helvetica",
            FontVariant::HelveticaBold => "Helvetica-Bold",
        }
    }
}

/// A font variant at a size, with spacing and colour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    /// Which built-in font
    pub variant: FontVariant,

    /// Size in points
    pub size: f64,

    /// Extra advance after every character, in ems
    #[serde(default)]
    pub char_spacing: f64,

    /// Extra advance after every ASCII space, in ems
    #[serde(default)]
    pub word_spacing: f64,

    /// Fill colour
    #[serde(default)]
    pub color: Color,
}

impl FontSpec {
    /// Create a black font with no extra spacing.
    pub fn new(variant: FontVariant, size: f64) -> Self {
        Self {
            variant,
            size,
            char_spacing: 0.0,
            word_spacing: 0.0,
            color: Color::BLACK,
        }
    }

    /// Regular Helvetica at `size`.
    pub fn helvetica(size: f64) -> Self {
        Self::new(FontVariant::Helvetica, size)
    }

    /// Bold Helvetica at `size`.
    pub fn helvetica_bold(size: f64) -> Self {
        Self::new(FontVariant::HelveticaBold, size)
    }

    /// Set colour and return self.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    /// Set character spacing and return self.
    pub fn with_char_spacing(mut self, spacing: f64) -> Self {
        self.char_spacing = spacing;
        self
    }

    /// Set word spacing and return self.
    pub fn with_word_spacing(mut self, spacing: f64) -> Self {
        self.word_spacing = spacing;
        self
    }

    /// Distance between consecutive baselines.
    pub fn line_height(&self) -> f64 {
        self.size * LEADING
    }
}

/// Baseline-to-baseline distance as a multiple of the font size.
pub const LEADING: f64 = 1.25;
