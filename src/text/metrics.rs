//! Glyph advance widths and text measurement.
//!
//! Widths are in ems (fractions of the font size) for character codes
//! 0-255. Measurement is pure: a [`FontMetrics`] holds only references to
//! static tables and can be shared across threads freely.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

use super::font::{FontSpec, FontVariant};

/// What to do when a character has no width entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GlyphPolicy {
    /// Fail with [`Error::UnsupportedGlyph`]
    Strict,
    /// Replace the glyph and log a warning
    #[default]
    Substitute,
}

/// Glyph drawn in place of characters outside the width tables.
pub const SUBSTITUTE_GLYPH: char = '?';

/// Width table lookup for the built-in fonts.
#[derive(Debug, Clone, Copy)]
pub struct FontMetrics {
    helvetica: &'static [f64; 256],
    helvetica_bold: &'static [f64; 256],
}

impl FontMetrics {
    /// Metrics for the built-in Helvetica family.
    pub fn builtin() -> Self {
        Self {
            helvetica: &HELVETICA,
            helvetica_bold: &HELVETICA_BOLD,
        }
    }

    fn table(&self, variant: FontVariant) -> &'static [f64; 256] {
        match variant {
            FontVariant::Helvetica => self.helvetica,
            FontVariant::HelveticaBold => self.helvetica_bold,
        }
    }

    /// Advance width of a single glyph in ems, if the font covers it.
    pub fn glyph_width(&self, variant: FontVariant, ch: char) -> Option<f64> {
        self.table(variant).get(ch as usize).copied()
    }

    /// Check whether every character of `text` has a width entry.
    pub fn supports(&self, variant: FontVariant, text: &str) -> bool {
        text.chars().all(|ch| self.glyph_width(variant, ch).is_some())
    }

    /// Rendered width of `text` in points.
    ///
    /// Every character contributes its glyph width plus the character
    /// spacing; an ASCII space also contributes the word spacing. The sum
    /// is scaled by the font size.
    pub fn measure_width(&self, text: &str, font: &FontSpec) -> Result<f64> {
        let mut width = 0.0;
        for ch in text.chars() {
            let glyph = self
                .glyph_width(font.variant, ch)
                .ok_or(Error::UnsupportedGlyph {
                    ch,
                    font: font.variant.base_font(),
                })?;
            width += self.advance(glyph, ch, font);
        }
        Ok(width * font.size)
    }

    /// Like [`measure_width`](Self::measure_width), but characters outside
    /// the table are measured as a space glyph (without word spacing).
    pub fn measure_width_lossy(&self, text: &str, font: &FontSpec) -> f64 {
        let space = self.table(font.variant)[b' ' as usize];
        let mut width = 0.0;
        for ch in text.chars() {
            let glyph = match self.glyph_width(font.variant, ch) {
                Some(w) => w,
                None => {
                    log::warn!(
                        "No width for {:?} in {}, measuring as a space",
                        ch,
                        font.variant.base_font()
                    );
                    space
                }
            };
            width += self.advance(glyph, ch, font);
        }
        width * font.size
    }

    /// Measure according to `policy`.
    pub fn measure(&self, text: &str, font: &FontSpec, policy: GlyphPolicy) -> Result<f64> {
        match policy {
            GlyphPolicy::Strict => self.measure_width(text, font),
            GlyphPolicy::Substitute => Ok(self.measure_width_lossy(text, font)),
        }
    }

    fn advance(&self, glyph: f64, ch: char, font: &FontSpec) -> f64 {
        let word = if ch == ' ' { font.word_spacing } else { 0.0 };
        glyph + font.char_spacing + word
    }
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self::builtin()
    }
}

static HELVETICA: [f64; 256] = [
    0.278, 0.278, 0.278, 0.278, 0.278, 0.278, 0.278, 0.278,
    0.278, 0.278, 0.278, 0.278, 0.278, 0.278, 0.278, 0.278,
    0.278, 0.278, 0.278, 0.278, 0.278, 0.278, 0.278, 0.278,
    0.333, 0.333, 0.333, 0.333, 0.333, 0.333, 0.333, 0.333,
    0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191,
    0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
    0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
    0.556, 0.556, 0.278, 0.278, 0.584, 0.584, 0.584, 0.556,
    1.015, 0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778,
    0.722, 0.278, 0.500, 0.667, 0.556, 0.833, 0.722, 0.778,
    0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944,
    0.667, 0.667, 0.611, 0.278, 0.278, 0.278, 0.469, 0.556,
    0.333, 0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556,
    0.556, 0.222, 0.222, 0.500, 0.222, 0.833, 0.556, 0.556,
    0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722,
    0.500, 0.500, 0.500, 0.334, 0.260, 0.334, 0.584, 0.278,
    0.350, 0.556, 0.556, 1.000, 1.000, 0.556, 0.556, 0.167,
    0.333, 0.333, 0.584, 1.000, 0.333, 0.333, 0.333, 0.222,
    0.222, 0.222, 1.000, 0.500, 0.500, 0.556, 1.000, 0.667,
    0.667, 0.611, 0.278, 0.222, 0.944, 0.500, 0.500, 0.278,
    0.278, 0.333, 0.556, 0.556, 0.556, 0.556, 0.260, 0.556,
    0.333, 0.737, 0.370, 0.556, 0.584, 0.278, 0.737, 0.333,
    0.400, 0.584, 0.333, 0.333, 0.333, 0.556, 0.537, 0.278,
    0.333, 0.333, 0.365, 0.556, 0.834, 0.834, 0.834, 0.611,
    0.667, 0.667, 0.667, 0.667, 0.667, 0.667, 1.000, 0.722,
    0.667, 0.667, 0.667, 0.667, 0.278, 0.278, 0.278, 0.278,
    0.722, 0.722, 0.778, 0.778, 0.778, 0.778, 0.778, 0.584,
    0.778, 0.722, 0.722, 0.722, 0.722, 0.667, 0.667, 0.611,
    0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.889, 0.500,
    0.556, 0.556, 0.556, 0.556, 0.278, 0.278, 0.278, 0.278,
    0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.584,
    0.611, 0.556, 0.556, 0.556, 0.556, 0.500, 0.556, 0.500,
];

static HELVETICA_BOLD: [f64; 256] = [
    0.278, 0.278, 0.278, 0.278, 0.278, 0.278, 0.278, 0.278,
    0.278, 0.278, 0.278, 0.278, 0.278, 0.278, 0.278, 0.278,
    0.278, 0.278, 0.278, 0.278, 0.278, 0.278, 0.278, 0.278,
    0.333, 0.333, 0.333, 0.333, 0.333, 0.333, 0.333, 0.333,
    0.278, 0.333, 0.474, 0.556, 0.556, 0.889, 0.722, 0.238,
    0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
    0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
    0.556, 0.556, 0.333, 0.333, 0.584, 0.584, 0.584, 0.611,
    0.975, 0.722, 0.722, 0.722, 0.722, 0.667, 0.611, 0.778,
    0.722, 0.278, 0.556, 0.722, 0.611, 0.833, 0.722, 0.778,
    0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944,
    0.667, 0.667, 0.611, 0.333, 0.278, 0.333, 0.584, 0.556,
    0.333, 0.556, 0.611, 0.556, 0.611, 0.556, 0.333, 0.611,
    0.611, 0.278, 0.278, 0.556, 0.278, 0.889, 0.611, 0.611,
    0.611, 0.611, 0.389, 0.556, 0.333, 0.611, 0.556, 0.778,
    0.556, 0.556, 0.500, 0.389, 0.280, 0.389, 0.584, 0.278,
    0.350, 0.556, 0.556, 1.000, 1.000, 0.556, 0.556, 0.167,
    0.333, 0.333, 0.584, 1.000, 0.500, 0.500, 0.500, 0.278,
    0.278, 0.278, 1.000, 0.611, 0.611, 0.611, 1.000, 0.667,
    0.667, 0.611, 0.278, 0.278, 0.944, 0.556, 0.500, 0.278,
    0.278, 0.333, 0.556, 0.556, 0.556, 0.556, 0.280, 0.556,
    0.333, 0.737, 0.370, 0.556, 0.584, 0.278, 0.737, 0.333,
    0.400, 0.584, 0.333, 0.333, 0.333, 0.611, 0.556, 0.278,
    0.333, 0.333, 0.365, 0.556, 0.834, 0.834, 0.834, 0.611,
    0.722, 0.722, 0.722, 0.722, 0.722, 0.722, 1.000, 0.722,
    0.667, 0.667, 0.667, 0.667, 0.278, 0.278, 0.278, 0.278,
    0.722, 0.722, 0.778, 0.778, 0.778, 0.778, 0.778, 0.584,
    0.778, 0.722, 0.722, 0.722, 0.722, 0.667, 0.667, 0.611,
    0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.889, 0.556,
    0.556, 0.556, 0.556, 0.556, 0.278, 0.278, 0.278, 0.278,
    0.611, 0.611, 0.611, 0.611, 0.611, 0.611, 0.611, 0.584,
    0.611, 0.611, 0.611, 0.611, 0.611, 0.556, 0.611, 0.556,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_simple() {
        let metrics = FontMetrics::builtin();
        let font = FontSpec::helvetica(10.0);
        // 'A' = 0.667, 'B' = 0.667
        let width = metrics.measure_width("AB", &font).unwrap();
        assert!((width - 13.34).abs() < 1e-9);
    }

    #[test]
    fn test_bold_is_wider() {
        let metrics = FontMetrics::builtin();
        let regular = metrics
            .measure_width("report", &FontSpec::helvetica(9.0))
            .unwrap();
        let bold = metrics
            .measure_width("report", &FontSpec::helvetica_bold(9.0))
            .unwrap();
        assert!(bold > regular);
    }

    #[test]
    fn test_spacing() {
        let metrics = FontMetrics::builtin();
        let font = FontSpec::helvetica(1.0)
            .with_char_spacing(0.1)
            .with_word_spacing(0.5);
        // 'a' 0.556 + ' ' 0.278 + 'a' 0.556, three chars of spacing, one space
        let width = metrics.measure_width("a a", &font).unwrap();
        assert!((width - (0.556 + 0.278 + 0.556 + 0.3 + 0.5)).abs() < 1e-9);
    }

    #[test]
    fn test_word_spacing_only_for_ascii_space() {
        let metrics = FontMetrics::builtin();
        let font = FontSpec::helvetica(1.0).with_word_spacing(1.0);
        let nbsp = metrics.measure_width("\u{a0}", &font).unwrap();
        assert!((nbsp - 0.278).abs() < 1e-9);
    }

    #[test]
    fn test_unsupported_glyph() {
        let metrics = FontMetrics::builtin();
        let font = FontSpec::helvetica(9.0);
        let err = metrics.measure_width("price: €5", &font).unwrap_err();
        assert!(matches!(err, Error::UnsupportedGlyph { ch: '€', .. }));

        let lossy = metrics.measure_width_lossy("€", &font);
        assert!((lossy - 0.278 * 9.0).abs() < 1e-9);
        assert!(metrics
            .measure("€", &font, GlyphPolicy::Substitute)
            .is_ok());
        assert!(metrics.measure("€", &font, GlyphPolicy::Strict).is_err());
    }

    #[test]
    fn test_concurrent_measurement() {
        use rayon::prelude::*;

        let metrics = FontMetrics::builtin();
        let font = FontSpec::helvetica(9.0);
        let words: Vec<String> = (0..200).map(|i| format!("row {}", i)).collect();
        let parallel: Vec<f64> = words
            .par_iter()
            .map(|w| metrics.measure_width_lossy(w, &font))
            .collect();
        let sequential: Vec<f64> = words
            .iter()
            .map(|w| metrics.measure_width_lossy(w, &font))
            .collect();
        assert_eq!(parallel, sequential);
    }
}
