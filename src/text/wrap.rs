//! Greedy word wrapping against a measured width.

use crate::error::Result;

use super::font::FontSpec;
use super::metrics::FontMetrics;

/// One wrapped line and its measured width in points.
#[derive(Debug, Clone, PartialEq)]
pub struct WrappedLine {
    /// Line text
    pub text: String,
    /// Measured width in points
    pub width: f64,
}

impl WrappedLine {
    /// Horizontal scale needed to fit the line into `max_width` (1.0 if it fits).
    pub fn fit_scale(&self, max_width: f64) -> f64 {
        if self.width > max_width && self.width > 0.0 {
            max_width / self.width
        } else {
            1.0
        }
    }
}

/// Wrap `text` into lines no wider than `max_width`.
///
/// Breaks happen at ASCII spaces and explicit newlines. A single word wider
/// than `max_width` is kept whole on its own line; callers detect it through
/// [`WrappedLine::fit_scale`]. Empty text yields one empty line, so every
/// cell occupies at least one line.
///
/// `text` must already be sanitized for the font; unsupported glyphs are
/// reported as errors.
pub fn wrap_text(
    metrics: &FontMetrics,
    text: &str,
    font: &FontSpec,
    max_width: f64,
) -> Result<Vec<WrappedLine>> {
    let space = metrics.measure_width(" ", font)?;
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_width = 0.0;

        for word in paragraph.split(' ').filter(|w| !w.is_empty()) {
            let word_width = metrics.measure_width(word, font)?;
            if current.is_empty() {
                current.push_str(word);
                current_width = word_width;
            } else if current_width + space + word_width <= max_width {
                current.push(' ');
                current.push_str(word);
                current_width += space + word_width;
            } else {
                lines.push(WrappedLine {
                    text: std::mem::take(&mut current),
                    width: current_width,
                });
                current.push_str(word);
                current_width = word_width;
            }
        }

        lines.push(WrappedLine {
            text: current,
            width: current_width,
        });
    }

    Ok(lines)
}
