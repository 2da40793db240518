//! Text normalisation and PDF literal string encoding.
//!
//! Content is written with single-byte codes. Anything outside printable
//! ASCII is written as a `\ddd` octal escape, so rendered objects are pure
//! ASCII and their byte length equals their `str` length.

use crate::error::{Error, Result};
use std::fmt::Write;
use unicode_normalization::UnicodeNormalization;

use super::font::FontVariant;
use super::metrics::{FontMetrics, GlyphPolicy, SUBSTITUTE_GLYPH};

/// Compose decomposed sequences (e.g. `e` + U+0301) so they map to a single code.
pub fn normalize(text: &str) -> String {
    text.nfc().collect()
}

/// Normalise `text` and make every character measurable in `variant`.
///
/// Under [`GlyphPolicy::Substitute`] each unsupported character becomes
/// [`SUBSTITUTE_GLYPH`]; under [`GlyphPolicy::Strict`] the first one is an
/// error.
pub fn sanitize(
    text: &str,
    variant: FontVariant,
    metrics: &FontMetrics,
    policy: GlyphPolicy,
) -> Result<String> {
    let mut out = String::with_capacity(text.len());
    for ch in text.nfc() {
        if metrics.glyph_width(variant, ch).is_some() {
            out.push(ch);
            continue;
        }
        match policy {
            GlyphPolicy::Strict => {
                return Err(Error::UnsupportedGlyph {
                    ch,
                    font: variant.base_font(),
                })
            }
            GlyphPolicy::Substitute => {
                log::warn!(
                    "Substituting {:?} with {:?}: not available in {}",
                    ch,
                    SUBSTITUTE_GLYPH,
                    variant.base_font()
                );
                out.push(SUBSTITUTE_GLYPH);
            }
        }
    }
    Ok(out)
}

/// Encode `text` as a PDF literal string, parentheses included.
pub fn pdf_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('(');
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            ' '..='~' => out.push(ch),
            _ if (ch as u32) < 256 => {
                let _ = write!(out, "\\{:03o}", ch as u32);
            }
            _ => out.push(SUBSTITUTE_GLYPH),
        }
    }
    out.push(')');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_escapes() {
        assert_eq!(pdf_literal("Hello"), "(Hello)");
        assert_eq!(pdf_literal("a(b)c\\"), "(a\\(b\\)c\\\\)");
        assert_eq!(pdf_literal("café"), "(caf\\351)");
        assert_eq!(pdf_literal("tab\there"), "(tab\\011here)");
        assert_eq!(pdf_literal("€"), "(?)");
    }

    #[test]
    fn test_literal_beyond_latin1_is_substituted() {
        assert_eq!(pdf_literal("\u{2603}"), "(?)");
        assert_eq!(pdf_literal("a\u{0100}b\u{ff}"), "(a?b\\377)");
    }

    #[test]
    fn test_literal_is_ascii() {
        let encoded = pdf_literal("Zürich – ½ ©");
        assert!(encoded.is_ascii());
    }

    #[test]
    fn test_normalize_composes() {
        let decomposed = "e\u{301}";
        assert_eq!(normalize(decomposed), "é");
    }

    #[test]
    fn test_sanitize() {
        let metrics = FontMetrics::builtin();
        let text = sanitize(
            "e\u{301} 5€",
            FontVariant::Helvetica,
            &metrics,
            GlyphPolicy::Substitute,
        )
        .unwrap();
        assert_eq!(text, "é 5?");

        let err = sanitize("5€", FontVariant::Helvetica, &metrics, GlyphPolicy::Strict);
        assert!(matches!(err, Err(Error::UnsupportedGlyph { ch: '€', .. })));
    }
}
