//! Text metrics: built-in fonts, glyph widths, encoding and word wrap.

mod encode;
mod font;
mod metrics;
mod wrap;

pub use encode::{normalize, pdf_literal, sanitize};
pub use font::{FontSpec, FontVariant, LEADING};
pub use metrics::{FontMetrics, GlyphPolicy, SUBSTITUTE_GLYPH};
pub use wrap::{wrap_text, WrappedLine};
