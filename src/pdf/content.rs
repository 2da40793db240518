//! Content streams and the graphic objects drawn into them.

use crate::error::Result;
use crate::text::{pdf_literal, FontSpec, FontVariant};
use serde::{Deserialize, Serialize};

use super::object::{fmt_num, PdfObject, References};

/// An RGB colour with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Color {
    /// Red
    pub r: f64,
    /// Green
    pub g: f64,
    /// Blue
    pub b: f64,
}

impl Color {
    /// Black
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    /// Dark green used for titles
    pub const GREEN: Color = Color::rgb(0.0, 0.5, 0.0);
    /// Light grey used for header cell backgrounds
    pub const SILVER: Color = Color::rgb(0.75, 0.75, 0.75);
    /// Mid grey used for rules
    pub const GRAY: Color = Color::rgb(0.5, 0.5, 0.5);

    /// Create a colour from components.
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    fn operands(&self) -> String {
        format!("{} {} {}", fmt_num(self.r), fmt_num(self.g), fmt_num(self.b))
    }
}

/// A run of text drawn at a baseline position.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// Font used for the run
    pub font: FontVariant,
    /// Size in points
    pub size: f64,
    /// Left edge of the baseline
    pub x: f64,
    /// Baseline
    pub y: f64,
    /// Text, already sanitized for `font`
    pub text: String,
    /// Fill colour
    pub color: Color,
    /// Character spacing in ems
    pub char_spacing: f64,
    /// Word spacing in ems
    pub word_spacing: f64,
}

impl TextRun {
    /// Create a black run with no extra spacing.
    pub fn new(font: FontVariant, size: f64, x: f64, y: f64, text: impl Into<String>) -> Self {
        Self {
            font,
            size,
            x,
            y,
            text: text.into(),
            color: Color::BLACK,
            char_spacing: 0.0,
            word_spacing: 0.0,
        }
    }

    /// Create a run using the colour and spacing of `font`.
    pub fn styled(font: &FontSpec, x: f64, y: f64, text: impl Into<String>) -> Self {
        Self {
            color: font.color,
            char_spacing: font.char_spacing,
            word_spacing: font.word_spacing,
            ..Self::new(font.variant, font.size, x, y, text)
        }
    }

    fn render(&self) -> String {
        let mut out = String::from("BT\n");
        out.push_str(&format!(
            "/{} {} Tf\n",
            self.font.resource_name(),
            fmt_num(self.size)
        ));
        out.push_str(&format!("{} rg\n", self.color.operands()));
        if self.char_spacing != 0.0 {
            out.push_str(&format!("{} Tc\n", fmt_num(self.char_spacing * self.size)));
        }
        if self.word_spacing != 0.0 {
            out.push_str(&format!("{} Tw\n", fmt_num(self.word_spacing * self.size)));
        }
        out.push_str(&format!("{} {} Td\n", fmt_num(self.x), fmt_num(self.y)));
        out.push_str(&format!("{} Tj\n", pdf_literal(&self.text)));
        out.push_str("ET\n");
        out
    }
}

/// Drawing primitives placed in a content stream.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphicObject {
    /// Text run
    Text(TextRun),

    /// Stroked straight line
    Line {
        /// Start point
        from: (f64, f64),
        /// End point
        to: (f64, f64),
        /// Stroke width
        width: f64,
        /// Stroke colour
        color: Color,
    },

    /// Filled rectangle
    Rect {
        /// Lower-left x
        x: f64,
        /// Lower-left y
        y: f64,
        /// Width
        width: f64,
        /// Height
        height: f64,
        /// Fill colour
        fill: Color,
    },

    /// Children drawn under a uniform scale with origin at `(x, y)`
    Scaled {
        /// Scale factor
        scale: f64,
        /// Origin x
        x: f64,
        /// Origin y
        y: f64,
        /// Scaled children, positioned relative to the origin
        children: Vec<GraphicObject>,
    },
}

impl GraphicObject {
    /// Render the drawing operators; always ends with a newline.
    pub fn render(&self) -> String {
        match self {
            GraphicObject::Text(run) => run.render(),
            GraphicObject::Line {
                from,
                to,
                width,
                color,
            } => format!(
                "q\n{} w\n{} RG\n{} {} m\n{} {} l\nS\nQ\n",
                fmt_num(*width),
                color.operands(),
                fmt_num(from.0),
                fmt_num(from.1),
                fmt_num(to.0),
                fmt_num(to.1)
            ),
            GraphicObject::Rect {
                x,
                y,
                width,
                height,
                fill,
            } => format!(
                "q\n{} rg\n{} {} {} {} re\nf\nQ\n",
                fill.operands(),
                fmt_num(*x),
                fmt_num(*y),
                fmt_num(*width),
                fmt_num(*height)
            ),
            GraphicObject::Scaled {
                scale,
                x,
                y,
                children,
            } => {
                let s = fmt_num(*scale);
                let mut out = format!("q\n{} 0 0 {} {} {} cm\n", s, s, fmt_num(*x), fmt_num(*y));
                for child in children {
                    out.push_str(&child.render());
                }
                out.push_str("Q\n");
                out
            }
        }
    }
}

impl From<TextRun> for GraphicObject {
    fn from(run: TextRun) -> Self {
        GraphicObject::Text(run)
    }
}

/// Ordered drawing instructions attached to one page.
#[derive(Debug, Clone, Default)]
pub struct ContentStream {
    children: Vec<GraphicObject>,
}

impl ContentStream {
    /// Create an empty content stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a graphic object.
    pub fn add(&mut self, object: impl Into<GraphicObject>) {
        self.children.push(object.into());
    }

    /// Append several graphic objects in order.
    pub fn extend(&mut self, objects: impl IntoIterator<Item = GraphicObject>) {
        self.children.extend(objects);
    }

    /// Graphic objects in drawing order.
    pub fn children(&self) -> &[GraphicObject] {
        &self.children
    }

    /// Concatenated operators of all children.
    pub fn body(&self) -> String {
        self.children.iter().map(GraphicObject::render).collect()
    }
}

impl PdfObject for ContentStream {
    fn kind(&self) -> &'static str {
        "ContentStream"
    }

    fn render_body(&self, _refs: &References<'_>) -> Result<String> {
        let body = self.body();
        // Length counts bytes between `stream\n` and the EOL before `endstream`.
        Ok(format!(
            "<<\n  /Length {}\n>>\nstream\n{}\nendstream\n",
            body.len(),
            body
        ))
    }
}
