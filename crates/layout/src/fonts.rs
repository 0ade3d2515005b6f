//! Font metric lookup.
//!
//! Glyph shaping lives outside the layout engine. Renderers only need three
//! numbers per run of text, which the [`FontMetrics`] collaborator supplies.

/// Measures text for a given font name and size.
///
/// `descent` is negative (below the baseline), matching the usual
/// font-program convention.
pub trait FontMetrics {
    fn width(&self, font: &str, size: f32, text: &str) -> f32;
    fn ascent(&self, font: &str, size: f32) -> f32;
    fn descent(&self, font: &str, size: f32) -> f32;
}

/// Deterministic metrics where every character has the same advance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    pub advance: f32,
    pub ascent: f32,
    pub descent: f32,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self {
            advance: 0.5,
            ascent: 0.8,
            descent: -0.2,
        }
    }
}

impl MonospaceMetrics {
    pub fn new(advance: f32, ascent: f32, descent: f32) -> Self {
        Self {
            advance,
            ascent,
            descent,
        }
    }
}

impl FontMetrics for MonospaceMetrics {
    fn width(&self, _font: &str, size: f32, text: &str) -> f32 {
        text.chars().count() as f32 * size * self.advance
    }

    fn ascent(&self, _font: &str, size: f32) -> f32 {
        size * self.ascent
    }

    fn descent(&self, _font: &str, size: f32) -> f32 {
        size * self.descent
    }
}
