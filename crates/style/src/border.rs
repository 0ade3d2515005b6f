use quire_types::Color;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BorderStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    Double,
}

/// One border side. Drawing is delegated to the canvas, which receives the
/// segment endpoints and the widths of the neighbouring sides.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Border {
    pub style: BorderStyle,
    pub width: f32,
    pub color: Color,
}

impl Border {
    pub fn solid(width: f32) -> Self {
        Self::new(BorderStyle::Solid, width, Color::black())
    }

    pub fn new(style: BorderStyle, width: f32, color: Color) -> Self {
        Self {
            style,
            width,
            color,
        }
    }
}
