use quire_types::Color;
use serde::{Deserialize, Serialize};

/// Fill painted behind a renderer's border box, optionally bleeding past it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Background {
    pub color: Color,
    #[serde(default)]
    pub extra_left: f32,
    #[serde(default)]
    pub extra_right: f32,
    #[serde(default)]
    pub extra_top: f32,
    #[serde(default)]
    pub extra_bottom: f32,
}

impl Background {
    pub fn new(color: Color) -> Self {
        Self {
            color,
            ..Default::default()
        }
    }

    pub fn with_extra(color: Color, horizontal: f32, vertical: f32) -> Self {
        Self {
            color,
            extra_left: horizontal,
            extra_right: horizontal,
            extra_top: vertical,
            extra_bottom: vertical,
        }
    }
}
