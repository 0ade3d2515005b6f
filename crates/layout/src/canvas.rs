//! Collaborator interfaces for drawing.
//!
//! The layout engine never writes a file format itself. It talks to a
//! [`DocumentContext`] that owns pages, and to the [`Canvas`] of each page.
use crate::LayoutError;
use quire_style::{Action, Border};
use quire_types::{AffineTransform, Color, Rect};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum TagRole {
    Div,
    P,
    L,
    LI,
    Lbl,
    LBody,
    TD,
    Figure,
    Artifact,
}

/// One side of a border, from `(x1, y1)` to `(x2, y2)`, plus the widths of
/// the borders meeting it at either end so corners can be mitred.
///
/// The endpoints lie on the inner edge of the border box. A canvas paints
/// the border outward from that line, away from the content.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BorderSegment {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub width_before: f32,
    pub width_after: f32,
}

/// A run of text positioned on its baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub font: String,
    pub size: f32,
    pub color: Color,
    pub word_spacing: f32,
    pub char_spacing: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub page: usize,
    pub x: f32,
    pub y: f32,
    pub zoom: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkAnnotation {
    pub rect: Rect,
    pub action: Action,
    /// Horizontal corner radius, vertical corner radius and border width.
    pub border: [f32; 3],
}

pub trait Canvas {
    fn save_state(&mut self);
    fn restore_state(&mut self);
    fn set_fill_color(&mut self, color: &Color);
    fn fill_rectangle(&mut self, rect: Rect);
    fn draw_border_segment(&mut self, border: &Border, segment: BorderSegment);
    fn concat_matrix(&mut self, transform: AffineTransform);
    fn show_text(&mut self, run: TextRun);
    fn draw_image(&mut self, name: &str, rect: Rect);
    fn open_tag(&mut self, role: TagRole);
    fn close_tag(&mut self);
}

pub trait DocumentContext {
    fn page_count(&self) -> usize;
    /// Appends a page and returns its 1-based number.
    fn add_page(&mut self, width: f32, height: f32) -> usize;
    fn canvas(&mut self, page: usize) -> Result<&mut dyn Canvas, LayoutError>;
    fn add_named_destination(&mut self, name: &str, destination: Destination) -> Result<(), LayoutError>;
    fn add_link_annotation(&mut self, page: usize, link: LinkAnnotation) -> Result<(), LayoutError>;
    fn is_tagging_enabled(&self) -> bool;
}

/// State threaded through one draw pass.
pub struct DrawContext<'a> {
    document: &'a mut dyn DocumentContext,
    tagging: bool,
}

impl<'a> DrawContext<'a> {
    pub fn new(document: &'a mut dyn DocumentContext) -> Self {
        let tagging = document.is_tagging_enabled();
        Self { document, tagging }
    }

    /// Overrides the collaborator's tagging switch.
    pub fn with_tagging(mut self, tagging: bool) -> Self {
        self.tagging = tagging;
        self
    }

    pub fn is_tagging_enabled(&self) -> bool {
        self.tagging
    }

    pub fn document(&mut self) -> &mut dyn DocumentContext {
        &mut *self.document
    }

    pub fn canvas(&mut self, page: usize) -> Result<&mut dyn Canvas, LayoutError> {
        self.document.canvas(page)
    }

    /// Opens a structure tag when tagging is enabled. Returns whether a tag
    /// was opened so the caller can close it symmetrically.
    pub fn open_tag(&mut self, page: usize, role: TagRole) -> Result<bool, LayoutError> {
        if !self.tagging {
            return Ok(false);
        }
        self.canvas(page)?.open_tag(role);
        Ok(true)
    }

    pub fn close_tag(&mut self, page: usize, opened: bool) -> Result<(), LayoutError> {
        if opened {
            self.canvas(page)?.close_tag();
        }
        Ok(())
    }
}
