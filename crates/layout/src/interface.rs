use crate::fonts::FontMetrics;
use crate::tree::RendererId;
use crate::LayoutError;
use quire_types::Rect;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;

/// A page number (1-based) plus a rectangle in page space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutArea {
    pub page_number: usize,
    pub bbox: Rect,
}

impl LayoutArea {
    pub fn new(page_number: usize, bbox: Rect) -> Self {
        Self { page_number, bbox }
    }
}

impl fmt::Display for LayoutArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "page {} [{:.2}, {:.2}, {:.2} x {:.2}]",
            self.page_number, self.bbox.x, self.bbox.y, self.bbox.width, self.bbox.height
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutStatus {
    Full,
    Partial,
    Nothing,
}

/// Outcome of one measure-and-place attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutResult {
    pub status: LayoutStatus,
    pub occupied_area: Option<LayoutArea>,
    /// Content that fit. Set on `Partial`, and on a forced `Full`.
    pub split_renderer: Option<RendererId>,
    /// Content left for the next area. Set on `Partial` and `Nothing`.
    pub overflow_renderer: Option<RendererId>,
    /// The innermost renderer that blocked progress on `Nothing`.
    pub cause_of_nothing: Option<RendererId>,
    /// The line ended at an explicit newline rather than by wrapping.
    pub split_forced_by_newline: bool,
}

impl LayoutResult {
    pub fn full(area: LayoutArea) -> Self {
        Self {
            status: LayoutStatus::Full,
            occupied_area: Some(area),
            split_renderer: None,
            overflow_renderer: None,
            cause_of_nothing: None,
            split_forced_by_newline: false,
        }
    }

    pub fn partial(area: LayoutArea, split: RendererId, overflow: RendererId) -> Self {
        Self {
            status: LayoutStatus::Partial,
            occupied_area: Some(area),
            split_renderer: Some(split),
            overflow_renderer: Some(overflow),
            cause_of_nothing: None,
            split_forced_by_newline: false,
        }
    }

    pub fn nothing(overflow: RendererId, cause: RendererId) -> Self {
        Self {
            status: LayoutStatus::Nothing,
            occupied_area: None,
            split_renderer: None,
            overflow_renderer: Some(overflow),
            cause_of_nothing: Some(cause),
            split_forced_by_newline: false,
        }
    }

    pub fn forced_by_newline(mut self) -> Self {
        self.split_forced_by_newline = true;
        self
    }

    pub fn is_nothing(&self) -> bool {
        self.status == LayoutStatus::Nothing
    }

    /// The occupied area, which every non-`Nothing` result carries.
    pub fn area(&self) -> Result<LayoutArea, LayoutError> {
        self.occupied_area
            .ok_or_else(|| LayoutError::Generic("Layout result has no occupied area".into()))
    }
}

/// Per-call inputs threaded through recursive layout.
///
/// `area_full` is shared by every call of one top-level placement. A renderer
/// that forces its content past the bottom of the area sets it so the caller
/// starts the next element on a fresh page.
#[derive(Clone, Copy)]
pub struct LayoutContext<'a> {
    pub area: LayoutArea,
    pub metrics: &'a dyn FontMetrics,
    pub area_full: &'a Cell<bool>,
    /// The renderer being laid out begins a line, so an unbreakable word may
    /// be split between characters instead of failing.
    pub starts_line: bool,
}

impl<'a> LayoutContext<'a> {
    pub fn new(area: LayoutArea, metrics: &'a dyn FontMetrics, area_full: &'a Cell<bool>) -> Self {
        Self {
            area,
            metrics,
            area_full,
            starts_line: true,
        }
    }

    pub fn with_area(&self, area: LayoutArea) -> Self {
        Self { area, ..*self }
    }

    pub fn with_bbox(&self, bbox: Rect) -> Self {
        self.with_area(LayoutArea::new(self.area.page_number, bbox))
    }

    pub fn mark_area_full(&self) {
        self.area_full.set(true);
    }
}

impl fmt::Debug for LayoutContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutContext")
            .field("area", &self.area)
            .field("area_full", &self.area_full.get())
            .field("starts_line", &self.starts_line)
            .finish()
    }
}

// --- Renderer state (type-safe, one variant per renderer kind) ---

#[derive(Debug, Clone, Default)]
pub struct ParagraphState {
    /// Lines built by the last layout. They are not part of the normal-flow
    /// children, which keep the paragraph's text and image renderers.
    pub lines: Vec<RendererId>,
}

#[derive(Debug, Clone, Default)]
pub struct LineState {
    pub max_ascent: f32,
    pub max_descent: f32,
    pub contains_image: bool,
    /// Children the line was given before layout. The paragraph continues
    /// from these when the line is pushed to another area.
    pub input: Vec<RendererId>,
}

#[derive(Debug, Clone, Default)]
pub struct TextState {
    pub text: String,
    pub ascent: f32,
    pub descent: f32,
    pub word_spacing: f32,
    pub char_spacing: f32,
}

#[derive(Debug, Clone, Default)]
pub struct ListState {
    pub symbols_initialized: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ListItemState {
    pub symbol: Option<RendererId>,
    pub symbol_area_width: f32,
}

#[derive(Debug, Clone)]
pub struct TableState {
    /// Body rows still to be placed by this renderer.
    pub rows: Vec<Vec<crate::element::Element>>,
    /// This fragment starts the table.
    pub first: bool,
    /// No rows will follow this fragment.
    pub last: bool,
    /// Exact top of the continuation when this fragment picks up below a
    /// previously committed fragment on the same page.
    pub resume_at: Option<f32>,
}

impl Default for TableState {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            first: true,
            last: true,
            resume_at: None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum RendererKind {
    Root,
    Block,
    Cell,
    Paragraph(ParagraphState),
    Line(LineState),
    Text(TextState),
    Image,
    List(ListState),
    ListItem(ListItemState),
    Table(TableState),
}

macro_rules! state_accessor {
    ($name:ident, $name_mut:ident, $variant:ident, $ty:ty) => {
        pub fn $name(&self) -> Result<&$ty, LayoutError> {
            match self {
                RendererKind::$variant(s) => Ok(s),
                other => Err(LayoutError::StateMismatch(stringify!($variant), other.variant_name())),
            }
        }

        pub fn $name_mut(&mut self) -> Result<&mut $ty, LayoutError> {
            match self {
                RendererKind::$variant(s) => Ok(s),
                other => Err(LayoutError::StateMismatch(stringify!($variant), other.variant_name())),
            }
        }
    };
}

impl RendererKind {
    state_accessor!(as_paragraph, as_paragraph_mut, Paragraph, ParagraphState);
    state_accessor!(as_line, as_line_mut, Line, LineState);
    state_accessor!(as_text, as_text_mut, Text, TextState);
    state_accessor!(as_list, as_list_mut, List, ListState);
    state_accessor!(as_list_item, as_list_item_mut, ListItem, ListItemState);
    state_accessor!(as_table, as_table_mut, Table, TableState);

    pub fn variant_name(&self) -> &'static str {
        match self {
            RendererKind::Root => "Root",
            RendererKind::Block => "Block",
            RendererKind::Cell => "Cell",
            RendererKind::Paragraph(_) => "Paragraph",
            RendererKind::Line(_) => "Line",
            RendererKind::Text(_) => "Text",
            RendererKind::Image => "Image",
            RendererKind::List(_) => "List",
            RendererKind::ListItem(_) => "ListItem",
            RendererKind::Table(_) => "Table",
        }
    }

    /// State for a new renderer of the same kind. Text keeps its content,
    /// every other kind starts over.
    pub fn fresh(&self) -> RendererKind {
        match self {
            RendererKind::Root => RendererKind::Root,
            RendererKind::Block => RendererKind::Block,
            RendererKind::Cell => RendererKind::Cell,
            RendererKind::Paragraph(_) => RendererKind::Paragraph(ParagraphState::default()),
            RendererKind::Line(_) => RendererKind::Line(LineState::default()),
            RendererKind::Text(s) => RendererKind::Text(TextState {
                text: s.text.clone(),
                ..Default::default()
            }),
            RendererKind::Image => RendererKind::Image,
            RendererKind::List(_) => RendererKind::List(ListState::default()),
            RendererKind::ListItem(_) => RendererKind::ListItem(ListItemState::default()),
            RendererKind::Table(_) => RendererKind::Table(TableState::default()),
        }
    }
}
