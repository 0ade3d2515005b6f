//! Recording collaborator.
//!
//! Every canvas call becomes a [`DrawOp`] stored on its page. Serialising the
//! document yields a byte stream that two layout runs can be compared by.
use crate::canvas::{BorderSegment, Canvas, Destination, DocumentContext, LinkAnnotation, TagRole, TextRun};
use crate::LayoutError;
use quire_style::Border;
use quire_types::{AffineTransform, Color, Rect};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DrawOp {
    SaveState,
    RestoreState,
    SetFillColor { color: Color },
    FillRectangle { rect: Rect },
    BorderSegment { border: Border, segment: BorderSegment },
    ConcatMatrix { matrix: AffineTransform },
    ShowText(TextRun),
    DrawImage { name: String, rect: Rect },
    OpenTag { role: TagRole },
    CloseTag,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedPage {
    pub width: f32,
    pub height: f32,
    pub ops: Vec<DrawOp>,
}

impl RecordedPage {
    fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ops: Vec::new(),
        }
    }

    /// Text shown on this page, in drawing order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::ShowText(run) => Some(run.text.as_str()),
            _ => None,
        })
    }
}

impl Canvas for RecordedPage {
    fn save_state(&mut self) {
        self.ops.push(DrawOp::SaveState);
    }

    fn restore_state(&mut self) {
        self.ops.push(DrawOp::RestoreState);
    }

    fn set_fill_color(&mut self, color: &Color) {
        self.ops.push(DrawOp::SetFillColor { color: color.clone() });
    }

    fn fill_rectangle(&mut self, rect: Rect) {
        self.ops.push(DrawOp::FillRectangle { rect });
    }

    fn draw_border_segment(&mut self, border: &Border, segment: BorderSegment) {
        self.ops.push(DrawOp::BorderSegment {
            border: border.clone(),
            segment,
        });
    }

    fn concat_matrix(&mut self, matrix: AffineTransform) {
        self.ops.push(DrawOp::ConcatMatrix { matrix });
    }

    fn show_text(&mut self, run: TextRun) {
        self.ops.push(DrawOp::ShowText(run));
    }

    fn draw_image(&mut self, name: &str, rect: Rect) {
        self.ops.push(DrawOp::DrawImage {
            name: name.to_string(),
            rect,
        });
    }

    fn open_tag(&mut self, role: TagRole) {
        self.ops.push(DrawOp::OpenTag { role });
    }

    fn close_tag(&mut self) {
        self.ops.push(DrawOp::CloseTag);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordingDocument {
    pub pages: Vec<RecordedPage>,
    pub destinations: Vec<(String, Destination)>,
    pub annotations: Vec<(usize, LinkAnnotation)>,
    pub tagging: bool,
}

impl RecordingDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tagging(tagging: bool) -> Self {
        Self {
            tagging,
            ..Self::default()
        }
    }

    pub fn page(&self, page: usize) -> Result<&RecordedPage, LayoutError> {
        page.checked_sub(1)
            .and_then(|index| self.pages.get(index))
            .ok_or(LayoutError::PageNotFound(page))
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl DocumentContext for RecordingDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn add_page(&mut self, width: f32, height: f32) -> usize {
        self.pages.push(RecordedPage::new(width, height));
        log::debug!("Opened page {} ({} x {})", self.pages.len(), width, height);
        self.pages.len()
    }

    fn canvas(&mut self, page: usize) -> Result<&mut dyn Canvas, LayoutError> {
        let recorded = page
            .checked_sub(1)
            .and_then(|index| self.pages.get_mut(index))
            .ok_or(LayoutError::PageNotFound(page))?;
        Ok(recorded)
    }

    fn add_named_destination(&mut self, name: &str, destination: Destination) -> Result<(), LayoutError> {
        if destination.page == 0 || destination.page > self.pages.len() {
            return Err(LayoutError::PageNotFound(destination.page));
        }
        self.destinations.push((name.to_string(), destination));
        Ok(())
    }

    fn add_link_annotation(&mut self, page: usize, link: LinkAnnotation) -> Result<(), LayoutError> {
        if page == 0 || page > self.pages.len() {
            return Err(LayoutError::PageNotFound(page));
        }
        self.annotations.push((page, link));
        Ok(())
    }

    fn is_tagging_enabled(&self) -> bool {
        self.tagging
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_page_is_an_error() {
        let mut doc = RecordingDocument::new();
        assert!(matches!(doc.canvas(1), Err(LayoutError::PageNotFound(1))));
        let page = doc.add_page(100.0, 100.0);
        assert_eq!(page, 1);
        doc.canvas(1).unwrap().save_state();
        assert_eq!(doc.page(1).unwrap().ops, vec![DrawOp::SaveState]);
        assert!(doc.page(0).is_err());
    }

    #[test]
    fn test_recording_serialises() {
        let mut doc = RecordingDocument::new();
        doc.add_page(10.0, 10.0);
        doc.canvas(1).unwrap().fill_rectangle(Rect::new(0.0, 0.0, 1.0, 1.0));
        let json = doc.to_json().unwrap();
        assert!(json.contains("\"op\":\"fillRectangle\""));
    }
}
