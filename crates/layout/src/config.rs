use quire_style::{Margins, PageSize};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    /// Format of every page the document opens.
    ///
    /// Defaults to A4 portrait.
    pub page_size: PageSize,
    /// Space between the page edge and the flow area.
    ///
    /// Defaults to `36pt` on every side.
    pub page_margins: Margins,
    /// Wraps drawn content in structure tags (paragraphs, list items, cells)
    /// and marks backgrounds and borders as artifacts.
    pub tagging: bool,
    /// Draws and releases every top-level element as soon as it is placed.
    /// When disabled, placed renderers stay in memory until `close`.
    pub immediate_flush: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            page_margins: Margins::all(36.0),
            tagging: false,
            immediate_flush: true,
        }
    }
}
