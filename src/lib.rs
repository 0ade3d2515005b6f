//! Quire lays out document content into pages.
//!
//! Elements (paragraphs, lists, tables and generic blocks) are added to a
//! [`Document`], which places them page by page and hands the drawing
//! operations to a [`DocumentContext`]. Large tables can be streamed with
//! [`Document::add_large_table`]: rows are committed as they are flushed and
//! released from memory, with the same output as adding the table at once.
//!
//! ```
//! use quire::{Document, Element, RecordingDocument};
//!
//! let mut document = Document::new(RecordingDocument::new());
//! document.add(Element::paragraph_with_text("Hello world")).unwrap();
//! let output = document.close().unwrap();
//! assert_eq!(output.pages.len(), 1);
//! ```
pub use quire_layout::*;
pub use quire_style::{
    Action, Background, Border, BorderStyle, HorizontalAlignment, Leading, ListNumbering, ListSymbol,
    ListSymbolAlignment, Margins, PageSize, Position, Property, PropertyValue, TextAlignment, UnitValue,
    VerticalAlignment,
};
pub use quire_types::{AffineTransform, Color};

pub use quire_style;
pub use quire_types;
