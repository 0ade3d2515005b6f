use quire_style::{Property, StyleError};
use thiserror::Error;

pub use self::tree::RendererId;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error(transparent)]
    Style(#[from] StyleError),
    #[error("Property {0:?} holds an incompatible value: {1}")]
    InvalidProperty(Property, #[source] StyleError),
    #[error("Unknown renderer {0}.")]
    UnknownRenderer(RendererId),
    #[error("Renderer {0} has already been flushed.")]
    RendererFlushed(RendererId),
    #[error("Renderer {0} has not been laid out yet.")]
    NotLaidOut(RendererId),
    #[error("Page {0} does not exist.")]
    PageNotFound(usize),
    #[error("State mismatch: Expected state for {0}, got {1}.")]
    StateMismatch(&'static str, &'static str),
    #[error("Generic layout error: {0}")]
    Generic(String),
}

pub mod canvas;
pub mod config;
pub mod document;
pub mod element;
pub mod fonts;
pub mod interface;
pub mod node_kind;
pub mod nodes;
pub mod output;
pub mod painting;
pub mod streaming;
pub mod style;
pub mod tree;

pub use self::canvas::{Canvas, DocumentContext, DrawContext, TagRole};
pub use self::config::LayoutConfig;
pub use self::document::Document;
pub use self::element::{Element, PropertyContainer, Table};
pub use self::fonts::{FontMetrics, MonospaceMetrics};
pub use self::interface::{LayoutArea, LayoutContext, LayoutResult, LayoutStatus};
pub use self::output::{DrawOp, RecordingDocument};
pub use self::streaming::LargeTable;
pub use self::tree::RendererTree;

pub use quire_types::geometry::{Point, Rect};

#[cfg(test)]
mod block_test;
#[cfg(test)]
mod paragraph_test;
#[cfg(test)]
mod property_test;
#[cfg(test)]
mod table_test;
#[cfg(test)]
mod test_utils;
