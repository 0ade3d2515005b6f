use crate::config::LayoutConfig;
use crate::document::Document;
use crate::element::Element;
use crate::fonts::MonospaceMetrics;
use crate::interface::{LayoutArea, LayoutContext, LayoutResult, RendererKind};
use crate::node_kind;
use crate::output::RecordingDocument;
use crate::tree::{RendererId, RendererTree};
use quire_style::{Margins, PageSize};
use quire_types::{Rect, EPS};
use std::cell::Cell;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A renderer tree with a root, laid out with the default monospace
/// metrics: 12pt text is 6pt per character and 12pt per line.
pub struct Fixture {
    pub tree: RendererTree,
    pub root: RendererId,
    pub metrics: MonospaceMetrics,
    area_full: Cell<bool>,
}

impl Fixture {
    pub fn new() -> Self {
        init_logger();
        let mut tree = RendererTree::new();
        let root = tree.insert(RendererKind::Root, None, None);
        Self {
            tree,
            root,
            metrics: MonospaceMetrics::default(),
            area_full: Cell::new(false),
        }
    }

    pub fn build(&mut self, element: &Element) -> RendererId {
        let id = self
            .tree
            .create_renderer_subtree(element, Some(self.root))
            .expect("renderer subtree");
        self.tree.add_child(self.root, id).expect("attach to root");
        id
    }

    pub fn layout(&mut self, id: RendererId, bbox: Rect) -> LayoutResult {
        let ctx = LayoutContext::new(LayoutArea::new(1, bbox), &self.metrics, &self.area_full);
        node_kind::layout(&mut self.tree, id, ctx).expect("layout")
    }

    pub fn area_full(&self) -> bool {
        self.area_full.get()
    }

    pub fn bbox(&self, id: RendererId) -> Rect {
        self.tree.occupied_area(id).expect("laid out").bbox
    }

    /// Text of every text renderer under `id`, in line order.
    pub fn texts(&self, id: RendererId) -> Vec<String> {
        let mut out = Vec::new();
        collect_texts(&self.tree, id, &mut out);
        out
    }
}

fn collect_texts(tree: &RendererTree, id: RendererId, out: &mut Vec<String>) {
    let node = tree.node(id).expect("renderer");
    match &node.kind {
        RendererKind::Text(state) => out.push(state.text.clone()),
        RendererKind::Paragraph(state) => {
            for line in &state.lines {
                collect_texts(tree, *line, out);
            }
        }
        _ => {
            for child in &node.children {
                collect_texts(tree, *child, out);
            }
        }
    }
}

/// A small document: `width` x `height` pages with `margin` on every side.
pub fn document(width: f32, height: f32, margin: f32) -> Document<RecordingDocument> {
    init_logger();
    let config = LayoutConfig {
        page_size: PageSize::Custom { width, height },
        page_margins: Margins::all(margin),
        ..Default::default()
    };
    Document::with_config(RecordingDocument::new(), config)
}

pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < EPS * 10.0,
        "expected {} but got {}",
        expected,
        actual
    );
}
