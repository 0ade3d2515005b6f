use crate::canvas::{DrawContext, TagRole};
use crate::interface::{LayoutContext, LayoutResult, RendererKind};
use crate::nodes::{block, image, list, list_item, paragraph, table, text};
use crate::painting;
use crate::tree::{RendererId, RendererTree};
use crate::LayoutError;

/// The specific type of a renderer, without its layout state.
///
/// Used for dispatch and for cheap comparisons such as "is my parent a
/// table cell".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    Block,
    Cell,
    Paragraph,
    Line,
    Text,
    Image,
    List,
    ListItem,
    Table,
}

impl NodeKind {
    pub fn of(kind: &RendererKind) -> Self {
        match kind {
            RendererKind::Root => NodeKind::Root,
            RendererKind::Block => NodeKind::Block,
            RendererKind::Cell => NodeKind::Cell,
            RendererKind::Paragraph(_) => NodeKind::Paragraph,
            RendererKind::Line(_) => NodeKind::Line,
            RendererKind::Text(_) => NodeKind::Text,
            RendererKind::Image => NodeKind::Image,
            RendererKind::List(_) => NodeKind::List,
            RendererKind::ListItem(_) => NodeKind::ListItem,
            RendererKind::Table(_) => NodeKind::Table,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Root => "Root",
            NodeKind::Block => "Block",
            NodeKind::Cell => "Cell",
            NodeKind::Paragraph => "Paragraph",
            NodeKind::Line => "Line",
            NodeKind::Text => "Text",
            NodeKind::Image => "Image",
            NodeKind::List => "List",
            NodeKind::ListItem => "ListItem",
            NodeKind::Table => "Table",
        }
    }

    /// Structure role opened around the renderer when tagging is enabled.
    pub fn tag_role(&self) -> Option<TagRole> {
        match self {
            NodeKind::Block => Some(TagRole::Div),
            NodeKind::Cell => Some(TagRole::TD),
            NodeKind::Paragraph => Some(TagRole::P),
            NodeKind::List => Some(TagRole::L),
            NodeKind::ListItem => Some(TagRole::LBody),
            NodeKind::Image => Some(TagRole::Figure),
            NodeKind::Root | NodeKind::Line | NodeKind::Text | NodeKind::Table => None,
        }
    }
}

/// Lays out one renderer into `ctx.area`.
pub fn layout(
    tree: &mut RendererTree,
    id: RendererId,
    ctx: LayoutContext,
) -> Result<LayoutResult, LayoutError> {
    let kind = tree.kind(id)?;
    log::trace!("Layout {} {} in {}", kind.as_str(), id, ctx.area);
    match kind {
        NodeKind::Root => Err(LayoutError::Generic(
            "The root renderer has no layout of its own".into(),
        )),
        NodeKind::Block | NodeKind::Cell => block::layout(tree, id, ctx),
        NodeKind::Paragraph => paragraph::layout(tree, id, ctx),
        NodeKind::Line => paragraph::line::layout(tree, id, ctx),
        NodeKind::Text => text::layout(tree, id, ctx),
        NodeKind::Image => image::layout(tree, id, ctx),
        NodeKind::List => list::layout(tree, id, ctx),
        NodeKind::ListItem => list_item::layout(tree, id, ctx),
        NodeKind::Table => table::layout(tree, id, ctx),
    }
}

/// Draws a laid-out renderer and marks it flushed.
pub fn draw(tree: &mut RendererTree, id: RendererId, dc: &mut DrawContext) -> Result<(), LayoutError> {
    if tree.is_flushed(id)? {
        log::warn!("Renderer {} has already been drawn. Skipping.", id);
        return Ok(());
    }
    match tree.kind(id)? {
        NodeKind::Root => {
            for child in tree.children(id)? {
                draw(tree, child, dc)?;
            }
            tree.node_mut(id)?.flushed = true;
            Ok(())
        }
        NodeKind::Line => paragraph::line::draw(tree, id, dc),
        NodeKind::Text => text::draw(tree, id, dc),
        NodeKind::Image => image::draw(tree, id, dc),
        NodeKind::ListItem => list_item::draw(tree, id, dc),
        NodeKind::Table => table::draw(tree, id, dc),
        kind @ (NodeKind::Block | NodeKind::Cell | NodeKind::Paragraph | NodeKind::List) => {
            painting::draw_block(tree, id, dc, kind.tag_role())
        }
    }
}
