//! List items: a block body plus a symbol aligned to its first baseline.
use crate::canvas::{DrawContext, TagRole};
use crate::interface::{LayoutContext, LayoutResult};
use crate::node_kind;
use crate::nodes::block;
use crate::painting;
use crate::tree::{RendererId, RendererTree};
use crate::LayoutError;
use quire_style::{ListSymbolAlignment, Property};

/// Without an explicit height the item is at least as tall as its symbol.
pub fn layout(tree: &mut RendererTree, id: RendererId, ctx: LayoutContext) -> Result<LayoutResult, LayoutError> {
    let symbol = tree.node(id)?.kind.as_list_item()?.symbol;
    if let Some(symbol) = symbol {
        if !tree.has_property(id, Property::Height)? {
            let height = tree.occupied_area(symbol)?.bbox.height;
            tree.set_property(id, Property::Height, height)?;
        }
    }
    block::layout(tree, id, ctx)
}

fn symbol_alignment(tree: &RendererTree, id: RendererId) -> Result<ListSymbolAlignment, LayoutError> {
    let value = tree
        .property(id, Property::ListSymbolAlignment)?
        .map(|v| v.as_list_symbol_alignment())
        .transpose()
        .map_err(|e| LayoutError::InvalidProperty(Property::ListSymbolAlignment, e))?;
    Ok(value.unwrap_or_default())
}

pub fn draw(tree: &mut RendererTree, id: RendererId, dc: &mut DrawContext) -> Result<(), LayoutError> {
    let area = tree.occupied_area(id)?;
    let item_tag = dc.open_tag(area.page_number, TagRole::LI)?;
    painting::draw_block(tree, id, dc, Some(TagRole::LBody))?;

    let (symbol, symbol_area_width) = {
        let state = tree.node(id)?.kind.as_list_item()?;
        (state.symbol, state.symbol_area_width)
    };
    if let Some(symbol) = symbol {
        let symbol_area = tree.occupied_area(symbol)?.bbox;
        let dy = match tree.first_y_line(id)? {
            Some(y_line) => {
                let baseline = tree.first_y_line(symbol)?.unwrap_or(symbol_area.y);
                y_line - baseline
            }
            None => area.bbox.top() - symbol_area.top(),
        };
        let mut dx = area.bbox.x - symbol_area.x;
        if symbol_alignment(tree, id)? == ListSymbolAlignment::Right {
            dx += symbol_area_width - symbol_area.width;
        }
        tree.move_renderer(symbol, dx, dy)?;
        if let Some(symbol_occupied) = tree.node_mut(symbol)?.occupied_area.as_mut() {
            symbol_occupied.page_number = area.page_number;
        }
        let label_tag = dc.open_tag(area.page_number, TagRole::Lbl)?;
        node_kind::draw(tree, symbol, dc)?;
        dc.close_tag(area.page_number, label_tag)?;
    }
    dc.close_tag(area.page_number, item_tag)
}
