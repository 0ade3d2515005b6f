//! Lists: creates the item symbols, then lays the items out as a block.
use crate::interface::{LayoutContext, LayoutResult, LayoutStatus, RendererKind, TextState};
use crate::node_kind::{self, NodeKind};
use crate::nodes::{block, list_utils};
use crate::tree::{RendererId, RendererTree};
use crate::LayoutError;
use quire_style::{ListSymbol, Property};

fn list_symbol(tree: &RendererTree, id: RendererId) -> Result<ListSymbol, LayoutError> {
    let value = tree
        .property(id, Property::ListSymbol)?
        .map(|v| v.as_list_symbol())
        .transpose()
        .map_err(|e| LayoutError::InvalidProperty(Property::ListSymbol, e))?;
    Ok(value.unwrap_or_default())
}

/// Lays out one symbol per item and widens every item's left margin by the
/// widest symbol plus `ListSymbolIndent`. Runs once per list; split and
/// overflow halves inherit the result.
fn init_symbols(tree: &mut RendererTree, id: RendererId, ctx: &LayoutContext) -> Result<Option<LayoutResult>, LayoutError> {
    let symbol = list_symbol(tree, id)?;
    let start = tree.int_or(id, Property::ListStart, 1)?.max(0) as usize;
    let items: Vec<RendererId> = tree
        .children(id)?
        .into_iter()
        .filter(|c| matches!(tree.kind(*c), Ok(NodeKind::ListItem)))
        .collect();

    let mut symbols = Vec::with_capacity(items.len());
    let mut max_width = 0.0f32;
    for (index, item) in items.iter().enumerate() {
        let text = list_utils::symbol_text(&symbol, start + index);
        let renderer = tree.insert(
            RendererKind::Text(TextState {
                text,
                ..Default::default()
            }),
            None,
            Some(*item),
        );
        let result = node_kind::layout(tree, renderer, *ctx)?;
        if result.status != LayoutStatus::Full {
            return Ok(Some(LayoutResult::nothing(id, renderer)));
        }
        max_width = max_width.max(result.area()?.bbox.width);
        symbols.push(renderer);
    }

    let indent = tree.float_or(id, Property::ListSymbolIndent, 0.0)?;
    for (item, symbol) in items.into_iter().zip(symbols) {
        tree.node_mut(item)?.properties.remove(Property::MarginLeft);
        let margin = tree.float_or(item, Property::MarginLeft, 0.0)?;
        tree.set_property(item, Property::MarginLeft, margin + max_width + indent)?;
        let state = tree.node_mut(item)?.kind.as_list_item_mut()?;
        state.symbol = Some(symbol);
        state.symbol_area_width = max_width;
    }
    tree.node_mut(id)?.kind.as_list_mut()?.symbols_initialized = true;
    Ok(None)
}

pub fn layout(tree: &mut RendererTree, id: RendererId, ctx: LayoutContext) -> Result<LayoutResult, LayoutError> {
    if !tree.node(id)?.kind.as_list()?.symbols_initialized {
        let symbol_ctx = LayoutContext {
            starts_line: true,
            ..ctx
        };
        if let Some(nothing) = init_symbols(tree, id, &symbol_ctx)? {
            return Ok(nothing);
        }
    }
    block::layout(tree, id, ctx)
}
