//! Tables laid out as a sequence of fragments.
//!
//! A table renderer holds the body rows it still has to place plus the
//! position of the fragment inside the whole table. The streaming API commits
//! one fragment per flush; a table added in one piece is a single fragment
//! that is both first and last. Both paths run the same row placement, so
//! splitting the work never changes where a row lands.
pub mod pagination;

use self::pagination::{ColumnLayout, RowLayout};
use crate::canvas::DrawContext;
use crate::element::{Element, TableModel};
use crate::interface::{LayoutArea, LayoutContext, LayoutResult, TableState};
use crate::node_kind;
use crate::style;
use crate::tree::{RendererId, RendererTree};
use crate::LayoutError;
use quire_style::Property;
use quire_types::{Rect, EPS};

fn table_model(tree: &RendererTree, id: RendererId) -> Result<TableModel, LayoutError> {
    tree.model(id)?
        .and_then(|element| element.table_model())
        .ok_or(LayoutError::StateMismatch("Table", "element without table model"))
}

/// A renderer for the rows left after a page break. It never starts the
/// table and never continues directly below an earlier fragment.
fn continuation(
    tree: &mut RendererTree,
    id: RendererId,
    rows: Vec<Vec<Element>>,
    last: bool,
) -> Result<RendererId, LayoutError> {
    let next = tree.next_renderer(id)?;
    *tree.node_mut(next)?.kind.as_table_mut()? = TableState {
        rows,
        first: false,
        last,
        resume_at: None,
    };
    Ok(next)
}

pub fn layout(tree: &mut RendererTree, id: RendererId, ctx: LayoutContext) -> Result<LayoutResult, LayoutError> {
    let page = ctx.area.page_number;
    let bbox = ctx.area.bbox;
    let model = table_model(tree, id)?;
    let state = tree.node(id)?.kind.as_table()?.clone();
    let margins = style::margins(tree, id)?;
    let continuing = state.resume_at.is_some();
    let forced = tree.bool_or(id, Property::ForcedPlacement, false)?;
    let keep_together = tree.is_keep_together(id)?;

    let mut width = bbox.width - margins.left - margins.right;
    if let Some(explicit) = tree.retrieve_unit(id, Property::Width, width)? {
        width = width.min(explicit);
    }
    let columns = ColumnLayout::new(&model, bbox.x + margins.left, width);
    let area_top = state.resume_at.unwrap_or(bbox.top());
    let mut y = match state.resume_at {
        Some(resume_at) => resume_at,
        None if state.first => bbox.top() - margins.top,
        None => bbox.top(),
    };

    let mut children = Vec::new();
    let show_header = !continuing && (!state.first || !model.skip_first_header);
    if show_header && !model.header.is_empty() {
        match pagination::layout_band(tree, id, &ctx, &columns, &model.header, y)? {
            RowLayout::Placed { cells, height } => {
                children.extend(cells);
                y -= height;
            }
            RowLayout::Blocked(cause) => return Ok(LayoutResult::nothing(id, cause)),
        }
    }
    let footer_height = pagination::measure_band(tree, id, &ctx, &columns, &model.footer)?;

    let mut placed_rows = 0;
    for (index, row) in state.rows.iter().enumerate() {
        let final_row = state.last && index + 1 == state.rows.len();
        let reserve = if final_row && model.skip_last_footer {
            0.0
        } else {
            footer_height
        };
        let forced_row = forced && placed_rows == 0 && !continuing;
        let (cells, height) = match pagination::layout_row(tree, id, &ctx, &columns, row, y)? {
            RowLayout::Placed { cells, height } => (cells, height),
            RowLayout::Blocked(cause) if placed_rows == 0 && !continuing => {
                return Ok(LayoutResult::nothing(id, cause));
            }
            RowLayout::Blocked(_) => break,
        };
        if y - height - reserve < bbox.y - EPS && !forced_row {
            if keep_together {
                return Ok(LayoutResult::nothing(id, id));
            }
            break;
        }
        children.extend(cells);
        y -= height;
        placed_rows += 1;
    }
    let all_placed = placed_rows == state.rows.len();

    if placed_rows == 0 && !all_placed {
        let overflow = continuation(tree, id, state.rows.clone(), state.last)?;
        if !continuing {
            return Ok(LayoutResult::nothing(id, id));
        }
        if model.footer.is_empty() {
            return Ok(LayoutResult::nothing(overflow, id));
        }
        // The fragments above already filled this page: close it with the
        // footer they left open.
        let (footer, bottom) = place_footer(tree, id, &ctx, &columns, &model, y)?;
        let split = tree.next_renderer(id)?;
        *tree.node_mut(split)?.kind.as_table_mut()? = TableState {
            rows: Vec::new(),
            first: false,
            last: false,
            resume_at: state.resume_at,
        };
        tree.set_children(split, footer)?;
        let area = LayoutArea::new(page, Rect::new(bbox.x, bottom, bbox.width, area_top - bottom));
        tree.set_occupied_area(split, area)?;
        return Ok(LayoutResult::partial(area, split, overflow));
    }

    let show_footer = !all_placed || (state.last && !model.skip_last_footer);
    if show_footer && !model.footer.is_empty() {
        let (footer, bottom) = place_footer(tree, id, &ctx, &columns, &model, y)?;
        children.extend(footer);
        y = bottom;
    }

    if all_placed {
        let bottom = if state.last { y - margins.bottom } else { y };
        let area = LayoutArea::new(page, Rect::new(bbox.x, bottom, bbox.width, area_top - bottom));
        tree.set_children(id, children)?;
        tree.set_occupied_area(id, area)?;
        log::debug!(
            "Table {} placed {} rows on page {} (last fragment: {})",
            id,
            placed_rows,
            page,
            state.last
        );
        return Ok(LayoutResult::full(area));
    }

    let area = LayoutArea::new(page, Rect::new(bbox.x, y, bbox.width, area_top - y));
    let split = tree.next_renderer(id)?;
    *tree.node_mut(split)?.kind.as_table_mut()? = TableState {
        rows: state.rows[..placed_rows].to_vec(),
        first: state.first,
        last: false,
        resume_at: state.resume_at,
    };
    tree.set_children(split, children)?;
    tree.set_occupied_area(split, area)?;
    let overflow = continuation(tree, id, state.rows[placed_rows..].to_vec(), state.last)?;
    log::debug!(
        "Table {} placed {} of {} rows on page {}",
        id,
        placed_rows,
        state.rows.len(),
        page
    );
    Ok(LayoutResult::partial(area, split, overflow))
}

/// Lays out the footer band below `top`. Returns its cells and the new
/// bottom edge.
fn place_footer(
    tree: &mut RendererTree,
    id: RendererId,
    ctx: &LayoutContext,
    columns: &ColumnLayout,
    model: &TableModel,
    top: f32,
) -> Result<(Vec<RendererId>, f32), LayoutError> {
    match pagination::layout_band(tree, id, ctx, columns, &model.footer, top)? {
        RowLayout::Placed { cells, height } => Ok((cells, top - height)),
        RowLayout::Blocked(cause) => {
            log::warn!(
                "Footer of table {} does not fit its columns ({} is too wide). It will not be displayed.",
                id,
                cause
            );
            Ok((Vec::new(), top))
        }
    }
}

/// Tables draw only their cells; borders belong to the cells. No table
/// structure tag is opened: a streamed table is drawn as several fragments
/// per page and must tag exactly like the same table drawn in one piece.
pub fn draw(tree: &mut RendererTree, id: RendererId, dc: &mut DrawContext) -> Result<(), LayoutError> {
    for cell in tree.children(id)? {
        node_kind::draw(tree, cell, dc)?;
    }
    tree.node_mut(id)?.flushed = true;
    Ok(())
}
