//! Row placement for tables.
//!
//! Rows are atomic: every cell of a row is laid out against an unbounded
//! height, the row takes the height of its tallest cell, and the row either
//! fits below the current position or moves whole to the next area.
use crate::element::{flow_rows, Element, TableModel};
use crate::interface::{LayoutContext, LayoutStatus};
use crate::node_kind;
use crate::tree::{RendererId, RendererTree};
use crate::LayoutError;
use quire_types::{Rect, INF};

/// Horizontal geometry shared by every row of one table fragment.
#[derive(Debug, Clone)]
pub struct ColumnLayout {
    pub xs: Vec<f32>,
    pub widths: Vec<f32>,
}

impl ColumnLayout {
    /// Columns with an explicit width take it; the others share what is
    /// left equally.
    pub fn new(model: &TableModel, x: f32, width: f32) -> Self {
        let count = model.column_count().max(1);
        let resolved: Vec<Option<f32>> = (0..count)
            .map(|i| model.columns.get(i).and_then(|c| c.as_ref()).map(|u| u.resolve(width)))
            .collect();
        let used: f32 = resolved.iter().flatten().sum();
        let open = resolved.iter().filter(|w| w.is_none()).count();
        let share = if open > 0 {
            (width - used).max(0.0) / open as f32
        } else {
            0.0
        };
        let widths: Vec<f32> = resolved.into_iter().map(|w| w.unwrap_or(share)).collect();
        let mut xs = Vec::with_capacity(count);
        let mut cursor = x;
        for w in &widths {
            xs.push(cursor);
            cursor += w;
        }
        Self { xs, widths }
    }

    pub fn count(&self) -> usize {
        self.widths.len()
    }
}

/// A laid-out row, or the renderer that kept a cell from being placed.
pub enum RowLayout {
    Placed { cells: Vec<RendererId>, height: f32 },
    Blocked(RendererId),
}

/// Lays out one row with its top edge at `top`. Cells are laid out against
/// a top edge at zero and moved into place, so a row gets the same geometry
/// wherever it lands.
pub fn layout_row(
    tree: &mut RendererTree,
    table: RendererId,
    ctx: &LayoutContext,
    columns: &ColumnLayout,
    row: &[Element],
    top: f32,
) -> Result<RowLayout, LayoutError> {
    let mut cells = Vec::with_capacity(row.len());
    let mut height = 0.0f32;
    let mut column = 0;
    for cell in row {
        if column >= columns.count() {
            break;
        }
        let span = cell.colspan().clamp(1, columns.count() - column);
        let width: f32 = columns.widths[column..column + span].iter().sum();
        let renderer = tree.create_renderer_subtree(cell, Some(table))?;
        let bbox = Rect::new(columns.xs[column], -INF, width, INF);
        let result = node_kind::layout(tree, renderer, ctx.with_bbox(bbox))?;
        if result.status == LayoutStatus::Nothing {
            return Ok(RowLayout::Blocked(result.cause_of_nothing.unwrap_or(renderer)));
        }
        let placed = result.split_renderer.unwrap_or(renderer);
        height = height.max(result.area()?.bbox.height);
        tree.move_renderer(placed, 0.0, top)?;
        cells.push(placed);
        column += span;
    }
    for &cell in &cells {
        let mut area = tree.occupied_area(cell)?;
        let missing = height - area.bbox.height;
        if missing > 0.0 {
            area.bbox.move_down(missing);
            area.bbox.height = height;
            tree.set_occupied_area(cell, area)?;
        }
    }
    Ok(RowLayout::Placed { cells, height })
}

/// Lays out a header or footer band: the given cells flowed into rows and
/// stacked from `top` down.
pub fn layout_band(
    tree: &mut RendererTree,
    table: RendererId,
    ctx: &LayoutContext,
    columns: &ColumnLayout,
    band: &[Element],
    top: f32,
) -> Result<RowLayout, LayoutError> {
    let (mut rows, rest) = flow_rows(band, columns.count());
    if !rest.is_empty() {
        rows.push(rest);
    }
    let mut cells = Vec::new();
    let mut height = 0.0;
    for row in &rows {
        match layout_row(tree, table, ctx, columns, row, top - height)? {
            RowLayout::Placed { cells: row_cells, height: row_height } => {
                cells.extend(row_cells);
                height += row_height;
            }
            blocked => return Ok(blocked),
        }
    }
    Ok(RowLayout::Placed { cells, height })
}

/// Height of a band, measured at a fixed position so every fragment of the
/// table reserves exactly the same space for it.
pub fn measure_band(
    tree: &mut RendererTree,
    table: RendererId,
    ctx: &LayoutContext,
    columns: &ColumnLayout,
    band: &[Element],
) -> Result<f32, LayoutError> {
    if band.is_empty() {
        return Ok(0.0);
    }
    match layout_band(tree, table, ctx, columns, band, 0.0)? {
        RowLayout::Placed { cells, height } => {
            for cell in cells {
                tree.release(cell)?;
            }
            Ok(height)
        }
        RowLayout::Blocked(_) => Ok(0.0),
    }
}
