use crate::canvas::{BorderSegment, DrawContext, TagRole};
use crate::style::{self, border_widths};
use crate::tree::{RendererId, RendererTree};
use crate::LayoutError;
use quire_style::Property;
use quire_types::Rect;

/// Fills the background of `id` inside its margins, grown by the
/// background's extra insets. Degenerate rectangles are skipped.
pub fn draw_background(
    tree: &RendererTree,
    id: RendererId,
    dc: &mut DrawContext,
    frame: &Rect,
) -> Result<(), LayoutError> {
    let background = tree
        .property(id, Property::Background)?
        .map(|v| v.as_background())
        .transpose()
        .map_err(|e| LayoutError::InvalidProperty(Property::Background, e))?;
    let Some(background) = background else {
        return Ok(());
    };
    let area = style::apply_margins(tree, id, frame, &style::margins(tree, id)?, false)?;
    if area.width <= 0.0 || area.height <= 0.0 {
        log::warn!("The background rectangle has negative or zero sizes. It will not be displayed.");
        return Ok(());
    }
    let page = tree.occupied_area(id)?.page_number;
    let tagged = dc.open_tag(page, TagRole::Artifact)?;
    let canvas = dc.canvas(page)?;
    canvas.save_state();
    canvas.set_fill_color(&background.color);
    canvas.fill_rectangle(Rect::new(
        area.x - background.extra_left,
        area.y - background.extra_bottom,
        area.width + background.extra_left + background.extra_right,
        area.height + background.extra_top + background.extra_bottom,
    ));
    canvas.restore_state();
    dc.close_tag(page, tagged)
}

/// Draws up to four border segments along the inner edge of the border
/// box. Each segment carries the widths of the sides it meets.
pub fn draw_borders(
    tree: &RendererTree,
    id: RendererId,
    dc: &mut DrawContext,
    frame: &Rect,
) -> Result<(), LayoutError> {
    let borders = style::borders(tree, id)?;
    if borders.iter().all(Option::is_none) {
        return Ok(());
    }
    let area = style::apply_margins(tree, id, frame, &style::margins(tree, id)?, false)?;
    if area.width <= 0.0 || area.height <= 0.0 {
        log::warn!("The border rectangle has negative or zero sizes. It will not be displayed.");
        return Ok(());
    }
    let area = style::apply_border_box(&area, &borders, false);
    let widths = border_widths(&borders);
    let (x1, y1, x2, y2) = (area.x, area.y, area.right(), area.top());
    let segments = [
        (x1, y2, x2, y2, widths.left, widths.right),
        (x2, y2, x2, y1, widths.top, widths.bottom),
        (x2, y1, x1, y1, widths.right, widths.left),
        (x1, y1, x1, y2, widths.bottom, widths.top),
    ];

    let page = tree.occupied_area(id)?.page_number;
    let tagged = dc.open_tag(page, TagRole::Artifact)?;
    for (border, (x1, y1, x2, y2, before, after)) in borders.iter().zip(segments) {
        let Some(border) = border else { continue };
        let canvas = dc.canvas(page)?;
        canvas.save_state();
        canvas.draw_border_segment(
            border,
            BorderSegment {
                x1,
                y1,
                x2,
                y2,
                width_before: before,
                width_after: after,
            },
        );
        canvas.restore_state();
    }
    dc.close_tag(page, tagged)
}
