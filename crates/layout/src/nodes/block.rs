//! Generic block layout shared by divs, cells, lists and list items.
use crate::interface::{LayoutArea, LayoutContext, LayoutResult, LayoutStatus, RendererKind};
use crate::node_kind;
use crate::style::{self, BoxModel};
use crate::tree::{RendererId, RendererTree, RotationState};
use crate::LayoutError;
use quire_style::{Property, VerticalAlignment};
use quire_types::{AffineTransform, Rect, EPS, INF};

/// Geometry derived at the start of a block layout.
#[derive(Debug, Clone)]
pub(crate) struct Frame {
    pub model: BoxModel,
    /// The content box children are laid out into.
    pub content: Rect,
    pub positioned: bool,
    pub rotated: bool,
}

/// Margins, then the border box, then the width clamp, then paddings.
/// Rotated renderers measure against an unbounded height first and fit the
/// rotated result afterwards.
pub(crate) fn begin_frame(
    tree: &RendererTree,
    id: RendererId,
    ctx: &LayoutContext,
) -> Result<Frame, LayoutError> {
    let mut bbox = ctx.area.bbox;
    let rotated = tree.float(id, Property::RotationAngle)?.is_some();
    if rotated {
        bbox.move_down(INF - bbox.height);
        bbox.height = INF;
    }
    let model = BoxModel::resolve(tree, id)?;
    bbox = style::apply_margins(tree, id, &bbox, &model.margins, false)?;
    bbox = style::apply_border_box(&bbox, &model.borders, false);
    let positioned = tree.is_positioned(id)?;
    if positioned {
        bbox.x = tree.float_or(id, Property::Left, 0.0)?;
    }
    if let Some(width) = tree.retrieve_unit(id, Property::Width, bbox.width)? {
        if width < bbox.width || positioned {
            bbox.width = width;
        }
    }
    let content = style::apply_paddings(&bbox, &model.paddings, false);
    Ok(Frame {
        model,
        content,
        positioned,
        rotated,
    })
}

/// Grows an occupied content box back out through paddings, borders and
/// margins, for results that stop early.
pub(crate) fn close_frame(
    tree: &RendererTree,
    id: RendererId,
    frame: &Frame,
    occupied: &Rect,
) -> Result<Rect, LayoutError> {
    let rect = style::apply_paddings(occupied, &frame.model.paddings, true);
    frame.model.outer(tree, id, &rect)
}

/// Completes a layout that placed all content: reverses paddings, applies
/// `Height` as a minimum with vertical alignment, moves positioned renderers
/// to their offset, reverses borders and margins, and resolves rotation.
///
/// Returns a `Nothing` result when the rotated content does not fit the
/// original area and placement is not forced.
pub(crate) fn finish_frame(
    tree: &mut RendererTree,
    id: RendererId,
    ctx: &LayoutContext,
    frame: &Frame,
    occupied: Rect,
) -> Result<Option<LayoutResult>, LayoutError> {
    let page = ctx.area.page_number;
    let mut occupied = style::apply_paddings(&occupied, &frame.model.paddings, true);
    tree.set_occupied_area(id, LayoutArea::new(page, occupied))?;
    if let Some(height) = tree.retrieve_unit(id, Property::Height, ctx.area.bbox.height)? {
        if height > occupied.height {
            occupied.move_down(height - occupied.height);
            occupied.height = height;
            tree.set_occupied_area(id, LayoutArea::new(page, occupied))?;
            apply_vertical_alignment(tree, id, &occupied, frame.model.paddings.bottom)?;
        }
    }
    if frame.positioned {
        let y = tree.float_or(id, Property::Bottom, 0.0)?;
        tree.move_renderer(id, 0.0, y - occupied.y)?;
        occupied = tree.occupied_area(id)?.bbox;
    }
    let outer = frame.model.outer(tree, id, &occupied)?;
    tree.set_occupied_area(id, LayoutArea::new(page, outer))?;

    if frame.rotated {
        apply_rotation_layout(tree, id)?;
        if is_not_fitting(tree, id, &ctx.area)? && !tree.bool_or(id, Property::ForcedPlacement, false)? {
            return Ok(Some(LayoutResult::nothing(id, id)));
        }
    }
    Ok(None)
}

/// Renderers that stack vertically inside `id`.
fn flow_items(tree: &RendererTree, id: RendererId) -> Result<Vec<RendererId>, LayoutError> {
    Ok(match &tree.node(id)?.kind {
        RendererKind::Paragraph(state) => state.lines.clone(),
        _ => tree.children(id)?,
    })
}

/// Distributes the space a minimum height added below the content.
fn apply_vertical_alignment(
    tree: &mut RendererTree,
    id: RendererId,
    occupied: &Rect,
    padding_bottom: f32,
) -> Result<(), LayoutError> {
    let alignment = tree
        .property(id, Property::VerticalAlignment)?
        .map(|v| v.as_vertical_alignment())
        .transpose()
        .map_err(|e| LayoutError::InvalidProperty(Property::VerticalAlignment, e))?;
    let items = flow_items(tree, id)?;
    let Some(last) = items.last() else {
        return Ok(());
    };
    let delta = tree.occupied_area(*last)?.bbox.y - (occupied.y + padding_bottom);
    let shift = match alignment {
        Some(VerticalAlignment::Bottom) => -delta,
        Some(VerticalAlignment::Middle) => -delta / 2.0,
        _ => return Ok(()),
    };
    for item in items {
        tree.move_renderer(item, 0.0, shift)?;
    }
    Ok(())
}

/// Replaces the occupied area with the bounding box of the rotated content,
/// keeping the top-left corner in place.
fn apply_rotation_layout(tree: &mut RendererTree, id: RendererId) -> Result<(), LayoutError> {
    let angle = tree.float_or(id, Property::RotationAngle, 0.0)?;
    let area = tree.occupied_area(id)?;
    let rotated = AffineTransform::rotation(angle).transform_rect(&area.bbox);
    let bbox = Rect::new(
        area.bbox.x,
        area.bbox.top() - rotated.height,
        rotated.width,
        rotated.height,
    );
    let node = tree.node_mut(id)?;
    node.rotation = Some(RotationState {
        angle,
        initial_width: area.bbox.width,
        initial_height: area.bbox.height,
    });
    node.occupied_area = Some(LayoutArea::new(area.page_number, bbox));
    Ok(())
}

fn is_not_fitting(tree: &RendererTree, id: RendererId, area: &LayoutArea) -> Result<bool, LayoutError> {
    if tree.is_positioned(id)? {
        return Ok(false);
    }
    let model = BoxModel::resolve(tree, id)?;
    let available = style::apply_margins(tree, id, &area.bbox, &model.margins, false)?;
    let available = style::apply_paddings(&available, &model.paddings, false);
    let occupied = tree.occupied_area(id)?.bbox;
    Ok(occupied.height > available.height + EPS || occupied.width > available.width + EPS)
}

pub fn layout(
    tree: &mut RendererTree,
    id: RendererId,
    ctx: LayoutContext,
) -> Result<LayoutResult, LayoutError> {
    let page = ctx.area.page_number;
    let frame = begin_frame(tree, id, &ctx)?;
    let mut layout_box = frame.content;
    let mut occupied = Rect::new(layout_box.x, layout_box.top(), layout_box.width, 0.0);
    let mut flow = tree.children(id)?;
    // A failed attempt hands the children to its overflow clone. Take them
    // back so they inherit from this renderer again.
    tree.set_children(id, flow.clone())?;
    let mut anything_placed = false;

    let mut index = 0;
    while index < flow.len() {
        let child = flow[index];
        let result = node_kind::layout(tree, child, ctx.with_bbox(layout_box))?;
        match result.status {
            LayoutStatus::Full => {
                let placed = result.split_renderer.unwrap_or(child);
                let child_area = result.area()?.bbox;
                flow[index] = placed;
                anything_placed = true;
                occupied = Rect::common_rectangle(&occupied, &child_area);
                layout_box.height = child_area.y - layout_box.y;
                tree.align_child_horizontally(placed, layout_box.width)?;
                index += 1;
            }
            LayoutStatus::Partial => {
                let (Some(child_split), Some(child_overflow)) =
                    (result.split_renderer, result.overflow_renderer)
                else {
                    return Err(LayoutError::Generic(format!(
                        "Partial result of {} carries no split",
                        child
                    )));
                };
                occupied = Rect::common_rectangle(&occupied, &result.area()?.bbox);
                tree.align_child_horizontally(child_split, layout_box.width)?;
                if tree.is_keep_together(id)? {
                    return Ok(LayoutResult::nothing(id, id));
                }
                let (split, overflow) = tree.partition(id, LayoutStatus::Partial)?;
                let mut split_children = flow[..index].to_vec();
                split_children.push(child_split);
                let mut overflow_children = vec![child_overflow];
                overflow_children.extend_from_slice(&flow[index + 1..]);
                tree.set_children(split, split_children)?;
                tree.set_children(overflow, overflow_children)?;

                let area = LayoutArea::new(page, close_frame(tree, id, &frame, &occupied)?);
                tree.set_occupied_area(split, area)?;
                return Ok(LayoutResult::partial(area, split, overflow));
            }
            LayoutStatus::Nothing => {
                let cause = result.cause_of_nothing.unwrap_or(child);
                if tree.is_keep_together(id)? {
                    return Ok(LayoutResult::nothing(id, cause));
                }
                // Forcing reaches the children through inheritance, but a
                // keep-together child still refuses to split. Drop the
                // constraint and lay the child out again.
                if tree.bool_or(id, Property::ForcedPlacement, false)? && tree.is_keep_together(child)? {
                    log::warn!("Element does not fit current area. KeepTogether property will be ignored.");
                    tree.set_property(child, Property::KeepTogether, false)?;
                    continue;
                }
                let status = if anything_placed {
                    LayoutStatus::Partial
                } else {
                    LayoutStatus::Nothing
                };
                let (split, overflow) = tree.partition(id, status)?;
                tree.set_children(split, flow[..index].to_vec())?;
                let mut overflow_children = vec![result.overflow_renderer.unwrap_or(child)];
                overflow_children.extend_from_slice(&flow[index + 1..]);
                tree.set_children(overflow, overflow_children)?;

                let area = LayoutArea::new(page, close_frame(tree, id, &frame, &occupied)?);
                if status == LayoutStatus::Partial {
                    tree.set_occupied_area(split, area)?;
                    let mut result = LayoutResult::partial(area, split, overflow);
                    result.cause_of_nothing = Some(cause);
                    return Ok(result);
                }
                return Ok(LayoutResult::nothing(overflow, cause));
            }
        }
    }

    tree.set_children(id, flow)?;
    if let Some(nothing) = finish_frame(tree, id, &ctx, &frame, occupied)? {
        return Ok(nothing);
    }
    Ok(LayoutResult::full(tree.occupied_area(id)?))
}
