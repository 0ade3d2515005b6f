//! Shared drawing sequence for block-level renderers.
//!
//! The order is fixed: destination and link annotation, relative offset,
//! rotation, background, borders, children. Content drawn later always sits
//! above the backgrounds and borders drawn before it.
pub mod box_painter;

use crate::canvas::{Destination, DrawContext, LinkAnnotation, TagRole};
use crate::interface::RendererKind;
use crate::node_kind;
use crate::tree::{RendererId, RendererTree};
use crate::LayoutError;
use quire_style::{Property, StyleError};
use quire_types::Rect;

pub fn draw_block(
    tree: &mut RendererTree,
    id: RendererId,
    dc: &mut DrawContext,
    role: Option<TagRole>,
) -> Result<(), LayoutError> {
    let page = tree.occupied_area(id)?.page_number;
    apply_destination(tree, id, dc)?;
    apply_action(tree, id, dc)?;

    let tagged = match role {
        Some(role) => dc.open_tag(page, role)?,
        None => false,
    };
    let relative = tree.is_relative_position(id)?;
    if relative {
        apply_relative_translation(tree, id, false)?;
    }
    let frame = begin_rotation(tree, id, dc)?;

    box_painter::draw_background(tree, id, dc, &frame)?;
    box_painter::draw_borders(tree, id, dc, &frame)?;
    draw_children(tree, id, dc)?;

    end_rotation(tree, id, dc)?;
    if relative {
        apply_relative_translation(tree, id, true)?;
    }
    dc.close_tag(page, tagged)?;
    tree.node_mut(id)?.flushed = true;
    Ok(())
}

pub fn draw_children(tree: &mut RendererTree, id: RendererId, dc: &mut DrawContext) -> Result<(), LayoutError> {
    let children = match &tree.node(id)?.kind {
        RendererKind::Paragraph(state) => state.lines.clone(),
        _ => tree.children(id)?,
    };
    for child in children {
        node_kind::draw(tree, child, dc)?;
    }
    Ok(())
}

/// Registers a named destination at the top-left corner of the renderer.
/// The property is consumed so the name is registered once even when the
/// element is split over several pages.
fn apply_destination(tree: &mut RendererTree, id: RendererId, dc: &mut DrawContext) -> Result<(), LayoutError> {
    let Some(name) = tree.text(id, Property::Destination)? else {
        return Ok(());
    };
    let area = tree.occupied_area(id)?;
    dc.document().add_named_destination(
        &name,
        Destination {
            page: area.page_number,
            x: area.bbox.x,
            y: area.bbox.top(),
            zoom: 1.0,
        },
    )?;
    tree.delete_property(id, Property::Destination)
}

fn apply_action(tree: &mut RendererTree, id: RendererId, dc: &mut DrawContext) -> Result<(), LayoutError> {
    let action = tree
        .property(id, Property::Action)?
        .map(|v| v.as_action())
        .transpose()
        .map_err(|e: StyleError| LayoutError::InvalidProperty(Property::Action, e))?;
    let Some(action) = action else {
        return Ok(());
    };
    let border_width = tree.border(id, Property::Border)?.map_or(0.0, |b| b.width);
    let page = tree.occupied_area(id)?.page_number;
    let link = LinkAnnotation {
        rect: tree.absolute_bbox(id)?,
        action,
        border: [0.0, 0.0, border_width],
    };
    dc.document().add_link_annotation(page, link)
}

/// Moves a relatively positioned renderer by its `Left`/`Right` and
/// `Top`/`Bottom` offsets, or back when `reverse` is set.
fn apply_relative_translation(tree: &mut RendererTree, id: RendererId, reverse: bool) -> Result<(), LayoutError> {
    let top = tree.float_or(id, Property::Top, 0.0)?;
    let bottom = tree.float_or(id, Property::Bottom, 0.0)?;
    let left = tree.float_or(id, Property::Left, 0.0)?;
    let right = tree.float_or(id, Property::Right, 0.0)?;
    let dx = if left != 0.0 { left } else { -right };
    let dy = if top != 0.0 { -top } else { bottom };
    if dx != 0.0 || dy != 0.0 {
        let sign = if reverse { -1.0 } else { 1.0 };
        tree.move_renderer(id, dx * sign, dy * sign)?;
    }
    Ok(())
}

/// Concatenates the rotation of a rotated renderer and returns the frame
/// its background and borders are painted on: the unrotated content box
/// when rotated, the occupied area otherwise.
fn begin_rotation(tree: &RendererTree, id: RendererId, dc: &mut DrawContext) -> Result<Rect, LayoutError> {
    let node = tree.node(id)?;
    let area = tree.occupied_area(id)?;
    let Some(rotation) = node.rotation else {
        return Ok(area.bbox);
    };
    let transform = tree.rotation_transform(id)?;
    let canvas = dc.canvas(area.page_number)?;
    canvas.save_state();
    canvas.concat_matrix(transform);
    Ok(Rect::new(
        area.bbox.x,
        area.bbox.top() - rotation.initial_height,
        rotation.initial_width,
        rotation.initial_height,
    ))
}

fn end_rotation(tree: &RendererTree, id: RendererId, dc: &mut DrawContext) -> Result<(), LayoutError> {
    if tree.node(id)?.rotation.is_some() {
        let page = tree.occupied_area(id)?.page_number;
        dc.canvas(page)?.restore_state();
    }
    Ok(())
}
