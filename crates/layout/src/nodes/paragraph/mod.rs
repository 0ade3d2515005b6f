//! Paragraph layout: breaks inline content into lines and stacks them with
//! leading.
pub mod line;

use crate::interface::{LayoutArea, LayoutContext, LayoutResult, LayoutStatus, LineState, RendererKind};
use crate::nodes::block::{self, Frame};
use crate::tree::{RendererId, RendererTree};
use crate::LayoutError;
use quire_style::{Property, PropertyValue, TextAlignment};
use quire_types::{Rect, EPS, INF};

/// Splits the content box into `ColumnCount` equal columns. Lines flow
/// through the columns in order.
fn column_areas(tree: &RendererTree, id: RendererId, frame: &Frame) -> Result<Vec<Rect>, LayoutError> {
    let count = tree.int_or(id, Property::ColumnCount, 1)?;
    if frame.positioned || count <= 1 {
        return Ok(vec![frame.content]);
    }
    let width = frame.content.width / count as f32;
    Ok((0..count)
        .map(|i| {
            Rect::new(
                frame.content.x + i as f32 * width,
                frame.content.y,
                width,
                frame.content.height,
            )
        })
        .collect())
}

fn new_line(tree: &mut RendererTree, paragraph: RendererId, input: Vec<RendererId>) -> Result<RendererId, LayoutError> {
    let line = tree.insert(
        RendererKind::Line(LineState {
            input: input.clone(),
            ..Default::default()
        }),
        None,
        Some(paragraph),
    );
    tree.set_children(line, input)?;
    Ok(line)
}

/// Hands the placed lines to `target`. The normal-flow children stay as
/// they were so a renderer laid out again starts from its original content.
fn adopt_lines(tree: &mut RendererTree, target: RendererId, lines: Vec<RendererId>) -> Result<(), LayoutError> {
    for line in &lines {
        tree.node_mut(*line)?.parent = Some(target);
    }
    tree.node_mut(target)?.kind.as_paragraph_mut()?.lines = lines;
    Ok(())
}

/// Moves `line` inside `width` according to the paragraph alignment.
fn align_line(
    tree: &mut RendererTree,
    line: RendererId,
    alignment: TextAlignment,
    width: f32,
    wrapped: bool,
) -> Result<(), LayoutError> {
    let free = width - tree.occupied_area(line)?.bbox.width;
    match alignment {
        TextAlignment::Justified if wrapped => line::justify(tree, line, width),
        TextAlignment::JustifiedAll => line::justify(tree, line, width),
        TextAlignment::Right => tree.move_renderer(line, free, 0.0),
        TextAlignment::Center => tree.move_renderer(line, free / 2.0, 0.0),
        _ => Ok(()),
    }
}

pub fn layout(tree: &mut RendererTree, id: RendererId, ctx: LayoutContext) -> Result<LayoutResult, LayoutError> {
    let page = ctx.area.page_number;
    let children = tree.children(id)?;
    if children.is_empty() {
        for key in [
            Property::MarginTop,
            Property::MarginRight,
            Property::MarginBottom,
            Property::MarginLeft,
            Property::PaddingTop,
            Property::PaddingRight,
            Property::PaddingBottom,
            Property::PaddingLeft,
        ] {
            tree.set_property(id, key, 0.0)?;
        }
        tree.set_property(id, Property::Border, PropertyValue::None)?;
    }

    let frame = block::begin_frame(tree, id, &ctx)?;
    let areas = column_areas(tree, id, &frame)?;
    let leading = tree.leading(id)?;
    let alignment = tree.text_alignment(id)?;
    let first_line_indent = tree.float_or(id, Property::FirstLineIndent, 0.0)?;
    let keep_together = tree.is_keep_together(id)?;

    let mut area_index = 0;
    let mut layout_box = areas[0];
    let mut occupied = Rect::new(layout_box.x, layout_box.top(), layout_box.width, 0.0);
    let mut lines = Vec::new();
    let mut anything_placed = children.is_empty();
    let mut first_line_in_box = true;
    let mut last_y_line = layout_box.top();
    let mut previous_descent = 0.0;
    let mut last_leading = 0.0;
    let mut last_height = 0.0;
    let mut current = if children.is_empty() {
        None
    } else {
        Some(new_line(tree, id, children)?)
    };

    while let Some(line) = current {
        let indent = if anything_placed { 0.0 } else { first_line_indent };
        let line_box = Rect::new(
            layout_box.x + indent,
            layout_box.y,
            layout_box.width - indent,
            layout_box.height,
        );
        let result = line::layout(tree, line, ctx.with_bbox(line_box))?;
        let processed = match result.status {
            LayoutStatus::Full => Some(line),
            LayoutStatus::Partial => result.split_renderer,
            LayoutStatus::Nothing => None,
        };

        let mut placement = None;
        if let Some(processed) = processed {
            let wrapped = result.status == LayoutStatus::Partial && !result.split_forced_by_newline;
            align_line(tree, processed, alignment, line_box.width, wrapped)?;

            let mut leading_value = match leading {
                Some(leading) => line::leading_value(tree, processed, leading)?,
                None => 0.0,
            };
            if tree.node(processed)?.kind.as_line()?.contains_image {
                leading_value -= previous_descent;
            }
            let bbox = tree.occupied_area(processed)?.bbox;
            let delta_y = if first_line_in_box {
                -(leading_value - bbox.height) / 2.0
            } else {
                last_y_line - leading_value - line::y_line(tree, processed)?
            };
            let fits = leading.is_none() || bbox.y + delta_y >= layout_box.y - EPS;
            if fits {
                placement = Some((processed, delta_y, leading_value, bbox.height));
            }
        }

        let Some((processed, delta_y, leading_value, height)) = placement else {
            if area_index + 1 < areas.len() {
                area_index += 1;
                layout_box = areas[area_index];
                last_y_line = layout_box.top();
                first_line_in_box = true;
                continue;
            }
            let cause = result.cause_of_nothing.unwrap_or(id);
            if keep_together {
                return Ok(LayoutResult::nothing(id, cause));
            }
            if anything_placed {
                let (split, overflow) = tree.partition(id, LayoutStatus::Partial)?;
                adopt_lines(tree, split, lines)?;
                let input = tree.node(line)?.kind.as_line()?.input.clone();
                tree.set_children(overflow, input)?;
                let area = LayoutArea::new(page, block::close_frame(tree, id, &frame, &occupied)?);
                tree.set_occupied_area(split, area)?;
                let mut partial = LayoutResult::partial(area, split, overflow);
                partial.cause_of_nothing = Some(cause);
                return Ok(partial);
            }
            if tree.bool_or(id, Property::ForcedPlacement, false)? {
                return force_first_line(tree, id, &ctx, &frame, line, line_box, occupied);
            }
            return Ok(LayoutResult::nothing(id, cause));
        };

        if leading.is_some() {
            tree.move_renderer(processed, 0.0, delta_y)?;
            last_y_line = line::y_line(tree, processed)?;
        }
        let bbox = tree.occupied_area(processed)?.bbox;
        occupied = Rect::common_rectangle(&occupied, &bbox);
        layout_box.height = bbox.y - layout_box.y;
        lines.push(processed);
        anything_placed = true;
        first_line_in_box = false;
        previous_descent = tree.node(processed)?.kind.as_line()?.max_descent;
        last_leading = leading_value;
        last_height = height;
        current = match result.status {
            LayoutStatus::Partial => result.overflow_renderer,
            _ => None,
        };
    }

    adopt_lines(tree, id, lines)?;
    if !frame.positioned {
        let move_down = ((last_leading - last_height) / 2.0).min(occupied.y - layout_box.y);
        occupied.move_down(move_down);
        occupied.height += move_down;
    }
    if let Some(nothing) = block::finish_frame(tree, id, &ctx, &frame, occupied)? {
        return Ok(nothing);
    }
    Ok(LayoutResult::full(tree.occupied_area(id)?))
}

/// Places the first line regardless of the area bottom: first with an
/// unbounded height, then with an unbounded width if the line still cannot
/// take a single character.
fn force_first_line(
    tree: &mut RendererTree,
    id: RendererId,
    ctx: &LayoutContext,
    frame: &Frame,
    line: RendererId,
    line_box: Rect,
    occupied: Rect,
) -> Result<LayoutResult, LayoutError> {
    let page = ctx.area.page_number;
    let mut forced_box = Rect::new(line_box.x, line_box.top() - INF, line_box.width, INF);
    let mut result = line::layout(tree, line, ctx.with_bbox(forced_box))?;
    if result.is_nothing() {
        forced_box.width = INF;
        result = line::layout(tree, line, ctx.with_bbox(forced_box))?;
    }
    let processed = match result.status {
        LayoutStatus::Full => line,
        LayoutStatus::Partial => result.split_renderer.unwrap_or(line),
        LayoutStatus::Nothing => {
            return Ok(LayoutResult::nothing(id, result.cause_of_nothing.unwrap_or(id)));
        }
    };
    log::warn!("Paragraph {} does not fit its area. Forcing the first line.", id);
    ctx.mark_area_full();
    let occupied = Rect::common_rectangle(&occupied, &tree.occupied_area(processed)?.bbox);

    match (result.status, result.overflow_renderer) {
        (LayoutStatus::Partial, Some(rest)) => {
            let (split, overflow) = tree.partition(id, LayoutStatus::Partial)?;
            adopt_lines(tree, split, vec![processed])?;
            let input = tree.node(rest)?.kind.as_line()?.input.clone();
            tree.set_children(overflow, input)?;
            let area = LayoutArea::new(page, block::close_frame(tree, id, frame, &occupied)?);
            tree.set_occupied_area(split, area)?;
            Ok(LayoutResult::partial(area, split, overflow))
        }
        _ => {
            adopt_lines(tree, id, vec![processed])?;
            if let Some(nothing) = block::finish_frame(tree, id, ctx, frame, occupied)? {
                return Ok(nothing);
            }
            Ok(LayoutResult::full(tree.occupied_area(id)?))
        }
    }
}
