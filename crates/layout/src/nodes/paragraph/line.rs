//! A single line of inline renderers sharing one baseline.
use crate::canvas::DrawContext;
use crate::interface::{LayoutArea, LayoutContext, LayoutResult, LayoutStatus, LineState, RendererKind};
use crate::node_kind::{self, NodeKind};
use crate::nodes::text;
use crate::tree::{RendererId, RendererTree};
use crate::LayoutError;
use quire_style::Leading;
use quire_types::Rect;

/// Ascent and descent a placed inline renderer contributes to its line.
fn vertical_metrics(tree: &RendererTree, id: RendererId) -> Result<(f32, f32, bool), LayoutError> {
    let node = tree.node(id)?;
    Ok(match &node.kind {
        RendererKind::Text(state) => (state.ascent, state.descent, false),
        _ => (tree.occupied_area(id)?.bbox.height, 0.0, true),
    })
}

pub fn layout(tree: &mut RendererTree, id: RendererId, ctx: LayoutContext) -> Result<LayoutResult, LayoutError> {
    let bbox = ctx.area.bbox;
    let input = tree.node(id)?.kind.as_line()?.input.clone();

    let mut placed: Vec<RendererId> = Vec::new();
    let mut remainder = None;
    let mut forced_by_newline = false;
    let mut cursor = bbox.x;

    for (index, &child) in input.iter().enumerate() {
        let child_box = Rect::new(cursor, bbox.y, bbox.right() - cursor, bbox.height);
        let child_ctx = LayoutContext {
            starts_line: placed.is_empty(),
            ..ctx.with_bbox(child_box)
        };
        let result = node_kind::layout(tree, child, child_ctx)?;
        match result.status {
            LayoutStatus::Full => {
                placed.push(child);
                cursor = result.area()?.bbox.right();
            }
            LayoutStatus::Partial => {
                let (Some(split), Some(overflow)) = (result.split_renderer, result.overflow_renderer) else {
                    return Err(LayoutError::Generic(format!("Partial result of {} carries no split", child)));
                };
                placed.push(split);
                cursor = result.area()?.bbox.right();
                let mut rest = vec![overflow];
                rest.extend_from_slice(&input[index + 1..]);
                remainder = Some(rest);
                forced_by_newline = result.split_forced_by_newline;
                break;
            }
            LayoutStatus::Nothing => {
                let Some(last) = placed.pop() else {
                    return Ok(LayoutResult::nothing(id, result.cause_of_nothing.unwrap_or(child)));
                };
                let last = match tree.kind(last)? {
                    NodeKind::Text => text::trimmed_copy(tree, last, ctx.metrics)?,
                    _ => last,
                };
                cursor = tree.occupied_area(last)?.bbox.right();
                placed.push(last);
                remainder = Some(input[index..].to_vec());
                break;
            }
        }
    }

    let mut max_ascent = 0.0f32;
    let mut max_descent = 0.0f32;
    let mut contains_image = false;
    for &child in &placed {
        let (ascent, descent, image) = vertical_metrics(tree, child)?;
        max_ascent = max_ascent.max(ascent);
        max_descent = max_descent.min(descent);
        contains_image |= image;
    }
    let y_line = bbox.top() - max_ascent;
    for &child in &placed {
        if let Some(first) = tree.first_y_line(child)? {
            tree.move_renderer(child, 0.0, y_line - first)?;
        }
    }
    let height = max_ascent - max_descent;
    let area = LayoutArea::new(
        ctx.area.page_number,
        Rect::new(bbox.x, bbox.top() - height, cursor - bbox.x, height),
    );
    let metrics = |input: Vec<RendererId>| LineState {
        max_ascent,
        max_descent,
        contains_image,
        input,
    };

    let Some(rest) = remainder else {
        let node = tree.node_mut(id)?;
        node.kind = RendererKind::Line(metrics(input));
        node.occupied_area = Some(area);
        tree.set_children(id, placed)?;
        return Ok(LayoutResult::full(area));
    };

    let split = tree.next_renderer(id)?;
    tree.node_mut(split)?.kind = RendererKind::Line(metrics(placed.clone()));
    tree.node_mut(split)?.occupied_area = Some(area);
    tree.set_children(split, placed)?;

    let overflow = tree.next_renderer(id)?;
    tree.node_mut(overflow)?.kind.as_line_mut()?.input = rest.clone();
    tree.set_children(overflow, rest)?;

    let result = LayoutResult::partial(area, split, overflow);
    Ok(if forced_by_newline { result.forced_by_newline() } else { result })
}

/// The baseline of a laid-out line.
pub fn y_line(tree: &RendererTree, id: RendererId) -> Result<f32, LayoutError> {
    let max_ascent = tree.node(id)?.kind.as_line()?.max_ascent;
    Ok(tree.occupied_area(id)?.bbox.top() - max_ascent)
}

pub fn leading_value(tree: &RendererTree, id: RendererId, leading: Leading) -> Result<f32, LayoutError> {
    Ok(match leading {
        Leading::Fixed(value) => value,
        Leading::Multiplied(factor) => tree.occupied_area(id)?.bbox.height * factor,
    })
}

/// Stretches the line to `width` by widening the gaps between words, or
/// between characters when the line holds a single word.
pub fn justify(tree: &mut RendererTree, id: RendererId, width: f32) -> Result<(), LayoutError> {
    let mut area = tree.occupied_area(id)?;
    let free = width - area.bbox.width;
    if free <= 0.0 {
        return Ok(());
    }
    let children = tree.children(id)?;
    let mut spaces = 0usize;
    let mut chars = 0usize;
    for child in &children {
        if let RendererKind::Text(state) = &tree.node(*child)?.kind {
            spaces += state.text.matches(' ').count();
            chars += state.text.chars().count();
        }
    }
    let (word_spacing, char_spacing) = if spaces > 0 {
        (free / spaces as f32, 0.0)
    } else if chars > 1 {
        (0.0, free / (chars - 1) as f32)
    } else {
        return Ok(());
    };

    let last_text = children
        .iter()
        .rposition(|c| matches!(tree.node(*c).map(|n| &n.kind), Ok(RendererKind::Text(_))));
    let mut shift = 0.0;
    for (index, &child) in children.iter().enumerate() {
        tree.move_renderer(child, shift, 0.0)?;
        let node = tree.node_mut(child)?;
        let RendererKind::Text(state) = &mut node.kind else {
            continue;
        };
        let mut gaps = state.text.chars().count();
        if Some(index) == last_text {
            gaps = gaps.saturating_sub(1);
        }
        let extra = state.text.matches(' ').count() as f32 * word_spacing + gaps as f32 * char_spacing;
        state.word_spacing = word_spacing;
        state.char_spacing = char_spacing;
        if let Some(child_area) = node.occupied_area.as_mut() {
            child_area.bbox.width += extra;
        }
        shift += extra;
    }
    area.bbox.width = width;
    tree.set_occupied_area(id, area)
}

pub fn draw(tree: &mut RendererTree, id: RendererId, dc: &mut DrawContext) -> Result<(), LayoutError> {
    for child in tree.children(id)? {
        node_kind::draw(tree, child, dc)?;
    }
    tree.node_mut(id)?.flushed = true;
    Ok(())
}
