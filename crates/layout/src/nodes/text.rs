//! Inline text runs.
//!
//! A text renderer places as much of its content as fits on the current
//! line. Breaks happen at spaces; a word wider than an empty line is broken
//! between characters; an explicit newline always ends the line.
use crate::canvas::{DrawContext, TextRun};
use crate::fonts::FontMetrics;
use crate::interface::{LayoutArea, LayoutContext, LayoutResult, RendererKind, TextState};
use crate::tree::{RendererId, RendererTree};
use crate::LayoutError;
use quire_style::Property;
use quire_types::{Color, Rect, EPS};

const DEFAULT_FONT: &str = "Helvetica";
const DEFAULT_FONT_SIZE: f32 = 12.0;

/// Font name and size in effect for `id`.
pub fn font(tree: &RendererTree, id: RendererId) -> Result<(String, f32), LayoutError> {
    let name = tree
        .text(id, Property::Font)?
        .unwrap_or_else(|| DEFAULT_FONT.to_string());
    let size = tree.float_or(id, Property::FontSize, DEFAULT_FONT_SIZE)?;
    Ok((name, size))
}

struct Measure<'a> {
    metrics: &'a dyn FontMetrics,
    font: String,
    size: f32,
}

impl Measure<'_> {
    fn width(&self, text: &str) -> f32 {
        self.metrics.width(&self.font, self.size, text)
    }
}

pub fn layout(tree: &mut RendererTree, id: RendererId, ctx: LayoutContext) -> Result<LayoutResult, LayoutError> {
    let (font, size) = font(tree, id)?;
    let ascent = ctx.metrics.ascent(&font, size);
    let descent = ctx.metrics.descent(&font, size);
    let measure = Measure {
        metrics: ctx.metrics,
        font,
        size,
    };
    let bbox = ctx.area.bbox;

    let mut text = {
        let state = tree.node_mut(id)?.kind.as_text_mut()?;
        state.ascent = ascent;
        state.descent = descent;
        state.word_spacing = 0.0;
        state.char_spacing = 0.0;
        state.text.clone()
    };
    if ascent - descent > bbox.height + EPS {
        return Ok(LayoutResult::nothing(id, id));
    }
    if ctx.starts_line && text.starts_with(' ') {
        text = text.trim_start_matches(' ').to_string();
        tree.node_mut(id)?.kind.as_text_mut()?.text = text.clone();
    }

    let line_end = text.find('\n');
    let line_part = &text[..line_end.unwrap_or(text.len())];
    let available = bbox.width;

    if measure.width(line_part) <= available + EPS {
        return match line_end {
            None => {
                let area = occupy(tree, id, &ctx, measure.width(&text))?;
                Ok(LayoutResult::full(area))
            }
            Some(end) => {
                let result = split(tree, id, &ctx, &measure, line_part.trim_end(), &text[end + 1..])?;
                Ok(result.forced_by_newline())
            }
        };
    }

    // Longest prefix ending before a space that still fits.
    let mut break_at = None;
    for (index, ch) in line_part.char_indices() {
        if ch != ' ' {
            continue;
        }
        let candidate = line_part[..index].trim_end();
        if candidate.is_empty() {
            continue;
        }
        if measure.width(candidate) <= available + EPS {
            break_at = Some(index);
        } else {
            break;
        }
    }
    if let Some(index) = break_at {
        let head = line_part[..index].trim_end();
        let tail = text[index..].trim_start_matches(' ');
        return split(tree, id, &ctx, &measure, head, tail);
    }

    if !ctx.starts_line {
        return Ok(LayoutResult::nothing(id, id));
    }
    // The first word alone is wider than the line: break inside it.
    let mut end = 0;
    for (index, ch) in line_part.char_indices() {
        let next = index + ch.len_utf8();
        if measure.width(&line_part[..next]) > available + EPS {
            break;
        }
        end = next;
    }
    if end == 0 {
        return Ok(LayoutResult::nothing(id, id));
    }
    split(tree, id, &ctx, &measure, &line_part[..end], &text[end..])
}

fn occupy(
    tree: &mut RendererTree,
    id: RendererId,
    ctx: &LayoutContext,
    width: f32,
) -> Result<LayoutArea, LayoutError> {
    let state = tree.node(id)?.kind.as_text()?;
    let height = state.ascent - state.descent;
    let bbox = ctx.area.bbox;
    let area = LayoutArea::new(
        ctx.area.page_number,
        Rect::new(bbox.x, bbox.top() - height, width, height),
    );
    tree.set_occupied_area(id, area)?;
    Ok(area)
}

fn split(
    tree: &mut RendererTree,
    id: RendererId,
    ctx: &LayoutContext,
    measure: &Measure,
    head: &str,
    tail: &str,
) -> Result<LayoutResult, LayoutError> {
    let (ascent, descent) = {
        let state = tree.node(id)?.kind.as_text()?;
        (state.ascent, state.descent)
    };
    let split = tree.next_renderer(id)?;
    let overflow = tree.next_renderer(id)?;
    tree.node_mut(split)?.kind = RendererKind::Text(TextState {
        text: head.to_string(),
        ascent,
        descent,
        ..Default::default()
    });
    tree.node_mut(overflow)?.kind = RendererKind::Text(TextState {
        text: tail.to_string(),
        ..Default::default()
    });
    let area = occupy(tree, split, ctx, measure.width(head))?;
    Ok(LayoutResult::partial(area, split, overflow))
}

/// A copy of a laid-out text renderer without trailing spaces, for the last
/// run on a wrapped line. Returns `id` itself when there is nothing to trim.
pub fn trimmed_copy(
    tree: &mut RendererTree,
    id: RendererId,
    metrics: &dyn FontMetrics,
) -> Result<RendererId, LayoutError> {
    let state = tree.node(id)?.kind.as_text()?.clone();
    let trimmed = state.text.trim_end_matches(' ');
    if trimmed.len() == state.text.len() {
        return Ok(id);
    }
    let (font, size) = font(tree, id)?;
    let mut area = tree.occupied_area(id)?;
    area.bbox.width = metrics.width(&font, size, trimmed);
    let copy = tree.next_renderer(id)?;
    let node = tree.node_mut(copy)?;
    node.kind = RendererKind::Text(TextState {
        text: trimmed.to_string(),
        ..state
    });
    node.occupied_area = Some(area);
    Ok(copy)
}

pub fn draw(tree: &mut RendererTree, id: RendererId, dc: &mut DrawContext) -> Result<(), LayoutError> {
    let area = tree.occupied_area(id)?;
    let state = tree.node(id)?.kind.as_text()?.clone();
    if !state.text.is_empty() {
        let (font, size) = font(tree, id)?;
        let color = tree.color(id, Property::FontColor)?.unwrap_or_else(Color::black);
        dc.canvas(area.page_number)?.show_text(TextRun {
            text: state.text,
            x: area.bbox.x,
            y: area.bbox.top() - state.ascent,
            font,
            size,
            color,
            word_spacing: state.word_spacing,
            char_spacing: state.char_spacing,
        });
    }
    tree.node_mut(id)?.flushed = true;
    Ok(())
}
