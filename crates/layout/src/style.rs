//! Box-model helpers shared by every block-level renderer.
//!
//! Each helper shrinks a rectangle inward, or grows it back outward when
//! `reverse` is set, so layout can walk from the outer area to the content
//! box and back without losing precision.
use crate::tree::{RendererId, RendererTree};
use crate::LayoutError;
use quire_style::{Border, Margins, Property};
use quire_types::Rect;

/// Resolved borders in top, right, bottom, left order.
pub type Borders = [Option<Border>; 4];

pub fn margins(tree: &RendererTree, id: RendererId) -> Result<Margins, LayoutError> {
    Ok(Margins::new(
        tree.float_or(id, Property::MarginTop, 0.0)?,
        tree.float_or(id, Property::MarginRight, 0.0)?,
        tree.float_or(id, Property::MarginBottom, 0.0)?,
        tree.float_or(id, Property::MarginLeft, 0.0)?,
    ))
}

pub fn paddings(tree: &RendererTree, id: RendererId) -> Result<Margins, LayoutError> {
    Ok(Margins::new(
        tree.float_or(id, Property::PaddingTop, 0.0)?,
        tree.float_or(id, Property::PaddingRight, 0.0)?,
        tree.float_or(id, Property::PaddingBottom, 0.0)?,
        tree.float_or(id, Property::PaddingLeft, 0.0)?,
    ))
}

/// A side-specific border wins only when set on the renderer or its
/// element; otherwise the side falls back to the generic `Border`.
pub fn borders(tree: &RendererTree, id: RendererId) -> Result<Borders, LayoutError> {
    let generic = tree.border(id, Property::Border)?;
    let side = |key: Property| -> Result<Option<Border>, LayoutError> {
        if tree.has_own_or_model_property(id, key)? {
            tree.border(id, key)
        } else {
            Ok(generic.clone())
        }
    };
    Ok([
        side(Property::BorderTop)?,
        side(Property::BorderRight)?,
        side(Property::BorderBottom)?,
        side(Property::BorderLeft)?,
    ])
}

pub fn border_widths(borders: &Borders) -> Margins {
    let width = |b: &Option<Border>| b.as_ref().map_or(0.0, |b| b.width);
    Margins::new(
        width(&borders[0]),
        width(&borders[1]),
        width(&borders[2]),
        width(&borders[3]),
    )
}

/// Positioned renderers ignore their margins.
pub fn apply_margins(
    tree: &RendererTree,
    id: RendererId,
    rect: &Rect,
    margins: &Margins,
    reverse: bool,
) -> Result<Rect, LayoutError> {
    if tree.is_positioned(id)? {
        return Ok(*rect);
    }
    Ok(margins.apply_to(rect, reverse))
}

pub fn apply_border_box(rect: &Rect, borders: &Borders, reverse: bool) -> Rect {
    border_widths(borders).apply_to(rect, reverse)
}

pub fn apply_paddings(rect: &Rect, paddings: &Margins, reverse: bool) -> Rect {
    paddings.apply_to(rect, reverse)
}

/// The rectangle inside margins, borders and paddings.
pub fn inner_area(tree: &RendererTree, id: RendererId, rect: &Rect) -> Result<Rect, LayoutError> {
    let rect = apply_margins(tree, id, rect, &margins(tree, id)?, false)?;
    let rect = apply_border_box(&rect, &borders(tree, id)?, false);
    Ok(apply_paddings(&rect, &paddings(tree, id)?, false))
}

/// Resolved box model of one renderer, captured at the start of layout so
/// the same values are used to shrink and to grow back.
#[derive(Debug, Clone)]
pub struct BoxModel {
    pub margins: Margins,
    pub borders: Borders,
    pub paddings: Margins,
}

impl BoxModel {
    pub fn resolve(tree: &RendererTree, id: RendererId) -> Result<Self, LayoutError> {
        Ok(Self {
            margins: margins(tree, id)?,
            borders: borders(tree, id)?,
            paddings: paddings(tree, id)?,
        })
    }

    /// Grows a padding-reversed occupied box back out through the border
    /// and margins.
    pub fn outer(&self, tree: &RendererTree, id: RendererId, rect: &Rect) -> Result<Rect, LayoutError> {
        let rect = apply_border_box(rect, &self.borders, true);
        apply_margins(tree, id, &rect, &self.margins, true)
    }
}
