use crate::canvas::{DrawContext, TagRole};
use crate::element::ElementKind;
use crate::interface::{LayoutArea, LayoutContext, LayoutResult};
use crate::tree::{RendererId, RendererTree};
use crate::LayoutError;
use quire_types::{Rect, EPS};

fn image_data(tree: &RendererTree, id: RendererId) -> Result<(String, f32, f32), LayoutError> {
    let model = tree
        .model(id)?
        .ok_or_else(|| LayoutError::Generic(format!("Image renderer {} has no element", id)))?;
    let data = model.data();
    match &data.kind {
        ElementKind::Image(image) => Ok((image.name.clone(), image.width, image.height)),
        other => Err(LayoutError::StateMismatch("Image", other.name())),
    }
}

/// Images are atomic: they fit whole or not at all.
pub fn layout(tree: &mut RendererTree, id: RendererId, ctx: LayoutContext) -> Result<LayoutResult, LayoutError> {
    let (_, width, height) = image_data(tree, id)?;
    let bbox = ctx.area.bbox;
    if width > bbox.width + EPS || height > bbox.height + EPS {
        return Ok(LayoutResult::nothing(id, id));
    }
    let area = LayoutArea::new(
        ctx.area.page_number,
        Rect::new(bbox.x, bbox.top() - height, width, height),
    );
    tree.set_occupied_area(id, area)?;
    Ok(LayoutResult::full(area))
}

pub fn draw(tree: &mut RendererTree, id: RendererId, dc: &mut DrawContext) -> Result<(), LayoutError> {
    let (name, _, _) = image_data(tree, id)?;
    let area = tree.occupied_area(id)?;
    let tagged = dc.open_tag(area.page_number, TagRole::Figure)?;
    dc.canvas(area.page_number)?.draw_image(&name, area.bbox);
    dc.close_tag(area.page_number, tagged)?;
    tree.node_mut(id)?.flushed = true;
    Ok(())
}
