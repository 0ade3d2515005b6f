//! Arena of renderers.
//!
//! The tree owns every renderer. Parent links are plain ids used for
//! property inheritance and for locating the positioning root; ownership
//! always flows through the child lists.
use crate::element::{flow_rows, Element, ElementKind, PropertyContainer};
use crate::interface::{
    LayoutArea, LayoutStatus, ParagraphState, RendererKind, TableState, TextState,
};
use crate::node_kind::NodeKind;
use crate::LayoutError;
use quire_style::{
    Border, HorizontalAlignment, Leading, Position, Property, PropertyBag, PropertyValue,
    StyleError, TextAlignment, UnitValue,
};
use quire_types::{AffineTransform, Color, Point, Rect};
use std::collections::{HashMap, HashSet};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RendererId(u64);

impl fmt::Display for RendererId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Geometry captured before a rotated renderer replaced its occupied area
/// with the bounding box of the rotated content.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub angle: f32,
    pub initial_width: f32,
    pub initial_height: f32,
}

#[derive(Debug, Clone)]
pub struct RendererNode {
    pub kind: RendererKind,
    pub model: Option<Element>,
    pub properties: PropertyBag,
    pub parent: Option<RendererId>,
    pub children: Vec<RendererId>,
    /// Fixed-position renderers routed to this node.
    pub positioned: Vec<RendererId>,
    pub occupied_area: Option<LayoutArea>,
    pub rotation: Option<RotationState>,
    pub flushed: bool,
}

impl RendererNode {
    fn new(kind: RendererKind, model: Option<Element>, parent: Option<RendererId>) -> Self {
        Self {
            kind,
            model,
            properties: PropertyBag::new(),
            parent,
            children: Vec::new(),
            positioned: Vec::new(),
            occupied_area: None,
            rotation: None,
            flushed: false,
        }
    }
}

#[derive(Debug, Default)]
pub struct RendererTree {
    nodes: HashMap<RendererId, RendererNode>,
    next_id: u64,
}

fn invalid(key: Property) -> impl FnOnce(StyleError) -> LayoutError {
    move |e| LayoutError::InvalidProperty(key, e)
}

impl RendererTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: RendererId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn insert(
        &mut self,
        kind: RendererKind,
        model: Option<Element>,
        parent: Option<RendererId>,
    ) -> RendererId {
        let id = RendererId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, RendererNode::new(kind, model, parent));
        id
    }

    pub fn node(&self, id: RendererId) -> Result<&RendererNode, LayoutError> {
        self.nodes.get(&id).ok_or(LayoutError::UnknownRenderer(id))
    }

    pub fn node_mut(&mut self, id: RendererId) -> Result<&mut RendererNode, LayoutError> {
        self.nodes.get_mut(&id).ok_or(LayoutError::UnknownRenderer(id))
    }

    pub fn kind(&self, id: RendererId) -> Result<NodeKind, LayoutError> {
        Ok(NodeKind::of(&self.node(id)?.kind))
    }

    pub fn parent(&self, id: RendererId) -> Result<Option<RendererId>, LayoutError> {
        Ok(self.node(id)?.parent)
    }

    pub fn children(&self, id: RendererId) -> Result<Vec<RendererId>, LayoutError> {
        Ok(self.node(id)?.children.clone())
    }

    pub fn positioned_children(&self, id: RendererId) -> Result<Vec<RendererId>, LayoutError> {
        Ok(self.node(id)?.positioned.clone())
    }

    pub fn model(&self, id: RendererId) -> Result<Option<Element>, LayoutError> {
        Ok(self.node(id)?.model.clone())
    }

    pub fn occupied_area(&self, id: RendererId) -> Result<LayoutArea, LayoutError> {
        self.node(id)?
            .occupied_area
            .ok_or(LayoutError::NotLaidOut(id))
    }

    pub fn set_occupied_area(&mut self, id: RendererId, area: LayoutArea) -> Result<(), LayoutError> {
        self.node_mut(id)?.occupied_area = Some(area);
        Ok(())
    }

    pub fn is_flushed(&self, id: RendererId) -> Result<bool, LayoutError> {
        Ok(self.node(id)?.flushed)
    }

    // --- Property resolution ---

    /// Resolves a property: own value, then the model element's own value,
    /// then (for inherited keys) the parent's resolved value, then the
    /// renderer-type default, then the model-type default. An explicit
    /// `PropertyValue::None` at any level ends the search.
    pub fn property(&self, id: RendererId, key: Property) -> Result<Option<PropertyValue>, LayoutError> {
        let node = self.node(id)?;
        if let Some(value) = node.properties.get(key) {
            return Ok(value.clone().into_option());
        }
        if let Some(value) = node.model.as_ref().and_then(|m| m.own_property(key)) {
            return Ok(value.into_option());
        }
        if key.is_inherited() {
            if let Some(parent) = node.parent.filter(|p| self.contains(*p)) {
                if let Some(value) = self.property(parent, key)? {
                    return Ok(Some(value));
                }
            }
        }
        self.default_property(id, key)
    }

    pub fn property_or(
        &self,
        id: RendererId,
        key: Property,
        fallback: PropertyValue,
    ) -> Result<PropertyValue, LayoutError> {
        Ok(self.property(id, key)?.unwrap_or(fallback))
    }

    /// The raw value stored on the renderer itself.
    pub fn own_property(&self, id: RendererId, key: Property) -> Result<Option<PropertyValue>, LayoutError> {
        Ok(self.node(id)?.properties.get(key).cloned())
    }

    pub fn has_property(&self, id: RendererId, key: Property) -> Result<bool, LayoutError> {
        Ok(self.property(id, key)?.is_some())
    }

    pub fn has_own_property(&self, id: RendererId, key: Property) -> Result<bool, LayoutError> {
        Ok(self.node(id)?.properties.contains(key))
    }

    pub fn has_own_or_model_property(&self, id: RendererId, key: Property) -> Result<bool, LayoutError> {
        let node = self.node(id)?;
        Ok(node.properties.contains(key)
            || node.model.as_ref().is_some_and(|m| m.has_own_property(key)))
    }

    pub fn set_property(
        &mut self,
        id: RendererId,
        key: Property,
        value: impl Into<PropertyValue>,
    ) -> Result<(), LayoutError> {
        let node = self.node_mut(id)?;
        if node.flushed {
            return Err(LayoutError::RendererFlushed(id));
        }
        node.properties.set(key, value);
        Ok(())
    }

    /// Removes an own value, or the model element's value when the renderer
    /// has none of its own.
    pub fn delete_property(&mut self, id: RendererId, key: Property) -> Result<(), LayoutError> {
        let node = self.node_mut(id)?;
        if node.properties.remove(key).is_none() {
            if let Some(model) = &node.model {
                model.delete_own_property(key);
            }
        }
        Ok(())
    }

    pub fn default_property(&self, id: RendererId, key: Property) -> Result<Option<PropertyValue>, LayoutError> {
        if let Some(value) = self.renderer_default(id, key)? {
            return Ok(Some(value));
        }
        let node = self.node(id)?;
        Ok(node.model.as_ref().and_then(|m| m.default_property(key)))
    }

    fn renderer_default(&self, id: RendererId, key: Property) -> Result<Option<PropertyValue>, LayoutError> {
        let node = self.node(id)?;
        let value = match (&node.kind, key) {
            (RendererKind::Root, Property::Font) => Some(PropertyValue::Text("Helvetica".into())),
            (RendererKind::Root, Property::FontSize) => Some(PropertyValue::Float(12.0)),
            (RendererKind::Root, Property::FontColor) => Some(PropertyValue::Color(Color::black())),
            (RendererKind::Root, Property::TextAlignment) => {
                Some(PropertyValue::TextAlignment(TextAlignment::Left))
            }
            (RendererKind::Paragraph(_), Property::MarginTop | Property::MarginBottom) => {
                let in_cell = match node.parent {
                    Some(parent) => matches!(self.kind(parent), Ok(NodeKind::Cell)),
                    None => false,
                };
                in_cell.then_some(PropertyValue::Float(0.0))
            }
            _ => None,
        };
        Ok(value)
    }

    // --- Typed accessors ---

    pub fn float(&self, id: RendererId, key: Property) -> Result<Option<f32>, LayoutError> {
        self.property(id, key)?
            .map(|v| v.as_float())
            .transpose()
            .map_err(invalid(key))
    }

    pub fn float_or(&self, id: RendererId, key: Property, fallback: f32) -> Result<f32, LayoutError> {
        Ok(self.float(id, key)?.unwrap_or(fallback))
    }

    pub fn int_or(&self, id: RendererId, key: Property, fallback: i32) -> Result<i32, LayoutError> {
        let value = self
            .property(id, key)?
            .map(|v| v.as_int())
            .transpose()
            .map_err(invalid(key))?;
        Ok(value.unwrap_or(fallback))
    }

    pub fn bool_or(&self, id: RendererId, key: Property, fallback: bool) -> Result<bool, LayoutError> {
        let value = self
            .property(id, key)?
            .map(|v| v.as_bool())
            .transpose()
            .map_err(invalid(key))?;
        Ok(value.unwrap_or(fallback))
    }

    pub fn text(&self, id: RendererId, key: Property) -> Result<Option<String>, LayoutError> {
        self.property(id, key)?
            .map(|v| v.as_text().map(str::to_string))
            .transpose()
            .map_err(invalid(key))
    }

    pub fn unit(&self, id: RendererId, key: Property) -> Result<Option<UnitValue>, LayoutError> {
        self.property(id, key)?
            .map(|v| v.as_unit())
            .transpose()
            .map_err(invalid(key))
    }

    pub fn border(&self, id: RendererId, key: Property) -> Result<Option<Border>, LayoutError> {
        self.property(id, key)?
            .map(|v| v.as_border())
            .transpose()
            .map_err(invalid(key))
    }

    pub fn color(&self, id: RendererId, key: Property) -> Result<Option<Color>, LayoutError> {
        self.property(id, key)?
            .map(|v| v.as_color())
            .transpose()
            .map_err(invalid(key))
    }

    pub fn leading(&self, id: RendererId) -> Result<Option<Leading>, LayoutError> {
        self.property(id, Property::Leading)?
            .map(|v| v.as_leading())
            .transpose()
            .map_err(invalid(Property::Leading))
    }

    pub fn position(&self, id: RendererId) -> Result<Position, LayoutError> {
        let value = self
            .property(id, Property::Position)?
            .map(|v| v.as_position())
            .transpose()
            .map_err(invalid(Property::Position))?;
        Ok(value.unwrap_or(Position::Static))
    }

    pub fn text_alignment(&self, id: RendererId) -> Result<TextAlignment, LayoutError> {
        let value = self
            .property(id, Property::TextAlignment)?
            .map(|v| v.as_text_alignment())
            .transpose()
            .map_err(invalid(Property::TextAlignment))?;
        Ok(value.unwrap_or_default())
    }

    /// Resolves a `UnitValue` property, percentages against `base`.
    pub fn retrieve_unit(&self, id: RendererId, key: Property, base: f32) -> Result<Option<f32>, LayoutError> {
        Ok(self.unit(id, key)?.map(|u| u.resolve(base)))
    }

    // --- Predicates ---

    pub fn is_fixed_layout(&self, id: RendererId) -> Result<bool, LayoutError> {
        Ok(self.position(id)? == Position::Fixed)
    }

    /// Placed outside the normal flow, at its own offsets.
    pub fn is_positioned(&self, id: RendererId) -> Result<bool, LayoutError> {
        self.is_fixed_layout(id)
    }

    pub fn is_relative_position(&self, id: RendererId) -> Result<bool, LayoutError> {
        Ok(self.position(id)? == Position::Relative)
    }

    pub fn is_keep_together(&self, id: RendererId) -> Result<bool, LayoutError> {
        self.bool_or(id, Property::KeepTogether, false)
    }

    // --- Structure ---

    /// Appends `child` to the normal flow of `parent`. Fixed-position
    /// children go to the outermost ancestor instead so they are placed
    /// relative to the page.
    pub fn add_child(&mut self, parent: RendererId, child: RendererId) -> Result<(), LayoutError> {
        if self.is_fixed_layout(child)? {
            let mut root = parent;
            while let Some(next) = self.node(root)?.parent.filter(|p| self.contains(*p)) {
                root = next;
            }
            self.node_mut(child)?.parent = Some(root);
            self.node_mut(root)?.positioned.push(child);
        } else {
            self.node_mut(child)?.parent = Some(parent);
            self.node_mut(parent)?.children.push(child);
        }
        Ok(())
    }

    /// Replaces the children of `id`, reparenting each of them.
    pub fn set_children(&mut self, id: RendererId, children: Vec<RendererId>) -> Result<(), LayoutError> {
        for child in &children {
            self.node_mut(*child)?.parent = Some(id);
        }
        self.node_mut(id)?.children = children;
        Ok(())
    }

    pub fn replace_child(
        &mut self,
        parent: RendererId,
        old: RendererId,
        new: RendererId,
    ) -> Result<(), LayoutError> {
        let node = self.node_mut(parent)?;
        if let Some(slot) = node.children.iter_mut().find(|c| **c == old) {
            *slot = new;
        } else {
            node.children.push(new);
        }
        self.node_mut(new)?.parent = Some(parent);
        Ok(())
    }

    /// Builds renderers for `element` and its descendants.
    pub fn create_renderer_subtree(
        &mut self,
        element: &Element,
        parent: Option<RendererId>,
    ) -> Result<RendererId, LayoutError> {
        let kind = match &element.data().kind {
            ElementKind::Div => RendererKind::Block,
            ElementKind::Cell { .. } => RendererKind::Cell,
            ElementKind::Paragraph => RendererKind::Paragraph(ParagraphState::default()),
            ElementKind::Text(text) => RendererKind::Text(TextState {
                text: text.clone(),
                ..Default::default()
            }),
            ElementKind::Image(_) => RendererKind::Image,
            ElementKind::List => RendererKind::List(Default::default()),
            ElementKind::ListItem => RendererKind::ListItem(Default::default()),
            ElementKind::Table(model) => {
                let (mut rows, rest) = flow_rows(&model.body, model.column_count());
                if !rest.is_empty() {
                    rows.push(rest);
                }
                RendererKind::Table(TableState {
                    rows,
                    ..Default::default()
                })
            }
        };
        let id = self.insert(kind, Some(element.clone()), parent);
        if !matches!(element.data().kind, ElementKind::Table(_)) {
            for child in element.children() {
                let child_id = self.create_renderer_subtree(&child, Some(id))?;
                self.add_child(id, child_id)?;
            }
        }
        Ok(id)
    }

    /// A fresh, empty renderer for the same model element and parent.
    pub fn next_renderer(&mut self, id: RendererId) -> Result<RendererId, LayoutError> {
        let node = self.node(id)?;
        let kind = node.kind.fresh();
        let model = node.model.clone();
        let parent = node.parent;
        Ok(self.insert(kind, model, parent))
    }

    /// Creates the split and overflow renderers for `id`, copying the
    /// properties each renderer kind carries over. Callers fill in the
    /// children of both halves.
    pub fn partition(
        &mut self,
        id: RendererId,
        status: LayoutStatus,
    ) -> Result<(RendererId, RendererId), LayoutError> {
        let split = self.next_renderer(id)?;
        let overflow = self.next_renderer(id)?;
        let (kind, own, occupied) = {
            let source = self.node(id)?;
            (source.kind.clone(), source.properties.clone(), source.occupied_area)
        };
        match &kind {
            RendererKind::Paragraph(_) => {
                if self.float_or(id, Property::FirstLineIndent, 0.0)? != 0.0 {
                    self.set_property(overflow, Property::FirstLineIndent, 0.0)?;
                }
            }
            RendererKind::ListItem(state) => {
                let symbol = state.symbol;
                let symbol_area_width = state.symbol_area_width;
                let margin_left = self.property(id, Property::MarginLeft)?;
                let target = if status == LayoutStatus::Nothing { overflow } else { split };
                for half in [split, overflow] {
                    let item = self.node_mut(half)?.kind.as_list_item_mut()?;
                    item.symbol_area_width = symbol_area_width;
                    if half == target {
                        item.symbol = symbol;
                    }
                    if let Some(margin) = margin_left.clone() {
                        self.set_property(half, Property::MarginLeft, margin)?;
                    }
                }
            }
            RendererKind::List(_) => {
                for half in [split, overflow] {
                    self.node_mut(half)?.properties.extend_from(&own);
                    self.node_mut(half)?.kind.as_list_mut()?.symbols_initialized = true;
                }
            }
            RendererKind::Block | RendererKind::Cell => {
                for half in [split, overflow] {
                    self.node_mut(half)?.properties.extend_from(&own);
                }
            }
            _ => {}
        }
        self.node_mut(split)?.occupied_area = occupied;
        Ok((split, overflow))
    }

    /// Removes a drawn renderer and everything it owns.
    pub fn release(&mut self, id: RendererId) -> Result<(), LayoutError> {
        let node = self.nodes.remove(&id).ok_or(LayoutError::UnknownRenderer(id))?;
        if let Some(parent) = node.parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.retain(|c| *c != id);
            parent.positioned.retain(|c| *c != id);
        }
        let mut pending = Self::owned(&node);
        while let Some(next) = pending.pop() {
            if let Some(removed) = self.nodes.remove(&next) {
                pending.extend(Self::owned(&removed));
            }
        }
        Ok(())
    }

    /// Drops every renderer not reachable from `roots`. Renderers abandoned
    /// by attempts that ended in `Nothing`, or replaced by their split and
    /// overflow halves, end up here.
    pub fn collect_garbage(&mut self, roots: &[RendererId]) -> usize {
        let mut reachable = HashSet::new();
        let mut pending: Vec<RendererId> = roots.to_vec();
        while let Some(id) = pending.pop() {
            if !reachable.insert(id) {
                continue;
            }
            if let Some(node) = self.nodes.get(&id) {
                pending.extend(Self::owned(node));
                pending.extend(node.parent);
            }
        }
        let before = self.nodes.len();
        self.nodes.retain(|id, _| reachable.contains(id));
        let removed = before - self.nodes.len();
        if removed > 0 {
            log::trace!("Collected {} unreachable renderers", removed);
        }
        removed
    }

    fn owned(node: &RendererNode) -> Vec<RendererId> {
        let mut owned = node.children.clone();
        owned.extend(&node.positioned);
        match &node.kind {
            RendererKind::Paragraph(state) => owned.extend(&state.lines),
            RendererKind::ListItem(state) => owned.extend(state.symbol),
            _ => {}
        }
        owned
    }

    // --- Geometry ---

    /// Translates the occupied area of `id` and of everything drawn with it.
    pub fn move_renderer(&mut self, id: RendererId, dx: f32, dy: f32) -> Result<(), LayoutError> {
        let node = self.node_mut(id)?;
        if let Some(area) = node.occupied_area.as_mut() {
            area.bbox.move_right(dx).move_up(dy);
        }
        let targets = match &node.kind {
            RendererKind::Paragraph(state) => state.lines.clone(),
            _ => node.children.clone(),
        };
        for child in targets {
            self.move_renderer(child, dx, dy)?;
        }
        Ok(())
    }

    /// The first baseline inside `id`, if it holds any text or images.
    pub fn first_y_line(&self, id: RendererId) -> Result<Option<f32>, LayoutError> {
        let node = self.node(id)?;
        match &node.kind {
            RendererKind::Paragraph(state) => match state.lines.first() {
                Some(line) => self.first_y_line(*line),
                None => Ok(None),
            },
            RendererKind::Line(state) => {
                Ok(node.occupied_area.map(|a| a.bbox.top() - state.max_ascent))
            }
            RendererKind::Text(state) => Ok(node.occupied_area.map(|a| a.bbox.top() - state.ascent)),
            RendererKind::Image => Ok(node.occupied_area.map(|a| a.bbox.y)),
            _ => match node.children.first() {
                Some(child) => self.first_y_line(*child),
                None => Ok(None),
            },
        }
    }

    /// Transform mapping the unrotated content of `id` onto its occupied
    /// area. Identity for renderers without rotation.
    pub fn rotation_transform(&self, id: RendererId) -> Result<AffineTransform, LayoutError> {
        let node = self.node(id)?;
        let (Some(rotation), Some(area)) = (node.rotation, node.occupied_area) else {
            return Ok(AffineTransform::identity());
        };
        let occupied = area.bbox;
        let content = Rect::new(
            occupied.x,
            occupied.top() - rotation.initial_height,
            rotation.initial_width,
            rotation.initial_height,
        );
        let rotate = AffineTransform::rotation(rotation.angle);
        let rotated = rotate.transform_rect(&content);
        Ok(rotate.then(&AffineTransform::translation(
            occupied.x - rotated.x,
            occupied.y - rotated.y,
        )))
    }

    /// The occupied area of `id` in page coordinates, applying the rotation
    /// of every rotated ancestor.
    pub fn absolute_bbox(&self, id: RendererId) -> Result<Rect, LayoutError> {
        let mut points: Vec<Point> = self.occupied_area(id)?.bbox.to_points().to_vec();
        let mut current = self.node(id)?.parent;
        while let Some(ancestor) = current.filter(|a| self.contains(*a)) {
            let node = self.node(ancestor)?;
            if node.rotation.is_some() {
                let transform = self.rotation_transform(ancestor)?;
                points = points.into_iter().map(|p| transform.transform_point(p)).collect();
            }
            current = node.parent;
        }
        Ok(Rect::from_points(&points))
    }

    /// Shifts a laid-out child inside `available_width` according to its
    /// `HorizontalAlignment`.
    pub fn align_child_horizontally(&mut self, child: RendererId, available_width: f32) -> Result<(), LayoutError> {
        let alignment = self
            .property(child, Property::HorizontalAlignment)?
            .map(|v| v.as_horizontal_alignment())
            .transpose()
            .map_err(invalid(Property::HorizontalAlignment))?;
        let free = available_width - self.occupied_area(child)?.bbox.width;
        match alignment {
            Some(HorizontalAlignment::Right) => self.move_renderer(child, free, 0.0),
            Some(HorizontalAlignment::Center) => self.move_renderer(child, free / 2.0, 0.0),
            _ => Ok(()),
        }
    }
}
