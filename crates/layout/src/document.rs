//! Document root: places top-level elements page by page.
//!
//! The document owns the renderer tree and the area left on the current
//! page. Every top-level element is laid out into that area; whatever does
//! not fit continues on a fresh page.
use crate::canvas::{DocumentContext, DrawContext};
use crate::config::LayoutConfig;
use crate::element::Element;
use crate::fonts::{FontMetrics, MonospaceMetrics};
use crate::interface::{LayoutArea, LayoutContext, LayoutStatus, RendererKind, TableState};
use crate::node_kind;
use crate::streaming::LargeTable;
use crate::tree::{RendererId, RendererTree};
use crate::{LayoutError, Table};
use quire_style::Property;
use quire_types::Rect;
use std::cell::Cell;

/// The part of the current page still available to the flow.
#[derive(Debug, Clone, Copy)]
struct CurrentArea {
    page: usize,
    bbox: Rect,
    /// Nothing has been placed in this area yet.
    empty: bool,
}

pub struct Document<D: DocumentContext> {
    context: D,
    config: LayoutConfig,
    metrics: Box<dyn FontMetrics>,
    tree: RendererTree,
    root: RendererId,
    current: Option<CurrentArea>,
}

impl<D: DocumentContext> Document<D> {
    pub fn new(context: D) -> Self {
        Self::with_config(context, LayoutConfig::default())
    }

    pub fn with_config(context: D, config: LayoutConfig) -> Self {
        let mut tree = RendererTree::new();
        let root = tree.insert(RendererKind::Root, None, None);
        Self {
            context,
            config,
            metrics: Box::new(MonospaceMetrics::default()),
            tree,
            root,
            current: None,
        }
    }

    pub fn with_metrics(mut self, metrics: impl FontMetrics + 'static) -> Self {
        self.metrics = Box::new(metrics);
        self
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn context(&self) -> &D {
        &self.context
    }

    pub fn tree(&self) -> &RendererTree {
        &self.tree
    }

    pub fn root(&self) -> RendererId {
        self.root
    }

    /// The page the next element will be placed on, if one is open.
    pub fn current_page(&self) -> Option<usize> {
        self.current.map(|area| area.page)
    }

    /// Lays out `element` after everything added so far. Tables go through
    /// the streaming path as a single final fragment.
    pub fn add(&mut self, element: impl Into<Element>) -> Result<(), LayoutError> {
        let element = element.into();
        if element.table_model().is_some() {
            return LargeTable::new(self, element).complete();
        }
        let renderer = self.tree.create_renderer_subtree(&element, Some(self.root))?;
        if self.tree.is_fixed_layout(renderer)? {
            self.tree.add_child(self.root, renderer)?;
        } else {
            self.place(renderer)?;
        }
        self.finish_placement()
    }

    /// Starts a table whose rows are added and committed incrementally.
    pub fn add_large_table(&mut self, table: &Table) -> LargeTable<'_, D> {
        LargeTable::new(self, table.element().clone())
    }

    /// Places pending fixed-position renderers, draws anything still held
    /// in memory and hands back the collaborator.
    pub fn close(mut self) -> Result<D, LayoutError> {
        self.place_positioned()?;
        if !self.config.immediate_flush {
            self.draw(self.root)?;
        }
        log::debug!("Closed document with {} pages", self.context.page_count());
        Ok(self.context)
    }

    /// A table renderer for one fragment of `element`.
    pub(crate) fn table_fragment(&mut self, element: &Element, state: TableState) -> Result<RendererId, LayoutError> {
        let renderer = self.tree.create_renderer_subtree(element, Some(self.root))?;
        *self.tree.node_mut(renderer)?.kind.as_table_mut()? = state;
        Ok(renderer)
    }

    pub(crate) fn finish_placement(&mut self) -> Result<(), LayoutError> {
        self.place_positioned()?;
        self.tree.collect_garbage(&[self.root]);
        Ok(())
    }

    /// Lays out `renderer` until all of it is placed, opening pages as
    /// needed. Returns the area of the last piece, or `None` when the
    /// element could not be placed even when forced.
    pub(crate) fn place(&mut self, renderer: RendererId) -> Result<Option<LayoutArea>, LayoutError> {
        let mut current = renderer;
        let mut forced = false;
        loop {
            let area = self.ensure_area()?;
            let area_full = Cell::new(false);
            let ctx = LayoutContext::new(
                LayoutArea::new(area.page, area.bbox),
                self.metrics.as_ref(),
                &area_full,
            );
            let result = node_kind::layout(&mut self.tree, current, ctx)?;
            match result.status {
                LayoutStatus::Full => {
                    let placed = result.split_renderer.unwrap_or(current);
                    let occupied = result.area()?;
                    self.commit(placed)?;
                    self.consume(occupied, area_full.get());
                    return Ok(Some(occupied));
                }
                LayoutStatus::Partial => {
                    let (Some(split), Some(overflow)) = (result.split_renderer, result.overflow_renderer) else {
                        return Err(LayoutError::Generic(format!(
                            "Partial result of {} carries no split",
                            current
                        )));
                    };
                    self.commit(split)?;
                    self.current = None;
                    current = overflow;
                    forced = false;
                }
                LayoutStatus::Nothing if area.empty => {
                    if self.tree.is_keep_together(current)? {
                        log::warn!("Element does not fit current area. KeepTogether property will be ignored.");
                        self.tree.set_property(current, Property::KeepTogether, false)?;
                    } else if !forced {
                        log::warn!("Element does not fit current area. Forced placement.");
                        self.tree.set_property(current, Property::ForcedPlacement, true)?;
                        forced = true;
                    } else {
                        log::error!(
                            "Element {} does not fit an empty page even when forced. It will be dropped.",
                            current
                        );
                        return Ok(None);
                    }
                }
                LayoutStatus::Nothing => {
                    current = result.overflow_renderer.unwrap_or(current);
                    self.current = None;
                }
            }
        }
    }

    fn ensure_area(&mut self) -> Result<CurrentArea, LayoutError> {
        if let Some(area) = self.current {
            return Ok(area);
        }
        let (width, height) = self.config.page_size.dimensions_pt();
        let page = self.context.add_page(width, height);
        let bbox = self
            .config
            .page_margins
            .apply_to(&Rect::new(0.0, 0.0, width, height), false);
        let area = CurrentArea {
            page,
            bbox,
            empty: true,
        };
        self.current = Some(area);
        Ok(area)
    }

    /// Shrinks the current area to what is left below `occupied`.
    fn consume(&mut self, occupied: LayoutArea, area_full: bool) {
        if area_full {
            self.current = None;
            return;
        }
        if let Some(area) = self.current.as_mut() {
            area.bbox.height = (occupied.bbox.y - area.bbox.y).max(0.0);
            area.empty = false;
        }
    }

    /// Draws and releases a placed renderer, or keeps it under the root
    /// until `close` when immediate flushing is off.
    fn commit(&mut self, renderer: RendererId) -> Result<(), LayoutError> {
        if self.config.immediate_flush {
            self.draw(renderer)?;
            self.tree.release(renderer)
        } else {
            self.tree.add_child(self.root, renderer)
        }
    }

    fn draw(&mut self, renderer: RendererId) -> Result<(), LayoutError> {
        let tagging = self.config.tagging || self.context.is_tagging_enabled();
        let mut dc = DrawContext::new(&mut self.context).with_tagging(tagging);
        node_kind::draw(&mut self.tree, renderer, &mut dc)
    }

    /// Fixed-position renderers are laid out against the whole page at
    /// their own offsets and drawn on the current page.
    fn place_positioned(&mut self) -> Result<(), LayoutError> {
        let pending = self.tree.positioned_children(self.root)?;
        if pending.is_empty() {
            return Ok(());
        }
        let area = self.ensure_area()?;
        let page_rect = self.config.page_size.to_rect();
        for renderer in pending {
            let area_full = Cell::new(false);
            let ctx = LayoutContext::new(
                LayoutArea::new(area.page, page_rect),
                self.metrics.as_ref(),
                &area_full,
            );
            let result = node_kind::layout(&mut self.tree, renderer, ctx)?;
            if result.is_nothing() {
                log::warn!("Fixed-position element {} does not fit the page. It will not be displayed.", renderer);
            } else {
                let placed = result.split_renderer.unwrap_or(renderer);
                if result.status == LayoutStatus::Partial {
                    log::warn!("Fixed-position element {} is cut at the page edge.", renderer);
                }
                self.draw(placed)?;
                if placed != renderer {
                    self.tree.release(placed)?;
                }
            }
            self.tree.release(renderer)?;
        }
        Ok(())
    }
}
