//! Caller-owned content model.
//!
//! Elements are cheap reference-counted handles. Renderers keep a clone of
//! the handle to read the element's properties but never own its content.
use quire_style::{
    Border, ListSymbol, Margins, Position, Property, PropertyBag, PropertyValue, UnitValue,
};
use quire_types::Color;
use std::cell::{Ref, RefCell};
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub name: String,
    pub width: f32,
    pub height: f32,
}

/// Columns, repeated rows and body cells of a table.
#[derive(Debug, Clone, Default)]
pub struct TableModel {
    pub columns: Vec<Option<UnitValue>>,
    pub header: Vec<Element>,
    pub footer: Vec<Element>,
    pub body: Vec<Element>,
    pub skip_first_header: bool,
    pub skip_last_footer: bool,
}

impl TableModel {
    pub fn column_count(&self) -> usize {
        self.columns.len().max(1)
    }
}

#[derive(Debug, Clone)]
pub enum ElementKind {
    Div,
    Paragraph,
    Text(String),
    Image(ImageData),
    List,
    ListItem,
    Cell { colspan: usize },
    Table(TableModel),
}

impl ElementKind {
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Div => "Div",
            ElementKind::Paragraph => "Paragraph",
            ElementKind::Text(_) => "Text",
            ElementKind::Image(_) => "Image",
            ElementKind::List => "List",
            ElementKind::ListItem => "ListItem",
            ElementKind::Cell { .. } => "Cell",
            ElementKind::Table(_) => "Table",
        }
    }
}

#[derive(Debug)]
pub struct ElementData {
    pub kind: ElementKind,
    pub properties: PropertyBag,
    pub children: Vec<Element>,
}

/// Property access shared by model elements.
pub trait PropertyContainer {
    /// Own value if present, else the element-type default.
    fn property(&self, key: Property) -> Option<PropertyValue>;
    /// The raw stored value, including an explicit `PropertyValue::None`.
    fn own_property(&self, key: Property) -> Option<PropertyValue>;
    fn has_property(&self, key: Property) -> bool;
    fn has_own_property(&self, key: Property) -> bool;
    fn set_property(&self, key: Property, value: PropertyValue);
    fn delete_own_property(&self, key: Property);
    fn default_property(&self, key: Property) -> Option<PropertyValue>;
}

#[derive(Debug, Clone)]
pub struct Element(Rc<RefCell<ElementData>>);

impl Element {
    pub fn new(kind: ElementKind) -> Self {
        Self(Rc::new(RefCell::new(ElementData {
            kind,
            properties: PropertyBag::new(),
            children: Vec::new(),
        })))
    }

    pub fn div() -> Self {
        Self::new(ElementKind::Div)
    }

    pub fn paragraph() -> Self {
        Self::new(ElementKind::Paragraph)
    }

    pub fn paragraph_with_text(text: impl Into<String>) -> Self {
        Self::paragraph().add(Self::text(text))
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(ElementKind::Text(text.into()))
    }

    pub fn image(name: impl Into<String>, width: f32, height: f32) -> Self {
        Self::new(ElementKind::Image(ImageData {
            name: name.into(),
            width,
            height,
        }))
    }

    pub fn list() -> Self {
        Self::new(ElementKind::List)
    }

    pub fn list_item() -> Self {
        Self::new(ElementKind::ListItem)
    }

    /// A list item holding a single paragraph of text.
    pub fn list_item_with_text(text: impl Into<String>) -> Self {
        Self::list_item().add(Self::paragraph_with_text(text))
    }

    pub fn cell() -> Self {
        Self::cell_spanning(1)
    }

    pub fn cell_spanning(colspan: usize) -> Self {
        Self::new(ElementKind::Cell {
            colspan: colspan.max(1),
        })
    }

    pub fn cell_with_text(text: impl Into<String>) -> Self {
        Self::cell().add(Self::paragraph_with_text(text))
    }

    /// Appends a child and returns the handle for chaining.
    pub fn add(self, child: Element) -> Self {
        self.push(child);
        self
    }

    pub fn push(&self, child: Element) {
        self.0.borrow_mut().children.push(child);
    }

    /// Sets a property and returns the handle for chaining.
    pub fn with(self, key: Property, value: impl Into<PropertyValue>) -> Self {
        self.set_property(key, value.into());
        self
    }

    pub fn with_margins(self, margins: Margins) -> Self {
        self.set_margins(margins);
        self
    }

    pub fn with_padding(self, padding: Margins) -> Self {
        self.set_padding(padding);
        self
    }

    pub fn set_margins(&self, m: Margins) {
        self.set_property(Property::MarginTop, m.top.into());
        self.set_property(Property::MarginRight, m.right.into());
        self.set_property(Property::MarginBottom, m.bottom.into());
        self.set_property(Property::MarginLeft, m.left.into());
    }

    pub fn set_padding(&self, p: Margins) {
        self.set_property(Property::PaddingTop, p.top.into());
        self.set_property(Property::PaddingRight, p.right.into());
        self.set_property(Property::PaddingBottom, p.bottom.into());
        self.set_property(Property::PaddingLeft, p.left.into());
    }

    /// `None` removes the border even where the element type has one by default.
    pub fn set_border(&self, border: Option<Border>) {
        self.set_property(Property::Border, border.into());
    }

    pub fn set_width(&self, width: UnitValue) {
        self.set_property(Property::Width, width.into());
    }

    pub fn set_height(&self, height: UnitValue) {
        self.set_property(Property::Height, height.into());
    }

    pub fn data(&self) -> Ref<'_, ElementData> {
        self.0.borrow()
    }

    pub fn kind_name(&self) -> &'static str {
        self.0.borrow().kind.name()
    }

    pub fn children(&self) -> Vec<Element> {
        self.0.borrow().children.clone()
    }

    pub fn colspan(&self) -> usize {
        match self.0.borrow().kind {
            ElementKind::Cell { colspan } => colspan,
            _ => 1,
        }
    }

    pub fn table_model(&self) -> Option<TableModel> {
        match &self.0.borrow().kind {
            ElementKind::Table(model) => Some(model.clone()),
            _ => None,
        }
    }

    pub(crate) fn update_table<R>(&self, f: impl FnOnce(&mut TableModel) -> R) -> Option<R> {
        match &mut self.0.borrow_mut().kind {
            ElementKind::Table(model) => Some(f(model)),
            _ => None,
        }
    }

    pub fn ptr_eq(&self, other: &Element) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PropertyContainer for Element {
    fn property(&self, key: Property) -> Option<PropertyValue> {
        match self.own_property(key) {
            Some(value) => value.into_option(),
            None => self.default_property(key),
        }
    }

    fn own_property(&self, key: Property) -> Option<PropertyValue> {
        self.0.borrow().properties.get(key).cloned()
    }

    fn has_property(&self, key: Property) -> bool {
        self.property(key).is_some()
    }

    fn has_own_property(&self, key: Property) -> bool {
        self.0.borrow().properties.contains(key)
    }

    fn set_property(&self, key: Property, value: PropertyValue) {
        self.0.borrow_mut().properties.set(key, value);
    }

    fn delete_own_property(&self, key: Property) {
        self.0.borrow_mut().properties.remove(key);
    }

    fn default_property(&self, key: Property) -> Option<PropertyValue> {
        let data = self.0.borrow();
        match (&data.kind, key) {
            (ElementKind::Paragraph, Property::MarginTop | Property::MarginBottom) => {
                Some(PropertyValue::Float(4.0))
            }
            (ElementKind::Paragraph, Property::Leading) => {
                Some(PropertyValue::Leading(quire_style::Leading::Multiplied(1.35)))
            }
            (ElementKind::Cell { .. }, Property::Border) => Some(PropertyValue::Border(
                Border::new(quire_style::BorderStyle::Solid, 0.5, Color::black()),
            )),
            (
                ElementKind::Cell { .. },
                Property::PaddingTop
                | Property::PaddingRight
                | Property::PaddingBottom
                | Property::PaddingLeft,
            ) => Some(PropertyValue::Float(2.0)),
            (ElementKind::List, Property::ListSymbol) => {
                Some(PropertyValue::ListSymbol(ListSymbol::default()))
            }
            (ElementKind::List, Property::ListStart) => Some(PropertyValue::Int(1)),
            (
                _,
                Property::MarginTop
                | Property::MarginRight
                | Property::MarginBottom
                | Property::MarginLeft
                | Property::PaddingTop
                | Property::PaddingRight
                | Property::PaddingBottom
                | Property::PaddingLeft
                | Property::Top
                | Property::Bottom
                | Property::Left
                | Property::Right,
            ) => Some(PropertyValue::Float(0.0)),
            (_, Property::Position) => Some(PropertyValue::Position(Position::Static)),
            _ => None,
        }
    }
}

/// Builder for table models.
///
/// Body cells flow into rows left to right, wrapping once the spans of a
/// row add up to the column count.
#[derive(Debug, Clone)]
pub struct Table {
    element: Element,
}

impl Table {
    /// A table with `columns` equally sized columns.
    pub fn new(columns: usize) -> Self {
        Self::with_columns(vec![None; columns.max(1)])
    }

    pub fn with_column_widths(widths: Vec<UnitValue>) -> Self {
        Self::with_columns(widths.into_iter().map(Some).collect())
    }

    fn with_columns(columns: Vec<Option<UnitValue>>) -> Self {
        Self {
            element: Element::new(ElementKind::Table(TableModel {
                columns,
                ..Default::default()
            })),
        }
    }

    pub fn add_cell(&self, cell: Element) -> &Self {
        self.element.update_table(|model| model.body.push(cell));
        self
    }

    pub fn add_header_cell(&self, cell: Element) -> &Self {
        self.element.update_table(|model| model.header.push(cell));
        self
    }

    pub fn add_footer_cell(&self, cell: Element) -> &Self {
        self.element.update_table(|model| model.footer.push(cell));
        self
    }

    pub fn set_skip_first_header(&self, skip: bool) -> &Self {
        self.element.update_table(|model| model.skip_first_header = skip);
        self
    }

    pub fn set_skip_last_footer(&self, skip: bool) -> &Self {
        self.element.update_table(|model| model.skip_last_footer = skip);
        self
    }

    pub fn column_count(&self) -> usize {
        self.element
            .table_model()
            .map_or(1, |model| model.column_count())
    }

    pub fn element(&self) -> &Element {
        &self.element
    }
}

impl From<Table> for Element {
    fn from(table: Table) -> Self {
        table.element
    }
}

impl From<&Table> for Element {
    fn from(table: &Table) -> Self {
        table.element.clone()
    }
}

impl From<&Element> for Element {
    fn from(element: &Element) -> Self {
        element.clone()
    }
}

/// Groups cells into rows by column span. Returns the complete rows and the
/// cells of a trailing row that is not full yet.
pub fn flow_rows(cells: &[Element], columns: usize) -> (Vec<Vec<Element>>, Vec<Element>) {
    let columns = columns.max(1);
    let mut rows = Vec::new();
    let mut current = Vec::new();
    let mut used = 0;
    for cell in cells {
        let span = cell.colspan().min(columns);
        if used + span > columns && !current.is_empty() {
            rows.push(std::mem::take(&mut current));
            used = 0;
        }
        current.push(cell.clone());
        used += span;
        if used == columns {
            rows.push(std::mem::take(&mut current));
            used = 0;
        }
    }
    (rows, current)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flow_rows_by_colspan() {
        let cells = vec![
            Element::cell_spanning(2),
            Element::cell(),
            Element::cell(),
            Element::cell_spanning(3),
            Element::cell(),
        ];
        let (rows, rest) = flow_rows(&cells, 3);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].len(), 2);
        assert_eq!(rows[1].len(), 1);
        assert_eq!(rows[2].len(), 1);
        assert_eq!(rest.len(), 1);
    }

    #[test]
    fn test_explicit_none_hides_type_default() {
        let cell = Element::cell();
        assert!(cell.property(Property::Border).is_some());
        cell.set_border(None);
        assert!(cell.property(Property::Border).is_none());
        assert!(cell.has_own_property(Property::Border));
        cell.delete_own_property(Property::Border);
        assert!(cell.property(Property::Border).is_some());
    }

    #[test]
    fn test_table_builder_collects_cells() {
        let table = Table::new(2);
        table
            .add_header_cell(Element::cell_spanning(2))
            .add_cell(Element::cell())
            .add_cell(Element::cell())
            .set_skip_first_header(true);
        let model = table.element().table_model().unwrap();
        assert_eq!(model.header.len(), 1);
        assert_eq!(model.body.len(), 2);
        assert!(model.skip_first_header);
        assert_eq!(table.column_count(), 2);
    }
}
