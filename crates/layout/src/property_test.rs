use crate::canvas::{DocumentContext, DrawContext};
use crate::element::Element;
use crate::node_kind;
use crate::output::RecordingDocument;
use crate::test_utils::Fixture;
use crate::LayoutError;
use quire_style::{Property, PropertyValue};
use quire_types::{Color, Rect};

#[test]
fn test_own_value_wins_over_model_and_parent() {
    let mut fx = Fixture::new();
    let p = fx.build(&Element::paragraph_with_text("x").with(Property::FontSize, 14.0));

    assert_eq!(fx.tree.float(p, Property::FontSize).unwrap(), Some(14.0));
    fx.tree.set_property(p, Property::FontSize, 16.0).unwrap();
    assert_eq!(fx.tree.float(p, Property::FontSize).unwrap(), Some(16.0));

    // Deleting removes the own value first, then the model's value.
    fx.tree.delete_property(p, Property::FontSize).unwrap();
    assert_eq!(fx.tree.float(p, Property::FontSize).unwrap(), Some(14.0));
    fx.tree.delete_property(p, Property::FontSize).unwrap();
    assert_eq!(fx.tree.float(p, Property::FontSize).unwrap(), Some(12.0));
}

#[test]
fn test_inherited_keys_resolve_through_ancestors() {
    let mut fx = Fixture::new();
    let red = Color::rgb(255, 0, 0);
    let element = Element::div()
        .add(Element::paragraph_with_text("x"))
        .with(Property::FontColor, red.clone())
        .with(Property::Width, 50.0);
    let div = fx.build(&element);
    let paragraph = fx.tree.children(div).unwrap()[0];
    let text = fx.tree.children(paragraph).unwrap()[0];

    assert_eq!(fx.tree.color(text, Property::FontColor).unwrap(), Some(red));
    assert_eq!(fx.tree.property(text, Property::Width).unwrap(), None);
    assert_eq!(fx.tree.text(text, Property::Font).unwrap(), Some("Helvetica".to_string()));
}

#[test]
fn test_explicit_none_stops_resolution() {
    let mut fx = Fixture::new();
    let cell = fx.build(&Element::cell_with_text("x"));
    assert!(fx.tree.border(cell, Property::Border).unwrap().is_some());

    fx.tree.set_property(cell, Property::Border, PropertyValue::None).unwrap();

    assert_eq!(fx.tree.border(cell, Property::Border).unwrap(), None);
    assert!(!fx.tree.has_property(cell, Property::Border).unwrap());
    assert!(fx.tree.has_own_property(cell, Property::Border).unwrap());
}

#[test]
fn test_paragraph_in_cell_has_no_vertical_margins() {
    let mut fx = Fixture::new();
    let cell = fx.build(
        &Element::cell()
            .add(Element::paragraph_with_text("a"))
            .add(Element::paragraph_with_text("b").with(Property::MarginTop, 6.0)),
    );
    let children = fx.tree.children(cell).unwrap();

    assert_eq!(fx.tree.float(children[0], Property::MarginTop).unwrap(), Some(0.0));
    assert_eq!(fx.tree.float(children[0], Property::MarginBottom).unwrap(), Some(0.0));
    assert_eq!(fx.tree.float(children[1], Property::MarginTop).unwrap(), Some(6.0));

    let outside = fx.build(&Element::paragraph_with_text("c"));
    assert_eq!(fx.tree.float(outside, Property::MarginTop).unwrap(), Some(4.0));
}

#[test]
fn test_mismatched_value_type_is_reported() {
    let mut fx = Fixture::new();
    let p = fx.build(&Element::paragraph_with_text("x").with(Property::FontSize, "large"));

    let error = fx.tree.float(p, Property::FontSize).unwrap_err();

    assert!(matches!(error, LayoutError::InvalidProperty(Property::FontSize, _)));
}

#[test]
fn test_released_renderer_is_unknown() {
    let mut fx = Fixture::new();
    let p = fx.build(&Element::paragraph_with_text("x"));
    let text = fx.tree.children(p).unwrap()[0];

    fx.tree.release(p).unwrap();

    assert!(matches!(fx.tree.node(p), Err(LayoutError::UnknownRenderer(id)) if id == p));
    assert!(!fx.tree.contains(text));
    assert!(fx.tree.children(fx.root).unwrap().is_empty());
}

#[test]
fn test_flushed_renderer_rejects_changes() {
    let mut fx = Fixture::new();
    let p = fx.build(&Element::paragraph_with_text("x"));
    fx.layout(p, Rect::new(0.0, 0.0, 100.0, 100.0));
    let mut output = RecordingDocument::new();
    output.add_page(100.0, 100.0);

    let mut dc = DrawContext::new(&mut output);
    node_kind::draw(&mut fx.tree, p, &mut dc).unwrap();

    assert!(fx.tree.is_flushed(p).unwrap());
    let error = fx.tree.set_property(p, Property::FontSize, 20.0).unwrap_err();
    assert!(matches!(error, LayoutError::RendererFlushed(id) if id == p));
}

#[test]
fn test_garbage_collection_keeps_reachable_renderers() {
    let mut fx = Fixture::new();
    let p = fx.build(&Element::paragraph_with_text("x"));
    let orphan = fx.tree.next_renderer(p).unwrap();
    let before = fx.tree.len();

    let removed = fx.tree.collect_garbage(&[fx.root]);

    assert_eq!(removed, 1);
    assert_eq!(fx.tree.len(), before - 1);
    assert!(!fx.tree.contains(orphan));
    assert!(fx.tree.contains(p));
}

#[test]
fn test_element_properties_are_shared_by_clones() {
    let element = Element::paragraph_with_text("x");
    let alias = element.clone();

    alias.set_margins(quire_style::Margins::all(7.0));

    assert!(element.ptr_eq(&alias));
    assert_eq!(element.data().properties.get(Property::MarginLeft), Some(&PropertyValue::Float(7.0)));
}

#[test]
fn test_model_value_wins_over_inherited_value() {
    let mut fx = Fixture::new();
    let element = Element::div()
        .add(Element::paragraph_with_text("x").with(Property::FontSize, 14.0))
        .with(Property::FontSize, 20.0);
    let div = fx.build(&element);
    let paragraph = fx.tree.children(div).unwrap()[0];
    let text = fx.tree.children(paragraph).unwrap()[0];

    assert_eq!(fx.tree.float(div, Property::FontSize).unwrap(), Some(20.0));
    assert_eq!(fx.tree.float(paragraph, Property::FontSize).unwrap(), Some(14.0));
    // Inheritance continues from the nearest ancestor that has a value.
    assert_eq!(fx.tree.float(text, Property::FontSize).unwrap(), Some(14.0));
}
