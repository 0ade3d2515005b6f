use crate::element::{Element, PropertyContainer};
use crate::interface::LayoutStatus;
use crate::test_utils::{assert_close, Fixture};
use quire_style::{Position, Property, VerticalAlignment};
use quire_types::Rect;
use std::f32::consts::FRAC_PI_2;

fn three_paragraphs() -> Element {
    Element::div()
        .add(Element::paragraph_with_text("one"))
        .add(Element::paragraph_with_text("two"))
        .add(Element::paragraph_with_text("three"))
}

#[test]
fn test_children_stack_top_down() {
    let mut fx = Fixture::new();
    let div = fx.build(&three_paragraphs());

    let result = fx.layout(div, Rect::new(0.0, 0.0, 200.0, 300.0));

    assert_eq!(result.status, LayoutStatus::Full);
    let children = fx.tree.children(div).unwrap();
    assert_eq!(children.len(), 3);
    assert_close(fx.bbox(children[0]).top(), 300.0);
    assert_close(fx.bbox(children[1]).top(), fx.bbox(children[0]).y);
    assert_close(fx.bbox(children[2]).top(), fx.bbox(children[1]).y);
    assert_close(fx.bbox(div).height, 3.0 * 24.2);
}

#[test]
fn test_margins_and_paddings_shrink_the_content_box() {
    let mut fx = Fixture::new();
    let element = Element::div()
        .add(Element::paragraph_with_text("x"))
        .with(Property::MarginLeft, 10.0)
        .with(Property::PaddingLeft, 5.0)
        .with(Property::MarginTop, 20.0);
    let div = fx.build(&element);

    fx.layout(div, Rect::new(0.0, 0.0, 200.0, 300.0));

    let paragraph = fx.tree.children(div).unwrap()[0];
    assert_close(fx.bbox(paragraph).x, 15.0);
    assert_close(fx.bbox(paragraph).width, 185.0);
    assert_close(fx.bbox(paragraph).top(), 280.0);
    // The occupied area includes the margins.
    assert_close(fx.bbox(div).x, 0.0);
    assert_close(fx.bbox(div).top(), 300.0);
}

#[test]
fn test_min_height_with_vertical_alignment() {
    for (alignment, expected_y) in [
        (VerticalAlignment::Top, 275.8),
        (VerticalAlignment::Middle, 237.9),
        (VerticalAlignment::Bottom, 200.0),
    ] {
        let mut fx = Fixture::new();
        let element = Element::div()
            .add(Element::paragraph_with_text("a"))
            .with(Property::Height, 100.0)
            .with(Property::VerticalAlignment, alignment);
        let div = fx.build(&element);

        fx.layout(div, Rect::new(0.0, 0.0, 200.0, 300.0));

        assert_close(fx.bbox(div).height, 100.0);
        let paragraph = fx.tree.children(div).unwrap()[0];
        assert_close(fx.bbox(paragraph).y, expected_y);
    }
}

#[test]
fn test_split_when_children_overflow() {
    let mut fx = Fixture::new();
    let div = fx.build(&three_paragraphs());

    let result = fx.layout(div, Rect::new(0.0, 0.0, 200.0, 60.0));

    assert_eq!(result.status, LayoutStatus::Partial);
    let split = result.split_renderer.unwrap();
    let overflow = result.overflow_renderer.unwrap();
    assert_eq!(fx.texts(split), vec!["one", "two"]);
    assert_eq!(fx.tree.children(overflow).unwrap().len(), 1);
    assert!(result.cause_of_nothing.is_some());
}

#[test]
fn test_keep_together_block_moves_as_a_whole() {
    let mut fx = Fixture::new();
    let div = fx.build(&three_paragraphs().with(Property::KeepTogether, true));

    let result = fx.layout(div, Rect::new(0.0, 0.0, 200.0, 60.0));

    assert_eq!(result.status, LayoutStatus::Nothing);
    assert!(result.cause_of_nothing.is_some());
}

#[test]
fn test_forced_placement_is_inherited_by_children() {
    let mut fx = Fixture::new();
    let div = fx.build(&three_paragraphs().with(Property::ForcedPlacement, true));

    let result = fx.layout(div, Rect::new(0.0, 0.0, 200.0, 60.0));

    // The last paragraph forces its first line below the area bottom.
    assert_eq!(result.status, LayoutStatus::Full);
    assert!(fx.area_full());
    assert_eq!(fx.texts(div), vec!["one", "two", "three"]);
    assert!(fx.bbox(div).y < 0.0);
}

#[test]
fn test_fixed_position_uses_offsets() {
    let mut fx = Fixture::new();
    let element = Element::div()
        .add(Element::paragraph_with_text("fixed"))
        .with(Property::Position, Position::Fixed)
        .with(Property::Left, 50.0)
        .with(Property::Bottom, 100.0)
        .with(Property::Width, 80.0);
    let div = fx.build(&element);

    // Fixed renderers are kept out of the normal flow of the root.
    assert!(fx.tree.children(fx.root).unwrap().is_empty());
    assert_eq!(fx.tree.positioned_children(fx.root).unwrap(), vec![div]);

    fx.layout(div, Rect::new(0.0, 0.0, 400.0, 400.0));

    let bbox = fx.bbox(div);
    assert_close(bbox.x, 50.0);
    assert_close(bbox.y, 100.0);
    assert_close(bbox.width, 80.0);
}

#[test]
fn test_rotation_swaps_occupied_dimensions() {
    let mut fx = Fixture::new();
    let element = Element::div()
        .add(Element::paragraph_with_text("ab"))
        .with(Property::RotationAngle, FRAC_PI_2);
    let div = fx.build(&element);

    let result = fx.layout(div, Rect::new(0.0, 0.0, 200.0, 300.0));

    assert_eq!(result.status, LayoutStatus::Full);
    let bbox = fx.bbox(div);
    assert_close(bbox.width, 24.2);
    assert_close(bbox.height, 200.0);
    assert_close(bbox.top(), 300.0);
    let rotation = fx.tree.node(div).unwrap().rotation.unwrap();
    assert_close(rotation.initial_width, 200.0);
    assert_close(rotation.initial_height, 24.2);
}

#[test]
fn test_rotated_block_that_does_not_fit_returns_nothing() {
    let mut fx = Fixture::new();
    let element = Element::div()
        .add(Element::paragraph_with_text("ab"))
        .with(Property::RotationAngle, FRAC_PI_2);
    let div = fx.build(&element);

    // Rotated, the 200pt wide content needs 200pt of height.
    let result = fx.layout(div, Rect::new(0.0, 0.0, 200.0, 150.0));

    assert_eq!(result.status, LayoutStatus::Nothing);
}

#[test]
fn test_forced_block_breaks_keep_together_child_instead_of_dropping_it() {
    let mut fx = Fixture::new();
    let element = Element::div()
        .add(Element::paragraph_with_text("a\nb\nc\nd\ne\nf\ng").with(Property::KeepTogether, true))
        .add(Element::paragraph_with_text("after"))
        .with(Property::ForcedPlacement, true);
    let div = fx.build(&element);

    let result = fx.layout(div, Rect::new(0.0, 0.0, 200.0, 80.0));

    assert_eq!(result.status, LayoutStatus::Partial);
    let split = result.split_renderer.unwrap();
    let overflow = result.overflow_renderer.unwrap();
    assert_eq!(fx.texts(split), vec!["a", "b", "c", "d"]);
    // The rest of the paragraph and the sibling after it move on.
    assert_eq!(fx.tree.children(overflow).unwrap().len(), 2);
    let next = fx.layout(overflow, Rect::new(0.0, 0.0, 200.0, 200.0));
    assert_eq!(next.status, LayoutStatus::Full);
    assert_eq!(fx.texts(overflow), vec!["e", "f", "g", "after"]);
    // The element itself still asks to be kept together.
    assert_eq!(
        element.children()[0].property(Property::KeepTogether),
        Some(quire_style::PropertyValue::Bool(true))
    );
}

#[test]
fn test_block_without_forcing_moves_keep_together_child_whole() {
    let mut fx = Fixture::new();
    let element = Element::div()
        .add(Element::paragraph_with_text("first"))
        .add(Element::paragraph_with_text("a\nb\nc\nd").with(Property::KeepTogether, true));
    let div = fx.build(&element);

    let result = fx.layout(div, Rect::new(0.0, 0.0, 200.0, 80.0));

    assert_eq!(result.status, LayoutStatus::Partial);
    assert_eq!(fx.texts(result.split_renderer.unwrap()), vec!["first"]);
    assert_eq!(fx.tree.children(result.overflow_renderer.unwrap()).unwrap().len(), 1);
}
