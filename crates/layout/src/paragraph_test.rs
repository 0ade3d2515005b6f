use crate::element::{Element, PropertyContainer};
use crate::interface::LayoutStatus;
use crate::nodes::paragraph::line;
use crate::test_utils::{assert_close, Fixture};
use quire_style::{Property, PropertyValue, TextAlignment};
use quire_types::Rect;

fn lines(fx: &Fixture, paragraph: crate::RendererId) -> Vec<crate::RendererId> {
    fx.tree.node(paragraph).unwrap().kind.as_paragraph().unwrap().lines.clone()
}

#[test]
fn test_single_line_paragraph_geometry() {
    let mut fx = Fixture::new();
    let p = fx.build(&Element::paragraph_with_text("Hello world"));

    let result = fx.layout(p, Rect::new(0.0, 0.0, 200.0, 100.0));

    assert_eq!(result.status, LayoutStatus::Full);
    let bbox = fx.bbox(p);
    // 4pt margins around one 12pt line with 1.35 leading.
    assert_close(bbox.top(), 100.0);
    assert_close(bbox.height, 4.0 + 16.2 + 4.0);
    assert_eq!(fx.texts(p), vec!["Hello world"]);

    let first = lines(&fx, p)[0];
    let line_box = fx.bbox(first);
    assert_close(line_box.width, 66.0);
    assert_close(line_box.top(), 96.0 - 2.1);
}

#[test]
fn test_wraps_at_spaces() {
    let mut fx = Fixture::new();
    let p = fx.build(&Element::paragraph_with_text("aaaa bbbb cccc"));

    let result = fx.layout(p, Rect::new(0.0, 0.0, 60.0, 200.0));

    assert_eq!(result.status, LayoutStatus::Full);
    assert_eq!(fx.texts(p), vec!["aaaa bbbb", "cccc"]);
    let lines = lines(&fx, p);
    let first = line::y_line(&fx.tree, lines[0]).unwrap();
    let second = line::y_line(&fx.tree, lines[1]).unwrap();
    assert_close(first - second, 16.2);
}

#[test]
fn test_newline_ends_line() {
    let mut fx = Fixture::new();
    let p = fx.build(&Element::paragraph_with_text("ab\ncd"));

    fx.layout(p, Rect::new(0.0, 0.0, 200.0, 200.0));

    assert_eq!(fx.texts(p), vec!["ab", "cd"]);
}

#[test]
fn test_long_word_breaks_between_characters() {
    let mut fx = Fixture::new();
    let p = fx.build(&Element::paragraph_with_text("abcdefgh"));

    fx.layout(p, Rect::new(0.0, 0.0, 30.0, 200.0));

    assert_eq!(fx.texts(p), vec!["abcde", "fgh"]);
}

#[test]
fn test_justified_stretches_wrapped_lines_only() {
    let mut fx = Fixture::new();
    let element = Element::paragraph_with_text("aaaa bbbb cccc").with(Property::TextAlignment, TextAlignment::Justified);
    let p = fx.build(&element);

    fx.layout(p, Rect::new(0.0, 0.0, 60.0, 200.0));

    let lines = lines(&fx, p);
    assert_close(fx.bbox(lines[0]).width, 60.0);
    assert_close(fx.bbox(lines[1]).width, 24.0);
    let first_text = fx.tree.children(lines[0]).unwrap()[0];
    assert_close(fx.tree.node(first_text).unwrap().kind.as_text().unwrap().word_spacing, 6.0);
}

#[test]
fn test_right_and_center_alignment_move_the_line() {
    for (alignment, expected_x) in [(TextAlignment::Right, 88.0), (TextAlignment::Center, 44.0)] {
        let mut fx = Fixture::new();
        let p = fx.build(&Element::paragraph_with_text("ab").with(Property::TextAlignment, alignment));

        fx.layout(p, Rect::new(0.0, 0.0, 100.0, 100.0));

        let line = lines(&fx, p)[0];
        assert_close(fx.bbox(line).x, expected_x);
    }
}

#[test]
fn test_first_line_indent_applies_to_first_line_only() {
    let mut fx = Fixture::new();
    let element = Element::paragraph_with_text("aaaa bbbb cccc").with(Property::FirstLineIndent, 12.0);
    let p = fx.build(&element);

    fx.layout(p, Rect::new(0.0, 0.0, 60.0, 200.0));

    assert_eq!(fx.texts(p), vec!["aaaa", "bbbb cccc"]);
    let lines = lines(&fx, p);
    assert_close(fx.bbox(lines[0]).x, 12.0);
    assert_close(fx.bbox(lines[1]).x, 0.0);
}

#[test]
fn test_split_across_areas() {
    let mut fx = Fixture::new();
    let element = Element::paragraph_with_text("aaaa bbbb cccc dddd").with(Property::FirstLineIndent, 6.0);
    let p = fx.build(&element);

    let result = fx.layout(p, Rect::new(0.0, 0.0, 30.0, 40.0));

    assert_eq!(result.status, LayoutStatus::Partial);
    let split = result.split_renderer.unwrap();
    let overflow = result.overflow_renderer.unwrap();
    assert_eq!(fx.texts(split), vec!["aaaa", "bbbb"]);
    // The overflow continues mid-paragraph without the first-line indent.
    assert_eq!(fx.tree.float(overflow, Property::FirstLineIndent).unwrap(), Some(0.0));
    assert_close(result.area().unwrap().bbox.top(), 40.0);

    let next = fx.layout(overflow, Rect::new(0.0, 0.0, 30.0, 200.0));
    assert_eq!(next.status, LayoutStatus::Full);
    assert_eq!(fx.texts(overflow), vec!["cccc", "dddd"]);
}

#[test]
fn test_keep_together_fails_instead_of_splitting() {
    let mut fx = Fixture::new();
    let element = Element::paragraph_with_text("aaaa bbbb cccc dddd").with(Property::KeepTogether, true);
    let p = fx.build(&element);

    let result = fx.layout(p, Rect::new(0.0, 0.0, 30.0, 40.0));

    assert_eq!(result.status, LayoutStatus::Nothing);
    assert_eq!(result.overflow_renderer, Some(p));
}

#[test]
fn test_forced_placement_guarantees_progress() {
    let mut fx = Fixture::new();
    let plain = fx.build(&Element::paragraph_with_text("abc"));
    let result = fx.layout(plain, Rect::new(0.0, 0.0, 100.0, 5.0));
    assert_eq!(result.status, LayoutStatus::Nothing);
    assert!(!fx.area_full());

    let forced = fx.build(&Element::paragraph_with_text("abc").with(Property::ForcedPlacement, true));
    let result = fx.layout(forced, Rect::new(0.0, 0.0, 100.0, 5.0));
    assert_ne!(result.status, LayoutStatus::Nothing);
    assert!(fx.area_full());
    assert_eq!(fx.texts(forced), vec!["abc"]);
}

#[test]
fn test_forced_placement_of_word_wider_than_area() {
    let mut fx = Fixture::new();
    let element = Element::paragraph()
        .add(Element::image("logo", 80.0, 10.0))
        .with(Property::ForcedPlacement, true);
    let p = fx.build(&element);

    let result = fx.layout(p, Rect::new(0.0, 0.0, 50.0, 100.0));

    assert_eq!(result.status, LayoutStatus::Full);
    let line = lines(&fx, p)[0];
    assert_close(fx.bbox(line).width, 80.0);
}

#[test]
fn test_columns_flow_lines_left_to_right() {
    let mut fx = Fixture::new();
    let element = Element::paragraph_with_text("aaaa bbbb cccc dddd").with(Property::ColumnCount, 2);
    let p = fx.build(&element);

    let result = fx.layout(p, Rect::new(0.0, 0.0, 60.0, 40.0));

    assert_eq!(result.status, LayoutStatus::Full);
    let lines = lines(&fx, p);
    assert_eq!(lines.len(), 4);
    assert_close(fx.bbox(lines[1]).x, 0.0);
    assert_close(fx.bbox(lines[2]).x, 30.0);
    assert_close(fx.bbox(lines[0]).top(), fx.bbox(lines[2]).top());
}

#[test]
fn test_image_shares_baseline_with_text() {
    let mut fx = Fixture::new();
    let element = Element::paragraph()
        .add(Element::text("ab"))
        .add(Element::image("logo", 20.0, 30.0));
    let p = fx.build(&element);

    fx.layout(p, Rect::new(0.0, 0.0, 200.0, 200.0));

    let line = lines(&fx, p)[0];
    let state = fx.tree.node(line).unwrap().kind.as_line().unwrap().clone();
    assert!(state.contains_image);
    assert_close(state.max_ascent, 30.0);
    assert_close(fx.bbox(line).height, 32.4);
    let image = fx.tree.children(line).unwrap()[1];
    assert_close(fx.bbox(image).y, line::y_line(&fx.tree, line).unwrap());
}

#[test]
fn test_empty_paragraph_occupies_nothing() {
    let mut fx = Fixture::new();
    let element = Element::paragraph();
    let p = fx.build(&element);

    let result = fx.layout(p, Rect::new(0.0, 0.0, 100.0, 100.0));

    assert_eq!(result.status, LayoutStatus::Full);
    assert_close(fx.bbox(p).height, 0.0);
    assert_close(fx.bbox(p).y, 100.0);
    // Only the renderer was changed, never the element.
    assert_eq!(element.property(Property::MarginTop), Some(PropertyValue::Float(4.0)));
}
