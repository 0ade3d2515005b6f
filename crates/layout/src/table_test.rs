use crate::config::LayoutConfig;
use crate::document::Document;
use crate::element::{Element, Table};
use crate::output::{DrawOp, RecordingDocument};
use crate::test_utils::{assert_close, document};
use quire_types::Rect;

fn cell(row: usize, column: usize) -> Element {
    Element::cell_with_text(format!("{}-{}", row, column))
}

fn row(index: usize, columns: usize) -> Vec<Element> {
    (0..columns).map(|column| cell(index, column)).collect()
}

fn with_bands(columns: usize, header: bool, footer: bool) -> Table {
    let table = Table::new(columns);
    if header {
        table.add_header_cell(Element::cell_with_text("H"));
    }
    if footer {
        table.add_footer_cell(Element::cell_with_text("F"));
    }
    table
}

/// All body rows added up front, laid out in one call.
fn render_at_once(table: Table, rows: usize) -> RecordingDocument {
    let columns = table.column_count();
    for index in 0..rows {
        for cell in row(index, columns) {
            table.add_cell(cell);
        }
    }
    let mut doc = document(200.0, 120.0, 10.0);
    doc.add(&table).unwrap();
    doc.close().unwrap()
}

/// Rows streamed one by one, flushing `flushes_after(row)` times after each.
fn render_streamed(table: Table, rows: usize, flushes_after: impl Fn(usize) -> usize) -> RecordingDocument {
    let columns = table.column_count();
    let mut doc = document(200.0, 120.0, 10.0);
    let mut large = doc.add_large_table(&table);
    for index in 0..rows {
        large.add_row(row(index, columns));
        for _ in 0..flushes_after(index) {
            large.flush().unwrap();
        }
    }
    large.complete().unwrap();
    doc.close().unwrap()
}

fn page_texts(doc: &RecordingDocument) -> Vec<Vec<String>> {
    doc.pages
        .iter()
        .map(|page| page.texts().map(str::to_string).collect())
        .collect()
}

#[test]
fn test_flushed_table_matches_table_added_at_once() {
    let at_once = render_at_once(Table::new(5), 20);
    let streamed = render_streamed(Table::new(5), 20, |index| {
        if index == 0 || index == 10 { 2 } else { 0 }
    });

    assert_eq!(at_once.pages.len(), 5);
    assert_eq!(at_once.to_json().unwrap(), streamed.to_json().unwrap());
}

#[test]
fn test_flush_schedule_does_not_change_output_with_bands() {
    let configure = || {
        let table = with_bands(1, true, true);
        table.set_skip_first_header(true).set_skip_last_footer(true);
        table
    };
    let every_row = render_streamed(configure(), 350, |_| 1);
    let every_other = render_streamed(configure(), 350, |index| index % 2);
    let at_once = render_at_once(configure(), 350);
    let flush_before_add = {
        let table = configure();
        let mut doc = document(200.0, 120.0, 10.0);
        let mut large = doc.add_large_table(&table);
        for index in 0..350 {
            large.flush().unwrap();
            large.add_row(row(index, 1));
        }
        large.complete().unwrap();
        doc.close().unwrap()
    };

    assert_eq!(every_row.pages.len(), at_once.pages.len());
    assert_eq!(every_row.to_json().unwrap(), at_once.to_json().unwrap());
    assert_eq!(every_other.to_json().unwrap(), at_once.to_json().unwrap());
    assert_eq!(flush_before_add.to_json().unwrap(), every_row.to_json().unwrap());
    let headers = page_texts(&at_once).iter().filter(|texts| texts[0] == "H").count();
    assert_eq!(headers, at_once.pages.len() - 1);
}

#[test]
fn test_repeated_flush_is_idempotent() {
    let run = |flushes: usize| {
        let mut doc = document(200.0, 120.0, 10.0);
        let table = Table::new(2);
        let mut large = doc.add_large_table(&table);
        for index in 0..6 {
            large.add_row(row(index, 2));
        }
        large.add_cell(cell(6, 0));
        for _ in 0..flushes {
            large.flush().unwrap();
            // The incomplete trailing row stays pending.
            assert_eq!(large.pending_cells(), 1);
        }
        large.complete().unwrap();
        doc.close().unwrap()
    };

    assert_eq!(run(1).to_json().unwrap(), run(2).to_json().unwrap());
    assert_eq!(run(0).to_json().unwrap(), run(3).to_json().unwrap());
}

#[test]
fn test_last_row_fits_when_footer_is_skipped() {
    let skipped = with_bands(1, false, true);
    skipped.set_skip_last_footer(true);
    let doc = render_at_once(skipped, 4);
    assert_eq!(page_texts(&doc), vec![vec!["0-0", "1-0", "2-0", "3-0"]]);

    let kept = with_bands(1, false, true);
    let doc = render_at_once(kept, 4);
    assert_eq!(
        page_texts(&doc),
        vec![vec!["0-0", "1-0", "2-0", "F"], vec!["3-0", "F"]]
    );
}

#[test]
fn test_streamed_last_row_is_held_back_for_skipped_footer() {
    let table = with_bands(1, false, true);
    table.set_skip_last_footer(true);

    let doc = render_streamed(table, 4, |_| 1);

    assert_eq!(page_texts(&doc), vec![vec!["0-0", "1-0", "2-0", "3-0"]]);
}

#[test]
fn test_header_repeats_on_every_page() {
    let doc = render_at_once(with_bands(1, true, false), 10);
    let pages = page_texts(&doc);

    assert_eq!(pages.len(), 4);
    assert!(pages.iter().all(|texts| texts[0] == "H"));
    assert_eq!(pages[1][1], "3-0");

    let skipped = with_bands(1, true, false);
    skipped.set_skip_first_header(true);
    let pages = page_texts(&render_at_once(skipped, 10));
    assert_eq!(pages[0][0], "0-0");
    assert_eq!(pages[1][0], "H");
}

#[test]
fn test_cells_fill_rows_by_colspan() {
    let table = Table::new(3);
    table
        .add_cell(Element::cell_spanning(2).add(Element::paragraph_with_text("wide")))
        .add_cell(Element::cell_with_text("narrow"));
    let mut doc = document(200.0, 120.0, 10.0);
    doc.add(&table).unwrap();
    let out = doc.close().unwrap();

    let xs: Vec<f32> = out.pages[0]
        .ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::ShowText(run) => Some(run.x),
            _ => None,
        })
        .collect();
    // Border 0.5 plus padding 2 inside 60pt columns starting at x = 10.
    assert_close(xs[0], 12.5);
    assert_close(xs[1], 132.5);
}

#[test]
fn test_rows_share_the_tallest_cell_height() {
    let table = Table::new(2);
    table
        .add_cell(Element::cell_with_text("a\nb"))
        .add_cell(Element::cell_with_text("c"));
    let config = LayoutConfig {
        immediate_flush: false,
        ..Default::default()
    };
    let mut doc = Document::with_config(RecordingDocument::new(), config);
    doc.add(&table).unwrap();

    let fragment = doc.tree().children(doc.root()).unwrap()[0];
    let cells: Vec<Rect> = doc
        .tree()
        .children(fragment)
        .unwrap()
        .into_iter()
        .map(|cell| doc.tree().occupied_area(cell).unwrap().bbox)
        .collect();
    assert_eq!(cells.len(), 2);
    // Two lines of 16.2 plus paddings and borders.
    assert_close(cells[0].height, 16.2 + 16.2 + 5.0);
    assert_close(cells[1].height, cells[0].height);
    assert_close(cells[1].y, cells[0].y);
    assert_eq!(doc.close().unwrap().pages.len(), 1);
}
