use quire::{DrawOp, Document, LayoutConfig, Margins, PageSize, RecordingDocument, TagRole};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Config for `width` x `height` pages with `margin` on every side.
pub fn config(width: f32, height: f32, margin: f32) -> LayoutConfig {
    LayoutConfig {
        page_size: PageSize::Custom { width, height },
        page_margins: Margins::all(margin),
        ..Default::default()
    }
}

pub fn document(width: f32, height: f32, margin: f32) -> Document<RecordingDocument> {
    init_logger();
    Document::with_config(RecordingDocument::new(), config(width, height, margin))
}

/// Text shown on every page, page by page.
pub fn page_texts(doc: &RecordingDocument) -> Vec<Vec<String>> {
    doc.pages
        .iter()
        .map(|page| page.texts().map(str::to_string).collect())
        .collect()
}

/// The first text run showing `text`, as (page, x, y).
pub fn find_run(doc: &RecordingDocument, text: &str) -> Option<(usize, f32, f32)> {
    doc.pages.iter().enumerate().find_map(|(index, page)| {
        page.ops.iter().find_map(|op| match op {
            DrawOp::ShowText(run) if run.text == text => Some((index + 1, run.x, run.y)),
            _ => None,
        })
    })
}

/// Roles of every tag opened on `ops`, in order.
pub fn opened_tags(ops: &[DrawOp]) -> Vec<TagRole> {
    ops.iter()
        .filter_map(|op| match op {
            DrawOp::OpenTag { role } => Some(*role),
            _ => None,
        })
        .collect()
}

pub fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-3,
        "expected {} but got {}",
        expected,
        actual
    );
}
