//! Incremental commit of large tables.
//!
//! Rows are appended to a pending tail. `flush` lays out, draws and releases
//! every complete row that can no longer be affected by what is appended
//! later; `complete` places the rest as the final fragment. The output does
//! not depend on when `flush` is called.
use crate::canvas::DocumentContext;
use crate::document::Document;
use crate::element::{flow_rows, Element};
use crate::interface::TableState;
use crate::LayoutError;

pub struct LargeTable<'a, D: DocumentContext> {
    document: &'a mut Document<D>,
    element: Element,
    pending: Vec<Element>,
    /// No fragment has been committed yet.
    first: bool,
    /// Bottom edge of the last committed fragment when the next fragment
    /// continues directly below it on the same page.
    resume_at: Option<f32>,
}

impl<'a, D: DocumentContext> LargeTable<'a, D> {
    /// Takes over the body cells already added to the table element.
    pub(crate) fn new(document: &'a mut Document<D>, element: Element) -> Self {
        let pending = element
            .update_table(|model| std::mem::take(&mut model.body))
            .unwrap_or_default();
        Self {
            document,
            element,
            pending,
            first: true,
            resume_at: None,
        }
    }

    pub fn add_cell(&mut self, cell: Element) -> &mut Self {
        self.pending.push(cell);
        self
    }

    pub fn add_row(&mut self, cells: impl IntoIterator<Item = Element>) -> &mut Self {
        self.pending.extend(cells);
        self
    }

    /// Cells added but not committed yet.
    pub fn pending_cells(&self) -> usize {
        self.pending.len()
    }

    /// Commits every complete row. The last row is held back while its
    /// placement still depends on whether it ends the table, which is the
    /// case when the footer is skipped after the final row.
    pub fn flush(&mut self) -> Result<(), LayoutError> {
        let Some(model) = self.element.table_model() else {
            return Err(LayoutError::StateMismatch("Table", self.element.kind_name()));
        };
        let (mut rows, mut rest) = flow_rows(&self.pending, model.column_count());
        if rest.is_empty() && model.skip_last_footer && !model.footer.is_empty() {
            if let Some(row) = rows.pop() {
                rest = row;
            }
        }
        if rows.is_empty() {
            log::debug!("Flush of table with {} pending cells has no rows to commit", self.pending.len());
            return Ok(());
        }
        self.pending = rest;
        self.commit(rows, false)
    }

    /// Lays out everything still pending as the final fragment.
    pub fn complete(mut self) -> Result<(), LayoutError> {
        let columns = self.element.table_model().map_or(1, |model| model.column_count());
        let (mut rows, rest) = flow_rows(&self.pending, columns);
        if !rest.is_empty() {
            rows.push(rest);
        }
        self.pending.clear();
        self.commit(rows, true)
    }

    fn commit(&mut self, rows: Vec<Vec<Element>>, last: bool) -> Result<(), LayoutError> {
        log::debug!(
            "Committing {} table rows (first fragment: {}, last fragment: {})",
            rows.len(),
            self.first,
            last
        );
        let state = TableState {
            rows,
            first: self.first,
            last,
            resume_at: self.resume_at,
        };
        let renderer = self.document.table_fragment(&self.element, state)?;
        let placed = self.document.place(renderer)?;
        self.first = false;
        self.resume_at = match placed {
            Some(area) if self.document.current_page() == Some(area.page_number) => Some(area.bbox.y),
            _ => None,
        };
        self.document.finish_placement()
    }
}
