//! Scraping of the task table on the web UI's stage page.
//!
//! The REST API only exposes per-task detail in newer Spark versions, so the
//! table rendered at `/stages/stage/?id=...` is parsed instead. Columns are
//! matched by header text rather than position, since their order differs
//! between Spark releases.

use scraper::{ElementRef, Html, Selector};

use flockwatch_types::TaskRow;

use crate::AdapterError;

/// Element id of the task table on the stage page.
pub const TASK_TABLE_ID: &str = "task-table";

/// Parse the task table out of a stage page.
///
/// Returns an error if the page has no task table.
pub fn parse_task_table(page: &str) -> Result<Vec<TaskRow>, AdapterError> {
    let document = Html::parse_document(page);
    let table_selector = selector("#task-table")?;
    let header_selector = selector("thead th")?;
    let row_selector = selector("tbody tr")?;
    let cell_selector = selector("td")?;

    let table = document
        .select(&table_selector)
        .next()
        .ok_or_else(|| AdapterError::Parse(format!("no element with id '{}'", TASK_TABLE_ID)))?;

    let headers: Vec<String> =
        table.select(&header_selector).map(|th| normalize_header(&cell_text(th))).collect();
    let columns = Columns::locate(&headers);

    let rows = table
        .select(&row_selector)
        .filter_map(|tr| {
            let cells: Vec<String> = tr.select(&cell_selector).map(cell_text).collect();
            // Placeholder rows ("No tasks have started yet") span every column.
            if cells.len() < 2 {
                return None;
            }
            Some(columns.row(&cells))
        })
        .collect();

    Ok(rows)
}

fn selector(css: &'static str) -> Result<Selector, AdapterError> {
    Selector::parse(css).map_err(|e| AdapterError::Parse(format!("bad selector {}: {:?}", css, e)))
}

/// Visible text of an element with whitespace collapsed.
fn cell_text(element: ElementRef<'_>) -> String {
    element.text().flat_map(str::split_whitespace).collect::<Vec<_>>().join(" ")
}

/// Strip sort indicators from a header ("Duration ▾" -> "Duration").
fn normalize_header(header: &str) -> String {
    header.trim_end_matches(|c: char| c == '▾' || c == '▴' || c.is_whitespace()).to_string()
}

/// Column positions of the fields flockwatch keeps.
#[derive(Debug, Default)]
struct Columns {
    index: Option<usize>,
    task_id: Option<usize>,
    status: Option<usize>,
    locality: Option<usize>,
    executor_id: Option<usize>,
    host: Option<usize>,
    launch_time: Option<usize>,
    duration: Option<usize>,
    gc_time: Option<usize>,
    input: Option<usize>,
}

impl Columns {
    fn locate(headers: &[String]) -> Self {
        let find = |names: &[&str]| {
            headers.iter().position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
        };

        Self {
            index: find(&["Index"]),
            task_id: find(&["ID", "Task ID"]),
            status: find(&["Status"]),
            locality: find(&["Locality Level", "Locality"]),
            executor_id: find(&["Executor ID", "Executor ID / Host"]),
            host: find(&["Host"]),
            launch_time: find(&["Launch Time"]),
            duration: find(&["Duration"]),
            gc_time: find(&["GC Time"]),
            input: find(&["Input Size / Records", "Input Size"]),
        }
    }

    fn row(&self, cells: &[String]) -> TaskRow {
        let get = |col: Option<usize>| col.and_then(|i| cells.get(i)).cloned().unwrap_or_default();

        TaskRow {
            index: get(self.index),
            task_id: get(self.task_id),
            status: get(self.status),
            locality: get(self.locality),
            executor_id: get(self.executor_id),
            host: get(self.host),
            launch_time: get(self.launch_time),
            duration: get(self.duration),
            gc_time: get(self.gc_time),
            input: get(self.input),
        }
    }
}
