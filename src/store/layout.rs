//! Column widths and row heights derived from the sheet contents.

use super::table::Table;
use crate::models::{COLUMN_COUNT, Column};

/// Fixed width of the task type column; its text wraps instead.
pub const TASK_TYPE_WIDTH: f64 = 30.0;
/// Characters per wrapped line in the task type column.
pub const WRAP_CHARS: usize = 30;
pub const LINE_HEIGHT: f64 = 15.0;
pub const MIN_ROW_HEIGHT: f64 = 15.0;
const WIDTH_PADDING: usize = 2;

/// Presentation sizes applied to the payment records sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    /// Width of every column, in sheet order.
    pub column_widths: [f64; COLUMN_COUNT],
    /// Height of every data row, in stored order.
    pub row_heights: Vec<f64>,
}

impl SheetLayout {
    pub fn for_table(table: &Table) -> Self {
        let column_widths = Column::ALL.map(|column| column_width(table, column));
        let row_heights = table
            .rows()
            .iter()
            .map(|row| row_height(&row.get(Column::TaskType).text()))
            .collect();

        Self {
            column_widths,
            row_heights,
        }
    }

    pub fn column_width(&self, column: Column) -> f64 {
        self.column_widths[column.index()]
    }
}

fn column_width(table: &Table, column: Column) -> f64 {
    if column == Column::TaskType {
        return TASK_TYPE_WIDTH;
    }
    let longest = table
        .rows()
        .iter()
        .map(|row| row.get(column).text().chars().count())
        .chain(std::iter::once(column.header().chars().count()))
        .max()
        .unwrap_or(0);
    (longest + WIDTH_PADDING) as f64
}

fn row_height(task_type: &str) -> f64 {
    let lines = task_type.chars().count().div_ceil(WRAP_CHARS);
    MIN_ROW_HEIGHT.max(lines as f64 * LINE_HEIGHT)
}
