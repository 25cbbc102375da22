//! Reading and writing the payment records workbook.
//!
//! The workbook is always rewritten in full: data rows come from the
//! [`Table`], and every piece of presentation (sizes, wrapping, currency
//! formats, status fills, the chart sheet) is derived from it at write time.

use std::fs;
use std::io::Write;
use std::path::Path;

use calamine::{Data, Reader, Xlsx, open_workbook};
use rust_xlsxwriter::{Chart, ChartType, Color, Format, FormatAlign, Workbook, Worksheet};
use tempfile::NamedTempFile;

use super::analysis::ChartSummary;
use super::highlight::{self, Fill};
use super::layout::SheetLayout;
use super::table::{Cell, Row, Table};
use crate::error::{Result, StoreError};
use crate::models::{COLUMN_COUNT, Column, ColumnKind};

pub const RECORDS_SHEET: &str = "Payment Records";
pub const CHART_SHEET: &str = "Payment Chart";
pub const CHART_TITLE: &str = "Payment Status Distribution";
pub const CURRENCY_FORMAT: &str = "#,##0.00 \"TL\"";

/// Reads the data rows of the first sheet.
///
/// The file is always read as xlsx, whatever its extension, since that is
/// the only format [`save`] writes.
pub fn load(path: &Path) -> Result<Table> {
    let mut workbook: Xlsx<_> = open_workbook(path).map_err(calamine::Error::Xlsx)?;
    let sheet_names = workbook.sheet_names().to_vec();
    let Some(primary) = sheet_names.first() else {
        return Err(StoreError::SchemaMismatch { found: Vec::new() });
    };
    let range = workbook
        .worksheet_range(primary)
        .map_err(calamine::Error::Xlsx)?;
    let first_line = range.start().map_or(1, |(row, _)| row as usize + 1);

    let mut rows = range.rows();
    let header: Vec<String> = rows
        .next()
        .map(|cells| cells.iter().map(|data| to_cell(data).text().into_owned()).collect())
        .unwrap_or_default();
    check_header(header)?;

    let mut table = Table::from_rows(rows.enumerate().map(|(offset, cells)| {
        Row::from_cells(
            first_line + 1 + offset,
            std::array::from_fn(|index| cells.get(index).map(to_cell).unwrap_or_default()),
        )
    }));
    table.chart = sheet_names.iter().any(|name| name == CHART_SHEET);

    tracing::debug!(path = %path.display(), rows = table.len(), "loaded payment records");
    Ok(table)
}

/// Renders `table` and replaces the file at `path` with it.
///
/// The new workbook is written to a temporary file next to `path` and
/// renamed over it, so a failed save leaves the previous file intact. An
/// existing file's permissions carry over to its replacement.
pub fn save(path: &Path, table: &Table) -> Result<()> {
    let mut workbook = render(table)?;
    let buffer = workbook.save_to_buffer()?;

    let mut tmp = NamedTempFile::new_in(parent_dir_or_dot(path))?;
    if let Ok(metadata) = fs::metadata(path) {
        tmp.as_file().set_permissions(metadata.permissions())?;
    }
    tmp.write_all(&buffer)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;

    tracing::debug!(path = %path.display(), rows = table.len(), "saved payment records");
    Ok(())
}

fn parent_dir_or_dot(path: &Path) -> &Path {
    path.parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
}

fn check_header(mut found: Vec<String>) -> Result<()> {
    while found.last().is_some_and(|text| text.is_empty()) {
        found.pop();
    }
    if found.len() == COLUMN_COUNT && found.iter().zip(Column::headers()).all(|(a, b)| a == b) {
        Ok(())
    } else {
        Err(StoreError::SchemaMismatch { found })
    }
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(value) if value.is_empty() => Cell::Empty,
        Data::String(value) => Cell::Text(value.clone()),
        Data::Float(value) => Cell::Number(*value),
        Data::Int(value) => Cell::Number(*value as f64),
        other => Cell::Text(other.to_string()),
    }
}

struct Formats {
    plain: Format,
    currency: Format,
    paid: Format,
    pending: Format,
}

impl Formats {
    fn new() -> Self {
        let plain = Format::new()
            .set_text_wrap()
            .set_align(FormatAlign::Top)
            .set_align(FormatAlign::Left);
        Self {
            currency: plain.clone().set_num_format(CURRENCY_FORMAT),
            paid: plain.clone().set_background_color(Color::RGB(Fill::LightGreen.rgb())),
            pending: plain.clone().set_background_color(Color::RGB(Fill::LightRed.rgb())),
            plain,
        }
    }

    fn for_cell(&self, column: Column, cell: &Cell, fill: Option<Fill>) -> &Format {
        match column.kind() {
            ColumnKind::Currency if matches!(cell, Cell::Number(_)) => &self.currency,
            ColumnKind::Status => match fill {
                Some(Fill::LightGreen) => &self.paid,
                Some(Fill::LightRed) => &self.pending,
                None => &self.plain,
            },
            _ => &self.plain,
        }
    }
}

fn render(table: &Table) -> Result<Workbook> {
    let layout = SheetLayout::for_table(table);
    let fills = highlight::fills(table);
    let formats = Formats::new();

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(RECORDS_SHEET)?;

    for column in Column::ALL {
        let col = column.index() as u16;
        sheet.write_string(0, col, column.header())?;
        sheet.set_column_width(col, layout.column_width(column))?;
    }

    for (index, (row, fill)) in table.rows().iter().zip(fills).enumerate() {
        let sheet_row = (row.line() - 1) as u32;
        for column in Column::ALL {
            let cell = row.get(column);
            let format = formats.for_cell(column, cell, fill);
            write_cell(sheet, sheet_row, column.index() as u16, cell, format)?;
        }
        sheet.set_row_height(sheet_row, layout.row_heights[index])?;
    }

    if table.chart {
        render_chart(&mut workbook, &ChartSummary::of(table))?;
    }
    Ok(workbook)
}

fn write_cell(sheet: &mut Worksheet, row: u32, col: u16, cell: &Cell, format: &Format) -> Result<()> {
    match cell {
        Cell::Empty => sheet.write_blank(row, col, format)?,
        Cell::Text(value) => sheet.write_string_with_format(row, col, value, format)?,
        Cell::Number(value) => sheet.write_number_with_format(row, col, *value, format)?,
    };
    Ok(())
}

/// Writes the status/count table and, when there is anything to show, a pie
/// chart over it.
fn render_chart(workbook: &mut Workbook, summary: &ChartSummary) -> Result<()> {
    let sheet = workbook.add_worksheet();
    sheet.set_name(CHART_SHEET)?;
    sheet.write_string(0, 0, "Status")?;
    sheet.write_string(0, 1, "Count")?;
    sheet.write_string(1, 0, "Paid")?;
    sheet.write_number(1, 1, summary.paid as f64)?;
    sheet.write_string(2, 0, "Pending")?;
    sheet.write_number(2, 1, summary.pending as f64)?;

    if summary.is_empty() {
        return Ok(());
    }

    let mut chart = Chart::new(ChartType::Pie);
    chart.title().set_name(CHART_TITLE);
    chart
        .add_series()
        .set_categories((CHART_SHEET, 1, 0, 2, 0))
        .set_values((CHART_SHEET, 1, 1, 2, 1));
    sheet.insert_chart(1, 3, &chart)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_with_trailing_blanks_is_accepted() {
        let mut header: Vec<String> = Column::headers().iter().map(|h| h.to_string()).collect();
        header.push(String::new());
        assert!(check_header(header).is_ok());
    }

    #[test]
    fn test_reordered_header_is_rejected() {
        let mut header: Vec<String> = Column::headers().iter().map(|h| h.to_string()).collect();
        header.swap(2, 3);
        assert!(matches!(
            check_header(header),
            Err(StoreError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_integer_cells_read_as_numbers() {
        assert_eq!(to_cell(&Data::Int(1528)), Cell::Number(1528.0));
        assert_eq!(to_cell(&Data::String(String::new())), Cell::Empty);
    }

    #[test]
    fn test_parent_of_bare_file_name_is_current_dir() {
        assert_eq!(parent_dir_or_dot(Path::new("records.xlsx")), Path::new("."));
        assert_eq!(parent_dir_or_dot(Path::new("data/records.xlsx")), Path::new("data"));
    }
}
