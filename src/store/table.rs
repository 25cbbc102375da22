//! In-memory view of the payment records sheet.
//!
//! A [`Table`] lives only for the duration of a single store operation:
//! it is loaded from the workbook, read or mutated, and written back.

use std::borrow::Cow;

use crate::error::{Result, StoreError};
use crate::models::{COLUMN_COUNT, Column, PaymentRecord, PaymentStatus};

/// Worksheet row number of the first data row (the header is row 1).
const FIRST_DATA_ROW: usize = 2;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    fn from_text(value: &str) -> Self {
        if value.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(value.to_string())
        }
    }

    pub fn text(&self) -> Cow<'_, str> {
        match self {
            Cell::Empty => Cow::Borrowed(""),
            Cell::Text(value) => Cow::Borrowed(value),
            Cell::Number(value) => Cow::Owned(value.to_string()),
        }
    }

    /// Numeric value of the cell. Text that parses as a finite number counts.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(value) => Some(*value),
            Cell::Text(value) => value.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            Cell::Empty => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    cells: [Cell; COLUMN_COUNT],
    /// 1-based worksheet row; 0 until the row is placed in a table.
    line: usize,
}

impl Row {
    pub fn from_cells(line: usize, cells: [Cell; COLUMN_COUNT]) -> Self {
        Self { cells, line }
    }

    pub fn from_record(record: &PaymentRecord) -> Self {
        let mut row = Row::default();
        row.set(Column::InvoiceNo, Cell::from_text(&record.invoice_no));
        row.set(Column::TaskType, Cell::from_text(&record.task_type));
        row.set(Column::TariffFee, Cell::Number(record.tariff_fee));
        row.set(Column::GrossFee, Cell::Number(record.gross_fee));
        row.set(Column::VatRate, Cell::Number(record.vat_rate));
        row.set(Column::VatAmount, Cell::Number(record.vat_amount));
        row.set(Column::NetFee, Cell::Number(record.net_fee));
        row.set(Column::CaseDetails, Cell::from_text(&record.case_details));
        row.set(Column::SubmissionDate, Cell::from_text(&record.submission_date));
        row.set(Column::InvoiceDate, Cell::from_text(&record.invoice_date));
        row.set_status(&record.payment_status);
        row
    }

    /// 1-based worksheet row the row is stored on.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn get(&self, column: Column) -> &Cell {
        &self.cells[column.index()]
    }

    pub fn set(&mut self, column: Column, cell: Cell) {
        self.cells[column.index()] = cell;
    }

    pub fn cells(&self) -> &[Cell; COLUMN_COUNT] {
        &self.cells
    }

    pub fn text(&self, column: Column) -> String {
        self.get(column).text().into_owned()
    }

    pub fn status(&self) -> PaymentStatus {
        PaymentStatus::from(self.get(Column::PaymentStatus).text().as_ref())
    }

    pub fn set_status(&mut self, status: &PaymentStatus) {
        self.set(Column::PaymentStatus, Cell::from_text(status.as_str()));
    }

    /// Numeric value of `column`, or `MalformedField` naming this row.
    pub fn amount(&self, column: Column) -> Result<f64> {
        let cell = self.get(column);
        cell.as_number().ok_or_else(|| StoreError::MalformedField {
            row: self.line,
            column,
            value: cell.text().into_owned(),
        })
    }

    pub fn to_record(&self) -> Result<PaymentRecord> {
        Ok(PaymentRecord {
            invoice_no: self.text(Column::InvoiceNo),
            task_type: self.text(Column::TaskType),
            tariff_fee: self.amount(Column::TariffFee)?,
            gross_fee: self.amount(Column::GrossFee)?,
            vat_rate: self.amount(Column::VatRate)?,
            vat_amount: self.amount(Column::VatAmount)?,
            net_fee: self.amount(Column::NetFee)?,
            case_details: self.text(Column::CaseDetails),
            submission_date: self.text(Column::SubmissionDate),
            invoice_date: self.text(Column::InvoiceDate),
            payment_status: self.status(),
        })
    }

    fn is_blank(&self) -> bool {
        self.cells.iter().all(|cell| *cell == Cell::Empty)
    }
}

/// The data rows of the sheet in stored order, header excluded.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    rows: Vec<Row>,
    /// Whether the workbook carries the chart sheet.
    pub chart: bool,
}

impl Table {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from loaded rows, dropping fully blank ones.
    ///
    /// Kept rows stay on their worksheet row, so blank rows between them
    /// survive a rewrite.
    pub fn from_rows(rows: impl IntoIterator<Item = Row>) -> Self {
        Self {
            rows: rows.into_iter().filter(|row| !row.is_blank()).collect(),
            chart: false,
        }
    }

    /// Worksheet row the next appended record goes to.
    fn next_line(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.line + 1)
            .max()
            .unwrap_or(FIRST_DATA_ROW)
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn push(&mut self, record: &PaymentRecord) {
        let mut row = Row::from_record(record);
        row.line = self.next_line();
        self.rows.push(row);
    }

    /// Index of the first row whose invoice number equals `invoice_no`.
    pub fn position(&self, invoice_no: &str) -> Option<usize> {
        self.rows
            .iter()
            .position(|row| row.get(Column::InvoiceNo).text() == invoice_no)
    }

    pub fn row_mut(&mut self, index: usize) -> Option<&mut Row> {
        self.rows.get_mut(index)
    }

    pub fn records(&self) -> Result<Vec<PaymentRecord>> {
        self.rows.iter().map(Row::to_record).collect()
    }

    /// Converts every currency cell to a plain number.
    ///
    /// Nothing is changed unless every currency cell is numeric.
    pub fn coerce_currency(&mut self) -> Result<()> {
        let mut coerced = Vec::new();
        for (index, row) in self.rows.iter().enumerate() {
            for column in Column::ALL.into_iter().filter(|c| c.is_currency()) {
                let amount = row.amount(column)?;
                coerced.push((index, column, amount));
            }
        }
        for (index, column, amount) in coerced {
            self.rows[index].set(column, Cell::Number(amount));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(invoice_no: &str, status: PaymentStatus) -> PaymentRecord {
        PaymentRecord {
            invoice_no: invoice_no.to_string(),
            task_type: "Legal Aid".to_string(),
            tariff_fee: 2292.0,
            gross_fee: 1910.0,
            vat_rate: 20.0,
            vat_amount: 382.0,
            net_fee: 1528.0,
            case_details: String::new(),
            submission_date: "10.11.2024".to_string(),
            invoice_date: "15.11.2024".to_string(),
            payment_status: status,
        }
    }

    #[test]
    fn test_row_round_trips_record() {
        let original = record("A1", PaymentStatus::Paid);
        let row = Row::from_record(&original);
        assert_eq!(row.get(Column::CaseDetails), &Cell::Empty);
        assert_eq!(row.to_record().unwrap(), original);
    }

    #[test]
    fn test_position_finds_first_match() {
        let mut table = Table::new();
        table.push(&record("A1", PaymentStatus::Pending));
        table.push(&record("A2", PaymentStatus::Pending));
        table.push(&record("A1", PaymentStatus::Paid));
        assert_eq!(table.position("A1"), Some(0));
        assert_eq!(table.position("A2"), Some(1));
        assert_eq!(table.position("missing"), None);
    }

    #[test]
    fn test_numeric_text_is_accepted() {
        let mut row = Row::from_record(&record("A1", PaymentStatus::Paid));
        row.set(Column::NetFee, Cell::Text(" 1528.5 ".to_string()));
        assert_eq!(row.amount(Column::NetFee).unwrap(), 1528.5);
    }

    #[test]
    fn test_malformed_amount_names_row_and_column() {
        let cells = Row::from_record(&record("A1", PaymentStatus::Paid)).cells;
        let mut row = Row::from_cells(7, cells);
        row.set(Column::GrossFee, Cell::Text("n/a".to_string()));
        match row.to_record() {
            Err(StoreError::MalformedField { row, column, value }) => {
                assert_eq!(row, 7);
                assert_eq!(column, Column::GrossFee);
                assert_eq!(value, "n/a");
            }
            other => panic!("expected MalformedField, got {other:?}"),
        }
    }

    #[test]
    fn test_coerce_currency_is_all_or_nothing() {
        let mut table = Table::new();
        table.push(&record("A1", PaymentStatus::Paid));
        table.push(&record("A2", PaymentStatus::Paid));
        table.rows[0].set(Column::TariffFee, Cell::Text("2292".to_string()));
        table.rows[1].set(Column::NetFee, Cell::Text("abc".to_string()));

        let before = table.clone();
        assert!(table.coerce_currency().is_err());
        assert_eq!(table, before);

        table.rows[1].set(Column::NetFee, Cell::Number(1.0));
        table.coerce_currency().unwrap();
        assert_eq!(table.rows[0].get(Column::TariffFee), &Cell::Number(2292.0));
    }

    #[test]
    fn test_blank_rows_are_dropped_but_lines_are_kept() {
        let cells = Row::from_record(&record("A1", PaymentStatus::Paid)).cells;
        let rows = vec![Row::from_cells(2, Default::default()), Row::from_cells(3, cells)];
        let mut table = Table::from_rows(rows);
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows()[0].line(), 3);

        table.push(&record("A2", PaymentStatus::Pending));
        assert_eq!(table.rows()[1].line(), 4);
    }

    #[test]
    fn test_push_into_empty_table_starts_below_header() {
        let mut table = Table::new();
        table.push(&record("A1", PaymentStatus::Pending));
        assert_eq!(table.rows()[0].line(), FIRST_DATA_ROW);
    }
}
