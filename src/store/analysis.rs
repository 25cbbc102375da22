//! Aggregate statistics over the payment records.
//!
//! Only `Paid` and `Pending` rows are bucketed; rows with any other status
//! count towards [`PaymentAnalysis::total_records`] and nothing else.

use super::table::Table;
use crate::error::Result;
use crate::models::{Column, PaymentStatus};

/// Totals for one payment status.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StatusTotals {
    pub count: usize,
    pub net_total: f64,
    pub gross_total: f64,
    /// `net_total / count`, or 0 for an empty bucket.
    pub average_net: f64,
    /// `gross_total / count`, or 0 for an empty bucket.
    pub average_gross: f64,
}

impl StatusTotals {
    fn add(&mut self, net: f64, gross: f64) {
        self.count += 1;
        self.net_total += net;
        self.gross_total += gross;
    }

    fn finish(mut self) -> Self {
        self.average_net = average(self.net_total, self.count);
        self.average_gross = average(self.gross_total, self.count);
        self
    }
}

fn average(total: f64, count: usize) -> f64 {
    if count == 0 { 0.0 } else { total / count as f64 }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PaymentAnalysis {
    /// Every data row, whatever its status.
    pub total_records: usize,
    pub paid: StatusTotals,
    pub pending: StatusTotals,
}

impl PaymentAnalysis {
    /// Single pass over `table`.
    ///
    /// Both the net and the gross fee of every `Paid` or `Pending` row feed
    /// the bucket totals, so either one being non-numeric fails the whole
    /// analysis with `MalformedField`.
    pub fn of(table: &Table) -> Result<Self> {
        let mut paid = StatusTotals::default();
        let mut pending = StatusTotals::default();

        for row in table.rows() {
            let bucket = match row.status() {
                PaymentStatus::Paid => &mut paid,
                PaymentStatus::Pending => &mut pending,
                PaymentStatus::Other(_) => continue,
            };
            let net = row.amount(Column::NetFee)?;
            let gross = row.amount(Column::GrossFee)?;
            bucket.add(net, gross);
        }

        Ok(Self {
            total_records: table.len(),
            paid: paid.finish(),
            pending: pending.finish(),
        })
    }
}

/// Category counts backing the payment status pie chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChartSummary {
    pub paid: usize,
    pub pending: usize,
}

impl ChartSummary {
    pub fn of(table: &Table) -> Self {
        table
            .rows()
            .iter()
            .fold(ChartSummary::default(), |mut summary, row| {
                match row.status() {
                    PaymentStatus::Paid => summary.paid += 1,
                    PaymentStatus::Pending => summary.pending += 1,
                    PaymentStatus::Other(_) => {}
                }
                summary
            })
    }

    pub fn total(&self) -> usize {
        self.paid + self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::models::PaymentRecord;
    use crate::store::table::Cell;

    fn record(invoice_no: &str, status: &str, gross: f64, net: f64) -> PaymentRecord {
        PaymentRecord {
            invoice_no: invoice_no.to_string(),
            task_type: "Legal Aid".to_string(),
            tariff_fee: gross,
            gross_fee: gross,
            vat_rate: 20.0,
            vat_amount: gross - net,
            net_fee: net,
            case_details: String::new(),
            submission_date: "10.11.2024".to_string(),
            invoice_date: "15.11.2024".to_string(),
            payment_status: PaymentStatus::from(status),
        }
    }

    fn table(records: &[PaymentRecord]) -> Table {
        let mut table = Table::new();
        for record in records {
            table.push(record);
        }
        table
    }

    #[test]
    fn test_paid_and_pending_buckets() {
        let table = table(&[
            record("A1", "Paid", 120.0, 100.0),
            record("A2", "Pending", 60.0, 50.0),
            record("A3", "Paid", 240.0, 200.0),
        ]);
        let analysis = PaymentAnalysis::of(&table).unwrap();

        assert_eq!(analysis.total_records, 3);
        assert_eq!(analysis.paid.count, 2);
        assert_eq!(analysis.paid.net_total, 300.0);
        assert_eq!(analysis.paid.average_net, 150.0);
        assert_eq!(analysis.paid.gross_total, 360.0);
        assert_eq!(analysis.pending.count, 1);
        assert_eq!(analysis.pending.net_total, 50.0);
        assert_eq!(analysis.pending.average_net, 50.0);
        assert_eq!(analysis.pending.average_gross, 60.0);
    }

    #[test]
    fn test_empty_bucket_averages_to_zero() {
        let analysis = PaymentAnalysis::of(&table(&[record("A1", "Paid", 10.0, 8.0)])).unwrap();
        assert_eq!(analysis.pending, StatusTotals::default());
        assert_eq!(analysis.pending.average_net, 0.0);
    }

    #[test]
    fn test_unknown_status_is_ignored() {
        let mut table = table(&[
            record("A1", "Overdue", 10.0, 8.0),
            record("A2", "Pending", 10.0, 8.0),
        ]);
        // A malformed fee on an ignored row does not matter.
        table.row_mut(0).unwrap().set(Column::NetFee, Cell::Text("?".to_string()));

        let analysis = PaymentAnalysis::of(&table).unwrap();
        assert_eq!(analysis.total_records, 2);
        assert_eq!(analysis.paid.count + analysis.pending.count, 1);
        assert_eq!(ChartSummary::of(&table), ChartSummary { paid: 0, pending: 1 });
    }

    #[test]
    fn test_malformed_net_fee_is_reported() {
        let mut table = table(&[record("A1", "Paid", 10.0, 8.0)]);
        table.row_mut(0).unwrap().set(Column::NetFee, Cell::Text("eight".to_string()));
        assert!(PaymentAnalysis::of(&table).is_err());
    }

    #[test]
    fn test_malformed_gross_fee_is_reported() {
        let mut table = table(&[
            record("A1", "Pending", 10.0, 8.0),
            record("A2", "Pending", 10.0, 8.0),
        ]);
        table.row_mut(1).unwrap().set(Column::GrossFee, Cell::Text("ten".to_string()));
        match PaymentAnalysis::of(&table) {
            Err(StoreError::MalformedField { row, column, .. }) => {
                assert_eq!(row, 3);
                assert_eq!(column, Column::GrossFee);
            }
            other => panic!("expected MalformedField, got {other:?}"),
        }
    }
}
