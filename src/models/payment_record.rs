use super::PaymentStatus;

/// One row of the payment records sheet.
///
/// `vat_amount` and `net_fee` are stored as supplied; the store never
/// derives them from `gross_fee` and `vat_rate`.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRecord {
    pub invoice_no: String,
    pub task_type: String,
    pub tariff_fee: f64,
    pub gross_fee: f64,
    pub vat_rate: f64,
    pub vat_amount: f64,
    pub net_fee: f64,
    pub case_details: String,
    pub submission_date: String,
    pub invoice_date: String,
    pub payment_status: PaymentStatus,
}
