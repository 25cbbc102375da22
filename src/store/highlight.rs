use super::table::Table;
use crate::models::PaymentStatus;

/// Background fill applied to a row's payment status cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    LightGreen,
    LightRed,
}

impl Fill {
    pub fn for_status(status: &PaymentStatus) -> Option<Self> {
        match status {
            PaymentStatus::Paid => Some(Fill::LightGreen),
            PaymentStatus::Pending => Some(Fill::LightRed),
            PaymentStatus::Other(_) => None,
        }
    }

    /// RGB value of the fill colour.
    pub fn rgb(self) -> u32 {
        match self {
            Fill::LightGreen => 0xC6E0B4,
            Fill::LightRed => 0xF4CCCC,
        }
    }
}

/// Fill of every data row, in stored order.
pub fn fills(table: &Table) -> Vec<Option<Fill>> {
    table
        .rows()
        .iter()
        .map(|row| Fill::for_status(&row.status()))
        .collect()
}
