mod payment_record;
mod payment_status;
mod schema;

pub use payment_record::PaymentRecord;
pub use payment_status::PaymentStatus;
pub use schema::{COLUMN_COUNT, Column, ColumnKind};
