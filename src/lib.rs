pub mod config;
pub mod error;
pub mod models;
pub mod store;

pub use error::{Result, StoreError};
pub use models::{Column, PaymentRecord, PaymentStatus};
pub use store::RecordStore;
