pub mod amount;
mod de;
pub mod error;
pub mod invoice;
pub mod line;
pub mod party;

pub use error::{Error, FieldError, Result, ValidationResponse};
pub use invoice::{InvoiceRecord, Totals};
pub use line::LineAmounts;
