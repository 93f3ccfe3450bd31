pub mod account_service;
pub mod card_service;
pub mod category_service;
pub mod entry_service;
pub mod payment_service;
pub mod summary_service;

pub use account_service::AccountService;
pub use card_service::CardService;
pub use category_service::CategoryService;
pub use entry_service::{BatchReceipt, CreateOutcome, EntryService};
pub use payment_service::{PaymentOutcome, PaymentService, UnlinkedPaymentPolicy};
pub use summary_service::SummaryService;

use crate::core::errors::LedgerError;

pub type ServiceResult<T> = Result<T, LedgerError>;

#[cfg(test)]
mod tests;
