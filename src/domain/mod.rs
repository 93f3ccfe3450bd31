pub mod account;
pub mod category;
pub mod common;
pub mod entry;
pub mod ledger;
pub mod recurrence;
pub mod report;
pub mod time_interval;

pub use account::{Account, AccountKind, CreditCard};
pub use category::{Category, CategoryKind};
pub use common::{Displayable, Identifiable, NamedEntity};
pub use entry::{EntryKind, EntryPatch, Installment, LedgerEntry, PaymentSource};
pub use ledger::{Ledger, CURRENT_SCHEMA_VERSION};
pub use recurrence::Recurrence;
pub use report::{CardUsage, CategoryTotal, EntryFilter, MonthFilter, MonthlyTotals, PeriodSummary};
pub use time_interval::{TimeInterval, TimeUnit};
