use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::config::Config;
use crate::core::errors::{LedgerError, Result};
use crate::core::generator::TransactionIntent;
use crate::core::services::{
    AccountService, CardService, CategoryService, CreateOutcome, EntryService, PaymentOutcome,
    PaymentService, ServiceResult, SummaryService,
};
use crate::domain::{
    Account, Category, CategoryKind, CategoryTotal, CreditCard, EntryFilter, EntryPatch, Ledger,
    LedgerEntry, PeriodSummary,
};
use crate::storage::StorageBackend;

/// Facade that owns the active ledger and persists every change through a unit of work.
///
/// Each mutating call runs its service on a working copy, saves that copy and only
/// then swaps it in. When the store fails the call returns
/// [`LedgerError::StoreUnavailable`] and the in-memory ledger is exactly as before.
pub struct LedgerManager {
    ledger: Ledger,
    name: String,
    config: Config,
    period: EntryFilter,
    dashboard: PeriodSummary,
    storage: Box<dyn StorageBackend>,
}

impl LedgerManager {
    /// Loads the ledger stored under `name`, creating and saving an empty one for `name` if absent.
    pub fn open(storage: Box<dyn StorageBackend>, name: &str, config: Config) -> Result<Self> {
        let ledger = if storage.exists(name)? {
            storage.load(name)?
        } else {
            let ledger = Ledger::new(name);
            storage.save(&ledger, name)?;
            tracing::info!(ledger = name, "created new ledger");
            ledger
        };
        let period = EntryFilter::containing(Utc::now().date_naive());
        let dashboard = SummaryService::summarize(&ledger.entries, &period);
        Ok(Self {
            ledger,
            name: name.to_string(),
            config,
            period,
            dashboard,
            storage,
        })
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    pub fn entries(&self) -> &[LedgerEntry] {
        &self.ledger.entries
    }

    pub fn entry(&self, id: Uuid) -> Option<&LedgerEntry> {
        self.ledger.entry(id)
    }

    pub fn accounts(&self) -> &[Account] {
        &self.ledger.accounts
    }

    pub fn credit_cards(&self) -> &[CreditCard] {
        &self.ledger.credit_cards
    }

    pub fn categories(&self, kind: Option<CategoryKind>) -> Vec<&Category> {
        CategoryService::list(&self.ledger, kind)
    }

    pub fn create_entry(&mut self, intent: &TransactionIntent) -> Result<CreateOutcome> {
        self.unit_of_work(|ledger, config| EntryService::create(ledger, intent, &config.limits()))
    }

    pub fn update_entry(&mut self, id: Uuid, patch: EntryPatch) -> Result<LedgerEntry> {
        self.unit_of_work(|ledger, _| EntryService::update(ledger, id, patch))
    }

    pub fn delete_entry(&mut self, id: Uuid) -> Result<LedgerEntry> {
        self.unit_of_work(|ledger, _| EntryService::delete(ledger, id))
    }

    pub fn mark_paid(&mut self, id: Uuid) -> Result<PaymentOutcome> {
        self.mark_paid_at(id, Utc::now())
    }

    pub fn mark_paid_at(&mut self, id: Uuid, at: DateTime<Utc>) -> Result<PaymentOutcome> {
        self.unit_of_work(|ledger, config| {
            PaymentService::mark_paid(ledger, id, at, config.unlinked_payment)
        })
    }

    pub fn mark_unpaid(&mut self, id: Uuid) -> Result<PaymentOutcome> {
        self.unit_of_work(|ledger, _| PaymentService::mark_unpaid(ledger, id))
    }

    pub fn add_account(&mut self, account: Account) -> Result<Uuid> {
        self.unit_of_work(|ledger, _| AccountService::add(ledger, account))
    }

    pub fn edit_account(&mut self, id: Uuid, changes: Account) -> Result<()> {
        self.unit_of_work(|ledger, _| AccountService::edit(ledger, id, changes))
    }

    pub fn remove_account(&mut self, id: Uuid) -> Result<Account> {
        self.unit_of_work(|ledger, _| AccountService::remove(ledger, id))
    }

    pub fn add_credit_card(&mut self, card: CreditCard) -> Result<Uuid> {
        self.unit_of_work(|ledger, _| CardService::add(ledger, card))
    }

    pub fn edit_credit_card(&mut self, id: Uuid, changes: CreditCard) -> Result<()> {
        self.unit_of_work(|ledger, _| CardService::edit(ledger, id, changes))
    }

    pub fn remove_credit_card(&mut self, id: Uuid) -> Result<CreditCard> {
        self.unit_of_work(|ledger, _| CardService::remove(ledger, id))
    }

    pub fn add_category(&mut self, category: Category) -> Result<Uuid> {
        self.unit_of_work(|ledger, _| CategoryService::add(ledger, category))
    }

    pub fn edit_category(&mut self, id: Uuid, changes: Category) -> Result<()> {
        self.unit_of_work(|ledger, _| CategoryService::edit(ledger, id, changes))
    }

    pub fn remove_category(&mut self, id: Uuid) -> Result<Category> {
        self.unit_of_work(|ledger, _| CategoryService::remove(ledger, id))
    }

    /// Switches the dashboard period and recomputes its totals.
    pub fn set_period(&mut self, filter: EntryFilter) {
        self.period = filter;
        self.refresh_dashboard();
    }

    pub fn period(&self) -> &EntryFilter {
        &self.period
    }

    /// Totals for the active period, current as of the last committed change.
    pub fn dashboard(&self) -> &PeriodSummary {
        &self.dashboard
    }

    pub fn filtered_entries(&self) -> Vec<&LedgerEntry> {
        SummaryService::filter(&self.ledger.entries, &self.period)
    }

    pub fn category_breakdown(&self) -> Vec<CategoryTotal> {
        SummaryService::category_breakdown(&self.ledger, &self.period)
    }

    /// Replaces the in-memory ledger with the stored snapshot.
    pub fn reload(&mut self) -> Result<()> {
        self.ledger = self.storage.load(&self.name)?;
        self.refresh_dashboard();
        Ok(())
    }

    pub fn backup(&self, note: Option<&str>) -> Result<String> {
        let backup = self.storage.backup(&self.ledger, &self.name, note)?;
        tracing::info!(ledger = %self.name, %backup, "backup created");
        Ok(backup)
    }

    pub fn list_backups(&self) -> Result<Vec<String>> {
        self.storage.list_backups(&self.name)
    }

    pub fn restore(&mut self, backup_name: &str) -> Result<()> {
        self.ledger = self.storage.restore(&self.name, backup_name)?;
        self.refresh_dashboard();
        Ok(())
    }

    fn unit_of_work<T, F>(&mut self, op: F) -> Result<T>
    where
        F: FnOnce(&mut Ledger, &Config) -> ServiceResult<T>,
    {
        let mut working = self.ledger.clone();
        let value = op(&mut working, &self.config)?;
        if working.revision == self.ledger.revision {
            return Ok(value);
        }
        if let Err(err) = self.storage.save(&working, &self.name) {
            tracing::warn!(ledger = %self.name, error = %err, "store rejected change; rolled back");
            return Err(match err {
                LedgerError::StoreUnavailable(message) => LedgerError::StoreUnavailable(message),
                other => LedgerError::StoreUnavailable(other.to_string()),
            });
        }
        self.ledger = working;
        self.refresh_dashboard();
        Ok(value)
    }

    fn refresh_dashboard(&mut self) {
        self.dashboard = SummaryService::summarize(&self.ledger.entries, &self.period);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::UnlinkedPaymentPolicy;
    use crate::domain::{AccountKind, Recurrence};
    use crate::storage::MemoryStorage;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn manager_with_account() -> (LedgerManager, MemoryStorage, Uuid) {
        let store = MemoryStorage::new();
        let mut manager =
            LedgerManager::open(Box::new(store.clone()), "household", Config::default()).unwrap();
        let account = manager
            .add_account(
                Account::new("Checking", AccountKind::Checking).with_opening_balance(dec!(500)),
            )
            .unwrap();
        manager.set_period(EntryFilter::month(2024, 3));
        (manager, store, account)
    }

    #[test]
    fn open_creates_and_reopens() {
        let store = MemoryStorage::new();
        {
            let mut manager =
                LedgerManager::open(Box::new(store.clone()), "Family", Config::default()).unwrap();
            manager
                .add_account(Account::new("Wallet", AccountKind::Wallet))
                .unwrap();
        }
        let manager = LedgerManager::open(Box::new(store), "family", Config::default()).unwrap();
        assert_eq!(manager.accounts().len(), 1);
        assert_eq!(manager.name(), "family");
    }

    #[test]
    fn payment_commits_flag_and_balance_together() {
        let (mut manager, store, account) = manager_with_account();
        let intent =
            TransactionIntent::expense("Internet", dec!(100), date(2024, 3, 10)).from_account(account);
        let id = manager.create_entry(&intent).unwrap().ids()[0];

        manager.mark_paid(id).unwrap();

        assert!(manager.entry(id).unwrap().is_paid);
        assert_eq!(manager.ledger().account(account).unwrap().balance, dec!(400));
        let persisted = store.snapshot("household").unwrap();
        assert!(persisted.entry(id).unwrap().is_paid);
        assert_eq!(persisted.account(account).unwrap().balance, dec!(400));
        assert_eq!(manager.dashboard().paid_expenses, dec!(100));
    }

    #[test]
    fn store_failure_rolls_back_payment() {
        let (mut manager, store, account) = manager_with_account();
        let intent =
            TransactionIntent::expense("Internet", dec!(100), date(2024, 3, 10)).from_account(account);
        let id = manager.create_entry(&intent).unwrap().ids()[0];
        store.set_available(false);

        let err = manager.mark_paid(id).unwrap_err();

        assert!(matches!(err, LedgerError::StoreUnavailable(_)));
        assert!(!manager.entry(id).unwrap().is_paid);
        assert_eq!(manager.ledger().account(account).unwrap().balance, dec!(500));
        assert_eq!(manager.dashboard().pending_expenses, dec!(100));
    }

    #[test]
    fn store_failure_drops_whole_batch() {
        let (mut manager, store, account) = manager_with_account();
        store.set_available(false);
        let intent = TransactionIntent::expense("TV", dec!(150), date(2024, 3, 1))
            .from_account(account)
            .with_installments(10);

        assert!(manager.create_entry(&intent).is_err());
        assert!(manager.entries().is_empty());
    }

    #[test]
    fn idempotent_payment_skips_the_store() {
        let (mut manager, store, account) = manager_with_account();
        let intent =
            TransactionIntent::expense("Gas", dec!(60), date(2024, 3, 3)).from_account(account);
        let id = manager.create_entry(&intent).unwrap().ids()[0];
        manager.mark_paid(id).unwrap();
        store.set_available(false);

        assert_eq!(manager.mark_paid(id).unwrap(), PaymentOutcome::AlreadyPaid);
    }

    #[test]
    fn warn_policy_reports_skipped_payment() {
        let store = MemoryStorage::new();
        let config = Config {
            unlinked_payment: UnlinkedPaymentPolicy::Warn,
            ..Config::default()
        };
        let mut manager = LedgerManager::open(Box::new(store), "loose", config).unwrap();
        let intent = TransactionIntent::expense("Cash tip", dec!(5), date(2024, 3, 3));
        let id = manager.create_entry(&intent).unwrap().ids()[0];

        let outcome = manager.mark_paid(id).unwrap();

        assert_eq!(outcome, PaymentOutcome::Skipped { entry_id: id });
        assert!(!manager.entry(id).unwrap().is_paid);
    }

    #[test]
    fn dashboard_follows_period() {
        let (mut manager, _store, _) = manager_with_account();
        manager
            .create_entry(
                &TransactionIntent::income("Salary", dec!(3000), date(2024, 1, 5))
                    .with_recurrence(Recurrence::Monthly)
                    .with_occurrences(6),
            )
            .unwrap();

        assert_eq!(manager.dashboard().incomes, dec!(3000));
        assert_eq!(manager.filtered_entries().len(), 1);

        manager.set_period(EntryFilter::year(2024));
        assert_eq!(manager.dashboard().incomes, dec!(18000));
        assert_eq!(manager.dashboard().entry_count, 6);
    }

    #[test]
    fn backups_restore_previous_state() {
        let (mut manager, _store, account) = manager_with_account();
        let backup = manager.backup(Some("clean")).unwrap();
        let intent =
            TransactionIntent::expense("Gas", dec!(60), date(2024, 3, 3)).from_account(account);
        manager.create_entry(&intent).unwrap();
        assert_eq!(manager.entries().len(), 1);

        assert_eq!(manager.list_backups().unwrap(), vec![backup.clone()]);
        manager.restore(&backup).unwrap();

        assert!(manager.entries().is_empty());
        assert_eq!(manager.dashboard().entry_count, 0);
    }
}
