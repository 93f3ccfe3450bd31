use rust_decimal_macros::dec;

use crate::core::errors::LedgerError;
use crate::core::services::AccountService;
use crate::domain::{Account, AccountKind, EntryKind, Ledger, LedgerEntry, PaymentSource};

use super::date;

#[test]
fn add_account_trims_name() {
    let mut ledger = Ledger::new("Test");
    let id = AccountService::add(&mut ledger, Account::new("  Checking ", AccountKind::Checking))
        .unwrap();

    assert_eq!(ledger.accounts.len(), 1);
    assert_eq!(ledger.account(id).unwrap().name, "Checking");
}

#[test]
fn duplicate_name_is_rejected_case_insensitively() {
    let mut ledger = Ledger::new("Test");
    AccountService::add(&mut ledger, Account::new("Wallet", AccountKind::Wallet)).unwrap();

    let err = AccountService::add(&mut ledger, Account::new("wallet", AccountKind::Wallet))
        .unwrap_err();
    assert!(matches!(err, LedgerError::Conflict(_)));
}

#[test]
fn empty_name_is_invalid() {
    let mut ledger = Ledger::new("Test");
    let err = AccountService::add(&mut ledger, Account::new("   ", AccountKind::Checking))
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidIntent(_)));
}

#[test]
fn edit_keeps_balance() {
    let mut ledger = Ledger::new("Test");
    let id = AccountService::add(
        &mut ledger,
        Account::new("Primary", AccountKind::Checking).with_opening_balance(dec!(250.00)),
    )
    .unwrap();

    let changes = Account::new("Primary 2", AccountKind::Savings);
    AccountService::edit(&mut ledger, id, changes).unwrap();

    let updated = ledger.account(id).unwrap();
    assert_eq!(updated.name, "Primary 2");
    assert_eq!(updated.kind, AccountKind::Savings);
    assert_eq!(updated.balance, dec!(250.00));
}

#[test]
fn remove_refuses_linked_account() {
    let mut ledger = Ledger::new("Test");
    let id = AccountService::add(&mut ledger, Account::new("Main", AccountKind::Checking))
        .unwrap();
    let mut entry = LedgerEntry::new(EntryKind::Expense, "Rent", dec!(900), date(2024, 3, 5));
    entry.source = Some(PaymentSource::Account(id));
    ledger.add_entry(entry);

    let err = AccountService::remove(&mut ledger, id).unwrap_err();
    assert!(matches!(err, LedgerError::Conflict(_)));
    assert!(ledger.account(id).is_some());
}

#[test]
fn remove_unknown_account_is_not_found() {
    let mut ledger = Ledger::new("Test");
    let err = AccountService::remove(&mut ledger, uuid::Uuid::new_v4()).unwrap_err();
    assert!(matches!(err, LedgerError::NotFound { kind: "Account", .. }));
}
