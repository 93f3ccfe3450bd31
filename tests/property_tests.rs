use chrono::{Datelike, NaiveDate};
use finance_core::{
    core::generator::expand,
    core::services::{PaymentService, UnlinkedPaymentPolicy},
    domain::{Account, AccountKind, EntryKind, Ledger, LedgerEntry, PaymentSource},
    GenerationLimits, TransactionIntent,
};
use proptest::prelude::*;
use rust_decimal::Decimal;

fn month_index(date: NaiveDate) -> i32 {
    date.year() * 12 + date.month0() as i32
}

proptest! {
    #[test]
    fn installments_cover_consecutive_months(
        year in 2000i32..2100,
        month in 1u32..=12,
        day in 1u32..=31,
        count in 1i32..=60,
        cents in 1i64..1_000_000,
    ) {
        let last_day = (28..=31)
            .rev()
            .find(|d| NaiveDate::from_ymd_opt(year, month, *d).is_some())
            .unwrap();
        let start = NaiveDate::from_ymd_opt(year, month, day.min(last_day)).unwrap();
        let amount = Decimal::new(cents, 2);
        let intent = TransactionIntent::expense("Plan", amount, start).with_installments(count);

        let batch = expand(&intent, &GenerationLimits::default()).unwrap();

        prop_assert_eq!(batch.len(), count as usize);
        for (position, entry) in batch.entries.iter().enumerate() {
            prop_assert_eq!(entry.installment.index as usize, position + 1);
            prop_assert_eq!(entry.amount, amount);
            prop_assert_eq!(month_index(entry.due_date), month_index(start) + position as i32);
            prop_assert!(entry.due_date.day() <= start.day());
        }
        for pair in batch.entries.windows(2) {
            prop_assert!(pair[0].due_date < pair[1].due_date);
        }
        prop_assert_eq!(batch.total_amount, amount * Decimal::from(count));
    }

    #[test]
    fn payments_preserve_balance_plus_paid(
        amounts in prop::collection::vec(1i64..100_000, 1..20),
        toggles in prop::collection::vec(any::<bool>(), 1..60),
    ) {
        let opening = Decimal::new(50_000, 2);
        let mut ledger = Ledger::new("prop");
        let account = ledger.add_account(
            Account::new("Checking", AccountKind::Checking).with_opening_balance(opening),
        );
        let ids: Vec<_> = amounts
            .iter()
            .map(|cents| {
                let mut entry = LedgerEntry::new(
                    EntryKind::Expense,
                    "Bill",
                    Decimal::new(*cents, 2),
                    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                );
                entry.source = Some(PaymentSource::Account(account));
                ledger.add_entry(entry)
            })
            .collect();

        for (step, pay) in toggles.iter().enumerate() {
            let id = ids[step % ids.len()];
            if *pay {
                PaymentService::mark_paid(&mut ledger, id, chrono::Utc::now(), UnlinkedPaymentPolicy::Reject).unwrap();
            } else {
                PaymentService::mark_unpaid(&mut ledger, id).unwrap();
            }
            let paid: Decimal = ledger
                .entries
                .iter()
                .filter(|entry| entry.is_paid)
                .map(|entry| entry.amount)
                .sum();
            prop_assert_eq!(ledger.account(account).unwrap().balance + paid, opening);
        }
    }
}
