mod common;

use chrono::Datelike;
use common::date;
use finance_core::{
    core::generator::expand,
    domain::{Installment, Recurrence},
    GenerationLimits, LedgerError, Schedule, TransactionIntent,
};
use rust_decimal_macros::dec;

#[test]
fn installments_clamp_to_month_end() {
    let intent = TransactionIntent::expense("Laptop", dec!(100), date(2024, 1, 31)).with_installments(3);

    let batch = expand(&intent, &GenerationLimits::default()).unwrap();

    let dates: Vec<_> = batch.entries.iter().map(|e| e.due_date).collect();
    assert_eq!(
        dates,
        vec![date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 31)]
    );
    let indices: Vec<_> = batch.entries.iter().map(|e| e.installment).collect();
    assert_eq!(
        indices,
        (1..=3)
            .map(|index| Installment { index, count: 3 })
            .collect::<Vec<_>>()
    );
    assert!(batch.entries.iter().all(|e| e.amount == dec!(100)));
    assert_eq!(batch.total_amount, dec!(300));
}

#[test]
fn monthly_recurrence_spans_a_year() {
    let intent = TransactionIntent::expense("Rent", dec!(1200), date(2024, 3, 15))
        .with_recurrence(Recurrence::Monthly);

    let batch = expand(&intent, &GenerationLimits::default()).unwrap();

    assert_eq!(batch.len(), 12);
    assert_eq!(batch.entries[0].due_date, date(2024, 3, 15));
    assert_eq!(batch.entries[11].due_date, date(2025, 2, 15));
    assert!(batch.entries.iter().all(|e| e.recurrence == Recurrence::Monthly));
    assert!(batch
        .entries
        .iter()
        .all(|e| e.installment == Installment::SINGLE));
}

#[test]
fn cadences_step_from_the_anchor() {
    let anchor = date(2024, 1, 31);
    let cases = [
        (Recurrence::Weekly, date(2024, 2, 7)),
        (Recurrence::Biweekly, date(2024, 2, 15)),
        (Recurrence::Bimonthly, date(2024, 3, 31)),
        (Recurrence::Quarterly, date(2024, 4, 30)),
        (Recurrence::Annual, date(2025, 1, 31)),
    ];
    for (recurrence, second) in cases {
        let intent = TransactionIntent::expense("Fee", dec!(1), anchor)
            .with_recurrence(recurrence)
            .with_occurrences(2);
        let batch = expand(&intent, &GenerationLimits::default()).unwrap();
        assert_eq!(batch.entries[1].due_date, second, "{recurrence}");
    }
}

#[test]
fn occurrences_are_capped_by_limits() {
    let limits = GenerationLimits {
        recurrence_occurrences: 6,
        ..GenerationLimits::default()
    };
    let intent = TransactionIntent::income("Allowance", dec!(50), date(2024, 1, 1))
        .with_recurrence(Recurrence::Weekly)
        .with_occurrences(40);

    let batch = expand(&intent, &limits).unwrap();

    assert_eq!(
        batch.schedule,
        Schedule::Recurring {
            recurrence: Recurrence::Weekly,
            occurrences: 6
        }
    );
    assert_eq!(batch.len(), 6);
}

#[test]
fn both_modes_are_rejected() {
    let intent = TransactionIntent::expense("Phone", dec!(80), date(2024, 5, 1))
        .with_installments(4)
        .with_recurrence(Recurrence::Monthly);

    let err = expand(&intent, &GenerationLimits::default()).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidIntent(_)));
}

#[test]
fn invalid_counts_are_rejected() {
    for count in [0, -3] {
        let intent =
            TransactionIntent::expense("Phone", dec!(80), date(2024, 5, 1)).with_installments(count);
        assert!(expand(&intent, &GenerationLimits::default()).is_err());
    }
    let too_many =
        TransactionIntent::expense("Phone", dec!(80), date(2024, 5, 1)).with_installments(121);
    assert!(expand(&too_many, &GenerationLimits::default()).is_err());
}

#[test]
fn missing_date_and_blank_description_fail() {
    let mut intent = TransactionIntent::expense("  ", dec!(10), date(2024, 5, 1));
    assert!(expand(&intent, &GenerationLimits::default()).is_err());

    intent.description = "Coffee".into();
    intent.start_date = None;
    assert!(expand(&intent, &GenerationLimits::default()).is_err());
}

#[test]
fn intent_deserializes_from_form_json() {
    let json = r#"{
        "kind": "Expense",
        "description": "Fridge",
        "amount": "249.90",
        "start_date": "2024-02-10",
        "installment_count": 10
    }"#;
    let intent: TransactionIntent = serde_json::from_str(json).unwrap();

    let batch = expand(&intent, &GenerationLimits::default()).unwrap();

    assert_eq!(batch.len(), 10);
    assert_eq!(batch.total_amount, dec!(2499.00));
    assert_eq!(batch.entries[9].due_date.month(), 11);
    let series = batch.entries[0].series_id;
    assert!(series.is_some());
    assert!(batch.entries.iter().all(|e| e.series_id == series));
}
