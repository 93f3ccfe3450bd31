use std::collections::HashMap;

use chrono::Datelike;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::core::errors::LedgerError;
use crate::domain::{
    Category, CardUsage, CategoryKind, CategoryTotal, EntryFilter, EntryKind, Ledger,
    LedgerEntry, MonthlyTotals, PeriodSummary,
};

use super::ServiceResult;

const UNCATEGORIZED_LABEL: &str = "Uncategorized";

pub struct SummaryService;

impl SummaryService {
    /// Entries matching `filter`, ordered by due date, then installment index, then description.
    pub fn filter<'a>(entries: &'a [LedgerEntry], filter: &EntryFilter) -> Vec<&'a LedgerEntry> {
        let mut matching: Vec<&LedgerEntry> =
            entries.iter().filter(|entry| filter.matches(entry)).collect();
        matching.sort_by(|a, b| {
            a.due_date
                .cmp(&b.due_date)
                .then(a.installment.index.cmp(&b.installment.index))
                .then_with(|| a.description.cmp(&b.description))
        });
        matching
    }

    pub fn summarize(entries: &[LedgerEntry], filter: &EntryFilter) -> PeriodSummary {
        entries
            .iter()
            .filter(|entry| filter.matches(entry))
            .fold(PeriodSummary::default(), |mut summary, entry| {
                summary.record(entry);
                summary
            })
    }

    /// Per-category totals for the filtered period, largest first.
    pub fn category_breakdown(ledger: &Ledger, filter: &EntryFilter) -> Vec<CategoryTotal> {
        let mut totals: HashMap<(Option<Uuid>, CategoryKind), Decimal> = HashMap::new();
        for entry in ledger.entries.iter().filter(|entry| filter.matches(entry)) {
            let total = totals
                .entry((entry.category_id, CategoryKind::from(entry.kind)))
                .or_insert(Decimal::ZERO);
            *total = total.saturating_add(entry.amount);
        }

        let mut slices: Vec<CategoryTotal> = totals
            .into_iter()
            .map(|((category_id, kind), total)| {
                let category = category_id.and_then(|id| ledger.category(id));
                CategoryTotal {
                    category_id,
                    name: category
                        .map(|category| category.name.clone())
                        .unwrap_or_else(|| UNCATEGORIZED_LABEL.to_string()),
                    color: category
                        .map(|category| category.color.clone())
                        .unwrap_or_else(Category::default_color),
                    kind,
                    total,
                }
            })
            .collect();
        slices.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));
        slices
    }

    /// Twelve monthly points for `year`, January first.
    pub fn monthly_series(entries: &[LedgerEntry], year: i32) -> Vec<MonthlyTotals> {
        let mut series: Vec<MonthlyTotals> = (1..=12)
            .map(|month| MonthlyTotals {
                month,
                incomes: Decimal::ZERO,
                expenses: Decimal::ZERO,
                net: Decimal::ZERO,
            })
            .collect();
        for entry in entries.iter().filter(|entry| entry.due_date.year() == year) {
            let point = &mut series[entry.due_date.month0() as usize];
            match entry.kind {
                EntryKind::Income => point.incomes = point.incomes.saturating_add(entry.amount),
                EntryKind::Expense => point.expenses = point.expenses.saturating_add(entry.amount),
            }
            point.net = point.incomes.saturating_sub(point.expenses);
        }
        series
    }

    pub fn total_balance(ledger: &Ledger) -> Decimal {
        ledger
            .accounts
            .iter()
            .fold(Decimal::ZERO, |total, account| total.saturating_add(account.balance))
    }

    /// Limit consumption of a card: every expense charged to it that is not yet settled.
    pub fn card_usage(ledger: &Ledger, card_id: Uuid) -> ServiceResult<CardUsage> {
        let card = ledger
            .credit_card(card_id)
            .ok_or_else(|| LedgerError::not_found("Credit card", card_id))?;
        let used: Decimal = ledger
            .entries
            .iter()
            .filter(|entry| entry.credit_card_id() == Some(card_id) && !entry.is_paid)
            .fold(Decimal::ZERO, |used, entry| used.saturating_add(entry.amount));
        Ok(CardUsage {
            card_id,
            limit: card.limit,
            used,
            available: card.limit.saturating_sub(used),
        })
    }
}
