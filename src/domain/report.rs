//! Filter and aggregate shapes consumed by the reporting services.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::category::CategoryKind;
use super::entry::{EntryKind, LedgerEntry};

/// Month selector; `All` bypasses the month predicate but keeps the year.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum MonthFilter {
    #[default]
    All,
    Month(u32),
}

/// Period and field filter applied to ledger entries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntryFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_amount: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_amount: Option<Decimal>,
    #[serde(default)]
    pub month: MonthFilter,
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<EntryKind>,
}

impl EntryFilter {
    /// Whole-year filter with no other predicate.
    pub fn year(year: i32) -> Self {
        Self {
            name: None,
            min_amount: None,
            max_amount: None,
            month: MonthFilter::All,
            year,
            kind: None,
        }
    }

    pub fn month(year: i32, month: u32) -> Self {
        Self {
            month: MonthFilter::Month(month),
            ..Self::year(year)
        }
    }

    /// Filter for the calendar month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self::month(date.year(), date.month())
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_amount_range(mut self, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        self.min_amount = min;
        self.max_amount = max;
        self
    }

    pub fn with_kind(mut self, kind: EntryKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn matches(&self, entry: &LedgerEntry) -> bool {
        if entry.due_date.year() != self.year {
            return false;
        }
        if let MonthFilter::Month(month) = self.month {
            if entry.due_date.month() != month {
                return false;
            }
        }
        if self.kind.is_some_and(|kind| kind != entry.kind) {
            return false;
        }
        if self.min_amount.is_some_and(|min| entry.amount < min) {
            return false;
        }
        if self.max_amount.is_some_and(|max| entry.amount > max) {
            return false;
        }
        match self.name.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => entry
                .description
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            _ => true,
        }
    }
}

/// Exact totals for one filtered period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PeriodSummary {
    pub incomes: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
    pub paid_expenses: Decimal,
    pub pending_expenses: Decimal,
    pub entry_count: usize,
}

impl PeriodSummary {
    /// Adds one entry to the totals. Sums saturate at the `Decimal` bounds.
    pub fn record(&mut self, entry: &LedgerEntry) {
        match entry.kind {
            EntryKind::Income => self.incomes = self.incomes.saturating_add(entry.amount),
            EntryKind::Expense => {
                self.expenses = self.expenses.saturating_add(entry.amount);
                if entry.is_paid {
                    self.paid_expenses = self.paid_expenses.saturating_add(entry.amount);
                } else {
                    self.pending_expenses = self.pending_expenses.saturating_add(entry.amount);
                }
            }
        }
        self.net = self.incomes.saturating_sub(self.expenses);
        self.entry_count += 1;
    }
}

/// Chart slice: total of one category within a kind. `category_id == None` is the uncategorised bucket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category_id: Option<Uuid>,
    pub name: String,
    pub color: String,
    pub kind: CategoryKind,
    pub total: Decimal,
}

/// Chart point for one month of a year.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MonthlyTotals {
    pub month: u32,
    pub incomes: Decimal,
    pub expenses: Decimal,
    pub net: Decimal,
}

/// Utilisation of a credit card by its unpaid expenses.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardUsage {
    pub card_id: Uuid,
    pub limit: Decimal,
    pub used: Decimal,
    pub available: Decimal,
}
