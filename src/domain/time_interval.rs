//! Calendar stepping used by installment and recurrence schedules.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TimeUnit {
    Day,
    Week,
    Month,
    Year,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeInterval {
    pub every: u32,
    pub unit: TimeUnit,
}

impl TimeInterval {
    pub const fn new(every: u32, unit: TimeUnit) -> Self {
        Self { every, unit }
    }

    pub const fn days(every: u32) -> Self {
        Self::new(every, TimeUnit::Day)
    }

    pub const fn months(every: u32) -> Self {
        Self::new(every, TimeUnit::Month)
    }

    /// Date of the `steps`-th occurrence counted from `anchor` (step 0 is the anchor itself).
    ///
    /// Month and year offsets are always measured from the anchor, so the
    /// day-of-month is clamped per target month without drifting: an anchor on
    /// Jan 31 yields Feb 28/29 and then Mar 31 again. Returns `None` only when the
    /// result falls outside chrono's representable range.
    pub fn nth_after(&self, anchor: NaiveDate, steps: u32) -> Option<NaiveDate> {
        let span = i64::from(self.every) * i64::from(steps);
        match self.unit {
            TimeUnit::Day => anchor.checked_add_signed(Duration::days(span)),
            TimeUnit::Week => anchor.checked_add_signed(Duration::weeks(span)),
            TimeUnit::Month => shift_month(anchor, i32::try_from(span).ok()?),
            TimeUnit::Year => shift_year(anchor, i32::try_from(span).ok()?),
        }
    }

    /// Next occurrence after `from`, clamping the day-of-month when needed.
    pub fn next_date(&self, from: NaiveDate) -> Option<NaiveDate> {
        self.nth_after(from, 1)
    }

    pub fn label(&self) -> String {
        match (self.every, self.unit) {
            (1, TimeUnit::Day) => "Daily".into(),
            (1, TimeUnit::Week) => "Weekly".into(),
            (1, TimeUnit::Month) => "Monthly".into(),
            (1, TimeUnit::Year) => "Yearly".into(),
            (n, unit) => format!("Every {} {:?}{}", n, unit, if n > 1 { "s" } else { "" }),
        }
    }
}

fn shift_month(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let index = date.year().checked_mul(12)? + date.month0() as i32 + months;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    let day = date.day().min(days_in_month(year, month)?);
    NaiveDate::from_ymd_opt(year, month, day)
}

fn shift_year(date: NaiveDate, years: i32) -> Option<NaiveDate> {
    let year = date.year().checked_add(years)?;
    let day = date.day().min(days_in_month(year, date.month())?);
    NaiveDate::from_ymd_opt(year, date.month(), day)
}

pub(crate) fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;
    first_next.pred_opt().map(|last| last.day())
}
