use std::fmt;

use serde::{Deserialize, Serialize};

use super::time_interval::{TimeInterval, TimeUnit};

/// Repetition schedule of a ledger entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Recurrence {
    #[default]
    Unique,
    Weekly,
    Biweekly,
    Monthly,
    Bimonthly,
    Quarterly,
    Annual,
}

impl Recurrence {
    pub const ALL: [Recurrence; 7] = [
        Recurrence::Unique,
        Recurrence::Weekly,
        Recurrence::Biweekly,
        Recurrence::Monthly,
        Recurrence::Bimonthly,
        Recurrence::Quarterly,
        Recurrence::Annual,
    ];

    pub fn is_unique(&self) -> bool {
        matches!(self, Recurrence::Unique)
    }

    /// Calendar step between two occurrences, `None` for [`Recurrence::Unique`].
    ///
    /// Biweekly steps 15 days.
    pub fn interval(&self) -> Option<TimeInterval> {
        let interval = match self {
            Recurrence::Unique => return None,
            Recurrence::Weekly => TimeInterval::new(1, TimeUnit::Week),
            Recurrence::Biweekly => TimeInterval::days(15),
            Recurrence::Monthly => TimeInterval::months(1),
            Recurrence::Bimonthly => TimeInterval::months(2),
            Recurrence::Quarterly => TimeInterval::months(3),
            Recurrence::Annual => TimeInterval::new(1, TimeUnit::Year),
        };
        Some(interval)
    }
}

impl fmt::Display for Recurrence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Recurrence::Unique => "Unique",
            Recurrence::Weekly => "Weekly",
            Recurrence::Biweekly => "Biweekly",
            Recurrence::Monthly => "Monthly",
            Recurrence::Bimonthly => "Bimonthly",
            Recurrence::Quarterly => "Quarterly",
            Recurrence::Annual => "Annual",
        };
        f.write_str(label)
    }
}
