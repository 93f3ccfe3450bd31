//! Domain types representing entry categories.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;
use crate::domain::entry::EntryKind;

pub const DEFAULT_CATEGORY_COLOR: &str = "#6B7280";

/// Classifies incomes and expenses for reporting and charts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub kind: CategoryKind,
    #[serde(default = "Category::default_color")]
    pub color: String,
}

impl Category {
    pub fn new(name: impl Into<String>, kind: CategoryKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            color: Self::default_color(),
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn default_color() -> String {
        DEFAULT_CATEGORY_COLOR.to_string()
    }

    /// Whether entries of `kind` may be classified under this category.
    pub fn accepts(&self, kind: EntryKind) -> bool {
        matches!(
            (self.kind, kind),
            (CategoryKind::Income, EntryKind::Income) | (CategoryKind::Expense, EntryKind::Expense)
        )
    }
}

impl Identifiable for Category {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Category {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Category {
    fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.kind)
    }
}

/// Supported category types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CategoryKind {
    Income,
    Expense,
}

impl From<EntryKind> for CategoryKind {
    fn from(kind: EntryKind) -> Self {
        match kind {
            EntryKind::Income => CategoryKind::Income,
            EntryKind::Expense => CategoryKind::Expense,
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CategoryKind::Income => "Income",
            CategoryKind::Expense => "Expense",
        };
        f.write_str(label)
    }
}

/// Returns true for `#RRGGBB` hex colors.
pub fn is_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit())
}
