use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;

/// Bank account whose running balance is moved by expense payments.
///
/// `balance` is set once at creation and afterwards only changes through
/// [`PaymentService`](crate::core::services::PaymentService).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub kind: AccountKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bank: Option<String>,
    pub balance: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Account {
    /// Creates a new account with a zero balance.
    pub fn new(name: impl Into<String>, kind: AccountKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            bank: None,
            balance: Decimal::ZERO,
            notes: None,
        }
    }

    pub fn with_opening_balance(mut self, balance: Decimal) -> Self {
        self.balance = balance;
        self
    }

    pub fn with_bank(mut self, bank: impl Into<String>) -> Self {
        self.bank = Some(bank.into());
        self
    }
}

impl Identifiable for Account {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for Account {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Account {
    fn display_label(&self) -> String {
        match &self.bank {
            Some(bank) => format!("{} - {} ({})", self.name, bank, self.kind),
            None => format!("{} ({})", self.name, self.kind),
        }
    }
}

/// Enumerates the supported account classifications.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AccountKind {
    Checking,
    Savings,
    Investment,
    Wallet,
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AccountKind::Checking => "Checking",
            AccountKind::Savings => "Savings",
            AccountKind::Investment => "Investment",
            AccountKind::Wallet => "Wallet",
        };
        f.write_str(label)
    }
}

/// Credit card that expenses can be charged to instead of an account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreditCard {
    pub id: Uuid,
    pub name: String,
    pub limit: Decimal,
    pub closing_day: u8,
    pub due_day: u8,
}

impl CreditCard {
    pub fn new(name: impl Into<String>, limit: Decimal, closing_day: u8, due_day: u8) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            limit,
            closing_day,
            due_day,
        }
    }
}

impl Identifiable for CreditCard {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for CreditCard {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for CreditCard {
    fn display_label(&self) -> String {
        format!("{} (closes {}, due {})", self.name, self.closing_day, self.due_day)
    }
}
