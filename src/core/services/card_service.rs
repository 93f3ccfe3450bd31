use rust_decimal::Decimal;
use uuid::Uuid;

use crate::core::errors::LedgerError;
use crate::domain::common::name_taken;
use crate::domain::{CreditCard, Ledger};

use super::ServiceResult;

pub struct CardService;

impl CardService {
    pub fn add(ledger: &mut Ledger, mut card: CreditCard) -> ServiceResult<Uuid> {
        card.name = card.name.trim().to_string();
        Self::validate(ledger, None, &card)?;
        Ok(ledger.add_credit_card(card))
    }

    pub fn edit(ledger: &mut Ledger, id: Uuid, changes: CreditCard) -> ServiceResult<()> {
        Self::validate(ledger, Some(id), &changes)?;
        let card = ledger
            .credit_card_mut(id)
            .ok_or_else(|| LedgerError::not_found("Credit card", id))?;
        card.name = changes.name.trim().to_string();
        card.limit = changes.limit;
        card.closing_day = changes.closing_day;
        card.due_day = changes.due_day;
        ledger.touch();
        Ok(())
    }

    pub fn remove(ledger: &mut Ledger, id: Uuid) -> ServiceResult<CreditCard> {
        if ledger
            .entries
            .iter()
            .any(|entry| entry.credit_card_id() == Some(id))
        {
            return Err(LedgerError::Conflict(
                "Credit card has linked entries".into(),
            ));
        }
        let position = ledger
            .credit_cards
            .iter()
            .position(|card| card.id == id)
            .ok_or_else(|| LedgerError::not_found("Credit card", id))?;
        let removed = ledger.credit_cards.remove(position);
        ledger.touch();
        Ok(removed)
    }

    pub fn list(ledger: &Ledger) -> Vec<&CreditCard> {
        ledger.credit_cards.iter().collect()
    }

    fn validate(ledger: &Ledger, exclude: Option<Uuid>, card: &CreditCard) -> ServiceResult<()> {
        if card.name.trim().is_empty() {
            return Err(LedgerError::invalid("card name must not be empty"));
        }
        if card.limit < Decimal::ZERO {
            return Err(LedgerError::invalid("card limit must not be negative"));
        }
        for (label, day) in [("closing", card.closing_day), ("due", card.due_day)] {
            if !(1..=31).contains(&day) {
                return Err(LedgerError::invalid(format!(
                    "{} day must be between 1 and 31, got {}",
                    label, day
                )));
            }
        }
        if name_taken(&ledger.credit_cards, &card.name, exclude) {
            return Err(LedgerError::Conflict(format!(
                "Credit card `{}` already exists",
                card.name.trim()
            )));
        }
        Ok(())
    }
}
