use uuid::Uuid;

use crate::core::errors::LedgerError;
use crate::domain::category::is_hex_color;
use crate::domain::common::same_name;
use crate::domain::{Category, CategoryKind, Ledger};

use super::ServiceResult;

pub struct CategoryService;

impl CategoryService {
    pub fn add(ledger: &mut Ledger, mut category: Category) -> ServiceResult<Uuid> {
        category.name = category.name.trim().to_string();
        Self::validate(ledger, None, &category)?;
        Ok(ledger.add_category(category))
    }

    /// Renames or recolours a category. Switching kind is refused while entries reference it.
    pub fn edit(ledger: &mut Ledger, id: Uuid, changes: Category) -> ServiceResult<()> {
        Self::validate(ledger, Some(id), &changes)?;
        let current_kind = ledger
            .category(id)
            .map(|category| category.kind)
            .ok_or_else(|| LedgerError::not_found("Category", id))?;
        if current_kind != changes.kind && Self::is_referenced(ledger, id) {
            return Err(LedgerError::Conflict(
                "Category kind cannot change while entries reference it".into(),
            ));
        }
        let category = ledger
            .category_mut(id)
            .ok_or_else(|| LedgerError::not_found("Category", id))?;
        category.name = changes.name.trim().to_string();
        category.kind = changes.kind;
        category.color = changes.color;
        ledger.touch();
        Ok(())
    }

    pub fn remove(ledger: &mut Ledger, id: Uuid) -> ServiceResult<Category> {
        if Self::is_referenced(ledger, id) {
            return Err(LedgerError::Conflict(
                "Category has linked entries".into(),
            ));
        }
        let position = ledger
            .categories
            .iter()
            .position(|category| category.id == id)
            .ok_or_else(|| LedgerError::not_found("Category", id))?;
        let removed = ledger.categories.remove(position);
        ledger.touch();
        Ok(removed)
    }

    pub fn list(ledger: &Ledger, kind: Option<CategoryKind>) -> Vec<&Category> {
        ledger
            .categories
            .iter()
            .filter(|category| kind.map_or(true, |kind| category.kind == kind))
            .collect()
    }

    fn is_referenced(ledger: &Ledger, id: Uuid) -> bool {
        ledger
            .entries
            .iter()
            .any(|entry| entry.category_id == Some(id))
    }

    fn validate(ledger: &Ledger, exclude: Option<Uuid>, category: &Category) -> ServiceResult<()> {
        if category.name.trim().is_empty() {
            return Err(LedgerError::invalid("category name must not be empty"));
        }
        if !is_hex_color(&category.color) {
            return Err(LedgerError::invalid(format!(
                "color `{}` is not a #RRGGBB value",
                category.color
            )));
        }
        let duplicate = ledger.categories.iter().any(|existing| {
            existing.kind == category.kind
                && same_name(&existing.name, &category.name)
                && exclude.map_or(true, |id| existing.id != id)
        });
        if duplicate {
            return Err(LedgerError::Conflict(format!(
                "{} category `{}` already exists",
                category.kind,
                category.name.trim()
            )));
        }
        Ok(())
    }
}
