use std::result::Result as StdResult;

use thiserror::Error;
use uuid::Uuid;

/// Unified error type for generator, services, storage and configuration.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// User input that cannot become ledger entries; recoverable by correcting the form.
    #[error("Invalid intent: {0}")]
    InvalidIntent(String),
    /// Payment requested on an expense that has no linked bank account.
    #[error("Entry {0} is not linked to an account")]
    UnlinkedAccount(Uuid),
    /// The persistence dependency failed; the operation did not take effect.
    ///
    /// `std::io::Error` and `serde_json::Error` convert into this variant by message.
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: Uuid },
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LedgerError {
    pub fn invalid(message: impl Into<String>) -> Self {
        LedgerError::InvalidIntent(message.into())
    }

    pub fn not_found(kind: &'static str, id: Uuid) -> Self {
        LedgerError::NotFound { kind, id }
    }

    /// Failures the caller can fix by editing input rather than retrying later.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            LedgerError::InvalidIntent(_)
                | LedgerError::UnlinkedAccount(_)
                | LedgerError::NotFound { .. }
                | LedgerError::Conflict(_)
        )
    }
}

pub type Result<T> = StdResult<T, LedgerError>;

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::StoreUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::StoreUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let id = Uuid::nil();
        assert_eq!(
            LedgerError::invalid("amount must be positive").to_string(),
            "Invalid intent: amount must be positive"
        );
        assert_eq!(
            LedgerError::UnlinkedAccount(id).to_string(),
            format!("Entry {id} is not linked to an account")
        );
        assert_eq!(
            LedgerError::not_found("Account", id).to_string(),
            format!("Account not found: {id}")
        );
    }

    #[test]
    fn io_errors_surface_as_store_unavailable() {
        let err: LedgerError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into();
        assert!(matches!(err, LedgerError::StoreUnavailable(ref msg) if msg.contains("read-only")));
        assert!(!err.is_user_error());
    }

    #[test]
    fn json_errors_surface_as_store_unavailable() {
        let parse = serde_json::from_str::<serde_json::Value>("{ broken").unwrap_err();
        let err: LedgerError = parse.into();
        assert!(matches!(err, LedgerError::StoreUnavailable(ref msg) if !msg.is_empty()));
        assert!(err.to_string().starts_with("Store unavailable: "));
    }
}
