//! Internal helpers for input validation and identifiers.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every operation enforces the same invariants.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine};

/// Trim a required name, rejecting blank input.
pub(crate) fn normalize_required_name(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(format!(
            "{label} name must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim optional text; blank strings are stored as `NULL`.
pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

pub(crate) fn validate_price(price: MoneyCents) -> ResultEngine<()> {
    if price.is_negative() {
        return Err(EngineError::Validation(
            "base price must be >= 0".to_string(),
        ));
    }
    Ok(())
}

/// Human readable invoice number: `INV-<unix-seconds>-<8 hex chars>`.
///
/// The random suffix keeps numbers distinct when several invoices are
/// created within the same second.
pub(crate) fn invoice_number(now: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("INV-{}-{}", now.timestamp(), &suffix[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed_and_required() {
        assert_eq!(normalize_required_name("  Pizza ", "item").unwrap(), "Pizza");
        assert_eq!(
            normalize_required_name("   ", "item").unwrap_err(),
            EngineError::Validation("item name must not be empty".to_string())
        );
    }

    #[test]
    fn blank_optional_text_is_none() {
        assert_eq!(normalize_optional_text(Some("  ")), None);
        assert_eq!(normalize_optional_text(None), None);
        assert_eq!(
            normalize_optional_text(Some(" a@b.c ")),
            Some("a@b.c".to_string())
        );
    }

    #[test]
    fn invoice_numbers_carry_timestamp_and_differ() {
        let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let a = invoice_number(now);
        let b = invoice_number(now);
        assert!(a.starts_with("INV-1700000000-"));
        assert_eq!(a.len(), "INV-1700000000-".len() + 8);
        assert_ne!(a, b);
    }
}
