//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`Validation`] thrown when an input value is rejected before touching the
//!   database.
//! - [`NotFound`] thrown when the addressed row does not exist.
//! - [`MissingReference`] thrown when a payload points at a row that does not
//!   exist (an unknown category for an item, an unknown item on an invoice).
//! - [`HasDependents`] thrown when a delete is blocked by referencing rows.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`NotFound`]: EngineError::NotFound
//!  [`MissingReference`]: EngineError::MissingReference
//!  [`HasDependents`]: EngineError::HasDependents
use std::{fmt, time::Duration};

use sea_orm::DbErr;
use thiserror::Error;

/// Kind of row an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Category,
    Item,
    Customer,
    Invoice,
    InvoiceItem,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Item => "item",
            Self::Customer => "customer",
            Self::Invoice => "invoice",
            Self::InvoiceItem => "invoice item",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("{entity} {id} not found")]
    NotFound { entity: EntityKind, id: i32 },
    #[error("{entity} {id} does not exist")]
    MissingReference { entity: EntityKind, id: i32 },
    #[error("cannot delete {entity} {id}: referenced by {count} {dependents} row(s)")]
    HasDependents {
        entity: EntityKind,
        id: i32,
        dependents: EntityKind,
        count: u64,
    },
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl EngineError {
    /// Returns `true` when the database could not be reached at all.
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            Self::Database(DbErr::Conn(_)) | Self::Database(DbErr::ConnectionAcquire(_))
        )
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (
                Self::NotFound { entity: a, id: x },
                Self::NotFound { entity: b, id: y },
            ) => a == b && x == y,
            (
                Self::MissingReference { entity: a, id: x },
                Self::MissingReference { entity: b, id: y },
            ) => a == b && x == y,
            (
                Self::HasDependents {
                    entity: a,
                    id: x,
                    dependents: da,
                    count: ca,
                },
                Self::HasDependents {
                    entity: b,
                    id: y,
                    dependents: db,
                    count: cb,
                },
            ) => a == b && x == y && da == db && ca == cb,
            (Self::Timeout(a), Self::Timeout(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn has_dependents_message_carries_count() {
        let err = EngineError::HasDependents {
            entity: EntityKind::Category,
            id: 3,
            dependents: EntityKind::Item,
            count: 2,
        };
        assert_eq!(
            err.to_string(),
            "cannot delete category 3: referenced by 2 item row(s)"
        );
    }

    #[test]
    fn connectivity_is_detected() {
        let err = EngineError::from(DbErr::Conn(sea_orm::RuntimeErr::Internal(
            "refused".to_string(),
        )));
        assert!(err.is_connectivity());
        assert!(!EngineError::Validation("x".to_string()).is_connectivity());
    }
}
