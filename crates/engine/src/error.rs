//! The module contains the errors the engine can return.
//!
//! Settlement errors:
//!
//! - [`InvalidEvent`] an event cannot be split (bad amount or weights).
//! - [`UnknownPerson`] a payer or participant is not a member of the group.
//! - [`UnbalancedInput`] balances do not sum to zero. This is a bug in the
//!   balance calculation and is never corrected silently.
//! - [`GroupNotFound`] the group does not exist in the ledger.
//!
//! Ledger errors ([`GroupFinalized`], [`KeyNotFound`], [`ExistingKey`], ...)
//! are returned by the mutation entry points.
//!
//!  [`InvalidEvent`]: EngineError::InvalidEvent
//!  [`UnknownPerson`]: EngineError::UnknownPerson
//!  [`UnbalancedInput`]: EngineError::UnbalancedInput
//!  [`GroupNotFound`]: EngineError::GroupNotFound
//!  [`GroupFinalized`]: EngineError::GroupFinalized
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`ExistingKey`]: EngineError::ExistingKey
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid event: {0}")]
    InvalidEvent(String),
    #[error("Unknown person: {0}")]
    UnknownPerson(String),
    #[error("Unbalanced input: {0}")]
    UnbalancedInput(String),
    #[error("Group {0} not found")]
    GroupNotFound(i64),
    #[error("Group {0} is finalized")]
    GroupFinalized(i64),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid weight: {0}")]
    InvalidWeight(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidEvent(a), Self::InvalidEvent(b)) => a == b,
            (Self::UnknownPerson(a), Self::UnknownPerson(b)) => a == b,
            (Self::UnbalancedInput(a), Self::UnbalancedInput(b)) => a == b,
            (Self::GroupNotFound(a), Self::GroupNotFound(b)) => a == b,
            (Self::GroupFinalized(a), Self::GroupFinalized(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidWeight(a), Self::InvalidWeight(b)) => a == b,
            (Self::InvalidName(a), Self::InvalidName(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
