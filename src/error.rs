//! Error types used by the castlewatch runtime.
//!
//! The encounter itself has no recoverable errors: deadlock, double-fire of a
//! terminal notification and double revocation are ruled out by construction.
//! [`SiegeError`] covers misuse of the setup API instead (bad configuration,
//! assigning guards twice, addressing a guard that does not exist).

use thiserror::Error;

use crate::core::GuardId;

/// # Errors produced while setting up or steering a siege.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SiegeError {
    /// A castle needs at least one guard so that one can be sent off duty.
    #[error("castle has no guards")]
    NoGuards,

    /// Guard duties are assigned exactly once per castle.
    #[error("guards are already assigned")]
    AlreadyAssigned,

    /// Reassignment requested before the initial duty assignment.
    #[error("guards are not assigned yet")]
    NotAssigned,

    /// The castle has no guard with this id.
    #[error("unknown guard {id}")]
    UnknownGuard {
        /// The id that was looked up.
        id: GuardId,
    },

    /// Configuration failed validation.
    #[error("invalid config: {reason}")]
    InvalidConfig {
        /// What was wrong with it.
        reason: &'static str,
    },
}

impl SiegeError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use castlewatch::SiegeError;
    ///
    /// assert_eq!(SiegeError::NoGuards.as_label(), "siege_no_guards");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            SiegeError::NoGuards => "siege_no_guards",
            SiegeError::AlreadyAssigned => "siege_already_assigned",
            SiegeError::NotAssigned => "siege_not_assigned",
            SiegeError::UnknownGuard { .. } => "siege_unknown_guard",
            SiegeError::InvalidConfig { .. } => "siege_invalid_config",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            SiegeError::NoGuards => "castle needs at least one guard".to_string(),
            SiegeError::AlreadyAssigned => "duty assignment runs once".to_string(),
            SiegeError::NotAssigned => "assign guards before reassigning".to_string(),
            SiegeError::UnknownGuard { id } => format!("no guard with id={id}"),
            SiegeError::InvalidConfig { reason } => format!("config rejected: {reason}"),
        }
    }
}
