// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use shift_alloc::CoreError;
use shift_alloc_domain::{DomainError, EntityKind};
use shift_alloc_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// Authentication failed.
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    #[error("Unauthorized: '{action}' requires {required_role} role")]
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
/// Every variant maps to exactly one wire code; see [`ApiError::code`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Authentication failed.
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    #[error("Unauthorized: '{action}' requires {required_role} role")]
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// Invalid input was provided.
    #[error("Invalid input for field '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    #[error("{resource_type} not found: {message}")]
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The slot has no remaining capacity.
    #[error("Slot {slot_id} is full ({confirmed}/{required} confirmed)")]
    SlotFull {
        /// The slot that rejected the confirmation.
        slot_id: i64,
        /// Live assignments when the confirmation was rejected.
        confirmed: u32,
        /// The slot's capacity.
        required: u32,
    },
    /// An internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// A description of the internal error.
        message: String,
        /// Whether the same request may succeed if sent again.
        retryable: bool,
    },
}

impl ApiError {
    /// The stable wire code for this error.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::SlotFull { .. } => "SLOT_FULL",
            Self::ResourceNotFound { .. } => "NOT_FOUND",
            Self::InvalidInput { .. } => "VALIDATION",
            Self::AuthenticationFailed { .. } | Self::Unauthorized { .. } => "UNAUTHORIZED",
            Self::Internal { .. } => "INTERNAL",
        }
    }

    /// Whether a client may retry the same request unchanged.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Internal { retryable: true, .. })
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

const fn resource_name(entity: EntityKind) -> &'static str {
    match entity {
        EntityKind::Tenant => "Tenant",
        EntityKind::Slot => "Slot",
        EntityKind::Member => "Member",
        EntityKind::Assignment => "Assignment",
        EntityKind::BusinessDay => "Business day",
        EntityKind::Position => "Position",
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err {
        DomainError::InvalidName { field, .. } => ApiError::InvalidInput {
            field: field.to_string(),
            message,
        },
        DomainError::InvalidCapacity { .. } => ApiError::InvalidInput {
            field: String::from("required_count"),
            message,
        },
        DomainError::InvalidPriority { .. } => ApiError::InvalidInput {
            field: String::from("priority"),
            message,
        },
        DomainError::ZeroLengthWindow { .. } | DomainError::InvalidTime { .. } => {
            ApiError::InvalidInput {
                field: String::from("window"),
                message,
            }
        }
        DomainError::InvalidDate { .. } | DomainError::InvalidDateRange { .. } => {
            ApiError::InvalidInput {
                field: String::from("date"),
                message,
            }
        }
        DomainError::InvalidStatus { .. } => ApiError::InvalidInput {
            field: String::from("status"),
            message,
        },
        DomainError::InvalidMethod { .. } => ApiError::InvalidInput {
            field: String::from("method"),
            message,
        },
        DomainError::NoteTooLong { .. } => ApiError::InvalidInput {
            field: String::from("note"),
            message,
        },
        DomainError::InactiveMember { .. } => ApiError::InvalidInput {
            field: String::from("member_id"),
            message,
        },
        DomainError::NotFound { entity, id } => ApiError::ResourceNotFound {
            resource_type: resource_name(entity).to_string(),
            message: format!("{} {id} does not exist in this tenant", resource_name(entity)),
        },
        DomainError::SlotFull {
            slot_id,
            confirmed,
            required,
        } => ApiError::SlotFull {
            slot_id: slot_id.value(),
            confirmed,
            required,
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    let retryable: bool = err.is_retryable();
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::TransactionFailure(msg) => {
            tracing::error!(error = %msg, retryable, "Allocation transaction failed");
            ApiError::Internal {
                message: format!("Transaction failed: {msg}"),
                retryable,
            }
        }
    }
}

/// Translates a persistence error from a direct storage read into an API
/// error.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message,
        },
        PersistenceError::Aborted(inner) => translate_core_error(inner),
        other => {
            tracing::error!(error = %other, "Storage read failed");
            ApiError::Internal {
                retryable: matches!(
                    other,
                    PersistenceError::DatabaseError(_)
                        | PersistenceError::DatabaseConnectionFailed(_)
                        | PersistenceError::PoolError(_)
                        | PersistenceError::QueryFailed(_)
                ),
                message: other.to_string(),
            }
        }
    }
}
