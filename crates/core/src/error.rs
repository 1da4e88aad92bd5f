// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use shift_alloc_domain::{DomainError, EntityKind};

/// Errors that can occur during allocation operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// A domain rule was violated. Covers validation, missing records and
    /// full slots.
    #[error("Domain violation: {0}")]
    DomainViolation(#[from] DomainError),
    /// The store could not complete the transaction. Nothing was committed.
    #[error("Transaction failed: {0}")]
    TransactionFailure(String),
}

impl CoreError {
    /// Shorthand for a tenant-scoped lookup miss.
    #[must_use]
    pub const fn not_found(entity: EntityKind, id: i64) -> Self {
        Self::DomainViolation(DomainError::NotFound { entity, id })
    }

    /// Whether the caller may retry the same request unchanged.
    ///
    /// Only storage faults qualify. Validation errors, missing records and
    /// full slots give the same answer on every retry.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::TransactionFailure(_))
    }
}
