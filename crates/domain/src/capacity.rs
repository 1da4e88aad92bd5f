// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The admission rule.
//!
//! A slot with capacity `required` admits a new confirmation only while fewer
//! than `required` live assignments exist. The caller must hold the slot's
//! serialization point between counting and inserting; this module only
//! evaluates the rule.

use crate::error::DomainError;
use crate::ids::SlotId;
use serde::{Deserialize, Serialize};

/// Live assignment count against declared capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotOccupancy {
    confirmed: u32,
    required: u32,
}

impl SlotOccupancy {
    #[must_use]
    pub const fn new(confirmed: u32, required: u32) -> Self {
        Self {
            confirmed,
            required,
        }
    }

    #[must_use]
    pub const fn confirmed(&self) -> u32 {
        self.confirmed
    }

    #[must_use]
    pub const fn required(&self) -> u32 {
        self.required
    }

    /// Seats still open. Zero when full or over-full.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.required.saturating_sub(self.confirmed)
    }

    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.confirmed >= self.required
    }

    /// Checks whether one more confirmation fits and returns the occupancy
    /// after admitting it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SlotFull` when no seat remains.
    pub const fn admit(self, slot_id: SlotId) -> Result<Self, DomainError> {
        if self.is_full() {
            return Err(DomainError::SlotFull {
                slot_id,
                confirmed: self.confirmed,
                required: self.required,
            });
        }
        Ok(Self {
            confirmed: self.confirmed + 1,
            required: self.required,
        })
    }

    /// Occupancy after one live assignment is released.
    #[must_use]
    pub const fn release(self) -> Self {
        Self {
            confirmed: self.confirmed.saturating_sub(1),
            required: self.required,
        }
    }
}

impl std::fmt::Display for SlotOccupancy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "confirmed={}/{}", self.confirmed, self.required)
    }
}
