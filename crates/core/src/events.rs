// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Side effects emitted after commit.
//!
//! The allocator hands events to an [`EventSink`] once the slot lock is
//! released. Delivery is fire-and-forget: a sink failure is logged by the
//! allocator and never undoes the committed change.

use shift_alloc_audit::AuditEvent;
use shift_alloc_domain::{AssignmentId, MemberId, SlotId, TenantId};
use std::sync::Arc;
use time::OffsetDateTime;

/// Tells a member they have been seated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentNotification {
    pub tenant_id: TenantId,
    pub assignment_id: AssignmentId,
    pub member_id: MemberId,
    pub slot_id: SlotId,
    pub assigned_at: OffsetDateTime,
}

/// Everything the allocator publishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationEvent {
    Notification(AssignmentNotification),
    Audit(AuditEvent),
}

/// Failure to hand off an event.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventSinkError {
    /// The receiving side has shut down.
    #[error("event channel closed")]
    Closed,
    #[error("event rejected: {0}")]
    Rejected(String),
}

/// Destination for post-commit events.
pub trait EventSink: Send + Sync {
    /// Hands off one event without blocking on its processing.
    ///
    /// # Errors
    ///
    /// Returns an error if the event could not be enqueued.
    fn publish(&self, event: AllocationEvent) -> Result<(), EventSinkError>;
}

impl<T: EventSink + ?Sized> EventSink for Arc<T> {
    fn publish(&self, event: AllocationEvent) -> Result<(), EventSinkError> {
        (**self).publish(event)
    }
}

/// Drops every event. For tooling that has no downstream consumers.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardEvents;

impl EventSink for DiscardEvents {
    fn publish(&self, _event: AllocationEvent) -> Result<(), EventSinkError> {
        Ok(())
    }
}
