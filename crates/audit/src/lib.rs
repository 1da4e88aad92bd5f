// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use shift_alloc_domain::{AssignmentId, DomainError, MemberId, SlotId, SlotOccupancy, TenantId};
use std::str::FromStr;
use time::OffsetDateTime;

/// Represents the entity performing an action.
///
/// For allocation changes this is the operator named in the request headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The type of actor (e.g., "admin", "coordinator", "system").
    pub actor_type: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `actor_type` - The type of actor
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }
}

/// Represents the reason or trigger for an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cause {
    /// A unique identifier for this cause (usually the request id).
    pub id: String,
    /// A description of the cause.
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// The state change an audit event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    SlotCreated,
    SlotRetired,
    /// A member was confirmed into a slot.
    AssignmentConfirmed,
    /// A member released their seat.
    AssignmentCancelled,
    /// An administrator removed the assignment.
    AssignmentRemoved,
}

impl ActionKind {
    /// Returns the stored action name.
    ///
    /// Assignment actions keep the short names downstream audit consumers
    /// already understand.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SlotCreated => "SLOT_CREATED",
            Self::SlotRetired => "SLOT_RETIRED",
            Self::AssignmentConfirmed => "CREATE",
            Self::AssignmentCancelled => "CANCEL",
            Self::AssignmentRemoved => "REMOVE",
        }
    }
}

impl FromStr for ActionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SLOT_CREATED" => Ok(Self::SlotCreated),
            "SLOT_RETIRED" => Ok(Self::SlotRetired),
            "CREATE" => Ok(Self::AssignmentConfirmed),
            "CANCEL" => Ok(Self::AssignmentCancelled),
            "REMOVE" => Ok(Self::AssignmentRemoved),
            _ => Err(DomainError::InvalidName {
                field: "action",
                reason: format!("unknown audit action '{s}'"),
            }),
        }
    }
}

/// Represents the specific action performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// What happened.
    pub kind: ActionKind,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    #[must_use]
    pub const fn new(kind: ActionKind, details: Option<String>) -> Self {
        Self { kind, details }
    }

    /// Returns the stored action name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.kind.as_str()
    }
}

/// A snapshot of slot occupancy at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    /// A string representation of the state.
    pub data: String,
}

impl StateSnapshot {
    /// Creates a new `StateSnapshot`.
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }

    /// Snapshot for a record that did not exist yet.
    #[must_use]
    pub fn absent() -> Self {
        Self::new(String::from("none"))
    }

    /// Snapshot of a slot's live count against its capacity.
    #[must_use]
    pub fn occupancy(occupancy: SlotOccupancy) -> Self {
        Self::new(occupancy.to_string())
    }
}

/// The records an audit event is about.
///
/// Every event names a tenant and a slot. Assignment events also name the
/// assignment and its member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditSubject {
    pub tenant_id: TenantId,
    pub slot_id: SlotId,
    pub assignment_id: Option<AssignmentId>,
    pub member_id: Option<MemberId>,
}

impl AuditSubject {
    /// Subject for slot-level events.
    #[must_use]
    pub const fn slot(tenant_id: TenantId, slot_id: SlotId) -> Self {
        Self {
            tenant_id,
            slot_id,
            assignment_id: None,
            member_id: None,
        }
    }

    /// Subject for assignment-level events.
    #[must_use]
    pub const fn assignment(
        tenant_id: TenantId,
        slot_id: SlotId,
        assignment_id: AssignmentId,
        member_id: MemberId,
    ) -> Self {
        Self {
            tenant_id,
            slot_id,
            assignment_id: Some(assignment_id),
            member_id: Some(member_id),
        }
    }
}

/// An immutable audit event representing a committed state transition.
///
/// Every committed allocation change produces exactly one audit event. Events
/// are built after commit and delivered out of band, so a lost event never
/// undoes the change it describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// What the event is about.
    pub subject: AuditSubject,
    /// The actor who initiated this state change.
    pub actor: Actor,
    /// The cause or reason for this state change.
    pub cause: Cause,
    /// The action that was performed.
    pub action: Action,
    /// The state before the transition.
    pub before: StateSnapshot,
    /// The state after the transition.
    pub after: StateSnapshot,
    /// When the change committed.
    pub occurred_at: OffsetDateTime,
}

impl AuditEvent {
    /// Creates a new `AuditEvent`.
    #[must_use]
    pub const fn new(
        subject: AuditSubject,
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
        occurred_at: OffsetDateTime,
    ) -> Self {
        Self {
            subject,
            actor,
            cause,
            action,
            before,
            after,
            occurred_at,
        }
    }
}
