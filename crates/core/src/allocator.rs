// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The capacity allocator.
//!
//! Every state change follows the same shape:
//!
//! 1. Resolve the records involved, tenant-scoped, without locks.
//! 2. Claim the slot in the in-process [`SlotLockRegistry`].
//! 3. Open a store transaction holding the slot row lock, re-read the slot
//!    and count live assignments, decide, write, commit.
//! 4. Release the slot and only then publish events.
//!
//! Step 3 is what keeps the live count at or below capacity. The in-process
//! lock keeps same-slot requests from piling onto the database lock; the row
//! lock covers writers in other processes.

use crate::command::{ConfirmCommand, CreateSlotCommand};
use crate::error::CoreError;
use crate::events::{AllocationEvent, AssignmentNotification, EventSink};
use crate::outcome::{ConfirmOutcome, ReleaseOutcome, RetireOutcome};
use crate::query::{AssignmentDetail, AssignmentFilter};
use crate::slot_lock::{SlotGuard, SlotLockRegistry};
use crate::store::{AllocationStore, SlotTransaction};
use shift_alloc_audit::{
    Action, ActionKind, Actor, AuditEvent, AuditSubject, Cause, StateSnapshot,
};
use shift_alloc_domain::{
    AssignmentId, DomainError, EntityKind, NewShiftAssignment, NewShiftSlot, ShiftAssignment,
    ShiftSlot, ShiftWindow, SlotId, SlotOccupancy, TenantId,
};
use time::OffsetDateTime;
use tracing::{debug, info, warn};

/// Which release path a cancel/remove call takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Release {
    Cancel,
    Remove,
}

impl Release {
    const fn action(self) -> ActionKind {
        match self {
            Self::Cancel => ActionKind::AssignmentCancelled,
            Self::Remove => ActionKind::AssignmentRemoved,
        }
    }
}

/// Confirms, cancels and removes assignments without ever exceeding a slot's
/// capacity.
#[derive(Debug)]
pub struct Allocator<S, E> {
    store: S,
    events: E,
    locks: SlotLockRegistry,
}

impl<S: AllocationStore, E: EventSink> Allocator<S, E> {
    #[must_use]
    pub fn new(store: S, events: E) -> Self {
        Self {
            store,
            events,
            locks: SlotLockRegistry::new(),
        }
    }

    /// The underlying store, for read-only callers.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// The slot lock registry.
    #[must_use]
    pub const fn locks(&self) -> &SlotLockRegistry {
        &self.locks
    }

    /// Creates a slot after validating its attributes and references.
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed attributes, `NotFound` when the
    /// business day or position is missing in this tenant, or
    /// `TransactionFailure` on storage faults.
    pub fn create_slot(
        &self,
        tenant_id: TenantId,
        command: &CreateSlotCommand,
        actor: &Actor,
        cause: &Cause,
    ) -> Result<ShiftSlot, CoreError> {
        let window: ShiftWindow = ShiftWindow::parse(&command.start_time, &command.end_time)?;
        let new_slot: NewShiftSlot = NewShiftSlot::new(
            tenant_id,
            command.business_day_id,
            command.position_id,
            &command.slot_name,
            command.instance_name.as_deref(),
            window,
            command.required_count,
            command.priority,
        )?;

        if self
            .store
            .find_business_day(tenant_id, command.business_day_id)?
            .is_none()
        {
            return Err(CoreError::not_found(
                EntityKind::BusinessDay,
                command.business_day_id.value(),
            ));
        }
        if self
            .store
            .find_position(tenant_id, command.position_id)?
            .is_none()
        {
            return Err(CoreError::not_found(
                EntityKind::Position,
                command.position_id.value(),
            ));
        }

        let slot: ShiftSlot = self
            .store
            .insert_slot(&new_slot, OffsetDateTime::now_utc())?;

        info!(
            %tenant_id,
            slot_id = %slot.slot_id(),
            required_count = slot.required_count(),
            overnight = slot.window().crosses_midnight(),
            "Created shift slot"
        );

        self.publish(AllocationEvent::Audit(AuditEvent::new(
            AuditSubject::slot(tenant_id, slot.slot_id()),
            actor.clone(),
            cause.clone(),
            Action::new(
                ActionKind::SlotCreated,
                Some(format!(
                    "{} {}-{}",
                    slot.slot_name(),
                    window.start_str(),
                    window.end_str()
                )),
            ),
            StateSnapshot::absent(),
            StateSnapshot::occupancy(slot.occupancy(0)),
            slot.created_at(),
        )));

        Ok(slot)
    }

    /// Seats a member in a slot if capacity allows.
    ///
    /// A repeated confirmation for a member already seated in the slot returns
    /// the existing assignment with `created = false`, even when the slot is
    /// full.
    ///
    /// # Errors
    ///
    /// * `NotFound` if the slot (or a retired slot) or member is missing in
    ///   this tenant.
    /// * A validation error for an inactive member or an oversized note.
    /// * `SlotFull` if no seat remains.
    /// * `TransactionFailure` on storage faults; nothing was written.
    pub fn confirm(
        &self,
        tenant_id: TenantId,
        command: &ConfirmCommand,
        actor: &Actor,
        cause: &Cause,
    ) -> Result<ConfirmOutcome, CoreError> {
        let slot_id: SlotId = command.slot_id;

        let slot: ShiftSlot = self.resolve_open_slot(tenant_id, slot_id)?;
        let member = self
            .store
            .find_member(tenant_id, command.member_id)?
            .ok_or_else(|| CoreError::not_found(EntityKind::Member, command.member_id.value()))?;
        if !member.is_active {
            return Err(DomainError::InactiveMember {
                member_id: member.member_id,
            }
            .into());
        }

        let new_assignment: NewShiftAssignment = NewShiftAssignment::manual(
            tenant_id,
            slot.slot_id(),
            member.member_id,
            &actor.id,
            command.note.as_deref(),
            command.is_outside_preference,
            OffsetDateTime::now_utc(),
        )?;

        let guard: SlotGuard<'_> = self.locks.acquire(tenant_id, slot_id);
        let result: Result<ConfirmOutcome, CoreError> = self
            .store
            .with_slot_transaction(tenant_id, slot_id, |tx| admit(tx, slot_id, &new_assignment));
        drop(guard);

        let outcome: ConfirmOutcome = match result {
            Ok(outcome) => outcome,
            Err(err) => {
                if let CoreError::DomainViolation(DomainError::SlotFull {
                    confirmed,
                    required,
                    ..
                }) = &err
                {
                    info!(
                        %tenant_id,
                        %slot_id,
                        member_id = %member.member_id,
                        confirmed = *confirmed,
                        required = *required,
                        "Rejected confirmation, slot full"
                    );
                }
                return Err(err);
            }
        };

        if !outcome.created {
            debug!(
                %tenant_id,
                %slot_id,
                assignment_id = %outcome.assignment.assignment_id,
                "Member already confirmed, returning existing assignment"
            );
            return Ok(outcome);
        }

        info!(
            %tenant_id,
            %slot_id,
            member_id = %member.member_id,
            assignment_id = %outcome.assignment.assignment_id,
            occupancy = %outcome.after,
            "Confirmed assignment"
        );

        self.publish(AllocationEvent::Notification(AssignmentNotification {
            tenant_id,
            assignment_id: outcome.assignment.assignment_id,
            member_id: outcome.assignment.member_id,
            slot_id,
            assigned_at: outcome.assignment.assigned_at,
        }));
        self.publish(AllocationEvent::Audit(assignment_audit(
            &outcome.assignment,
            ActionKind::AssignmentConfirmed,
            actor,
            cause,
            outcome.before,
            outcome.after,
            outcome.assignment.assigned_at,
        )));

        Ok(outcome)
    }

    /// Cancels an assignment, releasing its seat.
    ///
    /// Cancelling an assignment that is no longer live succeeds with
    /// `changed = false`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the assignment is missing in this tenant, or
    /// `TransactionFailure` on storage faults.
    pub fn cancel(
        &self,
        tenant_id: TenantId,
        assignment_id: AssignmentId,
        actor: &Actor,
        cause: &Cause,
    ) -> Result<ReleaseOutcome, CoreError> {
        self.release(tenant_id, assignment_id, Release::Cancel, actor, cause)
    }

    /// Administratively removes an assignment.
    ///
    /// Removing a cancelled assignment still stamps `deleted_at` once, hiding
    /// it from default listings. Removing an already removed one succeeds with
    /// `changed = false`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the assignment is missing in this tenant, or
    /// `TransactionFailure` on storage faults.
    pub fn remove(
        &self,
        tenant_id: TenantId,
        assignment_id: AssignmentId,
        actor: &Actor,
        cause: &Cause,
    ) -> Result<ReleaseOutcome, CoreError> {
        self.release(tenant_id, assignment_id, Release::Remove, actor, cause)
    }

    /// Retires a slot. Existing assignments are kept and stay cancellable.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the slot is missing in this tenant, or
    /// `TransactionFailure` on storage faults.
    pub fn retire_slot(
        &self,
        tenant_id: TenantId,
        slot_id: SlotId,
        actor: &Actor,
        cause: &Cause,
    ) -> Result<RetireOutcome, CoreError> {
        if self.store.find_slot(tenant_id, slot_id)?.is_none() {
            return Err(CoreError::not_found(EntityKind::Slot, slot_id.value()));
        }

        let now: OffsetDateTime = OffsetDateTime::now_utc();
        let guard: SlotGuard<'_> = self.locks.acquire(tenant_id, slot_id);
        let outcome: RetireOutcome = self.store.with_slot_transaction(tenant_id, slot_id, |tx| {
            let slot: ShiftSlot = tx
                .locked_slot()?
                .ok_or_else(|| CoreError::not_found(EntityKind::Slot, slot_id.value()))?;
            let occupancy: SlotOccupancy = slot.occupancy(tx.count_live()?);
            if slot.is_retired() {
                return Ok(RetireOutcome {
                    slot,
                    changed: false,
                    occupancy,
                });
            }
            tx.retire_slot(now)?;
            Ok(RetireOutcome {
                slot: slot.retired_at(now),
                changed: true,
                occupancy,
            })
        })?;
        drop(guard);

        if outcome.changed {
            info!(%tenant_id, %slot_id, occupancy = %outcome.occupancy, "Retired shift slot");
            self.publish(AllocationEvent::Audit(AuditEvent::new(
                AuditSubject::slot(tenant_id, slot_id),
                actor.clone(),
                cause.clone(),
                Action::new(ActionKind::SlotRetired, None),
                StateSnapshot::occupancy(outcome.occupancy),
                StateSnapshot::occupancy(outcome.occupancy),
                now,
            )));
        }

        Ok(outcome)
    }

    /// Current live count against capacity. Unlocked; for display only.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the slot is missing in this tenant, or
    /// `TransactionFailure` on storage faults.
    pub fn occupancy(
        &self,
        tenant_id: TenantId,
        slot_id: SlotId,
    ) -> Result<(ShiftSlot, SlotOccupancy), CoreError> {
        let slot: ShiftSlot = self
            .store
            .find_slot(tenant_id, slot_id)?
            .ok_or_else(|| CoreError::not_found(EntityKind::Slot, slot_id.value()))?;
        let confirmed: u32 = self.store.count_live_assignments(tenant_id, slot_id)?;
        let occupancy: SlotOccupancy = slot.occupancy(confirmed);
        Ok((slot, occupancy))
    }

    /// Lists assignments with their joined details.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an inverted date range, or
    /// `TransactionFailure` on storage faults.
    pub fn list_assignments(
        &self,
        tenant_id: TenantId,
        filter: &AssignmentFilter,
    ) -> Result<Vec<AssignmentDetail>, CoreError> {
        filter.validate()?;
        self.store.list_assignments(tenant_id, filter)
    }

    fn resolve_open_slot(
        &self,
        tenant_id: TenantId,
        slot_id: SlotId,
    ) -> Result<ShiftSlot, CoreError> {
        self.store
            .find_slot(tenant_id, slot_id)?
            .filter(|slot| !slot.is_retired())
            .ok_or_else(|| CoreError::not_found(EntityKind::Slot, slot_id.value()))
    }

    fn release(
        &self,
        tenant_id: TenantId,
        assignment_id: AssignmentId,
        kind: Release,
        actor: &Actor,
        cause: &Cause,
    ) -> Result<ReleaseOutcome, CoreError> {
        let assignment: ShiftAssignment = self
            .store
            .find_assignment(tenant_id, assignment_id)?
            .ok_or_else(|| CoreError::not_found(EntityKind::Assignment, assignment_id.value()))?;
        let slot_id: SlotId = assignment.slot_id;

        let now: OffsetDateTime = OffsetDateTime::now_utc();
        let guard: SlotGuard<'_> = self.locks.acquire(tenant_id, slot_id);
        let outcome: ReleaseOutcome = self.store.with_slot_transaction(tenant_id, slot_id, |tx| {
            release_in(tx, slot_id, assignment_id, kind, now)
        })?;
        drop(guard);

        if !outcome.changed {
            debug!(%tenant_id, %assignment_id, ?kind, "Release was a no-op");
            return Ok(outcome);
        }

        info!(
            %tenant_id,
            %slot_id,
            %assignment_id,
            ?kind,
            occupancy = %outcome.after,
            "Released assignment"
        );
        self.publish(AllocationEvent::Audit(assignment_audit(
            &outcome.assignment,
            kind.action(),
            actor,
            cause,
            outcome.before,
            outcome.after,
            now,
        )));

        Ok(outcome)
    }

    fn publish(&self, event: AllocationEvent) {
        if let Err(err) = self.events.publish(event) {
            warn!(error = %err, "Failed to publish allocation event");
        }
    }
}

/// Count, idempotency check, capacity check and insert, under the slot lock.
fn admit(
    tx: &mut dyn SlotTransaction,
    slot_id: SlotId,
    new_assignment: &NewShiftAssignment,
) -> Result<ConfirmOutcome, CoreError> {
    let slot: ShiftSlot = tx
        .locked_slot()?
        .filter(|slot| !slot.is_retired())
        .ok_or_else(|| CoreError::not_found(EntityKind::Slot, slot_id.value()))?;
    let before: SlotOccupancy = slot.occupancy(tx.count_live()?);

    if let Some(existing) = tx.find_live_assignment(new_assignment.member_id)? {
        return Ok(ConfirmOutcome {
            assignment: existing,
            created: false,
            before,
            after: before,
        });
    }

    let after: SlotOccupancy = before.admit(slot_id)?;
    let assignment: ShiftAssignment = tx.insert_assignment(new_assignment)?;
    Ok(ConfirmOutcome {
        assignment,
        created: true,
        before,
        after,
    })
}

fn release_in(
    tx: &mut dyn SlotTransaction,
    slot_id: SlotId,
    assignment_id: AssignmentId,
    kind: Release,
    now: OffsetDateTime,
) -> Result<ReleaseOutcome, CoreError> {
    let slot: ShiftSlot = tx
        .locked_slot()?
        .ok_or_else(|| CoreError::not_found(EntityKind::Slot, slot_id.value()))?;
    let mut assignment: ShiftAssignment = tx
        .find_assignment(assignment_id)?
        .ok_or_else(|| CoreError::not_found(EntityKind::Assignment, assignment_id.value()))?;
    let before: SlotOccupancy = slot.occupancy(tx.count_live()?);
    let was_live: bool = assignment.is_live();

    let changed: bool = match kind {
        Release::Cancel => {
            let changed: bool = assignment.cancel(now);
            if changed {
                tx.mark_cancelled(assignment_id, now)?;
            }
            changed
        }
        Release::Remove => {
            let changed: bool = assignment.remove(now);
            if changed {
                tx.mark_removed(assignment_id, now)?;
            }
            changed
        }
    };

    let after: SlotOccupancy = if changed && was_live {
        before.release()
    } else {
        before
    };

    Ok(ReleaseOutcome {
        assignment,
        changed,
        before,
        after,
    })
}

fn assignment_audit(
    assignment: &ShiftAssignment,
    kind: ActionKind,
    actor: &Actor,
    cause: &Cause,
    before: SlotOccupancy,
    after: SlotOccupancy,
    occurred_at: OffsetDateTime,
) -> AuditEvent {
    let details: Option<String> = if kind == ActionKind::AssignmentConfirmed {
        assignment.note.clone()
    } else {
        None
    };
    AuditEvent::new(
        AuditSubject::assignment(
            assignment.tenant_id,
            assignment.slot_id,
            assignment.assignment_id,
            assignment.member_id,
        ),
        actor.clone(),
        cause.clone(),
        Action::new(kind, details),
        StateSnapshot::occupancy(before),
        StateSnapshot::occupancy(after),
        occurred_at,
    )
}
