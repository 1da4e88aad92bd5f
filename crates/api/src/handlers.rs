// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API operations.
//!
//! Each operation authorizes the actor, converts the request into a core
//! command, runs it on the allocator and translates the outcome into a
//! response DTO. Operations are synchronous; the server runs them on the
//! blocking pool.

use shift_alloc::{
    AllocationStore, Allocator, AssignmentDetail, AssignmentFilter, ConfirmCommand,
    ConfirmOutcome, CreateSlotCommand, EventSink, ReleaseOutcome, RetireOutcome,
};
use shift_alloc_audit::{Actor, Cause};
use shift_alloc_domain::{
    AssignmentId, AssignmentStatus, BusinessDayId, MemberId, PositionId, ShiftSlot, SlotId,
    SlotOccupancy, TenantId, parse_date,
};
use shift_alloc_persistence::{Persistence, StoredAuditEvent};
use time::Date;

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::request_response::{
    AssignmentDetailInfo, AssignmentInfo, AuditEventInfo, AuditTimelineQuery,
    AuditTimelineResponse, ConfirmAssignmentRequest, ConfirmAssignmentResponse,
    CreateSlotRequest, ListAssignmentsQuery, ListAssignmentsResponse, OccupancyInfo,
    ReleaseAssignmentResponse, RetireSlotResponse, SlotInfo, SlotOccupancyResponse,
};

/// Creates a shift slot.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not an Admin
/// - The window, capacity, priority or names are invalid
/// - The business day or position does not exist in the tenant
/// - The slot cannot be stored
pub fn create_slot<S: AllocationStore, E: EventSink>(
    allocator: &Allocator<S, E>,
    tenant_id: TenantId,
    request: CreateSlotRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: &Cause,
) -> Result<SlotInfo, ApiError> {
    AuthorizationService::authorize_create_slot(authenticated_actor)?;

    let command: CreateSlotCommand = CreateSlotCommand {
        business_day_id: BusinessDayId::new(request.business_day_id),
        position_id: PositionId::new(request.position_id),
        slot_name: request.slot_name,
        instance_name: request.instance_name,
        start_time: request.start_time,
        end_time: request.end_time,
        required_count: request.required_count,
        priority: request.priority,
    };
    let actor: Actor = authenticated_actor.to_audit_actor();

    let slot: ShiftSlot = allocator
        .create_slot(tenant_id, &command, &actor, cause)
        .map_err(translate_core_error)?;

    Ok(SlotInfo::from(&slot))
}

/// Reads a slot with its current occupancy.
///
/// The count is read without taking the slot lock and may be stale by the
/// time the caller sees it.
///
/// # Errors
///
/// Returns an error if the slot does not exist in the tenant or storage
/// fails.
pub fn get_slot_occupancy<S: AllocationStore, E: EventSink>(
    allocator: &Allocator<S, E>,
    tenant_id: TenantId,
    slot_id: SlotId,
) -> Result<SlotOccupancyResponse, ApiError> {
    let (slot, occupancy): (ShiftSlot, SlotOccupancy) = allocator
        .occupancy(tenant_id, slot_id)
        .map_err(translate_core_error)?;

    Ok(SlotOccupancyResponse {
        slot: SlotInfo::from(&slot),
        occupancy: OccupancyInfo::from(occupancy),
    })
}

/// Retires a slot. Confirmations stop; existing assignments remain.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin, the slot does not exist in
/// the tenant, or storage fails.
pub fn retire_slot<S: AllocationStore, E: EventSink>(
    allocator: &Allocator<S, E>,
    tenant_id: TenantId,
    slot_id: SlotId,
    authenticated_actor: &AuthenticatedActor,
    cause: &Cause,
) -> Result<RetireSlotResponse, ApiError> {
    AuthorizationService::authorize_retire_slot(authenticated_actor)?;

    let actor: Actor = authenticated_actor.to_audit_actor();
    let outcome: RetireOutcome = allocator
        .retire_slot(tenant_id, slot_id, &actor, cause)
        .map_err(translate_core_error)?;

    Ok(RetireSlotResponse {
        slot: SlotInfo::from(&outcome.slot),
        changed: outcome.changed,
        occupancy: OccupancyInfo::from(outcome.occupancy),
    })
}

/// Confirms a member into a slot.
///
/// A repeat confirmation returns the member's existing live assignment with
/// `created = false`.
///
/// # Errors
///
/// Returns an error if:
/// - The slot (or a retired slot) or member does not exist in the tenant
/// - The member is inactive or the note is too long
/// - The slot is full
/// - Storage fails
pub fn confirm_assignment<S: AllocationStore, E: EventSink>(
    allocator: &Allocator<S, E>,
    tenant_id: TenantId,
    slot_id: SlotId,
    request: ConfirmAssignmentRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: &Cause,
) -> Result<ConfirmAssignmentResponse, ApiError> {
    let mut command: ConfirmCommand =
        ConfirmCommand::new(slot_id, MemberId::new(request.member_id));
    command.note = request.note;
    command.is_outside_preference = request.is_outside_preference;
    let actor: Actor = authenticated_actor.to_audit_actor();

    let outcome: ConfirmOutcome = allocator
        .confirm(tenant_id, &command, &actor, cause)
        .map_err(translate_core_error)?;

    Ok(ConfirmAssignmentResponse {
        assignment: AssignmentInfo::from(&outcome.assignment),
        created: outcome.created,
        occupancy: OccupancyInfo::from(outcome.after),
    })
}

/// Cancels an assignment and frees its seat.
///
/// # Errors
///
/// Returns an error if the assignment does not exist in the tenant or
/// storage fails.
pub fn cancel_assignment<S: AllocationStore, E: EventSink>(
    allocator: &Allocator<S, E>,
    tenant_id: TenantId,
    assignment_id: AssignmentId,
    authenticated_actor: &AuthenticatedActor,
    cause: &Cause,
) -> Result<ReleaseAssignmentResponse, ApiError> {
    let actor: Actor = authenticated_actor.to_audit_actor();
    let outcome: ReleaseOutcome = allocator
        .cancel(tenant_id, assignment_id, &actor, cause)
        .map_err(translate_core_error)?;
    Ok(release_response(&outcome))
}

/// Administratively removes an assignment.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin, the assignment does not
/// exist in the tenant, or storage fails.
pub fn remove_assignment<S: AllocationStore, E: EventSink>(
    allocator: &Allocator<S, E>,
    tenant_id: TenantId,
    assignment_id: AssignmentId,
    authenticated_actor: &AuthenticatedActor,
    cause: &Cause,
) -> Result<ReleaseAssignmentResponse, ApiError> {
    AuthorizationService::authorize_remove_assignment(authenticated_actor)?;

    let actor: Actor = authenticated_actor.to_audit_actor();
    let outcome: ReleaseOutcome = allocator
        .remove(tenant_id, assignment_id, &actor, cause)
        .map_err(translate_core_error)?;
    Ok(release_response(&outcome))
}

fn release_response(outcome: &ReleaseOutcome) -> ReleaseAssignmentResponse {
    ReleaseAssignmentResponse {
        assignment: AssignmentInfo::from(&outcome.assignment),
        changed: outcome.changed,
        occupancy: OccupancyInfo::from(outcome.after),
    }
}

fn parse_optional_date(value: Option<&str>) -> Result<Option<Date>, ApiError> {
    value
        .map(|v| parse_date(v).map_err(translate_domain_error))
        .transpose()
}

/// Converts listing query parameters into a filter.
///
/// # Errors
///
/// Returns an error for an unknown status or a malformed date.
pub fn build_assignment_filter(
    query: &ListAssignmentsQuery,
) -> Result<AssignmentFilter, ApiError> {
    let status: Option<AssignmentStatus> = query
        .status
        .as_deref()
        .map(|s| s.parse::<AssignmentStatus>().map_err(translate_domain_error))
        .transpose()?;

    Ok(AssignmentFilter {
        member_id: query.member_id.map(MemberId::new),
        slot_id: query.slot_id.map(SlotId::new),
        status,
        date_from: parse_optional_date(query.date_from.as_deref())?,
        date_to: parse_optional_date(query.date_to.as_deref())?,
        include_removed: query.include_removed,
    })
}

/// Lists a tenant's assignments with slot, member, position and day details.
///
/// # Errors
///
/// Returns an error for invalid filters or if storage fails.
pub fn list_assignments<S: AllocationStore, E: EventSink>(
    allocator: &Allocator<S, E>,
    tenant_id: TenantId,
    query: &ListAssignmentsQuery,
) -> Result<ListAssignmentsResponse, ApiError> {
    let filter: AssignmentFilter = build_assignment_filter(query)?;
    let details: Vec<AssignmentDetail> = allocator
        .list_assignments(tenant_id, &filter)
        .map_err(translate_core_error)?;

    Ok(ListAssignmentsResponse {
        assignments: details.into_iter().map(AssignmentDetailInfo::from).collect(),
    })
}

/// Reads a tenant's audit timeline, oldest first.
///
/// # Errors
///
/// Returns an error if storage fails.
pub fn get_audit_timeline(
    persistence: &Persistence,
    tenant_id: TenantId,
    query: &AuditTimelineQuery,
) -> Result<AuditTimelineResponse, ApiError> {
    let events: Vec<StoredAuditEvent> = persistence
        .list_audit_events(tenant_id, query.slot_id.map(SlotId::new))
        .map_err(translate_persistence_error)?;

    Ok(AuditTimelineResponse {
        events: events.into_iter().map(AuditEventInfo::from).collect(),
    })
}
