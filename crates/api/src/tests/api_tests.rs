// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! End-to-end tests of the API operations against in-memory storage.

use shift_alloc_audit::{Action, ActionKind, AuditEvent, AuditSubject, StateSnapshot};
use shift_alloc_domain::{AssignmentId, MemberId, SlotId, SlotOccupancy};
use time::OffsetDateTime;

use crate::{
    ApiError, AuditTimelineQuery, AuditTimelineResponse, ConfirmAssignmentRequest,
    ConfirmAssignmentResponse, ListAssignmentsQuery, ListAssignmentsResponse,
    ReleaseAssignmentResponse, RetireSlotResponse, SlotInfo, SlotOccupancyResponse,
    cancel_assignment, confirm_assignment, create_slot, get_audit_timeline, get_slot_occupancy,
    list_assignments, remove_assignment, retire_slot,
};

use super::helpers::{
    Fixture, create_test_admin, create_test_cause, create_test_coordinator, create_test_slot,
    setup_fixture, slot_request,
};

fn confirm(
    fixture: &Fixture,
    slot_id: SlotId,
    member_id: MemberId,
) -> Result<ConfirmAssignmentResponse, ApiError> {
    confirm_assignment(
        &fixture.allocator,
        fixture.tenant,
        slot_id,
        ConfirmAssignmentRequest {
            member_id: member_id.value(),
            note: None,
            is_outside_preference: false,
        },
        &create_test_coordinator(),
        &create_test_cause(),
    )
}

#[test]
fn test_create_overnight_slot() {
    let fixture: Fixture = setup_fixture();

    let slot: SlotInfo = create_slot(
        &fixture.allocator,
        fixture.tenant,
        slot_request(&fixture, "21:00", "02:00", 3),
        &create_test_admin(),
        &create_test_cause(),
    )
    .unwrap();

    assert_eq!(slot.tenant_id, fixture.tenant.value());
    assert_eq!(slot.start_time, "21:00");
    assert_eq!(slot.end_time, "02:00");
    assert!(slot.ends_next_day);
    assert_eq!(slot.required_count, 3);
    assert!(slot.deleted_at.is_none());
}

#[test]
fn test_create_slot_rejects_invalid_input() {
    let fixture: Fixture = setup_fixture();

    let zero_capacity = create_slot(
        &fixture.allocator,
        fixture.tenant,
        slot_request(&fixture, "09:00", "17:00", 0),
        &create_test_admin(),
        &create_test_cause(),
    );
    let zero_length = create_slot(
        &fixture.allocator,
        fixture.tenant,
        slot_request(&fixture, "09:00", "09:00", 1),
        &create_test_admin(),
        &create_test_cause(),
    );
    let bad_time = create_slot(
        &fixture.allocator,
        fixture.tenant,
        slot_request(&fixture, "25:00", "09:00", 1),
        &create_test_admin(),
        &create_test_cause(),
    );

    assert_eq!(zero_capacity.unwrap_err().code(), "VALIDATION");
    assert_eq!(zero_length.unwrap_err().code(), "VALIDATION");
    assert_eq!(bad_time.unwrap_err().code(), "VALIDATION");
}

#[test]
fn test_create_slot_with_unknown_business_day_is_not_found() {
    let fixture: Fixture = setup_fixture();
    let mut request = slot_request(&fixture, "09:00", "17:00", 1);
    request.business_day_id = 9999;

    let result = create_slot(
        &fixture.allocator,
        fixture.tenant,
        request,
        &create_test_admin(),
        &create_test_cause(),
    );

    assert!(matches!(
        result,
        Err(ApiError::ResourceNotFound { ref resource_type, .. }) if resource_type == "Business day"
    ));
}

#[test]
fn test_confirm_then_repeat_is_idempotent() {
    let fixture: Fixture = setup_fixture();
    let slot_id: SlotId = create_test_slot(&fixture, 2);

    let first: ConfirmAssignmentResponse = confirm(&fixture, slot_id, fixture.avery).unwrap();
    let again: ConfirmAssignmentResponse = confirm(&fixture, slot_id, fixture.avery).unwrap();

    assert!(first.created);
    assert_eq!(first.assignment.status, "confirmed");
    assert_eq!(first.assignment.method, "manual");
    assert_eq!(first.assignment.assigned_by, "coord-456");
    assert_eq!(first.occupancy.confirmed_count, 1);
    assert!(!again.created);
    assert_eq!(again.assignment.assignment_id, first.assignment.assignment_id);
    assert_eq!(again.occupancy.confirmed_count, 1);
}

#[test]
fn test_full_slot_reports_slot_full() {
    let fixture: Fixture = setup_fixture();
    let slot_id: SlotId = create_test_slot(&fixture, 1);
    confirm(&fixture, slot_id, fixture.avery).unwrap();

    let err: ApiError = confirm(&fixture, slot_id, fixture.blake).unwrap_err();

    assert_eq!(
        err,
        ApiError::SlotFull {
            slot_id: slot_id.value(),
            confirmed: 1,
            required: 1,
        }
    );
    assert_eq!(err.code(), "SLOT_FULL");
    assert!(!err.is_retryable());
}

#[test]
fn test_cancel_frees_the_seat() {
    let fixture: Fixture = setup_fixture();
    let slot_id: SlotId = create_test_slot(&fixture, 1);
    let seated: ConfirmAssignmentResponse = confirm(&fixture, slot_id, fixture.avery).unwrap();

    let released: ReleaseAssignmentResponse = cancel_assignment(
        &fixture.allocator,
        fixture.tenant,
        AssignmentId::new(seated.assignment.assignment_id),
        &create_test_coordinator(),
        &create_test_cause(),
    )
    .unwrap();

    assert!(released.changed);
    assert_eq!(released.assignment.status, "cancelled");
    assert_eq!(released.occupancy.confirmed_count, 0);
    assert!(confirm(&fixture, slot_id, fixture.blake).unwrap().created);
}

#[test]
fn test_remove_by_admin() {
    let fixture: Fixture = setup_fixture();
    let slot_id: SlotId = create_test_slot(&fixture, 1);
    let seated: ConfirmAssignmentResponse = confirm(&fixture, slot_id, fixture.avery).unwrap();

    let removed: ReleaseAssignmentResponse = remove_assignment(
        &fixture.allocator,
        fixture.tenant,
        AssignmentId::new(seated.assignment.assignment_id),
        &create_test_admin(),
        &create_test_cause(),
    )
    .unwrap();

    assert!(removed.changed);
    assert!(removed.assignment.deleted_at.is_some());
    assert_eq!(removed.occupancy.confirmed_count, 0);
}

#[test]
fn test_cancel_unknown_assignment_is_not_found() {
    let fixture: Fixture = setup_fixture();

    let err: ApiError = cancel_assignment(
        &fixture.allocator,
        fixture.tenant,
        AssignmentId::new(4242),
        &create_test_coordinator(),
        &create_test_cause(),
    )
    .unwrap_err();

    assert_eq!(err.code(), "NOT_FOUND");
}

#[test]
fn test_occupancy_and_retirement() {
    let fixture: Fixture = setup_fixture();
    let slot_id: SlotId = create_test_slot(&fixture, 2);
    confirm(&fixture, slot_id, fixture.avery).unwrap();

    let before: SlotOccupancyResponse =
        get_slot_occupancy(&fixture.allocator, fixture.tenant, slot_id).unwrap();
    let retired: RetireSlotResponse = retire_slot(
        &fixture.allocator,
        fixture.tenant,
        slot_id,
        &create_test_admin(),
        &create_test_cause(),
    )
    .unwrap();

    assert_eq!(before.occupancy.confirmed_count, 1);
    assert_eq!(before.occupancy.remaining, 1);
    assert!(!before.occupancy.is_full);
    assert!(retired.changed);
    assert!(retired.slot.deleted_at.is_some());
    assert_eq!(
        confirm(&fixture, slot_id, fixture.blake).unwrap_err().code(),
        "NOT_FOUND"
    );
}

#[test]
fn test_inactive_member_is_a_validation_error() {
    let fixture: Fixture = setup_fixture();
    let slot_id: SlotId = create_test_slot(&fixture, 2);
    fixture
        .allocator
        .store()
        .set_member_active(fixture.tenant, fixture.blake, false)
        .unwrap();

    let err: ApiError = confirm(&fixture, slot_id, fixture.blake).unwrap_err();

    assert!(matches!(
        err,
        ApiError::InvalidInput { ref field, .. } if field == "member_id"
    ));
}

#[test]
fn test_list_assignments_with_filters() {
    let fixture: Fixture = setup_fixture();
    let slot_id: SlotId = create_test_slot(&fixture, 2);
    let seated: ConfirmAssignmentResponse = confirm(&fixture, slot_id, fixture.avery).unwrap();
    confirm(&fixture, slot_id, fixture.blake).unwrap();
    cancel_assignment(
        &fixture.allocator,
        fixture.tenant,
        AssignmentId::new(seated.assignment.assignment_id),
        &create_test_coordinator(),
        &create_test_cause(),
    )
    .unwrap();

    let all: ListAssignmentsResponse = list_assignments(
        &fixture.allocator,
        fixture.tenant,
        &ListAssignmentsQuery::default(),
    )
    .unwrap();
    let confirmed: ListAssignmentsResponse = list_assignments(
        &fixture.allocator,
        fixture.tenant,
        &ListAssignmentsQuery {
            status: Some(String::from("confirmed")),
            date_from: Some(String::from("2026-03-14")),
            date_to: Some(String::from("2026-03-14")),
            ..ListAssignmentsQuery::default()
        },
    )
    .unwrap();

    assert_eq!(all.assignments.len(), 2);
    assert_eq!(confirmed.assignments.len(), 1);
    let row = &confirmed.assignments[0];
    assert_eq!(row.member_display_name, "Blake");
    assert_eq!(row.position_name, "Bartender");
    assert_eq!(row.day_date, "2026-03-14");
    assert_eq!(row.start_time, "17:00");
    assert_eq!(row.end_time, "23:00");
    assert!(!row.ends_next_day);
}

#[test]
fn test_list_assignments_rejects_bad_filters() {
    let fixture: Fixture = setup_fixture();

    let bad_status = list_assignments(
        &fixture.allocator,
        fixture.tenant,
        &ListAssignmentsQuery {
            status: Some(String::from("pending")),
            ..ListAssignmentsQuery::default()
        },
    );
    let bad_date = list_assignments(
        &fixture.allocator,
        fixture.tenant,
        &ListAssignmentsQuery {
            date_from: Some(String::from("14/03/2026")),
            ..ListAssignmentsQuery::default()
        },
    );
    let inverted = list_assignments(
        &fixture.allocator,
        fixture.tenant,
        &ListAssignmentsQuery {
            date_from: Some(String::from("2026-03-15")),
            date_to: Some(String::from("2026-03-14")),
            ..ListAssignmentsQuery::default()
        },
    );

    assert!(matches!(
        bad_status,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "status"
    ));
    assert!(matches!(
        bad_date,
        Err(ApiError::InvalidInput { ref field, .. }) if field == "date"
    ));
    assert_eq!(inverted.unwrap_err().code(), "VALIDATION");
}

#[test]
fn test_audit_timeline_reads_persisted_events() {
    let fixture: Fixture = setup_fixture();
    let slot_id: SlotId = create_test_slot(&fixture, 2);
    let persistence = fixture.allocator.store();
    persistence
        .persist_audit_event(&AuditEvent::new(
            AuditSubject::slot(fixture.tenant, slot_id),
            create_test_admin().to_audit_actor(),
            create_test_cause(),
            Action::new(ActionKind::SlotRetired, None),
            StateSnapshot::occupancy(SlotOccupancy::new(0, 2)),
            StateSnapshot::occupancy(SlotOccupancy::new(0, 2)),
            OffsetDateTime::now_utc(),
        ))
        .unwrap();

    let timeline: AuditTimelineResponse = get_audit_timeline(
        persistence,
        fixture.tenant,
        &AuditTimelineQuery {
            slot_id: Some(slot_id.value()),
        },
    )
    .unwrap();

    assert_eq!(timeline.events.len(), 1);
    let event = &timeline.events[0];
    assert_eq!(event.action, "SLOT_RETIRED");
    assert_eq!(event.actor_id, "admin-123");
    assert_eq!(event.actor_type, "admin");
    assert_eq!(event.cause_id, "api-req-456");
    assert_eq!(event.before, "confirmed=0/2");
    assert!(event.assignment_id.is_none());
}
