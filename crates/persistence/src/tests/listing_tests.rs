// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Roster listing: joins, ordering and filters.

use crate::Persistence;
use crate::tests::{
    DbAllocator, Seeded, add_member, create_allocator, create_test_actor, create_test_cause, seed,
    slot_command,
};
use shift_alloc::{
    AssignmentDetail, AssignmentFilter, ConfirmCommand, CoreError, CreateSlotCommand,
};
use shift_alloc_domain::{
    AssignmentId, AssignmentMethod, AssignmentStatus, BusinessDay, DomainError, MemberId, SlotId,
};
use time::macros::{date, time};

/// Two days, three slots and three members with a mix of statuses.
struct Roster {
    allocator: DbAllocator,
    seeded: Seeded,
    avery: MemberId,
    blake: MemberId,
    casey: MemberId,
    evening: SlotId,
    morning: SlotId,
    overnight: SlotId,
    cancelled: AssignmentId,
    removed: AssignmentId,
}

fn slot(allocator: &DbAllocator, seeded: &Seeded, command: &CreateSlotCommand) -> SlotId {
    allocator
        .create_slot(
            seeded.tenant,
            command,
            &create_test_actor(),
            &create_test_cause(),
        )
        .unwrap()
        .slot_id()
}

fn confirm(
    allocator: &DbAllocator,
    seeded: &Seeded,
    slot_id: SlotId,
    member_id: MemberId,
) -> AssignmentId {
    allocator
        .confirm(
            seeded.tenant,
            &ConfirmCommand::new(slot_id, member_id),
            &create_test_actor(),
            &create_test_cause(),
        )
        .unwrap()
        .assignment
        .assignment_id
}

fn build_roster() -> Roster {
    let (allocator, seeded) = create_allocator(Persistence::new_in_memory().unwrap());
    let sunday: BusinessDay = allocator
        .store()
        .register_business_day(seeded.tenant, date!(2026 - 03 - 15), Some("Sunday"))
        .unwrap();

    // Created out of display order so the listing has to sort.
    let evening: SlotId = slot(&allocator, &seeded, &slot_command(&seeded, "17:00", "23:00", 3));
    let mut brunch: CreateSlotCommand = slot_command(&seeded, "10:00", "15:00", 3);
    brunch.business_day_id = sunday.business_day_id;
    brunch.slot_name = String::from("Brunch");
    let morning: SlotId = slot(&allocator, &seeded, &brunch);
    let mut late: CreateSlotCommand = slot_command(&seeded, "22:00", "03:00", 2);
    late.slot_name = String::from("Late Bar");
    late.instance_name = Some(String::from("Rooftop"));
    let overnight: SlotId = slot(&allocator, &seeded, &late);

    let avery: MemberId = add_member(allocator.store(), seeded.tenant, "Avery");
    let blake: MemberId = add_member(allocator.store(), seeded.tenant, "Blake");
    let casey: MemberId = add_member(allocator.store(), seeded.tenant, "Casey");

    confirm(&allocator, &seeded, morning, avery);
    confirm(&allocator, &seeded, overnight, blake);
    confirm(&allocator, &seeded, evening, avery);
    let cancelled: AssignmentId = confirm(&allocator, &seeded, evening, blake);
    let removed: AssignmentId = confirm(&allocator, &seeded, evening, casey);

    allocator
        .cancel(
            seeded.tenant,
            cancelled,
            &create_test_actor(),
            &create_test_cause(),
        )
        .unwrap();
    allocator
        .remove(
            seeded.tenant,
            removed,
            &create_test_actor(),
            &create_test_cause(),
        )
        .unwrap();

    Roster {
        allocator,
        seeded,
        avery,
        blake,
        casey,
        evening,
        morning,
        overnight,
        cancelled,
        removed,
    }
}

fn list(roster: &Roster, filter: &AssignmentFilter) -> Vec<AssignmentDetail> {
    roster
        .allocator
        .list_assignments(roster.seeded.tenant, filter)
        .unwrap()
}

#[test]
fn test_default_listing_hides_removed_and_sorts_by_day_then_start() {
    let roster: Roster = build_roster();

    let details: Vec<AssignmentDetail> = list(&roster, &AssignmentFilter::default());
    let order: Vec<(SlotId, MemberId)> = details.iter().map(|d| (d.slot_id, d.member_id)).collect();

    assert_eq!(
        order,
        vec![
            (roster.evening, roster.avery),
            (roster.evening, roster.blake),
            (roster.overnight, roster.blake),
            (roster.morning, roster.avery),
        ]
    );
    assert!(details.iter().all(|d| d.assignment_id != roster.removed));
}

#[test]
fn test_listing_carries_joined_fields() {
    let roster: Roster = build_roster();

    let details: Vec<AssignmentDetail> = list(
        &roster,
        &AssignmentFilter {
            slot_id: Some(roster.overnight),
            ..AssignmentFilter::default()
        },
    );

    assert_eq!(details.len(), 1);
    let detail: &AssignmentDetail = &details[0];
    assert_eq!(detail.member_display_name, "Blake");
    assert_eq!(detail.slot_name, "Late Bar");
    assert_eq!(detail.instance_name.as_deref(), Some("Rooftop"));
    assert_eq!(detail.position_name, "Bartender");
    assert_eq!(detail.day_date, date!(2026 - 03 - 14));
    assert_eq!(detail.start_time, time!(22:00));
    assert_eq!(detail.end_time, time!(03:00));
    assert!(detail.ends_next_day);
    assert_eq!(detail.status, AssignmentStatus::Confirmed);
    assert_eq!(detail.method, AssignmentMethod::Manual);
    assert_eq!(detail.assigned_by, "admin-123");
}

#[test]
fn test_status_filter() {
    let roster: Roster = build_roster();

    let cancelled: Vec<AssignmentDetail> = list(
        &roster,
        &AssignmentFilter {
            status: Some(AssignmentStatus::Cancelled),
            ..AssignmentFilter::default()
        },
    );

    assert_eq!(cancelled.len(), 1);
    assert_eq!(cancelled[0].assignment_id, roster.cancelled);
    assert!(cancelled[0].cancelled_at.is_some());
    assert!(!cancelled[0].ends_next_day);
}

#[test]
fn test_member_filter() {
    let roster: Roster = build_roster();

    let details: Vec<AssignmentDetail> = list(
        &roster,
        &AssignmentFilter {
            member_id: Some(roster.avery),
            ..AssignmentFilter::default()
        },
    );

    let slots: Vec<SlotId> = details.iter().map(|d| d.slot_id).collect();
    assert_eq!(slots, vec![roster.evening, roster.morning]);
}

#[test]
fn test_date_range_filter_is_inclusive() {
    let roster: Roster = build_roster();

    let sunday_only: Vec<AssignmentDetail> = list(
        &roster,
        &AssignmentFilter {
            date_from: Some(date!(2026 - 03 - 15)),
            date_to: Some(date!(2026 - 03 - 15)),
            ..AssignmentFilter::default()
        },
    );
    let saturday_on: Vec<AssignmentDetail> = list(
        &roster,
        &AssignmentFilter {
            date_from: Some(date!(2026 - 03 - 14)),
            ..AssignmentFilter::default()
        },
    );

    assert_eq!(sunday_only.len(), 1);
    assert_eq!(sunday_only[0].slot_id, roster.morning);
    assert_eq!(saturday_on.len(), 4);
}

#[test]
fn test_include_removed_shows_removed_rows() {
    let roster: Roster = build_roster();

    let details: Vec<AssignmentDetail> = list(
        &roster,
        &AssignmentFilter {
            member_id: Some(roster.casey),
            include_removed: true,
            ..AssignmentFilter::default()
        },
    );

    assert_eq!(details.len(), 1);
    assert_eq!(details[0].assignment_id, roster.removed);
    assert!(details[0].deleted_at.is_some());
}

#[test]
fn test_inverted_date_range_is_rejected() {
    let roster: Roster = build_roster();

    let result: Result<Vec<AssignmentDetail>, CoreError> = roster.allocator.list_assignments(
        roster.seeded.tenant,
        &AssignmentFilter {
            date_from: Some(date!(2026 - 03 - 15)),
            date_to: Some(date!(2026 - 03 - 14)),
            ..AssignmentFilter::default()
        },
    );

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::InvalidDateRange { .. }))
    ));
}

#[test]
fn test_listing_is_tenant_scoped() {
    let roster: Roster = build_roster();
    let other: Seeded = seed(roster.allocator.store(), "Dockside", date!(2026 - 03 - 14));

    let details: Vec<AssignmentDetail> = roster
        .allocator
        .list_assignments(
            other.tenant,
            &AssignmentFilter {
                include_removed: true,
                ..AssignmentFilter::default()
            },
        )
        .unwrap();

    assert!(details.is_empty());
}
