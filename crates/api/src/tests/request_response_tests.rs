// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Wire format of the DTOs.

use shift_alloc_domain::{AssignmentStatus, MemberId, SlotId};
use time::macros::date;

use crate::{
    ConfirmAssignmentRequest, CreateSlotRequest, ListAssignmentsQuery, SlotInfo,
    build_assignment_filter,
};

use super::helpers::{Fixture, create_test_slot, setup_fixture};

#[test]
fn test_create_slot_request_defaults() {
    let request: CreateSlotRequest = serde_json::from_str(
        r#"{"business_day_id":1,"position_id":2,"slot_name":"Main Bar",
            "start_time":"21:00","end_time":"02:00","required_count":2}"#,
    )
    .unwrap();

    assert_eq!(request.priority, 1);
    assert_eq!(request.instance_name, None);
}

#[test]
fn test_confirm_request_defaults() {
    let request: ConfirmAssignmentRequest = serde_json::from_str(r#"{"member_id":9}"#).unwrap();

    assert_eq!(request.member_id, 9);
    assert_eq!(request.note, None);
    assert!(!request.is_outside_preference);
}

#[test]
fn test_slot_info_serializes_rfc3339_timestamps() {
    let fixture: Fixture = setup_fixture();
    let slot_id: SlotId = create_test_slot(&fixture, 2);
    let (slot, _) = fixture
        .allocator
        .occupancy(fixture.tenant, slot_id)
        .unwrap();

    let json: serde_json::Value = serde_json::to_value(SlotInfo::from(&slot)).unwrap();

    let created_at: &str = json["created_at"].as_str().unwrap();
    assert!(created_at.ends_with('Z'), "{created_at}");
    assert!(json["deleted_at"].is_null());
    assert_eq!(json["start_time"], "17:00");
    assert_eq!(json["ends_next_day"], false);
}

#[test]
fn test_listing_query_builds_filter() {
    let query: ListAssignmentsQuery = ListAssignmentsQuery {
        member_id: Some(4),
        slot_id: Some(8),
        status: Some(String::from("cancelled")),
        date_from: Some(String::from("2026-03-01")),
        date_to: None,
        include_removed: true,
    };

    let filter = build_assignment_filter(&query).unwrap();

    assert_eq!(filter.member_id, Some(MemberId::new(4)));
    assert_eq!(filter.slot_id, Some(SlotId::new(8)));
    assert_eq!(filter.status, Some(AssignmentStatus::Cancelled));
    assert_eq!(filter.date_from, Some(date!(2026 - 03 - 01)));
    assert_eq!(filter.date_to, None);
    assert!(filter.include_removed);
}
