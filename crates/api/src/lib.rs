// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the shift capacity allocation engine.
//!
//! This crate owns the request/response contract, role-based authorization
//! and the translation of core and persistence errors into the stable error
//! taxonomy clients see.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthorizationService, Role, authenticate};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
pub use handlers::{
    build_assignment_filter, cancel_assignment, confirm_assignment, create_slot,
    get_audit_timeline, get_slot_occupancy, list_assignments, remove_assignment, retire_slot,
};
pub use request_response::{
    AssignmentDetailInfo, AssignmentInfo, AuditEventInfo, AuditTimelineQuery,
    AuditTimelineResponse, ConfirmAssignmentRequest, ConfirmAssignmentResponse,
    CreateSlotRequest, ListAssignmentsQuery, ListAssignmentsResponse, OccupancyInfo,
    ReleaseAssignmentResponse, RetireSlotResponse, SlotInfo, SlotOccupancyResponse,
};
