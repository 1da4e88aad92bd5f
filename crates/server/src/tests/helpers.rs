// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Router fixtures and request helpers.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use shift_alloc_domain::{BusinessDayId, MemberId, PositionId, TenantId};
use shift_alloc_persistence::Persistence;
use time::macros::date;
use tower::ServiceExt;

use crate::{AppState, build_app_state, build_router};

/// A router over one seeded tenant, plus a second tenant for isolation
/// checks.
pub struct TestApp {
    pub router: Router,
    pub tenant: TenantId,
    pub other_tenant: TenantId,
    pub business_day_id: BusinessDayId,
    pub position_id: PositionId,
    pub avery: MemberId,
    pub blake: MemberId,
    pub casey: MemberId,
    pub inactive: MemberId,
}

pub fn setup_app() -> TestApp {
    let persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    let tenant: TenantId = persistence
        .register_tenant("Harbor Club")
        .unwrap()
        .tenant_id;
    let other_tenant: TenantId = persistence
        .register_tenant("Riverside Hall")
        .unwrap()
        .tenant_id;
    let business_day_id: BusinessDayId = persistence
        .register_business_day(tenant, date!(2026 - 03 - 14), Some("Saturday"))
        .unwrap()
        .business_day_id;
    let position_id: PositionId = persistence
        .register_position(tenant, "Bartender")
        .unwrap()
        .position_id;
    let avery: MemberId = persistence
        .register_member(tenant, "Avery", true)
        .unwrap()
        .member_id;
    let blake: MemberId = persistence
        .register_member(tenant, "Blake", true)
        .unwrap()
        .member_id;
    let casey: MemberId = persistence
        .register_member(tenant, "Casey", true)
        .unwrap()
        .member_id;
    let inactive: MemberId = persistence
        .register_member(tenant, "Dana", false)
        .unwrap()
        .member_id;

    let (app_state, _dispatcher): (AppState, _) = build_app_state(persistence);

    TestApp {
        router: build_router(app_state),
        tenant,
        other_tenant,
        business_day_id,
        position_id,
        avery,
        blake,
        casey,
        inactive,
    }
}

/// Sends one request and returns the status with the decoded JSON body
/// (`Value::Null` for an empty body).
pub async fn send(
    app: &TestApp,
    method: &str,
    uri: &str,
    role: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-request-id", "test-req-1");
    if let Some(role) = role {
        builder = builder
            .header("x-actor-id", format!("{role}-1"))
            .header("x-actor-role", role);
    }
    let request: Request<Body> = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.router.clone().oneshot(request).await.unwrap();
    let status: StatusCode = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: Value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

pub fn slot_body(app: &TestApp, start: &str, end: &str, required: i64) -> Value {
    json!({
        "business_day_id": app.business_day_id.value(),
        "position_id": app.position_id.value(),
        "slot_name": "Main Bar",
        "start_time": start,
        "end_time": end,
        "required_count": required,
    })
}

/// Creates a 17:00-23:00 slot as an admin and returns its id.
pub async fn create_slot(app: &TestApp, required: i64) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        &format!("/tenants/{}/slots", app.tenant.value()),
        Some("admin"),
        Some(slot_body(app, "17:00", "23:00", required)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["slot_id"].as_i64().unwrap()
}

/// Confirms a member as a coordinator.
pub async fn confirm(app: &TestApp, slot_id: i64, member: MemberId) -> (StatusCode, Value) {
    send(
        app,
        "POST",
        &format!("/tenants/{}/slots/{slot_id}/assignments", app.tenant.value()),
        Some("coordinator"),
        Some(json!({ "member_id": member.value() })),
    )
    .await
}
