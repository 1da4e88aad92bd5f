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
#![allow(clippy::multiple_crate_versions)]

mod live;
mod outbox;

use axum::{
    Json, Router,
    extract::{
        FromRef, Path, Query, State as AxumState,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, patch, post},
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use shift_alloc::Allocator;
use shift_alloc_api::{
    ApiError, AuditTimelineQuery, AuditTimelineResponse, AuthenticatedActor,
    ConfirmAssignmentRequest, ConfirmAssignmentResponse, CreateSlotRequest, ListAssignmentsQuery,
    ListAssignmentsResponse, ReleaseAssignmentResponse, RetireSlotResponse, SlotInfo,
    SlotOccupancyResponse, authenticate, cancel_assignment, confirm_assignment, create_slot,
    get_audit_timeline, get_slot_occupancy, list_assignments, remove_assignment, retire_slot,
};
use shift_alloc_audit::Cause;
use shift_alloc_domain::{AssignmentId, SlotId, TenantId};
use shift_alloc_persistence::{DEFAULT_POOL_SIZE, Persistence};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use ulid::Ulid;

use crate::live::{LiveEventBroadcaster, live_events_handler};
use crate::outbox::ChannelEventSink;

const ACTOR_ID_HEADER: &str = "x-actor-id";
const ACTOR_ROLE_HEADER: &str = "x-actor-role";
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Shift Alloc Server - HTTP server for the shift capacity allocation engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "SHIFT_ALLOC_DATABASE")]
    database: Option<String>,

    /// `MySQL`/`MariaDB` connection URL. Takes the place of `--database`.
    #[arg(long, env = "SHIFT_ALLOC_MYSQL_URL", conflicts_with = "database")]
    mysql_url: Option<String>,

    /// Port to bind the server to
    #[arg(short, long, env = "SHIFT_ALLOC_PORT", default_value_t = 3000)]
    port: u16,

    /// Address to bind the server to
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Maximum number of pooled database connections
    #[arg(long, default_value_t = DEFAULT_POOL_SIZE)]
    pool_size: u32,
}

type ServerAllocator = Allocator<Persistence, ChannelEventSink>;

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The allocator. Its store is the same pool as `persistence`.
    allocator: Arc<ServerAllocator>,
    /// Direct storage access for reads the allocator does not cover.
    persistence: Persistence,
    /// Live event fan-out for `/live`.
    live: Arc<LiveEventBroadcaster>,
}

impl FromRef<AppState> for Arc<LiveEventBroadcaster> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.live)
    }
}

/// Wires persistence to a fresh outbox and starts its dispatcher.
fn build_app_state(persistence: Persistence) -> (AppState, JoinHandle<()>) {
    let live: Arc<LiveEventBroadcaster> = Arc::new(LiveEventBroadcaster::new());
    let (sink, rx) = outbox::channel();
    let dispatcher: JoinHandle<()> =
        outbox::spawn_dispatcher(rx, persistence.clone(), Arc::clone(&live));
    let app_state: AppState = AppState {
        allocator: Arc::new(Allocator::new(persistence.clone(), sink)),
        persistence,
        live,
    };
    (app_state, dispatcher)
}

/// Error response type.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ErrorResponse {
    /// Error indicator.
    error: bool,
    /// Stable error code.
    code: String,
    /// Error message.
    message: String,
    /// Whether the same request may succeed if sent again.
    retryable: bool,
}

/// HTTP error wrapper that implements `IntoResponse`.
#[derive(Debug)]
struct HttpError {
    status: StatusCode,
    code: &'static str,
    message: String,
    retryable: bool,
}

impl HttpError {
    const fn validation(message: String) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "VALIDATION",
            message,
            retryable: false,
        }
    }

    const fn internal(message: String) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "INTERNAL",
            message,
            retryable: false,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(code = self.code, message = %self.message, "Request failed");
        } else {
            debug!(code = self.code, message = %self.message, "Request rejected");
        }
        let body: Json<ErrorResponse> = Json(ErrorResponse {
            error: true,
            code: self.code.to_string(),
            message: self.message,
            retryable: self.retryable,
        });
        (self.status, body).into_response()
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        let code: &'static str = err.code();
        let status: StatusCode = match code {
            "SLOT_FULL" => StatusCode::CONFLICT,
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "VALIDATION" => StatusCode::BAD_REQUEST,
            "UNAUTHORIZED" => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            code,
            retryable: err.is_retryable(),
            message: err.to_string(),
        }
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

impl From<QueryRejection> for HttpError {
    fn from(rejection: QueryRejection) -> Self {
        Self::validation(rejection.body_text())
    }
}

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Resolves the acting operator from the identity headers.
fn actor_from_headers(headers: &HeaderMap) -> Result<AuthenticatedActor, HttpError> {
    authenticate(
        header_value(headers, ACTOR_ID_HEADER),
        header_value(headers, ACTOR_ROLE_HEADER),
    )
    .map_err(|e| HttpError::from(ApiError::from(e)))
}

fn generate_request_id() -> String {
    format!("req_{}", Ulid::new())
}

/// Builds the audit cause from `x-request-id`, generating one when absent.
fn cause_from_headers(headers: &HeaderMap, description: &str) -> Cause {
    let request_id: String = header_value(headers, REQUEST_ID_HEADER)
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map_or_else(generate_request_id, str::to_string);
    Cause::new(request_id, description.to_string())
}

/// Runs a storage-bound operation on the blocking pool.
///
/// The task is not cancelled if the client goes away, so a started
/// transaction always runs to commit or rollback.
async fn run_blocking<T, F>(operation: F) -> Result<T, HttpError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
{
    match tokio::task::spawn_blocking(operation).await {
        Ok(result) => result.map_err(HttpError::from),
        Err(e) => Err(HttpError::internal(format!("Worker task failed: {e}"))),
    }
}

/// Handler for POST `/tenants/{tenant_id}/slots`.
async fn handle_create_slot(
    AxumState(app_state): AxumState<AppState>,
    Path(tenant_id): Path<i64>,
    headers: HeaderMap,
    payload: Result<Json<CreateSlotRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<SlotInfo>), HttpError> {
    let actor: AuthenticatedActor = actor_from_headers(&headers)?;
    let cause: Cause = cause_from_headers(&headers, "Create slot");
    let Json(req) = payload?;

    info!(
        actor_id = %actor.id,
        tenant_id,
        slot_name = %req.slot_name,
        "Handling create_slot request"
    );

    let allocator: Arc<ServerAllocator> = Arc::clone(&app_state.allocator);
    let slot: SlotInfo = run_blocking(move || {
        create_slot(&allocator, TenantId::new(tenant_id), req, &actor, &cause)
    })
    .await?;

    info!(tenant_id, slot_id = slot.slot_id, "Created slot");
    Ok((StatusCode::CREATED, Json(slot)))
}

/// Handler for GET `/tenants/{tenant_id}/slots/{slot_id}`.
async fn handle_get_slot(
    AxumState(app_state): AxumState<AppState>,
    Path((tenant_id, slot_id)): Path<(i64, i64)>,
    headers: HeaderMap,
) -> Result<Json<SlotOccupancyResponse>, HttpError> {
    let actor: AuthenticatedActor = actor_from_headers(&headers)?;
    debug!(actor_id = %actor.id, tenant_id, slot_id, "Handling get_slot request");

    let allocator: Arc<ServerAllocator> = Arc::clone(&app_state.allocator);
    let response: SlotOccupancyResponse = run_blocking(move || {
        get_slot_occupancy(&allocator, TenantId::new(tenant_id), SlotId::new(slot_id))
    })
    .await?;

    Ok(Json(response))
}

/// Handler for DELETE `/tenants/{tenant_id}/slots/{slot_id}`.
///
/// Retires the slot. Existing assignments are kept.
async fn handle_retire_slot(
    AxumState(app_state): AxumState<AppState>,
    Path((tenant_id, slot_id)): Path<(i64, i64)>,
    headers: HeaderMap,
) -> Result<StatusCode, HttpError> {
    let actor: AuthenticatedActor = actor_from_headers(&headers)?;
    let cause: Cause = cause_from_headers(&headers, "Retire slot");

    info!(actor_id = %actor.id, tenant_id, slot_id, "Handling retire_slot request");

    let allocator: Arc<ServerAllocator> = Arc::clone(&app_state.allocator);
    let response: RetireSlotResponse = run_blocking(move || {
        retire_slot(
            &allocator,
            TenantId::new(tenant_id),
            SlotId::new(slot_id),
            &actor,
            &cause,
        )
    })
    .await?;

    info!(tenant_id, slot_id, changed = response.changed, "Retired slot");
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for POST `/tenants/{tenant_id}/slots/{slot_id}/assignments`.
///
/// Returns 201 for a new seat and 200 when the member was already seated.
async fn handle_confirm_assignment(
    AxumState(app_state): AxumState<AppState>,
    Path((tenant_id, slot_id)): Path<(i64, i64)>,
    headers: HeaderMap,
    payload: Result<Json<ConfirmAssignmentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ConfirmAssignmentResponse>), HttpError> {
    let actor: AuthenticatedActor = actor_from_headers(&headers)?;
    let cause: Cause = cause_from_headers(&headers, "Confirm assignment");
    let Json(req) = payload?;

    info!(
        actor_id = %actor.id,
        tenant_id,
        slot_id,
        member_id = req.member_id,
        "Handling confirm_assignment request"
    );

    let allocator: Arc<ServerAllocator> = Arc::clone(&app_state.allocator);
    let response: ConfirmAssignmentResponse = run_blocking(move || {
        confirm_assignment(
            &allocator,
            TenantId::new(tenant_id),
            SlotId::new(slot_id),
            req,
            &actor,
            &cause,
        )
    })
    .await?;

    let status: StatusCode = if response.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(response)))
}

/// Handler for PATCH `/tenants/{tenant_id}/assignments/{assignment_id}/cancel`.
async fn handle_cancel_assignment(
    AxumState(app_state): AxumState<AppState>,
    Path((tenant_id, assignment_id)): Path<(i64, i64)>,
    headers: HeaderMap,
) -> Result<StatusCode, HttpError> {
    let actor: AuthenticatedActor = actor_from_headers(&headers)?;
    let cause: Cause = cause_from_headers(&headers, "Cancel assignment");

    info!(actor_id = %actor.id, tenant_id, assignment_id, "Handling cancel_assignment request");

    let allocator: Arc<ServerAllocator> = Arc::clone(&app_state.allocator);
    let response: ReleaseAssignmentResponse = run_blocking(move || {
        cancel_assignment(
            &allocator,
            TenantId::new(tenant_id),
            AssignmentId::new(assignment_id),
            &actor,
            &cause,
        )
    })
    .await?;

    debug!(assignment_id, changed = response.changed, "Cancel finished");
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for DELETE `/tenants/{tenant_id}/assignments/{assignment_id}`.
async fn handle_remove_assignment(
    AxumState(app_state): AxumState<AppState>,
    Path((tenant_id, assignment_id)): Path<(i64, i64)>,
    headers: HeaderMap,
) -> Result<StatusCode, HttpError> {
    let actor: AuthenticatedActor = actor_from_headers(&headers)?;
    let cause: Cause = cause_from_headers(&headers, "Remove assignment");

    info!(actor_id = %actor.id, tenant_id, assignment_id, "Handling remove_assignment request");

    let allocator: Arc<ServerAllocator> = Arc::clone(&app_state.allocator);
    let response: ReleaseAssignmentResponse = run_blocking(move || {
        remove_assignment(
            &allocator,
            TenantId::new(tenant_id),
            AssignmentId::new(assignment_id),
            &actor,
            &cause,
        )
    })
    .await?;

    debug!(assignment_id, changed = response.changed, "Remove finished");
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET `/tenants/{tenant_id}/assignments`.
async fn handle_list_assignments(
    AxumState(app_state): AxumState<AppState>,
    Path(tenant_id): Path<i64>,
    headers: HeaderMap,
    query: Result<Query<ListAssignmentsQuery>, QueryRejection>,
) -> Result<Json<ListAssignmentsResponse>, HttpError> {
    let actor: AuthenticatedActor = actor_from_headers(&headers)?;
    let Query(query) = query?;
    debug!(actor_id = %actor.id, tenant_id, ?query, "Handling list_assignments request");

    let allocator: Arc<ServerAllocator> = Arc::clone(&app_state.allocator);
    let response: ListAssignmentsResponse =
        run_blocking(move || list_assignments(&allocator, TenantId::new(tenant_id), &query))
            .await?;

    Ok(Json(response))
}

/// Handler for GET `/tenants/{tenant_id}/audit`.
async fn handle_get_audit_timeline(
    AxumState(app_state): AxumState<AppState>,
    Path(tenant_id): Path<i64>,
    headers: HeaderMap,
    query: Result<Query<AuditTimelineQuery>, QueryRejection>,
) -> Result<Json<AuditTimelineResponse>, HttpError> {
    let actor: AuthenticatedActor = actor_from_headers(&headers)?;
    let Query(query) = query?;
    debug!(
        actor_id = %actor.id,
        tenant_id,
        slot_id = ?query.slot_id,
        "Handling audit timeline request"
    );

    let persistence: Persistence = app_state.persistence.clone();
    let response: AuditTimelineResponse =
        run_blocking(move || get_audit_timeline(&persistence, TenantId::new(tenant_id), &query))
            .await?;

    Ok(Json(response))
}

fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/tenants/{tenant_id}/slots", post(handle_create_slot))
        .route("/tenants/{tenant_id}/slots/{slot_id}", get(handle_get_slot))
        .route(
            "/tenants/{tenant_id}/slots/{slot_id}",
            delete(handle_retire_slot),
        )
        .route(
            "/tenants/{tenant_id}/slots/{slot_id}/assignments",
            post(handle_confirm_assignment),
        )
        .route(
            "/tenants/{tenant_id}/assignments/{assignment_id}/cancel",
            patch(handle_cancel_assignment),
        )
        .route(
            "/tenants/{tenant_id}/assignments/{assignment_id}",
            delete(handle_remove_assignment),
        )
        .route(
            "/tenants/{tenant_id}/assignments",
            get(handle_list_assignments),
        )
        .route("/tenants/{tenant_id}/audit", get(handle_get_audit_timeline))
        .route("/live", get(live_events_handler))
        .with_state(app_state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown requested");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Shift Alloc Server");

    let persistence: Persistence = if let Some(url) = &args.mysql_url {
        info!("Using MySQL database");
        Persistence::new_with_mysql(url, args.pool_size)?
    } else if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path, args.pool_size)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };
    persistence.verify_foreign_key_enforcement()?;
    info!(backend = persistence.backend_name(), "Persistence ready");

    let (app_state, dispatcher) = build_app_state(persistence);
    let app: Router = build_router(app_state);

    let addr: std::net::SocketAddr = format!("{}:{}", args.bind, args.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // The router owned the last outbox sink; wait for queued events to land.
    if let Err(e) = dispatcher.await {
        warn!(error = %e, "Outbox dispatcher ended abnormally");
    }
    info!("Server stopped");

    Ok(())
}

#[cfg(test)]
mod tests;
