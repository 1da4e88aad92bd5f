// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Audit log queries.

use diesel::prelude::*;
use diesel::{MysqlConnection, SqliteConnection};
use shift_alloc_audit::{Action, ActionKind, Actor, AuditEvent, AuditSubject, Cause, StateSnapshot};
use shift_alloc_domain::{AssignmentId, MemberId, SlotId, TenantId};

use crate::data_models::{
    ActionData, ActorData, CauseData, StateSnapshotData, StoredAuditEvent, parse_timestamp,
};
use crate::diesel_schema::audit_events;
use crate::error::PersistenceError;

/// Diesel Queryable struct for full audit event rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = audit_events)]
struct AuditEventRow {
    event_id: i64,
    tenant_id: i64,
    slot_id: i64,
    assignment_id: Option<i64>,
    member_id: Option<i64>,
    #[allow(dead_code)]
    action: String,
    actor_json: String,
    cause_json: String,
    action_json: String,
    before_snapshot_json: String,
    after_snapshot_json: String,
    occurred_at: String,
}

impl AuditEventRow {
    fn into_stored(self) -> Result<StoredAuditEvent, PersistenceError> {
        let actor_data: ActorData = serde_json::from_str(&self.actor_json)?;
        let cause_data: CauseData = serde_json::from_str(&self.cause_json)?;
        let action_data: ActionData = serde_json::from_str(&self.action_json)?;
        let before_data: StateSnapshotData = serde_json::from_str(&self.before_snapshot_json)?;
        let after_data: StateSnapshotData = serde_json::from_str(&self.after_snapshot_json)?;

        let kind: ActionKind = action_data.name.parse()?;
        let subject: AuditSubject = AuditSubject {
            tenant_id: TenantId::new(self.tenant_id),
            slot_id: SlotId::new(self.slot_id),
            assignment_id: self.assignment_id.map(AssignmentId::new),
            member_id: self.member_id.map(MemberId::new),
        };

        Ok(StoredAuditEvent {
            event_id: self.event_id,
            event: AuditEvent::new(
                subject,
                Actor::new(actor_data.id, actor_data.actor_type),
                Cause::new(cause_data.id, cause_data.description),
                Action::new(kind, action_data.details),
                StateSnapshot::new(before_data.data),
                StateSnapshot::new(after_data.data),
                parse_timestamp(&self.occurred_at)?,
            ),
        })
    }
}

backend_fn! {
/// Retrieves a tenant's audit timeline in insertion order.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `tenant_id` - The tenant whose events are returned
/// * `slot_id` - Restricts the timeline to one slot when set
///
/// # Errors
///
/// Returns an error if the query fails or an event cannot be deserialized.
pub fn list_audit_events(
    conn: &mut _,
    tenant_id: TenantId,
    slot_id: Option<SlotId>,
) -> Result<Vec<StoredAuditEvent>, PersistenceError> {
    let mut query = audit_events::table
        .filter(audit_events::tenant_id.eq(tenant_id.value()))
        .select(AuditEventRow::as_select())
        .into_boxed();

    if let Some(slot_id) = slot_id {
        query = query.filter(audit_events::slot_id.eq(slot_id.value()));
    }

    let rows: Vec<AuditEventRow> = query.order(audit_events::event_id.asc()).load(conn)?;

    rows.into_iter().map(AuditEventRow::into_stored).collect()
}
}
