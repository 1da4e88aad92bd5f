// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! In-process outbox between the allocator and its side channels.
//!
//! The allocator publishes into an unbounded channel after commit and
//! returns immediately. A single dispatcher task drains the channel in
//! order, writes audit events to the audit log and forwards everything to
//! live subscribers. Failures here are logged and dropped; they never
//! reach the request that caused them.

use shift_alloc::{AllocationEvent, EventSink, EventSinkError};
use shift_alloc_persistence::{Persistence, PersistenceError};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::live::{LiveEvent, LiveEventBroadcaster};

/// Allocator-facing end of the outbox.
#[derive(Debug, Clone)]
pub struct ChannelEventSink {
    tx: mpsc::UnboundedSender<AllocationEvent>,
}

impl EventSink for ChannelEventSink {
    fn publish(&self, event: AllocationEvent) -> Result<(), EventSinkError> {
        self.tx.send(event).map_err(|_| EventSinkError::Closed)
    }
}

/// Creates an outbox, returning the sink and the receiver to hand to
/// [`spawn_dispatcher`].
#[must_use]
pub fn channel() -> (ChannelEventSink, mpsc::UnboundedReceiver<AllocationEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelEventSink { tx }, rx)
}

/// Spawns the dispatcher. The task ends once every sink has been dropped
/// and the queue is drained.
pub fn spawn_dispatcher(
    mut rx: mpsc::UnboundedReceiver<AllocationEvent>,
    persistence: Persistence,
    live: Arc<LiveEventBroadcaster>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            dispatch(event, &persistence, &live).await;
        }
        debug!("Outbox drained");
    })
}

async fn dispatch(event: AllocationEvent, persistence: &Persistence, live: &LiveEventBroadcaster) {
    match event {
        AllocationEvent::Notification(notification) => {
            info!(
                tenant_id = notification.tenant_id.value(),
                member_id = notification.member_id.value(),
                slot_id = notification.slot_id.value(),
                "Member seated"
            );
            live.broadcast(&LiveEvent::from(&notification));
        }
        AllocationEvent::Audit(audit) => {
            live.broadcast(&LiveEvent::from(&audit));

            let persistence: Persistence = persistence.clone();
            let written: Result<Result<i64, PersistenceError>, _> =
                tokio::task::spawn_blocking(move || persistence.persist_audit_event(&audit)).await;
            match written {
                Ok(Ok(event_id)) => debug!(event_id, "Persisted audit event"),
                Ok(Err(e)) => warn!(error = %e, "Failed to persist audit event"),
                Err(e) => warn!(error = %e, "Audit persistence task failed"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shift_alloc::{Allocator, AssignmentNotification, ConfirmCommand, CreateSlotCommand};
    use shift_alloc_audit::{Actor, Cause};
    use shift_alloc_domain::{
        AssignmentId, BusinessDay, MemberId, Position, ShiftSlot, SlotId, TenantId,
    };
    use shift_alloc_persistence::StoredAuditEvent;
    use time::OffsetDateTime;
    use time::macros::date;

    #[test]
    fn test_publish_after_receiver_dropped_is_closed() {
        let (sink, rx) = channel();
        drop(rx);

        let result: Result<(), EventSinkError> =
            sink.publish(AllocationEvent::Notification(AssignmentNotification {
                tenant_id: TenantId::new(1),
                assignment_id: AssignmentId::new(1),
                member_id: MemberId::new(1),
                slot_id: SlotId::new(1),
                assigned_at: OffsetDateTime::UNIX_EPOCH,
            }));

        assert_eq!(result, Err(EventSinkError::Closed));
    }

    #[tokio::test]
    async fn test_dispatcher_persists_and_broadcasts() {
        let persistence: Persistence = Persistence::new_in_memory().unwrap();
        let tenant: TenantId = persistence.register_tenant("Harbor Club").unwrap().tenant_id;
        let day: BusinessDay = persistence
            .register_business_day(tenant, date!(2026 - 03 - 14), None)
            .unwrap();
        let position: Position = persistence.register_position(tenant, "Bartender").unwrap();
        let member: MemberId = persistence
            .register_member(tenant, "Avery", true)
            .unwrap()
            .member_id;

        let live: Arc<LiveEventBroadcaster> = Arc::new(LiveEventBroadcaster::new());
        let mut live_rx = live.subscribe();
        let (sink, rx) = channel();
        let dispatcher: JoinHandle<()> =
            spawn_dispatcher(rx, persistence.clone(), Arc::clone(&live));

        let allocator: Allocator<Persistence, ChannelEventSink> =
            Allocator::new(persistence.clone(), sink);
        let actor: Actor = Actor::new(String::from("admin-1"), String::from("admin"));
        let cause: Cause = Cause::new(String::from("req-1"), String::from("Test"));
        let slot: ShiftSlot = allocator
            .create_slot(
                tenant,
                &CreateSlotCommand {
                    business_day_id: day.business_day_id,
                    position_id: position.position_id,
                    slot_name: String::from("Main Bar"),
                    instance_name: None,
                    start_time: String::from("17:00"),
                    end_time: String::from("23:00"),
                    required_count: 1,
                    priority: 1,
                },
                &actor,
                &cause,
            )
            .unwrap();
        allocator
            .confirm(
                tenant,
                &ConfirmCommand::new(slot.slot_id(), member),
                &actor,
                &cause,
            )
            .unwrap();

        drop(allocator);
        dispatcher.await.unwrap();

        let stored: Vec<StoredAuditEvent> = persistence.list_audit_events(tenant, None).unwrap();
        let actions: Vec<&str> = stored.iter().map(|s| s.event.action.name()).collect();
        assert_eq!(actions, vec!["SLOT_CREATED", "CREATE"]);

        let mut received: Vec<LiveEvent> = Vec::new();
        while let Ok(event) = live_rx.try_recv() {
            received.push(event);
        }
        assert_eq!(received.len(), 3);
        assert!(received.iter().any(|e| matches!(
            e,
            LiveEvent::AssignmentNotified { member_id, .. } if *member_id == member.value()
        )));
    }
}
