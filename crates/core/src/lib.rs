// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The shift capacity allocation engine.
//!
//! [`Allocator`] admits members into shift slots while keeping each slot's
//! live assignment count at or below its capacity, under concurrent requests.
//! Storage is reached through [`AllocationStore`]; post-commit side effects
//! leave through [`EventSink`].

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

mod allocator;
mod command;
mod error;
mod events;
mod outcome;
mod query;
mod slot_lock;
mod store;

#[cfg(test)]
mod tests;

pub use allocator::Allocator;
pub use command::{ConfirmCommand, CreateSlotCommand};
pub use error::CoreError;
pub use events::{
    AllocationEvent, AssignmentNotification, DiscardEvents, EventSink, EventSinkError,
};
pub use outcome::{ConfirmOutcome, ReleaseOutcome, RetireOutcome};
pub use query::{AssignmentDetail, AssignmentFilter, sort_details};
pub use slot_lock::{SlotGuard, SlotLockRegistry};
pub use store::{AllocationStore, SlotTransaction};
