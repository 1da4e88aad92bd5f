// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Records owned by other services that the engine only reads.

use crate::ids::{BusinessDayId, MemberId, PositionId, TenantId};
use serde::{Deserialize, Serialize};
use time::Date;

/// An organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub tenant_id: TenantId,
    pub name: String,
}

/// A person who can be seated in shift slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub member_id: MemberId,
    pub tenant_id: TenantId,
    pub display_name: String,
    /// Deactivated members keep their history but cannot be confirmed.
    pub is_active: bool,
}

/// A calendar day on which a tenant schedules slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessDay {
    pub business_day_id: BusinessDayId,
    pub tenant_id: TenantId,
    pub day_date: Date,
    pub label: Option<String>,
}

/// A role or station a slot staffs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub position_id: PositionId,
    pub tenant_id: TenantId,
    pub position_name: String,
}
