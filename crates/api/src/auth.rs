// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.
//!
//! Identity is established upstream. This layer only checks that an actor
//! id and a known role were supplied, and enforces which role may perform
//! which action.

use shift_alloc_audit::Actor;

use crate::error::AuthError;

/// Actor roles for authorization.
///
/// Roles apply only to operators acting on the schedule, never to the
/// members being scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Admin role: operators with structural and corrective authority.
    ///
    /// Admins may perform:
    /// - slot creation and retirement
    /// - administrative removal of assignments
    /// - everything a coordinator may do
    Admin,
    /// Coordinator role: operators who seat members.
    ///
    /// Coordinators may confirm and cancel assignments and read rosters,
    /// occupancy and the audit timeline.
    Coordinator,
}

impl Role {
    /// Returns the wire name of this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Coordinator => "coordinator",
        }
    }

    /// Parses a role name, ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown role.
    pub fn parse(value: &str) -> Result<Self, AuthError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "coordinator" => Ok(Self::Coordinator),
            other => Err(AuthError::AuthenticationFailed {
                reason: format!("Unknown role '{other}'"),
            }),
        }
    }
}

/// An authenticated actor with an associated role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The role assigned to this actor.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    #[must_use]
    pub const fn new(id: String, role: Role) -> Self {
        Self { id, role }
    }

    /// Converts this authenticated actor into an audit Actor.
    ///
    /// This is used when recording audit events to attribute actions
    /// to the authenticated operator.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::new(self.id.clone(), self.role.as_str().to_string())
    }
}

/// Builds an authenticated actor from the identity headers of a request.
///
/// # Errors
///
/// Returns an error if either value is missing or blank, or the role is
/// unknown.
pub fn authenticate(
    actor_id: Option<&str>,
    role: Option<&str>,
) -> Result<AuthenticatedActor, AuthError> {
    let actor_id: &str = actor_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AuthError::AuthenticationFailed {
            reason: String::from("Actor ID cannot be empty"),
        })?;
    let role: Role = Role::parse(role.ok_or_else(|| AuthError::AuthenticationFailed {
        reason: String::from("Actor role is required"),
    })?)?;
    Ok(AuthenticatedActor::new(actor_id.to_string(), role))
}

/// Authorization service for enforcing role-based access control.
pub struct AuthorizationService;

impl AuthorizationService {
    fn require_admin(actor: &AuthenticatedActor, action: &str) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Coordinator => {
                tracing::warn!(actor_id = %actor.id, action, "Coordinator denied admin action");
                Err(AuthError::Unauthorized {
                    action: action.to_string(),
                    required_role: String::from("Admin"),
                })
            }
        }
    }

    /// Checks if an actor is authorized to create a slot.
    ///
    /// Only Admin actors may create slots.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_create_slot(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "create_slot")
    }

    /// Checks if an actor is authorized to retire a slot.
    ///
    /// Only Admin actors may retire slots.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_retire_slot(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "retire_slot")
    }

    /// Checks if an actor is authorized to remove an assignment.
    ///
    /// Only Admin actors may remove assignments. Coordinators cancel instead.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_remove_assignment(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "remove_assignment")
    }
}
