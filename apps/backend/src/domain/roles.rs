//! Groups and the permission matrix they grant.

use std::fmt;
use std::str::FromStr;

use crate::errors::domain::{DomainError, ValidationKind};

/// Label used when a user belongs to no group.
pub const NO_ROLE: &str = "No Role";

/// Group membership. Declaration order is seed order, which is also
/// precedence when a user holds several groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    Admin,
    Organizer,
    Participant,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Organizer, Role::Participant];

    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Organizer => "Organizer",
            Role::Participant => "Participant",
        }
    }

    pub fn allows(self, permission: Permission) -> bool {
        use Action::{Add, Change, Delete, View};
        use Resource::{Category, Event, EventRegistration, Rsvp, UserProfile};

        match self {
            Role::Admin => true,
            Role::Organizer => matches!(permission.resource, Event | Category | Rsvp),
            Role::Participant => match permission.resource {
                Event | Category => permission.action == View,
                Rsvp => matches!(permission.action, Add | Change | Delete | View),
                UserProfile | EventRegistration => false,
            },
        }
    }

    /// Every permission this group grants, in resource then action order.
    pub fn permissions(self) -> Vec<Permission> {
        Permission::all().filter(|p| self.allows(*p)).collect()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                DomainError::validation(ValidationKind::InvalidRole, format!("Unknown role '{s}'"))
            })
    }
}

/// Highest-precedence group, if any.
pub fn primary_role(roles: &[Role]) -> Option<Role> {
    roles.iter().copied().min()
}

pub fn primary_role_label(roles: &[Role]) -> &'static str {
    primary_role(roles).map_or(NO_ROLE, Role::as_str)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Event,
    Category,
    UserProfile,
    EventRegistration,
    Rsvp,
}

impl Resource {
    const ALL: [Resource; 5] = [
        Resource::Event,
        Resource::Category,
        Resource::UserProfile,
        Resource::EventRegistration,
        Resource::Rsvp,
    ];

    fn model_name(self) -> &'static str {
        match self {
            Resource::Event => "event",
            Resource::Category => "category",
            Resource::UserProfile => "userprofile",
            Resource::EventRegistration => "eventregistration",
            Resource::Rsvp => "rsvp",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Add,
    Change,
    Delete,
    View,
}

impl Action {
    const ALL: [Action; 4] = [Action::Add, Action::Change, Action::Delete, Action::View];

    fn verb(self) -> &'static str {
        match self {
            Action::Add => "add",
            Action::Change => "change",
            Action::Delete => "delete",
            Action::View => "view",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Permission {
    pub resource: Resource,
    pub action: Action,
}

impl Permission {
    pub const fn new(resource: Resource, action: Action) -> Self {
        Self { resource, action }
    }

    pub fn all() -> impl Iterator<Item = Permission> {
        Resource::ALL
            .into_iter()
            .flat_map(|r| Action::ALL.into_iter().map(move |a| Permission::new(r, a)))
    }

    /// e.g. `add_rsvp`, `view_event`
    pub fn codename(self) -> String {
        format!("{}_{}", self.action.verb(), self.resource.model_name())
    }
}
