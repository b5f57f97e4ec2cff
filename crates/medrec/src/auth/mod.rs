//! # Authorization
//!
//! Every mutating operation, and listing records at all, passes through one
//! gate: [`authorize`]. The gate asks an [`Authorizer`] whether the current
//! user holds `action` on `resource` and returns a [`Decision`] rather than a
//! bare boolean, so callers cannot forget to say *why* something was refused.
//!
//! [`Session`] is the built-in authorizer: a mock login against a fixed set
//! of demo accounts whose user object is persisted under its own storage key.
//! Anything else implementing [`Authorizer`] can stand in for it.

use crate::error::{MedrecError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

mod session;

pub use session::{Credentials, Session, UserPatch, SESSION_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Records,
    Users,
    Settings,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Resource::Records => "records",
            Resource::Users => "users",
            Resource::Settings => "settings",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub create: bool,
    pub read: bool,
    pub update: bool,
    pub delete: bool,
}

impl Permission {
    pub const ALL: Permission = Permission::new(true, true, true, true);
    pub const NONE: Permission = Permission::new(false, false, false, false);
    pub const READ_ONLY: Permission = Permission::new(false, true, false, false);

    pub const fn new(create: bool, read: bool, update: bool, delete: bool) -> Self {
        Self {
            create,
            read,
            update,
            delete,
        }
    }

    pub fn allows(&self, action: Action) -> bool {
        match action {
            Action::Create => self.create,
            Action::Read => self.read,
            Action::Update => self.update,
            Action::Delete => self.delete,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permissions {
    pub records: Permission,
    pub users: Permission,
    pub settings: Permission,
}

impl Permissions {
    pub fn for_resource(&self, resource: Resource) -> &Permission {
        match resource {
            Resource::Records => &self.records,
            Resource::Users => &self.users,
            Resource::Settings => &self.settings,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Doctor,
    Receptionist,
    Guest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub permissions: Permissions,
}

impl User {
    pub fn can(&self, resource: Resource, action: Action) -> bool {
        self.permissions.for_resource(resource).allows(action)
    }
}

struct DemoAccount {
    password: &'static str,
    user: User,
}

fn demo_accounts() -> Vec<DemoAccount> {
    let avatar = |seed: &str| {
        Some(format!(
            "https://api.dicebear.com/7.x/avataaars/svg?seed={}",
            seed
        ))
    };
    vec![
        DemoAccount {
            password: "admin123",
            user: User {
                id: "1".into(),
                username: "admin".into(),
                name: "Administrator".into(),
                email: "admin@medical.org".into(),
                role: Role::Admin,
                avatar: avatar("admin"),
                permissions: Permissions {
                    records: Permission::ALL,
                    users: Permission::ALL,
                    settings: Permission::ALL,
                },
            },
        },
        DemoAccount {
            password: "doctor123",
            user: User {
                id: "2".into(),
                username: "doctor".into(),
                name: "Dr. Sarah Smith".into(),
                email: "sarah@medical.org".into(),
                role: Role::Doctor,
                avatar: avatar("sarah"),
                permissions: Permissions {
                    records: Permission::new(true, true, true, false),
                    users: Permission::READ_ONLY,
                    settings: Permission::READ_ONLY,
                },
            },
        },
        DemoAccount {
            password: "nurse123",
            user: User {
                id: "3".into(),
                username: "nurse".into(),
                name: "Nurse Rebecca".into(),
                email: "rebecca@medical.org".into(),
                role: Role::Receptionist,
                avatar: avatar("rebecca"),
                permissions: Permissions {
                    records: Permission::new(true, true, true, false),
                    users: Permission::NONE,
                    settings: Permission::NONE,
                },
            },
        },
    ]
}

/// Looks up a demo account by username and password.
pub fn demo_login(username: &str, password: &str) -> Option<User> {
    demo_accounts()
        .into_iter()
        .find(|a| a.user.username == username && a.password == password)
        .map(|a| a.user)
}

/// Capability provider consulted before every protected operation.
pub trait Authorizer {
    fn current_user(&self) -> Option<&User>;

    fn has_permission(&self, resource: Resource, action: Action) -> bool {
        self.current_user()
            .map(|u| u.can(resource, action))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    NotAuthenticated,
    Forbidden { resource: Resource, action: Action },
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn into_result(self) -> Result<()> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(DenyReason::NotAuthenticated) => Err(MedrecError::NotAuthenticated),
            Decision::Deny(DenyReason::Forbidden { resource, action }) => {
                Err(MedrecError::PermissionDenied { resource, action })
            }
        }
    }
}

/// The authorization gate.
pub fn authorize<A: Authorizer + ?Sized>(auth: &A, resource: Resource, action: Action) -> Decision {
    if auth.current_user().is_none() {
        log::debug!("denied {} {}: no user", action, resource);
        return Decision::Deny(DenyReason::NotAuthenticated);
    }
    if auth.has_permission(resource, action) {
        Decision::Allow
    } else {
        log::debug!("denied {} {}: missing permission", action, resource);
        Decision::Deny(DenyReason::Forbidden { resource, action })
    }
}

/// An authorizer with a fixed user, handy when embedding the library behind
/// an existing identity system.
#[derive(Debug, Clone, Default)]
pub struct StaticAuthorizer {
    user: Option<User>,
}

impl StaticAuthorizer {
    pub fn new(user: Option<User>) -> Self {
        Self { user }
    }

    pub fn demo(username: &str) -> Self {
        let user = demo_accounts()
            .into_iter()
            .find(|a| a.user.username == username)
            .map(|a| a.user);
        Self { user }
    }
}

impl Authorizer for StaticAuthorizer {
    fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_login_checks_password() {
        assert!(demo_login("admin", "admin123").is_some());
        assert!(demo_login("admin", "wrong").is_none());
        assert!(demo_login("ghost", "admin123").is_none());
    }

    #[test]
    fn doctor_cannot_delete_records() {
        let doctor = demo_login("doctor", "doctor123").unwrap();
        assert!(doctor.can(Resource::Records, Action::Update));
        assert!(!doctor.can(Resource::Records, Action::Delete));
        assert!(doctor.can(Resource::Settings, Action::Read));
    }

    #[test]
    fn nurse_is_a_receptionist_without_user_access() {
        let nurse = demo_login("nurse", "nurse123").unwrap();
        assert_eq!(nurse.role, Role::Receptionist);
        assert!(!nurse.can(Resource::Users, Action::Read));
        assert!(nurse.can(Resource::Records, Action::Create));
    }

    #[test]
    fn gate_denies_anonymous_callers() {
        let anon = StaticAuthorizer::new(None);
        let decision = authorize(&anon, Resource::Records, Action::Read);
        assert_eq!(decision, Decision::Deny(DenyReason::NotAuthenticated));
        assert!(matches!(
            decision.into_result(),
            Err(MedrecError::NotAuthenticated)
        ));
    }

    #[test]
    fn gate_reports_the_missing_permission() {
        let doctor = StaticAuthorizer::demo("doctor");
        assert!(authorize(&doctor, Resource::Records, Action::Create).is_allowed());
        let err = authorize(&doctor, Resource::Records, Action::Delete)
            .into_result()
            .unwrap_err();
        assert!(matches!(
            err,
            MedrecError::PermissionDenied {
                resource: Resource::Records,
                action: Action::Delete
            }
        ));
        assert_eq!(
            err.to_string(),
            "You do not have permission to delete records"
        );
    }

    #[test]
    fn user_serializes_with_lowercase_enums() {
        let admin = demo_login("admin", "admin123").unwrap();
        let json = serde_json::to_value(&admin).unwrap();
        assert_eq!(json["role"], "admin");
        assert_eq!(json["permissions"]["records"]["delete"], true);
    }
}
