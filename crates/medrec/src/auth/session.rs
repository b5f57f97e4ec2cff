use super::{demo_login, Authorizer, User};
use crate::error::{MedrecError, Result};
use crate::store::backend::StorageBackend;
use serde::{Deserialize, Serialize};

/// Storage key holding the serialized logged-in user.
pub const SESSION_KEY: &str = "medicalRecordsUser";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Profile fields a user may change about themselves.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
}

/// Mock login session backed by a storage key.
pub struct Session<B: StorageBackend> {
    backend: B,
    user: Option<User>,
}

impl<B: StorageBackend> Session<B> {
    /// Restores the saved user, if any. A user entry that cannot be parsed is
    /// removed and the session starts logged out.
    pub fn load(backend: B) -> Self {
        let user = match backend.get(SESSION_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    log::warn!("discarding unreadable saved session: {}", e);
                    if let Err(e) = backend.remove(SESSION_KEY) {
                        log::warn!("could not clear saved session: {}", e);
                    }
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                log::warn!("could not read saved session: {}", e);
                None
            }
        };
        Self { backend, user }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn login(&mut self, credentials: &Credentials) -> Result<&User> {
        let user = demo_login(&credentials.username, &credentials.password)
            .ok_or(MedrecError::InvalidCredentials)?;
        self.persist(&user)?;
        log::info!("logged in as {}", user.username);
        let user: &User = self.user.insert(user);
        Ok(user)
    }

    pub fn logout(&mut self) -> Result<()> {
        self.backend.remove(SESSION_KEY)?;
        if let Some(user) = self.user.take() {
            log::info!("logged out {}", user.username);
        }
        Ok(())
    }

    pub fn update_user(&mut self, patch: UserPatch) -> Result<&User> {
        let mut user = self.user.clone().ok_or(MedrecError::NotAuthenticated)?;
        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(avatar) = patch.avatar {
            user.avatar = Some(avatar);
        }
        self.persist(&user)?;
        let user: &User = self.user.insert(user);
        Ok(user)
    }

    fn persist(&self, user: &User) -> Result<()> {
        let raw = serde_json::to_string(user)?;
        self.backend.set(SESSION_KEY, &raw)
    }
}

impl<B: StorageBackend> Authorizer for Session<B> {
    fn current_user(&self) -> Option<&User> {
        self.user.as_ref()
    }
}
