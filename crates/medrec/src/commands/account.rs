use crate::auth::{Authorizer, Credentials, Session, UserPatch};
use crate::commands::{CmdMessage, CmdResult};
use crate::error::{MedrecError, Result};
use crate::store::backend::StorageBackend;

pub fn login<B: StorageBackend>(session: &mut Session<B>, credentials: &Credentials) -> Result<CmdResult> {
    let user = session.login(credentials)?.clone();
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Welcome, {}", user.name)));
    result.user = Some(user);
    Ok(result)
}

pub fn logout<B: StorageBackend>(session: &mut Session<B>) -> Result<CmdResult> {
    let was_logged_in = session.is_authenticated();
    session.logout()?;
    let mut result = CmdResult::default();
    if was_logged_in {
        result.add_message(CmdMessage::info("You have been logged out"));
    } else {
        result.add_message(CmdMessage::info("Not logged in"));
    }
    Ok(result)
}

pub fn whoami<B: StorageBackend>(session: &Session<B>) -> Result<CmdResult> {
    let user = session
        .current_user()
        .cloned()
        .ok_or(MedrecError::NotAuthenticated)?;
    Ok(CmdResult {
        user: Some(user),
        ..Default::default()
    })
}

pub fn update_profile<B: StorageBackend>(session: &mut Session<B>, patch: UserPatch) -> Result<CmdResult> {
    let user = session.update_user(patch)?.clone();
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success("Profile updated"));
    result.user = Some(user);
    Ok(result)
}
