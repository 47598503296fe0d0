//! Authentication module: credential submission, session persistence,
//! and the flows tying them together.
//!
//! This module provides:
//! - `AuthClient`: submits credentials to the remote login endpoint
//! - `SessionStore`: durable token/profile storage over an injected backend
//! - `sign_in`/`sign_out`/`current_user`: the login, logout, and
//!   profile-read flows
//!
//! The submit call itself has no storage side effect; `sign_in` makes the
//! login-then-persist coupling explicit so each half is testable alone.

pub mod client;
pub mod error;
pub mod session;

pub use client::AuthClient;
pub use error::{AuthError, StorageError};
pub use session::{FileStorage, MemoryStorage, Session, SessionStore, Storage};

use crate::models::UserProfile;

/// Log in and persist the resulting session.
///
/// On rejection the store is left untouched; a failed attempt never
/// clears an existing session.
pub async fn sign_in<S: Storage>(
    client: &AuthClient,
    store: &mut SessionStore<S>,
    username: &str,
    password: &str,
) -> Result<Session, AuthError> {
    let session = client.login(username, password).await?;
    store.save(&session)?;
    Ok(session)
}

/// Discard the stored session. Idempotent.
pub fn sign_out<S: Storage>(store: &mut SessionStore<S>) -> Result<(), StorageError> {
    store.clear()
}

/// Profile of the currently authenticated user, if any
pub fn current_user<S: Storage>(store: &SessionStore<S>) -> Option<UserProfile> {
    store.load().and_then(|s| s.user)
}
