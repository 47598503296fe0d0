//! clinicport - client-side authentication and session layer for the
//! clinic dashboard.
//!
//! Three pieces, leaves first: [`auth::AuthClient`] submits credentials
//! to the remote login endpoint, [`auth::SessionStore`] persists the
//! returned token (and optional profile) in durable local storage, and
//! [`router::RouteTable`] gates navigation on the presence of that token.

pub mod auth;
pub mod config;
pub mod models;
pub mod router;

pub use auth::{current_user, sign_in, sign_out};
pub use auth::{AuthClient, AuthError, Session, SessionStore, StorageError};
pub use config::Config;
pub use models::UserProfile;
pub use router::{Navigation, Route, RouteTable};
