//! Navigation gating on session presence.
//!
//! The guard is a pure, synchronous decision over the static route table
//! and the session store: protected routes redirect to the login route
//! when no session is stored, and the login route redirects to the
//! landing route when one is. It never errors; a failed storage read
//! reads as "unauthenticated".

use crate::auth::{SessionStore, Storage};

/// Static route descriptor, immutable after startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: String,
    pub name: String,
    pub requires_auth: bool,
}

impl Route {
    pub fn new(path: &str, name: &str, requires_auth: bool) -> Self {
        Self {
            path: path.to_string(),
            name: name.to_string(),
            requires_auth,
        }
    }
}

/// Outcome of a navigation attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Allow,
    Redirect(String),
}

pub struct RouteTable {
    routes: Vec<Route>,
    login: String,
    landing: String,
}

impl RouteTable {
    /// Build a table. `login` names the login route, `landing` the route
    /// authenticated users land on.
    pub fn new(routes: Vec<Route>, login: &str, landing: &str) -> Self {
        Self {
            routes,
            login: login.to_string(),
            landing: landing.to_string(),
        }
    }

    /// The application's route table: a public home page, a protected
    /// dashboard, and the login page.
    pub fn default_table() -> Self {
        Self::new(
            vec![
                Route::new("/", "home", false),
                Route::new("/dashboard", "dashboard", true),
                Route::new("/dashboard/login", "login", false),
            ],
            "login",
            "dashboard",
        )
    }

    pub fn find(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.name == name)
    }

    /// Resolve a navigation attempt given the authentication state.
    /// Unknown route names pass through unchanged.
    pub fn decide(&self, to: &str, authenticated: bool) -> Navigation {
        let requires_auth = self.find(to).is_some_and(|r| r.requires_auth);

        if requires_auth && !authenticated {
            Navigation::Redirect(self.login.clone())
        } else if to == self.login && authenticated {
            Navigation::Redirect(self.landing.clone())
        } else {
            Navigation::Allow
        }
    }

    /// Resolve a navigation attempt against the session store
    pub fn guard<S: Storage>(&self, to: &str, store: &SessionStore<S>) -> Navigation {
        self.decide(to, store.load().is_some())
    }
}
