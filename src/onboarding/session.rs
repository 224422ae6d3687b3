//! Session and navigation ports the wizard talks to.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A signed-in farmer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub onboarding_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub onboarding_completed_at: Option<DateTime<Utc>>,
}

/// A product-demonstration session. Nothing it does is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoUser {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Session {
    Authenticated(AuthenticatedUser),
    DemoAccount(DemoUser),
}

impl Session {
    pub fn is_demo_account(&self) -> bool {
        matches!(self, Self::DemoAccount(_))
    }

    pub fn display_name(&self) -> &str {
        match self {
            Self::Authenticated(u) => &u.name,
            Self::DemoAccount(u) => &u.name,
        }
    }
}

/// Routes the wizard can send the user to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Dashboard,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Self::Dashboard => "/dashboard",
        }
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// The auth/session collaborator.
pub trait SessionProvider: Send + Sync {
    fn session(&self) -> Session;

    /// Flag the current user's onboarding as done. In-memory, never fails.
    fn mark_onboarding_complete(&self);
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Session provider holding the session in memory.
pub struct LocalSession {
    session: Mutex<Session>,
}

impl LocalSession {
    pub fn new(session: Session) -> Self {
        Self {
            session: Mutex::new(session),
        }
    }
}

impl SessionProvider for LocalSession {
    fn session(&self) -> Session {
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn mark_onboarding_complete(&self) {
        let mut session = self
            .session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Session::Authenticated(user) = &mut *session {
            user.onboarding_completed = true;
            user.onboarding_completed_at = Some(Utc::now());
        }
    }
}
