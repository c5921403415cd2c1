use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// An authenticated traveler session. The token is forwarded verbatim to
/// downstream services; this crate never inspects it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub token: String,
}

/// Resolves a presented bearer token to a session. Booking workflows must
/// not start without a session; "not authenticated" is a precondition
/// failure, never a mid-submission surprise.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn authorize(&self, bearer: &str) -> Result<Session, SessionError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("not authenticated")]
    NotAuthenticated,
}

/// Accepts a single fixed token, for demos and tests.
pub struct StaticSessionProvider {
    token: String,
    user_id: String,
}

impl StaticSessionProvider {
    pub fn new(token: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            user_id: user_id.into(),
        }
    }
}

#[async_trait]
impl SessionProvider for StaticSessionProvider {
    async fn authorize(&self, bearer: &str) -> Result<Session, SessionError> {
        if bearer == self.token {
            Ok(Session {
                user_id: self.user_id.clone(),
                token: self.token.clone(),
            })
        } else {
            Err(SessionError::NotAuthenticated)
        }
    }
}
