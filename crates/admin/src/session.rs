//! Login and session lifetime.
//!
//! A successful `POST /login` yields a bearer token and the signed-in user.
//! The token is handed to the shared [`BackendClient`], which attaches it to
//! every later request and refreshes it on a 401. Independently of those
//! refreshes, the session ends `SESSION_LIFETIME_HOURS` hours after login; the next
//! admin call after that logs out and fails with
//! [`AdminError::SessionExpired`].

use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use threadline_storefront::BackendClient;
use tokio::sync::RwLock;
use tracing::{info, instrument, warn};

use crate::error::{AdminError, Result};

/// How long a login stays valid.
pub const SESSION_LIFETIME_HOURS: i64 = 4;

/// The signed-in back-office user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUser {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginResponse {
    token: String,
    user: AdminUser,
}

/// A live login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: AdminUser,
    pub logged_in_at: DateTime<Utc>,
}

impl Session {
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.logged_in_at + Duration::hours(SESSION_LIFETIME_HOURS)
    }

    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }
}

/// Back-office client. Holds the transport and the current login.
#[derive(Debug)]
pub struct AdminSession {
    backend: BackendClient,
    session: RwLock<Option<Session>>,
}

impl AdminSession {
    /// A logged-out client over `backend`.
    #[must_use]
    pub fn new(backend: BackendClient) -> Self {
        Self {
            backend,
            session: RwLock::new(None),
        }
    }

    /// Log in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AdminError::Api` with the backend's message (or "Login failed")
    /// if the credentials are rejected.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<AdminUser> {
        let response: LoginResponse = self
            .backend
            .post_json(
                &["login"],
                &LoginRequest {
                    email,
                    password: password.expose_secret(),
                },
                "Login failed",
            )
            .await?;

        self.resume(SecretString::from(response.token), response.user.clone(), Utc::now())
            .await;
        info!(user = %response.user.email, "admin logged in");
        Ok(response.user)
    }

    /// Adopt a token obtained earlier, as if `user` had logged in at `logged_in_at`.
    pub async fn resume(&self, token: SecretString, user: AdminUser, logged_in_at: DateTime<Utc>) {
        self.backend.set_token(token).await;
        *self.session.write().await = Some(Session { user, logged_in_at });
    }

    /// Forget the token and the user.
    pub async fn logout(&self) {
        self.backend.clear_token().await;
        *self.session.write().await = None;
    }

    /// The current login, if it has not expired.
    pub async fn session(&self) -> Option<Session> {
        self.session
            .read()
            .await
            .clone()
            .filter(|s| !s.is_expired_at(Utc::now()))
    }

    /// The transport, once the session has been checked.
    ///
    /// # Errors
    ///
    /// Returns [`AdminError::NotLoggedIn`] without a login, or
    /// [`AdminError::SessionExpired`] (after logging out) when it has lapsed.
    pub(crate) async fn authorized(&self) -> Result<&BackendClient> {
        let expired = match self.session.read().await.as_ref() {
            None => return Err(AdminError::NotLoggedIn),
            Some(session) => session.is_expired_at(Utc::now()),
        };

        if expired {
            warn!("admin session expired, logging out");
            self.logout().await;
            return Err(AdminError::SessionExpired);
        }
        Ok(&self.backend)
    }

    /// The transport without a session check, for reads the backend serves publicly.
    pub(crate) const fn backend(&self) -> &BackendClient {
        &self.backend
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration as StdDuration;

    use super::*;

    fn admin_session() -> AdminSession {
        let backend = BackendClient::new(
            url::Url::parse("http://127.0.0.1:9/api/v1/").unwrap(),
            StdDuration::from_secs(2),
        )
        .unwrap();
        AdminSession::new(backend)
    }

    fn user() -> AdminUser {
        AdminUser {
            id: "u1".into(),
            email: "admin@threadline.pk".into(),
            name: Some("Hina".into()),
            role: Some("admin".into()),
        }
    }

    #[test]
    fn test_session_expiry() {
        let start = Utc::now();
        let session = Session {
            user: user(),
            logged_in_at: start,
        };
        assert!(!session.is_expired_at(start + Duration::hours(3)));
        assert!(session.is_expired_at(start + Duration::hours(4)));
    }

    #[test]
    fn test_decode_login_user() {
        let response: LoginResponse = serde_json::from_value(serde_json::json!({
            "token": "jwt",
            "user": { "_id": "u1", "email": "admin@threadline.pk", "role": "admin" }
        }))
        .unwrap();
        assert_eq!(response.user.id, "u1");
        assert_eq!(response.user.name, None);
    }

    #[tokio::test]
    async fn test_requires_login() {
        let admin = admin_session();
        assert!(matches!(admin.authorized().await, Err(AdminError::NotLoggedIn)));
    }

    #[tokio::test]
    async fn test_fresh_session_authorizes() {
        let admin = admin_session();
        admin.resume(SecretString::from("jwt"), user(), Utc::now()).await;
        assert!(admin.authorized().await.is_ok());
        assert_eq!(admin.session().await.unwrap().user, user());
    }

    #[tokio::test]
    async fn test_expired_session_logs_out() {
        let admin = admin_session();
        admin
            .resume(
                SecretString::from("jwt"),
                user(),
                Utc::now() - Duration::hours(5),
            )
            .await;

        assert!(admin.session().await.is_none());
        assert!(matches!(admin.authorized().await, Err(AdminError::SessionExpired)));
        assert!(admin.backend().token().await.is_none());
        assert!(matches!(admin.authorized().await, Err(AdminError::NotLoggedIn)));
    }
}
