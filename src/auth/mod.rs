//! Authentication and session handling.
//!
//! Identity is a stub capability: [`Authenticator`] has a single mocked
//! implementation that accepts any non-blank credentials. Sessions are opaque
//! bearer tokens compared in constant time.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use subtle::ConstantTimeEq;
use tokio::sync::{Mutex, RwLock};

use crate::errors::{codes, ErrorDetails, ErrorResponse};
use crate::models::User;
use crate::store::UserDataStore;

/// Header name for the session token.
pub const SESSION_HEADER: &str = "x-session-token";

/// Identity provider capability.
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Option<User>;
    async fn register(&self, name: &str, email: &str, password: &str) -> Option<User>;
    async fn reset_password(&self, email: &str) -> bool;
}

/// Accepts any non-blank credentials. No password is checked or stored.
#[derive(Debug, Default, Clone)]
pub struct MockAuthenticator;

fn present(value: &str) -> bool {
    !value.trim().is_empty()
}

#[async_trait]
impl Authenticator for MockAuthenticator {
    async fn login(&self, email: &str, password: &str) -> Option<User> {
        (present(email) && present(password)).then(|| User {
            id: "user-1".to_string(),
            name: "Test User".to_string(),
            email: email.to_string(),
        })
    }

    async fn register(&self, name: &str, email: &str, password: &str) -> Option<User> {
        (present(name) && present(email) && present(password)).then(|| User {
            id: "user-2".to_string(),
            name: name.to_string(),
            email: email.to_string(),
        })
    }

    async fn reset_password(&self, email: &str) -> bool {
        tracing::info!("Password reset requested for {}", email);
        true
    }
}

/// An authenticated session and the data store it owns.
#[derive(Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
    pub store: Arc<Mutex<UserDataStore>>,
}

/// Most tokens one user may hold at once. Opening another evicts the oldest.
pub const MAX_SESSIONS_PER_USER: usize = 5;

/// Everything open for one user: their tokens and the store those tokens share.
struct UserSessions {
    user: User,
    store: Arc<Mutex<UserDataStore>>,
    tokens: VecDeque<String>,
}

/// Open sessions, grouped by user id.
#[derive(Default)]
pub struct SessionRegistry {
    users: RwLock<HashMap<String, UserSessions>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session for `user`.
    ///
    /// All sessions of one user share a single store, so that user's
    /// collections always have a single writer. `load` is only awaited when
    /// the user has nothing open. The write lock is held across the load so
    /// concurrent logins of the same user cannot each build a store.
    pub async fn open<F>(&self, user: User, load: F) -> Session
    where
        F: std::future::Future<Output = UserDataStore>,
    {
        let mut users = self.users.write().await;

        let entry = match users.entry(user.id.clone()) {
            Entry::Occupied(occupied) => occupied.into_mut(),
            Entry::Vacant(vacant) => {
                let store = Arc::new(Mutex::new(load.await));
                vacant.insert(UserSessions {
                    user: user.clone(),
                    store,
                    tokens: VecDeque::new(),
                })
            }
        };
        entry.user = user;

        let token = new_token();
        entry.tokens.push_back(token.clone());
        if entry.tokens.len() > MAX_SESSIONS_PER_USER {
            entry.tokens.pop_front();
            tracing::debug!("Evicted oldest session for {}", entry.user.id);
        }

        tracing::info!(
            "Opened session for {} ({} open)",
            entry.user.id,
            entry.tokens.len()
        );

        Session {
            token,
            user: entry.user.clone(),
            store: entry.store.clone(),
        }
    }

    /// Find the session for a presented token.
    pub async fn resolve(&self, token: &str) -> Option<Session> {
        let users = self.users.read().await;
        // Compare against every token so timing does not depend on position.
        let mut found = None;
        for entry in users.values() {
            for candidate in &entry.tokens {
                if constant_time_compare(token, candidate) && found.is_none() {
                    found = Some(Session {
                        token: candidate.clone(),
                        user: entry.user.clone(),
                        store: entry.store.clone(),
                    });
                }
            }
        }
        found
    }

    /// Close a session. Returns whether it was open.
    ///
    /// The user's store is dropped with their last session.
    pub async fn close(&self, token: &str) -> bool {
        let mut users = self.users.write().await;
        let mut closed = false;
        for entry in users.values_mut() {
            let before = entry.tokens.len();
            entry.tokens.retain(|t| !constant_time_compare(token, t));
            closed |= entry.tokens.len() != before;
        }
        users.retain(|_, entry| !entry.tokens.is_empty());
        if closed {
            tracing::info!("Closed session");
        }
        closed
    }
}

fn new_token() -> String {
    format!(
        "{}{}",
        uuid::Uuid::new_v4().simple(),
        uuid::Uuid::new_v4().simple()
    )
}

/// Read the session token from `x-session-token` or a bearer header.
pub fn presented_token(request: &Request) -> Option<String> {
    let headers = request.headers();
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.strip_prefix("Bearer "))
        })
        .map(|s| s.trim().to_string())
}

/// Session authentication layer. Resolved sessions are attached as a request extension.
pub async fn session_auth_layer(
    registry: Arc<SessionRegistry>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = presented_token(&request) else {
        return unauthorized_response("Missing session token");
    };

    match registry.resolve(&token).await {
        Some(session) => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        None => unauthorized_response("Invalid or expired session"),
    }
}

/// Perform constant-time string comparison.
fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Create an unauthorized response.
fn unauthorized_response(message: &str) -> Response {
    let body = ErrorResponse {
        success: false,
        error: ErrorDetails {
            code: codes::UNAUTHORIZED.to_string(),
            message: message.to_string(),
        },
    };

    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{init_database, Repository};
    use tempfile::TempDir;

    async fn repo() -> (Arc<Repository>, TempDir) {
        let dir = TempDir::new().unwrap();
        let pool = init_database(&dir.path().join("auth.sqlite")).await.unwrap();
        (Arc::new(Repository::new(pool)), dir)
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("token-123", "token-123"));
        assert!(!constant_time_compare("token-123", "token-124"));
        assert!(!constant_time_compare("short", "much-longer-token"));
        assert!(constant_time_compare("", ""));
    }

    #[tokio::test]
    async fn mock_login_requires_both_fields() {
        let auth = MockAuthenticator;
        let user = auth.login("sam@example.com", "pw").await.unwrap();
        assert_eq!(user.id, "user-1");
        assert_eq!(user.name, "Test User");
        assert_eq!(user.email, "sam@example.com");

        assert!(auth.login("sam@example.com", "").await.is_none());
        assert!(auth.login("   ", "pw").await.is_none());
    }

    #[tokio::test]
    async fn mock_register_echoes_name_and_email() {
        let auth = MockAuthenticator;
        let user = auth.register("Sam", "sam@example.com", "pw").await.unwrap();
        assert_eq!(user.id, "user-2");
        assert_eq!(user.name, "Sam");
        assert!(auth.register("", "sam@example.com", "pw").await.is_none());
        assert!(auth.reset_password("sam@example.com").await);
    }

    #[tokio::test]
    async fn sessions_open_resolve_close() {
        let (repo, _dir) = repo().await;
        let registry = SessionRegistry::new();
        let user = MockAuthenticator.login("a@b.c", "pw").await.unwrap();

        let session = registry
            .open(user.clone(), UserDataStore::load(repo, &user.id, false))
            .await;
        assert_eq!(session.token.len(), 64);

        let resolved = registry.resolve(&session.token).await.unwrap();
        assert_eq!(resolved.user, user);
        assert!(registry.resolve("bogus").await.is_none());

        assert!(registry.close(&session.token).await);
        assert!(!registry.close(&session.token).await);
        assert!(registry.resolve(&session.token).await.is_none());
    }

    #[tokio::test]
    async fn same_user_sessions_share_one_store() {
        let (repo, _dir) = repo().await;
        let registry = SessionRegistry::new();
        let user = MockAuthenticator.login("a@b.c", "pw").await.unwrap();

        let first = registry
            .open(user.clone(), UserDataStore::load(repo.clone(), &user.id, false))
            .await;
        let second = registry
            .open(user.clone(), UserDataStore::load(repo, &user.id, false))
            .await;

        assert_ne!(first.token, second.token);
        assert!(Arc::ptr_eq(&first.store, &second.store));
    }

    #[tokio::test]
    async fn concurrent_logins_of_one_user_share_one_store() {
        let (repo, _dir) = repo().await;
        let registry = SessionRegistry::new();
        let user = MockAuthenticator.login("a@b.c", "pw").await.unwrap();

        let (a, b) = tokio::join!(
            registry.open(user.clone(), UserDataStore::load(repo.clone(), &user.id, false)),
            registry.open(user.clone(), UserDataStore::load(repo.clone(), &user.id, false)),
        );

        assert_ne!(a.token, b.token);
        assert!(Arc::ptr_eq(&a.store, &b.store));
    }

    #[tokio::test]
    async fn oldest_token_is_evicted_past_the_cap() {
        let (repo, _dir) = repo().await;
        let registry = SessionRegistry::new();
        let user = MockAuthenticator.login("a@b.c", "pw").await.unwrap();

        let mut tokens = Vec::new();
        for _ in 0..=MAX_SESSIONS_PER_USER {
            let session = registry
                .open(user.clone(), UserDataStore::load(repo.clone(), &user.id, false))
                .await;
            tokens.push(session.token);
        }

        assert!(registry.resolve(&tokens[0]).await.is_none());
        for token in &tokens[1..] {
            assert!(registry.resolve(token).await.is_some());
        }
    }

    #[tokio::test]
    async fn closing_the_last_session_drops_the_store() {
        let (repo, _dir) = repo().await;
        let registry = SessionRegistry::new();
        let user = MockAuthenticator.login("a@b.c", "pw").await.unwrap();

        let session = registry
            .open(user.clone(), UserDataStore::load(repo.clone(), &user.id, false))
            .await;
        let weak = Arc::downgrade(&session.store);
        assert!(registry.close(&session.token).await);
        drop(session);

        assert!(weak.upgrade().is_none());
    }
}
