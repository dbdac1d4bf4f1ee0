use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{AuthProvider, AuthSession, AuthUser, privileged_key_missing};
use crate::error::{AppError, friendly_auth_message};

#[derive(Default)]
struct Store {
    /// email -> (user, password)
    users: HashMap<String, (AuthUser, String)>,
    /// access token -> user id
    tokens: HashMap<String, String>,
}

/// In-process stand-in for the hosted auth service. Used when no
/// `AUTH_URL` is configured and throughout the test-suite.
pub struct MemoryAuthProvider {
    store: Mutex<Store>,
    privileged: bool,
}

impl MemoryAuthProvider {
    pub fn new() -> Self {
        Self { store: Mutex::new(Store::default()), privileged: true }
    }

    /// A provider without the privileged key, like a deployment missing
    /// `AUTH_SERVICE_ROLE_KEY`.
    pub fn without_privileged_access() -> Self {
        Self { store: Mutex::new(Store::default()), privileged: false }
    }

    pub async fn user_count(&self) -> usize {
        self.store.lock().await.users.len()
    }

    async fn insert_user(&self, email: &str, password: &str) -> Result<AuthUser, AppError> {
        let key = email.trim().to_lowercase();
        let mut store = self.store.lock().await;
        if store.users.contains_key(&key) {
            return Err(AppError::Conflict(friendly_auth_message("User already registered")));
        }

        let user = AuthUser {
            id: Uuid::new_v4().to_string(),
            email: Some(key.clone()),
        };
        store.users.insert(key, (user.clone(), password.to_string()));
        Ok(user)
    }
}

impl Default for MemoryAuthProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthProvider for MemoryAuthProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AppError> {
        let mut store = self.store.lock().await;
        let user = match store.users.get(&email.trim().to_lowercase()) {
            Some((user, stored)) if stored == password => user.clone(),
            _ => return Err(AppError::Auth(friendly_auth_message("Invalid login credentials"))),
        };

        let access_token = Uuid::new_v4().simple().to_string();
        store.tokens.insert(access_token.clone(), user.id.clone());

        Ok(AuthSession {
            access_token,
            refresh_token: None,
            expires_in: Some(3600),
            user,
        })
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AppError> {
        self.insert_user(email, password).await
    }

    async fn get_user(&self, access_token: &str) -> Result<AuthUser, AppError> {
        let store = self.store.lock().await;
        let user_id = store
            .tokens
            .get(access_token)
            .ok_or_else(|| AppError::Unauthorized("Session is invalid or has expired".to_string()))?;

        store
            .users
            .values()
            .find(|(user, _)| &user.id == user_id)
            .map(|(user, _)| user.clone())
            .ok_or_else(|| AppError::Unauthorized("Session is invalid or has expired".to_string()))
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AppError> {
        self.store.lock().await.tokens.remove(access_token);
        Ok(())
    }

    async fn admin_create_user(&self, email: &str, password: &str) -> Result<AuthUser, AppError> {
        if !self.privileged {
            return Err(privileged_key_missing());
        }
        self.insert_user(email, password).await
    }

    async fn admin_delete_user(&self, user_id: &str) -> Result<(), AppError> {
        if !self.privileged {
            return Err(privileged_key_missing());
        }
        let mut store = self.store.lock().await;
        store.users.retain(|_, (user, _)| user.id != user_id);
        store.tokens.retain(|_, id| id != user_id);
        Ok(())
    }

    fn has_privileged_access(&self) -> bool {
        self.privileged
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sign_in_issues_token_that_resolves_to_user() {
        let provider = MemoryAuthProvider::new();
        let created = provider.sign_up("Ada@Example.com", "secret1").await.unwrap();

        let session = provider.sign_in("ada@example.com", "secret1").await.unwrap();
        let resolved = provider.get_user(&session.access_token).await.unwrap();
        assert_eq!(resolved, created);
    }

    #[tokio::test]
    async fn wrong_password_is_rejected_with_friendly_message() {
        let provider = MemoryAuthProvider::new();
        provider.sign_up("ada@example.com", "secret1").await.unwrap();

        let err = provider.sign_in("ada@example.com", "nope").await.unwrap_err();
        match err {
            AppError::Auth(msg) => assert!(msg.starts_with("Invalid email or password")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn sign_out_revokes_token() {
        let provider = MemoryAuthProvider::new();
        provider.sign_up("ada@example.com", "secret1").await.unwrap();
        let session = provider.sign_in("ada@example.com", "secret1").await.unwrap();

        provider.sign_out(&session.access_token).await.unwrap();
        assert!(provider.get_user(&session.access_token).await.is_err());
    }

    #[tokio::test]
    async fn privileged_calls_fail_without_key() {
        let provider = MemoryAuthProvider::without_privileged_access();
        let err = provider.admin_create_user("x@example.com", "secret1").await.unwrap_err();
        assert!(matches!(err, AppError::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let provider = MemoryAuthProvider::new();
        provider.admin_create_user("x@example.com", "secret1").await.unwrap();
        let err = provider.admin_create_user("X@example.com", "other11").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
