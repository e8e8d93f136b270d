//! In-memory account directory backing the development server.

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::User;
use crate::error::AccountError;
use crate::wizard::steps::fields;
use crate::wizard::{ConsolidatedProfile, FieldValue};

struct Account {
    user: User,
    password: String,
}

#[derive(Default)]
struct Directory {
    /// Keyed by lowercased email.
    accounts: HashMap<String, Account>,
    /// Bearer token → lowercased email.
    tokens: HashMap<String, String>,
}

impl Directory {
    fn issue_token(&mut self, key: &str) -> String {
        let token = Uuid::new_v4().simple().to_string();
        self.tokens.insert(token.clone(), key.to_string());
        token
    }
}

/// Registered accounts and live session tokens.
#[derive(Default)]
pub struct AccountDirectory {
    inner: RwLock<Directory>,
}

fn required_text<'a>(profile: &'a ConsolidatedProfile, field: &'static str) -> Result<&'a str, AccountError> {
    profile
        .get(field)
        .and_then(FieldValue::as_text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(AccountError::MissingField(field))
}

impl AccountDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an account from a signup payload and open a session for it.
    pub async fn register(&self, profile: &ConsolidatedProfile) -> Result<(User, String), AccountError> {
        let email = required_text(profile, fields::EMAIL)?;
        let name = required_text(profile, fields::FULL_NAME)?;
        let password = profile
            .get(fields::PASSWORD)
            .and_then(FieldValue::as_text)
            .filter(|s| !s.is_empty())
            .ok_or(AccountError::MissingField(fields::PASSWORD))?;
        let key = email.to_lowercase();

        let mut dir = self.inner.write().await;
        if dir.accounts.contains_key(&key) {
            return Err(AccountError::DuplicateEmail);
        }
        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            name: name.to_string(),
            role: profile.role,
            created_at: now,
            updated_at: now,
        };
        dir.accounts.insert(
            key.clone(),
            Account {
                user: user.clone(),
                password: password.to_string(),
            },
        );
        let token = dir.issue_token(&key);
        tracing::info!(user_id = %user.id, role = %user.role, "Account registered");
        Ok((user, token))
    }

    /// Check credentials and open a new session.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AccountError> {
        let key = email.trim().to_lowercase();
        let mut dir = self.inner.write().await;
        let user = match dir.accounts.get(&key) {
            Some(account) if account.password == password => account.user.clone(),
            _ => return Err(AccountError::InvalidCredentials),
        };
        let token = dir.issue_token(&key);
        Ok((user, token))
    }

    /// The user a bearer token belongs to.
    pub async fn user_for_token(&self, token: &str) -> Result<User, AccountError> {
        let dir = self.inner.read().await;
        dir.tokens
            .get(token)
            .and_then(|key| dir.accounts.get(key))
            .map(|account| account.user.clone())
            .ok_or(AccountError::Unauthenticated)
    }

    /// Revoke a token. Returns whether it was live.
    pub async fn revoke(&self, token: &str) -> bool {
        self.inner.write().await.tokens.remove(token).is_some()
    }

    pub async fn account_count(&self) -> usize {
        self.inner.read().await.accounts.len()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::wizard::Role;

    fn profile(email: &str, name: &str) -> ConsolidatedProfile {
        let mut data = BTreeMap::new();
        data.insert("email".to_string(), FieldValue::from(email));
        data.insert("fullName".to_string(), FieldValue::from(name));
        data.insert("password".to_string(), FieldValue::from("Passw0rd"));
        ConsolidatedProfile {
            role: Role::Coach,
            data,
        }
    }

    #[tokio::test]
    async fn register_then_login() {
        let dir = AccountDirectory::new();
        let (user, token) = dir.register(&profile("jane@x.com", "Jane Doe")).await.unwrap();
        assert_eq!(user.role, Role::Coach);
        assert_eq!(dir.user_for_token(&token).await.unwrap(), user);

        let (again, second) = dir.login("JANE@x.com", "Passw0rd").await.unwrap();
        assert_eq!(again.id, user.id);
        assert_ne!(second, token);
    }

    #[tokio::test]
    async fn duplicate_email_is_case_insensitive() {
        let dir = AccountDirectory::new();
        dir.register(&profile("jane@x.com", "Jane")).await.unwrap();
        let err = dir.register(&profile("Jane@X.com", "Other")).await.unwrap_err();
        assert_eq!(err, AccountError::DuplicateEmail);
        assert_eq!(dir.account_count().await, 1);
    }

    #[tokio::test]
    async fn missing_name_is_rejected() {
        let dir = AccountDirectory::new();
        let err = dir.register(&profile("jane@x.com", "  ")).await.unwrap_err();
        assert_eq!(err, AccountError::MissingField("fullName"));
        assert_eq!(err.to_string(), "fullName is required");
    }

    #[tokio::test]
    async fn wrong_password_and_revoked_token() {
        let dir = AccountDirectory::new();
        let (_, token) = dir.register(&profile("jane@x.com", "Jane")).await.unwrap();
        assert_eq!(
            dir.login("jane@x.com", "nope").await.unwrap_err(),
            AccountError::InvalidCredentials
        );
        assert!(dir.revoke(&token).await);
        assert!(!dir.revoke(&token).await);
        assert_eq!(
            dir.user_for_token(&token).await.unwrap_err(),
            AccountError::Unauthenticated
        );
    }
}
