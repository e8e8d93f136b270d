//! Auth API wire types.

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::wizard::Role;

/// A registered account as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `POST /api/auth/login` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// `{user, token}` as it appears on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponseBody {
    pub user: User,
    pub token: String,
}

/// `GET /api/auth/me` success body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    pub user: User,
}

/// Body of a non-2xx response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// An authenticated session: the user plus their bearer token.
#[derive(Debug)]
pub struct AuthSession {
    pub user: User,
    pub token: SecretString,
}

impl From<AuthResponseBody> for AuthSession {
    fn from(body: AuthResponseBody) -> Self {
        Self {
            user: body.user,
            token: SecretString::from(body.token),
        }
    }
}

impl Clone for AuthSession {
    fn clone(&self) -> Self {
        Self {
            user: self.user.clone(),
            token: SecretString::from(self.token.expose_secret().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_uses_camel_case_timestamps() {
        let json = serde_json::json!({
            "id": "u1",
            "email": "jane@x.com",
            "name": "Jane Doe",
            "role": "player",
            "createdAt": "2026-01-02T03:04:05Z",
            "updatedAt": "2026-01-02T03:04:05Z"
        });
        let user: User = serde_json::from_value(json).unwrap();
        assert_eq!(user.role, Role::Player);
        assert_eq!(user.created_at.to_rfc3339(), "2026-01-02T03:04:05+00:00");
    }

    #[test]
    fn error_body_message_is_optional() {
        let body: ApiErrorBody = serde_json::from_str("{}").unwrap();
        assert!(body.message.is_none());
        let body: ApiErrorBody = serde_json::from_str(r#"{"message":"nope"}"#).unwrap();
        assert_eq!(body.message.as_deref(), Some("nope"));
    }

    #[test]
    fn session_debug_redacts_token() {
        let session = AuthSession {
            user: User {
                id: "u1".into(),
                email: "jane@x.com".into(),
                name: "Jane".into(),
                role: Role::Coach,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            token: SecretString::from("tok-123"),
        };
        assert!(!format!("{session:?}").contains("tok-123"));
        assert_eq!(session.clone().token.expose_secret(), "tok-123");
    }
}
