//! Auth API client: the trait the wizard and actions talk to, and its
//! reqwest implementation.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use super::model::{ApiErrorBody, AuthResponseBody, AuthSession, LoginRequest, MeResponse, User};
use crate::config::ClientConfig;
use crate::error::AuthError;
use crate::routes;
use crate::wizard::ConsolidatedProfile;

/// Operations of the remote auth API.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// `POST /api/auth/login`.
    async fn login(&self, email: &str, password: &SecretString) -> Result<AuthSession, AuthError>;

    /// `POST /api/auth/logout`, sending the bearer token when there is one.
    async fn logout(&self, token: Option<&SecretString>) -> Result<(), AuthError>;

    /// `POST /api/auth/register` with `{role, data}`.
    async fn register(&self, profile: &ConsolidatedProfile) -> Result<AuthSession, AuthError>;

    /// `GET /api/auth/me`.
    async fn current_user(&self, token: &SecretString) -> Result<User, AuthError>;
}

/// HTTP implementation of [`AuthApi`].
pub struct HttpAuthClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAuthClient {
    /// Build a client with the configured base URL and request timeout.
    pub fn new(config: &ClientConfig) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a non-2xx response into [`AuthError::Rejected`], reading the
    /// `message` field from the body when present.
    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, AuthError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .and_then(|b| b.message);
        tracing::warn!(status = status.as_u16(), message = ?message, "Auth request rejected");
        Err(AuthError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl AuthApi for HttpAuthClient {
    async fn login(&self, email: &str, password: &SecretString) -> Result<AuthSession, AuthError> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.expose_secret().to_string(),
        };
        let resp = self
            .client
            .post(self.url(routes::auth::LOGIN))
            .json(&body)
            .send()
            .await?;
        let data: AuthResponseBody = Self::check(resp).await?.json().await?;
        Ok(data.into())
    }

    async fn logout(&self, token: Option<&SecretString>) -> Result<(), AuthError> {
        let mut req = self.client.post(self.url(routes::auth::LOGOUT));
        if let Some(token) = token {
            req = req.bearer_auth(token.expose_secret());
        }
        Self::check(req.send().await?).await?;
        Ok(())
    }

    async fn register(&self, profile: &ConsolidatedProfile) -> Result<AuthSession, AuthError> {
        let resp = self
            .client
            .post(self.url(routes::auth::REGISTER))
            .json(profile)
            .send()
            .await?;
        let data: AuthResponseBody = Self::check(resp).await?.json().await?;
        Ok(data.into())
    }

    async fn current_user(&self, token: &SecretString) -> Result<User, AuthError> {
        let resp = self
            .client
            .get(self.url(routes::auth::ME))
            .bearer_auth(token.expose_secret())
            .send()
            .await?;
        let data: MeResponse = Self::check(resp).await?.json().await?;
        Ok(data.user)
    }
}

/// In-memory [`AuthApi`] for unit tests.
#[cfg(test)]
pub(crate) mod stub {
    use std::sync::Mutex;

    use chrono::Utc;

    use super::*;
    use crate::wizard::Role;

    #[derive(Default)]
    pub struct StubAuthApi {
        /// When set, every call fails with this error.
        pub reject_with: Mutex<Option<(u16, Option<String>)>>,
        pub registered: Mutex<Vec<ConsolidatedProfile>>,
        pub logins: Mutex<Vec<String>>,
        pub logouts: Mutex<u32>,
    }

    impl StubAuthApi {
        pub fn rejecting(status: u16, message: Option<&str>) -> Self {
            let stub = Self::default();
            *stub.reject_with.lock().unwrap() = Some((status, message.map(String::from)));
            stub
        }

        pub fn accept(&self) {
            *self.reject_with.lock().unwrap() = None;
        }

        fn fail(&self) -> Result<(), AuthError> {
            match self.reject_with.lock().unwrap().clone() {
                Some((status, message)) => Err(AuthError::Rejected { status, message }),
                None => Ok(()),
            }
        }

        pub fn user(email: &str, name: &str, role: Role) -> User {
            User {
                id: "user-1".into(),
                email: email.into(),
                name: name.into(),
                role,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            }
        }
    }

    #[async_trait]
    impl AuthApi for StubAuthApi {
        async fn login(
            &self,
            email: &str,
            _password: &SecretString,
        ) -> Result<AuthSession, AuthError> {
            self.fail()?;
            self.logins.lock().unwrap().push(email.to_string());
            Ok(AuthSession {
                user: Self::user(email, "Stub User", Role::Player),
                token: SecretString::from("stub-token"),
            })
        }

        async fn logout(&self, _token: Option<&SecretString>) -> Result<(), AuthError> {
            *self.logouts.lock().unwrap() += 1;
            self.fail()
        }

        async fn register(&self, profile: &ConsolidatedProfile) -> Result<AuthSession, AuthError> {
            self.fail()?;
            self.registered.lock().unwrap().push(profile.clone());
            Ok(AuthSession {
                user: Self::user(
                    profile.email().unwrap_or_default(),
                    profile.full_name().unwrap_or_default(),
                    profile.role,
                ),
                token: SecretString::from("stub-token"),
            })
        }

        async fn current_user(&self, _token: &SecretString) -> Result<User, AuthError> {
            self.fail()?;
            Ok(Self::user("jane@x.com", "Jane Doe", Role::Player))
        }
    }

    /// Never answers a register call; every other call is rejected.
    #[derive(Default)]
    pub struct HangingAuthApi;

    #[async_trait]
    impl AuthApi for HangingAuthApi {
        async fn login(
            &self,
            _email: &str,
            _password: &SecretString,
        ) -> Result<AuthSession, AuthError> {
            Err(AuthError::NotAuthenticated)
        }

        async fn logout(&self, _token: Option<&SecretString>) -> Result<(), AuthError> {
            Ok(())
        }

        async fn register(&self, _profile: &ConsolidatedProfile) -> Result<AuthSession, AuthError> {
            std::future::pending().await
        }

        async fn current_user(&self, _token: &SecretString) -> Result<User, AuthError> {
            Err(AuthError::NotAuthenticated)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn base_url_drops_trailing_slash() {
        let config = ClientConfig {
            api_base_url: "http://localhost:3000/".into(),
            request_timeout: Duration::from_secs(1),
            store_path: "unused.json".into(),
        };
        let client = HttpAuthClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(client.url(routes::auth::ME), "http://localhost:3000/api/auth/me");
    }

    #[tokio::test]
    async fn unreachable_server_is_http_error() {
        let config = ClientConfig {
            // Port 9 (discard) on loopback is closed on test machines.
            api_base_url: "http://127.0.0.1:9".into(),
            request_timeout: Duration::from_secs(2),
            store_path: "unused.json".into(),
        };
        let client = HttpAuthClient::new(&config).unwrap();
        let err = client
            .login("jane@x.com", &SecretString::from("Passw0rd"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Http(_) | AuthError::Timeout(_)));
    }
}
