//! Auth actions bound to the application store and notifier.
//!
//! Each action flips the auth slice's loading flag around the API call,
//! records the outcome in the slice (which persists the session), and raises
//! a destructive toast on failure.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::RwLock;

use super::client::AuthApi;
use super::model::{AuthSession, User};
use crate::error::{AuthError, WizardError};
use crate::notify::{Notifier, Toast};
use crate::store::{AppStore, StoreState};
use crate::wizard::steps::{fields, login_form};
use crate::wizard::{StepForm, SubmitOutcome, ValidationReport, WizardController};

pub const LOGIN_FAILED: &str = "Login failed";
pub const LOGOUT_FAILED: &str = "Logout failed";
pub const CURRENT_USER_FAILED: &str = "Failed to load current user";

/// Outcome of an auth action, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResult {
    pub success: bool,
    pub error: Option<String>,
}

impl ActionResult {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
        }
    }
}

/// Login / logout / registration / session refresh.
pub struct AuthActions {
    api: Arc<dyn AuthApi>,
    store: Arc<RwLock<AppStore>>,
    notifier: Arc<dyn Notifier>,
}

impl AuthActions {
    pub fn new(
        api: Arc<dyn AuthApi>,
        store: Arc<RwLock<AppStore>>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            api,
            store,
            notifier,
        }
    }

    pub fn store(&self) -> &Arc<RwLock<AppStore>> {
        &self.store
    }

    /// Validate the login form without calling the API.
    pub fn validate_login(email: &str, password: &SecretString) -> ValidationReport {
        let mut form = StepForm::new();
        form.set(fields::EMAIL, email.into());
        form.set(fields::PASSWORD, password.expose_secret().into());
        login_form().validate(&form)
    }

    pub async fn login(&self, email: &str, password: &SecretString) -> ActionResult {
        let report = Self::validate_login(email, password);
        if let Some(message) = report.errors().values().next() {
            return ActionResult::failed(message.clone());
        }

        self.begin().await;
        match self.api.login(email, password).await {
            Ok(session) => {
                tracing::info!(user_id = %session.user.id, "Logged in");
                self.apply(|s| {
                    s.auth.login(session);
                    s.auth.set_loading(false);
                })
                .await;
                ActionResult::ok()
            }
            Err(e) => self.fail(&e, LOGIN_FAILED).await,
        }
    }

    /// End the session. The local session is cleared even when the API call
    /// fails; the failure is still reported.
    pub async fn logout(&self) -> ActionResult {
        let token = self.store.read().await.state().auth.token.clone();
        self.begin().await;
        let result = self.api.logout(token.as_ref()).await;
        self.apply(|s| s.auth.logout()).await;
        match result {
            Ok(()) => {
                tracing::info!("Logged out");
                ActionResult::ok()
            }
            Err(e) => {
                let message = e.user_message(LOGOUT_FAILED);
                tracing::warn!("Logout request failed: {}", e);
                self.notifier.notify(Toast::error(message.clone()));
                ActionResult::failed(message)
            }
        }
    }

    /// Submit a completed wizard and sign the new account in.
    pub async fn register(&self, wizard: &mut WizardController) -> Result<ActionResult, WizardError> {
        self.begin().await;
        let outcome = wizard.submit(self.api.as_ref(), self.notifier.as_ref()).await;
        let result = match outcome {
            Ok(SubmitOutcome::Registered(session)) => {
                self.apply(|s| {
                    s.auth.login(session);
                    s.auth.set_loading(false);
                })
                .await;
                ActionResult::ok()
            }
            Ok(SubmitOutcome::Blocked(report)) => {
                self.apply(|s| s.auth.set_loading(false)).await;
                let message = report.errors().values().next().cloned().unwrap_or_default();
                ActionResult::failed(message)
            }
            Ok(SubmitOutcome::Failed(e)) => {
                // The controller already raised the toast.
                let message = e.user_message(crate::wizard::controller::REGISTRATION_FAILED);
                self.apply(|s| {
                    s.auth.set_error(Some(message.clone()));
                    s.auth.set_loading(false);
                })
                .await;
                ActionResult::failed(message)
            }
            Err(e) => {
                self.apply(|s| s.auth.set_loading(false)).await;
                return Err(e);
            }
        };
        Ok(result)
    }

    /// Reload the signed-in user from `GET /api/auth/me`.
    pub async fn refresh_current_user(&self) -> Result<User, AuthError> {
        let token = self
            .store
            .read()
            .await
            .state()
            .auth
            .token
            .clone()
            .ok_or(AuthError::NotAuthenticated)?;
        self.begin().await;
        match self.api.current_user(&token).await {
            Ok(user) => {
                let session = AuthSession {
                    user: user.clone(),
                    token,
                };
                self.apply(|s| {
                    s.auth.login(session);
                    s.auth.set_loading(false);
                })
                .await;
                Ok(user)
            }
            Err(e) => {
                self.fail(&e, CURRENT_USER_FAILED).await;
                Err(e)
            }
        }
    }

    async fn begin(&self) {
        self.apply(|s| {
            s.auth.set_loading(true);
            s.auth.set_error(None);
        })
        .await;
    }

    async fn fail(&self, e: &AuthError, fallback: &str) -> ActionResult {
        let message = e.user_message(fallback);
        tracing::warn!("{}: {}", fallback, e);
        self.apply(|s| {
            s.auth.set_error(Some(message.clone()));
            s.auth.set_loading(false);
        })
        .await;
        self.notifier.notify(Toast::error(message.clone()));
        ActionResult::failed(message)
    }

    /// Mutate the store. A failed save is logged; the in-memory state is
    /// already updated.
    async fn apply(&self, f: impl FnOnce(&mut StoreState)) {
        let mut store = self.store.write().await;
        if let Err(e) = store.update(f).await {
            tracing::warn!(path = %store.path().display(), "Failed to persist client store: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::auth::client::stub::StubAuthApi;
    use crate::notify::ToastQueue;
    use crate::wizard::{FieldValue, WizardVariant};

    struct Harness {
        _tmp: TempDir,
        api: Arc<StubAuthApi>,
        toasts: Arc<ToastQueue>,
        actions: AuthActions,
    }

    fn harness(api: StubAuthApi) -> Harness {
        let tmp = TempDir::new().unwrap();
        let store = AppStore::in_memory(tmp.path().join("app-storage.json"));
        let api = Arc::new(api);
        let toasts = Arc::new(ToastQueue::new());
        let actions = AuthActions::new(
            api.clone(),
            Arc::new(RwLock::new(store)),
            toasts.clone(),
        );
        Harness {
            _tmp: tmp,
            api,
            toasts,
            actions,
        }
    }

    fn pw(s: &str) -> SecretString {
        SecretString::from(s)
    }

    #[tokio::test]
    async fn login_stores_session_and_persists() {
        let h = harness(StubAuthApi::default());
        let result = h.actions.login("jane@x.com", &pw("Passw0rd!")).await;
        assert_eq!(result, ActionResult::ok());

        let store = h.actions.store().read().await;
        assert!(store.state().auth.is_authenticated());
        assert!(!store.state().auth.is_loading);
        assert!(store.path().exists());
        assert_eq!(*h.api.logins.lock().unwrap(), ["jane@x.com"]);
    }

    #[tokio::test]
    async fn invalid_login_form_never_calls_api() {
        let h = harness(StubAuthApi::default());
        let result = h.actions.login("jane", &pw("Passw0rd!")).await;
        assert_eq!(result.error.as_deref(), Some("Invalid email address."));

        let result = h.actions.login("jane@x.com", &pw("short")).await;
        assert_eq!(
            result.error.as_deref(),
            Some("Password must be at least 8 characters.")
        );
        assert!(h.api.logins.lock().unwrap().is_empty());
        assert!(h.toasts.is_empty());
    }

    #[tokio::test]
    async fn rejected_login_records_error_and_toasts() {
        let h = harness(StubAuthApi::rejecting(401, Some("Invalid email or password")));
        let result = h.actions.login("jane@x.com", &pw("Passw0rd!")).await;
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Invalid email or password"));

        let store = h.actions.store().read().await;
        assert_eq!(
            store.state().auth.error.as_deref(),
            Some("Invalid email or password")
        );
        assert!(!store.state().auth.is_loading);
        assert_eq!(h.toasts.drain()[0].description, "Invalid email or password");
    }

    #[tokio::test]
    async fn logout_clears_session_even_when_api_fails() {
        let h = harness(StubAuthApi::default());
        h.actions.login("jane@x.com", &pw("Passw0rd!")).await;
        h.api.reject_with.lock().unwrap().replace((500, None));

        let result = h.actions.logout().await;
        assert_eq!(result.error.as_deref(), Some(LOGOUT_FAILED));
        assert_eq!(*h.api.logouts.lock().unwrap(), 1);
        let store = h.actions.store().read().await;
        assert!(!store.state().auth.is_authenticated());
    }

    #[tokio::test]
    async fn register_signs_in_new_account() {
        let h = harness(StubAuthApi::default());
        let mut wizard = WizardController::new(WizardVariant::Player);
        let steps: Vec<Vec<(&str, FieldValue)>> = vec![
            vec![
                ("fullName", "Jane Doe".into()),
                ("email", "jane@x.com".into()),
                ("password", "Passw0rd".into()),
            ],
            vec![
                ("ageGroup", "age_over_18".into()),
                ("country", "uk".into()),
                ("timezone", "America/Chicago".into()),
            ],
            vec![
                ("skillLevel", "advanced".into()),
                ("playStyle", "aggressive".into()),
                ("learningGoals", vec!["endgame".to_string()].into()),
            ],
        ];
        for (i, step) in steps.iter().enumerate() {
            for (name, value) in step {
                wizard.set_field(i + 1, name, value.clone()).unwrap();
            }
            wizard.advance().unwrap();
        }

        let result = h.actions.register(&mut wizard).await.unwrap();
        assert!(result.success);
        let store = h.actions.store().read().await;
        let user = store.state().auth.user.as_ref().unwrap();
        assert_eq!(user.email, "jane@x.com");
        assert_eq!(user.name, "Jane Doe");
    }

    #[tokio::test]
    async fn register_before_final_step_is_misuse() {
        let h = harness(StubAuthApi::default());
        let mut wizard = WizardController::new(WizardVariant::Coach);
        let err = h.actions.register(&mut wizard).await.unwrap_err();
        assert_eq!(err, WizardError::NotAtFinalStep);
        assert!(!h.actions.store().read().await.state().auth.is_loading);
    }

    #[tokio::test]
    async fn refresh_requires_session() {
        let h = harness(StubAuthApi::default());
        let err = h.actions.refresh_current_user().await.unwrap_err();
        assert!(matches!(err, AuthError::NotAuthenticated));

        h.actions.login("jane@x.com", &pw("Passw0rd!")).await;
        let user = h.actions.refresh_current_user().await.unwrap();
        assert_eq!(user.email, "jane@x.com");
    }

    #[tokio::test]
    async fn refresh_failure_uses_fallback() {
        let h = harness(StubAuthApi::default());
        h.actions.login("jane@x.com", &pw("Passw0rd!")).await;
        h.api.reject_with.lock().unwrap().replace((401, None));
        assert!(h.actions.refresh_current_user().await.is_err());
        assert_eq!(h.toasts.drain()[0].description, CURRENT_USER_FAILED);
    }
}
