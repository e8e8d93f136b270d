//! Application store with an explicit persistence boundary.
//!
//! State is loaded once at start-up and written back whenever a mutation
//! changes the persisted subset. The document on disk keeps everything under
//! a single namespaced key:
//!
//! ```json
//! { "app-storage": { "version": 0, "state": { "auth": …, "theme": …, "sidebar": … } } }
//! ```
//!
//! Only the session (user + token), theme preferences and sidebar layout are
//! persisted. Loading flags, errors, open/closed sidebar state and any
//! in-progress wizard are not.

pub mod slices;

pub use slices::{
    AuthSlice, ColorScheme, Contrast, FontFamily, FontSize, PersistedAuth, SidebarLayout,
    SidebarPosition, SidebarSlice, SidebarVariant, ThemeMode, ThemePrefs, ThemeSlice,
};

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::fs;

use crate::error::StoreError;

/// Top-level key of the persisted document.
pub const STORAGE_KEY: &str = "app-storage";

/// Schema version of the persisted state.
pub const STORAGE_VERSION: u32 = 0;

/// All client state.
#[derive(Debug, Default)]
pub struct StoreState {
    pub auth: AuthSlice,
    pub theme: ThemeSlice,
    pub sidebar: SidebarSlice,
}

impl StoreState {
    fn persisted(&self) -> PersistedState {
        PersistedState {
            auth: self.auth.persisted(),
            theme: self.theme.prefs.clone(),
            sidebar: self.sidebar.layout.clone(),
        }
    }

    fn restore(persisted: PersistedState) -> Self {
        Self {
            auth: AuthSlice::restore(persisted.auth),
            theme: ThemeSlice {
                prefs: persisted.theme,
                ..ThemeSlice::default()
            },
            sidebar: SidebarSlice {
                layout: persisted.sidebar,
                ..SidebarSlice::default()
            },
        }
    }
}

/// The persisted subset of [`StoreState`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    pub auth: PersistedAuth,
    pub theme: ThemePrefs,
    pub sidebar: SidebarLayout,
}

#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    version: u32,
    state: PersistedState,
}

#[derive(Debug, Serialize, Deserialize)]
struct Document {
    #[serde(rename = "app-storage")]
    app_storage: Envelope,
}

/// Client state bound to a file on disk.
#[derive(Debug)]
pub struct AppStore {
    path: PathBuf,
    state: StoreState,
    /// Last snapshot known to be on disk.
    saved: PersistedState,
}

impl AppStore {
    /// A store with default state that will save to `path`. Nothing is read.
    pub fn in_memory(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: StoreState::default(),
            saved: PersistedState::default(),
        }
    }

    /// Load from `path`. A missing file yields defaults; an unreadable or
    /// corrupt file is logged and also yields defaults.
    pub async fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::read(&path).await {
            Ok(Some(persisted)) => {
                tracing::debug!(path = %path.display(), "Loaded client store");
                Self {
                    state: StoreState::restore(persisted.clone()),
                    saved: persisted,
                    path,
                }
            }
            Ok(None) => Self::in_memory(path),
            Err(e) => {
                tracing::warn!(path = %path.display(), "Ignoring unreadable client store: {}", e);
                Self::in_memory(path)
            }
        }
    }

    async fn read(path: &Path) -> Result<Option<PersistedState>, StoreError> {
        let raw = match fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.display().to_string(),
                    source,
                });
            }
        };
        let doc: Document = serde_json::from_str(&raw)?;
        if doc.app_storage.version != STORAGE_VERSION {
            tracing::warn!(
                found = doc.app_storage.version,
                expected = STORAGE_VERSION,
                "Client store version mismatch, reading anyway"
            );
        }
        Ok(Some(doc.app_storage.state))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    /// Write the persisted subset to disk, creating parent directories.
    pub async fn save(&mut self) -> Result<(), StoreError> {
        let persisted = self.state.persisted();
        let doc = Document {
            app_storage: Envelope {
                version: STORAGE_VERSION,
                state: persisted.clone(),
            },
        };
        let json = serde_json::to_string_pretty(&doc)?;
        let io_err = |source| StoreError::Io {
            path: self.path.display().to_string(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        fs::write(&self.path, json).await.map_err(io_err)?;
        self.saved = persisted;
        tracing::debug!(path = %self.path.display(), "Saved client store");
        Ok(())
    }

    /// Apply `f` to the state, saving if the persisted subset changed.
    pub async fn update<R>(&mut self, f: impl FnOnce(&mut StoreState) -> R) -> Result<R, StoreError> {
        let result = f(&mut self.state);
        if self.state.persisted() != self.saved {
            self.save().await?;
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use secrecy::{ExposeSecret, SecretString};
    use tempfile::TempDir;

    use super::*;
    use crate::auth::{AuthSession, User};
    use crate::wizard::Role;

    fn session() -> AuthSession {
        AuthSession {
            user: User {
                id: "u1".into(),
                email: "jane@x.com".into(),
                name: "Jane Doe".into(),
                role: Role::Player,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            token: SecretString::from("tok-1"),
        }
    }

    #[tokio::test]
    async fn missing_file_yields_defaults() {
        let tmp = TempDir::new().unwrap();
        let store = AppStore::load(tmp.path().join("nope.json")).await;
        assert!(!store.state().auth.is_authenticated());
        assert_eq!(store.state().theme.prefs, ThemePrefs::default());
    }

    #[tokio::test]
    async fn persisted_subset_round_trips() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("app-storage.json");

        let mut store = AppStore::load(&path).await;
        store
            .update(|s| {
                s.auth.login(session());
                s.auth.set_loading(true);
                s.theme.set_mode(ThemeMode::Dark);
                s.sidebar.set_width(300);
                s.sidebar.toggle();
            })
            .await
            .unwrap();
        assert!(path.exists());

        let reloaded = AppStore::load(&path).await;
        let state = reloaded.state();
        assert_eq!(state.auth.user.as_ref().unwrap().email, "jane@x.com");
        assert_eq!(state.auth.token.as_ref().unwrap().expose_secret(), "tok-1");
        assert_eq!(state.theme.prefs.mode, ThemeMode::Dark);
        assert_eq!(state.sidebar.layout.width, 300);
        // Transient flags come back at their defaults.
        assert!(!state.auth.is_loading);
        assert!(state.sidebar.is_open);
    }

    #[tokio::test]
    async fn document_uses_namespaced_key() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("store.json");
        let mut store = AppStore::in_memory(&path);
        store.save().await.unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json[STORAGE_KEY]["version"], STORAGE_VERSION);
        assert!(json[STORAGE_KEY]["state"]["theme"].is_object());
        assert!(json[STORAGE_KEY]["state"]["sidebar"].get("isOpen").is_none());
    }

    #[tokio::test]
    async fn transient_changes_do_not_write() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("store.json");
        let mut store = AppStore::in_memory(&path);
        store.update(|s| s.auth.set_loading(true)).await.unwrap();
        assert!(!path.exists());
        store.update(|s| s.theme.set_animations(false)).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn corrupt_file_falls_back_to_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("store.json");
        std::fs::write(&path, "{ not json").unwrap();
        let store = AppStore::load(&path).await;
        assert!(!store.state().auth.is_authenticated());
    }

    #[tokio::test]
    async fn logout_is_persisted() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("store.json");
        let mut store = AppStore::in_memory(&path);
        store.update(|s| s.auth.login(session())).await.unwrap();
        store.update(|s| s.auth.logout()).await.unwrap();
        let reloaded = AppStore::load(&path).await;
        assert!(!reloaded.state().auth.is_authenticated());
    }
}
