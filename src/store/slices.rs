//! Client state slices: auth session, theme preferences, sidebar layout.
//!
//! Each slice splits into the preferences that survive a restart and the
//! transient flags (`is_loading`, `error`, open/closed) that do not.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::auth::{AuthSession, User};

/// Number of entries kept in the sidebar's recent list.
pub const MAX_RECENT_ITEMS: usize = 5;

// ── Auth ────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct AuthSlice {
    pub user: Option<User>,
    pub token: Option<SecretString>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl AuthSlice {
    pub fn login(&mut self, session: AuthSession) {
        self.user = Some(session.user);
        self.token = Some(session.token);
        self.error = None;
    }

    pub fn logout(&mut self) {
        *self = Self::default();
    }

    pub fn set_loading(&mut self, is_loading: bool) {
        self.is_loading = is_loading;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some() && self.token.is_some()
    }

    pub(crate) fn persisted(&self) -> PersistedAuth {
        PersistedAuth {
            user: self.user.clone(),
            token: self.token.as_ref().map(|t| t.expose_secret().to_string()),
        }
    }

    pub(crate) fn restore(persisted: PersistedAuth) -> Self {
        Self {
            user: persisted.user,
            token: persisted.token.map(SecretString::from),
            ..Self::default()
        }
    }
}

/// The persisted part of [`AuthSlice`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedAuth {
    pub user: Option<User>,
    pub token: Option<String>,
}

// ── Theme ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontSize {
    Sm,
    #[default]
    Md,
    Lg,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontFamily {
    #[default]
    Montserrat,
    Inter,
    Roboto,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Contrast {
    #[default]
    Normal,
    High,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    #[default]
    Default,
    Deuteranopia,
    Protanopia,
    Tritanopia,
}

/// Persisted display preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemePrefs {
    pub mode: ThemeMode,
    pub font_size: FontSize,
    pub font_family: FontFamily,
    pub contrast: Contrast,
    pub animations: bool,
    pub color_scheme: ColorScheme,
}

impl Default for ThemePrefs {
    fn default() -> Self {
        Self {
            mode: ThemeMode::default(),
            font_size: FontSize::default(),
            font_family: FontFamily::default(),
            contrast: Contrast::default(),
            animations: true,
            color_scheme: ColorScheme::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ThemeSlice {
    pub prefs: ThemePrefs,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl ThemeSlice {
    pub fn set_mode(&mut self, mode: ThemeMode) {
        self.prefs.mode = mode;
        self.error = None;
    }

    pub fn set_font_size(&mut self, size: FontSize) {
        self.prefs.font_size = size;
    }

    pub fn set_font_family(&mut self, family: FontFamily) {
        self.prefs.font_family = family;
    }

    pub fn set_contrast(&mut self, contrast: Contrast) {
        self.prefs.contrast = contrast;
    }

    pub fn set_animations(&mut self, enabled: bool) {
        self.prefs.animations = enabled;
    }

    pub fn set_color_scheme(&mut self, scheme: ColorScheme) {
        self.prefs.color_scheme = scheme;
    }

    pub fn set_loading(&mut self, is_loading: bool) {
        self.is_loading = is_loading;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }
}

// ── Sidebar ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SidebarPosition {
    #[default]
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SidebarVariant {
    #[default]
    Default,
    Minimal,
    Compact,
}

/// Persisted sidebar layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SidebarLayout {
    pub width: u32,
    pub position: SidebarPosition,
    pub variant: SidebarVariant,
    /// Opacity in `[0, 1]`.
    pub transparency: f64,
    pub show_labels: bool,
    pub pinned_items: Vec<String>,
    /// Most recent first.
    pub recent_items: Vec<String>,
}

impl Default for SidebarLayout {
    fn default() -> Self {
        Self {
            width: 256,
            position: SidebarPosition::default(),
            variant: SidebarVariant::default(),
            transparency: 1.0,
            show_labels: true,
            pinned_items: Vec::new(),
            recent_items: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SidebarSlice {
    pub layout: SidebarLayout,
    pub is_open: bool,
    pub is_mobile_open: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Default for SidebarSlice {
    fn default() -> Self {
        Self {
            layout: SidebarLayout::default(),
            is_open: true,
            is_mobile_open: false,
            is_loading: false,
            error: None,
        }
    }
}

impl SidebarSlice {
    pub fn toggle(&mut self) {
        self.is_open = !self.is_open;
        self.error = None;
    }

    pub fn toggle_mobile(&mut self) {
        self.is_mobile_open = !self.is_mobile_open;
        self.error = None;
    }

    pub fn set_open(&mut self, is_open: bool) {
        self.is_open = is_open;
        self.error = None;
    }

    pub fn set_mobile_open(&mut self, is_open: bool) {
        self.is_mobile_open = is_open;
        self.error = None;
    }

    pub fn set_loading(&mut self, is_loading: bool) {
        self.is_loading = is_loading;
    }

    pub fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    pub fn set_width(&mut self, width: u32) {
        self.layout.width = width;
    }

    pub fn set_position(&mut self, position: SidebarPosition) {
        self.layout.position = position;
    }

    pub fn set_variant(&mut self, variant: SidebarVariant) {
        self.layout.variant = variant;
    }

    /// Clamped to `[0, 1]`; NaN is treated as fully opaque.
    pub fn set_transparency(&mut self, transparency: f64) {
        self.layout.transparency = if transparency.is_nan() {
            1.0
        } else {
            transparency.clamp(0.0, 1.0)
        };
    }

    pub fn set_show_labels(&mut self, show: bool) {
        self.layout.show_labels = show;
    }

    pub fn pin_item(&mut self, item_id: &str) {
        if !self.layout.pinned_items.iter().any(|i| i == item_id) {
            self.layout.pinned_items.push(item_id.to_string());
        }
    }

    pub fn unpin_item(&mut self, item_id: &str) {
        self.layout.pinned_items.retain(|i| i != item_id);
    }

    /// Move `item_id` to the front of the recent list, keeping it unique and
    /// at most [`MAX_RECENT_ITEMS`] long.
    pub fn add_recent_item(&mut self, item_id: &str) {
        let recent = &mut self.layout.recent_items;
        recent.retain(|i| i != item_id);
        recent.insert(0, item_id.to_string());
        recent.truncate(MAX_RECENT_ITEMS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_defaults() {
        let theme = ThemeSlice::default();
        assert_eq!(theme.prefs.mode, ThemeMode::System);
        assert_eq!(theme.prefs.font_family, FontFamily::Montserrat);
        assert!(theme.prefs.animations);
    }

    #[test]
    fn set_mode_clears_error() {
        let mut theme = ThemeSlice::default();
        theme.set_error(Some("boom".into()));
        theme.set_mode(ThemeMode::Dark);
        assert_eq!(theme.prefs.mode, ThemeMode::Dark);
        assert!(theme.error.is_none());
    }

    #[test]
    fn transparency_is_clamped() {
        let mut sidebar = SidebarSlice::default();
        sidebar.set_transparency(1.7);
        assert_eq!(sidebar.layout.transparency, 1.0);
        sidebar.set_transparency(-0.2);
        assert_eq!(sidebar.layout.transparency, 0.0);
        sidebar.set_transparency(0.4);
        assert_eq!(sidebar.layout.transparency, 0.4);
    }

    #[test]
    fn pinned_items_are_unique() {
        let mut sidebar = SidebarSlice::default();
        sidebar.pin_item("coaches");
        sidebar.pin_item("coaches");
        sidebar.pin_item("library");
        assert_eq!(sidebar.layout.pinned_items, ["coaches", "library"]);
        sidebar.unpin_item("coaches");
        assert_eq!(sidebar.layout.pinned_items, ["library"]);
    }

    #[test]
    fn recent_items_most_recent_first_capped() {
        let mut sidebar = SidebarSlice::default();
        for item in ["a", "b", "c", "d", "e", "f"] {
            sidebar.add_recent_item(item);
        }
        assert_eq!(sidebar.layout.recent_items, ["f", "e", "d", "c", "b"]);
        sidebar.add_recent_item("c");
        assert_eq!(sidebar.layout.recent_items, ["c", "f", "e", "d", "b"]);
    }

    #[test]
    fn toggles_clear_error() {
        let mut sidebar = SidebarSlice::default();
        assert!(sidebar.is_open);
        sidebar.set_error(Some("x".into()));
        sidebar.toggle();
        assert!(!sidebar.is_open);
        assert!(sidebar.error.is_none());
        sidebar.toggle_mobile();
        assert!(sidebar.is_mobile_open);
    }

    #[test]
    fn auth_logout_resets_everything() {
        let mut auth = AuthSlice::default();
        auth.set_loading(true);
        auth.set_error(Some("bad".into()));
        auth.logout();
        assert!(!auth.is_loading);
        assert!(auth.error.is_none());
        assert!(!auth.is_authenticated());
    }
}
