//! Light/dark theme preference

use bookfinder_storage::{keys, PersistentStore};
use log::warn;

const DARK: &str = "dark";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
        }
    }
}

/// Persisted theme choice
///
/// Dark is stored as `"dark"` under the theme key; light is the absence of
/// the key. Any other stored value reads as light.
pub struct ThemePreference {
    store: PersistentStore,
    theme: Theme,
}

impl ThemePreference {
    pub fn load(store: PersistentStore) -> Self {
        let stored: Option<String> = store.load_or_default(keys::THEME);
        let theme = match stored.as_deref() {
            Some(DARK) => Theme::Dark,
            _ => Theme::Light,
        };
        Self { store, theme }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn is_dark(&self) -> bool {
        self.theme == Theme::Dark
    }

    pub fn set(&mut self, theme: Theme) {
        self.theme = theme;

        let result = match theme {
            Theme::Dark => self.store.set(keys::THEME, DARK),
            Theme::Light => self.store.remove(keys::THEME),
        };
        if let Err(e) = result {
            warn!("Theme preference not saved: {}", e);
        }
    }

    /// Flips the theme and returns the new one
    pub fn toggle(&mut self) -> Theme {
        let next = self.theme.toggled();
        self.set(next);
        next
    }
}
