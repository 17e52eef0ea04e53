//! Process-wide persisted booleans and the theme choice.
//!
//! Each flag is read once at startup and written once when the user acts on it.

use serde::Serialize;

use crate::error::PortError;

pub const TIP_SEEN_KEY: &str = "convert-everything.tip-seen";
pub const INSTALL_DISMISSED_KEY: &str = "convert-everything.install-dismissed";
pub const THEME_KEY: &str = "convert-everything.theme";

pub trait FlagStore {
    fn read(&self, key: &str) -> Result<Option<String>, PortError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), PortError>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PersistedFlags {
    pub tip_seen: bool,
    pub install_dismissed: bool,
    pub theme: Theme,
}

impl PersistedFlags {
    /// Unreadable or missing values fall back to their defaults.
    pub fn load<S: FlagStore + ?Sized>(store: &S) -> Self {
        Self {
            tip_seen: read_bool(store, TIP_SEEN_KEY),
            install_dismissed: read_bool(store, INSTALL_DISMISSED_KEY),
            theme: read_value(store, THEME_KEY)
                .and_then(|raw| Theme::parse(&raw))
                .unwrap_or_default(),
        }
    }

    pub fn mark_tip_seen<S: FlagStore + ?Sized>(&mut self, store: &mut S) -> Result<(), PortError> {
        if self.tip_seen {
            return Ok(());
        }
        self.tip_seen = true;
        store.write(TIP_SEEN_KEY, "true")
    }

    pub fn mark_install_dismissed<S: FlagStore + ?Sized>(
        &mut self,
        store: &mut S,
    ) -> Result<(), PortError> {
        if self.install_dismissed {
            return Ok(());
        }
        self.install_dismissed = true;
        store.write(INSTALL_DISMISSED_KEY, "true")
    }

    pub fn toggle_theme<S: FlagStore + ?Sized>(&mut self, store: &mut S) -> Result<Theme, PortError> {
        self.theme = self.theme.toggled();
        store.write(THEME_KEY, self.theme.as_str())?;
        Ok(self.theme)
    }
}

#[must_use]
pub fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "true" | "1")
}

fn read_value<S: FlagStore + ?Sized>(store: &S, key: &str) -> Option<String> {
    match store.read(key) {
        Ok(value) => value,
        Err(error) => {
            tracing::warn!(%error, key, "failed to read persisted flag");
            None
        }
    }
}

fn read_bool<S: FlagStore + ?Sized>(store: &S, key: &str) -> bool {
    read_value(store, key).is_some_and(|raw| parse_flag(&raw))
}
