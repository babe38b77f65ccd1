use serde::{Deserialize, Serialize};

/// Local storage key holding the theme preference
pub const THEME_STORAGE_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    /// A saved preference wins, and anything saved other than `dark` means light.
    /// Without one, follow the operating system.
    pub fn resolve(saved: Option<&str>, prefers_dark: bool) -> Self {
        match saved.filter(|value| !value.is_empty()) {
            Some("dark") => Self::Dark,
            Some(_) => Self::Light,
            None if prefers_dark => Self::Dark,
            None => Self::Light,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }

    /// Value written back to storage
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}
