use std::fmt;

use tracing::{debug, info};

use crate::datastore::DataStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    fn flipped(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Default)]
pub struct ThemePreference {
    mode: ThemeMode,
}

impl ThemePreference {
    pub fn current(&self) -> ThemeMode {
        self.mode
    }

    // Startup restore only; reading back never writes.
    pub fn load_from(&mut self, saved: Option<ThemeMode>) {
        self.mode = saved.unwrap_or_default();
        debug!(theme = %self.mode, "restored theme preference");
    }

    #[tracing::instrument(skip(self, persist))]
    pub fn toggle(&mut self, persist: &DataStore) -> ThemeMode {
        self.mode = self.mode.flipped();
        persist.save_theme(self.mode);
        info!(theme = %self.mode, "toggled theme");
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::{ThemeMode, ThemePreference};
    use crate::datastore::DataStore;

    #[test]
    fn defaults_to_light_when_nothing_is_saved() {
        let mut theme = ThemePreference::default();
        theme.load_from(None);
        assert_eq!(theme.current(), ThemeMode::Light);
    }

    #[test]
    fn toggle_persists_and_fresh_load_restores() {
        let temp = tempdir().expect("tempdir");
        let persist = DataStore::open(temp.path());

        let mut theme = ThemePreference::default();
        assert_eq!(theme.toggle(&persist), ThemeMode::Dark);

        let raw = std::fs::read_to_string(&persist.theme_path).expect("read theme file");
        assert_eq!(raw, "dark");

        let fresh = DataStore::open(temp.path());
        let mut restored = ThemePreference::default();
        restored.load_from(fresh.load_theme());
        assert_eq!(restored.current(), ThemeMode::Dark);
    }

    #[test]
    fn unrecognized_saved_value_falls_back_to_light() {
        let temp = tempdir().expect("tempdir");
        let persist = DataStore::open(temp.path());
        std::fs::write(&persist.theme_path, "sepia").expect("write theme file");

        let mut theme = ThemePreference::default();
        theme.load_from(persist.load_theme());
        assert_eq!(theme.current(), ThemeMode::Light);
    }
}
