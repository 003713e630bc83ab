//! App settings.
//!
//! One global record under `app_settings`, not user-scoped. Reads fall back
//! to [`AppSettings::default`] when nothing is stored yet; the defaults are
//! defined once here, immutably.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::keys;
use crate::record::{read_record, write_record};
use crate::store::KeyValueStore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppSettings {
    pub notifications: bool,
    pub dark_mode: bool,
    pub auto_sync: bool,
    pub language: String,
    pub font_size: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            notifications: true,
            dark_mode: false,
            auto_sync: true,
            language: "english".to_string(),
            font_size: "medium".to_string(),
        }
    }
}

/// Single-field selector for [`SettingsManager::update_setting`].
#[derive(Debug, Clone, PartialEq)]
pub enum SettingUpdate {
    Notifications(bool),
    DarkMode(bool),
    AutoSync(bool),
    Language(String),
    FontSize(String),
}

impl SettingUpdate {
    fn apply(self, settings: &mut AppSettings) {
        match self {
            SettingUpdate::Notifications(value) => settings.notifications = value,
            SettingUpdate::DarkMode(value) => settings.dark_mode = value,
            SettingUpdate::AutoSync(value) => settings.auto_sync = value,
            SettingUpdate::Language(value) => settings.language = value,
            SettingUpdate::FontSize(value) => settings.font_size = value,
        }
    }
}

pub struct SettingsManager {
    store: Arc<dyn KeyValueStore>,
}

impl SettingsManager {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Full replace of the settings record.
    pub async fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        write_record(self.store.as_ref(), keys::APP_SETTINGS, settings).await
    }

    /// Stored settings, or the defaults when none have been saved.
    pub async fn get_settings(&self) -> Result<AppSettings> {
        Ok(read_record(self.store.as_ref(), keys::APP_SETTINGS)
            .await?
            .unwrap_or_default())
    }

    /// Sets one field and saves the whole record back.
    pub async fn update_setting(&self, update: SettingUpdate) -> Result<()> {
        let mut settings = self.get_settings().await?;
        update.apply(&mut settings);
        self.save_settings(&settings).await
    }
}
