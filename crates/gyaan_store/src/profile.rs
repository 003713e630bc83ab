//! User profile management.
//!
//! One profile per installation (not per user id), stored under
//! `user_profile`. Saves replace the record wholesale; use
//! [`UserProfileManager::update_profile`] for field-by-field merges.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::keys;
use crate::record::{read_record, write_record};
use crate::store::KeyValueStore;

/// Installation-wide user profile. Fields the signup form does not know
/// about yet survive round-trips through `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserProfile {
    /// Shallow merge: fields present in `updates` overwrite, everything
    /// else is preserved.
    fn merge(&mut self, updates: UserProfile) {
        if updates.name.is_some() {
            self.name = updates.name;
        }
        if updates.class.is_some() {
            self.class = updates.class;
        }
        if updates.phone.is_some() {
            self.phone = updates.phone;
        }
        if updates.username.is_some() {
            self.username = updates.username;
        }
        for (field, value) in updates.extra {
            self.extra.insert(field, value);
        }
    }
}

pub struct UserProfileManager {
    store: Arc<dyn KeyValueStore>,
}

impl UserProfileManager {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Full replace. A partial profile loses previously-set fields; use
    /// [`update_profile`](Self::update_profile) to merge instead.
    pub async fn save_profile(&self, profile: &UserProfile) -> Result<()> {
        write_record(self.store.as_ref(), keys::USER_PROFILE, profile).await
    }

    /// Returns the stored profile, or `None` if none has been saved yet.
    pub async fn get_profile(&self) -> Result<Option<UserProfile>> {
        read_record(self.store.as_ref(), keys::USER_PROFILE).await
    }

    /// Shallow-merges `updates` over the current profile (or an empty one)
    /// and saves the result.
    pub async fn update_profile(&self, updates: UserProfile) -> Result<()> {
        let mut profile = self.get_profile().await?.unwrap_or_default();
        profile.merge(updates);
        self.save_profile(&profile).await
    }
}
