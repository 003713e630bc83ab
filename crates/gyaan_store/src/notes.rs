//! Study notes.
//!
//! One record per user id under `study_notes_{userId}`, mapping canonical
//! lesson keys to a single note each. Saving replaces the note's content
//! wholesale; there is no append or versioning.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::keys::{self, LessonKey};
use crate::record::{read_record, write_record};
use crate::store::KeyValueStore;

/// Full per-user notes record, keyed by canonical lesson key.
pub type NotesRecord = BTreeMap<String, LessonNote>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonNote {
    pub content: String,
    pub updated_at: DateTime<Utc>,
}

pub struct NotesManager {
    store: Arc<dyn KeyValueStore>,
}

impl NotesManager {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Replaces the note for `lesson` with `content`, stamping the time.
    pub async fn save_notes(&self, user_id: &str, lesson: &LessonKey, content: &str) -> Result<()> {
        let key = keys::study_notes(user_id);
        let mut record = self.get_user_notes(user_id).await?;
        record.insert(
            lesson.canonical(),
            LessonNote {
                content: content.to_string(),
                updated_at: Utc::now(),
            },
        );
        write_record(self.store.as_ref(), &key, &record).await
    }

    /// Full notes record for a user; empty if nothing saved yet.
    pub async fn get_user_notes(&self, user_id: &str) -> Result<NotesRecord> {
        let key = keys::study_notes(user_id);
        Ok(read_record(self.store.as_ref(), &key).await?.unwrap_or_default())
    }

    /// Note content for one lesson; empty string when the lesson or the
    /// whole record is absent.
    pub async fn get_lesson_notes(&self, user_id: &str, lesson: &LessonKey) -> Result<String> {
        let record = self.get_user_notes(user_id).await?;
        Ok(record
            .get(&lesson.canonical())
            .map(|note| note.content.clone())
            .unwrap_or_default())
    }
}
