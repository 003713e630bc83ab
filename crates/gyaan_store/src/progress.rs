//! Lesson progress tracking.
//!
//! One record per user id under `user_progress_{userId}`, mapping canonical
//! lesson keys to progress entries. The manager stamps `updatedAt` on every
//! write; callers never set it.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::keys::{self, LessonKey};
use crate::record::{read_record, write_record};
use crate::store::KeyValueStore;

/// Full per-user progress record, keyed by canonical lesson key.
pub type ProgressRecord = BTreeMap<String, LessonProgress>;

/// One stored progress entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonProgress {
    /// 0-100.
    #[serde(default)]
    pub completion_percentage: f64,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Caller-supplied progress payload. The manager adds the timestamp.
#[derive(Debug, Clone, Default)]
pub struct ProgressUpdate {
    pub completion_percentage: f64,
    pub extra: Map<String, Value>,
}

pub struct ProgressManager {
    store: Arc<dyn KeyValueStore>,
}

impl ProgressManager {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Replaces the entry for `lesson` only; all other entries in the
    /// user's record are untouched.
    pub async fn save_lesson_progress(
        &self,
        user_id: &str,
        lesson: &LessonKey,
        update: ProgressUpdate,
    ) -> Result<()> {
        let key = keys::user_progress(user_id);
        let mut record = self.get_user_progress(user_id).await?;
        record.insert(
            lesson.canonical(),
            LessonProgress {
                completion_percentage: update.completion_percentage,
                updated_at: Utc::now(),
                extra: update.extra,
            },
        );
        write_record(self.store.as_ref(), &key, &record).await
    }

    /// Full progress record for a user; empty if nothing saved yet.
    pub async fn get_user_progress(&self, user_id: &str) -> Result<ProgressRecord> {
        let key = keys::user_progress(user_id);
        Ok(read_record(self.store.as_ref(), &key).await?.unwrap_or_default())
    }

    /// Entries for one subject and class, re-keyed by lesson id. The whole
    /// remainder after the subject/class prefix is the lesson id, so ids
    /// containing underscores stay intact.
    pub async fn get_subject_progress(
        &self,
        user_id: &str,
        subject: &str,
        class_number: u32,
    ) -> Result<BTreeMap<String, LessonProgress>> {
        let prefix = LessonKey::subject_class_prefix(subject, class_number);
        let record = self.get_user_progress(user_id).await?;
        Ok(record
            .into_iter()
            .filter_map(|(key, entry)| {
                key.strip_prefix(&prefix)
                    .map(|lesson_id| (lesson_id.to_string(), entry))
            })
            .collect())
    }

    /// Rounded mean of `completionPercentage` across all entries; `0` for
    /// an empty record.
    pub async fn calculate_overall_progress(&self, user_id: &str) -> Result<u32> {
        let record = self.get_user_progress(user_id).await?;
        Ok(mean_completion(record.values()))
    }

    /// Rounded mean across entries whose key starts with `subject`,
    /// regardless of class.
    pub async fn calculate_subject_progress(&self, user_id: &str, subject: &str) -> Result<u32> {
        let record = self.get_user_progress(user_id).await?;
        Ok(mean_completion(
            record
                .iter()
                .filter(|(key, _)| key.starts_with(subject))
                .map(|(_, entry)| entry),
        ))
    }
}

fn mean_completion<'a>(entries: impl Iterator<Item = &'a LessonProgress>) -> u32 {
    let mut total = 0.0;
    let mut count = 0u32;
    for entry in entries {
        total += entry.completion_percentage;
        count += 1;
    }
    if count == 0 {
        return 0;
    }
    (total / f64::from(count)).round() as u32
}
