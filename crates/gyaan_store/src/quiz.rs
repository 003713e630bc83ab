//! Quiz score history.
//!
//! One record per user id under `quiz_scores_{userId}`, mapping canonical
//! lesson keys to append-only attempt lists. Attempts are never removed or
//! rewritten; "best score" is derived on read.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;
use crate::keys::{self, LessonKey};
use crate::record::{read_record, write_record};
use crate::store::KeyValueStore;

/// Full per-user quiz history, keyed by canonical lesson key.
pub type QuizScoreRecord = BTreeMap<String, Vec<QuizAttempt>>;

/// One stored attempt, in call order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizAttempt {
    #[serde(default)]
    pub score: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Caller-supplied attempt payload. The manager adds the timestamp.
#[derive(Debug, Clone, Default)]
pub struct QuizResult {
    pub score: f64,
    pub extra: Map<String, Value>,
}

pub struct QuizManager {
    store: Arc<dyn KeyValueStore>,
}

impl QuizManager {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Appends an attempt to the lesson's history, creating the list on
    /// first attempt.
    pub async fn save_quiz_score(
        &self,
        user_id: &str,
        lesson: &LessonKey,
        result: QuizResult,
    ) -> Result<()> {
        let key = keys::quiz_scores(user_id);
        let mut record = self.get_user_quiz_scores(user_id).await?;
        record
            .entry(lesson.canonical())
            .or_default()
            .push(QuizAttempt {
                score: result.score,
                timestamp: Utc::now(),
                extra: result.extra,
            });
        write_record(self.store.as_ref(), &key, &record).await
    }

    /// Full quiz history for a user; empty if nothing saved yet.
    pub async fn get_user_quiz_scores(&self, user_id: &str) -> Result<QuizScoreRecord> {
        let key = keys::quiz_scores(user_id);
        Ok(read_record(self.store.as_ref(), &key).await?.unwrap_or_default())
    }

    /// Highest-scoring attempt for a lesson, or `None` if there are no
    /// attempts. On ties the earliest attempt wins.
    pub async fn get_best_score(
        &self,
        user_id: &str,
        lesson: &LessonKey,
    ) -> Result<Option<QuizAttempt>> {
        let record = self.get_user_quiz_scores(user_id).await?;
        Ok(record
            .get(&lesson.canonical())
            .and_then(|attempts| {
                attempts.iter().cloned().reduce(|best, current| {
                    if current.score > best.score {
                        current
                    } else {
                        best
                    }
                })
            }))
    }

    /// Rounded percentage average across every attempt whose key starts
    /// with `subject`; `0` when there are none. Scores are 0-1 fractions,
    /// so the mean is scaled by 100.
    pub async fn subject_quiz_average(&self, user_id: &str, subject: &str) -> Result<u32> {
        let record = self.get_user_quiz_scores(user_id).await?;
        let mut total = 0.0;
        let mut count = 0u32;
        for (key, attempts) in &record {
            if !key.starts_with(subject) {
                continue;
            }
            for attempt in attempts {
                total += attempt.score;
                count += 1;
            }
        }
        if count == 0 {
            return Ok(0);
        }
        Ok((total / f64::from(count) * 100.0).round() as u32)
    }
}
