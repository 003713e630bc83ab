//! Study plans.
//!
//! One singleton plan per user id under `study_plan_{userId}`. The manager
//! owns the two timestamps: `createdAt` is set once and preserved across
//! saves, `updatedAt` is refreshed on every save. Everything else is a full
//! replace, so callers pass the complete desired plan body each time.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{DataError, Result};
use crate::keys;
use crate::record::{read_record, write_record};
use crate::store::KeyValueStore;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StudyPlan {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Per-date subject progress payloads, keyed by date string.
    pub daily_progress: BTreeMap<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

pub struct StudyPlanManager {
    store: Arc<dyn KeyValueStore>,
}

impl StudyPlanManager {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Saves the plan. `createdAt` resolution order: the incoming plan's
    /// value, then the previously stored plan's value, then now.
    pub async fn save_study_plan(&self, user_id: &str, plan: StudyPlan) -> Result<()> {
        let key = keys::study_plan(user_id);

        let created_at = match plan.created_at {
            Some(ts) => Some(ts),
            None => self
                .get_study_plan(user_id)
                .await?
                .and_then(|previous| previous.created_at),
        };

        let stored = StudyPlan {
            created_at: Some(created_at.unwrap_or_else(Utc::now)),
            updated_at: Some(Utc::now()),
            daily_progress: plan.daily_progress,
            extra: plan.extra,
        };
        write_record(self.store.as_ref(), &key, &stored).await
    }

    /// The stored plan, or `None` if the user has not created one.
    pub async fn get_study_plan(&self, user_id: &str) -> Result<Option<StudyPlan>> {
        let key = keys::study_plan(user_id);
        read_record(self.store.as_ref(), &key).await
    }

    /// Sets `dailyProgress[date]` on the existing plan. Fails with
    /// [`DataError::NoStudyPlan`] when no plan exists; it never
    /// auto-creates one.
    pub async fn update_daily_progress(
        &self,
        user_id: &str,
        date: &str,
        subjects: Value,
    ) -> Result<()> {
        let mut plan = self
            .get_study_plan(user_id)
            .await?
            .ok_or_else(|| DataError::NoStudyPlan(user_id.to_string()))?;

        plan.daily_progress.insert(date.to_string(), subjects);
        self.save_study_plan(user_id, plan).await
    }
}
