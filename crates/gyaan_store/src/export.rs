//! Cross-manager aggregation: bulk clear, export bundle, statistics.
//!
//! Composes data through the manager read APIs only; no raw record access.
//! The bulk clear is the one mutating operation and goes through the
//! store's batch removal of the per-user keys.

use std::path::Path;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::achievements::{AchievementsManager, AchievementsRecord};
use crate::error::{DataError, Result};
use crate::keys;
use crate::notes::{NotesManager, NotesRecord};
use crate::profile::{UserProfile, UserProfileManager};
use crate::progress::{ProgressManager, ProgressRecord};
use crate::quiz::{QuizManager, QuizScoreRecord};
use crate::settings::{AppSettings, SettingsManager};
use crate::store::KeyValueStore;
use crate::study_plan::{StudyPlan, StudyPlanManager};

/// Everything known about one user, plus the installation-wide profile and
/// settings, in one bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDataExport {
    pub profile: Option<UserProfile>,
    pub progress: ProgressRecord,
    pub quiz_scores: QuizScoreRecord,
    pub notes: NotesRecord,
    pub study_plan: Option<StudyPlan>,
    pub achievements: AchievementsRecord,
    pub settings: AppSettings,
    pub exported_at: DateTime<Utc>,
}

/// Derived summary numbers for the dashboard and progress screens.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppStatistics {
    pub total_lessons: usize,
    pub completed_lessons: usize,
    pub total_quizzes: usize,
    /// Mean of every individual attempt score, rounded to 2 decimals.
    pub average_score: f64,
    pub achievements_unlocked: usize,
    pub overall_progress: u32,
}

pub struct DataUtils {
    store: Arc<dyn KeyValueStore>,
    profile: UserProfileManager,
    progress: ProgressManager,
    quiz: QuizManager,
    notes: NotesManager,
    study_plan: StudyPlanManager,
    settings: SettingsManager,
    achievements: AchievementsManager,
}

impl DataUtils {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            profile: UserProfileManager::new(store.clone()),
            progress: ProgressManager::new(store.clone()),
            quiz: QuizManager::new(store.clone()),
            notes: NotesManager::new(store.clone()),
            study_plan: StudyPlanManager::new(store.clone()),
            settings: SettingsManager::new(store.clone()),
            achievements: AchievementsManager::new(store.clone()),
            store,
        }
    }

    /// Batch-removes the five per-user records. `user_profile` and
    /// `app_settings` are not user-scoped and survive. Best-effort: a
    /// fault partway through may leave a partial clear.
    pub async fn clear_all_user_data(&self, user_id: &str) -> Result<()> {
        self.store
            .multi_remove(&keys::user_scoped_keys(user_id))
            .await
    }

    /// Read-only bundle of everything stored for `user_id`.
    pub async fn export_user_data(&self, user_id: &str) -> Result<UserDataExport> {
        Ok(UserDataExport {
            profile: self.profile.get_profile().await?,
            progress: self.progress.get_user_progress(user_id).await?,
            quiz_scores: self.quiz.get_user_quiz_scores(user_id).await?,
            notes: self.notes.get_user_notes(user_id).await?,
            study_plan: self.study_plan.get_study_plan(user_id).await?,
            achievements: self.achievements.get_user_achievements(user_id).await?,
            settings: self.settings.get_settings().await?,
            exported_at: Utc::now(),
        })
    }

    /// Writes the export bundle as pretty-printed JSON to `path`, via temp
    /// file + rename like every other persisted write.
    pub async fn export_to_file(&self, user_id: &str, path: &Path) -> Result<()> {
        let bundle = self.export_user_data(user_id).await?;
        let file_key = path.to_string_lossy().to_string();

        let raw = serde_json::to_string_pretty(&bundle).map_err(|source| DataError::Serialize {
            key: file_key.clone(),
            source,
        })?;

        let io_fault = |source: std::io::Error| DataError::Io {
            key: file_key.clone(),
            source,
        };

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(io_fault)?;
        }
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, raw.as_bytes()).await.map_err(io_fault)?;
        tokio::fs::rename(&tmp, path).await.map_err(io_fault)?;
        Ok(())
    }

    /// Summary numbers across progress, quizzes and achievements. Absent
    /// records fold to zeros; store faults surface as `Err`.
    pub async fn get_app_statistics(&self, user_id: &str) -> Result<AppStatistics> {
        let progress = self.progress.get_user_progress(user_id).await?;
        let quiz_scores = self.quiz.get_user_quiz_scores(user_id).await?;
        let achievements = self.achievements.get_user_achievements(user_id).await?;

        let total_lessons = progress.len();
        let completed_lessons = progress
            .values()
            .filter(|entry| entry.completion_percentage == 100.0)
            .count();

        let total_quizzes: usize = quiz_scores.values().map(Vec::len).sum();
        let average_score = if total_quizzes > 0 {
            let total: f64 = quiz_scores
                .values()
                .flatten()
                .map(|attempt| attempt.score)
                .sum();
            round2(total / total_quizzes as f64)
        } else {
            0.0
        };

        Ok(AppStatistics {
            total_lessons,
            completed_lessons,
            total_quizzes,
            average_score,
            achievements_unlocked: achievements.len(),
            overall_progress: self.progress.calculate_overall_progress(user_id).await?,
        })
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
