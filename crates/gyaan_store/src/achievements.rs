//! Achievements.
//!
//! One record per user id under `achievements_{userId}`, mapping
//! achievement ids to unlock entries. Unlocking is a one-way transition:
//! [`AchievementsManager::check_achievements`] skips ids that are already
//! present, so `unlockedAt` stamps never move once set.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::keys;
use crate::record::{read_record, write_record};
use crate::store::KeyValueStore;

/// Full per-user achievements record, keyed by achievement id.
pub type AchievementsRecord = BTreeMap<String, Achievement>;

/// One unlocked achievement as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub title: String,
    pub description: String,
    pub icon: String,
    pub unlocked_at: DateTime<Utc>,
}

/// Action reported by the UI when the user does something that may unlock
/// achievements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudyAction {
    QuizCompleted { percentage: u32 },
    DailyStudy { streak_days: u32 },
    LessonCompleted { total_lessons: u32 },
}

/// One row of the fixed achievement table.
pub struct AchievementDef {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub icon: &'static str,
    condition: fn(&StudyAction) -> bool,
}

fn any_quiz(action: &StudyAction) -> bool {
    matches!(action, StudyAction::QuizCompleted { .. })
}

fn perfect_quiz(action: &StudyAction) -> bool {
    matches!(action, StudyAction::QuizCompleted { percentage } if *percentage == 100)
}

fn week_streak(action: &StudyAction) -> bool {
    matches!(action, StudyAction::DailyStudy { streak_days } if *streak_days >= 7)
}

fn ten_lessons(action: &StudyAction) -> bool {
    matches!(action, StudyAction::LessonCompleted { total_lessons } if *total_lessons >= 10)
}

/// The fixed definition table. Evaluation order is table order, and one
/// action may unlock several entries at once.
pub const ACHIEVEMENT_DEFS: &[AchievementDef] = &[
    AchievementDef {
        id: "first_quiz",
        title: "Quiz Master",
        description: "Complete your first quiz",
        icon: "\u{1F3AF}",
        condition: any_quiz,
    },
    AchievementDef {
        id: "perfect_score",
        title: "Perfect Score",
        description: "Get 100% on a quiz",
        icon: "\u{1F3C6}",
        condition: perfect_quiz,
    },
    AchievementDef {
        id: "study_streak_7",
        title: "Week Warrior",
        description: "Study for 7 consecutive days",
        icon: "\u{1F525}",
        condition: week_streak,
    },
    AchievementDef {
        id: "lesson_completed_10",
        title: "Learning Champion",
        description: "Complete 10 lessons",
        icon: "\u{1F4DA}",
        condition: ten_lessons,
    },
];

pub struct AchievementsManager {
    store: Arc<dyn KeyValueStore>,
}

impl AchievementsManager {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Unconditionally writes the unlock entry for `def`, overwriting any
    /// prior one. Idempotence is the caller's job; `check_achievements`
    /// does that check before calling here.
    pub async fn unlock_achievement(&self, user_id: &str, def: &AchievementDef) -> Result<()> {
        let key = keys::achievements(user_id);
        let mut record = self.get_user_achievements(user_id).await?;
        record.insert(
            def.id.to_string(),
            Achievement {
                title: def.title.to_string(),
                description: def.description.to_string(),
                icon: def.icon.to_string(),
                unlocked_at: Utc::now(),
            },
        );
        write_record(self.store.as_ref(), &key, &record).await
    }

    /// Full achievements record for a user; empty if nothing unlocked yet.
    pub async fn get_user_achievements(&self, user_id: &str) -> Result<AchievementsRecord> {
        let key = keys::achievements(user_id);
        Ok(read_record(self.store.as_ref(), &key).await?.unwrap_or_default())
    }

    /// Evaluates the definition table against `action` and unlocks every
    /// matching entry not already present. Evaluation is pure; the unlock
    /// writes happen afterwards and any write failure surfaces as `Err`
    /// rather than being dropped. Returns the newly unlocked definitions
    /// in table order.
    pub async fn check_achievements(
        &self,
        user_id: &str,
        action: &StudyAction,
    ) -> Result<Vec<&'static AchievementDef>> {
        let unlocked = self.get_user_achievements(user_id).await?;

        let newly: Vec<&'static AchievementDef> = ACHIEVEMENT_DEFS
            .iter()
            .filter(|def| !unlocked.contains_key(def.id) && (def.condition)(action))
            .collect();

        for def in &newly {
            self.unlock_achievement(user_id, def).await?;
        }

        Ok(newly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn manager() -> AchievementsManager {
        AchievementsManager::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn perfect_quiz_unlocks_two_achievements() {
        let mgr = manager();
        let newly = mgr
            .check_achievements("ravi", &StudyAction::QuizCompleted { percentage: 100 })
            .await
            .unwrap();

        let ids: Vec<&str> = newly.iter().map(|def| def.id).collect();
        assert_eq!(ids, vec!["first_quiz", "perfect_score"]);
    }

    #[tokio::test]
    async fn imperfect_quiz_unlocks_first_quiz_only() {
        let mgr = manager();
        let newly = mgr
            .check_achievements("ravi", &StudyAction::QuizCompleted { percentage: 60 })
            .await
            .unwrap();

        assert_eq!(newly.len(), 1);
        assert_eq!(newly[0].id, "first_quiz");
    }

    #[tokio::test]
    async fn repeat_check_is_idempotent() {
        let mgr = manager();
        let action = StudyAction::QuizCompleted { percentage: 100 };

        mgr.check_achievements("ravi", &action).await.unwrap();
        let record_after_first = mgr.get_user_achievements("ravi").await.unwrap();

        let second = mgr.check_achievements("ravi", &action).await.unwrap();
        assert!(second.is_empty());

        // unlockedAt stamps are unchanged by the repeat call.
        let record_after_second = mgr.get_user_achievements("ravi").await.unwrap();
        assert_eq!(record_after_second, record_after_first);
    }

    #[tokio::test]
    async fn streak_threshold_is_seven_days() {
        let mgr = manager();
        let below = mgr
            .check_achievements("ravi", &StudyAction::DailyStudy { streak_days: 6 })
            .await
            .unwrap();
        assert!(below.is_empty());

        let at = mgr
            .check_achievements("ravi", &StudyAction::DailyStudy { streak_days: 7 })
            .await
            .unwrap();
        assert_eq!(at[0].id, "study_streak_7");
    }

    #[tokio::test]
    async fn lesson_threshold_is_ten() {
        let mgr = manager();
        let below = mgr
            .check_achievements("ravi", &StudyAction::LessonCompleted { total_lessons: 9 })
            .await
            .unwrap();
        assert!(below.is_empty());

        let at = mgr
            .check_achievements("ravi", &StudyAction::LessonCompleted { total_lessons: 10 })
            .await
            .unwrap();
        assert_eq!(at[0].id, "lesson_completed_10");
    }

    #[tokio::test]
    async fn direct_unlock_overwrites_the_entry() {
        let mgr = manager();
        let def = &ACHIEVEMENT_DEFS[0];

        mgr.unlock_achievement("ravi", def).await.unwrap();
        let first = mgr.get_user_achievements("ravi").await.unwrap()["first_quiz"].clone();

        mgr.unlock_achievement("ravi", def).await.unwrap();
        let second = mgr.get_user_achievements("ravi").await.unwrap()["first_quiz"].clone();

        assert!(second.unlocked_at >= first.unlocked_at);
    }

    #[tokio::test]
    async fn achievements_are_per_user() {
        let mgr = manager();
        mgr.check_achievements("ravi", &StudyAction::QuizCompleted { percentage: 100 })
            .await
            .unwrap();

        assert!(mgr.get_user_achievements("asha").await.unwrap().is_empty());
    }
}
