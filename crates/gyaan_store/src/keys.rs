//! Storage key naming.
//!
//! Key strings must stay byte-identical to the original app releases so
//! existing on-device data remains readable after an update. Do not change
//! them without a migration.

use std::fmt;

/// Singleton profile record (per installation, not per user).
pub const USER_PROFILE: &str = "user_profile";

/// Global app settings record (not user-scoped).
pub const APP_SETTINGS: &str = "app_settings";

const USER_PROGRESS: &str = "user_progress";
const QUIZ_SCORES: &str = "quiz_scores";
const STUDY_NOTES: &str = "study_notes";
const STUDY_PLAN: &str = "study_plan";
const ACHIEVEMENTS: &str = "achievements";

/// Key of the per-user lesson progress record.
pub fn user_progress(user_id: &str) -> String {
    format!("{}_{}", USER_PROGRESS, user_id)
}

/// Key of the per-user quiz score record.
pub fn quiz_scores(user_id: &str) -> String {
    format!("{}_{}", QUIZ_SCORES, user_id)
}

/// Key of the per-user study notes record.
pub fn study_notes(user_id: &str) -> String {
    format!("{}_{}", STUDY_NOTES, user_id)
}

/// Key of the per-user study plan record.
pub fn study_plan(user_id: &str) -> String {
    format!("{}_{}", STUDY_PLAN, user_id)
}

/// Key of the per-user achievements record.
pub fn achievements(user_id: &str) -> String {
    format!("{}_{}", ACHIEVEMENTS, user_id)
}

/// The per-user keys removed by a bulk clear. `user_profile` and
/// `app_settings` are deliberately not in this list.
pub fn user_scoped_keys(user_id: &str) -> Vec<String> {
    vec![
        user_progress(user_id),
        quiz_scores(user_id),
        study_notes(user_id),
        study_plan(user_id),
        achievements(user_id),
    ]
}

/// Typed composite key addressing one lesson inside a per-user record.
///
/// The canonical on-disk form is `{subject}_{classNumber}_{lessonId}`.
/// Subjects are uppercase by convention but not enforced. Because the
/// canonical form is only ever built here and split by stripping the
/// subject/class prefix, lesson ids may themselves contain underscores.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LessonKey {
    pub subject: String,
    pub class_number: u32,
    pub lesson_id: String,
}

impl LessonKey {
    pub fn new(subject: &str, class_number: u32, lesson_id: &str) -> Self {
        Self {
            subject: subject.to_string(),
            class_number,
            lesson_id: lesson_id.to_string(),
        }
    }

    /// The entry key used inside per-user records.
    pub fn canonical(&self) -> String {
        format!("{}_{}_{}", self.subject, self.class_number, self.lesson_id)
    }

    /// Prefix shared by every lesson of one subject and class, trailing
    /// separator included. Stripping it from a canonical key yields the
    /// full lesson id.
    pub fn subject_class_prefix(subject: &str, class_number: u32) -> String {
        format!("{}_{}_", subject, class_number)
    }
}

impl fmt::Display for LessonKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}
