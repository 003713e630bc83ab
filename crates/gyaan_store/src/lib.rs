//! Gyaanyatra local data store.
//!
//! Namespaced accessors over an asynchronous string-keyed key-value store,
//! modelling the learning app's on-device records: user profile, lesson
//! progress, quiz scores, study notes, study plans, settings and
//! achievements, plus derived statistics and a full-bundle export.
//!
//! Every operation is a fresh read-modify-write cycle against the store;
//! there is no cross-call caching and no per-record locking. The intended
//! caller is a single UI task issuing one write at a time. Anything that
//! introduces concurrent writers must add per-record serialization on top
//! of this crate, or rapid writes to the same record can lose updates.

pub mod achievements;
pub mod error;
pub mod export;
pub mod file_store;
pub mod keys;
pub mod notes;
pub mod profile;
pub mod progress;
pub mod quiz;
mod record;
pub mod settings;
pub mod store;
pub mod study_plan;

pub use achievements::{
    Achievement, AchievementDef, AchievementsManager, AchievementsRecord, StudyAction,
    ACHIEVEMENT_DEFS,
};
pub use error::{DataError, Result};
pub use export::{AppStatistics, DataUtils, UserDataExport};
pub use file_store::FileStore;
pub use keys::LessonKey;
pub use notes::{LessonNote, NotesManager, NotesRecord};
pub use profile::{UserProfile, UserProfileManager};
pub use progress::{LessonProgress, ProgressManager, ProgressRecord, ProgressUpdate};
pub use quiz::{QuizAttempt, QuizManager, QuizResult, QuizScoreRecord};
pub use settings::{AppSettings, SettingUpdate, SettingsManager};
pub use store::{KeyValueStore, MemoryStore};
pub use study_plan::{StudyPlan, StudyPlanManager};
