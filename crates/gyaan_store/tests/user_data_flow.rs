//! End-to-end flow against the file-backed store: one user signs up,
//! studies, takes quizzes, exports, and clears their data.

use std::sync::Arc;

use gyaan_store::{
    AchievementsManager, AppSettings, DataUtils, FileStore, LessonKey, NotesManager,
    ProgressManager, ProgressUpdate, QuizManager, QuizResult, SettingsManager, StudyAction,
    StudyPlan, StudyPlanManager, UserDataExport, UserProfile, UserProfileManager,
};

fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gyaan_store=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

fn file_store(dir: &tempfile::TempDir) -> Arc<FileStore> {
    Arc::new(FileStore::new(dir.path()))
}

#[tokio::test]
async fn full_user_journey_round_trips_through_files() {
    init_logging();
    let dir = tempfile::TempDir::new().unwrap();
    let store = file_store(&dir);
    let user = "ravi";

    let profiles = UserProfileManager::new(store.clone());
    let progress = ProgressManager::new(store.clone());
    let quizzes = QuizManager::new(store.clone());
    let notes = NotesManager::new(store.clone());
    let plans = StudyPlanManager::new(store.clone());
    let achievements = AchievementsManager::new(store.clone());
    let utils = DataUtils::new(store.clone());

    profiles
        .save_profile(&UserProfile {
            name: Some("Ravi".to_string()),
            class: Some("6".to_string()),
            username: Some(user.to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let lesson = LessonKey::new("MATHS", 6, "L1");
    progress
        .save_lesson_progress(
            user,
            &lesson,
            ProgressUpdate {
                completion_percentage: 100.0,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    quizzes
        .save_quiz_score(
            user,
            &lesson,
            QuizResult {
                score: 1.0,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    notes
        .save_notes(user, &lesson, "ratios chapter done")
        .await
        .unwrap();
    plans
        .save_study_plan(user, StudyPlan::default())
        .await
        .unwrap();

    let unlocked: Vec<&str> = achievements
        .check_achievements(user, &StudyAction::QuizCompleted { percentage: 100 })
        .await
        .unwrap()
        .iter()
        .map(|def| def.id)
        .collect();
    assert_eq!(unlocked, vec!["first_quiz", "perfect_score"]);

    // Everything written so far must be visible through a fresh store
    // instance over the same directory.
    let reopened = file_store(&dir);
    let reopened_progress = ProgressManager::new(reopened.clone());
    let record = reopened_progress.get_user_progress(user).await.unwrap();
    assert_eq!(record["MATHS_6_L1"].completion_percentage, 100.0);

    let stats = utils.get_app_statistics(user).await.unwrap();
    assert_eq!(stats.total_lessons, 1);
    assert_eq!(stats.completed_lessons, 1);
    assert_eq!(stats.total_quizzes, 1);
    assert_eq!(stats.achievements_unlocked, 2);
    assert_eq!(stats.overall_progress, 100);
}

#[tokio::test]
async fn clear_wipes_user_records_but_not_profile_or_settings() {
    init_logging();
    let dir = tempfile::TempDir::new().unwrap();
    let store = file_store(&dir);
    let user = "asha";

    let profiles = UserProfileManager::new(store.clone());
    let progress = ProgressManager::new(store.clone());
    let quizzes = QuizManager::new(store.clone());
    let notes = NotesManager::new(store.clone());
    let plans = StudyPlanManager::new(store.clone());
    let settings = SettingsManager::new(store.clone());
    let achievements = AchievementsManager::new(store.clone());
    let utils = DataUtils::new(store.clone());

    profiles
        .save_profile(&UserProfile {
            name: Some("Asha".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    settings
        .save_settings(&AppSettings {
            language: "hindi".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    let lesson = LessonKey::new("SCIENCE", 7, "L2");
    progress
        .save_lesson_progress(
            user,
            &lesson,
            ProgressUpdate {
                completion_percentage: 30.0,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    quizzes
        .save_quiz_score(
            user,
            &lesson,
            QuizResult {
                score: 0.4,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    notes.save_notes(user, &lesson, "photosynthesis").await.unwrap();
    plans
        .save_study_plan(user, StudyPlan::default())
        .await
        .unwrap();
    achievements
        .check_achievements(user, &StudyAction::QuizCompleted { percentage: 40 })
        .await
        .unwrap();

    utils.clear_all_user_data(user).await.unwrap();

    assert!(progress.get_user_progress(user).await.unwrap().is_empty());
    assert!(quizzes.get_user_quiz_scores(user).await.unwrap().is_empty());
    assert!(notes.get_user_notes(user).await.unwrap().is_empty());
    assert_eq!(plans.get_study_plan(user).await.unwrap(), None);
    assert!(achievements.get_user_achievements(user).await.unwrap().is_empty());

    // Installation-wide records survive the per-user clear.
    let profile = profiles.get_profile().await.unwrap().unwrap();
    assert_eq!(profile.name.as_deref(), Some("Asha"));
    assert_eq!(settings.get_settings().await.unwrap().language, "hindi");
}

#[tokio::test]
async fn export_to_file_writes_a_parseable_bundle() {
    init_logging();
    let dir = tempfile::TempDir::new().unwrap();
    let store = file_store(&dir);
    let user = "ravi";

    let profiles = UserProfileManager::new(store.clone());
    let progress = ProgressManager::new(store.clone());
    let utils = DataUtils::new(store.clone());

    profiles
        .save_profile(&UserProfile {
            name: Some("Ravi".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    progress
        .save_lesson_progress(
            user,
            &LessonKey::new("MATHS", 6, "L1"),
            ProgressUpdate {
                completion_percentage: 40.0,
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let out = dir.path().join("export").join("ravi.json");
    utils.export_to_file(user, &out).await.unwrap();

    let raw = std::fs::read_to_string(&out).unwrap();
    let bundle: UserDataExport = serde_json::from_str(&raw).unwrap();
    assert_eq!(bundle.profile.unwrap().name.as_deref(), Some("Ravi"));
    assert_eq!(bundle.progress["MATHS_6_L1"].completion_percentage, 40.0);
    assert_eq!(bundle.settings, AppSettings::default());
}
