//! End-to-end flow over the HTTP surface: seed, study, review, quiz, export.

use axum::http::StatusCode;
use axum_test::TestServer;
use serde::Serialize;
use tempfile::TempDir;

use nihongo::conjugation::Conjugator;
use nihongo::state::AppState;
use nihongo::{content, db, handlers};

struct App {
    server: TestServer,
    // Keeps the temp dir alive for the duration of the test
    _temp: TempDir,
}

fn spawn_app() -> App {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("nihongo.db");
    let pool = db::init_db(&db_path).expect("init db");

    {
        let conn = pool.lock().unwrap();
        content::seed_baseline(&conn).expect("seed");
    }

    let state = AppState::new(pool, db_path, Conjugator::new(), None);
    let server = TestServer::new(handlers::router(state)).expect("test server");
    App {
        server,
        _temp: temp,
    }
}

#[derive(Serialize)]
struct ReviewForm<'a> {
    kind: &'a str,
    level: &'a str,
    card_id: i64,
    grade: &'a str,
    weak_shown: &'a str,
}

#[tokio::test]
async fn test_dashboard_renders_after_seeding() {
    let app = spawn_app();
    let server = &app.server;

    let res = server.get("/").await;
    res.assert_status_ok();
    let body = res.text();
    assert!(body.contains("Vocabulary"));
    assert!(body.contains("Kanji"));
    assert!(body.contains("Grammar"));
}

#[tokio::test]
async fn test_study_page_shows_a_new_card() {
    let app = spawn_app();
    let server = &app.server;

    let res = server.get("/study").add_query_param("kind", "vocabulary").await;
    res.assert_status_ok();
    assert!(res.text().contains("Show answer"));
}

#[tokio::test]
async fn test_review_schedules_card_and_updates_dashboard() {
    let app = spawn_app();
    let server = &app.server;

    let res = server
        .post("/review")
        .form(&ReviewForm {
            kind: "vocabulary",
            level: "N5",
            card_id: 1,
            grade: "good",
            weak_shown: "1",
        })
        .await;
    res.assert_status(StatusCode::SEE_OTHER);

    let body = server.get("/").await.text();
    assert!(body.contains("reviewed today"));
    // One graded answer must show up in the dashboard counters
    assert!(body.contains(">1<"));
}

#[tokio::test]
async fn test_weak_kanji_review_caps_interval() {
    let app = spawn_app();
    let server = &app.server;

    // Answer with the "knew the reading only" grade repeatedly
    for _ in 0..4 {
        server.post("/review")
            .form(&ReviewForm {
                kind: "kanji",
                level: "N5",
                card_id: 1,
                grade: "weak",
                weak_shown: "1",
            })
            .await
            .assert_status(StatusCode::SEE_OTHER);
    }

    let body = server.get("/stats").await.text();
    assert!(body.contains("weak kanji"));
}

#[tokio::test]
async fn test_quiz_round_progresses_to_result() {
    let app = spawn_app();
    let server = &app.server;

    let res = server
        .get("/quiz/start")
        .add_query_param("mode", "choice")
        .add_query_param("level", "N5")
        .await;
    res.assert_status_ok();
    let body = res.text();
    assert!(body.contains("Question 1 of"));
    assert!(body.contains("/quiz/answer"));
}

#[tokio::test]
async fn test_drill_serves_a_verb() {
    let app = spawn_app();
    let server = &app.server;

    let res = server.get("/drill").await;
    res.assert_status_ok();
    assert!(res.text().contains("form"));
}

#[tokio::test]
async fn test_search_finds_seeded_word() {
    let app = spawn_app();
    let server = &app.server;

    let res = server.get("/search").add_query_param("q", "water").await;
    res.assert_status_ok();
    assert!(res.text().contains("水"));
}

#[tokio::test]
async fn test_browse_marks_selected_level() {
    let app = spawn_app();
    let server = &app.server;

    let res = server
        .get("/browse")
        .add_query_param("kind", "vocabulary")
        .add_query_param("level", "N5")
        .await;
    res.assert_status_ok();
    let body = res.text();
    assert!(body.contains(r#"value="N5" selected"#));
    assert!(!body.contains(r#"value="N1" selected"#));
    assert!(body.contains("水"));
}

#[tokio::test]
async fn test_backup_download_is_a_zip() {
    let app = spawn_app();
    let server = &app.server;

    let res = server.get("/settings/backup").await;
    res.assert_status_ok();
    let bytes = res.as_bytes();
    assert!(bytes.starts_with(b"PK\x03\x04"));
}

#[tokio::test]
async fn test_export_is_tab_separated() {
    let app = spawn_app();
    let server = &app.server;

    let res = server
        .get("/settings/export")
        .add_query_param("kind", "vocabulary")
        .await;
    res.assert_status_ok();
    let text = res.text();
    let first_line = text.lines().next().expect("exported rows");
    assert_eq!(first_line.split('\t').count(), 3);
}

#[tokio::test]
async fn test_settings_toggle_persists() {
    let app = spawn_app();
    let server = &app.server;

    server.post("/settings").form(&[("_", "")]).await.assert_status(StatusCode::SEE_OTHER);
    let body = server.get("/settings").await.text();
    assert!(!body.contains("checked"));

    server.post("/settings")
        .form(&[("tts_enabled", "1")])
        .await
        .assert_status(StatusCode::SEE_OTHER);
    let body = server.get("/settings").await.text();
    assert!(body.contains("checked"));
}
