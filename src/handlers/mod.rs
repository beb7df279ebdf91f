pub mod library;
pub mod quiz;
pub mod settings;
pub mod stats;
pub mod study;

use askama::Template;
use axum::{
  extract::State,
  response::Html,
  routing::{get, post},
  Router,
};
use chrono::Local;

use crate::config;
use crate::db::{self, LogOnError};
use crate::domain::CardKind;
use crate::state::AppState;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
  pub due_vocab: i64,
  pub due_kanji: i64,
  pub due_grammar: i64,
  pub due_total: i64,
  pub weak_kanji_count: i64,
  pub total_vocab: i64,
  pub total_kanji: i64,
  pub total_grammar: i64,
  pub learned: i64,
  pub mastered: i64,
  pub streak: i64,
  pub reviewed_today: i64,
}

pub async fn index(State(state): State<AppState>) -> Html<String> {
  let Ok(conn) = db::try_lock(&state.db) else {
    return Html(String::new());
  };
  let today = Local::now().date_naive();

  let due_vocab = db::count_due(&conn, Some(CardKind::Vocabulary), today).log_warn_default("due vocabulary count");
  let due_kanji = db::count_due(&conn, Some(CardKind::Kanji), today).log_warn_default("due kanji count");
  let due_grammar = db::count_due(&conn, Some(CardKind::Grammar), today).log_warn_default("due grammar count");

  let template = IndexTemplate {
    due_vocab,
    due_kanji,
    due_grammar,
    due_total: due_vocab + due_kanji + due_grammar,
    weak_kanji_count: db::count_weak_kanji(&conn).log_warn_default("weak kanji count"),
    total_vocab: db::count_vocabulary(&conn, None).log_warn_default("vocabulary count"),
    total_kanji: db::count_kanji(&conn, None).log_warn_default("kanji count"),
    total_grammar: db::count_grammar(&conn, None).log_warn_default("grammar count"),
    learned: db::count_learned(&conn, None).log_warn_default("learned count"),
    mastered: db::count_mastered(&conn, None).log_warn_default("mastered count"),
    streak: db::get_streak(&conn, today).log_warn_default("streak"),
    reviewed_today: db::get_stats_for_day(&conn, today)
      .map(|s| s.cards_reviewed)
      .log_warn_default("today stats"),
  };

  Html(template.render().unwrap_or_default())
}

/// All application routes over the shared state.
pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/", get(index))
    .route("/study", get(study::study_start))
    .route("/review", post(study::submit_review))
    .route("/speak", post(study::speak))
    .route("/quiz", get(quiz::quiz_menu))
    .route("/quiz/start", get(quiz::quiz_start))
    .route("/quiz/answer", post(quiz::quiz_answer))
    .route("/drill", get(quiz::drill_start))
    .route("/drill/answer", post(quiz::drill_answer))
    .route("/browse", get(library::browse))
    .route("/search", get(library::search))
    .route("/stats", get(stats::stats_page))
    .route("/settings", get(settings::settings_page).post(settings::update_settings))
    .route("/settings/backup", get(settings::download_backup))
    .route("/settings/export", get(settings::download_export))
    .with_state(state)
}

/// Parse an optional level filter from query input, treating "all" as none.
pub(crate) fn parse_level(raw: Option<&str>) -> Option<crate::domain::Level> {
  raw.and_then(crate::domain::Level::from_str)
}

pub(crate) fn parse_kind(raw: &str) -> CardKind {
  CardKind::from_str(raw).unwrap_or(CardKind::Vocabulary)
}

// Keep study queues bounded per session
pub(crate) fn new_card_limit(kind: CardKind) -> i64 {
  match kind {
    CardKind::Grammar => config::NEW_GRAMMAR_LIMIT,
    _ => config::NEW_CARD_LIMIT,
  }
}
