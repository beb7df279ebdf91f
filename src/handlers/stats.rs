//! Progress and history page.

use askama::Template;
use axum::{extract::State, response::Html};
use chrono::Local;

use crate::config;
use crate::db::{self, DailyStats, LogOnError};
use crate::domain::CardKind;
use crate::state::AppState;

/// One row of the per-deck progress table.
pub struct DeckProgress {
  pub name: &'static str,
  pub total: i64,
  pub learned: i64,
  pub mastered: i64,
  pub due: i64,
}

pub struct HistoryRow {
  pub date: String,
  pub reviewed: i64,
  pub accuracy: i64,
  pub minutes: i64,
}

#[derive(Template)]
#[template(path = "stats.html")]
pub struct StatsTemplate {
  pub decks: Vec<DeckProgress>,
  pub history: Vec<HistoryRow>,
  pub streak: i64,
  pub weak_kanji_count: i64,
}

pub async fn stats_page(State(state): State<AppState>) -> Html<String> {
  let Ok(conn) = db::try_lock(&state.db) else {
    return Html(String::new());
  };
  let today = Local::now().date_naive();

  let mut decks = Vec::new();
  for kind in CardKind::ALL {
    let total = match kind {
      CardKind::Vocabulary => db::count_vocabulary(&conn, None),
      CardKind::Kanji => db::count_kanji(&conn, None),
      CardKind::Grammar => db::count_grammar(&conn, None),
    }
    .log_warn_default("deck total");
    decks.push(DeckProgress {
      name: kind.as_str(),
      total,
      learned: db::count_learned(&conn, Some(kind)).log_warn_default("deck learned"),
      mastered: db::count_mastered(&conn, Some(kind)).log_warn_default("deck mastered"),
      due: db::count_due(&conn, Some(kind), today).log_warn_default("deck due"),
    });
  }

  let history = db::get_recent_stats(&conn, today, config::STATS_HISTORY_DAYS)
    .log_warn_default("history")
    .iter()
    .map(|day: &DailyStats| HistoryRow {
      date: day.date.format("%Y-%m-%d").to_string(),
      reviewed: day.cards_reviewed,
      accuracy: day.accuracy_percent(),
      minutes: day.study_seconds / 60,
    })
    .collect();

  let template = StatsTemplate {
    decks,
    history,
    streak: db::get_streak(&conn, today).log_warn_default("streak"),
    weak_kanji_count: db::count_weak_kanji(&conn).log_warn_default("weak kanji count"),
  };
  Html(template.render().unwrap_or_default())
}
