//! Review session flow: reveal a due card, rate it, move on.

use askama::Template;
use axum::{
  extract::{Query, State},
  http::StatusCode,
  response::{Html, IntoResponse, Redirect},
  Form,
};
use chrono::Local;
use serde::Deserialize;

use crate::db::{self, LogOnError};
use crate::domain::{status_label, CardKind, GrammarEntry, KanjiEntry, VocabEntry, WeakKanjiUpdate};
use crate::services::tts;
use crate::srs;
use crate::state::AppState;

use super::{new_card_limit, parse_kind, parse_level};

#[derive(Template)]
#[template(path = "study.html")]
pub struct StudyTemplate {
  pub has_card: bool,
  pub kind: String,
  pub level: String,
  pub card_id: i64,
  pub front: String,
  pub detail_lines: Vec<String>,
  pub example: String,
  pub show_weak: bool,
  pub shown_at: i64,
  pub status: String,
  pub remaining: usize,
}

/// Card front/back fields flattened for the template.
struct CardView {
  card_id: i64,
  front: String,
  detail_lines: Vec<String>,
  example: String,
  show_weak: bool,
}

fn contains_kanji(text: &str) -> bool {
  text.chars().any(|c| ('\u{4E00}'..='\u{9FFF}').contains(&c))
}

fn vocab_view(entry: &VocabEntry) -> CardView {
  let mut detail_lines = vec![entry.reading.clone(), entry.meaning.clone()];
  if !entry.part_of_speech.is_empty() {
    detail_lines.push(format!("({})", entry.part_of_speech));
  }
  CardView {
    card_id: entry.id,
    front: entry.word.clone(),
    detail_lines,
    example: entry.example_jp.clone(),
    show_weak: contains_kanji(&entry.word),
  }
}

fn kanji_view(entry: &KanjiEntry) -> CardView {
  CardView {
    card_id: entry.id,
    front: entry.character.clone(),
    detail_lines: vec![
      entry.meaning.clone(),
      format!("on: {}", entry.on_yomi),
      format!("kun: {}", entry.kun_yomi),
    ],
    example: String::new(),
    show_weak: true,
  }
}

fn grammar_view(entry: &GrammarEntry) -> CardView {
  let mut detail_lines = vec![entry.meaning.clone()];
  if !entry.notes.is_empty() {
    detail_lines.push(entry.notes.clone());
  }
  CardView {
    card_id: entry.id,
    front: entry.pattern.clone(),
    detail_lines,
    example: entry.example_jp.clone(),
    show_weak: false,
  }
}

fn load_card(conn: &rusqlite::Connection, kind: CardKind, card_id: i64) -> Option<CardView> {
  match kind {
    CardKind::Vocabulary => db::get_vocab_by_id(conn, card_id)
      .log_warn("load vocabulary card")
      .flatten()
      .map(|e| vocab_view(&e)),
    CardKind::Kanji => db::get_kanji_by_id(conn, card_id)
      .log_warn("load kanji card")
      .flatten()
      .map(|e| kanji_view(&e)),
    CardKind::Grammar => db::get_grammar_by_id(conn, card_id)
      .log_warn("load grammar card")
      .flatten()
      .map(|e| grammar_view(&e)),
  }
}

/// Queue for one session: every due card first, then a capped batch of
/// never-seen cards.
fn session_queue(
  conn: &rusqlite::Connection,
  kind: CardKind,
  level: crate::domain::Level,
  today: chrono::NaiveDate,
) -> Vec<i64> {
  let mut queue: Vec<i64> = db::get_due_reviews(conn, Some(kind), today, crate::config::DUE_CARD_LIMIT)
    .log_warn_default("due cards")
    .into_iter()
    .map(|r| r.card_id)
    .collect();

  let limit = new_card_limit(kind);
  let new_ids: Vec<i64> = match kind {
    CardKind::Vocabulary => db::get_unreviewed_vocab(conn, level, limit)
      .log_warn_default("new vocabulary")
      .into_iter()
      .map(|e| e.id)
      .collect(),
    CardKind::Kanji => db::get_unreviewed_kanji(conn, level, limit)
      .log_warn_default("new kanji")
      .into_iter()
      .map(|e| e.id)
      .collect(),
    CardKind::Grammar => db::get_unreviewed_grammar(conn, level, limit)
      .log_warn_default("new grammar")
      .into_iter()
      .map(|e| e.id)
      .collect(),
  };
  queue.extend(new_ids);
  queue
}

#[derive(Deserialize)]
pub struct StudyQuery {
  #[serde(default)]
  pub kind: Option<String>,
  #[serde(default)]
  pub level: Option<String>,
}

pub async fn study_start(
  State(state): State<AppState>,
  Query(query): Query<StudyQuery>,
) -> impl IntoResponse {
  let kind = parse_kind(query.kind.as_deref().unwrap_or("vocabulary"));
  let level = parse_level(query.level.as_deref()).unwrap_or(crate::domain::Level::N5);

  let Ok(conn) = db::try_lock(&state.db) else {
    return Html(String::new());
  };
  let today = Local::now().date_naive();
  let queue = session_queue(&conn, kind, level, today);

  let template = match queue.first().and_then(|id| load_card(&conn, kind, *id)) {
    Some(view) => {
      let record = db::get_review(&conn, kind, view.card_id)
        .log_warn("card status lookup")
        .flatten();
      StudyTemplate {
        has_card: true,
        kind: kind.as_str().to_string(),
        level: level.as_str().to_string(),
        card_id: view.card_id,
        front: view.front,
        detail_lines: view.detail_lines,
        example: view.example,
        show_weak: view.show_weak,
        shown_at: Local::now().timestamp(),
        status: status_label(record.as_ref()).to_string(),
        remaining: queue.len(),
      }
    }
    None => StudyTemplate {
      has_card: false,
      kind: kind.as_str().to_string(),
      level: level.as_str().to_string(),
      card_id: 0,
      front: String::new(),
      detail_lines: Vec::new(),
      example: String::new(),
      show_weak: false,
      shown_at: 0,
      status: String::new(),
      remaining: 0,
    },
  };

  Html(template.render().unwrap_or_default())
}

#[derive(Deserialize)]
pub struct ReviewForm {
  pub kind: String,
  pub level: String,
  pub card_id: i64,
  pub grade: String,
  /// Present whenever the weak-kanji grade was offered for this card
  #[serde(default)]
  pub weak_shown: Option<String>,
  /// Epoch seconds when the card was rendered, for study-time tracking
  #[serde(default)]
  pub shown_at: i64,
}

/// Longest gap between showing a card and grading it that still counts
/// as study time. Anything beyond this is an abandoned tab.
const MAX_ANSWER_SECONDS: i64 = 300;

impl ReviewForm {
  /// Grade button to (quality, weak-kanji update).
  ///
  /// A success clears the weak flag, a lapse leaves it, and the dedicated
  /// "knew the reading only" grade counts as a hard success that marks it.
  /// Cards without a written form never touch the flag.
  fn grading(&self) -> (u8, WeakKanjiUpdate) {
    let weak_offered = self.weak_shown.is_some();
    match self.grade.as_str() {
      "weak" if weak_offered => (3, WeakKanjiUpdate::Mark),
      "hard" => (3, WeakKanjiUpdate::Leave),
      "good" if weak_offered => (4, WeakKanjiUpdate::Clear),
      "good" => (4, WeakKanjiUpdate::Leave),
      "easy" if weak_offered => (5, WeakKanjiUpdate::Clear),
      "easy" => (5, WeakKanjiUpdate::Leave),
      _ => (1, WeakKanjiUpdate::Leave),
    }
  }
}

pub async fn submit_review(
  State(state): State<AppState>,
  Form(form): Form<ReviewForm>,
) -> impl IntoResponse {
  let kind = parse_kind(&form.kind);
  let today = Local::now().date_naive();

  {
    let Ok(conn) = db::try_lock(&state.db) else {
      return Redirect::to("/study");
    };

    let first_time = db::get_review(&conn, kind, form.card_id)
      .log_warn("prior review lookup")
      .flatten()
      .is_none();

    let (quality, weak) = form.grading();
    match srs::review_card(&conn, kind, form.card_id, quality, weak, today) {
      Ok(outcome) => {
        tracing::debug!(
          "Reviewed {} card {}: next in {} days",
          kind.as_str(),
          form.card_id,
          outcome.interval_days
        );
        let correct = quality >= 3;
        db::record_answer(&conn, today, correct, first_time).log_warn("record stats");
        if form.shown_at > 0 {
          let elapsed = (Local::now().timestamp() - form.shown_at).clamp(0, MAX_ANSWER_SECONDS);
          db::add_study_seconds(&conn, today, elapsed).log_warn("record study time");
        }
      }
      Err(e) => {
        tracing::warn!("Review of {} card {} rejected: {}", kind.as_str(), form.card_id, e);
      }
    }
  }

  Redirect::to(&format!("/study?kind={}&level={}", kind.as_str(), form.level))
}

#[derive(Deserialize)]
pub struct SpeakForm {
  pub text: String,
}

/// Speak a word aloud if an engine exists and the toggle is on.
pub async fn speak(
  State(state): State<AppState>,
  Form(form): Form<SpeakForm>,
) -> StatusCode {
  let Some(engine) = state.tts else {
    return StatusCode::NO_CONTENT;
  };

  let enabled = match db::try_lock(&state.db) {
    Ok(conn) => db::tts_enabled(&conn).log_warn_default("tts setting"),
    Err(_) => false,
  };
  if enabled {
    tts::speak(engine, &form.text);
  }
  StatusCode::NO_CONTENT
}
