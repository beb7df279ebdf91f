//! Quiz sessions and the verb conjugation drill.
//!
//! Quiz state travels in hidden form fields (remaining ids, score), so
//! sessions need no server-side storage and survive restarts.

use askama::Template;
use axum::{
  extract::{Query, State},
  response::{Html, IntoResponse},
  Form,
};
use chrono::Local;
use rand::seq::{IndexedRandom, SliceRandom};
use serde::Deserialize;

use crate::config;
use crate::conjugation::VerbForm;
use crate::db::{self, LogOnError};
use crate::domain::{CardKind, Level, WeakKanjiUpdate};
use crate::srs::{self, quality_from_answer, Difficulty};
use crate::state::AppState;
use crate::validation;

use super::parse_level;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizMode {
  /// Pick the meaning out of four choices
  Choice,
  /// Type the word for an English meaning
  Typing,
  /// Type any reading for a kanji
  Reading,
}

impl QuizMode {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "choice" => Some(QuizMode::Choice),
      "typing" => Some(QuizMode::Typing),
      "reading" => Some(QuizMode::Reading),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      QuizMode::Choice => "choice",
      QuizMode::Typing => "typing",
      QuizMode::Reading => "reading",
    }
  }

  fn card_kind(&self) -> CardKind {
    match self {
      QuizMode::Reading => CardKind::Kanji,
      _ => CardKind::Vocabulary,
    }
  }
}

#[derive(Template)]
#[template(path = "quiz_menu.html")]
pub struct QuizMenuTemplate {
  pub levels: Vec<&'static str>,
}

pub async fn quiz_menu() -> Html<String> {
  let template = QuizMenuTemplate {
    levels: Level::ALL.iter().map(|l| l.as_str()).collect(),
  };
  Html(template.render().unwrap_or_default())
}

#[derive(Template)]
#[template(path = "quiz_question.html")]
pub struct QuizQuestionTemplate {
  pub mode: String,
  pub level: String,
  pub card_id: i64,
  pub prompt: String,
  pub choices: Vec<String>,
  pub remaining: String,
  pub score: i64,
  pub asked: i64,
  pub total: i64,
  pub last_result: String,
}

#[derive(Template)]
#[template(path = "quiz_result.html")]
pub struct QuizResultTemplate {
  pub score: i64,
  pub total: i64,
  pub accuracy: i64,
  pub last_result: String,
}

struct Question {
  prompt: String,
  choices: Vec<String>,
}

fn build_question(
  conn: &rusqlite::Connection,
  mode: QuizMode,
  level: Level,
  card_id: i64,
) -> Option<Question> {
  match mode {
    QuizMode::Choice => {
      let entry = db::get_vocab_by_id(conn, card_id).log_warn("quiz card")??;
      let pool = db::get_vocabulary(conn, Some(level)).log_warn_default("distractor pool");
      let mut rng = rand::rng();
      let mut choices: Vec<String> = pool
        .iter()
        .filter(|e| e.id != entry.id && e.meaning != entry.meaning)
        .map(|e| e.meaning.clone())
        .collect::<std::collections::HashSet<_>>()
        .into_iter()
        .collect();
      choices.shuffle(&mut rng);
      choices.truncate(config::DISTRACTOR_COUNT);
      choices.push(entry.meaning.clone());
      choices.shuffle(&mut rng);
      Some(Question {
        prompt: entry.word,
        choices,
      })
    }
    QuizMode::Typing => {
      let entry = db::get_vocab_by_id(conn, card_id).log_warn("quiz card")??;
      Some(Question {
        prompt: entry.meaning,
        choices: Vec::new(),
      })
    }
    QuizMode::Reading => {
      let entry = db::get_kanji_by_id(conn, card_id).log_warn("quiz card")??;
      Some(Question {
        prompt: entry.character,
        choices: Vec::new(),
      })
    }
  }
}

fn pick_question_ids(conn: &rusqlite::Connection, mode: QuizMode, level: Level) -> Vec<i64> {
  let mut ids: Vec<i64> = match mode.card_kind() {
    CardKind::Kanji => db::get_kanji(conn, Some(level))
      .log_warn_default("quiz pool")
      .into_iter()
      .map(|e| e.id)
      .collect(),
    _ => db::get_vocabulary(conn, Some(level))
      .log_warn_default("quiz pool")
      .into_iter()
      .map(|e| e.id)
      .collect(),
  };
  let mut rng = rand::rng();
  ids.shuffle(&mut rng);
  ids.truncate(config::QUIZ_QUESTION_COUNT as usize);
  ids
}

fn render_question(
  conn: &rusqlite::Connection,
  mode: QuizMode,
  level: Level,
  card_id: i64,
  remaining: &[i64],
  score: i64,
  asked: i64,
  total: i64,
  last_result: String,
) -> Html<String> {
  let Some(question) = build_question(conn, mode, level, card_id) else {
    return Html("<p>Question unavailable.</p>".to_string());
  };
  let template = QuizQuestionTemplate {
    mode: mode.as_str().to_string(),
    level: level.as_str().to_string(),
    card_id,
    prompt: question.prompt,
    choices: question.choices,
    remaining: remaining
      .iter()
      .map(|id| id.to_string())
      .collect::<Vec<_>>()
      .join(","),
    score,
    asked,
    total,
    last_result,
  };
  Html(template.render().unwrap_or_default())
}

#[derive(Deserialize)]
pub struct QuizStartQuery {
  pub mode: String,
  #[serde(default)]
  pub level: Option<String>,
}

pub async fn quiz_start(
  State(state): State<AppState>,
  Query(query): Query<QuizStartQuery>,
) -> impl IntoResponse {
  let mode = QuizMode::from_str(&query.mode).unwrap_or(QuizMode::Choice);
  let level = parse_level(query.level.as_deref()).unwrap_or(Level::N5);

  let Ok(conn) = db::try_lock(&state.db) else {
    return Html(String::new());
  };
  let ids = pick_question_ids(&conn, mode, level);
  let Some((&first, rest)) = ids.split_first() else {
    return Html("<p>No cards available for this quiz.</p>".to_string());
  };

  render_question(
    &conn,
    mode,
    level,
    first,
    rest,
    0,
    0,
    ids.len() as i64,
    String::new(),
  )
}

#[derive(Deserialize)]
pub struct QuizAnswerForm {
  pub mode: String,
  pub level: String,
  pub card_id: i64,
  #[serde(default)]
  pub answer: String,
  pub remaining: String,
  pub score: i64,
  pub asked: i64,
  pub total: i64,
}

fn grade_answer(conn: &rusqlite::Connection, mode: QuizMode, card_id: i64, answer: &str) -> (bool, String) {
  match mode {
    QuizMode::Choice => match db::get_vocab_by_id(conn, card_id).log_warn("grade card").flatten() {
      Some(entry) => (answer == entry.meaning, entry.meaning),
      None => (false, String::new()),
    },
    QuizMode::Typing => match db::get_vocab_by_id(conn, card_id).log_warn("grade card").flatten() {
      Some(entry) => {
        let correct = validation::vocab_answer_correct(answer, &entry);
        (correct, format!("{} ({})", entry.word, entry.reading))
      }
      None => (false, String::new()),
    },
    QuizMode::Reading => match db::get_kanji_by_id(conn, card_id).log_warn("grade card").flatten() {
      Some(entry) => {
        let correct = validation::kanji_reading_correct(answer, &entry);
        (correct, format!("{}、{}", entry.on_yomi, entry.kun_yomi))
      }
      None => (false, String::new()),
    },
  }
}

pub async fn quiz_answer(
  State(state): State<AppState>,
  Form(form): Form<QuizAnswerForm>,
) -> impl IntoResponse {
  let mode = QuizMode::from_str(&form.mode).unwrap_or(QuizMode::Choice);
  let level = Level::from_str(&form.level).unwrap_or(Level::N5);
  let today = Local::now().date_naive();

  let Ok(conn) = db::try_lock(&state.db) else {
    return Html(String::new());
  };

  let (correct, expected) = grade_answer(&conn, mode, form.card_id, form.answer.trim());

  // Quiz answers feed the scheduler at a fixed strength
  let quality = quality_from_answer(correct, Difficulty::Normal);
  let first_time = db::get_review(&conn, mode.card_kind(), form.card_id)
    .log_warn("prior review lookup")
    .flatten()
    .is_none();
  if let Err(e) = srs::review_card(
    &conn,
    mode.card_kind(),
    form.card_id,
    quality,
    WeakKanjiUpdate::Leave,
    today,
  ) {
    tracing::warn!("Quiz grading failed for card {}: {}", form.card_id, e);
  } else {
    db::record_answer(&conn, today, correct, first_time).log_warn("record stats");
  }

  let score = form.score + correct as i64;
  let asked = form.asked + 1;
  let last_result = if correct {
    "correct".to_string()
  } else {
    format!("incorrect, answer: {}", expected)
  };

  let remaining: Vec<i64> = form
    .remaining
    .split(',')
    .filter_map(|s| s.trim().parse().ok())
    .collect();

  match remaining.split_first() {
    Some((&next, rest)) => render_question(
      &conn, mode, level, next, rest, score, asked, form.total, last_result,
    ),
    None => {
      let template = QuizResultTemplate {
        score,
        total: form.total,
        accuracy: if form.total > 0 { score * 100 / form.total } else { 0 },
        last_result,
      };
      Html(template.render().unwrap_or_default())
    }
  }
}

#[derive(Template)]
#[template(path = "drill.html")]
pub struct DrillTemplate {
  pub has_verb: bool,
  pub card_id: i64,
  pub word: String,
  pub reading: String,
  pub form_key: String,
  pub form_label: String,
  pub feedback: String,
}

fn next_drill(conn: &rusqlite::Connection, feedback: String) -> DrillTemplate {
  let verbs = db::get_verbs(conn, None).log_warn_default("drill verbs");
  let mut rng = rand::rng();
  match (verbs.choose(&mut rng), VerbForm::DRILL.choose(&mut rng)) {
    (Some(verb), Some(form)) => DrillTemplate {
      has_verb: true,
      card_id: verb.id,
      word: verb.word.clone(),
      reading: verb.reading.clone(),
      form_key: form.as_str().to_string(),
      form_label: form.label().to_string(),
      feedback,
    },
    _ => DrillTemplate {
      has_verb: false,
      card_id: 0,
      word: String::new(),
      reading: String::new(),
      form_key: String::new(),
      form_label: String::new(),
      feedback,
    },
  }
}

pub async fn drill_start(State(state): State<AppState>) -> impl IntoResponse {
  let Ok(conn) = db::try_lock(&state.db) else {
    return Html(String::new());
  };
  let template = next_drill(&conn, String::new());
  Html(template.render().unwrap_or_default())
}

#[derive(Deserialize)]
pub struct DrillForm {
  pub card_id: i64,
  pub form_key: String,
  #[serde(default)]
  pub answer: String,
}

pub async fn drill_answer(
  State(state): State<AppState>,
  Form(form): Form<DrillForm>,
) -> impl IntoResponse {
  let today = Local::now().date_naive();
  let Ok(conn) = db::try_lock(&state.db) else {
    return Html(String::new());
  };

  let feedback = match (
    db::get_vocab_by_id(&conn, form.card_id).log_warn("drill verb").flatten(),
    VerbForm::from_str(&form.form_key),
  ) {
    (Some(verb), Some(verb_form)) => {
      let expected = state.conjugator.conjugate(&verb.word, &verb.reading, verb_form);
      let correct = validation::normalize_japanese(form.answer.trim())
        == validation::normalize_japanese(&expected);

      let quality = quality_from_answer(correct, Difficulty::Normal);
      if let Err(e) = srs::review_card(
        &conn,
        CardKind::Vocabulary,
        verb.id,
        quality,
        WeakKanjiUpdate::Leave,
        today,
      ) {
        tracing::warn!("Drill grading failed for verb {}: {}", verb.id, e);
      }

      if correct {
        format!("correct: {} → {}", verb.word, expected)
      } else {
        format!("incorrect: {} {} is {}", verb.word, verb_form.label(), expected)
      }
    }
    _ => String::new(),
  };

  let template = next_drill(&conn, feedback);
  Html(template.render().unwrap_or_default())
}
