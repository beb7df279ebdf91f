//! Grading entry point: applies SM-2 to a fact and persists the result.

use chrono::{Duration, NaiveDate};
use rusqlite::Connection;

use crate::config;
use crate::db;
use crate::domain::{CardKind, ReviewRecord, WeakKanjiUpdate};

use super::sm2::{calculate_sm2, InvalidQuality};

/// What a grading produced, for UI feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewOutcome {
  pub interval_days: i64,
  pub next_review: NaiveDate,
}

#[derive(Debug)]
pub enum ReviewError {
  InvalidQuality(InvalidQuality),
  Db(rusqlite::Error),
}

impl std::fmt::Display for ReviewError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::InvalidQuality(e) => write!(f, "{}", e),
      Self::Db(e) => write!(f, "review state unavailable: {}", e),
    }
  }
}

impl std::error::Error for ReviewError {}

impl From<InvalidQuality> for ReviewError {
  fn from(e: InvalidQuality) -> Self {
    Self::InvalidQuality(e)
  }
}

impl From<rusqlite::Error> for ReviewError {
  fn from(e: rusqlite::Error) -> Self {
    Self::Db(e)
  }
}

/// Grade one fact and reschedule it.
///
/// Loads the prior record (or SM-2 defaults for a first grading), applies
/// the algorithm, caps the interval when the record ends up weak-kanji
/// marked, and upserts the record with `last_review` set to `today`.
/// On a store failure nothing is written and the prior state stands.
pub fn review_card(
  conn: &Connection,
  kind: CardKind,
  card_id: i64,
  quality: u8,
  weak_kanji: WeakKanjiUpdate,
  today: NaiveDate,
) -> Result<ReviewOutcome, ReviewError> {
  let prior = db::get_review(conn, kind, card_id)?;

  let (repetitions, ease_factor, interval, prior_weak) = match &prior {
    Some(r) => (r.repetitions, r.ease_factor, r.interval_days, r.weak_kanji),
    None => (0, 2.5, 0, false),
  };

  let result = calculate_sm2(quality, repetitions, ease_factor, interval)?;

  // The cap applies whenever the record is weak-marked after this update,
  // whether the flag was just set or carried over.
  let weak_now = weak_kanji.flag().unwrap_or(prior_weak);
  let mut interval_days = result.interval_days;
  if weak_now && interval_days > config::WEAK_KANJI_MAX_INTERVAL {
    interval_days = config::WEAK_KANJI_MAX_INTERVAL;
  }

  let next_review = today + Duration::days(interval_days);

  let record = ReviewRecord {
    card_kind: kind,
    card_id,
    ease_factor: result.ease_factor,
    interval_days,
    repetitions: result.repetitions,
    next_review,
    last_review: Some(today),
    weak_kanji: weak_now,
  };
  db::upsert_review(conn, &record, weak_kanji)?;

  Ok(ReviewOutcome {
    interval_days,
    next_review,
  })
}

/// Self-assessment difficulty attached to an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
  Easy,
  Normal,
  Hard,
}

/// Map answer correctness and difficulty to an SM-2 quality grade.
pub fn quality_from_answer(correct: bool, difficulty: Difficulty) -> u8 {
  match (correct, difficulty) {
    (true, Difficulty::Easy) => 5,
    (true, Difficulty::Normal) => 4,
    (true, Difficulty::Hard) => 3,
    (false, Difficulty::Hard) => 0,
    (false, Difficulty::Normal) => 1,
    (false, Difficulty::Easy) => 2,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::memory_conn;

  fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
  }

  #[test]
  fn test_first_grading_creates_record() {
    let conn = memory_conn();
    let outcome =
      review_card(&conn, CardKind::Vocabulary, 1, 4, WeakKanjiUpdate::Leave, today()).unwrap();

    assert_eq!(outcome.interval_days, 1);
    assert_eq!(outcome.next_review, today() + Duration::days(1));

    let record = db::get_review(&conn, CardKind::Vocabulary, 1).unwrap().unwrap();
    assert_eq!(record.repetitions, 1);
    assert_eq!(record.interval_days, 1);
    assert_eq!(record.last_review, Some(today()));
    assert!(!record.weak_kanji);
  }

  #[test]
  fn test_second_grading_updates_in_place() {
    let conn = memory_conn();
    review_card(&conn, CardKind::Kanji, 7, 4, WeakKanjiUpdate::Leave, today()).unwrap();
    let outcome =
      review_card(&conn, CardKind::Kanji, 7, 4, WeakKanjiUpdate::Leave, today()).unwrap();

    assert_eq!(outcome.interval_days, 6);
    let record = db::get_review(&conn, CardKind::Kanji, 7).unwrap().unwrap();
    assert_eq!(record.repetitions, 2);
  }

  #[test]
  fn test_lapse_resets_record() {
    let conn = memory_conn();
    for _ in 0..4 {
      review_card(&conn, CardKind::Grammar, 3, 5, WeakKanjiUpdate::Leave, today()).unwrap();
    }
    let outcome =
      review_card(&conn, CardKind::Grammar, 3, 1, WeakKanjiUpdate::Leave, today()).unwrap();

    assert_eq!(outcome.interval_days, 1);
    let record = db::get_review(&conn, CardKind::Grammar, 3).unwrap().unwrap();
    assert_eq!(record.repetitions, 0);
  }

  #[test]
  fn test_weak_kanji_caps_interval() {
    let conn = memory_conn();
    // Grow the interval past the cap first
    for _ in 0..4 {
      review_card(&conn, CardKind::Vocabulary, 2, 5, WeakKanjiUpdate::Leave, today()).unwrap();
    }
    let grown = db::get_review(&conn, CardKind::Vocabulary, 2).unwrap().unwrap();
    assert!(grown.interval_days > config::WEAK_KANJI_MAX_INTERVAL);

    let outcome =
      review_card(&conn, CardKind::Vocabulary, 2, 4, WeakKanjiUpdate::Mark, today()).unwrap();
    assert_eq!(outcome.interval_days, config::WEAK_KANJI_MAX_INTERVAL);

    let record = db::get_review(&conn, CardKind::Vocabulary, 2).unwrap().unwrap();
    assert!(record.weak_kanji);
    assert_eq!(record.interval_days, config::WEAK_KANJI_MAX_INTERVAL);
  }

  #[test]
  fn test_weak_kanji_cap_persists_until_cleared() {
    let conn = memory_conn();
    review_card(&conn, CardKind::Vocabulary, 9, 3, WeakKanjiUpdate::Mark, today()).unwrap();

    // Leave must not lift the cap: the stored flag still applies
    for _ in 0..5 {
      let outcome =
        review_card(&conn, CardKind::Vocabulary, 9, 5, WeakKanjiUpdate::Leave, today()).unwrap();
      assert!(outcome.interval_days <= config::WEAK_KANJI_MAX_INTERVAL);
    }

    // Clearing the flag lets the interval grow again
    review_card(&conn, CardKind::Vocabulary, 9, 5, WeakKanjiUpdate::Clear, today()).unwrap();
    let outcome =
      review_card(&conn, CardKind::Vocabulary, 9, 5, WeakKanjiUpdate::Leave, today()).unwrap();
    assert!(outcome.interval_days > config::WEAK_KANJI_MAX_INTERVAL);
    let record = db::get_review(&conn, CardKind::Vocabulary, 9).unwrap().unwrap();
    assert!(!record.weak_kanji);
  }

  #[test]
  fn test_invalid_quality_leaves_state_untouched() {
    let conn = memory_conn();
    review_card(&conn, CardKind::Vocabulary, 4, 4, WeakKanjiUpdate::Leave, today()).unwrap();
    let before = db::get_review(&conn, CardKind::Vocabulary, 4).unwrap().unwrap();

    let err = review_card(&conn, CardKind::Vocabulary, 4, 6, WeakKanjiUpdate::Leave, today());
    assert!(matches!(err, Err(ReviewError::InvalidQuality(_))));

    let after = db::get_review(&conn, CardKind::Vocabulary, 4).unwrap().unwrap();
    assert_eq!(after.repetitions, before.repetitions);
    assert_eq!(after.interval_days, before.interval_days);
  }

  #[test]
  fn test_quality_from_answer_mapping() {
    assert_eq!(quality_from_answer(true, Difficulty::Easy), 5);
    assert_eq!(quality_from_answer(true, Difficulty::Normal), 4);
    assert_eq!(quality_from_answer(true, Difficulty::Hard), 3);
    assert_eq!(quality_from_answer(false, Difficulty::Hard), 0);
    assert_eq!(quality_from_answer(false, Difficulty::Normal), 1);
    assert_eq!(quality_from_answer(false, Difficulty::Easy), 2);
  }
}
