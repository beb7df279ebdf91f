use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which table a review record points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardKind {
  Vocabulary,
  Kanji,
  Grammar,
}

impl CardKind {
  pub const ALL: [CardKind; 3] = [CardKind::Vocabulary, CardKind::Kanji, CardKind::Grammar];

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "vocabulary" => Some(Self::Vocabulary),
      "kanji" => Some(Self::Kanji),
      "grammar" => Some(Self::Grammar),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Vocabulary => "vocabulary",
      Self::Kanji => "kanji",
      Self::Grammar => "grammar",
    }
  }
}

/// Per-fact SM-2 scheduling state, keyed by (card_kind, card_id).
///
/// A record exists only once the fact has been graded at least once;
/// unreviewed facts are "new" and have no row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewRecord {
  pub card_kind: CardKind,
  pub card_id: i64,
  pub ease_factor: f64,
  pub interval_days: i64,
  pub repetitions: i64,
  pub next_review: NaiveDate,
  pub last_review: Option<NaiveDate>,
  /// Learner knows the pronunciation but not the written form; caps
  /// the interval so the kanji resurfaces quickly.
  pub weak_kanji: bool,
}

/// How a grading should touch the stored weak-kanji flag.
///
/// The original persisted this as a nullable integer whose NULL meant
/// "leave unchanged"; the three cases are explicit here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeakKanjiUpdate {
  /// Keep whatever the record already says.
  Leave,
  /// Written form is known too; clear the flag.
  Clear,
  /// Pronunciation known, written form not; set the flag.
  Mark,
}

impl WeakKanjiUpdate {
  /// The flag value to store, or None to preserve the existing one.
  pub fn flag(&self) -> Option<bool> {
    match self {
      Self::Leave => None,
      Self::Clear => Some(false),
      Self::Mark => Some(true),
    }
  }
}

/// Progress label shown next to a card during study.
pub fn status_label(record: Option<&ReviewRecord>) -> &'static str {
  match record {
    None => "new",
    Some(r) if r.repetitions == 0 => "relearning",
    Some(r) if r.interval_days < 7 => "learning",
    Some(r) if r.interval_days < 30 => "known",
    Some(_) => "mastered",
  }
}
