use serde::{Deserialize, Serialize};

/// JLPT proficiency level, from easiest (N5) to hardest (N1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Level {
  N5,
  N4,
  N3,
  N2,
  N1,
}

impl Level {
  pub const ALL: [Level; 5] = [Level::N5, Level::N4, Level::N3, Level::N2, Level::N1];

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "N5" => Some(Self::N5),
      "N4" => Some(Self::N4),
      "N3" => Some(Self::N3),
      "N2" => Some(Self::N2),
      "N1" => Some(Self::N1),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::N5 => "N5",
      Self::N4 => "N4",
      Self::N3 => "N3",
      Self::N2 => "N2",
      Self::N1 => "N1",
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabEntry {
  pub id: i64,
  pub word: String,
  pub reading: String,
  pub meaning: String,
  pub level: Level,
  pub example_jp: String,
  pub example_en: String,
  pub part_of_speech: String,
}

impl VocabEntry {
  /// Verbs are the only entries the conjugation drill can use.
  pub fn is_verb(&self) -> bool {
    self.part_of_speech == "verb"
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KanjiEntry {
  pub id: i64,
  pub character: String,
  pub on_yomi: String,
  pub kun_yomi: String,
  pub meaning: String,
  pub level: Level,
  pub stroke_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrammarEntry {
  pub id: i64,
  pub pattern: String,
  pub meaning: String,
  pub level: Level,
  pub example_jp: String,
  pub example_en: String,
  pub notes: String,
}
