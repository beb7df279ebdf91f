//! Answer validation with forgiving matching for Japanese input.
//!
//! Typed answers are accepted whether the learner writes the kanji form or
//! the kana reading, in either kana script, with any width variant the IME
//! produced. Kanji reading answers are checked against every listed on/kun
//! reading.

use unicode_normalization::UnicodeNormalization;

use crate::domain::{KanjiEntry, VocabEntry};

/// Canonical comparison form: NFKC-normalized, whitespace stripped,
/// katakana folded to hiragana.
pub fn normalize_japanese(input: &str) -> String {
  input
    .nfkc()
    .filter(|c| !c.is_whitespace())
    .map(katakana_to_hiragana)
    .collect()
}

fn katakana_to_hiragana(c: char) -> char {
  match c {
    '\u{30A1}'..='\u{30F6}' => {
      char::from_u32(c as u32 - 0x60).unwrap_or(c)
    }
    _ => c,
  }
}

/// A typed vocabulary answer is correct if it matches the word or its reading.
pub fn vocab_answer_correct(input: &str, entry: &VocabEntry) -> bool {
  let input = normalize_japanese(input);
  if input.is_empty() {
    return false;
  }
  input == normalize_japanese(&entry.word) || input == normalize_japanese(&entry.reading)
}

/// Split a reading field into individual accepted readings.
///
/// Dictionary data separates readings with 、 or comma and marks okurigana
/// after a dot (はい.る accepts はい). A lone "-" means no reading of that
/// type exists.
pub fn reading_variants(raw: &str) -> Vec<String> {
  raw
    .split(['、', ',', '・'])
    .map(str::trim)
    .filter(|s| !s.is_empty() && *s != "-")
    .flat_map(|reading| {
      let full: String = reading.chars().filter(|c| *c != '.').collect();
      match reading.split_once('.') {
        Some((stem, _)) if !stem.is_empty() => vec![full, stem.to_string()],
        _ => vec![full],
      }
    })
    .collect()
}

/// A kanji reading answer is correct if it matches any on or kun reading.
pub fn kanji_reading_correct(input: &str, entry: &KanjiEntry) -> bool {
  let input = normalize_japanese(input);
  if input.is_empty() {
    return false;
  }
  reading_variants(&entry.on_yomi)
    .iter()
    .chain(reading_variants(&entry.kun_yomi).iter())
    .any(|reading| normalize_japanese(reading) == input)
}
