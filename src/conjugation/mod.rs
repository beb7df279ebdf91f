//! Japanese verb conjugation engine.
//!
//! Three inflection classes:
//!   - ichidan (一段): drop the final る, append the form suffix
//!   - godan (五段): the final syllable mutates by row (u-row → a/i/e row)
//!   - irregular: する/くる and compounds built on them have fixed forms
//!
//! Pure string functions over syllable data; no I/O and no state beyond
//! the godan exception set carried by [`Conjugator`].

use std::collections::HashSet;

/// Target inflection for [`Conjugator::conjugate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbForm {
  Dictionary,
  Masu,
  Nai,
  Te,
  Ta,
}

impl VerbForm {
  /// Forms the drill asks for (dictionary form is the prompt, not an answer).
  pub const DRILL: [VerbForm; 4] = [VerbForm::Masu, VerbForm::Nai, VerbForm::Te, VerbForm::Ta];

  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "dict" => Some(Self::Dictionary),
      "masu" => Some(Self::Masu),
      "nai" => Some(Self::Nai),
      "te" => Some(Self::Te),
      "ta" => Some(Self::Ta),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Dictionary => "dict",
      Self::Masu => "masu",
      Self::Nai => "nai",
      Self::Te => "te",
      Self::Ta => "ta",
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      Self::Dictionary => "dictionary form",
      Self::Masu => "ます form (polite present)",
      Self::Nai => "ない form (negative)",
      Self::Te => "て form (connective)",
      Self::Ta => "た form (past)",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbClass {
  Ichidan,
  Godan,
  IrregularSuru,
  IrregularKuru,
  SuruCompound,
  KuruCompound,
}

/// Godan row mutations for one dictionary-form final syllable.
struct GodanRow {
  dict: char,
  a_row: char,
  i_row: char,
  te: &'static str,
  ta: &'static str,
}

/// Final syllable → (a-row, i-row, te-form ending, ta-form ending).
///
/// The te/ta endings encode sound assimilation and are a closed lookup,
/// not a computed rule.
const GODAN_ROWS: [GodanRow; 9] = [
  GodanRow { dict: 'う', a_row: 'わ', i_row: 'い', te: "って", ta: "った" },
  GodanRow { dict: 'く', a_row: 'か', i_row: 'き', te: "いて", ta: "いた" },
  GodanRow { dict: 'ぐ', a_row: 'が', i_row: 'ぎ', te: "いで", ta: "いだ" },
  GodanRow { dict: 'す', a_row: 'さ', i_row: 'し', te: "して", ta: "した" },
  GodanRow { dict: 'つ', a_row: 'た', i_row: 'ち', te: "って", ta: "った" },
  GodanRow { dict: 'ぬ', a_row: 'な', i_row: 'に', te: "んで", ta: "んだ" },
  GodanRow { dict: 'ぶ', a_row: 'ば', i_row: 'び', te: "んで", ta: "んだ" },
  GodanRow { dict: 'む', a_row: 'ま', i_row: 'み', te: "んで", ta: "んだ" },
  GodanRow { dict: 'る', a_row: 'ら', i_row: 'り', te: "って", ta: "った" },
];

/// Syllables from the e-row and i-row that can precede る in an ichidan verb.
const ICHIDAN_STEM_ENDINGS: &str = "えけせてねへめれげぜでべぺいきしちにひみりぎじびぴ";

/// Shipped godan exception defaults (verbs that look ichidan but conjugate
/// as godan). Supplied as data so the list can be corrected alongside the
/// vocabulary dataset.
const DEFAULT_EXCEPTIONS_JSON: &str = include_str!("../content/data/godan_exceptions.json");

fn godan_row(c: char) -> Option<&'static GodanRow> {
  GODAN_ROWS.iter().find(|row| row.dict == c)
}

fn last_char(s: &str) -> Option<char> {
  s.chars().next_back()
}

/// Drop the last `n` characters (syllables) of a kana string.
fn drop_chars(s: &str, n: usize) -> &str {
  let keep = s.chars().count().saturating_sub(n);
  match s.char_indices().nth(keep) {
    Some((idx, _)) => &s[..idx],
    None => s,
  }
}

/// Verb classifier and form generator.
///
/// Carries the godan exception lexicon; everything else is fixed syllable
/// tables.
#[derive(Debug, Clone)]
pub struct Conjugator {
  godan_exceptions: HashSet<String>,
}

impl Default for Conjugator {
  fn default() -> Self {
    Self::new()
  }
}

impl Conjugator {
  /// Conjugator with the shipped exception defaults.
  pub fn new() -> Self {
    let godan_exceptions: Vec<String> = serde_json::from_str(DEFAULT_EXCEPTIONS_JSON)
      .expect("embedded godan exception data is valid JSON");
    Self {
      godan_exceptions: godan_exceptions.into_iter().collect(),
    }
  }

  /// Conjugator with a caller-supplied exception set.
  pub fn with_exceptions(godan_exceptions: HashSet<String>) -> Self {
    Self { godan_exceptions }
  }

  /// Shipped defaults, overridden by `godan_exceptions.json` in the data
  /// directory when the user has corrected the list.
  pub fn load(data_dir: &str) -> Self {
    let override_path = format!("{}/godan_exceptions.json", data_dir);
    if let Ok(contents) = std::fs::read_to_string(&override_path) {
      match serde_json::from_str::<Vec<String>>(&contents) {
        Ok(list) => {
          tracing::info!("Loaded {} godan exceptions from {}", list.len(), override_path);
          return Self::with_exceptions(list.into_iter().collect());
        }
        Err(e) => {
          tracing::warn!("Ignoring invalid {}: {}", override_path, e);
        }
      }
    }
    Self::new()
  }

  /// Classify a verb by its dictionary form and reading.
  ///
  /// The exception set must win over the える/いる suffix heuristics:
  /// many common godan verbs (切る, 帰る, 入る...) share the surface
  /// pattern of true ichidan verbs and are only told apart lexically.
  pub fn classify(&self, word: &str, reading: &str) -> VerbClass {
    if reading == "する" || word == "する" {
      return VerbClass::IrregularSuru;
    }
    if reading == "くる" || word == "来る" {
      return VerbClass::IrregularKuru;
    }
    if self.godan_exceptions.contains(word) || self.godan_exceptions.contains(reading) {
      return VerbClass::Godan;
    }
    if reading.ends_with("える") || reading.ends_with("いる") {
      return VerbClass::Ichidan;
    }
    if reading.ends_with('る') {
      let before_ru = last_char(drop_chars(reading, 1));
      if let Some(c) = before_ru {
        if ICHIDAN_STEM_ENDINGS.contains(c) {
          return VerbClass::Ichidan;
        }
      }
    }
    if reading.ends_with("する") || word.ends_with("する") {
      return VerbClass::SuruCompound;
    }
    if reading.ends_with("くる") || word.ends_with("来る") {
      return VerbClass::KuruCompound;
    }
    VerbClass::Godan
  }

  /// Produce the requested surface form, reading-based.
  ///
  /// Best-effort: an empty reading or a final syllable missing from the
  /// godan table returns the reading unchanged instead of failing.
  pub fn conjugate(&self, word: &str, reading: &str, form: VerbForm) -> String {
    if matches!(form, VerbForm::Dictionary) || reading.is_empty() {
      return reading.to_string();
    }

    match self.classify(word, reading) {
      VerbClass::Ichidan => conjugate_ichidan(reading, form),
      VerbClass::Godan => conjugate_godan(word, reading, form),
      VerbClass::IrregularSuru => irregular_suru(form).to_string(),
      VerbClass::IrregularKuru => irregular_kuru(form).to_string(),
      VerbClass::SuruCompound => {
        format!("{}{}", drop_chars(reading, 2), irregular_suru(form))
      }
      VerbClass::KuruCompound => {
        format!("{}{}", drop_chars(reading, 2), irregular_kuru(form))
      }
    }
  }
}

fn conjugate_ichidan(reading: &str, form: VerbForm) -> String {
  let stem = drop_chars(reading, 1);
  let suffix = match form {
    VerbForm::Masu => "ます",
    VerbForm::Nai => "ない",
    VerbForm::Te => "て",
    VerbForm::Ta => "た",
    VerbForm::Dictionary => return reading.to_string(),
  };
  format!("{}{}", stem, suffix)
}

fn conjugate_godan(word: &str, reading: &str, form: VerbForm) -> String {
  // 行く resists the regular く assimilation (いいて would be wrong)
  if reading == "いく" || word == "行く" {
    match form {
      VerbForm::Te => return "いって".to_string(),
      VerbForm::Ta => return "いった".to_string(),
      _ => {}
    }
  }

  let Some(last) = last_char(reading) else {
    return reading.to_string();
  };
  let Some(row) = godan_row(last) else {
    return reading.to_string();
  };
  let stem = drop_chars(reading, 1);

  match form {
    VerbForm::Masu => format!("{}{}ます", stem, row.i_row),
    VerbForm::Nai => {
      // う-final verbs negate with わ, not the plain a-row あ
      if last == 'う' {
        format!("{}わない", stem)
      } else {
        format!("{}{}ない", stem, row.a_row)
      }
    }
    VerbForm::Te => format!("{}{}", stem, row.te),
    VerbForm::Ta => format!("{}{}", stem, row.ta),
    VerbForm::Dictionary => reading.to_string(),
  }
}

fn irregular_suru(form: VerbForm) -> &'static str {
  match form {
    VerbForm::Masu => "します",
    VerbForm::Nai => "しない",
    VerbForm::Te => "して",
    VerbForm::Ta => "した",
    VerbForm::Dictionary => "する",
  }
}

fn irregular_kuru(form: VerbForm) -> &'static str {
  match form {
    VerbForm::Masu => "きます",
    VerbForm::Nai => "こない",
    VerbForm::Te => "きて",
    VerbForm::Ta => "きた",
    VerbForm::Dictionary => "くる",
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn conj() -> Conjugator {
    Conjugator::new()
  }

  #[test]
  fn test_classify_ichidan() {
    assert_eq!(conj().classify("食べる", "たべる"), VerbClass::Ichidan);
    assert_eq!(conj().classify("見る", "みる"), VerbClass::Ichidan);
    assert_eq!(conj().classify("起きる", "おきる"), VerbClass::Ichidan);
  }

  #[test]
  fn test_classify_ichidan_i_row_stems() {
    // Single-character stems sit on the broad kana-row heuristic, not the
    // two-syllable eru/iru suffix check
    assert_eq!(conj().classify("信じる", "しんじる"), VerbClass::Ichidan);
    assert_eq!(conj().classify("浴びる", "あびる"), VerbClass::Ichidan);
    assert_eq!(conj().conjugate("見る", "みる", VerbForm::Masu), "みます");
    assert_eq!(conj().conjugate("起きる", "おきる", VerbForm::Te), "おきて");
  }

  #[test]
  fn test_classify_godan() {
    assert_eq!(conj().classify("飲む", "のむ"), VerbClass::Godan);
    assert_eq!(conj().classify("書く", "かく"), VerbClass::Godan);
    assert_eq!(conj().classify("話す", "はなす"), VerbClass::Godan);
  }

  #[test]
  fn test_classify_exception_overrides_iru_heuristic() {
    // 切る/帰る/入る look ichidan by suffix but conjugate as godan
    assert_eq!(conj().classify("切る", "きる"), VerbClass::Godan);
    assert_eq!(conj().classify("帰る", "かえる"), VerbClass::Godan);
    assert_eq!(conj().classify("入る", "はいる"), VerbClass::Godan);
    assert_eq!(conj().classify("走る", "はしる"), VerbClass::Godan);
  }

  #[test]
  fn test_classify_irregulars() {
    assert_eq!(conj().classify("する", "する"), VerbClass::IrregularSuru);
    assert_eq!(conj().classify("来る", "くる"), VerbClass::IrregularKuru);
    assert_eq!(conj().classify("勉強する", "べんきょうする"), VerbClass::SuruCompound);
    assert_eq!(conj().classify("持って来る", "もってくる"), VerbClass::KuruCompound);
  }

  #[test]
  fn test_conjugate_ichidan() {
    let c = conj();
    assert_eq!(c.conjugate("食べる", "たべる", VerbForm::Masu), "たべます");
    assert_eq!(c.conjugate("食べる", "たべる", VerbForm::Nai), "たべない");
    assert_eq!(c.conjugate("食べる", "たべる", VerbForm::Te), "たべて");
    assert_eq!(c.conjugate("食べる", "たべる", VerbForm::Ta), "たべた");
  }

  #[test]
  fn test_conjugate_godan_rows() {
    let c = conj();
    assert_eq!(c.conjugate("飲む", "のむ", VerbForm::Masu), "のみます");
    assert_eq!(c.conjugate("飲む", "のむ", VerbForm::Te), "のんで");
    assert_eq!(c.conjugate("飲む", "のむ", VerbForm::Ta), "のんだ");
    assert_eq!(c.conjugate("書く", "かく", VerbForm::Te), "かいて");
    assert_eq!(c.conjugate("泳ぐ", "およぐ", VerbForm::Te), "およいで");
    assert_eq!(c.conjugate("話す", "はなす", VerbForm::Te), "はなして");
    assert_eq!(c.conjugate("待つ", "まつ", VerbForm::Te), "まって");
    assert_eq!(c.conjugate("死ぬ", "しぬ", VerbForm::Te), "しんで");
    assert_eq!(c.conjugate("遊ぶ", "あそぶ", VerbForm::Te), "あそんで");
    assert_eq!(c.conjugate("取る", "とる", VerbForm::Te), "とって");
  }

  #[test]
  fn test_conjugate_godan_negative() {
    let c = conj();
    assert_eq!(c.conjugate("飲む", "のむ", VerbForm::Nai), "のまない");
    // う-final: わない, never あない
    assert_eq!(c.conjugate("買う", "かう", VerbForm::Nai), "かわない");
    assert_eq!(c.conjugate("会う", "あう", VerbForm::Nai), "あわない");
  }

  #[test]
  fn test_conjugate_exception_verb_as_godan() {
    let c = conj();
    assert_eq!(c.conjugate("切る", "きる", VerbForm::Masu), "きります");
    assert_eq!(c.conjugate("帰る", "かえる", VerbForm::Te), "かえって");
  }

  #[test]
  fn test_conjugate_iku_special_case() {
    let c = conj();
    assert_eq!(c.conjugate("行く", "いく", VerbForm::Te), "いって");
    assert_eq!(c.conjugate("行く", "いく", VerbForm::Ta), "いった");
    // The other forms follow the regular く row
    assert_eq!(c.conjugate("行く", "いく", VerbForm::Masu), "いきます");
    assert_eq!(c.conjugate("行く", "いく", VerbForm::Nai), "いかない");
  }

  #[test]
  fn test_conjugate_irregulars() {
    let c = conj();
    assert_eq!(c.conjugate("する", "する", VerbForm::Ta), "した");
    assert_eq!(c.conjugate("する", "する", VerbForm::Masu), "します");
    assert_eq!(c.conjugate("来る", "くる", VerbForm::Nai), "こない");
    assert_eq!(c.conjugate("来る", "くる", VerbForm::Masu), "きます");
  }

  #[test]
  fn test_conjugate_compounds() {
    let c = conj();
    assert_eq!(
      c.conjugate("勉強する", "べんきょうする", VerbForm::Masu),
      "べんきょうします"
    );
    assert_eq!(c.conjugate("勉強する", "べんきょうする", VerbForm::Ta), "べんきょうした");
    assert_eq!(c.conjugate("持って来る", "もってくる", VerbForm::Nai), "もってこない");
  }

  #[test]
  fn test_dictionary_form_is_identity() {
    let c = conj();
    for (word, reading) in [
      ("食べる", "たべる"),
      ("飲む", "のむ"),
      ("する", "する"),
      ("来る", "くる"),
      ("勉強する", "べんきょうする"),
    ] {
      assert_eq!(c.conjugate(word, reading, VerbForm::Dictionary), reading);
    }
  }

  #[test]
  fn test_unknown_final_syllable_falls_through() {
    let c = conj();
    // Classified godan by elimination, but ん is not in the godan table:
    // conjugation is a display aid, so the reading passes through unchanged
    assert_eq!(c.conjugate("ん", "ん", VerbForm::Masu), "ん");
    assert_eq!(c.conjugate("", "", VerbForm::Te), "");
  }

  #[test]
  fn test_custom_exception_set() {
    let c = Conjugator::with_exceptions(["ねる".to_string()].into_iter().collect());
    // In the custom set ねる conjugates as godan...
    assert_eq!(c.conjugate("ねる", "ねる", VerbForm::Masu), "ねります");
    // ...and the default exceptions no longer apply
    assert_eq!(c.classify("切る", "きる"), VerbClass::Ichidan);
  }

  #[test]
  fn test_verb_form_roundtrip() {
    for form in [VerbForm::Dictionary, VerbForm::Masu, VerbForm::Nai, VerbForm::Te, VerbForm::Ta] {
      assert_eq!(VerbForm::from_str(form.as_str()), Some(form));
    }
    assert_eq!(VerbForm::from_str("masu-form"), None);
  }
}
