//! Baseline deck seeding from embedded JSON.

use rusqlite::Connection;
use serde::Deserialize;

use crate::db;
use crate::domain::{GrammarEntry, KanjiEntry, Level, VocabEntry};

const VOCAB_N5: &str = include_str!("data/vocab_n5.json");
const KANJI_N5: &str = include_str!("data/kanji_n5.json");
const GRAMMAR_N5: &str = include_str!("data/grammar_n5.json");

#[derive(Debug, Deserialize)]
struct VocabSeed {
    word: String,
    reading: String,
    meaning: String,
    level: String,
    #[serde(default)]
    part_of_speech: String,
    #[serde(default)]
    example_jp: String,
    #[serde(default)]
    example_en: String,
}

#[derive(Debug, Deserialize)]
struct KanjiSeed {
    character: String,
    on_yomi: String,
    kun_yomi: String,
    meaning: String,
    level: String,
    #[serde(default)]
    stroke_count: i64,
}

#[derive(Debug, Deserialize)]
struct GrammarSeed {
    pattern: String,
    meaning: String,
    level: String,
    #[serde(default)]
    example_jp: String,
    #[serde(default)]
    example_en: String,
    #[serde(default)]
    notes: String,
}

#[derive(Debug, Deserialize)]
struct SeedFile<T> {
    entries: Vec<T>,
}

/// Counts of rows inserted by one seeding pass.
#[derive(Debug, Default)]
pub struct SeedReport {
    pub vocabulary: usize,
    pub kanji: usize,
    pub grammar: usize,
}

#[derive(Debug)]
pub enum SeedError {
    Parse(&'static str, serde_json::Error),
    Db(rusqlite::Error),
}

impl std::fmt::Display for SeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeedError::Parse(name, e) => write!(f, "Invalid embedded deck {}: {}", name, e),
            SeedError::Db(e) => write!(f, "Seeding failed: {}", e),
        }
    }
}

impl std::error::Error for SeedError {}

impl From<rusqlite::Error> for SeedError {
    fn from(e: rusqlite::Error) -> Self {
        SeedError::Db(e)
    }
}

fn parse_level(raw: &str) -> Level {
    Level::from_str(raw).unwrap_or(Level::N5)
}

/// Seed the baseline N5 decks into empty tables.
///
/// Each table is seeded independently, so a database that already has
/// vocabulary but no grammar still receives the grammar deck.
pub fn seed_baseline(conn: &Connection) -> Result<SeedReport, SeedError> {
    let mut report = SeedReport::default();

    if db::count_vocabulary(conn, None)? == 0 {
        let file: SeedFile<VocabSeed> = serde_json::from_str(VOCAB_N5)
            .map_err(|e| SeedError::Parse("vocab_n5.json", e))?;
        for seed in file.entries {
            db::insert_vocab(
                conn,
                &VocabEntry {
                    id: 0,
                    word: seed.word,
                    reading: seed.reading,
                    meaning: seed.meaning,
                    level: parse_level(&seed.level),
                    example_jp: seed.example_jp,
                    example_en: seed.example_en,
                    part_of_speech: seed.part_of_speech,
                },
            )?;
            report.vocabulary += 1;
        }
    }

    if db::count_kanji(conn, None)? == 0 {
        let file: SeedFile<KanjiSeed> = serde_json::from_str(KANJI_N5)
            .map_err(|e| SeedError::Parse("kanji_n5.json", e))?;
        for seed in file.entries {
            db::insert_kanji(
                conn,
                &KanjiEntry {
                    id: 0,
                    character: seed.character,
                    on_yomi: seed.on_yomi,
                    kun_yomi: seed.kun_yomi,
                    meaning: seed.meaning,
                    level: parse_level(&seed.level),
                    stroke_count: seed.stroke_count,
                },
            )?;
            report.kanji += 1;
        }
    }

    if db::count_grammar(conn, None)? == 0 {
        let file: SeedFile<GrammarSeed> = serde_json::from_str(GRAMMAR_N5)
            .map_err(|e| SeedError::Parse("grammar_n5.json", e))?;
        for seed in file.entries {
            db::insert_grammar(
                conn,
                &GrammarEntry {
                    id: 0,
                    pattern: seed.pattern,
                    meaning: seed.meaning,
                    level: parse_level(&seed.level),
                    example_jp: seed.example_jp,
                    example_en: seed.example_en,
                    notes: seed.notes,
                },
            )?;
            report.grammar += 1;
        }
    }

    if report.vocabulary + report.kanji + report.grammar > 0 {
        tracing::info!(
            "Seeded baseline decks: {} vocabulary, {} kanji, {} grammar",
            report.vocabulary,
            report.kanji,
            report.grammar
        );
    }

    Ok(report)
}
