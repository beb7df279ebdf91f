//! Test utilities shared across database and scheduler tests.
//!
//! Helpers reuse the authoritative migrations so test schemas can never
//! drift from production.

use chrono::NaiveDate;
use rusqlite::Connection;
use std::path::Path;
use tempfile::TempDir;

use crate::domain::{CardKind, GrammarEntry, KanjiEntry, Level, ReviewRecord, VocabEntry};

/// In-memory database with the full schema applied.
pub fn memory_conn() -> Connection {
    let conn = Connection::open_in_memory().expect("open in-memory database");
    crate::db::run_migrations(&conn).expect("run migrations");
    conn
}

/// Test environment with an on-disk database in a temporary directory,
/// cleaned up on drop. Used where code under test touches the filesystem.
pub struct TestEnv {
    pub temp: TempDir,
    pub conn: Connection,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("create temp dir");
        let db_path = temp.path().join("nihongo.db");
        let conn = Connection::open(&db_path).expect("open test database");
        crate::db::run_migrations(&conn).expect("run migrations");
        Self { temp, conn }
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    pub fn db_path(&self) -> std::path::PathBuf {
        self.temp.path().join("nihongo.db")
    }
}

pub fn vocab(word: &str, reading: &str, meaning: &str, level: Level, pos: &str) -> VocabEntry {
    VocabEntry {
        id: 0,
        word: word.to_string(),
        reading: reading.to_string(),
        meaning: meaning.to_string(),
        level,
        example_jp: String::new(),
        example_en: String::new(),
        part_of_speech: pos.to_string(),
    }
}

pub fn kanji(character: &str, on: &str, kun: &str, meaning: &str, level: Level) -> KanjiEntry {
    KanjiEntry {
        id: 0,
        character: character.to_string(),
        on_yomi: on.to_string(),
        kun_yomi: kun.to_string(),
        meaning: meaning.to_string(),
        level,
        stroke_count: 0,
    }
}

pub fn grammar(pattern: &str, meaning: &str, level: Level) -> GrammarEntry {
    GrammarEntry {
        id: 0,
        pattern: pattern.to_string(),
        meaning: meaning.to_string(),
        level,
        example_jp: String::new(),
        example_en: String::new(),
        notes: String::new(),
    }
}

pub fn review(kind: CardKind, card_id: i64, next_review: NaiveDate, weak_kanji: bool) -> ReviewRecord {
    ReviewRecord {
        card_kind: kind,
        card_id,
        ease_factor: 2.5,
        interval_days: 1,
        repetitions: 1,
        next_review,
        last_review: None,
        weak_kanji,
    }
}
