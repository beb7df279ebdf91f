//! Versioned schema migrations.
//!
//! Each entry in MIGRATIONS is one idempotent step; PRAGMA user_version
//! records how many have been applied. New databases run all of them in
//! order, existing databases only the tail they are missing.

use rusqlite::{Connection, Result};

const MIGRATIONS: &[&str] = &[
    // v1: initial schema
    r#"
    CREATE TABLE IF NOT EXISTS vocabulary (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      word TEXT NOT NULL,
      reading TEXT NOT NULL,
      meaning TEXT NOT NULL,
      level TEXT NOT NULL CHECK(level IN ('N5','N4','N3','N2','N1')),
      example_jp TEXT NOT NULL DEFAULT '',
      example_en TEXT NOT NULL DEFAULT '',
      part_of_speech TEXT NOT NULL DEFAULT ''
    );

    CREATE TABLE IF NOT EXISTS kanji (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      character TEXT NOT NULL UNIQUE,
      on_yomi TEXT NOT NULL,
      kun_yomi TEXT NOT NULL,
      meaning TEXT NOT NULL,
      level TEXT NOT NULL CHECK(level IN ('N5','N4','N3','N2','N1')),
      stroke_count INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS grammar (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      pattern TEXT NOT NULL UNIQUE,
      meaning TEXT NOT NULL,
      level TEXT NOT NULL CHECK(level IN ('N5','N4','N3','N2','N1')),
      example_jp TEXT NOT NULL DEFAULT '',
      example_en TEXT NOT NULL DEFAULT '',
      notes TEXT NOT NULL DEFAULT ''
    );

    CREATE TABLE IF NOT EXISTS reviews (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      card_kind TEXT NOT NULL CHECK(card_kind IN ('vocabulary','kanji','grammar')),
      card_id INTEGER NOT NULL,
      ease_factor REAL NOT NULL DEFAULT 2.5,
      interval_days INTEGER NOT NULL DEFAULT 0,
      repetitions INTEGER NOT NULL DEFAULT 0,
      next_review TEXT NOT NULL,
      last_review TEXT,
      UNIQUE(card_kind, card_id)
    );

    CREATE TABLE IF NOT EXISTS stats (
      id INTEGER PRIMARY KEY AUTOINCREMENT,
      date TEXT NOT NULL UNIQUE,
      cards_reviewed INTEGER NOT NULL DEFAULT 0,
      cards_correct INTEGER NOT NULL DEFAULT 0,
      cards_new INTEGER NOT NULL DEFAULT 0,
      study_seconds INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS settings (
      key TEXT PRIMARY KEY,
      value TEXT NOT NULL
    );

    INSERT OR IGNORE INTO settings (key, value) VALUES ('tts_enabled', 'true');

    CREATE INDEX IF NOT EXISTS idx_reviews_next ON reviews(next_review);
    CREATE INDEX IF NOT EXISTS idx_reviews_kind ON reviews(card_kind);
    CREATE INDEX IF NOT EXISTS idx_vocab_level ON vocabulary(level);
    CREATE INDEX IF NOT EXISTS idx_kanji_level ON kanji(level);
    CREATE INDEX IF NOT EXISTS idx_grammar_level ON grammar(level);
    "#,
    // v2: weak-kanji flag (knows the reading but not the written form)
    r#"
    ALTER TABLE reviews ADD COLUMN weak_kanji INTEGER NOT NULL DEFAULT 0;
    "#,
];

pub fn run_migrations(conn: &Connection) -> Result<()> {
    let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

    for (i, migration) in MIGRATIONS.iter().enumerate().skip(version as usize) {
        conn.execute_batch(migration)?;
        conn.pragma_update(None, "user_version", (i + 1) as i64)?;
        tracing::debug!("Applied schema migration {}", i + 1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_on_fresh_db() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0)).unwrap();
        assert_eq!(version, MIGRATIONS.len() as i64);

        // weak_kanji arrived in v2 and must be selectable
        conn.prepare("SELECT weak_kanji FROM reviews LIMIT 1").unwrap();
    }

    #[test]
    fn test_migrations_are_rerunnable() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        // Second run must be a no-op, not a duplicate-column error
        run_migrations(&conn).unwrap();
    }

    #[test]
    fn test_upgrade_from_v1() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(MIGRATIONS[0]).unwrap();
        conn.pragma_update(None, "user_version", 1).unwrap();

        run_migrations(&conn).unwrap();
        conn.prepare("SELECT weak_kanji FROM reviews LIMIT 1").unwrap();
    }
}
