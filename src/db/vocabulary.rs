//! Vocabulary table queries

use rusqlite::{params, Connection, Result};

use crate::domain::{CardKind, Level, VocabEntry};

pub(crate) fn row_to_vocab(row: &rusqlite::Row) -> Result<VocabEntry> {
    let level_str: String = row.get(4)?;
    Ok(VocabEntry {
        id: row.get(0)?,
        word: row.get(1)?,
        reading: row.get(2)?,
        meaning: row.get(3)?,
        level: Level::from_str(&level_str).unwrap_or(Level::N5),
        example_jp: row.get(5)?,
        example_en: row.get(6)?,
        part_of_speech: row.get(7)?,
    })
}

const VOCAB_COLUMNS: &str =
    "id, word, reading, meaning, level, example_jp, example_en, part_of_speech";

pub fn insert_vocab(conn: &Connection, entry: &VocabEntry) -> Result<i64> {
    conn.execute(
        r#"
    INSERT INTO vocabulary (word, reading, meaning, level, example_jp, example_en, part_of_speech)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
    "#,
        params![
            entry.word,
            entry.reading,
            entry.meaning,
            entry.level.as_str(),
            entry.example_jp,
            entry.example_en,
            entry.part_of_speech,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_vocab_by_id(conn: &Connection, id: i64) -> Result<Option<VocabEntry>> {
    let query = format!("SELECT {} FROM vocabulary WHERE id = ?1", VOCAB_COLUMNS);
    let mut stmt = conn.prepare(&query)?;
    let mut rows = stmt.query(params![id])?;
    if let Some(row) = rows.next()? {
        Ok(Some(row_to_vocab(row)?))
    } else {
        Ok(None)
    }
}

pub fn get_vocabulary(conn: &Connection, level: Option<Level>) -> Result<Vec<VocabEntry>> {
    let mut query = format!("SELECT {} FROM vocabulary", VOCAB_COLUMNS);
    if level.is_some() {
        query.push_str(" WHERE level = ?1");
    }
    query.push_str(" ORDER BY id");

    let mut stmt = conn.prepare(&query)?;
    let entries = match level {
        Some(level) => stmt
            .query_map(params![level.as_str()], row_to_vocab)?
            .collect::<Result<Vec<_>>>()?,
        None => stmt.query_map([], row_to_vocab)?.collect::<Result<Vec<_>>>()?,
    };
    Ok(entries)
}

pub fn count_vocabulary(conn: &Connection, level: Option<Level>) -> Result<i64> {
    match level {
        Some(level) => conn.query_row(
            "SELECT COUNT(*) FROM vocabulary WHERE level = ?1",
            params![level.as_str()],
            |row| row.get(0),
        ),
        None => conn.query_row("SELECT COUNT(*) FROM vocabulary", [], |row| row.get(0)),
    }
}

/// Vocabulary in the level that has never been graded (no review record).
pub fn get_unreviewed_vocab(conn: &Connection, level: Level, limit: i64) -> Result<Vec<VocabEntry>> {
    let query = format!(
        r#"
    SELECT {} FROM vocabulary v
    LEFT JOIN reviews r ON r.card_kind = ?1 AND r.card_id = v.id
    WHERE r.id IS NULL AND v.level = ?2
    ORDER BY v.id
    LIMIT ?3
    "#,
        "v.id, v.word, v.reading, v.meaning, v.level, v.example_jp, v.example_en, v.part_of_speech"
    );
    let mut stmt = conn.prepare(&query)?;
    let entries = stmt
        .query_map(
            params![CardKind::Vocabulary.as_str(), level.as_str(), limit],
            row_to_vocab,
        )?
        .collect::<Result<Vec<_>>>()?;
    Ok(entries)
}

/// Verbs eligible for the conjugation drill.
pub fn get_verbs(conn: &Connection, level: Option<Level>) -> Result<Vec<VocabEntry>> {
    let mut query = format!(
        "SELECT {} FROM vocabulary WHERE part_of_speech = 'verb'",
        VOCAB_COLUMNS
    );
    if level.is_some() {
        query.push_str(" AND level = ?1");
    }
    query.push_str(" ORDER BY id");

    let mut stmt = conn.prepare(&query)?;
    let entries = match level {
        Some(level) => stmt
            .query_map(params![level.as_str()], row_to_vocab)?
            .collect::<Result<Vec<_>>>()?,
        None => stmt.query_map([], row_to_vocab)?.collect::<Result<Vec<_>>>()?,
    };
    Ok(entries)
}
