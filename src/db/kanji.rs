//! Kanji table queries

use rusqlite::{params, Connection, Result};

use crate::domain::{CardKind, KanjiEntry, Level};

pub(crate) fn row_to_kanji(row: &rusqlite::Row) -> Result<KanjiEntry> {
    let level_str: String = row.get(4)?;
    Ok(KanjiEntry {
        id: row.get(0)?,
        character: row.get(1)?,
        on_yomi: row.get(2)?,
        kun_yomi: row.get(3)?,
        meaning: row.get(5)?,
        level: Level::from_str(&level_str).unwrap_or(Level::N5),
        stroke_count: row.get(6)?,
    })
}

const KANJI_COLUMNS: &str = "id, character, on_yomi, kun_yomi, level, meaning, stroke_count";

pub fn insert_kanji(conn: &Connection, entry: &KanjiEntry) -> Result<i64> {
    conn.execute(
        r#"
    INSERT INTO kanji (character, on_yomi, kun_yomi, meaning, level, stroke_count)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    "#,
        params![
            entry.character,
            entry.on_yomi,
            entry.kun_yomi,
            entry.meaning,
            entry.level.as_str(),
            entry.stroke_count,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_kanji_by_id(conn: &Connection, id: i64) -> Result<Option<KanjiEntry>> {
    let query = format!("SELECT {} FROM kanji WHERE id = ?1", KANJI_COLUMNS);
    let mut stmt = conn.prepare(&query)?;
    let mut rows = stmt.query(params![id])?;
    if let Some(row) = rows.next()? {
        Ok(Some(row_to_kanji(row)?))
    } else {
        Ok(None)
    }
}

pub fn get_kanji(conn: &Connection, level: Option<Level>) -> Result<Vec<KanjiEntry>> {
    let mut query = format!("SELECT {} FROM kanji", KANJI_COLUMNS);
    if level.is_some() {
        query.push_str(" WHERE level = ?1");
    }
    query.push_str(" ORDER BY id");

    let mut stmt = conn.prepare(&query)?;
    let entries = match level {
        Some(level) => stmt
            .query_map(params![level.as_str()], row_to_kanji)?
            .collect::<Result<Vec<_>>>()?,
        None => stmt.query_map([], row_to_kanji)?.collect::<Result<Vec<_>>>()?,
    };
    Ok(entries)
}

pub fn count_kanji(conn: &Connection, level: Option<Level>) -> Result<i64> {
    match level {
        Some(level) => conn.query_row(
            "SELECT COUNT(*) FROM kanji WHERE level = ?1",
            params![level.as_str()],
            |row| row.get(0),
        ),
        None => conn.query_row("SELECT COUNT(*) FROM kanji", [], |row| row.get(0)),
    }
}

pub fn get_unreviewed_kanji(conn: &Connection, level: Level, limit: i64) -> Result<Vec<KanjiEntry>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT k.id, k.character, k.on_yomi, k.kun_yomi, k.level, k.meaning, k.stroke_count
    FROM kanji k
    LEFT JOIN reviews r ON r.card_kind = ?1 AND r.card_id = k.id
    WHERE r.id IS NULL AND k.level = ?2
    ORDER BY k.id
    LIMIT ?3
    "#,
    )?;
    let entries = stmt
        .query_map(
            params![CardKind::Kanji.as_str(), level.as_str(), limit],
            row_to_kanji,
        )?
        .collect::<Result<Vec<_>>>()?;
    Ok(entries)
}
