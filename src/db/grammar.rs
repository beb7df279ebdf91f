//! Grammar pattern table queries

use rusqlite::{params, Connection, Result};

use crate::domain::{CardKind, GrammarEntry, Level};

pub(crate) fn row_to_grammar(row: &rusqlite::Row) -> Result<GrammarEntry> {
    let level_str: String = row.get(3)?;
    Ok(GrammarEntry {
        id: row.get(0)?,
        pattern: row.get(1)?,
        meaning: row.get(2)?,
        level: Level::from_str(&level_str).unwrap_or(Level::N5),
        example_jp: row.get(4)?,
        example_en: row.get(5)?,
        notes: row.get(6)?,
    })
}

const GRAMMAR_COLUMNS: &str = "id, pattern, meaning, level, example_jp, example_en, notes";

pub fn insert_grammar(conn: &Connection, entry: &GrammarEntry) -> Result<i64> {
    conn.execute(
        r#"
    INSERT INTO grammar (pattern, meaning, level, example_jp, example_en, notes)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    "#,
        params![
            entry.pattern,
            entry.meaning,
            entry.level.as_str(),
            entry.example_jp,
            entry.example_en,
            entry.notes,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_grammar_by_id(conn: &Connection, id: i64) -> Result<Option<GrammarEntry>> {
    let query = format!("SELECT {} FROM grammar WHERE id = ?1", GRAMMAR_COLUMNS);
    let mut stmt = conn.prepare(&query)?;
    let mut rows = stmt.query(params![id])?;
    if let Some(row) = rows.next()? {
        Ok(Some(row_to_grammar(row)?))
    } else {
        Ok(None)
    }
}

pub fn get_grammar(conn: &Connection, level: Option<Level>) -> Result<Vec<GrammarEntry>> {
    let mut query = format!("SELECT {} FROM grammar", GRAMMAR_COLUMNS);
    if level.is_some() {
        query.push_str(" WHERE level = ?1");
    }
    query.push_str(" ORDER BY id");

    let mut stmt = conn.prepare(&query)?;
    let entries = match level {
        Some(level) => stmt
            .query_map(params![level.as_str()], row_to_grammar)?
            .collect::<Result<Vec<_>>>()?,
        None => stmt.query_map([], row_to_grammar)?.collect::<Result<Vec<_>>>()?,
    };
    Ok(entries)
}

pub fn count_grammar(conn: &Connection, level: Option<Level>) -> Result<i64> {
    match level {
        Some(level) => conn.query_row(
            "SELECT COUNT(*) FROM grammar WHERE level = ?1",
            params![level.as_str()],
            |row| row.get(0),
        ),
        None => conn.query_row("SELECT COUNT(*) FROM grammar", [], |row| row.get(0)),
    }
}

pub fn get_unreviewed_grammar(
    conn: &Connection,
    level: Level,
    limit: i64,
) -> Result<Vec<GrammarEntry>> {
    let mut stmt = conn.prepare(
        r#"
    SELECT g.id, g.pattern, g.meaning, g.level, g.example_jp, g.example_en, g.notes
    FROM grammar g
    LEFT JOIN reviews r ON r.card_kind = ?1 AND r.card_id = g.id
    WHERE r.id IS NULL AND g.level = ?2
    ORDER BY g.id
    LIMIT ?3
    "#,
    )?;
    let entries = stmt
        .query_map(
            params![CardKind::Grammar.as_str(), level.as_str(), limit],
            row_to_grammar,
        )?
        .collect::<Result<Vec<_>>>()?;
    Ok(entries)
}
