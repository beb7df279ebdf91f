//! Substring search across all content tables

use rusqlite::{params, Connection, Result};

use crate::domain::{GrammarEntry, KanjiEntry, VocabEntry};

use super::grammar::row_to_grammar;
use super::kanji::row_to_kanji;
use super::vocabulary::row_to_vocab;

#[derive(Debug, Default)]
pub struct SearchResults {
    pub vocabulary: Vec<VocabEntry>,
    pub kanji: Vec<KanjiEntry>,
    pub grammar: Vec<GrammarEntry>,
}

impl SearchResults {
    pub fn total(&self) -> usize {
        self.vocabulary.len() + self.kanji.len() + self.grammar.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Case-insensitive substring match against Japanese text and English
/// meanings in all three tables. A blank query returns nothing.
pub fn search_all(conn: &Connection, query: &str, limit: i64) -> Result<SearchResults> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(SearchResults::default());
    }
    let pattern = format!("%{}%", query.replace('%', "\\%").replace('_', "\\_"));

    let mut stmt = conn.prepare(
        r#"
    SELECT id, word, reading, meaning, level, example_jp, example_en, part_of_speech
    FROM vocabulary
    WHERE word LIKE ?1 ESCAPE '\' OR reading LIKE ?1 ESCAPE '\' OR meaning LIKE ?1 ESCAPE '\'
    ORDER BY id LIMIT ?2
    "#,
    )?;
    let vocabulary = stmt
        .query_map(params![pattern, limit], row_to_vocab)?
        .collect::<Result<Vec<_>>>()?;

    let mut stmt = conn.prepare(
        r#"
    SELECT id, character, on_yomi, kun_yomi, level, meaning, stroke_count
    FROM kanji
    WHERE character LIKE ?1 ESCAPE '\' OR on_yomi LIKE ?1 ESCAPE '\'
       OR kun_yomi LIKE ?1 ESCAPE '\' OR meaning LIKE ?1 ESCAPE '\'
    ORDER BY id LIMIT ?2
    "#,
    )?;
    let kanji = stmt
        .query_map(params![pattern, limit], row_to_kanji)?
        .collect::<Result<Vec<_>>>()?;

    let mut stmt = conn.prepare(
        r#"
    SELECT id, pattern, meaning, level, example_jp, example_en, notes
    FROM grammar
    WHERE pattern LIKE ?1 ESCAPE '\' OR meaning LIKE ?1 ESCAPE '\'
    ORDER BY id LIMIT ?2
    "#,
    )?;
    let grammar = stmt
        .query_map(params![pattern, limit], row_to_grammar)?
        .collect::<Result<Vec<_>>>()?;

    Ok(SearchResults {
        vocabulary,
        kanji,
        grammar,
    })
}
