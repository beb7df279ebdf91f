//! Anki-compatible deck export.
//!
//! Produces tab-separated text that Anki's importer accepts directly:
//! one card per line, front TAB back TAB tags. HTML line breaks are used
//! inside fields since TSV cannot hold literal newlines.

use rusqlite::Connection;

use crate::db;
use crate::domain::{CardKind, Level};

fn tsv_field(raw: &str) -> String {
    raw.replace(['\t', '\n', '\r'], " ")
}

fn push_line(out: &mut String, front: &str, back: &str, tags: &str) {
    out.push_str(&tsv_field(front));
    out.push('\t');
    out.push_str(&tsv_field(back));
    out.push('\t');
    out.push_str(tags);
    out.push('\n');
}

fn level_tag(level: Level) -> String {
    format!("jlpt-{}", level.as_str().to_lowercase())
}

/// Export one deck as Anki TSV, optionally restricted to a level.
pub fn export_anki_tsv(
    conn: &Connection,
    kind: CardKind,
    level: Option<Level>,
) -> Result<String, rusqlite::Error> {
    let mut out = String::new();

    match kind {
        CardKind::Vocabulary => {
            for entry in db::get_vocabulary(conn, level)? {
                let mut back = format!("{}<br>{}", entry.reading, entry.meaning);
                if !entry.example_jp.is_empty() {
                    back.push_str("<br><i>");
                    back.push_str(&entry.example_jp);
                    back.push_str("</i>");
                }
                let tags = format!("{} vocabulary", level_tag(entry.level));
                push_line(&mut out, &entry.word, &back, &tags);
            }
        }
        CardKind::Kanji => {
            for entry in db::get_kanji(conn, level)? {
                let back = format!(
                    "{}<br>on: {}<br>kun: {}",
                    entry.meaning, entry.on_yomi, entry.kun_yomi
                );
                let tags = format!("{} kanji", level_tag(entry.level));
                push_line(&mut out, &entry.character, &back, &tags);
            }
        }
        CardKind::Grammar => {
            for entry in db::get_grammar(conn, level)? {
                let mut back = entry.meaning.clone();
                if !entry.example_jp.is_empty() {
                    back.push_str("<br><i>");
                    back.push_str(&entry.example_jp);
                    back.push_str("</i>");
                }
                let tags = format!("{} grammar", level_tag(entry.level));
                push_line(&mut out, &entry.pattern, &back, &tags);
            }
        }
    }

    Ok(out)
}

pub fn export_file_name(kind: CardKind) -> String {
    format!("nihongo_{}.txt", kind.as_str())
}
