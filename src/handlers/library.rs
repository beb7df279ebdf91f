//! Deck browsing and search.

use askama::Template;
use axum::{
  extract::{Query, State},
  response::Html,
};
use serde::Deserialize;

use crate::db::{self, LogOnError};
use crate::domain::{CardKind, GrammarEntry, KanjiEntry, Level, VocabEntry};
use crate::state::AppState;

use super::{parse_kind, parse_level};

const SEARCH_LIMIT: i64 = 50;

#[derive(Template)]
#[template(path = "browse.html")]
pub struct BrowseTemplate {
  pub kind: String,
  pub level: String,
  pub levels: Vec<String>,
  pub vocabulary: Vec<VocabEntry>,
  pub kanji: Vec<KanjiEntry>,
  pub grammar: Vec<GrammarEntry>,
  pub count: usize,
}

#[derive(Deserialize)]
pub struct BrowseQuery {
  #[serde(default)]
  pub kind: Option<String>,
  #[serde(default)]
  pub level: Option<String>,
}

pub async fn browse(
  State(state): State<AppState>,
  Query(query): Query<BrowseQuery>,
) -> Html<String> {
  let kind = parse_kind(query.kind.as_deref().unwrap_or("vocabulary"));
  let level = parse_level(query.level.as_deref());

  let Ok(conn) = db::try_lock(&state.db) else {
    return Html(String::new());
  };

  let mut template = BrowseTemplate {
    kind: kind.as_str().to_string(),
    level: level.map(|l| l.as_str().to_string()).unwrap_or_else(|| "all".to_string()),
    levels: Level::ALL.iter().map(|l| l.as_str().to_string()).collect(),
    vocabulary: Vec::new(),
    kanji: Vec::new(),
    grammar: Vec::new(),
    count: 0,
  };
  match kind {
    CardKind::Vocabulary => {
      template.vocabulary = db::get_vocabulary(&conn, level).log_warn_default("browse vocabulary");
      template.count = template.vocabulary.len();
    }
    CardKind::Kanji => {
      template.kanji = db::get_kanji(&conn, level).log_warn_default("browse kanji");
      template.count = template.kanji.len();
    }
    CardKind::Grammar => {
      template.grammar = db::get_grammar(&conn, level).log_warn_default("browse grammar");
      template.count = template.grammar.len();
    }
  }

  Html(template.render().unwrap_or_default())
}

#[derive(Template)]
#[template(path = "search.html")]
pub struct SearchTemplate {
  pub query: String,
  pub vocabulary: Vec<VocabEntry>,
  pub kanji: Vec<KanjiEntry>,
  pub grammar: Vec<GrammarEntry>,
  pub total: usize,
}

#[derive(Deserialize)]
pub struct SearchQuery {
  #[serde(default)]
  pub q: String,
}

pub async fn search(
  State(state): State<AppState>,
  Query(query): Query<SearchQuery>,
) -> Html<String> {
  let Ok(conn) = db::try_lock(&state.db) else {
    return Html(String::new());
  };

  let results = db::search_all(&conn, &query.q, SEARCH_LIMIT).log_warn_default("search");
  let template = SearchTemplate {
    query: query.q,
    total: results.total(),
    vocabulary: results.vocabulary,
    kanji: results.kanji,
    grammar: results.grammar,
  };
  Html(template.render().unwrap_or_default())
}
