//! Settings page, backup download, and deck export.

use askama::Template;
use axum::{
  extract::{Query, State},
  http::{header, StatusCode},
  response::{Html, IntoResponse, Redirect},
  Form,
};
use chrono::Local;
use serde::Deserialize;

use crate::db::{self, LogOnError};
use crate::services::{backup, export};
use crate::state::AppState;

use super::{parse_kind, parse_level};

#[derive(Template)]
#[template(path = "settings.html")]
pub struct SettingsTemplate {
  pub tts_enabled: bool,
  pub tts_engine: String,
}

pub async fn settings_page(State(state): State<AppState>) -> Html<String> {
  let tts_enabled = match db::try_lock(&state.db) {
    Ok(conn) => db::tts_enabled(&conn).log_warn_default("tts setting"),
    Err(_) => false,
  };

  let template = SettingsTemplate {
    tts_enabled,
    tts_engine: state
      .tts
      .map(|e| e.name().to_string())
      .unwrap_or_else(|| "none".to_string()),
  };
  Html(template.render().unwrap_or_default())
}

#[derive(Deserialize)]
pub struct SettingsForm {
  #[serde(default)]
  pub tts_enabled: Option<String>,
}

pub async fn update_settings(
  State(state): State<AppState>,
  Form(form): Form<SettingsForm>,
) -> Redirect {
  if let Ok(conn) = db::try_lock(&state.db) {
    db::set_tts_enabled(&conn, form.tts_enabled.is_some()).log_warn("save tts setting");
  }
  Redirect::to("/settings")
}

/// Download a zip archive holding a consistent database snapshot.
pub async fn download_backup(State(state): State<AppState>) -> impl IntoResponse {
  let today = Local::now().date_naive();

  let scratch_dir = state
    .db_path
    .parent()
    .map(|p| p.to_path_buf())
    .unwrap_or_else(std::env::temp_dir);

  let bytes = {
    let Ok(conn) = db::try_lock(&state.db) else {
      return StatusCode::SERVICE_UNAVAILABLE.into_response();
    };
    match backup::create_backup_zip(&conn, &scratch_dir, today) {
      Ok(bytes) => bytes,
      Err(e) => {
        tracing::error!("Backup failed: {}", e);
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
      }
    }
  };

  (
    [
      (header::CONTENT_TYPE, "application/zip".to_string()),
      (
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"{}\"", backup::backup_file_name(today)),
      ),
    ],
    bytes,
  )
    .into_response()
}

#[derive(Deserialize)]
pub struct ExportQuery {
  #[serde(default)]
  pub kind: Option<String>,
  #[serde(default)]
  pub level: Option<String>,
}

/// Download one deck as Anki-importable TSV.
pub async fn download_export(
  State(state): State<AppState>,
  Query(query): Query<ExportQuery>,
) -> impl IntoResponse {
  let kind = parse_kind(query.kind.as_deref().unwrap_or("vocabulary"));
  let level = parse_level(query.level.as_deref());

  let tsv = {
    let Ok(conn) = db::try_lock(&state.db) else {
      return StatusCode::SERVICE_UNAVAILABLE.into_response();
    };
    match export::export_anki_tsv(&conn, kind, level) {
      Ok(tsv) => tsv,
      Err(e) => {
        tracing::error!("Export failed: {}", e);
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
      }
    }
  };

  (
    [
      (header::CONTENT_TYPE, "text/tab-separated-values; charset=utf-8".to_string()),
      (
        header::CONTENT_DISPOSITION,
        format!("attachment; filename=\"{}\"", export::export_file_name(kind)),
      ),
    ],
    tsv,
  )
    .into_response()
}
