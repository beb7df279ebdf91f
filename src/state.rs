//! Application state shared by all handlers.

use std::path::PathBuf;
use std::sync::Arc;

use crate::conjugation::Conjugator;
use crate::db::DbPool;
use crate::services::tts::TtsEngine;

/// State passed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    /// Path of the live database file, needed for backup archives
    pub db_path: PathBuf,
    /// Conjugator with the loaded godan exception set
    pub conjugator: Arc<Conjugator>,
    /// Speech engine found at startup, if any
    pub tts: Option<TtsEngine>,
}

impl AppState {
    pub fn new(
        db: DbPool,
        db_path: PathBuf,
        conjugator: Conjugator,
        tts: Option<TtsEngine>,
    ) -> Self {
        Self {
            db,
            db_path,
            conjugator: Arc::new(conjugator),
            tts,
        }
    }
}
