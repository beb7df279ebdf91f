//! Application configuration constants.
//!
//! Centralizes all configurable values so they are not hardcoded
//! throughout the codebase.

use serde::Deserialize;
use std::path::PathBuf;

// ==================== Database Configuration ====================

/// Configuration file structure for config.toml
#[derive(Debug, Deserialize)]
struct AppConfig {
    database: Option<DatabaseConfig>,
}

#[derive(Debug, Deserialize)]
struct DatabaseConfig {
    path: Option<String>,
}

/// Load database path with priority: config.toml > .env > default
pub fn load_database_path() -> PathBuf {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Priority 1: config.toml
    if let Ok(contents) = std::fs::read_to_string("config.toml") {
        if let Ok(config) = toml::from_str::<AppConfig>(&contents) {
            if let Some(db) = config.database {
                if let Some(path) = db.path {
                    tracing::info!("Using database from config.toml: {}", path);
                    return PathBuf::from(path);
                }
            }
        }
    }

    // Priority 2: .env DATABASE_PATH
    if let Ok(path) = std::env::var("DATABASE_PATH") {
        tracing::info!("Using database from DATABASE_PATH env: {}", path);
        return PathBuf::from(path);
    }

    // Default
    let default = PathBuf::from(crate::paths::db_path());
    tracing::info!("Using default database path: {}", default.display());
    default
}

// ==================== Server Configuration ====================

/// Server address to bind to
pub const SERVER_ADDR: &str = "127.0.0.1";

/// Server port
pub const SERVER_PORT: u16 = 3000;

/// Get the full server bind address
pub fn server_bind_addr() -> String {
    format!("{}:{}", SERVER_ADDR, SERVER_PORT)
}

// ==================== SRS Configuration ====================

/// A weak-kanji fact never waits longer than this many days
pub const WEAK_KANJI_MAX_INTERVAL: i64 = 3;

/// Interval (days) at which a fact counts as mastered
pub const MASTERED_INTERVAL_DAYS: i64 = 21;

/// Default limit for due-card queries
pub const DUE_CARD_LIMIT: i64 = 50;

/// New cards introduced per vocabulary or kanji study session
pub const NEW_CARD_LIMIT: i64 = 10;

/// New cards introduced per grammar study session (patterns are denser)
pub const NEW_GRAMMAR_LIMIT: i64 = 5;

// ==================== Quiz Configuration ====================

/// Questions per quiz round
pub const QUIZ_QUESTION_COUNT: usize = 10;

/// Number of distractor choices in multiple choice mode
pub const DISTRACTOR_COUNT: usize = 3;

/// Days of history shown on the stats page
pub const STATS_HISTORY_DAYS: i64 = 7;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_bind_addr_format() {
        let addr = server_bind_addr();
        assert!(addr.starts_with(SERVER_ADDR));
        assert!(addr.ends_with(&SERVER_PORT.to_string()));
    }

    #[test]
    fn test_weak_kanji_cap_below_mastery() {
        // The cap only makes sense if it keeps facts out of mastery range
        assert!(WEAK_KANJI_MAX_INTERVAL < MASTERED_INTERVAL_DAYS);
    }
}
