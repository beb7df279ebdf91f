//! Portable backup archives of the study database.
//!
//! ## Archive format
//! ```text
//! nihongo_backup_{date}.zip
//! ├── nihongo.db     # consistent snapshot (VACUUM INTO)
//! └── manifest.json  # format version, app version, content counts
//! ```
//!
//! Restore validates the archive before touching the live file and expects
//! the caller to reopen its connection afterwards.

use chrono::NaiveDate;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};
use std::io::{Read as IoRead, Write as IoWrite};
use std::path::Path;
use zip::write::SimpleFileOptions;

use crate::db;

/// Backup manifest format version
pub const MANIFEST_VERSION: u32 = 1;

const DB_ENTRY_NAME: &str = "nihongo.db";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupManifest {
    /// Format version for future compatibility
    pub format_version: u32,
    /// Date of the backup (YYYY-MM-DD)
    pub created_at: String,
    /// Application version at backup time
    pub app_version: String,
    pub vocabulary_count: i64,
    pub kanji_count: i64,
    pub grammar_count: i64,
}

#[derive(Debug)]
pub enum BackupError {
    Io(std::io::Error),
    Db(rusqlite::Error),
    Zip(zip::result::ZipError),
    Json(serde_json::Error),
    /// Archive is missing an entry or holds something that is not SQLite
    InvalidArchive(&'static str),
}

impl std::fmt::Display for BackupError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackupError::Io(e) => write!(f, "Backup IO error: {}", e),
            BackupError::Db(e) => write!(f, "Backup database error: {}", e),
            BackupError::Zip(e) => write!(f, "Backup archive error: {}", e),
            BackupError::Json(e) => write!(f, "Backup manifest error: {}", e),
            BackupError::InvalidArchive(reason) => write!(f, "Invalid backup archive: {}", reason),
        }
    }
}

impl std::error::Error for BackupError {}

impl From<std::io::Error> for BackupError {
    fn from(e: std::io::Error) -> Self {
        BackupError::Io(e)
    }
}

impl From<rusqlite::Error> for BackupError {
    fn from(e: rusqlite::Error) -> Self {
        BackupError::Db(e)
    }
}

impl From<zip::result::ZipError> for BackupError {
    fn from(e: zip::result::ZipError) -> Self {
        BackupError::Zip(e)
    }
}

impl From<serde_json::Error> for BackupError {
    fn from(e: serde_json::Error) -> Self {
        BackupError::Json(e)
    }
}

pub fn build_manifest(conn: &Connection, today: NaiveDate) -> Result<BackupManifest, BackupError> {
    Ok(BackupManifest {
        format_version: MANIFEST_VERSION,
        created_at: today.format("%Y-%m-%d").to_string(),
        app_version: env!("CARGO_PKG_VERSION").to_string(),
        vocabulary_count: db::count_vocabulary(conn, None)?,
        kanji_count: db::count_kanji(conn, None)?,
        grammar_count: db::count_grammar(conn, None)?,
    })
}

/// Build a backup archive in memory.
///
/// Takes a VACUUM INTO snapshot in `scratch_dir` so the archive holds a
/// consistent image even while the connection stays open.
pub fn create_backup_zip(
    conn: &Connection,
    scratch_dir: &Path,
    today: NaiveDate,
) -> Result<Vec<u8>, BackupError> {
    let snapshot_path = scratch_dir.join("backup_snapshot.db");
    if snapshot_path.exists() {
        std::fs::remove_file(&snapshot_path)?;
    }
    db::backup_database(conn, &snapshot_path)?;

    let db_bytes = std::fs::read(&snapshot_path)?;
    std::fs::remove_file(&snapshot_path).ok();

    let manifest = build_manifest(conn, today)?;
    let manifest_json = serde_json::to_string_pretty(&manifest)?;

    let mut zip_buffer = Vec::new();
    {
        let mut zip = zip::ZipWriter::new(std::io::Cursor::new(&mut zip_buffer));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        zip.start_file(DB_ENTRY_NAME, options)?;
        zip.write_all(&db_bytes)?;

        zip.start_file("manifest.json", options)?;
        zip.write_all(manifest_json.as_bytes())?;

        zip.finish()?;
    }

    Ok(zip_buffer)
}

pub fn backup_file_name(today: NaiveDate) -> String {
    format!("nihongo_backup_{}.zip", today.format("%Y-%m-%d"))
}

/// Pull the manifest and database image out of a backup archive.
pub fn extract_backup_zip(bytes: &[u8]) -> Result<(BackupManifest, Vec<u8>), BackupError> {
    if !is_zip_file(bytes) {
        return Err(BackupError::InvalidArchive("not a zip file"));
    }

    let reader = std::io::Cursor::new(bytes);
    let mut zip = zip::ZipArchive::new(reader)?;

    let manifest: BackupManifest = {
        let mut manifest_file = zip
            .by_name("manifest.json")
            .map_err(|_| BackupError::InvalidArchive("manifest.json missing"))?;
        let mut manifest_json = String::new();
        manifest_file.read_to_string(&mut manifest_json)?;
        serde_json::from_str(&manifest_json)?
    };

    let mut db_bytes = Vec::new();
    {
        let mut db_file = zip
            .by_name(DB_ENTRY_NAME)
            .map_err(|_| BackupError::InvalidArchive("database image missing"))?;
        db_file.read_to_end(&mut db_bytes)?;
    }

    if !is_sqlite_file(&db_bytes) {
        return Err(BackupError::InvalidArchive("database entry is not SQLite"));
    }

    Ok((manifest, db_bytes))
}

/// Replace the database file with the image from a backup archive.
///
/// Validates the image opens and passes an integrity check before the live
/// file is overwritten. Any open connection to `db_path` must be reopened
/// by the caller afterwards.
pub fn restore_database(bytes: &[u8], db_path: &Path) -> Result<BackupManifest, BackupError> {
    let (manifest, db_bytes) = extract_backup_zip(bytes)?;

    let staging_path = db_path.with_extension("db.restore");
    std::fs::write(&staging_path, &db_bytes)?;

    let check = (|| -> Result<String, rusqlite::Error> {
        let conn = Connection::open(&staging_path)?;
        conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))
    })();
    match check {
        Ok(result) if result == "ok" => {}
        Ok(_) | Err(_) => {
            std::fs::remove_file(&staging_path).ok();
            return Err(BackupError::InvalidArchive("integrity check failed"));
        }
    }

    std::fs::rename(&staging_path, db_path)?;
    tracing::info!("Restored database from backup dated {}", manifest.created_at);
    Ok(manifest)
}

pub fn is_zip_file(bytes: &[u8]) -> bool {
    bytes.starts_with(b"PK\x03\x04")
}

pub fn is_sqlite_file(bytes: &[u8]) -> bool {
    bytes.starts_with(b"SQLite format 3\0")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::insert_vocab;
    use crate::domain::Level;
    use crate::testing::{vocab, TestEnv};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_is_zip_file() {
        assert!(is_zip_file(b"PK\x03\x04rest"));
        assert!(!is_zip_file(b"notazip"));
    }

    #[test]
    fn test_backup_round_trip() {
        let env = TestEnv::new();
        insert_vocab(&env.conn, &vocab("水", "みず", "water", Level::N5, "noun")).unwrap();

        let today = date("2026-03-10");
        let bytes = create_backup_zip(&env.conn, env.path(), today).unwrap();
        assert!(is_zip_file(&bytes));

        let (manifest, db_bytes) = extract_backup_zip(&bytes).unwrap();
        assert_eq!(manifest.format_version, MANIFEST_VERSION);
        assert_eq!(manifest.vocabulary_count, 1);
        assert_eq!(manifest.created_at, "2026-03-10");
        assert!(is_sqlite_file(&db_bytes));
    }

    #[test]
    fn test_restore_replaces_database() {
        let env = TestEnv::new();
        insert_vocab(&env.conn, &vocab("水", "みず", "water", Level::N5, "noun")).unwrap();
        let bytes = create_backup_zip(&env.conn, env.path(), date("2026-03-10")).unwrap();

        let target = env.path().join("restored.db");
        restore_database(&bytes, &target).unwrap();

        let conn = Connection::open(&target).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM vocabulary", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_restore_rejects_garbage() {
        let env = TestEnv::new();
        let target = env.path().join("restored.db");
        assert!(restore_database(b"not an archive", &target).is_err());
        assert!(!target.exists());
    }
}
