//! Key/value settings storage

use rusqlite::{params, Connection, Result};

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let mut stmt = conn.prepare("SELECT value FROM settings WHERE key = ?1")?;
    let mut rows = stmt.query(params![key])?;
    if let Some(row) = rows.next()? {
        Ok(Some(row.get(0)?))
    } else {
        Ok(None)
    }
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        r#"
    INSERT INTO settings (key, value) VALUES (?1, ?2)
    ON CONFLICT(key) DO UPDATE SET value = excluded.value
    "#,
        params![key, value],
    )?;
    Ok(())
}

pub fn tts_enabled(conn: &Connection) -> Result<bool> {
    Ok(get_setting(conn, "tts_enabled")?.as_deref() != Some("false"))
}

pub fn set_tts_enabled(conn: &Connection, enabled: bool) -> Result<()> {
    set_setting(conn, "tts_enabled", if enabled { "true" } else { "false" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::memory_conn;

    #[test]
    fn test_set_and_get() {
        let conn = memory_conn();
        assert!(get_setting(&conn, "missing").unwrap().is_none());

        set_setting(&conn, "study_level", "N4").unwrap();
        assert_eq!(get_setting(&conn, "study_level").unwrap().unwrap(), "N4");

        set_setting(&conn, "study_level", "N3").unwrap();
        assert_eq!(get_setting(&conn, "study_level").unwrap().unwrap(), "N3");
    }

    #[test]
    fn test_tts_enabled_by_default() {
        let conn = memory_conn();
        assert!(tts_enabled(&conn).unwrap());

        set_tts_enabled(&conn, false).unwrap();
        assert!(!tts_enabled(&conn).unwrap());

        set_tts_enabled(&conn, true).unwrap();
        assert!(tts_enabled(&conn).unwrap());
    }
}
