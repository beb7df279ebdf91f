//! Daily study statistics

use chrono::{Duration, NaiveDate};
use rusqlite::{params, Connection, Result};

/// One day of aggregated study activity.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyStats {
    pub date: NaiveDate,
    pub cards_reviewed: i64,
    pub cards_correct: i64,
    pub cards_new: i64,
    pub study_seconds: i64,
}

impl DailyStats {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            cards_reviewed: 0,
            cards_correct: 0,
            cards_new: 0,
            study_seconds: 0,
        }
    }

    pub fn accuracy_percent(&self) -> i64 {
        if self.cards_reviewed == 0 {
            0
        } else {
            (self.cards_correct * 100) / self.cards_reviewed
        }
    }
}

fn row_to_stats(row: &rusqlite::Row) -> Result<DailyStats> {
    let date_str: String = row.get(0)?;
    Ok(DailyStats {
        date: NaiveDate::parse_from_str(&date_str, "%Y-%m-%d").unwrap_or(NaiveDate::MIN),
        cards_reviewed: row.get(1)?,
        cards_correct: row.get(2)?,
        cards_new: row.get(3)?,
        study_seconds: row.get(4)?,
    })
}

/// Fold one graded answer into the day's totals.
pub fn record_answer(
    conn: &Connection,
    date: NaiveDate,
    correct: bool,
    first_time: bool,
) -> Result<()> {
    conn.execute(
        r#"
    INSERT INTO stats (date, cards_reviewed, cards_correct, cards_new)
    VALUES (?1, 1, ?2, ?3)
    ON CONFLICT(date) DO UPDATE SET
      cards_reviewed = cards_reviewed + 1,
      cards_correct = cards_correct + excluded.cards_correct,
      cards_new = cards_new + excluded.cards_new
    "#,
        params![
            date.format("%Y-%m-%d").to_string(),
            correct as i64,
            first_time as i64,
        ],
    )?;
    Ok(())
}

pub fn add_study_seconds(conn: &Connection, date: NaiveDate, seconds: i64) -> Result<()> {
    conn.execute(
        r#"
    INSERT INTO stats (date, study_seconds) VALUES (?1, ?2)
    ON CONFLICT(date) DO UPDATE SET study_seconds = study_seconds + excluded.study_seconds
    "#,
        params![date.format("%Y-%m-%d").to_string(), seconds],
    )?;
    Ok(())
}

pub fn get_stats_for_day(conn: &Connection, date: NaiveDate) -> Result<DailyStats> {
    let mut stmt = conn.prepare(
        "SELECT date, cards_reviewed, cards_correct, cards_new, study_seconds FROM stats WHERE date = ?1",
    )?;
    let mut rows = stmt.query(params![date.format("%Y-%m-%d").to_string()])?;
    if let Some(row) = rows.next()? {
        row_to_stats(row)
    } else {
        Ok(DailyStats::empty(date))
    }
}

/// History for the last `days` days ending at `today`, oldest first.
/// Days with no activity come back as zero rows so charts stay contiguous.
pub fn get_recent_stats(conn: &Connection, today: NaiveDate, days: i64) -> Result<Vec<DailyStats>> {
    let start = today - Duration::days(days - 1);
    let mut stmt = conn.prepare(
        r#"
    SELECT date, cards_reviewed, cards_correct, cards_new, study_seconds
    FROM stats WHERE date >= ?1 AND date <= ?2
    "#,
    )?;
    let stored = stmt
        .query_map(
            params![
                start.format("%Y-%m-%d").to_string(),
                today.format("%Y-%m-%d").to_string()
            ],
            row_to_stats,
        )?
        .collect::<Result<Vec<_>>>()?;

    let mut history = Vec::with_capacity(days as usize);
    for offset in 0..days {
        let date = start + Duration::days(offset);
        let day = stored
            .iter()
            .find(|s| s.date == date)
            .cloned()
            .unwrap_or_else(|| DailyStats::empty(date));
        history.push(day);
    }
    Ok(history)
}

/// Consecutive days with at least one review, counting back from today.
/// A streak survives until a full day is missed, so an empty today still
/// counts yesterday's run.
pub fn get_streak(conn: &Connection, today: NaiveDate) -> Result<i64> {
    let mut stmt =
        conn.prepare("SELECT date FROM stats WHERE cards_reviewed > 0 ORDER BY date DESC")?;
    let dates = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>>>()?;

    let mut streak = 0i64;
    let mut expected = today;
    for date_str in dates {
        let Ok(date) = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d") else {
            continue;
        };
        if date > expected {
            continue;
        }
        if streak == 0 && date == today - Duration::days(1) {
            // Today not studied yet; the streak starts from yesterday
            expected = date;
        }
        if date == expected {
            streak += 1;
            expected -= Duration::days(1);
        } else {
            break;
        }
    }
    Ok(streak)
}
