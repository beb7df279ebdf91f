//! Review scheduling state queries

use chrono::NaiveDate;
use rusqlite::{params, Connection, Result};

use crate::domain::{CardKind, ReviewRecord, WeakKanjiUpdate};

fn row_to_review(row: &rusqlite::Row) -> Result<ReviewRecord> {
    let kind_str: String = row.get(0)?;
    let next_str: String = row.get(5)?;
    let last_str: Option<String> = row.get(6)?;
    Ok(ReviewRecord {
        card_kind: CardKind::from_str(&kind_str).unwrap_or(CardKind::Vocabulary),
        card_id: row.get(1)?,
        ease_factor: row.get(2)?,
        interval_days: row.get(3)?,
        repetitions: row.get(4)?,
        next_review: NaiveDate::parse_from_str(&next_str, "%Y-%m-%d")
            .unwrap_or(NaiveDate::MIN),
        last_review: last_str
            .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
        weak_kanji: row.get::<_, i64>(7)? != 0,
    })
}

const REVIEW_COLUMNS: &str =
    "card_kind, card_id, ease_factor, interval_days, repetitions, next_review, last_review, weak_kanji";

pub fn get_review(conn: &Connection, kind: CardKind, card_id: i64) -> Result<Option<ReviewRecord>> {
    let query = format!(
        "SELECT {} FROM reviews WHERE card_kind = ?1 AND card_id = ?2",
        REVIEW_COLUMNS
    );
    let mut stmt = conn.prepare(&query)?;
    let mut rows = stmt.query(params![kind.as_str(), card_id])?;
    if let Some(row) = rows.next()? {
        Ok(Some(row_to_review(row)?))
    } else {
        Ok(None)
    }
}

/// Insert or update the scheduling row for a card.
///
/// On conflict the weak-kanji column is only overwritten when the caller
/// asked for a change; `WeakKanjiUpdate::Leave` preserves whatever the row
/// already holds.
pub fn upsert_review(
    conn: &Connection,
    record: &ReviewRecord,
    weak_kanji: WeakKanjiUpdate,
) -> Result<()> {
    let next = record.next_review.format("%Y-%m-%d").to_string();
    let last = record.last_review.map(|d| d.format("%Y-%m-%d").to_string());

    match weak_kanji.flag() {
        Some(flag) => {
            conn.execute(
                r#"
    INSERT INTO reviews (card_kind, card_id, ease_factor, interval_days, repetitions, next_review, last_review, weak_kanji)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
    ON CONFLICT(card_kind, card_id) DO UPDATE SET
      ease_factor = excluded.ease_factor,
      interval_days = excluded.interval_days,
      repetitions = excluded.repetitions,
      next_review = excluded.next_review,
      last_review = excluded.last_review,
      weak_kanji = excluded.weak_kanji
    "#,
                params![
                    record.card_kind.as_str(),
                    record.card_id,
                    record.ease_factor,
                    record.interval_days,
                    record.repetitions,
                    next,
                    last,
                    flag as i64,
                ],
            )?;
        }
        None => {
            conn.execute(
                r#"
    INSERT INTO reviews (card_kind, card_id, ease_factor, interval_days, repetitions, next_review, last_review, weak_kanji)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
    ON CONFLICT(card_kind, card_id) DO UPDATE SET
      ease_factor = excluded.ease_factor,
      interval_days = excluded.interval_days,
      repetitions = excluded.repetitions,
      next_review = excluded.next_review,
      last_review = excluded.last_review
    "#,
                params![
                    record.card_kind.as_str(),
                    record.card_id,
                    record.ease_factor,
                    record.interval_days,
                    record.repetitions,
                    next,
                    last,
                    record.weak_kanji as i64,
                ],
            )?;
        }
    }
    Ok(())
}

/// Cards due on or before `today`, weak-kanji cards first, then oldest due date.
pub fn get_due_reviews(
    conn: &Connection,
    kind: Option<CardKind>,
    today: NaiveDate,
    limit: i64,
) -> Result<Vec<ReviewRecord>> {
    let today_str = today.format("%Y-%m-%d").to_string();
    let mut query = format!(
        "SELECT {} FROM reviews WHERE next_review <= ?1",
        REVIEW_COLUMNS
    );
    if kind.is_some() {
        query.push_str(" AND card_kind = ?3");
    }
    query.push_str(" ORDER BY weak_kanji DESC, next_review ASC LIMIT ?2");

    let mut stmt = conn.prepare(&query)?;
    let records = match kind {
        Some(kind) => stmt
            .query_map(params![today_str, limit, kind.as_str()], row_to_review)?
            .collect::<Result<Vec<_>>>()?,
        None => stmt
            .query_map(params![today_str, limit], row_to_review)?
            .collect::<Result<Vec<_>>>()?,
    };
    Ok(records)
}

pub fn count_due(conn: &Connection, kind: Option<CardKind>, today: NaiveDate) -> Result<i64> {
    let today_str = today.format("%Y-%m-%d").to_string();
    match kind {
        Some(kind) => conn.query_row(
            "SELECT COUNT(*) FROM reviews WHERE next_review <= ?1 AND card_kind = ?2",
            params![today_str, kind.as_str()],
            |row| row.get(0),
        ),
        None => conn.query_row(
            "SELECT COUNT(*) FROM reviews WHERE next_review <= ?1",
            params![today_str],
            |row| row.get(0),
        ),
    }
}

/// Cards with at least one successful repetition behind them.
pub fn count_learned(conn: &Connection, kind: Option<CardKind>) -> Result<i64> {
    match kind {
        Some(kind) => conn.query_row(
            "SELECT COUNT(*) FROM reviews WHERE repetitions > 0 AND card_kind = ?1",
            params![kind.as_str()],
            |row| row.get(0),
        ),
        None => conn.query_row(
            "SELECT COUNT(*) FROM reviews WHERE repetitions > 0",
            [],
            |row| row.get(0),
        ),
    }
}

/// Cards whose interval has grown past the mastery threshold.
pub fn count_mastered(conn: &Connection, kind: Option<CardKind>) -> Result<i64> {
    let threshold = crate::config::MASTERED_INTERVAL_DAYS;
    match kind {
        Some(kind) => conn.query_row(
            "SELECT COUNT(*) FROM reviews WHERE interval_days >= ?1 AND card_kind = ?2",
            params![threshold, kind.as_str()],
            |row| row.get(0),
        ),
        None => conn.query_row(
            "SELECT COUNT(*) FROM reviews WHERE interval_days >= ?1",
            params![threshold],
            |row| row.get(0),
        ),
    }
}

/// Count of weak-kanji cards, regardless of due date.
pub fn count_weak_kanji(conn: &Connection) -> Result<i64> {
    conn.query_row(
        "SELECT COUNT(*) FROM reviews WHERE weak_kanji = 1",
        [],
        |row| row.get(0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{memory_conn, review};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_upsert_then_get() {
        let conn = memory_conn();
        let record = review(CardKind::Vocabulary, 1, date("2026-03-01"), false);
        upsert_review(&conn, &record, WeakKanjiUpdate::Leave).unwrap();

        let loaded = get_review(&conn, CardKind::Vocabulary, 1).unwrap().unwrap();
        assert_eq!(loaded.next_review, date("2026-03-01"));
        assert!(!loaded.weak_kanji);

        // Same card id under a different kind is a separate row
        assert!(get_review(&conn, CardKind::Kanji, 1).unwrap().is_none());
    }

    #[test]
    fn test_leave_preserves_weak_kanji() {
        let conn = memory_conn();
        let record = review(CardKind::Kanji, 7, date("2026-03-01"), true);
        upsert_review(&conn, &record, WeakKanjiUpdate::Mark).unwrap();

        // A later update that leaves the flag alone must not clear it
        let mut record = review(CardKind::Kanji, 7, date("2026-03-05"), false);
        record.repetitions = 2;
        upsert_review(&conn, &record, WeakKanjiUpdate::Leave).unwrap();

        let loaded = get_review(&conn, CardKind::Kanji, 7).unwrap().unwrap();
        assert!(loaded.weak_kanji);
        assert_eq!(loaded.repetitions, 2);
        assert_eq!(loaded.next_review, date("2026-03-05"));
    }

    #[test]
    fn test_clear_weak_kanji() {
        let conn = memory_conn();
        let record = review(CardKind::Kanji, 7, date("2026-03-01"), true);
        upsert_review(&conn, &record, WeakKanjiUpdate::Mark).unwrap();

        let record = review(CardKind::Kanji, 7, date("2026-03-05"), false);
        upsert_review(&conn, &record, WeakKanjiUpdate::Clear).unwrap();

        let loaded = get_review(&conn, CardKind::Kanji, 7).unwrap().unwrap();
        assert!(!loaded.weak_kanji);
    }

    #[test]
    fn test_due_ordering_weak_first_then_oldest() {
        let conn = memory_conn();
        let today = date("2026-03-10");

        upsert_review(
            &conn,
            &review(CardKind::Vocabulary, 1, date("2026-03-08"), false),
            WeakKanjiUpdate::Leave,
        )
        .unwrap();
        upsert_review(
            &conn,
            &review(CardKind::Vocabulary, 2, date("2026-03-10"), true),
            WeakKanjiUpdate::Mark,
        )
        .unwrap();
        upsert_review(
            &conn,
            &review(CardKind::Vocabulary, 3, date("2026-03-09"), false),
            WeakKanjiUpdate::Leave,
        )
        .unwrap();
        // Not due yet
        upsert_review(
            &conn,
            &review(CardKind::Vocabulary, 4, date("2026-03-11"), false),
            WeakKanjiUpdate::Leave,
        )
        .unwrap();

        let due = get_due_reviews(&conn, None, today, 50).unwrap();
        let ids: Vec<i64> = due.iter().map(|r| r.card_id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
        assert_eq!(count_due(&conn, None, today).unwrap(), 3);
    }

    #[test]
    fn test_due_filter_by_kind_and_limit() {
        let conn = memory_conn();
        let today = date("2026-03-10");

        for id in 1..=3 {
            upsert_review(
                &conn,
                &review(CardKind::Vocabulary, id, date("2026-03-01"), false),
                WeakKanjiUpdate::Leave,
            )
            .unwrap();
        }
        upsert_review(
            &conn,
            &review(CardKind::Grammar, 1, date("2026-03-01"), false),
            WeakKanjiUpdate::Leave,
        )
        .unwrap();

        assert_eq!(
            get_due_reviews(&conn, Some(CardKind::Grammar), today, 50)
                .unwrap()
                .len(),
            1
        );
        assert_eq!(get_due_reviews(&conn, None, today, 2).unwrap().len(), 2);
    }

    #[test]
    fn test_counts() {
        let conn = memory_conn();

        let mut mastered = review(CardKind::Vocabulary, 1, date("2026-04-01"), false);
        mastered.repetitions = 5;
        mastered.interval_days = 30;
        upsert_review(&conn, &mastered, WeakKanjiUpdate::Leave).unwrap();

        let mut learning = review(CardKind::Vocabulary, 2, date("2026-03-11"), true);
        learning.repetitions = 1;
        learning.interval_days = 1;
        upsert_review(&conn, &learning, WeakKanjiUpdate::Mark).unwrap();

        assert_eq!(count_learned(&conn, None).unwrap(), 2);
        assert_eq!(count_mastered(&conn, None).unwrap(), 1);
        assert_eq!(count_weak_kanji(&conn).unwrap(), 1);
    }
}
