//! SQLite-backed vocabulary collection.
//!
//! Owns the learner's words, their SM-2 review state and the app's simulated
//! calendar day. Scheduling itself stays in [`crate::models::sm2`]; the store
//! only loads items, hands them to the scheduler and writes the result back.

use crate::error::{Result, VocabError};
use crate::models::sm2::{self, initialize, select_due};
use crate::models::{NewWord, Quality, SrsState, Status, VocabularyItem, WordContent};
use chrono::{Days, NaiveDate};
use rusqlite::{Connection, OptionalExtension, Row, params};
use std::path::Path;
use tracing::{debug, info, warn};

const ITEM_COLUMNS: &str = "id, status, content, last_reviewed, next_review, interval_days, easiness_factor, repetitions";

/// Number of words per learner status.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub new: usize,
    pub learning: usize,
    pub known: usize,
}

impl StatusCounts {
    pub fn total(&self) -> usize {
        self.new + self.learning + self.known
    }
}

/// Collection of vocabulary items persisted in SQLite.
///
/// A single connection backs the store, so callers that share it across
/// threads must serialize access themselves.
pub struct VocabularyStore {
    conn: Connection,
}

impl VocabularyStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "opening vocabulary store");
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    /// Creates tables for vocabulary items and app state.
    /// Sets the current date to today if not already initialized.
    fn init(conn: Connection) -> Result<Self> {
        // `seq` keeps the collection in insertion order
        conn.execute(
            "CREATE TABLE IF NOT EXISTS vocabulary (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                id TEXT NOT NULL UNIQUE,
                word TEXT NOT NULL UNIQUE,
                status TEXT NOT NULL,
                content TEXT NOT NULL,
                last_reviewed TEXT,
                next_review TEXT,
                interval_days INTEGER NOT NULL DEFAULT 1,
                easiness_factor REAL NOT NULL DEFAULT 2.5,
                repetitions INTEGER NOT NULL DEFAULT 0
            )",
            (),
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS app_state (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            (),
        )?;

        conn.execute(
            "INSERT OR IGNORE INTO app_state (key, value) VALUES ('current_date', ?1)",
            params![sm2::local_today()],
        )?;

        Ok(Self { conn })
    }

    /// The day the store schedules against. Starts at the real date and only
    /// moves through [`advance_day`](Self::advance_day) or
    /// [`set_current_date`](Self::set_current_date).
    pub fn current_date(&self) -> Result<NaiveDate> {
        let date = self.conn.query_row(
            "SELECT value FROM app_state WHERE key = 'current_date'",
            [],
            |row| row.get(0),
        )?;
        Ok(date)
    }

    pub fn set_current_date(&self, date: NaiveDate) -> Result<()> {
        self.conn.execute(
            "UPDATE app_state SET value = ?1 WHERE key = 'current_date'",
            params![date],
        )?;
        debug!(%date, "current date set");
        Ok(())
    }

    /// Moves the calendar forward by one day (for testing spaced repetition).
    pub fn advance_day(&self) -> Result<NaiveDate> {
        let next_day = self
            .current_date()?
            .checked_add_days(Days::new(1))
            .unwrap_or(NaiveDate::MAX);
        self.set_current_date(next_day)?;
        Ok(next_day)
    }

    /// Adds a freshly generated word with default review state.
    ///
    /// If the word is already in the collection it is left untouched and the
    /// stored item is returned instead.
    pub fn add_word(&self, content: WordContent) -> Result<VocabularyItem> {
        let word = content.word.clone();
        if let Some(existing) = self.find_by_word(&word)? {
            debug!(%word, "word already stored");
            return Ok(existing);
        }

        let item = initialize(NewWord::new(content));
        self.insert(&item)?;
        info!(id = %item.id, %word, "word added");
        Ok(item)
    }

    fn insert(&self, item: &VocabularyItem) -> Result<()> {
        let srs = item.srs();
        self.conn.execute(
            "INSERT INTO vocabulary (id, word, status, content, last_reviewed, next_review, interval_days, easiness_factor, repetitions)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                item.id,
                item.content.word,
                item.status().as_str(),
                serde_json::to_string(&item.content)?,
                srs.review.last_reviewed(),
                srs.review.next_review(),
                srs.interval,
                srs.easiness,
                srs.repetitions,
            ],
        )?;
        Ok(())
    }

    /// Inserts `item`, or replaces the stored item with the same word.
    /// A replaced item keeps its position in the collection.
    pub fn upsert(&self, item: &VocabularyItem) -> Result<()> {
        let srs = item.srs();
        self.conn.execute(
            "INSERT INTO vocabulary (id, word, status, content, last_reviewed, next_review, interval_days, easiness_factor, repetitions)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(word) DO UPDATE SET
                id = excluded.id,
                status = excluded.status,
                content = excluded.content,
                last_reviewed = excluded.last_reviewed,
                next_review = excluded.next_review,
                interval_days = excluded.interval_days,
                easiness_factor = excluded.easiness_factor,
                repetitions = excluded.repetitions",
            params![
                item.id,
                item.content.word,
                item.status().as_str(),
                serde_json::to_string(&item.content)?,
                srs.review.last_reviewed(),
                srs.review.next_review(),
                srs.interval,
                srs.easiness,
                srs.repetitions,
            ],
        )?;
        debug!(id = %item.id, word = %item.content.word, "item upserted");
        Ok(())
    }

    /// Writes back an item that is already stored.
    pub fn save(&self, item: &VocabularyItem) -> Result<()> {
        let srs = item.srs();
        let updated = self.conn.execute(
            "UPDATE vocabulary
             SET word = ?1, status = ?2, content = ?3, last_reviewed = ?4, next_review = ?5,
                 interval_days = ?6, easiness_factor = ?7, repetitions = ?8
             WHERE id = ?9",
            params![
                item.content.word,
                item.status().as_str(),
                serde_json::to_string(&item.content)?,
                srs.review.last_reviewed(),
                srs.review.next_review(),
                srs.interval,
                srs.easiness,
                srs.repetitions,
                item.id,
            ],
        )?;

        if updated == 0 {
            return Err(VocabError::UnknownItem(item.id.clone()));
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<VocabularyItem> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {ITEM_COLUMNS} FROM vocabulary WHERE id = ?1"),
                params![id],
                ItemRow::from_row,
            )
            .optional()?;

        match row {
            Some(row) => row.into_item(),
            None => Err(VocabError::UnknownItem(id.to_string())),
        }
    }

    pub fn find_by_word(&self, word: &str) -> Result<Option<VocabularyItem>> {
        self.conn
            .query_row(
                &format!("SELECT {ITEM_COLUMNS} FROM vocabulary WHERE word = ?1"),
                params![word],
                ItemRow::from_row,
            )
            .optional()?
            .map(ItemRow::into_item)
            .transpose()
    }

    /// Loads the whole collection in insertion order.
    pub fn load_all(&self) -> Result<Vec<VocabularyItem>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {ITEM_COLUMNS} FROM vocabulary ORDER BY seq"))?;

        let rows = stmt
            .query_map([], ItemRow::from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(ItemRow::into_item).collect()
    }

    pub fn delete(&self, id: &str) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM vocabulary WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(VocabError::UnknownItem(id.to_string()));
        }
        info!(%id, "word deleted");
        Ok(())
    }

    /// Learner toggles a word between learning and known.
    pub fn set_status(&self, id: &str, status: Status) -> Result<VocabularyItem> {
        let mut item = self.get(id)?;
        item.set_status(status)?;
        self.save(&item)?;
        Ok(item)
    }

    /// Marks a word as known and records a perfect recall for today.
    pub fn mark_known(&self, id: &str) -> Result<VocabularyItem> {
        let mut item = self.get(id)?;
        item.mark_known(self.current_date()?)?;
        self.save(&item)?;
        Ok(item)
    }

    pub fn grade(&self, id: &str, quality: Quality) -> Result<VocabularyItem> {
        let mut item = self.get(id)?;
        sm2::grade(&mut item, quality, self.current_date()?);
        self.save(&item)?;
        Ok(item)
    }

    /// Words to practice today, learning words first.
    pub fn practice_pool(&self, limit: usize) -> Result<Vec<VocabularyItem>> {
        let today = self.current_date()?;
        let all = self.load_all()?;
        let pool: Vec<VocabularyItem> = select_due(&all, limit, today).into_iter().cloned().collect();
        debug!(%today, limit, selected = pool.len(), "practice pool built");
        Ok(pool)
    }

    /// Grades every word of a finished practice round with the same quality.
    /// Ids that are no longer stored are skipped. Returns how many were graded.
    pub fn record_practice(&self, ids: &[String], quality: Quality) -> Result<usize> {
        let today = self.current_date()?;
        let tx = self.conn.unchecked_transaction()?;
        let mut graded = 0;

        for id in ids {
            let mut item = match self.get(id) {
                Ok(item) => item,
                Err(VocabError::UnknownItem(_)) => {
                    warn!(%id, "practiced word no longer stored, skipping");
                    continue;
                }
                Err(e) => return Err(e),
            };
            sm2::grade(&mut item, quality, today);
            self.save(&item)?;
            graded += 1;
        }

        tx.commit()?;
        info!(graded, %quality, "practice recorded");
        Ok(graded)
    }

    /// Merges imported items into the collection, matching on word text.
    pub fn import_items(&self, items: &[VocabularyItem]) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        for item in items {
            self.upsert(item)?;
        }
        tx.commit()?;
        info!(count = items.len(), "items imported");
        Ok(items.len())
    }

    pub fn status_counts(&self) -> Result<StatusCounts> {
        let mut stmt = self
            .conn
            .prepare("SELECT status, COUNT(*) FROM vocabulary GROUP BY status")?;
        let rows = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut counts = StatusCounts::default();
        for (status, count) in rows {
            let count = usize::try_from(count).unwrap_or_default();
            match status.parse::<Status>() {
                Ok(Status::New) => counts.new = count,
                Ok(Status::Learning) => counts.learning = count,
                Ok(Status::Known) => counts.known = count,
                Err(reason) => warn!(%reason, "ignoring rows with unknown status"),
            }
        }
        Ok(counts)
    }
}

/// Raw column values of one `vocabulary` row, validated by `into_item`.
struct ItemRow {
    id: String,
    status: String,
    content: String,
    last_reviewed: Option<NaiveDate>,
    next_review: Option<NaiveDate>,
    interval: u32,
    easiness: f64,
    repetitions: u32,
}

impl ItemRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            status: row.get(1)?,
            content: row.get(2)?,
            last_reviewed: row.get(3)?,
            next_review: row.get(4)?,
            interval: row.get(5)?,
            easiness: row.get(6)?,
            repetitions: row.get(7)?,
        })
    }

    fn into_item(self) -> Result<VocabularyItem> {
        let status = self
            .status
            .parse::<Status>()
            .map_err(|reason| VocabError::MalformedItem {
                id: self.id.clone(),
                reason,
            })?;
        let content: WordContent = serde_json::from_str(&self.content)?;
        let srs = SrsState::from_parts(
            &self.id,
            self.last_reviewed,
            self.next_review,
            self.interval,
            self.easiness,
            self.repetitions,
        )?;
        Ok(VocabularyItem::restore(self.id, status, content, srs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn store_on(date: NaiveDate) -> VocabularyStore {
        let store = VocabularyStore::open_in_memory().unwrap();
        store.set_current_date(date).unwrap();
        store
    }

    #[test]
    fn test_current_date_starts_today_and_advances() {
        let store = VocabularyStore::open_in_memory().unwrap();
        assert_eq!(store.current_date().unwrap(), sm2::local_today());

        store.set_current_date(day(2024, 2, 28)).unwrap();
        assert_eq!(store.advance_day().unwrap(), day(2024, 2, 29));
        assert_eq!(store.current_date().unwrap(), day(2024, 2, 29));
    }

    #[test]
    fn test_add_word_initializes_and_ignores_duplicates() {
        let store = store_on(day(2024, 1, 1));
        let first = store.add_word(WordContent::new("der Apfel", "apple")).unwrap();
        let again = store.add_word(WordContent::new("der Apfel", "apple (fruit)")).unwrap();

        assert_eq!(first.id, again.id);
        assert_eq!(again.content.translation, "apple");
        assert_eq!(first.status(), Status::New);
        assert_eq!(first.srs(), &SrsState::default());
        assert_eq!(store.load_all().unwrap().len(), 1);
    }

    #[test]
    fn test_sqlite_round_trip_keeps_srs_fields() {
        let store = store_on(day(2024, 10, 27));
        let item = store.add_word(WordContent::new("die Uhr", "clock")).unwrap();
        store.set_status(&item.id, Status::Known).unwrap();
        for _ in 0..3 {
            store.grade(&item.id, Quality::new(4).unwrap()).unwrap();
            store.advance_day().unwrap();
        }
        let graded = store.grade(&item.id, Quality::PASS).unwrap();

        let loaded = store.get(&item.id).unwrap();
        assert_eq!(loaded, graded);
        assert_eq!(loaded.last_reviewed(), Some(day(2024, 10, 30)));
        assert_eq!(loaded.easiness().to_bits(), graded.easiness().to_bits());
    }

    #[test]
    fn test_upsert_replaces_by_word_and_keeps_order() {
        let store = store_on(day(2024, 1, 1));
        store.add_word(WordContent::new("eins", "one")).unwrap();
        store.add_word(WordContent::new("zwei", "two")).unwrap();

        let mut replacement = initialize(NewWord::new(WordContent::new("eins", "one (number)")));
        replacement.mark_known(day(2024, 1, 1)).unwrap();
        store.upsert(&replacement).unwrap();

        let all = store.load_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, replacement.id);
        assert_eq!(all[0].content.translation, "one (number)");
        assert_eq!(all[0].status(), Status::Known);
        assert_eq!(all[1].content.word, "zwei");
    }

    #[test]
    fn test_unknown_ids() {
        let store = store_on(day(2024, 1, 1));
        assert!(matches!(store.get("missing"), Err(VocabError::UnknownItem(_))));
        assert!(matches!(store.delete("missing"), Err(VocabError::UnknownItem(_))));
        assert!(matches!(
            store.grade("missing", Quality::PERFECT),
            Err(VocabError::UnknownItem(_))
        ));
    }

    #[test]
    fn test_set_status_rejects_return_to_new() {
        let store = store_on(day(2024, 1, 1));
        let item = store.add_word(WordContent::new("rot", "red")).unwrap();
        store.set_status(&item.id, Status::Learning).unwrap();

        let err = store.set_status(&item.id, Status::New).unwrap_err();
        assert!(matches!(err, VocabError::InvalidTransition { .. }));
        assert_eq!(store.get(&item.id).unwrap().status(), Status::Learning);
    }

    #[test]
    fn test_practice_pool_follows_due_selection() {
        let store = store_on(day(2024, 3, 1));
        let a = store.add_word(WordContent::new("A", "a")).unwrap();
        let b = store.add_word(WordContent::new("B", "b")).unwrap();
        let c = store.add_word(WordContent::new("C", "c")).unwrap();
        let d = store.add_word(WordContent::new("D", "d")).unwrap();
        store.add_word(WordContent::new("E", "still new")).unwrap();

        store.set_status(&a.id, Status::Learning).unwrap();
        store.set_status(&d.id, Status::Learning).unwrap();
        // B is due on 3/2, C on 3/8 after its second review
        store.mark_known(&b.id).unwrap();
        store.mark_known(&c.id).unwrap();
        store.advance_day().unwrap();
        store.grade(&c.id, Quality::PERFECT).unwrap();
        store.set_current_date(day(2024, 3, 5)).unwrap();

        let ids: Vec<String> = store
            .practice_pool(sm2::DEFAULT_DUE_LIMIT)
            .unwrap()
            .into_iter()
            .map(|item| item.id)
            .collect();
        assert_eq!(ids, vec![a.id.clone(), d.id.clone(), b.id.clone()]);

        let limited = store.practice_pool(1).unwrap();
        assert_eq!(limited.len(), 1);
        assert_eq!(limited[0].id, a.id);
    }

    #[test]
    fn test_record_practice_grades_and_skips_missing() {
        let store = store_on(day(2024, 4, 1));
        let a = store.add_word(WordContent::new("A", "a")).unwrap();
        let b = store.add_word(WordContent::new("B", "b")).unwrap();

        let ids = vec![a.id.clone(), "gone".to_string(), b.id.clone()];
        let graded = store.record_practice(&ids, Quality::PERFECT).unwrap();

        assert_eq!(graded, 2);
        for id in [&a.id, &b.id] {
            let item = store.get(id).unwrap();
            assert_eq!(item.repetitions(), 1);
            assert_eq!(item.next_review(), Some(day(2024, 4, 2)));
        }
    }

    #[test]
    fn test_status_counts() {
        let store = store_on(day(2024, 1, 1));
        let a = store.add_word(WordContent::new("A", "a")).unwrap();
        let b = store.add_word(WordContent::new("B", "b")).unwrap();
        store.add_word(WordContent::new("C", "c")).unwrap();
        store.set_status(&a.id, Status::Learning).unwrap();
        store.mark_known(&b.id).unwrap();

        let counts = store.status_counts().unwrap();
        assert_eq!(
            counts,
            StatusCounts {
                new: 1,
                learning: 1,
                known: 1
            }
        );
        assert_eq!(counts.total(), 3);
    }

    #[test]
    fn test_corrupted_row_is_reported() {
        let store = store_on(day(2024, 1, 1));
        let item = store.add_word(WordContent::new("kaputt", "broken")).unwrap();
        store
            .conn
            .execute(
                "UPDATE vocabulary SET interval_days = 0 WHERE id = ?1",
                params![item.id],
            )
            .unwrap();

        assert!(matches!(
            store.get(&item.id),
            Err(VocabError::MalformedItem { .. })
        ));
    }
}
