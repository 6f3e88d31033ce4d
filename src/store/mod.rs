//! SQLite persistence for saved translations.
//!
//! One row per `(project, language)` pair is kept by [`Store::save_or_update`],
//! which reads first and then inserts or updates. The table has no
//! uniqueness constraint, so callers going through [`Store::insert`] directly
//! can still create duplicates, and two processes saving the same pair at the
//! same time can lose an update.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

/// A saved translation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRecord {
    pub project: String,
    pub language: String,
    /// Source text at save time. Rows written without one read back empty.
    pub original_text: String,
    pub translation: String,
    pub date_added: DateTime<Utc>,
}

/// What [`Store::save_or_update`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveOutcome {
    Inserted,
    Updated,
}

/// A project's translation for one language, as listed per project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectTranslation {
    pub language: String,
    pub original_text: String,
    pub translation: String,
}

/// Handle on the translations database.
///
/// Holds one connection for the life of the process; every statement
/// commits on its own.
#[derive(Debug)]
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open (creating if needed) the database at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        tracing::debug!(path = %path.display(), "Opened translation store");
        Self::with_connection(conn)
    }

    /// A private in-memory database, gone when the store is dropped.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_db()?;
        Ok(store)
    }

    fn init_db(&self) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS translations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                project TEXT,
                language TEXT,
                original_text TEXT,
                translation TEXT,
                date_added DATETIME
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_translations_project_language
             ON translations(project, language)",
            [],
        )?;
        Ok(())
    }

    pub(crate) fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Insert or overwrite the record for `(project, language)`.
    ///
    /// Sets `date_added` to now either way.
    pub fn save_or_update(
        &self,
        project: &str,
        language: &str,
        original_text: &str,
        translation: &str,
    ) -> Result<SaveOutcome, StoreError> {
        let outcome = if self.get_saved_translation(project, language)?.is_some() {
            self.update(project, language, original_text, translation)?;
            SaveOutcome::Updated
        } else {
            self.insert(project, language, original_text, translation)?;
            SaveOutcome::Inserted
        };
        tracing::info!(
            project = %project,
            language = %language,
            outcome = ?outcome,
            "Saved translation"
        );
        Ok(outcome)
    }

    /// Append a new record, whether or not one already exists for the pair.
    pub fn insert(
        &self,
        project: &str,
        language: &str,
        original_text: &str,
        translation: &str,
    ) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO translations (project, language, original_text, translation, date_added)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![project, language, original_text, translation, Utc::now()],
        )?;
        Ok(())
    }

    /// Overwrite every record for `(project, language)`. Returns rows touched.
    pub fn update(
        &self,
        project: &str,
        language: &str,
        original_text: &str,
        translation: &str,
    ) -> Result<usize, StoreError> {
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE translations
             SET original_text = ?3, translation = ?4, date_added = ?5
             WHERE project = ?1 AND language = ?2",
            params![project, language, original_text, translation, Utc::now()],
        )?;
        Ok(changed)
    }

    /// `(original_text, translation)` saved for the pair, if any.
    pub fn get_saved_translation(
        &self,
        project: &str,
        language: &str,
    ) -> Result<Option<(String, String)>, StoreError> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                "SELECT COALESCE(original_text, ''), COALESCE(translation, '')
                 FROM translations
                 WHERE project = ?1 AND language = ?2
                 ORDER BY id
                 LIMIT 1",
                params![project, language],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;
        Ok(row)
    }

    /// The full record for the pair, if any.
    pub fn get_record(
        &self,
        project: &str,
        language: &str,
    ) -> Result<Option<TranslationRecord>, StoreError> {
        let conn = self.lock()?;
        let record = conn
            .query_row(
                "SELECT project, language, COALESCE(original_text, ''),
                        COALESCE(translation, ''), date_added
                 FROM translations
                 WHERE project = ?1 AND language = ?2
                 ORDER BY id
                 LIMIT 1",
                params![project, language],
                |row| {
                    Ok(TranslationRecord {
                        project: row.get(0)?,
                        language: row.get(1)?,
                        original_text: row.get(2)?,
                        translation: row.get(3)?,
                        date_added: row.get(4)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    /// Every saved translation for `project`, oldest first.
    pub fn get_project_translations(
        &self,
        project: &str,
    ) -> Result<Vec<ProjectTranslation>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT language, COALESCE(original_text, ''), COALESCE(translation, '')
             FROM translations
             WHERE project = ?1
             ORDER BY id",
        )?;
        let rows = stmt.query_map(params![project], |row| {
            Ok(ProjectTranslation {
                language: row.get(0)?,
                original_text: row.get(1)?,
                translation: row.get(2)?,
            })
        })?;
        let translations = rows.collect::<Result<Vec<_>, _>>()?;
        Ok(translations)
    }

    /// Distinct project names in first-saved order.
    pub fn list_projects(&self) -> Result<Vec<String>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT project FROM translations
             WHERE project IS NOT NULL
             GROUP BY project
             ORDER BY MIN(id)",
        )?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        let projects = rows.collect::<Result<Vec<String>, _>>()?;
        Ok(projects)
    }

    /// Number of rows stored for the pair. More than one means the
    /// one-record-per-pair invariant was bypassed.
    pub fn count_records(&self, project: &str, language: &str) -> Result<usize, StoreError> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM translations WHERE project = ?1 AND language = ?2",
            params![project, language],
            |row| row.get(0),
        )?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_save_updates_in_place() {
        let store = Store::open_in_memory().unwrap();
        let first = store.save_or_update("P1", "French", "Hello", "Bonjour").unwrap();
        let second = store.save_or_update("P1", "French", "Hello", "Salut").unwrap();

        assert_eq!(first, SaveOutcome::Inserted);
        assert_eq!(second, SaveOutcome::Updated);
        assert_eq!(store.count_records("P1", "French").unwrap(), 1);
        assert_eq!(
            store.get_saved_translation("P1", "French").unwrap(),
            Some(("Hello".to_string(), "Salut".to_string()))
        );
    }

    #[test]
    fn test_update_overwrites_original_text_and_timestamp() {
        let store = Store::open_in_memory().unwrap();
        store.save_or_update("P1", "German", "Hi", "Hallo").unwrap();
        let before = store.get_record("P1", "German").unwrap().unwrap();

        std::thread::sleep(std::time::Duration::from_millis(5));
        store.save_or_update("P1", "German", "Hi there", "Hallo zusammen").unwrap();
        let after = store.get_record("P1", "German").unwrap().unwrap();

        assert_eq!(after.original_text, "Hi there");
        assert_eq!(after.translation, "Hallo zusammen");
        assert!(after.date_added > before.date_added);
    }

    #[test]
    fn test_project_translations_one_row_per_language() {
        let store = Store::open_in_memory().unwrap();
        store.save_or_update("P1", "French", "Hello", "Bonjour").unwrap();
        store.save_or_update("P1", "Spanish", "Hello", "Hola").unwrap();
        store.save_or_update("P1", "French", "Hello", "Salut").unwrap();
        store.save_or_update("P2", "French", "Bye", "Au revoir").unwrap();

        let rows = store.get_project_translations("P1").unwrap();
        assert_eq!(rows.len(), 2);
        let mut languages: Vec<&str> = rows.iter().map(|r| r.language.as_str()).collect();
        languages.sort_unstable();
        assert_eq!(languages, vec!["French", "Spanish"]);
        assert!(rows.iter().all(|r| r.original_text == "Hello"));
    }

    #[test]
    fn test_pairs_are_independent() {
        let store = Store::open_in_memory().unwrap();
        store.save_or_update("P1", "French", "Hello", "Bonjour").unwrap();
        assert!(store.get_saved_translation("P1", "Spanish").unwrap().is_none());
        assert!(store.get_saved_translation("P2", "French").unwrap().is_none());
        assert!(store.get_record("P2", "French").unwrap().is_none());
    }

    #[test]
    fn test_list_projects_is_distinct() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.list_projects().unwrap().is_empty());
        store.save_or_update("Alpha", "French", "a", "a").unwrap();
        store.save_or_update("Beta", "French", "b", "b").unwrap();
        store.save_or_update("Alpha", "Spanish", "a", "a").unwrap();
        assert_eq!(store.list_projects().unwrap(), vec!["Alpha", "Beta"]);
    }

    #[test]
    fn test_raw_insert_can_duplicate_and_update_touches_all() {
        let store = Store::open_in_memory().unwrap();
        store.insert("P1", "Thai", "x", "one").unwrap();
        store.insert("P1", "Thai", "x", "two").unwrap();
        assert_eq!(store.count_records("P1", "Thai").unwrap(), 2);

        assert_eq!(store.update("P1", "Thai", "y", "three").unwrap(), 2);
        assert_eq!(
            store.get_saved_translation("P1", "Thai").unwrap(),
            Some(("y".to_string(), "three".to_string()))
        );
    }

    #[test]
    fn test_rows_without_original_text_read_back_empty() {
        let store = Store::open_in_memory().unwrap();
        {
            let conn = store.lock().unwrap();
            conn.execute(
                "INSERT INTO translations (project, language, translation, date_added)
                 VALUES ('Legacy', 'Korean', '안녕', ?1)",
                params![Utc::now()],
            )
            .unwrap();
        }
        let rows = store.get_project_translations("Legacy").unwrap();
        assert_eq!(rows[0].original_text, "");
        assert_eq!(rows[0].translation, "안녕");
    }

    #[test]
    fn test_file_store_persists_across_handles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("translations.db");
        {
            let store = Store::open(&path).unwrap();
            store.save_or_update("P1", "Hebrew", "Hello", "שלום").unwrap();
        }
        let reopened = Store::open(&path).unwrap();
        assert_eq!(reopened.list_projects().unwrap(), vec!["P1"]);
        assert_eq!(
            reopened.get_saved_translation("P1", "Hebrew").unwrap().unwrap().1,
            "שלום"
        );
    }
}
