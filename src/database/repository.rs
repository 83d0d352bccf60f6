/*!
 * Repository layer for the translations table.
 *
 * `TranslationStore` provides a type-safe API over the `translations`
 * table and a change-notification hook. Every successful create or update
 * is announced to the subscribed observers once the write has committed,
 * which is how the disk cache learns that a bucket went stale.
 */

use chrono::Utc;
use log::{debug, warn};
use parking_lot::RwLock;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params};
use std::sync::Arc;

use super::connection::DatabaseConnection;
use super::models::{NewTranslation, TranslationKey, TranslationRecord};
use crate::errors::StoreError;

const SELECT_COLUMNS: &str =
    r#"SELECT id, locale, namespace, "group", item, text, created_at, updated_at FROM translations"#;

/// Receives a notification after a translation row was created or updated
pub trait StoreObserver: Send + Sync {
    /// Called with the row as persisted
    fn saved(&self, record: &TranslationRecord) -> anyhow::Result<()>;
}

/// Repository for the translations table
#[derive(Clone)]
pub struct TranslationStore {
    /// Database connection
    db: DatabaseConnection,
    /// Subscribers notified on every create/update
    observers: Arc<RwLock<Vec<Arc<dyn StoreObserver>>>>,
}

impl std::fmt::Debug for TranslationStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationStore")
            .field("db", &self.db)
            .field("observers", &self.observers.read().len())
            .finish()
    }
}

impl TranslationStore {
    /// Create a new store with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            observers: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Create a store with an in-memory database (for testing)
    pub fn new_in_memory() -> anyhow::Result<Self> {
        let db = DatabaseConnection::new_in_memory()?;
        Ok(Self::new(db))
    }

    /// Get the underlying connection
    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Register an observer for create/update notifications
    pub fn subscribe(&self, observer: Arc<dyn StoreObserver>) {
        self.observers.write().push(observer);
    }

    fn notify_saved(&self, record: &TranslationRecord) {
        let observers = self.observers.read().clone();
        for observer in observers {
            // The write has already committed; a failing observer must not undo it
            if let Err(e) = observer.saved(record) {
                warn!("Observer failed for {} {}: {:#}", record.locale, record.code(), e);
            }
        }
    }

    fn row_to_record(row: &Row<'_>) -> rusqlite::Result<TranslationRecord> {
        Ok(TranslationRecord {
            id: row.get(0)?,
            locale: row.get(1)?,
            namespace: row.get(2)?,
            group: row.get(3)?,
            item: row.get(4)?,
            text: row.get(5)?,
            created_at: row.get(6)?,
            updated_at: row.get(7)?,
        })
    }

    fn find_sync(conn: &Connection, key: &TranslationKey) -> Result<Option<TranslationRecord>, StoreError> {
        let sql = format!(
            r#"{} WHERE locale = ?1 AND namespace = ?2 AND "group" = ?3 AND item = ?4"#,
            SELECT_COLUMNS
        );
        let record = conn
            .query_row(
                &sql,
                params![key.locale, key.namespace, key.group, key.item],
                Self::row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    fn find_by_id_sync(conn: &Connection, id: i64) -> Result<Option<TranslationRecord>, StoreError> {
        let sql = format!("{} WHERE id = ?1", SELECT_COLUMNS);
        let record = conn.query_row(&sql, [id], Self::row_to_record).optional()?;
        Ok(record)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Insert a new row
    ///
    /// Fails with `StoreError::ConstraintViolation` when the tuple exists.
    pub fn create(&self, new: &NewTranslation) -> Result<TranslationRecord, StoreError> {
        let now = Utc::now().to_rfc3339();
        let key = &new.key;

        let record = self.db.execute(|conn| {
            let inserted = conn.execute(
                r#"
                INSERT INTO translations (locale, namespace, "group", item, text, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
                "#,
                params![key.locale, key.namespace, key.group, key.item, new.text, now],
            );

            match inserted {
                Ok(_) => {}
                Err(rusqlite::Error::SqliteFailure(err, _))
                    if err.code == ErrorCode::ConstraintViolation =>
                {
                    return Err(StoreError::ConstraintViolation {
                        locale: key.locale.clone(),
                        code: key.code(),
                    });
                }
                Err(e) => return Err(e.into()),
            }

            let id = conn.last_insert_rowid();
            Self::find_by_id_sync(conn, id)?.ok_or(StoreError::NotFound(id))
        })?;

        debug!("Created translation {}", key);
        self.notify_saved(&record);
        Ok(record)
    }

    /// Return the row for `key`, creating it with `default_text` when absent
    ///
    /// An existing row is returned untouched, whatever its text. The insert
    /// and the re-read happen in one transaction and rely on the unique
    /// constraint, so concurrent callers end up sharing a single row.
    pub fn fetch_or_create(
        &self,
        key: &TranslationKey,
        default_text: Option<&str>,
    ) -> Result<TranslationRecord, StoreError> {
        let now = Utc::now().to_rfc3339();

        let (record, inserted) = self.db.transaction(|tx| {
            let changed = tx.execute(
                r#"
                INSERT INTO translations (locale, namespace, "group", item, text, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
                ON CONFLICT(locale, namespace, "group", item) DO NOTHING
                "#,
                params![key.locale, key.namespace, key.group, key.item, default_text, now],
            )?;

            let record = Self::find_sync(tx, key)?
                .ok_or_else(|| StoreError::Database(rusqlite::Error::QueryReturnedNoRows))?;
            Ok((record, changed > 0))
        })?;

        if inserted {
            debug!("Recorded missing translation {}", key);
            self.notify_saved(&record);
        }
        Ok(record)
    }

    /// Insert or overwrite the text for `key` (administrative edit)
    pub fn save(&self, key: &TranslationKey, text: Option<&str>) -> Result<TranslationRecord, StoreError> {
        let now = Utc::now().to_rfc3339();

        let record = self.db.transaction(|tx| {
            tx.execute(
                r#"
                INSERT INTO translations (locale, namespace, "group", item, text, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
                ON CONFLICT(locale, namespace, "group", item) DO UPDATE SET
                    text = excluded.text,
                    updated_at = excluded.updated_at
                "#,
                params![key.locale, key.namespace, key.group, key.item, text, now],
            )?;

            Self::find_sync(tx, key)?
                .ok_or_else(|| StoreError::Database(rusqlite::Error::QueryReturnedNoRows))
        })?;

        debug!("Saved translation {}", key);
        self.notify_saved(&record);
        Ok(record)
    }

    /// Update the text of an existing row
    pub fn update_text(&self, id: i64, text: Option<&str>) -> Result<TranslationRecord, StoreError> {
        let now = Utc::now().to_rfc3339();

        let record = self.db.execute(|conn| {
            let changed = conn.execute(
                "UPDATE translations SET text = ?1, updated_at = ?2 WHERE id = ?3",
                params![text, now, id],
            )?;
            if changed == 0 {
                return Err(StoreError::NotFound(id));
            }
            Self::find_by_id_sync(conn, id)?.ok_or(StoreError::NotFound(id))
        })?;

        debug!("Updated translation #{} ({})", id, record.code());
        self.notify_saved(&record);
        Ok(record)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Find the row for a key
    pub fn find(&self, key: &TranslationKey) -> Result<Option<TranslationRecord>, StoreError> {
        self.db.execute(|conn| Self::find_sync(conn, key))
    }

    /// Find a row by id
    pub fn find_by_id(&self, id: i64) -> Result<Option<TranslationRecord>, StoreError> {
        self.db.execute(|conn| Self::find_by_id_sync(conn, id))
    }

    /// All rows of a locale, optionally narrowed to a namespace and group
    pub fn query(
        &self,
        locale: &str,
        namespace: Option<&str>,
        group: Option<&str>,
    ) -> Result<Vec<TranslationRecord>, StoreError> {
        let mut sql = format!("{} WHERE locale = ?1", SELECT_COLUMNS);
        let mut params_vec: Vec<&dyn rusqlite::ToSql> = vec![&locale];

        if let Some(namespace) = namespace.as_ref() {
            params_vec.push(namespace);
            sql.push_str(&format!(" AND namespace = ?{}", params_vec.len()));
        }
        if let Some(group) = group.as_ref() {
            params_vec.push(group);
            sql.push_str(&format!(r#" AND "group" = ?{}"#, params_vec.len()));
        }
        sql.push_str(r#" ORDER BY namespace, "group", item"#);

        self.db.execute(|conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_vec.as_slice(), Self::row_to_record)?;
            let records = rows.collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(records)
        })
    }

    /// Number of rows
    pub fn count(&self) -> Result<i64, StoreError> {
        self.db.execute(|conn| {
            Ok(conn.query_row("SELECT COUNT(*) FROM translations", [], |row| row.get(0))?)
        })
    }

    /// Distinct locales present in the table
    pub fn locales(&self) -> Result<Vec<String>, StoreError> {
        self.db.execute(|conn| {
            let mut stmt = conn.prepare("SELECT DISTINCT locale FROM translations ORDER BY locale")?;
            let rows = stmt.query_map([], |row| row.get(0))?;
            Ok(rows.collect::<rusqlite::Result<Vec<String>>>()?)
        })
    }
}
