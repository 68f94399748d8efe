use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::core::{or_unknown, PillRecord};
use crate::error::{PillEngineError, Result};
use crate::store::{seed_pills, ImportSummary, InsertOutcome, PillStore, StoreStats};

/// SQLite-backed pill store with a lazily loaded in-memory snapshot.
///
/// Schema:
/// ```sql
/// CREATE TABLE pills (
///     id INTEGER PRIMARY KEY,
///     imprint TEXT NOT NULL,
///     imprint_norm TEXT NOT NULL,
///     color TEXT NOT NULL,
///     shape TEXT NOT NULL,
///     drug_name TEXT NOT NULL,
///     generic_name TEXT NOT NULL,
///     strength TEXT NOT NULL,
///     drug_class TEXT NOT NULL,
///     uses TEXT NOT NULL,
///     image_url TEXT,
///     added_at TEXT NOT NULL
/// );
/// ```
///
/// The snapshot is built on first read. Writers hold the connection lock for
/// the whole insert and swap in a freshly loaded snapshot before releasing it.
pub struct SqlitePillStore {
    conn: Arc<Mutex<Connection>>,
    snapshot: RwLock<Option<Arc<Vec<PillRecord>>>>,
    seed_when_empty: bool,
}

impl SqlitePillStore {
    /// Open (or create) the store; an empty store is seeded on first read
    pub async fn new(db_path: &str) -> Result<Self> {
        if db_path != ":memory:" {
            if let Some(dir) = std::path::Path::new(db_path).parent() {
                if !dir.as_os_str().is_empty() {
                    std::fs::create_dir_all(dir)?;
                }
            }
        }

        let conn = Connection::open(db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS pills (
                id INTEGER PRIMARY KEY,
                imprint TEXT NOT NULL,
                imprint_norm TEXT NOT NULL,
                color TEXT NOT NULL DEFAULT 'Unknown',
                shape TEXT NOT NULL DEFAULT 'Unknown',
                drug_name TEXT NOT NULL DEFAULT 'Unknown',
                generic_name TEXT NOT NULL DEFAULT 'Unknown',
                strength TEXT NOT NULL DEFAULT 'Unknown',
                drug_class TEXT NOT NULL DEFAULT 'Unknown',
                uses TEXT NOT NULL DEFAULT 'Unknown',
                image_url TEXT,
                added_at TEXT NOT NULL
            )",
            [],
        )?;

        // Create index for imprint lookups
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_imprint_norm ON pills(imprint_norm)",
            [],
        )?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            snapshot: RwLock::new(None),
            seed_when_empty: true,
        })
    }

    /// Disable the built-in seed set
    pub fn without_seed(mut self) -> Self {
        self.seed_when_empty = false;
        self
    }

    fn lock_conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| PillEngineError::Store("connection lock poisoned".to_string()))
    }

    fn current_snapshot(&self) -> Result<Option<Arc<Vec<PillRecord>>>> {
        let guard = self
            .snapshot
            .read()
            .map_err(|_| PillEngineError::Store("snapshot lock poisoned".to_string()))?;
        Ok(guard.clone())
    }

    fn publish(&self, pills: Vec<PillRecord>) -> Result<Arc<Vec<PillRecord>>> {
        let snapshot = Arc::new(pills);
        let mut guard = self
            .snapshot
            .write()
            .map_err(|_| PillEngineError::Store("snapshot lock poisoned".to_string()))?;
        *guard = Some(snapshot.clone());
        Ok(snapshot)
    }

    fn row_to_pill(row: &Row<'_>) -> rusqlite::Result<PillRecord> {
        Ok(PillRecord {
            id: row.get(0)?,
            imprint: row.get(1)?,
            color: row.get(2)?,
            shape: row.get(3)?,
            drug_name: row.get(4)?,
            generic_name: row.get(5)?,
            strength: row.get(6)?,
            drug_class: row.get(7)?,
            uses: row.get(8)?,
            image_url: row.get(9)?,
            detail_url: None,
        })
    }

    fn load_all(conn: &Connection) -> Result<Vec<PillRecord>> {
        let mut stmt = conn.prepare(
            "SELECT id, imprint, color, shape, drug_name, generic_name, strength,
                    drug_class, uses, image_url
             FROM pills
             ORDER BY id",
        )?;
        let pills = stmt
            .query_map([], Self::row_to_pill)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(pills)
    }

    /// Insert within an open connection; caller publishes the snapshot
    fn insert_row(conn: &Connection, pill: &PillRecord) -> Result<InsertOutcome> {
        let imprint_norm = pill.normalized_imprint();
        if imprint_norm.is_empty() {
            return Err(PillEngineError::Store(format!(
                "imprint '{}' has no letters or digits",
                pill.imprint
            )));
        }

        let drug_name = or_unknown(pill.drug_name.clone());
        let strength = or_unknown(pill.strength.clone());

        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM pills
                 WHERE imprint_norm = ?1 AND drug_name = ?2 AND strength = ?3",
                params![imprint_norm, drug_name, strength],
                |row| row.get(0),
            )
            .optional()?;

        if let Some(id) = existing {
            return Ok(InsertOutcome::Duplicate(id));
        }

        let id: i64 = conn.query_row("SELECT COALESCE(MAX(id), 0) + 1 FROM pills", [], |row| {
            row.get(0)
        })?;

        conn.execute(
            "INSERT INTO pills (id, imprint, imprint_norm, color, shape, drug_name, generic_name,
                                strength, drug_class, uses, image_url, added_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                id,
                pill.imprint.trim(),
                imprint_norm,
                or_unknown(pill.color.clone()),
                or_unknown(pill.shape.clone()),
                drug_name,
                or_unknown(pill.generic_name.clone()),
                strength,
                or_unknown(pill.drug_class.clone()),
                or_unknown(pill.uses.clone()),
                pill.image_url.as_deref().filter(|u| !u.trim().is_empty()),
                Utc::now().to_rfc3339(),
            ],
        )?;

        Ok(InsertOutcome::Inserted(id))
    }

    fn insert_batch(conn: &mut Connection, pills: &[PillRecord]) -> Result<ImportSummary> {
        let tx = conn.transaction()?;
        let mut summary = ImportSummary::default();

        for pill in pills {
            if pill.normalized_imprint().is_empty() {
                tracing::warn!("Skipping pill without imprint: {}", pill.drug_name);
                summary.skipped += 1;
                continue;
            }

            match Self::insert_row(&tx, pill)? {
                InsertOutcome::Inserted(_) => summary.inserted += 1,
                InsertOutcome::Duplicate(_) => summary.skipped += 1,
            }
        }

        tx.commit()?;
        Ok(summary)
    }

    fn count(conn: &Connection) -> Result<u64> {
        let total: i64 = conn.query_row("SELECT COUNT(*) FROM pills", [], |row| row.get(0))?;
        Ok(total as u64)
    }
}

#[async_trait]
impl PillStore for SqlitePillStore {
    async fn all(&self) -> Result<Arc<Vec<PillRecord>>> {
        if let Some(snapshot) = self.current_snapshot()? {
            return Ok(snapshot);
        }

        let mut conn = self.lock_conn()?;

        // Another reader may have loaded it while we waited for the lock
        if let Some(snapshot) = self.current_snapshot()? {
            return Ok(snapshot);
        }

        if self.seed_when_empty && Self::count(&conn)? == 0 {
            let summary = Self::insert_batch(&mut conn, &seed_pills())?;
            tracing::info!("Seeded local store with {} pills", summary.inserted);
        }

        let pills = Self::load_all(&conn)?;
        tracing::debug!("Loaded {} pills into memory", pills.len());
        self.publish(pills)
    }

    async fn insert(&self, pill: PillRecord) -> Result<InsertOutcome> {
        let conn = self.lock_conn()?;
        let outcome = Self::insert_row(&conn, &pill)?;

        if let InsertOutcome::Inserted(id) = outcome {
            tracing::debug!("Stored pill {} as #{}", pill.imprint, id);
            self.publish(Self::load_all(&conn)?)?;
        }

        Ok(outcome)
    }

    async fn insert_many(&self, pills: Vec<PillRecord>) -> Result<ImportSummary> {
        let mut conn = self.lock_conn()?;
        let summary = Self::insert_batch(&mut conn, &pills)?;

        if summary.inserted > 0 {
            self.publish(Self::load_all(&conn)?)?;
        }

        Ok(summary)
    }

    async fn stats(&self) -> Result<StoreStats> {
        // Load first so a fresh store reports the seeded pool searches will see
        self.all().await?;

        let conn = self.lock_conn()?;

        let total_pills = Self::count(&conn)?;

        let distinct_imprints: i64 = conn.query_row(
            "SELECT COUNT(DISTINCT imprint_norm) FROM pills",
            [],
            |row| row.get(0),
        )?;

        let last_added: Option<DateTime<Utc>> = conn
            .query_row("SELECT MAX(added_at) FROM pills", [], |row| {
                row.get::<_, Option<String>>(0)
            })?
            .and_then(|s| {
                DateTime::parse_from_rfc3339(&s)
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc))
            });

        Ok(StoreStats {
            total_pills,
            distinct_imprints: distinct_imprints as u64,
            last_added,
        })
    }
}
