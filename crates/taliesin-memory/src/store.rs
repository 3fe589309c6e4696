//! Memory store implementation using SQLite.
//!
//! Every [`UserMemory`] owns its own connection to the shared database file
//! and only ever touches rows in its namespace. WAL mode keeps concurrent
//! handles (one per active user) from blocking each other on reads.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{Connection, OpenFlags, params};
use tracing::{debug, info};

use crate::error::{MemoryError, Result};
use crate::record::MemoryRecord;

/// Current schema version for migrations.
const SCHEMA_VERSION: i32 = 1;

/// How long a connection waits on a writer before giving up.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// A user's memory store, scoped to one namespace of the shared database.
///
/// Opened once per active user by the session layer and reused for every
/// call in that user's session. [`UserMemory::close`] checkpoints the WAL;
/// it is called exactly once, when the handle is evicted.
pub struct UserMemory {
    /// The SQLite connection (wrapped in Mutex for thread safety).
    conn: Mutex<Connection>,
    /// The namespace every query is scoped to.
    namespace: String,
}

impl std::fmt::Debug for UserMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserMemory")
            .field("namespace", &self.namespace)
            .finish_non_exhaustive()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Initialization
// ─────────────────────────────────────────────────────────────────────────────

impl UserMemory {
    /// Open a namespaced memory store on the shared database file.
    ///
    /// Creates the file, parent directories, and schema if missing.
    pub fn open(path: impl AsRef<Path>, namespace: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();
        let namespace = namespace.into();

        // Ensure parent directory exists
        if let Some(parent) = path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_FULL_MUTEX,
        )?;

        let store = Self {
            conn: Mutex::new(conn),
            namespace,
        };
        store.initialize()?;

        info!(namespace = %store.namespace, "Memory store opened at {:?}", path);
        Ok(store)
    }

    /// Create an in-memory store (useful for testing).
    pub fn open_in_memory(namespace: impl Into<String>) -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
            namespace: namespace.into(),
        };
        store.initialize()?;

        Ok(store)
    }

    /// The namespace this handle is scoped to.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Initialize the database with schema and pragmas.
    fn initialize(&self) -> Result<()> {
        let conn = self.conn.lock();

        // WAL mode so per-user connections don't block each other on reads
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.busy_timeout(BUSY_TIMEOUT)?;

        self.create_schema(&conn)?;

        Ok(())
    }

    /// Create the database schema.
    fn create_schema(&self, conn: &Connection) -> Result<()> {
        let current_version: i32 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap_or(0);

        if current_version >= SCHEMA_VERSION {
            debug!("Schema up to date (version {})", current_version);
            return Ok(());
        }

        conn.execute_batch(
            r#"
            -- Memories table: one row per remembered item, per namespace
            CREATE TABLE IF NOT EXISTS memories (
                id TEXT PRIMARY KEY,
                namespace TEXT NOT NULL,
                content TEXT NOT NULL,
                category TEXT,
                essential INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            );

            -- Index for namespace scoping
            CREATE INDEX IF NOT EXISTS idx_memories_namespace
                ON memories(namespace);

            -- Index for category lookups within a namespace
            CREATE INDEX IF NOT EXISTS idx_memories_namespace_category
                ON memories(namespace, category);
            "#,
        )?;

        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        info!("Schema initialized (version {})", SCHEMA_VERSION);

        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Operations
// ─────────────────────────────────────────────────────────────────────────────

impl UserMemory {
    /// Store a new memory.
    pub fn record(
        &self,
        content: impl Into<String>,
        category: Option<String>,
        essential: bool,
    ) -> Result<MemoryRecord> {
        let record = MemoryRecord::new(content, category, essential);
        let conn = self.conn.lock();

        conn.execute(
            r#"
            INSERT INTO memories (id, namespace, content, category, essential, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                record.id.to_string(),
                self.namespace,
                record.content,
                record.category,
                record.essential as i32,
                record.created_at.to_rfc3339(),
            ],
        )?;

        debug!(namespace = %self.namespace, "Recorded memory {}", record.id);
        Ok(record)
    }

    /// Keyword search over this namespace.
    ///
    /// A record scores one point per distinct query word its content
    /// contains; words of two characters or fewer are ignored. Results are
    /// ordered by score (ties newest first) and capped at `limit`. An empty
    /// or all-short-word query matches nothing.
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<MemoryRecord>> {
        let lowered = query.to_lowercase();
        let words: Vec<&str> = lowered
            .split_whitespace()
            .filter(|w| w.chars().count() > 2)
            .collect();
        if words.is_empty() {
            return Ok(Vec::new());
        }

        let records = self.all_records()?;
        let mut scored: Vec<(usize, MemoryRecord)> = records
            .into_iter()
            .filter_map(|record| {
                let content = record.content.to_lowercase();
                let score = words.iter().filter(|w| content.contains(*w)).count();
                (score > 0).then_some((score, record))
            })
            .collect();

        // Stable sort keeps the newest-first fetch order among equal scores
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        Ok(scored
            .into_iter()
            .take(limit)
            .map(|(_, record)| record)
            .collect())
    }

    /// List records in a category, newest first.
    pub fn search_by_category(&self, category: &str, limit: usize) -> Result<Vec<MemoryRecord>> {
        self.query_records(
            r#"
            SELECT id, content, category, essential, created_at
            FROM memories
            WHERE namespace = ?1 AND category = ?2
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?3
            "#,
            params![self.namespace, category, limit as i64],
        )
    }

    /// List essential records, newest first. Backs the essential-info
    /// summary.
    pub fn essential(&self, limit: usize) -> Result<Vec<MemoryRecord>> {
        self.query_records(
            r#"
            SELECT id, content, category, essential, created_at
            FROM memories
            WHERE namespace = ?1 AND essential = 1
            ORDER BY created_at DESC, rowid DESC
            LIMIT ?2
            "#,
            params![self.namespace, limit as i64],
        )
    }

    /// Number of records in this namespace.
    pub fn count(&self) -> Result<usize> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM memories WHERE namespace = ?1",
            params![self.namespace],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Checkpoint the WAL before the handle is released.
    ///
    /// Called at most once per handle, by whoever evicts it.
    pub fn close(&self) -> Result<()> {
        let conn = self.conn.lock();
        conn.pragma(None, "wal_checkpoint", "TRUNCATE", |_row| Ok(()))?;
        debug!(namespace = %self.namespace, "Memory store checkpointed");
        Ok(())
    }

    /// Every record in this namespace, newest first.
    fn all_records(&self) -> Result<Vec<MemoryRecord>> {
        self.query_records(
            r#"
            SELECT id, content, category, essential, created_at
            FROM memories
            WHERE namespace = ?1
            ORDER BY created_at DESC, rowid DESC
            "#,
            params![self.namespace],
        )
    }

    fn query_records<P: rusqlite::Params>(&self, sql: &str, params: P) -> Result<Vec<MemoryRecord>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;

        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(Self::row_to_record(row)?);
        }

        Ok(records)
    }

    /// Convert a database row to a record.
    ///
    /// Expected column order: id, content, category, essential, created_at.
    fn row_to_record(row: &rusqlite::Row) -> Result<MemoryRecord> {
        let id_str: String = row.get(0)?;
        let content: String = row.get(1)?;
        let category: Option<String> = row.get(2)?;
        let essential_int: i32 = row.get(3)?;
        let created_at_str: String = row.get(4)?;

        let id = id_str
            .parse()
            .map_err(|e: uuid::Error| MemoryError::InvalidData(e.to_string()))?;
        let created_at = DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| MemoryError::InvalidData(e.to_string()))?
            .with_timezone(&Utc);

        Ok(MemoryRecord {
            id,
            content,
            category,
            essential: essential_int != 0,
            created_at,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> UserMemory {
        UserMemory::open_in_memory("user_test").unwrap()
    }

    #[test]
    fn test_record_and_count() {
        let store = create_test_store();
        assert_eq!(store.count().unwrap(), 0);

        let record = store
            .record("prefers morning meetings", Some("preferences".to_string()), true)
            .unwrap();
        assert_eq!(record.content, "prefers morning meetings");
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_search_scores_by_match_count() {
        let store = create_test_store();
        store
            .record("loves hiking in the mountains", None, false)
            .unwrap();
        store
            .record("project deadline is friday", None, false)
            .unwrap();
        store.record("the mountains are calling", None, false).unwrap();

        let results = store.search("hiking mountains", 3).unwrap();
        assert_eq!(results.len(), 2);
        // Two matched words beat one
        assert_eq!(results[0].content, "loves hiking in the mountains");
        assert_eq!(results[1].content, "the mountains are calling");
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let store = create_test_store();
        store.record("Piano lessons on Tuesday", None, false).unwrap();

        let results = store.search("PIANO", 3).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_search_ignores_short_words() {
        let store = create_test_store();
        store.record("it is an odd thing", None, false).unwrap();

        // Every query word is two characters or fewer, so nothing matches
        assert!(store.search("it is an", 3).unwrap().is_empty());
        assert!(store.search("", 3).unwrap().is_empty());
    }

    #[test]
    fn test_search_respects_limit() {
        let store = create_test_store();
        for i in 0..5 {
            store
                .record(format!("gardening note number {}", i), None, false)
                .unwrap();
        }

        let results = store.search("gardening", 3).unwrap();
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_search_no_match() {
        let store = create_test_store();
        store.record("likes green tea", None, false).unwrap();

        assert!(store.search("astronomy", 3).unwrap().is_empty());
    }

    #[test]
    fn test_search_by_category() {
        let store = create_test_store();
        store
            .record("budget review", Some("work".to_string()), false)
            .unwrap();
        store
            .record("buy birthday gift", Some("personal".to_string()), false)
            .unwrap();
        store
            .record("quarterly planning", Some("work".to_string()), false)
            .unwrap();

        let work = store.search_by_category("work", 5).unwrap();
        assert_eq!(work.len(), 2);
        // Newest first
        assert_eq!(work[0].content, "quarterly planning");

        assert!(store.search_by_category("travel", 5).unwrap().is_empty());
    }

    #[test]
    fn test_essential_newest_first_with_limit() {
        let store = create_test_store();
        store.record("ordinary note", None, false).unwrap();
        for i in 0..4 {
            store
                .record(format!("essential fact {}", i), None, true)
                .unwrap();
        }

        let essentials = store.essential(3).unwrap();
        assert_eq!(essentials.len(), 3);
        assert!(essentials.iter().all(|r| r.essential));
        assert_eq!(essentials[0].content, "essential fact 3");
    }

    #[test]
    fn test_namespace_isolation() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("memory.db");

        let alice = UserMemory::open(&path, "user_alice").unwrap();
        let bob = UserMemory::open(&path, "user_bob").unwrap();

        alice.record("alice's secret", None, false).unwrap();

        assert_eq!(alice.count().unwrap(), 1);
        assert_eq!(bob.count().unwrap(), 0);
        assert!(bob.search("secret", 3).unwrap().is_empty());
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("deeper").join("memory.db");

        let store = UserMemory::open(&path, "user_test").unwrap();
        store.record("created the directories", None, false).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_close_checkpoints() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("memory.db");

        let store = UserMemory::open(&path, "user_test").unwrap();
        store.record("something to flush", None, false).unwrap();
        store.close().unwrap();

        // Reopening sees the data
        let reopened = UserMemory::open(&path, "user_test").unwrap();
        assert_eq!(reopened.count().unwrap(), 1);
    }
}
