// crates/asset-ledger-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Ledger Engine
// Description: Durable LedgerEngine backed by SQLite WAL.
// Purpose: Persist ledger tables, insert-once rows, and flat state entries.
// Dependencies: asset-ledger-core, rusqlite, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! This module implements a durable [`LedgerEngine`] using `SQLite`. A catalog
//! table records each ledger table's column layout; rows live in one physical
//! table per ledger table keyed by the key column tuple. Inserts use
//! `INSERT OR IGNORE` so an existing row is never replaced. Prefix reads run
//! on a producer thread with its own connection and feed a bounded
//! [`RowStream`]. Stored values are checked against the recorded layout on
//! every read and fail closed on mismatch.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::thread;

use asset_ledger_core::ColumnDefinition;
use asset_ledger_core::ColumnKind;
use asset_ledger_core::ColumnValue;
use asset_ledger_core::CreateOutcome;
use asset_ledger_core::DropOutcome;
use asset_ledger_core::EngineError;
use asset_ledger_core::LedgerEngine;
use asset_ledger_core::Row;
use asset_ledger_core::RowSender;
use asset_ledger_core::RowStream;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use rusqlite::params_from_iter;
use rusqlite::types::Value;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the engine metadata.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Default number of rows buffered between a scan producer and its consumer.
pub const DEFAULT_STREAM_BUFFER: usize = 64;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum length of a table or column name.
const MAX_IDENTIFIER_LENGTH: usize = 64;
/// Prefix of the physical table backing each ledger table.
const PHYSICAL_TABLE_PREFIX: &str = "lt_";

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `journal_mode` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `synchronous` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` ledger engine.
///
/// # Invariants
/// - `path` must resolve to a file path (not a directory, not `:memory:`).
/// - `busy_timeout_ms` is interpreted as milliseconds.
/// - `stream_buffer` must be greater than zero.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SqliteLedgerConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
    /// Rows buffered between a scan producer and its consumer.
    #[serde(default = "default_stream_buffer")]
    pub stream_buffer: usize,
}

impl SqliteLedgerConfig {
    /// Creates a configuration for `path` with default settings.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            busy_timeout_ms: DEFAULT_BUSY_TIMEOUT_MS,
            journal_mode: SqliteStoreMode::default(),
            sync_mode: SqliteSyncMode::default(),
            stream_buffer: DEFAULT_STREAM_BUFFER,
        }
    }
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

/// Returns the default scan stream buffer.
const fn default_stream_buffer() -> usize {
    DEFAULT_STREAM_BUFFER
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` engine errors.
///
/// # Invariants
/// - Error messages avoid embedding stored payload bytes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Stored data does not match its recorded layout.
    #[error("sqlite store corruption: {0}")]
    Corrupt(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid request or configuration.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
    /// Referenced ledger table does not exist.
    #[error("sqlite store table not found: {0}")]
    TableNotFound(String),
    /// Ledger table has no key columns.
    #[error("sqlite store table has no key columns: {0}")]
    NoKeyColumns(String),
}

impl From<SqliteStoreError> for EngineError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Db(message),
            SqliteStoreError::Corrupt(message) => Self::Db(format!("corrupt store: {message}")),
            SqliteStoreError::VersionMismatch(message) => {
                Self::Db(format!("version mismatch: {message}"))
            }
            SqliteStoreError::Invalid(message) => Self::Schema(message),
            SqliteStoreError::TableNotFound(table) => Self::TableNotFound(table),
            SqliteStoreError::NoKeyColumns(table) => Self::NoKeyColumns(table),
        }
    }
}

// ============================================================================
// SECTION: Engine
// ============================================================================

/// `SQLite`-backed ledger engine with WAL support.
///
/// # Invariants
/// - Write connection access is serialized through a mutex.
/// - Every physical table has a catalog row describing its layout.
#[derive(Clone)]
pub struct SqliteLedgerEngine {
    /// Engine configuration.
    config: SqliteLedgerConfig,
    /// Shared connection guarded by a mutex.
    connection: Arc<Mutex<Connection>>,
}

impl SqliteLedgerEngine {
    /// Opens an `SQLite`-backed ledger engine.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the configuration is invalid or the
    /// database cannot be opened or initialized.
    pub fn new(config: SqliteLedgerConfig) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        if config.stream_buffer == 0 {
            return Err(SqliteStoreError::Invalid(
                "stream_buffer must be greater than zero".to_string(),
            ));
        }
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(&config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            config,
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Returns the engine configuration.
    #[must_use]
    pub const fn config(&self) -> &SqliteLedgerConfig {
        &self.config
    }

    /// Locks the shared connection.
    fn lock(&self) -> Result<MutexGuard<'_, Connection>, SqliteStoreError> {
        self.connection
            .lock()
            .map_err(|_| SqliteStoreError::Io("sqlite mutex poisoned".to_string()))
    }

    /// Creates a ledger table and records its layout.
    fn create(
        &self,
        name: &str,
        columns: &[ColumnDefinition],
    ) -> Result<CreateOutcome, SqliteStoreError> {
        if columns.is_empty() {
            return Err(SqliteStoreError::Invalid(format!("table {name} declares no columns")));
        }
        validate_identifier("table", name)?;
        for column in columns {
            validate_identifier("column", &column.name)?;
        }
        let key_count = key_count(columns);
        if columns.iter().skip(key_count).any(|column| column.key) {
            return Err(SqliteStoreError::Invalid(format!(
                "key columns of table {name} must precede payload columns"
            )));
        }
        let layout_json = serde_json::to_string(columns)
            .map_err(|err| SqliteStoreError::Invalid(err.to_string()))?;

        let mut guard = self.lock()?;
        let tx = guard.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        if load_layout(&tx, name)?.is_some() {
            return Ok(CreateOutcome::AlreadyExists);
        }
        let definitions = columns
            .iter()
            .map(|column| format!("\"{}\" {} NOT NULL", column.name, sql_type(column.kind)))
            .collect::<Vec<_>>()
            .join(", ");
        let primary_key = if key_count == 0 {
            String::new()
        } else {
            format!(", PRIMARY KEY ({})", quoted_names(&columns[.. key_count]))
        };
        tx.execute_batch(&format!(
            "CREATE TABLE {} ({definitions}{primary_key});",
            physical_table(name)
        ))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        tx.execute(
            "INSERT INTO ledger_tables (name, columns_json) VALUES (?1, ?2)",
            params![name, layout_json],
        )
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        Ok(CreateOutcome::Created)
    }

    /// Drops a ledger table, its rows, and its layout record.
    fn drop_named(&self, name: &str) -> Result<DropOutcome, SqliteStoreError> {
        let mut guard = self.lock()?;
        let tx = guard.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        if load_layout(&tx, name)?.is_none() {
            return Ok(DropOutcome::NotFound);
        }
        validate_identifier("table", name)?;
        tx.execute_batch(&format!("DROP TABLE IF EXISTS {};", physical_table(name)))
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        tx.execute("DELETE FROM ledger_tables WHERE name = ?1", params![name])
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        Ok(DropOutcome::Dropped)
    }

    /// Inserts a row unless its key already exists.
    fn insert(&self, table: &str, row: &Row) -> Result<bool, SqliteStoreError> {
        let guard = self.lock()?;
        let layout = require_layout(&guard, table)?;
        if key_count(&layout) == 0 {
            return Err(SqliteStoreError::NoKeyColumns(table.to_string()));
        }
        check_cells(table, &layout, &row.columns, true)?;
        let placeholders =
            (1 ..= layout.len()).map(|index| format!("?{index}")).collect::<Vec<_>>().join(", ");
        let sql = format!(
            "INSERT OR IGNORE INTO {} ({}) VALUES ({placeholders})",
            physical_table(table),
            quoted_names(&layout)
        );
        let changed = guard
            .execute(&sql, params_from_iter(row.columns.iter().map(to_sql_value)))
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        drop(guard);
        Ok(changed == 1)
    }

    /// Fetches the row matching a full key, or an empty row.
    fn fetch(&self, table: &str, key: &[ColumnValue]) -> Result<Row, SqliteStoreError> {
        let guard = self.lock()?;
        let layout = require_layout(&guard, table)?;
        let key_count = key_count(&layout);
        if key_count == 0 {
            return Err(SqliteStoreError::NoKeyColumns(table.to_string()));
        }
        if key.len() != key_count {
            return Err(SqliteStoreError::Invalid(format!(
                "exact key for table {table} needs {key_count} cells, got {}",
                key.len()
            )));
        }
        check_cells(table, &layout, key, false)?;
        let sql = select_sql(table, &layout, key.len());
        let mut statement =
            guard.prepare(&sql).map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let mut rows = statement
            .query(params_from_iter(key.iter().map(to_sql_value)))
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        match rows.next().map_err(|err| SqliteStoreError::Db(err.to_string()))? {
            Some(row) => read_row(row, &layout),
            None => Ok(Row::default()),
        }
    }

    /// Opens a row stream over every row matching a key prefix.
    fn stream(
        &self,
        table: &str,
        partial_key: &[ColumnValue],
    ) -> Result<RowStream, SqliteStoreError> {
        let layout = {
            let guard = self.lock()?;
            require_layout(&guard, table)?
        };
        let key_count = key_count(&layout);
        if partial_key.len() > key_count {
            return Err(SqliteStoreError::Invalid(format!(
                "partial key for table {table} has {} cells but the table has {key_count} key \
                 columns",
                partial_key.len()
            )));
        }
        check_cells(table, &layout, partial_key, false)?;
        let sql = select_sql(table, &layout, partial_key.len());
        let params: Vec<Value> = partial_key.iter().map(to_sql_value).collect();
        let (sender, stream) = RowStream::channel(self.config.stream_buffer);
        spawn_row_producer(self.config.clone(), sql, params, layout, sender)?;
        Ok(stream)
    }

    /// Writes a flat state entry, replacing any previous value.
    fn put(&self, key: &str, value: &[u8]) -> Result<(), SqliteStoreError> {
        self.lock()?
            .execute(
                "INSERT INTO ledger_state (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        Ok(())
    }

    /// Reads a flat state entry.
    fn read_state(&self, key: &str) -> Result<Option<Vec<u8>>, SqliteStoreError> {
        self.lock()?
            .query_row("SELECT value FROM ledger_state WHERE key = ?1", params![key], |row| {
                row.get(0)
            })
            .optional()
            .map_err(|err| SqliteStoreError::Db(err.to_string()))
    }
}

impl LedgerEngine for SqliteLedgerEngine {
    fn create_table(
        &self,
        name: &str,
        columns: &[ColumnDefinition],
    ) -> Result<CreateOutcome, EngineError> {
        self.create(name, columns).map_err(EngineError::from)
    }

    fn drop_table(&self, name: &str) -> Result<DropOutcome, EngineError> {
        self.drop_named(name).map_err(EngineError::from)
    }

    fn insert_row(&self, table: &str, row: Row) -> Result<bool, EngineError> {
        self.insert(table, &row).map_err(EngineError::from)
    }

    fn get_row(&self, table: &str, key: &[ColumnValue]) -> Result<Row, EngineError> {
        self.fetch(table, key).map_err(EngineError::from)
    }

    fn get_rows(&self, table: &str, partial_key: &[ColumnValue]) -> Result<RowStream, EngineError> {
        self.stream(table, partial_key).map_err(EngineError::from)
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), EngineError> {
        self.put(key, value).map_err(EngineError::from)
    }

    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, EngineError> {
        self.read_state(key).map_err(EngineError::from)
    }
}

// ============================================================================
// SECTION: Scan Producer
// ============================================================================

/// Spawns the producer thread feeding a scan stream.
fn spawn_row_producer(
    config: SqliteLedgerConfig,
    sql: String,
    params: Vec<Value>,
    layout: Vec<ColumnDefinition>,
    sender: RowSender,
) -> Result<(), SqliteStoreError> {
    thread::Builder::new()
        .name("asset-ledger-scan".to_string())
        .spawn(move || {
            if let Err(err) = produce_rows(&config, &sql, &params, &layout, &sender) {
                let _ = sender.send(Err(EngineError::from(err)));
            }
        })
        .map_err(|err| SqliteStoreError::Io(format!("failed to spawn scan thread: {err}")))?;
    Ok(())
}

/// Streams matching rows from a dedicated connection until done or cancelled.
fn produce_rows(
    config: &SqliteLedgerConfig,
    sql: &str,
    params: &[Value],
    layout: &[ColumnDefinition],
    sender: &RowSender,
) -> Result<(), SqliteStoreError> {
    let connection = open_connection(config)?;
    let mut statement =
        connection.prepare(sql).map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let mut rows = statement
        .query(params_from_iter(params.iter()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    while let Some(row) = rows.next().map_err(|err| SqliteStoreError::Db(err.to_string()))? {
        if !sender.send(Ok(read_row(row, layout)?)) {
            break;
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Ensures the parent directory for the store exists.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    let Some(parent) = path.parent() else {
        return Err(SqliteStoreError::Io("store path missing parent directory".to_string()));
    };
    std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))
}

/// Validates store paths for safety limits.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    if path.as_os_str().is_empty() {
        return Err(SqliteStoreError::Invalid("store path must not be empty".to_string()));
    }
    if path.as_os_str() == ":memory:" {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file; scans read through separate connections".to_string(),
        ));
    }
    let path_string = path.display().to_string();
    if path_string.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds length limit".to_string()));
    }
    for component in path.components() {
        let name = component.as_os_str().to_string_lossy();
        if name.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path contains an overlong component".to_string(),
            ));
        }
    }
    if path.exists() && path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Validates a table or column name for use as a quoted identifier.
fn validate_identifier(kind: &str, name: &str) -> Result<(), SqliteStoreError> {
    let starts_well = name.chars().next().is_some_and(|ch| ch.is_ascii_alphabetic() || ch == '_');
    let body_ok = name.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_');
    if !starts_well || !body_ok || name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(SqliteStoreError::Invalid(format!(
            "{kind} name {name:?} must match [A-Za-z_][A-Za-z0-9_]* (max \
             {MAX_IDENTIFIER_LENGTH} chars)"
        )));
    }
    Ok(())
}

/// Opens an `SQLite` connection with secure defaults.
fn open_connection(config: &SqliteLedgerConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies `SQLite` pragmas required for durability.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteLedgerConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .busy_timeout(std::time::Duration::from_millis(config.busy_timeout_ms))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA journal_mode = {};", config.journal_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&format!("PRAGMA synchronous = {};", config.sync_mode.pragma_value()))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Initializes the metadata schema or validates the existing version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let version: Option<i64> = tx
        .query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0))
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS ledger_tables (
                    name TEXT PRIMARY KEY,
                    columns_json TEXT NOT NULL
                );
                CREATE TABLE IF NOT EXISTS ledger_state (
                    key TEXT PRIMARY KEY,
                    value BLOB NOT NULL
                );",
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version: {value}"
            )));
        }
    }
    tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Loads the recorded layout of a ledger table.
fn load_layout(
    connection: &Connection,
    table: &str,
) -> Result<Option<Vec<ColumnDefinition>>, SqliteStoreError> {
    let layout_json: Option<String> = connection
        .query_row("SELECT columns_json FROM ledger_tables WHERE name = ?1", params![table], |row| {
            row.get(0)
        })
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    layout_json
        .map(|json| {
            serde_json::from_str(&json).map_err(|err| {
                SqliteStoreError::Corrupt(format!("layout of table {table} is unreadable: {err}"))
            })
        })
        .transpose()
}

/// Loads a layout that must exist.
fn require_layout(
    connection: &Connection,
    table: &str,
) -> Result<Vec<ColumnDefinition>, SqliteStoreError> {
    load_layout(connection, table)?
        .ok_or_else(|| SqliteStoreError::TableNotFound(table.to_string()))
}

/// Returns the number of leading key columns.
fn key_count(layout: &[ColumnDefinition]) -> usize {
    layout.iter().take_while(|column| column.key).count()
}

/// Checks cell kinds against the leading columns of a layout.
///
/// With `full_row`, the cell count must equal the column count.
fn check_cells(
    table: &str,
    layout: &[ColumnDefinition],
    cells: &[ColumnValue],
    full_row: bool,
) -> Result<(), SqliteStoreError> {
    if full_row && cells.len() != layout.len() {
        return Err(SqliteStoreError::Invalid(format!(
            "table {table} expects {} columns, got {}",
            layout.len(),
            cells.len()
        )));
    }
    for (column, cell) in layout.iter().zip(cells) {
        if column.kind != cell.kind() {
            return Err(SqliteStoreError::Invalid(format!(
                "column {} of table {table} has the wrong kind",
                column.name
            )));
        }
    }
    Ok(())
}

/// Returns the quoted physical table name for a validated ledger table.
fn physical_table(name: &str) -> String {
    format!("\"{PHYSICAL_TABLE_PREFIX}{name}\"")
}

/// Joins quoted column names.
fn quoted_names(columns: &[ColumnDefinition]) -> String {
    columns.iter().map(|column| format!("\"{}\"", column.name)).collect::<Vec<_>>().join(", ")
}

/// Builds a select over all columns filtered by the first `filtered` keys and
/// ordered by the key tuple.
fn select_sql(table: &str, layout: &[ColumnDefinition], filtered: usize) -> String {
    let mut sql = format!("SELECT {} FROM {}", quoted_names(layout), physical_table(table));
    if filtered > 0 {
        let predicate = layout
            .iter()
            .take(filtered)
            .enumerate()
            .map(|(index, column)| format!("\"{}\" = ?{}", column.name, index + 1))
            .collect::<Vec<_>>()
            .join(" AND ");
        sql.push_str(" WHERE ");
        sql.push_str(&predicate);
    }
    let keys = key_count(layout);
    if keys > 0 {
        sql.push_str(" ORDER BY ");
        sql.push_str(&quoted_names(&layout[.. keys]));
    }
    sql
}

/// Returns the `SQLite` column type for a column kind.
const fn sql_type(kind: ColumnKind) -> &'static str {
    match kind {
        ColumnKind::String => "TEXT",
        ColumnKind::Bytes => "BLOB",
    }
}

/// Converts a cell into an `SQLite` value.
fn to_sql_value(cell: &ColumnValue) -> Value {
    match cell {
        ColumnValue::String(text) => Value::Text(text.clone()),
        ColumnValue::Bytes(bytes) => Value::Blob(bytes.clone()),
    }
}

/// Reads a stored row, checking each cell against the layout.
fn read_row(row: &rusqlite::Row<'_>, layout: &[ColumnDefinition]) -> Result<Row, SqliteStoreError> {
    let mut cells = Vec::with_capacity(layout.len());
    for (index, column) in layout.iter().enumerate() {
        let value: Value = row.get(index).map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        let cell = match (column.kind, value) {
            (ColumnKind::String, Value::Text(text)) => ColumnValue::String(text),
            (ColumnKind::Bytes, Value::Blob(bytes)) => ColumnValue::Bytes(bytes),
            _ => {
                return Err(SqliteStoreError::Corrupt(format!(
                    "column {} holds a value of the wrong type",
                    column.name
                )));
            }
        };
        cells.push(cell);
    }
    Ok(Row::new(cells))
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use asset_ledger_core::ColumnDefinition;

    use super::SqliteStoreError;
    use super::select_sql;
    use super::validate_identifier;

    #[test]
    fn identifiers_are_restricted() {
        assert!(validate_identifier("table", "AssetTable").is_ok());
        assert!(validate_identifier("column", "keyName0").is_ok());
        assert!(validate_identifier("table", "_t").is_ok());
        for bad in ["", "0abc", "a-b", "a\"b", "x y", &"a".repeat(65)] {
            assert!(matches!(validate_identifier("table", bad), Err(SqliteStoreError::Invalid(_))));
        }
    }

    #[test]
    fn select_filters_prefix_and_orders_by_key() {
        let layout = vec![
            ColumnDefinition::string_key("keyName0"),
            ColumnDefinition::string_key("keyName1"),
            ColumnDefinition::bytes_payload("Details"),
        ];
        assert_eq!(
            select_sql("T", &layout, 1),
            "SELECT \"keyName0\", \"keyName1\", \"Details\" FROM \"lt_T\" WHERE \"keyName0\" = ?1 \
             ORDER BY \"keyName0\", \"keyName1\""
        );
        assert!(!select_sql("T", &layout, 0).contains("WHERE"));
    }
}
