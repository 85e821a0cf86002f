//! Comic store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide ordinal-indexed and latest-comic queries plus create/update
//!   mutations over canonical `comics` storage.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths must call `Comic::validate()` before SQL mutations.
//! - Read paths must reject invalid persisted state instead of masking it.
//! - `create` computes the next ordinal and inserts inside one IMMEDIATE
//!   transaction, so concurrent creates cannot race to the same ordinal.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::comic::{Comic, ComicDraft, ComicImage, ComicKey, ComicValidationError};
use rusqlite::{params, Connection, Row, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const COMIC_SELECT_SQL: &str = "SELECT
    key,
    ordinal,
    title,
    image_bytes,
    image_content_type,
    published_at
FROM comics";

const REQUIRED_COLUMNS: &[&str] = &[
    "key",
    "ordinal",
    "title",
    "image_bytes",
    "image_content_type",
    "published_at",
];

pub type StoreResult<T> = Result<T, StoreError>;

/// Generic store error for comic persistence and query operations.
#[derive(Debug)]
pub enum StoreError {
    Validation(ComicValidationError),
    Db(DbError),
    NotFound(u32),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(ordinal) => write!(f, "comic not found: ordinal {ordinal}"),
            Self::InvalidData(message) => write!(f, "invalid persisted comic data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; run migrations first"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "connection is missing required table `{table}`")
            }
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "table `{table}` is missing required column `{column}`")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ComicValidationError> for StoreError {
    fn from(value: ComicValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Store interface for comic persistence.
///
/// Absence is reported as `Ok(None)` on reads; the catalog service owns the
/// None-to-NotFound translation. There is deliberately no key-based lookup in
/// this contract.
pub trait ComicStore {
    /// Gets one comic by its public ordinal.
    fn get_by_ordinal(&self, ordinal: u32) -> StoreResult<Option<Comic>>;
    /// Gets the comic with the maximum ordinal, if any exist.
    fn get_latest(&self) -> StoreResult<Option<Comic>>;
    /// Persists a new comic, assigning its key and the next ordinal.
    fn create(&mut self, draft: &ComicDraft, image: Option<&ComicImage>) -> StoreResult<Comic>;
    /// Persists edits to an existing comic, addressed by its ordinal.
    fn update(&mut self, comic: &Comic) -> StoreResult<Comic>;
}

/// SQLite-backed comic store.
pub struct SqliteComicStore<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteComicStore<'conn> {
    /// Constructs a store from a migrated/ready connection.
    ///
    /// Rejects connections whose schema version or `comics` shape does not
    /// match what this binary expects, instead of failing later mid-query.
    pub fn try_new(conn: &'conn mut Connection) -> StoreResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ComicStore for SqliteComicStore<'_> {
    fn get_by_ordinal(&self, ordinal: u32) -> StoreResult<Option<Comic>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{COMIC_SELECT_SQL} WHERE ordinal = ?1;"))?;

        let mut rows = stmt.query(params![ordinal])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_comic_row(row)?));
        }

        Ok(None)
    }

    fn get_latest(&self) -> StoreResult<Option<Comic>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{COMIC_SELECT_SQL} ORDER BY ordinal DESC LIMIT 1;"))?;

        let mut rows = stmt.query([])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_comic_row(row)?));
        }

        Ok(None)
    }

    fn create(&mut self, draft: &ComicDraft, image: Option<&ComicImage>) -> StoreResult<Comic> {
        // IMMEDIATE takes the write lock up front; MAX(ordinal) and the
        // insert observe the same serialized state.
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let next_ordinal: u32 = tx.query_row(
            "SELECT COALESCE(MAX(ordinal), 0) + 1 FROM comics;",
            [],
            |row| row.get(0),
        )?;
        let published_at: i64 = tx.query_row(
            "SELECT CAST(strftime('%s', 'now') AS INTEGER) * 1000;",
            [],
            |row| row.get(0),
        )?;

        let comic = Comic {
            key: Uuid::new_v4(),
            ordinal: next_ordinal,
            title: draft.title.clone(),
            image: image.cloned(),
            published_at,
        };
        comic.validate()?;

        tx.execute(
            "INSERT INTO comics (
                key,
                ordinal,
                title,
                image_bytes,
                image_content_type,
                published_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                comic.key.to_string(),
                comic.ordinal,
                comic.title.as_deref(),
                comic.image.as_ref().map(|img| img.bytes.as_slice()),
                comic.image.as_ref().map(|img| img.content_type.as_str()),
                comic.published_at,
            ],
        )?;
        tx.commit()?;

        Ok(comic)
    }

    fn update(&mut self, comic: &Comic) -> StoreResult<Comic> {
        comic.validate()?;

        // Key and published_at are never rewritten; the row keeps its
        // original identity and publication time.
        let changed = self.conn.execute(
            "UPDATE comics
             SET
                title = ?1,
                image_bytes = ?2,
                image_content_type = ?3
             WHERE ordinal = ?4;",
            params![
                comic.title.as_deref(),
                comic.image.as_ref().map(|img| img.bytes.as_slice()),
                comic.image.as_ref().map(|img| img.content_type.as_str()),
                comic.ordinal,
            ],
        )?;

        if changed == 0 {
            return Err(StoreError::NotFound(comic.ordinal));
        }

        self.get_by_ordinal(comic.ordinal)?.ok_or_else(|| {
            StoreError::InvalidData(format!(
                "comic at ordinal {} vanished after update",
                comic.ordinal
            ))
        })
    }
}

fn parse_comic_row(row: &Row<'_>) -> StoreResult<Comic> {
    let key_text: String = row.get("key")?;
    let key: ComicKey = Uuid::parse_str(&key_text).map_err(|_| {
        StoreError::InvalidData(format!("invalid uuid value `{key_text}` in comics.key"))
    })?;

    let image_bytes: Option<Vec<u8>> = row.get("image_bytes")?;
    let image_content_type: Option<String> = row.get("image_content_type")?;
    let image = match (image_bytes, image_content_type) {
        (Some(bytes), Some(content_type)) => Some(ComicImage {
            bytes,
            content_type,
        }),
        (None, None) => None,
        (Some(_), None) => {
            return Err(StoreError::InvalidData(
                "comic row has image bytes without a content type".to_string(),
            ));
        }
        (None, Some(_)) => {
            return Err(StoreError::InvalidData(
                "comic row has an image content type without bytes".to_string(),
            ));
        }
    };

    let comic = Comic {
        key,
        ordinal: row.get("ordinal")?,
        title: row.get("title")?,
        image,
        published_at: row.get("published_at")?,
    };
    comic.validate()?;
    Ok(comic)
}

fn ensure_connection_ready(conn: &Connection) -> StoreResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    let table_exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'comics'
        );",
        [],
        |row| row.get(0),
    )?;
    if table_exists == 0 {
        return Err(StoreError::MissingRequiredTable("comics"));
    }

    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('comics');")?;
    let mut rows = stmt.query([])?;
    let mut present = Vec::new();
    while let Some(row) = rows.next()? {
        present.push(row.get::<_, String>(0)?);
    }

    for column in REQUIRED_COLUMNS {
        if !present.iter().any(|name| name == column) {
            return Err(StoreError::MissingRequiredColumn {
                table: "comics",
                column,
            });
        }
    }

    Ok(())
}
