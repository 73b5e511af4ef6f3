//! SQLite storage backend for promotions.

use std::path::Path;

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::models::Promotion;
use crate::services::filter_service::PromotionFilter;

use super::traits::PromotionStore;
use super::StorageError;

const PROMOTION_COLUMNS: &str = "id, name, promotion_type, value, product_id, start_date, end_date";

/// SQLite-backed promotion store.
///
/// The connection is guarded by an async mutex; each operation takes the
/// lock for its full find-mutate-commit sequence, so a request observes the
/// store before or after another request's change, never in between.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) a store at the given database path.
    pub fn open(db_path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(db_path)?;
        init_schema(&conn)?;
        info!("Promotion database ready at {:?}", db_path);
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open a private in-memory store.
    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

fn init_schema(conn: &Connection) -> Result<(), StorageError> {
    // Dates are stored as ISO-8601 text; lexicographic order matches
    // calendar order, which the window predicates rely on.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS promotions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            promotion_type TEXT NOT NULL,
            value INTEGER NOT NULL,
            product_id INTEGER NOT NULL,
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            created_at TEXT NOT NULL,
            last_updated TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

fn row_to_promotion(row: &Row<'_>) -> rusqlite::Result<Promotion> {
    let start_date: String = row.get("start_date")?;
    let end_date: String = row.get("end_date")?;
    Ok(Promotion {
        id: Some(row.get("id")?),
        name: row.get("name")?,
        promotion_type: row.get("promotion_type")?,
        value: row.get("value")?,
        product_id: row.get("product_id")?,
        start_date: start_date.parse().map_err(|_| {
            rusqlite::Error::InvalidColumnType(5, "start_date".to_string(), rusqlite::types::Type::Text)
        })?,
        end_date: end_date.parse().map_err(|_| {
            rusqlite::Error::InvalidColumnType(6, "end_date".to_string(), rusqlite::types::Type::Text)
        })?,
    })
}

fn select_promotions(
    conn: &Connection,
    predicate: &str,
    args: &[&dyn rusqlite::ToSql],
) -> Result<Vec<Promotion>, StorageError> {
    let sql = format!("SELECT {PROMOTION_COLUMNS} FROM promotions {predicate} ORDER BY id");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(args, row_to_promotion)?;
    let mut promotions = Vec::new();
    for row in rows {
        promotions.push(row?);
    }
    Ok(promotions)
}

#[async_trait::async_trait]
impl PromotionStore for SqliteStore {
    async fn insert(&self, promotion: &Promotion) -> Result<Promotion, StorageError> {
        if promotion.id.is_some() {
            return Err(StorageError::InvalidRecord(
                "id is assigned by the server and must not be supplied".to_string(),
            ));
        }

        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        let now = Utc::now().to_rfc3339();
        tx.execute(
            "INSERT INTO promotions
                (name, promotion_type, value, product_id, start_date, end_date, created_at, last_updated)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                promotion.name,
                promotion.promotion_type,
                promotion.value,
                promotion.product_id,
                promotion.start_date.to_string(),
                promotion.end_date.to_string(),
                now,
                now,
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        info!("Created promotion '{}' with id {}", promotion.name, id);
        let mut created = promotion.clone();
        created.id = Some(id);
        Ok(created)
    }

    async fn get(&self, id: i64) -> Result<Option<Promotion>, StorageError> {
        let conn = self.conn.lock().await;
        let sql = format!("SELECT {PROMOTION_COLUMNS} FROM promotions WHERE id = ?1");
        let promotion = conn
            .query_row(&sql, params![id], row_to_promotion)
            .optional()?;
        Ok(promotion)
    }

    async fn list(&self, filter: &PromotionFilter) -> Result<Vec<Promotion>, StorageError> {
        let conn = self.conn.lock().await;
        match filter {
            PromotionFilter::All => select_promotions(&conn, "", params![]),
            PromotionFilter::ById(id) => select_promotions(&conn, "WHERE id = ?1", params![id]),
            PromotionFilter::ActiveOn(on) => {
                let on = on.to_string();
                select_promotions(&conn, "WHERE start_date <= ?1 AND end_date >= ?1", params![on])
            }
            PromotionFilter::InactiveOn(on) => {
                let on = on.to_string();
                select_promotions(&conn, "WHERE start_date > ?1 OR end_date < ?1", params![on])
            }
            PromotionFilter::ByName(name) => {
                select_promotions(&conn, "WHERE name = ?1", params![name])
            }
            PromotionFilter::ByProductId(product_id) => {
                select_promotions(&conn, "WHERE product_id = ?1", params![product_id])
            }
            PromotionFilter::ByType(ptype) => {
                select_promotions(&conn, "WHERE promotion_type = ?1", params![ptype])
            }
            PromotionFilter::Nothing => Ok(Vec::new()),
        }
    }

    async fn replace(&self, promotion: &Promotion) -> Result<Promotion, StorageError> {
        let id = promotion.id.ok_or_else(|| {
            StorageError::InvalidRecord("Update called with empty id field".to_string())
        })?;

        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        let updated = tx.execute(
            "UPDATE promotions
             SET name = ?1, promotion_type = ?2, value = ?3, product_id = ?4,
                 start_date = ?5, end_date = ?6, last_updated = ?7
             WHERE id = ?8",
            params![
                promotion.name,
                promotion.promotion_type,
                promotion.value,
                promotion.product_id,
                promotion.start_date.to_string(),
                promotion.end_date.to_string(),
                Utc::now().to_rfc3339(),
                id,
            ],
        )?;
        if updated == 0 {
            // dropping the uncommitted transaction rolls it back
            return Err(StorageError::NotFound(id));
        }
        tx.commit()?;

        info!("Updated promotion {}", id);
        Ok(promotion.clone())
    }

    async fn delete(&self, id: i64) -> Result<bool, StorageError> {
        let conn = self.conn.lock().await;
        let removed = conn.execute("DELETE FROM promotions WHERE id = ?1", params![id])?;
        if removed > 0 {
            info!("Deleted promotion {}", id);
        }
        Ok(removed > 0)
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let conn = self.conn.lock().await;
        conn.execute("DELETE FROM promotions", [])?;

        let remaining: i64 = conn.query_row("SELECT COUNT(*) FROM promotions", [], |row| row.get(0))?;
        if remaining > 0 {
            error!("{} promotions survived bulk delete; resetting table", remaining);
            conn.execute("DROP TABLE promotions", [])?;
            init_schema(&conn)?;
        }
        Ok(())
    }
}
