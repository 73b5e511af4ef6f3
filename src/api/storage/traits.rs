//! Storage trait definitions for the promotion store backends.

use crate::models::Promotion;
use crate::services::filter_service::PromotionFilter;

use super::StorageError;

/// Storage backend trait for promotion persistence.
///
/// Implementations are injected as `Arc<dyn PromotionStore>` so handlers
/// never depend on a concrete backend. Every mutation is atomic: it either
/// commits fully or leaves the store unchanged.
#[async_trait::async_trait]
pub trait PromotionStore: Send + Sync {
    /// Insert a new promotion and assign it a fresh id.
    ///
    /// Records that already carry an id are rejected; ids are allocated by
    /// the store and never reused.
    async fn insert(&self, promotion: &Promotion) -> Result<Promotion, StorageError>;

    /// Fetch a promotion by id.
    async fn get(&self, id: i64) -> Result<Option<Promotion>, StorageError>;

    /// List promotions matching a filter, in ascending id order.
    async fn list(&self, filter: &PromotionFilter) -> Result<Vec<Promotion>, StorageError>;

    /// Replace all fields of an existing promotion.
    ///
    /// The record must carry an id, and that id must exist.
    async fn replace(&self, promotion: &Promotion) -> Result<Promotion, StorageError>;

    /// Delete a promotion by id. Returns whether a row was removed.
    async fn delete(&self, id: i64) -> Result<bool, StorageError>;

    /// Remove every promotion. The table is guaranteed empty afterwards.
    async fn clear(&self) -> Result<(), StorageError>;
}
