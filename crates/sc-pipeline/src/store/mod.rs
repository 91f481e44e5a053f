//! Store contract: the catalog and vector-search queries the pipeline depends on.
//!
//! `sc-api` provides the PostgreSQL/pgvector implementation; `MemoryStore`
//! backs tests and local development.

pub mod memory;

use async_trait::async_trait;
use sc_protocol::{DocumentChunk, PricedProduct, Product, ProductMatch, SortOrder};
use uuid::Uuid;

use crate::error::StoreError;

/// Read-only view of the product catalog and its embeddings.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Every product name, in the store's natural order.
    async fn list_product_names(&self) -> Result<Vec<String>, StoreError>;

    /// Full details for the product named exactly `name`.
    ///
    /// `None` unless exactly one row matches.
    async fn get_product(&self, name: &str) -> Result<Option<Product>, StoreError>;

    /// Products with a positive price, ordered by price, at most `limit` rows.
    async fn list_by_price(
        &self,
        order: SortOrder,
        limit: u8,
    ) -> Result<Vec<PricedProduct>, StoreError>;

    /// `match_docs` similarity search over document chunks.
    async fn match_docs(
        &self,
        embedding: &[f32],
        threshold: f64,
        count: usize,
    ) -> Result<Vec<DocumentChunk>, StoreError>;

    /// `match_products` similarity search over product embeddings.
    async fn match_products(
        &self,
        embedding: &[f32],
        threshold: f64,
        count: usize,
    ) -> Result<Vec<ProductMatch>, StoreError>;

    /// Resolve product IDs to full rows. Unknown IDs are skipped.
    async fn get_products_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>, StoreError>;
}

pub use memory::MemoryStore;
