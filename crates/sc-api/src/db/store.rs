//! `CatalogStore` over PostgreSQL + pgvector.

use async_trait::async_trait;
use pgvector::Vector;
use sc_pipeline::StoreError;
use sc_pipeline::store::CatalogStore;
use sc_protocol::{DocumentChunk, PricedProduct, Product, ProductMatch, SortOrder};
use sqlx::PgPool;
use uuid::Uuid;

/// Product row returned from the database.
#[derive(Debug, Clone, sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    description: String,
    price: i64,
    features: Vec<String>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            features: row.features,
        }
    }
}

const PRODUCT_COLUMNS: &str = "id, name, description, price::bigint AS price, features";

/// Catalog and vector search backed by a `PgPool`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn query_error(table: &'static str) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |e| StoreError::Query {
        table,
        message: e.to_string(),
    }
}

fn rpc_error(function: &'static str) -> impl FnOnce(sqlx::Error) -> StoreError {
    move |e| StoreError::Rpc {
        function,
        message: e.to_string(),
    }
}

fn price_listing_sql(order: SortOrder) -> String {
    let direction = match order {
        SortOrder::Asc => "ASC",
        SortOrder::Desc => "DESC",
    };
    format!(
        "SELECT name, price::bigint AS price FROM products \
         WHERE price > 0 ORDER BY price {direction}, name LIMIT $1"
    )
}

/// `match_count` argument; counts beyond `i32` saturate instead of wrapping negative.
fn sql_limit(count: usize) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn list_product_names(&self) -> Result<Vec<String>, StoreError> {
        sqlx::query_scalar::<_, String>("SELECT name FROM products ORDER BY created_at, name")
            .fetch_all(&self.pool)
            .await
            .map_err(query_error("products"))
    }

    async fn get_product(&self, name: &str) -> Result<Option<Product>, StoreError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE name = $1 LIMIT 2");
        let mut rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(name)
            .fetch_all(&self.pool)
            .await
            .map_err(query_error("products"))?;

        if rows.len() != 1 {
            tracing::debug!(name, rows = rows.len(), "product lookup not unique");
            return Ok(None);
        }
        Ok(rows.pop().map(Product::from))
    }

    async fn list_by_price(
        &self,
        order: SortOrder,
        limit: u8,
    ) -> Result<Vec<PricedProduct>, StoreError> {
        let rows = sqlx::query_as::<_, (String, i64)>(&price_listing_sql(order))
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(query_error("products"))?;

        Ok(rows
            .into_iter()
            .map(|(name, price)| PricedProduct { name, price })
            .collect())
    }

    async fn match_docs(
        &self,
        embedding: &[f32],
        threshold: f64,
        count: usize,
    ) -> Result<Vec<DocumentChunk>, StoreError> {
        let rows = sqlx::query_as::<_, (String, f64)>(
            "SELECT content, similarity FROM match_docs($1, $2, $3)",
        )
        .bind(Vector::from(embedding.to_vec()))
        .bind(threshold)
        .bind(sql_limit(count))
        .fetch_all(&self.pool)
        .await
        .map_err(rpc_error("match_docs"))?;

        Ok(rows
            .into_iter()
            .map(|(content, similarity)| DocumentChunk {
                content,
                similarity,
            })
            .collect())
    }

    async fn match_products(
        &self,
        embedding: &[f32],
        threshold: f64,
        count: usize,
    ) -> Result<Vec<ProductMatch>, StoreError> {
        let rows = sqlx::query_as::<_, (Uuid, f64)>(
            "SELECT product_id, similarity FROM match_products($1, $2, $3)",
        )
        .bind(Vector::from(embedding.to_vec()))
        .bind(threshold)
        .bind(sql_limit(count))
        .fetch_all(&self.pool)
        .await
        .map_err(rpc_error("match_products"))?;

        Ok(rows
            .into_iter()
            .map(|(product_id, similarity)| ProductMatch {
                product_id,
                similarity,
            })
            .collect())
    }

    async fn get_products_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>, StoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)");
        let rows = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(ids)
            .fetch_all(&self.pool)
            .await
            .map_err(query_error("products"))?;

        // Keep the similarity order of `ids`.
        let mut products: Vec<Product> = rows.into_iter().map(Product::from).collect();
        products.sort_by_key(|p| ids.iter().position(|id| *id == p.id));
        Ok(products)
    }
}
