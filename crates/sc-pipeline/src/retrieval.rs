//! Semantic retrieval over the document and product vector indexes.
//!
//! The document search is mandatory: its failure fails the request. The
//! product search only runs when the catalog matcher found nothing, and its
//! failure is logged and skipped.

use sc_protocol::{Product, format_yen};
use serde::Deserialize;

use crate::error::PipelineError;
use crate::llm::Embedder;
use crate::store::CatalogStore;

/// Separator between retrieved entries in the semantic context.
pub const ENTRY_SEPARATOR: &str = "\n---\n";

/// Vector search limits.
#[derive(Debug, Clone, Deserialize)]
pub struct RetrievalConfig {
    /// Minimum similarity for a hit.
    #[serde(default = "default_threshold")]
    pub match_threshold: f64,
    /// Maximum document chunks.
    #[serde(default = "default_doc_count")]
    pub doc_count: usize,
    /// Maximum supplementary products.
    #[serde(default = "default_product_count")]
    pub product_count: usize,
}

fn default_threshold() -> f64 {
    0.05
}
fn default_doc_count() -> usize {
    5
}
fn default_product_count() -> usize {
    3
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            match_threshold: default_threshold(),
            doc_count: default_doc_count(),
            product_count: default_product_count(),
        }
    }
}

/// Entries found by the vector searches, documents first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SemanticContext {
    pub entries: Vec<String>,
    pub doc_hits: usize,
    pub product_hits: usize,
}

impl SemanticContext {
    pub fn joined(&self) -> String {
        self.entries.join(ENTRY_SEPARATOR)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Embed `query` and run the vector searches.
///
/// `include_products` is false when the catalog matcher already found the
/// product the query is about.
#[tracing::instrument(skip_all, fields(include_products = include_products))]
pub async fn retrieve(
    embedder: &dyn Embedder,
    store: &dyn CatalogStore,
    query: &str,
    include_products: bool,
    config: &RetrievalConfig,
) -> Result<SemanticContext, PipelineError> {
    let embedding = embedder
        .embed(query)
        .await
        .map_err(PipelineError::Embedding)?;

    let docs = store
        .match_docs(&embedding, config.match_threshold, config.doc_count)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "document search failed");
            PipelineError::Database(e)
        })?;

    let mut context = SemanticContext {
        doc_hits: docs.len(),
        entries: docs.into_iter().map(|d| d.content).collect(),
        product_hits: 0,
    };

    if include_products {
        let products = similar_products(store, &embedding, config).await;
        context.product_hits = products.len();
        context.entries.extend(products.iter().map(product_summary));
    }

    tracing::info!(
        docs = context.doc_hits,
        products = context.product_hits,
        "semantic retrieval complete"
    );
    Ok(context)
}

/// Supplementary product search. Never fails: errors are logged and yield nothing.
async fn similar_products(
    store: &dyn CatalogStore,
    embedding: &[f32],
    config: &RetrievalConfig,
) -> Vec<Product> {
    let matches = match store
        .match_products(embedding, config.match_threshold, config.product_count)
        .await
    {
        Ok(m) => m,
        Err(e) => {
            tracing::warn!(error = %e, "product vector search failed, continuing without it");
            return Vec::new();
        }
    };

    if matches.is_empty() {
        return Vec::new();
    }

    let ids: Vec<_> = matches.iter().map(|m| m.product_id).collect();
    match store.get_products_by_ids(&ids).await {
        Ok(products) => products,
        Err(e) => {
            tracing::warn!(error = %e, "product detail lookup failed, continuing without it");
            Vec::new()
        }
    }
}

/// One-line summary of a product found by similarity.
pub fn product_summary(product: &Product) -> String {
    format!(
        "[商品] {} - 価格: {} - {}",
        product.name,
        format_yen(product.price),
        product.description
    )
}
