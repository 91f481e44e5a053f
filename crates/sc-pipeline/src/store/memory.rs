//! In-memory catalog store for tests and local development.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use sc_protocol::{DocumentChunk, PricedProduct, Product, ProductMatch, SortOrder};
use uuid::Uuid;

use super::CatalogStore;
use crate::error::StoreError;

struct StoredProduct {
    product: Product,
    embedding: Option<Vec<f32>>,
}

struct StoredDoc {
    content: String,
    embedding: Vec<f32>,
}

/// Counts of store calls, per query kind.
#[derive(Debug, Default)]
pub struct CallCounts {
    pub list_names: AtomicUsize,
    pub get_product: AtomicUsize,
    pub list_by_price: AtomicUsize,
    pub match_docs: AtomicUsize,
    pub match_products: AtomicUsize,
    pub get_by_ids: AtomicUsize,
}

impl CallCounts {
    /// Calls that only the general (retrieval) branch makes.
    pub fn retrieval_total(&self) -> usize {
        [
            &self.list_names,
            &self.get_product,
            &self.match_docs,
            &self.match_products,
            &self.get_by_ids,
        ]
        .iter()
        .map(|c| c.load(Ordering::SeqCst))
        .sum()
    }
}

/// A catalog store holding products and document chunks in memory.
///
/// Similarity is cosine similarity; the `fail_*` switches make the
/// corresponding query return an error.
#[derive(Default)]
pub struct MemoryStore {
    products: Vec<StoredProduct>,
    docs: Vec<StoredDoc>,
    pub fail_catalog: bool,
    pub fail_docs: bool,
    pub fail_products: bool,
    pub calls: CallCounts,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a product without an embedding. Returns its ID.
    pub fn add_product(
        &mut self,
        name: impl Into<String>,
        price: i64,
        description: impl Into<String>,
        features: &[&str],
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.products.push(StoredProduct {
            product: Product {
                id,
                name: name.into(),
                description: description.into(),
                price,
                features: features.iter().map(|f| f.to_string()).collect(),
            },
            embedding: None,
        });
        id
    }

    /// Attach an embedding to a previously added product.
    pub fn set_product_embedding(&mut self, id: Uuid, embedding: Vec<f32>) {
        if let Some(stored) = self.products.iter_mut().find(|p| p.product.id == id) {
            stored.embedding = Some(embedding);
        }
    }

    pub fn add_doc(&mut self, content: impl Into<String>, embedding: Vec<f32>) {
        self.docs.push(StoredDoc {
            content: content.into(),
            embedding,
        });
    }

    /// The four showcase products with 3-dimensional embeddings, plus two FAQ chunks.
    pub fn with_sample_catalog() -> Self {
        let mut m = Self::new();
        let hive = m.add_product(
            "AppBuzz Hive",
            32_000,
            "アプリ開発者向けのコミュニティプラットフォーム",
            &["フォーラム", "プロジェクト共有", "通知"],
        );
        let recipe = m.add_product(
            "MyRecipeNote",
            500,
            "シンプルなレシピ管理アプリ",
            &["レシピ保存", "買い物リスト", "タグ検索"],
        );
        let sync = m.add_product(
            "SnazzySync Apps",
            24_000,
            "複数デバイス間のデータ同期ツール",
            &["リアルタイム同期", "オフライン対応"],
        );
        let planner = m.add_product(
            "CollabPlanner",
            1_200,
            "チーム向けのタスク・スケジュール共有アプリ",
            &["カンバン", "カレンダー", "コメント"],
        );
        m.set_product_embedding(hive, vec![0.9, 0.1, 0.0]);
        m.set_product_embedding(recipe, vec![0.1, 0.9, 0.0]);
        m.set_product_embedding(sync, vec![0.7, 0.0, 0.3]);
        m.set_product_embedding(planner, vec![0.5, 0.5, 0.2]);
        m.add_doc(
            "[FAQ] 購入した商品はマイページからダウンロードできます。",
            vec![0.0, 0.2, 0.9],
        );
        m.add_doc(
            "[ガイド] お支払いはクレジットカードのみ対応しています。",
            vec![0.0, 0.0, 1.0],
        );
        m
    }

    fn ranked<T>(
        candidates: impl Iterator<Item = (T, f64)>,
        threshold: f64,
        count: usize,
    ) -> Vec<(T, f64)> {
        let mut hits: Vec<(T, f64)> = candidates.filter(|(_, s)| *s > threshold).collect();
        hits.sort_by(|a, b| b.1.total_cmp(&a.1));
        hits.truncate(count);
        hits
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn list_product_names(&self) -> Result<Vec<String>, StoreError> {
        self.calls.list_names.fetch_add(1, Ordering::SeqCst);
        if self.fail_catalog {
            return Err(StoreError::Query {
                table: "products",
                message: "memory store: catalog unavailable".into(),
            });
        }
        Ok(self.products.iter().map(|p| p.product.name.clone()).collect())
    }

    async fn get_product(&self, name: &str) -> Result<Option<Product>, StoreError> {
        self.calls.get_product.fetch_add(1, Ordering::SeqCst);
        let mut rows = self.products.iter().filter(|p| p.product.name == name);
        match (rows.next(), rows.next()) {
            (Some(only), None) => Ok(Some(only.product.clone())),
            _ => Ok(None),
        }
    }

    async fn list_by_price(
        &self,
        order: SortOrder,
        limit: u8,
    ) -> Result<Vec<PricedProduct>, StoreError> {
        self.calls.list_by_price.fetch_add(1, Ordering::SeqCst);
        let mut rows: Vec<PricedProduct> = self
            .products
            .iter()
            .filter(|p| p.product.price > 0)
            .map(|p| PricedProduct {
                name: p.product.name.clone(),
                price: p.product.price,
            })
            .collect();
        match order {
            SortOrder::Asc => rows.sort_by_key(|r| r.price),
            SortOrder::Desc => rows.sort_by_key(|r| std::cmp::Reverse(r.price)),
        }
        rows.truncate(usize::from(limit));
        Ok(rows)
    }

    async fn match_docs(
        &self,
        embedding: &[f32],
        threshold: f64,
        count: usize,
    ) -> Result<Vec<DocumentChunk>, StoreError> {
        self.calls.match_docs.fetch_add(1, Ordering::SeqCst);
        if self.fail_docs {
            return Err(StoreError::Rpc {
                function: "match_docs",
                message: "memory store: document index unavailable".into(),
            });
        }
        let scored = self
            .docs
            .iter()
            .map(|d| (d.content.clone(), cosine_similarity(embedding, &d.embedding)));
        Ok(Self::ranked(scored, threshold, count)
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
        self.calls.match_products.fetch_add(1, Ordering::SeqCst);
        if self.fail_products {
            return Err(StoreError::Rpc {
                function: "match_products",
                message: "memory store: product index unavailable".into(),
            });
        }
        let scored = self.products.iter().filter_map(|p| {
            p.embedding
                .as_ref()
                .map(|e| (p.product.id, cosine_similarity(embedding, e)))
        });
        Ok(Self::ranked(scored, threshold, count)
            .into_iter()
            .map(|(product_id, similarity)| ProductMatch {
                product_id,
                similarity,
            })
            .collect())
    }

    async fn get_products_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Product>, StoreError> {
        self.calls.get_by_ids.fetch_add(1, Ordering::SeqCst);
        Ok(ids
            .iter()
            .filter_map(|id| self.products.iter().find(|p| p.product.id == *id))
            .map(|p| p.product.clone())
            .collect())
    }
}

/// Cosine similarity; 0.0 for mismatched lengths or zero vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let (mut dot, mut norm_a, mut norm_b) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b) {
        let (x, y) = (f64::from(*x), f64::from(*y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a.sqrt() * norm_b.sqrt())
}
