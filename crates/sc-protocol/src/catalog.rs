use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Catalog record as stored in the `products` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Price in yen. Never negative.
    pub price: i64,
    /// Ordered feature list.
    #[serde(default)]
    pub features: Vec<String>,
}

/// Name/price pair returned by price-ordered listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedProduct {
    pub name: String,
    pub price: i64,
}

/// Row from the `match_products` similarity search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMatch {
    pub product_id: Uuid,
    pub similarity: f64,
}

/// Row from the `match_docs` similarity search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub content: String,
    pub similarity: f64,
}

/// Render a yen amount with thousands separators, e.g. `¥32,000`.
pub fn format_yen(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("-¥{grouped}")
    } else {
        format!("¥{grouped}")
    }
}
