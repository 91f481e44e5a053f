//! Exact catalog mention lookup.
//!
//! A product matches when its normalized name is a non-empty substring of the
//! normalized query. Names are scanned in store order and the first hit wins.

use sc_protocol::{Product, format_yen};

use crate::error::StoreError;
use crate::normalize::normalize;
use crate::store::CatalogStore;

/// The product mentioned in the query, with its rendered context block.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogMatch {
    pub product: Product,
    pub context: String,
}

/// First catalog name whose normalized form occurs in `normalized_query`.
pub fn find_mention<'a>(normalized_query: &str, names: &'a [String]) -> Option<&'a str> {
    names
        .iter()
        .find(|name| {
            let key = normalize(name);
            !key.is_empty() && normalized_query.contains(&key)
        })
        .map(String::as_str)
}

/// Look up the product mentioned in `normalized_query`, if any.
///
/// The name list is fetched fresh on every call.
#[tracing::instrument(skip_all)]
pub async fn match_catalog(
    store: &dyn CatalogStore,
    normalized_query: &str,
) -> Result<Option<CatalogMatch>, StoreError> {
    let names = store.list_product_names().await?;

    let Some(name) = find_mention(normalized_query, &names) else {
        tracing::debug!(catalog_size = names.len(), "no catalog mention");
        return Ok(None);
    };

    let Some(product) = store.get_product(name).await? else {
        tracing::warn!(name, "catalog name did not resolve to exactly one product");
        return Ok(None);
    };

    tracing::info!(product = %product.name, "catalog match");
    let context = product_block(&product);
    Ok(Some(CatalogMatch { product, context }))
}

/// Structured context block for one product.
pub fn product_block(product: &Product) -> String {
    let features = if product.features.is_empty() {
        "なし".to_string()
    } else {
        product.features.join(", ")
    };
    format!(
        "【商品情報】\n商品名: {}\n価格: {}\n説明: {}\n機能: {}",
        product.name,
        format_yen(product.price),
        product.description,
        features
    )
}
