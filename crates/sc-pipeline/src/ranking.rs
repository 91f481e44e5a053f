//! Price-ranking branch: ordered listing straight from the store, no generation.

use sc_protocol::{PricedProduct, SortOrder, format_yen};

use crate::canned::NO_PRICED_PRODUCTS_REPLY;
use crate::error::StoreError;
use crate::store::CatalogStore;

/// Fetch up to `limit` priced products in `sort` order and phrase the reply.
#[tracing::instrument(skip(store))]
pub async fn rank_by_price(
    store: &dyn CatalogStore,
    sort: SortOrder,
    limit: u8,
) -> Result<String, StoreError> {
    let rows = store.list_by_price(sort, limit).await?;
    tracing::info!(rows = rows.len(), "price ranking fetched");
    Ok(format_ranking(sort, &rows))
}

/// Single-item phrasing for one row, numbered list otherwise.
pub fn format_ranking(sort: SortOrder, rows: &[PricedProduct]) -> String {
    let (superlative, order) = match sort {
        SortOrder::Asc => ("最も価格が安い", "安い"),
        SortOrder::Desc => ("最も価格が高い", "高い"),
    };

    match rows {
        [] => NO_PRICED_PRODUCTS_REPLY.to_string(),
        [only] => format!(
            "{superlative}商品は「{}」({})です。",
            only.name,
            format_yen(only.price)
        ),
        many => {
            let mut reply = format!("価格が{order}順に{}件の商品をご紹介します。", many.len());
            for (i, row) in many.iter().enumerate() {
                reply.push_str(&format!("\n{}. {} - {}", i + 1, row.name, format_yen(row.price)));
            }
            reply
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn row(name: &str, price: i64) -> PricedProduct {
        PricedProduct {
            name: name.into(),
            price,
        }
    }

    #[test]
    fn single_item_phrasing() {
        assert_eq!(
            format_ranking(SortOrder::Asc, &[row("B", 50)]),
            "最も価格が安い商品は「B」(¥50)です。"
        );
        assert_eq!(
            format_ranking(SortOrder::Desc, &[row("Hive", 32_000)]),
            "最も価格が高い商品は「Hive」(¥32,000)です。"
        );
    }

    #[test]
    fn numbered_list() {
        let reply = format_ranking(SortOrder::Asc, &[row("B", 50), row("A", 100), row("C", 200)]);
        assert_eq!(
            reply,
            "価格が安い順に3件の商品をご紹介します。\n1. B - ¥50\n2. A - ¥100\n3. C - ¥200"
        );
    }

    #[test]
    fn empty_result() {
        assert_eq!(format_ranking(SortOrder::Desc, &[]), NO_PRICED_PRODUCTS_REPLY);
    }

    #[tokio::test]
    async fn ranks_from_store() {
        let mut store = MemoryStore::new();
        store.add_product("A", 100, "", &[]);
        store.add_product("B", 50, "", &[]);
        store.add_product("C", 200, "", &[]);

        let reply = rank_by_price(&store, SortOrder::Asc, 3).await.unwrap();
        let lines: Vec<_> = reply.lines().skip(1).collect();
        assert_eq!(lines, ["1. B - ¥50", "2. A - ¥100", "3. C - ¥200"]);
    }

    #[tokio::test]
    async fn zero_priced_products_are_excluded() {
        let mut store = MemoryStore::new();
        store.add_product("Free", 0, "", &[]);
        let reply = rank_by_price(&store, SortOrder::Asc, 5).await.unwrap();
        assert_eq!(reply, NO_PRICED_PRODUCTS_REPLY);
    }
}
