use serde::{Deserialize, Serialize};

/// Smallest result count a price ranking may ask for.
pub const MIN_LIMIT: u8 = 1;
/// Largest result count a price ranking may ask for.
pub const MAX_LIMIT: u8 = 10;

/// Price ordering for ranking requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Cheapest first.
    #[default]
    Asc,
    /// Most expensive first.
    Desc,
}

impl SortOrder {
    /// Parse the exact wire spelling (`"asc"` / `"desc"`). Anything else is rejected.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Resolved intent of a query. Same shape the classifier model is asked to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    #[default]
    None,
    PriceComparison { sort: SortOrder, limit: u8 },
}

impl Intent {
    /// Build a price-ranking intent, clamping `limit` into `MIN_LIMIT..=MAX_LIMIT`.
    pub fn price_comparison(sort: SortOrder, limit: i64) -> Self {
        Self::PriceComparison {
            sort,
            limit: clamp_limit(limit),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Clamp any candidate count into the accepted ranking range.
pub fn clamp_limit(limit: i64) -> u8 {
    limit.clamp(i64::from(MIN_LIMIT), i64::from(MAX_LIMIT)) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_serialization() {
        assert_eq!(
            serde_json::to_string(&Intent::None).unwrap(),
            r#"{"type":"none"}"#
        );
    }

    #[test]
    fn price_comparison_serialization() {
        let intent = Intent::price_comparison(SortOrder::Desc, 3);
        assert_eq!(
            serde_json::to_string(&intent).unwrap(),
            r#"{"type":"price_comparison","sort":"desc","limit":3}"#
        );
    }

    #[test]
    fn limit_is_clamped() {
        assert_eq!(
            Intent::price_comparison(SortOrder::Asc, 0),
            Intent::PriceComparison {
                sort: SortOrder::Asc,
                limit: 1
            }
        );
        assert_eq!(
            Intent::price_comparison(SortOrder::Asc, 999),
            Intent::PriceComparison {
                sort: SortOrder::Asc,
                limit: 10
            }
        );
        assert_eq!(clamp_limit(-5), 1);
        assert_eq!(clamp_limit(7), 7);
    }

    #[test]
    fn sort_order_wire_spelling_is_strict() {
        assert_eq!(SortOrder::from_wire("asc"), Some(SortOrder::Asc));
        assert_eq!(SortOrder::from_wire("desc"), Some(SortOrder::Desc));
        assert_eq!(SortOrder::from_wire("ASC"), None);
        assert_eq!(SortOrder::from_wire("ascending"), None);
    }

    #[test]
    fn default_sort_is_ascending() {
        assert_eq!(SortOrder::default(), SortOrder::Asc);
    }
}
