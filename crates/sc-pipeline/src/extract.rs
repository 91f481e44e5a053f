//! Quantity and direction extraction shared by every intent classifier.
//!
//! The model-backed classifier uses these as a deterministic correction of
//! its output; the keyword classifier uses them as its whole decision.

use std::sync::LazyLock;

use regex::Regex;
use sc_protocol::SortOrder;

static TOP_N: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:top|上位|トップ|ベスト)\s*([0-9]+)").unwrap());

static DIGIT_COUNTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]+)\s*(?:つ|個|件|品|選|位|点|種類|商品|アプリ|items?|products?|apps?)")
        .unwrap()
});

static KANJI_COUNTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([一二三四五六七八九十])\s*(?:つ|個|件|品|選|点|種類)").unwrap());

const CHEAP_KEYWORDS: &[&str] = &[
    "安い",
    "安価",
    "最安",
    "低価格",
    "お手頃",
    "手頃",
    "リーズナブル",
    "格安",
    "cheap",
    "lowest",
    "inexpensive",
    "affordable",
];

const EXPENSIVE_KEYWORDS: &[&str] = &[
    "高い",
    "高価",
    "高額",
    "高級",
    "最高値",
    "expensive",
    "priciest",
    "highest",
    "premium",
];

const RANKING_CUES: &[&str] = &[
    "一番",
    "いちばん",
    "最も",
    "もっとも",
    "安い順",
    "高い順",
    "価格順",
    "値段順",
    "ランキング",
    "top",
    "上位",
    "ベスト",
    "最安",
    "最高値",
    "cheapest",
    "most expensive",
];

/// Requested result count, e.g. "3つ", "上位5", "top 3", "三つ".
///
/// Returns the raw number; clamping is the caller's job.
pub fn quantity(query: &str) -> Option<i64> {
    let text = ascii_digits(&query.to_lowercase());

    for re in [&*TOP_N, &*DIGIT_COUNTER] {
        if let Some(caps) = re.captures(&text) {
            return Some(parse_count(&caps[1]));
        }
    }

    KANJI_COUNTER
        .captures(&text)
        .and_then(|caps| caps[1].chars().next())
        .and_then(kanji_value)
}

/// Price direction implied by the wording. Cheap wins when both appear.
pub fn direction(query: &str) -> Option<SortOrder> {
    let lower = query.to_lowercase();
    if contains_any(&lower, CHEAP_KEYWORDS) {
        Some(SortOrder::Asc)
    } else if contains_any(&lower, EXPENSIVE_KEYWORDS) {
        Some(SortOrder::Desc)
    } else {
        None
    }
}

/// Whether the query asks for an ordering ("一番", "ランキング", "top", ...).
pub fn has_ranking_cue(query: &str) -> bool {
    contains_any(&query.to_lowercase(), RANKING_CUES)
}

fn contains_any(text: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| text.contains(n))
}

/// Map full-width digits (`０`..`９`) onto ASCII.
fn ascii_digits(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '０'..='９' => char::from(b'0' + (c as u32 - '０' as u32) as u8),
            _ => c,
        })
        .collect()
}

/// Digit runs too long for i64 saturate; the clamp downstream handles the rest.
fn parse_count(digits: &str) -> i64 {
    digits.parse().unwrap_or(i64::MAX)
}

fn kanji_value(c: char) -> Option<i64> {
    let value = match c {
        '一' => 1,
        '二' => 2,
        '三' => 3,
        '四' => 4,
        '五' => 5,
        '六' => 6,
        '七' => 7,
        '八' => 8,
        '九' => 9,
        '十' => 10,
        _ => return None,
    };
    Some(value)
}
