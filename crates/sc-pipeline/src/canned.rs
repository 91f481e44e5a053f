//! Fixed replies: greetings/thanks short-circuit plus the pipeline's fallback strings.

use std::sync::LazyLock;

use regex::Regex;

pub const GREETING_REPLY: &str = "こんにちは！Portfolio Showcaseのアシスタントです。商品やサービスについて、お気軽にご質問ください。";
pub const THANKS_REPLY: &str =
    "どういたしまして！ほかにもご不明な点があれば、いつでもお尋ねください。";
pub const FAREWELL_REPLY: &str = "ご利用ありがとうございました。またいつでもお声がけください。";

/// Fusion produced no grounding at all.
pub const NO_INFO_REPLY: &str = "申し訳ありません。該当する商品・情報が見つかりませんでした。Portfolio Showcaseの商品については、具体的な商品名をお聞かせください。";

/// Price ranking found nothing with a positive price.
pub const NO_PRICED_PRODUCTS_REPLY: &str =
    "申し訳ありません。価格が登録されている商品が見つかりませんでした。";

/// Patterns run against normalized text, so no whitespace and lowercase only.
/// Order matters: the first match wins.
static PREDEFINED: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    vec![
        (Regex::new(r"ありがとう|有難う|感謝|thank").unwrap(), THANKS_REPLY),
        (
            Regex::new(
                r"^(こんにちは|こんにちわ|こんばんは|おはよう(ございます)?|はじめまして|hello|hi|hey)[!！。.、～~]*$",
            )
            .unwrap(),
            GREETING_REPLY,
        ),
        (
            Regex::new(r"^(さようなら|さよなら|バイバイ|またね|bye|goodbye)[!！。.、～~]*$").unwrap(),
            FAREWELL_REPLY,
        ),
    ]
});

/// Canned reply for `normalized` (output of `normalize::normalize`), if any.
pub fn match_predefined(normalized: &str) -> Option<&'static str> {
    let reply = PREDEFINED
        .iter()
        .find(|(pattern, _)| pattern.is_match(normalized))
        .map(|(_, reply)| *reply);
    if reply.is_some() {
        tracing::debug!("predefined reply matched");
    }
    reply
}
