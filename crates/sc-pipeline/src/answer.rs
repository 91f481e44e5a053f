//! Grounded answer generation.

use crate::error::ModelError;
use crate::llm::LanguageModel;

/// Sentence the model must use when the context lacks the answer.
pub const NOT_IN_CONTEXT: &str = "申し訳ございませんが、その情報は現在の資料には含まれておりません。";

/// Where policy and terms questions are redirected.
pub const CONTACT_PAGE: &str = "/contact";

/// Fixed instruction for answer generation.
pub static SYSTEM_PROMPT: std::sync::LazyLock<String> = std::sync::LazyLock::new(|| {
    format!(
        "あなたはPortfolio Showcaseのサポートアシスタントです。以下のルールを必ず守って回答してください。\n\
         \n\
         1. 丁寧な敬語(です・ます調)で回答すること。\n\
         2. ユーザーメッセージ内の「コンテキスト」に書かれている情報だけを根拠に回答し、推測や外部知識で補わないこと。\n\
         3. コンテキストに答えがない場合は「{NOT_IN_CONTEXT}」とだけ伝えること。\n\
         4. ただし、利用規約・プライバシーポリシー・返金などの規約に関する質問でコンテキストに答えがない場合は、お問い合わせページ({CONTACT_PAGE})からご連絡いただくよう案内すること。\n\
         5. 結論を最初に述べ、その後に必要な補足を簡潔に続けること。\n\
         6. 価格は日本円(¥)で表示すること。"
    )
});

/// Ask the model to answer `query` from `context` only. Returns the model text verbatim.
#[tracing::instrument(skip_all, fields(model = model.model_name(), context_len = context.len()))]
pub async fn generate(
    model: &dyn LanguageModel,
    context: &str,
    query: &str,
) -> Result<String, ModelError> {
    let user = render_user_prompt(context, query);
    let answer = model.complete(&SYSTEM_PROMPT, &user).await?;
    tracing::info!(answer_len = answer.len(), "answer generated");
    Ok(answer)
}

fn render_user_prompt(context: &str, query: &str) -> String {
    format!("コンテキスト:\n{context}\n\n質問: {query}")
}
