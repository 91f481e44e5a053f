//! Context fusion: catalog block + semantic entries into one bounded blob.

/// Join the product block and semantic context with a blank line.
///
/// `None` when nothing is left after trimming; the caller must then not ask
/// the model to answer.
pub fn fuse(product_block: Option<&str>, semantic: &str) -> Option<String> {
    let fused = format!("{}\n\n{}", product_block.unwrap_or_default(), semantic);
    let fused = fused.trim();
    (!fused.is_empty()).then(|| fused.to_string())
}
