//! Pipeline orchestrator.
//!
//! ```text
//! PredefinedCheck ─match──────────────────────────────────────────────▶ Done
//!        │
//! IntentCheck ─price──▶ PriceBranch ──────────────────────────────────▶ Done
//!        │
//! GeneralBranch ─▶ SemanticSearch ─▶ Fusion ─empty────────────────────▶ Done
//!                                       │
//!                                  Generation ────────────────────────▶ Done
//! ```
//!
//! Every stage returns the next stage or a `PipelineError`; there are no
//! retries and nothing survives the request.

use std::sync::Arc;

use sc_protocol::{Intent, SortOrder};
use serde::Deserialize;

use crate::canned::{NO_INFO_REPLY, match_predefined};
use crate::catalog::{CatalogMatch, match_catalog};
use crate::clients::Clients;
use crate::error::PipelineError;
use crate::fusion::fuse;
use crate::intent::{self, IntentClassifier, IntentMode};
use crate::llm::{Embedder, LanguageModel};
use crate::normalize::normalize;
use crate::retrieval::{RetrievalConfig, SemanticContext, retrieve};
use crate::store::CatalogStore;
use crate::{answer, ranking};

/// Tunables for one pipeline instance.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PipelineSettings {
    #[serde(default)]
    pub intent_mode: IntentMode,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

/// Which terminal branch produced the reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Canned greeting/thanks reply.
    Predefined,
    /// Price-ordered listing from the store.
    PriceRanking,
    /// Fusion found no grounding; fixed fallback reply.
    NoContext,
    /// Model-generated grounded answer.
    Generated,
}

/// Reply plus the branch that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub reply: String,
    pub route: Route,
}

impl Resolution {
    fn new(reply: impl Into<String>, route: Route) -> Self {
        Self {
            reply: reply.into(),
            route,
        }
    }
}

enum Stage {
    PredefinedCheck,
    IntentCheck,
    PriceBranch {
        sort: SortOrder,
        limit: u8,
    },
    GeneralBranch,
    SemanticSearch {
        catalog: Option<CatalogMatch>,
    },
    Fusion {
        catalog: Option<CatalogMatch>,
        semantic: SemanticContext,
    },
    Generation {
        context: String,
    },
    Done(Resolution),
}

impl Stage {
    fn name(&self) -> &'static str {
        match self {
            Self::PredefinedCheck => "predefined_check",
            Self::IntentCheck => "intent_check",
            Self::PriceBranch { .. } => "price_branch",
            Self::GeneralBranch => "general_branch",
            Self::SemanticSearch { .. } => "semantic_search",
            Self::Fusion { .. } => "fusion",
            Self::Generation { .. } => "generation",
            Self::Done(_) => "done",
        }
    }
}

/// Resolves one query into one reply.
pub struct Pipeline {
    classifier: Arc<dyn IntentClassifier>,
    model: Arc<dyn LanguageModel>,
    embedder: Arc<dyn Embedder>,
    store: Arc<dyn CatalogStore>,
    retrieval: RetrievalConfig,
}

impl Pipeline {
    pub fn new(clients: &Clients, settings: &PipelineSettings) -> Self {
        Self {
            classifier: intent::build(settings.intent_mode, clients.model.clone()),
            model: clients.model.clone(),
            embedder: clients.embedder.clone(),
            store: clients.store.clone(),
            retrieval: settings.retrieval.clone(),
        }
    }

    /// Run the state machine for `query` until it reaches `Done` or fails.
    pub async fn resolve(&self, query: &str) -> Result<Resolution, PipelineError> {
        let normalized = normalize(query);
        let mut stage = Stage::PredefinedCheck;

        loop {
            tracing::debug!(stage = stage.name(), "pipeline stage");
            stage = match stage {
                Stage::Done(resolution) => {
                    tracing::info!(
                        route = ?resolution.route,
                        reply_len = resolution.reply.len(),
                        "query resolved"
                    );
                    return Ok(resolution);
                }
                other => self.advance(other, query, &normalized).await?,
            };
        }
    }

    async fn advance(
        &self,
        stage: Stage,
        query: &str,
        normalized: &str,
    ) -> Result<Stage, PipelineError> {
        let next = match stage {
            Stage::PredefinedCheck => match match_predefined(normalized) {
                Some(reply) => Stage::Done(Resolution::new(reply, Route::Predefined)),
                None => Stage::IntentCheck,
            },

            Stage::IntentCheck => match self.classifier.classify(query).await {
                Intent::PriceComparison { sort, limit } => Stage::PriceBranch { sort, limit },
                Intent::None => Stage::GeneralBranch,
            },

            Stage::PriceBranch { sort, limit } => {
                let reply = ranking::rank_by_price(self.store.as_ref(), sort, limit)
                    .await
                    .map_err(PipelineError::Database)?;
                Stage::Done(Resolution::new(reply, Route::PriceRanking))
            }

            Stage::GeneralBranch => {
                let catalog = match_catalog(self.store.as_ref(), normalized)
                    .await
                    .map_err(PipelineError::Database)?;
                Stage::SemanticSearch { catalog }
            }

            Stage::SemanticSearch { catalog } => {
                let semantic = retrieve(
                    self.embedder.as_ref(),
                    self.store.as_ref(),
                    query,
                    catalog.is_none(),
                    &self.retrieval,
                )
                .await?;
                Stage::Fusion { catalog, semantic }
            }

            Stage::Fusion { catalog, semantic } => {
                let block = catalog.as_ref().map(|c| c.context.as_str());
                match fuse(block, &semantic.joined()) {
                    Some(context) => Stage::Generation { context },
                    None => Stage::Done(Resolution::new(NO_INFO_REPLY, Route::NoContext)),
                }
            }

            Stage::Generation { context } => {
                let reply = answer::generate(self.model.as_ref(), &context, query)
                    .await
                    .map_err(|e| {
                        tracing::error!(error = %e, "answer generation failed");
                        PipelineError::Generation(e)
                    })?;
                Stage::Done(Resolution::new(reply, Route::Generated))
            }

            Stage::Done(resolution) => Stage::Done(resolution),
        };
        Ok(next)
    }
}
