//! Showcase chat pipeline: turns one natural-language question into one
//! grounded reply.
//!
//! Stages, in the order the orchestrator runs them:
//! - canned replies for greetings and thanks (`canned`)
//! - price-ranking intent detection (`intent`)
//! - exact catalog mention lookup (`catalog`)
//! - vector search over documents and products (`retrieval`)
//! - context fusion (`fusion`) and constrained answer generation (`answer`)
//!
//! External collaborators sit behind traits: `llm::LanguageModel`,
//! `llm::Embedder` and `store::CatalogStore`. `clients::SharedClients` owns
//! the process-wide, once-initialized set of them.

pub mod answer;
pub mod canned;
pub mod catalog;
pub mod clients;
pub mod error;
pub mod extract;
pub mod fusion;
pub mod intent;
pub mod llm;
pub mod normalize;
pub mod pipeline;
pub mod ranking;
pub mod retrieval;
pub mod store;

pub use clients::{ClientFactory, Clients, SharedClients};
pub use error::{InitError, ModelError, PipelineError, StoreError};
pub use pipeline::{Pipeline, PipelineSettings, Resolution, Route};
