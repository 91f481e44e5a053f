//! End-to-end tests for the showcase chat service live in `tests/`.
//!
//! Each test builds the real Axum router from `sc-api` over the real
//! pipeline from `sc-pipeline`, swapping only the external collaborators
//! (model, embedder, store) for in-memory stand-ins.
