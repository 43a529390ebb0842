//! Core functionality modules
//!
//! - `text`: HTML to plain-text normalization and lyrics heuristics
//! - `transport`: the HTTP seam every provider talks through
//! - `orchestrator`: priority-ordered fallback over providers
//! - `sources`: lyrics sources and the `SourceManager`
//! - `translation`: translators, the `TranslationManager` and batch translation
//! - `output`: lyrics and translation files on disk

pub mod orchestrator;
pub mod output;
pub mod sources;
pub mod text;
pub mod translation;
pub mod transport;
