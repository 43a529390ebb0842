//! Command Line Interface module
//!
//! - `fetch`: look up lyrics for one song, optionally translating them
//! - `translate`: translate a saved lyrics file
//! - `sources`: list lyrics sources and translators
//! - `config`: show the active configuration

pub mod config;
pub mod fetch;
pub mod sources;
pub mod translate;
