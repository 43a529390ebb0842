//! Service construction
//!
//! `SimpleServices` owns the loaded config and the shared HTTP transport and
//! hands out source and translation managers built from them.

pub mod simple_container;

pub use simple_container::SimpleServices;
