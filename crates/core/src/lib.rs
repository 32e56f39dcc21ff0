//! Domain rules for the Melodia catalog service.
//!
//! This crate has zero internal dependencies so the repository layer, the
//! HTTP layer and any future tooling can all share the same rules.

pub mod artist;
pub mod error;
pub mod release;
pub mod search;
pub mod types;
