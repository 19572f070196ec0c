//! Agronomic advisory client.
//!
//! Three flows against remote services: crop prediction gated by
//! measurement validation, cultivation guide lookup, and weather with a
//! per-day forecast reduction. Each flow runs inside a token-guarded
//! request lifecycle, so a superseded trigger can never publish its
//! result over a newer one.
//!
//! The binary in `main.rs` is one host for [`client::AdvisoryClient`];
//! all behavior lives here so other hosts can drive the same flows.

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod forecast;
pub mod lifecycle;
pub mod model;
pub mod segment;
pub mod validate;
