//! Core types and trait definitions for the porciento calculator.
//!
//! This crate is deliberately free of HTTP and database dependencies. It owns
//! the promotion rules, the calculation store abstraction, and the pure
//! generators (explanations, neighbouring examples, chart variants).

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod error;
pub mod examples;
pub mod explain;
pub mod presentation;
pub mod promotion;
pub mod record;
pub mod store;

pub use error::{Error, Result};
