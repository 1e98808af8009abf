// src/specs/mod.rs
//! # Page specs
//!
//! Page-specific scraping knowledge: *where the ground truth lives in the
//! HTML* and how to pull it out robustly.
//!
//! ## What lives here
//! - URL construction for a page from a configured locator.
//! - Pure HTML parsing into model types (`Entrant`).
//! - Container/selector precedence when the site has shipped several layouts.
//!
//! ## What does **not** live here
//! - HTTP, retries and pacing (`core::net`, `fetch`).
//! - Persistence and diffing.
//!
//! ## Conventions
//! - Specs are testable offline against captured HTML fixtures.
//! - A page that exists but carries no data yet returns an empty list, never
//!   an error. Errors are for pages we cannot make sense of at all.
pub mod startlist;
