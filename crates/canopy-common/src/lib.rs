//! Common utilities for the Canopy parser.
//!
//! This crate provides shared infrastructure used by the parser crates:
//! - **Warning System** - deduplicated diagnostics routed through `log`

pub mod warning;
