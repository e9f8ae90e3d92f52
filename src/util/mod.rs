//! Shared utilities.
//!
//! Pure helpers that carry no GPU or registry state.

pub mod easing;
