//! Core library for whitespace layout rules.
//!
//! This library checks two layout conventions over a token stream and a
//! syntax tree supplied by the caller: blank-line padding just inside
//! blocks, switch bodies and class bodies, and spacing just inside
//! parentheses. Every diagnostic carries an exact byte-range fix.

#![allow(
    clippy::similar_names,
    clippy::map_unwrap_or,
    clippy::items_after_statements
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

/// Module for loading configuration.
pub mod config;

/// Module defining diagnostics, message kinds and fixes.
pub mod diagnostic;

/// Module defining the error types of configuration and lint passes.
pub mod error;

/// Module for applying fixes to source text.
pub mod fix;

/// Module containing the token geometry shared by the rules.
/// This includes line and gap tests, own ranges and bracket walks.
pub mod geometry;

/// Module containing the linter that runs rules over source units.
pub mod linter;

/// Module resolving raw options into validated policies.
pub mod policy;

/// Module containing the implementation of the layout rules.
pub mod rules;

/// Module holding source text and the per-unit snapshot.
pub mod source;

/// Module defining the syntax tree handed over by a provider.
pub mod syntax;

/// Module containing test utilities.
/// This provides a reference tokenizer and parser for exercising the rules.
pub mod test_utils;

/// Module defining tokens, spans and the token stream.
pub mod token;

pub use config::LintConfig;
pub use diagnostic::{Diagnostic, Fix, MessageKind};
pub use error::{ConfigError, LintError, StructuralError};
pub use linter::Linter;
pub use source::{SourceText, SourceUnit};
