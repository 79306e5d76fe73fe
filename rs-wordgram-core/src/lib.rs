//! Word-level n-gram text generation library.
//!
//! This crate trains a statistical language model over a token stream and
//! samples new text from it:
//! - Overlapping context windows over the stream
//! - Per-context next-token counts, then probabilities
//! - Weighted sampling with a sliding context window
//! - Corpus loading and tokenization, configuration
//!
//! Tables for different window sizes are independent; every call takes the
//! window size explicitly.

/// Core n-gram tables, sampler and generator.
pub mod model;

/// Corpus loading and word tokenization.
pub mod corpus;

/// Demo and server settings.
pub mod config;

/// Library error type.
pub mod error;

/// I/O utilities (file loading, path helpers).
///
/// Not exposed
pub(crate) mod io;

pub use error::{Error, Result};
pub use model::context::Context;
pub use model::generator::GeneratedSequence;
pub use model::pipeline::{build_model, build_models, generate};
pub use model::probability_table::ProbabilityTable;
