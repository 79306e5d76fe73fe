//! Word-level n-gram model.
//!
//! Data flows one way:
//! tokens -> windows (`window`) -> counts (`frequency_table`)
//! -> probabilities (`probability_table`) -> sampled tokens (`sampler`,
//! `generator`).

/// Fixed-length token tuple used as the key of every table.
pub mod context;

/// Overlapping context windows over a token stream.
pub mod window;

/// Per-context next-token counts.
///
/// Not exposed: only reachable through `FrequencyTable`.
mod state;

/// Context -> next-token counts, sequential and parallel builders.
pub mod frequency_table;

/// Context -> next-token probabilities.
pub mod probability_table;

/// Weighted draw of one next token.
pub mod sampler;

/// Sliding-window generation state machine.
pub mod generator;

/// `build_model`, `build_models` and `generate`.
pub mod pipeline;

pub use state::State;
