use std::path::PathBuf;

use thiserror::Error;

use crate::model::context::Context;

pub type Result<T> = std::result::Result<T, Error>;

/// Every failure the library can report.
///
/// The first four variants belong to the model itself; the rest come from
/// corpus loading and configuration.
#[derive(Error, Debug)]
pub enum Error {
	/// The window size is zero or larger than the token stream.
	#[error("invalid window size {window_size} for {token_count} tokens")]
	InvalidWindowSize { window_size: usize, token_count: usize },

	/// A context reached the normalizer without any next-token count.
	#[error("context \"{context}\" has no next-token counts")]
	EmptyContextCounts { context: Context },

	/// The context was never observed during training.
	#[error("unknown context \"{context}\"")]
	UnknownContext { context: Context },

	/// A context or table was built with another window size.
	#[error("context size mismatch: expected {expected}, got {actual}")]
	ContextSizeMismatch { expected: usize, actual: usize },

	#[error("corpus {} contains no token", path.display())]
	EmptyCorpus { path: PathBuf },

	#[error("invalid configuration: {0}")]
	InvalidConfig(String),

	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	#[error("serde_json error: {0}")]
	Json(#[from] serde_json::Error),
}
