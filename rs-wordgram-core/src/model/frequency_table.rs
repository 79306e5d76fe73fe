use std::collections::HashMap;
use std::sync::mpsc;
use std::thread;

use log::debug;

use super::context::Context;
use super::state::State;
use crate::error::{Error, Result};

/// Number of chunks per CPU used by the parallel builder.
const CHUNK_FACTOR: usize = 8;

/// Raw next-token counts for every context seen in a token stream.
///
/// # Responsibilities
/// - Tally, for each adjacent pair of windows, the token that followed the
///   first window
/// - Merge partial tables built from chunks of the same stream
///
/// # Invariants
/// - Every key is a context of exactly `window_size` tokens
/// - Tables built from windows never hold an empty state nor a zero count
#[derive(Clone, Debug, PartialEq)]
pub struct FrequencyTable {
	window_size: usize,
	states: HashMap<Context, State>,
}

impl FrequencyTable {
	/// Creates an empty table for contexts of `window_size` tokens.
	pub fn new(window_size: usize) -> Self {
		Self { window_size, states: HashMap::new() }
	}

	/// Builds the table from a window sequence.
	///
	/// For every pair `(windows[i], windows[i + 1])` the last token of the
	/// second window is counted as the follower of the first one. Since
	/// neighbours overlap by `window_size - 1` tokens, that is exactly the
	/// token that came after `windows[i]` in the stream.
	///
	/// Fewer than two windows give an empty table.
	///
	/// # Errors
	/// `ContextSizeMismatch` if a window is not `window_size` tokens long.
	pub fn from_windows(windows: &[Context], window_size: usize) -> Result<Self> {
		let mut table = Self::new(window_size);
		table.add_windows(windows)?;
		Ok(table)
	}

	/// Same result as [`FrequencyTable::from_windows`], computed on several
	/// threads.
	///
	/// The pair range is split into `num_cpus * 8` chunks. Each chunk keeps
	/// one extra window so the pair crossing its boundary is still counted,
	/// then partial tables are merged.
	pub fn from_windows_parallel(windows: &[Context], window_size: usize) -> Result<Self> {
		let pairs = windows.len().saturating_sub(1);
		if pairs == 0 {
			return Self::from_windows(windows, window_size);
		}

		let chunks = num_cpus::get() * CHUNK_FACTOR;
		let chunk_size = pairs.div_ceil(chunks);
		debug!("counting {pairs} pairs in chunks of {chunk_size}");

		let (tx, rx) = mpsc::channel();
		thread::scope(|scope| {
			for start in (0..pairs).step_by(chunk_size) {
				let end = (start + chunk_size).min(pairs);
				let chunk = &windows[start..=end];
				let tx = tx.clone();

				scope.spawn(move || {
					let _ = tx.send(Self::from_windows(chunk, window_size));
				});
			}
		});
		drop(tx);

		let mut final_table = Self::new(window_size);
		for partial_table in rx.iter() {
			final_table.merge(&partial_table?)?;
		}

		Ok(final_table)
	}

	/// Builds a table from already counted transitions.
	///
	/// Zero counts are dropped. A context whose map is empty is kept as-is,
	/// the normalizer reports it.
	///
	/// # Errors
	/// - `InvalidWindowSize` if `window_size` is 0
	/// - `ContextSizeMismatch` if a context is not `window_size` tokens long
	pub fn from_counts(
		window_size: usize,
		counts: HashMap<Context, HashMap<String, usize>>,
	) -> Result<Self> {
		if window_size < 1 {
			return Err(Error::InvalidWindowSize { window_size, token_count: 0 });
		}

		let mut table = Self::new(window_size);
		for (context, next_tokens) in counts {
			table.check_context(&context)?;
			let state = table.states.entry(context.clone()).or_insert_with(|| State::new(context));
			for (next_token, occurrence) in next_tokens {
				state.add_transitions(&next_token, occurrence);
			}
		}
		Ok(table)
	}

	fn add_windows(&mut self, windows: &[Context]) -> Result<()> {
		for window in windows {
			self.check_context(window)?;
		}

		for pair in windows.windows(2) {
			let (context, next) = (&pair[0], &pair[1]);
			// Should not be None, windows are at least one token long here
			let Some(next_token) = next.last() else {
				continue;
			};

			self.states
				.entry(context.clone())
				.or_insert_with(|| State::new(context.clone()))
				.add_transition(next_token);
		}

		Ok(())
	}

	fn check_context(&self, context: &Context) -> Result<()> {
		if context.len() != self.window_size {
			return Err(Error::ContextSizeMismatch {
				expected: self.window_size,
				actual: context.len(),
			});
		}
		Ok(())
	}

	/// Sums the counts of another table into this one.
	///
	/// # Errors
	/// `ContextSizeMismatch` if the two tables use different window sizes.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		if self.window_size != other.window_size {
			return Err(Error::ContextSizeMismatch {
				expected: self.window_size,
				actual: other.window_size,
			});
		}

		for (key, state) in &other.states {
			if let Some(existing) = self.states.get_mut(key) {
				existing.merge(state);
			} else {
				self.states.insert(key.clone(), state.clone());
			}
		}

		Ok(())
	}

	pub fn window_size(&self) -> usize {
		self.window_size
	}

	/// Number of distinct contexts.
	pub fn len(&self) -> usize {
		self.states.len()
	}

	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}

	/// Next-token counts of `context`, `None` if it was never seen.
	pub fn counts(&self, context: &Context) -> Option<&State> {
		self.states.get(context)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&Context, &State)> {
		self.states.iter()
	}

	/// Number of counted pairs, i.e. the sum of every count.
	pub fn total_transitions(&self) -> usize {
		self.states.values().map(State::total).sum()
	}
}
