use std::fmt;

use rand::Rng;

use super::context::Context;
use super::probability_table::ProbabilityTable;
use super::sampler::sample_next_token;
use crate::error::{Error, Result};

/// Output of a generation: the seed tokens followed by the sampled ones.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedSequence(Vec<String>);

impl GeneratedSequence {
	pub fn tokens(&self) -> &[String] {
		&self.0
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl fmt::Display for GeneratedSequence {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0.join(" "))
	}
}

/// Progress of a [`Generator`].
///
/// `Ready -> Extending -> ... -> Done | Failed`. `Done` and `Failed` are
/// terminal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GeneratorState {
	Ready,
	Extending { remaining: usize },
	Done,
	Failed,
}

impl GeneratorState {
	pub fn is_terminal(&self) -> bool {
		matches!(self, GeneratorState::Done | GeneratorState::Failed)
	}
}

/// Extends a seed context one sampled token at a time.
///
/// # Responsibilities
/// - Slide the context window over the growing sequence
/// - Stop after `num_words` tokens or on the first sampling failure
///
/// The generator borrows the table and the random source; it only owns the
/// sequence it is building.
pub struct Generator<'a, R: Rng + ?Sized> {
	table: &'a ProbabilityTable,
	rng: &'a mut R,
	sequence: Vec<String>,
	num_words: usize,
	state: GeneratorState,
}

impl<'a, R: Rng + ?Sized> Generator<'a, R> {
	/// Creates a generator in the `Ready` state.
	///
	/// # Errors
	/// `ContextSizeMismatch` if the seed is not `table.window_size()` long.
	pub fn new(
		seed: &Context,
		num_words: usize,
		table: &'a ProbabilityTable,
		rng: &'a mut R,
	) -> Result<Self> {
		if seed.len() != table.window_size() {
			return Err(Error::ContextSizeMismatch {
				expected: table.window_size(),
				actual: seed.len(),
			});
		}

		let mut sequence = Vec::with_capacity(seed.len() + num_words);
		sequence.extend_from_slice(seed.tokens());

		Ok(Self { table, rng, sequence, num_words, state: GeneratorState::Ready })
	}

	pub fn state(&self) -> &GeneratorState {
		&self.state
	}

	/// Tokens produced so far, seed included.
	pub fn sequence(&self) -> &[String] {
		&self.sequence
	}

	/// Current context: the last `window_size` tokens of the sequence.
	fn current_context(&self) -> Context {
		let start = self.sequence.len() - self.table.window_size();
		Context::from_slice(&self.sequence[start..])
	}

	/// Advances by one transition of the state machine.
	///
	/// On a terminal state this is a no-op. A sampling failure moves the
	/// generator to `Failed` and is returned to the caller.
	pub fn step(&mut self) -> Result<&GeneratorState> {
		let remaining = match self.state {
			GeneratorState::Ready => self.num_words,
			GeneratorState::Extending { remaining } => remaining,
			GeneratorState::Done | GeneratorState::Failed => return Ok(&self.state),
		};

		if remaining == 0 {
			self.state = GeneratorState::Done;
			return Ok(&self.state);
		}

		if self.state == GeneratorState::Ready {
			self.state = GeneratorState::Extending { remaining };
			return Ok(&self.state);
		}

		let context = self.current_context();
		match sample_next_token(&context, self.table, &mut *self.rng) {
			Ok(token) => {
				self.sequence.push(token);
				self.state = if remaining == 1 {
					GeneratorState::Done
				} else {
					GeneratorState::Extending { remaining: remaining - 1 }
				};
				Ok(&self.state)
			}
			Err(e) => {
				self.state = GeneratorState::Failed;
				Err(e)
			}
		}
	}

	/// Steps until a terminal state.
	///
	/// The first sampling failure is returned as-is, no partial sequence
	/// is kept.
	pub fn run(mut self) -> Result<GeneratedSequence> {
		while !self.state.is_terminal() {
			self.step()?;
		}
		Ok(GeneratedSequence(self.sequence))
	}

	/// Consumes the generator, returning the sequence only if it is `Done`.
	pub fn into_sequence(self) -> Option<GeneratedSequence> {
		match self.state {
			GeneratorState::Done => Some(GeneratedSequence(self.sequence)),
			_ => None,
		}
	}
}
