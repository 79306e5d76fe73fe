use std::collections::BTreeMap;

use super::context::Context;

/// Next-token counts observed after one context.
///
/// Conceptually a node of the Markov chain: `key` is the context and each
/// outgoing edge is weighted by how many times it was observed.
///
/// ## Invariants
/// - Every transition belongs to `key`
/// - Every count is strictly positive
#[derive(Clone, Debug, PartialEq)]
pub struct State {
	key: Context,
	/// Example: { "or" => 3, "the" => 1 }
	transitions: BTreeMap<String, usize>,
}

impl State {
	/// Creates a state with no transition yet.
	pub fn new(key: Context) -> Self {
		Self { key, transitions: BTreeMap::new() }
	}

	pub fn key(&self) -> &Context {
		&self.key
	}

	/// Records one occurrence of `next_token` after this context.
	pub fn add_transition(&mut self, next_token: &str) {
		self.add_transitions(next_token, 1);
	}

	/// Records `occurrence` observations at once. Zero is ignored so that
	/// zero-count entries never appear.
	pub(crate) fn add_transitions(&mut self, next_token: &str, occurrence: usize) {
		if occurrence == 0 {
			return;
		}
		*self.transitions.entry(next_token.to_owned()).or_insert(0) += occurrence;
	}

	pub fn transitions(&self) -> &BTreeMap<String, usize> {
		&self.transitions
	}

	pub fn is_empty(&self) -> bool {
		self.transitions.is_empty()
	}

	/// Sum of all transition counts.
	pub fn total(&self) -> usize {
		self.transitions.values().sum()
	}

	/// Sums the counts of `other` into this state.
	///
	/// Both states must share the same key; the owning table guarantees it.
	pub(crate) fn merge(&mut self, other: &Self) {
		debug_assert_eq!(self.key, other.key);

		for (next_token, occurrence) in &other.transitions {
			self.add_transitions(next_token, *occurrence);
		}
	}
}
