use std::collections::{BTreeMap, HashMap};

use rand::Rng;
use rand::prelude::IteratorRandom;

use super::context::Context;
use super::frequency_table::FrequencyTable;
use crate::error::{Error, Result};

/// Next-token distribution of a single context, ordered by token.
pub type Distribution = BTreeMap<String, f64>;

/// Normalized form of a [`FrequencyTable`].
///
/// # Invariants
/// - Same context set as the frequency table it was built from
/// - Same token set under each context as the matching count map
/// - Probabilities of a context sum to 1.0 (within float tolerance)
#[derive(Clone, Debug, PartialEq)]
pub struct ProbabilityTable {
	window_size: usize,
	distributions: HashMap<Context, Distribution>,
}

impl ProbabilityTable {
	/// Divides every next-token count by the total of its context.
	///
	/// No smoothing: tokens never observed after a context get no mass.
	///
	/// # Errors
	/// `EmptyContextCounts` if a context has no count at all.
	pub fn from_frequencies(frequencies: &FrequencyTable) -> Result<Self> {
		let mut distributions = HashMap::with_capacity(frequencies.len());

		for (context, state) in frequencies.iter() {
			let total = state.total();
			if state.is_empty() || total == 0 {
				return Err(Error::EmptyContextCounts { context: context.clone() });
			}

			let distribution: Distribution = state
				.transitions()
				.iter()
				.map(|(token, count)| (token.clone(), *count as f64 / total as f64))
				.collect();
			distributions.insert(context.clone(), distribution);
		}

		Ok(Self { window_size: frequencies.window_size(), distributions })
	}

	pub fn window_size(&self) -> usize {
		self.window_size
	}

	/// Number of distinct contexts.
	pub fn len(&self) -> usize {
		self.distributions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.distributions.is_empty()
	}

	pub fn contains_context(&self, context: &Context) -> bool {
		self.distributions.contains_key(context)
	}

	/// Distribution following `context`, `None` if it was never seen.
	pub fn distribution(&self, context: &Context) -> Option<&Distribution> {
		self.distributions.get(context)
	}

	pub fn contexts(&self) -> impl Iterator<Item = &Context> {
		self.distributions.keys()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&Context, &Distribution)> {
		self.distributions.iter()
	}

	/// Picks a context uniformly among the known ones.
	///
	/// Useful to restart a generation from a seed the model knows.
	/// Returns `None` if the table is empty.
	pub fn random_context<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Context> {
		self.distributions.keys().choose(rng).cloned()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::window::windows;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn frequencies(text: &str, k: usize) -> FrequencyTable {
		let tokens: Vec<&str> = text.split_whitespace().collect();
		FrequencyTable::from_windows(&windows(&tokens, k).unwrap(), k).unwrap()
	}

	#[test]
	fn divides_by_context_total() {
		let table = ProbabilityTable::from_frequencies(&frequencies("a b c a b c a b d", 2)).unwrap();
		let ab = table.distribution(&Context::from(["a", "b"])).unwrap();
		assert!((ab["c"] - 2.0 / 3.0).abs() < 1e-12);
		assert!((ab["d"] - 1.0 / 3.0).abs() < 1e-12);
	}

	#[test]
	fn distributions_sum_to_one() {
		let text = "the cat sat on the mat and the cat ran to the mat of the dog";
		for k in 1..=3 {
			let freq = frequencies(text, k);
			let table = ProbabilityTable::from_frequencies(&freq).unwrap();
			assert_eq!(table.len(), freq.len());
			for (context, distribution) in table.iter() {
				let sum: f64 = distribution.values().sum();
				assert!((sum - 1.0).abs() < 1e-6, "{context} sums to {sum}");
				assert!(distribution.values().all(|p| *p > 0.0 && *p <= 1.0));

				let counts = freq.counts(context).unwrap();
				assert!(counts.transitions().keys().eq(distribution.keys()));
			}
		}
	}

	#[test]
	fn empty_counts_are_reported() {
		let mut counts = HashMap::new();
		counts.insert(Context::from(["to", "be"]), HashMap::new());
		let freq = FrequencyTable::from_counts(2, counts).unwrap();
		assert!(matches!(
			ProbabilityTable::from_frequencies(&freq),
			Err(Error::EmptyContextCounts { .. })
		));
	}

	#[test]
	fn random_context_is_a_known_key() {
		let table = ProbabilityTable::from_frequencies(&frequencies("to be or not to be", 2)).unwrap();
		let mut rng = StdRng::seed_from_u64(7);
		for _ in 0..20 {
			let context = table.random_context(&mut rng).unwrap();
			assert!(table.contains_context(&context));
		}

		let empty = ProbabilityTable::from_frequencies(&FrequencyTable::new(2)).unwrap();
		assert_eq!(empty.random_context(&mut rng), None);
	}
}
