use rand::Rng;

use super::context::Context;
use super::probability_table::ProbabilityTable;
use crate::error::{Error, Result};

/// Draws the token following `context`, weighted by its probability.
///
/// Walks the cumulative distribution of the context with a single uniform
/// draw in `[0, 1)`. Tokens are visited in a fixed order, so two runs with
/// identically seeded generators pick the same token.
///
/// # Errors
/// - `ContextSizeMismatch` if `context` is not `table.window_size()` long
/// - `UnknownContext` if `context` was never seen during training
pub fn sample_next_token<R: Rng + ?Sized>(
	context: &Context,
	table: &ProbabilityTable,
	rng: &mut R,
) -> Result<String> {
	if context.len() != table.window_size() {
		return Err(Error::ContextSizeMismatch {
			expected: table.window_size(),
			actual: context.len(),
		});
	}

	let distribution = table
		.distribution(context)
		.ok_or_else(|| Error::UnknownContext { context: context.clone() })?;

	let mut r: f64 = rng.random();
	let mut fallback: Option<&String> = None;
	for (token, probability) in distribution {
		if r < *probability {
			return Ok(token.clone());
		}
		r -= probability;
		fallback = Some(token);
	}

	// Rounding left `r` past the last bucket
	fallback
		.cloned()
		.ok_or_else(|| Error::EmptyContextCounts { context: context.clone() })
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::model::frequency_table::FrequencyTable;
	use crate::model::window::windows;
	use rand::SeedableRng;
	use rand::rngs::StdRng;
	use std::collections::HashMap;

	fn table(text: &str, k: usize) -> ProbabilityTable {
		let tokens: Vec<&str> = text.split_whitespace().collect();
		let freq = FrequencyTable::from_windows(&windows(&tokens, k).unwrap(), k).unwrap();
		ProbabilityTable::from_frequencies(&freq).unwrap()
	}

	#[test]
	fn single_follower_is_always_drawn() {
		let table = table("to be or not to be", 2);
		let mut rng = StdRng::seed_from_u64(0);
		for _ in 0..50 {
			let token = sample_next_token(&Context::from(["to", "be"]), &table, &mut rng).unwrap();
			assert_eq!(token, "or");
		}
	}

	#[test]
	fn same_seed_same_token() {
		let table = table("a b c a b d a b e a b c a b f", 2);
		let context = Context::from(["a", "b"]);
		for seed in 0..20 {
			let first = sample_next_token(&context, &table, &mut StdRng::seed_from_u64(seed)).unwrap();
			let second = sample_next_token(&context, &table, &mut StdRng::seed_from_u64(seed)).unwrap();
			assert_eq!(first, second);
		}
	}

	#[test]
	fn frequencies_follow_probabilities() {
		// After "a": "b" 3 times, "c" once
		let table = table("a b a b a b a c a", 1);
		let mut rng = StdRng::seed_from_u64(42);
		let mut drawn: HashMap<String, usize> = HashMap::new();
		let draws = 20_000;
		for _ in 0..draws {
			let token = sample_next_token(&Context::from(["a"]), &table, &mut rng).unwrap();
			*drawn.entry(token).or_insert(0) += 1;
		}
		let ratio = drawn["b"] as f64 / draws as f64;
		assert!((ratio - 0.75).abs() < 0.02, "ratio was {ratio}");
		assert_eq!(drawn.len(), 2);
	}

	#[test]
	fn unknown_context_iff_absent() {
		let table = table("to be or not to be", 2);
		let mut rng = StdRng::seed_from_u64(1);

		for context in table.contexts() {
			assert!(sample_next_token(context, &table, &mut rng).is_ok());
		}

		let absent = Context::from(["be", "to"]);
		assert!(!table.contains_context(&absent));
		assert!(matches!(
			sample_next_token(&absent, &table, &mut rng),
			Err(Error::UnknownContext { context }) if context == absent
		));
	}

	#[test]
	fn context_of_wrong_size_is_a_mismatch() {
		let table = table("to be or not to be", 2);
		let mut rng = StdRng::seed_from_u64(1);
		assert!(matches!(
			sample_next_token(&Context::from(["to", "be", "or"]), &table, &mut rng),
			Err(Error::ContextSizeMismatch { expected: 2, actual: 3 })
		));
	}
}
