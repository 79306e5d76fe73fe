use std::collections::BTreeMap;
use std::thread;

use log::{debug, info};
use rand::Rng;

use super::context::Context;
use super::frequency_table::FrequencyTable;
use super::generator::{GeneratedSequence, Generator};
use super::probability_table::ProbabilityTable;
use super::window::windows;
use crate::error::{Error, Result};

/// Trains a model: windows, then counts, then probabilities.
///
/// # Errors
/// `InvalidWindowSize` if `window_size` is 0 or longer than `tokens`.
pub fn build_model<S: AsRef<str> + Sync>(tokens: &[S], window_size: usize) -> Result<ProbabilityTable> {
	let windows = windows(tokens, window_size)?;
	debug!("{} windows of {window_size} tokens", windows.len());

	let frequencies = FrequencyTable::from_windows_parallel(&windows, window_size)?;
	debug!(
		"{} contexts, {} transitions",
		frequencies.len(),
		frequencies.total_transitions()
	);

	let table = ProbabilityTable::from_frequencies(&frequencies)?;
	info!("trained {window_size}-token model with {} contexts", table.len());
	Ok(table)
}

/// Trains one independent model per window size, each on its own thread.
///
/// Sizes are deduplicated. The first failing size aborts the whole call.
pub fn build_models<S: AsRef<str> + Sync>(
	tokens: &[S],
	window_sizes: &[usize],
) -> Result<BTreeMap<usize, ProbabilityTable>> {
	let mut sizes = window_sizes.to_vec();
	sizes.sort_unstable();
	sizes.dedup();

	thread::scope(|scope| {
		let handles: Vec<_> = sizes
			.iter()
			.map(|&size| (size, scope.spawn(move || build_model(tokens, size))))
			.collect();

		let mut models = BTreeMap::new();
		for (size, handle) in handles {
			// A panicking worker re-panics here
			let table = handle.join().unwrap_or_else(|e| std::panic::resume_unwind(e))?;
			models.insert(size, table);
		}
		Ok(models)
	})
}

/// Generates `num_words` tokens after `seed`.
///
/// `window_size` is the size the caller trained `table` with; it must match
/// both the table and the seed.
///
/// # Errors
/// - `InvalidWindowSize` if `window_size` is 0
/// - `ContextSizeMismatch` on any size disagreement
/// - `UnknownContext` as soon as a context has no entry in `table`
pub fn generate<R: Rng + ?Sized>(
	seed: &Context,
	num_words: usize,
	table: &ProbabilityTable,
	window_size: usize,
	rng: &mut R,
) -> Result<GeneratedSequence> {
	if window_size < 1 {
		return Err(Error::InvalidWindowSize { window_size, token_count: seed.len() });
	}
	if table.window_size() != window_size {
		return Err(Error::ContextSizeMismatch { expected: window_size, actual: table.window_size() });
	}
	if seed.len() != window_size {
		return Err(Error::ContextSizeMismatch { expected: window_size, actual: seed.len() });
	}

	Generator::new(seed, num_words, table, rng)?.run()
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	const PHRASE: [&str; 6] = ["to", "be", "or", "not", "to", "be"];

	#[test]
	fn builds_one_model_per_size() {
		let models = build_models(&PHRASE, &[3, 2, 2, 1]).unwrap();
		assert_eq!(models.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
		for (size, table) in &models {
			assert_eq!(table.window_size(), *size);
		}
		assert_eq!(models[&2], build_model(&PHRASE, 2).unwrap());
	}

	#[test]
	fn build_models_fails_on_oversized_window() {
		assert!(matches!(
			build_models(&PHRASE, &[2, 7]),
			Err(Error::InvalidWindowSize { window_size: 7, .. })
		));
	}

	#[test]
	fn generate_rejects_zero_window() {
		let empty = ProbabilityTable::from_frequencies(&FrequencyTable::new(0)).unwrap();
		let mut rng = StdRng::seed_from_u64(0);
		assert!(matches!(
			generate(&Context::new(Vec::new()), 3, &empty, 0, &mut rng),
			Err(Error::InvalidWindowSize { window_size: 0, .. })
		));
	}

	#[test]
	fn generate_checks_window_size() {
		let table = build_model(&PHRASE, 2).unwrap();
		let mut rng = StdRng::seed_from_u64(0);
		assert!(matches!(
			generate(&Context::from(["to", "be"]), 1, &table, 3, &mut rng),
			Err(Error::ContextSizeMismatch { expected: 3, actual: 2 })
		));
		assert!(matches!(
			generate(&Context::from(["to", "be", "or"]), 1, &table, 2, &mut rng),
			Err(Error::ContextSizeMismatch { expected: 2, actual: 3 })
		));
	}
}
