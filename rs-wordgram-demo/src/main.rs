use std::env;

use log::warn;
use rand::Rng;
use rs_wordgram_core::config::WordgramConfig;
use rs_wordgram_core::corpus::load_corpus;
use rs_wordgram_core::model::frequency_table::FrequencyTable;
use rs_wordgram_core::model::probability_table::ProbabilityTable;
use rs_wordgram_core::model::sampler::sample_next_token;
use rs_wordgram_core::model::window::windows;
use rs_wordgram_core::{Context, Error, GeneratedSequence, build_models, generate};

/// Generates from `seed`, restarting once from a random known context if
/// the model never saw it.
fn generate_or_restart<R: Rng>(
	seed: &Context,
	num_words: usize,
	table: &ProbabilityTable,
	window_size: usize,
	rng: &mut R,
) -> Result<GeneratedSequence, Error> {
	match generate(seed, num_words, table, window_size, rng) {
		Err(Error::UnknownContext { context }) => {
			let Some(restart) = table.random_context(rng) else {
				return Err(Error::UnknownContext { context });
			};
			warn!("\"{context}\" was never seen, restarting from \"{restart}\"");
			generate(&restart, num_words, table, window_size, rng)
		}
		result => result,
	}
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	env_logger::init();

	// Optional JSON config as first argument, defaults otherwise
	let args: Vec<String> = env::args().collect();
	let config = WordgramConfig::load(args.get(1).map(String::as_str))?;
	let mut rng = config.rng();
	let k = config.window_size();

	// Load the corpus
	let tokens = load_corpus(&config.corpus)?;
	println!("Loaded {} tokens from {}.", tokens.len(), config.corpus.display());

	// Windows
	let windows = windows(&tokens, k)?;
	println!("Created {} {k}-grams.", windows.len());

	// Counts
	let frequencies = FrequencyTable::from_windows_parallel(&windows, k)?;
	let case = config.seed_context(k)?;
	match frequencies.counts(&case) {
		Some(state) => println!(
			"Created {} {k}-gram contexts. Example: {:?}",
			frequencies.len(),
			state.transitions()
		),
		None => println!("Created {} {k}-gram contexts. \"{case}\" was never seen.", frequencies.len()),
	}

	// Probabilities
	let table = ProbabilityTable::from_frequencies(&frequencies)?;
	if let Some(distribution) = table.distribution(&case) {
		println!("Created {} {k}-gram probabilities. Example: {:?}", table.len(), distribution);
	}

	// One sample
	match sample_next_token(&case, &table, &mut rng) {
		Ok(token) => println!("Sampled next token: {token}"),
		Err(e) => warn!("cannot sample after \"{case}\": {e}"),
	}

	// Generation
	let generated = generate_or_restart(&case, config.num_words(), &table, k, &mut rng)?;
	println!("Generated text: {generated}");

	// Other window sizes, trained side by side
	let models = build_models(&tokens, &config.sizes)?;
	for (size, table) in &models {
		println!("Generating text for {size}-grams");
		let seed = match config.seed_context(*size) {
			Ok(seed) => seed,
			Err(e) => {
				warn!("no seed of {size} words: {e}");
				continue;
			}
		};
		match generate_or_restart(&seed, 20, table, *size, &mut rng) {
			Ok(generated) => println!("Generated text: {generated}"),
			Err(e) => warn!("generation failed for {size}-grams: {e}"),
		}
	}

	Ok(())
}
