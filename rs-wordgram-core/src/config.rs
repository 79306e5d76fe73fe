use std::path::{Path, PathBuf};

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::corpus::tokenize;
use crate::error::{Error, Result};
use crate::io;
use crate::model::context::Context;

/// Settings shared by the demo and the server.
///
/// Every field has a default, so a config file only needs the values it
/// changes. The window size is passed explicitly to training and
/// generation from here; nothing in the library keeps a global default.
///
/// # Invariants (checked by `validate`)
/// - `window_size >= 1` and every entry of `sizes >= 1`
/// - `sizes` is not empty
/// - `seed_phrase` holds at least one word
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct WordgramConfig {
	/// Corpus file used by the demo.
	pub corpus: PathBuf,

	/// Folder scanned for `*.txt` corpora by the server.
	pub data_dir: String,

	/// Window size of the main model.
	window_size: usize,

	/// Number of tokens generated after the seed.
	num_words: usize,

	/// Window sizes trained side by side.
	pub sizes: Vec<usize>,

	/// Phrase whose first `k` words seed a `k`-token model.
	pub seed_phrase: String,

	/// Fixed RNG seed for reproducible output, entropy when `None`.
	pub rng_seed: Option<u64>,

	pub bind: String,

	pub port: u16,
}

impl Default for WordgramConfig {
	fn default() -> Self {
		Self {
			corpus: PathBuf::from("./data/hamlet.txt"),
			data_dir: "./data".to_owned(),
			window_size: 2,
			num_words: 10,
			sizes: vec![2, 3, 4],
			seed_phrase: "to be or not to be".to_owned(),
			rng_seed: None,
			bind: "127.0.0.1".to_owned(),
			port: 5000,
		}
	}
}

impl WordgramConfig {
	/// Reads a JSON config file and validates it.
	pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
		let config: Self = serde_json::from_str(&io::read_file(path)?)?;
		config.validate()?;
		Ok(config)
	}

	/// Loads `path` when given, defaults otherwise.
	pub fn load(path: Option<&str>) -> Result<Self> {
		match path {
			Some(path) => Self::from_file(path),
			None => Ok(Self::default()),
		}
	}

	pub fn validate(&self) -> Result<()> {
		if self.window_size < 1 {
			return Err(Error::InvalidConfig("window_size must be >= 1".to_owned()));
		}
		if self.sizes.is_empty() {
			return Err(Error::InvalidConfig("sizes cannot be empty".to_owned()));
		}
		if self.sizes.contains(&0) {
			return Err(Error::InvalidConfig("sizes must all be >= 1".to_owned()));
		}
		if tokenize(&self.seed_phrase).is_empty() {
			return Err(Error::InvalidConfig("seed_phrase holds no word".to_owned()));
		}
		Ok(())
	}

	pub fn window_size(&self) -> usize {
		self.window_size
	}

	pub fn num_words(&self) -> usize {
		self.num_words
	}

	/// Sets the window size of the main model.
	///
	/// # Errors
	/// Returns an error if `window_size` is 0.
	pub fn set_window_size(&mut self, window_size: usize) -> Result<()> {
		if window_size < 1 {
			return Err(Error::InvalidConfig("window_size must be >= 1".to_owned()));
		}
		self.window_size = window_size;
		Ok(())
	}

	/// First `window_size` words of the seed phrase.
	///
	/// # Errors
	/// `InvalidWindowSize` if the phrase is shorter than `window_size`.
	pub fn seed_context(&self, window_size: usize) -> Result<Context> {
		let words = tokenize(&self.seed_phrase);
		if window_size < 1 || window_size > words.len() {
			return Err(Error::InvalidWindowSize { window_size, token_count: words.len() });
		}
		Ok(Context::from_slice(&words[..window_size]))
	}

	/// Random source for one generation run.
	pub fn rng(&self) -> StdRng {
		match self.rng_seed {
			Some(seed) => StdRng::seed_from_u64(seed),
			None => StdRng::from_os_rng(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::Rng;
	use std::fs;

	#[test]
	fn partial_file_keeps_defaults() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("config.json");
		fs::write(&path, r#"{ "window_size": 3, "rng_seed": 9 }"#).unwrap();

		let config = WordgramConfig::from_file(&path).unwrap();
		assert_eq!(config.window_size(), 3);
		assert_eq!(config.num_words(), 10);
		assert_eq!(config.sizes, vec![2, 3, 4]);
		assert_eq!(config.rng_seed, Some(9));
	}

	#[test]
	fn invalid_values_are_rejected() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("config.json");

		fs::write(&path, r#"{ "window_size": 0 }"#).unwrap();
		assert!(matches!(WordgramConfig::from_file(&path), Err(Error::InvalidConfig(_))));

		fs::write(&path, r#"{ "sizes": [] }"#).unwrap();
		assert!(matches!(WordgramConfig::from_file(&path), Err(Error::InvalidConfig(_))));

		fs::write(&path, r#"{ "seed_phrase": "!!" }"#).unwrap();
		assert!(matches!(WordgramConfig::from_file(&path), Err(Error::InvalidConfig(_))));

		fs::write(&path, "not json").unwrap();
		assert!(matches!(WordgramConfig::from_file(&path), Err(Error::Json(_))));

		let mut config = WordgramConfig::default();
		assert!(config.set_window_size(0).is_err());
		assert!(config.set_window_size(4).is_ok());
		assert_eq!(config.window_size(), 4);
	}

	#[test]
	fn seed_context_takes_phrase_prefix() {
		let config = WordgramConfig::default();
		assert_eq!(config.seed_context(3).unwrap(), Context::from(["to", "be", "or"]));
		assert!(matches!(config.seed_context(7), Err(Error::InvalidWindowSize { .. })));
	}

	#[test]
	fn seeded_rng_is_reproducible() {
		let config = WordgramConfig { rng_seed: Some(11), ..WordgramConfig::default() };
		let a: u64 = config.rng().random();
		let b: u64 = config.rng().random();
		assert_eq!(a, b);
	}
}
