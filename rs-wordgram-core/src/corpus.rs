use std::path::Path;
use std::sync::LazyLock;

use log::info;
use regex::Regex;

use crate::error::{Error, Result};
use crate::io;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("valid word regex"));

/// Splits raw text into normalized word tokens.
///
/// - Lowercases the whole text
/// - Keeps maximal runs of word characters (Unicode letters, digits, `_`)
/// - Drops punctuation and whitespace, never yields an empty token
pub fn tokenize(text: &str) -> Vec<String> {
	let lowered = text.to_lowercase();
	WORD.find_iter(&lowered).map(|m| m.as_str().to_owned()).collect()
}

/// Reads and tokenizes a corpus file.
///
/// # Errors
/// - `Io` if the file cannot be read
/// - `EmptyCorpus` if it holds no word at all
pub fn load_corpus<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
	let path = path.as_ref();
	let tokens = tokenize(&io::read_file(path)?);
	if tokens.is_empty() {
		return Err(Error::EmptyCorpus { path: path.to_path_buf() });
	}

	info!("loaded {} tokens from {}", tokens.len(), path.display());
	Ok(tokens)
}

/// Names (file stems) of the `.txt` corpora available in `dir`.
///
/// `"."` and `"./"` stand for the current directory.
pub fn list_corpora(dir: &str) -> Result<Vec<String>> {
	Ok(io::list_files(io::data_folder(dir), "txt")?)
}
