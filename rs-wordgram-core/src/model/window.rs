use super::context::Context;
use crate::error::{Error, Result};

/// Slices a token stream into overlapping contexts of `window_size` tokens.
///
/// Window `i` is `tokens[i..i + window_size]`, so the result holds
/// `tokens.len() - window_size + 1` contexts and two neighbours share
/// `window_size - 1` tokens.
///
/// # Errors
/// `InvalidWindowSize` when `window_size` is 0 or larger than the stream.
pub fn windows<S: AsRef<str>>(tokens: &[S], window_size: usize) -> Result<Vec<Context>> {
	if window_size < 1 || window_size > tokens.len() {
		return Err(Error::InvalidWindowSize { window_size, token_count: tokens.len() });
	}

	Ok(tokens.windows(window_size).map(Context::from_slice).collect())
}

#[cfg(test)]
mod tests {
	use super::*;

	const PHRASE: [&str; 6] = ["to", "be", "or", "not", "to", "be"];

	#[test]
	fn slides_one_token_at_a_time() {
		let windows = windows(&PHRASE, 2).unwrap();
		assert_eq!(
			windows,
			vec![
				Context::from(["to", "be"]),
				Context::from(["be", "or"]),
				Context::from(["or", "not"]),
				Context::from(["not", "to"]),
				Context::from(["to", "be"]),
			]
		);
	}

	#[test]
	fn length_and_width_hold_for_every_size() {
		for k in 1..=PHRASE.len() {
			let windows = windows(&PHRASE, k).unwrap();
			assert_eq!(windows.len(), PHRASE.len() - k + 1);
			assert!(windows.iter().all(|w| w.len() == k));
		}
	}

	#[test]
	fn window_as_long_as_stream_yields_one_window() {
		let windows = windows(&PHRASE, PHRASE.len()).unwrap();
		assert_eq!(windows.len(), 1);
	}

	#[test]
	fn rejects_zero_and_oversized_windows() {
		assert!(matches!(
			windows(&PHRASE, 0),
			Err(Error::InvalidWindowSize { window_size: 0, token_count: 6 })
		));
		assert!(matches!(
			windows(&PHRASE, 7),
			Err(Error::InvalidWindowSize { window_size: 7, token_count: 6 })
		));
		let empty: [&str; 0] = [];
		assert!(windows(&empty, 1).is_err());
	}
}
