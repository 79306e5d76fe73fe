use std::fmt;

/// A fixed-length, ordered run of tokens used as the key of every table.
///
/// Two contexts are equal when every position matches exactly
/// (order- and case-sensitive).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Context(Vec<String>);

impl Context {
	pub fn new(tokens: Vec<String>) -> Self {
		Self(tokens)
	}

	/// Builds a context by copying a token slice.
	pub fn from_slice<S: AsRef<str>>(tokens: &[S]) -> Self {
		Self(tokens.iter().map(|t| t.as_ref().to_owned()).collect())
	}

	/// Number of tokens, i.e. the window size this context belongs to.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn tokens(&self) -> &[String] {
		&self.0
	}

	/// Last token of the context, `None` when empty.
	pub fn last(&self) -> Option<&str> {
		self.0.last().map(String::as_str)
	}
}

impl From<Vec<String>> for Context {
	fn from(tokens: Vec<String>) -> Self {
		Self(tokens)
	}
}

impl From<&[&str]> for Context {
	fn from(tokens: &[&str]) -> Self {
		Self::from_slice(tokens)
	}
}

impl<const N: usize> From<[&str; N]> for Context {
	fn from(tokens: [&str; N]) -> Self {
		Self::from_slice(&tokens)
	}
}

impl fmt::Display for Context {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0.join(" "))
	}
}
