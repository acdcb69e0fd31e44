use std::fmt;

use serde::{Deserialize, Serialize};

/// One slot of a prefix window.
///
/// `Start` marks "nothing read yet" at the beginning of a token stream.
/// It sorts before every word so start-of-text prefixes come first in a
/// persisted model.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Token {
	Start,
	Word(String),
}

impl Token {
	/// Returns the word carried by this token, if any.
	pub fn as_word(&self) -> Option<&str> {
		match self {
			Token::Start => None,
			Token::Word(w) => Some(w),
		}
	}
}

impl From<&str> for Token {
	fn from(word: &str) -> Self {
		Token::Word(word.to_owned())
	}
}

/// Fixed-length window of the most recent tokens, used as a chain key.
///
/// ## Invariants
/// - The length never changes after construction
/// - `shift` keeps the order of the remaining tokens
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Prefix(Vec<Token>);

impl Prefix {
	/// Creates the start-of-text prefix: `len` start tokens.
	pub fn start(len: usize) -> Self {
		Self(vec![Token::Start; len])
	}

	/// Builds a prefix from explicit tokens.
	pub fn from_tokens(tokens: Vec<Token>) -> Self {
		Self(tokens)
	}

	/// Convenience constructor from plain words.
	pub fn from_words(words: &[&str]) -> Self {
		Self(words.iter().map(|w| Token::from(*w)).collect())
	}

	pub fn len(&self) -> usize {
		self.0.len()
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn tokens(&self) -> &[Token] {
		&self.0
	}

	/// Drops the oldest token and appends `word` as the newest one.
	pub fn shift(&mut self, word: &str) {
		if self.0.is_empty() {
			return;
		}
		self.0.rotate_left(1);
		// Non-empty, checked above
		if let Some(last) = self.0.last_mut() {
			*last = Token::Word(word.to_owned());
		}
	}
}

impl fmt::Display for Prefix {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for (i, token) in self.0.iter().enumerate() {
			if i > 0 {
				f.write_str(" ")?;
			}
			f.write_str(token.as_word().unwrap_or("<start>"))?;
		}
		Ok(())
	}
}
