use std::collections::BTreeMap;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::prefix::Prefix;
use super::suffix::SuffixTable;
use crate::error::{MarkovError, Result};
use crate::io::read_words;

/// Word-level Markov chain: every observed prefix with its suffix table.
///
/// # Responsibilities
/// - Build the table from one or more independent token streams
/// - Answer suffix lookups for a prefix during generation
///
/// # Invariants
/// - `prefix_len` is always >= 1 and every key has exactly that length
/// - Keys are ordered (`BTreeMap`) so persisted models are reproducible
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Chain {
	/// Number of words of context (the window size)
	prefix_len: usize,

	/// Mapping from a prefix to the words seen right after it
	table: BTreeMap<Prefix, SuffixTable>,
}

impl Chain {
	/// Creates an empty chain with prefixes of `prefix_len` words.
	///
	/// # Errors
	/// Returns an error if `prefix_len == 0`.
	pub fn new(prefix_len: usize) -> Result<Self> {
		if prefix_len == 0 {
			return Err(MarkovError::InvalidPrefixLength(prefix_len));
		}
		Ok(Self { prefix_len, table: BTreeMap::new() })
	}

	/// Builds a chain from text files, one independent stream per file.
	///
	/// # Errors
	/// Fails on the first file that cannot be opened or read; no file is skipped.
	pub fn from_files<P: AsRef<Path>>(prefix_len: usize, paths: &[P]) -> Result<Self> {
		let mut chain = Self::new(prefix_len)?;
		for path in paths {
			let words = read_words(path)?;
			debug!("{}: {} words", path.as_ref().display(), words.len());
			chain.feed_tokens(&words);
		}
		info!(
			"Built chain from {} file(s): {} prefixes, {} observations",
			paths.len(),
			chain.len(),
			chain.observations()
		);
		Ok(chain)
	}

	pub fn prefix_len(&self) -> usize {
		self.prefix_len
	}

	/// Number of distinct prefixes.
	pub fn len(&self) -> usize {
		self.table.len()
	}

	pub fn is_empty(&self) -> bool {
		self.table.is_empty()
	}

	/// Sum of every suffix count in the chain, saturating at `usize::MAX`.
	pub fn observations(&self) -> usize {
		self.table
			.values()
			.map(|t| t.total().unwrap_or(usize::MAX))
			.fold(0, usize::saturating_add)
	}

	/// Start-of-text prefix for this chain.
	pub fn start_prefix(&self) -> Prefix {
		Prefix::start(self.prefix_len)
	}

	/// Feeds whitespace-separated text as one stream.
	pub fn feed_str(&mut self, text: &str) {
		let words: Vec<&str> = text.split_whitespace().collect();
		self.feed_tokens(&words);
	}

	/// Feeds one token stream.
	///
	/// The window restarts from the start prefix on every call, so separate
	/// streams never share a prefix across their boundary.
	pub fn feed_tokens<S: AsRef<str>>(&mut self, words: &[S]) {
		let mut prefix = self.start_prefix();
		for word in words {
			let word = word.as_ref();
			self.table.entry(prefix.clone()).or_default().observe(word);
			prefix.shift(word);
		}
	}

	/// Suffix table recorded for `prefix`, if any.
	pub fn suffixes(&self, prefix: &Prefix) -> Option<&SuffixTable> {
		self.table.get(prefix)
	}

	/// Adds `count` occurrences of `word` after `prefix`.
	///
	/// Used when loading a persisted model; repeated words are merged.
	///
	/// # Errors
	/// - `PrefixMismatch` if `prefix` does not have `prefix_len` tokens
	/// - `CountOverflow` if the prefix's total count would exceed `usize::MAX`
	pub fn insert(&mut self, prefix: Prefix, word: &str, count: usize) -> Result<()> {
		self.check_prefix(&prefix)?;
		let table = self.table.entry(prefix.clone()).or_default();
		table
			.add(word, count)
			.ok_or_else(|| MarkovError::CountOverflow(prefix.to_string()))
	}

	/// Registers `prefix` even if no suffix follows.
	pub(crate) fn touch(&mut self, prefix: Prefix) -> Result<()> {
		self.check_prefix(&prefix)?;
		self.table.entry(prefix).or_default();
		Ok(())
	}

	/// Iterates over `(prefix, suffixes)` in key order.
	pub fn iter(&self) -> impl Iterator<Item = (&Prefix, &SuffixTable)> {
		self.table.iter()
	}

	/// Checks the invariants of a chain that did not go through `insert`
	/// (a decoded binary model).
	///
	/// # Errors
	/// - `PrefixMismatch` for a key of the wrong length
	/// - `CountOverflow` for a suffix table whose total overflows
	/// - `DuplicateSuffix` for a word listed twice after the same prefix
	pub fn validate(&self) -> Result<()> {
		for (prefix, suffixes) in &self.table {
			self.check_prefix(prefix)?;
			if suffixes.total().is_none() {
				return Err(MarkovError::CountOverflow(prefix.to_string()));
			}
			if let Some(word) = suffixes.duplicate_word() {
				return Err(MarkovError::DuplicateSuffix {
					prefix: prefix.to_string(),
					word: word.to_owned(),
				});
			}
		}
		Ok(())
	}

	fn check_prefix(&self, prefix: &Prefix) -> Result<()> {
		if prefix.len() != self.prefix_len {
			return Err(MarkovError::PrefixMismatch {
				expected: self.prefix_len,
				found: prefix.len(),
			});
		}
		Ok(())
	}
}
