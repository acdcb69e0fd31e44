use rand::Rng;

use serde::{Deserialize, Serialize};

/// A word observed after some prefix, with how many times it was seen.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Suffix {
	pub word: String,
	pub count: usize,
}

/// All words observed after one prefix.
///
/// Conceptually, this is the set of outgoing edges of a node in the Markov
/// chain, weighted by their number of observations.
///
/// ## Responsibilities:
/// - Accumulate occurrences during learning
/// - Pick the next word using weighted random sampling
///
/// ## Invariants
/// - A word appears at most once (counts are merged)
/// - Entries keep their first-seen order, which decides sampling tie-breaks
/// - The sum of all counts fits in a `usize` (tables built through `add`)
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct SuffixTable {
	entries: Vec<Suffix>,
}

impl SuffixTable {
	pub fn new() -> Self {
		Self::default()
	}

	/// Records `count` more occurrences of `word`.
	///
	/// - If the word already exists, its count is increased.
	/// - Otherwise, a new entry is appended at the end of the table.
	///
	/// Returns `None` and leaves the table untouched if the table total
	/// would overflow.
	pub fn add(&mut self, word: &str, count: usize) -> Option<()> {
		self.total()?.checked_add(count)?;
		match self.entries.iter_mut().find(|s| s.word == word) {
			Some(existing) => existing.count = existing.count.checked_add(count)?,
			None => self.entries.push(Suffix { word: word.to_owned(), count }),
		}
		Some(())
	}

	/// Records one occurrence of `word`.
	pub fn observe(&mut self, word: &str) {
		// A token stream held in memory cannot reach usize::MAX words
		let _ = self.add(word, 1);
	}

	pub fn entries(&self) -> &[Suffix] {
		&self.entries
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Count of `word`, or 0 if it was never seen.
	pub fn count_of(&self, word: &str) -> usize {
		self.entries
			.iter()
			.find(|s| s.word == word)
			.map_or(0, |s| s.count)
	}

	/// Sum of all counts, or `None` if it does not fit in a `usize`.
	pub fn total(&self) -> Option<usize> {
		self.entries.iter().try_fold(0usize, |acc, s| acc.checked_add(s.count))
	}

	/// Running totals of the counts, in table order.
	///
	/// Returns `None` if a running total overflows.
	pub fn cumulative(&self) -> Option<Vec<usize>> {
		let mut acc = 0usize;
		self.entries
			.iter()
			.map(|s| {
				acc = acc.checked_add(s.count)?;
				Some(acc)
			})
			.collect()
	}

	/// Finds the first word listed twice, if any.
	pub fn duplicate_word(&self) -> Option<&str> {
		self.entries
			.iter()
			.enumerate()
			.find(|(i, s)| self.entries[..*i].iter().any(|o| o.word == s.word))
			.map(|(_, s)| s.word.as_str())
	}

	/// Selects the entry owning draw `r` in `[0, total)`.
	///
	/// The winner is the first index whose running total exceeds `r`, so
	/// earlier entries win on boundary values. Returns `None` when `r` is out
	/// of range or the counts overflow.
	pub fn pick(&self, r: usize) -> Option<&str> {
		let cumulative = self.cumulative()?;
		let index = cumulative.partition_point(|&c| c <= r);
		self.entries.get(index).map(|s| s.word.as_str())
	}

	/// Picks the next word with probability proportional to its count.
	///
	/// Returns `None` if the table is empty, every count is zero, or the
	/// counts overflow.
	pub fn predict<R: Rng>(&self, rng: &mut R) -> Option<&str> {
		let total = self.total()?;
		if total == 0 {
			return None;
		}
		self.pick(rng.random_range(0..total))
	}
}
