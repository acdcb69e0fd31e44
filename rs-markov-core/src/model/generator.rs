use log::debug;
use rand::Rng;

use super::chain::Chain;
use super::prefix::Prefix;

/// Weighted random walk over a [`Chain`].
///
/// # Responsibilities
/// - Start from the start-of-text prefix the builder used
/// - Sample each next word proportionally to its recorded count
/// - Slide the prefix window by every emitted word
///
/// The walk ends when the current prefix has no usable suffix. Chains may
/// contain cycles, so callers bound the length with `take` or [`Generator::generate`].
pub struct Generator<'a, R: Rng> {
	chain: &'a Chain,
	rng: R,
	prefix: Prefix,
	done: bool,
}

impl<'a, R: Rng> Generator<'a, R> {
	/// Creates a walk over `chain` drawing from `rng`.
	///
	/// Pass `&mut rng` to keep using the generator afterwards.
	pub fn new(chain: &'a Chain, rng: R) -> Self {
		Self {
			chain,
			rng,
			prefix: chain.start_prefix(),
			done: false,
		}
	}

	/// Current prefix window.
	pub fn prefix(&self) -> &Prefix {
		&self.prefix
	}

	/// Generates at most `max_words` words joined by single spaces.
	pub fn generate(self, max_words: usize) -> String {
		let words: Vec<String> = self.take(max_words).collect();
		debug!("Generated {} word(s)", words.len());
		words.join(" ")
	}
}

impl<R: Rng> Iterator for Generator<'_, R> {
	type Item = String;

	fn next(&mut self) -> Option<String> {
		if self.done {
			return None;
		}
		let next = self
			.chain
			.suffixes(&self.prefix)
			.and_then(|suffixes| suffixes.predict(&mut self.rng))
			.map(str::to_owned);
		match next {
			Some(word) => {
				self.prefix.shift(&word);
				Some(word)
			}
			None => {
				debug!("No continuation for prefix [{}]", self.prefix);
				self.done = true;
				None
			}
		}
	}
}

/// Generates at most `max_words` words from `chain`.
pub fn generate<R: Rng>(chain: &Chain, rng: &mut R, max_words: usize) -> String {
	Generator::new(chain, rng).generate(max_words)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	const TEXT: &str = "I am not a number I am a free man";

	#[test]
	fn output_is_bounded_by_the_budget() {
		let mut chain = Chain::new(1).unwrap();
		chain.feed_str("a a a a");
		let mut rng = StdRng::seed_from_u64(7);
		let text = generate(&chain, &mut rng, 10);
		assert_eq!(text.split(' ').count(), 10);
		assert!(text.split(' ').all(|w| w == "a"));
	}

	#[test]
	fn walk_stops_at_a_dead_end() {
		let mut chain = Chain::new(2).unwrap();
		chain.feed_str("one two three");
		let mut rng = StdRng::seed_from_u64(7);
		assert_eq!(generate(&chain, &mut rng, 100), "one two three");
	}

	#[test]
	fn unknown_start_prefix_gives_nothing() {
		let mut chain = Chain::new(2).unwrap();
		chain.insert(Prefix::from_words(&["x", "y"]), "z", 3).unwrap();
		let mut rng = StdRng::seed_from_u64(7);
		assert_eq!(generate(&chain, &mut rng, 5), "");

		let empty = Chain::new(3).unwrap();
		assert_eq!(generate(&empty, &mut rng, 5), "");
	}

	#[test]
	fn zero_budget_gives_nothing() {
		let mut chain = Chain::new(2).unwrap();
		chain.feed_str(TEXT);
		let mut rng = StdRng::seed_from_u64(7);
		assert_eq!(generate(&chain, &mut rng, 0), "");
	}

	#[test]
	fn generated_text_only_uses_observed_transitions() {
		let mut chain = Chain::new(2).unwrap();
		chain.feed_str(TEXT);
		let mut rng = StdRng::seed_from_u64(3);
		for _ in 0..50 {
			let text = generate(&chain, &mut rng, 30);
			let words: Vec<&str> = text.split(' ').collect();
			assert_eq!(&words[..2], &["I", "am"]);
			let mut prefix = chain.start_prefix();
			for word in words {
				let suffixes = chain.suffixes(&prefix).unwrap();
				assert!(suffixes.count_of(word) > 0, "{word} never follows [{prefix}]");
				prefix.shift(word);
			}
		}
	}

	#[test]
	fn same_seed_same_text() {
		let mut chain = Chain::new(1).unwrap();
		chain.feed_str("a b a c a b b c a a c b");
		let first = generate(&chain, &mut StdRng::seed_from_u64(99), 40);
		let second = generate(&chain, &mut StdRng::seed_from_u64(99), 40);
		assert_eq!(first, second);
	}

	#[test]
	fn iterator_slides_the_prefix() {
		let mut chain = Chain::new(2).unwrap();
		chain.feed_str("one two three");
		let mut walk = Generator::new(&chain, StdRng::seed_from_u64(1));
		assert_eq!(walk.next().as_deref(), Some("one"));
		assert_eq!(walk.next().as_deref(), Some("two"));
		assert_eq!(walk.prefix(), &Prefix::from_words(&["one", "two"]));
		assert_eq!(walk.next().as_deref(), Some("three"));
		assert_eq!(walk.next(), None);
		assert_eq!(walk.next(), None);
	}
}
