//! Saving and loading chains.
//!
//! Two on-disk formats are supported:
//!
//! - **Text** (default): first line is the prefix length, then one line per
//!   prefix: `tok_1 .. tok_N word_1 count_1 word_2 count_2 ...`. The start
//!   token is written as `""`. A word that is literally `""` or starts with
//!   `\` gets one extra leading `\`.
//! - **Binary**: the serde representation of [`Chain`] encoded with `postcard`.

use std::io::{BufRead, Write};
use std::path::Path;

use log::{debug, info, warn};

use super::chain::Chain;
use super::prefix::{Prefix, Token};
use crate::error::{MarkovError, Result};
use crate::io;

/// Marker written in place of the start token.
pub const START_MARKER: &str = "\"\"";

const ESCAPE: char = '\\';

/// On-disk representation of a chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ModelFormat {
	#[default]
	Text,
	Binary,
}

impl ModelFormat {
	/// Picks the format from a file extension: `.bin` is binary, anything
	/// else is text.
	pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
		match io::extension(path).as_deref() {
			Some("bin") => ModelFormat::Binary,
			_ => ModelFormat::Text,
		}
	}
}

/// Options controlling how a text model is parsed.
#[derive(Clone, Copy, Debug, Default)]
pub struct LoadOptions {
	/// Reject count fields that are not integers instead of reading them as 0.
	pub strict: bool,
}

impl Chain {
	/// Writes the chain to `path` in the given format.
	///
	/// # Errors
	/// Returns `WriteModel` if the file cannot be created or written.
	pub fn save<P: AsRef<Path>>(&self, path: P, format: ModelFormat) -> Result<()> {
		let path = path.as_ref();
		let mut writer = io::create_writer(path)?;
		let written = match format {
			ModelFormat::Text => self.write_text(&mut writer),
			ModelFormat::Binary => {
				let bytes = postcard::to_stdvec(self)?;
				writer.write_all(&bytes)
			}
		};
		written
			.and_then(|_| writer.flush())
			.map_err(|source| MarkovError::WriteModel { path: path.to_owned(), source })?;
		info!("Saved {} prefixes to {} ({:?})", self.len(), path.display(), format);
		Ok(())
	}

	/// Reads a chain from `path` in the given format.
	///
	/// # Errors
	/// - `OpenInput` if the file cannot be opened or read
	/// - `MalformedModel` / `Encoding` if its content is invalid
	pub fn load<P: AsRef<Path>>(path: P, format: ModelFormat, options: LoadOptions) -> Result<Self> {
		let path = path.as_ref();
		let chain = match format {
			ModelFormat::Text => Self::read_text(io::open_reader(path)?, options)?,
			ModelFormat::Binary => {
				let chain: Chain = postcard::from_bytes(&io::read_bytes(path)?)?;
				if chain.prefix_len() == 0 {
					return Err(MarkovError::InvalidPrefixLength(0));
				}
				chain.validate()?;
				chain
			}
		};
		info!("Loaded {} prefixes from {} ({:?})", chain.len(), path.display(), format);
		Ok(chain)
	}

	/// Writes the text format to any writer.
	pub fn write_text<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
		writeln!(out, "{}", self.prefix_len())?;
		for (prefix, suffixes) in self.iter() {
			let mut fields: Vec<String> = prefix.tokens().iter().map(encode_token).collect();
			for suffix in suffixes.entries() {
				fields.push(encode_word(&suffix.word));
				fields.push(suffix.count.to_string());
			}
			writeln!(out, "{}", fields.join(" "))?;
		}
		Ok(())
	}

	/// Parses the text format from any buffered reader.
	///
	/// Blank lines are skipped and a trailing unpaired field is ignored.
	pub fn read_text<R: BufRead>(reader: R, options: LoadOptions) -> Result<Self> {
		let mut lines = reader.lines().enumerate();

		let header = loop {
			match lines.next() {
				Some((_, Ok(line))) if line.trim().is_empty() => continue,
				Some((number, Ok(line))) => break (number + 1, line),
				Some((number, Err(e))) => return Err(MarkovError::malformed(number + 1, e.to_string())),
				None => return Err(MarkovError::malformed(1, "missing prefix length")),
			}
		};
		let prefix_len: usize = header
			.1
			.trim()
			.parse()
			.map_err(|_| MarkovError::malformed(header.0, format!("invalid prefix length {:?}", header.1.trim())))?;
		let mut chain = Chain::new(prefix_len)
			.map_err(|_| MarkovError::malformed(header.0, "prefix length must be >= 1"))?;

		for (index, line) in lines {
			let number = index + 1;
			let line = line.map_err(|e| MarkovError::malformed(number, e.to_string()))?;
			let fields: Vec<&str> = line.split_whitespace().collect();
			if fields.is_empty() {
				continue;
			}
			if fields.len() < prefix_len {
				return Err(MarkovError::malformed(
					number,
					format!("expected {} prefix fields, found {}", prefix_len, fields.len()),
				));
			}

			let prefix = Prefix::from_tokens(fields[..prefix_len].iter().map(|f| decode_token(f)).collect());
			let pairs = &fields[prefix_len..];
			if pairs.len() % 2 == 1 {
				debug!("line {}: ignoring unpaired field {:?}", number, pairs[pairs.len() - 1]);
			}

			let at_line = |e: MarkovError| MarkovError::malformed(number, e.to_string());
			chain.touch(prefix.clone()).map_err(at_line)?;
			for pair in pairs.chunks_exact(2) {
				let count = parse_count(pair[1], number, options)?;
				chain
					.insert(prefix.clone(), &decode_word(pair[0]), count)
					.map_err(at_line)?;
			}
		}

		Ok(chain)
	}
}

fn parse_count(field: &str, line: usize, options: LoadOptions) -> Result<usize> {
	match field.parse::<usize>() {
		Ok(count) => Ok(count),
		Err(_) if options.strict => Err(MarkovError::malformed(line, format!("invalid count {:?}", field))),
		Err(_) => {
			warn!("line {}: invalid count {:?}, using 0", line, field);
			Ok(0)
		}
	}
}

fn encode_token(token: &Token) -> String {
	match token {
		Token::Start => START_MARKER.to_owned(),
		Token::Word(w) => encode_word(w),
	}
}

fn encode_word(word: &str) -> String {
	if word == START_MARKER || word.starts_with(ESCAPE) {
		format!("{ESCAPE}{word}")
	} else {
		word.to_owned()
	}
}

fn decode_token(field: &str) -> Token {
	if field == START_MARKER {
		Token::Start
	} else {
		Token::Word(decode_word(field))
	}
}

fn decode_word(field: &str) -> String {
	field.strip_prefix(ESCAPE).unwrap_or(field).to_owned()
}

#[cfg(test)]
mod tests {
	use super::*;

	fn parse(text: &str, strict: bool) -> Result<Chain> {
		Chain::read_text(text.as_bytes(), LoadOptions { strict })
	}

	#[test]
	fn text_layout_matches_the_line_format() {
		let mut chain = Chain::new(2).unwrap();
		chain.feed_str("I am I am not");
		let mut out = Vec::new();
		chain.write_text(&mut out).unwrap();
		let text = String::from_utf8(out).unwrap();
		let lines: Vec<&str> = text.lines().collect();

		assert_eq!(lines[0], "2");
		assert_eq!(lines[1], "\"\" \"\" I 1");
		assert_eq!(lines[2], "\"\" I am 1");
		assert!(lines.contains(&"I am I 1 not 1"));
		assert!(lines.contains(&"am I am 1"));
		assert_eq!(lines.len(), 5);
	}

	#[test]
	fn reads_suffix_pairs_in_order() {
		let chain = parse("2\n\"\" \"\" I 1\nI am not 1 a 1\n", false).unwrap();
		let table = chain.suffixes(&Prefix::from_words(&["I", "am"])).unwrap();
		let words: Vec<&str> = table.entries().iter().map(|s| s.word.as_str()).collect();
		assert_eq!(words, vec!["not", "a"]);
		assert_eq!(chain.suffixes(&chain.start_prefix()).unwrap().count_of("I"), 1);
	}

	#[test]
	fn malformed_count_is_zero_when_lenient() {
		let chain = parse("1\na b x c 2\n", false).unwrap();
		let table = chain.suffixes(&Prefix::from_words(&["a"])).unwrap();
		assert_eq!(table.count_of("b"), 0);
		assert_eq!(table.count_of("c"), 2);
	}

	#[test]
	fn malformed_count_fails_when_strict() {
		let err = parse("1\na b 1\na b x\n", true).unwrap_err();
		assert!(matches!(err, MarkovError::MalformedModel { line: 3, .. }));
	}

	#[test]
	fn bad_header_is_rejected() {
		assert!(matches!(parse("", false), Err(MarkovError::MalformedModel { line: 1, .. })));
		assert!(matches!(parse("two\n", false), Err(MarkovError::MalformedModel { line: 1, .. })));
		assert!(matches!(parse("0\n", false), Err(MarkovError::MalformedModel { .. })));
	}

	#[test]
	fn overflowing_counts_are_rejected_with_their_line() {
		let max = usize::MAX;
		for strict in [false, true] {
			let repeated = parse(&format!("1\n\"\" a {max} a 1\n"), strict).unwrap_err();
			assert!(matches!(repeated, MarkovError::MalformedModel { line: 2, .. }), "{repeated}");
			assert!(repeated.to_string().contains("overflow"));

			let two_words = parse(&format!("1\n\"\" a 1\n\"\" a {max} b 5\n"), strict).unwrap_err();
			assert!(matches!(two_words, MarkovError::MalformedModel { line: 3, .. }), "{two_words}");
		}
	}

	#[test]
	fn largest_count_alone_is_accepted() {
		let max = usize::MAX;
		let chain = parse(&format!("1\n\"\" a {max}\n"), true).unwrap();
		assert_eq!(chain.suffixes(&chain.start_prefix()).unwrap().total(), Some(max));
	}

	#[test]
	fn short_line_is_rejected() {
		let err = parse("3\na b\n", false).unwrap_err();
		assert!(matches!(err, MarkovError::MalformedModel { line: 2, .. }));
	}

	#[test]
	fn unpaired_trailing_field_is_ignored() {
		let chain = parse("1\n\na b 2 c\n", false).unwrap();
		let table = chain.suffixes(&Prefix::from_words(&["a"])).unwrap();
		assert_eq!(table.entries().len(), 1);
		assert_eq!(table.count_of("b"), 2);
	}

	#[test]
	fn duplicate_words_on_a_line_are_merged() {
		let chain = parse("1\na b 2 b 3\n", false).unwrap();
		let table = chain.suffixes(&Prefix::from_words(&["a"])).unwrap();
		assert_eq!(table.entries().len(), 1);
		assert_eq!(table.count_of("b"), 5);
	}

	#[test]
	fn marker_like_words_are_escaped() {
		let mut chain = Chain::new(1).unwrap();
		chain.feed_str("\"\" \\x plain");
		let mut out = Vec::new();
		chain.write_text(&mut out).unwrap();
		let text = String::from_utf8(out).unwrap();
		assert!(text.contains("\"\" \\\"\" 1"));
		assert!(text.contains("\\\"\" \\\\x 1"));

		let back = parse(&text, true).unwrap();
		assert_eq!(back, chain);
	}

	#[test]
	fn format_follows_extension() {
		assert_eq!(ModelFormat::from_path("m.bin"), ModelFormat::Binary);
		assert_eq!(ModelFormat::from_path("m.txt"), ModelFormat::Text);
		assert_eq!(ModelFormat::from_path("model"), ModelFormat::Text);
	}
}
