//! Error type shared by every model operation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building, persisting or loading a chain.
#[derive(Debug, Error)]
pub enum MarkovError {
	/// A chain needs at least one word of context.
	#[error("Prefix length must be >= 1, got {0}")]
	InvalidPrefixLength(usize),

	/// An input text or model file could not be opened or read.
	#[error("Cannot open {}: {source}", path.display())]
	OpenInput {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	/// The output model file could not be created or written.
	#[error("Cannot write model {}: {source}", path.display())]
	WriteModel {
		path: PathBuf,
		#[source]
		source: io::Error,
	},

	/// A text model file does not follow the line format.
	#[error("Malformed model at line {line}: {message}")]
	MalformedModel {
		/// 1-based line number in the model file
		line: usize,
		message: String,
	},

	/// A prefix does not have the chain's prefix length.
	#[error("Prefix has {found} tokens, expected {expected}")]
	PrefixMismatch { expected: usize, found: usize },

	/// The counts recorded after one prefix no longer fit in a `usize`.
	#[error("Count overflow after prefix [{0}]")]
	CountOverflow(String),

	/// A suffix table lists the same word twice.
	#[error("Duplicate suffix {word:?} after prefix [{prefix}]")]
	DuplicateSuffix { prefix: String, word: String },

	/// Binary model encoding or decoding failed.
	#[error("Binary model error: {0}")]
	Encoding(#[from] postcard::Error),
}

impl MarkovError {
	/// Create a MalformedModel error.
	pub fn malformed(line: usize, message: impl Into<String>) -> Self {
		Self::MalformedModel {
			line,
			message: message.into(),
		}
	}

	/// Process exit status associated with this error.
	///
	/// - 3: an input or model file cannot be opened
	/// - 4: the output model cannot be written
	/// - 5: the model file content is invalid
	/// - 2: anything caught before touching the filesystem
	pub fn exit_code(&self) -> u8 {
		match self {
			Self::InvalidPrefixLength(_) => 2,
			Self::OpenInput { .. } => 3,
			Self::WriteModel { .. } => 4,
			Self::MalformedModel { .. }
			| Self::PrefixMismatch { .. }
			| Self::CountOverflow(_)
			| Self::DuplicateSuffix { .. }
			| Self::Encoding(_) => 5,
		}
	}
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, MarkovError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn exit_codes_are_distinct_per_failure_kind() {
		let open = MarkovError::OpenInput {
			path: PathBuf::from("missing.txt"),
			source: io::Error::new(io::ErrorKind::NotFound, "gone"),
		};
		let write = MarkovError::WriteModel {
			path: PathBuf::from("out.model"),
			source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
		};
		let malformed = MarkovError::malformed(3, "bad header");

		assert_eq!(MarkovError::InvalidPrefixLength(0).exit_code(), 2);
		assert_eq!(open.exit_code(), 3);
		assert_eq!(write.exit_code(), 4);
		assert_eq!(malformed.exit_code(), 5);
		assert_eq!(MarkovError::PrefixMismatch { expected: 2, found: 1 }.exit_code(), 5);
		assert_eq!(MarkovError::CountOverflow("a".to_owned()).exit_code(), 5);
	}

	#[test]
	fn messages_name_the_offending_path_and_line() {
		let open = MarkovError::OpenInput {
			path: PathBuf::from("missing.txt"),
			source: io::Error::new(io::ErrorKind::NotFound, "gone"),
		};
		assert!(open.to_string().contains("missing.txt"));
		assert!(MarkovError::malformed(7, "x").to_string().contains("line 7"));
	}
}
