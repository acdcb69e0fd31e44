use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::error::{MarkovError, Result};

/// Reads a text file and splits it into whitespace-delimited words.
///
/// Invalid UTF-8 sequences become U+FFFD instead of failing the read.
pub(crate) fn read_words<P: AsRef<Path>>(filename: P) -> Result<Vec<String>> {
	let bytes = read_bytes(filename)?;
	Ok(String::from_utf8_lossy(&bytes).split_whitespace().map(str::to_owned).collect())
}

/// Reads a whole file as raw bytes.
pub(crate) fn read_bytes<P: AsRef<Path>>(filename: P) -> Result<Vec<u8>> {
	let path = filename.as_ref();
	fs::read(path).map_err(|source| MarkovError::OpenInput { path: path.to_owned(), source })
}

/// Opens a buffered reader over a file.
pub(crate) fn open_reader<P: AsRef<Path>>(filename: P) -> Result<BufReader<File>> {
	let path = filename.as_ref();
	File::open(path)
		.map(BufReader::new)
		.map_err(|source| MarkovError::OpenInput { path: path.to_owned(), source })
}

/// Creates (or truncates) a file and wraps it in a buffered writer.
pub(crate) fn create_writer<P: AsRef<Path>>(filename: P) -> Result<BufWriter<File>> {
	let path = filename.as_ref();
	File::create(path)
		.map(BufWriter::new)
		.map_err(|source| MarkovError::WriteModel { path: path.to_owned(), source })
}

/// Lowercased extension of a path, if it has one.
///
/// Examples:
/// - `"./data/model.BIN"` → `Some("bin")`
/// - `"model"` → `None`
pub(crate) fn extension<P: AsRef<Path>>(input_path: P) -> Option<String> {
	input_path
		.as_ref()
		.extension()
		.map(|ext| ext.to_string_lossy().to_lowercase())
}
