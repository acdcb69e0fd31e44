use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use rs_markov_core::{LoadOptions, ModelFormat};

#[derive(Parser, Debug)]
#[command(name = "rs-markov", version, about = "Build word-level Markov chains and generate text from them")]
pub struct Cli {
	/// Increase verbosity (-v, -vv)
	#[arg(short = 'v', long, global = true, action = ArgAction::Count)]
	pub verbose: u8,

	/// Decrease verbosity (-q, -qq)
	#[arg(short = 'q', long, global = true, action = ArgAction::Count)]
	pub quiet: u8,

	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Build a model from text files and save it
	Build(BuildArgs),
	/// Generate text from a saved model
	Generate(GenerateArgs),
}

#[derive(Args, Debug)]
pub struct BuildArgs {
	/// Number of words of context
	pub prefix_len: NonZeroUsize,

	/// Where to write the model
	pub output: PathBuf,

	/// Text files to learn from; each one is a separate stream
	#[arg(required = true)]
	pub inputs: Vec<PathBuf>,

	/// Model format (defaults to `bin` for a .bin path, `text` otherwise)
	#[arg(long, value_enum)]
	pub format: Option<FormatArg>,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
	/// Model file written by `build`
	pub model: PathBuf,

	/// Maximum number of words to emit
	pub word_count: NonZeroUsize,

	/// Seed for reproducible output
	#[arg(long)]
	pub seed: Option<u64>,

	/// Fail on malformed counts instead of reading them as 0
	#[arg(long)]
	pub strict: bool,

	/// Model format (defaults to `bin` for a .bin path, `text` otherwise)
	#[arg(long, value_enum)]
	pub format: Option<FormatArg>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatArg {
	Text,
	Bin,
}

impl From<FormatArg> for ModelFormat {
	fn from(format: FormatArg) -> Self {
		match format {
			FormatArg::Text => ModelFormat::Text,
			FormatArg::Bin => ModelFormat::Binary,
		}
	}
}

/// Explicit `--format`, or the one implied by the path.
pub fn resolve_format(format: Option<FormatArg>, path: &Path) -> ModelFormat {
	format.map_or_else(|| ModelFormat::from_path(path), ModelFormat::from)
}

impl GenerateArgs {
	pub fn load_options(&self) -> LoadOptions {
		LoadOptions { strict: self.strict }
	}
}
