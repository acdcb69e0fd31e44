//! `rs-markov` command line.
//!
//! - `build <prefix_len> <output> <input>...` learns a chain and saves it
//! - `generate <model> <word_count>` prints up to `word_count` words on one line
//!
//! Exit statuses: 0 success, 2 usage error, 3 unreadable input or model,
//! 4 model cannot be written, 5 malformed model.

mod cli;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::Env;
use log::{LevelFilter, debug};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rs_markov_core::{Chain, MarkovError, generate};

use cli::{BuildArgs, Cli, Command, GenerateArgs, resolve_format};

fn main() -> ExitCode {
	let cli = Cli::parse();
	init_logging(cli.verbose, cli.quiet);

	let outcome = match cli.command {
		Command::Build(args) => run_build(args),
		Command::Generate(args) => run_generate(args),
	};

	match outcome {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			eprintln!("Error: {err:#}");
			ExitCode::from(exit_status(&err))
		}
	}
}

/// Library errors keep their own status; anything else is a generic failure.
fn exit_status(err: &anyhow::Error) -> u8 {
	err.downcast_ref::<MarkovError>().map_or(1, MarkovError::exit_code)
}

fn init_logging(verbose: u8, quiet: u8) {
	let level = match (quiet, verbose) {
		(0, 0) => LevelFilter::Warn,
		(0, 1) => LevelFilter::Info,
		(0, 2) => LevelFilter::Debug,
		(0, _) => LevelFilter::Trace,
		(1, _) => LevelFilter::Error,
		_ => LevelFilter::Off,
	};

	let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("warn"));
	if std::env::var_os("RUST_LOG").is_none() {
		builder.filter_level(level);
	}
	let _ = builder.try_init();
}

fn run_build(args: BuildArgs) -> Result<()> {
	let format = resolve_format(args.format, &args.output);
	let chain = Chain::from_files(args.prefix_len.get(), args.inputs.as_slice()).context("cannot build model")?;
	chain
		.save(&args.output, format)
		.context("cannot save model")?;
	Ok(())
}

fn run_generate(args: GenerateArgs) -> Result<()> {
	let format = resolve_format(args.format, &args.model);
	let chain = Chain::load(&args.model, format, args.load_options()).context("cannot load model")?;

	let mut rng = match args.seed {
		Some(seed) => {
			debug!("Using seed {}", seed);
			StdRng::seed_from_u64(seed)
		}
		None => StdRng::from_os_rng(),
	};

	println!("{}", generate(&chain, &mut rng, args.word_count.get()));
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io;
	use std::path::PathBuf;

	#[test]
	fn exit_status_survives_context() {
		let err = anyhow::Error::new(MarkovError::OpenInput {
			path: PathBuf::from("x"),
			source: io::Error::new(io::ErrorKind::NotFound, "gone"),
		})
		.context("cannot build model");
		assert_eq!(exit_status(&err), 3);
		assert_eq!(exit_status(&anyhow::anyhow!("other")), 1);
	}
}
