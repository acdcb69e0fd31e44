//! Word-level Markov chain text generation library.
//!
//! This crate provides:
//! - Construction of a prefix → weighted-suffix chain from text files
//! - Persistence of the chain as a readable text file or a compact binary
//! - Generation of text by a weighted random walk with an injected RNG
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use rs_markov_core::model::chain::Chain;
//! use rs_markov_core::model::generator::generate;
//!
//! let mut chain = Chain::new(2)?;
//! chain.feed_str("I am not a number I am a free man");
//! let text = generate(&chain, &mut StdRng::seed_from_u64(1), 20);
//! assert!(text.starts_with("I am"));
//! # Ok::<(), rs_markov_core::error::MarkovError>(())
//! ```

/// Markov chain model, persistence and generation.
pub mod model;

/// Crate error type.
pub mod error;

/// File helpers.
///
/// Not exposed
pub(crate) mod io;

pub use error::{MarkovError, Result};
pub use model::chain::Chain;
pub use model::generator::{Generator, generate};
pub use model::prefix::{Prefix, Token};
pub use model::store::{LoadOptions, ModelFormat};
pub use model::suffix::{Suffix, SuffixTable};
