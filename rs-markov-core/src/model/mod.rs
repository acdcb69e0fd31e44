//! Word-level Markov chain model.
//!
//! - Prefix windows and the start token (`Prefix`, `Token`)
//! - Weighted suffix tables (`SuffixTable`)
//! - The prefix → suffix chain and its builder (`Chain`)
//! - Text and binary persistence (`ModelFormat`, `LoadOptions`)
//! - The weighted random walk (`Generator`)

/// Fixed-length prefix windows.
pub mod prefix;

/// Words observed after a prefix, with weighted sampling.
pub mod suffix;

/// The chain itself: construction from text and lookups.
pub mod chain;

/// Save/load in the line-oriented text format or with `postcard`.
pub mod store;

/// Random walk producing text from a chain.
pub mod generator;
