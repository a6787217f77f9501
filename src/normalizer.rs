//! Word-level normalization of Hassaniya text.
//!
//! The [`Normalizer`] tokenizes text losslessly, normalizes each word
//! against one data snapshot and reassembles the result. Word outcomes are
//! cached per snapshot version in a [`WordCache`].

pub mod cache;
pub mod engine;
pub mod result;

pub use cache::{CacheStats, WordCache};
pub use engine::Normalizer;
pub use result::{NormalizationResult, NormalizedToken, WordOutcome, WordSource};
