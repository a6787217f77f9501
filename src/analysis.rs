//! Text analysis module for hassy.
//!
//! This module provides the word-level building blocks of normalization:
//! lossless word/separator tokenization and the ordered letter rules applied
//! to words that have no variant or exception entry.

pub mod rules;
pub mod token;
pub mod tokenizer;

// Re-export commonly used types
pub use rules::{LetterRule, RuleEngine, RuleOutcome, apply_rules};
pub use token::{Token, TokenKind, TokenStream};
pub use tokenizer::{LetterRunTokenizer, Tokenizer};
