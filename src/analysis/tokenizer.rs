//! Tokenizer implementations for text analysis.
//!
//! A tokenizer cuts text into alternating word and separator tokens. Unlike
//! a search tokenizer it never drops anything: the separators are kept so the
//! normalized text can be put back together byte for byte.
//!
//! # Available Tokenizers
//!
//! - [`letter_run::LetterRunTokenizer`] - Words are maximal runs of letter graphemes
//!
//! # Examples
//!
//! ```
//! use hassy::analysis::tokenizer::Tokenizer;
//! use hassy::analysis::tokenizer::letter_run::LetterRunTokenizer;
//!
//! let tokenizer = LetterRunTokenizer::new();
//! let tokens: Vec<_> = tokenizer.tokenize("قال الرجل").unwrap().collect();
//! assert_eq!(tokens.len(), 3);
//! ```

use crate::analysis::token::{Token, TokenStream, reassemble};
use crate::error::{HassyError, Result};

/// Trait for tokenizers that convert text into word and separator tokens.
///
/// The trait requires `Send + Sync` to allow use in concurrent contexts.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of tokens.
    ///
    /// The concatenation of all token texts must equal `text`.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

/// Check that `tokens` reassemble exactly into `text` with contiguous offsets.
pub fn verify_lossless(text: &str, tokens: &[Token]) -> Result<()> {
    let mut expected_start = 0;
    for token in tokens {
        if token.start_offset != expected_start
            || token.end_offset != token.start_offset + token.len()
        {
            return Err(HassyError::internal(format!(
                "token {} has offsets {}..{}, expected to start at {}",
                token.position, token.start_offset, token.end_offset, expected_start
            )));
        }
        expected_start = token.end_offset;
    }

    if reassemble(tokens) != text {
        return Err(HassyError::internal(format!(
            "{} tokens do not reassemble into the {}-byte input",
            tokens.len(),
            text.len()
        )));
    }
    Ok(())
}

// Individual tokenizer modules
pub mod letter_run;

pub use letter_run::LetterRunTokenizer;
