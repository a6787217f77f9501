//! Letter-run tokenizer implementation.
//!
//! Splits text into maximal runs of letter graphemes (words) and maximal runs
//! of everything else (separators). Segmentation works on extended grapheme
//! clusters (UAX #29), so Arabic harakat, shadda and other combining marks
//! stay attached to the letter they sit on instead of splitting a word.
//!
//! # Examples
//!
//! ```
//! use hassy::analysis::tokenizer::Tokenizer;
//! use hassy::analysis::tokenizer::letter_run::LetterRunTokenizer;
//!
//! let tokenizer = LetterRunTokenizer::new();
//! let tokens: Vec<_> = tokenizer.tokenize("قالَ: نعم!").unwrap().collect();
//!
//! let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
//! assert_eq!(texts, vec!["قالَ", ": ", "نعم", "!"]);
//! ```

use unicode_segmentation::UnicodeSegmentation;

use crate::analysis::token::{IntoTokenStream, Token, TokenKind, TokenStream};
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

/// A tokenizer that alternates word and separator runs.
///
/// A grapheme belongs to a word when its base character is alphanumeric or
/// an underscore. Digits therefore form (or join) words and pass through the
/// letter rules untouched.
#[derive(Clone, Debug, Default)]
pub struct LetterRunTokenizer;

impl LetterRunTokenizer {
    /// Create a new letter-run tokenizer.
    pub fn new() -> Self {
        LetterRunTokenizer
    }

    /// Cut `text` into tokens.
    pub fn split(&self, text: &str) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut run_start = 0;
        let mut run_kind: Option<TokenKind> = None;

        for (offset, grapheme) in text.grapheme_indices(true) {
            let kind = Self::classify(grapheme);
            match run_kind {
                Some(current) if current == kind => {}
                Some(current) => {
                    Self::push(&mut tokens, text, current, run_start, offset);
                    run_start = offset;
                    run_kind = Some(kind);
                }
                None => run_kind = Some(kind),
            }
        }

        if let Some(current) = run_kind {
            Self::push(&mut tokens, text, current, run_start, text.len());
        }

        tokens
    }

    /// Whether `text` is exactly one word token.
    pub fn is_single_word(&self, text: &str) -> bool {
        matches!(self.split(text).as_slice(), [token] if token.is_word())
    }

    fn classify(grapheme: &str) -> TokenKind {
        match grapheme.chars().next() {
            Some(c) if c.is_alphanumeric() || c == '_' => TokenKind::Word,
            _ => TokenKind::Separator,
        }
    }

    fn push(tokens: &mut Vec<Token>, text: &str, kind: TokenKind, start: usize, end: usize) {
        let position = tokens.len();
        let slice = &text[start..end];
        tokens.push(match kind {
            TokenKind::Word => Token::word(slice, position, start, end),
            TokenKind::Separator => Token::separator(slice, position, start, end),
        });
    }
}

impl Tokenizer for LetterRunTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        Ok(self.split(text).into_token_stream())
    }

    fn name(&self) -> &'static str {
        "letter_run"
    }
}
