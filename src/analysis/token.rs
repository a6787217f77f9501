//! Token types for word/separator segmentation.
//!
//! Normalization works on two kinds of tokens: *words*, which go through
//! variant lookup and letter rules, and *separators* (whitespace,
//! punctuation, symbols), which are carried through verbatim. Tokens keep
//! their byte offsets into the text they were cut from, so a token list
//! always describes the whole input:
//!
//! ```text
//! Input: "قال، الرجل"
//!
//!   [0] Word      "قال"   0..6
//!   [1] Separator "، "    6..9
//!   [2] Word      "الرجل" 9..19
//! ```
//!
//! # Examples
//!
//! ```
//! use hassy::analysis::token::{Token, TokenKind, reassemble};
//!
//! let tokens = vec![
//!     Token::word("كلمة", 0, 0, 8),
//!     Token::separator("!", 1, 8, 9),
//! ];
//! assert_eq!(tokens[0].kind, TokenKind::Word);
//! assert_eq!(reassemble(&tokens), "كلمة!");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of a token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// A maximal run of letter graphemes.
    Word,
    /// A maximal run of everything else.
    Separator,
}

/// A single token cut from an input text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The text content of the token
    pub text: String,

    /// Whether this is a word or a separator
    pub kind: TokenKind,

    /// The position of the token in the token list (0-based)
    pub position: usize,

    /// The byte offset where this token starts in the original text
    pub start_offset: usize,

    /// The byte offset where this token ends in the original text
    pub end_offset: usize,
}

impl Token {
    /// Create a word token.
    pub fn word<S: Into<String>>(
        text: S,
        position: usize,
        start_offset: usize,
        end_offset: usize,
    ) -> Self {
        Token {
            text: text.into(),
            kind: TokenKind::Word,
            position,
            start_offset,
            end_offset,
        }
    }

    /// Create a separator token.
    pub fn separator<S: Into<String>>(
        text: S,
        position: usize,
        start_offset: usize,
        end_offset: usize,
    ) -> Self {
        Token {
            text: text.into(),
            kind: TokenKind::Separator,
            position,
            start_offset,
            end_offset,
        }
    }

    /// Check if this token is a word.
    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }

    /// Get the length of the token text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if the token is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// A token stream represents a sequence of tokens from a tokenizer.
pub type TokenStream = Box<dyn Iterator<Item = Token> + Send>;

/// Trait for types that can produce a token stream.
pub trait IntoTokenStream {
    /// Convert this type into a token stream.
    fn into_token_stream(self) -> TokenStream;
}

impl IntoTokenStream for Vec<Token> {
    fn into_token_stream(self) -> TokenStream {
        Box::new(self.into_iter())
    }
}

/// Concatenate token texts in order.
pub fn reassemble(tokens: &[Token]) -> String {
    let capacity = tokens.iter().map(Token::len).sum();
    let mut out = String::with_capacity(capacity);
    for token in tokens {
        out.push_str(&token.text);
    }
    out
}
