//! Lexers turn source text into a lazy stream of [`Token`]s.
//!
//! Every lexer here is total: any input produces tokens whose texts
//! concatenate back to the input, with unrecognised characters emitted as
//! [`TokenKind::Error`].

mod c;

pub use c::{CLexer, CTokens};

use crate::token::{Token, TokenKind};

/// Boxed token iterator borrowing from the source text.
pub type TokenStream<'a> = Box<dyn Iterator<Item = Token<'a>> + 'a>;

/// A named tokenizer that documentation code blocks can be highlighted with.
pub trait Lexer: Send + Sync {
    /// Primary registration name, e.g. `c` or `cfmd`.
    fn name(&self) -> &str;

    /// Additional names the lexer answers to.
    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// File extensions (without the dot) this lexer handles.
    fn filenames(&self) -> &[&str] {
        &[]
    }

    /// Every category this lexer can emit. Used to check style coverage.
    fn token_kinds(&self) -> Vec<TokenKind>;

    /// Tokenize `text`. Each call starts from a fresh lexing state.
    fn tokens<'t>(&self, text: &'t str) -> TokenStream<'t>;
}

/// Emits the whole input as a single `Text` token.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextLexer;

impl Lexer for TextLexer {
    fn name(&self) -> &str {
        "text"
    }

    fn aliases(&self) -> &[&str] {
        &["none", "plain"]
    }

    fn filenames(&self) -> &[&str] {
        &["txt"]
    }

    fn token_kinds(&self) -> Vec<TokenKind> {
        vec![TokenKind::Text]
    }

    fn tokens<'t>(&self, text: &'t str) -> TokenStream<'t> {
        if text.is_empty() {
            Box::new(std::iter::empty())
        } else {
            Box::new(std::iter::once(Token::new(0, TokenKind::Text, text)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_lexer_single_token() {
        let tokens: Vec<_> = TextLexer.tokens("int x;\nfmd_t y;").collect();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::Text);
        assert_eq!(tokens[0].text, "int x;\nfmd_t y;");
    }

    #[test]
    fn test_text_lexer_empty_input() {
        assert_eq!(TextLexer.tokens("").count(), 0);
    }
}
