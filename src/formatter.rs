//! Token stream formatters.

use std::fmt::Write as _;
use std::sync::Arc;

use crate::error::Result;
use crate::style::Style;
use crate::token::{Token, TokenKind};

/// Renders a token list to text.
pub trait Formatter: Send + Sync {
    fn format(&self, tokens: &[Token<'_>]) -> Result<String>;

    /// File extension for written output.
    fn extension(&self) -> &str;
}

/// `<div class="highlight"><pre>` markup, one `<span>` per run of tokens
/// sharing a category.
#[derive(Debug, Clone)]
pub struct HtmlFormatter {
    style: Arc<Style>,
    inline_styles: bool,
    css_class: String,
}

impl HtmlFormatter {
    pub fn new(style: Arc<Style>) -> Self {
        Self {
            style,
            inline_styles: false,
            css_class: "highlight".to_string(),
        }
    }

    /// Emit `style="..."` attributes instead of class names.
    pub fn inline_styles(mut self, inline: bool) -> Self {
        self.inline_styles = inline;
        self
    }

    /// Class of the wrapping `<div>`.
    pub fn css_class(mut self, class: impl Into<String>) -> Self {
        self.css_class = class.into();
        self
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Stylesheet matching the class names this formatter emits.
    pub fn stylesheet(&self) -> String {
        self.style.to_css(&format!(".{}", self.css_class))
    }

    fn open_span(&self, kind: TokenKind) -> Option<String> {
        if self.inline_styles {
            let declarations = self.style.resolve(kind).to_css();
            (!declarations.is_empty()).then(|| format!("<span style=\"{}\">", declarations))
        } else {
            let class = kind.css_class();
            (!class.is_empty()).then(|| format!("<span class=\"{}\">", class))
        }
    }
}

impl Formatter for HtmlFormatter {
    fn format(&self, tokens: &[Token<'_>]) -> Result<String> {
        let mut html = String::new();
        if self.inline_styles {
            let _ = write!(
                html,
                "<div class=\"{}\" style=\"background: {}\"><pre>",
                self.css_class,
                self.style.background_color()
            );
        } else {
            let _ = write!(html, "<div class=\"{}\"><pre>", self.css_class);
        }

        for (kind, text) in merge_runs(tokens) {
            let escaped = html_escape::encode_text(&text);
            match self.open_span(kind) {
                Some(open) => {
                    html.push_str(&open);
                    html.push_str(&escaped);
                    html.push_str("</span>");
                }
                None => html.push_str(&escaped),
            }
        }

        html.push_str("</pre></div>\n");
        Ok(html)
    }

    fn extension(&self) -> &str {
        "html"
    }
}

/// Join consecutive tokens of the same category.
fn merge_runs(tokens: &[Token<'_>]) -> Vec<(TokenKind, String)> {
    let mut runs: Vec<(TokenKind, String)> = Vec::new();
    for token in tokens {
        match runs.last_mut() {
            Some((kind, text)) if *kind == token.kind => text.push_str(token.text),
            _ => runs.push((token.kind, token.text.to_string())),
        }
    }
    runs
}

/// One line per token: dotted category, a tab, the quoted text.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawFormatter;

impl Formatter for RawFormatter {
    fn format(&self, tokens: &[Token<'_>]) -> Result<String> {
        let mut out = String::new();
        for token in tokens {
            let _ = writeln!(out, "{}\t{:?}", token.kind, token.text);
        }
        Ok(out)
    }

    fn extension(&self) -> &str {
        "tokens"
    }
}

/// Token list as a JSON array of `{position, kind, text}` objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter {
    pub pretty: bool,
}

impl Formatter for JsonFormatter {
    fn format(&self, tokens: &[Token<'_>]) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(tokens)?
        } else {
            serde_json::to_string(tokens)?
        };
        Ok(json + "\n")
    }

    fn extension(&self) -> &str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfmd;
    use crate::lexer::Lexer;

    fn tokens(code: &str) -> Vec<Token<'_>> {
        cfmd::lexer().tokens(code).collect()
    }

    #[test]
    fn test_html_uses_css_classes() {
        let formatter = HtmlFormatter::new(Arc::new(cfmd::style().unwrap()));
        let html = formatter.format(&tokens("fmd_free(md);")).unwrap();
        assert!(html.starts_with("<div class=\"highlight\"><pre>"));
        assert!(html.contains("<span class=\"df\">fmd_free</span>"));
        assert!(html.contains("<span class=\"n\">md</span>"));
        assert!(html.ends_with("</pre></div>\n"));
    }

    #[test]
    fn test_html_escapes_text() {
        let formatter = HtmlFormatter::new(Arc::new(cfmd::style().unwrap()));
        let html = formatter
            .format(&tokens("#include <fmd.h>\nif (a < b && c) {}"))
            .unwrap();
        assert!(html.contains("&lt;fmd.h&gt;"));
        assert!(html.contains("&amp;"));
        assert!(!html.contains("<fmd.h>"));
    }

    #[test]
    fn test_html_inline_styles() {
        let formatter = HtmlFormatter::new(Arc::new(cfmd::style().unwrap())).inline_styles(true);
        let html = formatter.format(&tokens("fmd_t *md;")).unwrap();
        assert!(html.contains("style=\"background: #fafafa\""));
        assert!(html.contains("<span style=\"color: #0000EE; font-weight: bold\">fmd_t</span>"));
        // Operators, generic names and punctuation are unstyled here.
        assert!(html.contains("</span>*md;</pre>"));
    }

    #[test]
    fn test_adjacent_runs_merge() {
        let runs = merge_runs(&[
            Token::new(0, TokenKind::Punctuation, "("),
            Token::new(1, TokenKind::Punctuation, ")"),
            Token::new(2, TokenKind::Punctuation, ";"),
        ]);
        assert_eq!(runs, vec![(TokenKind::Punctuation, "();".to_string())]);
    }

    #[test]
    fn test_raw_format() {
        let raw = RawFormatter.format(&tokens("fmd_t x")).unwrap();
        assert_eq!(raw, "DomainType\t\"fmd_t\"\nText.Whitespace\t\" \"\nName\t\"x\"\n");
    }

    #[test]
    fn test_json_format() {
        let json = JsonFormatter::default()
            .format(&tokens("FMD_EVENT_TIMER_TICK"))
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["kind"], "DomainConstant");
        assert_eq!(value[0]["position"], 0);
        assert_eq!(value[0]["text"], "FMD_EVENT_TIMER_TICK");
    }
}
