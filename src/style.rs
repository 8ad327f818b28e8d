//! Style tables: token category to display directive.
//!
//! Directives use the Pygments notation (`"bold #0000EE"`, `"noitalic"`,
//! `"border:#FF0000"`, `"bg:#ffffff"`). A category without its own entry
//! inherits from its parent; an entry only overrides the attributes it names.

use indexmap::IndexMap;
use log::debug;
use std::fmt::Write as _;

use crate::error::{Error, Result};
use crate::token::TokenKind;

/// One parsed style entry. `None` fields inherit from the parent category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDirective {
    pub color: Option<String>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub bgcolor: Option<String>,
    pub border: Option<String>,
    /// `false` when the entry says `noinherit`.
    pub inherit: bool,
}

impl Default for StyleDirective {
    fn default() -> Self {
        Self {
            color: None,
            bold: None,
            italic: None,
            underline: None,
            bgcolor: None,
            border: None,
            inherit: true,
        }
    }
}

impl StyleDirective {
    /// Parse a definition such as `"noitalic #9C6500"` for `kind`.
    pub fn parse(kind: TokenKind, definition: &str) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidStyleDirective {
            kind,
            directive: definition.to_string(),
            reason,
        };

        let mut directive = Self::default();
        for word in definition.split_whitespace() {
            match word {
                "noinherit" => directive.inherit = false,
                "bold" => directive.bold = Some(true),
                "nobold" => directive.bold = Some(false),
                "italic" => directive.italic = Some(true),
                "noitalic" => directive.italic = Some(false),
                "underline" => directive.underline = Some(true),
                "nounderline" => directive.underline = Some(false),
                // Font family hints carry no colour information.
                "roman" | "sans" | "mono" => {}
                _ => {
                    if let Some(color) = word.strip_prefix("bg:") {
                        directive.bgcolor = parse_optional_color(color).map_err(&invalid)?;
                    } else if let Some(color) = word.strip_prefix("border:") {
                        directive.border = parse_optional_color(color).map_err(&invalid)?;
                    } else if word.starts_with('#') {
                        directive.color = Some(parse_color(word).map_err(&invalid)?);
                    } else {
                        return Err(invalid(format!("unknown attribute '{}'", word)));
                    }
                }
            }
        }
        Ok(directive)
    }
}

fn parse_optional_color(value: &str) -> std::result::Result<Option<String>, String> {
    if value.is_empty() {
        Ok(None)
    } else {
        parse_color(value).map(Some)
    }
}

/// Normalise `#rgb` / `#rrggbb` to `#rrggbb`, keeping the digit case.
fn parse_color(value: &str) -> std::result::Result<String, String> {
    let hex = value
        .strip_prefix('#')
        .ok_or_else(|| format!("colour '{}' must start with '#'", value))?;
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(format!("colour '{}' is not hexadecimal", value));
    }
    match hex.len() {
        6 => Ok(format!("#{}", hex)),
        3 => Ok(hex.chars().fold(String::from("#"), |mut acc, c| {
            acc.push(c);
            acc.push(c);
            acc
        })),
        _ => Err(format!("colour '{}' must have 3 or 6 digits", value)),
    }
}

/// The effective style of a category after inheritance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedStyle {
    pub color: Option<String>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub bgcolor: Option<String>,
    pub border: Option<String>,
}

impl ResolvedStyle {
    fn apply(&mut self, directive: &StyleDirective) {
        if !directive.inherit {
            *self = Self::default();
        }
        if let Some(color) = &directive.color {
            self.color = Some(color.clone());
        }
        if let Some(bold) = directive.bold {
            self.bold = bold;
        }
        if let Some(italic) = directive.italic {
            self.italic = italic;
        }
        if let Some(underline) = directive.underline {
            self.underline = underline;
        }
        if let Some(bgcolor) = &directive.bgcolor {
            self.bgcolor = Some(bgcolor.clone());
        }
        if let Some(border) = &directive.border {
            self.border = Some(border.clone());
        }
    }

    pub fn is_plain(&self) -> bool {
        *self == Self::default()
    }

    /// CSS declarations, e.g. `color: #0000EE; font-weight: bold`.
    pub fn to_css(&self) -> String {
        let mut rules = Vec::new();
        if let Some(color) = &self.color {
            rules.push(format!("color: {}", color));
        }
        if let Some(bgcolor) = &self.bgcolor {
            rules.push(format!("background-color: {}", bgcolor));
        }
        if self.bold {
            rules.push("font-weight: bold".to_string());
        }
        if self.italic {
            rules.push("font-style: italic".to_string());
        }
        if self.underline {
            rules.push("text-decoration: underline".to_string());
        }
        if let Some(border) = &self.border {
            rules.push(format!("border: 1px solid {}", border));
        }
        rules.join("; ")
    }
}

/// Categories a lexer emits that no entry in a style covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleCoverage {
    pub style: String,
    pub missing: Vec<TokenKind>,
}

impl StyleCoverage {
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// A named, immutable-after-construction style table.
#[derive(Debug, Clone)]
pub struct Style {
    name: String,
    background_color: String,
    entries: IndexMap<TokenKind, StyleDirective>,
}

impl Style {
    pub fn new(name: impl Into<String>, background_color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            background_color: background_color.into(),
            entries: IndexMap::new(),
        }
    }

    /// Build a style from `(category, definition)` pairs.
    pub fn from_entries(
        name: impl Into<String>,
        background_color: impl Into<String>,
        entries: &[(TokenKind, &str)],
    ) -> Result<Self> {
        let mut style = Self::new(name, background_color);
        for (kind, definition) in entries {
            style.set(*kind, definition)?;
        }
        debug!(
            "Loaded style '{}' with {} entries",
            style.name,
            style.entries.len()
        );
        Ok(style)
    }

    pub fn set(&mut self, kind: TokenKind, definition: &str) -> Result<()> {
        let directive = StyleDirective::parse(kind, definition)?;
        self.entries.insert(kind, directive);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn background_color(&self) -> &str {
        &self.background_color
    }

    pub fn entry(&self, kind: TokenKind) -> Option<&StyleDirective> {
        self.entries.get(&kind)
    }

    pub fn entries(&self) -> impl Iterator<Item = (TokenKind, &StyleDirective)> {
        self.entries.iter().map(|(kind, directive)| (*kind, directive))
    }

    /// Effective style of `kind`, applying entries from the root down.
    pub fn resolve(&self, kind: TokenKind) -> ResolvedStyle {
        let chain: Vec<TokenKind> = kind.ancestry().collect();
        let mut resolved = ResolvedStyle::default();
        for ancestor in chain.into_iter().rev() {
            if let Some(directive) = self.entries.get(&ancestor) {
                resolved.apply(directive);
            }
        }
        resolved
    }

    /// Whether `kind` or one of its ancestors below the root has an entry.
    pub fn covers(&self, kind: TokenKind) -> bool {
        kind.ancestry()
            .filter(|ancestor| *ancestor != TokenKind::Token)
            .any(|ancestor| self.entries.contains_key(&ancestor))
    }

    /// Report which of `kinds` fall through to the renderer's default.
    pub fn coverage(&self, kinds: &[TokenKind]) -> StyleCoverage {
        let mut missing: Vec<TokenKind> = kinds
            .iter()
            .copied()
            .filter(|kind| *kind != TokenKind::Token && !self.covers(*kind))
            .collect();
        missing.sort();
        missing.dedup();
        StyleCoverage {
            style: self.name.clone(),
            missing,
        }
    }

    /// Stylesheet with one rule per styled category, scoped under `selector`.
    pub fn to_css(&self, selector: &str) -> String {
        let mut css = String::new();
        let _ = writeln!(
            css,
            "{} {{ background: {}; }}",
            selector, self.background_color
        );
        for &kind in TokenKind::ALL {
            let class = kind.css_class();
            if class.is_empty() {
                continue;
            }
            let declarations = self.resolve(kind).to_css();
            if declarations.is_empty() {
                continue;
            }
            let _ = writeln!(
                css,
                "{} .{} {{ {} }} /* {} */",
                selector, class, declarations, kind
            );
        }
        css
    }
}

/// Pygments' `default` style.
pub fn default_style() -> Result<Style> {
    Style::from_entries(
        "default",
        "#f8f8f8",
        &[
            (TokenKind::Whitespace, "#bbbbbb"),
            (TokenKind::Comment, "italic #3D7B7B"),
            (TokenKind::CommentPreproc, "noitalic #9C6500"),
            (TokenKind::Keyword, "bold #008000"),
            (TokenKind::KeywordPseudo, "nobold"),
            (TokenKind::KeywordType, "nobold #B00040"),
            (TokenKind::Operator, "#666666"),
            (TokenKind::OperatorWord, "bold #AA22FF"),
            (TokenKind::NameBuiltin, "#008000"),
            (TokenKind::NameFunction, "#0000FF"),
            (TokenKind::NameClass, "bold #0000FF"),
            (TokenKind::NameNamespace, "bold #0000FF"),
            (TokenKind::NameException, "bold #CB3F38"),
            (TokenKind::NameVariable, "#19177C"),
            (TokenKind::NameConstant, "#880000"),
            (TokenKind::NameLabel, "#767600"),
            (TokenKind::NameEntity, "bold #717171"),
            (TokenKind::NameAttribute, "#687822"),
            (TokenKind::NameTag, "bold #008000"),
            (TokenKind::NameDecorator, "#AA22FF"),
            (TokenKind::String, "#BA2121"),
            (TokenKind::StringEscape, "bold #AA5D1F"),
            (TokenKind::Number, "#666666"),
            (TokenKind::GenericHeading, "bold #000080"),
            (TokenKind::GenericSubheading, "bold #800080"),
            (TokenKind::GenericDeleted, "#A00000"),
            (TokenKind::GenericInserted, "#008400"),
            (TokenKind::GenericError, "#E40000"),
            (TokenKind::GenericEmph, "italic"),
            (TokenKind::GenericStrong, "bold"),
            (TokenKind::GenericEmphStrong, "bold italic"),
            (TokenKind::GenericPrompt, "bold #000080"),
            (TokenKind::GenericOutput, "#717171"),
            (TokenKind::GenericTraceback, "#04D"),
            (TokenKind::Error, "border:#FF0000"),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_directive() {
        let directive = StyleDirective::parse(TokenKind::Keyword, "bold #F000F0").unwrap();
        assert_eq!(directive.color.as_deref(), Some("#F000F0"));
        assert_eq!(directive.bold, Some(true));
        assert_eq!(directive.italic, None);

        let directive = StyleDirective::parse(TokenKind::Error, "border:#FF0000").unwrap();
        assert_eq!(directive.border.as_deref(), Some("#FF0000"));
        assert_eq!(directive.color, None);

        let directive = StyleDirective::parse(TokenKind::Operator, "").unwrap();
        assert_eq!(directive, StyleDirective::default());
    }

    #[test]
    fn test_short_hex_expands() {
        let directive = StyleDirective::parse(TokenKind::GenericTraceback, "#04D").unwrap();
        assert_eq!(directive.color.as_deref(), Some("#0044DD"));
    }

    #[test]
    fn test_invalid_directives() {
        assert!(StyleDirective::parse(TokenKind::Name, "blink").is_err());
        assert!(StyleDirective::parse(TokenKind::Name, "#12345").is_err());
        assert!(StyleDirective::parse(TokenKind::Name, "#GGGGGG").is_err());
        assert!(StyleDirective::parse(TokenKind::Name, "bg:red").is_err());
    }

    #[test]
    fn test_child_inherits_unset_attributes() {
        let style = Style::from_entries(
            "test",
            "#ffffff",
            &[
                (TokenKind::Keyword, "bold #F000F0"),
                (TokenKind::KeywordPseudo, "nobold"),
                (TokenKind::KeywordType, "nobold #0000FF"),
            ],
        )
        .unwrap();

        let pseudo = style.resolve(TokenKind::KeywordPseudo);
        assert_eq!(pseudo.color.as_deref(), Some("#F000F0"));
        assert!(!pseudo.bold);

        let ty = style.resolve(TokenKind::KeywordType);
        assert_eq!(ty.color.as_deref(), Some("#0000FF"));
        assert!(!ty.bold);

        let reserved = style.resolve(TokenKind::KeywordReserved);
        assert_eq!(reserved.color.as_deref(), Some("#F000F0"));
        assert!(reserved.bold);
    }

    #[test]
    fn test_noinherit_resets() {
        let style = Style::from_entries(
            "test",
            "#ffffff",
            &[
                (TokenKind::Comment, "italic #3D7B7B"),
                (TokenKind::CommentSpecial, "noinherit underline"),
            ],
        )
        .unwrap();
        let special = style.resolve(TokenKind::CommentSpecial);
        assert_eq!(special.color, None);
        assert!(!special.italic);
        assert!(special.underline);
    }

    #[test]
    fn test_coverage_reports_uncovered_kinds() {
        let style =
            Style::from_entries("test", "#ffffff", &[(TokenKind::Keyword, "bold")]).unwrap();
        let coverage = style.coverage(&[
            TokenKind::KeywordType,
            TokenKind::Name,
            TokenKind::Token,
            TokenKind::Name,
        ]);
        assert_eq!(coverage.missing, vec![TokenKind::Name]);
        assert!(!coverage.is_complete());
    }

    #[test]
    fn test_css_output() {
        let style = Style::from_entries(
            "test",
            "#fafafa",
            &[
                (TokenKind::DomainType, "bold #0000EE"),
                (TokenKind::Operator, ""),
            ],
        )
        .unwrap();
        let css = style.to_css(".highlight");
        assert!(css.starts_with(".highlight { background: #fafafa; }\n"));
        assert!(css.contains(".highlight .dt { color: #0000EE; font-weight: bold } /* DomainType */"));
        assert!(!css.contains(".highlight .o "));
    }

    #[test]
    fn test_default_style_parses() {
        let style = default_style().unwrap();
        assert_eq!(style.name(), "default");
        assert!(style.resolve(TokenKind::CommentSingle).italic);
        assert!(!style.resolve(TokenKind::CommentPreproc).italic);
    }
}
