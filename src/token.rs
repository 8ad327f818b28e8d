//! Token categories and the token triple produced by every lexer.
//!
//! Categories form a tree rooted at [`TokenKind::Token`]. A style entry on a
//! parent applies to all of its children unless a child overrides it, so
//! `Keyword.Type` inherits whatever `Keyword` sets.

use serde::{Serialize, Serializer};
use std::fmt;

/// Token category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TokenKind {
    Token,
    Text,
    Whitespace,
    Escape,
    Error,
    Other,

    Keyword,
    KeywordConstant,
    KeywordDeclaration,
    KeywordNamespace,
    KeywordPseudo,
    KeywordReserved,
    KeywordType,

    Name,
    NameAttribute,
    NameBuiltin,
    NameBuiltinPseudo,
    NameClass,
    NameConstant,
    NameDecorator,
    NameEntity,
    NameException,
    NameFunction,
    NameLabel,
    NameNamespace,
    NameTag,
    NameVariable,

    String,
    StringAffix,
    StringChar,
    StringEscape,

    Number,
    NumberBin,
    NumberFloat,
    NumberHex,
    NumberInteger,
    NumberOct,

    Operator,
    OperatorWord,

    Punctuation,

    Comment,
    CommentMultiline,
    CommentPreproc,
    CommentPreprocFile,
    CommentSingle,
    CommentSpecial,

    Generic,
    GenericDeleted,
    GenericEmph,
    GenericEmphStrong,
    GenericError,
    GenericHeading,
    GenericInserted,
    GenericOutput,
    GenericPrompt,
    GenericStrong,
    GenericSubheading,
    GenericTraceback,

    /// A listed domain type name, e.g. `fmd_handle_t`.
    DomainType,
    /// A listed domain function name, e.g. `fmd_create`.
    DomainFunction,
    /// A listed domain constant, e.g. `FMD_EVENT_TIMER_TICK`.
    DomainConstant,
}

impl TokenKind {
    pub const ALL: &'static [TokenKind] = &[
        Self::Token,
        Self::Text,
        Self::Whitespace,
        Self::Escape,
        Self::Error,
        Self::Other,
        Self::Keyword,
        Self::KeywordConstant,
        Self::KeywordDeclaration,
        Self::KeywordNamespace,
        Self::KeywordPseudo,
        Self::KeywordReserved,
        Self::KeywordType,
        Self::Name,
        Self::NameAttribute,
        Self::NameBuiltin,
        Self::NameBuiltinPseudo,
        Self::NameClass,
        Self::NameConstant,
        Self::NameDecorator,
        Self::NameEntity,
        Self::NameException,
        Self::NameFunction,
        Self::NameLabel,
        Self::NameNamespace,
        Self::NameTag,
        Self::NameVariable,
        Self::String,
        Self::StringAffix,
        Self::StringChar,
        Self::StringEscape,
        Self::Number,
        Self::NumberBin,
        Self::NumberFloat,
        Self::NumberHex,
        Self::NumberInteger,
        Self::NumberOct,
        Self::Operator,
        Self::OperatorWord,
        Self::Punctuation,
        Self::Comment,
        Self::CommentMultiline,
        Self::CommentPreproc,
        Self::CommentPreprocFile,
        Self::CommentSingle,
        Self::CommentSpecial,
        Self::Generic,
        Self::GenericDeleted,
        Self::GenericEmph,
        Self::GenericEmphStrong,
        Self::GenericError,
        Self::GenericHeading,
        Self::GenericInserted,
        Self::GenericOutput,
        Self::GenericPrompt,
        Self::GenericStrong,
        Self::GenericSubheading,
        Self::GenericTraceback,
        Self::DomainType,
        Self::DomainFunction,
        Self::DomainConstant,
    ];

    /// Dotted name, parent and short CSS class.
    fn info(self) -> (&'static str, Option<TokenKind>, &'static str) {
        match self {
            Self::Token => ("Token", None, ""),
            Self::Text => ("Text", Some(Self::Token), ""),
            Self::Whitespace => ("Text.Whitespace", Some(Self::Text), "w"),
            Self::Escape => ("Escape", Some(Self::Token), "esc"),
            Self::Error => ("Error", Some(Self::Token), "err"),
            Self::Other => ("Other", Some(Self::Token), "x"),

            Self::Keyword => ("Keyword", Some(Self::Token), "k"),
            Self::KeywordConstant => ("Keyword.Constant", Some(Self::Keyword), "kc"),
            Self::KeywordDeclaration => ("Keyword.Declaration", Some(Self::Keyword), "kd"),
            Self::KeywordNamespace => ("Keyword.Namespace", Some(Self::Keyword), "kn"),
            Self::KeywordPseudo => ("Keyword.Pseudo", Some(Self::Keyword), "kp"),
            Self::KeywordReserved => ("Keyword.Reserved", Some(Self::Keyword), "kr"),
            Self::KeywordType => ("Keyword.Type", Some(Self::Keyword), "kt"),

            Self::Name => ("Name", Some(Self::Token), "n"),
            Self::NameAttribute => ("Name.Attribute", Some(Self::Name), "na"),
            Self::NameBuiltin => ("Name.Builtin", Some(Self::Name), "nb"),
            Self::NameBuiltinPseudo => ("Name.Builtin.Pseudo", Some(Self::NameBuiltin), "bp"),
            Self::NameClass => ("Name.Class", Some(Self::Name), "nc"),
            Self::NameConstant => ("Name.Constant", Some(Self::Name), "no"),
            Self::NameDecorator => ("Name.Decorator", Some(Self::Name), "nd"),
            Self::NameEntity => ("Name.Entity", Some(Self::Name), "ni"),
            Self::NameException => ("Name.Exception", Some(Self::Name), "ne"),
            Self::NameFunction => ("Name.Function", Some(Self::Name), "nf"),
            Self::NameLabel => ("Name.Label", Some(Self::Name), "nl"),
            Self::NameNamespace => ("Name.Namespace", Some(Self::Name), "nn"),
            Self::NameTag => ("Name.Tag", Some(Self::Name), "nt"),
            Self::NameVariable => ("Name.Variable", Some(Self::Name), "nv"),

            Self::String => ("Literal.String", Some(Self::Token), "s"),
            Self::StringAffix => ("Literal.String.Affix", Some(Self::String), "sa"),
            Self::StringChar => ("Literal.String.Char", Some(Self::String), "sc"),
            Self::StringEscape => ("Literal.String.Escape", Some(Self::String), "se"),

            Self::Number => ("Literal.Number", Some(Self::Token), "m"),
            Self::NumberBin => ("Literal.Number.Bin", Some(Self::Number), "mb"),
            Self::NumberFloat => ("Literal.Number.Float", Some(Self::Number), "mf"),
            Self::NumberHex => ("Literal.Number.Hex", Some(Self::Number), "mh"),
            Self::NumberInteger => ("Literal.Number.Integer", Some(Self::Number), "mi"),
            Self::NumberOct => ("Literal.Number.Oct", Some(Self::Number), "mo"),

            Self::Operator => ("Operator", Some(Self::Token), "o"),
            Self::OperatorWord => ("Operator.Word", Some(Self::Operator), "ow"),

            Self::Punctuation => ("Punctuation", Some(Self::Token), "p"),

            Self::Comment => ("Comment", Some(Self::Token), "c"),
            Self::CommentMultiline => ("Comment.Multiline", Some(Self::Comment), "cm"),
            Self::CommentPreproc => ("Comment.Preproc", Some(Self::Comment), "cp"),
            Self::CommentPreprocFile => ("Comment.PreprocFile", Some(Self::Comment), "cpf"),
            Self::CommentSingle => ("Comment.Single", Some(Self::Comment), "c1"),
            Self::CommentSpecial => ("Comment.Special", Some(Self::Comment), "cs"),

            Self::Generic => ("Generic", Some(Self::Token), "g"),
            Self::GenericDeleted => ("Generic.Deleted", Some(Self::Generic), "gd"),
            Self::GenericEmph => ("Generic.Emph", Some(Self::Generic), "ge"),
            Self::GenericEmphStrong => ("Generic.EmphStrong", Some(Self::Generic), "ges"),
            Self::GenericError => ("Generic.Error", Some(Self::Generic), "gr"),
            Self::GenericHeading => ("Generic.Heading", Some(Self::Generic), "gh"),
            Self::GenericInserted => ("Generic.Inserted", Some(Self::Generic), "gi"),
            Self::GenericOutput => ("Generic.Output", Some(Self::Generic), "go"),
            Self::GenericPrompt => ("Generic.Prompt", Some(Self::Generic), "gp"),
            Self::GenericStrong => ("Generic.Strong", Some(Self::Generic), "gs"),
            Self::GenericSubheading => ("Generic.Subheading", Some(Self::Generic), "gu"),
            Self::GenericTraceback => ("Generic.Traceback", Some(Self::Generic), "gt"),

            Self::DomainType => ("DomainType", Some(Self::Token), "dt"),
            Self::DomainFunction => ("DomainFunction", Some(Self::Token), "df"),
            Self::DomainConstant => ("DomainConstant", Some(Self::Token), "dc"),
        }
    }

    /// Dotted category name, e.g. `Keyword.Type`.
    pub fn name(self) -> &'static str {
        self.info().0
    }

    pub fn parent(self) -> Option<TokenKind> {
        self.info().1
    }

    /// Short CSS class used by the HTML formatter. Empty for plain text.
    pub fn css_class(self) -> &'static str {
        self.info().2
    }

    /// This kind followed by its ancestors up to the root.
    pub fn ancestry(self) -> impl Iterator<Item = TokenKind> {
        std::iter::successors(Some(self), |kind| kind.parent())
    }

    /// Whether `self` equals `other` or descends from it.
    pub fn is_within(self, other: TokenKind) -> bool {
        self.ancestry().any(|kind| kind == other)
    }

    /// Parse a dotted name. Accepts the `Token.` prefix and the short forms
    /// `String`, `Number` and `Whitespace` for the literal categories.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.strip_prefix("Token.").unwrap_or(name);
        let canonical = match name.split('.').next() {
            Some("String") | Some("Number") => format!("Literal.{}", name),
            Some("Whitespace") => format!("Text.{}", name),
            _ => name.to_string(),
        };
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == canonical)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for TokenKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// A `(position, category, text)` triple.
///
/// `position` is the byte offset of `text` in the lexed source. Only the
/// category may change once a token has been produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'a> {
    pub position: usize,
    pub kind: TokenKind,
    pub text: &'a str,
}

impl<'a> Token<'a> {
    pub fn new(position: usize, kind: TokenKind, text: &'a str) -> Self {
        Self {
            position,
            kind,
            text,
        }
    }

    /// Same position and text under a different category.
    pub fn with_kind(self, kind: TokenKind) -> Self {
        Self { kind, ..self }
    }

    /// Byte offset one past the end of the token.
    pub fn end(&self) -> usize {
        self.position + self.text.len()
    }
}
