//! C lexer.
//!
//! Categories follow Pygments' C lexer so that stylesheets written for it
//! apply unchanged. Function names are only tagged `Name.Function` where
//! they are declared (top level, after a type); call sites stay `Name`.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

use super::{Lexer, TokenStream};
use crate::token::{Token, TokenKind};

lazy_static! {
    static ref WHITESPACE: Regex = Regex::new(r"^[ \t\r\n\x0B\x0C]+").unwrap();
    static ref INLINE_SPACE: Regex = Regex::new(r"^[ \t]+").unwrap();
    static ref LINE_CONTINUATION: Regex = Regex::new(r"^\\\r?\n").unwrap();
    static ref LINE_COMMENT: Regex = Regex::new(r"^//[^\r\n]*").unwrap();
    static ref BLOCK_COMMENT: Regex = Regex::new(r"(?s)^/\*.*?(?:\*/|\z)").unwrap();
    static ref PREPROC_DIRECTIVE: Regex = Regex::new(r"^#[ \t]*([A-Za-z_][A-Za-z0-9_]*)?").unwrap();
    static ref PREPROC_RUN: Regex = Regex::new(r"^[^\r\n\\/]+").unwrap();
    static ref IF0_START: Regex = Regex::new(r"^#[ \t]*if[ \t]+0\b").unwrap();
    static ref IF0_NESTED: Regex = Regex::new(r"^[ \t]*#[ \t]*if").unwrap();
    static ref IF0_ELSE: Regex = Regex::new(r"^[ \t]*#[ \t]*el(?:se|if)\b").unwrap();
    static ref IF0_END: Regex = Regex::new(r"^[ \t]*#[ \t]*endif\b").unwrap();
    static ref INCLUDE_FILE: Regex = Regex::new(r#"^(?:<[^>\r\n]*>|"[^"\r\n]*")"#).unwrap();
    static ref STRING: Regex = Regex::new(r#"^(?:u8|[LuU])?"(?:[^"\\\r\n]|\\(?s:.))*"?"#).unwrap();
    static ref CHAR: Regex = Regex::new(r"^(?:u8|[LuU])?'(?:[^'\\\r\n]|\\(?s:.))+'").unwrap();
    static ref HEX: Regex = Regex::new(r"^0[xX][0-9a-fA-F]+[uUlL]*").unwrap();
    static ref BIN: Regex = Regex::new(r"^0[bB][01]+[uUlL]*").unwrap();
    static ref FLOAT: Regex = Regex::new(
        r"^(?:\d+\.\d*(?:[eE][+-]?\d+)?|\.\d+(?:[eE][+-]?\d+)?|\d+[eE][+-]?\d+)[fFlL]?"
    )
    .unwrap();
    static ref OCT: Regex = Regex::new(r"^0[0-7]+[uUlL]*").unwrap();
    static ref INTEGER: Regex = Regex::new(r"^\d+[uUlL]*").unwrap();
    static ref IDENT: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*").unwrap();
    static ref CALL_PAREN: Regex = Regex::new(r"^\s*\(").unwrap();
    static ref LABEL_COLON: Regex = Regex::new(r"^[ \t]*:(?:[^:]|\z)").unwrap();

    static ref KEYWORDS: HashSet<&'static str> = [
        "asm", "auto", "break", "case", "const", "continue", "default", "do", "else", "enum",
        "extern", "for", "goto", "if", "inline", "register", "restrict", "return", "sizeof",
        "struct", "static", "switch", "typedef", "volatile", "while", "union", "thread_local",
        "alignas", "alignof", "static_assert", "_Pragma", "_Alignas", "_Alignof", "_Noreturn",
        "_Generic", "_Thread_local", "_Static_assert", "_Imaginary", "noreturn", "imaginary",
        "complex",
    ]
    .into_iter()
    .collect();

    static ref TYPES: HashSet<&'static str> = [
        "bool", "int", "long", "float", "short", "double", "char", "unsigned", "signed", "void",
        "_Bool", "_Complex", "_Atomic",
        // stdlib
        "size_t", "ssize_t", "off_t", "wchar_t", "ptrdiff_t", "sig_atomic_t", "fpos_t",
        "clock_t", "time_t", "va_list", "jmp_buf", "FILE", "DIR", "div_t", "ldiv_t",
        "mbstate_t", "wctrans_t", "wint_t", "wctype_t",
        // c99
        "int8_t", "int16_t", "int32_t", "int64_t", "uint8_t", "uint16_t", "uint32_t",
        "uint64_t", "int_least8_t", "int_least16_t", "int_least32_t", "int_least64_t",
        "uint_least8_t", "uint_least16_t", "uint_least32_t", "uint_least64_t",
        "int_fast8_t", "int_fast16_t", "int_fast32_t", "int_fast64_t", "uint_fast8_t",
        "uint_fast16_t", "uint_fast32_t", "uint_fast64_t", "intptr_t", "uintptr_t",
        "intmax_t", "uintmax_t",
        // posix
        "clockid_t", "cpu_set_t", "cpumask_t", "dev_t", "gid_t", "id_t", "ino_t", "key_t",
        "mode_t", "nfds_t", "pid_t", "rlim_t", "sig_t", "sighandler_t", "siginfo_t",
        "sigset_t", "sigval_t", "socklen_t", "timer_t", "uid_t",
    ]
    .into_iter()
    .collect();

    static ref RESERVED: HashSet<&'static str> = [
        "__asm", "__based", "__cdecl", "__declspec", "__except", "__fastcall", "__finally",
        "__inline", "__int8", "__int16", "__int32", "__int64", "__leave", "__stdcall", "__try",
        "__wchar_t",
    ]
    .into_iter()
    .collect();

    static ref BUILTINS: HashSet<&'static str> = ["true", "false", "NULL"].into_iter().collect();

    /// Keywords that may precede a declared function name.
    static ref DECL_SPECIFIERS: HashSet<&'static str> = [
        "static", "extern", "inline", "const", "volatile", "register", "restrict",
        "_Noreturn", "noreturn", "struct", "enum", "union",
    ]
    .into_iter()
    .collect();
}

const KINDS: &[TokenKind] = &[
    TokenKind::Whitespace,
    TokenKind::Text,
    TokenKind::Comment,
    TokenKind::CommentSingle,
    TokenKind::CommentMultiline,
    TokenKind::CommentPreproc,
    TokenKind::CommentPreprocFile,
    TokenKind::String,
    TokenKind::StringChar,
    TokenKind::NumberHex,
    TokenKind::NumberBin,
    TokenKind::NumberOct,
    TokenKind::NumberFloat,
    TokenKind::NumberInteger,
    TokenKind::Keyword,
    TokenKind::KeywordType,
    TokenKind::KeywordReserved,
    TokenKind::NameBuiltin,
    TokenKind::NameFunction,
    TokenKind::NameLabel,
    TokenKind::Name,
    TokenKind::Operator,
    TokenKind::Punctuation,
    TokenKind::Error,
];

/// Lexer for C source.
#[derive(Debug, Clone, Copy, Default)]
pub struct CLexer;

impl CLexer {
    pub fn new() -> Self {
        Self
    }

    /// Concrete iterator, for callers that want to avoid the boxed stream.
    pub fn scan<'a>(&self, text: &'a str) -> CTokens<'a> {
        CTokens::new(text)
    }
}

impl Lexer for CLexer {
    fn name(&self) -> &str {
        "c"
    }

    fn filenames(&self) -> &[&str] {
        &["c", "h", "idc"]
    }

    fn token_kinds(&self) -> Vec<TokenKind> {
        KINDS.to_vec()
    }

    fn tokens<'t>(&self, text: &'t str) -> TokenStream<'t> {
        Box::new(self.scan(text))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Code,
    /// After `#include`, expecting `<file>` or `"file"`.
    IncludeOperand,
    /// Rest of a preprocessor line.
    PreprocBody,
    /// Disabled by `#if 0`, with the current `#if` nesting depth.
    If0(usize),
}

/// Lazy token stream over one C source string.
#[derive(Debug, Clone)]
pub struct CTokens<'a> {
    text: &'a str,
    pos: usize,
    mode: Mode,
    /// Only whitespace seen since the last newline.
    line_start: bool,
    brace_depth: usize,
    paren_depth: usize,
    /// The previous significant token can precede a declarator name.
    after_declarator: bool,
    /// An operator other than `*` or `&` has appeared in this statement.
    in_expression: bool,
}

impl<'a> CTokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            mode: Mode::Code,
            line_start: true,
            brace_depth: 0,
            paren_depth: 0,
            after_declarator: false,
            in_expression: false,
        }
    }

    fn scan_code(&mut self, rest: &str) -> (TokenKind, usize) {
        if let Some(m) = WHITESPACE.find(rest) {
            return (TokenKind::Whitespace, m.end());
        }
        if let Some(m) = LINE_CONTINUATION.find(rest) {
            return (TokenKind::Text, m.end());
        }
        if let Some(m) = LINE_COMMENT.find(rest) {
            return (TokenKind::CommentSingle, m.end());
        }
        if let Some(m) = BLOCK_COMMENT.find(rest) {
            return (TokenKind::CommentMultiline, m.end());
        }
        if self.line_start {
            if let Some(m) = IF0_START.find(rest) {
                self.mode = Mode::If0(1);
                return (TokenKind::CommentPreproc, m.end());
            }
            if let Some(caps) = PREPROC_DIRECTIVE.captures(rest) {
                self.mode = match caps.get(1).map(|m| m.as_str()) {
                    Some("include") | Some("include_next") | Some("import") => {
                        Mode::IncludeOperand
                    }
                    _ => Mode::PreprocBody,
                };
                return (TokenKind::CommentPreproc, caps[0].len());
            }
        }
        if let Some(m) = STRING.find(rest) {
            return (TokenKind::String, m.end());
        }
        if let Some(m) = CHAR.find(rest) {
            return (TokenKind::StringChar, m.end());
        }

        let numbers: [(&Regex, TokenKind); 5] = [
            (&*HEX, TokenKind::NumberHex),
            (&*BIN, TokenKind::NumberBin),
            (&*FLOAT, TokenKind::NumberFloat),
            (&*OCT, TokenKind::NumberOct),
            (&*INTEGER, TokenKind::NumberInteger),
        ];
        for (pattern, kind) in numbers {
            if let Some(m) = pattern.find(rest) {
                return (kind, m.end());
            }
        }

        if let Some(m) = IDENT.find(rest) {
            let word = m.as_str();
            return (self.classify_identifier(word, &rest[m.end()..]), m.end());
        }

        let c = rest.chars().next().unwrap_or('\0');
        let kind = match c {
            '~' | '!' | '%' | '^' | '&' | '*' | '+' | '=' | '|' | '?' | ':' | '<' | '>' | '/'
            | '-' => TokenKind::Operator,
            '(' | ')' | '[' | ']' | '{' | '}' | ',' | ';' | '.' => TokenKind::Punctuation,
            _ => TokenKind::Error,
        };
        (kind, c.len_utf8())
    }

    fn classify_identifier(&self, word: &str, after: &str) -> TokenKind {
        if KEYWORDS.contains(word) {
            TokenKind::Keyword
        } else if TYPES.contains(word) {
            TokenKind::KeywordType
        } else if RESERVED.contains(word) {
            TokenKind::KeywordReserved
        } else if BUILTINS.contains(word) {
            TokenKind::NameBuiltin
        } else if self.brace_depth == 0
            && self.paren_depth == 0
            && self.after_declarator
            && !self.in_expression
            && CALL_PAREN.is_match(after)
        {
            TokenKind::NameFunction
        } else if self.brace_depth > 0 && self.line_start && LABEL_COLON.is_match(after) {
            TokenKind::NameLabel
        } else {
            TokenKind::Name
        }
    }

    /// `None` means the mode changed without consuming input.
    fn scan_include(&mut self, rest: &str) -> Option<(TokenKind, usize)> {
        if let Some(m) = INLINE_SPACE.find(rest) {
            return Some((TokenKind::Whitespace, m.end()));
        }
        self.mode = Mode::PreprocBody;
        INCLUDE_FILE
            .find(rest)
            .map(|m| (TokenKind::CommentPreprocFile, m.end()))
    }

    /// One line of a disabled block. The directive that ends the block is
    /// emitted without its newline so the next line starts in code.
    fn scan_if0(&mut self, rest: &str, depth: usize) -> (TokenKind, usize) {
        let line_len = rest.find('\n').map_or(rest.len(), |i| i + 1);
        let line = &rest[..line_len];

        let closes = IF0_END.is_match(line) || (depth == 1 && IF0_ELSE.is_match(line));
        if closes {
            if depth == 1 {
                self.mode = Mode::Code;
                let directive = line.trim_end_matches(|c| c == '\r' || c == '\n');
                return (TokenKind::CommentPreproc, directive.len());
            }
            self.mode = Mode::If0(depth - 1);
            return (TokenKind::CommentPreproc, line_len);
        }
        if IF0_NESTED.is_match(line) {
            self.mode = Mode::If0(depth + 1);
            return (TokenKind::CommentPreproc, line_len);
        }
        (TokenKind::Comment, line_len)
    }

    fn scan_preproc(&mut self, rest: &str) -> Option<(TokenKind, usize)> {
        if rest.starts_with('\n') || rest.starts_with('\r') {
            self.mode = Mode::Code;
            return None;
        }
        if let Some(m) = LINE_CONTINUATION.find(rest) {
            return Some((TokenKind::Text, m.end()));
        }
        if let Some(m) = LINE_COMMENT.find(rest) {
            return Some((TokenKind::CommentSingle, m.end()));
        }
        if let Some(m) = BLOCK_COMMENT.find(rest) {
            return Some((TokenKind::CommentMultiline, m.end()));
        }
        if let Some(m) = PREPROC_RUN.find(rest) {
            return Some((TokenKind::CommentPreproc, m.end()));
        }
        // A lone '/' or '\' that starts neither a comment nor a continuation.
        Some((TokenKind::CommentPreproc, 1))
    }

    fn update_state(&mut self, token: &Token<'a>) {
        match token.kind {
            TokenKind::Whitespace => {
                if token.text.contains('\n') {
                    self.line_start = true;
                }
                return;
            }
            TokenKind::Text => return,
            TokenKind::CommentSingle | TokenKind::CommentMultiline => {
                self.line_start = false;
                return;
            }
            _ => {}
        }
        self.line_start = false;

        match (token.kind, token.text) {
            (TokenKind::Punctuation, "{") => self.brace_depth += 1,
            (TokenKind::Punctuation, "}") => self.brace_depth = self.brace_depth.saturating_sub(1),
            (TokenKind::Punctuation, "(") => self.paren_depth += 1,
            (TokenKind::Punctuation, ")") => self.paren_depth = self.paren_depth.saturating_sub(1),
            _ => {}
        }

        match (token.kind, token.text) {
            (TokenKind::Punctuation, ";" | "{" | "}") => self.in_expression = false,
            (TokenKind::Operator, "*" | "&") => {}
            (TokenKind::Operator, _) => self.in_expression = true,
            _ => {}
        }

        self.after_declarator = match token.kind {
            TokenKind::Name | TokenKind::KeywordType | TokenKind::KeywordReserved => true,
            TokenKind::Keyword => DECL_SPECIFIERS.contains(token.text),
            TokenKind::Operator => token.text == "*",
            _ => false,
        };
    }
}

impl<'a> Iterator for CTokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        let text = self.text;
        while self.pos < text.len() {
            let rest = &text[self.pos..];
            let scanned = match self.mode {
                Mode::Code => Some(self.scan_code(rest)),
                Mode::IncludeOperand => self.scan_include(rest),
                Mode::PreprocBody => self.scan_preproc(rest),
                Mode::If0(depth) => Some(self.scan_if0(rest, depth)),
            };
            let Some((kind, len)) = scanned else {
                continue;
            };
            let token = Token::new(self.pos, kind, &rest[..len]);
            self.pos += len;
            self.update_state(&token);
            return Some(token);
        }
        None
    }
}
