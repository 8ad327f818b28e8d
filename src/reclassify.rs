//! Re-tagging of known API identifiers.
//!
//! [`ReclassifyingLexer`] wraps another lexer and rewrites the category of
//! generic `Name` tokens whose text is listed in a [`NameSets`]. Nothing else
//! about the stream changes: same tokens, same order, same positions.

use log::debug;
use std::collections::HashSet;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::lexer::{Lexer, TokenStream};
use crate::token::{Token, TokenKind};

/// Three disjoint sets of identifiers, matched exactly and case-sensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameSets {
    types: HashSet<String>,
    functions: HashSet<String>,
    constants: HashSet<String>,
}

impl NameSets {
    /// Build name sets, rejecting any name listed in more than one set.
    pub fn new<T, F, C>(types: T, functions: F, constants: C) -> Result<Self>
    where
        T: IntoIterator,
        T::Item: Into<String>,
        F: IntoIterator,
        F::Item: Into<String>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        let sets = Self {
            types: types.into_iter().map(Into::into).collect(),
            functions: functions.into_iter().map(Into::into).collect(),
            constants: constants.into_iter().map(Into::into).collect(),
        };
        sets.check_disjoint()?;
        debug!(
            "Built name sets: {} types, {} functions, {} constants",
            sets.types.len(),
            sets.functions.len(),
            sets.constants.len()
        );
        Ok(sets)
    }

    /// Build from static lists already known to be disjoint.
    pub(crate) fn from_lists_unchecked(
        types: &[&str],
        functions: &[&str],
        constants: &[&str],
    ) -> Self {
        let collect = |names: &[&str]| names.iter().map(|name| name.to_string()).collect();
        Self {
            types: collect(types),
            functions: collect(functions),
            constants: collect(constants),
        }
    }

    fn check_disjoint(&self) -> Result<()> {
        let pairs: [(&HashSet<String>, &'static str, &HashSet<String>, &'static str); 3] = [
            (&self.types, "types", &self.functions, "functions"),
            (&self.types, "types", &self.constants, "constants"),
            (&self.functions, "functions", &self.constants, "constants"),
        ];
        for (left, first, right, second) in pairs {
            if let Some(name) = left.intersection(right).min() {
                return Err(Error::OverlappingNames {
                    name: name.clone(),
                    first,
                    second,
                });
            }
        }
        Ok(())
    }

    /// Domain category for `text`, if it is listed.
    pub fn classify(&self, text: &str) -> Option<TokenKind> {
        if self.types.contains(text) {
            Some(TokenKind::DomainType)
        } else if self.functions.contains(text) {
            Some(TokenKind::DomainFunction)
        } else if self.constants.contains(text) {
            Some(TokenKind::DomainConstant)
        } else {
            None
        }
    }

    /// Re-tag a generic `Name` token whose text is listed; return every other
    /// token unchanged.
    pub fn reclassify<'a>(&self, token: Token<'a>) -> Token<'a> {
        if token.kind != TokenKind::Name {
            return token;
        }
        match self.classify(token.text) {
            Some(kind) => token.with_kind(kind),
            None => token,
        }
    }

    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.types.iter().map(String::as_str)
    }

    pub fn functions(&self) -> impl Iterator<Item = &str> {
        self.functions.iter().map(String::as_str)
    }

    pub fn constants(&self) -> impl Iterator<Item = &str> {
        self.constants.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len() + self.functions.len() + self.constants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A lexer that delegates to `inner` and re-tags listed names.
#[derive(Debug, Clone)]
pub struct ReclassifyingLexer<L> {
    name: String,
    inner: L,
    names: Arc<NameSets>,
}

impl<L: Lexer> ReclassifyingLexer<L> {
    pub fn new(name: impl Into<String>, inner: L, names: Arc<NameSets>) -> Self {
        Self {
            name: name.into(),
            inner,
            names,
        }
    }

    pub fn inner(&self) -> &L {
        &self.inner
    }

    pub fn names(&self) -> &NameSets {
        &self.names
    }
}

impl<L: Lexer> Lexer for ReclassifyingLexer<L> {
    fn name(&self) -> &str {
        &self.name
    }

    fn filenames(&self) -> &[&str] {
        self.inner.filenames()
    }

    fn token_kinds(&self) -> Vec<TokenKind> {
        let mut kinds = self.inner.token_kinds();
        if kinds.contains(&TokenKind::Name) {
            kinds.extend([
                TokenKind::DomainType,
                TokenKind::DomainFunction,
                TokenKind::DomainConstant,
            ]);
        }
        kinds
    }

    fn tokens<'t>(&self, text: &'t str) -> TokenStream<'t> {
        let names = Arc::clone(&self.names);
        Box::new(
            self.inner
                .tokens(text)
                .map(move |token| names.reclassify(token)),
        )
    }
}
