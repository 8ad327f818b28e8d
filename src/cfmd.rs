//! The `cfmd` extension: C highlighting that knows the FMD API.
//!
//! Registers a lexer that re-tags FMD types, functions and constants on top
//! of the C lexer, and the `cfmd.CFMDStyle` style that colours them.

use lazy_static::lazy_static;
use std::sync::Arc;

use crate::error::Result;
use crate::extensions::{App, Extension};
use crate::lexer::CLexer;
use crate::reclassify::{NameSets, ReclassifyingLexer};
use crate::style::Style;
use crate::token::TokenKind;

pub const LEXER_NAME: &str = "cfmd";
pub const STYLE_NAME: &str = "cfmd.CFMDStyle";

pub const FMD_TYPES: &[&str] = &[
    "fmd_handle_t",
    "fmd_t",
    "fmd_event_t",
    "fmd_params_t",
    "fmd_event_params_timer_tick_t",
    "fmd_real_t",
    "fmd_string_t",
];

pub const FMD_FUNCTIONS: &[&str] = &[
    "fmd_create",
    "fmd_setEventHandler",
    "fmd_io_printf",
    "fmd_dync_getTime",
    "fmd_matt_getTemperature",
    "fmd_matt_getTotalEnergy",
    "fmd_matt_saveConfiguration",
    "fmd_timer_makeSimple",
    "fmd_box_setSize",
    "fmd_box_setPBC",
    "fmd_box_setSubdomains",
    "fmd_matt_setAtomKinds",
    "fmd_pot_lj_apply",
    "fmd_matt_makeCuboidFCC",
    "fmd_dync_equilibrate",
    "fmd_io_saveState",
    "fmd_proc_getWallTime",
    "fmd_free",
];

pub const FMD_CONSTANTS: &[&str] = &["FMD_EVENT_TIMER_TICK"];

lazy_static! {
    static ref FMD_NAMES: Arc<NameSets> = Arc::new(NameSets::from_lists_unchecked(
        FMD_TYPES,
        FMD_FUNCTIONS,
        FMD_CONSTANTS
    ));
}

/// The shared FMD name sets.
pub fn fmd_names() -> Arc<NameSets> {
    Arc::clone(&FMD_NAMES)
}

/// C lexer with FMD names re-tagged.
pub fn lexer() -> ReclassifyingLexer<CLexer> {
    ReclassifyingLexer::new(LEXER_NAME, CLexer::new(), fmd_names())
}

/// `cfmd.CFMDStyle`: Pygments' default palette plus the FMD categories.
pub fn style() -> Result<Style> {
    Style::from_entries(
        STYLE_NAME,
        "#fafafa",
        &[
            (TokenKind::DomainType, "bold #0000EE"),
            (TokenKind::DomainFunction, "#500050"),
            (TokenKind::DomainConstant, "bold #444444"),
            (TokenKind::Text, ""),
            (TokenKind::Whitespace, "#bbbbbb"),
            (TokenKind::Comment, "#3D7B7B"),
            (TokenKind::CommentPreproc, "noitalic #9C6500"),
            (TokenKind::Keyword, "bold #F000F0"),
            (TokenKind::KeywordPseudo, "nobold"),
            (TokenKind::KeywordType, "nobold #0000FF"),
            (TokenKind::Operator, ""),
            (TokenKind::OperatorWord, ""),
            (TokenKind::Punctuation, ""),
            (TokenKind::Name, ""),
            (TokenKind::NameBuiltin, "#00A0A0"),
            (TokenKind::NameFunction, ""),
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
            (TokenKind::String, "#FF4400"),
            (TokenKind::Number, "#008000"),
            (TokenKind::GenericHeading, "bold #000080"),
            (TokenKind::GenericSubheading, "bold #800080"),
            (TokenKind::GenericDeleted, "#A00000"),
            (TokenKind::GenericInserted, "#008400"),
            (TokenKind::GenericError, "#E40000"),
            (TokenKind::GenericEmph, ""),
            (TokenKind::GenericStrong, "bold"),
            (TokenKind::GenericEmphStrong, "bold"),
            (TokenKind::GenericPrompt, "bold #000080"),
            (TokenKind::GenericOutput, "#313131"),
            (TokenKind::GenericTraceback, "#04D"),
            (TokenKind::Error, "border:#FF0000"),
        ],
    )
}

/// Registers the `cfmd` lexer and `cfmd.CFMDStyle`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CfmdExtension;

impl Extension for CfmdExtension {
    fn name(&self) -> &str {
        LEXER_NAME
    }

    fn setup(&self, app: &mut App) -> Result<()> {
        app.add_lexer(LEXER_NAME, Arc::new(lexer()));
        let style = Arc::new(style()?);
        app.add_style(STYLE_NAME, Arc::clone(&style));
        app.add_style(LEXER_NAME, style);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use std::collections::HashSet;

    fn significant(code: &str) -> Vec<(TokenKind, &str)> {
        lexer()
            .tokens(code)
            .filter(|t| t.kind != TokenKind::Whitespace)
            .map(|t| (t.kind, t.text))
            .collect()
    }

    #[test]
    fn test_name_lists_are_disjoint() {
        let names = NameSets::new(
            FMD_TYPES.iter().copied(),
            FMD_FUNCTIONS.iter().copied(),
            FMD_CONSTANTS.iter().copied(),
        )
        .unwrap();
        assert_eq!(names.len(), 26);
        assert_eq!(*fmd_names(), names);

        let all: HashSet<&str> = FMD_TYPES
            .iter()
            .chain(FMD_FUNCTIONS)
            .chain(FMD_CONSTANTS)
            .copied()
            .collect();
        assert_eq!(all.len(), 26);
    }

    #[test]
    fn test_handle_declaration() {
        let tokens = significant("fmd_handle_t *h = fmd_create();");
        assert_eq!(
            tokens,
            vec![
                (TokenKind::DomainType, "fmd_handle_t"),
                (TokenKind::Operator, "*"),
                (TokenKind::Name, "h"),
                (TokenKind::Operator, "="),
                (TokenKind::DomainFunction, "fmd_create"),
                (TokenKind::Punctuation, "("),
                (TokenKind::Punctuation, ")"),
                (TokenKind::Punctuation, ";"),
            ]
        );
    }

    #[test]
    fn test_constant_is_case_sensitive() {
        assert_eq!(
            significant("FMD_EVENT_TIMER_TICK"),
            vec![(TokenKind::DomainConstant, "FMD_EVENT_TIMER_TICK")]
        );
        assert_eq!(
            significant("fmd_event_timer_tick"),
            vec![(TokenKind::Name, "fmd_event_timer_tick")]
        );
        assert_eq!(significant("FMD_T"), vec![(TokenKind::Name, "FMD_T")]);
    }

    #[test]
    fn test_names_in_strings_and_comments_untouched() {
        let tokens = significant("/* fmd_t */ \"fmd_free\"");
        assert_eq!(tokens[0].0, TokenKind::CommentMultiline);
        assert_eq!(tokens[1].0, TokenKind::String);
    }

    #[test]
    fn test_prefix_of_listed_name_untouched() {
        assert_eq!(
            significant("fmd_creates"),
            vec![(TokenKind::Name, "fmd_creates")]
        );
    }

    #[test]
    fn test_style_entries() {
        let style = style().unwrap();
        assert_eq!(style.name(), STYLE_NAME);
        assert_eq!(style.background_color(), "#fafafa");

        let fmd_type = style.resolve(TokenKind::DomainType);
        assert!(fmd_type.bold);
        assert_eq!(fmd_type.color.as_deref(), Some("#0000EE"));

        let fmd_function = style.resolve(TokenKind::DomainFunction);
        assert!(!fmd_function.bold);
        assert_eq!(fmd_function.color.as_deref(), Some("#500050"));

        let keyword_type = style.resolve(TokenKind::KeywordType);
        assert!(!keyword_type.bold);
        assert_eq!(keyword_type.color.as_deref(), Some("#0000FF"));

        assert_eq!(
            style.resolve(TokenKind::GenericTraceback).color.as_deref(),
            Some("#0044DD")
        );
        assert_eq!(
            style.resolve(TokenKind::Error).border.as_deref(),
            Some("#FF0000")
        );
    }

    #[test]
    fn test_style_covers_lexer() {
        let coverage = style().unwrap().coverage(&lexer().token_kinds());
        assert!(coverage.is_complete(), "missing: {:?}", coverage.missing);
    }
}
