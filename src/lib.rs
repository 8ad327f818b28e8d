//! FMD Docs
//!
//! Syntax highlighting support for the FMD documentation: a C lexer, a
//! reclassifier that tags FMD API names, style tables and the registry a
//! documentation host loads them from.

pub mod cfmd;
pub mod config;
pub mod error;
pub mod extensions;
pub mod formatter;
pub mod lexer;
pub mod python_config;
pub mod reclassify;
pub mod style;
pub mod token;

pub use cfmd::CfmdExtension;
pub use config::ProjectConfig;
pub use error::{Error, Result};
pub use extensions::{App, Extension, ExtensionLoader};
pub use formatter::{Formatter, HtmlFormatter, JsonFormatter, RawFormatter};
pub use lexer::{CLexer, Lexer, TextLexer, TokenStream};
pub use python_config::{ConfPyConfig, PythonConfigParser};
pub use reclassify::{NameSets, ReclassifyingLexer};
pub use style::{ResolvedStyle, Style, StyleCoverage, StyleDirective};
pub use token::{Token, TokenKind};
