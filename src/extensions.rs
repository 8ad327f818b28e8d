//! Extension registry.
//!
//! An [`App`] owns the named lexers and styles code blocks are highlighted
//! with. Extensions add to it from their `setup` hook, the way a
//! documentation host's plugins register themselves; the host then looks a
//! lexer up by the language tag of each code block.

use indexmap::IndexMap;
use log::{debug, info, warn};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::cfmd::CfmdExtension;
use crate::config::ProjectConfig;
use crate::error::{Error, Result};
use crate::lexer::{CLexer, Lexer, TextLexer};
use crate::style::{self, Style, StyleCoverage};
use crate::token::Token;

/// A plugin that registers lexers or styles.
pub trait Extension: Send + Sync {
    fn name(&self) -> &str;

    fn setup(&self, app: &mut App) -> Result<()>;
}

type ExtensionFactory = fn() -> Box<dyn Extension>;

/// Resolves extension names from the configuration to implementations.
pub struct ExtensionLoader {
    factories: HashMap<String, ExtensionFactory>,
}

impl ExtensionLoader {
    /// A loader that knows the built-in extensions.
    pub fn new() -> Self {
        let mut loader = Self {
            factories: HashMap::new(),
        };
        loader.register("cfmd", || Box::new(CfmdExtension));
        loader
    }

    pub fn register(&mut self, name: &str, factory: ExtensionFactory) {
        self.factories.insert(name.to_string(), factory);
    }

    pub fn load_extension(&self, name: &str) -> Result<Box<dyn Extension>> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| Error::ExtensionNotFound(name.to_string()))
    }

    pub fn available(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for ExtensionLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry of lexers and styles, configured from a [`ProjectConfig`].
pub struct App {
    config: ProjectConfig,
    lexers: IndexMap<String, Arc<dyn Lexer>>,
    styles: IndexMap<String, Arc<Style>>,
    extensions: Vec<String>,
}

impl App {
    /// An app with the built-in lexers (`c`, `text`) and the `default` style.
    pub fn new(config: ProjectConfig) -> Result<Self> {
        let mut app = Self {
            config,
            lexers: IndexMap::new(),
            styles: IndexMap::new(),
            extensions: Vec::new(),
        };
        app.register_lexer(Arc::new(CLexer::new()));
        app.register_lexer(Arc::new(TextLexer));
        app.add_style("default", Arc::new(style::default_style()?));
        Ok(app)
    }

    /// Build an app and load every extension the configuration lists.
    /// Extensions that are not available are skipped with a warning.
    pub fn from_config(config: ProjectConfig) -> Result<Self> {
        let mut app = Self::new(config)?;
        let loader = ExtensionLoader::new();

        for extension_name in app.config.extensions.clone() {
            match loader.load_extension(&extension_name) {
                Ok(extension) => app.add_extension(extension.as_ref())?,
                Err(e) => warn!("Skipping extension '{}': {}", extension_name, e),
            }
        }

        Ok(app)
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn add_extension(&mut self, extension: &dyn Extension) -> Result<()> {
        extension.setup(self)?;
        info!("Loaded extension '{}'", extension.name());
        self.extensions.push(extension.name().to_string());
        Ok(())
    }

    /// Names of the extensions that were set up, in load order.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Register `lexer` under `name`, replacing any previous registration.
    pub fn add_lexer(&mut self, name: &str, lexer: Arc<dyn Lexer>) {
        if self.lexers.contains_key(name) {
            warn!("Lexer '{}' is already registered, overriding", name);
        }
        debug!("Registered lexer '{}'", name);
        self.lexers.insert(name.to_string(), lexer);
    }

    /// Register `lexer` under its own name and aliases.
    pub fn register_lexer(&mut self, lexer: Arc<dyn Lexer>) {
        let mut names = vec![lexer.name().to_string()];
        names.extend(lexer.aliases().iter().map(|alias| alias.to_string()));
        for name in names {
            self.add_lexer(&name, Arc::clone(&lexer));
        }
    }

    pub fn lexer(&self, name: &str) -> Result<Arc<dyn Lexer>> {
        self.lexers
            .get(name)
            .cloned()
            .ok_or_else(|| Error::LexerNotFound(name.to_string()))
    }

    /// Lexer declaring `path`'s extension among its filenames. The most
    /// recently registered one wins, so an extension's lexer shadows the
    /// built-in it wraps.
    pub fn lexer_for_filename(&self, path: &Path) -> Option<Arc<dyn Lexer>> {
        let extension = path.extension()?.to_str()?;
        self.lexers
            .values()
            .rev()
            .find(|lexer| lexer.filenames().contains(&extension))
            .cloned()
    }

    /// Lexer for a code block tagged `language`, or the configured
    /// `highlight_language` when untagged. Unknown tags fall back to `text`.
    pub fn lexer_for_block(&self, language: Option<&str>) -> Arc<dyn Lexer> {
        let requested = match language {
            Some(tag) if !tag.is_empty() && tag != "default" => tag,
            _ => self.config.highlight_language.as_str(),
        };
        match self.lexer(requested) {
            Ok(lexer) => lexer,
            Err(_) => {
                if requested != "default" {
                    warn!("No lexer for '{}', highlighting as plain text", requested);
                }
                Arc::new(TextLexer)
            }
        }
    }

    pub fn lexer_names(&self) -> impl Iterator<Item = &str> {
        self.lexers.keys().map(String::as_str)
    }

    pub fn add_style(&mut self, name: &str, style: Arc<Style>) {
        if self.styles.contains_key(name) {
            warn!("Style '{}' is already registered, overriding", name);
        }
        debug!("Registered style '{}'", name);
        self.styles.insert(name.to_string(), style);
    }

    pub fn style(&self, name: &str) -> Result<Arc<Style>> {
        self.styles
            .get(name)
            .cloned()
            .ok_or_else(|| Error::StyleNotFound(name.to_string()))
    }

    /// The style named by `pygments_style`.
    pub fn active_style(&self) -> Result<Arc<Style>> {
        self.style(self.config.style_name())
    }

    pub fn style_names(&self) -> impl Iterator<Item = &str> {
        self.styles.keys().map(String::as_str)
    }

    /// Tokenize `code` with the lexer registered as `language`.
    pub fn highlight<'a>(&self, language: &str, code: &'a str) -> Result<Vec<Token<'a>>> {
        let lexer = self.lexer(language)?;
        Ok(lexer.tokens(code).collect())
    }

    /// Which categories `lexer` emits that `style` leaves to the default.
    pub fn check_style(&self, lexer: &str, style: &str) -> Result<StyleCoverage> {
        let lexer = self.lexer(lexer)?;
        let style = self.style(style)?;
        let coverage = style.coverage(&lexer.token_kinds());
        if !coverage.is_complete() {
            let missing: Vec<&str> = coverage.missing.iter().map(|kind| kind.name()).collect();
            warn!(
                "Style '{}' has no entry for {} emitted by lexer '{}'",
                style.name(),
                missing.join(", "),
                lexer.name()
            );
        }
        Ok(coverage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    fn cfmd_config() -> ProjectConfig {
        ProjectConfig {
            extensions: vec!["cfmd".to_string(), "sphinx_rtd_theme".to_string()],
            pygments_style: Some("cfmd.CFMDStyle".to_string()),
            ..ProjectConfig::default()
        }
    }

    #[test]
    fn test_builtins_registered() {
        let app = App::new(ProjectConfig::default()).unwrap();
        assert!(app.lexer("c").is_ok());
        assert!(app.lexer("text").is_ok());
        assert!(app.lexer("none").is_ok());
        assert!(app.style("default").is_ok());
        assert!(matches!(app.lexer("cfmd"), Err(Error::LexerNotFound(_))));
    }

    #[test]
    fn test_from_config_loads_known_and_skips_unknown() {
        let app = App::from_config(cfmd_config()).unwrap();
        assert_eq!(app.extensions(), ["cfmd".to_string()]);
        assert_eq!(app.lexer("cfmd").unwrap().name(), "cfmd");
        assert_eq!(app.active_style().unwrap().name(), "cfmd.CFMDStyle");
    }

    #[test]
    fn test_highlight_by_name() {
        let app = App::from_config(cfmd_config()).unwrap();
        let tokens = app.highlight("cfmd", "fmd_free(md);").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::DomainFunction);
        let tokens = app.highlight("c", "fmd_free(md);").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Name);
        assert!(app.highlight("fortran", "x").is_err());
    }

    #[test]
    fn test_lexer_for_block_fallbacks() {
        let mut config = cfmd_config();
        config.highlight_language = "cfmd".to_string();
        let app = App::from_config(config).unwrap();
        assert_eq!(app.lexer_for_block(None).name(), "cfmd");
        assert_eq!(app.lexer_for_block(Some("c")).name(), "c");
        assert_eq!(app.lexer_for_block(Some("cobol")).name(), "text");
    }

    #[test]
    fn test_lexer_for_filename() {
        let app = App::new(ProjectConfig::default()).unwrap();
        assert_eq!(
            app.lexer_for_filename(Path::new("example.c")).unwrap().name(),
            "c"
        );
        assert!(app.lexer_for_filename(Path::new("README")).is_none());
    }

    #[test]
    fn test_extension_lexer_wins_filename_lookup() {
        let app = App::from_config(cfmd_config()).unwrap();
        let lexer = app.lexer_for_filename(Path::new("example.c")).unwrap();
        assert_eq!(lexer.name(), "cfmd");
        let tokens = app.highlight(lexer.name(), "fmd_free(md);").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::DomainFunction);
        assert_eq!(
            app.lexer_for_filename(Path::new("notes.txt")).unwrap().name(),
            "text"
        );
    }

    #[test]
    fn test_loader_unknown_extension() {
        let loader = ExtensionLoader::new();
        assert_eq!(loader.available(), vec!["cfmd"]);
        assert!(matches!(
            loader.load_extension("sphinx_rtd_theme"),
            Err(Error::ExtensionNotFound(_))
        ));
    }

    #[test]
    fn test_check_style_default_misses_domain_kinds() {
        let app = App::from_config(cfmd_config()).unwrap();
        let coverage = app.check_style("cfmd", "default").unwrap();
        assert!(coverage.missing.contains(&TokenKind::DomainType));
        let coverage = app.check_style("cfmd", "cfmd.CFMDStyle").unwrap();
        assert!(coverage.is_complete(), "missing: {:?}", coverage.missing);
    }
}
