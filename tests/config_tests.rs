//! Integration tests for loading the project configuration and building the
//! registry from it.

use std::fs;
use tempfile::TempDir;

use fmd_docs::config::ProjectConfig;
use fmd_docs::extensions::App;
use fmd_docs::formatter::{Formatter, HtmlFormatter};
use fmd_docs::python_config::PythonConfigParser;
use fmd_docs::token::TokenKind;

const CONF_PY: &str = include_str!("fixtures/conf.py");

fn project_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("conf.py"), CONF_PY).unwrap();
    dir
}

#[test]
fn test_conf_py_settings() {
    let dir = project_dir();
    let config = ProjectConfig::discover(dir.path()).unwrap().unwrap();

    assert_eq!(config.project, "FMD");
    assert_eq!(config.copyright.as_deref(), Some("2024, Arham Amouye Foumani"));
    assert_eq!(config.author.as_deref(), Some("Arham Amouye Foumani"));
    assert_eq!(config.release.as_deref(), Some("0.2.0"));
    assert_eq!(config.extensions, vec!["cfmd", "sphinx_rtd_theme"]);
    assert_eq!(config.templates_path, vec!["_templates"]);
    assert_eq!(
        config.exclude_patterns,
        vec!["_build", "Thumbs.db", ".DS_Store"]
    );
    assert_eq!(config.style_name(), "cfmd.CFMDStyle");
    assert_eq!(config.c_maximum_signature_line_length, Some(0));
    assert_eq!(config.html_theme, "sphinx_rtd_theme");
    assert_eq!(config.theme_flag("display_version"), Some(true));
}

#[test]
fn test_conf_py_skips_path_setup() {
    let parser = PythonConfigParser::new().unwrap();
    let settings = parser.parse_str(CONF_PY).unwrap();
    assert!(!settings.contains_key("sys"));
    assert!(!settings.contains_key("os"));
    assert_eq!(settings.keys().next().map(String::as_str), Some("project"));
}

#[test]
fn test_app_from_conf_py() {
    let dir = project_dir();
    let config = ProjectConfig::from_file(&dir.path().join("conf.py")).unwrap();
    let app = App::from_config(config).unwrap();

    assert_eq!(app.extensions(), ["cfmd".to_string()]);
    let style = app.active_style().unwrap();
    assert_eq!(style.name(), "cfmd.CFMDStyle");
    assert!(app.check_style("cfmd", style.name()).unwrap().is_complete());

    let tokens = app
        .highlight("cfmd", "fmd_handle_t *h = fmd_create();")
        .unwrap();
    let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(kinds[0], TokenKind::DomainType);
    assert!(kinds.contains(&TokenKind::DomainFunction));

    let html = HtmlFormatter::new(style).format(&tokens).unwrap();
    assert!(html.contains("<span class=\"dt\">fmd_handle_t</span>"));
    assert!(html.contains("<span class=\"df\">fmd_create</span>"));
}

#[test]
fn test_same_settings_from_toml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("conf.toml");
    fs::write(
        &path,
        r#"
project = "FMD"
release = "0.2.0"
extensions = ["cfmd", "sphinx_rtd_theme"]
pygments_style = "cfmd.CFMDStyle"
c_maximum_signature_line_length = 0
html_theme = "sphinx_rtd_theme"

[html_theme_options]
display_version = true
"#,
    )
    .unwrap();

    let from_toml = ProjectConfig::from_file(&path).unwrap();
    let from_py = ProjectConfig::discover(project_dir().path()).unwrap().unwrap();
    assert_eq!(from_toml.extensions, from_py.extensions);
    assert_eq!(from_toml.pygments_style, from_py.pygments_style);
    assert_eq!(from_toml.html_theme_options, from_py.html_theme_options);
}

#[test]
fn test_css_for_active_style() {
    let app = App::from_config(ProjectConfig::discover(project_dir().path()).unwrap().unwrap())
        .unwrap();
    let css = app.active_style().unwrap().to_css(".highlight");
    assert!(css.starts_with(".highlight { background: #fafafa; }"));
    assert!(css.contains(".highlight .dt { color: #0000EE; font-weight: bold }"));
    assert!(css.contains(".highlight .df { color: #500050 }"));
    assert!(css.contains(".highlight .dc { color: #444444; font-weight: bold }"));
}
