//! Reader for `conf.py` files.
//!
//! The file is executed by an embedded Python interpreter and its
//! module-level names are converted to JSON values, so computed settings
//! (`copyright = '2024, ' + author`) come out exactly as Python sees them.
//! Names starting with `_`, modules, functions and other values with no JSON
//! form are left out.

use indexmap::IndexMap;
use log::debug;
use pyo3::prelude::*;
use pyo3::types::PyDict;
use serde_json::Value;
use std::ffi::CString;
use std::path::{Path, PathBuf};

use crate::config::ProjectConfig;
use crate::error::{Error, Result};

/// Settings read from one `conf.py`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfPyConfig {
    path: PathBuf,
    settings: IndexMap<String, Value>,
}

impl ConfPyConfig {
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.settings.get(name)
    }

    /// Every setting, in assignment order.
    pub fn settings(&self) -> &IndexMap<String, Value> {
        &self.settings
    }

    pub fn to_project_config(&self) -> Result<ProjectConfig> {
        ProjectConfig::from_settings(self.settings.clone())
    }
}

/// Runs `conf.py` files in the embedded interpreter.
pub struct PythonConfigParser {
    python_version: String,
}

impl PythonConfigParser {
    pub fn new() -> Result<Self> {
        let python_version = Python::attach(|py| -> PyResult<String> {
            // Imported `_ext` modules must not leave __pycache__ behind.
            py.import("sys")?.setattr("dont_write_bytecode", true)?;
            Ok(py.version().to_string())
        })
        .map_err(|e| Error::ConfPy {
            path: PathBuf::from("conf.py"),
            message: format!("failed to start Python: {}", e),
        })?;
        debug!("Embedded Python {}", python_version);
        Ok(Self { python_version })
    }

    pub fn python_version(&self) -> &str {
        &self.python_version
    }

    pub fn parse_conf_py(&self, path: &Path) -> Result<ConfPyConfig> {
        let source = std::fs::read_to_string(path)?;
        let settings = self.evaluate(path, &source)?;
        debug!("Read {} settings from {}", settings.len(), path.display());
        Ok(ConfPyConfig {
            path: path.to_path_buf(),
            settings,
        })
    }

    /// Execute `source` as if it were a `conf.py` and collect its settings.
    pub fn parse_str(&self, source: &str) -> Result<IndexMap<String, Value>> {
        self.evaluate(Path::new("conf.py"), source)
    }

    fn evaluate(&self, path: &Path, source: &str) -> Result<IndexMap<String, Value>> {
        let code = CString::new(source).map_err(|_| Error::ConfPy {
            path: path.to_path_buf(),
            message: "source contains a NUL byte".to_string(),
        })?;
        let python_error = |e: PyErr| Error::ConfPy {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        Python::attach(|py| {
            let globals = PyDict::new(py);
            globals
                .set_item("__file__", path.to_string_lossy().as_ref())
                .map_err(python_error)?;
            py.run(code.as_c_str(), Some(&globals), None)
                .map_err(python_error)?;

            let mut settings = IndexMap::new();
            for (key, value) in globals.iter() {
                let Ok(name) = key.extract::<String>() else {
                    continue;
                };
                if name.starts_with('_') {
                    continue;
                }
                match pythonize::depythonize::<Value>(&value) {
                    Ok(value) => {
                        settings.insert(name, value);
                    }
                    Err(e) => debug!("{}: skipping '{}': {}", path.display(), name, e),
                }
            }
            Ok(settings)
        })
    }
}
