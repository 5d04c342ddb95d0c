//! Format configuration parsing for bdcut.
//!
//! A format is a JSON file describing how the deduplicated hierarchy is
//! rendered to text. It is loaded once, treated as read-only, and handed to
//! the renderer. Unknown fields are ignored.
//!
//! # Basic Structure
//!
//! ```json
//! {
//!     "separator": ",\n",
//!     "variables": { "tabla_comunas": "comunas" },
//!     "escape": { "'": "''" },
//!     "pre": ["BEGIN;"],
//!     "pre-comunas": ["INSERT INTO ${tabla_comunas} VALUES"],
//!     "comunas": "(${_id},'${_name}',${_provinciaId})",
//!     "post": ["COMMIT;"]
//! }
//! ```
//!
//! The three per-record templates (`regiones`, `provincias`, `comunas`) are
//! optional; a division with no template is skipped entirely. The `escape`
//! table keeps its file order because alternation order matters when keys
//! overlap.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::core::BdcutError;

/// One hierarchy level as a unit of rendering.
///
/// Processing order is fixed parent-to-child ([`Division::ALL`]) and is not
/// data-driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Division {
    Regiones,
    Provincias,
    Comunas,
}

impl Division {
    /// All divisions in their fixed processing order.
    pub const ALL: [Self; 3] = [Self::Regiones, Self::Provincias, Self::Comunas];

    /// The division's name as it appears in format files.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Regiones => "regiones",
            Self::Provincias => "provincias",
            Self::Comunas => "comunas",
        }
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsed format configuration.
///
/// All fields are optional in the file; missing ones fall back to the
/// defaults documented per field.
#[derive(Debug, Clone, Deserialize)]
pub struct Format {
    /// Inserted between consecutive rendered records of a division, never
    /// after the last one. Defaults to a newline.
    #[serde(default = "default_separator")]
    pub separator: String,

    /// Global substitution table for `${key}` placeholders.
    #[serde(default)]
    pub variables: HashMap<String, String>,

    /// Replacement table applied to a record's `name` before info
    /// substitution. Keys are compiled, in file order, into one alternation
    /// pattern by the renderer.
    #[serde(default)]
    pub escape: Option<IndexMap<String, String>>,

    /// Fragments written before the division loop, one line each.
    #[serde(default)]
    pub pre: Vec<String>,

    /// Fragments written after the division loop, one line each.
    #[serde(default)]
    pub post: Vec<String>,

    #[serde(default, rename = "pre-regiones")]
    pub pre_regiones: Vec<String>,

    #[serde(default, rename = "pre-provincias")]
    pub pre_provincias: Vec<String>,

    #[serde(default, rename = "pre-comunas")]
    pub pre_comunas: Vec<String>,

    /// Per-record template for regions; the division is skipped if absent.
    pub regiones: Option<String>,

    /// Per-record template for provinces; the division is skipped if absent.
    pub provincias: Option<String>,

    /// Per-record template for communes; the division is skipped if absent.
    pub comunas: Option<String>,

    /// `"yes"` enables the informational banner and comment block.
    #[serde(default)]
    pub mostrar_comentarios: String,

    /// Raw fragment written immediately before the banner.
    #[serde(default)]
    pub comentarios_var_header: String,

    /// Raw fragment written immediately after the banner.
    #[serde(default)]
    pub comentarios_var_post: String,

    /// Comment lines emitted inside the banner, variable-substituted only.
    #[serde(default)]
    pub comentarios: Vec<String>,
}

fn default_separator() -> String {
    "\n".to_string()
}

impl Default for Format {
    fn default() -> Self {
        Self {
            separator: default_separator(),
            variables: HashMap::new(),
            escape: None,
            pre: Vec::new(),
            post: Vec::new(),
            pre_regiones: Vec::new(),
            pre_provincias: Vec::new(),
            pre_comunas: Vec::new(),
            regiones: None,
            provincias: None,
            comunas: None,
            mostrar_comentarios: String::new(),
            comentarios_var_header: String::new(),
            comentarios_var_post: String::new(),
            comentarios: Vec::new(),
        }
    }
}

impl Format {
    /// Load and parse a format file.
    pub fn load(path: &Path) -> Result<Self, BdcutError> {
        if !path.exists() {
            return Err(BdcutError::FormatNotFound {
                path: path.display().to_string(),
            });
        }

        let content = fs::read_to_string(path).map_err(|source| BdcutError::Io {
            operation: "read format file".to_string(),
            path: path.display().to_string(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|e| BdcutError::FormatParse {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// The per-record template for a division, if one is configured.
    pub fn template(&self, division: Division) -> Option<&str> {
        match division {
            Division::Regiones => self.regiones.as_deref(),
            Division::Provincias => self.provincias.as_deref(),
            Division::Comunas => self.comunas.as_deref(),
        }
    }

    /// The `pre-<division>` fragments for a division.
    pub fn pre_division(&self, division: Division) -> &[String] {
        match division {
            Division::Regiones => &self.pre_regiones,
            Division::Provincias => &self.pre_provincias,
            Division::Comunas => &self.pre_comunas,
        }
    }

    /// Whether the informational banner and comment block are emitted.
    pub fn comments_enabled(&self) -> bool {
        self.mostrar_comentarios == "yes"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_format_uses_defaults() {
        let format: Format = serde_json::from_str("{}").unwrap();
        assert_eq!(format.separator, "\n");
        assert!(format.variables.is_empty());
        assert!(format.escape.is_none());
        assert!(!format.comments_enabled());
        for division in Division::ALL {
            assert!(format.template(division).is_none());
            assert!(format.pre_division(division).is_empty());
        }
    }

    #[test]
    fn kebab_case_pre_fields_parse() {
        let format: Format = serde_json::from_str(
            r#"{
                "pre-regiones": ["-- regions"],
                "pre-provincias": ["-- provinces"],
                "pre-comunas": ["-- communes"]
            }"#,
        )
        .unwrap();
        assert_eq!(format.pre_division(Division::Regiones), ["-- regions"]);
        assert_eq!(format.pre_division(Division::Provincias), ["-- provinces"]);
        assert_eq!(format.pre_division(Division::Comunas), ["-- communes"]);
    }

    #[test]
    fn escape_table_preserves_file_order() {
        let format: Format = serde_json::from_str(
            r#"{"escape": {"''": "x", "'": "''", "`": "'"}}"#,
        )
        .unwrap();
        let keys: Vec<&str> =
            format.escape.as_ref().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["''", "'", "`"]);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let format: Format =
            serde_json::from_str(r#"{"comunas": "${_id}", "not_a_field": 42}"#).unwrap();
        assert_eq!(format.template(Division::Comunas), Some("${_id}"));
    }

    #[test]
    fn comments_enabled_requires_exact_yes() {
        let yes: Format =
            serde_json::from_str(r#"{"mostrar_comentarios": "yes"}"#).unwrap();
        assert!(yes.comments_enabled());
        let no: Format =
            serde_json::from_str(r#"{"mostrar_comentarios": "true"}"#).unwrap();
        assert!(!no.comments_enabled());
    }

    #[test]
    fn load_missing_file_is_format_not_found() {
        let err = Format::load(Path::new("/nonexistent/formato.json")).unwrap_err();
        assert!(matches!(err, BdcutError::FormatNotFound { .. }));
    }
}
