//! Template rendering for bdcut.
//!
//! The renderer turns a [`Hierarchy`] plus a [`Format`] into an ordered
//! sequence of output fragments. It owns the template language of the format
//! files, which has exactly two placeholder forms:
//!
//! - `${key}` - **variable substitution**, resolved against
//!   `format.variables`; applied to every emitted templated string
//! - `${_key}` - **info substitution**, resolved against the current record's
//!   fields; applied only to per-record templates, before the variable pass
//!
//! Delimiters are the literal `${` / `}`, matching is non-greedy, nesting is
//! not supported. An unresolved placeholder of either kind substitutes as the
//! empty string; it is not an error.
//!
//! When the format configures an `escape` table, the record's `name` field is
//! passed through it before info substitution. The table keys are joined with
//! `|` and compiled into a single [`Regex`] at construction time; a key set
//! that does not compile is a configuration error surfaced immediately by
//! [`Renderer::new`].
//!
//! Assembly is deterministic and single-pass: optional banner/comment block,
//! `pre` fragments, then the three divisions in fixed parent-to-child order
//! (regiones, provincias, comunas) each with its `pre-<division>` fragments
//! and separator-joined records, then `post` fragments. The renderer performs
//! no I/O; the fragments are handed to an external sink that concatenates
//! them in order.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::{Captures, Regex};
use tracing::debug;

use crate::constants::{BANNER_FOOTER, BANNER_HEADER};
use crate::core::BdcutError;
use crate::format::{Division, Format};
use crate::hierarchy::{Hierarchy, RecordFields};

static VARIABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{(.*?)\}").expect("valid placeholder pattern"));

static INFO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{_(.*?)\}").expect("valid placeholder pattern"));

/// Escape rule compiled from a format's `escape` table.
///
/// Keys are compiled, in table order, into one alternation pattern. Each
/// match is replaced by the table value for the matched text; a match with no
/// exact table entry is left unchanged.
#[derive(Debug)]
struct Escaper {
    pattern: Regex,
    table: IndexMap<String, String>,
}

impl Escaper {
    fn new(table: &IndexMap<String, String>) -> Result<Self, BdcutError> {
        let joined = table.keys().cloned().collect::<Vec<_>>().join("|");
        let pattern = Regex::new(&joined).map_err(|e| BdcutError::EscapeTable {
            reason: e.to_string(),
        })?;
        Ok(Self {
            pattern,
            table: table.clone(),
        })
    }

    fn escape(&self, name: &str) -> String {
        self.pattern
            .replace_all(name, |caps: &Captures<'_>| {
                let matched = &caps[0];
                self.table
                    .get(matched)
                    .cloned()
                    .unwrap_or_else(|| matched.to_string())
            })
            .into_owned()
    }
}

/// Renders a [`Hierarchy`] to output fragments according to a [`Format`].
///
/// Construction compiles the escape rule, so a malformed `escape` table fails
/// before any rendering happens. Rendering itself is infallible and never
/// mutates the hierarchy.
#[derive(Debug)]
pub struct Renderer<'a> {
    format: &'a Format,
    escaper: Option<Escaper>,
}

impl<'a> Renderer<'a> {
    /// Create a renderer for the given format.
    ///
    /// # Errors
    ///
    /// Returns [`BdcutError::EscapeTable`] if the escape-table keys cannot be
    /// compiled into a matching rule.
    pub fn new(format: &'a Format) -> Result<Self, BdcutError> {
        let escaper = format.escape.as_ref().map(Escaper::new).transpose()?;
        Ok(Self {
            format,
            escaper,
        })
    }

    /// Produce the ordered fragment sequence for the hierarchy.
    ///
    /// Concatenating the returned fragments in order yields the complete
    /// output artifact.
    pub fn render(&self, hierarchy: &Hierarchy) -> Vec<String> {
        let mut out = Vec::new();

        if self.format.comments_enabled() {
            out.push(self.format.comentarios_var_header.clone());
            // The banner constant ends with a newline; the extra one leaves a
            // blank line before the first comment.
            out.push(format!("{BANNER_HEADER}\n"));
            self.push_lines(&mut out, &self.format.comentarios);
            out.push(BANNER_FOOTER.to_string());
            out.push(format!("{}\n", self.format.comentarios_var_post));
        }

        self.push_lines(&mut out, &self.format.pre);

        for division in Division::ALL {
            self.push_lines(&mut out, self.format.pre_division(division));

            if let Some(template) = self.format.template(division) {
                match division {
                    Division::Regiones => {
                        self.push_records(&mut out, template, hierarchy.regiones.values());
                    }
                    Division::Provincias => {
                        self.push_records(&mut out, template, hierarchy.provincias.values());
                    }
                    Division::Comunas => {
                        self.push_records(&mut out, template, hierarchy.comunas.values());
                    }
                }
            } else {
                debug!(division = %division, "no template configured, division skipped");
            }
        }

        self.push_lines(&mut out, &self.format.post);

        out
    }

    /// Emit a block of fragments, variable-substituted, one line each.
    fn push_lines(&self, out: &mut Vec<String>, lines: &[String]) {
        for line in lines {
            out.push(format!("{}\n", self.substitute_variables(line)));
        }
    }

    /// Emit one division's records: info pass, then variable pass, separator
    /// strictly between records.
    fn push_records<'r, R>(
        &self,
        out: &mut Vec<String>,
        template: &str,
        records: impl ExactSizeIterator<Item = &'r R>,
    ) where
        R: RecordFields + 'r,
    {
        let count = records.len();
        for (i, record) in records.enumerate() {
            let rendered = self.substitute_variables(&self.substitute_info(template, record));
            out.push(rendered);
            if i + 1 != count {
                out.push(self.format.separator.clone());
            }
        }
    }

    /// Replace every `${key}` with the global variable `key`, or the empty
    /// string when the variable is not defined.
    fn substitute_variables(&self, input: &str) -> String {
        VARIABLE_RE
            .replace_all(input, |caps: &Captures<'_>| {
                self.format.variables.get(&caps[1]).cloned().unwrap_or_default()
            })
            .into_owned()
    }

    /// Replace every `${_key}` with the record's field `key`. The `name`
    /// field goes through the escape table when one is configured; all other
    /// fields substitute verbatim. Unknown fields become the empty string.
    fn substitute_info<R: RecordFields>(&self, template: &str, record: &R) -> String {
        let escaped_name = self.escaper.as_ref().map(|e| e.escape(record.name()));

        INFO_RE
            .replace_all(template, |caps: &Captures<'_>| {
                let key = &caps[1];
                if key == "name" {
                    if let Some(name) = &escaped_name {
                        return name.clone();
                    }
                }
                record.field(key).unwrap_or_default().to_string()
            })
            .into_owned()
    }
}
