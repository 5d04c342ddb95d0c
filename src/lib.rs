//! bdcut - template-driven generator for the Chilean territorial codes database
//!
//! bdcut ingests the flat territorial-codes CSV (one commune per row with its
//! parent province and region) and emits a text artifact, typically SQL
//! statements, by applying a declarative JSON "format" to the deduplicated
//! three-level hierarchy.
//!
//! # Architecture Overview
//!
//! Two components compose the pipeline, executed strictly in sequence:
//!
//! 1. **Hierarchy Builder** ([`hierarchy`]) - consumes raw CSV lines and
//!    produces three deduplicated, insertion-ordered mappings (regions,
//!    provinces, communes) keyed by their string identifiers. Regions and
//!    provinces are first-write-wins; communes are last-write-wins.
//! 2. **Template Renderer** ([`templating`]) - consumes the hierarchy plus a
//!    [`format::Format`] and produces an ordered sequence of output
//!    fragments, applying info substitution (`${_field}`), variable
//!    substitution (`${key}`), and an optional name-escaping pass.
//!
//! Control flows one-way from builder to renderer; the hierarchy is handed
//! over by value and never mutated again.
//!
//! # Core Modules
//!
//! - [`cli`] - Command-line interface and pipeline orchestration
//! - [`core`] - Error types and user-friendly error presentation
//! - [`format`] - JSON format-file schema and loader
//! - [`hierarchy`] - CSV hierarchy builder and record types
//! - [`templating`] - Placeholder substitution and output assembly
//! - [`constants`] - Banner text and CLI defaults
//!
//! # Format Files
//!
//! ```json
//! {
//!     "separator": ",\n",
//!     "variables": { "tabla": "comunas" },
//!     "escape": { "'": "''" },
//!     "pre": ["BEGIN;"],
//!     "pre-comunas": ["INSERT INTO ${tabla} VALUES"],
//!     "comunas": "(${_id},'${_name}',${_provinciaId})",
//!     "post": [";", "COMMIT;"]
//! }
//! ```
//!
//! # Command-Line Usage
//!
//! ```bash
//! bdcut formatos/postgres.json postgres.sql
//! bdcut formatos/mysql.json mysql.sql BD/CSV_utf8/BDCUT_CL__CSV_UTF8.csv
//! ```

pub mod cli;
pub mod constants;
pub mod core;
pub mod format;
pub mod hierarchy;
pub mod templating;
