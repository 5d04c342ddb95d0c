//! Core types for bdcut
//!
//! Foundation of the generator's type system: the error taxonomy and the
//! user-facing error presentation.
//!
//! # Modules
//!
//! ## `error` - Error Handling
//!
//! - [`BdcutError`] - Enumerated error types covering the generator's failure
//!   modes (missing/invalid format file, bad escape table, I/O)
//! - [`ErrorContext`] - User-friendly error wrapper with suggestions and details
//! - [`user_friendly_error`] - Convert any error to user-friendly format
//!
//! # Design Principles
//!
//! Every fallible operation returns a [`Result`] with meaningful error
//! information; user-facing errors carry actionable suggestions rendered with
//! terminal colors.

pub mod error;

pub use error::{BdcutError, ErrorContext, user_friendly_error};
