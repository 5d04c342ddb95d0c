//! Global constants used throughout the bdcut codebase.
//!
//! This module holds the fixed informational banner emitted when a format
//! enables comments, plus defaults for the CLI. Defining them centrally
//! keeps the generated-file provenance text in one place.

/// Default output path used when the CLI output argument is omitted.
pub const DEFAULT_OUTPUT_PATH: &str = "output.txt";

/// Fixed informational banner written before the user-supplied comment lines
/// when `mostrar_comentarios` is `"yes"`.
///
/// The text is static and never passes through template substitution; it
/// records that the artifact was generated from the territorial-codes CSV.
pub const BANNER_HEADER: &str = "\
**********************************************************
Este archivo contiene el Script de creación de la base de
datos de los códigos territoriales para Chile 
SE HA GENERADO AUTOMATICAMENTE a partir de un archivo CSV
Revise la documentación para más detalle
Dirección del proyecto en GitHub:
		https://github.com/knxroot/BDCUT_CL
";

/// Closing line of the informational banner.
pub const BANNER_FOOTER: &str =
    "************************************************************";
