//! Command-line front end for `short-sign`: YAML configuration and a
//! file-backed credential directory.

pub mod configuration;
pub mod directory;
