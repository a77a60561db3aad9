//! rent-cli
//!
//! Binario `rentflow`: corre la pipeline contra el store de ficheros y expone
//! las acciones de operador sobre alias.
//!
//! Módulos:
//! - `cli`: argumentos (clap derive).
//! - `commands`: `run`, `alias`, `list`.
//! - `error`: `CliError` y su código de salida.

pub mod cli;
pub mod commands;
pub mod error;

pub use cli::{Cli, Command};
pub use commands::execute;
pub use error::CliError;
