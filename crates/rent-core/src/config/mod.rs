//! Config Resolver: configuración base + overrides → `ConfigTree` inmutable.
//!
//! La validación es perezosa: el árbol resuelto no exige ninguna clave; cada
//! step pide las suyas al momento de ser invocado (ver `step::spec`), lo que
//! permite pipelines parciales con secciones ausentes.

mod merge;
mod resolver;
mod tree;

pub use merge::merge_json;
pub use resolver::{parse_scalar, ConfigResolver};
pub use tree::ConfigTree;
