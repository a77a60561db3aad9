//! Carga de la ubicación del store desde variables de entorno.
//! Usa `RENTFLOW_ARTIFACT_DIR`; por defecto `./artifacts`.

use std::env;
use std::path::PathBuf;

use dotenvy::dotenv;
use once_cell::sync::Lazy;

pub const ARTIFACT_DIR_VAR: &str = "RENTFLOW_ARTIFACT_DIR";
pub const DEFAULT_ARTIFACT_DIR: &str = "artifacts";

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub root: PathBuf,
}

impl StoreConfig {
    pub fn from_env() -> Self {
        Lazy::force(&DOTENV_LOADED);
        Self::from_lookup(|k| env::var(k).ok())
    }

    /// Variante testeable: `lookup` reemplaza al entorno del proceso.
    pub fn from_lookup<F>(lookup: F) -> Self
        where F: Fn(&str) -> Option<String>
    {
        let root = lookup(ARTIFACT_DIR_VAR).filter(|v| !v.trim().is_empty())
                                           .map(PathBuf::from)
                                           .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTIFACT_DIR));
        Self { root }
    }
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}
