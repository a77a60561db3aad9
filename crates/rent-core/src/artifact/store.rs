//! Contrato del Artifact Store (colaborador externo).
//!
//! El orquestador consume `get` y `put`; `set_alias` existe para la acción del
//! operador (CLI) y nunca se invoca desde una corrida.

use std::collections::BTreeMap;

use thiserror::Error;

use super::{AliasAssignment, ArtifactDraft, ArtifactMeta, StoredArtifact, VersionSelector};
use crate::errors::PipelineError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no artifact named '{0}'")]
    UnknownName(String),
    #[error("artifact '{name}' has no version or alias '{selector}'")]
    UnknownSelector { name: String, selector: String },
    #[error("invalid artifact name '{0}'")]
    InvalidName(String),
    #[error("invalid alias '{0}'")]
    InvalidAlias(String),
    #[error("checksum mismatch for {0}")]
    Corrupted(String),
    #[error("{0}")]
    Backend(String),
}

impl From<StoreError> for PipelineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UnknownName(name) => PipelineError::ArtifactNotFound { reference: name },
            StoreError::UnknownSelector { name, selector } => {
                PipelineError::ArtifactNotFound { reference: format!("{name}:{selector}") }
            }
            other => PipelineError::Store(other.to_string()),
        }
    }
}

pub trait ArtifactStore {
    /// Contenido y metadatos de la versión que selecciona `selector`.
    fn get(&self, name: &str, selector: &VersionSelector) -> Result<StoredArtifact, StoreError>;

    /// Registra una versión nueva; nunca mueve alias.
    fn put(&mut self, draft: ArtifactDraft) -> Result<ArtifactMeta, StoreError>;

    /// Mueve (o crea) `alias` para que apunte a `version`. Operación auditada.
    fn set_alias(&mut self, name: &str, alias: &str, version: u32, actor: &str) -> Result<AliasAssignment, StoreError>;

    /// Versiones registradas de `name`, en orden ascendente.
    fn versions(&self, name: &str) -> Result<Vec<ArtifactMeta>, StoreError>;

    /// Alias vigentes de `name`.
    fn aliases(&self, name: &str) -> Result<BTreeMap<String, u32>, StoreError>;
}

/// Regla de resolución compartida por los backends: `vN` debe existir;
/// `latest` prefiere un alias explícito y si no, la versión más reciente; el
/// resto de alias sólo existen si fueron asignados.
pub fn select_version(version_count: u32, aliases: &BTreeMap<String, u32>, selector: &VersionSelector) -> Option<u32> {
    match selector {
        VersionSelector::Version(n) => (*n < version_count).then_some(*n),
        VersionSelector::Latest => aliases.get("latest").copied().or_else(|| version_count.checked_sub(1)),
        VersionSelector::Alias(a) => aliases.get(a).copied(),
    }
}

/// Los nombres se usan como segmento de ruta en backends de fichero.
pub fn validate_name(name: &str) -> Result<(), StoreError> {
    let bad = name.is_empty()
              || name == "."
              || name == ".."
              || name.contains(['/', '\\', ':'])
              || name.chars().any(char::is_control);
    if bad { Err(StoreError::InvalidName(name.to_string())) } else { Ok(()) }
}

/// Un alias no puede tener forma de versión (`v3`) ni ser vacío.
pub fn validate_alias(alias: &str) -> Result<(), StoreError> {
    let bad = alias.is_empty()
              || alias.contains([':', '/', '\\'])
              || matches!(VersionSelector::parse(alias), VersionSelector::Version(_));
    if bad { Err(StoreError::InvalidAlias(alias.to_string())) } else { Ok(()) }
}
