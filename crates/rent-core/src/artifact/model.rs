use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ArtifactReference;
use crate::step::StepKind;

/// Identidad concreta e inmutable de un artifact (`name:vN`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArtifactId {
    pub name: String,
    pub version: u32,
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:v{}", self.name, self.version)
    }
}

/// Step (y corrida) que produjo un artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Producer {
    pub run_id: Uuid,
    pub step: StepKind,
}

/// Metadatos de una versión registrada. Nunca se modifican tras el `put`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMeta {
    pub name: String,
    pub version: u32,
    pub artifact_type: String,
    pub description: String,
    /// Nombre del fichero original empaquetado.
    pub file_name: String,
    /// SHA-256 hex del contenido.
    pub checksum: String,
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
    pub producer: Option<Producer>,
}

impl ArtifactMeta {
    pub fn id(&self) -> ArtifactId {
        ArtifactId { name: self.name.clone(),
                     version: self.version }
    }
}

/// Artifact aún no registrado: lo que un step entrega para `put`.
#[derive(Debug, Clone)]
pub struct ArtifactDraft {
    pub name: String,
    pub artifact_type: String,
    pub description: String,
    pub file_name: String,
    pub content: Vec<u8>,
    pub producer: Option<Producer>,
}

/// Contenido + metadatos tal como los devuelve `ArtifactStore::get`.
#[derive(Debug, Clone)]
pub struct StoredArtifact {
    pub meta: ArtifactMeta,
    pub content: Vec<u8>,
}

/// Artifact resuelto y materializado para un step. La ruta local vive
/// mientras viva el `StepScratch` de la invocación.
#[derive(Debug, Clone)]
pub struct ArtifactHandle {
    /// Referencia tal como se pidió (`clean_sample.csv:latest`).
    pub requested: ArtifactReference,
    pub meta: ArtifactMeta,
    pub local_path: PathBuf,
}

impl ArtifactHandle {
    pub fn id(&self) -> ArtifactId {
        self.meta.id()
    }

    pub fn path(&self) -> &Path {
        &self.local_path
    }
}

/// Registro de auditoría de un movimiento de alias.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasAssignment {
    pub name: String,
    pub alias: String,
    pub version: u32,
    pub previous: Option<u32>,
    pub actor: String,
    pub assigned_at: DateTime<Utc>,
}
