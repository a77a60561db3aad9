//! Artifacts versionados, referencias `name:selector`, el contrato del
//! Artifact Store y el resolver que materializa contenido en scratch.
//!
//! Un artifact es inmutable una vez creado: cada `put` produce una versión
//! nueva (`v0`, `v1`, ...). Los alias (`reference`, `prod`, ...) son punteros
//! mutables que sólo mueve una operación explícita `set_alias`.

mod memory;
mod model;
mod reference;
mod resolver;
mod scratch;
mod store;

pub use memory::InMemoryArtifactStore;
pub use model::{AliasAssignment, ArtifactDraft, ArtifactHandle, ArtifactId, ArtifactMeta, Producer, StoredArtifact};
pub use reference::{ArtifactReference, VersionSelector};
pub use resolver::ArtifactResolver;
pub use scratch::StepScratch;
pub use store::{select_version, validate_alias, validate_name, ArtifactStore, StoreError};
