//! rentflow
//!
//! Fachada del workspace:
//! - `rent_core`: orquestador, artifacts, configuración y validation gate.
//! - `rent_adapters`: transformaciones locales sobre CSV y el modelo de referencia.
//! - `rent_persistence`: Artifact Store sobre el sistema de ficheros.
//!
//! El binario `rentflow` vive en `crates/rent-cli`.

pub use {rent_adapters, rent_core, rent_persistence};

pub use rent_adapters::LocalStepRunner;
pub use rent_core::{ConfigResolver, Orchestrator, PipelineError, RunReport, RunStatus, StepKind};
pub use rent_persistence::FsArtifactStore;

/// Orquestador con los colaboradores por defecto: store en disco y runner
/// local.
pub type LocalOrchestrator = Orchestrator<FsArtifactStore, LocalStepRunner>;
