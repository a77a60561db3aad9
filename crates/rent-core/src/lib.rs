//! rent-core: orquestador lineal de pipelines con artifacts versionados.
pub mod artifact;
pub mod config;
pub mod constants;
pub mod engine;
pub mod errors;
pub mod event;
pub mod gate;
pub mod hashing;
pub mod step;

pub use artifact::{ArtifactHandle, ArtifactMeta, ArtifactReference, ArtifactStore, InMemoryArtifactStore, VersionSelector};
pub use config::{ConfigResolver, ConfigTree};
pub use engine::{GatePolicy, Orchestrator, OrchestratorOptions, RunReport, RunStatus, StepSelection};
pub use errors::{PipelineError, StepFailure};
pub use event::{EventStore, InMemoryEventStore, RunEvent, RunEventKind};
pub use gate::{GateThresholds, Table, ValidationGate, ValidationReport};
pub use step::{StepKind, StepOutput, StepRunner, StepSpec, StepTask};
