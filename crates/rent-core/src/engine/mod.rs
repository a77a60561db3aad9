//! Pipeline Orchestrator.
//!
//! Máquina de estados sobre la secuencia canónica
//! `download → clean → validate → split → train → (test)`:
//! - Sólo corren los steps del conjunto activo, siempre en orden canónico.
//! - El primer fallo detiene la corrida; lo ya registrado en el store se
//!   conserva.
//! - Cada invocación recibe un `RunContext` explícito.

mod builder;
mod context;
mod core;
mod history;
mod options;
mod selection;

pub use builder::OrchestratorBuilder;
pub use context::RunContext;
pub use self::core::{Orchestrator, RunReport, RunStatus};
pub use history::{replay, RunHistory, StepSlot};
pub use options::{GatePolicy, OrchestratorOptions};
pub use selection::StepSelection;
