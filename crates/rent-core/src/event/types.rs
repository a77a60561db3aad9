//! Tipos de evento de una corrida.
//!
//! - Cada corrida emite eventos a un `EventStore` append-only.
//! - El estado por step se reconstruye por replay (`engine::replay`) sin
//!   depender de estructuras mutables.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::artifact::ArtifactId;
use crate::engine::GatePolicy;
use crate::gate::ValidationReport;
use crate::step::StepKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RunEventKind {
    /// Primer evento de un `run_id`: fija los steps a ejecutar (orden
    /// canónico) y el hash de la configuración resuelta.
    RunInitialized { requested: Vec<StepKind>, config_hash: String },
    StepStarted { step: StepKind },
    /// Un input quedó fijado a una versión concreta.
    ArtifactResolved { step: StepKind, reference: String, artifact: ArtifactId },
    ArtifactLogged { step: StepKind, artifact: ArtifactId, checksum: String },
    ValidationRecorded { step: StepKind, report: ValidationReport, policy: GatePolicy },
    StepFinished {
        step: StepKind,
        outputs: Vec<ArtifactId>,
        params: serde_json::Value,
        fingerprint: String,
    },
    /// Error terminal; la corrida no continúa.
    StepFailed { step: StepKind, error_kind: String, message: String },
    /// Cierre exitoso; fingerprint agregado de los steps ejecutados.
    RunCompleted { run_fingerprint: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunEvent {
    pub seq: u64,
    pub run_id: Uuid,
    pub kind: RunEventKind,
    pub ts: DateTime<Utc>, // metadato (no entra en fingerprints)
}
