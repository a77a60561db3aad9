//! Replay del log de eventos: estado por step reconstruido sin estructuras
//! mutables compartidas.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::artifact::ArtifactId;
use crate::event::{RunEvent, RunEventKind};
use crate::step::{StepKind, StepStatus};

#[derive(Debug, Clone, PartialEq)]
pub struct StepSlot {
    pub step: StepKind,
    pub status: StepStatus,
    pub fingerprint: Option<String>,
    pub outputs: Vec<ArtifactId>,
    pub error: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunHistory {
    pub run_id: Uuid,
    pub slots: Vec<StepSlot>,
    pub completed: bool,
    pub run_fingerprint: Option<String>,
}

impl RunHistory {
    pub fn slot(&self, step: StepKind) -> Option<&StepSlot> {
        self.slots.iter().find(|s| s.step == step)
    }

    pub fn status_of(&self, step: StepKind) -> Option<StepStatus> {
        self.slot(step).map(|s| s.status)
    }
}

/// Reconstruye el estado de `run_id`. Los slots salen de `RunInitialized`;
/// eventos de steps no declarados se ignoran.
pub fn replay(run_id: Uuid, events: &[RunEvent]) -> RunHistory {
    let mut slots: Vec<StepSlot> = Vec::new();
    let mut completed = false;
    let mut run_fingerprint = None;
    for ev in events.iter().filter(|e| e.run_id == run_id) {
        match &ev.kind {
            RunEventKind::RunInitialized { requested, .. } => {
                slots = requested.iter()
                                 .map(|s| StepSlot { step: *s,
                                                     status: StepStatus::Pending,
                                                     fingerprint: None,
                                                     outputs: vec![],
                                                     error: None,
                                                     started_at: None,
                                                     finished_at: None })
                                 .collect();
            }
            RunEventKind::StepStarted { step } => {
                if let Some(slot) = slots.iter_mut().find(|s| s.step == *step) {
                    slot.status = StepStatus::Running;
                    slot.started_at = Some(ev.ts);
                }
            }
            RunEventKind::StepFinished { step,
                                         outputs,
                                         fingerprint,
                                         .. } => {
                if let Some(slot) = slots.iter_mut().find(|s| s.step == *step) {
                    slot.status = StepStatus::FinishedOk;
                    slot.fingerprint = Some(fingerprint.clone());
                    slot.outputs = outputs.clone();
                    slot.finished_at = Some(ev.ts);
                }
            }
            RunEventKind::StepFailed { step, message, .. } => {
                if let Some(slot) = slots.iter_mut().find(|s| s.step == *step) {
                    slot.status = StepStatus::Failed;
                    slot.error = Some(message.clone());
                    slot.finished_at = Some(ev.ts);
                }
            }
            RunEventKind::RunCompleted { run_fingerprint: fp } => {
                completed = true;
                run_fingerprint = Some(fp.clone());
            }
            RunEventKind::ArtifactResolved { .. }
            | RunEventKind::ArtifactLogged { .. }
            | RunEventKind::ValidationRecorded { .. } => {}
        }
    }
    RunHistory { run_id,
                 slots,
                 completed,
                 run_fingerprint }
}
