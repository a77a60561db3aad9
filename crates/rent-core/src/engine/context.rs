use uuid::Uuid;

use crate::artifact::{ArtifactStore, Producer};
use crate::config::ConfigTree;
use crate::event::{EventStore, RunEvent, RunEventKind};
use crate::step::StepKind;

/// Contexto explícito de una corrida, pasado a cada invocación de step.
pub struct RunContext<'a> {
    pub run_id: Uuid,
    pub config: &'a ConfigTree,
    pub store: &'a mut dyn ArtifactStore,
    pub events: &'a mut dyn EventStore,
}

impl<'a> RunContext<'a> {
    pub fn new(run_id: Uuid,
               config: &'a ConfigTree,
               store: &'a mut dyn ArtifactStore,
               events: &'a mut dyn EventStore)
               -> Self {
        Self { run_id,
               config,
               store,
               events }
    }

    pub fn record(&mut self, kind: RunEventKind) -> RunEvent {
        self.events.append_kind(self.run_id, kind)
    }

    pub fn producer(&self, step: StepKind) -> Producer {
        Producer { run_id: self.run_id,
                   step }
    }
}
