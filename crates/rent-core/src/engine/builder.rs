//! Builder para `Orchestrator`.
//!
//! Store de artifacts y runner son obligatorios; el event store por defecto
//! es en memoria. La configuración resuelta se entrega al final (`build`),
//! donde se validan las opciones que no dependen de ningún step.

use std::path::PathBuf;

use super::{GatePolicy, Orchestrator, OrchestratorOptions};
use crate::artifact::ArtifactStore;
use crate::config::ConfigTree;
use crate::errors::PipelineError;
use crate::event::{EventStore, InMemoryEventStore};
use crate::step::StepRunner;

pub const SCRATCH_DIR_KEY: &str = "main.scratch_dir";

#[derive(Debug)]
pub struct OrchestratorBuilder<S, R, E = InMemoryEventStore> {
    store: S,
    runner: R,
    events: E,
    options: OrchestratorOptions,
}

impl<S: ArtifactStore, R: StepRunner> OrchestratorBuilder<S, R, InMemoryEventStore> {
    pub fn new(store: S, runner: R) -> Self {
        Self { store,
               runner,
               events: InMemoryEventStore::default(),
               options: OrchestratorOptions::default() }
    }
}

impl<S: ArtifactStore, R: StepRunner, E: EventStore> OrchestratorBuilder<S, R, E> {
    /// Reemplaza el event store (cambia el tipo del builder).
    pub fn with_event_store<E2: EventStore>(self, events: E2) -> OrchestratorBuilder<S, R, E2> {
        OrchestratorBuilder { store: self.store,
                              runner: self.runner,
                              events,
                              options: self.options }
    }

    pub fn gate_policy(mut self, policy: GatePolicy) -> Self {
        self.options.gate_policy = Some(policy);
        self
    }

    pub fn scratch_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.options.scratch_root = Some(root.into());
        self
    }

    pub fn build(self, config: ConfigTree) -> Result<Orchestrator<S, R, E>, PipelineError> {
        let mut options = self.options;
        if options.scratch_root.is_none() {
            options.scratch_root = config.optional_str(SCRATCH_DIR_KEY)?.map(PathBuf::from);
        }
        Ok(Orchestrator::from_parts(self.store, self.runner, self.events, config, options))
    }
}
