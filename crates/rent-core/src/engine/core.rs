//! Núcleo del orquestador: ejecución secuencial de una selección de steps.

use std::collections::BTreeMap;

use log::{error, info, warn};
use serde_json::json;
use uuid::Uuid;

use super::selection::STEPS_KEY;
use super::{replay, GatePolicy, OrchestratorBuilder, OrchestratorOptions, RunContext, RunHistory, StepSelection};
use crate::artifact::{ArtifactMeta, ArtifactStore};
use crate::config::ConfigTree;
use crate::constants::ENGINE_VERSION;
use crate::errors::PipelineError;
use crate::event::{EventStore, InMemoryEventStore, RunEvent, RunEventKind};
use crate::gate::ValidationReport;
use crate::hashing::hash_value;
use crate::step::{StepInvoker, StepKind, StepOutcome, StepRunner, StepSpec};

/// Estado de una corrida.
///
/// Transiciones: `Pending` -> `Running(step)` -> ... -> `Succeeded` o
/// `FailedAt`. `FailedAt` es terminal.
#[derive(Debug)]
pub enum RunStatus {
    Pending,
    Running(StepKind),
    Succeeded,
    FailedAt { step: StepKind, cause: PipelineError },
}

/// Registro de una corrida terminada.
#[derive(Debug)]
pub struct RunReport {
    pub run_id: Uuid,
    pub status: RunStatus,
    /// Steps que llegaron a iniciarse, en orden (incluye el que falló).
    pub executed: Vec<StepKind>,
    /// Versiones registradas durante la corrida.
    pub outputs: Vec<ArtifactMeta>,
    pub reports: Vec<ValidationReport>,
    pub metrics: BTreeMap<StepKind, BTreeMap<String, f64>>,
    /// Sólo presente si la corrida terminó con éxito.
    pub run_fingerprint: Option<String>,
    pub events: Vec<RunEvent>,
}

impl RunReport {
    pub fn succeeded(&self) -> bool {
        matches!(self.status, RunStatus::Succeeded)
    }

    pub fn failed_step(&self) -> Option<StepKind> {
        match &self.status {
            RunStatus::FailedAt { step, .. } => Some(*step),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&PipelineError> {
        match &self.status {
            RunStatus::FailedAt { cause, .. } => Some(cause),
            _ => None,
        }
    }

    /// Última versión registrada de `name` en esta corrida.
    pub fn output(&self, name: &str) -> Option<&ArtifactMeta> {
        self.outputs.iter().rev().find(|m| m.name == name)
    }

    pub fn history(&self) -> RunHistory {
        replay(self.run_id, &self.events)
    }
}

pub struct Orchestrator<S, R, E = InMemoryEventStore>
    where S: ArtifactStore,
          R: StepRunner,
          E: EventStore
{
    store: S,
    runner: R,
    events: E,
    config: ConfigTree,
    options: OrchestratorOptions,
}

impl<S: ArtifactStore, R: StepRunner> Orchestrator<S, R, InMemoryEventStore> {
    pub fn builder(store: S, runner: R) -> OrchestratorBuilder<S, R> {
        OrchestratorBuilder::new(store, runner)
    }
}

impl<S, R, E> Orchestrator<S, R, E>
    where S: ArtifactStore,
          R: StepRunner,
          E: EventStore
{
    pub(crate) fn from_parts(store: S, runner: R, events: E, config: ConfigTree, options: OrchestratorOptions) -> Self {
        Self { store,
               runner,
               events,
               config,
               options }
    }

    pub fn config(&self) -> &ConfigTree {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Acceso mutable al store entre corridas (p. ej. para mover alias).
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn event_store(&self) -> &E {
        &self.events
    }

    /// Corre la selección declarada en `main.steps`.
    pub fn run_configured(&mut self) -> Result<RunReport, PipelineError> {
        let names = self.config.require_str_list(STEPS_KEY)?;
        let selection = StepSelection::from_names(names)?;
        Ok(self.run(&selection))
    }

    /// Corre una selección textual (`all` o lista separada por comas). Una
    /// selección inválida falla antes de ejecutar ningún step.
    pub fn run_requested(&mut self, raw: &str) -> Result<RunReport, PipelineError> {
        let selection = StepSelection::parse(raw)?;
        Ok(self.run(&selection))
    }

    pub fn run(&mut self, selection: &StepSelection) -> RunReport {
        let run_id = Uuid::new_v4();
        let requested = selection.ordered();
        let Self { store,
                   runner,
                   events,
                   config,
                   options } = self;
        let config: &ConfigTree = config;
        let mut ctx = RunContext::new(run_id, config, store, events);
        ctx.record(RunEventKind::RunInitialized { requested: requested.clone(),
                                                  config_hash: config.hash().to_string() });
        info!("run {run_id} started: [{}]",
              requested.iter().map(|s| s.name()).collect::<Vec<_>>().join(", "));

        let invoker = StepInvoker::new(&*runner, options.scratch_root.clone());
        let mut status = RunStatus::Pending;
        let mut executed = Vec::new();
        let mut outputs = Vec::new();
        let mut reports = Vec::new();
        let mut metrics = BTreeMap::new();
        let mut fingerprints = Vec::new();

        for kind in requested.iter().copied() {
            status = RunStatus::Running(kind);
            executed.push(kind);
            ctx.record(RunEventKind::StepStarted { step: kind });
            info!("step '{kind}' started");
            match execute_step(kind, &invoker, &mut ctx, options.gate_policy) {
                Ok(outcome) => {
                    ctx.record(RunEventKind::StepFinished { step: kind,
                                                            outputs: outcome.logged.iter().map(ArtifactMeta::id).collect(),
                                                            params: outcome.params.to_value(),
                                                            fingerprint: outcome.fingerprint.clone() });
                    fingerprints.push(outcome.fingerprint);
                    outputs.extend(outcome.logged);
                    reports.extend(outcome.report);
                    if !outcome.metrics.is_empty() {
                        metrics.insert(kind, outcome.metrics);
                    }
                }
                Err(cause) => {
                    ctx.record(RunEventKind::StepFailed { step: kind,
                                                          error_kind: cause.label().to_string(),
                                                          message: cause.to_string() });
                    error!("step '{kind}' failed ({}): {cause}", cause.label());
                    status = RunStatus::FailedAt { step: kind, cause };
                    break;
                }
            }
        }

        let mut run_fingerprint = None;
        if !matches!(status, RunStatus::FailedAt { .. }) {
            let fp = hash_value(&json!({
                "engine_version": ENGINE_VERSION,
                "config_hash": config.hash(),
                "steps": requested,
                "step_fingerprints": fingerprints
            }));
            ctx.record(RunEventKind::RunCompleted { run_fingerprint: fp.clone() });
            info!("run {run_id} succeeded");
            run_fingerprint = Some(fp);
            status = RunStatus::Succeeded;
        }

        RunReport { run_id,
                    status,
                    executed,
                    outputs,
                    reports,
                    metrics,
                    run_fingerprint,
                    events: ctx.events.list(run_id) }
    }
}

fn gate_policy(explicit: Option<GatePolicy>, config: &ConfigTree) -> Result<GatePolicy, PipelineError> {
    match explicit {
        Some(policy) => Ok(policy),
        None => config.optional_str(GatePolicy::CONFIG_KEY)?
                      .map_or(Ok(GatePolicy::default()), str::parse),
    }
}

fn execute_step(kind: StepKind,
                invoker: &StepInvoker<'_>,
                ctx: &mut RunContext<'_>,
                explicit_policy: Option<GatePolicy>)
                -> Result<StepOutcome, PipelineError> {
    // La política se fija antes de validar; sin configurar, solo se registra.
    let policy = match kind {
        StepKind::Validate => Some(gate_policy(explicit_policy, ctx.config)?),
        _ => None,
    };
    let spec = StepSpec::from_config(kind, ctx.config)?;
    let outcome = invoker.invoke(&spec, ctx)?;
    if let (Some(report), Some(policy)) = (&outcome.report, policy) {
        ctx.record(RunEventKind::ValidationRecorded { step: kind,
                                                      report: report.clone(),
                                                      policy });
        if !report.passed() {
            let failed = report.failed_checks();
            match policy {
                GatePolicy::Enforce => {
                    return Err(PipelineError::ValidationFailure { artifact: report.artifact.clone(),
                                                                  failed });
                }
                GatePolicy::Record => warn!("validation of {} failed [{}]; recorded only", report.artifact, failed.join(", ")),
            }
        }
    }
    Ok(outcome)
}
