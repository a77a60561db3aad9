//! Step Invoker: una invocación aislada de un step.
//!
//! Orden fijo:
//! 1. Resolver y materializar todos los inputs (antes de ejecutar nada).
//! 2. Ejecutar la lógica del step vía `StepRunner` (o el gate, para
//!    `validate`).
//! 3. Empaquetar cada output declarado y registrarlo como versión nueva.
//!
//! El scratch de la invocación se elimina al salir, en éxito o en error.
//! Nunca se asignan alias.

use std::collections::BTreeMap;
use std::path::PathBuf;

use log::{debug, info};
use serde_json::json;

use super::{ParamSet, StepKind, StepRunner, StepSpec, StepTask};
use crate::artifact::{ArtifactDraft, ArtifactHandle, ArtifactMeta, ArtifactResolver, StepScratch};
use crate::constants::ENGINE_VERSION;
use crate::engine::RunContext;
use crate::errors::PipelineError;
use crate::event::RunEventKind;
use crate::gate::{ValidationGate, ValidationReport};
use crate::hashing::hash_value;

/// Resultado de una invocación exitosa.
#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub step: StepKind,
    pub params: ParamSet,
    /// Versiones concretas consumidas.
    pub resolved: Vec<ArtifactMeta>,
    /// Versiones nuevas registradas (posiblemente ninguna).
    pub logged: Vec<ArtifactMeta>,
    pub report: Option<ValidationReport>,
    pub metrics: BTreeMap<String, f64>,
    pub fingerprint: String,
}

pub struct StepInvoker<'r> {
    runner: &'r dyn StepRunner,
    scratch_root: Option<PathBuf>,
}

impl<'r> StepInvoker<'r> {
    pub fn new(runner: &'r dyn StepRunner, scratch_root: Option<PathBuf>) -> Self {
        Self { runner,
               scratch_root }
    }

    pub fn invoke(&self, spec: &StepSpec, ctx: &mut RunContext<'_>) -> Result<StepOutcome, PipelineError> {
        let kind = spec.kind();
        let params = spec.param_set()?;
        let scratch = StepScratch::new(self.scratch_root.as_deref(), kind)?;

        let handles = {
            let mut resolver = ArtifactResolver::new(&*ctx.store, &scratch);
            spec.inputs()
                .iter()
                .map(|r| resolver.resolve_reference(r))
                .collect::<Result<Vec<_>, _>>()?
        };
        for h in &handles {
            ctx.record(RunEventKind::ArtifactResolved { step: kind,
                                                        reference: h.requested.to_string(),
                                                        artifact: h.id() });
        }

        let (logged, report, metrics) = match spec {
            StepSpec::Validate(p) => {
                let report = self.evaluate_gate(kind, &handles, p)?;
                (Vec::new(), Some(report), BTreeMap::new())
            }
            _ => {
                let work_dir = scratch.work_dir();
                std::fs::create_dir_all(&work_dir)?;
                let task = StepTask { run_id: ctx.run_id,
                                      spec,
                                      params: &params,
                                      inputs: &handles,
                                      work_dir: &work_dir };
                let output = self.runner.run(&task).map_err(|e| PipelineError::step(kind, e))?;
                let logged = self.log_outputs(kind, &output.files, ctx)?;
                (logged, None, output.metrics)
            }
        };

        let resolved: Vec<ArtifactMeta> = handles.into_iter().map(|h| h.meta).collect();
        let fingerprint = step_fingerprint(kind, ctx.config.hash(), &params, &resolved, &logged, report.as_ref());
        info!("step '{kind}' produced {} artifact(s)", logged.len());
        Ok(StepOutcome { step: kind,
                         params,
                         resolved,
                         logged,
                         report,
                         metrics,
                         fingerprint })
    }

    fn evaluate_gate(&self,
                     kind: StepKind,
                     handles: &[ArtifactHandle],
                     params: &super::spec::ValidateParams)
                     -> Result<ValidationReport, PipelineError> {
        let pick = |reference: &crate::artifact::ArtifactReference| {
            handles.iter()
                   .find(|h| &h.requested == reference)
                   .ok_or_else(|| PipelineError::ArtifactNotFound { reference: reference.to_string() })
        };
        let candidate = pick(&params.input)?;
        let table = self.runner.load_table(candidate.path()).map_err(|e| PipelineError::step(kind, e))?;
        let reference = match &params.reference {
            Some(r) => Some(self.runner.load_table(pick(r)?.path()).map_err(|e| PipelineError::step(kind, e))?),
            None => None,
        };
        ValidationGate::evaluate(&candidate.id().to_string(), table.as_ref(), reference.as_deref(), &params.thresholds)
    }

    fn log_outputs(&self,
                   kind: StepKind,
                   files: &BTreeMap<String, PathBuf>,
                   ctx: &mut RunContext<'_>)
                   -> Result<Vec<ArtifactMeta>, PipelineError> {
        let mut logged = Vec::new();
        for decl in kind.declared_outputs() {
            let path = files.get(decl.name)
                            .ok_or_else(|| PipelineError::step(kind, format!("declared output '{}' was not produced", decl.name)))?;
            let content = std::fs::read(path).map_err(|e| PipelineError::step(kind, e))?;
            let file_name = path.file_name()
                                .and_then(|f| f.to_str())
                                .unwrap_or(decl.name)
                                .to_string();
            let draft = ArtifactDraft { name: decl.name.to_string(),
                                        artifact_type: decl.artifact_type.to_string(),
                                        description: decl.description.to_string(),
                                        file_name,
                                        content,
                                        producer: Some(ctx.producer(kind)) };
            let meta = ctx.store.put(draft)?;
            debug!("logged {} ({} bytes)", meta.id(), meta.size_bytes);
            ctx.record(RunEventKind::ArtifactLogged { step: kind,
                                                      artifact: meta.id(),
                                                      checksum: meta.checksum.clone() });
            logged.push(meta);
        }
        Ok(logged)
    }
}

fn step_fingerprint(kind: StepKind,
                    config_hash: &str,
                    params: &ParamSet,
                    inputs: &[ArtifactMeta],
                    outputs: &[ArtifactMeta],
                    report: Option<&ValidationReport>)
                    -> String {
    let mut input_checksums: Vec<&str> = inputs.iter().map(|m| m.checksum.as_str()).collect();
    input_checksums.sort_unstable();
    let output_checksums: Vec<&str> = outputs.iter().map(|m| m.checksum.as_str()).collect();
    hash_value(&json!({
        "engine_version": ENGINE_VERSION,
        "step": kind,
        "config_hash": config_hash,
        "params": params.to_value(),
        "input_checksums": input_checksums,
        "output_checksums": output_checksums,
        "verdict": report.map(ValidationReport::passed)
    }))
}
