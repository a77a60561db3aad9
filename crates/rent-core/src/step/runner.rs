use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::{ParamSet, StepSpec};
use crate::artifact::ArtifactHandle;
use crate::errors::StepFailure;
use crate::gate::Table;

/// Unidad de trabajo entregada a la lógica de un step.
#[derive(Debug)]
pub struct StepTask<'a> {
    pub run_id: Uuid,
    pub spec: &'a StepSpec,
    pub params: &'a ParamSet,
    /// Inputs ya resueltos y materializados, en el orden de `StepSpec::inputs`.
    pub inputs: &'a [ArtifactHandle],
    /// Directorio de trabajo vacío; los outputs deben escribirse aquí.
    pub work_dir: &'a Path,
}

impl StepTask<'_> {
    /// Input por nombre de artifact.
    pub fn input(&self, name: &str) -> Option<&ArtifactHandle> {
        self.inputs.iter().find(|h| h.meta.name == name)
    }
}

/// Resultado de un step exitoso: ficheros por nombre de output declarado y
/// métricas opcionales.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepOutput {
    pub files: BTreeMap<String, PathBuf>,
    pub metrics: BTreeMap<String, f64>,
}

impl StepOutput {
    pub fn with_file(mut self, name: impl Into<String>, path: PathBuf) -> Self {
        self.files.insert(name.into(), path);
        self
    }

    pub fn with_metric(mut self, name: impl Into<String>, value: f64) -> Self {
        self.metrics.insert(name.into(), value);
        self
    }
}

/// Frontera hacia la lógica de procesamiento de cada step. El orquestador
/// no conoce transformaciones concretas; sólo parámetros, rutas y outputs.
pub trait StepRunner {
    fn run(&self, task: &StepTask<'_>) -> Result<StepOutput, StepFailure>;

    /// Carga un fichero materializado como tabla para el Validation Gate.
    fn load_table(&self, path: &Path) -> Result<Box<dyn Table>, StepFailure>;
}
