use std::path::{Path, PathBuf};

use rent_core::{StepFailure, StepOutput, StepRunner, StepSpec, StepTask, Table};

use crate::error::AdapterError;
use crate::frame::Frame;
use crate::steps;

/// Runner en proceso: ejecuta las transformaciones de `steps` sobre
/// ficheros locales.
#[derive(Debug, Clone, Default)]
pub struct LocalStepRunner {
    /// Directorio contra el que se resuelven fuentes relativas de `download`.
    base_dir: Option<PathBuf>,
}

impl LocalStepRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self { base_dir: Some(base_dir.into()) }
    }

    fn dispatch(&self, task: &StepTask<'_>) -> Result<StepOutput, AdapterError> {
        match task.spec {
            StepSpec::Download(p) => steps::download::run(p, task, self.base_dir.as_deref()),
            StepSpec::Clean(p) => steps::clean::run(p, task),
            StepSpec::Split(p) => steps::split::run(p, task),
            StepSpec::Train(p) => steps::train::run(p, task),
            StepSpec::Test(p) => steps::evaluate::run(p, task),
            // el gate corre en el core
            StepSpec::Validate(_) => Err(AdapterError::Unsupported(task.spec.kind().to_string())),
        }
    }
}

impl StepRunner for LocalStepRunner {
    fn run(&self, task: &StepTask<'_>) -> Result<StepOutput, StepFailure> {
        self.dispatch(task).map_err(Into::into)
    }

    fn load_table(&self, path: &Path) -> Result<Box<dyn Table>, StepFailure> {
        Ok(Box::new(Frame::read_csv(path)?))
    }
}
