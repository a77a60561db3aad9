//! Directorio temporal por invocación de step.
//!
//! Todo lo que el resolver materializa y todo lo que el step escribe vive
//! aquí. Se elimina al soltar el guard, en éxito y en error.

use std::path::{Path, PathBuf};

use log::debug;
use tempfile::TempDir;

use crate::errors::PipelineError;
use crate::step::StepKind;

#[derive(Debug)]
pub struct StepScratch {
    dir: TempDir,
}

impl StepScratch {
    /// Crea el directorio bajo `root` (o el temporal del sistema).
    pub fn new(root: Option<&Path>, step: StepKind) -> Result<Self, PipelineError> {
        let mut builder = tempfile::Builder::new();
        let prefix = format!("rentflow-{step}-");
        builder.prefix(&prefix);
        let dir = match root {
            Some(root) => {
                std::fs::create_dir_all(root)?;
                builder.tempdir_in(root)?
            }
            None => builder.tempdir()?,
        };
        debug!("scratch for step '{step}' at {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Subdirectorio donde se materializan los inputs resueltos.
    pub fn inputs_dir(&self) -> PathBuf {
        self.dir.path().join("inputs")
    }

    /// Subdirectorio de trabajo entregado al step.
    pub fn work_dir(&self) -> PathBuf {
        self.dir.path().join("work")
    }
}

impl Drop for StepScratch {
    fn drop(&mut self) {
        debug!("releasing scratch {}", self.dir.path().display());
    }
}
