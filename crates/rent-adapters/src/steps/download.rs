//! `download`: copia el fichero fuente al directorio de trabajo como
//! `sample.csv`.

use std::path::{Path, PathBuf};

use log::info;
use rent_core::step::names;
use rent_core::step::spec::DownloadParams;
use rent_core::{StepOutput, StepTask};

use crate::error::AdapterError;

/// Ruta del fichero fuente: `source_dir` explícito, si no `base_dir`, si no
/// la ruta tal cual.
pub fn source_path(params: &DownloadParams, base_dir: Option<&Path>) -> PathBuf {
    let sample = Path::new(&params.sample);
    match (params.source_dir.as_deref(), base_dir) {
        _ if sample.is_absolute() => sample.to_path_buf(),
        (Some(dir), _) => Path::new(dir).join(sample),
        (None, Some(base)) => base.join(sample),
        (None, None) => sample.to_path_buf(),
    }
}

pub fn run(params: &DownloadParams, task: &StepTask<'_>, base_dir: Option<&Path>) -> Result<StepOutput, AdapterError> {
    let source = source_path(params, base_dir);
    let target = task.work_dir.join(names::SAMPLE);
    let bytes = std::fs::copy(&source, &target).map_err(|e| AdapterError::Read { path: source.clone(),
                                                                                 source: e })?;
    info!("downloaded {} ({bytes} bytes)", source.display());
    Ok(StepOutput::default().with_file(names::SAMPLE, target)
                            .with_metric("bytes", bytes as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_dir_wins_over_base_dir() {
        let p = DownloadParams { sample: "sample1.csv".into(),
                                 source_dir: Some("/data".into()) };
        assert_eq!(source_path(&p, Some(Path::new("/base"))), PathBuf::from("/data/sample1.csv"));
        let p = DownloadParams { sample: "sample1.csv".into(),
                                 source_dir: None };
        assert_eq!(source_path(&p, Some(Path::new("/base"))), PathBuf::from("/base/sample1.csv"));
        let p = DownloadParams { sample: "/abs/s.csv".into(),
                                 source_dir: Some("/data".into()) };
        assert_eq!(source_path(&p, None), PathBuf::from("/abs/s.csv"));
    }
}
