//! `test`: evalúa el modelo promovido (`model_export:prod`) sobre
//! `test_data.csv`. No registra artifacts, sólo métricas.

use log::info;
use rent_core::step::names;
use rent_core::step::spec::TestParams;
use rent_core::{StepOutput, StepTask};

use super::input;
use crate::error::AdapterError;
use crate::frame::Frame;
use crate::model::GroupedMeanModel;

pub fn run(params: &TestParams, task: &StepTask<'_>) -> Result<StepOutput, AdapterError> {
    let model_file = input(task, names::MODEL_EXPORT)?;
    let data = input(task, names::TEST_DATA)?;
    let raw = std::fs::read(model_file.path()).map_err(|source| AdapterError::Read { path: model_file.path().to_path_buf(),
                                                                                      source })?;
    let mut model: GroupedMeanModel = serde_json::from_slice(&raw)?;
    model.target = params.target.clone();
    let metrics = model.score(&Frame::read_csv(data.path())?)?;
    info!("test of {}: MAE {:.3}, R² {:.3} over {} rows", model_file.id(), metrics.mae, metrics.r2, metrics.rows);
    Ok(StepOutput::default().with_metric("mae", metrics.mae)
                            .with_metric("r2", metrics.r2)
                            .with_metric("rows", metrics.rows as f64))
}
