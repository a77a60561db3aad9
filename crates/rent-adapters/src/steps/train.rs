//! `train`: separa validación de `trainval_data.csv`, ajusta el baseline de
//! medias por grupo y exporta el modelo como JSON.

use log::info;
use rent_core::step::names;
use rent_core::step::spec::TrainParams;
use rent_core::{StepOutput, StepTask};

use super::input;
use super::split::split_indices;
use crate::error::AdapterError;
use crate::frame::Frame;
use crate::model::GroupedMeanModel;

pub const EXPORT_FILE: &str = "model_export.json";

pub fn run(params: &TrainParams, task: &StepTask<'_>) -> Result<StepOutput, AdapterError> {
    let source = input(task, names::TRAINVAL)?;
    let frame = Frame::read_csv(source.path())?;
    let (train_rows, val_rows) = split_indices(&frame, params.val_size, params.random_seed, params.stratify_by.as_deref())?;
    let train = frame.take(&train_rows);
    let val = frame.take(&val_rows);

    let model = GroupedMeanModel::fit(&train, &params.target, &params.group_by, params.smoothing)?;
    let metrics = model.score(&val)?;
    info!("train: {} groups, validation MAE {:.3}, R² {:.3}", model.groups.len(), metrics.mae, metrics.r2);

    let target = task.work_dir.join(EXPORT_FILE);
    std::fs::write(&target, serde_json::to_vec_pretty(&model)?)?;
    Ok(StepOutput::default().with_file(names::MODEL_EXPORT, target)
                            .with_metric("mae", metrics.mae)
                            .with_metric("r2", metrics.r2)
                            .with_metric("train_rows", train.len() as f64)
                            .with_metric("val_rows", val.len() as f64))
}
