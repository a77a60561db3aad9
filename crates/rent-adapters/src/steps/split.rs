//! `split`: particiona `clean_sample.csv` en `trainval_data.csv` y
//! `test_data.csv`, con semilla fija y estratificación opcional.

use std::collections::BTreeMap;

use log::info;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rent_core::step::names;
use rent_core::step::spec::SplitParams;
use rent_core::{StepOutput, StepTask};

use super::input;
use crate::error::AdapterError;
use crate::frame::Frame;

/// Índices `(resto, holdout)` ordenados. Con `stratify_by`, cada estrato
/// aporta al holdout la misma fracción (redondeada) de sus filas.
pub fn split_indices(frame: &Frame,
                     holdout: f64,
                     seed: u64,
                     stratify_by: Option<&str>)
                     -> Result<(Vec<usize>, Vec<usize>), AdapterError> {
    let mut strata: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    match stratify_by {
        Some(column) => {
            let c = frame.column_index(column)?;
            for row in 0..frame.len() {
                strata.entry(frame.cell(row, c)).or_default().push(row);
            }
        }
        None => {
            strata.insert("", (0..frame.len()).collect());
        }
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let (mut rest, mut held) = (Vec::new(), Vec::new());
    for (_, mut rows) in strata {
        rows.shuffle(&mut rng);
        let n_held = ((rows.len() as f64) * holdout).round() as usize;
        let (h, r) = rows.split_at(n_held.min(rows.len()));
        held.extend_from_slice(h);
        rest.extend_from_slice(r);
    }
    rest.sort_unstable();
    held.sort_unstable();
    Ok((rest, held))
}

pub fn run(params: &SplitParams, task: &StepTask<'_>) -> Result<StepOutput, AdapterError> {
    let source = input(task, names::CLEAN_SAMPLE)?;
    let frame = Frame::read_csv(source.path())?;
    let (trainval, test) = split_indices(&frame, params.test_size, params.random_seed, params.stratify_by.as_deref())?;
    info!("split {} rows into {} trainval / {} test", frame.len(), trainval.len(), test.len());

    let trainval_path = task.work_dir.join(names::TRAINVAL);
    let test_path = task.work_dir.join(names::TEST_DATA);
    frame.take(&trainval).write_csv(&trainval_path)?;
    frame.take(&test).write_csv(&test_path)?;
    Ok(StepOutput::default().with_file(names::TRAINVAL, trainval_path)
                            .with_file(names::TEST_DATA, test_path)
                            .with_metric("trainval_rows", trainval.len() as f64)
                            .with_metric("test_rows", test.len() as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(n: usize) -> Frame {
        let mut f = Frame::new(["id", "room_type"]);
        for i in 0..n {
            let room = if i % 4 == 0 { "Shared room" } else { "Private room" };
            f.push_row(vec![i.to_string(), room.to_string()]);
        }
        f
    }

    #[test]
    fn partitions_are_disjoint_and_complete() {
        let f = frame(100);
        let (rest, held) = split_indices(&f, 0.2, 42, None).unwrap();
        assert_eq!(held.len(), 20);
        assert_eq!(rest.len(), 80);
        let mut all: Vec<usize> = rest.iter().chain(&held).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn same_seed_same_split() {
        let f = frame(50);
        assert_eq!(split_indices(&f, 0.3, 7, None).unwrap(), split_indices(&f, 0.3, 7, None).unwrap());
        assert_ne!(split_indices(&f, 0.3, 7, None).unwrap(), split_indices(&f, 0.3, 8, None).unwrap());
    }

    #[test]
    fn stratification_preserves_proportions() {
        let f = frame(100);
        let (_, held) = split_indices(&f, 0.2, 1, Some("room_type")).unwrap();
        let shared = held.iter().filter(|&&i| f.cell(i, 1) == "Shared room").count();
        assert_eq!(shared, 5);
        assert_eq!(held.len(), 20);
        assert!(split_indices(&f, 0.2, 1, Some("neighbourhood")).is_err());
    }
}
