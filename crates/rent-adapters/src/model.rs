//! Baseline de precio: media del target por grupo categórico, suavizada
//! hacia la media global.
//!
//! La exportación es JSON estable (grupos ordenados por clave) para que dos
//! entrenamientos con los mismos datos produzcan el mismo checksum.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::AdapterError;
use crate::frame::Frame;

pub const MODEL_KIND: &str = "grouped_mean";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    pub key: Vec<String>,
    pub mean: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedMeanModel {
    pub kind: String,
    pub target: String,
    pub group_by: Vec<String>,
    pub smoothing: f64,
    pub global_mean: f64,
    pub groups: Vec<GroupStats>,
}

impl GroupedMeanModel {
    /// Ajusta el modelo sobre las filas de `frame` con target numérico.
    pub fn fit(frame: &Frame, target: &str, group_by: &[String], smoothing: f64) -> Result<Self, AdapterError> {
        let t = frame.column_index(target)?;
        let cols = group_by.iter().map(|g| frame.column_index(g)).collect::<Result<Vec<_>, _>>()?;

        let mut sums: BTreeMap<Vec<String>, (f64, usize)> = BTreeMap::new();
        let (mut total, mut n) = (0.0, 0usize);
        for row in 0..frame.len() {
            let Some(y) = frame.number(row, t) else { continue };
            let key: Vec<String> = cols.iter().map(|&c| frame.cell(row, c).to_string()).collect();
            let entry = sums.entry(key).or_insert((0.0, 0));
            entry.0 += y;
            entry.1 += 1;
            total += y;
            n += 1;
        }
        if n == 0 {
            return Err(AdapterError::Empty(format!("no numeric values in '{target}'")));
        }
        let global_mean = total / n as f64;
        let groups = sums.into_iter()
                         .map(|(key, (sum, count))| GroupStats { key,
                                                                 mean: (sum + smoothing * global_mean) / (count as f64 + smoothing),
                                                                 count })
                         .collect();
        Ok(Self { kind: MODEL_KIND.to_string(),
                  target: target.to_string(),
                  group_by: group_by.to_vec(),
                  smoothing,
                  global_mean,
                  groups })
    }

    pub fn predict_key(&self, key: &[String]) -> f64 {
        self.groups
            .binary_search_by(|g| g.key.as_slice().cmp(key))
            .map(|i| self.groups[i].mean)
            .unwrap_or(self.global_mean)
    }

    /// Pares `(observado, predicho)` para las filas con target numérico.
    pub fn score(&self, frame: &Frame) -> Result<RegressionMetrics, AdapterError> {
        let t = frame.column_index(&self.target)?;
        let cols = self.group_by.iter().map(|g| frame.column_index(g)).collect::<Result<Vec<_>, _>>()?;
        let pairs: Vec<(f64, f64)> = (0..frame.len()).filter_map(|row| {
                                                         let y = frame.number(row, t)?;
                                                         let key: Vec<String> =
                                                             cols.iter().map(|&c| frame.cell(row, c).to_string()).collect();
                                                         Some((y, self.predict_key(&key)))
                                                     })
                                                     .collect();
        RegressionMetrics::from_pairs(&pairs).ok_or_else(|| AdapterError::Empty(format!("no numeric values in '{}'", self.target)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub mae: f64,
    pub r2: f64,
    pub rows: usize,
}

impl RegressionMetrics {
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Option<Self> {
        if pairs.is_empty() {
            return None;
        }
        let n = pairs.len() as f64;
        let mean = pairs.iter().map(|(y, _)| y).sum::<f64>() / n;
        let mae = pairs.iter().map(|(y, p)| (y - p).abs()).sum::<f64>() / n;
        let ss_res: f64 = pairs.iter().map(|(y, p)| (y - p).powi(2)).sum();
        let ss_tot: f64 = pairs.iter().map(|(y, _)| (y - mean).powi(2)).sum();
        // sin varianza en el target R² no está definido
        let r2 = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 0.0 };
        Some(Self { mae,
                    r2,
                    rows: pairs.len() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Frame {
        let mut f = Frame::new(["room_type", "price"]);
        for (room, price) in [("Private room", "50"), ("Private room", "70"), ("Entire home/apt", "200"), ("Shared room", "x")] {
            f.push_row(vec![room.into(), price.into()]);
        }
        f
    }

    #[test]
    fn group_means_and_fallback() {
        let model = GroupedMeanModel::fit(&frame(), "price", &["room_type".to_string()], 0.0).unwrap();
        assert_eq!(model.groups.len(), 2);
        assert!((model.global_mean - 320.0 / 3.0).abs() < 1e-9);
        assert_eq!(model.predict_key(&["Private room".to_string()]), 60.0);
        assert_eq!(model.predict_key(&["Hotel room".to_string()]), model.global_mean);
    }

    #[test]
    fn smoothing_pulls_towards_global_mean() {
        let raw = GroupedMeanModel::fit(&frame(), "price", &["room_type".to_string()], 0.0).unwrap();
        let smooth = GroupedMeanModel::fit(&frame(), "price", &["room_type".to_string()], 2.0).unwrap();
        let key = ["Entire home/apt".to_string()];
        assert!(smooth.predict_key(&key) < raw.predict_key(&key));
        assert!(smooth.predict_key(&key) > raw.global_mean);
    }

    #[test]
    fn metrics_on_perfect_and_constant_predictions() {
        let perfect = RegressionMetrics::from_pairs(&[(1.0, 1.0), (3.0, 3.0)]).unwrap();
        assert_eq!((perfect.mae, perfect.r2), (0.0, 1.0));
        let mean_only = RegressionMetrics::from_pairs(&[(1.0, 2.0), (3.0, 2.0)]).unwrap();
        assert_eq!((mean_only.mae, mean_only.r2), (1.0, 0.0));
        assert!(RegressionMetrics::from_pairs(&[]).is_none());
    }
}
