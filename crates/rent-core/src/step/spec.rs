//! Parámetros tipados por step, leídos de la configuración resuelta en el
//! momento en que el step va a invocarse. Una clave requerida ausente sólo
//! rompe la corrida si el step que la pide está seleccionado.

use serde::{Deserialize, Serialize};

use super::{names, ParamSet, StepKind};
use crate::artifact::{ArtifactReference, VersionSelector};
use crate::config::ConfigTree;
use crate::errors::PipelineError;
use crate::gate::{DivergenceBound, GateThresholds, GeoBound, Interval, NumericRangeBound, RowCountBound};

/// Caja geográfica por defecto para la limpieza (Nueva York).
pub const DEFAULT_CLEAN_GEO: GeoBound = GeoBound { longitude: Interval { min: -74.25, max: -73.50 },
                                                   latitude: Interval { min: 40.5, max: 41.2 } };

pub const DEFAULT_TARGET: &str = "price";
pub const DEFAULT_GROUP_BY: [&str; 2] = ["neighbourhood_group", "room_type"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadParams {
    /// Fichero fuente (ruta local, relativa a `source_dir` si existe).
    pub sample: String,
    pub source_dir: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanParams {
    pub input: ArtifactReference,
    pub price: Interval,
    pub geo: GeoBound,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidateParams {
    pub input: ArtifactReference,
    pub reference: Option<ArtifactReference>,
    pub thresholds: GateThresholds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitParams {
    pub input: ArtifactReference,
    pub test_size: f64,
    pub random_seed: u64,
    pub stratify_by: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainParams {
    pub input: ArtifactReference,
    pub val_size: f64,
    pub random_seed: u64,
    pub stratify_by: Option<String>,
    pub target: String,
    pub group_by: Vec<String>,
    /// Peso (en filas) de la media global al suavizar la media de cada grupo.
    pub smoothing: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestParams {
    pub model: ArtifactReference,
    pub test_data: ArtifactReference,
    pub target: String,
}

/// Un step listo para invocar.
#[derive(Debug, Clone, PartialEq)]
pub enum StepSpec {
    Download(DownloadParams),
    Clean(CleanParams),
    Validate(ValidateParams),
    Split(SplitParams),
    Train(TrainParams),
    Test(TestParams),
}

impl StepSpec {
    pub fn from_config(kind: StepKind, config: &ConfigTree) -> Result<Self, PipelineError> {
        Ok(match kind {
            StepKind::Download => Self::Download(DownloadParams { sample: config.require_str("etl.sample")?.to_string(),
                                                                  source_dir: config.optional_str("etl.source_dir")?
                                                                                    .map(str::to_string) }),
            StepKind::Clean => Self::Clean(CleanParams { input: ArtifactReference::latest(names::SAMPLE),
                                                         price: interval(config, "etl.min_price", "etl.max_price")?,
                                                         geo: geo_bounds(config, "etl.geo")?.unwrap_or(DEFAULT_CLEAN_GEO) }),
            StepKind::Validate => Self::Validate(validate_params(config)?),
            StepKind::Split => Self::Split(SplitParams { input: ArtifactReference::latest(names::CLEAN_SAMPLE),
                                                         test_size: fraction(config, "modeling.test_size")?,
                                                         random_seed: config.require_u64("modeling.random_seed")?,
                                                         stratify_by: stratify(config)? }),
            StepKind::Train => Self::Train(train_params(config)?),
            StepKind::Test => Self::Test(TestParams { model: ArtifactReference::new(names::MODEL_EXPORT,
                                                                                    VersionSelector::Alias("prod".into())),
                                                      test_data: ArtifactReference::latest(names::TEST_DATA),
                                                      target: config.optional_str("modeling.target")?
                                                                    .unwrap_or(DEFAULT_TARGET)
                                                                    .to_string() }),
        })
    }

    pub fn kind(&self) -> StepKind {
        match self {
            Self::Download(_) => StepKind::Download,
            Self::Clean(_) => StepKind::Clean,
            Self::Validate(_) => StepKind::Validate,
            Self::Split(_) => StepKind::Split,
            Self::Train(_) => StepKind::Train,
            Self::Test(_) => StepKind::Test,
        }
    }

    /// Referencias que deben existir antes de invocar el step.
    pub fn inputs(&self) -> Vec<ArtifactReference> {
        match self {
            Self::Download(_) => vec![],
            Self::Clean(p) => vec![p.input.clone()],
            Self::Validate(p) => std::iter::once(p.input.clone()).chain(p.reference.clone()).collect(),
            Self::Split(p) => vec![p.input.clone()],
            Self::Train(p) => vec![p.input.clone()],
            Self::Test(p) => vec![p.model.clone(), p.test_data.clone()],
        }
    }

    /// Parámetros en forma plana, tal como cruzan la frontera del step.
    pub fn param_set(&self) -> Result<ParamSet, PipelineError> {
        let value = match self {
            Self::Download(p) => serde_json::to_value(p),
            Self::Clean(p) => serde_json::to_value(p),
            Self::Validate(p) => serde_json::to_value(p),
            Self::Split(p) => serde_json::to_value(p),
            Self::Train(p) => serde_json::to_value(p),
            Self::Test(p) => serde_json::to_value(p),
        }.map_err(|e| PipelineError::config(self.kind().name(), format!("parameters are not serializable: {e}")))?;
        Ok(ParamSet::from_value(&value))
    }
}

fn interval(config: &ConfigTree, min_key: &str, max_key: &str) -> Result<Interval, PipelineError> {
    let min = config.require_f64(min_key)?;
    let max = config.require_f64(max_key)?;
    if min > max {
        return Err(PipelineError::config(max_key, format!("upper bound {max} is below lower bound {min} ({min_key})")));
    }
    Ok(Interval::new(min, max))
}

fn fraction(config: &ConfigTree, key: &str) -> Result<f64, PipelineError> {
    let v = config.require_f64(key)?;
    if v > 0.0 && v < 1.0 {
        Ok(v)
    } else {
        Err(PipelineError::config(key, format!("expected a fraction in (0, 1), found {v}")))
    }
}

// "none" (histórico) equivale a no estratificar.
fn stratify(config: &ConfigTree) -> Result<Option<String>, PipelineError> {
    Ok(config.optional_str("modeling.stratify_by")?
             .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("none"))
             .map(str::to_string))
}

/// Grupo `{prefix}.{min,max}_{longitude,latitude}`: ausente por completo o
/// completo.
fn geo_bounds(config: &ConfigTree, prefix: &str) -> Result<Option<GeoBound>, PipelineError> {
    let keys = ["min_longitude", "max_longitude", "min_latitude", "max_latitude"].map(|k| format!("{prefix}.{k}"));
    if !keys.iter().any(|k| config.contains(k)) {
        return Ok(None);
    }
    Ok(Some(GeoBound::new(interval(config, &keys[0], &keys[1])?, interval(config, &keys[2], &keys[3])?)))
}

fn validate_params(config: &ConfigTree) -> Result<ValidateParams, PipelineError> {
    let min_rows = config.require_u64("data_check.min_rows")?;
    let max_rows = config.require_u64("data_check.max_rows")?;
    if min_rows > max_rows {
        return Err(PipelineError::config("data_check.max_rows", format!("{max_rows} is below data_check.min_rows {min_rows}")));
    }
    let price = interval(config, "data_check.min_price", "data_check.max_price")?;
    let (reference, divergence) = match config.optional_f64("data_check.kl_threshold")? {
        Some(threshold) => {
            let reference = ArtifactReference::parse(config.require_str("data_check.reference")?)?;
            let column = config.require_str("data_check.divergence_column")?;
            (Some(reference), Some(DivergenceBound::new(column, threshold)))
        }
        None => (None, None),
    };
    let thresholds = GateThresholds { row_count: Some(RowCountBound::new(min_rows, max_rows)),
                                      numeric_ranges: vec![NumericRangeBound::new(DEFAULT_TARGET, price.min, price.max)],
                                      geo: geo_bounds(config, "data_check.geo")?,
                                      divergence };
    Ok(ValidateParams { input: ArtifactReference::latest(names::CLEAN_SAMPLE),
                        reference,
                        thresholds })
}

fn train_params(config: &ConfigTree) -> Result<TrainParams, PipelineError> {
    let group_by = config.optional_str_list("modeling.model.group_by")?
                         .unwrap_or_else(|| DEFAULT_GROUP_BY.iter().map(|s| s.to_string()).collect());
    let smoothing = config.optional_f64("modeling.model.smoothing")?.unwrap_or(0.0);
    if smoothing < 0.0 {
        return Err(PipelineError::config("modeling.model.smoothing", "must be non-negative"));
    }
    Ok(TrainParams { input: ArtifactReference::latest(names::TRAINVAL),
                     val_size: fraction(config, "modeling.val_size")?,
                     random_seed: config.require_u64("modeling.random_seed")?,
                     stratify_by: stratify(config)?,
                     target: config.optional_str("modeling.target")?.unwrap_or(DEFAULT_TARGET).to_string(),
                     group_by,
                     smoothing })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigResolver;
    use serde_json::json;

    fn config(doc: serde_json::Value) -> ConfigTree {
        ConfigResolver::new(doc).resolve().unwrap()
    }

    fn full() -> ConfigTree {
        config(json!({
            "etl": {"sample": "sample1.csv", "min_price": 10, "max_price": 350},
            "data_check": {"min_rows": 15000, "max_rows": 1000000, "min_price": 10, "max_price": 350,
                           "kl_threshold": 0.2, "reference": "clean_sample.csv:reference",
                           "divergence_column": "neighbourhood_group"},
            "modeling": {"test_size": 0.2, "val_size": 0.2, "random_seed": 42, "stratify_by": "none"}
        }))
    }

    #[test]
    fn clean_uses_default_geo_box() {
        let StepSpec::Clean(p) = StepSpec::from_config(StepKind::Clean, &full()).unwrap() else { panic!("clean") };
        assert_eq!(p.price, Interval::new(10.0, 350.0));
        assert_eq!(p.geo, DEFAULT_CLEAN_GEO);
        assert_eq!(p.input.to_string(), "sample.csv:latest");
    }

    #[test]
    fn validate_with_divergence_requires_reference_input() {
        let spec = StepSpec::from_config(StepKind::Validate, &full()).unwrap();
        let inputs: Vec<String> = spec.inputs().iter().map(|r| r.to_string()).collect();
        assert_eq!(inputs, vec!["clean_sample.csv:latest", "clean_sample.csv:reference"]);

        let partial = config(json!({"data_check": {"min_rows": 1, "max_rows": 2, "min_price": 1, "max_price": 2,
                                                    "kl_threshold": 0.2}}));
        let err = StepSpec::from_config(StepKind::Validate, &partial).unwrap_err();
        assert!(matches!(err, PipelineError::Config { ref key, .. } if key == "data_check.reference"));
    }

    #[test]
    fn partial_geo_group_is_rejected() {
        let doc = config(json!({"data_check": {"min_rows": 1, "max_rows": 2, "min_price": 1, "max_price": 2,
                                                "geo": {"min_longitude": -74.0}}}));
        let err = StepSpec::from_config(StepKind::Validate, &doc).unwrap_err();
        assert!(matches!(err, PipelineError::Config { ref key, .. } if key == "data_check.geo.max_longitude"));
    }

    #[test]
    fn fractions_and_stratify_are_checked() {
        let StepSpec::Split(p) = StepSpec::from_config(StepKind::Split, &full()).unwrap() else { panic!("split") };
        assert_eq!(p.stratify_by, None);
        let bad = config(json!({"modeling": {"test_size": 1.0, "random_seed": 1}}));
        assert!(StepSpec::from_config(StepKind::Split, &bad).is_err());
    }

    #[test]
    fn missing_keys_only_matter_for_the_requested_step() {
        let only_etl = config(json!({"etl": {"sample": "s.csv", "min_price": 1, "max_price": 2}}));
        assert!(StepSpec::from_config(StepKind::Clean, &only_etl).is_ok());
        assert!(StepSpec::from_config(StepKind::Train, &only_etl).is_err());
    }

    #[test]
    fn param_set_is_flat() {
        let spec = StepSpec::from_config(StepKind::Train, &full()).unwrap();
        let params = spec.param_set().unwrap();
        assert_eq!(params.get("input"), Some(&json!("trainval_data.csv:latest")));
        assert_eq!(params.get("group_by"), Some(&json!("neighbourhood_group,room_type")));
        assert_eq!(params.get("smoothing"), Some(&json!(0.0)));
    }
}
