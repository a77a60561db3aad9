use std::fmt;

use serde::{Deserialize, Serialize};

/// Nombres de los artifacts que producen y consumen los steps.
pub mod names {
    pub const SAMPLE: &str = "sample.csv";
    pub const CLEAN_SAMPLE: &str = "clean_sample.csv";
    pub const TRAINVAL: &str = "trainval_data.csv";
    pub const TEST_DATA: &str = "test_data.csv";
    pub const MODEL_EXPORT: &str = "model_export";
}

/// Output declarado por un step: nombre, tipo y descripción con los que se
/// registra en el store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OutputDecl {
    pub name: &'static str,
    pub artifact_type: &'static str,
    pub description: &'static str,
}

const DOWNLOAD_OUTPUTS: &[OutputDecl] = &[OutputDecl { name: names::SAMPLE,
                                                       artifact_type: "raw_data",
                                                       description: "Raw file as downloaded" }];
const CLEAN_OUTPUTS: &[OutputDecl] = &[OutputDecl { name: names::CLEAN_SAMPLE,
                                                    artifact_type: "cleaned_data",
                                                    description: "Data cleaned of outliers and bad values" }];
const SPLIT_OUTPUTS: &[OutputDecl] = &[OutputDecl { name: names::TRAINVAL,
                                                    artifact_type: "split_data",
                                                    description: "Train and validation rows" },
                                       OutputDecl { name: names::TEST_DATA,
                                                    artifact_type: "split_data",
                                                    description: "Held-out test rows" }];
const TRAIN_OUTPUTS: &[OutputDecl] = &[OutputDecl { name: names::MODEL_EXPORT,
                                                    artifact_type: "model_export",
                                                    description: "Grouped-mean price model export" }];

/// Steps conocidos. El orden de declaración es el orden canónico de
/// ejecución y no depende del orden en que el usuario los pida.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Download,
    Clean,
    Validate,
    Split,
    Train,
    Test,
}

impl StepKind {
    /// Secuencia canónica completa.
    pub const SEQUENCE: [StepKind; 6] = [Self::Download, Self::Clean, Self::Validate, Self::Split, Self::Train, Self::Test];

    /// Steps que selecciona `all`. `test` sólo corre si se pide por nombre
    /// (requiere un modelo promovido a `prod`).
    pub const DEFAULT_SET: [StepKind; 5] = [Self::Download, Self::Clean, Self::Validate, Self::Split, Self::Train];

    pub fn name(self) -> &'static str {
        match self {
            Self::Download => "download",
            Self::Clean => "clean",
            Self::Validate => "validate",
            Self::Split => "split",
            Self::Train => "train",
            Self::Test => "test",
        }
    }

    /// Acepta el nombre corto y el nombre largo histórico de cada step.
    pub fn from_name(raw: &str) -> Option<Self> {
        match raw {
            "download" | "get_data" => Some(Self::Download),
            "clean" | "basic_cleaning" => Some(Self::Clean),
            "validate" | "data_check" => Some(Self::Validate),
            "split" | "data_split" | "train_val_test_split" => Some(Self::Split),
            "train" | "train_random_forest" => Some(Self::Train),
            "test" | "test_regression_model" => Some(Self::Test),
            _ => None,
        }
    }

    /// Posición en la secuencia canónica.
    pub fn ordinal(self) -> usize {
        self as usize
    }

    pub fn declared_outputs(self) -> &'static [OutputDecl] {
        match self {
            Self::Download => DOWNLOAD_OUTPUTS,
            Self::Clean => CLEAN_OUTPUTS,
            Self::Split => SPLIT_OUTPUTS,
            Self::Train => TRAIN_OUTPUTS,
            Self::Validate | Self::Test => &[],
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
