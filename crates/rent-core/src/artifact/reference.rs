use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::PipelineError;

/// Selector de versión: explícito (`v3`), `latest` o alias con nombre.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VersionSelector {
    Version(u32),
    /// Alias `latest` asignado explícitamente o, en su defecto, la versión más
    /// reciente.
    Latest,
    Alias(String),
}

impl VersionSelector {
    pub fn parse(raw: &str) -> Self {
        if raw == "latest" {
            return Self::Latest;
        }
        match raw.strip_prefix('v').map(str::parse::<u32>) {
            Some(Ok(n)) => Self::Version(n),
            _ => Self::Alias(raw.to_string()),
        }
    }
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Version(n) => write!(f, "v{n}"),
            Self::Latest => f.write_str("latest"),
            Self::Alias(a) => f.write_str(a),
        }
    }
}

/// Referencia humana `name:selector`. El nombre puede contener `.`
/// (`clean_sample.csv:latest`); se separa en el último `:`. Se serializa en
/// su forma textual.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArtifactReference {
    pub name: String,
    pub selector: VersionSelector,
}

impl ArtifactReference {
    pub fn new(name: impl Into<String>, selector: VersionSelector) -> Self {
        Self { name: name.into(),
               selector }
    }

    pub fn latest(name: impl Into<String>) -> Self {
        Self::new(name, VersionSelector::Latest)
    }

    pub fn parse(raw: &str) -> Result<Self, PipelineError> {
        let malformed = || PipelineError::MalformedReference { reference: raw.to_string() };
        let (name, selector) = raw.trim().rsplit_once(':').ok_or_else(malformed)?;
        if name.is_empty() || selector.is_empty() {
            return Err(malformed());
        }
        Ok(Self::new(name, VersionSelector::parse(selector)))
    }
}

impl FromStr for ArtifactReference {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ArtifactReference {
    type Error = PipelineError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ArtifactReference> for String {
    fn from(value: ArtifactReference) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ArtifactReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.selector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_name_and_selector() {
        let r = ArtifactReference::parse("clean_sample.csv:latest").unwrap();
        assert_eq!(r.name, "clean_sample.csv");
        assert_eq!(r.selector, VersionSelector::Latest);

        let r: ArtifactReference = "model_export:prod".parse().unwrap();
        assert_eq!(r.selector, VersionSelector::Alias("prod".into()));

        let r = ArtifactReference::parse("sample.csv:v12").unwrap();
        assert_eq!(r.selector, VersionSelector::Version(12));
        assert_eq!(r.to_string(), "sample.csv:v12");
    }

    #[test]
    fn missing_separator_is_malformed() {
        for raw in ["clean_sample.csv", ":latest", "clean_sample.csv:", ""] {
            let err = ArtifactReference::parse(raw).unwrap_err();
            assert!(matches!(err, PipelineError::MalformedReference { .. }), "{raw} should be malformed");
        }
    }

    #[test]
    fn non_numeric_v_prefix_is_an_alias() {
        assert_eq!(VersionSelector::parse("validated"), VersionSelector::Alias("validated".into()));
    }
}
