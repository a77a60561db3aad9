use std::collections::BTreeSet;

use crate::constants::ALL_STEPS_TOKEN;
use crate::errors::PipelineError;
use crate::step::StepKind;

pub const STEPS_KEY: &str = "main.steps";

/// Conjunto activo de steps. El orden de iteración es siempre el canónico,
/// independiente del orden en que se pidieron.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepSelection {
    steps: BTreeSet<StepKind>,
}

impl StepSelection {
    /// `all` o lista separada por comas. Un nombre desconocido invalida la
    /// selección completa.
    pub fn parse(raw: &str) -> Result<Self, PipelineError> {
        Self::from_names(raw.split(','))
    }

    pub fn from_names<I, S>(names: I) -> Result<Self, PipelineError>
        where I: IntoIterator<Item = S>,
              S: AsRef<str>
    {
        let mut steps = BTreeSet::new();
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            if name == ALL_STEPS_TOKEN {
                steps.extend(StepKind::DEFAULT_SET);
                continue;
            }
            let kind = StepKind::from_name(name).ok_or_else(|| PipelineError::config(STEPS_KEY, format!("unknown step '{name}'")))?;
            steps.insert(kind);
        }
        if steps.is_empty() {
            return Err(PipelineError::config(STEPS_KEY, "no steps selected"));
        }
        Ok(Self { steps })
    }

    pub fn contains(&self, kind: StepKind) -> bool {
        self.steps.contains(&kind)
    }

    pub fn ordered(&self) -> Vec<StepKind> {
        self.steps.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_is_canonical() {
        let s = StepSelection::parse("train, clean ,validate").unwrap();
        assert_eq!(s.ordered(), vec![StepKind::Clean, StepKind::Validate, StepKind::Train]);
    }

    #[test]
    fn all_token_excludes_test() {
        let s = StepSelection::parse("all").unwrap();
        assert_eq!(s.ordered(), StepKind::DEFAULT_SET.to_vec());
        assert!(!s.contains(StepKind::Test));
        assert!(StepSelection::parse("all,test").unwrap().contains(StepKind::Test));
    }

    #[test]
    fn unknown_or_empty_selection_is_rejected() {
        let err = StepSelection::parse("clean,bogus").unwrap_err();
        assert!(err.to_string().contains("bogus"));
        assert!(StepSelection::parse(" , ").is_err());
    }

    #[test]
    fn synonyms_and_duplicates_collapse() {
        let s = StepSelection::parse("basic_cleaning,clean,data_check").unwrap();
        assert_eq!(s.ordered(), vec![StepKind::Clean, StepKind::Validate]);
    }
}
