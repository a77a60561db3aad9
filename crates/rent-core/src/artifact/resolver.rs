//! Artifact Reference Resolver: `name:selector` → `ArtifactHandle`.

use std::collections::BTreeMap;

use log::debug;

use super::{ArtifactHandle, ArtifactReference, ArtifactStore, StepScratch, StoreError};
use crate::errors::PipelineError;
use crate::hashing::sha256_hex;

/// Resuelve y materializa referencias para una única invocación de step.
///
/// Cada referencia se resuelve como máximo una vez: pedirla de nuevo devuelve
/// el handle fijado, aunque el alias se haya movido en el store mientras tanto.
pub struct ArtifactResolver<'a> {
    store: &'a dyn ArtifactStore,
    scratch: &'a StepScratch,
    pinned: BTreeMap<ArtifactReference, ArtifactHandle>,
}

impl<'a> ArtifactResolver<'a> {
    pub fn new(store: &'a dyn ArtifactStore, scratch: &'a StepScratch) -> Self {
        Self { store,
               scratch,
               pinned: BTreeMap::new() }
    }

    pub fn resolve(&mut self, raw: &str) -> Result<ArtifactHandle, PipelineError> {
        let reference = ArtifactReference::parse(raw)?;
        self.resolve_reference(&reference)
    }

    pub fn resolve_reference(&mut self, reference: &ArtifactReference) -> Result<ArtifactHandle, PipelineError> {
        if let Some(handle) = self.pinned.get(reference) {
            return Ok(handle.clone());
        }
        let stored = self.store.get(&reference.name, &reference.selector).map_err(|e| not_found(reference, e))?;
        if sha256_hex(&stored.content) != stored.meta.checksum {
            return Err(StoreError::Corrupted(stored.meta.id().to_string()).into());
        }
        let dir = self.scratch
                      .inputs_dir()
                      .join(format!("{}-v{}", stored.meta.name, stored.meta.version));
        std::fs::create_dir_all(&dir)?;
        let local_path = dir.join(&stored.meta.file_name);
        std::fs::write(&local_path, &stored.content)?;
        debug!("resolved {reference} -> {} at {}", stored.meta.id(), local_path.display());
        let handle = ArtifactHandle { requested: reference.clone(),
                                      meta: stored.meta,
                                      local_path };
        self.pinned.insert(reference.clone(), handle.clone());
        Ok(handle)
    }

    /// Handles resueltos en esta invocación.
    pub fn pinned(&self) -> impl Iterator<Item = &ArtifactHandle> {
        self.pinned.values()
    }
}

// Un miss del store se reporta con la referencia completa pedida.
fn not_found(reference: &ArtifactReference, err: StoreError) -> PipelineError {
    match err {
        StoreError::UnknownName(_) | StoreError::UnknownSelector { .. } => {
            PipelineError::ArtifactNotFound { reference: reference.to_string() }
        }
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::{ArtifactDraft, InMemoryArtifactStore};
    use crate::step::StepKind;

    fn seeded() -> InMemoryArtifactStore {
        let mut store = InMemoryArtifactStore::new();
        for content in ["price\n10\n", "price\n20\n"] {
            store.put(ArtifactDraft { name: "clean_sample.csv".into(),
                                      artifact_type: "cleaned_data".into(),
                                      description: "clean".into(),
                                      file_name: "clean_sample.csv".into(),
                                      content: content.as_bytes().to_vec(),
                                      producer: None })
                 .unwrap();
        }
        store
    }

    #[test]
    fn materializes_content_into_scratch() {
        let store = seeded();
        let scratch = StepScratch::new(None, StepKind::Validate).unwrap();
        let mut resolver = ArtifactResolver::new(&store, &scratch);
        let handle = resolver.resolve("clean_sample.csv:v0").unwrap();
        assert_eq!(handle.meta.version, 0);
        assert!(handle.path().starts_with(scratch.path()));
        assert_eq!(std::fs::read_to_string(handle.path()).unwrap(), "price\n10\n");
    }

    #[test]
    fn same_reference_is_pinned_within_an_invocation() {
        let store = seeded();
        let scratch = StepScratch::new(None, StepKind::Validate).unwrap();
        let mut resolver = ArtifactResolver::new(&store, &scratch);
        let first = resolver.resolve("clean_sample.csv:latest").unwrap();
        let second = resolver.resolve("clean_sample.csv:latest").unwrap();
        assert_eq!(first.id(), second.id());
        assert_eq!(resolver.pinned().count(), 1);
    }

    #[test]
    fn misses_carry_the_full_reference() {
        let store = seeded();
        let scratch = StepScratch::new(None, StepKind::Validate).unwrap();
        let mut resolver = ArtifactResolver::new(&store, &scratch);
        let err = resolver.resolve("clean_sample.csv:reference").unwrap_err();
        assert!(matches!(err, PipelineError::ArtifactNotFound { ref reference } if reference == "clean_sample.csv:reference"));
        let err = resolver.resolve("sample.csv:latest").unwrap_err();
        assert!(matches!(err, PipelineError::ArtifactNotFound { ref reference } if reference == "sample.csv:latest"));
        assert!(matches!(resolver.resolve("clean_sample.csv"), Err(PipelineError::MalformedReference { .. })));
        assert_eq!(resolver.pinned().count(), 0);
    }
}
