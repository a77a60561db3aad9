use std::collections::BTreeMap;

use chrono::Utc;

use super::store::{select_version, validate_alias, validate_name};
use super::{AliasAssignment, ArtifactDraft, ArtifactMeta, ArtifactStore, StoreError, StoredArtifact, VersionSelector};
use crate::hashing::sha256_hex;

#[derive(Debug, Default, Clone)]
struct Collection {
    versions: Vec<StoredArtifact>,
    aliases: BTreeMap<String, u32>,
}

/// Store en memoria (tests y corridas efímeras).
#[derive(Debug, Default, Clone)]
pub struct InMemoryArtifactStore {
    collections: BTreeMap<String, Collection>,
    audit: Vec<AliasAssignment>,
}

impl InMemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Historial de movimientos de alias (orden de aplicación).
    pub fn alias_audit(&self) -> &[AliasAssignment] {
        &self.audit
    }

    fn collection(&self, name: &str) -> Result<&Collection, StoreError> {
        self.collections
            .get(name)
            .ok_or_else(|| StoreError::UnknownName(name.to_string()))
    }
}

impl ArtifactStore for InMemoryArtifactStore {
    fn get(&self, name: &str, selector: &VersionSelector) -> Result<StoredArtifact, StoreError> {
        let col = self.collection(name)?;
        let miss = || StoreError::UnknownSelector { name: name.to_string(),
                                                    selector: selector.to_string() };
        let version = select_version(col.versions.len() as u32, &col.aliases, selector).ok_or_else(miss)?;
        col.versions.get(version as usize).cloned().ok_or_else(miss)
    }

    fn put(&mut self, draft: ArtifactDraft) -> Result<ArtifactMeta, StoreError> {
        validate_name(&draft.name)?;
        let col = self.collections.entry(draft.name.clone()).or_default();
        let meta = ArtifactMeta { name: draft.name,
                                  version: col.versions.len() as u32,
                                  artifact_type: draft.artifact_type,
                                  description: draft.description,
                                  file_name: draft.file_name,
                                  checksum: sha256_hex(&draft.content),
                                  size_bytes: draft.content.len() as u64,
                                  created_at: Utc::now(),
                                  producer: draft.producer };
        col.versions.push(StoredArtifact { meta: meta.clone(),
                                           content: draft.content });
        Ok(meta)
    }

    fn set_alias(&mut self, name: &str, alias: &str, version: u32, actor: &str) -> Result<AliasAssignment, StoreError> {
        validate_alias(alias)?;
        let col = self.collections
                      .get_mut(name)
                      .ok_or_else(|| StoreError::UnknownName(name.to_string()))?;
        if version as usize >= col.versions.len() {
            return Err(StoreError::UnknownSelector { name: name.to_string(),
                                                     selector: format!("v{version}") });
        }
        let previous = col.aliases.insert(alias.to_string(), version);
        let record = AliasAssignment { name: name.to_string(),
                                       alias: alias.to_string(),
                                       version,
                                       previous,
                                       actor: actor.to_string(),
                                       assigned_at: Utc::now() };
        self.audit.push(record.clone());
        Ok(record)
    }

    fn versions(&self, name: &str) -> Result<Vec<ArtifactMeta>, StoreError> {
        Ok(self.collection(name)?.versions.iter().map(|v| v.meta.clone()).collect())
    }

    fn aliases(&self, name: &str) -> Result<BTreeMap<String, u32>, StoreError> {
        Ok(self.collection(name)?.aliases.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, content: &str) -> ArtifactDraft {
        ArtifactDraft { name: name.to_string(),
                        artifact_type: "cleaned_data".to_string(),
                        description: "test".to_string(),
                        file_name: name.to_string(),
                        content: content.as_bytes().to_vec(),
                        producer: None }
    }

    #[test]
    fn each_put_creates_a_new_version_without_moving_aliases() {
        let mut store = InMemoryArtifactStore::new();
        let v0 = store.put(draft("clean_sample.csv", "a")).unwrap();
        store.set_alias("clean_sample.csv", "reference", v0.version, "tester").unwrap();
        let v1 = store.put(draft("clean_sample.csv", "a")).unwrap();
        assert_eq!((v0.version, v1.version), (0, 1));
        assert_eq!(store.aliases("clean_sample.csv").unwrap().get("reference"), Some(&0));

        let latest = store.get("clean_sample.csv", &VersionSelector::Latest).unwrap();
        assert_eq!(latest.meta.version, 1);
        let reference = store.get("clean_sample.csv", &VersionSelector::Alias("reference".into())).unwrap();
        assert_eq!(reference.meta.version, 0);
    }

    #[test]
    fn alias_moves_are_audited() {
        let mut store = InMemoryArtifactStore::new();
        store.put(draft("model_export", "m0")).unwrap();
        store.put(draft("model_export", "m1")).unwrap();
        store.set_alias("model_export", "prod", 0, "ops").unwrap();
        let moved = store.set_alias("model_export", "prod", 1, "ops").unwrap();
        assert_eq!(moved.previous, Some(0));
        assert_eq!(store.alias_audit().len(), 2);
        assert!(store.set_alias("model_export", "prod", 9, "ops").is_err());
    }

    #[test]
    fn unknown_alias_is_a_lookup_miss() {
        let mut store = InMemoryArtifactStore::new();
        store.put(draft("clean_sample.csv", "a")).unwrap();
        let err = store.get("clean_sample.csv", &VersionSelector::Alias("reference".into())).unwrap_err();
        assert!(matches!(err, StoreError::UnknownSelector { .. }));
        assert!(matches!(store.get("nope", &VersionSelector::Latest), Err(StoreError::UnknownName(_))));
    }
}
