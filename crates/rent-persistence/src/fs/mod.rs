//! `FsArtifactStore`: Artifact Store sobre directorios locales.
//!
//! Layout:
//!   {root}/{name}/v{N}/{file_name}       contenido
//!   {root}/{name}/v{N}/meta.json         metadatos (marca la versión como
//!                                        confirmada; se escribe al final)
//!   {root}/{name}/aliases.json           alias vigentes
//!   {root}/{name}/alias_audit.ndjson     un `AliasAssignment` por línea,
//!                                        append-only
//!
//! Las versiones confirmadas son contiguas desde `v0`. Un directorio de
//! versión sin `meta.json` es un `put` interrumpido y se descarta en el
//! siguiente `put`.

use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::{debug, warn};
use rent_core::artifact::{select_version, validate_alias, validate_name, AliasAssignment, ArtifactDraft, ArtifactMeta,
                          ArtifactStore, StoreError, StoredArtifact, VersionSelector};
use rent_core::hashing::sha256_hex;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::StoreConfig;
use crate::error::PersistenceError;

const META_FILE: &str = "meta.json";
const ALIASES_FILE: &str = "aliases.json";
const AUDIT_FILE: &str = "alias_audit.ndjson";

#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        debug!("fs artifact store at {}", root.display());
        Self { root }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.root.clone())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Nombres registrados (orden alfabético).
    pub fn names(&self) -> Result<Vec<String>, StoreError> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&self.root).map_err(PersistenceError::io(&self.root))?;
        let mut names: Vec<String> = entries.filter_map(Result::ok)
                                            .filter(|e| e.path().is_dir())
                                            .filter_map(|e| e.file_name().to_str().map(str::to_string))
                                            .collect();
        names.sort();
        Ok(names)
    }

    /// Historial de movimientos de alias de `name`, en orden de aplicación.
    pub fn alias_audit(&self, name: &str) -> Result<Vec<AliasAssignment>, StoreError> {
        let path = self.collection_dir(name)?.join(AUDIT_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&path).map_err(PersistenceError::io(&path))?;
        let mut out = Vec::new();
        for line in raw.lines().filter(|l| !l.trim().is_empty()) {
            match serde_json::from_str(line) {
                Ok(entry) => out.push(entry),
                Err(e) => warn!("skipping malformed audit line in {}: {e}", path.display()),
            }
        }
        Ok(out)
    }

    fn collection_dir(&self, name: &str) -> Result<PathBuf, StoreError> {
        validate_name(name)?;
        Ok(self.root.join(name))
    }

    fn version_dir(&self, name: &str, version: u32) -> PathBuf {
        self.root.join(name).join(format!("v{version}"))
    }

    /// Cantidad de versiones confirmadas; `UnknownName` si no hay ninguna.
    fn committed_count(&self, name: &str) -> Result<u32, StoreError> {
        let dir = self.collection_dir(name)?;
        let mut n = 0u32;
        while dir.join(format!("v{n}")).join(META_FILE).is_file() {
            n += 1;
        }
        if n == 0 {
            return Err(StoreError::UnknownName(name.to_string()));
        }
        Ok(n)
    }

    fn read_meta(&self, name: &str, version: u32) -> Result<ArtifactMeta, StoreError> {
        read_json(&self.version_dir(name, version).join(META_FILE))
    }

    fn read_aliases(&self, name: &str) -> Result<BTreeMap<String, u32>, StoreError> {
        let path = self.collection_dir(name)?.join(ALIASES_FILE);
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        read_json(&path)
    }
}

impl ArtifactStore for FsArtifactStore {
    fn get(&self, name: &str, selector: &VersionSelector) -> Result<StoredArtifact, StoreError> {
        let count = self.committed_count(name)?;
        let aliases = self.read_aliases(name)?;
        let version = select_version(count, &aliases, selector).ok_or_else(|| StoreError::UnknownSelector { name: name.to_string(),
                                                                                                          selector: selector.to_string() })?;
        let meta = self.read_meta(name, version)?;
        let path = self.version_dir(name, version).join(&meta.file_name);
        let content = fs::read(&path).map_err(PersistenceError::io(&path))?;
        Ok(StoredArtifact { meta, content })
    }

    fn put(&mut self, draft: ArtifactDraft) -> Result<ArtifactMeta, StoreError> {
        let dir = self.collection_dir(&draft.name)?;
        validate_name(&draft.file_name).map_err(|_| StoreError::InvalidName(draft.file_name.clone()))?;
        let version = match self.committed_count(&draft.name) {
            Ok(n) => n,
            Err(StoreError::UnknownName(_)) => 0,
            Err(e) => return Err(e),
        };
        let vdir = dir.join(format!("v{version}"));
        if vdir.exists() {
            warn!("discarding interrupted version {}", vdir.display());
            fs::remove_dir_all(&vdir).map_err(PersistenceError::io(&vdir))?;
        }
        fs::create_dir_all(&vdir).map_err(PersistenceError::io(&vdir))?;

        let content_path = vdir.join(&draft.file_name);
        fs::write(&content_path, &draft.content).map_err(PersistenceError::io(&content_path))?;
        let meta = ArtifactMeta { name: draft.name,
                                  version,
                                  artifact_type: draft.artifact_type,
                                  description: draft.description,
                                  file_name: draft.file_name,
                                  checksum: sha256_hex(&draft.content),
                                  size_bytes: draft.content.len() as u64,
                                  created_at: Utc::now(),
                                  producer: draft.producer };
        write_json_atomic(&vdir.join(META_FILE), &meta)?;
        debug!("put {} into {}", meta.id(), vdir.display());
        Ok(meta)
    }

    fn set_alias(&mut self, name: &str, alias: &str, version: u32, actor: &str) -> Result<AliasAssignment, StoreError> {
        validate_alias(alias)?;
        let count = self.committed_count(name)?;
        if version >= count {
            return Err(StoreError::UnknownSelector { name: name.to_string(),
                                                     selector: format!("v{version}") });
        }
        let mut aliases = self.read_aliases(name)?;
        let previous = aliases.insert(alias.to_string(), version);
        let dir = self.collection_dir(name)?;
        write_json_atomic(&dir.join(ALIASES_FILE), &aliases)?;

        let record = AliasAssignment { name: name.to_string(),
                                       alias: alias.to_string(),
                                       version,
                                       previous,
                                       actor: actor.to_string(),
                                       assigned_at: Utc::now() };
        let audit = dir.join(AUDIT_FILE);
        let line = serde_json::to_string(&record).map_err(PersistenceError::from)?;
        let mut file = OpenOptions::new().create(true)
                                         .append(true)
                                         .open(&audit)
                                         .map_err(PersistenceError::io(&audit))?;
        writeln!(file, "{line}").map_err(PersistenceError::io(&audit))?;
        debug!("alias {name}:{alias} -> v{version} by {actor}");
        Ok(record)
    }

    fn versions(&self, name: &str) -> Result<Vec<ArtifactMeta>, StoreError> {
        let count = self.committed_count(name)?;
        (0..count).map(|v| self.read_meta(name, v)).collect()
    }

    fn aliases(&self, name: &str) -> Result<BTreeMap<String, u32>, StoreError> {
        self.committed_count(name)?;
        self.read_aliases(name)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    let raw = fs::read(path).map_err(PersistenceError::io(path))?;
    serde_json::from_slice(&raw).map_err(|source| {
                                    PersistenceError::Format { path: path.to_path_buf(),
                                                               source }.into()
                                })
}

// Escribe a un temporal y renombra para no dejar JSON truncado.
fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let body = serde_json::to_vec_pretty(value).map_err(PersistenceError::from)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, body).map_err(PersistenceError::io(&tmp))?;
    fs::rename(&tmp, path).map_err(PersistenceError::io(path))?;
    Ok(())
}
