//! rent-persistence
//!
//! Artifact Store sobre el sistema de ficheros local.
//!
//! Módulos:
//! - `fs`: `FsArtifactStore` (versiones inmutables, alias y auditoría).
//! - `config`: ubicación del store desde el entorno / `.env`.
//! - `error`: errores de E/S y formato, mapeados a `StoreError`.

pub mod config;
pub mod error;
pub mod fs;

pub use config::{init_dotenv, StoreConfig};
pub use error::PersistenceError;
pub use fs::FsArtifactStore;
