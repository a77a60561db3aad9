//! Constantes del orquestador.
//!
//! `ENGINE_VERSION` participa en el cálculo de fingerprints de step y de run:
//! un cambio de versión invalida determinísticamente los fingerprints aunque
//! la configuración y los datos no cambien.

/// Versión lógica del orquestador. Mantener estable mientras no haya cambios
/// incompatibles en el orden de steps o en el modelo de fingerprint.
pub const ENGINE_VERSION: &str = "R1.0";

/// Token que selecciona todos los steps definidos.
pub const ALL_STEPS_TOKEN: &str = "all";

/// Prefijo de variables de entorno que sobreescriben la configuración.
pub const ENV_OVERRIDE_PREFIX: &str = "RENTFLOW__";
