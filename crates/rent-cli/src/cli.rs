use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rent_core::GatePolicy;

/// Documento de configuración por defecto, relativo al directorio actual.
pub const DEFAULT_CONFIG_PATH: &str = "config/pipeline.json";

#[derive(Debug, Parser)]
#[command(name = "rentflow", version, about = "Rental price pipeline over versioned artifacts")]
pub struct Cli {
    /// Directorio del artifact store (por defecto `RENTFLOW_ARTIFACT_DIR` o `./artifacts`).
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Corre los steps seleccionados en orden canónico.
    Run(RunArgs),
    /// Mueve (o crea) un alias hacia una versión existente.
    Alias(AliasArgs),
    /// Lista versiones y alias de un artifact, o los artifacts del store.
    List(ListArgs),
}

#[derive(Debug, Clone, Default, Args)]
pub struct RunArgs {
    /// Lista separada por comas o `all`; sobreescribe `main.steps`.
    #[arg(long)]
    pub steps: Option<String>,

    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub min_price: Option<f64>,

    #[arg(long)]
    pub max_price: Option<f64>,

    #[arg(long)]
    pub kl_threshold: Option<f64>,

    #[arg(long)]
    pub seed: Option<u64>,

    /// `record` o `enforce`.
    #[arg(long)]
    pub gate_policy: Option<GatePolicy>,

    /// Override arbitrario `seccion.clave=valor`; se aplica al final.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,
}

#[derive(Debug, Clone, Args)]
pub struct AliasArgs {
    #[arg(long)]
    pub artifact: String,

    #[arg(long)]
    pub alias: String,

    /// Versión destino en forma `vN`.
    #[arg(long)]
    pub version: String,

    /// Quién mueve el alias (por defecto `$USER`).
    #[arg(long)]
    pub actor: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    #[arg(long)]
    pub artifact: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_flags_parse() {
        let cli = Cli::try_parse_from(["rentflow", "run", "--steps", "clean,validate", "--min-price", "50", "--gate-policy",
                                       "enforce", "--set", "data_check.min_rows=10", "--set", "etl.sample=s.csv",
                                       "--store", "/tmp/a"]).unwrap();
        assert_eq!(cli.store, Some(PathBuf::from("/tmp/a")));
        let Command::Run(args) = cli.command else { panic!("expected run") };
        assert_eq!(args.steps.as_deref(), Some("clean,validate"));
        assert_eq!(args.min_price, Some(50.0));
        assert_eq!(args.gate_policy, Some(GatePolicy::Enforce));
        assert_eq!(args.overrides.len(), 2);
    }

    #[test]
    fn unknown_gate_policy_is_a_usage_error() {
        assert!(Cli::try_parse_from(["rentflow", "run", "--gate-policy", "sometimes"]).is_err());
    }

    #[test]
    fn alias_requires_all_three_flags() {
        assert!(Cli::try_parse_from(["rentflow", "alias", "--artifact", "model_export", "--alias", "prod"]).is_err());
    }
}
