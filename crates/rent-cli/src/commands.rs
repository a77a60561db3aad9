//! Comandos del binario. Cada uno escribe su salida en `out` y devuelve
//! `CliError` para que `main` decida el código de salida.

use std::io::Write;
use std::path::{Path, PathBuf};

use rent_adapters::LocalStepRunner;
use rent_core::artifact::{ArtifactStore, VersionSelector};
use rent_core::engine::GatePolicy;
use rent_core::{ConfigResolver, ConfigTree, Orchestrator, PipelineError, RunReport, RunStatus};
use rent_persistence::{FsArtifactStore, StoreConfig};
use serde_json::json;
use tracing::{debug, info};

use crate::cli::{AliasArgs, Cli, Command, ListArgs, RunArgs, DEFAULT_CONFIG_PATH};
use crate::error::CliError;

/// Ejecuta `cli`. `env` son las variables de entorno visibles para los
/// overrides `RENTFLOW__*`.
pub fn execute<I, W>(cli: Cli, env: I, out: &mut W) -> Result<(), CliError>
    where I: IntoIterator<Item = (String, String)>,
          W: Write
{
    let store = match cli.store {
        Some(root) => StoreConfig { root },
        None => StoreConfig::from_env(),
    };
    debug!("artifact store at {}", store.root.display());
    match cli.command {
        Command::Run(args) => run(&args, env, &store, out),
        Command::Alias(args) => alias(&args, &store, out),
        Command::List(args) => list(&args, &store, out),
    }
}

/// Precedencia: documento base < entorno < flags < `--set`.
pub fn resolve_config<I>(args: &RunArgs, env: I) -> Result<ConfigTree, PipelineError>
    where I: IntoIterator<Item = (String, String)>
{
    let path = config_path(args);
    let mut resolver = ConfigResolver::from_file(&path)?.with_env_overrides(env);
    let flags = [("main.steps", args.steps.clone().map(|s| json!(s))),
                 // un mismo rango de precios limpia y valida
                 ("etl.min_price", args.min_price.map(|v| json!(v))),
                 ("etl.max_price", args.max_price.map(|v| json!(v))),
                 ("data_check.min_price", args.min_price.map(|v| json!(v))),
                 ("data_check.max_price", args.max_price.map(|v| json!(v))),
                 ("data_check.kl_threshold", args.kl_threshold.map(|v| json!(v))),
                 ("modeling.random_seed", args.seed.map(|v| json!(v))),
                 (GatePolicy::CONFIG_KEY, args.gate_policy.map(|p| json!(p.to_string())))];
    for (key, value) in flags {
        if let Some(value) = value {
            resolver = resolver.with_override(key, value);
        }
    }
    for assignment in &args.overrides {
        resolver = resolver.with_assignment(assignment)?;
    }
    resolver.resolve()
}

fn config_path(args: &RunArgs) -> PathBuf {
    args.config.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

fn run<I, W>(args: &RunArgs, env: I, store: &StoreConfig, out: &mut W) -> Result<(), CliError>
    where I: IntoIterator<Item = (String, String)>,
          W: Write
{
    let config = resolve_config(args, env)?;
    // fuentes relativas de `download` se resuelven junto al documento
    let base_dir = config_path(args).parent()
                                    .filter(|p| !p.as_os_str().is_empty())
                                    .map(Path::to_path_buf)
                                    .unwrap_or_else(|| PathBuf::from("."));
    let runner = LocalStepRunner::with_base_dir(base_dir);
    let mut orchestrator = Orchestrator::builder(FsArtifactStore::from_config(store), runner).build(config)?;
    let report = orchestrator.run_configured()?;
    write_report(&report, out)?;
    match report.status {
        RunStatus::FailedAt { step, ref cause } => Err(CliError::step_failed(step, cause)),
        _ => Ok(()),
    }
}

fn write_report<W: Write>(report: &RunReport, out: &mut W) -> Result<(), CliError> {
    writeln!(out, "run {}", report.run_id)?;
    for meta in &report.outputs {
        writeln!(out, "  logged {} ({} bytes, sha256 {})", meta.id(), meta.size_bytes, meta.checksum)?;
    }
    for r in &report.reports {
        let verdict = if r.passed() { "passed" } else { "FAILED" };
        writeln!(out, "  validation of {}: {verdict}", r.artifact)?;
        for check in &r.checks {
            let mark = if check.passed { "ok" } else { "!!" };
            writeln!(out, "    [{mark}] {}: {}", check.name, check.detail)?;
        }
    }
    for (step, metrics) in &report.metrics {
        for (name, value) in metrics {
            writeln!(out, "  {step}.{name} = {value}")?;
        }
    }
    if let Some(fp) = &report.run_fingerprint {
        writeln!(out, "fingerprint {fp}")?;
        info!("run {} succeeded", report.run_id);
    }
    Ok(())
}

fn alias<W: Write>(args: &AliasArgs, store: &StoreConfig, out: &mut W) -> Result<(), CliError> {
    let VersionSelector::Version(version) = VersionSelector::parse(&args.version) else {
        return Err(PipelineError::config("--version", format!("expected a version like v3, found '{}'", args.version)).into());
    };
    let actor = args.actor
                    .clone()
                    .or_else(|| std::env::var("USER").ok())
                    .unwrap_or_else(|| "operator".to_string());
    let mut store = FsArtifactStore::from_config(store);
    let record = store.set_alias(&args.artifact, &args.alias, version, &actor)?;
    match record.previous {
        Some(prev) => writeln!(out, "{}:{} moved v{prev} -> v{}", record.name, record.alias, record.version)?,
        None => writeln!(out, "{}:{} -> v{}", record.name, record.alias, record.version)?,
    }
    Ok(())
}

fn list<W: Write>(args: &ListArgs, store: &StoreConfig, out: &mut W) -> Result<(), CliError> {
    let store = FsArtifactStore::from_config(store);
    let Some(name) = &args.artifact else {
        for name in store.names()? {
            writeln!(out, "{name}")?;
        }
        return Ok(());
    };
    let aliases = store.aliases(name)?;
    for meta in store.versions(name)? {
        let tags: Vec<&str> = aliases.iter()
                                     .filter(|(_, v)| **v == meta.version)
                                     .map(|(a, _)| a.as_str())
                                     .collect();
        writeln!(out,
                 "v{}\t{}\t{}\t{}\t{}",
                 meta.version,
                 meta.created_at.format("%Y-%m-%d %H:%M:%S"),
                 meta.size_bytes,
                 &meta.checksum[..12.min(meta.checksum.len())],
                 tags.join(","))?;
    }
    Ok(())
}
