use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use clap::Parser;
use rent_cli::commands::resolve_config;
use rent_cli::{execute, Cli, CliError, Command};
use serde_json::json;

fn write_fixture(dir: &Path) -> PathBuf {
    let mut csv = String::from("id,neighbourhood_group,room_type,price,longitude,latitude,last_review\n");
    for i in 0..600 {
        let group = ["Manhattan", "Brooklyn"][i % 2];
        let room = ["Entire home/apt", "Private room"][i % 3 % 2];
        writeln!(csv, "{i},{group},{room},{},-73.95,40.7,2019-05-21", 30 + (i * 11) % 400).unwrap();
    }
    std::fs::write(dir.join("listings.csv"), csv).unwrap();
    let config = json!({
        "main": {"steps": "all", "gate_policy": "record", "scratch_dir": dir.join("scratch")},
        "etl": {"sample": "listings.csv", "min_price": 50, "max_price": 350},
        "data_check": {"min_rows": 100, "max_rows": 5000, "min_price": 50, "max_price": 350},
        "modeling": {"test_size": 0.2, "val_size": 0.2, "random_seed": 42, "stratify_by": "none"}
    });
    let path = dir.join("pipeline.json");
    std::fs::write(&path, serde_json::to_vec_pretty(&config).unwrap()).unwrap();
    path
}

fn invoke(args: &[&str]) -> (Result<(), CliError>, String) {
    let cli = Cli::try_parse_from(std::iter::once("rentflow").chain(args.iter().copied())).unwrap();
    let mut out = Vec::new();
    let result = execute(cli, Vec::new(), &mut out);
    (result, String::from_utf8(out).unwrap())
}

#[test]
fn run_then_list_and_promote() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_fixture(dir.path());
    let store = dir.path().join("store");
    let (config, store) = (config.to_str().unwrap(), store.to_str().unwrap());

    let (result, out) = invoke(&["run", "--config", config, "--store", store]);
    result.unwrap();
    assert!(out.contains("logged model_export:v0"), "{out}");
    assert!(out.contains("fingerprint "));

    let (result, out) = invoke(&["list", "--store", store]);
    result.unwrap();
    assert!(out.lines().any(|l| l == "clean_sample.csv"));

    invoke(&["alias", "--artifact", "model_export", "--alias", "prod", "--version", "v0", "--actor", "ci", "--store", store]).0
                                                                                                                     .unwrap();
    let (result, out) = invoke(&["list", "--artifact", "model_export", "--store", store]);
    result.unwrap();
    assert!(out.starts_with("v0\t") && out.trim_end().ends_with("prod"), "{out}");

    let (result, _) = invoke(&["run", "--config", config, "--store", store, "--steps", "test"]);
    result.unwrap();
}

#[test]
fn unknown_step_is_a_usage_error_and_nothing_is_logged() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_fixture(dir.path());
    let store = dir.path().join("store");
    let (result, _) = invoke(&["run", "--config", config.to_str().unwrap(), "--store", store.to_str().unwrap(), "--steps",
                               "clean,bogus"]);
    let err = result.unwrap_err();
    assert_eq!(err.exit_code(), 2);
    assert!(!store.exists());
}

#[test]
fn enforced_gate_failure_exits_with_one() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_fixture(dir.path());
    let store = dir.path().join("store");
    let (result, _) = invoke(&["run", "--config", config.to_str().unwrap(), "--store", store.to_str().unwrap(), "--steps",
                               "download,clean,validate", "--gate-policy", "enforce", "--set", "data_check.min_rows=100000",
                               "--set", "data_check.max_rows=200000"]);
    let err = result.unwrap_err();
    assert_eq!(err.exit_code(), 1);
    assert!(err.to_string().starts_with("step 'validate' failed: validation failed"), "{err}");
}

#[test]
fn alias_needs_an_explicit_version() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().to_str().unwrap();
    let (result, _) = invoke(&["alias", "--artifact", "model_export", "--alias", "prod", "--version", "latest", "--store", store]);
    assert_eq!(result.unwrap_err().exit_code(), 2);
    let (result, _) = invoke(&["alias", "--artifact", "model_export", "--alias", "prod", "--version", "v0", "--store", store]);
    assert_eq!(result.unwrap_err().exit_code(), 1);
}

#[test]
fn flags_win_over_environment_which_wins_over_the_document() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_fixture(dir.path());
    let cli = Cli::try_parse_from(["rentflow", "run", "--config", config.to_str().unwrap(), "--max-price", "300", "--seed",
                                   "7", "--set", "modeling.seed_note=x"]).unwrap();
    let Command::Run(args) = cli.command else { panic!("expected run") };
    let env = vec![("RENTFLOW__ETL__MIN_PRICE".to_string(), "60".to_string()),
                   ("RENTFLOW__ETL__MAX_PRICE".to_string(), "320".to_string())];
    let tree = resolve_config(&args, env).unwrap();
    assert_eq!(tree.require_f64("etl.min_price").unwrap(), 60.0);
    assert_eq!(tree.require_f64("etl.max_price").unwrap(), 300.0);
    assert_eq!(tree.require_u64("modeling.random_seed").unwrap(), 7);
    assert_eq!(tree.require_str("modeling.seed_note").unwrap(), "x");
}

#[test]
fn price_flags_bound_both_cleaning_and_validation() {
    let shipped = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/pipeline.json");
    let cli = Cli::try_parse_from(["rentflow", "run", "--config", shipped.to_str().unwrap(), "--steps", "clean,validate",
                                   "--min-price", "50", "--max-price", "400"]).unwrap();
    let Command::Run(args) = cli.command else { panic!("expected run") };
    let tree = resolve_config(&args, Vec::new()).unwrap();
    assert_eq!(tree.require_f64("etl.min_price").unwrap(), 50.0);
    assert_eq!(tree.require_f64("etl.max_price").unwrap(), 400.0);
    assert_eq!(tree.require_f64("data_check.min_price").unwrap(), 50.0);
    assert_eq!(tree.require_f64("data_check.max_price").unwrap(), 400.0);
    // sin flags, el documento conserva sus propios rangos
    let cli = Cli::try_parse_from(["rentflow", "run", "--config", shipped.to_str().unwrap()]).unwrap();
    let Command::Run(args) = cli.command else { panic!("expected run") };
    let tree = resolve_config(&args, Vec::new()).unwrap();
    assert_eq!(tree.require_f64("data_check.max_price").unwrap(), 350.0);
}
