use std::fmt::Write as _;
use std::path::Path;

use rent_adapters::{Frame, GroupedMeanModel, LocalStepRunner};
use rent_core::{ArtifactStore, ConfigResolver, InMemoryArtifactStore, Orchestrator, StepKind, Table, VersionSelector};
use serde_json::json;

const GROUPS: [&str; 3] = ["Manhattan", "Brooklyn", "Queens"];
const ROOMS: [&str; 2] = ["Entire home/apt", "Private room"];

fn write_listings(path: &Path, rows: usize) {
    let mut out = String::from("id,name,neighbourhood_group,room_type,price,longitude,latitude,last_review\n");
    for i in 0..rows {
        let group = GROUPS[i % 3];
        let room = ROOMS[i % 2];
        let price = 40 + (i * 13) % 300 + if room == ROOMS[0] { 60 } else { 0 };
        let lon = -74.0 + (i % 50) as f64 * 0.005;
        let lat = 40.6 + (i % 40) as f64 * 0.01;
        // fila fuera de la caja geográfica cada 97
        let lon = if i % 97 == 0 { -75.5 } else { lon };
        writeln!(out, "{i},\"Listing, {i}\",{group},{room},{price},{lon:.4},{lat:.4},2019-0{}-1{}", 1 + i % 9, i % 10).unwrap();
    }
    std::fs::write(path, out).unwrap();
}

fn orchestrator(data_dir: &Path) -> Orchestrator<InMemoryArtifactStore, LocalStepRunner> {
    let config = ConfigResolver::new(json!({
        "main": {"gate_policy": "enforce"},
        "etl": {"sample": "listings.csv", "min_price": 50, "max_price": 350},
        "data_check": {"min_rows": 500, "max_rows": 5000, "min_price": 50, "max_price": 350},
        "modeling": {"test_size": 0.2, "val_size": 0.25, "random_seed": 42, "stratify_by": "neighbourhood_group"}
    })).resolve()
       .unwrap();
    Orchestrator::builder(InMemoryArtifactStore::new(), LocalStepRunner::with_base_dir(data_dir)).scratch_root(data_dir.join("scratch"))
                                                                                               .build(config)
                                                                                               .unwrap()
}

#[test]
fn default_steps_produce_a_model() {
    let dir = tempfile::tempdir().unwrap();
    write_listings(&dir.path().join("listings.csv"), 1200);
    let mut orch = orchestrator(dir.path());

    let report = orch.run_requested("all").unwrap();
    assert!(report.succeeded(), "{:?}", report.status);
    assert_eq!(report.executed, StepKind::DEFAULT_SET.to_vec());
    assert!(report.reports[0].passed());

    let train = &report.metrics[&StepKind::Train];
    assert!(train["mae"] > 0.0);
    assert!(train["val_rows"] > 0.0);

    let clean = orch.store().get("clean_sample.csv", &VersionSelector::Latest).unwrap();
    let path = dir.path().join("clean_check.csv");
    std::fs::write(&path, &clean.content).unwrap();
    let frame = Frame::read_csv(&path).unwrap();
    let prices = frame.numeric_column("price").unwrap();
    assert!(prices.iter().all(|p| p.is_some_and(|p| (50.0..=350.0).contains(&p))));
    assert!(frame.row_count() < 1200);

    let model = orch.store().get("model_export", &VersionSelector::Version(0)).unwrap();
    let model: GroupedMeanModel = serde_json::from_slice(&model.content).unwrap();
    assert_eq!(model.group_by, vec!["neighbourhood_group".to_string(), "room_type".to_string()]);
    assert_eq!(model.groups.len(), 6);
    assert!(std::fs::read_dir(dir.path().join("scratch")).unwrap().next().is_none());
}

#[test]
fn test_step_requires_a_promoted_model() {
    let dir = tempfile::tempdir().unwrap();
    write_listings(&dir.path().join("listings.csv"), 1200);
    let mut orch = orchestrator(dir.path());
    assert!(orch.run_requested("all").unwrap().succeeded());

    let report = orch.run_requested("test").unwrap();
    assert_eq!(report.failed_step(), Some(StepKind::Test));

    orch.store_mut().set_alias("model_export", "prod", 0, "reviewer").unwrap();
    let report = orch.run_requested("test_regression_model").unwrap();
    assert!(report.succeeded(), "{:?}", report.status);
    assert!(report.metrics[&StepKind::Test]["rows"] > 0.0);
}

#[test]
fn enforced_gate_stops_before_split() {
    let dir = tempfile::tempdir().unwrap();
    write_listings(&dir.path().join("listings.csv"), 300);
    let mut orch = orchestrator(dir.path());
    let report = orch.run_requested("all").unwrap();
    assert_eq!(report.failed_step(), Some(StepKind::Validate));
    assert!(report.failure().unwrap().to_string().contains("row_count"));
    assert!(orch.store().versions("trainval_data.csv").is_err());
}
