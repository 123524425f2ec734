//! Cascade Delete Example
//!
//! Seeds an in-memory tracking store and artifact store, then deletes one
//! run and one experiment, printing what happened.
//!
//! Run with: RUST_LOG=mlflow_cascade=debug cargo run --example cascade_delete

use anyhow::{Context, Result};
use mlflow_cascade::artifact::MemoryArtifactStore;
use mlflow_cascade::telemetry::init_tracing;
use mlflow_cascade::tracking::{MemoryTrackingStore, RunSummary};
use mlflow_cascade::CascadeDeleter;

fn seed(tracking: &MemoryTrackingStore, artifacts: &MemoryArtifactStore) {
    for (experiment, run) in [("12", "a1"), ("12", "a2"), ("12", "a3"), ("13", "b1")] {
        let uri = format!("gs://mlp-artifacts/mlflow/{experiment}/{run}/artifacts");
        tracking.add_run(
            RunSummary::builder(run, experiment, uri)
                .user_id("demo")
                .tag("mlflow.runName", format!("demo-{run}"))
                .build(),
        );
        for file in ["model.pkl", "metrics.json"] {
            artifacts.put(
                format!("mlp-artifacts/mlflow/{experiment}/{run}/artifacts/{file}"),
                file.as_bytes().to_vec(),
            );
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("mlflow_cascade=info");

    println!("=== mlflow-cascade: Cascade Delete ===\n");

    let tracking = MemoryTrackingStore::new();
    let artifacts = MemoryArtifactStore::new();
    seed(&tracking, &artifacts);
    tracking.reject_run_deletes("a2");

    println!("1. Seeded {} runs, {} blobs", tracking.run_count(), artifacts.len());

    let deleter = CascadeDeleter::new(tracking, artifacts);

    // -------------------------------------------------------------------------
    // 2. Delete a single run with its artifacts
    // -------------------------------------------------------------------------
    deleter
        .delete_run("b1", true)
        .await
        .context("deleting run b1")?;
    println!("\n2. Deleted run b1, {} blobs left", deleter.artifacts().len());

    // -------------------------------------------------------------------------
    // 3. Delete an experiment; run a2 is rigged to fail
    // -------------------------------------------------------------------------
    let report = deleter
        .delete_experiment("12", true)
        .await
        .context("deleting experiment 12")?;

    println!("\n3. Deleted experiment {}", report.experiment_id());
    println!("   Runs deleted: {:?}", report.deleted_runs());
    for failure in report.failed_runs() {
        println!("   Run {} failed: {}", failure.run_id(), failure.error());
    }
    println!("   Artifact root removed: {:?}", report.artifact_root());
    println!("   Blobs left: {:?}", deleter.artifacts().paths());

    Ok(())
}
