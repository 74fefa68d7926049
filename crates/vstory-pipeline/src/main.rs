//! Storyboard pipeline binary.
//!
//! Usage: vstory-pipeline <video> <output-dir>
//!
//! Writes `storyboard.png` and `storyboard.json` into the output directory.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use tracing::{error, info, warn};

use vstory_ml_client::MlClient;
use vstory_pipeline::logging::init_logging;
use vstory_pipeline::{run_pipeline, PipelineConfig};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_logging();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let (video_path, output_dir) = match (args.next(), args.next()) {
        (Some(video), Some(output)) => (PathBuf::from(video), PathBuf::from(output)),
        _ => anyhow::bail!("usage: vstory-pipeline <video> <output-dir>"),
    };

    let config = PipelineConfig::from_env();
    config.validate().context("invalid configuration")?;

    let ml = MlClient::from_env().context("building ML sidecar client")?;
    if !ml.health_check().await.unwrap_or(false) {
        warn!("ML sidecar health check failed, captions will degrade to fallbacks");
    }

    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("creating output directory {}", output_dir.display()))?;
    let workdir = tempfile::tempdir().context("creating working directory")?;

    let output = run_pipeline(&config, &ml, &video_path, workdir.path())
        .await
        .with_context(|| format!("processing {}", video_path.display()))?;

    let image_path = output_dir.join("storyboard.png");
    output
        .storyboard
        .save(&image_path)
        .with_context(|| format!("writing {}", image_path.display()))?;

    let record_path = output_dir.join("storyboard.json");
    let json = serde_json::to_string_pretty(&output.record)?;
    std::fs::write(&record_path, json)
        .with_context(|| format!("writing {}", record_path.display()))?;

    info!(
        run_id = %output.record.run_id,
        scenes = output.record.total_scenes,
        image = %image_path.display(),
        record = %record_path.display(),
        "Storyboard complete"
    );
    Ok(())
}
