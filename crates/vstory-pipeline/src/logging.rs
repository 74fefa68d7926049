//! Structured run logging.

use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vstory_models::RunId;

/// Initialize tracing for the pipeline binary.
pub fn init_logging() {
    let env_filter = EnvFilter::from_default_env()
        .add_directive("vstory=info".parse().expect("static directive parses"));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_ansi(true)
                .with_target(true)
                .with_file(false)
                .with_line_number(false),
        )
        .with(env_filter)
        .init();
}

/// Run logger with consistent contextual fields.
#[derive(Debug, Clone)]
pub struct RunLogger {
    run_id: String,
}

impl RunLogger {
    pub fn new(run_id: &RunId) -> Self {
        Self {
            run_id: run_id.to_string(),
        }
    }

    /// Log the start of a pipeline stage.
    pub fn stage(&self, stage: &str, message: &str) {
        info!(run_id = %self.run_id, stage = %stage, "{}", message);
    }

    /// Log a per-scene degradation (fallback caption, placeholder panel).
    pub fn degraded(&self, stage: &str, scene: u32, message: &str) {
        warn!(run_id = %self.run_id, stage = %stage, scene, "{}", message);
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }
}
