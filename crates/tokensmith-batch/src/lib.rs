pub mod clock;
pub mod refresh;
pub mod store;

use std::path::PathBuf;

use tokensmith_core::config::StoreConfig;
use tokensmith_core::error::{Result, TokensmithError};
use tokensmith_core::types::{CredentialStore, LogEntry, RefreshStatus};
use tokensmith_integrations::TokenEndpoint;
use tracing::info;

use crate::clock::{run_stamp, Clock};

/// Where a run reads and writes.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub store: PathBuf,
    pub snapshot_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl From<&StoreConfig> for RunPaths {
    fn from(config: &StoreConfig) -> Self {
        Self {
            store: PathBuf::from(&config.path),
            snapshot_dir: PathBuf::from(&config.snapshot_dir),
            log_dir: PathBuf::from(&config.log_dir),
        }
    }
}

/// Result of a completed run.
#[derive(Debug)]
pub struct RunReport {
    pub snapshot: PathBuf,
    pub log: PathBuf,
    pub records: CredentialStore,
    pub entries: Vec<LogEntry>,
}

impl RunReport {
    pub fn count(&self, status: RefreshStatus) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }
}

/// Run the batch once: load the store, refresh every organization in order,
/// then write the store, a snapshot, and the run log.
///
/// Per-organization failures are recorded on the records. Only loading the
/// store or writing outputs can fail the run.
pub async fn run(
    paths: &RunPaths,
    endpoint: &dyn TokenEndpoint,
    clock: &dyn Clock,
) -> Result<RunReport> {
    let stamp = run_stamp(&clock.now());

    let mut records = store::load(&paths.store)?;
    info!(orgs = records.len(), store = %paths.store.display(), "loaded credential store");

    let mut entries = Vec::with_capacity(records.len());
    for (org, record) in records.iter_mut() {
        entries.push(refresh::refresh_one(org, record, endpoint, clock).await);
    }

    let snapshot = paths.snapshot_dir.join(format!("tokens_{stamp}.json"));
    let log = paths.log_dir.join(format!("logs_{stamp}.json"));

    // Store and snapshot share one serialization so they are byte-identical.
    let tokens_json = store::to_json(&records).map_err(|e| TokensmithError::Output {
        path: paths.store.display().to_string(),
        message: format!("failed to serialize tokens: {e}"),
    })?;
    let log_json = store::to_json(&entries).map_err(|e| TokensmithError::Output {
        path: log.display().to_string(),
        message: format!("failed to serialize log: {e}"),
    })?;

    store::write_file(&paths.store, &tokens_json)?;
    store::write_file(&snapshot, &tokens_json)?;
    store::write_file(&log, &log_json)?;

    Ok(RunReport {
        snapshot,
        log,
        records,
        entries,
    })
}
