//! # snomed-release-service
//!
//! Concurrent RF2 export job service.
//!
//! [`ExportService`] owns a shared read-only [`ReleaseStore`] and runs export
//! requests as independent background jobs: each job validates its
//! configuration eagerly, selects and routes rows, writes its own uniquely
//! named archive, and is pollable and cancellable by id. This mirrors the
//! submit / poll-status / fetch-archive lifecycle of the terminology server's
//! export endpoint, without the transport layer.

#![warn(missing_docs)]

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use uuid::Uuid;

use snomed_rf2_release::{
    select_rows, CancellationFlag, ExportConfiguration, FileKey, ReleaseArchiveBuilder,
    ReleaseResult, ReleaseStore,
};
use snomed_rf2_types::ReleaseRow;

/// Lifecycle state of one export job.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExportState {
    /// Accepted, not yet running.
    Pending,
    /// Selecting rows / writing the archive.
    Running,
    /// Finished; the archive is ready.
    Completed {
        /// Path of the written archive.
        archive: PathBuf,
    },
    /// Terminal failure; no archive was left behind.
    Failed {
        /// What went wrong.
        issues: Vec<String>,
    },
    /// Cancelled before completion; no archive was left behind.
    Cancelled,
}

impl ExportState {
    /// Returns true for the terminal states.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Completed { .. } | Self::Failed { .. } | Self::Cancelled
        )
    }
}

/// Snapshot of one export job, as echoed by the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ExportStatus {
    /// The export id assigned at submission.
    pub id: Uuid,
    /// Current lifecycle state.
    #[serde(flatten)]
    pub state: ExportState,
    /// The configuration as submitted.
    pub configuration: ExportConfiguration,
}

struct ExportJob {
    configuration: ExportConfiguration,
    state: ExportState,
    cancellation: CancellationFlag,
}

/// Runs export requests as concurrent background jobs.
///
/// All jobs share the read-only store; nothing else is shared, so any number
/// of exports may run at once. Must be used within a tokio runtime.
pub struct ExportService {
    store: Arc<ReleaseStore>,
    output_dir: PathBuf,
    jobs: Arc<Mutex<HashMap<Uuid, ExportJob>>>,
}

impl ExportService {
    /// Creates a service exporting from `store` into `output_dir`.
    pub fn new(store: Arc<ReleaseStore>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            output_dir: output_dir.into(),
            jobs: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Submits an export request and returns its id.
    ///
    /// The configuration is validated here, before any row scanning; an
    /// invalid request is rejected and no job record is created. The job
    /// itself runs on the blocking thread pool.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidConfiguration`] for a malformed request.
    ///
    /// [`InvalidConfiguration`]: snomed_rf2_release::ReleaseError::InvalidConfiguration
    pub fn submit(&self, configuration: ExportConfiguration) -> ReleaseResult<Uuid> {
        configuration.validate()?;

        let id = Uuid::new_v4();
        let cancellation = CancellationFlag::new();

        self.jobs.lock().insert(
            id,
            ExportJob {
                configuration: configuration.clone(),
                state: ExportState::Pending,
                cancellation: cancellation.clone(),
            },
        );

        tracing::info!(export_id = %id, branch = %configuration.branch_path, "export submitted");

        let store = Arc::clone(&self.store);
        let jobs = Arc::clone(&self.jobs);
        let output_dir = self.output_dir.clone();

        tokio::spawn(async move {
            set_state(&jobs, id, ExportState::Running);

            let outcome = tokio::task::spawn_blocking(move || {
                run_export(&store, &output_dir, id, &configuration, &cancellation)
            })
            .await;

            let terminal = match outcome {
                Ok(Ok(Some(archive))) => ExportState::Completed { archive },
                Ok(Ok(None)) => ExportState::Cancelled,
                Ok(Err(error)) => {
                    tracing::warn!(export_id = %id, %error, "export failed");
                    ExportState::Failed {
                        issues: vec![error.to_string()],
                    }
                }
                Err(join_error) => ExportState::Failed {
                    issues: vec![join_error.to_string()],
                },
            };
            set_state(&jobs, id, terminal);
        });

        Ok(id)
    }

    /// Returns the current status of an export, or `None` for unknown ids.
    pub fn status(&self, id: Uuid) -> Option<ExportStatus> {
        let jobs = self.jobs.lock();
        jobs.get(&id).map(|job| ExportStatus {
            id,
            state: job.state.clone(),
            configuration: job.configuration.clone(),
        })
    }

    /// Requests cancellation of an in-flight export.
    ///
    /// Returns true if the export exists and was not yet terminal. The row
    /// stream observes the flag between rows; no partial archive survives.
    pub fn cancel(&self, id: Uuid) -> bool {
        let jobs = self.jobs.lock();
        match jobs.get(&id) {
            Some(job) if !job.state.is_terminal() => {
                job.cancellation.cancel();
                true
            }
            _ => false,
        }
    }

    /// Polls an export until it reaches a terminal state.
    pub async fn wait(&self, id: Uuid) -> Option<ExportStatus> {
        loop {
            let status = self.status(id)?;
            if status.state.is_terminal() {
                return Some(status);
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
    }
}

fn set_state(jobs: &Mutex<HashMap<Uuid, ExportJob>>, id: Uuid, state: ExportState) {
    if let Some(job) = jobs.lock().get_mut(&id) {
        job.state = state;
    }
}

/// The blocking body of one export job.
///
/// Returns `Ok(None)` when the job was cancelled; in that case nothing was
/// persisted.
fn run_export(
    store: &ReleaseStore,
    output_dir: &std::path::Path,
    id: Uuid,
    configuration: &ExportConfiguration,
    cancellation: &CancellationFlag,
) -> ReleaseResult<Option<PathBuf>> {
    let mut grouped: BTreeMap<FileKey, Vec<ReleaseRow>> = BTreeMap::new();
    let selected = select_rows(
        store.release_rows(),
        configuration,
        store,
        cancellation.clone(),
    )?;

    for (key, row) in selected {
        grouped.entry(key).or_default().push(row);
    }

    if cancellation.is_cancelled() {
        tracing::info!(export_id = %id, "export cancelled before archive assembly");
        return Ok(None);
    }

    let builder =
        ReleaseArchiveBuilder::new(output_dir, format!("SnomedCT_Export_{id}"));
    let archive = builder.write(configuration, &grouped, &store.language_codes())?;

    Ok(Some(archive))
}
