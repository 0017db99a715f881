//! Background merge worker and the UI-side controller that drains its events.
//!
//! The worker owns the clone directory and performs fetch and merge. It only
//! communicates through immutable [`WorkerEvent`] values on a channel; the UI
//! thread drains that channel every [`POLL_INTERVAL`] and is the only place
//! display state changes.

use crate::fetch::{clone_repo, repo_name_from_url, CloneDir};
use crate::render::{merge_repository, MergeOptions};
use crate::scan::ExcludePatterns;
use anyhow::Result;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use thiserror::Error;

/// How often the UI thread drains worker events.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

pub const CLONE_FAILED_MESSAGE: &str =
    "Failed to clone repository. Please check the URL and your internet connection.";

pub const NO_FILES_MESSAGE: &str = "No files were processed. Check your exclusion patterns.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    Info,
    Warning,
    Error,
}

/// Message sent from the worker to the UI thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEvent {
    /// Run milestone (cloning, processing, done)
    Status(String),
    /// One line per merged file
    Progress(String),
    /// Outcome that needs the user's attention
    Dialog { kind: DialogKind, title: String, text: String },
    /// Always the last event of a run
    Finished { success: bool },
}

/// Inputs for one merge run.
#[derive(Debug, Clone)]
pub struct MergeJob {
    pub repo_url: String,
    pub output: PathBuf,
    pub max_file_bytes: u64,
    pub exclude: ExcludePatterns,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RunRejected {
    #[error("A merge is already in progress.")]
    InProgress,
    #[error("Failed to start the merge worker: {0}")]
    Spawn(String),
}

struct ActiveRun {
    events: Receiver<WorkerEvent>,
    handle: JoinHandle<()>,
}

/// Owns at most one running worker; lives on the UI thread.
#[derive(Default)]
pub struct MergeController {
    active: Option<ActiveRun>,
}

impl MergeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Spawn a worker for `job`. Rejected while a previous run is still active.
    pub fn start(&mut self, job: MergeJob) -> Result<(), RunRejected> {
        if self.active.is_some() {
            return Err(RunRejected::InProgress);
        }

        let (tx, rx) = mpsc::channel();
        let handle = thread::Builder::new()
            .name("merge-worker".to_string())
            .spawn(move || run_job(job, &tx))
            .map_err(|err| RunRejected::Spawn(err.to_string()))?;

        self.active = Some(ActiveRun { events: rx, handle });
        Ok(())
    }

    /// Drain every pending event without blocking.
    ///
    /// Once `Finished` has been drained the worker is joined and a new run may
    /// start. A worker that disconnects without finishing is reported as an
    /// error dialog followed by a failed `Finished`.
    pub fn poll(&mut self) -> Vec<WorkerEvent> {
        let Some(run) = self.active.as_ref() else {
            return Vec::new();
        };

        let mut events = Vec::new();
        let mut finished = false;
        loop {
            match run.events.try_recv() {
                Ok(event) => {
                    finished |= matches!(event, WorkerEvent::Finished { .. });
                    events.push(event);
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if !finished {
                        events.push(WorkerEvent::Dialog {
                            kind: DialogKind::Error,
                            title: "Error".to_string(),
                            text: "An error occurred: the merge worker stopped unexpectedly."
                                .to_string(),
                        });
                        events.push(WorkerEvent::Finished { success: false });
                        finished = true;
                    }
                    break;
                }
            }
        }

        if finished {
            if let Some(run) = self.active.take() {
                if run.handle.join().is_err() {
                    tracing::error!("Merge worker panicked");
                }
            }
        }
        events
    }
}

fn run_job(job: MergeJob, tx: &Sender<WorkerEvent>) {
    let success = match execute(&job, tx) {
        Ok(success) => success,
        Err(err) => {
            tracing::error!("Merge failed: {:#}", err);
            send_status(tx, &format!("Error: {:#}", err));
            send_dialog(tx, DialogKind::Error, "Error", &format!("An error occurred: {:#}", err));
            false
        }
    };
    let _ = tx.send(WorkerEvent::Finished { success });
}

/// Fetch and merge. `Ok(false)` means the clone failed and was already reported.
fn execute(job: &MergeJob, tx: &Sender<WorkerEvent>) -> Result<bool> {
    let clone_dir = CloneDir::create()?;

    send_status(tx, "Cloning repository to temporary directory...");
    if !clone_repo(&job.repo_url, clone_dir.path()) {
        send_status(tx, "Error: Failed to clone repository.");
        send_dialog(tx, DialogKind::Error, "Error", CLONE_FAILED_MESSAGE);
        return Ok(false);
    }

    send_status(tx, "Processing repository files...");
    let options = MergeOptions {
        max_file_bytes: job.max_file_bytes,
        exclude: job.exclude.clone(),
        repo_name: Some(repo_name_from_url(&job.repo_url)),
    };
    let stats = merge_repository(clone_dir.path(), &job.output, options, |msg| {
        let _ = tx.send(WorkerEvent::Progress(msg.to_string()));
    })?;

    let count = stats.files_included;
    if count > 0 {
        send_status(tx, &format!("Success! Processed {} files.", count));
        send_status(tx, &format!("Output saved to: {}", job.output.display()));
        let text = format!("Successfully merged {} files into {}", count, job.output.display());
        send_dialog(tx, DialogKind::Info, "Success", &text);
    } else {
        send_status(tx, NO_FILES_MESSAGE);
        send_dialog(tx, DialogKind::Warning, "Warning", NO_FILES_MESSAGE);
    }
    Ok(true)
}

fn send_status(tx: &Sender<WorkerEvent>, message: &str) {
    let _ = tx.send(WorkerEvent::Status(message.to_string()));
}

fn send_dialog(tx: &Sender<WorkerEvent>, kind: DialogKind, title: &str, text: &str) {
    let _ = tx.send(WorkerEvent::Dialog { kind, title: title.to_string(), text: text.to_string() });
}
