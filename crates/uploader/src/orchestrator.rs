//! Upload orchestrator: drives a batch of rendered files through search,
//! upload and version linking.
//!
//! Per candidate the flow is search → matched-file / matched-stack /
//! unmatched → upload (→ link). Project resolution happens once up front
//! and is the only fatal failure; everything after it is absorbed into a
//! per-file outcome so one candidate can never prevent the rest from being
//! visited.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use postroom_client::{Asset, AssetKind, Error, Project, UploadProgress};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::base_name::BaseNameRule;
use crate::folders::{self, CONFORMS_FOLDER};
use crate::locator;
use crate::outcome::{BatchReport, FileOutcome, FileStatus};
use crate::retry::{RetryPolicy, with_retry};
use crate::service::AssetService;
use crate::stack;
use crate::version;

/// Progress events for a host progress window. Events are dropped rather
/// than awaited if the receiver lags.
#[derive(Debug, Clone)]
pub enum UploadEvent {
    FileStarted {
        index: usize,
        total: usize,
        file_name: String,
    },
    FileProgress {
        file_name: String,
        progress: UploadProgress,
    },
    FileFinished {
        file_name: String,
        status: FileStatus,
        detail: Option<String>,
    },
}

/// Fatal pre-batch failures. Per-candidate failures never surface here;
/// they are recorded in the [`BatchReport`].
#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("could not resolve a destination project: {0}")]
    Project(#[source] Error),
}

/// Per-batch state threaded through candidate processing, deliberately not
/// stored on the uploader, so candidates cannot bleed state into each other.
struct BatchContext {
    project: Project,
    /// Read-through cache of search results keyed by base name; lives for
    /// one batch, no eviction.
    search_cache: HashMap<String, Option<Asset>>,
}

/// Uploads batches of rendered files into a review project, stacking new
/// versions onto existing assets where their base names match.
pub struct BatchUploader {
    retry: RetryPolicy,
    base_name: BaseNameRule,
    fallback_folder: String,
    events_tx: mpsc::Sender<UploadEvent>,
    events_rx: Option<mpsc::Receiver<UploadEvent>>,
}

impl Default for BatchUploader {
    fn default() -> Self {
        Self::new(CONFORMS_FOLDER)
    }
}

impl BatchUploader {
    /// Creates an uploader routing unmatched files into `fallback_folder`.
    pub fn new(fallback_folder: &str) -> Self {
        let (events_tx, events_rx) = mpsc::channel(256);
        Self {
            retry: RetryPolicy::default(),
            base_name: BaseNameRule::default(),
            fallback_folder: fallback_folder.to_string(),
            events_tx,
            events_rx: Some(events_rx),
        }
    }

    /// Overrides the retry schedule.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Overrides the version-marker patterns.
    pub fn with_base_name_rule(mut self, rule: BaseNameRule) -> Self {
        self.base_name = rule;
        self
    }

    /// Takes the event receiver. Can only be called once.
    pub fn take_events(&mut self) -> Option<mpsc::Receiver<UploadEvent>> {
        self.events_rx.take()
    }

    /// Uploads `files` into `project_name`, returning the per-file report.
    ///
    /// Fails only when no destination project can be resolved; every other
    /// failure becomes a per-file outcome.
    pub async fn run(
        &self,
        service: &dyn AssetService,
        project_name: &str,
        files: &[PathBuf],
    ) -> Result<BatchReport, BatchError> {
        let project = folders::get_or_create_project(service, &self.retry, project_name)
            .await
            .map_err(BatchError::Project)?;

        let mut ctx = BatchContext {
            project,
            search_cache: HashMap::new(),
        };
        let mut report = BatchReport::new(files.len());

        for (index, path) in files.iter().enumerate() {
            let file_name = display_name(path);
            let _ = self.events_tx.try_send(UploadEvent::FileStarted {
                index,
                total: files.len(),
                file_name: file_name.clone(),
            });

            let (status, detail) = self
                .process_candidate(service, &mut ctx, path, &file_name)
                .await;
            info!(file = %file_name, status = ?status, "candidate finished");
            let _ = self.events_tx.try_send(UploadEvent::FileFinished {
                file_name: file_name.clone(),
                status,
                detail: detail.clone(),
            });
            report.record(FileOutcome {
                file_name,
                status,
                detail,
            });
        }

        info!(summary = ?report.summary(), "{}", report.message());
        Ok(report)
    }

    /// Runs one candidate to a terminal outcome. Never fails: every error
    /// inside the upload/link sequence is converted into a recorded status.
    async fn process_candidate(
        &self,
        service: &dyn AssetService,
        ctx: &mut BatchContext,
        path: &Path,
        file_name: &str,
    ) -> (FileStatus, Option<String>) {
        let base = self.base_name.base_name(file_name);

        // A lookup failure is not fatal to the candidate, it just routes it
        // to the fallback folder.
        let matched = match ctx.search_cache.get(&base) {
            Some(cached) => cached.clone(),
            None => {
                match locator::find_asset(service, &self.retry, &ctx.project.id, &base, None).await
                {
                    Ok(found) => {
                        ctx.search_cache.insert(base.clone(), found.clone());
                        found
                    }
                    Err(e) => {
                        warn!(file = %file_name, query = %base, error = %e, "search failed, using fallback folder");
                        None
                    }
                }
            }
        };

        match matched {
            Some(asset) if asset.kind == AssetKind::File => {
                self.version_against(service, &ctx.project, path, file_name, &asset)
                    .await
            }
            Some(asset) if asset.kind == AssetKind::VersionStack => {
                self.append_to_stack(service, path, file_name, &asset).await
            }
            _ => {
                self.upload_to_fallback(service, &ctx.project, path, file_name, None)
                    .await
            }
        }
    }

    /// Matched file: upload next to the match, then link as its next
    /// version. The service models a new version as a sibling awaiting
    /// linkage, so the upload goes into the match's parent folder.
    async fn version_against(
        &self,
        service: &dyn AssetService,
        project: &Project,
        path: &Path,
        file_name: &str,
        matched: &Asset,
    ) -> (FileStatus, Option<String>) {
        let Some(parent_id) = matched.parent_id.as_deref() else {
            // Search results carry a parent in practice; without one the
            // candidate is handled like no match at all.
            return self
                .upload_to_fallback(
                    service,
                    project,
                    path,
                    file_name,
                    Some("match had no parent folder".into()),
                )
                .await;
        };

        let uploaded = match self.upload_with_events(service, parent_id, path, file_name).await {
            Ok(asset) => asset,
            Err(e) => {
                warn!(file = %file_name, error = %e, "upload next to match failed, trying fallback folder");
                return self
                    .upload_to_fallback(
                        service,
                        project,
                        path,
                        file_name,
                        Some(format!("upload next to match failed: {e}")),
                    )
                    .await;
            }
        };

        // Normalize to the stack root before linking; a link failure
        // downgrades to a warning because the upload already stands.
        let root = stack::resolve_stack_root(service, &matched.id).await;
        match version::link_version(service, &self.retry, &root, &uploaded.id).await {
            Ok(true) => (FileStatus::Versioned, None),
            Ok(false) => (
                FileStatus::Uploaded,
                Some("uploaded, but the match was not stackable".into()),
            ),
            Err(e) => {
                warn!(file = %file_name, error = %e, "version link failed after upload");
                (
                    FileStatus::Uploaded,
                    Some(format!("uploaded, but version link failed: {e}")),
                )
            }
        }
    }

    /// Matched stack: upload straight into the stack; the service appends
    /// the file as the next version, no separate link call.
    async fn append_to_stack(
        &self,
        service: &dyn AssetService,
        path: &Path,
        file_name: &str,
        target: &Asset,
    ) -> (FileStatus, Option<String>) {
        match self.upload_with_events(service, &target.id, path, file_name).await {
            Ok(_) => (FileStatus::Versioned, None),
            Err(e) => {
                error!(file = %file_name, stack = %target.id, error = %e, "stack upload failed");
                (FileStatus::Failed, Some(format!("stack upload failed: {e}")))
            }
        }
    }

    /// Unmatched (or a degraded matched-file candidate): upload into the
    /// well-known fallback folder, resolved fresh per use rather than cached
    /// across candidates.
    async fn upload_to_fallback(
        &self,
        service: &dyn AssetService,
        project: &Project,
        path: &Path,
        file_name: &str,
        detail: Option<String>,
    ) -> (FileStatus, Option<String>) {
        let folder_id = match folders::get_or_create_folder(
            service,
            &self.retry,
            project,
            &self.fallback_folder,
        )
        .await
        {
            Ok(id) => id,
            Err(e) => {
                error!(file = %file_name, folder = %self.fallback_folder, error = %e, "no fallback folder available");
                return (
                    FileStatus::Failed,
                    Some(format!("no fallback folder: {e}")),
                );
            }
        };

        match self.upload_with_events(service, &folder_id, path, file_name).await {
            Ok(_) => (FileStatus::UploadedFallback, detail),
            Err(e) => {
                error!(file = %file_name, error = %e, "fallback upload failed");
                (
                    FileStatus::Failed,
                    Some(format!("fallback upload failed: {e}")),
                )
            }
        }
    }

    /// Uploads with retry, forwarding transport progress to the event
    /// channel.
    async fn upload_with_events(
        &self,
        service: &dyn AssetService,
        parent_id: &str,
        path: &Path,
        file_name: &str,
    ) -> Result<Asset, Error> {
        let events_tx = self.events_tx.clone();
        let name = file_name.to_string();
        let forward = move |progress: UploadProgress| {
            let _ = events_tx.try_send(UploadEvent::FileProgress {
                file_name: name.clone(),
                progress,
            });
        };
        with_retry(&self.retry, || service.upload(parent_id, path, &forward)).await
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
