use std::{
    fs,
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
};

use flume::Sender;
use rand::Rng;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{
    TrackUploader,
    item::{UploadId, UploadItem, UploadStatus, is_audio_file},
    metadata::{MetadataExtractor, TrackMetadata, UploadMetadata},
};
use crate::{
    config::UploadConfig, event::events::Event, http::models::UploadedTrack, util::sync::lock,
};

const UPLOAD_FAILED: &str = "Upload failed";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadSummary {
    pub completed: usize,
    pub failed: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadStats {
    pub uploaded: usize,
    pub pending: usize,
    pub completed: usize,
    pub failed: usize,
}

struct QueueInner {
    items: Mutex<Vec<UploadItem>>,
    uploaded: Mutex<Vec<UploadedTrack>>,
    extractions: Mutex<Vec<JoinHandle<()>>>,
    extractor: Arc<dyn MetadataExtractor>,
    uploader: Arc<dyn TrackUploader>,
    uploading: AtomicBool,
    config: UploadConfig,
    event_tx: Sender<Event>,
}

/// Staged files and their upload state. Clones share the same queue.
#[derive(Clone)]
pub struct UploadQueue {
    inner: Arc<QueueInner>,
}

/// Clears the in-flight flag when a pass ends, however it ends.
struct PassGuard<'a>(&'a AtomicBool);

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl UploadQueue {
    pub fn new(
        extractor: Arc<dyn MetadataExtractor>,
        uploader: Arc<dyn TrackUploader>,
        config: UploadConfig,
        event_tx: Sender<Event>,
    ) -> Self {
        Self {
            inner: Arc::new(QueueInner {
                items: Mutex::new(Vec::new()),
                uploaded: Mutex::new(Vec::new()),
                extractions: Mutex::new(Vec::new()),
                extractor,
                uploader,
                uploading: AtomicBool::new(false),
                config,
                event_tx,
            }),
        }
    }

    pub fn items(&self) -> Vec<UploadItem> {
        lock(&self.inner.items).clone()
    }

    pub fn item(&self, id: UploadId) -> Option<UploadItem> {
        lock(&self.inner.items).iter().find(|i| i.id == id).cloned()
    }

    pub fn uploaded(&self) -> Vec<UploadedTrack> {
        lock(&self.inner.uploaded).clone()
    }

    pub fn is_uploading(&self) -> bool {
        self.inner.uploading.load(Ordering::SeqCst)
    }

    pub fn can_upload(&self) -> bool {
        !self.is_uploading() && lock(&self.inner.items).iter().any(UploadItem::is_ready)
    }

    pub fn stats(&self) -> UploadStats {
        let items = lock(&self.inner.items);
        let count = |status: UploadStatus| items.iter().filter(|i| i.status == status).count();
        UploadStats {
            uploaded: lock(&self.inner.uploaded).len(),
            pending: count(UploadStatus::Pending),
            completed: count(UploadStatus::Completed),
            failed: count(UploadStatus::Error),
        }
    }

    /// Stages audio files. Directories contribute their audio files, sorted by
    /// name. Paths already staged are skipped. Metadata extraction starts in
    /// the background for every newly staged item.
    pub fn stage_files(&self, paths: Vec<PathBuf>) -> Vec<UploadId> {
        let mut staged = Vec::new();

        for path in expand_selection(paths) {
            if !is_audio_file(&path) {
                debug!(path = %path.display(), "upload_skip_not_audio");
                continue;
            }

            let size = match fs::metadata(&path) {
                Ok(meta) if meta.is_file() => meta.len(),
                Ok(_) => continue,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "upload_stat_failed");
                    continue;
                }
            };

            let item = {
                let mut items = lock(&self.inner.items);
                if items.iter().any(|i| i.path == path) {
                    debug!(path = %path.display(), "upload_already_staged");
                    continue;
                }
                let item = UploadItem::new(path, size);
                items.push(item.clone());
                item
            };

            staged.push(item.id);
            self.spawn_extraction(item.id, item.path, size);
        }

        if !staged.is_empty() {
            info!(count = staged.len(), "upload_files_staged");
            let _ = self.inner.event_tx.send(Event::FilesStaged(staged.len()));
        }
        staged
    }

    fn spawn_extraction(&self, id: UploadId, path: PathBuf, size: u64) {
        let inner = self.inner.clone();
        let task = tokio::spawn(async move {
            let metadata = inner.extractor.extract(&path, size).await;
            if apply_metadata(&inner, id, metadata) {
                let _ = inner.event_tx.send(Event::MetadataExtracted(id));
            } else {
                debug!(%id, "upload_metadata_discarded");
            }
        });
        let mut tasks = lock(&self.inner.extractions);
        tasks.retain(|t| !t.is_finished());
        tasks.push(task);
    }

    /// Waits for every metadata extraction started so far.
    pub async fn wait_for_metadata(&self) {
        let tasks: Vec<_> = lock(&self.inner.extractions).drain(..).collect();
        for task in tasks {
            let _ = task.await;
        }
    }

    /// Drops the item. Work already in flight for it finishes and is discarded.
    pub fn remove(&self, id: UploadId) -> bool {
        let mut items = lock(&self.inner.items);
        let before = items.len();
        items.retain(|i| i.id != id);
        before != items.len()
    }

    /// Uploads every ready item in selection order, one at a time. A second
    /// call while a pass is running returns immediately with an empty summary.
    pub async fn upload_all(&self) -> UploadSummary {
        if self.inner.uploading.swap(true, Ordering::SeqCst) {
            debug!("upload_pass_already_running");
            return UploadSummary::default();
        }
        let _guard = PassGuard(&self.inner.uploading);

        let ids: Vec<UploadId> = lock(&self.inner.items).iter().map(|i| i.id).collect();
        let mut summary = UploadSummary::default();
        info!(items = ids.len(), "upload_pass_started");

        for id in ids {
            let Some((path, metadata, name)) = self.claim(id) else {
                summary.skipped += 1;
                continue;
            };
            self.notify(id, UploadStatus::Uploading);

            let ticker = self.spawn_progress_ticker(id);
            let request = UploadMetadata {
                track: metadata,
                original_filename: name,
            };
            let result = self.inner.uploader.upload_track(&path, &request).await;
            ticker.abort();

            match result {
                Ok(uploaded) => {
                    info!(%id, server_id = %uploaded.id, "upload_completed");
                    let kept = self.update(id, |item| {
                        item.status = UploadStatus::Completed;
                        item.progress = 100;
                        item.server_id = Some(uploaded.id.clone());
                        item.media_url = Some(uploaded.cloudinary_url.clone());
                        item.error = None;
                    });
                    if kept {
                        lock(&self.inner.uploaded).push(uploaded);
                        summary.completed += 1;
                        self.notify(id, UploadStatus::Completed);
                    }
                }
                Err(e) => {
                    let message = Some(e.user_message())
                        .filter(|m| !m.trim().is_empty())
                        .unwrap_or_else(|| UPLOAD_FAILED.to_string());
                    warn!(%id, error = %e, "upload_failed");
                    let kept = self.update(id, |item| {
                        item.status = UploadStatus::Error;
                        item.progress = 0;
                        item.error = Some(message);
                    });
                    if kept {
                        summary.failed += 1;
                        self.notify(id, UploadStatus::Error);
                    }
                }
            }
        }

        info!(
            completed = summary.completed,
            failed = summary.failed,
            skipped = summary.skipped,
            "upload_pass_finished"
        );
        let _ = self.inner.event_tx.send(Event::UploadFinished(summary));
        summary
    }

    /// Marks a ready item as uploading and hands back what the request needs.
    fn claim(&self, id: UploadId) -> Option<(PathBuf, TrackMetadata, String)> {
        let mut items = lock(&self.inner.items);
        let item = items.iter_mut().find(|i| i.id == id)?;
        if !item.is_ready() {
            return None;
        }
        let metadata = item.metadata.clone()?;
        item.status = UploadStatus::Uploading;
        item.progress = 0;
        item.error = None;
        Some((item.path.clone(), metadata, item.name.clone()))
    }

    /// Applies `apply` to the item; false when it was removed meanwhile.
    fn update(&self, id: UploadId, apply: impl FnOnce(&mut UploadItem)) -> bool {
        match lock(&self.inner.items).iter_mut().find(|i| i.id == id) {
            Some(item) => {
                apply(item);
                true
            }
            None => {
                debug!(%id, "upload_result_discarded");
                false
            }
        }
    }

    fn notify(&self, id: UploadId, status: UploadStatus) {
        let _ = self
            .inner
            .event_tx
            .send(Event::UploadStatusChanged { id, status });
    }

    fn spawn_progress_ticker(&self, id: UploadId) -> JoinHandle<()> {
        let inner = self.inner.clone();
        tokio::spawn(async move {
            let cap = inner.config.progress_cap;
            let mut interval = tokio::time::interval(inner.config.progress_tick);
            interval.tick().await;
            loop {
                interval.tick().await;
                let step: u8 = rand::rng().random_range(1..=20);
                let mut items = lock(&inner.items);
                match items.iter_mut().find(|i| i.id == id) {
                    Some(item) if item.status == UploadStatus::Uploading => {
                        if item.progress < cap {
                            item.progress = item.progress.saturating_add(step).min(cap);
                        }
                    }
                    _ => break,
                }
            }
        })
    }
}

fn apply_metadata(inner: &QueueInner, id: UploadId, metadata: TrackMetadata) -> bool {
    match lock(&inner.items).iter_mut().find(|i| i.id == id) {
        Some(item) => {
            item.metadata = Some(metadata);
            true
        }
        None => false,
    }
}

/// Files pass through; directories are replaced by their direct children,
/// sorted by file name.
fn expand_selection(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut expanded = Vec::new();
    for path in paths {
        if path.is_dir() {
            expanded.extend(directory_files(&path));
        } else {
            expanded.push(path);
        }
    }
    expanded
}

fn directory_files(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(path = %dir.display(), error = %e, "upload_read_dir_failed");
            return Vec::new();
        }
    };

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file())
        .collect();
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    files
}
