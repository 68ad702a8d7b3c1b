//! Image preloading.
//!
//! Layout must not start until every card image has settled, so cards are
//! never packed against unknown images. Each image gets its own blocking
//! decode task; the batch resolves once all of them finish. A failed decode
//! counts as settled: the card shows a placeholder instead of stalling the
//! whole showcase.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::thread;

use tokio::runtime::Builder as TokioRuntimeBuilder;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::image_loader::{self, DecodedImage};

/// Longest edge of decoded card previews.
pub const PREVIEW_EDGE: u32 = 1024;

/// Outcome for one image. Both variants mean "ready".
#[derive(Debug, Clone, PartialEq)]
pub enum ImageStatus {
    Loaded(DecodedImage),
    Failed(String),
}

/// Settled state of a whole batch.
#[derive(Debug, Clone, Default)]
pub struct PreloadReport {
    images: HashMap<PathBuf, ImageStatus>,
}

impl PreloadReport {
    pub fn get(&self, path: &std::path::Path) -> Option<&ImageStatus> {
        self.images.get(path)
    }

    pub fn image(&self, path: &std::path::Path) -> Option<&DecodedImage> {
        match self.images.get(path) {
            Some(ImageStatus::Loaded(image)) => Some(image),
            _ => None,
        }
    }

    /// Natural dimensions of a successfully loaded image.
    pub fn dimensions(&self, path: &std::path::Path) -> Option<(u32, u32)> {
        self.image(path)
            .map(|image| (image.natural_width, image.natural_height))
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn failed_count(&self) -> usize {
        self.images
            .values()
            .filter(|s| matches!(s, ImageStatus::Failed(_)))
            .count()
    }
}

/// Decode every image in `paths`, one task per distinct path.
///
/// Never fails; resolves once every task has settled.
pub async fn preload_all(paths: Vec<PathBuf>, max_edge: u32) -> PreloadReport {
    let mut pending: HashSet<PathBuf> = HashSet::with_capacity(paths.len());
    let mut tasks = JoinSet::new();

    for path in paths {
        if !pending.insert(path.clone()) {
            continue;
        }
        tasks.spawn_blocking(move || {
            let result = image_loader::decode_preview(&path, max_edge);
            (path, result)
        });
    }

    let mut images = HashMap::with_capacity(pending.len());
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((path, Ok(image))) => {
                debug!(path = %path.display(), width = image.width, height = image.height, "Preloaded image");
                pending.remove(&path);
                images.insert(path, ImageStatus::Loaded(image));
            }
            Ok((path, Err(e))) => {
                warn!(path = %path.display(), error = ?e, "Image failed to load");
                pending.remove(&path);
                images.insert(path, ImageStatus::Failed(e.to_string()));
            }
            Err(e) => {
                // The path is lost with the task; swept up below.
                warn!(error = %e, "Preload task did not complete");
            }
        }
    }

    for path in pending {
        images.insert(path, ImageStatus::Failed("preload task aborted".into()));
    }

    let report = PreloadReport { images };
    info!(
        total = report.len(),
        failed = report.failed_count(),
        "Image preload settled"
    );
    report
}

/// Run `preload_all` on a background thread with its own runtime.
///
/// The returned channel yields exactly one report.
pub fn spawn_preload(paths: Vec<PathBuf>, max_edge: u32) -> async_channel::Receiver<PreloadReport> {
    let (tx, rx) = async_channel::bounded(1);

    let spawned = thread::Builder::new()
        .name("image-preload".into())
        .spawn(move || {
            let report = match TokioRuntimeBuilder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime.block_on(preload_all(paths, max_edge)),
                Err(e) => {
                    warn!(error = %e, "Failed to start preload runtime");
                    failed_report(paths, "preload runtime unavailable")
                }
            };
            let _ = tx.send_blocking(report);
        });

    if let Err(e) = spawned {
        warn!(error = %e, "Failed to spawn preload thread");
    }
    rx
}

fn failed_report(paths: Vec<PathBuf>, reason: &str) -> PreloadReport {
    PreloadReport {
        images: paths
            .into_iter()
            .map(|p| (p, ImageStatus::Failed(reason.to_string())))
            .collect(),
    }
}
