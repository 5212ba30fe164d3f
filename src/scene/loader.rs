//! Asset loader adapter
//!
//! Fetches and parses the scene asset on a worker thread and reports
//! start/progress/completion/failure over a bounded channel. Every event is
//! tagged with the scene epoch it belongs to so stale attempts can be
//! dropped by the receiver.

use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;
use thiserror::Error;

use super::graph::SceneGraph;
use super::manifest::{ManifestError, SceneManifest};
use super::SceneEpoch;

/// Errors from fetching or decoding the scene asset.
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("failed to read scene asset {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse scene asset: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid scene asset: {0}")]
    Invalid(#[from] ManifestError),
}

/// Events from the loader worker.
#[derive(Debug)]
pub struct LoadEvent {
    /// Load attempt this event belongs to
    pub epoch: SceneEpoch,
    pub kind: LoadEventKind,
}

/// Event payload.
#[derive(Debug)]
pub enum LoadEventKind {
    /// Worker picked up the job
    Started,
    /// Fetch/decode progress in [0, 1]
    Progress(f32),
    /// The scene graph is ready for initialization
    Finished(Box<SceneGraph>),
    /// Fetch or decode failed
    Failed(String),
}

/// Source of the scene asset. Implementations run on the worker thread.
pub trait ModelSource: Send {
    /// Human-readable description for logs.
    fn describe(&self) -> String;

    /// Produce the scene graph, reporting progress along the way.
    fn fetch(&mut self, progress: &mut dyn FnMut(f32)) -> Result<SceneGraph, AssetError>;
}

/// Loads a manifest from a file on disk.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl ModelSource for FileSource {
    fn describe(&self) -> String {
        format!("{:?}", self.path)
    }

    fn fetch(&mut self, progress: &mut dyn FnMut(f32)) -> Result<SceneGraph, AssetError> {
        progress(0.0);
        let json = std::fs::read_to_string(&self.path).map_err(|source| AssetError::Io {
            path: self.path.clone(),
            source,
        })?;
        progress(0.5);
        let manifest: SceneManifest = serde_json::from_str(&json)?;
        progress(0.9);
        let graph = manifest.build()?;
        progress(1.0);
        Ok(graph)
    }
}

/// Serves the bundled demo office without touching the filesystem.
pub struct BuiltinSource {
    manifest: SceneManifest,
}

impl Default for BuiltinSource {
    fn default() -> Self {
        Self {
            manifest: SceneManifest::demo_office(),
        }
    }
}

impl BuiltinSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ModelSource for BuiltinSource {
    fn describe(&self) -> String {
        format!("builtin manifest {:?}", self.manifest.name)
    }

    fn fetch(&mut self, progress: &mut dyn FnMut(f32)) -> Result<SceneGraph, AssetError> {
        progress(0.5);
        let graph = self.manifest.build()?;
        progress(1.0);
        Ok(graph)
    }
}

/// Spawn the loader worker for one attempt.
///
/// The worker owns the source and the sender; it reports through the
/// channel and exits. Send failures mean the receiver is gone (the attempt
/// was torn down), which is fine to ignore.
pub fn spawn_fetch(
    mut source: Box<dyn ModelSource>,
    epoch: SceneEpoch,
    events: Sender<LoadEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        log::info!("Fetching scene asset from {}", source.describe());
        let _ = events.send(LoadEvent {
            epoch,
            kind: LoadEventKind::Started,
        });

        let progress_tx = events.clone();
        let mut report = |fraction: f32| {
            let _ = progress_tx.send(LoadEvent {
                epoch,
                kind: LoadEventKind::Progress(fraction),
            });
        };

        let kind = match source.fetch(&mut report) {
            Ok(graph) => {
                log::info!("Scene asset decoded ({} meshes)", graph.mesh_count());
                LoadEventKind::Finished(Box::new(graph))
            }
            Err(err) => {
                log::error!("Scene asset load failed: {}", err);
                LoadEventKind::Failed(err.to_string())
            }
        };
        let _ = events.send(LoadEvent { epoch, kind });
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    #[test]
    fn test_builtin_source_fetches() {
        let (tx, rx) = bounded(16);
        let handle = spawn_fetch(Box::new(BuiltinSource::new()), SceneEpoch(1), tx);
        handle.join().unwrap();

        let events: Vec<LoadEvent> = rx.try_iter().collect();
        assert!(matches!(events.first().unwrap().kind, LoadEventKind::Started));
        assert!(matches!(
            events.last().unwrap().kind,
            LoadEventKind::Finished(_)
        ));
        assert!(events.iter().all(|e| e.epoch == SceneEpoch(1)));
    }

    #[test]
    fn test_missing_file_reports_failure() {
        let (tx, rx) = bounded(16);
        let source = FileSource::new(PathBuf::from("/definitely/not/here.json"));
        spawn_fetch(Box::new(source), SceneEpoch(2), tx)
            .join()
            .unwrap();

        let events: Vec<LoadEvent> = rx.try_iter().collect();
        assert!(matches!(
            events.last().unwrap().kind,
            LoadEventKind::Failed(_)
        ));
    }
}
