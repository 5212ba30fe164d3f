//! Scene pipeline
//!
//! Owns one load attempt at a time: worker-thread fetch, one-shot
//! initialization, a settle delay covering backend upload latency, and the
//! live scene the room controls mutate. Each attempt gets a fresh epoch;
//! anything reported by a stale attempt is dropped before it can touch a
//! disposed scene.

mod effects;
mod graph;
mod init;
mod loader;
mod manifest;
mod material;

pub use effects::{
    apply_meeting, apply_privacy, curtain_target_y, ease_curtain, CURTAIN_MAX_RAISE,
};
pub use graph::{GraphError, MeshData, MeshId, NodeKind, SceneGraph, SceneNode};
pub use init::{initialize, ClassifiedMeshes, ClassifiedRef, InitError};
pub use loader::{
    spawn_fetch, AssetError, BuiltinSource, FileSource, LoadEvent, LoadEventKind, ModelSource,
};
pub use manifest::{ManifestError, ManifestMaterial, ManifestNode, SceneManifest};
pub use material::{Color, FlatMaterial, LitMaterial, Material, MaterialKind};

use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver};

use crate::device::TierConfig;

/// Identifier of one load attempt. Monotonically increasing per host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SceneEpoch(pub u64);

/// Why a scene attempt failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneFailure {
    /// The loader could not fetch or decode the asset
    Asset(String),
    /// Traversal or material setup failed
    Init(String),
    /// No scene graph arrived within the tier deadline
    Timeout,
}

/// Signals the host emits toward the app state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneSignal {
    /// The scene is initialized, settled, and live
    Loaded,
    /// The attempt failed; emitted at most once per attempt
    Failed(SceneFailure),
}

enum HostState {
    Idle,
    Fetching {
        deadline: Instant,
    },
    Settling {
        graph: SceneGraph,
        refs: ClassifiedMeshes,
        ready_at: Instant,
    },
    Live {
        graph: SceneGraph,
        refs: ClassifiedMeshes,
    },
    Failed,
}

/// Owner of the scene-loading pipeline and the live scene instance.
pub struct SceneHost {
    init_timeout: Duration,
    settle_delay: Duration,
    shadows: bool,
    epoch: SceneEpoch,
    state: HostState,
    events: Option<Receiver<LoadEvent>>,
    worker: Option<JoinHandle<()>>,
    progress: f32,
    /// Failure latch for the current attempt
    signaled: bool,
}

impl SceneHost {
    /// Create an idle host configured for the device tier.
    pub fn new(config: &TierConfig) -> Self {
        Self {
            init_timeout: config.init_timeout,
            settle_delay: config.settle_delay,
            shadows: config.shadows,
            epoch: SceneEpoch(0),
            state: HostState::Idle,
            events: None,
            worker: None,
            progress: 0.0,
            signaled: false,
        }
    }

    /// Current load attempt.
    pub fn epoch(&self) -> SceneEpoch {
        self.epoch
    }

    /// Fetch/decode progress of the current attempt, in [0, 1].
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Whether a live scene is available for rendering and mutation.
    pub fn is_live(&self) -> bool {
        matches!(self.state, HostState::Live { .. })
    }

    /// Tear down the current attempt and start a fresh one.
    pub fn begin_load(&mut self, source: Box<dyn ModelSource>, now: Instant) -> SceneEpoch {
        self.dispose();
        self.epoch = SceneEpoch(self.epoch.0 + 1);
        self.signaled = false;
        self.progress = 0.0;

        let (tx, rx) = bounded(32);
        self.worker = Some(spawn_fetch(source, self.epoch, tx));
        self.events = Some(rx);
        self.state = HostState::Fetching {
            deadline: now + self.init_timeout,
        };
        log::info!("Scene load attempt {} started", self.epoch.0);
        self.epoch
    }

    /// Drain worker events and advance the pipeline. Emits at most one
    /// signal per call in practice; failures are latched per attempt.
    pub fn poll(&mut self, now: Instant) -> Vec<SceneSignal> {
        let mut signals = Vec::new();

        let drained: Vec<LoadEvent> = match &self.events {
            Some(rx) => rx.try_iter().collect(),
            None => Vec::new(),
        };
        for event in drained {
            if event.epoch != self.epoch {
                log::debug!("Dropping stale load event from attempt {}", event.epoch.0);
                continue;
            }
            match event.kind {
                LoadEventKind::Started => {}
                LoadEventKind::Progress(fraction) => self.progress = fraction,
                LoadEventKind::Finished(graph) => self.on_graph_arrived(*graph, now, &mut signals),
                LoadEventKind::Failed(message) => {
                    self.fail(SceneFailure::Asset(message), &mut signals)
                }
            }
        }

        let timed_out =
            matches!(&self.state, HostState::Fetching { deadline } if now >= *deadline);
        let settled =
            matches!(&self.state, HostState::Settling { ready_at, .. } if now >= *ready_at);

        if timed_out {
            log::warn!("Scene graph did not arrive within {:?}", self.init_timeout);
            self.fail(SceneFailure::Timeout, &mut signals);
        } else if settled {
            if let HostState::Settling { graph, refs, .. } =
                std::mem::replace(&mut self.state, HostState::Idle)
            {
                self.state = HostState::Live { graph, refs };
                signals.push(SceneSignal::Loaded);
            }
        }

        signals
    }

    /// The settled or live scene with its classified handles.
    pub fn scene(&self) -> Option<(&SceneGraph, &ClassifiedMeshes)> {
        match &self.state {
            HostState::Settling { graph, refs, .. } | HostState::Live { graph, refs } => {
                Some((graph, refs))
            }
            _ => None,
        }
    }

    /// Mutable scene access for the control effects.
    pub fn scene_mut(&mut self) -> Option<(&mut SceneGraph, &ClassifiedMeshes)> {
        match &mut self.state {
            HostState::Settling { graph, refs, .. } | HostState::Live { graph, refs } => {
                Some((graph, refs))
            }
            _ => None,
        }
    }

    /// Swap the door glass. Safe no-op before the scene is up.
    pub fn set_privacy(&mut self, on: bool) {
        if let Some((graph, refs)) = self.scene_mut() {
            apply_privacy(graph, refs, on);
        }
    }

    /// Switch the meeting screens. Safe no-op before the scene is up.
    pub fn set_meeting(&mut self, on: bool) {
        if let Some((graph, refs)) = self.scene_mut() {
            apply_meeting(graph, refs, on);
        }
    }

    /// Ease the curtain mesh toward the drive position by one frame.
    /// Returns true while the mesh is still moving.
    pub fn ease_curtain(&mut self, position: f32, delta_time: f32) -> bool {
        match self.scene_mut() {
            Some((graph, refs)) => ease_curtain(graph, refs, position, delta_time),
            None => false,
        }
    }

    /// Release the current scene instance and its resources.
    pub fn dispose(&mut self) {
        if let HostState::Settling { mut graph, .. } | HostState::Live { mut graph, .. } =
            std::mem::replace(&mut self.state, HostState::Idle)
        {
            graph.dispose();
        }
        // Dropping the receiver unblocks a stale worker on its next send
        self.events = None;
        self.worker = None;
    }

    fn on_graph_arrived(&mut self, mut graph: SceneGraph, now: Instant, signals: &mut Vec<SceneSignal>) {
        if !matches!(self.state, HostState::Fetching { .. }) {
            log::debug!("Ignoring scene graph outside the fetching state");
            return;
        }
        match initialize(&mut graph, self.shadows) {
            Ok(refs) => {
                self.state = HostState::Settling {
                    graph,
                    refs,
                    ready_at: now + self.settle_delay,
                };
            }
            Err(err) => self.fail(SceneFailure::Init(err.to_string()), signals),
        }
    }

    fn fail(&mut self, failure: SceneFailure, signals: &mut Vec<SceneSignal>) {
        if self.signaled {
            log::debug!("Suppressing duplicate failure signal: {:?}", failure);
            return;
        }
        self.signaled = true;
        self.state = HostState::Failed;
        signals.push(SceneSignal::Failed(failure));
    }
}

impl Drop for SceneHost {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{DeviceTier, TierConfig};

    struct FailingSource;

    impl ModelSource for FailingSource {
        fn describe(&self) -> String {
            "failing source".to_string()
        }

        fn fetch(&mut self, _progress: &mut dyn FnMut(f32)) -> Result<SceneGraph, AssetError> {
            Err(AssetError::Invalid(ManifestError::Empty))
        }
    }

    struct StalledSource;

    impl ModelSource for StalledSource {
        fn describe(&self) -> String {
            "stalled source".to_string()
        }

        fn fetch(&mut self, _progress: &mut dyn FnMut(f32)) -> Result<SceneGraph, AssetError> {
            std::thread::sleep(Duration::from_millis(200));
            SceneManifest::demo_office()
                .build()
                .map_err(AssetError::from)
        }
    }

    fn fast_config() -> TierConfig {
        let mut config = TierConfig::for_tier(DeviceTier::Desktop);
        config.settle_delay = Duration::from_millis(0);
        config.init_timeout = Duration::from_millis(50);
        config
    }

    fn poll_until(host: &mut SceneHost, deadline_ms: u64) -> Vec<SceneSignal> {
        let deadline = Instant::now() + Duration::from_millis(deadline_ms);
        loop {
            let signals = host.poll(Instant::now());
            if !signals.is_empty() || Instant::now() >= deadline {
                return signals;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_load_reaches_live() {
        let mut host = SceneHost::new(&fast_config());
        host.begin_load(Box::new(BuiltinSource::new()), Instant::now());

        let signals = poll_until(&mut host, 1000);
        assert_eq!(signals, vec![SceneSignal::Loaded]);
        assert!(host.is_live());
        assert!(host.scene().is_some());
    }

    #[test]
    fn test_asset_failure_signals_once() {
        let mut host = SceneHost::new(&fast_config());
        host.begin_load(Box::new(FailingSource), Instant::now());

        let signals = poll_until(&mut host, 1000);
        assert!(matches!(
            signals.as_slice(),
            [SceneSignal::Failed(SceneFailure::Asset(_))]
        ));

        // The latch holds: the init deadline passing adds nothing
        let later = Instant::now() + Duration::from_millis(100);
        assert!(host.poll(later).is_empty());
    }

    #[test]
    fn test_stalled_fetch_times_out_and_latches() {
        let mut host = SceneHost::new(&fast_config());
        let t0 = Instant::now();
        host.begin_load(Box::new(StalledSource), t0);

        // Past the 50 ms deadline, before the worker finishes
        let signals = host.poll(t0 + Duration::from_millis(60));
        assert_eq!(signals, vec![SceneSignal::Failed(SceneFailure::Timeout)]);

        // The worker's late result is ignored by the failed attempt
        std::thread::sleep(Duration::from_millis(250));
        assert!(host.poll(Instant::now()).is_empty());
        assert!(!host.is_live());
    }

    #[test]
    fn test_reload_bumps_epoch_and_recovers() {
        let mut host = SceneHost::new(&fast_config());
        host.begin_load(Box::new(FailingSource), Instant::now());
        poll_until(&mut host, 1000);
        let first = host.epoch();

        host.begin_load(Box::new(BuiltinSource::new()), Instant::now());
        assert_eq!(host.epoch(), SceneEpoch(first.0 + 1));

        let signals = poll_until(&mut host, 1000);
        assert_eq!(signals, vec![SceneSignal::Loaded]);
    }

    #[test]
    fn test_mutation_is_noop_before_live() {
        let mut host = SceneHost::new(&fast_config());
        host.set_privacy(true);
        host.set_meeting(true);
        assert!(!host.ease_curtain(50.0, 1.0 / 60.0));
    }

    #[test]
    fn test_dispose_releases_scene() {
        let mut host = SceneHost::new(&fast_config());
        host.begin_load(Box::new(BuiltinSource::new()), Instant::now());
        poll_until(&mut host, 1000);
        assert!(host.is_live());

        host.dispose();
        assert!(!host.is_live());
        assert!(host.scene().is_none());
    }
}
