use crate::error::MediaError;
use crate::session::{EventSender, SessionEvent};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Fullscreen presentation port (browser: `requestFullscreen` and
/// `fullscreenchange`)
#[async_trait::async_trait]
pub trait FullscreenBackend: Send {
    fn is_supported(&self) -> bool;

    async fn request(&mut self) -> Result<(), MediaError>;

    fn exit(&mut self);

    fn is_fullscreen(&self) -> bool;

    /// Subscribe to fullscreen state changes
    fn watch(&mut self) -> mpsc::Receiver<bool>;
}

/// Keeps the session in fullscreen and reports when it is lost
pub struct FullscreenGuard {
    backend: Box<dyn FullscreenBackend>,
    events: EventSender,
    /// Between `enter()` and `exit()`
    engaged: bool,
    active: bool,
    /// Incremented on every `enter()`; changes from older watchers are stale
    generation: u64,
    watcher: Option<JoinHandle<()>>,
}

impl FullscreenGuard {
    pub fn new(backend: Box<dyn FullscreenBackend>, events: EventSender) -> Self {
        Self {
            backend,
            events,
            engaged: false,
            active: false,
            generation: 0,
            watcher: None,
        }
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Fullscreen is expected but not held. Never blocks input.
    pub fn warning(&self) -> bool {
        self.engaged && self.backend.is_supported() && !self.active
    }

    /// Best-effort: a failed request leaves the session running windowed
    pub async fn enter(&mut self) {
        if self.engaged {
            return;
        }
        self.engaged = true;
        self.generation += 1;

        if !self.backend.is_supported() {
            info!("Fullscreen not supported, continuing windowed");
            return;
        }

        let mut changes = self.backend.watch();
        let events = self.events.clone();
        let generation = self.generation;
        self.watcher = Some(tokio::spawn(async move {
            while let Some(active) = changes.recv().await {
                if events
                    .send(SessionEvent::FullscreenChanged { generation, active })
                    .is_err()
                {
                    break;
                }
            }
        }));

        match self.backend.request().await {
            Ok(()) => {
                self.active = self.backend.is_fullscreen();
                info!("Entered fullscreen");
            }
            Err(e) => {
                self.active = false;
                warn!("Fullscreen request failed, continuing windowed: {}", e);
            }
        }
    }

    pub fn handle_change(&mut self, generation: u64, active: bool) {
        if generation != self.generation {
            debug!("Dropping stale fullscreen change from watcher {}", generation);
            return;
        }
        if !self.engaged || self.active == active {
            return;
        }
        self.active = active;
        if active {
            info!("Fullscreen regained");
        } else {
            warn!("Fullscreen lost during active session");
        }
    }

    /// Stop monitoring and leave fullscreen; only the first call after
    /// `enter()` has any effect
    pub fn exit(&mut self) {
        if !self.engaged {
            return;
        }
        self.engaged = false;

        if let Some(task) = self.watcher.take() {
            task.abort();
        }

        if self.backend.is_supported() {
            self.backend.exit();
            info!("Exited fullscreen");
        }
        self.active = false;
    }
}
