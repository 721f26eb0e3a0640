//! Ad presentation coordinator.
//!
//! Owns the banner/interstitial session lifecycle: wraps the host view,
//! issues load requests, reacts to foreground, orientation, and
//! connectivity events, and unwinds everything on stop. All operations and
//! collaborator callbacks run on the same event-delivery context; the
//! coordinator never blocks and never spawns.

use parking_lot::RwLock;
use std::sync::Arc;
use thiserror::Error;

use crate::client::{AdHandle, AdKind, AdNetworkClient};
use crate::config::{AdConfig, ConfigError};
use crate::geometry::{AdSize, Orientation, Rgb};
use crate::host::{HostError, LayoutSnapshot, ViewHost};
use crate::notify::{ConnectivityMonitor, LifecycleNotifier, SubscriptionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    Running,
    Stopping,
    Stopped,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionState::NotStarted => write!(f, "NotStarted"),
            SessionState::Running => write!(f, "Running"),
            SessionState::Stopping => write!(f, "Stopping"),
            SessionState::Stopped => write!(f, "Stopped"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoordinatorError {
    #[error("coordinator has not been configured")]
    NotConfigured,
    #[error("coordinator is already started")]
    AlreadyStarted,
    #[error("coordinator is not running")]
    NotRunning,
    #[error("session has ended and cannot be restarted")]
    SessionEnded,
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("view host error: {0}")]
    Host(#[from] HostError),
}

/// Counters for one session.
#[derive(Debug, Clone, Default)]
pub struct SessionStats {
    pub banner_requests: u64,
    pub interstitial_requests: u64,
    pub presentations: u64,
    pub load_failures: u64,
}

/// Per-session fields. Exists only between `start()` and `stop()`.
struct Session {
    banner: Option<AdHandle>,
    interstitial: Option<AdHandle>,
    banner_loading: bool,
    interstitial_loading: bool,
    presenting: bool,
    reachable: bool,
    orientation: Orientation,
    snapshot: LayoutSnapshot,
    lifecycle_sub: Option<SubscriptionId>,
    connectivity_sub: Option<SubscriptionId>,
}

impl Session {
    fn new(orientation: Orientation, reachable: bool, snapshot: LayoutSnapshot) -> Self {
        Self {
            banner: None,
            interstitial: None,
            banner_loading: false,
            interstitial_loading: false,
            presenting: false,
            reachable,
            orientation,
            snapshot,
            lifecycle_sub: None,
            connectivity_sub: None,
        }
    }
}

/// Coordinates banner and interstitial presentation over an injected set of
/// collaborators. Explicitly constructed, no global instance.
#[derive(Clone)]
pub struct AdPresentationCoordinator {
    client: Arc<dyn AdNetworkClient>,
    host: Arc<dyn ViewHost>,
    lifecycle: Arc<dyn LifecycleNotifier>,
    connectivity: Arc<dyn ConnectivityMonitor>,
    config: Arc<RwLock<Option<AdConfig>>>,
    state: Arc<RwLock<SessionState>>,
    session: Arc<RwLock<Option<Session>>>,
    stats: Arc<RwLock<SessionStats>>,
}

impl AdPresentationCoordinator {
    pub fn new(
        client: Arc<dyn AdNetworkClient>,
        host: Arc<dyn ViewHost>,
        lifecycle: Arc<dyn LifecycleNotifier>,
        connectivity: Arc<dyn ConnectivityMonitor>,
    ) -> Self {
        Self {
            client,
            host,
            lifecycle,
            connectivity,
            config: Arc::new(RwLock::new(None)),
            state: Arc::new(RwLock::new(SessionState::NotStarted)),
            session: Arc::new(RwLock::new(None)),
            stats: Arc::new(RwLock::new(SessionStats::default())),
        }
    }

    // ------------------------------------------------------------------------
    // LIFECYCLE
    // ------------------------------------------------------------------------

    /// Store the session configuration. Valid only before `start()`.
    pub fn configure(&self, config: AdConfig) -> Result<(), CoordinatorError> {
        match *self.state.read() {
            SessionState::NotStarted => {}
            SessionState::Running | SessionState::Stopping => {
                return Err(CoordinatorError::AlreadyStarted)
            }
            SessionState::Stopped => return Err(CoordinatorError::SessionEnded),
        }

        config.validate()?;
        *self.config.write() = Some(config);
        Ok(())
    }

    /// Wrap the host view, kick off the initial loads, and subscribe to
    /// lifecycle and connectivity notifications.
    pub fn start(&self) -> Result<(), CoordinatorError> {
        match *self.state.read() {
            SessionState::NotStarted => {}
            SessionState::Running | SessionState::Stopping => {
                return Err(CoordinatorError::AlreadyStarted)
            }
            SessionState::Stopped => return Err(CoordinatorError::SessionEnded),
        }

        let config = self
            .config
            .read()
            .clone()
            .ok_or(CoordinatorError::NotConfigured)?;

        // A rejected application id is logged and swallowed; ads are
        // best-effort and there is no retry at this layer.
        if let Err(e) = self.client.initialize(config.effective_application_id()) {
            tracing::warn!("ad network initialization failed: {}", e);
        }

        let orientation = Orientation::from_portrait(self.lifecycle.is_portrait());
        let size = AdSize::smart_banner(orientation);
        let insets = self.host.safe_insets();
        tracing::debug!(
            ?insets,
            placement = %config.placement,
            %size,
            "wrapping host view"
        );
        let snapshot = self
            .host
            .wrap(config.placement, size, insets, config.wrapper_background)?;

        let mut session = Session::new(orientation, self.connectivity.is_reachable(), snapshot);
        session.lifecycle_sub = Some(self.lifecycle.subscribe());
        session.connectivity_sub = Some(self.connectivity.start_monitoring());

        *self.session.write() = Some(session);
        *self.state.write() = SessionState::Running;

        self.request_banner_load(&config);
        self.request_interstitial_load(&config);

        tracing::info!("ad session started");
        Ok(())
    }

    /// Tear the session down: fade and collapse the banner region,
    /// unsubscribe, restore the captured layout, discard ad handles.
    ///
    /// Idempotent once a stop has begun; an error if the session never
    /// started.
    pub fn stop(&self) -> Result<(), CoordinatorError> {
        {
            let mut state = self.state.write();
            match *state {
                SessionState::Running => *state = SessionState::Stopping,
                SessionState::Stopping | SessionState::Stopped => return Ok(()),
                SessionState::NotStarted => return Err(CoordinatorError::NotRunning),
            }
        }

        tracing::info!("ad session stopping");

        // Two sequential teardown phases: fade first, then collapse the
        // layout back to host-fills-container. Failures here are logged and
        // teardown continues; the restore below is what must succeed.
        if let Err(e) = self.host.fade_out_banner() {
            tracing::warn!("banner fade-out failed: {}", e);
        }
        if let Err(e) = self.host.collapse_banner() {
            tracing::warn!("banner collapse failed: {}", e);
        }

        let session = self.session.write().take();
        let mut restore_result = Ok(());
        if let Some(session) = session {
            if let Some(id) = session.lifecycle_sub {
                self.lifecycle.unsubscribe(id);
            }
            if let Some(id) = session.connectivity_sub {
                self.connectivity.stop_monitoring(id);
            }
            restore_result = self.host.restore(&session.snapshot);
            // banner and interstitial handles are dropped with the session
        }

        *self.state.write() = SessionState::Stopped;
        restore_result?;

        tracing::info!("ad session stopped");
        Ok(())
    }

    /// Display the loaded interstitial, if any.
    ///
    /// Returns `Ok(false)` when nothing is ready or a presentation is still
    /// on screen. The consumed handle is replaced with a fresh load once the
    /// client reports dismissal.
    pub fn present_interstitial(&self) -> Result<bool, CoordinatorError> {
        self.ensure_running()?;

        let handle = {
            let guard = self.session.read();
            let session = guard.as_ref().ok_or(CoordinatorError::NotRunning)?;
            if session.presenting {
                tracing::debug!("interstitial already on screen, skipping");
                return Ok(false);
            }
            match &session.interstitial {
                Some(handle) if self.client.is_ready(handle) => handle.clone(),
                _ => {
                    tracing::debug!("no interstitial ready to present");
                    return Ok(false);
                }
            }
        };

        match self.client.present(&handle) {
            Ok(()) => {
                if let Some(session) = self.session.write().as_mut() {
                    session.presenting = true;
                }
                self.stats.write().presentations += 1;
                tracing::info!(%handle, "interstitial presented");
                Ok(true)
            }
            Err(e) => {
                tracing::warn!(%handle, "interstitial presentation failed: {}", e);
                Ok(false)
            }
        }
    }

    /// Restyle the wrapper container. Applied immediately while running,
    /// stored for the next start otherwise.
    pub fn set_background(&self, color: Rgb) -> Result<(), CoordinatorError> {
        {
            let mut config = self.config.write();
            match config.as_mut() {
                Some(config) => config.wrapper_background = color,
                None => return Err(CoordinatorError::NotConfigured),
            }
        }

        if self.state() == SessionState::Running {
            self.host.set_background(color)?;
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // EVENT ENTRY POINTS
    // ------------------------------------------------------------------------

    /// App returned to the foreground; loaded ads are assumed stale.
    pub fn on_foreground(&self) {
        if !self.is_running() {
            tracing::debug!("foreground event outside running session, ignoring");
            return;
        }
        let Some(config) = self.config.read().clone() else {
            return;
        };

        tracing::debug!("foreground resume, refreshing ads");
        self.request_banner_load(&config);
        self.request_interstitial_load(&config);
    }

    /// Orientation is about to change. Resizes the banner region when the
    /// portrait/landscape classification flips; never reloads content.
    pub fn on_orientation_will_change(&self, is_portrait: bool) {
        if !self.is_running() {
            return;
        }

        let orientation = Orientation::from_portrait(is_portrait);
        let flipped = {
            let mut guard = self.session.write();
            let Some(session) = guard.as_mut() else {
                return;
            };
            if session.orientation == orientation {
                false
            } else {
                session.orientation = orientation;
                true
            }
        };

        if flipped {
            let size = AdSize::smart_banner(orientation);
            match self.host.resize_banner(size) {
                Ok(()) => tracing::debug!(%orientation, %size, "banner region resized"),
                Err(e) => tracing::warn!("banner resize failed: {}", e),
            }
        }
    }

    /// Connectivity came back. Reloads exactly once per offline→online edge.
    pub fn on_reachable(&self) {
        if !self.is_running() {
            return;
        }

        let was_offline = {
            let mut guard = self.session.write();
            let Some(session) = guard.as_mut() else {
                return;
            };
            if session.reachable {
                false
            } else {
                session.reachable = true;
                true
            }
        };

        if was_offline {
            tracing::info!("connectivity regained, refreshing ads");
            let Some(config) = self.config.read().clone() else {
                return;
            };
            self.request_banner_load(&config);
            self.request_interstitial_load(&config);
        }
    }

    /// Connectivity dropped. Records the flag; in-flight requests are left
    /// to the client's own timeout semantics.
    pub fn on_unreachable(&self) {
        if !self.is_running() {
            return;
        }
        let mut guard = self.session.write();
        if let Some(session) = guard.as_mut() {
            if session.reachable {
                tracing::info!("connectivity lost");
                session.reachable = false;
            }
        }
    }

    /// A load request completed. Ignored outside a running session so a
    /// completion racing `stop()` cannot resurrect state.
    pub fn on_ad_loaded(&self, handle: AdHandle) {
        if !self.is_running() {
            tracing::debug!(%handle, "ad load completed after session end, ignoring");
            return;
        }

        match handle.kind {
            AdKind::Banner => {
                {
                    let mut guard = self.session.write();
                    let Some(session) = guard.as_mut() else {
                        return;
                    };
                    session.banner = Some(handle.clone());
                    session.banner_loading = false;
                }
                match self.host.attach_banner(&handle) {
                    Ok(()) => tracing::info!(%handle, "banner visible"),
                    Err(e) => tracing::warn!(%handle, "failed to attach banner: {}", e),
                }
            }
            AdKind::Interstitial => {
                let mut guard = self.session.write();
                if let Some(session) = guard.as_mut() {
                    session.interstitial = Some(handle.clone());
                    session.interstitial_loading = false;
                }
                tracing::info!(%handle, "interstitial ready");
            }
        }
    }

    /// A load request failed. Logged and not retried here; the next
    /// lifecycle or connectivity event is the retry point.
    pub fn on_ad_failed(&self, handle: AdHandle, reason: &str) {
        if !self.is_running() {
            tracing::debug!(%handle, "ad failure after session end, ignoring");
            return;
        }

        tracing::warn!(%handle, "ad load failed: {}", reason);
        self.stats.write().load_failures += 1;

        let mut guard = self.session.write();
        if let Some(session) = guard.as_mut() {
            match handle.kind {
                AdKind::Banner => session.banner_loading = false,
                AdKind::Interstitial => session.interstitial_loading = false,
            }
        }
    }

    /// The presented interstitial was dismissed. The consumed handle is
    /// discarded and eagerly replaced: one outstanding interstitial at a
    /// time, refilled after every presentation.
    pub fn on_interstitial_dismissed(&self) {
        if !self.is_running() {
            tracing::debug!("interstitial dismissal after session end, ignoring");
            return;
        }

        {
            let mut guard = self.session.write();
            if let Some(session) = guard.as_mut() {
                session.interstitial = None;
                session.presenting = false;
            }
        }

        let Some(config) = self.config.read().clone() else {
            return;
        };
        tracing::debug!("interstitial consumed, requesting replacement");
        self.request_interstitial_load(&config);
    }

    // ------------------------------------------------------------------------
    // ACCESSORS
    // ------------------------------------------------------------------------

    pub fn state(&self) -> SessionState {
        *self.state.read()
    }

    pub fn is_running(&self) -> bool {
        matches!(*self.state.read(), SessionState::Running)
    }

    pub fn stats(&self) -> SessionStats {
        self.stats.read().clone()
    }

    pub fn config(&self) -> Option<AdConfig> {
        self.config.read().clone()
    }

    // ------------------------------------------------------------------------
    // INTERNAL
    // ------------------------------------------------------------------------

    fn ensure_running(&self) -> Result<(), CoordinatorError> {
        if self.is_running() {
            Ok(())
        } else {
            Err(CoordinatorError::NotRunning)
        }
    }

    /// Issue a banner load unless one is already in flight. A slot that is
    /// merely loaded is refreshed; the in-flight guard is what preserves the
    /// one-outstanding-load-per-slot invariant.
    fn request_banner_load(&self, config: &AdConfig) {
        let size = {
            let mut guard = self.session.write();
            let Some(session) = guard.as_mut() else {
                return;
            };
            if session.banner_loading {
                tracing::debug!("banner load already in flight, skipping");
                return;
            }
            session.banner_loading = true;
            AdSize::smart_banner(session.orientation)
        };

        self.stats.write().banner_requests += 1;
        match self.client.request_banner(config.effective_banner_slot(), size) {
            Ok(handle) => tracing::debug!(%handle, "banner load requested"),
            Err(e) => {
                tracing::warn!("banner request failed: {}", e);
                self.stats.write().load_failures += 1;
                if let Some(session) = self.session.write().as_mut() {
                    session.banner_loading = false;
                }
            }
        }
    }

    /// Issue an interstitial load unless one is already in flight.
    fn request_interstitial_load(&self, config: &AdConfig) {
        {
            let mut guard = self.session.write();
            let Some(session) = guard.as_mut() else {
                return;
            };
            if session.interstitial_loading {
                tracing::debug!("interstitial load already in flight, skipping");
                return;
            }
            session.interstitial_loading = true;
        }

        self.stats.write().interstitial_requests += 1;
        match self
            .client
            .request_interstitial(config.effective_interstitial_slot())
        {
            Ok(handle) => tracing::debug!(%handle, "interstitial load requested"),
            Err(e) => {
                tracing::warn!("interstitial request failed: {}", e);
                self.stats.write().load_failures += 1;
                if let Some(session) = self.session.write().as_mut() {
                    session.interstitial_loading = false;
                }
            }
        }
    }
}
