//! In-memory collaborators for integration tests and the CLI demo.
//!
//! Deterministic stand-ins for the four contracts. Nothing here completes a
//! load on its own: tests and the demo pull a pending handle out of the
//! simulated network and deliver it to the coordinator themselves, which
//! keeps every scenario single-threaded and scriptable.

use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::client::{AdHandle, AdKind, AdNetworkClient, AdRequestError};
use crate::config::BannerPlacement;
use crate::geometry::{AdSize, Insets, Rect, Rgb};
use crate::host::{HostError, LayoutSnapshot, ViewHost};
use crate::notify::{ConnectivityMonitor, LifecycleNotifier, SubscriptionId};

// ============================================================================
// AD NETWORK
// ============================================================================

/// One accepted load request, as recorded by [`SimulatedAdNetwork`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub kind: AdKind,
    pub slot: String,
    pub size: Option<AdSize>,
    pub handle: AdHandle,
}

#[derive(Default)]
struct NetworkState {
    initialized_with: Option<String>,
    requests: Vec<RecordedRequest>,
    ready: HashSet<AdHandle>,
    presented: Vec<AdHandle>,
    reject_application_id: bool,
    refuse_requests: bool,
}

/// Recording ad network client.
pub struct SimulatedAdNetwork {
    next_id: AtomicU64,
    inner: RwLock<NetworkState>,
}

impl SimulatedAdNetwork {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            inner: RwLock::new(NetworkState::default()),
        }
    }

    /// Make `initialize` reject the application id.
    pub fn reject_application_id(&self, reject: bool) {
        self.inner.write().reject_application_id = reject;
    }

    /// Make every load request fail immediately.
    pub fn refuse_requests(&self, refuse: bool) {
        self.inner.write().refuse_requests = refuse;
    }

    pub fn initialized_with(&self) -> Option<String> {
        self.inner.read().initialized_with.clone()
    }

    /// All accepted requests, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.inner.read().requests.clone()
    }

    pub fn request_count(&self, kind: AdKind) -> usize {
        self.inner
            .read()
            .requests
            .iter()
            .filter(|r| r.kind == kind)
            .count()
    }

    pub fn last_request(&self, kind: AdKind) -> Option<RecordedRequest> {
        self.inner
            .read()
            .requests
            .iter()
            .rev()
            .find(|r| r.kind == kind)
            .cloned()
    }

    /// Mark the most recent request of `kind` as loaded and ready, returning
    /// its handle for delivery to the coordinator.
    pub fn complete(&self, kind: AdKind) -> Option<AdHandle> {
        let handle = self.last_request(kind)?.handle;
        self.inner.write().ready.insert(handle.clone());
        Some(handle)
    }

    /// Handles presented so far, in order.
    pub fn presented(&self) -> Vec<AdHandle> {
        self.inner.read().presented.clone()
    }
}

impl Default for SimulatedAdNetwork {
    fn default() -> Self {
        Self::new()
    }
}

impl AdNetworkClient for SimulatedAdNetwork {
    fn initialize(&self, application_id: &str) -> Result<(), AdRequestError> {
        let mut inner = self.inner.write();
        if inner.reject_application_id {
            return Err(AdRequestError::RejectedApplicationId(
                application_id.to_string(),
            ));
        }
        inner.initialized_with = Some(application_id.to_string());
        Ok(())
    }

    fn request_banner(&self, slot: &str, size: AdSize) -> Result<AdHandle, AdRequestError> {
        let mut inner = self.inner.write();
        if inner.refuse_requests {
            return Err(AdRequestError::Refused {
                slot: slot.to_string(),
                reason: "refused by simulation".to_string(),
            });
        }
        let handle = AdHandle::new(self.next_id.fetch_add(1, Ordering::Relaxed), AdKind::Banner);
        inner.requests.push(RecordedRequest {
            kind: AdKind::Banner,
            slot: slot.to_string(),
            size: Some(size),
            handle: handle.clone(),
        });
        Ok(handle)
    }

    fn request_interstitial(&self, slot: &str) -> Result<AdHandle, AdRequestError> {
        let mut inner = self.inner.write();
        if inner.refuse_requests {
            return Err(AdRequestError::Refused {
                slot: slot.to_string(),
                reason: "refused by simulation".to_string(),
            });
        }
        let handle = AdHandle::new(
            self.next_id.fetch_add(1, Ordering::Relaxed),
            AdKind::Interstitial,
        );
        inner.requests.push(RecordedRequest {
            kind: AdKind::Interstitial,
            slot: slot.to_string(),
            size: None,
            handle: handle.clone(),
        });
        Ok(handle)
    }

    fn is_ready(&self, handle: &AdHandle) -> bool {
        self.inner.read().ready.contains(handle)
    }

    fn present(&self, handle: &AdHandle) -> Result<(), AdRequestError> {
        let mut inner = self.inner.write();
        if !inner.ready.remove(handle) {
            return Err(AdRequestError::NotReady);
        }
        inner.presented.push(handle.clone());
        Ok(())
    }
}

// ============================================================================
// VIEW HOST
// ============================================================================

struct WrappedLayout {
    placement: BannerPlacement,
    insets: Insets,
    banner: Rect,
}

struct HostState {
    container: Rect,
    frame: Rect,
    background: Rgb,
    wrapped: Option<WrappedLayout>,
    attached: Option<AdHandle>,
    banner_faded: bool,
}

/// Layout-tracking view host.
///
/// Models a fixed container whose host frame shrinks while wrapped and is
/// restored from the snapshot on `restore`.
pub struct SimulatedViewHost {
    inner: RwLock<HostState>,
}

impl SimulatedViewHost {
    pub fn new() -> Self {
        Self::with_container(Rect::new(0, 0, 320, 568))
    }

    pub fn with_container(container: Rect) -> Self {
        Self {
            inner: RwLock::new(HostState {
                container,
                frame: container,
                background: Rgb::GRAY,
                wrapped: None,
                attached: None,
                banner_faded: false,
            }),
        }
    }

    pub fn host_frame(&self) -> Rect {
        self.inner.read().frame
    }

    pub fn background(&self) -> Rgb {
        self.inner.read().background
    }

    pub fn is_wrapped(&self) -> bool {
        self.inner.read().wrapped.is_some()
    }

    pub fn banner_frame(&self) -> Option<Rect> {
        self.inner.read().wrapped.as_ref().map(|w| w.banner)
    }

    pub fn attached_banner(&self) -> Option<AdHandle> {
        self.inner.read().attached.clone()
    }

    pub fn banner_faded(&self) -> bool {
        self.inner.read().banner_faded
    }

    fn apply_layout(
        state: &mut HostState,
        placement: BannerPlacement,
        size: AdSize,
        insets: Insets,
    ) {
        let container = state.container;
        let banner_height = size.height.min(container.height);
        match placement {
            BannerPlacement::Top => {
                // Banner docks just below the top inset; host takes the rest.
                let banner_y = container.y + insets.top as i32;
                let host_y = banner_y + banner_height as i32;
                let host_height = container
                    .height
                    .saturating_sub(insets.top + banner_height);
                state.frame = Rect::new(container.x, host_y, container.width, host_height);
                state.wrapped = Some(WrappedLayout {
                    placement,
                    insets,
                    banner: Rect::new(container.x, banner_y, container.width, banner_height),
                });
            }
            BannerPlacement::Bottom => {
                // Banner docks just above the bottom inset.
                let host_height = container
                    .height
                    .saturating_sub(insets.bottom + banner_height);
                state.frame = Rect::new(container.x, container.y, container.width, host_height);
                state.wrapped = Some(WrappedLayout {
                    placement,
                    insets,
                    banner: Rect::new(
                        container.x,
                        container.y + host_height as i32,
                        container.width,
                        banner_height,
                    ),
                });
            }
        }
    }
}

impl Default for SimulatedViewHost {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewHost for SimulatedViewHost {
    fn safe_insets(&self) -> Insets {
        Insets {
            top: 20,
            bottom: 0,
            left: 0,
            right: 0,
        }
    }

    fn wrap(
        &self,
        placement: BannerPlacement,
        size: AdSize,
        insets: Insets,
        background: Rgb,
    ) -> Result<LayoutSnapshot, HostError> {
        let mut state = self.inner.write();
        if state.wrapped.is_some() {
            return Err(HostError::AlreadyWrapped);
        }
        let snapshot = LayoutSnapshot {
            frame: state.frame,
            background: state.background,
        };
        Self::apply_layout(&mut state, placement, size, insets);
        state.background = background;
        state.banner_faded = false;
        Ok(snapshot)
    }

    fn attach_banner(&self, handle: &AdHandle) -> Result<(), HostError> {
        let mut state = self.inner.write();
        if state.wrapped.is_none() {
            return Err(HostError::NotWrapped);
        }
        state.attached = Some(handle.clone());
        Ok(())
    }

    fn resize_banner(&self, size: AdSize) -> Result<(), HostError> {
        let mut state = self.inner.write();
        let (placement, insets) = match &state.wrapped {
            Some(w) => (w.placement, w.insets),
            None => return Err(HostError::NotWrapped),
        };
        Self::apply_layout(&mut state, placement, size, insets);
        Ok(())
    }

    fn set_background(&self, color: Rgb) -> Result<(), HostError> {
        self.inner.write().background = color;
        Ok(())
    }

    fn fade_out_banner(&self) -> Result<(), HostError> {
        let mut state = self.inner.write();
        if state.wrapped.is_none() {
            return Err(HostError::NotWrapped);
        }
        state.banner_faded = true;
        Ok(())
    }

    fn collapse_banner(&self) -> Result<(), HostError> {
        let mut state = self.inner.write();
        match state.wrapped.as_mut() {
            Some(wrapped) => {
                wrapped.banner.height = 0;
            }
            None => return Err(HostError::NotWrapped),
        }
        state.frame = state.container;
        Ok(())
    }

    fn restore(&self, snapshot: &LayoutSnapshot) -> Result<(), HostError> {
        let mut state = self.inner.write();
        state.frame = snapshot.frame;
        state.background = snapshot.background;
        state.wrapped = None;
        state.attached = None;
        state.banner_faded = false;
        Ok(())
    }
}

// ============================================================================
// NOTIFIERS
// ============================================================================

struct LifecycleState {
    portrait: bool,
    subscribers: HashSet<SubscriptionId>,
}

/// Scriptable lifecycle notification source.
pub struct SimulatedLifecycle {
    next_id: AtomicU64,
    inner: RwLock<LifecycleState>,
}

impl SimulatedLifecycle {
    pub fn new(portrait: bool) -> Self {
        Self {
            next_id: AtomicU64::new(1),
            inner: RwLock::new(LifecycleState {
                portrait,
                subscribers: HashSet::new(),
            }),
        }
    }

    pub fn set_portrait(&self, portrait: bool) {
        self.inner.write().portrait = portrait;
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.read().subscribers.len()
    }
}

impl LifecycleNotifier for SimulatedLifecycle {
    fn subscribe(&self) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.inner.write().subscribers.insert(id);
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        self.inner.write().subscribers.remove(&id);
    }

    fn is_portrait(&self) -> bool {
        self.inner.read().portrait
    }
}

struct ConnectivityState {
    reachable: bool,
    monitors: HashSet<SubscriptionId>,
}

/// Scriptable connectivity signal source.
pub struct SimulatedConnectivity {
    next_id: AtomicU64,
    inner: RwLock<ConnectivityState>,
}

impl SimulatedConnectivity {
    pub fn new(reachable: bool) -> Self {
        Self {
            next_id: AtomicU64::new(1),
            inner: RwLock::new(ConnectivityState {
                reachable,
                monitors: HashSet::new(),
            }),
        }
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.inner.write().reachable = reachable;
    }

    pub fn monitor_count(&self) -> usize {
        self.inner.read().monitors.len()
    }
}

impl ConnectivityMonitor for SimulatedConnectivity {
    fn start_monitoring(&self) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.inner.write().monitors.insert(id);
        id
    }

    fn stop_monitoring(&self, id: SubscriptionId) {
        self.inner.write().monitors.remove(&id);
    }

    fn is_reachable(&self) -> bool {
        self.inner.read().reachable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_records_requests() {
        let network = SimulatedAdNetwork::new();
        network.initialize("app").unwrap();
        let banner = network
            .request_banner("b1", AdSize::SMART_BANNER_PORTRAIT)
            .unwrap();
        let interstitial = network.request_interstitial("i1").unwrap();

        assert_eq!(network.initialized_with().as_deref(), Some("app"));
        assert_eq!(network.request_count(AdKind::Banner), 1);
        assert_eq!(network.request_count(AdKind::Interstitial), 1);
        assert_ne!(banner.id, interstitial.id);
    }

    #[test]
    fn test_network_present_requires_ready() {
        let network = SimulatedAdNetwork::new();
        let handle = network.request_interstitial("i1").unwrap();
        assert!(!network.is_ready(&handle));
        assert_eq!(network.present(&handle), Err(AdRequestError::NotReady));

        let completed = network.complete(AdKind::Interstitial).unwrap();
        assert_eq!(completed, handle);
        assert!(network.is_ready(&handle));
        assert!(network.present(&handle).is_ok());

        // consumed by presentation
        assert!(!network.is_ready(&handle));
        assert_eq!(network.presented(), vec![handle]);
    }

    #[test]
    fn test_host_wrap_bottom_layout() {
        let host = SimulatedViewHost::new();
        let before = host.host_frame();
        let snapshot = host
            .wrap(
                BannerPlacement::Bottom,
                AdSize::SMART_BANNER_PORTRAIT,
                Insets::default(),
                Rgb::GRAY,
            )
            .unwrap();

        assert_eq!(snapshot.frame, before);
        let banner = host.banner_frame().unwrap();
        assert_eq!(banner.height, 50);
        assert_eq!(banner.y, 568 - 50);
        assert_eq!(host.host_frame().height, 568 - 50);
    }

    #[test]
    fn test_host_wrap_top_layout_respects_inset() {
        let host = SimulatedViewHost::new();
        host.wrap(
            BannerPlacement::Top,
            AdSize::SMART_BANNER_PORTRAIT,
            host.safe_insets(),
            Rgb::GRAY,
        )
        .unwrap();

        // Banner docks below the 20pt top inset, host below the banner.
        let banner = host.banner_frame().unwrap();
        assert_eq!(banner.y, 20);
        assert_eq!(host.host_frame().y, 70);
        assert_eq!(host.host_frame().height, 568 - 70);
    }

    #[test]
    fn test_host_wrap_bottom_respects_inset() {
        let host = SimulatedViewHost::new();
        host.wrap(
            BannerPlacement::Bottom,
            AdSize::SMART_BANNER_PORTRAIT,
            Insets {
                bottom: 34,
                ..Insets::default()
            },
            Rgb::GRAY,
        )
        .unwrap();

        let banner = host.banner_frame().unwrap();
        assert_eq!(banner.y, 568 - 34 - 50);
        assert_eq!(host.host_frame().height, 568 - 34 - 50);
    }

    #[test]
    fn test_host_double_wrap_fails() {
        let host = SimulatedViewHost::new();
        host.wrap(
            BannerPlacement::Bottom,
            AdSize::SMART_BANNER_PORTRAIT,
            Insets::default(),
            Rgb::GRAY,
        )
        .unwrap();
        assert_eq!(
            host.wrap(
                BannerPlacement::Bottom,
                AdSize::SMART_BANNER_PORTRAIT,
                Insets::default(),
                Rgb::GRAY,
            ),
            Err(HostError::AlreadyWrapped)
        );
    }

    #[test]
    fn test_host_restore_round_trip() {
        let host = SimulatedViewHost::new();
        let before = host.host_frame();
        let background_before = host.background();

        let snapshot = host
            .wrap(
                BannerPlacement::Bottom,
                AdSize::SMART_BANNER_PORTRAIT,
                Insets::default(),
                Rgb { r: 0, g: 0, b: 0 },
            )
            .unwrap();
        host.fade_out_banner().unwrap();
        host.collapse_banner().unwrap();
        host.restore(&snapshot).unwrap();

        assert_eq!(host.host_frame(), before);
        assert_eq!(host.background(), background_before);
        assert!(!host.is_wrapped());
        assert!(host.attached_banner().is_none());
    }

    #[test]
    fn test_host_operations_require_wrap() {
        let host = SimulatedViewHost::new();
        let handle = AdHandle::new(1, AdKind::Banner);
        assert_eq!(host.attach_banner(&handle), Err(HostError::NotWrapped));
        assert_eq!(
            host.resize_banner(AdSize::SMART_BANNER_LANDSCAPE),
            Err(HostError::NotWrapped)
        );
        assert_eq!(host.fade_out_banner(), Err(HostError::NotWrapped));
        assert_eq!(host.collapse_banner(), Err(HostError::NotWrapped));
    }

    #[test]
    fn test_lifecycle_subscriptions() {
        let lifecycle = SimulatedLifecycle::new(true);
        let a = lifecycle.subscribe();
        let b = lifecycle.subscribe();
        assert_ne!(a, b);
        assert_eq!(lifecycle.subscriber_count(), 2);

        lifecycle.unsubscribe(a);
        assert_eq!(lifecycle.subscriber_count(), 1);
        assert!(lifecycle.is_portrait());
    }

    #[test]
    fn test_connectivity_monitoring() {
        let connectivity = SimulatedConnectivity::new(true);
        let id = connectivity.start_monitoring();
        assert_eq!(connectivity.monitor_count(), 1);

        connectivity.set_reachable(false);
        assert!(!connectivity.is_reachable());

        connectivity.stop_monitoring(id);
        assert_eq!(connectivity.monitor_count(), 0);
    }
}
