//! Lifecycle and connectivity notification contracts.
//!
//! Both notifiers hand out subscription handles so a stopped session can
//! release exactly what it registered. Event delivery itself goes through
//! the coordinator's `on_*` entry points.

/// Handle for a registered notification subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Foreground-resume and orientation-change notification source.
pub trait LifecycleNotifier: Send + Sync {
    fn subscribe(&self) -> SubscriptionId;
    fn unsubscribe(&self, id: SubscriptionId);
    /// Current interface orientation, queried once at session start.
    fn is_portrait(&self) -> bool;
}

/// Online/offline signal source with explicit monitoring lifetime.
pub trait ConnectivityMonitor: Send + Sync {
    fn start_monitoring(&self) -> SubscriptionId;
    /// Guaranteed release of the monitoring registration.
    fn stop_monitoring(&self, id: SubscriptionId);
    /// Reachability at the moment of the call, used to seed the session flag.
    fn is_reachable(&self) -> bool;
}
