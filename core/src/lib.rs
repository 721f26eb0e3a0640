// adrail — ad presentation orchestration
//
// One coordinator, four collaborator seams. The coordinator owns the
// session state machine; everything platform-shaped stays behind a trait.

pub mod client;
pub mod config;
pub mod coordinator;
pub mod geometry;
pub mod host;
pub mod notify;
pub mod sim;

pub use client::{AdHandle, AdKind, AdNetworkClient, AdRequestError};
pub use config::{AdConfig, BannerPlacement, ConfigError};
pub use coordinator::{AdPresentationCoordinator, CoordinatorError, SessionState, SessionStats};
pub use geometry::{AdSize, Insets, Orientation, Rect, Rgb};
pub use host::{HostError, LayoutSnapshot, ViewHost};
pub use notify::{ConnectivityMonitor, LifecycleNotifier, SubscriptionId};
