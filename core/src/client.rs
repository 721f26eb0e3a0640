//! Ad network client contract.
//!
//! The coordinator consumes this seam; it never talks to a real SDK. Load
//! completions travel the other way, as `on_ad_loaded` / `on_ad_failed` /
//! `on_interstitial_dismissed` calls on the coordinator, so implementations
//! stay callback-free and the stale-event guard lives in one place.

use thiserror::Error;

use crate::geometry::AdSize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdKind {
    Banner,
    Interstitial,
}

impl std::fmt::Display for AdKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdKind::Banner => write!(f, "Banner"),
            AdKind::Interstitial => write!(f, "Interstitial"),
        }
    }
}

/// Opaque reference to a requested or loaded creative.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AdHandle {
    pub id: u64,
    pub kind: AdKind,
}

impl AdHandle {
    pub fn new(id: u64, kind: AdKind) -> Self {
        Self { id, kind }
    }
}

impl std::fmt::Display for AdHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.kind, self.id)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AdRequestError {
    #[error("ad network rejected application id {0:?}")]
    RejectedApplicationId(String),
    #[error("request refused for slot {slot:?}: {reason}")]
    Refused { slot: String, reason: String },
    #[error("no ad is ready to present")]
    NotReady,
}

/// Contract the ad network integration must satisfy.
///
/// `request_*` returns immediately with a handle for the in-flight load;
/// the platform glue later delivers the outcome to the coordinator's event
/// entry points on the same scheduling context.
pub trait AdNetworkClient: Send + Sync {
    fn initialize(&self, application_id: &str) -> Result<(), AdRequestError>;
    fn request_banner(&self, slot: &str, size: AdSize) -> Result<AdHandle, AdRequestError>;
    fn request_interstitial(&self, slot: &str) -> Result<AdHandle, AdRequestError>;
    fn is_ready(&self, handle: &AdHandle) -> bool;
    /// Display a loaded interstitial full-screen over the host.
    fn present(&self, handle: &AdHandle) -> Result<(), AdRequestError>;
}
