//! View host contract.
//!
//! The coordinator wraps the application's existing root view: a banner
//! region is inserted at one edge and the host shrinks to the remaining
//! area. Wrapping captures a [`LayoutSnapshot`]; `restore` must bring the
//! host back to exactly that layout.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::client::AdHandle;
use crate::config::BannerPlacement;
use crate::geometry::{AdSize, Insets, Rect, Rgb};

/// Captured pre-wrap layout of the host view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub frame: Rect,
    pub background: Rgb,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("host view is already wrapped")]
    AlreadyWrapped,
    #[error("host view is not wrapped")]
    NotWrapped,
    #[error("layout operation failed: {0}")]
    Layout(String),
}

/// Contract the application's view layer must satisfy.
pub trait ViewHost: Send + Sync {
    /// Safe display area for banner placement above/below the host.
    fn safe_insets(&self) -> Insets;

    /// Insert the banner region inside the safe display area and shrink the
    /// host to the remaining space. Returns a snapshot of the layout as it
    /// was before wrapping.
    fn wrap(
        &self,
        placement: BannerPlacement,
        size: AdSize,
        insets: Insets,
        background: Rgb,
    ) -> Result<LayoutSnapshot, HostError>;

    /// Make a loaded banner creative visible in the banner region.
    fn attach_banner(&self, handle: &AdHandle) -> Result<(), HostError>;

    /// Resize the banner region, e.g. after an orientation flip.
    fn resize_banner(&self, size: AdSize) -> Result<(), HostError>;

    /// Restyle the wrapper container behind the host.
    fn set_background(&self, color: Rgb) -> Result<(), HostError>;

    /// Teardown phase one: fade the banner region to invisible.
    fn fade_out_banner(&self) -> Result<(), HostError>;

    /// Teardown phase two: collapse the banner region so the host fills the
    /// container again.
    fn collapse_banner(&self) -> Result<(), HostError>;

    /// Undo the wrap entirely, restoring the captured layout.
    fn restore(&self, snapshot: &LayoutSnapshot) -> Result<(), HostError>;
}
