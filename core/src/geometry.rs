//! Banner geometry and orientation classification.
//!
//! The coordinator never does real layout; these types carry just enough
//! geometry for the view host contract and the smart-banner size tables.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn from_portrait(is_portrait: bool) -> Self {
        if is_portrait {
            Orientation::Portrait
        } else {
            Orientation::Landscape
        }
    }

    pub fn is_portrait(&self) -> bool {
        matches!(self, Orientation::Portrait)
    }
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Orientation::Portrait => write!(f, "Portrait"),
            Orientation::Landscape => write!(f, "Landscape"),
        }
    }
}

/// Requested creative size in points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdSize {
    pub width: u32,
    pub height: u32,
}

impl AdSize {
    /// Full-width banner for portrait phones.
    pub const SMART_BANNER_PORTRAIT: AdSize = AdSize {
        width: 320,
        height: 50,
    };

    /// Shorter full-width banner for landscape.
    pub const SMART_BANNER_LANDSCAPE: AdSize = AdSize {
        width: 480,
        height: 32,
    };

    /// Orientation-appropriate smart banner size.
    pub fn smart_banner(orientation: Orientation) -> Self {
        match orientation {
            Orientation::Portrait => Self::SMART_BANNER_PORTRAIT,
            Orientation::Landscape => Self::SMART_BANNER_LANDSCAPE,
        }
    }
}

impl std::fmt::Display for AdSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Safe display area insets reported by the view host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Insets {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

/// A frame in the host's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Wrapper background color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const GRAY: Rgb = Rgb {
        r: 128,
        g: 128,
        b: 128,
    };
}

impl Default for Rgb {
    fn default() -> Self {
        Rgb::GRAY
    }
}
