//! Session configuration for the ad presentation coordinator.
//!
//! Set once before `start()`; immutable for the life of the session apart
//! from the wrapper background color, which may be restyled while running.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Rgb;

/// Published test application identifier for the ad network.
pub const TEST_APPLICATION_ID: &str = "ca-app-pub-3940256099942544~1458002511";
/// Published test banner inventory.
pub const TEST_BANNER_SLOT: &str = "ca-app-pub-3940256099942544/2934735716";
/// Published test interstitial inventory.
pub const TEST_INTERSTITIAL_SLOT: &str = "ca-app-pub-3940256099942544/4411468910";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BannerPlacement {
    Top,
    Bottom,
}

impl std::fmt::Display for BannerPlacement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BannerPlacement::Top => write!(f, "Top"),
            BannerPlacement::Bottom => write!(f, "Bottom"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("application id cannot be empty")]
    EmptyApplicationId,
    #[error("banner slot id cannot be empty")]
    EmptyBannerSlot,
    #[error("interstitial slot id cannot be empty")]
    EmptyInterstitialSlot,
}

/// Configuration for one ad session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdConfig {
    /// Application identifier registered with the ad network.
    pub application_id: String,
    /// Inventory slot for the docked banner.
    pub banner_slot: String,
    /// Inventory slot for the full-screen interstitial.
    pub interstitial_slot: String,
    /// Which edge of the screen the banner docks to.
    pub placement: BannerPlacement,
    /// Background of the wrapper container behind the host view.
    pub wrapper_background: Rgb,
    /// Substitute the network's published test inventory for every request.
    pub use_test_inventory: bool,
}

impl Default for AdConfig {
    fn default() -> Self {
        Self {
            application_id: TEST_APPLICATION_ID.to_string(),
            banner_slot: TEST_BANNER_SLOT.to_string(),
            interstitial_slot: TEST_INTERSTITIAL_SLOT.to_string(),
            placement: BannerPlacement::Bottom,
            wrapper_background: Rgb::GRAY,
            use_test_inventory: false,
        }
    }
}

impl AdConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.application_id.is_empty() {
            return Err(ConfigError::EmptyApplicationId);
        }
        if self.banner_slot.is_empty() {
            return Err(ConfigError::EmptyBannerSlot);
        }
        if self.interstitial_slot.is_empty() {
            return Err(ConfigError::EmptyInterstitialSlot);
        }
        Ok(())
    }

    /// Application id sent to the network, honoring test-inventory mode.
    pub fn effective_application_id(&self) -> &str {
        if self.use_test_inventory {
            TEST_APPLICATION_ID
        } else {
            &self.application_id
        }
    }

    /// Banner slot sent to the network, honoring test-inventory mode.
    pub fn effective_banner_slot(&self) -> &str {
        if self.use_test_inventory {
            TEST_BANNER_SLOT
        } else {
            &self.banner_slot
        }
    }

    /// Interstitial slot sent to the network, honoring test-inventory mode.
    pub fn effective_interstitial_slot(&self) -> &str {
        if self.use_test_inventory {
            TEST_INTERSTITIAL_SLOT
        } else {
            &self.interstitial_slot
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> AdConfig {
        AdConfig {
            application_id: "app-1".to_string(),
            banner_slot: "banner-1".to_string(),
            interstitial_slot: "interstitial-1".to_string(),
            placement: BannerPlacement::Bottom,
            wrapper_background: Rgb::GRAY,
            use_test_inventory: false,
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(sample_config().validate().is_ok());
    }

    #[test]
    fn test_empty_application_id() {
        let mut config = sample_config();
        config.application_id = String::new();
        assert_eq!(config.validate(), Err(ConfigError::EmptyApplicationId));
    }

    #[test]
    fn test_empty_banner_slot() {
        let mut config = sample_config();
        config.banner_slot = String::new();
        assert_eq!(config.validate(), Err(ConfigError::EmptyBannerSlot));
    }

    #[test]
    fn test_empty_interstitial_slot() {
        let mut config = sample_config();
        config.interstitial_slot = String::new();
        assert_eq!(config.validate(), Err(ConfigError::EmptyInterstitialSlot));
    }

    #[test]
    fn test_effective_ids_passthrough() {
        let config = sample_config();
        assert_eq!(config.effective_application_id(), "app-1");
        assert_eq!(config.effective_banner_slot(), "banner-1");
        assert_eq!(config.effective_interstitial_slot(), "interstitial-1");
    }

    #[test]
    fn test_effective_ids_test_inventory() {
        let mut config = sample_config();
        config.use_test_inventory = true;
        assert_eq!(config.effective_application_id(), TEST_APPLICATION_ID);
        assert_eq!(config.effective_banner_slot(), TEST_BANNER_SLOT);
        assert_eq!(config.effective_interstitial_slot(), TEST_INTERSTITIAL_SLOT);
    }

    #[test]
    fn test_config_serialization() {
        let config = sample_config();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: AdConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config.application_id, deserialized.application_id);
        assert_eq!(config.placement, deserialized.placement);
    }
}
