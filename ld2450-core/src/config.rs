//! Hub configuration
//!
//! Supplied once by the integration layer. With the `serde` feature the
//! config can be stored as a postcard blob alongside other settings.

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum hub name length
pub const MAX_HUB_NAME_LEN: usize = 32;

/// Farthest distance the module can resolve (mm)
pub const SENSOR_RANGE_MM: u16 = 8000;

/// Default detection distance (mm)
pub const DEFAULT_MAX_DETECTION_DISTANCE: u16 = 6000;

/// Default hysteresis margin beyond the detection distance (mm)
pub const DEFAULT_MAX_DISTANCE_MARGIN: u16 = 250;

/// Largest encoded config blob
#[cfg(feature = "serde")]
pub const MAX_CONFIG_BLOB: usize = 64;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Detection distance beyond sensor range
    DistanceOutOfRange,
    /// Detection distance plus margin does not fit the sensor's coordinates
    MarginOutOfRange,
    /// Blob could not be encoded
    Serialize,
    /// Blob could not be decoded
    Deserialize,
}

/// Hub configuration
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HubConfig {
    /// Display name used in the config dump
    pub name: String<MAX_HUB_NAME_LEN>,
    /// Mirror the X axis (sensor mounted upside down)
    pub flip_x_axis: bool,
    /// Targets farther than this (mm) are not reported
    pub max_detection_distance: u16,
    /// Extra distance (mm) a present target may drift before it is dropped
    pub max_distance_margin: u16,
    /// Drop targets whose coordinates stop changing
    pub fast_off_detection: bool,
}

impl Default for HubConfig {
    fn default() -> Self {
        let mut name = String::new();
        let _ = name.push_str("LD2450");
        Self {
            name,
            flip_x_axis: false,
            max_detection_distance: DEFAULT_MAX_DETECTION_DISTANCE,
            max_distance_margin: DEFAULT_MAX_DISTANCE_MARGIN,
            fast_off_detection: false,
        }
    }
}

impl HubConfig {
    /// Check the distance settings against the sensor's limits
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_detection_distance > SENSOR_RANGE_MM {
            return Err(ConfigError::DistanceOutOfRange);
        }
        if self.hysteresis_limit() > i16::MAX as i32 {
            return Err(ConfigError::MarginOutOfRange);
        }
        Ok(())
    }

    /// Distance (mm) beyond which even a present target is dropped
    pub fn hysteresis_limit(&self) -> i32 {
        self.max_detection_distance as i32 + self.max_distance_margin as i32
    }

    /// Encode into `buf` as postcard
    #[cfg(feature = "serde")]
    pub fn to_postcard<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Serialize)
    }

    /// Decode from a postcard blob and validate
    #[cfg(feature = "serde")]
    pub fn from_postcard(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;
        config.validate()?;
        Ok(config)
    }
}
