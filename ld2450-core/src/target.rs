//! Tracked target state
//!
//! The hub owns exactly three [`Target`] slots, one per track the module can
//! report. Each slot keeps the last accepted coordinates and decides whether
//! it currently represents a person in the room.

use core::fmt::Write;

use heapless::String;

/// Maximum target name length
pub const MAX_NAME_LEN: usize = 24;

/// How long identical coordinates may repeat before a fast-off target is
/// considered gone
///
/// The module keeps reporting the last position of a target that walked out
/// of range for several seconds, with zero speed.
pub const FAST_OFF_THRESHOLD_MS: u64 = 1000;

/// One tracked target slot
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Target {
    name: Option<String<MAX_NAME_LEN>>,
    fast_off_detection: bool,
    x: i16,
    y: i16,
    speed: i16,
    distance_resolution: u16,
    /// Time the reported values last moved
    last_change_ms: u64,
    /// Values frozen for longer than the fast-off threshold
    frozen: bool,
}

impl Target {
    /// Create an unnamed, empty target
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty target with a display name
    ///
    /// Names longer than [`MAX_NAME_LEN`] are truncated.
    pub fn with_name(name: &str) -> Self {
        let mut target = Self::new();
        target.set_name(name);
        target
    }

    /// Display name, if one has been assigned
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Assign a display name
    pub fn set_name(&mut self, name: &str) {
        let mut label = String::new();
        for c in name.chars() {
            if label.push(c).is_err() {
                break;
            }
        }
        self.name = Some(label);
    }

    /// Name the slot `Target N` (1-based) unless it already has a name
    pub fn ensure_name(&mut self, index: usize) {
        if self.name.is_some() {
            return;
        }
        let mut label = String::new();
        // "Target " plus any slot number fits in MAX_NAME_LEN
        let _ = write!(label, "Target {}", index + 1);
        self.name = Some(label);
    }

    pub fn fast_off_detection(&self) -> bool {
        self.fast_off_detection
    }

    pub fn set_fast_off_detection(&mut self, enabled: bool) {
        self.fast_off_detection = enabled;
        if !enabled {
            self.frozen = false;
        }
    }

    /// Lateral offset in mm
    pub fn x(&self) -> i16 {
        self.x
    }

    /// Distance from the sensor plane in mm
    pub fn y(&self) -> i16 {
        self.y
    }

    /// Radial speed in cm/s
    pub fn speed(&self) -> i16 {
        self.speed
    }

    pub fn distance_resolution(&self) -> u16 {
        self.distance_resolution
    }

    /// Whether the slot currently holds a real target
    ///
    /// `y == 0` is the module's "no target" report.
    pub fn is_present(&self) -> bool {
        self.y != 0 && !self.frozen
    }

    /// Store freshly decoded values
    pub fn update_values(&mut self, x: i16, y: i16, speed: i16, distance_resolution: u16, now_ms: u64) {
        if x != self.x || y != self.y || speed != 0 {
            self.last_change_ms = now_ms;
        }

        self.x = x;
        self.y = y;
        self.speed = speed;
        self.distance_resolution = distance_resolution;

        self.frozen = self.fast_off_detection
            && y != 0
            && now_ms.saturating_sub(self.last_change_ms) > FAST_OFF_THRESHOLD_MS;
    }

    /// Forget the current track
    pub fn clear(&mut self) {
        self.x = 0;
        self.y = 0;
        self.speed = 0;
        self.distance_resolution = 0;
        self.last_change_ms = 0;
        self.frozen = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_target_absent() {
        let target = Target::new();
        assert!(!target.is_present());
        assert_eq!(target.name(), None);
    }

    #[test]
    fn test_ensure_name_fills_missing() {
        let mut target = Target::new();
        target.ensure_name(0);
        assert_eq!(target.name(), Some("Target 1"));
    }

    #[test]
    fn test_ensure_name_keeps_existing() {
        let mut target = Target::with_name("Couch");
        target.ensure_name(2);
        assert_eq!(target.name(), Some("Couch"));
    }

    #[test]
    fn test_long_name_truncated() {
        let target = Target::with_name("A very long target name that does not fit");
        assert_eq!(target.name().map(str::len), Some(MAX_NAME_LEN));
    }

    #[test]
    fn test_update_makes_present() {
        let mut target = Target::new();
        target.update_values(-120, 800, 5, 360, 0);
        assert!(target.is_present());
        assert_eq!(target.x(), -120);
        assert_eq!(target.y(), 800);
        assert_eq!(target.speed(), 5);
        assert_eq!(target.distance_resolution(), 360);
    }

    #[test]
    fn test_zero_report_is_absent() {
        let mut target = Target::new();
        target.update_values(100, 500, 0, 10, 0);
        target.update_values(0, 0, 0, 0, 100);
        assert!(!target.is_present());
    }

    #[test]
    fn test_clear_zeroes_values() {
        let mut target = Target::new();
        target.update_values(100, 500, 3, 10, 0);
        target.clear();
        assert!(!target.is_present());
        assert_eq!((target.x(), target.y(), target.speed()), (0, 0, 0));
        assert_eq!(target.distance_resolution(), 0);
    }

    #[test]
    fn test_frozen_values_kept_without_fast_off() {
        let mut target = Target::new();
        target.update_values(100, 500, 0, 10, 0);
        target.update_values(100, 500, 0, 10, 5000);
        assert!(target.is_present());
    }

    #[test]
    fn test_fast_off_drops_frozen_target() {
        let mut target = Target::new();
        target.set_fast_off_detection(true);
        target.update_values(100, 500, 0, 10, 0);
        target.update_values(100, 500, 0, 10, FAST_OFF_THRESHOLD_MS);
        assert!(target.is_present());

        target.update_values(100, 500, 0, 10, FAST_OFF_THRESHOLD_MS + 1);
        assert!(!target.is_present());

        // Movement brings it back
        target.update_values(110, 505, 0, 10, FAST_OFF_THRESHOLD_MS + 100);
        assert!(target.is_present());
    }

    #[test]
    fn test_fast_off_ignores_moving_target() {
        let mut target = Target::new();
        target.set_fast_off_detection(true);
        target.update_values(100, 500, 12, 10, 0);
        target.update_values(100, 500, 12, 10, 5000);
        assert!(target.is_present());
    }
}
