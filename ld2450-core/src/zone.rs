//! Zone collaborator interface
//!
//! Zones (rectangles or polygons of the room with their own occupancy
//! logic) live outside this crate. The hub only hands them the current
//! targets after every decoded frame and asks them to describe themselves.

use core::fmt;

use crate::target::Target;
use ld2450_protocol::TARGET_COUNT;

/// Maximum zones attached to one hub
pub const MAX_ZONES: usize = 4;

/// A region consuming target snapshots
pub trait Zone {
    /// Recompute state from the latest targets
    fn update(&mut self, targets: &[Target; TARGET_COUNT]);

    /// Write a human-readable description of the zone's configuration
    fn dump_config(&self, out: &mut dyn fmt::Write) -> fmt::Result;
}

/// Placeholder zone type for hubs without zones
#[derive(Debug, Clone, Copy, Default)]
pub struct NoZone;

impl Zone for NoZone {
    fn update(&mut self, _targets: &[Target; TARGET_COUNT]) {}

    fn dump_config(&self, _out: &mut dyn fmt::Write) -> fmt::Result {
        Ok(())
    }
}
