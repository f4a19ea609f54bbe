//! Events reported to the integration layer
//!
//! Occupancy and target count are edge-triggered: an event is only produced
//! when the value differs from the last one reported.

use heapless::Vec;
use ld2450_protocol::FirmwareVersion;

use crate::queue::ConfigMode;

/// Upper bound on events produced by a single poll
pub const MAX_EVENTS_PER_POLL: usize = 8;

/// Events produced by one poll
pub type Events = Vec<HubEvent, MAX_EVENTS_PER_POLL>;

/// Hub events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum HubEvent {
    /// At least one target present / none present
    OccupancyChanged(bool),
    /// Number of present targets changed
    TargetCountChanged(u8),
    /// Module entered or left configuration mode
    ConfigModeChanged(ConfigMode),
    /// Firmware version read back from the module
    FirmwareVersion(FirmwareVersion),
    /// A command was dropped after exhausting its retries
    CommandTimedOut { opcode: u8 },
}
