//! Board-agnostic polling hub for the HLK-LD2450 radar
//!
//! This crate contains everything between the UART and the sensors an
//! integration layer publishes:
//!
//! - Target slots with presence, hysteresis and fast-off handling
//! - Command queue with automatic configuration-mode wrapping and retries
//! - The [`Ld2450`] hub tying both to a transport and clock
//! - Hub configuration and its postcard encoding (`serde` feature)
//!
//! # Example
//!
//! ```ignore
//! let mut hub: Ld2450<_, _> = Ld2450::new(HubConfig::default(), uart, clock);
//! publish(hub.setup());
//! loop {
//!     for event in hub.poll() {
//!         publish_event(event);
//!     }
//! }
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod events;
pub mod hub;
pub mod queue;
pub mod target;
pub mod zone;

pub use config::{ConfigError, HubConfig};
pub use events::{Events, HubEvent};
pub use hub::Ld2450;
pub use queue::{CommandQueue, ConfigMode, ServiceAction};
pub use target::Target;
pub use zone::{NoZone, Zone};
