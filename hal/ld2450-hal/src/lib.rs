//! LD2450 Hardware Abstraction Layer
//!
//! This crate defines the seams between the radar driver and the platform it
//! runs on. The driver never touches a peripheral directly; it only sees a
//! byte source, a byte sink and a monotonic clock.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Integration (sensor publishing, zones) │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  ld2450-core (polling hub)              │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  ld2450-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  embedded-io  │       │ embassy-time  │
//! │    UARTs      │       │    clock      │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`uart::ByteSource`], [`uart::ByteSink`] - Non-blocking serial I/O
//! - [`clock::Clock`] - Millisecond monotonic time

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod io;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod uart;

// Re-export key traits at crate root for convenience
pub use clock::Clock;
pub use io::{BufferedSource, IoSink, IoTransport};
pub use uart::{ByteSink, ByteSource, Transport, UartConfig};
