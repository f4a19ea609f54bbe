//! Polling hub
//!
//! [`Ld2450`] owns the transport, the three target slots and the command
//! queue. The integration layer calls [`Ld2450::poll`] from its main loop;
//! every call does a bounded amount of work and returns immediately.
//!
//! # Poll cycle
//!
//! 1. Command queue: inject/append mode commands, transmit or time out
//! 2. Frame synchronizer: consume buffered bytes up to one complete frame
//! 3. Decoder: update targets (target frame) or the queue (config frame)

use core::fmt;

use heapless::Vec;
use ld2450_hal::{Clock, Transport, UartConfig};
use ld2450_protocol::{
    config_frame_to_vec, BaudRate, Command, CommandError, ConfigAck, FirmwareVersion, Frame,
    FrameSync, TargetRecord, TrackingMode, TARGET_COUNT, TARGET_PAYLOAD_LEN,
};

use crate::config::{ConfigError, HubConfig};
use crate::events::{Events, HubEvent};
use crate::queue::{CommandQueue, ConfigMode, ServiceAction};
use crate::target::Target;
use crate::zone::{NoZone, Zone, MAX_ZONES};

#[cfg(feature = "defmt")]
use defmt::{debug, info, warn};

// Stub macros when defmt is not available
#[cfg(not(feature = "defmt"))]
macro_rules! warn {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "defmt"))]
macro_rules! info {
    ($($arg:tt)*) => {{}};
}

#[cfg(not(feature = "defmt"))]
macro_rules! debug {
    ($($arg:tt)*) => {{}};
}

/// LD2450 radar hub
pub struct Ld2450<U, C, Z = NoZone> {
    config: HubConfig,
    uart: U,
    clock: C,
    sync: FrameSync,
    queue: CommandQueue,
    targets: [Target; TARGET_COUNT],
    zones: Vec<Z, MAX_ZONES>,
    occupied: bool,
    target_count: u8,
    /// Last values handed to the integration layer
    reported_occupied: Option<bool>,
    reported_count: Option<u8>,
    firmware_version: Option<FirmwareVersion>,
}

impl<U, C, Z> Ld2450<U, C, Z>
where
    U: Transport,
    C: Clock,
    Z: Zone,
{
    /// Create a hub with three unnamed target slots
    pub fn new(config: HubConfig, uart: U, clock: C) -> Self {
        Self {
            config,
            uart,
            clock,
            sync: FrameSync::new(),
            queue: CommandQueue::new(),
            targets: Default::default(),
            zones: Vec::new(),
            occupied: false,
            target_count: 0,
            reported_occupied: None,
            reported_count: None,
            firmware_version: None,
        }
    }

    /// Replace the target slots, e.g. with pre-named targets
    pub fn with_targets(mut self, targets: [Target; TARGET_COUNT]) -> Self {
        self.targets = targets;
        self
    }

    /// Attach a zone, handing it back if all slots are taken
    pub fn add_zone(&mut self, zone: Z) -> Result<(), Z> {
        self.zones.push(zone)
    }

    pub fn zones(&self) -> &[Z] {
        &self.zones
    }

    pub fn zones_mut(&mut self) -> &mut [Z] {
        &mut self.zones
    }

    /// Prepare the target slots and report the initial occupancy
    ///
    /// Unnamed slots are labelled `Target 1` to `Target 3` and inherit the
    /// configured fast-off setting.
    pub fn setup(&mut self) -> Events {
        let fast_off = self.config.fast_off_detection;
        for (index, target) in self.targets.iter_mut().enumerate() {
            target.ensure_name(index);
            target.set_fast_off_detection(fast_off);
        }

        let mut events = Events::new();
        self.reported_occupied = Some(false);
        let _ = events.push(HubEvent::OccupancyChanged(false));
        events
    }

    /// Warn when the integration's UART settings cannot reach the module
    pub fn check_uart_settings(&self, settings: &UartConfig) -> bool {
        let ok = settings.matches_required();
        if !ok {
            warn!(
                "UART settings do not match LD2450 requirements (256000 baud, 8N1), got {} baud",
                settings.baudrate
            );
        }
        ok
    }

    /// Run one cooperative cycle
    pub fn poll(&mut self) -> Events {
        let mut events = Events::new();

        self.service_queue(&mut events);

        match self.sync.poll(&mut self.uart) {
            Some(Frame::TargetUpdate(payload)) => self.process_target_update(&payload, &mut events),
            Some(Frame::Config(payload)) => self.process_config_ack(&payload, &mut events),
            None => {}
        }

        events
    }

    fn service_queue(&mut self, events: &mut Events) {
        let now = self.clock.now_ms();
        match self.queue.service(now) {
            ServiceAction::Transmit(command) => self.write_command(&command),
            ServiceAction::TimedOut { opcode } => {
                warn!(
                    "Sending command {=u8:#x} timed out! Is the sensor connected?",
                    opcode
                );
                let _ = events.push(HubEvent::CommandTimedOut { opcode });
            }
            ServiceAction::Idle | ServiceAction::Waiting => {}
        }
    }

    /// Frame and send one command
    fn write_command(&mut self, command: &Command) {
        let frame = match config_frame_to_vec(command.as_bytes()) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("Failed to frame command: {:?}", e);
                return;
            }
        };

        let result = self.uart.write(&frame).and_then(|()| self.uart.flush());
        if result.is_err() {
            // Counts as an attempt; the retry timer covers it
            warn!("UART write failed for command {=u8:#x}", command.opcode());
        }
    }

    fn process_target_update(&mut self, payload: &[u8; TARGET_PAYLOAD_LEN], events: &mut Events) {
        let records = TargetRecord::decode_payload(payload);
        let now = self.clock.now_ms();
        let max_distance = self.config.max_detection_distance as i32;
        let limit = self.config.hysteresis_limit();
        let flip = self.config.flip_x_axis;

        for (target, record) in self.targets.iter_mut().zip(records.iter()) {
            let x = if flip { record.x.saturating_neg() } else { record.x };
            let y = record.y as i32;

            if y <= max_distance || (target.is_present() && y < limit) {
                target.update_values(x, record.y, record.speed, record.distance_resolution, now);
            } else if y >= limit {
                target.clear();
            }
            // Otherwise the target was absent and sits inside the margin:
            // keep the stale values so it cannot flicker in at the boundary
        }

        self.publish_presence(events);

        for zone in self.zones.iter_mut() {
            zone.update(&self.targets);
        }
    }

    /// Recompute occupancy and count, reporting only changes
    fn publish_presence(&mut self, events: &mut Events) {
        let count = self.targets.iter().filter(|t| t.is_present()).count() as u8;
        self.target_count = count;
        self.occupied = count > 0;

        if self.reported_occupied != Some(self.occupied) {
            self.reported_occupied = Some(self.occupied);
            let _ = events.push(HubEvent::OccupancyChanged(self.occupied));
        }
        if self.reported_count != Some(count) {
            self.reported_count = Some(count);
            let _ = events.push(HubEvent::TargetCountChanged(count));
        }
    }

    fn process_config_ack(&mut self, payload: &[u8], events: &mut Events) {
        let Some(ack) = ConfigAck::parse(payload) else {
            debug!("Ignoring short config frame ({} bytes)", payload.len());
            return;
        };

        if let Some(mode) = self.queue.acknowledge(&ack) {
            debug!("Configuration mode: {:?}", mode);
            let _ = events.push(HubEvent::ConfigModeChanged(mode));
        }

        if let Some(version) = ack.firmware_version() {
            info!(
                "Sensor Firmware-Version: {}",
                defmt::Display2Format(&version)
            );
            self.firmware_version = Some(version);
            let _ = events.push(HubEvent::FirmwareVersion(version));
        }
    }

    /// Queue raw command bytes (`[opcode, ...]`)
    pub fn enqueue_command(&mut self, bytes: &[u8]) -> Result<(), CommandError> {
        self.enqueue(Command::from_bytes(bytes)?)
    }

    /// Queue a prepared command
    pub fn enqueue(&mut self, command: Command) -> Result<(), CommandError> {
        self.queue.enqueue(command)
    }

    /// Ask the module for its firmware version
    ///
    /// The answer arrives as [`HubEvent::FirmwareVersion`] on a later poll.
    pub fn request_firmware_version(&mut self) -> Result<(), CommandError> {
        self.enqueue(Command::read_version())
    }

    pub fn restart_module(&mut self) -> Result<(), CommandError> {
        self.enqueue(Command::restart())
    }

    pub fn factory_reset(&mut self) -> Result<(), CommandError> {
        self.enqueue(Command::factory_reset())
    }

    pub fn set_bluetooth(&mut self, enabled: bool) -> Result<(), CommandError> {
        self.enqueue(Command::set_bluetooth(enabled))
    }

    pub fn set_tracking_mode(&mut self, mode: TrackingMode) -> Result<(), CommandError> {
        self.enqueue(Command::set_tracking_mode(mode))
    }

    /// Change the module's baud rate; applies after a restart
    pub fn set_baud_rate(&mut self, rate: BaudRate) -> Result<(), CommandError> {
        self.enqueue(Command::set_baud_rate(rate))
    }

    /// Adjust the detection distance at runtime
    pub fn set_max_detection_distance(&mut self, distance_mm: u16) -> Result<(), ConfigError> {
        let mut next = self.config.clone();
        next.max_detection_distance = distance_mm;
        next.validate()?;
        self.config = next;
        Ok(())
    }

    /// Write the hub configuration and every zone's, then request the
    /// firmware version so it shows up in the log shortly after
    pub fn dump_config<W: fmt::Write>(&mut self, out: &mut W) -> fmt::Result {
        writeln!(out, "LD2450 Hub: {}", self.config.name)?;
        writeln!(
            out,
            "  fast_off_detection: {}",
            true_false(self.config.fast_off_detection)
        )?;
        writeln!(out, "  flip_x_axis: {}", true_false(self.config.flip_x_axis))?;
        writeln!(
            out,
            "  max_detection_distance: {} mm",
            self.config.max_detection_distance
        )?;
        writeln!(
            out,
            "  max_distance_margin: {} mm",
            self.config.max_distance_margin
        )?;
        writeln!(out, "Zones:")?;
        for zone in self.zones.iter() {
            zone.dump_config(&mut *out)?;
        }

        if self.request_firmware_version().is_err() {
            warn!("Command queue full, skipping firmware version request");
        }
        Ok(())
    }

    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    pub fn targets(&self) -> &[Target; TARGET_COUNT] {
        &self.targets
    }

    pub fn targets_mut(&mut self) -> &mut [Target; TARGET_COUNT] {
        &mut self.targets
    }

    pub fn target(&self, index: usize) -> Option<&Target> {
        self.targets.get(index)
    }

    /// At least one target present after the last frame
    pub fn is_occupied(&self) -> bool {
        self.occupied
    }

    /// Present targets after the last frame
    pub fn target_count(&self) -> u8 {
        self.target_count
    }

    pub fn config_mode(&self) -> ConfigMode {
        self.queue.mode()
    }

    /// Version from the last successful `READ_VERSION`
    pub fn firmware_version(&self) -> Option<FirmwareVersion> {
        self.firmware_version
    }

    /// Commands waiting, including injected mode commands
    pub fn pending_commands(&self) -> usize {
        self.queue.len()
    }

    /// Frames dropped for bad trailers or oversized lengths
    pub fn dropped_frames(&self) -> u32 {
        self.sync.dropped_frames()
    }

    pub fn transport(&self) -> &U {
        &self.uart
    }

    pub fn transport_mut(&mut self) -> &mut U {
        &mut self.uart
    }

    /// Release the transport and clock
    pub fn free(self) -> (U, C) {
        (self.uart, self.clock)
    }
}

fn true_false(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::queue::COMMAND_RETRY_DELAY_MS;
    use heapless::String;
    use ld2450_hal::mock::{MockClock, MockUart};
    use ld2450_hal::uart::{DataBits, Parity, StopBits};
    use ld2450_protocol::{opcode, MAX_CONFIG_FRAME};
    use proptest::prelude::*;

    type TestHub<'a> = Ld2450<MockUart, &'a MockClock>;

    const ENTER_CONFIG_ACK: [u8; 8] = [0xFF, 0x01, 0x00, 0x00, 0x01, 0x00, 0x40, 0x00];
    const LEAVE_CONFIG_ACK: [u8; 4] = [0xFE, 0x01, 0x00, 0x00];
    const VERSION_ACK: [u8; 12] = [
        0xA0, 0x01, 0x00, 0x00, 0x00, 0x00, 0x02, 0x01, 0x16, 0x24, 0x06, 0x22,
    ];

    fn hub_with(config: HubConfig, clock: &MockClock) -> TestHub<'_> {
        let mut hub = Ld2450::new(config, MockUart::new(), clock);
        hub.setup();
        hub
    }

    fn hub(clock: &MockClock) -> TestHub<'_> {
        hub_with(HubConfig::default(), clock)
    }

    fn record(x: i16, y: i16) -> TargetRecord {
        TargetRecord {
            x,
            y,
            speed: 0,
            distance_resolution: 10,
        }
    }

    fn single(x: i16, y: i16) -> [TargetRecord; TARGET_COUNT] {
        [record(x, y), TargetRecord::default(), TargetRecord::default()]
    }

    fn feed_targets<Z: Zone>(hub: &mut Ld2450<MockUart, &MockClock, Z>, records: [TargetRecord; TARGET_COUNT]) {
        hub.transport_mut()
            .feed(&TargetRecord::encode_frame(&records));
    }

    fn feed_ack(hub: &mut TestHub<'_>, payload: &[u8]) {
        hub.transport_mut().feed(&framed(payload));
    }

    fn framed(payload: &[u8]) -> heapless::Vec<u8, MAX_CONFIG_FRAME> {
        config_frame_to_vec(payload).unwrap()
    }

    #[test]
    fn test_setup_names_targets_and_reports_vacant() {
        let clock = MockClock::new(0);
        let config = HubConfig {
            fast_off_detection: true,
            ..HubConfig::default()
        };
        let mut hub: TestHub<'_> = Ld2450::new(config, MockUart::new(), &clock)
            .with_targets([Target::with_name("Couch"), Target::new(), Target::new()]);

        let events = hub.setup();

        assert_eq!(events.as_slice(), &[HubEvent::OccupancyChanged(false)]);
        assert_eq!(hub.targets()[0].name(), Some("Couch"));
        assert_eq!(hub.targets()[1].name(), Some("Target 2"));
        assert_eq!(hub.targets()[2].name(), Some("Target 3"));
        assert!(hub.targets().iter().all(|t| t.fast_off_detection()));
    }

    #[test]
    fn test_single_target_reported() {
        let clock = MockClock::new(0);
        let mut hub = hub(&clock);

        feed_targets(&mut hub, single(100, 500));
        let events = hub.poll();

        assert_eq!(
            events.as_slice(),
            &[
                HubEvent::OccupancyChanged(true),
                HubEvent::TargetCountChanged(1)
            ]
        );
        let target = hub.target(0).unwrap();
        assert!(target.is_present());
        assert_eq!((target.x(), target.y()), (100, 500));
        assert_eq!(target.distance_resolution(), 10);
        assert!(hub.is_occupied());
        assert_eq!(hub.target_count(), 1);
    }

    #[test]
    fn test_unchanged_presence_not_republished() {
        let clock = MockClock::new(0);
        let mut hub = hub(&clock);

        feed_targets(&mut hub, single(100, 500));
        hub.poll();
        feed_targets(&mut hub, single(120, 480));
        let events = hub.poll();

        assert!(events.is_empty());
        assert_eq!(hub.target(0).unwrap().x(), 120);
    }

    #[test]
    fn test_target_leaving_reports_vacant() {
        let clock = MockClock::new(0);
        let mut hub = hub(&clock);

        feed_targets(&mut hub, single(100, 500));
        hub.poll();
        feed_targets(&mut hub, [TargetRecord::default(); TARGET_COUNT]);
        let events = hub.poll();

        assert_eq!(
            events.as_slice(),
            &[
                HubEvent::OccupancyChanged(false),
                HubEvent::TargetCountChanged(0)
            ]
        );
    }

    #[test]
    fn test_hysteresis_keeps_present_target() {
        let clock = MockClock::new(0);
        let mut hub = hub(&clock);

        feed_targets(&mut hub, single(0, 6000));
        hub.poll();
        assert!(hub.is_occupied());

        feed_targets(&mut hub, single(0, 6249));
        hub.poll();
        assert!(hub.is_occupied());
        assert_eq!(hub.target(0).unwrap().y(), 6249);

        feed_targets(&mut hub, single(0, 6250));
        hub.poll();
        assert!(!hub.is_occupied());
        assert_eq!(hub.target(0).unwrap().y(), 0);
    }

    #[test]
    fn test_zero_margin_keeps_target_at_limit() {
        let clock = MockClock::new(0);
        let config = HubConfig {
            max_distance_margin: 0,
            ..HubConfig::default()
        };
        let mut hub = hub_with(config, &clock);

        feed_targets(&mut hub, single(0, 6000));
        hub.poll();
        assert!(hub.is_occupied());
        assert_eq!(hub.target(0).unwrap().y(), 6000);

        feed_targets(&mut hub, single(0, 6001));
        hub.poll();
        assert!(!hub.is_occupied());
        assert_eq!(hub.target(0).unwrap().y(), 0);
    }

    #[test]
    fn test_hysteresis_band_blocks_new_target() {
        let clock = MockClock::new(0);
        let mut hub = hub(&clock);

        feed_targets(&mut hub, single(0, 6100));
        let events = hub.poll();

        assert!(!hub.is_occupied());
        assert_eq!(hub.target(0).unwrap().y(), 0);
        assert_eq!(events.as_slice(), &[HubEvent::TargetCountChanged(0)]);
    }

    #[test]
    fn test_flip_x_axis() {
        let clock = MockClock::new(0);
        let config = HubConfig {
            flip_x_axis: true,
            ..HubConfig::default()
        };
        let mut hub = hub_with(config, &clock);

        feed_targets(&mut hub, single(-250, 1200));
        hub.poll();

        assert_eq!(hub.target(0).unwrap().x(), 250);
    }

    #[test]
    fn test_fast_off_drops_frozen_target() {
        let clock = MockClock::new(0);
        let config = HubConfig {
            fast_off_detection: true,
            ..HubConfig::default()
        };
        let mut hub = hub_with(config, &clock);

        feed_targets(&mut hub, single(100, 500));
        hub.poll();
        assert!(hub.is_occupied());

        clock.advance(1001);
        feed_targets(&mut hub, single(100, 500));
        let events = hub.poll();

        assert!(!hub.is_occupied());
        assert!(events.contains(&HubEvent::OccupancyChanged(false)));
    }

    #[test]
    fn test_resync_after_garbage() {
        let clock = MockClock::new(0);
        let mut hub = hub(&clock);

        hub.transport_mut().feed(&[0x00, 0xAA, 0x12, 0xAA, 0xFF]);
        feed_targets(&mut hub, single(100, 500));
        for _ in 0..3 {
            hub.poll();
        }

        assert!(hub.is_occupied());
        assert_eq!(hub.target(0).unwrap().y(), 500);
    }

    #[test]
    fn test_bad_trailer_ignored() {
        let clock = MockClock::new(0);
        let mut hub = hub(&clock);

        let mut frame = TargetRecord::encode_frame(&single(100, 500));
        frame[29] = 0x00;
        hub.transport_mut().feed(&frame);
        hub.poll();

        assert!(!hub.is_occupied());
        assert_eq!(hub.dropped_frames(), 1);

        feed_targets(&mut hub, single(100, 500));
        hub.poll();
        assert!(hub.is_occupied());
    }

    #[test]
    fn test_command_wrapped_in_config_mode() {
        let clock = MockClock::new(0);
        let mut hub = hub(&clock);

        hub.request_firmware_version().unwrap();

        // ENTER_CONFIG goes out first
        hub.poll();
        assert_eq!(
            hub.transport_mut().take_written().as_slice(),
            framed(Command::enter_config().as_bytes()).as_slice()
        );

        feed_ack(&mut hub, &ENTER_CONFIG_ACK);
        let events = hub.poll();
        assert_eq!(
            events.as_slice(),
            &[HubEvent::ConfigModeChanged(ConfigMode::Config)]
        );
        assert_eq!(hub.config_mode(), ConfigMode::Config);

        hub.poll();
        assert_eq!(
            hub.transport_mut().take_written().as_slice(),
            framed(Command::read_version().as_bytes()).as_slice()
        );

        feed_ack(&mut hub, &VERSION_ACK);
        let events = hub.poll();
        let version = FirmwareVersion {
            major: 1,
            minor: 2,
            build: 0x2206_2416,
        };
        assert_eq!(events.as_slice(), &[HubEvent::FirmwareVersion(version)]);
        assert_eq!(hub.firmware_version(), Some(version));

        // Queue drained: LEAVE_CONFIG is appended, then sent
        hub.poll();
        hub.poll();
        assert_eq!(
            hub.transport_mut().take_written().as_slice(),
            framed(Command::leave_config().as_bytes()).as_slice()
        );

        feed_ack(&mut hub, &LEAVE_CONFIG_ACK);
        let events = hub.poll();
        assert_eq!(
            events.as_slice(),
            &[HubEvent::ConfigModeChanged(ConfigMode::Normal)]
        );

        for _ in 0..5 {
            clock.advance(COMMAND_RETRY_DELAY_MS + 1);
            hub.poll();
        }
        assert!(hub.transport().written().is_empty());
        assert_eq!(hub.pending_commands(), 0);
    }

    #[test]
    fn test_retransmit_after_strict_delay() {
        let clock = MockClock::new(0);
        let mut hub = hub(&clock);
        let frame_len = framed(Command::enter_config().as_bytes()).len();

        hub.restart_module().unwrap();
        hub.poll();
        assert_eq!(hub.transport().written().len(), frame_len);

        clock.advance(COMMAND_RETRY_DELAY_MS);
        hub.poll();
        assert_eq!(hub.transport().written().len(), frame_len);

        clock.advance(1);
        hub.poll();
        assert_eq!(hub.transport().written().len(), 2 * frame_len);
        assert_eq!(hub.transport().flushes(), 2);
    }

    #[test]
    fn test_unanswered_command_times_out() {
        let clock = MockClock::new(0);
        let mut hub = hub(&clock);
        let frame_len = framed(Command::enter_config().as_bytes()).len();

        hub.restart_module().unwrap();

        let mut timed_out = None;
        for _ in 0..20 {
            let events = hub.poll();
            if let Some(event) = events
                .iter()
                .find(|e| matches!(e, HubEvent::CommandTimedOut { .. }))
            {
                timed_out = Some(*event);
                break;
            }
            clock.advance(COMMAND_RETRY_DELAY_MS + 1);
        }

        assert_eq!(
            timed_out,
            Some(HubEvent::CommandTimedOut {
                opcode: opcode::ENTER_CONFIG
            })
        );
        assert_eq!(hub.transport().written().len(), 10 * frame_len);
    }

    #[test]
    fn test_write_failure_retried() {
        let clock = MockClock::new(0);
        let mut hub = hub(&clock);

        hub.transport_mut().set_fail_writes(true);
        hub.request_firmware_version().unwrap();
        hub.poll();
        assert!(hub.transport().written().is_empty());
        assert_eq!(hub.pending_commands(), 2);

        hub.transport_mut().set_fail_writes(false);
        clock.advance(COMMAND_RETRY_DELAY_MS + 1);
        hub.poll();
        assert_eq!(
            hub.transport().written(),
            framed(Command::enter_config().as_bytes()).as_slice()
        );
    }

    #[test]
    fn test_enqueue_command_errors() {
        let clock = MockClock::new(0);
        let mut hub = hub(&clock);

        assert_eq!(hub.enqueue_command(&[]), Err(CommandError::Empty));
        assert_eq!(hub.enqueue_command(&[0u8; 17]), Err(CommandError::TooLong));

        for _ in 0..8 {
            hub.enqueue_command(&[opcode::READ_MAC, 0x00, 0x01, 0x00])
                .unwrap();
        }
        assert_eq!(hub.set_bluetooth(true), Err(CommandError::QueueFull));
    }

    #[test]
    fn test_set_max_detection_distance() {
        let clock = MockClock::new(0);
        let mut hub = hub(&clock);

        assert_eq!(
            hub.set_max_detection_distance(9000),
            Err(ConfigError::DistanceOutOfRange)
        );
        assert_eq!(hub.config().max_detection_distance, 6000);

        hub.set_max_detection_distance(3000).unwrap();
        feed_targets(&mut hub, single(0, 4000));
        hub.poll();
        assert!(!hub.is_occupied());
    }

    #[test]
    fn test_check_uart_settings() {
        let clock = MockClock::new(0);
        let hub = hub(&clock);

        assert!(hub.check_uart_settings(&UartConfig::LD2450));
        assert!(!hub.check_uart_settings(&UartConfig {
            baudrate: 115_200,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
        }));
    }

    #[test]
    fn test_dump_config_requests_version() {
        let clock = MockClock::new(0);
        let mut hub = hub(&clock);
        let mut out: String<256> = String::new();

        hub.dump_config(&mut out).unwrap();

        assert!(out.starts_with("LD2450 Hub: LD2450\n"));
        assert!(out.contains("  flip_x_axis: False\n"));
        assert!(out.contains("  max_detection_distance: 6000 mm\n"));
        assert!(out.contains("  max_distance_margin: 250 mm\n"));
        assert_eq!(hub.pending_commands(), 1);
    }

    #[derive(Default)]
    struct CountingZone {
        updates: usize,
        occupants: usize,
    }

    impl Zone for CountingZone {
        fn update(&mut self, targets: &[Target; TARGET_COUNT]) {
            self.updates += 1;
            self.occupants = targets.iter().filter(|t| t.is_present()).count();
        }

        fn dump_config(&self, out: &mut dyn fmt::Write) -> fmt::Result {
            writeln!(out, "  Zone: counting")
        }
    }

    #[test]
    fn test_zones_follow_target_updates() {
        let clock = MockClock::new(0);
        let mut hub: Ld2450<MockUart, &MockClock, CountingZone> =
            Ld2450::new(HubConfig::default(), MockUart::new(), &clock);
        hub.setup();
        assert!(hub.add_zone(CountingZone::default()).is_ok());

        feed_targets(&mut hub, single(100, 500));
        hub.poll();

        assert_eq!(hub.zones()[0].updates, 1);
        assert_eq!(hub.zones()[0].occupants, 1);

        let mut out: String<256> = String::new();
        hub.dump_config(&mut out).unwrap();
        assert!(out.ends_with("Zones:\n  Zone: counting\n"));
    }

    proptest! {
        #[test]
        fn prop_vacant_target_appears_only_within_distance(
            distance in 1u16..=8000,
            margin in 0u16..=1000,
            y in 1i16..=i16::MAX,
        ) {
            let clock = MockClock::new(0);
            let config = HubConfig {
                max_detection_distance: distance,
                max_distance_margin: margin,
                ..HubConfig::default()
            };
            let mut hub = hub_with(config, &clock);

            feed_targets(&mut hub, single(0, y));
            hub.poll();

            prop_assert_eq!(hub.is_occupied(), y as i32 <= distance as i32);
        }

        #[test]
        fn prop_present_target_held_until_limit(
            distance in 1u16..=8000,
            margin in 0u16..=1000,
            y in 1i16..=i16::MAX,
        ) {
            let clock = MockClock::new(0);
            let config = HubConfig {
                max_detection_distance: distance,
                max_distance_margin: margin,
                ..HubConfig::default()
            };
            let limit = config.hysteresis_limit();
            let mut hub = hub_with(config, &clock);

            feed_targets(&mut hub, single(0, distance as i16));
            hub.poll();
            prop_assert!(hub.is_occupied());

            feed_targets(&mut hub, single(0, y));
            hub.poll();

            let held = y as i32 <= distance as i32 || (y as i32) < limit;
            prop_assert_eq!(hub.is_occupied(), held);
            if !held {
                prop_assert_eq!(hub.target(0).unwrap().y(), 0);
            }
        }
    }
}
