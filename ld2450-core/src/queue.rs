//! Outbound command queue with retries
//!
//! Commands are sent one at a time. The front of the queue is the only
//! command in flight; it is retransmitted every [`COMMAND_RETRY_DELAY_MS`]
//! until the module acknowledges it or [`COMMAND_MAX_RETRIES`] attempts have
//! been made.
//!
//! The module only accepts commands in configuration mode, so the queue
//! wraps explicit commands in `ENTER_CONFIG` / `LEAVE_CONFIG` on its own:
//!
//! ```text
//!   enqueue(READ_VERSION) in Normal mode
//!   ─▶ [ENTER_CONFIG, READ_VERSION]      inject at front
//!   ─▶ [READ_VERSION]                    ENTER acked, mode = Config
//!   ─▶ []                                READ_VERSION acked
//!   ─▶ [LEAVE_CONFIG]                    drained while in Config
//!   ─▶ []                                LEAVE acked, mode = Normal
//! ```

use heapless::Deque;
use ld2450_protocol::{opcode, Command, CommandError, ConfigAck};

/// Transmissions of one command before it is dropped
pub const COMMAND_MAX_RETRIES: u8 = 10;

/// Minimum spacing between transmissions of the same command
pub const COMMAND_RETRY_DELAY_MS: u64 = 100;

/// Explicit commands that may wait in the queue
pub const MAX_QUEUED_COMMANDS: usize = 8;

/// One extra slot so `ENTER_CONFIG` can always be injected
const QUEUE_CAPACITY: usize = MAX_QUEUED_COMMANDS + 1;

/// Module configuration mode as seen through acknowledgements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigMode {
    /// Streaming target updates
    #[default]
    Normal,
    /// Accepting configuration commands
    Config,
}

impl ConfigMode {
    /// Next mode after an acknowledgement
    pub fn transition(self, ack: &ConfigAck<'_>) -> Self {
        if ack.acknowledges(opcode::ENTER_CONFIG) {
            ConfigMode::Config
        } else if ack.acknowledges(opcode::LEAVE_CONFIG) {
            ConfigMode::Normal
        } else {
            self
        }
    }
}

/// What the queue wants done this cycle
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ServiceAction {
    /// Nothing queued
    Idle,
    /// Front command was sent recently
    Waiting,
    /// Send this command now
    Transmit(Command),
    /// Front command ran out of retries and was dropped
    TimedOut { opcode: u8 },
}

/// Command queue and retry engine
#[derive(Debug, Clone, Default)]
pub struct CommandQueue {
    queue: Deque<Command, QUEUE_CAPACITY>,
    mode: ConfigMode,
    retries: u8,
    last_sent_ms: Option<u64>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an explicit command
    pub fn enqueue(&mut self, command: Command) -> Result<(), CommandError> {
        if self.queue.len() >= MAX_QUEUED_COMMANDS {
            return Err(CommandError::QueueFull);
        }
        self.queue
            .push_back(command)
            .map_err(|_| CommandError::QueueFull)
    }

    pub fn mode(&self) -> ConfigMode {
        self.mode
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Command currently in flight
    pub fn front(&self) -> Option<&Command> {
        self.queue.front()
    }

    /// Transmissions of the front command so far
    pub fn retries(&self) -> u8 {
        self.retries
    }

    /// Run one cycle: inject, retransmit or time out, append
    pub fn service(&mut self, now_ms: u64) -> ServiceAction {
        if self.queue.is_empty() {
            self.maybe_append_leave_config();
            return ServiceAction::Idle;
        }
        self.maybe_inject_enter_config();
        self.service_retry(now_ms)
    }

    /// Put `ENTER_CONFIG` in front unless the module is already listening
    pub fn maybe_inject_enter_config(&mut self) -> bool {
        let needed = match self.queue.front() {
            Some(front) => self.mode != ConfigMode::Config && !front.is_enter_config(),
            None => false,
        };
        if !needed || self.queue.push_front(Command::enter_config()).is_err() {
            return false;
        }
        // The displaced command has not been answered; its attempts restart
        // once it is back in front
        self.retries = 0;
        true
    }

    /// Queue `LEAVE_CONFIG` once everything else has drained
    pub fn maybe_append_leave_config(&mut self) -> bool {
        if !self.queue.is_empty() || self.mode != ConfigMode::Config {
            return false;
        }
        self.queue.push_back(Command::leave_config()).is_ok()
    }

    /// Decide whether the front command is sent, kept waiting or dropped
    pub fn service_retry(&mut self, now_ms: u64) -> ServiceAction {
        let Some(front) = self.queue.front() else {
            return ServiceAction::Idle;
        };

        if let Some(sent) = self.last_sent_ms {
            if now_ms.saturating_sub(sent) <= COMMAND_RETRY_DELAY_MS {
                return ServiceAction::Waiting;
            }
        }

        if self.retries >= COMMAND_MAX_RETRIES {
            let opcode = front.opcode();
            self.queue.pop_front();
            self.retries = 0;
            return ServiceAction::TimedOut { opcode };
        }

        let command = front.clone();
        self.last_sent_ms = Some(now_ms);
        self.retries += 1;
        ServiceAction::Transmit(command)
    }

    /// Reconcile an acknowledgement with the front command
    ///
    /// Returns the new mode when the ack changed it.
    pub fn acknowledge(&mut self, ack: &ConfigAck<'_>) -> Option<ConfigMode> {
        let matches_front = self
            .queue
            .front()
            .is_some_and(|front| ack.acknowledges(front.opcode()));
        if matches_front {
            self.queue.pop_front();
            self.retries = 0;
            self.last_sent_ms = None;
        }

        let next = self.mode.transition(ack);
        if next == self.mode {
            return None;
        }
        self.mode = next;
        Some(next)
    }
}
