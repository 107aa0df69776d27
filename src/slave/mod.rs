// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Interrupt driven Modbus RTU slave.
//!
//! The [`Slave`] is fed by three asynchronous events, each normally
//! raised by an interrupt handler:
//!
//! - [`Slave::on_byte_received`]: the UART received a byte,
//! - [`Slave::on_timer_tick`]: the periodic timer armed through
//!   [`LineControl::arm_timer`] fired,
//! - [`Slave::on_transmit_ready`] / [`Slave::on_transmit_complete`]:
//!   the UART can take the next byte / has shifted out the last one.
//!
//! A complete request is handled synchronously by [`Slave::process`],
//! called from the application's main loop. Every event must run
//! without being preempted by another one; [`SharedSlave`] wraps the
//! slave in a critical section for that purpose.

mod buffer;
mod dispatch;
mod line;
mod shared;
mod state;
mod timeout;

pub use self::{line::*, shared::*, state::*};

use self::{
    buffer::{RxFrame, TxFrame},
    state::Expiry,
    timeout::Timeout,
};
use crate::{
    config::Config,
    error::Error,
    registers::RegisterMap,
    rtu::{FRAME_CAPACITY, HEADER_PROBE_LEN, SlaveId, request_frame_len},
};

/// Modbus RTU slave state machine.
///
/// Owns the receive and transmit buffers, the transaction state and
/// the shared countdown. The register map lives outside so that the
/// application can access it without going through the slave.
#[derive(Debug)]
pub struct Slave<'r, L, const N: usize> {
    line: L,
    config: Config,
    address: SlaveId,
    state: SlaveState,
    rx: RxFrame,
    tx: TxFrame,
    timeout: Timeout,
    registers: &'r RegisterMap<N>,
}

impl<'r, L: LineControl, const N: usize> Slave<'r, L, N> {
    /// Create a slave without touching the hardware.
    ///
    /// Call [`Slave::reset`] once before the first event is delivered
    /// to put the transceiver into receive mode.
    #[must_use]
    pub const fn new(line: L, registers: &'r RegisterMap<N>, config: Config) -> Self {
        Self {
            line,
            address: config.address,
            config,
            state: SlaveState::Idle,
            rx: RxFrame::new(),
            tx: TxFrame::new(),
            timeout: Timeout::new(),
            registers,
        }
    }

    #[must_use]
    pub const fn state(&self) -> SlaveState {
        self.state
    }

    #[must_use]
    pub const fn address(&self) -> SlaveId {
        self.address
    }

    /// Change the device address.
    ///
    /// Only allowed between transactions or while the slave is disabled
    /// (address `0`), a frame in flight would otherwise be answered
    /// under the wrong address.
    pub fn set_address(&mut self, address: SlaveId) -> Result<(), Error> {
        if !self.state.is_idle() && self.address != 0 {
            return Err(Error::Busy);
        }
        #[cfg(feature = "log")]
        if address != self.address {
            log::info!("Slave address changed from {} to {address}", self.address);
        }
        self.address = address;
        Ok(())
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub const fn registers(&self) -> &'r RegisterMap<N> {
        self.registers
    }

    #[must_use]
    pub const fn line(&self) -> &L {
        &self.line
    }

    pub fn line_mut(&mut self) -> &mut L {
        &mut self.line
    }

    /// Bytes of the request received so far.
    #[must_use]
    pub fn received(&self) -> &[u8] {
        self.rx.as_bytes()
    }

    /// Length the current request is expected to reach.
    #[must_use]
    pub const fn expected_len(&self) -> usize {
        self.rx.expected_len()
    }

    /// The queued or transmitting response.
    #[must_use]
    pub fn response(&self) -> &[u8] {
        self.tx.as_bytes()
    }

    /// `true` while the countdown is running.
    #[must_use]
    pub const fn is_timer_armed(&self) -> bool {
        self.timeout.is_armed()
    }

    /// Abandon any transaction and listen for the next request.
    pub fn reset(&mut self) {
        self.line.enable_receive();
        self.rx.clear();
        self.tx.clear();
        self.state = SlaveState::Idle;
        self.disarm_timer();
    }

    /// A byte arrived on the line.
    pub fn on_byte_received(&mut self, byte: u8) {
        if !self.state.accepts_bytes() {
            return;
        }
        let len = self.rx.push(byte);
        self.line.reset_timer_count();
        self.timeout.restart();

        if self.state == SlaveState::Idle && len == 1 {
            // Guard against truncated frames from the first byte on.
            self.arm_timer(self.config.frame_timeout_ms);
        }
        if self.state == SlaveState::Idle && len == HEADER_PROBE_LEN {
            self.inspect_header();
        }
        if self.state == SlaveState::Receiving && len == self.rx.expected_len() {
            self.disarm_timer();
            self.state = SlaveState::Processing;
        }
    }

    /// The periodic timer fired.
    pub fn on_timer_tick(&mut self) {
        if !self.timeout.tick() {
            return;
        }
        match self.state.expiry() {
            Expiry::Reset => {
                #[cfg(feature = "log")]
                log::debug!(
                    "Line silent in state {:?} after {} byte(s), dropping frame",
                    self.state,
                    self.rx.as_bytes().len()
                );
                self.reset();
            }
            Expiry::StartTransmission => self.start_transmission(),
            Expiry::Ignore => {}
        }
    }

    /// The transmit data register can take the next byte.
    pub fn on_transmit_ready(&mut self) {
        if self.state != SlaveState::Transmitting {
            return;
        }
        let Some(byte) = self.tx.next_byte() else {
            return;
        };
        self.line.write_byte(byte);
        if self.tx.is_drained() {
            self.line.notify_on(Some(TxEvent::Complete));
        }
    }

    /// The last byte has physically left the UART.
    ///
    /// Only this notification releases the bus, a drained buffer alone
    /// does not mean the line has settled.
    pub fn on_transmit_complete(&mut self) {
        if self.state != SlaveState::Transmitting || !self.tx.is_drained() {
            return;
        }
        self.line.notify_on(None);
        self.reset();
    }

    /// Handle a complete request.
    ///
    /// Returns `Ok(None)` if no request is pending and the length of the
    /// queued response otherwise. On error the frame was discarded
    /// without an answer and the slave is back in [`SlaveState::Idle`].
    pub fn process(&mut self) -> Result<Option<usize>, Error> {
        if self.state != SlaveState::Processing {
            return Ok(None);
        }
        let result = dispatch::process_frame(
            self.rx.as_bytes(),
            self.address,
            self.registers,
            self.tx.buffer_mut(),
        );
        match result {
            Ok(len) => {
                self.tx.load(len);
                self.state = SlaveState::StartingTransmission;
                self.arm_timer(self.config.turnaround_ms);
                Ok(Some(len))
            }
            Err(err) => {
                #[cfg(feature = "log")]
                log::warn!("Discarding request frame: {err}");
                self.reset();
                Err(err)
            }
        }
    }

    fn inspect_header(&mut self) {
        let frame = self.rx.as_bytes();
        if self.address == 0 || frame[0] != self.address {
            self.ignore_frame();
            return;
        }
        match request_frame_len(frame) {
            Ok(Some(len)) => {
                self.rx.set_expected_len(len);
                self.state = SlaveState::Receiving;
            }
            Ok(None) | Err(_) => self.ignore_frame(),
        }
    }

    fn ignore_frame(&mut self) {
        self.state = SlaveState::Ignoring;
        self.rx.set_expected_len(FRAME_CAPACITY);
    }

    fn start_transmission(&mut self) {
        self.line.enable_transmit();
        self.state = SlaveState::Transmitting;
        self.disarm_timer();
        let Some(byte) = self.tx.next_byte() else {
            self.reset();
            return;
        };
        self.line.write_byte(byte);
        let next = if self.tx.is_drained() {
            TxEvent::Complete
        } else {
            TxEvent::ByteConsumed
        };
        self.line.notify_on(Some(next));
    }

    fn arm_timer(&mut self, duration_ms: u16) {
        self.timeout.arm(duration_ms);
        self.line.arm_timer(duration_ms);
    }

    fn disarm_timer(&mut self) {
        self.timeout.disarm();
        self.line.disarm_timer();
    }
}
