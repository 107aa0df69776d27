// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Transmit notification the slave needs from the serial peripheral.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxEvent {
    /// The data register can take the next byte
    /// ([`Slave::on_transmit_ready`](super::Slave::on_transmit_ready)).
    ByteConsumed,
    /// The last byte has left the shift register
    /// ([`Slave::on_transmit_complete`](super::Slave::on_transmit_complete)).
    Complete,
}

/// Hardware hooks of a half-duplex RS-485 port.
///
/// Implementations are thin wrappers around the driver enable pin,
/// the serial data register, its interrupt enables and the
/// timer that produces [`Slave::on_timer_tick`](super::Slave::on_timer_tick).
/// All methods are called from within the slave's critical section
/// and must not block.
pub trait LineControl {
    /// Release the bus: the transceiver listens.
    fn enable_receive(&mut self);

    /// Drive the bus: the transceiver talks.
    fn enable_transmit(&mut self);

    /// Start the periodic timer tick for a countdown of `duration_ms`.
    fn arm_timer(&mut self, duration_ms: u16);

    /// Stop the periodic timer tick.
    fn disarm_timer(&mut self);

    /// Restart the current tick period, called for every received byte.
    fn reset_timer_count(&mut self);

    /// Put one byte into the transmit data register.
    fn write_byte(&mut self, byte: u8);

    /// Select the transmit notification to deliver next, `None` silences both.
    fn notify_on(&mut self, event: Option<TxEvent>);
}

impl<T: LineControl + ?Sized> LineControl for &mut T {
    fn enable_receive(&mut self) {
        (**self).enable_receive();
    }

    fn enable_transmit(&mut self) {
        (**self).enable_transmit();
    }

    fn arm_timer(&mut self, duration_ms: u16) {
        (**self).arm_timer(duration_ms);
    }

    fn disarm_timer(&mut self) {
        (**self).disarm_timer();
    }

    fn reset_timer_count(&mut self) {
        (**self).reset_timer_count();
    }

    fn write_byte(&mut self, byte: u8) {
        (**self).write_byte(byte);
    }

    fn notify_on(&mut self, event: Option<TxEvent>) {
        (**self).notify_on(event);
    }
}
