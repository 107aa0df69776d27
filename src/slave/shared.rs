// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::cell::RefCell;

use critical_section::Mutex;

use super::{LineControl, Slave, SlaveState};
use crate::{error::Error, registers::RegisterMap, rtu::SlaveId};

/// A [`Slave`] that interrupt handlers and the main loop can share.
///
/// Every method runs inside a [`critical_section`], so no two events
/// ever interleave. This includes [`SharedSlave::process`]: a timeout
/// cannot reset the receive buffer while the request is validated.
///
/// ```ignore
/// static REGISTERS: RegisterMap<3> = RegisterMap::new();
/// static SLAVE: SharedSlave<'static, Rs485, 3> =
///     SharedSlave::new(Slave::new(Rs485::new(), &REGISTERS, Config::DEFAULT));
///
/// #[interrupt]
/// fn USART_RX() {
///     SLAVE.on_byte_received(read_data_register());
/// }
/// ```
pub struct SharedSlave<'r, L, const N: usize> {
    inner: Mutex<RefCell<Slave<'r, L, N>>>,
}

impl<'r, L: LineControl, const N: usize> SharedSlave<'r, L, N> {
    #[must_use]
    pub const fn new(slave: Slave<'r, L, N>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(slave)),
        }
    }

    /// Run `f` with exclusive access to the slave.
    pub fn lock<R>(&self, f: impl FnOnce(&mut Slave<'r, L, N>) -> R) -> R {
        critical_section::with(|cs| f(&mut *self.inner.borrow_ref_mut(cs)))
    }

    /// See [`Slave::reset`].
    pub fn reset(&self) {
        self.lock(Slave::reset);
    }

    /// See [`Slave::on_byte_received`].
    pub fn on_byte_received(&self, byte: u8) {
        self.lock(|slave| slave.on_byte_received(byte));
    }

    /// See [`Slave::on_timer_tick`].
    pub fn on_timer_tick(&self) {
        self.lock(Slave::on_timer_tick);
    }

    /// See [`Slave::on_transmit_ready`].
    pub fn on_transmit_ready(&self) {
        self.lock(Slave::on_transmit_ready);
    }

    /// See [`Slave::on_transmit_complete`].
    pub fn on_transmit_complete(&self) {
        self.lock(Slave::on_transmit_complete);
    }

    /// See [`Slave::process`].
    pub fn process(&self) -> Result<Option<usize>, Error> {
        self.lock(Slave::process)
    }

    #[must_use]
    pub fn state(&self) -> SlaveState {
        self.lock(|slave| slave.state())
    }

    #[must_use]
    pub fn address(&self) -> SlaveId {
        self.lock(|slave| slave.address())
    }

    /// See [`Slave::set_address`].
    pub fn set_address(&self, address: SlaveId) -> Result<(), Error> {
        self.lock(|slave| slave.set_address(address))
    }

    /// The register map.
    ///
    /// Only fetching the reference takes the lock. The returned map is
    /// used without entering the critical section.
    #[must_use]
    pub fn registers(&self) -> &'r RegisterMap<N> {
        self.lock(|slave| slave.registers())
    }
}
