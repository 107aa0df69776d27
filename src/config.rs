// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Slave configuration.

use crate::SlaveId;

/// Wire rate the default timings are chosen for.
pub const BAUD_RATE: u32 = 19_200;

/// Number of holding registers of the motor load controller.
pub const REGISTER_COUNT: usize = 3;

/// Timing and addressing parameters of a [`Slave`](crate::Slave).
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Address the slave answers to, `0` disables it.
    pub address: SlaveId,
    /// Silence in timer ticks that ends or aborts a frame.
    pub frame_timeout_ms: u16,
    /// Delay in timer ticks between a complete request and driving the line.
    pub turnaround_ms: u16,
}

impl Config {
    pub const DEFAULT: Self = Self {
        address: 1,
        frame_timeout_ms: 1,
        turnaround_ms: 100,
    };

    #[must_use]
    pub const fn with_address(mut self, address: SlaveId) -> Self {
        self.address = address;
        self
    }

    #[must_use]
    pub const fn with_frame_timeout(mut self, ms: u16) -> Self {
        self.frame_timeout_ms = ms;
        self
    }

    #[must_use]
    pub const fn with_turnaround(mut self, ms: u16) -> Self {
        self.turnaround_ms = ms;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::DEFAULT
    }
}
