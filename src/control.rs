// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Motor load current control around the Modbus register map.
//!
//! Register layout:
//!
//! | Index | Content |
//! |-------|---------|
//! | 0 | isolated 4–20 mA analog input (200–1000) |
//! | 1 | load current (0–1000 for 0–5 A) |
//! | 2 | current setpoint written by the master (0–1000) |
//!
//! With address `0` the slave is disabled and the setpoint follows
//! the analog input instead.

use crate::{
    config::REGISTER_COUNT,
    error::Error,
    rtu::SlaveId,
    slave::{LineControl, SharedSlave},
};

pub const ANALOG_INPUT_REGISTER: usize = 0;
pub const CURRENT_REGISTER: usize = 1;
pub const SETPOINT_REGISTER: usize = 2;

/// PWM counter top, i.e. 100 % duty.
pub const PWM_MAX: u16 = 800;
/// Highest duty the current controller may command.
pub const PWM_LIMIT: u16 = 180;
pub const SETPOINT_MAX: u16 = 1000;

/// Below this the 4–20 mA loop is considered broken.
pub const ANALOG_INPUT_TOO_LOW: u16 = 150;
/// 4 mA.
pub const ANALOG_INPUT_MIN: u16 = 200;
/// 20 mA.
pub const ANALOG_INPUT_MAX: u16 = 1000;

const ANALOG_INPUT_GAIN: u32 = 1074;
const ANALOG_INPUT_OFFSET: u32 = 3769;
const CURRENT_GAIN: i32 = 1311;
const CURRENT_OFFSET: i32 = -45462;

const GAIN_K1: i32 = 200;
const GAIN_K2: i32 = 190;
/// Fixed point scale of the controller output.
const OUTPUT_SCALE: i32 = 1000;

/// Scale a raw 10 bit ADC sample of the analog input.
#[must_use]
pub fn analog_input_from_adc(adc: u16) -> u16 {
    let value = (ANALOG_INPUT_GAIN * u32::from(adc) + ANALOG_INPUT_OFFSET) / 1000;
    u16::try_from(value).unwrap_or(u16::MAX)
}

/// Scale a raw 10 bit ADC sample of the shunt amplifier.
#[must_use]
pub fn current_from_adc(adc: u16) -> u16 {
    let value = (CURRENT_GAIN * i32::from(adc) + CURRENT_OFFSET) / 1000;
    u16::try_from(value.max(0)).unwrap_or(u16::MAX)
}

/// Map the 4–20 mA input linearly onto `0..=SETPOINT_MAX`.
#[must_use]
pub fn setpoint_from_analog(analog_input: u16) -> u16 {
    if analog_input < ANALOG_INPUT_MIN {
        return 0;
    }
    if analog_input > ANALOG_INPUT_MAX {
        return SETPOINT_MAX;
    }
    let span = u32::from(ANALOG_INPUT_MAX - ANALOG_INPUT_MIN);
    let value = u32::from(SETPOINT_MAX) * u32::from(analog_input - ANALOG_INPUT_MIN) / span;
    value as u16
}

/// Incremental PI controller with an output clamped to `0..=PWM_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PiController {
    previous_error: i32,
    control_signal: i32,
}

impl PiController {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            previous_error: 0,
            control_signal: 0,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Advance one control step and return the PWM duty.
    pub fn update(&mut self, setpoint: u16, feedback: u16) -> u16 {
        let error = i32::from(setpoint) - i32::from(feedback);
        let increment = GAIN_K1 * error - GAIN_K2 * self.previous_error;
        self.previous_error = error;
        self.control_signal = self
            .control_signal
            .saturating_add(increment)
            .clamp(0, i32::from(PWM_LIMIT) * OUTPUT_SCALE);
        (self.control_signal / OUTPUT_SCALE) as u16
    }
}

/// How the load current is driven.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// PI regulation on the measured current.
    #[default]
    ClosedLoop,
    /// The setpoint is used as PWM duty directly.
    OpenLoop,
}

/// Latest measurements handed to [`ControlLoop::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Measurements {
    pub analog_input: u16,
    pub current: u16,
}

/// Outcome of one [`ControlLoop::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cycle {
    /// Result of handling a pending request, `Ok(None)` if there was none.
    pub request: Result<Option<usize>, Error>,
    /// The slave is disabled and the analog input is below 4 mA.
    pub broken_loop: bool,
}

/// The application side of the slave: address selection,
/// register mirroring and the current controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlLoop {
    pi: PiController,
    setpoint: u16,
    mode: Mode,
}

impl ControlLoop {
    #[must_use]
    pub const fn new(mode: Mode) -> Self {
        Self {
            pi: PiController::new(),
            setpoint: 0,
            mode,
        }
    }

    #[must_use]
    pub const fn setpoint(&self) -> u16 {
        self.setpoint
    }

    /// One pass of the main loop.
    ///
    /// `selected_address` is the address currently set on the dip switch.
    /// It is applied as soon as the slave accepts it, which stops the
    /// load: setpoint, controller state and setpoint register are zeroed.
    pub fn poll<L: LineControl>(
        &mut self,
        slave: &SharedSlave<'_, L, REGISTER_COUNT>,
        selected_address: SlaveId,
        measurements: Measurements,
    ) -> Cycle {
        let registers = slave.registers();

        if slave.address() != selected_address && slave.set_address(selected_address).is_ok() {
            self.setpoint = 0;
            self.pi.clear();
            registers.set(SETPOINT_REGISTER, 0);
        }

        let mut request = Ok(None);
        if slave.address() == 0 {
            self.setpoint = setpoint_from_analog(measurements.analog_input);
        } else {
            request = slave.process();
            registers.set(ANALOG_INPUT_REGISTER, measurements.analog_input);
            registers.set(CURRENT_REGISTER, measurements.current);
            self.setpoint = registers
                .get(SETPOINT_REGISTER)
                .unwrap_or_default()
                .min(SETPOINT_MAX);
        }

        Cycle {
            request,
            broken_loop: slave.address() == 0
                && measurements.analog_input < ANALOG_INPUT_TOO_LOW,
        }
    }

    /// Compute the PWM duty for the measured `current`.
    pub fn regulate(&mut self, current: u16) -> u16 {
        match self.mode {
            Mode::ClosedLoop => self.pi.update(self.setpoint, current),
            Mode::OpenLoop => self.setpoint,
        }
    }
}
