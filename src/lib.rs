// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

#![doc = include_str!("../README.md")]
#![no_std]

mod codec;
mod error;
mod frame;
mod slave;

pub mod config;
pub mod control;
pub mod registers;

pub use codec::rtu;
pub use config::Config;
pub use error::*;
pub use frame::rtu::SlaveId;
pub use frame::*;
pub use registers::RegisterMap;
pub use slave::*;
