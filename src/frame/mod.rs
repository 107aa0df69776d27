// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use core::fmt;

mod data;
pub(crate) mod rtu;

pub use self::data::*;
use byteorder::{BigEndian, ByteOrder};

/// A Modbus function code.
///
/// It is represented by an unsigned 8 bit integer.
/// Only the holding register functions are served,
/// everything else ends up in [`FunctionCode::Custom`].
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionCode {
    /// Modbus Function Code: `03` (`0x03`).
    ReadHoldingRegisters,

    /// Modbus Function Code: `06` (`0x06`).
    WriteSingleRegister,

    /// Modbus Function Code: `16` (`0x10`).
    WriteMultipleRegisters,

    /// Any other function code.
    Custom(u8),
}

impl FunctionCode {
    /// Create a new [`FunctionCode`] with `value`.
    #[must_use]
    pub const fn new(value: u8) -> Self {
        match value {
            0x03 => Self::ReadHoldingRegisters,
            0x06 => Self::WriteSingleRegister,
            0x10 => Self::WriteMultipleRegisters,
            code => Self::Custom(code),
        }
    }

    /// Get the [`u8`] value of the current [`FunctionCode`].
    #[must_use]
    pub const fn value(self) -> u8 {
        match self {
            Self::ReadHoldingRegisters => 0x03,
            Self::WriteSingleRegister => 0x06,
            Self::WriteMultipleRegisters => 0x10,
            Self::Custom(code) => code,
        }
    }

    /// `true` for the function codes this slave answers.
    #[must_use]
    pub const fn is_supported(self) -> bool {
        !matches!(self, Self::Custom(_))
    }
}

impl From<u8> for FunctionCode {
    fn from(value: u8) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for FunctionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.value().fmt(f)
    }
}

/// A Modbus address is represented by 16 bit (from `0` to `65535`).
pub(crate) type Address = u16;

/// Modbus uses 16 bit for its data items (big-endian representation).
pub(crate) type Word = u16;

/// Number of items to process (`0` - `65535`).
pub(crate) type Quantity = u16;

/// Raw PDU data
type RawData<'r> = &'r [u8];

/// A request represents a message from the client (master) to the server (slave).
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request<'r> {
    ReadHoldingRegisters(Address, Quantity),
    WriteSingleRegister(Address, Word),
    WriteMultipleRegisters(Address, Data<'r>),
}

/// A server (slave) exception response.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExceptionResponse {
    pub function: FunctionCode,
    pub exception: Exception,
}

/// Represents a message from the client (master) to the server (slave).
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestPdu<'r>(pub Request<'r>);

/// Represents a message from the server (slave) to the client (master).
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponsePdu<'r>(pub Result<Response<'r>, ExceptionResponse>);

/// The response data of a successful request.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response<'r> {
    ReadHoldingRegisters(Data<'r>),
    WriteSingleRegister(Address, Word),
    WriteMultipleRegisters(Address, Quantity),
}

impl<'r> From<Request<'r>> for FunctionCode {
    fn from(r: Request<'r>) -> Self {
        use Request as R;

        match r {
            R::ReadHoldingRegisters(_, _) => Self::ReadHoldingRegisters,
            R::WriteSingleRegister(_, _) => Self::WriteSingleRegister,
            R::WriteMultipleRegisters(_, _) => Self::WriteMultipleRegisters,
        }
    }
}

impl<'r> From<Response<'r>> for FunctionCode {
    fn from(r: Response<'r>) -> Self {
        use Response as R;

        match r {
            R::ReadHoldingRegisters(_) => Self::ReadHoldingRegisters,
            R::WriteSingleRegister(_, _) => Self::WriteSingleRegister,
            R::WriteMultipleRegisters(_, _) => Self::WriteMultipleRegisters,
        }
    }
}

/// A server (slave) exception.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exception {
    IllegalFunction = 0x01,
    IllegalDataAddress = 0x02,
    IllegalDataValue = 0x03,
    ServerDeviceFailure = 0x04,
    Acknowledge = 0x05,
    ServerDeviceBusy = 0x06,
    MemoryParityError = 0x08,
    GatewayPathUnavailable = 0x0A,
    GatewayTargetDevice = 0x0B,
}

impl Exception {
    const fn get_name(self) -> &'static str {
        match self {
            Self::IllegalFunction => "Illegal function",
            Self::IllegalDataAddress => "Illegal data address",
            Self::IllegalDataValue => "Illegal data value",
            Self::ServerDeviceFailure => "Server device failure",
            Self::Acknowledge => "Acknowledge",
            Self::ServerDeviceBusy => "Server device busy",
            Self::MemoryParityError => "Memory parity error",
            Self::GatewayPathUnavailable => "Gateway path unavailable",
            Self::GatewayTargetDevice => "Gateway target device failed to respond",
        }
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.get_name())
    }
}

#[cfg(all(feature = "defmt", target_os = "none"))]
impl defmt::Format for Exception {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.get_name())
    }
}

impl Request<'_> {
    /// Number of bytes required for a serialized PDU frame.
    #[must_use]
    pub const fn pdu_len(&self) -> usize {
        match *self {
            Self::ReadHoldingRegisters(_, _) | Self::WriteSingleRegister(_, _) => 5,
            Self::WriteMultipleRegisters(_, words) => 6 + words.data.len(),
        }
    }
}

impl Response<'_> {
    /// Number of bytes required for a serialized PDU frame.
    #[must_use]
    pub const fn pdu_len(&self) -> usize {
        match *self {
            Self::WriteSingleRegister(_, _) | Self::WriteMultipleRegisters(_, _) => 5,
            Self::ReadHoldingRegisters(words) => 2 + words.len() * 2,
        }
    }
}

impl ResponsePdu<'_> {
    /// Number of bytes required for a serialized PDU frame.
    #[must_use]
    pub const fn pdu_len(&self) -> usize {
        match self.0 {
            Ok(ref rsp) => rsp.pdu_len(),
            Err(_) => 2,
        }
    }
}

/// Read a big-endian address/quantity pair starting at `offset`.
pub(crate) fn read_pair(bytes: &[u8], offset: usize) -> (u16, u16) {
    (
        BigEndian::read_u16(&bytes[offset..offset + 2]),
        BigEndian::read_u16(&bytes[offset + 2..offset + 4]),
    )
}

#[cfg(test)]
mod tests {

    use super::*;

    #[test]
    fn function_code_into_u8() {
        let x: u8 = FunctionCode::WriteMultipleRegisters.value();
        assert_eq!(x, 16);
        let x: u8 = FunctionCode::Custom(0xBB).value();
        assert_eq!(x, 0xBB);
    }

    #[test]
    fn function_code_from_u8() {
        assert_eq!(FunctionCode::new(3), FunctionCode::ReadHoldingRegisters);
        assert_eq!(FunctionCode::new(6), FunctionCode::WriteSingleRegister);
        assert_eq!(FunctionCode::new(16), FunctionCode::WriteMultipleRegisters);
        assert_eq!(FunctionCode::new(0x04), FunctionCode::Custom(0x04));
        assert!(!FunctionCode::new(0x01).is_supported());
        assert!(FunctionCode::new(0x10).is_supported());
    }

    #[test]
    fn function_code_from_request() {
        use Request::*;
        let requests = &[
            (ReadHoldingRegisters(0, 0), 0x03),
            (WriteSingleRegister(0, 0), 0x06),
            (
                WriteMultipleRegisters(
                    0,
                    Data {
                        quantity: 0,
                        data: &[],
                    },
                ),
                0x10,
            ),
        ];
        for (req, expected) in requests {
            let code: u8 = FunctionCode::from(*req).value();
            assert_eq!(*expected, code);
        }
    }

    #[test]
    fn function_code_from_response() {
        use Response::*;
        let responses = &[
            (
                ReadHoldingRegisters(Data {
                    quantity: 0,
                    data: &[],
                }),
                0x03,
            ),
            (WriteSingleRegister(0, 0), 0x06),
            (WriteMultipleRegisters(0, 0), 0x10),
        ];
        for (rsp, expected) in responses {
            let code: u8 = FunctionCode::from(*rsp).value();
            assert_eq!(*expected, code);
        }
    }

    #[test]
    fn test_request_pdu_len() {
        assert_eq!(Request::ReadHoldingRegisters(0x12, 5).pdu_len(), 5);
        assert_eq!(Request::WriteSingleRegister(0x12, 0x33).pdu_len(), 5);
        let buf = &mut [0; 4];
        assert_eq!(
            Request::WriteMultipleRegisters(0, Data::from_words(&[1, 2], buf).unwrap()).pdu_len(),
            10
        );
    }

    #[test]
    fn test_response_pdu_len() {
        let buf = &mut [0; 6];
        assert_eq!(
            Response::ReadHoldingRegisters(Data::from_words(&[1, 2, 3], buf).unwrap()).pdu_len(),
            8
        );
        assert_eq!(Response::WriteMultipleRegisters(0, 2).pdu_len(), 5);
        let exception = ResponsePdu(Err(ExceptionResponse {
            function: FunctionCode::ReadHoldingRegisters,
            exception: Exception::IllegalDataAddress,
        }));
        assert_eq!(exception.pdu_len(), 2);
    }

    #[test]
    fn exception_display() {
        use core::fmt::Write;

        struct Buf([u8; 32], usize);
        impl Write for Buf {
            fn write_str(&mut self, s: &str) -> fmt::Result {
                self.0[self.1..self.1 + s.len()].copy_from_slice(s.as_bytes());
                self.1 += s.len();
                Ok(())
            }
        }
        let mut buf = Buf([0; 32], 0);
        write!(buf, "{}", Exception::IllegalDataAddress).unwrap();
        assert_eq!(&buf.0[..buf.1], b"Illegal data address");
    }
}
