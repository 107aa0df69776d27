// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{error::*, frame::*};
use byteorder::{BigEndian, ByteOrder};
use core::convert::TryFrom;

pub mod rtu;

type Result<T> = core::result::Result<T, Error>;

impl TryFrom<u8> for Exception {
    type Error = Error;

    fn try_from(code: u8) -> Result<Self> {
        use crate::frame::Exception::*;
        let ex = match code {
            0x01 => IllegalFunction,
            0x02 => IllegalDataAddress,
            0x03 => IllegalDataValue,
            0x04 => ServerDeviceFailure,
            0x05 => Acknowledge,
            0x06 => ServerDeviceBusy,
            0x08 => MemoryParityError,
            0x0A => GatewayPathUnavailable,
            0x0B => GatewayTargetDevice,
            _ => {
                return Err(Error::ExceptionCode(code));
            }
        };
        Ok(ex)
    }
}

impl From<ExceptionResponse> for [u8; 2] {
    fn from(ex: ExceptionResponse) -> [u8; 2] {
        let fn_code = ex.function.value();
        debug_assert!(fn_code < 0x80);
        [fn_code | 0x80, ex.exception as u8]
    }
}

impl TryFrom<&[u8]> for ExceptionResponse {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 2 {
            return Err(Error::BufferSize);
        }
        let fn_err_code = bytes[0];
        if fn_err_code < 0x80 {
            return Err(Error::ExceptionFnCode(fn_err_code));
        }
        let function = FunctionCode::new(fn_err_code - 0x80);
        let exception = Exception::try_from(bytes[1])?;
        Ok(ExceptionResponse {
            function,
            exception,
        })
    }
}

impl<'r> TryFrom<&'r [u8]> for Request<'r> {
    type Error = Error;

    fn try_from(bytes: &'r [u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Err(Error::BufferSize);
        }

        let fn_code = FunctionCode::new(bytes[0]);

        if bytes.len() < min_request_pdu_len(fn_code) {
            return Err(Error::BufferSize);
        }

        use crate::frame::Request::*;
        use FunctionCode as f;

        let req = match fn_code {
            f::ReadHoldingRegisters | f::WriteSingleRegister => {
                let (addr, value) = read_pair(bytes, 1);
                match fn_code {
                    f::ReadHoldingRegisters => ReadHoldingRegisters(addr, value),
                    _ => WriteSingleRegister(addr, value),
                }
            }
            f::WriteMultipleRegisters => {
                // The quantity field alone defines the payload,
                // the byte count at offset 5 is not consulted.
                let (address, quantity) = read_pair(bytes, 1);
                let data = Data::from_bytes(&bytes[6..], usize::from(quantity))?;
                WriteMultipleRegisters(address, data)
            }
            f::Custom(code) => return Err(Error::FnCode(code)),
        };
        Ok(req)
    }
}

impl<'r> TryFrom<&'r [u8]> for Response<'r> {
    type Error = Error;

    fn try_from(bytes: &'r [u8]) -> Result<Self> {
        use crate::frame::Response::*;
        if bytes.is_empty() {
            return Err(Error::BufferSize);
        }
        let fn_code = FunctionCode::new(bytes[0]);
        if bytes.len() < min_response_pdu_len(fn_code) {
            return Err(Error::BufferSize);
        }
        use FunctionCode as f;
        let rsp = match fn_code {
            f::ReadHoldingRegisters => {
                let byte_count = bytes[1] as usize;
                if byte_count + 2 > bytes.len() {
                    return Err(Error::BufferSize);
                }
                ReadHoldingRegisters(Data::from_bytes(&bytes[2..], byte_count / 2)?)
            }
            f::WriteSingleRegister | f::WriteMultipleRegisters => {
                let (addr, payload) = read_pair(bytes, 1);
                match fn_code {
                    f::WriteSingleRegister => WriteSingleRegister(addr, payload),
                    _ => WriteMultipleRegisters(addr, payload),
                }
            }
            f::Custom(code) => return Err(Error::FnCode(code)),
        };
        Ok(rsp)
    }
}

impl Request<'_> {
    /// Serialize the PDU into `buf` and return the number of bytes written.
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        let len = self.pdu_len();
        if buf.len() < len {
            return Err(Error::BufferSize);
        }
        buf[0] = FunctionCode::from(*self).value();
        match *self {
            Self::ReadHoldingRegisters(address, payload)
            | Self::WriteSingleRegister(address, payload) => {
                BigEndian::write_u16(&mut buf[1..], address);
                BigEndian::write_u16(&mut buf[3..], payload);
            }
            Self::WriteMultipleRegisters(address, words) => {
                BigEndian::write_u16(&mut buf[1..], address);
                BigEndian::write_u16(&mut buf[3..], words.len() as u16);
                buf[5] = (words.len() * 2) as u8;
                words.copy_to(&mut buf[6..]);
            }
        }
        Ok(len)
    }
}

impl Response<'_> {
    /// Serialize the PDU into `buf` and return the number of bytes written.
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        let len = self.pdu_len();
        if buf.len() < len {
            return Err(Error::BufferSize);
        }
        buf[0] = FunctionCode::from(*self).value();
        match *self {
            Self::ReadHoldingRegisters(words) => {
                buf[1] = (words.len() * 2) as u8;
                words.copy_to(&mut buf[2..]);
            }
            Self::WriteSingleRegister(address, payload)
            | Self::WriteMultipleRegisters(address, payload) => {
                BigEndian::write_u16(&mut buf[1..], address);
                BigEndian::write_u16(&mut buf[3..], payload);
            }
        }
        Ok(len)
    }
}

impl ResponsePdu<'_> {
    /// Serialize the PDU (or the exception) into `buf`.
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize> {
        match self.0 {
            Ok(ref rsp) => rsp.encode(buf),
            Err(ex) => {
                if buf.len() < 2 {
                    return Err(Error::BufferSize);
                }
                let bytes: [u8; 2] = ex.into();
                buf[..2].copy_from_slice(&bytes);
                Ok(2)
            }
        }
    }
}

const fn min_request_pdu_len(fn_code: FunctionCode) -> usize {
    use FunctionCode::*;
    match fn_code {
        ReadHoldingRegisters | WriteSingleRegister => 5,
        WriteMultipleRegisters => 6,
        Custom(_) => 1,
    }
}

const fn min_response_pdu_len(fn_code: FunctionCode) -> usize {
    use FunctionCode::*;
    match fn_code {
        ReadHoldingRegisters => 2,
        WriteSingleRegister | WriteMultipleRegisters => 5,
        Custom(_) => 1,
    }
}
