// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Modbus RTU

use super::*;
use byteorder::LittleEndian;

pub mod client;
pub mod server;
pub use crate::frame::rtu::*;

/// Capacity of the receive and the transmit buffer.
///
/// Bytes arriving beyond it are dropped.
pub const FRAME_CAPACITY: usize = 255;

/// Smallest frame: address, function, two data bytes and the CRC.
pub const MIN_FRAME_LEN: usize = 6;

/// Number of buffered bytes at which address and function code are inspected.
pub const HEADER_PROBE_LEN: usize = 7;

/// Bytes of a CRC trailer.
pub const CRC_LEN: usize = 2;

/// An extracted RTU PDU frame.
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedFrame<'a> {
    pub slave: SlaveId,
    pub pdu: &'a [u8],
}

/// Verify the trailing CRC and split a complete frame into slave ID and PDU.
#[allow(clippy::similar_names)]
pub fn extract_frame(buf: &[u8]) -> Result<DecodedFrame<'_>> {
    if buf.len() < CRC_LEN + 2 {
        return Err(Error::BufferSize);
    }
    let (adu_buf, crc_buf) = buf.split_at(buf.len() - CRC_LEN);
    // The CRC travels low byte first.
    let expected_crc = LittleEndian::read_u16(crc_buf);
    let actual_crc = crc16(adu_buf);
    if expected_crc != actual_crc {
        return Err(Error::Crc(expected_crc, actual_crc));
    }
    let (slave_id, pdu) = adu_buf.split_at(1);
    Ok(DecodedFrame {
        slave: slave_id[0],
        pdu,
    })
}

/// Calculate the CRC (Cyclic Redundancy Check) sum.
///
/// Polynomial `0xA001`, initial value `0xFFFF`, every byte is
/// shifted in LSB first. An empty slice yields `0xFFFF`.
#[must_use]
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc = 0xFFFF;
    for x in data {
        crc ^= u16::from(*x);
        for _ in 0..8 {
            // if we followed clippy's suggestion to move out the crc >>= 1, the condition may not be met any more
            // the recommended action therefore makes no sense and it is better to allow this lint
            #[allow(clippy::branches_sharing_code)]
            if (crc & 0x0001) != 0 {
                crc >>= 1;
                crc ^= 0xA001;
            } else {
                crc >>= 1;
            }
        }
    }
    crc
}

/// Append the CRC of `buf[..len]` (low byte first) and return the frame length.
pub fn append_crc(buf: &mut [u8], len: usize) -> Result<usize> {
    if buf.len() < len + CRC_LEN {
        return Err(Error::BufferSize);
    }
    let crc = crc16(&buf[..len]);
    LittleEndian::write_u16(&mut buf[len..], crc);
    Ok(len + CRC_LEN)
}

/// Total length of a request frame, derived from its first bytes.
///
/// Read and write-single requests are always 8 bytes, a
/// write-multiple request carries `2 * quantity` payload bytes
/// on top of its 9 byte skeleton.
pub fn request_frame_len(adu_buf: &[u8]) -> Result<Option<usize>> {
    if adu_buf.len() < 2 {
        return Ok(None);
    }
    let len = match FunctionCode::new(adu_buf[1]) {
        FunctionCode::ReadHoldingRegisters | FunctionCode::WriteSingleRegister => Some(8),
        FunctionCode::WriteMultipleRegisters => {
            if adu_buf.len() >= 6 {
                let quantity = BigEndian::read_u16(&adu_buf[4..6]);
                Some(9 + 2 * usize::from(quantity))
            } else {
                // incomplete frame
                None
            }
        }
        FunctionCode::Custom(code) => return Err(Error::FnCode(code)),
    };
    Ok(len)
}

/// Total length of a response frame, derived from its first bytes.
pub fn response_frame_len(adu_buf: &[u8]) -> Result<Option<usize>> {
    if adu_buf.len() < 2 {
        return Ok(None);
    }
    let fn_code = adu_buf[1];
    let len = match fn_code {
        0x03 => {
            if adu_buf.len() > 2 {
                Some(5 + adu_buf[2] as usize)
            } else {
                // incomplete frame
                None
            }
        }
        0x06 | 0x10 => Some(8),
        0x83 | 0x86 | 0x90 => Some(5),
        _ => return Err(Error::FnCode(fn_code)),
    };
    Ok(len)
}
