// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Modbus RTU server (slave) specific functions.
use super::*;

/// Decode a complete RTU request frame.
///
/// The frame boundaries are already known to the caller,
/// so unlike a stream decoder nothing is skipped or resynchronized:
/// a CRC mismatch rejects the whole frame.
pub fn decode_request(buf: &[u8]) -> Result<RequestAdu<'_>> {
    let DecodedFrame { slave, pdu } = extract_frame(buf)?;
    let hdr = Header { slave };
    let pdu = Request::try_from(pdu).map(RequestPdu)?;
    Ok(RequestAdu { hdr, pdu })
}

/// Encode an RTU response.
pub fn encode_response(adu: ResponseAdu<'_>, buf: &mut [u8]) -> Result<usize> {
    let ResponseAdu { hdr, pdu } = adu;
    if buf.len() < 2 {
        return Err(Error::BufferSize);
    }
    let len = pdu.encode(&mut buf[1..])?;
    buf[0] = hdr.slave;
    append_crc(buf, len + 1)
}
