// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Modbus RTU client (master) specific functions.
//!
//! The slave never calls these. They produce and check the frames
//! a master puts on the wire, e.g. for bench tests of a device.
use super::*;

/// Encode an RTU request.
pub fn encode_request(adu: RequestAdu<'_>, buf: &mut [u8]) -> Result<usize> {
    let RequestAdu { hdr, pdu } = adu;
    if buf.len() < 2 {
        return Err(Error::BufferSize);
    }
    let len = pdu.0.encode(&mut buf[1..])?;
    buf[0] = hdr.slave;
    append_crc(buf, len + 1)
}

/// Decode an RTU response.
///
/// Returns `Ok(None)` as long as the buffer holds an incomplete frame.
pub fn decode_response(buf: &[u8]) -> Result<Option<ResponseAdu<'_>>> {
    let Some(frame_len) = response_frame_len(buf)? else {
        return Ok(None);
    };
    if buf.len() < frame_len {
        return Ok(None);
    }
    let DecodedFrame { slave, pdu } = extract_frame(&buf[..frame_len])?;
    let hdr = Header { slave };
    let pdu = ExceptionResponse::try_from(pdu)
        .map(|er| ResponsePdu(Err(er)))
        .or_else(|_| Response::try_from(pdu).map(|r| ResponsePdu(Ok(r))));
    #[cfg(feature = "log")]
    if let Err(err) = pdu {
        log::error!("Failed to decode response PDU: {err}");
    }
    Ok(Some(ResponseAdu { hdr, pdu: pdu? }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_write_single_register_request() {
        let adu = RequestAdu {
            hdr: Header { slave: 0x12 },
            pdu: RequestPdu(Request::WriteSingleRegister(0x2222, 0xABCD)),
        };
        let buf = &mut [0; 100];
        let len = encode_request(adu, buf).unwrap();
        assert_eq!(len, 8);
        assert_eq!(&buf[..8], &[0x12, 0x06, 0x22, 0x22, 0xAB, 0xCD, 0x9F, 0xBE]);
    }

    #[test]
    fn decode_partly_received_response() {
        let buf = &[
            0x01, // slave address
            0x03, // function code
            0x02, // byte count
            0x12, // data
        ];
        assert!(decode_response(buf).unwrap().is_none());
    }

    #[test]
    fn decode_write_single_register_response() {
        let buf = &[0x12, 0x06, 0x22, 0x22, 0xAB, 0xCD, 0x9F, 0xBE, 0x00];
        let ResponseAdu { hdr, pdu } = decode_response(buf).unwrap().unwrap();
        assert_eq!(hdr.slave, 0x12);
        assert_eq!(pdu, ResponsePdu(Ok(Response::WriteSingleRegister(0x2222, 0xABCD))));
    }

    #[test]
    fn decode_exception_response() {
        let buf = &[0x01, 0x83, 0x02, 0xC0, 0xF1];
        let ResponseAdu { pdu, .. } = decode_response(buf).unwrap().unwrap();
        assert_eq!(
            pdu,
            ResponsePdu(Err(ExceptionResponse {
                function: FunctionCode::ReadHoldingRegisters,
                exception: Exception::IllegalDataAddress,
            }))
        );
    }

    #[test]
    fn decode_response_with_invalid_crc() {
        let buf = &[0x01, 0x83, 0x02, 0xC0, 0xF2];
        assert!(matches!(decode_response(buf), Err(Error::Crc(_, _))));
    }
}
