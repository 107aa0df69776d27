// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request handling: validate a complete frame, apply it to the
//! register map and encode the answer.

use crate::{
    error::Error,
    frame::*,
    registers::RegisterMap,
    rtu::{FRAME_CAPACITY, Header, RequestAdu, ResponseAdu, SlaveId, server},
};

/// Handle one complete request frame and encode the response into `response`.
///
/// Returns the length of the encoded response, which may be an
/// exception frame. A CRC mismatch or an undecodable frame is an
/// error: nothing must be sent back.
pub(crate) fn process_frame<const N: usize>(
    request: &[u8],
    address: SlaveId,
    registers: &RegisterMap<N>,
    response: &mut [u8],
) -> Result<usize, Error> {
    let RequestAdu {
        pdu: RequestPdu(req),
        ..
    } = server::decode_request(request)?;
    let scratch = &mut [0; FRAME_CAPACITY];
    let pdu = ResponsePdu(
        handle(req, registers, scratch).map_err(|exception| ExceptionResponse {
            function: FunctionCode::from(req),
            exception,
        }),
    );
    #[cfg(feature = "log")]
    if let Err(ExceptionResponse {
        function,
        exception,
    }) = pdu.0
    {
        log::debug!("Answering function {function} with exception: {exception}");
    }
    let adu = ResponseAdu {
        hdr: Header { slave: address },
        pdu,
    };
    server::encode_response(adu, response)
}

fn handle<'a, const N: usize>(
    req: Request<'_>,
    registers: &RegisterMap<N>,
    scratch: &'a mut [u8],
) -> Result<Response<'a>, Exception> {
    match req {
        Request::ReadHoldingRegisters(start, quantity) => {
            let range = RegisterMap::<N>::range(start, quantity)?;
            let mut buf = [0; N];
            let words = &mut buf[..range.len()];
            registers.read(start, words)?;
            // More words than a single frame can carry.
            let data =
                Data::from_words(words, scratch).map_err(|_| Exception::IllegalDataValue)?;
            Ok(Response::ReadHoldingRegisters(data))
        }
        Request::WriteSingleRegister(address, value) => {
            registers.write(address, 1, [value])?;
            Ok(Response::WriteSingleRegister(address, value))
        }
        Request::WriteMultipleRegisters(start, words) => {
            let quantity = words.len() as u16;
            registers.write(start, quantity, words)?;
            Ok(Response::WriteMultipleRegisters(start, quantity))
        }
    }
}
