// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use modbus_rtu_slave::rtu::{FRAME_CAPACITY, append_crc, crc16, extract_frame};
use proptest::{collection::vec, prelude::*, sample::Index};

proptest! {
    #[test]
    fn appended_crc_is_accepted(data in vec(any::<u8>(), 2..=FRAME_CAPACITY - 2)) {
        let mut buf = [0; FRAME_CAPACITY];
        buf[..data.len()].copy_from_slice(&data);
        let len = append_crc(&mut buf, data.len()).unwrap();
        prop_assert_eq!(len, data.len() + 2);
        prop_assert_eq!(&buf[data.len()..len], &crc16(&data).to_le_bytes()[..]);

        let frame = extract_frame(&buf[..len]).unwrap();
        prop_assert_eq!(frame.slave, data[0]);
        prop_assert_eq!(frame.pdu, &data[1..]);
    }

    #[test]
    fn single_bit_error_is_detected(
        data in vec(any::<u8>(), 2..=FRAME_CAPACITY - 2),
        bit in any::<Index>(),
    ) {
        let mut buf = [0; FRAME_CAPACITY];
        buf[..data.len()].copy_from_slice(&data);
        let len = append_crc(&mut buf, data.len()).unwrap();
        let bit = bit.index(len * 8);
        buf[bit / 8] ^= 1 << (bit % 8);
        prop_assert!(extract_frame(&buf[..len]).is_err());
    }
}
