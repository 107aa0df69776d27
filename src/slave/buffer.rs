// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::rtu::{FRAME_CAPACITY, MIN_FRAME_LEN};

/// Incoming frame, filled one byte at a time.
#[derive(Debug, Clone)]
pub(crate) struct RxFrame {
    buf: [u8; FRAME_CAPACITY],
    len: usize,
    expected_len: usize,
}

impl RxFrame {
    pub(crate) const fn new() -> Self {
        Self {
            buf: [0; FRAME_CAPACITY],
            len: 0,
            expected_len: MIN_FRAME_LEN,
        }
    }

    /// Append `byte` and return the number of buffered bytes.
    ///
    /// A full buffer drops the byte.
    pub(crate) fn push(&mut self, byte: u8) -> usize {
        if self.len < FRAME_CAPACITY {
            self.buf[self.len] = byte;
            self.len += 1;
        }
        self.len
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub(crate) const fn expected_len(&self) -> usize {
        self.expected_len
    }

    pub(crate) fn set_expected_len(&mut self, len: usize) {
        debug_assert!(len >= MIN_FRAME_LEN);
        self.expected_len = len;
    }

    pub(crate) fn clear(&mut self) {
        self.len = 0;
        self.expected_len = MIN_FRAME_LEN;
    }
}

/// Outgoing frame, encoded at once and drained one byte at a time.
#[derive(Debug, Clone)]
pub(crate) struct TxFrame {
    buf: [u8; FRAME_CAPACITY],
    len: usize,
    cursor: usize,
}

impl TxFrame {
    pub(crate) const fn new() -> Self {
        Self {
            buf: [0; FRAME_CAPACITY],
            len: 0,
            cursor: 0,
        }
    }

    /// The whole buffer, to encode a response into.
    pub(crate) fn buffer_mut(&mut self) -> &mut [u8] {
        &mut self.buf
    }

    /// Mark the first `len` bytes as the frame to send.
    pub(crate) fn load(&mut self, len: usize) {
        self.len = len.min(FRAME_CAPACITY);
        self.cursor = 0;
    }

    pub(crate) fn next_byte(&mut self) -> Option<u8> {
        if self.cursor >= self.len {
            return None;
        }
        let byte = self.buf[self.cursor];
        self.cursor += 1;
        Some(byte)
    }

    pub(crate) const fn is_drained(&self) -> bool {
        self.cursor >= self.len
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub(crate) fn clear(&mut self) {
        self.len = 0;
        self.cursor = 0;
    }
}
