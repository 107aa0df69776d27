// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Holding register map shared between the slave and the application.

use core::{
    ops::Range,
    sync::atomic::{AtomicU16, Ordering},
};

use crate::frame::Exception;

/// Fixed size map of `N` holding registers.
///
/// Every word is accessed atomically on its own. The slave and the
/// application loop may touch the map concurrently without a lock
/// as long as each side only relies on single-word consistency.
#[derive(Debug)]
pub struct RegisterMap<const N: usize> {
    words: [AtomicU16; N],
}

impl<const N: usize> RegisterMap<N> {
    /// A map with all registers set to `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            words: [const { AtomicU16::new(0) }; N],
        }
    }

    /// Number of registers.
    #[must_use]
    pub const fn len(&self) -> usize {
        N
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Current value of register `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<u16> {
        self.words
            .get(index)
            .map(|word| word.load(Ordering::Relaxed))
    }

    /// Overwrite register `index`, returns `false` if it does not exist.
    pub fn set(&self, index: usize, value: u16) -> bool {
        let Some(word) = self.words.get(index) else {
            return false;
        };
        word.store(value, Ordering::Relaxed);
        true
    }

    /// Indexes covered by `quantity` registers starting at `start`.
    ///
    /// The check is `start + quantity - 1 <= N - 1`, evaluated without
    /// wrapping: a zero quantity is accepted for every `start <= N`.
    pub fn range(start: u16, quantity: u16) -> Result<Range<usize>, Exception> {
        let start = usize::from(start);
        let end = start + usize::from(quantity);
        if end > N {
            return Err(Exception::IllegalDataAddress);
        }
        Ok(start..end)
    }

    /// Copy `target.len()` consecutive registers starting at `start`.
    pub fn read(&self, start: u16, target: &mut [u16]) -> Result<(), Exception> {
        let quantity = u16::try_from(target.len()).map_err(|_| Exception::IllegalDataAddress)?;
        let range = Self::range(start, quantity)?;
        for (dst, word) in target.iter_mut().zip(&self.words[range]) {
            *dst = word.load(Ordering::Relaxed);
        }
        Ok(())
    }

    /// Store `values` into consecutive registers starting at `start`.
    ///
    /// Nothing is written if the range does not fit.
    pub fn write<I>(&self, start: u16, quantity: u16, values: I) -> Result<(), Exception>
    where
        I: IntoIterator<Item = u16>,
    {
        let range = Self::range(start, quantity)?;
        for (word, value) in self.words[range].iter().zip(values) {
            word.store(value, Ordering::Relaxed);
        }
        Ok(())
    }
}

impl<const N: usize> Default for RegisterMap<N> {
    fn default() -> Self {
        Self::new()
    }
}
