// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Countdown on top of the periodic timer tick.
///
/// There is only one: it measures frame silence while receiving and the
/// turnaround delay before transmitting. Which of the two it is follows
/// from the slave state at the moment it expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Timeout {
    elapsed: u16,
    interval: u16,
    armed: bool,
}

impl Timeout {
    pub(crate) const fn new() -> Self {
        Self {
            elapsed: 0,
            interval: 0,
            armed: false,
        }
    }

    pub(crate) fn arm(&mut self, interval: u16) {
        self.elapsed = 0;
        self.interval = interval;
        self.armed = true;
    }

    /// Start counting from zero again, keeping the interval.
    pub(crate) fn restart(&mut self) {
        self.elapsed = 0;
    }

    pub(crate) fn disarm(&mut self) {
        self.armed = false;
    }

    pub(crate) const fn is_armed(&self) -> bool {
        self.armed
    }

    /// Count one tick, returns `true` exactly once when the interval is reached.
    pub(crate) fn tick(&mut self) -> bool {
        if !self.armed {
            return false;
        }
        self.elapsed = self.elapsed.saturating_add(1);
        if self.elapsed < self.interval {
            return false;
        }
        self.armed = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disarmed_timeout_never_expires() {
        let mut timeout = Timeout::new();
        for _ in 0..10 {
            assert!(!timeout.tick());
        }
    }

    #[test]
    fn expires_once() {
        let mut timeout = Timeout::new();
        timeout.arm(3);
        assert!(!timeout.tick());
        assert!(!timeout.tick());
        assert!(timeout.tick());
        assert!(!timeout.is_armed());
        assert!(!timeout.tick());
    }

    #[test]
    fn restart_extends_the_deadline() {
        let mut timeout = Timeout::new();
        timeout.arm(2);
        assert!(!timeout.tick());
        timeout.restart();
        assert!(!timeout.tick());
        assert!(timeout.tick());
    }

    #[test]
    fn zero_interval_expires_on_next_tick() {
        let mut timeout = Timeout::new();
        timeout.arm(0);
        assert!(timeout.tick());
    }

    #[test]
    fn disarm_cancels() {
        let mut timeout = Timeout::new();
        timeout.arm(1);
        timeout.disarm();
        assert!(!timeout.tick());
    }
}
