// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Transaction state of a [`Slave`](super::Slave).
#[cfg_attr(all(feature = "defmt", target_os = "none"), derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlaveState {
    /// Waiting for the first bytes of a frame.
    #[default]
    Idle,
    /// Collecting a frame addressed to this slave.
    Receiving,
    /// A complete frame waits for [`Slave::process`](super::Slave::process).
    Processing,
    /// Swallowing a frame that is not for us until the line falls silent.
    Ignoring,
    /// A response is queued, the turnaround delay is running.
    StartingTransmission,
    /// The response is being shifted out.
    Transmitting,
}

/// What an expired timeout means in a given state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Expiry {
    /// Truncated or garbled frame: drop it.
    Reset,
    /// Turnaround is over: drive the line.
    StartTransmission,
    /// No countdown is expected in this state.
    Ignore,
}

impl SlaveState {
    /// `true` while incoming bytes belong to a request.
    #[must_use]
    pub const fn accepts_bytes(self) -> bool {
        matches!(self, Self::Idle | Self::Receiving | Self::Ignoring)
    }

    /// `true` if no transaction is in flight.
    #[must_use]
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    pub(crate) const fn expiry(self) -> Expiry {
        match self {
            Self::Idle | Self::Receiving | Self::Ignoring => Expiry::Reset,
            Self::StartingTransmission => Expiry::StartTransmission,
            Self::Processing | Self::Transmitting => Expiry::Ignore,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn receive_side_states_reset_on_expiry() {
        for state in [SlaveState::Idle, SlaveState::Receiving, SlaveState::Ignoring] {
            assert!(state.accepts_bytes());
            assert_eq!(state.expiry(), Expiry::Reset);
        }
    }

    #[test]
    fn transmit_side_states() {
        assert_eq!(
            SlaveState::StartingTransmission.expiry(),
            Expiry::StartTransmission
        );
        assert_eq!(SlaveState::Transmitting.expiry(), Expiry::Ignore);
        assert_eq!(SlaveState::Processing.expiry(), Expiry::Ignore);
        assert!(!SlaveState::Transmitting.accepts_bytes());
        assert!(!SlaveState::Processing.is_idle());
    }
}
