// SPDX-FileCopyrightText: Copyright (c) 2018-2025 slowtec GmbH <post@slowtec.de>
// SPDX-License-Identifier: MIT OR Apache-2.0

#![allow(dead_code)]

use modbus_rtu_slave::{
    LineControl, Request, RequestPdu, Slave, SlaveId, SlaveState, TxEvent,
    rtu::{FRAME_CAPACITY, Header, RequestAdu, client, crc16},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    EnableReceive,
    EnableTransmit,
    ArmTimer(u16),
    DisarmTimer,
    ResetTimerCount,
    Write(u8),
    NotifyOn(Option<TxEvent>),
}

/// Records every hardware access of the slave.
#[derive(Debug, Default)]
pub struct MockLine {
    pub events: Vec<Event>,
}

impl MockLine {
    pub const fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn written(&self) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|event| match event {
                Event::Write(byte) => Some(*byte),
                _ => None,
            })
            .collect()
    }

    pub fn position(&self, event: Event) -> Option<usize> {
        self.events.iter().position(|e| *e == event)
    }

    pub fn last_notification(&self) -> Option<Option<TxEvent>> {
        self.events.iter().rev().find_map(|event| match event {
            Event::NotifyOn(n) => Some(*n),
            _ => None,
        })
    }
}

impl LineControl for MockLine {
    fn enable_receive(&mut self) {
        self.events.push(Event::EnableReceive);
    }

    fn enable_transmit(&mut self) {
        self.events.push(Event::EnableTransmit);
    }

    fn arm_timer(&mut self, duration_ms: u16) {
        self.events.push(Event::ArmTimer(duration_ms));
    }

    fn disarm_timer(&mut self) {
        self.events.push(Event::DisarmTimer);
    }

    fn reset_timer_count(&mut self) {
        self.events.push(Event::ResetTimerCount);
    }

    fn write_byte(&mut self, byte: u8) {
        self.events.push(Event::Write(byte));
    }

    fn notify_on(&mut self, event: Option<TxEvent>) {
        self.events.push(Event::NotifyOn(event));
    }
}

/// A request frame as a master puts it on the wire.
pub fn request(slave: SlaveId, request: Request<'_>) -> Vec<u8> {
    let adu = RequestAdu {
        hdr: Header { slave },
        pdu: RequestPdu(request),
    };
    let mut buf = [0; FRAME_CAPACITY];
    let len = client::encode_request(adu, &mut buf).unwrap();
    buf[..len].to_vec()
}

/// `bytes` followed by their CRC, low byte first.
pub fn frame(bytes: &[u8]) -> Vec<u8> {
    let mut frame = bytes.to_vec();
    frame.extend_from_slice(&crc16(bytes).to_le_bytes());
    frame
}

pub fn feed<const N: usize>(slave: &mut Slave<'_, MockLine, N>, bytes: &[u8]) {
    for byte in bytes {
        slave.on_byte_received(*byte);
    }
}

pub fn tick<const N: usize>(slave: &mut Slave<'_, MockLine, N>, count: u16) {
    for _ in 0..count {
        slave.on_timer_tick();
    }
}

/// Wait for the turnaround and deliver the transmit interrupts
/// until the line is released again. Returns the bytes put on the wire.
pub fn transmit<const N: usize>(slave: &mut Slave<'_, MockLine, N>) -> Vec<u8> {
    slave.line_mut().events.clear();
    let turnaround = slave.config().turnaround_ms;
    tick(slave, turnaround);
    assert_eq!(slave.state(), SlaveState::Transmitting);
    loop {
        match slave.line().last_notification() {
            Some(Some(TxEvent::ByteConsumed)) => slave.on_transmit_ready(),
            Some(Some(TxEvent::Complete)) => {
                slave.on_transmit_complete();
                break;
            }
            other => panic!("unexpected notification {other:?}"),
        }
    }
    assert_eq!(slave.state(), SlaveState::Idle);
    slave.line().written()
}

/// Send a complete frame and return the answer, if any.
///
/// Every answer must be a well formed response frame for a master.
pub fn exchange<const N: usize>(
    slave: &mut Slave<'_, MockLine, N>,
    frame: &[u8],
) -> Option<Vec<u8>> {
    feed(slave, frame);
    let Ok(Some(_)) = slave.process() else {
        return None;
    };
    let response = transmit(slave);
    let adu = client::decode_response(&response)
        .unwrap()
        .expect("complete response frame");
    assert_eq!(adu.hdr.slave, slave.address());
    Some(response)
}

/// Send `request` with a CRC appended and return the answer, if any.
pub fn transact<const N: usize>(
    slave: &mut Slave<'_, MockLine, N>,
    request: &[u8],
) -> Option<Vec<u8>> {
    exchange(slave, &frame(request))
}
