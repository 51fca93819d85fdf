// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Controller module tests
//!
//! - `basic`: input types and port initialization
//! - `input`: button latching and wire encoding
//! - `serial`: pad protocol through the JOY registers

mod input;
mod serial;

use super::*;

/// Select port 1 with the /ACK interrupt enabled (what the BIOS writes)
pub(super) const CTRL_SELECT_PORT1: u16 = 0x1003;

/// Send one byte and let its /ACK arrive
pub(super) fn exchange(ports: &mut ControllerPorts, tx: u8) -> (u8, bool) {
    ports.write_tx_data(tx);
    let rx = ports.read_rx_data();
    let irq = ports.tick(ControllerPorts::BYTE_CYCLES);
    (rx, irq)
}
