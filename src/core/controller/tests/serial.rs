// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

use super::*;

#[test]
fn test_full_pad_transaction() {
    let mut ports = ControllerPorts::new();
    ports.set_input(&InputSnapshot::single(Buttons::CROSS | Buttons::START));
    ports.write_ctrl(CTRL_SELECT_PORT1);

    assert_eq!(exchange(&mut ports, 0x01), (0xFF, true));
    ports.write_ctrl(CTRL_SELECT_PORT1 | 0x0010);
    assert_eq!(exchange(&mut ports, 0x42), (0x41, true));
    ports.write_ctrl(CTRL_SELECT_PORT1 | 0x0010);
    assert_eq!(exchange(&mut ports, 0x00), (0x5A, true));
    ports.write_ctrl(CTRL_SELECT_PORT1 | 0x0010);

    let wire = !(Buttons::CROSS | Buttons::START).bits();
    assert_eq!(exchange(&mut ports, 0x00), (wire as u8, true));
    ports.write_ctrl(CTRL_SELECT_PORT1 | 0x0010);

    // Last byte is not acknowledged
    assert_eq!(exchange(&mut ports, 0x00), ((wire >> 8) as u8, false));
    assert_eq!(ports.read_stat() & 0x200, 0);
}

#[test]
fn test_ack_arrives_after_byte_time() {
    let mut ports = ControllerPorts::new();
    ports.write_ctrl(CTRL_SELECT_PORT1);
    ports.write_tx_data(0x01);

    assert!(!ports.tick(ControllerPorts::BYTE_CYCLES - 1));
    assert_eq!(ports.read_stat() & 0x280, 0);
    assert!(ports.tick(1));
    assert_eq!(ports.read_stat() & 0x280, 0x280);

    // Level drops with the next byte, the request stays until acknowledged
    ports.write_tx_data(0x42);
    assert_eq!(ports.read_stat() & 0x280, 0x200);
    ports.write_ctrl(CTRL_SELECT_PORT1 | 0x0010);
    assert_eq!(ports.read_stat() & 0x200, 0);
}

#[test]
fn test_no_irq_without_ack_interrupt_enable() {
    let mut ports = ControllerPorts::new();
    ports.write_ctrl(0x0003);
    ports.write_tx_data(0x01);
    assert!(!ports.tick(ControllerPorts::BYTE_CYCLES));
    assert_eq!(ports.read_stat() & 0x280, 0x080);
}

#[test]
fn test_rx_full_flag() {
    let mut ports = ControllerPorts::new();
    ports.write_tx_data(0x01);
    assert_eq!(ports.read_stat() & 0x02, 0x02);
    ports.read_rx_data();
    assert_eq!(ports.read_stat() & 0x02, 0);
}

#[test]
fn test_transfer_when_not_selected() {
    let mut ports = ControllerPorts::new();
    assert_eq!(exchange(&mut ports, 0x01), (0xFF, false));
}

#[test]
fn test_empty_port_does_not_respond() {
    let mut ports = ControllerPorts::new();
    ports.set_input(&InputSnapshot {
        ports: [PadState::default(), PadState::default()],
    });
    ports.write_ctrl(CTRL_SELECT_PORT1);
    assert_eq!(exchange(&mut ports, 0x01), (0xFF, false));
}

#[test]
fn test_memory_card_address_ignored() {
    let mut ports = ControllerPorts::new();
    ports.write_ctrl(CTRL_SELECT_PORT1);
    assert_eq!(exchange(&mut ports, 0x81), (0xFF, false));
    // Transaction is over until the port is reselected
    assert_eq!(exchange(&mut ports, 0x01), (0xFF, false));

    ports.write_ctrl(0);
    ports.write_ctrl(CTRL_SELECT_PORT1);
    assert_eq!(exchange(&mut ports, 0x01), (0xFF, true));
}

#[test]
fn test_unknown_command_ends_transaction() {
    let mut ports = ControllerPorts::new();
    ports.write_ctrl(CTRL_SELECT_PORT1);
    exchange(&mut ports, 0x01);
    assert_eq!(exchange(&mut ports, 0x43), (0xFF, false));
}
