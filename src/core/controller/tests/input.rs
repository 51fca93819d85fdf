// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

use super::*;

#[test]
fn test_wire_buttons_active_low() {
    let pad = PadState::connected(Buttons::empty());
    assert_eq!(pad.wire_buttons(), 0xFFFF);

    let pad = PadState::connected(Buttons::CROSS | Buttons::START);
    let wire = pad.wire_buttons();
    assert_eq!(wire & Buttons::CROSS.bits(), 0);
    assert_eq!(wire & Buttons::START.bits(), 0);
    assert_ne!(wire & Buttons::CIRCLE.bits(), 0);
}

#[test]
fn test_button_bit_positions() {
    assert_eq!(Buttons::SELECT.bits(), 0x0001);
    assert_eq!(Buttons::START.bits(), 0x0008);
    assert_eq!(Buttons::UP.bits(), 0x0010);
    assert_eq!(Buttons::LEFT.bits(), 0x0080);
    assert_eq!(Buttons::L2.bits(), 0x0100);
    assert_eq!(Buttons::R1.bits(), 0x0800);
    assert_eq!(Buttons::TRIANGLE.bits(), 0x1000);
    assert_eq!(Buttons::SQUARE.bits(), 0x8000);
    assert_eq!(Buttons::all().bits(), 0xFFFF);
}

#[test]
fn test_set_input_replaces_previous_frame() {
    let mut ports = ControllerPorts::new();
    ports.set_input(&InputSnapshot::single(Buttons::UP));
    ports.set_input(&InputSnapshot::single(Buttons::DOWN));

    ports.write_ctrl(CTRL_SELECT_PORT1);
    exchange(&mut ports, 0x01);
    exchange(&mut ports, 0x42);
    exchange(&mut ports, 0x00);
    let (low, _) = exchange(&mut ports, 0x00);

    assert_eq!(low & Buttons::UP.bits() as u8, Buttons::UP.bits() as u8);
    assert_eq!(low & Buttons::DOWN.bits() as u8, 0);
}

#[test]
fn test_second_port() {
    let mut input = InputSnapshot::default();
    input.ports[1] = PadState::connected(Buttons::TRIANGLE);

    let mut ports = ControllerPorts::new();
    ports.set_input(&input);
    ports.write_ctrl(CTRL_SELECT_PORT1 | 0x2000);

    exchange(&mut ports, 0x01);
    exchange(&mut ports, 0x42);
    exchange(&mut ports, 0x00);
    exchange(&mut ports, 0x00);
    ports.write_tx_data(0x00);
    let high = ports.read_rx_data();
    assert_eq!(high, !(Buttons::TRIANGLE.bits() >> 8) as u8);
}
