// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

use super::*;
use crate::core::controller::{Buttons, ControllerPorts};
use crate::core::interrupt::interrupts;

#[test]
fn test_run_frame_ends_at_vblank() {
    let mut system = running_system();
    let frame = system.run_frame(&InputSnapshot::default()).unwrap();

    assert_eq!(system.frame_count(), 1);
    assert!(system.bus().unwrap().gpu().is_in_vblank());
    let status = system.bus().unwrap().irq().read_status();
    assert_ne!(status & u32::from(interrupts::VBLANK), 0);

    assert_eq!(frame.framebuffer.width, 256);
    assert_eq!(
        frame.framebuffer.pixels.len(),
        (frame.framebuffer.width * frame.framebuffer.height) as usize
    );
    assert!(frame.audio.samples.is_empty());
    assert_eq!(frame.audio.sample_rate, 44_100);
}

#[test]
fn test_steady_frame_length() {
    let mut system = running_system();
    system.run_frame(&InputSnapshot::default()).unwrap();

    let start = system.cycles();
    system.run_frame(&InputSnapshot::default()).unwrap();
    let length = system.cycles() - start;

    let expected = system
        .bus()
        .unwrap()
        .gpu()
        .video_standard()
        .cpu_cycles_per_frame();
    // One instruction of overshoot at most on either end
    assert!(length.abs_diff(expected) <= 8, "frame took {} cycles", length);
}

#[test]
fn test_pal_frames_are_longer() {
    let mut ntsc = running_system();
    let mut pal = System::new();
    pal.init(&spin_bios(), Region::Pal).unwrap();

    for _ in 0..2 {
        ntsc.run_frame(&InputSnapshot::default()).unwrap();
        pal.run_frame(&InputSnapshot::default()).unwrap();
    }
    assert!(pal.cycles() > ntsc.cycles());
}

#[test]
fn test_frame_budget_bounds_frame() {
    let mut system = running_system();
    let budget = {
        let frame = system
            .bus()
            .unwrap()
            .gpu()
            .video_standard()
            .cpu_cycles_per_frame();
        frame * 110 / 100
    };
    for _ in 0..5 {
        let start = system.cycles();
        system.run_frame(&InputSnapshot::default()).unwrap();
        assert!(system.cycles() - start <= budget + 8);
    }
}

#[test]
fn test_run_frame_latches_input() {
    let mut system = running_system();
    system
        .run_frame(&InputSnapshot::single(Buttons::CIRCLE))
        .unwrap();

    let ports = system.bus_mut().unwrap().controller_ports_mut();
    ports.write_ctrl(0x1003);
    let mut bytes = Vec::new();
    for tx in [0x01, 0x42, 0x00, 0x00, 0x00] {
        ports.write_tx_data(tx);
        bytes.push(ports.read_rx_data());
        ports.tick(ControllerPorts::BYTE_CYCLES);
    }
    assert_eq!(&bytes[..3], &[0xFF, 0x41, 0x5A]);
    let wire = u16::from_le_bytes([bytes[3], bytes[4]]);
    assert_eq!(wire, !Buttons::CIRCLE.bits());
}

#[test]
fn test_pad_present_before_first_frame() {
    let mut system = running_system();
    let ports = system.bus_mut().unwrap().controller_ports_mut();
    ports.write_ctrl(0x1003);
    let mut bytes = Vec::new();
    for tx in [0x01, 0x42, 0x00] {
        ports.write_tx_data(tx);
        bytes.push(ports.read_rx_data());
        ports.tick(ControllerPorts::BYTE_CYCLES);
    }
    assert_eq!(bytes, [0xFF, 0x41, 0x5A]);
}
