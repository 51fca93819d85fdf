// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! GP1 control command tests

use super::super::*;
use super::gp0;

#[test]
fn test_reset_keeps_vram() {
    let mut gpu = GPU::new();
    gpu.write_vram(10, 10, 0x7FFF);
    gpu.write_gp1(0x0300_0000);
    gpu.write_gp0(0xE100_000F);

    gpu.write_gp1(0x0000_0000);

    assert_eq!(gpu.read_vram(10, 10), 0x7FFF);
    assert!(!gpu.is_display_enabled());
    assert_eq!(gpu.draw_mode(), DrawMode::default());
}

#[test]
fn test_reset_restores_configured_standard() {
    let mut gpu = GPU::new();
    gpu.set_video_standard(true);
    gpu.write_gp1(0x0800_0000); // NTSC
    assert!(!gpu.display_mode().pal);

    gpu.write_gp1(0x0000_0000);
    assert!(gpu.display_mode().pal);
}

#[test]
fn test_reset_command_buffer_cancels_transfer() {
    let mut gpu = GPU::new();
    gp0(&mut gpu, &[0xA000_0000, 0, (2 << 16) | 2, 0x1111_1111]);

    gpu.write_gp1(0x0100_0000);

    // Interpreted as a command again
    gpu.write_gp0(0xE500_0003);
    assert_eq!(gpu.draw_offset(), (3, 0));
    assert_eq!(gpu.read_vram(0, 1), 0);
}

#[test]
fn test_acknowledge_interrupt() {
    let mut gpu = GPU::new();
    gpu.write_gp0(0x1F00_0000);
    gpu.write_gp1(0x0200_0000);
    assert_eq!(gpu.status() & (1 << 24), 0);
}

#[test]
fn test_display_enable() {
    let mut gpu = GPU::new();
    gpu.write_gp1(0x0300_0000);
    assert!(gpu.is_display_enabled());
    assert_eq!(gpu.status() & (1 << 23), 0);
    gpu.write_gp1(0x0300_0001);
    assert!(!gpu.is_display_enabled());
}

#[test]
fn test_dma_direction_and_request_bit() {
    let mut gpu = GPU::new();

    gpu.write_gp1(0x0400_0002);
    let status = gpu.status();
    assert_eq!((status >> 29) & 3, 2);
    assert_ne!(status & (1 << 25), 0);

    // GPUREAD direction requests only while a read transfer is pending
    gpu.write_gp1(0x0400_0003);
    assert_eq!(gpu.status() & (1 << 25), 0);
    gp0(&mut gpu, &[0xC000_0000, 0, (1 << 16) | 2]);
    assert_ne!(gpu.status() & (1 << 25), 0);
}

#[test]
fn test_display_area_start() {
    let mut gpu = GPU::new();
    gpu.write_gp1(0x0500_0000 | (100 << 10) | 201);
    let area = gpu.display_area();
    assert_eq!((area.x, area.y), (200, 100));
}

#[test]
fn test_display_mode() {
    let mut gpu = GPU::new();
    gpu.write_gp1(0x0800_0000 | 0x3F);

    let mode = gpu.display_mode();
    assert_eq!(mode.horizontal_res, HorizontalRes::R640);
    assert!(mode.vertical_480 && mode.pal && mode.color_24bit && mode.interlaced);
    assert_eq!(gpu.display_area().height, 480);

    let status = gpu.status();
    assert_eq!((status >> 17) & 3, 3);
    assert_ne!(status & (1 << 19), 0);
    assert_ne!(status & (1 << 20), 0);
    assert_ne!(status & (1 << 21), 0);
    assert_ne!(status & (1 << 22), 0);
}

#[test]
fn test_display_mode_368() {
    let mut gpu = GPU::new();
    gpu.write_gp1(0x0800_0040);
    assert_eq!(gpu.display_area().width, 368);
    assert_ne!(gpu.status() & (1 << 16), 0);
}

#[test]
fn test_gpu_info() {
    let mut gpu = GPU::new();
    gp0(
        &mut gpu,
        &[
            0xE300_0000 | (20 << 10) | 10,
            0xE400_0000 | (200 << 10) | 300,
            0xE500_0000 | (0x7FF << 11) | 4,
            0xE200_0000 | 0x1F,
        ],
    );

    gpu.write_gp1(0x1000_0007);
    assert_eq!(gpu.read_gpuread(), 2);
    gpu.write_gp1(0x1000_0003);
    assert_eq!(gpu.read_gpuread(), (20 << 10) | 10);
    gpu.write_gp1(0x1000_0004);
    assert_eq!(gpu.read_gpuread(), (200 << 10) | 300);
    gpu.write_gp1(0x1000_0005);
    assert_eq!(gpu.read_gpuread(), (0x7FF << 11) | 4);
    gpu.write_gp1(0x1000_0002);
    assert_eq!(gpu.read_gpuread(), 0x1F);

    // Unused index keeps the previous reply
    gpu.write_gp1(0x1000_0000);
    assert_eq!(gpu.read_gpuread(), 0x1F);
}
