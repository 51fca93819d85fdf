// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Initialization, reset and status register tests

use super::super::*;
use super::gp0;

#[test]
fn test_gpu_initialization() {
    let gpu = GPU::new();
    assert_eq!(gpu.vram.len(), GPU::VRAM_SIZE);
    assert!(gpu.vram.iter().all(|&pixel| pixel == 0x0000));
}

#[test]
fn test_default_state() {
    let gpu = GPU::new();

    assert_eq!(gpu.draw_area(), DrawingArea::default());
    assert_eq!(gpu.draw_offset(), (0, 0));
    assert!(!gpu.is_display_enabled());
    assert_eq!(gpu.display_mode().horizontal_res, HorizontalRes::R256);
    assert!(!gpu.display_mode().pal);

    let area = gpu.display_area();
    assert_eq!((area.width, area.height), (256, 240));
}

#[test]
fn test_status_after_reset() {
    let gpu = GPU::new();
    let status = gpu.status();

    assert_eq!(status & 0x7FF, 0); // draw mode
    assert_ne!(status & (1 << 13), 0); // field bit reads 1 when not interlaced
    assert_ne!(status & (1 << 23), 0); // display disabled
    assert_eq!(status & (1 << 24), 0); // no IRQ
    assert_eq!(status & (1 << 25), 0); // DMA off, no request
    assert_ne!(status & (1 << 26), 0);
    assert_eq!(status & (1 << 27), 0);
    assert_ne!(status & (1 << 28), 0);
    assert_eq!(status & (3 << 29), 0);
}

#[test]
fn test_status_reflects_draw_mode() {
    let mut gpu = GPU::new();
    gpu.write_gp0(0xE100_03FF);
    let status = gpu.status();
    assert_eq!(status & 0x7FF, 0x3FF);

    gpu.write_gp0(0xE600_0003);
    let status = gpu.status();
    assert_ne!(status & (1 << 11), 0);
    assert_ne!(status & (1 << 12), 0);
}

#[test]
fn test_status_reports_reserved_texture_depth() {
    let mut gpu = GPU::new();
    gpu.write_gp0(0xE100_0180);
    assert_eq!((gpu.status() >> 7) & 3, 3);
    assert_eq!(gpu.draw_mode().texture_depth, TextureDepth::T15Bit);

    gpu.write_gp0(0xE100_0080);
    assert_eq!((gpu.status() >> 7) & 3, 1);
}

#[test]
fn test_reset_clears_vram_and_keeps_standard() {
    let mut gpu = GPU::new();
    gpu.set_video_standard(true);
    gpu.write_vram(500, 250, 0xFFFF);
    gp0(&mut gpu, &[0xE300_0000 | (100 << 10) | 50]);

    gpu.reset();

    assert_eq!(gpu.read_vram(500, 250), 0);
    assert_eq!(gpu.draw_area(), DrawingArea::default());
    assert!(gpu.display_mode().pal);
}

#[test]
fn test_reset_twice_matches_once() {
    let mut once = GPU::new();
    once.write_vram(1, 1, 0x1234);
    once.tick(10_000);
    once.reset();

    let mut twice = once.clone();
    twice.reset();

    assert_eq!(once.vram, twice.vram);
    assert_eq!(once.status(), twice.status());
    assert_eq!(once.scanline(), twice.scanline());
}

#[test]
fn test_layout_validation() {
    let mut gpu = GPU::new();
    assert!(gpu.validate_layout().is_ok());

    gpu.frame.pixels.push(0);
    assert!(gpu.validate_layout().is_err());

    let mut gpu = GPU::new();
    gpu.vram.truncate(4);
    assert!(gpu.validate_layout().is_err());
}
