// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! GP0 command buffering and environment command tests

use super::super::*;
use super::gp0;

#[test]
fn test_partial_command_stalls_until_complete() {
    let mut gpu = GPU::new();

    // Flat triangle, only three of four words
    gp0(&mut gpu, &[0x2000_00FF, 0x0000_0000, 0x0000_0040]);
    assert_eq!(gpu.fifo.len(), 3);
    assert_eq!(gpu.read_vram(5, 2), 0);

    gpu.write_gp0(0x0040_0000);
    assert!(gpu.fifo.is_empty());
    assert_eq!(gpu.read_vram(5, 2), 0x001F);
}

#[test]
fn test_commands_execute_in_order() {
    let mut gpu = GPU::new();
    gp0(
        &mut gpu,
        &[
            0x0200_001F, 0, (16 << 16) | 16, // fill red-ish
            0x0200_7C00, 0, (8 << 16) | 16,  // then fill blue over part of it
        ],
    );
    assert_eq!(gpu.read_vram(0, 0), Color::from_u32(0x7C00).to_rgb15());
    assert_eq!(gpu.read_vram(0, 10), Color::from_u32(0x1F).to_rgb15());
}

#[test]
fn test_unknown_opcode_is_single_word() {
    let mut gpu = GPU::new();
    gp0(&mut gpu, &[0x0300_0000, 0xE500_0000 | 7]);
    assert!(gpu.fifo.is_empty());
    assert_eq!(gpu.draw_offset(), (7, 0));
}

#[test]
fn test_draw_mode_command() {
    let mut gpu = GPU::new();
    gpu.write_gp0(0xE100_0000 | (1 << 12) | (1 << 9) | (2 << 7) | (3 << 5) | 0x13);

    let mode = gpu.draw_mode();
    assert_eq!(mode.texture_page_x_base, 3);
    assert_eq!(mode.texture_page_y_base, 1);
    assert_eq!(mode.semi_transparency, BlendMode::AddQuarter);
    assert_eq!(mode.texture_depth, TextureDepth::T15Bit);
    assert!(mode.dithering);
    assert!(mode.texture_x_flip);
    assert!(!mode.texture_y_flip);
}

#[test]
fn test_texture_window_command() {
    let mut gpu = GPU::new();
    gpu.write_gp0(0xE200_0000 | (4 << 15) | (3 << 10) | (2 << 5) | 1);
    assert_eq!(
        gpu.texture_window(),
        TextureWindow {
            mask_x: 1,
            mask_y: 2,
            offset_x: 3,
            offset_y: 4,
        }
    );
}

#[test]
fn test_drawing_area_commands() {
    let mut gpu = GPU::new();
    gp0(
        &mut gpu,
        &[0xE300_0000 | (20 << 10) | 10, 0xE400_0000 | (239 << 10) | 319],
    );
    assert_eq!(
        gpu.draw_area(),
        DrawingArea {
            left: 10,
            top: 20,
            right: 319,
            bottom: 239,
        }
    );
}

#[test]
fn test_draw_offset_sign_extends() {
    let mut gpu = GPU::new();
    // x = -1, y = -2
    gpu.write_gp0(0xE500_0000 | (0x7FE << 11) | 0x7FF);
    assert_eq!(gpu.draw_offset(), (-1, -2));
}

#[test]
fn test_mask_settings_command() {
    let mut gpu = GPU::new();
    gpu.write_gp0(0xE600_0002);
    assert_eq!(
        gpu.mask_settings(),
        MaskSettings {
            set_mask: false,
            check_mask: true,
        }
    );
}

#[test]
fn test_interrupt_request_command() {
    let mut gpu = GPU::new();
    gpu.write_gp0(0x1F00_0000);

    assert_ne!(gpu.status() & (1 << 24), 0);
    assert!(gpu.take_irq());
    assert!(!gpu.take_irq());

    // Still set: no new edge
    gpu.write_gp0(0x1F00_0000);
    assert!(!gpu.take_irq());
}

#[test]
fn test_textured_polygon_updates_texture_page() {
    let mut gpu = GPU::new();
    gp0(
        &mut gpu,
        &[
            0x2400_0000,
            0x0000_0000,
            0x0000_0000,
            0x0010_0000,
            0x0085 << 16,
            0x0010_0000,
            0x0000_0000,
        ],
    );
    let mode = gpu.draw_mode();
    assert_eq!(mode.texture_page_x_base, 5);
    assert_eq!(mode.texture_page_y_base, 0);
    assert_eq!(mode.texture_depth, TextureDepth::T8Bit);
}
