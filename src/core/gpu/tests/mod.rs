// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! GPU module tests
//!
//! - `basic`: initialization, reset, GPUSTAT
//! - `vram`: VRAM access and transfers
//! - `gp0_commands`: GP0 command buffering and environment commands
//! - `gp1_commands`: GP1 control commands
//! - `rendering`: primitives drawn through GP0
//! - `timing`: scanlines, blanking and the frame snapshot

mod basic;
mod gp0_commands;
mod gp1_commands;

use super::GPU;

/// Feed a command stream to GP0
fn gp0(gpu: &mut GPU, words: &[u32]) {
    for &word in words {
        gpu.write_gp0(word);
    }
}
