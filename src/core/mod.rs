// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Core emulation components
//!
//! This module contains all hardware emulation components:
//! - CPU (MIPS R3000A) with the GTE geometry coprocessor
//! - Memory bus
//! - GPU rasterizer and video timing
//! - DMA controller and interrupt controller
//! - Timers (3 root counters)
//! - CD-ROM controller, SPU register file, controller ports
//! - Scheduler and save states

pub mod cdrom;
pub mod config;
pub mod controller;
pub mod cpu;
pub mod dma;
pub mod error;
pub mod gpu;
pub mod gte;
pub mod interrupt;
pub mod memory;
pub mod save_state;
pub mod spu;
pub mod sync;
pub mod system;
pub mod timer;

// Re-export commonly used types
pub use cdrom::DiscReader;
pub use config::{EmulatorConfig, Region};
pub use controller::{Buttons, InputSnapshot, PadState};
pub use cpu::CPU;
pub use error::{EmulatorError, Result};
pub use gpu::{Framebuffer, GPU};
pub use memory::Bus;
pub use system::{AudioBlock, FrameOutput, State, System};
