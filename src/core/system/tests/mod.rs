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
//! System module tests
//!
//! - `lifecycle`: init/reset/teardown state machine
//! - `execution`: stepping and cycle redistribution
//! - `frame`: frame pacing and interrupts
//! - `save_state`: serialize/deserialize

mod frame;
mod save_state;

use super::*;
use crate::core::config::Region;

/// `j <address>` for a target inside the BIOS
pub(super) fn jump(address: u32) -> u32 {
    0x0800_0000 | ((address >> 2) & 0x03FF_FFFF)
}

/// BIOS image with `program` at the reset vector and a spin loop at the
/// exception vector
pub(super) fn bios_with(program: &[u32]) -> Vec<u8> {
    let mut image = vec![0u8; Bus::BIOS_SIZE];
    for (i, word) in program.iter().enumerate() {
        image[i * 4..i * 4 + 4].copy_from_slice(&word.to_le_bytes());
    }
    image[0x180..0x184].copy_from_slice(&jump(0xBFC0_0180).to_le_bytes());
    image
}

/// BIOS that loops at the reset vector
pub(super) fn spin_bios() -> Vec<u8> {
    bios_with(&[jump(0xBFC0_0000), 0])
}

pub(super) fn running_system() -> System {
    let mut system = System::new();
    system.init(&spin_bios(), Region::Ntsc).unwrap();
    system
}
