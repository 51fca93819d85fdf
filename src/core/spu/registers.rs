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
//! SPU control register definitions

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// SPUCNT (0x1F801DAA)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    pub struct SpuControl: u16 {
        const CD_AUDIO_ENABLE = 1 << 0;
        const EXTERNAL_AUDIO_ENABLE = 1 << 1;
        const CD_AUDIO_REVERB = 1 << 2;
        const EXTERNAL_AUDIO_REVERB = 1 << 3;
        const TRANSFER_MODE = 0b11 << 4;
        const IRQ_ENABLE = 1 << 6;
        const REVERB_ENABLE = 1 << 7;
        const NOISE_STEP = 0b11 << 8;
        const NOISE_SHIFT = 0b1111 << 10;
        const UNMUTE = 1 << 14;
        const ENABLE = 1 << 15;
    }
}

/// SPU RAM transfer mode (SPUCNT bits 4-5)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferMode {
    Stop,
    ManualWrite,
    DmaWrite,
    DmaRead,
}

impl SpuControl {
    pub fn transfer_mode(self) -> TransferMode {
        match (self.bits() >> 4) & 3 {
            0 => TransferMode::Stop,
            1 => TransferMode::ManualWrite,
            2 => TransferMode::DmaWrite,
            _ => TransferMode::DmaRead,
        }
    }

    /// SPUSTAT as derived from the control register
    ///
    /// Bits 0-5 mirror SPUCNT; bit 7 reflects a pending DMA transfer
    /// request and bits 8/9 say which direction.
    pub fn status(self) -> u16 {
        let mut status = self.bits() & 0x3F;
        match self.transfer_mode() {
            TransferMode::DmaWrite => status |= (1 << 7) | (1 << 8),
            TransferMode::DmaRead => status |= (1 << 7) | (1 << 9),
            TransferMode::Stop | TransferMode::ManualWrite => {}
        }
        status
    }
}
