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
//! Per-channel DMA registers and transfer progress

use serde::{Deserialize, Serialize};

/// Peripheral attached to a channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Port {
    MdecIn,
    MdecOut,
    Gpu,
    CdRom,
    Spu,
    Pio,
    /// Ordering table clear: generates a reverse linked list in RAM
    Otc,
}

impl Port {
    pub const ALL: [Port; 7] = [
        Port::MdecIn,
        Port::MdecOut,
        Port::Gpu,
        Port::CdRom,
        Port::Spu,
        Port::Pio,
        Port::Otc,
    ];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// CHCR bits 9-10
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncMode {
    /// Whole transfer at once, started by the trigger bit
    Manual,
    /// Block by block, each block waiting for the device request
    Request,
    /// Follow a linked list of packets in RAM
    LinkedList,
}

/// Transfer direction (CHCR bit 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    ToRam,
    FromRam,
}

/// State of a running transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub(super) struct Progress {
    /// Next RAM address
    pub address: u32,
    /// Words left in the current block or list packet
    pub words: u32,
    /// Blocks left after the current one (request mode)
    pub blocks: u32,
    /// Next packet header (linked-list mode)
    pub next: u32,
    /// Packet headers read so far (linked-list mode)
    pub hops: u32,
    /// The packet in progress is the last one (linked-list mode)
    pub last: bool,
}

/// One DMA channel (MADR, BCR, CHCR)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    port: Port,
    madr: u32,
    bcr: u32,
    chcr: u32,
    pub(super) progress: Option<Progress>,
}

impl Channel {
    const START: u32 = 1 << 24;
    const TRIGGER: u32 = 1 << 28;

    pub(super) fn new(port: Port) -> Self {
        Self {
            port,
            madr: 0,
            bcr: 0,
            chcr: if port == Port::Otc { 0x0000_0002 } else { 0 },
            progress: None,
        }
    }

    pub fn port(&self) -> Port {
        self.port
    }

    pub fn madr(&self) -> u32 {
        self.madr
    }

    pub fn bcr(&self) -> u32 {
        self.bcr
    }

    pub fn chcr(&self) -> u32 {
        self.chcr
    }

    pub(super) fn set_madr(&mut self, value: u32) {
        self.madr = value & 0x00FF_FFFF;
    }

    pub(super) fn set_bcr(&mut self, value: u32) {
        self.bcr = value;
    }

    /// Write CHCR, starting a transfer if the start conditions hold
    pub(super) fn set_chcr(&mut self, value: u32) {
        self.chcr = if self.port == Port::Otc {
            // Only start/trigger are writable; the step is always backward
            (value & (Self::START | Self::TRIGGER | (1 << 30))) | 0x0000_0002
        } else {
            value & 0x7177_0703
        };

        if self.progress.is_none() {
            self.try_start();
        } else if self.chcr & Self::START == 0 {
            log::debug!("DMA{} stopped by CHCR write", self.port.index());
            self.progress = None;
        }
    }

    /// CHCR bit 24
    pub fn is_busy(&self) -> bool {
        self.chcr & Self::START != 0
    }

    pub fn direction(&self) -> Direction {
        if self.chcr & 1 != 0 {
            Direction::FromRam
        } else {
            Direction::ToRam
        }
    }

    /// Address step per word: backward when CHCR bit 1 is set
    pub fn step(&self) -> u32 {
        if self.chcr & 2 != 0 {
            (-4i32) as u32
        } else {
            4
        }
    }

    pub fn sync_mode(&self) -> Option<SyncMode> {
        match (self.chcr >> 9) & 3 {
            0 => Some(SyncMode::Manual),
            1 => Some(SyncMode::Request),
            2 => Some(SyncMode::LinkedList),
            _ => None,
        }
    }

    /// BCR block size in words (0 means 0x10000)
    pub fn block_size(&self) -> u32 {
        match self.bcr & 0xFFFF {
            0 => 0x1_0000,
            n => n,
        }
    }

    /// BCR block count (0 means 0x10000)
    fn block_count(&self) -> u32 {
        match self.bcr >> 16 {
            0 => 0x1_0000,
            n => n,
        }
    }

    fn try_start(&mut self) {
        if self.chcr & Self::START == 0 {
            return;
        }

        let Some(mode) = self.sync_mode() else {
            log::warn!("DMA{} reserved sync mode, ignored", self.port.index());
            self.chcr &= !Self::START;
            return;
        };

        if mode == SyncMode::Manual && self.chcr & Self::TRIGGER == 0 {
            return;
        }
        self.chcr &= !Self::TRIGGER;

        let address = self.madr & 0x001F_FFFC;
        self.progress = Some(match mode {
            SyncMode::Manual => Progress {
                address,
                words: self.block_size(),
                blocks: 0,
                next: 0,
                hops: 0,
                last: true,
            },
            SyncMode::Request => Progress {
                address,
                words: 0,
                blocks: self.block_count(),
                next: 0,
                hops: 0,
                last: false,
            },
            SyncMode::LinkedList => Progress {
                address,
                words: 0,
                blocks: 0,
                next: self.madr & 0x00FF_FFFF,
                hops: 0,
                last: false,
            },
        });

        log::debug!(
            "DMA{} started: madr=0x{:08X} bcr=0x{:08X} mode={:?} {:?}",
            self.port.index(),
            self.madr,
            self.bcr,
            mode,
            self.direction()
        );
    }

    /// Request-mode block finished: MADR and the block count follow along
    pub(super) fn block_done(&mut self, address: u32, blocks_left: u32) {
        self.madr = address & 0x00FF_FFFF;
        self.bcr = (self.bcr & 0xFFFF) | (blocks_left << 16);
    }

    /// Linked-list header read: MADR follows the list
    pub(super) fn packet_started(&mut self, next: u32) {
        self.madr = next & 0x00FF_FFFF;
    }

    /// Transfer over: clear the busy bit
    pub(super) fn finish(&mut self) {
        self.chcr &= !Self::START;
        self.progress = None;
    }
}
