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
//! DMA (Direct Memory Access) Controller
//!
//! Moves words between main RAM and peripheral FIFOs without CPU
//! instructions. The controller is advanced by the scheduler with a cycle
//! budget; it moves at most one word per cycle, serving channels in DPCR
//! priority order, and reports how many words it moved so the scheduler can
//! stall the CPU for the bus cycles it took.
//!
//! # DMA Channels
//!
//! | Channel | Device      | Base Address |
//! |---------|-------------|--------------|
//! | 0       | MDEC In     | 0x1F801080   |
//! | 1       | MDEC Out    | 0x1F801090   |
//! | 2       | GPU         | 0x1F8010A0   |
//! | 3       | CD-ROM      | 0x1F8010B0   |
//! | 4       | SPU         | 0x1F8010C0   |
//! | 5       | PIO         | 0x1F8010D0   |
//! | 6       | OTC         | 0x1F8010E0   |
//!
//! MDEC and PIO have no device behind them; transfers on those channels
//! complete without moving data.
//!
//! # Global Registers
//!
//! - **DPCR** (0x1F8010F0): per-channel priority and enable
//! - **DICR** (0x1F8010F4): interrupt enables and completion flags
//!
//! # Linked lists
//!
//! Sync mode 2 follows packet headers in RAM (`count << 24 | next`). The
//! walk is bounded by the number of words RAM can hold, so a list that
//! loops back on itself ends after a bounded number of packets instead of
//! spinning forever.
//!
//! # References
//!
//! - [PSX-SPX: DMA Controller](http://problemkaputt.de/psx-spx.htm#dmacontroller)

mod channel;

#[cfg(test)]
mod tests;

pub use channel::{Channel, Direction, Port, SyncMode};

use crate::core::cdrom::CDROM;
use crate::core::gpu::GPU;
use crate::core::memory::Ram;
use crate::core::spu::SPU;
use channel::Progress;
use serde::{Deserialize, Serialize};

/// A peripheral FIFO a DMA channel can feed or drain
pub trait DmaDevice {
    /// Whether the device is ready for the next block
    fn dma_request(&self) -> bool;

    /// Pop one word from the device
    fn dma_read(&mut self) -> u32;

    /// Push one word to the device
    fn dma_write(&mut self, value: u32);
}

/// Borrowed view of everything a transfer can touch
pub struct DmaPorts<'a> {
    pub ram: &'a mut Ram,
    pub gpu: &'a mut GPU,
    pub cdrom: &'a mut CDROM,
    pub spu: &'a mut SPU,
}

impl DmaPorts<'_> {
    /// Split into RAM and the device behind `port`
    fn split(&mut self, port: Port) -> (&mut Ram, Option<&mut dyn DmaDevice>) {
        let device: Option<&mut dyn DmaDevice> = match port {
            Port::Gpu => Some(&mut *self.gpu),
            Port::CdRom => Some(&mut *self.cdrom),
            Port::Spu => Some(&mut *self.spu),
            Port::MdecIn | Port::MdecOut | Port::Pio | Port::Otc => None,
        };
        (&mut *self.ram, device)
    }
}

/// Outcome of one [`DMA::tick`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DmaTick {
    /// Words moved over the bus (linked-list headers included)
    pub words: u32,
    /// DICR bit 31 went high since the last tick
    pub irq: bool,
}

/// DMA Controller with 7 channels
///
/// # Examples
///
/// ```
/// use psrx_core::core::dma::DMA;
///
/// let dma = DMA::new();
/// assert_eq!(dma.read(0x70), 0x0765_4321);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DMA {
    channels: [Channel; 7],

    /// DMA Control Register (DPCR)
    dpcr: u32,

    /// DMA Interrupt Register (DICR) without the computed bit 31
    dicr: u32,

    /// Last computed value of DICR bit 31
    irq_line: bool,

    /// Rising edge of `irq_line` not yet reported
    irq_edge: bool,
}

impl DMA {
    /// Register offset of DPCR (relative to 0x1F801080)
    pub const DPCR: u32 = 0x70;

    /// Register offset of DICR (relative to 0x1F801080)
    pub const DICR: u32 = 0x74;

    /// Upper bound on linked-list packets per transfer
    pub const MAX_LIST_PACKETS: u32 = (Ram::SIZE / 4) as u32;

    const DPCR_RESET: u32 = 0x0765_4321;

    pub fn new() -> Self {
        Self {
            channels: Port::ALL.map(Channel::new),
            dpcr: Self::DPCR_RESET,
            dicr: 0,
            irq_line: false,
            irq_edge: false,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn channel(&self, port: Port) -> &Channel {
        &self.channels[port.index()]
    }

    /// Read a register at `offset` from 0x1F801080
    pub fn read(&self, offset: u32) -> u32 {
        match offset {
            Self::DPCR => self.dpcr,
            Self::DICR => self.read_dicr(),
            0x00..=0x6F => {
                let channel = &self.channels[(offset >> 4) as usize];
                match offset & 0xF {
                    0x0 => channel.madr(),
                    0x4 => channel.bcr(),
                    0x8 => channel.chcr(),
                    _ => 0,
                }
            }
            _ => {
                log::trace!("DMA read of unused register +0x{:02X}", offset);
                0
            }
        }
    }

    /// Write a register at `offset` from 0x1F801080
    pub fn write(&mut self, offset: u32, value: u32) {
        match offset {
            Self::DPCR => self.dpcr = value,
            Self::DICR => self.write_dicr(value),
            0x00..=0x6F => {
                let channel = &mut self.channels[(offset >> 4) as usize];
                match offset & 0xF {
                    0x0 => channel.set_madr(value),
                    0x4 => channel.set_bcr(value),
                    0x8 => channel.set_chcr(value),
                    _ => {}
                }
            }
            _ => log::trace!("DMA write to unused register +0x{:02X}", offset),
        }
    }

    fn read_dicr(&self) -> u32 {
        self.dicr | if self.irq_line { 1 << 31 } else { 0 }
    }

    fn write_dicr(&mut self, value: u32) {
        // Flags (24-30) are acknowledged by writing 1
        let flags = self.dicr & 0x7F00_0000 & !(value & 0x7F00_0000);
        self.dicr = (value & 0x00FF_803F) | flags;
        self.update_irq();
    }

    fn update_irq(&mut self) {
        let force = self.dicr & (1 << 15) != 0;
        let master = self.dicr & (1 << 23) != 0;
        let enabled = (self.dicr >> 16) & 0x7F;
        let flags = (self.dicr >> 24) & 0x7F;
        let line = force || (master && enabled & flags != 0);

        if line && !self.irq_line {
            self.irq_edge = true;
        }
        self.irq_line = line;
    }

    /// DPCR enable bit for a channel
    fn is_enabled(&self, port: Port) -> bool {
        self.dpcr & (1 << (port.index() * 4 + 3)) != 0
    }

    /// Channels in service order: lower DPCR priority first, ties go to
    /// the higher channel number
    fn service_order(&self) -> [Port; 7] {
        let mut order = Port::ALL;
        order.sort_by_key(|port| {
            let priority = (self.dpcr >> (port.index() * 4)) & 7;
            (priority, std::cmp::Reverse(port.index()))
        });
        order
    }

    /// Whether any enabled channel has a transfer in flight
    pub fn is_active(&self) -> bool {
        Port::ALL
            .iter()
            .any(|&port| self.is_enabled(port) && self.channels[port.index()].progress.is_some())
    }

    /// Advance transfers by `cycles` bus cycles
    ///
    /// At most one word moves per cycle. A channel that cannot use its share
    /// (waiting on a device request, or finished) passes the rest on to the
    /// next channel in priority order.
    pub fn tick(&mut self, cycles: u32, ports: &mut DmaPorts) -> DmaTick {
        let mut budget = cycles;

        for port in self.service_order() {
            if budget == 0 {
                break;
            }
            if !self.is_enabled(port) {
                continue;
            }
            budget -= self.run_channel(port, budget, ports);
        }

        DmaTick {
            words: cycles - budget,
            irq: std::mem::take(&mut self.irq_edge),
        }
    }

    /// Run one channel for up to `budget` words, returning the words used
    fn run_channel(&mut self, port: Port, budget: u32, ports: &mut DmaPorts) -> u32 {
        let index = port.index();
        let Some(mut progress) = self.channels[index].progress.take() else {
            return 0;
        };

        let channel = &self.channels[index];
        let (used, done) = match channel.sync_mode() {
            Some(SyncMode::Manual) => {
                let n = progress.words.min(budget);
                let step = channel.step();
                let direction = channel.direction();
                transfer(port, direction, step, &mut progress, n, ports);
                (n, progress.words == 0)
            }
            Some(SyncMode::Request) => self.run_blocks(port, budget, &mut progress, ports),
            Some(SyncMode::LinkedList) => self.run_list(port, budget, &mut progress, ports),
            None => (0, true),
        };

        if done {
            self.complete(port);
        } else {
            self.channels[index].progress = Some(progress);
        }
        used
    }

    /// Sync mode 1: one block per device request
    fn run_blocks(
        &mut self,
        port: Port,
        mut budget: u32,
        progress: &mut Progress,
        ports: &mut DmaPorts,
    ) -> (u32, bool) {
        let channel = &mut self.channels[port.index()];
        let step = channel.step();
        let direction = channel.direction();
        let mut used = 0;

        while budget > 0 {
            if progress.words == 0 {
                if progress.blocks == 0 {
                    return (used, true);
                }
                if !device_ready(port, ports) {
                    break;
                }
                progress.words = channel.block_size();
            }

            let n = progress.words.min(budget);
            transfer(port, direction, step, progress, n, ports);
            budget -= n;
            used += n;

            if progress.words == 0 {
                progress.blocks -= 1;
                channel.block_done(progress.address, progress.blocks);
            }
        }

        (used, progress.words == 0 && progress.blocks == 0)
    }

    /// Sync mode 2: follow packet headers until the end marker
    fn run_list(
        &mut self,
        port: Port,
        mut budget: u32,
        progress: &mut Progress,
        ports: &mut DmaPorts,
    ) -> (u32, bool) {
        let channel = &mut self.channels[port.index()];
        let direction = channel.direction();
        let mut used = 0;

        while budget > 0 {
            if progress.words == 0 {
                if progress.last {
                    return (used, true);
                }

                let header_address = progress.next;
                if header_address & 0x0080_0000 != 0 {
                    return (used, true);
                }
                if header_address as usize >= Ram::SIZE {
                    log::warn!(
                        "DMA{} list points outside RAM (0x{:06X}), transfer truncated",
                        port.index(),
                        header_address
                    );
                    return (used, true);
                }
                if progress.hops >= Self::MAX_LIST_PACKETS {
                    log::warn!(
                        "DMA{} list exceeded {} packets, transfer truncated",
                        port.index(),
                        Self::MAX_LIST_PACKETS
                    );
                    return (used, true);
                }
                if !device_ready(port, ports) {
                    break;
                }

                let header = ports.ram.dma_read_word(header_address);
                budget -= 1;
                used += 1;

                progress.hops += 1;
                progress.words = header >> 24;
                progress.address = header_address.wrapping_add(4) & 0x001F_FFFC;
                progress.next = header & 0x00FF_FFFF;
                progress.last = progress.next & 0x0080_0000 != 0;
                channel.packet_started(progress.next);
                continue;
            }

            let n = progress.words.min(budget);
            transfer(port, direction, 4, progress, n, ports);
            budget -= n;
            used += n;
        }

        (used, progress.words == 0 && progress.last)
    }

    /// Finish a channel's transfer and flag its interrupt
    fn complete(&mut self, port: Port) {
        let index = port.index();
        self.channels[index].finish();

        if self.dicr & (1 << (16 + index)) != 0 {
            self.dicr |= 1 << (24 + index);
        }
        self.update_irq();

        log::debug!("DMA{} ({:?}) transfer complete", index, port);
    }
}

impl Default for DMA {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether the device behind `port` is ready; device-less ports always are
fn device_ready(port: Port, ports: &mut DmaPorts) -> bool {
    match ports.split(port).1 {
        Some(device) => device.dma_request(),
        None => true,
    }
}

/// Move `n` words for `port`, advancing the progress address and count
fn transfer(
    port: Port,
    direction: Direction,
    step: u32,
    progress: &mut Progress,
    n: u32,
    ports: &mut DmaPorts,
) {
    let (ram, device) = ports.split(port);
    let mut address = progress.address;

    match (port, device) {
        (Port::Otc, _) => {
            for i in 0..n {
                let remaining = progress.words - i;
                let value = if remaining == 1 {
                    0x00FF_FFFF
                } else {
                    address.wrapping_sub(4) & 0x001F_FFFF
                };
                ram.dma_write_word(address, value);
                address = address.wrapping_add(step) & 0x001F_FFFC;
            }
        }
        (_, Some(device)) => {
            for _ in 0..n {
                match direction {
                    Direction::FromRam => device.dma_write(ram.dma_read_word(address)),
                    Direction::ToRam => ram.dma_write_word(address, device.dma_read()),
                }
                address = address.wrapping_add(step) & 0x001F_FFFC;
            }
        }
        (_, None) => {
            address = address.wrapping_add(step.wrapping_mul(n)) & 0x001F_FFFC;
        }
    }

    progress.address = address;
    progress.words -= n;
}
