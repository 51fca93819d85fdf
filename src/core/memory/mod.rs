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
//! Memory bus implementation for PlayStation 1 emulator
//!
//! The Bus is the central component for all memory operations in the emulator.
//! It owns every memory region and every memory-mapped peripheral, and routes
//! CPU accesses to them after address translation.
//!
//! # Memory Map
//!
//! | Physical Address Range | Region       | Size   | Access |
//! |------------------------|--------------|--------|--------|
//! | 0x00000000-0x007FFFFF  | RAM (x4)     | 2MB    | R/W    |
//! | 0x1F000000-0x1F7FFFFF  | Expansion 1  |        | R only |
//! | 0x1F800000-0x1F8003FF  | Scratchpad   | 1KB    | R/W    |
//! | 0x1F801000-0x1F801FFF  | I/O Ports    | 4KB    | R/W    |
//! | 0x1F802000-0x1F802FFF  | Expansion 2  |        | R/W    |
//! | 0x1FA00000-0x1FBFFFFF  | Expansion 3  |        | R only |
//! | 0x1FC00000-0x1FC7FFFF  | BIOS ROM     | 512KB  | R only |
//!
//! # Faults
//!
//! Misaligned accesses return [`EmulatorError::UnalignedAccess`] and reads
//! of unmapped addresses return [`EmulatorError::InvalidMemoryAccess`]; the
//! CPU turns both into exceptions. Writes to unmapped addresses are dropped.
//!
//! # Example
//!
//! ```
//! use psrx_core::core::memory::Bus;
//!
//! let mut bus = Bus::new();
//!
//! // Write to RAM via KSEG0
//! bus.write32(0x80000000, 0x12345678).unwrap();
//!
//! // Read from same location via different segment (should mirror)
//! assert_eq!(bus.read32(0x00000000).unwrap(), 0x12345678);
//! assert_eq!(bus.read32(0xA0000000).unwrap(), 0x12345678);
//! ```

use crate::core::cdrom::CDROM;
use crate::core::controller::ControllerPorts;
use crate::core::dma::{DmaPorts, DMA};
use crate::core::error::{EmulatorError, Result};
use crate::core::gpu::{VideoSignals, GPU};
use crate::core::interrupt::{interrupts, InterruptController};
use crate::core::save_state::expect_len;
use crate::core::spu::SPU;
use crate::core::timer::Timers;
use serde::{Deserialize, Serialize};
use std::path::Path;

mod io_ports;
mod ram;
mod region;

#[cfg(test)]
mod tests;

pub use ram::Ram;
pub use region::MemoryRegion;

/// Access width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    Byte,
    Half,
    Word,
}

impl Width {
    #[inline(always)]
    pub fn bytes(self) -> usize {
        match self {
            Width::Byte => 1,
            Width::Half => 2,
            Width::Word => 4,
        }
    }

    /// Mask keeping the low `bytes()` bytes
    #[inline(always)]
    pub fn mask(self) -> u32 {
        match self {
            Width::Byte => 0xFF,
            Width::Half => 0xFFFF,
            Width::Word => 0xFFFF_FFFF,
        }
    }
}

/// Memory bus and the hardware hanging off it
///
/// The BIOS image is a host binding: it is not part of the serialized
/// state and must be restored by the owner after deserialization.
#[derive(Serialize, Deserialize)]
pub struct Bus {
    /// Main RAM (2MB)
    pub(crate) ram: Ram,

    /// Scratchpad (1KB fast RAM)
    scratchpad: Vec<u8>,

    /// BIOS ROM (512KB)
    #[serde(skip)]
    bios: Vec<u8>,

    /// Memory control 1 (0x1F801000-0x1F801023)
    mem_control: [u32; 9],

    /// Memory control 2 / RAM_SIZE (0x1F801060)
    ram_size: u32,

    /// Cache Control register (0xFFFE0130)
    cache_control: u32,

    /// Interrupt controller (I_STAT / I_MASK)
    pub(crate) irq: InterruptController,

    /// Root counters
    pub(crate) timers: Timers,

    /// DMA controller
    pub(crate) dma: DMA,

    /// Graphics processor
    pub(crate) gpu: GPU,

    /// CD-ROM controller
    pub(crate) cdrom: CDROM,

    /// Sound processor register file
    pub(crate) spu: SPU,

    /// Controller/memory card serial port
    pub(crate) controller_ports: ControllerPorts,
}

impl Bus {
    /// BIOS size (512KB)
    pub const BIOS_SIZE: usize = 512 * 1024;

    /// Scratchpad size (1KB)
    const SCRATCHPAD_SIZE: usize = 1024;

    /// RAM physical address range (2MB mirrored 4 times)
    const RAM_START: u32 = 0x0000_0000;
    const RAM_END: u32 = 0x007F_FFFF;

    /// Expansion Region 1 physical address range
    const EXP1_START: u32 = 0x1F00_0000;
    const EXP1_END: u32 = 0x1F7F_FFFF;

    /// Expansion 1 ROM header; reads as zero so the BIOS sees no ROM
    const EXP1_HEADER_END: u32 = 0x1F00_00FF;

    /// Scratchpad physical address range
    const SCRATCHPAD_START: u32 = 0x1F80_0000;
    const SCRATCHPAD_END: u32 = 0x1F80_03FF;

    /// I/O ports physical address range
    const IO_START: u32 = 0x1F80_1000;
    const IO_END: u32 = 0x1F80_1FFF;

    /// Expansion Region 2 physical address range
    const EXP2_START: u32 = 0x1F80_2000;
    const EXP2_END: u32 = 0x1F80_2FFF;

    /// POST status display in expansion 2
    const POST: u32 = 0x1F80_2041;

    /// Expansion Region 3 physical address range
    const EXP3_START: u32 = 0x1FA0_0000;
    const EXP3_END: u32 = 0x1FBF_FFFF;

    /// BIOS ROM physical address range
    const BIOS_START: u32 = 0x1FC0_0000;
    const BIOS_END: u32 = 0x1FC7_FFFF;

    /// Cache Control register address
    const CACHE_CONTROL: u32 = 0x1FFE_0130;

    /// Create a new Bus with zeroed memory and powered-on peripherals
    ///
    /// The BIOS region reads as zero until [`Bus::load_bios`] is called.
    pub fn new() -> Self {
        Self {
            ram: Ram::new(),
            scratchpad: vec![0; Self::SCRATCHPAD_SIZE],
            bios: vec![0; Self::BIOS_SIZE],
            mem_control: [0; 9],
            ram_size: 0x0000_0B88,
            cache_control: 0,
            irq: InterruptController::new(),
            timers: Timers::new(),
            dma: DMA::new(),
            gpu: GPU::new(),
            cdrom: CDROM::new(),
            spu: SPU::new(),
            controller_ports: ControllerPorts::new(),
        }
    }

    /// Reset to power-on state
    ///
    /// Clears volatile memory and resets every peripheral. The BIOS image
    /// and the inserted disc are host bindings and survive.
    pub fn reset(&mut self) {
        self.ram.clear();
        self.scratchpad.fill(0);
        self.mem_control = [0; 9];
        self.ram_size = 0x0000_0B88;
        self.cache_control = 0;
        self.irq.reset();
        self.timers.reset();
        self.dma.reset();
        self.gpu.reset();
        self.cdrom.reset();
        self.spu.reset();
        self.controller_ports.reset();
    }

    /// Install a BIOS image
    ///
    /// # Errors
    ///
    /// [`EmulatorError::InvalidBiosImage`] unless `image` is exactly 512KB.
    pub fn load_bios(&mut self, image: &[u8]) -> Result<()> {
        if image.len() != Self::BIOS_SIZE {
            return Err(EmulatorError::InvalidBiosImage {
                reason: format!(
                    "expected {} bytes, got {}",
                    Self::BIOS_SIZE,
                    image.len()
                ),
            });
        }
        self.bios.clear();
        self.bios.extend_from_slice(image);
        Ok(())
    }

    /// Read a BIOS image from disk
    ///
    /// # Errors
    ///
    /// [`EmulatorError::BiosNotFound`] if the file cannot be opened,
    /// [`EmulatorError::InvalidBiosImage`] if it has the wrong size.
    pub fn read_bios_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
        let path = path.as_ref();
        let image = std::fs::read(path)
            .map_err(|_| EmulatorError::BiosNotFound(path.display().to_string()))?;
        if image.len() != Self::BIOS_SIZE {
            return Err(EmulatorError::InvalidBiosImage {
                reason: format!(
                    "{}: expected {} bytes, got {}",
                    path.display(),
                    Self::BIOS_SIZE,
                    image.len()
                ),
            });
        }
        Ok(image)
    }

    /// Move the host bindings (BIOS image, disc) out of `other`
    pub(crate) fn validate_layout(&self) -> Result<()> {
        self.ram.validate_layout()?;
        expect_len("scratchpad", self.scratchpad.len(), Self::SCRATCHPAD_SIZE)?;
        self.gpu.validate_layout()?;
        self.spu.validate_layout()
    }

    pub(crate) fn adopt_host_bindings(&mut self, other: &mut Bus) {
        self.bios = std::mem::take(&mut other.bios);
        self.cdrom.adopt_disc(&mut other.cdrom);
    }

    /// Interrupt controller output (CAUSE.IP2)
    #[inline(always)]
    pub fn interrupt_line(&self) -> bool {
        self.irq.is_pending_and_enabled()
    }

    fn check_alignment(vaddr: u32, width: Width) -> Result<()> {
        if vaddr as usize % width.bytes() != 0 {
            return Err(EmulatorError::UnalignedAccess {
                address: vaddr,
                size: width.bytes() as u8,
            });
        }
        Ok(())
    }

    /// Read `width` bytes from a virtual address
    pub fn read(&mut self, vaddr: u32, width: Width) -> Result<u32> {
        Self::check_alignment(vaddr, width)?;
        let paddr = self.translate_address(vaddr);

        match self.identify_region(vaddr) {
            MemoryRegion::RAM => Ok(self.ram.read(paddr, width)),
            MemoryRegion::Scratchpad => Ok(ram::read_le(
                &self.scratchpad,
                (paddr - Self::SCRATCHPAD_START) as usize,
                width,
            )),
            MemoryRegion::BIOS => Ok(ram::read_le(
                &self.bios,
                (paddr - Self::BIOS_START) as usize,
                width,
            )),
            MemoryRegion::IO => Ok(self.read_io(paddr, width) & width.mask()),
            MemoryRegion::CacheControl => Ok(self.cache_control & width.mask()),
            MemoryRegion::Expansion => {
                if (Self::EXP1_START..=Self::EXP1_HEADER_END).contains(&paddr) {
                    Ok(0)
                } else {
                    Ok(0xFFFF_FFFF & width.mask())
                }
            }
            MemoryRegion::Unmapped => {
                log::warn!("Unmapped read at 0x{:08X}", vaddr);
                Err(EmulatorError::InvalidMemoryAccess { address: vaddr })
            }
        }
    }

    /// Write `width` bytes to a virtual address
    pub fn write(&mut self, vaddr: u32, width: Width, value: u32) -> Result<()> {
        Self::check_alignment(vaddr, width)?;
        let paddr = self.translate_address(vaddr);
        let value = value & width.mask();

        match self.identify_region(vaddr) {
            MemoryRegion::RAM => self.ram.write(paddr, width, value),
            MemoryRegion::Scratchpad => ram::write_le(
                &mut self.scratchpad,
                (paddr - Self::SCRATCHPAD_START) as usize,
                width,
                value,
            ),
            MemoryRegion::BIOS => {
                log::trace!("Write to BIOS at 0x{:08X} ignored", paddr);
            }
            MemoryRegion::IO => self.write_io(paddr, width, value),
            MemoryRegion::CacheControl => {
                log::debug!("Cache control = 0x{:08X}", value);
                self.cache_control = value;
            }
            MemoryRegion::Expansion => {
                if paddr == Self::POST {
                    log::debug!("POST status 0x{:02X}", value);
                } else {
                    log::trace!("Expansion write at 0x{:08X} ignored", paddr);
                }
            }
            MemoryRegion::Unmapped => {
                log::warn!("Unmapped write at 0x{:08X} = 0x{:08X} ignored", vaddr, value);
            }
        }
        Ok(())
    }

    pub fn read8(&mut self, vaddr: u32) -> Result<u8> {
        self.read(vaddr, Width::Byte).map(|v| v as u8)
    }

    pub fn read16(&mut self, vaddr: u32) -> Result<u16> {
        self.read(vaddr, Width::Half).map(|v| v as u16)
    }

    pub fn read32(&mut self, vaddr: u32) -> Result<u32> {
        self.read(vaddr, Width::Word)
    }

    pub fn write8(&mut self, vaddr: u32, value: u8) -> Result<()> {
        self.write(vaddr, Width::Byte, value as u32)
    }

    pub fn write16(&mut self, vaddr: u32, value: u16) -> Result<()> {
        self.write(vaddr, Width::Half, value as u32)
    }

    pub fn write32(&mut self, vaddr: u32, value: u32) -> Result<()> {
        self.write(vaddr, Width::Word, value)
    }

    pub fn ram(&self) -> &Ram {
        &self.ram
    }

    pub fn irq(&self) -> &InterruptController {
        &self.irq
    }

    pub fn irq_mut(&mut self) -> &mut InterruptController {
        &mut self.irq
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn dma(&self) -> &DMA {
        &self.dma
    }

    pub fn dma_mut(&mut self) -> &mut DMA {
        &mut self.dma
    }

    /// Advance DMA transfers by `cycles` bus cycles
    ///
    /// Raises the DMA interrupt on a DICR bit 31 rising edge.
    ///
    /// # Returns
    ///
    /// Words moved, i.e. the bus cycles taken from the CPU
    pub fn tick_dma(&mut self, cycles: u32) -> u32 {
        let mut ports = DmaPorts {
            ram: &mut self.ram,
            gpu: &mut self.gpu,
            cdrom: &mut self.cdrom,
            spu: &mut self.spu,
        };
        let tick = self.dma.tick(cycles, &mut ports);
        if tick.irq {
            self.irq.raise(interrupts::DMA);
        }
        tick.words
    }

    /// Advance the GPU by `cycles` CPU cycles
    ///
    /// Raises VBLANK on vblank entry and GPU for a pending GP0(1Fh).
    pub fn tick_gpu(&mut self, cycles: u32) -> VideoSignals {
        let signals = self.gpu.tick(cycles);
        if signals.vblank_started {
            self.irq.raise(interrupts::VBLANK);
        }
        if self.gpu.take_irq() {
            self.irq.raise(interrupts::GPU);
        }
        signals
    }

    /// Advance the root counters using the video signals of the same period
    pub fn tick_timers(&mut self, cycles: u32, video: &VideoSignals) {
        let irqs = self.timers.tick(cycles, video);
        for (index, _) in irqs.iter().enumerate().filter(|(_, &irq)| irq) {
            self.irq.raise(interrupts::timer(index));
        }
    }

    pub fn tick_cdrom(&mut self, cycles: u32) {
        if self.cdrom.tick(cycles) {
            self.irq.raise(interrupts::CDROM);
        }
    }

    pub fn tick_pad(&mut self, cycles: u32) {
        if self.controller_ports.tick(cycles) {
            self.irq.raise(interrupts::CONTROLLER);
        }
    }

    pub fn gpu(&self) -> &GPU {
        &self.gpu
    }

    pub fn gpu_mut(&mut self) -> &mut GPU {
        &mut self.gpu
    }

    pub fn cdrom(&self) -> &CDROM {
        &self.cdrom
    }

    pub fn cdrom_mut(&mut self) -> &mut CDROM {
        &mut self.cdrom
    }

    pub fn spu(&self) -> &SPU {
        &self.spu
    }

    pub fn controller_ports(&self) -> &ControllerPorts {
        &self.controller_ports
    }

    pub fn controller_ports_mut(&mut self) -> &mut ControllerPorts {
        &mut self.controller_ports
    }
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}
