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
//! I/O port routing
//!
//! Decodes physical addresses in 0x1F801000-0x1F801FFF and forwards the
//! access to the owning peripheral. Registers are 32 bits wide unless the
//! peripheral is natively 16-bit (timers, SPU, pad control) or 8-bit
//! (CD-ROM). A narrower access to a 32-bit register sees the register
//! shifted by its byte lane.

use super::{Bus, Width};

impl Bus {
    /// Memory control 1 (0x1F801000-0x1F801023)
    const MEM_CONTROL_START: u32 = 0x1F80_1000;
    const MEM_CONTROL_END: u32 = 0x1F80_1023;

    /// Controller/memory card serial port
    const JOY_START: u32 = 0x1F80_1040;
    const JOY_END: u32 = 0x1F80_104F;
    const JOY_DATA: u32 = 0x1F80_1040;
    const JOY_STAT: u32 = 0x1F80_1044;
    const JOY_MODE: u32 = 0x1F80_1048;
    const JOY_CTRL: u32 = 0x1F80_104A;
    const JOY_BAUD: u32 = 0x1F80_104E;

    /// Memory control 2
    const RAM_SIZE_REG: u32 = 0x1F80_1060;

    /// Interrupt controller
    const I_STAT: u32 = 0x1F80_1070;
    const I_MASK: u32 = 0x1F80_1074;

    /// DMA registers
    const DMA_START: u32 = 0x1F80_1080;
    const DMA_END: u32 = 0x1F80_10FF;

    /// Root counters
    const TIMER_START: u32 = 0x1F80_1100;
    const TIMER_END: u32 = 0x1F80_112F;

    /// CD-ROM registers
    const CDROM_START: u32 = 0x1F80_1800;
    const CDROM_END: u32 = 0x1F80_1803;

    /// GPU registers
    const GPU_GP0: u32 = 0x1F80_1810;
    const GPU_GP1: u32 = 0x1F80_1814;

    /// MDEC registers
    const MDEC_START: u32 = 0x1F80_1820;
    const MDEC_END: u32 = 0x1F80_1827;

    /// SPU registers
    const SPU_START: u32 = 0x1F80_1C00;
    const SPU_END: u32 = 0x1F80_1FFF;

    /// MDEC status with the input FIFO empty and the output FIFO idle
    const MDEC_STATUS_IDLE: u32 = 0x8004_0000;

    /// Read from an I/O port
    ///
    /// Unknown registers read as zero. The caller masks the result to
    /// the access width.
    pub(super) fn read_io(&mut self, paddr: u32, width: Width) -> u32 {
        let lane = (paddr & 3) * 8;
        let aligned = paddr & !3;

        match paddr {
            Self::MEM_CONTROL_START..=Self::MEM_CONTROL_END => {
                let index = ((aligned - Self::MEM_CONTROL_START) >> 2) as usize;
                self.mem_control[index] >> lane
            }
            Self::JOY_START..=Self::JOY_END => self.read_joy(paddr, width),
            Self::RAM_SIZE_REG..=0x1F80_1063 => self.ram_size >> lane,
            Self::I_STAT..=0x1F80_1073 => self.irq.read_status() >> lane,
            Self::I_MASK..=0x1F80_1077 => self.irq.read_mask() >> lane,
            Self::DMA_START..=Self::DMA_END => {
                self.dma.read(aligned - Self::DMA_START) >> lane
            }
            Self::TIMER_START..=Self::TIMER_END => {
                // 16-bit registers: the high half reads as garbage on
                // hardware, zero here
                let value = self.timers.read((paddr & !1) - Self::TIMER_START);
                value >> ((paddr & 1) * 8)
            }
            Self::CDROM_START..=Self::CDROM_END => {
                let offset = paddr - Self::CDROM_START;
                let mut value = 0;
                // Wider CD-ROM accesses are split into byte reads
                for i in 0..width.bytes() as u32 {
                    let byte = self.cdrom.read8((offset + i) & 3) as u32;
                    value |= byte << (i * 8);
                }
                value
            }
            Self::GPU_GP0..=0x1F80_1813 => {
                let value = self.gpu.read_gpuread();
                log::trace!("GPUREAD -> 0x{:08X}", value);
                value >> lane
            }
            Self::GPU_GP1..=0x1F80_1817 => self.gpu.status() >> lane,
            Self::MDEC_START..=Self::MDEC_END => {
                if aligned == 0x1F80_1824 {
                    Self::MDEC_STATUS_IDLE >> lane
                } else {
                    0
                }
            }
            Self::SPU_START..=Self::SPU_END => {
                let offset = (paddr & !1) - Self::SPU_START;
                match width {
                    Width::Word => {
                        let lo = self.spu.read16(offset) as u32;
                        let hi = self.spu.read16(offset + 2) as u32;
                        lo | (hi << 16)
                    }
                    _ => (self.spu.read16(offset) as u32) >> ((paddr & 1) * 8),
                }
            }
            _ => {
                log::debug!("Unknown I/O read at 0x{:08X}", paddr);
                0
            }
        }
    }

    /// Write to an I/O port
    ///
    /// Writes to unknown registers are logged and dropped.
    pub(super) fn write_io(&mut self, paddr: u32, width: Width, value: u32) {
        let lane = (paddr & 3) * 8;
        let aligned = paddr & !3;
        let shifted = value << lane;

        match paddr {
            Self::MEM_CONTROL_START..=Self::MEM_CONTROL_END => {
                let index = ((aligned - Self::MEM_CONTROL_START) >> 2) as usize;
                let mask = width.mask() << lane;
                self.mem_control[index] = (self.mem_control[index] & !mask) | shifted;
                log::trace!(
                    "MEM_CONTROL[{}] = 0x{:08X}",
                    index,
                    self.mem_control[index]
                );
            }
            Self::JOY_START..=Self::JOY_END => self.write_joy(paddr, value),
            Self::RAM_SIZE_REG..=0x1F80_1063 => {
                let mask = width.mask() << lane;
                self.ram_size = (self.ram_size & !mask) | shifted;
            }
            Self::I_STAT..=0x1F80_1073 => {
                // Acknowledge: bytes outside the access stay set
                let keep = !(width.mask() << lane);
                self.irq.write_status(shifted | keep);
            }
            Self::I_MASK..=0x1F80_1077 => {
                let mask = width.mask() << lane;
                let current = self.irq.read_mask();
                self.irq.write_mask((current & !mask) | shifted);
            }
            Self::DMA_START..=Self::DMA_END => {
                self.dma.write(aligned - Self::DMA_START, shifted);
            }
            Self::TIMER_START..=Self::TIMER_END => {
                self.timers.write((paddr & !1) - Self::TIMER_START, value);
            }
            Self::CDROM_START..=Self::CDROM_END => {
                let offset = paddr - Self::CDROM_START;
                for i in 0..width.bytes() as u32 {
                    self.cdrom.write8((offset + i) & 3, (value >> (i * 8)) as u8);
                }
            }
            Self::GPU_GP0..=0x1F80_1813 => self.gpu.write_gp0(shifted),
            Self::GPU_GP1..=0x1F80_1817 => self.gpu.write_gp1(shifted),
            Self::MDEC_START..=Self::MDEC_END => {
                log::trace!("MDEC write 0x{:08X} = 0x{:08X} ignored", paddr, value);
            }
            Self::SPU_START..=Self::SPU_END => {
                let offset = (paddr & !1) - Self::SPU_START;
                match width {
                    Width::Word => {
                        self.spu.write16(offset, value as u16);
                        self.spu.write16(offset + 2, (value >> 16) as u16);
                    }
                    _ => self.spu.write16(offset, value as u16),
                }
            }
            _ => {
                log::debug!("Unknown I/O write at 0x{:08X} = 0x{:08X}", paddr, value);
            }
        }
    }

    fn read_joy(&mut self, paddr: u32, width: Width) -> u32 {
        let ports = &mut self.controller_ports;
        match paddr {
            Self::JOY_DATA => {
                // The RX FIFO peek repeats the byte in the upper lanes
                let byte = ports.read_rx_data() as u32;
                match width {
                    Width::Byte => byte,
                    Width::Half => byte | (byte << 8),
                    Width::Word => byte * 0x0101_0101,
                }
            }
            Self::JOY_STAT => ports.read_stat(),
            Self::JOY_MODE => ports.read_mode() as u32,
            Self::JOY_CTRL => ports.read_ctrl() as u32,
            Self::JOY_BAUD => ports.read_baud() as u32,
            _ => 0,
        }
    }

    fn write_joy(&mut self, paddr: u32, value: u32) {
        let ports = &mut self.controller_ports;
        match paddr {
            Self::JOY_DATA => ports.write_tx_data(value as u8),
            Self::JOY_MODE => ports.write_mode(value as u16),
            Self::JOY_CTRL => ports.write_ctrl(value as u16),
            Self::JOY_BAUD => ports.write_baud(value as u16),
            _ => log::trace!("JOY write 0x{:08X} = 0x{:08X} ignored", paddr, value),
        }
    }
}
