// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Unit tests for DMA controller organized by category

mod basic;

use super::*;

/// Every channel enabled, power-on priorities
const ALL_ENABLED: u32 = 0x0FED_CBA9;

/// Owned peripherals behind a [`DmaPorts`] view
struct Rig {
    ram: Ram,
    gpu: GPU,
    cdrom: CDROM,
    spu: SPU,
}

impl Rig {
    fn new() -> Self {
        Self {
            ram: Ram::new(),
            gpu: GPU::new(),
            cdrom: CDROM::new(),
            spu: SPU::new(),
        }
    }

    fn tick(&mut self, dma: &mut DMA, cycles: u32) -> DmaTick {
        let mut ports = DmaPorts {
            ram: &mut self.ram,
            gpu: &mut self.gpu,
            cdrom: &mut self.cdrom,
            spu: &mut self.spu,
        };
        dma.tick(cycles, &mut ports)
    }

    fn poke(&mut self, address: u32, words: &[u32]) {
        for (i, &word) in words.iter().enumerate() {
            self.ram.dma_write_word(address + 4 * i as u32, word);
        }
    }

    fn peek(&self, address: u32) -> u32 {
        self.ram.dma_read_word(address)
    }
}

/// Register offset of a channel register
fn reg(port: Port, offset: u32) -> u32 {
    (port.index() as u32) << 4 | offset
}
