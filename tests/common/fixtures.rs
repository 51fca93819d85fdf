// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Synthetic BIOS images and ready-to-run systems

use super::asm;
use psrx_core::core::memory::Bus;
use psrx_core::core::{Region, System};

/// Reset vector (KSEG1 BIOS)
pub const RESET_VECTOR: u32 = 0xBFC0_0000;

/// Exception vector while SR.BEV is set
pub const BOOT_EXCEPTION_VECTOR: u32 = 0xBFC0_0180;

/// Builds a 512KB BIOS image out of MIPS programs
pub struct BiosBuilder {
    image: Vec<u8>,
}

impl BiosBuilder {
    pub fn new() -> Self {
        let mut builder = Self {
            image: vec![0; Bus::BIOS_SIZE],
        };
        builder.place(BOOT_EXCEPTION_VECTOR, &[asm::j(BOOT_EXCEPTION_VECTOR), asm::NOP]);
        builder
    }

    /// Write `program` at the KSEG1 BIOS address `address`
    pub fn place(&mut self, address: u32, program: &[u32]) -> &mut Self {
        let base = (address - RESET_VECTOR) as usize;
        for (i, word) in program.iter().enumerate() {
            let at = base + i * 4;
            self.image[at..at + 4].copy_from_slice(&word.to_le_bytes());
        }
        self
    }

    /// Program at the reset vector
    pub fn boot(&mut self, program: &[u32]) -> &mut Self {
        self.place(RESET_VECTOR, program)
    }

    pub fn build(&self) -> Vec<u8> {
        self.image.clone()
    }
}

impl Default for BiosBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// BIOS that spins at the reset vector
pub fn spin_bios() -> Vec<u8> {
    BiosBuilder::new()
        .boot(&[asm::j(RESET_VECTOR), asm::NOP])
        .build()
}

/// BIOS that keeps incrementing a word in RAM at 0x80000100
pub fn counter_bios() -> Vec<u8> {
    BiosBuilder::new()
        .boot(&[
            asm::lui(1, 0x8000),
            asm::lw(2, 0x100, 1),
            asm::NOP,
            asm::addiu(2, 2, 1),
            asm::sw(2, 0x100, 1),
            asm::j(RESET_VECTOR + 4),
            asm::NOP,
        ])
        .build()
}

pub fn system_with(bios: &[u8]) -> System {
    let mut system = System::new();
    system
        .init(bios, Region::Ntsc)
        .expect("synthetic BIOS is valid");
    system
}
