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
//! Memory region identification and address translation
//!
//! The R3000A has no TLB. KUSEG, KSEG0 and KSEG1 are windows onto the same
//! 512MB physical space; only the cache behaviour differs, and the cache is
//! not modelled here.

use super::Bus;

/// Memory region identification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryRegion {
    /// Main RAM (2MB, mirrored to 8MB)
    RAM,
    /// Scratchpad (1KB)
    Scratchpad,
    /// I/O ports
    IO,
    /// BIOS ROM
    BIOS,
    /// Cache Control register
    CacheControl,
    /// Expansion regions 1, 2 and 3
    Expansion,
    /// Nothing decodes this address
    Unmapped,
}

impl Bus {
    /// Translate virtual address to physical address
    ///
    /// Masking the upper 3 bits handles KUSEG, KSEG0 and KSEG1 at once.
    /// KSEG2 only holds the cache control register, which lands on
    /// 0x1FFE0130 after the mask.
    #[inline(always)]
    pub(super) fn translate_address(&self, vaddr: u32) -> u32 {
        vaddr & 0x1FFF_FFFF
    }

    /// Identify the memory region for a virtual address
    ///
    /// # Example
    ///
    /// ```
    /// use psrx_core::core::memory::{Bus, MemoryRegion};
    ///
    /// let bus = Bus::new();
    ///
    /// assert_eq!(bus.identify_region(0x00000000), MemoryRegion::RAM);
    /// assert_eq!(bus.identify_region(0x1F800000), MemoryRegion::Scratchpad);
    /// assert_eq!(bus.identify_region(0x1F801000), MemoryRegion::IO);
    /// assert_eq!(bus.identify_region(0xBFC00000), MemoryRegion::BIOS);
    /// assert_eq!(bus.identify_region(0x10000000), MemoryRegion::Unmapped);
    /// ```
    pub fn identify_region(&self, vaddr: u32) -> MemoryRegion {
        let paddr = self.translate_address(vaddr);

        if (Self::RAM_START..=Self::RAM_END).contains(&paddr) {
            MemoryRegion::RAM
        } else if (Self::EXP1_START..=Self::EXP1_END).contains(&paddr)
            || (Self::EXP2_START..=Self::EXP2_END).contains(&paddr)
            || (Self::EXP3_START..=Self::EXP3_END).contains(&paddr)
        {
            MemoryRegion::Expansion
        } else if (Self::SCRATCHPAD_START..=Self::SCRATCHPAD_END).contains(&paddr) {
            MemoryRegion::Scratchpad
        } else if (Self::IO_START..=Self::IO_END).contains(&paddr) {
            MemoryRegion::IO
        } else if (Self::BIOS_START..=Self::BIOS_END).contains(&paddr) {
            MemoryRegion::BIOS
        } else if paddr == Self::CACHE_CONTROL {
            MemoryRegion::CacheControl
        } else {
            MemoryRegion::Unmapped
        }
    }
}
