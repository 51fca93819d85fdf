// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Memory region and mirroring tests
//!
//! Tests for address translation, segment mirroring (KUSEG, KSEG0, KSEG1),
//! and memory region boundary behavior.

use super::*;

#[test]
fn test_address_translation() {
    let bus = Bus::new();

    assert_eq!(bus.translate_address(0x00001234), 0x00001234);
    assert_eq!(bus.translate_address(0x80001234), 0x00001234);
    assert_eq!(bus.translate_address(0xA0001234), 0x00001234);
    assert_eq!(bus.translate_address(0xFFFE0130), 0x1FFE0130);
}

#[test]
fn test_segment_mirroring() {
    let mut bus = Bus::new();

    bus.write32(0x00001000, 0xAAAAAAAA).unwrap();
    assert_eq!(bus.read32(0x80001000).unwrap(), 0xAAAAAAAA);

    bus.write32(0xA0001000, 0xBBBBBBBB).unwrap();
    assert_eq!(bus.read32(0x00001000).unwrap(), 0xBBBBBBBB);
}

#[test]
fn test_region_boundaries() {
    let bus = Bus::new();

    assert_eq!(bus.identify_region(0x007FFFFF), MemoryRegion::RAM);
    assert_eq!(bus.identify_region(0x00800000), MemoryRegion::Unmapped);
    assert_eq!(bus.identify_region(0x1F8003FF), MemoryRegion::Scratchpad);
    assert_eq!(bus.identify_region(0x1F800400), MemoryRegion::Unmapped);
    assert_eq!(bus.identify_region(0x1F801FFF), MemoryRegion::IO);
    assert_eq!(bus.identify_region(0x1FC7FFFF), MemoryRegion::BIOS);
    assert_eq!(bus.identify_region(0x1FC80000), MemoryRegion::Unmapped);
}
