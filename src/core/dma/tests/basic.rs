// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Basic DMA functionality tests (initialization, reset, registers)

use super::*;

#[test]
fn test_dma_initialization() {
    let dma = DMA::new();

    for port in Port::ALL {
        let channel = dma.channel(port);
        assert!(!channel.is_busy());
        assert_eq!(channel.madr(), 0);
        assert_eq!(channel.bcr(), 0);
    }
    // OTC always steps backward
    assert_eq!(dma.read(reg(Port::Otc, 8)), 0x0000_0002);
    assert_eq!(dma.read(reg(Port::Gpu, 8)), 0);

    assert_eq!(dma.read(DMA::DPCR), 0x0765_4321);
    assert_eq!(dma.read(DMA::DICR), 0);
    assert!(!dma.is_active());
}

#[test]
fn test_channel_registers() {
    let mut dma = DMA::new();

    dma.write(reg(Port::Gpu, 0), 0xFF12_3456);
    dma.write(reg(Port::Gpu, 4), 0x0010_0020);
    assert_eq!(dma.read(reg(Port::Gpu, 0)), 0x0012_3456);
    assert_eq!(dma.read(reg(Port::Gpu, 4)), 0x0010_0020);

    // Other channels untouched
    assert_eq!(dma.read(reg(Port::CdRom, 0)), 0);
}

#[test]
fn test_unused_registers_read_zero() {
    let mut dma = DMA::new();
    dma.write(0x78, 0xFFFF_FFFF);
    assert_eq!(dma.read(0x78), 0);
    assert_eq!(dma.read(0x7C), 0);
    assert_eq!(dma.read(reg(Port::Gpu, 0xC)), 0);
}

#[test]
fn test_dpcr_access() {
    let mut dma = DMA::new();
    dma.write(DMA::DPCR, 0x1234_5678);
    assert_eq!(dma.read(DMA::DPCR), 0x1234_5678);
}

#[test]
fn test_dicr_writable_bits() {
    let mut dma = DMA::new();

    // Bits 6-14 are read-only zero, flags cannot be set by writing
    dma.write(DMA::DICR, 0x7FFF_7FFF);
    assert_eq!(dma.read(DMA::DICR), 0x00FF_003F);
}

#[test]
fn test_dicr_force_irq() {
    let mut dma = DMA::new();
    let mut rig = Rig::new();

    dma.write(DMA::DICR, 1 << 15);
    assert_eq!(dma.read(DMA::DICR) & (1 << 31), 1 << 31);

    // The rising edge is reported once
    assert!(rig.tick(&mut dma, 1).irq);
    assert!(!rig.tick(&mut dma, 1).irq);

    dma.write(DMA::DICR, 0);
    assert_eq!(dma.read(DMA::DICR), 0);
}

#[test]
fn test_dicr_flags_write_one_to_clear() {
    let mut dma = DMA::new();
    let mut rig = Rig::new();
    dma.write(DMA::DPCR, ALL_ENABLED);

    // Master enable + OTC enable
    dma.write(DMA::DICR, 0x00C0_0000);

    dma.write(reg(Port::Otc, 0), 0x100);
    dma.write(reg(Port::Otc, 4), 1);
    dma.write(reg(Port::Otc, 8), 0x1100_0000);
    let tick = rig.tick(&mut dma, 10);
    assert!(tick.irq);
    assert_eq!(dma.read(DMA::DICR), 0xC0C0_0000);

    // Writing 0 to the flag keeps it
    dma.write(DMA::DICR, 0x00C0_0000);
    assert_eq!(dma.read(DMA::DICR), 0xC0C0_0000);

    // Writing 1 acknowledges it and drops bit 31
    dma.write(DMA::DICR, 0x40C0_0000);
    assert_eq!(dma.read(DMA::DICR), 0x00C0_0000);
}

#[test]
fn test_completion_flag_needs_channel_enable() {
    let mut dma = DMA::new();
    let mut rig = Rig::new();
    dma.write(DMA::DPCR, ALL_ENABLED);
    dma.write(DMA::DICR, 1 << 23);

    dma.write(reg(Port::Otc, 0), 0x100);
    dma.write(reg(Port::Otc, 4), 1);
    dma.write(reg(Port::Otc, 8), 0x1100_0000);
    let tick = rig.tick(&mut dma, 10);

    assert!(!tick.irq);
    assert_eq!(dma.read(DMA::DICR), 1 << 23);
}

#[test]
fn test_flag_without_master_does_not_raise() {
    let mut dma = DMA::new();
    let mut rig = Rig::new();
    dma.write(DMA::DPCR, ALL_ENABLED);
    dma.write(DMA::DICR, 1 << 22);

    dma.write(reg(Port::Otc, 0), 0x100);
    dma.write(reg(Port::Otc, 4), 1);
    dma.write(reg(Port::Otc, 8), 0x1100_0000);
    let tick = rig.tick(&mut dma, 10);

    assert!(!tick.irq);
    assert_eq!(dma.read(DMA::DICR), 0x4040_0000);

    // Enabling the master afterwards raises the line
    dma.write(DMA::DICR, 0x00C0_0000);
    assert_eq!(dma.read(DMA::DICR) >> 31, 1);
    assert!(rig.tick(&mut dma, 1).irq);
}

#[test]
fn test_reset() {
    let mut dma = DMA::new();
    dma.write(DMA::DPCR, 0);
    dma.write(DMA::DICR, 0x00FF_0000);
    dma.write(reg(Port::Gpu, 0), 0x1234);
    dma.write(reg(Port::Gpu, 8), 0x0100_0201);

    dma.reset();
    assert_eq!(dma.read(DMA::DPCR), 0x0765_4321);
    assert_eq!(dma.read(DMA::DICR), 0);
    assert_eq!(dma.read(reg(Port::Gpu, 0)), 0);
    assert!(!dma.channel(Port::Gpu).is_busy());
}
