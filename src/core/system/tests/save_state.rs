// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

use super::*;
use crate::core::cdrom::MemoryDisc;

#[test]
fn test_round_trip_is_exact() {
    let mut system = running_system();
    system.run_frame(&InputSnapshot::default()).unwrap();

    let blob = system.serialize().unwrap();
    system.run_frame(&InputSnapshot::default()).unwrap();
    system.deserialize(&blob).unwrap();

    assert_eq!(system.serialize().unwrap(), blob);
    assert_eq!(system.frame_count(), 1);
}

#[test]
fn test_restored_state_replays_identically() {
    let mut system = running_system();
    system.run_frame(&InputSnapshot::default()).unwrap();
    let blob = system.serialize().unwrap();

    let first = system.run_frame(&InputSnapshot::default()).unwrap();
    let cycles = system.cycles();

    system.deserialize(&blob).unwrap();
    let second = system.run_frame(&InputSnapshot::default()).unwrap();
    assert_eq!(system.cycles(), cycles);
    assert_eq!(first.framebuffer, second.framebuffer);
}

#[test]
fn test_load_into_fresh_core() {
    let mut source = running_system();
    source.run_frame(&InputSnapshot::default()).unwrap();
    let blob = source.serialize().unwrap();

    let mut target = running_system();
    target.deserialize(&blob).unwrap();
    assert_eq!(target.cycles(), source.cycles());
    assert_eq!(target.pc(), source.pc());
    // BIOS binding comes from the target core
    let bus = target.bus_mut().unwrap();
    assert_eq!(bus.read32(0xBFC0_0000).unwrap(), jump(0xBFC0_0000));
}

#[test]
fn test_corrupt_blob_leaves_state_untouched() {
    let mut system = running_system();
    system.run_frame(&InputSnapshot::default()).unwrap();
    let before = system.serialize().unwrap();

    let mut blob = before.clone();
    blob.truncate(blob.len() / 2);
    let err = system.deserialize(&blob).unwrap_err();
    assert!(matches!(err, EmulatorError::CorruptState { .. }));

    let mut blob = before.clone();
    blob[0..4].copy_from_slice(b"NOPE");
    assert!(system.deserialize(&blob).is_err());

    assert_eq!(system.serialize().unwrap(), before);
}

#[test]
fn test_disc_survives_load() {
    let mut system = running_system();
    let blob = system.serialize().unwrap();
    system
        .insert_disc(Box::new(MemoryDisc::new(vec![0; 2352 * 2])))
        .unwrap();
    system.deserialize(&blob).unwrap();
    assert!(system.bus().unwrap().cdrom().has_disc());
}

#[test]
fn test_deserialize_before_init() {
    let blob = running_system().serialize().unwrap();
    let mut system = System::new();
    assert!(matches!(
        system.deserialize(&blob),
        Err(EmulatorError::InvalidState { .. })
    ));
}

#[test]
fn test_deserialize_after_reset_resumes() {
    let mut system = running_system();
    let blob = system.serialize().unwrap();
    system.reset().unwrap();
    system.deserialize(&blob).unwrap();
    assert_eq!(system.state(), State::Running);
}

/// Rewrite the `nth` all-zero 512K-entry buffer in `blob` to hold `len`
/// entries, keeping the header length consistent
fn shrink_zeroed_buffer(blob: &[u8], nth: usize, len: u8) -> Vec<u8> {
    const ENTRIES: usize = 0x80000;
    // varint length prefix for 0x80000
    const PREFIX: [u8; 5] = [0xFC, 0x00, 0x00, 0x08, 0x00];

    let start = (16..blob.len() - PREFIX.len() - ENTRIES)
        .filter(|&i| {
            blob[i..i + PREFIX.len()] == PREFIX
                && blob[i + PREFIX.len()..i + PREFIX.len() + ENTRIES]
                    .iter()
                    .all(|&b| b == 0)
        })
        .nth(nth)
        .expect("buffer not found in blob");

    let mut forged = blob[..start].to_vec();
    forged.push(len);
    forged.extend(std::iter::repeat(0).take(len as usize));
    forged.extend_from_slice(&blob[start + PREFIX.len() + ENTRIES..]);

    let payload_len = (forged.len() - 16) as u64;
    forged[8..16].copy_from_slice(&payload_len.to_le_bytes());
    forged
}

#[test]
fn test_wrong_sized_buffers_rejected() {
    let mut system = running_system();
    system.run_frame(&InputSnapshot::default()).unwrap();
    let before = system.serialize().unwrap();

    // VRAM, then SPU RAM
    for nth in 0..2 {
        let forged = shrink_zeroed_buffer(&before, nth, 4);
        let err = system.deserialize(&forged).unwrap_err();
        assert!(matches!(err, EmulatorError::CorruptState { .. }));
        assert_eq!(system.serialize().unwrap(), before);
    }

    // The core keeps running on the old state
    system.run_frame(&InputSnapshot::default()).unwrap();
    assert_eq!(system.frame_count(), 2);
}
