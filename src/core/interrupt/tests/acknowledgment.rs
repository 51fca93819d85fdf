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

//! Interrupt acknowledgment tests

use super::super::*;

#[test]
fn test_write_zero_acknowledges() {
    let mut ic = InterruptController::new();
    ic.raise(interrupts::VBLANK);
    ic.write_mask(interrupts::VBLANK as u32);

    ic.write_status(!(interrupts::VBLANK as u32));

    assert!(!ic.is_pending_and_enabled());
    assert_eq!(ic.read_status(), 0);
}

#[test]
fn test_write_one_keeps_bit() {
    let mut ic = InterruptController::new();
    ic.raise(interrupts::VBLANK | interrupts::CDROM);

    // Acknowledge only CDROM
    ic.write_status(!(interrupts::CDROM as u32));

    assert_eq!(ic.read_status(), interrupts::VBLANK as u32);
}

#[test]
fn test_acknowledge_does_not_set_bits() {
    let mut ic = InterruptController::new();
    ic.write_status(0xFFFF_FFFF);
    assert_eq!(ic.read_status(), 0);
}
