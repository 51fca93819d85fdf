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

//! Perspective division
//!
//! The GTE divides `H / SZ3` with an unsigned Newton-Raphson step seeded
//! from a 257-entry reciprocal table, producing a 1.16 result clamped to
//! 0x1FFFF.

/// Reciprocal seed table
const UNR_TABLE: [u8; 0x101] = build_unr_table();

const fn build_unr_table() -> [u8; 0x101] {
    let mut table = [0u8; 0x101];
    let mut i = 0;
    while i < table.len() {
        let v = (0x40000 / (i as i32 + 0x100) + 1) / 2 - 0x101;
        table[i] = if v < 0 { 0 } else { v as u8 };
        i += 1;
    }
    table
}

/// Divide `h` by `sz3`
///
/// # Returns
///
/// `(quotient, overflow)`; on overflow the quotient is 0x1FFFF
pub(super) fn divide(h: u16, sz3: u16) -> (u32, bool) {
    if (h as u32) >= (sz3 as u32) * 2 {
        return (0x1FFFF, true);
    }

    let shift = sz3.leading_zeros();
    let n = (h as u64) << shift;
    let d = (sz3 as u64) << shift;

    let u = UNR_TABLE[((d - 0x7FC0) >> 7) as usize] as u64 + 0x101;
    let d = (0x200_0080 - d * u) >> 8;
    let d = (0x000_0080 + d * u) >> 8;

    let quotient = ((n * d + 0x8000) >> 16).min(0x1FFFF);
    (quotient as u32, false)
}
