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

//! GTE tests


use super::GTE;

/// Load an identity rotation matrix with the given projection distance
pub(super) fn identity_projection(gte: &mut GTE, h: i32) {
    gte.write_control(GTE::RT11_RT12, 0x0000_1000);
    gte.write_control(GTE::RT13_RT21, 0);
    gte.write_control(GTE::RT22_RT23, 0x0000_1000);
    gte.write_control(GTE::RT31_RT32, 0);
    gte.write_control(GTE::RT33, 0x1000);
    gte.write_control(GTE::TRX, 0);
    gte.write_control(GTE::TRY, 0);
    gte.write_control(GTE::TRZ, 0);
    gte.write_control(GTE::H, h);
    gte.write_control(GTE::OFX, 0);
    gte.write_control(GTE::OFY, 0);
}

/// Pack two signed halves the way the GTE stores XY pairs
pub(super) fn xy(x: i16, y: i16) -> i32 {
    ((x as u16 as u32) | ((y as u16 as u32) << 16)) as i32
}
