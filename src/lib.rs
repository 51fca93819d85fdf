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
//! PlayStation emulation core
//!
//! A cycle-paced PSX core meant to be embedded in a host that supplies the
//! BIOS image, input and an optional disc, and consumes one framebuffer per
//! call to [`System::run_frame`](core::System::run_frame).
//!
//! # Example
//!
//! ```
//! use psrx_core::core::{InputSnapshot, Region, System};
//!
//! let mut bios = vec![0u8; 512 * 1024];
//! bios[0..4].copy_from_slice(&0x0BF0_0000u32.to_le_bytes()); // j 0xBFC00000
//!
//! let mut system = System::new();
//! system.init(&bios, Region::Ntsc).unwrap();
//! let frame = system.run_frame(&InputSnapshot::default()).unwrap();
//! assert!(!frame.framebuffer.pixels.is_empty());
//!
//! let state = system.serialize().unwrap();
//! system.deserialize(&state).unwrap();
//! ```

pub mod core;
