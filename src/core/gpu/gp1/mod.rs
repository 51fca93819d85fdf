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
//! GP1 control commands
//!
//! GP1 words execute immediately, bypassing the GP0 command buffer.
//!
//! | Command | Function                  |
//! |---------|---------------------------|
//! | 0x00    | Reset GPU                 |
//! | 0x01    | Reset command buffer      |
//! | 0x02    | Acknowledge interrupt     |
//! | 0x03    | Display enable            |
//! | 0x04    | DMA direction             |
//! | 0x05    | Start of display area     |
//! | 0x06    | Horizontal display range  |
//! | 0x07    | Vertical display range    |
//! | 0x08    | Display mode              |
//! | 0x10    | GPU info                  |

mod control;
mod display;
