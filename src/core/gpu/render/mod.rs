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
//! Software rendering
//!
//! [`Rasterizer`] owns the per-pixel rules (clipping, fill convention,
//! texturing, blending and mask bits). The GP0 handlers decode commands into
//! [`RasterVertex`] lists and a [`PrimitiveStyle`] and hand them over.

mod line;
mod rasterizer;
mod texture;

pub use rasterizer::{PrimitiveStyle, RasterVertex, Rasterizer, Shading};
pub use texture::TextureParams;
