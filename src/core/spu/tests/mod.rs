// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! SPU register file tests

mod dma;
