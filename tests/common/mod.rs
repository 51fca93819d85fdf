// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut

//! Shared fixtures for the integration tests

#![allow(dead_code)]

pub mod asm;
pub mod fixtures;
