// File: lib.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

#![allow(clippy::uninlined_format_args)]
#![allow(clippy::bool_assert_comparison)]

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod input;
pub mod outcome;
pub mod probe;
pub mod range;
pub mod report;
pub mod similarity;
pub mod stats;
pub mod target;
