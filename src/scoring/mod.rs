// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Scoring and ranking: how resolved matches get their numbers and their order.
//!
//! Two layers. `core` turns "how much of this snippet shows up in this text,
//! and how close together" into a number in `[0, 1]`. `ranking` decides the
//! order, where match kind dominates: an exact match with nothing going for it
//! still outranks the best fuzzy guess.

mod core;
pub mod ranking;

pub use core::*;
