// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Rental comparison endpoint module
//!
//! Provides POST /api/compare for pickup/return photo pairs.

pub mod handler;
pub mod response;

pub use handler::compare_handler;
pub use response::{CompareResponse, ComparisonSummary};
