// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Damage detection endpoint module
//!
//! Provides POST /api/detect for a single vehicle photo.

pub mod handler;
pub mod response;

pub use handler::detect_handler;
pub use response::{DetectResponse, ImageInfoView};
