// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Image handling and the detection model adapter

pub mod image_utils;
pub mod inference;

pub use image_utils::{
    decode_image_bytes, decode_image_bytes_with_limit, detect_format, encode_jpeg, jpeg_data_url, ImageError, ImageInfo,
};
pub use inference::{parse_predictions, DamageDetector, InferenceError, RoboflowClient};
