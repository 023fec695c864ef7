// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod compare;
pub mod detect;
pub mod errors;
pub mod handlers;
pub mod http_server;
pub mod upload;

pub use compare::{compare_handler, CompareResponse, ComparisonSummary};
pub use detect::{detect_handler, DetectResponse, ImageInfoView};
pub use errors::{ApiError, ErrorResponse};
pub use handlers::{
    DamageClassesResponse, DetectorStatus, HealthResponse, RepairCostsResponse, RootResponse,
};
pub use http_server::{create_app, start_server, AppState};
