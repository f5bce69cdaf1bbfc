// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::presentation::handlers::{analyze_handler, job_handler, stats_handler};
use axum::{
    routing::{get, post},
    Router,
};

/// 创建应用路由
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes() -> Router {
    Router::new()
        .route("/health", get(stats_handler::health_check))
        .route("/version", get(version))
        .route("/analyze", post(analyze_handler::analyze))
        .route("/analyze-batch", post(analyze_handler::analyze_batch))
        .route("/jobs", post(job_handler::submit_job))
        .route("/jobs/{job_id}/status", get(job_handler::job_status))
        .route("/jobs/{job_id}/results", get(job_handler::job_results))
        .route("/queue/stats", get(stats_handler::queue_stats))
        .route("/performance", get(stats_handler::performance))
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
