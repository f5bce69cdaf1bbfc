// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::Settings;
use crate::engines::rate_limiter::RateLimiter;
use crate::engines::session_pool::SessionPool;
use crate::queue::job_queue::JobQueue;
use crate::workers::manager::WorkerManager;
use axum::{extract::Extension, Json};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::Mutex;

/// 健康检查端点
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// 队列统计端点
///
/// 返回工作器与队列占用情况以及累计计数器
pub async fn queue_stats(
    Extension(queue): Extension<Arc<JobQueue>>,
    Extension(manager): Extension<Arc<Mutex<WorkerManager>>>,
    Extension(settings): Extension<Arc<Settings>>,
) -> Json<Value> {
    let (queued_jobs, active_jobs, total_jobs) = queue.job_counts();
    let (queue_size, priority_queue_size) = queue.queue_depths();
    let stats = queue.stats();
    let active_workers = manager.lock().await.active_workers();

    Json(json!({
        "active_workers": active_workers,
        "total_workers": settings.queue.max_workers,
        "queued_jobs": queued_jobs,
        "active_jobs": active_jobs,
        "queue_size": queue_size,
        "priority_queue_size": priority_queue_size,
        "total_jobs": total_jobs,
        "jobs_processed": stats.jobs_processed,
        "jobs_failed": stats.jobs_failed,
        "total_domains_processed": stats.total_domains_processed,
        "average_processing_time": stats.average_processing_time,
    }))
}

/// 性能指标端点
///
/// 只读展示限流器、会话池和作业队列的当前状态
pub async fn performance(
    Extension(limiter): Extension<Arc<RateLimiter>>,
    Extension(pool): Extension<Arc<SessionPool>>,
    Extension(queue): Extension<Arc<JobQueue>>,
) -> Json<Value> {
    let stats = queue.stats();
    let (queue_size, priority_queue_size) = queue.queue_depths();

    Json(json!({
        "rate_limiter": {
            "max_concurrent": limiter.max_concurrent(),
            "available_slots": limiter.available_slots(),
            "current_requests": limiter.window_len().await,
            "delay_ms": limiter.min_delay().as_millis() as u64,
            "burst_limit": limiter.burst_limit(),
        },
        "session_pool": {
            "pool_size": pool.size(),
            "active_sessions": pool.active_sessions(),
            "current_index": pool.cursor(),
        },
        "worker_queue": {
            "queue_size": queue_size,
            "priority_queue_size": priority_queue_size,
            "jobs_processed": stats.jobs_processed,
            "jobs_failed": stats.jobs_failed,
            "total_domains_processed": stats.total_domains_processed,
            "average_processing_time": stats.average_processing_time,
        },
    }))
}
