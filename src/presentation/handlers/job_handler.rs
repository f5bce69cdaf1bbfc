// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::application::dto::job_request::{JobSubmitRequestDto, JobSubmittedDto};
use crate::config::settings::Settings;
use crate::domain::models::job::{Job, JobStatus};
use crate::presentation::errors::AppError;
use crate::queue::job_queue::{JobQueue, QueueError};
use anyhow::anyhow;
use axum::extract::Path;
use axum::{extract::Extension, Json};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;
use validator::Validate;

/// 提交一个后台分析作业
///
/// # 返回值
///
/// 作业标识符与提交确认；FIFO队列已满时返回503
pub async fn submit_job(
    Extension(settings): Extension<Arc<Settings>>,
    Extension(queue): Extension<Arc<JobQueue>>,
    Json(payload): Json<JobSubmitRequestDto>,
) -> Result<Json<JobSubmittedDto>, AppError> {
    payload
        .validate()
        .map_err(|e| anyhow!("validation error: {}", e))?;

    let batch_size = payload
        .batch_size
        .unwrap_or(20)
        .min(settings.analysis.max_batch_size)
        .max(1);
    let timeout = Duration::from_secs(payload.timeout.unwrap_or(settings.analysis.default_timeout));
    let priority = payload.priority.unwrap_or(1);

    let job_id = queue.submit(
        payload.domains,
        batch_size,
        timeout,
        priority,
        payload.email_priority,
    )?;

    Ok(Json(JobSubmittedDto {
        job_id,
        status: "submitted".to_string(),
    }))
}

/// 查询作业状态
///
/// # 返回值
///
/// 作业当前状态、进度与时间戳；作业不存在时返回404
pub async fn job_status(
    Extension(queue): Extension<Arc<JobQueue>>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Job>, AppError> {
    let job = queue.job(&job_id).ok_or(QueueError::NotFound)?;
    Ok(Json(job))
}

/// 查询作业结果
///
/// 仅在作业完成后返回完整结果列表，否则回显当前状态
pub async fn job_results(
    Extension(queue): Extension<Arc<JobQueue>>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let job = queue.job(&job_id).ok_or(QueueError::NotFound)?;

    if job.status != JobStatus::Completed {
        return Ok(Json(json!({
            "job_id": job.id,
            "status": job.status,
            "message": format!("Job is {}. Results not yet available.", job.status),
        })));
    }

    Ok(Json(json!({
        "job_id": job.id,
        "status": job.status,
        "total_domains": job.total_domains,
        "processed_domains": job.processed_domains,
        "results": job.results,
    })))
}
