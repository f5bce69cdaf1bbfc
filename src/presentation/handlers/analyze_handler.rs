// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::application::dto::analysis_request::AnalysisRequestDto;
use crate::config::settings::Settings;
use crate::domain::models::analysis::AnalysisReport;
use crate::domain::services::analyzer::DomainAnalyzer;
use crate::presentation::errors::AppError;
use anyhow::anyhow;
use axum::{extract::Extension, Json};
use futures::stream::{FuturesUnordered, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::{sleep, Instant};
use tracing::info;
use validator::Validate;

/// 在信号量约束下分析一个域名
///
/// 任务被取消或意外中断时产出错误报告而不是向上传播
async fn analyze_with_semaphore(
    analyzer: Arc<DomainAnalyzer>,
    semaphore: Arc<Semaphore>,
    domain: String,
    timeout: Duration,
    priority_rules: Option<Vec<String>>,
) -> AnalysisReport {
    let fallback_domain = domain.clone();
    let handle = tokio::spawn(async move {
        let _permit = semaphore
            .acquire_owned()
            .await
            .expect("batch semaphore is never closed");
        analyzer
            .analyze(&domain, timeout, priority_rules.as_deref())
            .await
    });
    match handle.await {
        Ok(report) => report,
        Err(e) if e.is_cancelled() => AnalysisReport::error_report(
            &fallback_domain,
            "Error",
            "Request cancelled".to_string(),
        ),
        Err(e) => AnalysisReport::error_report(
            &fallback_domain,
            "Error",
            format!("Unexpected error: {}", e),
        ),
    }
}

/// 并行分析多个域名
///
/// 批量大小由服务端压到配置上限，所有域名同时展开并受信号量
/// 约束；结果按完成顺序返回，不保证与请求顺序一致。
pub async fn analyze(
    Extension(settings): Extension<Arc<Settings>>,
    Extension(analyzer): Extension<Arc<DomainAnalyzer>>,
    Json(payload): Json<AnalysisRequestDto>,
) -> Result<Json<Vec<AnalysisReport>>, AppError> {
    payload
        .validate()
        .map_err(|e| anyhow!("validation error: {}", e))?;

    let batch_size = payload
        .batch_size
        .unwrap_or(10)
        .min(settings.analysis.max_batch_size);
    let timeout = Duration::from_secs(payload.timeout.unwrap_or(settings.analysis.default_timeout));
    let total_domains = payload.domains.len();

    info!(
        "Starting analysis of {} domains with batch size {}",
        total_domains, batch_size
    );

    let started = Instant::now();
    let semaphore = Arc::new(Semaphore::new(batch_size));
    let mut analyses = FuturesUnordered::new();
    for domain in payload.domains {
        analyses.push(analyze_with_semaphore(
            analyzer.clone(),
            semaphore.clone(),
            domain,
            timeout,
            payload.email_priority.clone(),
        ));
    }

    let mut results = Vec::with_capacity(total_domains);
    while let Some(report) = analyses.next().await {
        results.push(report);
    }

    let total_time = started.elapsed().as_secs_f64();
    info!(
        "Analysis completed: {} results, total time: {:.2}s, avg per domain: {:.2}s",
        results.len(),
        total_time,
        if total_domains > 0 {
            total_time / total_domains as f64
        } else {
            0.0
        }
    );

    Ok(Json(results))
}

/// 按传统分批方式分析多个域名
///
/// 逐批展开，批与批之间加入短暂的节流停顿
pub async fn analyze_batch(
    Extension(settings): Extension<Arc<Settings>>,
    Extension(analyzer): Extension<Arc<DomainAnalyzer>>,
    Json(payload): Json<AnalysisRequestDto>,
) -> Result<Json<Vec<AnalysisReport>>, AppError> {
    payload
        .validate()
        .map_err(|e| anyhow!("validation error: {}", e))?;

    let batch_size = payload
        .batch_size
        .unwrap_or(10)
        .min(settings.analysis.max_batch_size)
        .max(1);
    let timeout = Duration::from_secs(payload.timeout.unwrap_or(settings.analysis.default_timeout));

    let mut results = Vec::with_capacity(payload.domains.len());
    let chunks: Vec<&[String]> = payload.domains.chunks(batch_size).collect();
    let chunk_count = chunks.len();

    for (index, chunk) in chunks.into_iter().enumerate() {
        let semaphore = Arc::new(Semaphore::new(batch_size));
        let mut analyses = FuturesUnordered::new();
        for domain in chunk {
            analyses.push(analyze_with_semaphore(
                analyzer.clone(),
                semaphore.clone(),
                domain.clone(),
                timeout,
                payload.email_priority.clone(),
            ));
        }
        while let Some(report) = analyses.next().await {
            results.push(report);
        }

        // Pacing pause between batches
        if index + 1 < chunk_count {
            sleep(Duration::from_millis(200)).await;
        }
    }

    Ok(Json(results))
}
