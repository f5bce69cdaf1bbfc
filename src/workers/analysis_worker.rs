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

use crate::domain::models::analysis::AnalysisReport;
use crate::domain::services::analyzer::DomainAnalyzer;
use crate::queue::job_queue::{JobQueue, QueuedJob};
use anyhow::{anyhow, Result};
use futures::stream::{FuturesUnordered, StreamExt};
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::{sleep, Instant};
use tracing::{error, info, instrument};

/// 分析工作器
///
/// 长驻循环：先查高优先级队列再查FIFO队列，单个工作器一次只处理
/// 一个作业；空轮询和出队错误都以1秒退避保持循环存活，不会让
/// 工作器池崩溃。
pub struct AnalysisWorker {
    worker_id: usize,
    queue: Arc<JobQueue>,
    analyzer: Arc<DomainAnalyzer>,
}

impl AnalysisWorker {
    /// 创建新的分析工作器实例
    pub fn new(worker_id: usize, queue: Arc<JobQueue>, analyzer: Arc<DomainAnalyzer>) -> Self {
        Self {
            worker_id,
            queue,
            analyzer,
        }
    }

    /// 运行工作器循环
    pub async fn run(&self) {
        info!("Analysis worker {} started", self.worker_id);

        loop {
            match self.queue.next_job() {
                Some(work) => {
                    if let Err(e) = self.process_job(work).await {
                        error!("Worker {} error: {}", self.worker_id, e);
                        sleep(Duration::from_secs(1)).await;
                    }
                }
                // Poll backoff keeps the loop responsive to shutdown
                None => sleep(Duration::from_secs(1)).await,
            }
        }
    }

    /// 处理一个作业
    ///
    /// 标记为处理中后，用作业自带批量大小的信号量限制并发，把所有
    /// 域名交给分析器，按完成顺序收集结果并推进进度计数，最后标记
    /// 完成并更新运行统计。
    #[instrument(skip(self, work), fields(worker_id = self.worker_id, job_id = %work.job_id))]
    async fn process_job(&self, work: QueuedJob) -> Result<()> {
        info!("Processing job with {} domains", work.domains.len());
        let started = Instant::now();

        self.queue
            .with_job_mut(&work.job_id, |job| job.start())
            .ok_or_else(|| anyhow!("job {} missing from job table", work.job_id))??;

        let semaphore = Arc::new(Semaphore::new(work.batch_size.max(1)));
        let mut analyses = FuturesUnordered::new();

        for domain in work.domains.clone() {
            let analyzer = self.analyzer.clone();
            let semaphore = semaphore.clone();
            let timeout = work.timeout;
            let rules = work.email_priority.clone();

            analyses.push(async move {
                let fallback_domain = domain.clone();
                let handle = tokio::spawn(async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .expect("job semaphore is never closed");
                    analyzer.analyze(&domain, timeout, rules.as_deref()).await
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
            });
        }

        // Completion order, not submission order
        while let Some(report) = analyses.next().await {
            self.queue.with_job_mut(&work.job_id, |job| {
                job.results.push(report);
                job.record_progress();
            });
        }

        match self
            .queue
            .with_job_mut(&work.job_id, |job| job.complete())
        {
            Some(Ok(())) => {
                let processing_time = started.elapsed().as_secs_f64();
                self.queue
                    .record_job_success(work.domains.len(), processing_time);
                counter!("scoutrs_jobs_processed_total").increment(1);
                info!("Completed job in {:.2}s", processing_time);
                Ok(())
            }
            Some(Err(e)) => {
                self.queue.with_job_mut(&work.job_id, |job| {
                    let _ = job.fail(e.to_string());
                });
                self.queue.record_job_failure();
                counter!("scoutrs_jobs_failed_total").increment(1);
                Err(e.into())
            }
            None => Err(anyhow!("job {} vanished during processing", work.job_id)),
        }
    }
}
