// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::services::analyzer::DomainAnalyzer;
use crate::queue::job_queue::JobQueue;
use crate::workers::analysis_worker::AnalysisWorker;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// 工作管理器
///
/// 启动固定数量的分析工作器循环并负责优雅关闭
pub struct WorkerManager {
    queue: Arc<JobQueue>,
    analyzer: Arc<DomainAnalyzer>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerManager {
    /// 创建新的工作管理器实例
    ///
    /// # 参数
    ///
    /// * `queue` - 作业队列
    /// * `analyzer` - 域名分析器
    pub fn new(queue: Arc<JobQueue>, analyzer: Arc<DomainAnalyzer>) -> Self {
        Self {
            queue,
            analyzer,
            handles: Vec::new(),
        }
    }

    /// 启动工作器
    ///
    /// 创建并启动指定数量的工作器循环
    ///
    /// # 参数
    ///
    /// * `count` - 要启动的工作器数量
    pub fn start_workers(&mut self, count: usize) {
        for worker_id in 0..count {
            let worker =
                AnalysisWorker::new(worker_id, self.queue.clone(), self.analyzer.clone());
            // Each worker loop runs on its own task
            let handle = tokio::spawn(async move {
                worker.run().await;
            });
            self.handles.push(handle);
        }
        info!("Started {} workers for job processing", count);
    }

    /// 当前存活的工作器数量（用于监控）
    pub fn active_workers(&self) -> usize {
        self.handles.iter().filter(|h| !h.is_finished()).count()
    }

    /// 关闭所有工作器
    ///
    /// 取消所有工作器循环并等待它们退出后才返回
    pub async fn shutdown(&mut self) {
        info!("Shutting down workers...");
        for handle in &self.handles {
            handle.abort();
        }
        for handle in self.handles.drain(..) {
            let _ = handle.await;
        }
        info!("All workers stopped");
    }
}
