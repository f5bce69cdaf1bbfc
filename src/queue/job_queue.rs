// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::job::{Job, JobStatus};
use dashmap::DashMap;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::VecDeque;
use std::time::Duration;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

/// 队列错误类型
#[derive(Error, Debug)]
pub enum QueueError {
    /// 队列已满
    #[error("Queue is full")]
    Full,
    /// 作业不存在
    #[error("Job not found")]
    NotFound,
}

/// 已入队的作业工作项
///
/// 工作器出队后据此执行，作业自身的状态在作业表中维护
#[derive(Debug, Clone)]
pub struct QueuedJob {
    /// 作业标识符
    pub job_id: Uuid,
    /// 待分析的域名列表
    pub domains: Vec<String>,
    /// 作业内并发上限
    pub batch_size: usize,
    /// 单域名抓取超时
    pub timeout: Duration,
    /// 作业优先级
    pub priority: i32,
    /// 邮箱优先规则
    pub email_priority: Option<Vec<String>>,
}

/// 队列运行统计
#[derive(Debug, Clone, Default, Serialize)]
pub struct QueueStats {
    /// 已处理完成的作业数
    pub jobs_processed: u64,
    /// 失败的作业数
    pub jobs_failed: u64,
    /// 已处理的域名总数
    pub total_domains_processed: u64,
    /// 作业平均处理时间（秒），增量更新
    pub average_processing_time: f64,
}

/// 内存作业队列
///
/// 维护作业表、高优先级双端队列和有界FIFO队列。优先级≥3的作业
/// 从优先队列头部插入（后到的高优先级作业先被取走），其余进入
/// FIFO。作业表中的每个作业由恰好一个工作器认领后就地更新，
/// 进程退出时全部状态丢失。
pub struct JobQueue {
    max_queue_size: usize,
    jobs: DashMap<Uuid, Job>,
    priority_queue: Mutex<VecDeque<QueuedJob>>,
    fifo_queue: Mutex<VecDeque<QueuedJob>>,
    stats: Mutex<QueueStats>,
}

impl JobQueue {
    /// 创建新的作业队列实例
    ///
    /// # 参数
    ///
    /// * `max_queue_size` - FIFO队列容量上限
    pub fn new(max_queue_size: usize) -> Self {
        Self {
            max_queue_size,
            jobs: DashMap::new(),
            priority_queue: Mutex::new(VecDeque::new()),
            fifo_queue: Mutex::new(VecDeque::new()),
            stats: Mutex::new(QueueStats::default()),
        }
    }

    /// 提交一个新作业
    ///
    /// # 参数
    ///
    /// * `domains` - 待分析的域名列表
    /// * `batch_size` - 作业内并发上限
    /// * `timeout` - 单域名抓取超时
    /// * `priority` - 作业优先级，≥3进入高优先级队列
    /// * `email_priority` - 可选的邮箱优先规则
    ///
    /// # 返回值
    ///
    /// * `Ok(Uuid)` - 新作业的标识符
    /// * `Err(QueueError)` - FIFO队列已满
    pub fn submit(
        &self,
        domains: Vec<String>,
        batch_size: usize,
        timeout: Duration,
        priority: i32,
        email_priority: Option<Vec<String>>,
    ) -> Result<Uuid, QueueError> {
        if priority < 3 && self.fifo_queue.lock().len() >= self.max_queue_size {
            return Err(QueueError::Full);
        }

        let total_domains = domains.len();
        let job = Job::new(domains.clone());
        let job_id = job.id;
        let queued = QueuedJob {
            job_id,
            domains,
            batch_size,
            timeout,
            priority,
            email_priority,
        };

        self.jobs.insert(job_id, job);
        if priority >= 3 {
            // Newest high-priority job preempts older ones
            self.priority_queue.lock().push_front(queued);
        } else {
            self.fifo_queue.lock().push_back(queued);
        }

        info!(
            "Job {} submitted with {} domains (priority: {})",
            job_id, total_domains, priority
        );
        Ok(job_id)
    }

    /// 取出下一个待处理作业
    ///
    /// 先查高优先级队列，再查FIFO队列
    pub fn next_job(&self) -> Option<QueuedJob> {
        if let Some(job) = self.priority_queue.lock().pop_front() {
            return Some(job);
        }
        self.fifo_queue.lock().pop_front()
    }

    /// 按标识符查询作业快照
    pub fn job(&self, job_id: &Uuid) -> Option<Job> {
        self.jobs.get(job_id).map(|entry| entry.value().clone())
    }

    /// 对作业执行一次就地更新
    ///
    /// # 返回值
    ///
    /// 作业存在时返回闭包结果，否则返回None
    pub fn with_job_mut<R>(&self, job_id: &Uuid, update: impl FnOnce(&mut Job) -> R) -> Option<R> {
        self.jobs.get_mut(job_id).map(|mut entry| update(&mut entry))
    }

    /// 记录一个作业成功完成并更新运行统计
    ///
    /// 平均处理时间按增量公式更新：
    /// newAvg = (oldAvg*(n-1) + thisTime)/n
    pub fn record_job_success(&self, domains: usize, processing_time: f64) {
        let mut stats = self.stats.lock();
        stats.jobs_processed += 1;
        stats.total_domains_processed += domains as u64;
        let n = stats.jobs_processed as f64;
        stats.average_processing_time =
            (stats.average_processing_time * (n - 1.0) + processing_time) / n;
    }

    /// 记录一个作业失败
    pub fn record_job_failure(&self) {
        self.stats.lock().jobs_failed += 1;
    }

    /// 当前运行统计快照
    pub fn stats(&self) -> QueueStats {
        self.stats.lock().clone()
    }

    /// 当前两个队列的深度（FIFO, 高优先级）
    pub fn queue_depths(&self) -> (usize, usize) {
        (self.fifo_queue.lock().len(), self.priority_queue.lock().len())
    }

    /// 作业表中各状态的计数（排队中, 处理中, 总数）
    pub fn job_counts(&self) -> (usize, usize, usize) {
        let mut queued = 0;
        let mut active = 0;
        let total = self.jobs.len();
        for entry in self.jobs.iter() {
            match entry.status {
                JobStatus::Queued => queued += 1,
                JobStatus::Processing => active += 1,
                _ => {}
            }
        }
        (queued, active, total)
    }
}
