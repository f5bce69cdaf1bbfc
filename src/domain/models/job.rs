// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::analysis::AnalysisReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// 作业实体
///
/// 表示一批域名分析的后台工作单元。作业提交后由恰好一个工作器
/// 认领并就地更新；`processed_domains`单调不减且不超过域名总数，
/// 状态只能向前转换：Queued → Processing → {Completed | Failed}。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// 作业唯一标识符
    #[serde(rename = "job_id")]
    pub id: Uuid,
    /// 作业状态
    pub status: JobStatus,
    /// 待分析的域名列表
    #[serde(skip_serializing)]
    pub domains: Vec<String>,
    /// 已完成的分析结果（完成顺序，不保证与提交顺序一致）
    pub results: Vec<AnalysisReport>,
    /// 已处理的域名数量
    pub processed_domains: usize,
    /// 域名总数
    pub total_domains: usize,
    /// 创建时间
    pub created_at: DateTime<Utc>,
    /// 开始处理时间
    pub started_at: Option<DateTime<Utc>>,
    /// 完成时间
    pub completed_at: Option<DateTime<Utc>>,
    /// 失败原因
    pub error: Option<String>,
}

/// 作业状态枚举
///
/// 状态转换遵循以下流程，永不回退：
/// Queued → Processing → Completed/Failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// 已入队，尚未被工作器认领
    #[default]
    Queued,
    /// 处理中，已被一个工作器认领
    Processing,
    /// 已完成，结果可供查询
    Completed,
    /// 已失败，error字段携带原因
    Failed,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            JobStatus::Queued => write!(f, "queued"),
            JobStatus::Processing => write!(f, "processing"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

/// 领域错误类型
#[derive(Error, Debug)]
pub enum DomainError {
    /// 无效的状态转换
    #[error("Invalid state transition")]
    InvalidStateTransition,
}

impl Job {
    /// 创建一个新的作业
    ///
    /// # 参数
    ///
    /// * `domains` - 待分析的域名列表
    ///
    /// # 返回值
    ///
    /// 返回新创建的作业实例，初始状态为Queued
    pub fn new(domains: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            status: JobStatus::Queued,
            total_domains: domains.len(),
            domains,
            results: Vec::new(),
            processed_domains: 0,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            error: None,
        }
    }

    /// 开始处理作业
    ///
    /// 将状态从Queued变更为Processing并记录开始时间
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 转换成功
    /// * `Err(DomainError)` - 状态转换失败
    pub fn start(&mut self) -> Result<(), DomainError> {
        match self.status {
            JobStatus::Queued => {
                self.status = JobStatus::Processing;
                self.started_at = Some(Utc::now());
                Ok(())
            }
            _ => Err(DomainError::InvalidStateTransition),
        }
    }

    /// 完成作业
    ///
    /// 将状态从Processing变更为Completed并记录完成时间
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 转换成功
    /// * `Err(DomainError)` - 状态转换失败
    pub fn complete(&mut self) -> Result<(), DomainError> {
        match self.status {
            JobStatus::Processing => {
                self.status = JobStatus::Completed;
                self.completed_at = Some(Utc::now());
                Ok(())
            }
            _ => Err(DomainError::InvalidStateTransition),
        }
    }

    /// 标记作业失败
    ///
    /// 将状态从Processing变更为Failed并记录失败原因
    ///
    /// # 参数
    ///
    /// * `error` - 失败原因
    ///
    /// # 返回值
    ///
    /// * `Ok(())` - 转换成功
    /// * `Err(DomainError)` - 状态转换失败
    pub fn fail(&mut self, error: String) -> Result<(), DomainError> {
        match self.status {
            JobStatus::Processing => {
                self.status = JobStatus::Failed;
                self.completed_at = Some(Utc::now());
                self.error = Some(error);
                Ok(())
            }
            _ => Err(DomainError::InvalidStateTransition),
        }
    }

    /// 记录一个域名处理完成
    ///
    /// 计数单调递增，封顶为域名总数
    pub fn record_progress(&mut self) {
        if self.processed_domains < self.total_domains {
            self.processed_domains += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_moves_only_forward() {
        let mut job = Job::new(vec!["a.com".to_string(), "b.com".to_string()]);
        assert_eq!(job.status, JobStatus::Queued);
        assert_eq!(job.total_domains, 2);

        job.start().expect("queued -> processing");
        assert_eq!(job.status, JobStatus::Processing);
        assert!(job.started_at.is_some());

        job.complete().expect("processing -> completed");
        assert_eq!(job.status, JobStatus::Completed);
        assert!(job.completed_at.is_some());

        // Terminal states reject further transitions
        assert!(job.start().is_err());
        assert!(job.fail("late".to_string()).is_err());
    }

    #[test]
    fn cannot_complete_before_start() {
        let mut job = Job::new(vec!["a.com".to_string()]);
        assert!(job.complete().is_err());
        assert!(job.fail("x".to_string()).is_err());
    }

    #[test]
    fn fail_records_reason() {
        let mut job = Job::new(vec!["a.com".to_string()]);
        job.start().expect("queued -> processing");
        job.fail("worker exploded".to_string()).expect("fail");
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.error.as_deref(), Some("worker exploded"));
    }

    #[test]
    fn progress_is_monotonic_and_capped() {
        let mut job = Job::new(vec!["a.com".to_string(), "b.com".to_string()]);
        job.record_progress();
        job.record_progress();
        job.record_progress();
        assert_eq!(job.processed_domains, 2);
    }
}
