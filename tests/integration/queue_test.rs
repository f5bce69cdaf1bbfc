// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::helpers::{build_analyzer, test_settings};
use scoutrs::domain::models::job::{Job, JobStatus};
use scoutrs::queue::job_queue::JobQueue;
use scoutrs::workers::manager::WorkerManager;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use uuid::Uuid;

/// 轮询等待作业进入终态
async fn wait_for_terminal(queue: &JobQueue, job_id: &Uuid) -> Job {
    let deadline = Instant::now() + Duration::from_secs(30);
    loop {
        if let Some(job) = queue.job(job_id) {
            if matches!(job.status, JobStatus::Completed | JobStatus::Failed) {
                return job;
            }
        }
        assert!(Instant::now() < deadline, "job {} never finished", job_id);
        sleep(Duration::from_millis(50)).await;
    }
}

// Nothing listens on port 1, so every domain resolves quickly to an
// error report without leaving the machine.
fn unreachable_domains(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("127.0.0.{}:1", i + 1)).collect()
}

#[tokio::test]
async fn job_runs_to_completion_with_one_report_per_domain() {
    let settings = test_settings();
    let queue = Arc::new(JobQueue::new(100));
    let mut manager = WorkerManager::new(queue.clone(), build_analyzer(&settings));
    manager.start_workers(2);

    let domains = unreachable_domains(4);
    let job_id = queue
        .submit(domains.clone(), 4, Duration::from_secs(2), 1, None)
        .expect("submit");

    let job = wait_for_terminal(&queue, &job_id).await;
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.processed_domains, domains.len());
    assert_eq!(job.results.len(), domains.len());
    assert!(job.started_at.is_some());
    assert!(job.completed_at.is_some());
    // Every domain produced a well-formed error report
    for report in &job.results {
        assert_eq!(report.status, "Error");
        assert!(report.error.is_some());
    }

    let stats = queue.stats();
    assert_eq!(stats.jobs_processed, 1);
    assert_eq!(stats.total_domains_processed, domains.len() as u64);
    assert!(stats.average_processing_time > 0.0);

    manager.shutdown().await;
}

#[tokio::test]
async fn high_priority_job_is_processed_first_by_an_idle_worker() {
    let settings = test_settings();
    let queue = Arc::new(JobQueue::new(100));

    // Submit before any worker starts so dequeue order is observable
    let fifo_id = queue
        .submit(unreachable_domains(2), 2, Duration::from_secs(2), 1, None)
        .expect("submit fifo");
    let priority_id = queue
        .submit(unreachable_domains(2), 2, Duration::from_secs(2), 3, None)
        .expect("submit priority");

    let mut manager = WorkerManager::new(queue.clone(), build_analyzer(&settings));
    manager.start_workers(1);

    let priority_job = wait_for_terminal(&queue, &priority_id).await;
    let fifo_job = wait_for_terminal(&queue, &fifo_id).await;

    let priority_started = priority_job.started_at.expect("priority started");
    let fifo_started = fifo_job.started_at.expect("fifo started");
    assert!(
        priority_started < fifo_started,
        "priority job must be claimed before the earlier fifo job"
    );

    manager.shutdown().await;
}

#[tokio::test]
async fn shutdown_cancels_workers_and_returns() {
    let settings = test_settings();
    let queue = Arc::new(JobQueue::new(100));
    let mut manager = WorkerManager::new(queue.clone(), build_analyzer(&settings));
    manager.start_workers(3);
    assert_eq!(manager.active_workers(), 3);

    manager.shutdown().await;
    assert_eq!(manager.active_workers(), 0);
}
