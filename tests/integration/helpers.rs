// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{Extension, Router};
use scoutrs::config::settings::{
    AnalysisSettings, PoolSettings, QueueSettings, RateLimitingSettings, ServerSettings, Settings,
};
use scoutrs::domain::services::analyzer::DomainAnalyzer;
use scoutrs::domain::services::contact_pages::ContactPageResolver;
use scoutrs::domain::services::email_extractor::EmailExtractor;
use scoutrs::domain::services::email_rules::EmailRules;
use scoutrs::domain::services::email_scorer::EmailScorer;
use scoutrs::engines::fetcher::Fetcher;
use scoutrs::engines::rate_limiter::RateLimiter;
use scoutrs::engines::session_pool::SessionPool;
use scoutrs::presentation::routes;
use scoutrs::queue::job_queue::JobQueue;
use scoutrs::workers::manager::WorkerManager;
use std::sync::Arc;
use tokio::sync::Mutex;

/// 测试用配置：无最小延迟、小池子，保证用例快速
pub fn test_settings() -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 0,
            metrics_port: 0,
        },
        rate_limiting: RateLimitingSettings {
            max_concurrent: 20,
            min_delay_ms: 0,
            burst_limit: 200,
        },
        pool: PoolSettings {
            size: 2,
            max_idle_per_host: 4,
            idle_timeout: 30,
        },
        analysis: AnalysisSettings {
            max_batch_size: 50,
            default_timeout: 5,
            max_emails: 5,
            max_phones: 2,
        },
        queue: QueueSettings {
            max_workers: 2,
            max_queue_size: 100,
        },
    }
}

pub fn build_limiter(settings: &Settings) -> Arc<RateLimiter> {
    Arc::new(RateLimiter::new(&settings.rate_limiting))
}

pub fn build_pool(settings: &Settings) -> Arc<SessionPool> {
    Arc::new(SessionPool::new(settings.pool.clone()))
}

pub fn build_analyzer(settings: &Settings) -> Arc<DomainAnalyzer> {
    let pool = build_pool(settings);
    let limiter = build_limiter(settings);
    let extractor = Arc::new(EmailExtractor::new(
        EmailRules::new(),
        EmailScorer,
        settings.analysis.max_emails,
    ));
    Arc::new(DomainAnalyzer::new(
        pool,
        Fetcher::new(limiter),
        extractor.clone(),
        ContactPageResolver::new(extractor),
        settings.analysis.max_phones,
    ))
}

/// 组装与main一致的完整应用，返回路由与队列句柄
pub fn build_app(worker_count: usize) -> (Router, Arc<JobQueue>) {
    let settings = Arc::new(test_settings());
    let limiter = build_limiter(&settings);
    let pool = build_pool(&settings);
    let analyzer = build_analyzer(&settings);
    let queue = Arc::new(JobQueue::new(settings.queue.max_queue_size));

    let mut manager = WorkerManager::new(queue.clone(), analyzer.clone());
    manager.start_workers(worker_count);
    let manager = Arc::new(Mutex::new(manager));

    let app = routes::routes()
        .layer(Extension(settings))
        .layer(Extension(analyzer))
        .layer(Extension(queue.clone()))
        .layer(Extension(limiter))
        .layer(Extension(pool))
        .layer(Extension(manager));

    (app, queue)
}
