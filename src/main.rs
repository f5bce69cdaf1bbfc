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

use axum::Extension;
use scoutrs::config::settings::Settings;
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
use scoutrs::utils::telemetry;
use scoutrs::workers::manager::WorkerManager;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting scoutrs...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    // Initialize Prometheus Metrics
    scoutrs::infrastructure::metrics::init_metrics(settings.server.metrics_port);

    // 3. Initialize outbound rate limiter and session pool
    let rate_limiter = Arc::new(RateLimiter::new(&settings.rate_limiting));
    let session_pool = Arc::new(SessionPool::new(settings.pool.clone()));
    info!("Rate limiter and session pool initialized");

    // 4. Assemble the analyzer
    let extractor = Arc::new(EmailExtractor::new(
        EmailRules::new(),
        EmailScorer,
        settings.analysis.max_emails,
    ));
    let analyzer = Arc::new(DomainAnalyzer::new(
        session_pool.clone(),
        Fetcher::new(rate_limiter.clone()),
        extractor.clone(),
        ContactPageResolver::new(extractor),
        settings.analysis.max_phones,
    ));
    info!("Domain analyzer initialized");

    // 5. Start the job queue workers
    let queue = Arc::new(JobQueue::new(settings.queue.max_queue_size));
    let mut worker_manager = WorkerManager::new(queue.clone(), analyzer.clone());
    worker_manager.start_workers(settings.queue.max_workers);
    let worker_manager = Arc::new(Mutex::new(worker_manager));

    // 6. Start HTTP server
    let app = routes::routes()
        .layer(Extension(settings.clone()))
        .layer(Extension(analyzer))
        .layer(Extension(queue))
        .layer(Extension(rate_limiter))
        .layer(Extension(session_pool.clone()))
        .layer(Extension(worker_manager.clone()))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // 7. Drain workers and release HTTP clients
    worker_manager.lock().await.shutdown().await;
    session_pool.close_all();
    info!("All resources cleaned up");

    Ok(())
}

/// 等待关闭信号
async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(err) => error!("Unable to listen for shutdown signal: {}", err),
    }
}
