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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含服务器、限流、连接池、分析和队列等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 出站请求限流配置
    pub rate_limiting: RateLimitingSettings,
    /// HTTP连接池配置
    pub pool: PoolSettings,
    /// 分析流程配置
    pub analysis: AnalysisSettings,
    /// 作业队列配置
    pub queue: QueueSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
    /// Prometheus导出器监听端口
    pub metrics_port: u16,
}

/// 出站限流配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitingSettings {
    /// 全局最大并发出站请求数
    pub max_concurrent: usize,
    /// 相邻请求之间的最小间隔（毫秒）
    pub min_delay_ms: u64,
    /// 滑动1秒窗口内允许的最大请求数
    pub burst_limit: usize,
}

/// HTTP连接池配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct PoolSettings {
    /// 池中长连接客户端的数量
    pub size: usize,
    /// 每个主机允许的最大空闲连接数
    pub max_idle_per_host: usize,
    /// 空闲连接保持时间（秒）
    pub idle_timeout: u64,
}

/// 分析流程配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisSettings {
    /// 同步分析接口允许的最大批量大小
    pub max_batch_size: usize,
    /// 默认抓取超时时间（秒）
    pub default_timeout: u64,
    /// 单个结果返回的邮箱数量上限
    pub max_emails: usize,
    /// 单个结果返回的电话数量上限
    pub max_phones: usize,
}

/// 作业队列配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct QueueSettings {
    /// 后台工作器数量
    pub max_workers: usize,
    /// FIFO队列容量上限
    pub max_queue_size: usize,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Start with default settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("server.metrics_port", 9000)?
            // Default outbound rate limiting settings
            .set_default("rate_limiting.max_concurrent", 20)?
            .set_default("rate_limiting.min_delay_ms", 100)?
            .set_default("rate_limiting.burst_limit", 50)?
            // Default connection pool settings
            .set_default("pool.size", 5)?
            .set_default("pool.max_idle_per_host", 20)?
            .set_default("pool.idle_timeout", 30)?
            // Default analysis settings
            .set_default("analysis.max_batch_size", 50)?
            .set_default("analysis.default_timeout", 15)?
            .set_default("analysis.max_emails", 5)?
            .set_default("analysis.max_phones", 2)?
            // Default queue settings
            .set_default("queue.max_workers", 10)?
            .set_default("queue.max_queue_size", 1000)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("SCOUTRS").separator("__"));

        builder.build()?.try_deserialize()
    }
}
