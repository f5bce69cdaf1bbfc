// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::RateLimitingSettings;
use std::collections::VecDeque;
use std::time::Duration;
use tokio::sync::{Mutex, Semaphore, SemaphorePermit};
use tokio::time::{sleep, Instant};

/// 出站请求限流器
///
/// 通过计数信号量限制全局并发请求数，并在其上叠加突发控制：
/// 滑动1秒窗口内的请求启动次数不超过burst_limit，相邻请求启动
/// 之间至少间隔min_delay。限流器只会延迟请求，从不拒绝。
pub struct RateLimiter {
    semaphore: Semaphore,
    min_delay: Duration,
    burst_limit: usize,
    max_concurrent: usize,
    /// 最近请求启动时间的滑动窗口，由异步互斥锁保护
    window: Mutex<VecDeque<Instant>>,
}

/// 限流许可
///
/// 持有一个并发槽位，析构时自动归还。包括异常退出路径在内，
/// 槽位总是会被释放。
pub struct RateLimitPermit<'a> {
    _permit: SemaphorePermit<'a>,
}

impl RateLimiter {
    /// 创建新的限流器实例
    ///
    /// # 参数
    ///
    /// * `settings` - 限流配置
    ///
    /// # 返回值
    ///
    /// 返回新的限流器实例
    pub fn new(settings: &RateLimitingSettings) -> Self {
        Self {
            semaphore: Semaphore::new(settings.max_concurrent),
            min_delay: Duration::from_millis(settings.min_delay_ms),
            burst_limit: settings.burst_limit,
            max_concurrent: settings.max_concurrent,
            window: Mutex::new(VecDeque::new()),
        }
    }

    /// 获取一次出站请求许可
    ///
    /// 阻塞直到可以安全发起一次出站请求。先占用并发槽位，再进入
    /// 窗口临界区：清理1秒之前的时间戳，窗口已满则等待最旧的时间戳
    /// 滑出窗口，并保证与上一次请求启动之间的最小间隔。
    ///
    /// # 返回值
    ///
    /// 返回限流许可，析构时归还并发槽位
    pub async fn acquire(&self) -> RateLimitPermit<'_> {
        let permit = self
            .semaphore
            .acquire()
            .await
            .expect("rate limiter semaphore is never closed");

        // Admissions are serialized through the window lock so burst
        // accounting stays exact under concurrency.
        let mut window = self.window.lock().await;
        let now = Instant::now();

        // Prune entries older than the 1-second window
        while let Some(&oldest) = window.front() {
            if now.duration_since(oldest) >= Duration::from_secs(1) {
                window.pop_front();
            } else {
                break;
            }
        }

        // Window full: wait until the oldest entry falls out
        if window.len() >= self.burst_limit {
            if let Some(&oldest) = window.front() {
                let wait = Duration::from_secs(1).saturating_sub(now.duration_since(oldest));
                if !wait.is_zero() {
                    sleep(wait).await;
                }
            }
        }

        // Enforce the minimum spacing between consecutive request starts
        if let Some(&last) = window.back() {
            let since_last = Instant::now().duration_since(last);
            if since_last < self.min_delay {
                sleep(self.min_delay - since_last).await;
            }
        }

        window.push_back(Instant::now());

        RateLimitPermit { _permit: permit }
    }

    /// 当前滑动窗口内的请求数（用于监控）
    pub async fn window_len(&self) -> usize {
        self.window.lock().await.len()
    }

    /// 当前可用的并发槽位数
    pub fn available_slots(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// 配置的最大并发数
    pub fn max_concurrent(&self) -> usize {
        self.max_concurrent
    }

    /// 配置的突发上限
    pub fn burst_limit(&self) -> usize {
        self.burst_limit
    }

    /// 配置的最小请求间隔
    pub fn min_delay(&self) -> Duration {
        self.min_delay
    }
}
