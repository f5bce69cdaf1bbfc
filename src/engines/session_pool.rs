// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::PoolSettings;
use crate::engines::EngineError;
use parking_lot::Mutex;
use reqwest::redirect::Policy;
use reqwest::Client;
use std::time::Duration;
use tracing::info;

/// HTTP会话池
///
/// 持有固定数量的长连接HTTP客户端，按轮询方式分发，在首次使用时
/// 惰性构建。每个客户端启用连接复用并限制单主机连接数，用于在大量
/// 短请求之间摊销TLS/DNS建立成本。
pub struct SessionPool {
    settings: PoolSettings,
    inner: Mutex<PoolInner>,
}

struct PoolInner {
    clients: Vec<Client>,
    cursor: usize,
}

impl SessionPool {
    /// 创建新的会话池实例
    ///
    /// # 参数
    ///
    /// * `settings` - 连接池配置
    ///
    /// # 返回值
    ///
    /// 返回新的会话池实例，客户端在首次获取时才真正构建
    pub fn new(settings: PoolSettings) -> Self {
        Self {
            settings,
            inner: Mutex::new(PoolInner {
                clients: Vec::new(),
                cursor: 0,
            }),
        }
    }

    /// 轮询获取一个HTTP客户端
    ///
    /// # 返回值
    ///
    /// * `Ok(Client)` - 池中的一个客户端句柄
    /// * `Err(EngineError)` - 客户端构建失败
    pub fn session(&self) -> Result<Client, EngineError> {
        let mut inner = self.inner.lock();

        if inner.clients.is_empty() {
            for _ in 0..self.settings.size {
                inner.clients.push(self.build_client()?);
            }
            info!("Session pool initialized with {} clients", self.settings.size);
        }

        let client = inner.clients[inner.cursor].clone();
        inner.cursor = (inner.cursor + 1) % inner.clients.len();
        Ok(client)
    }

    fn build_client(&self) -> Result<Client, EngineError> {
        // Certificate validation is deliberately disabled: the service
        // prioritizes reachability of misconfigured sites over TLS trust.
        Client::builder()
            .pool_max_idle_per_host(self.settings.max_idle_per_host)
            .pool_idle_timeout(Duration::from_secs(self.settings.idle_timeout))
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .redirect(Policy::limited(3))
            .danger_accept_invalid_certs(true)
            .cookie_store(true)
            .build()
            .map_err(EngineError::RequestFailed)
    }

    /// 关闭并清空所有客户端
    ///
    /// 应在进程关闭时调用一次，之后不应再发起抓取
    pub fn close_all(&self) {
        let mut inner = self.inner.lock();
        inner.clients.clear();
        inner.cursor = 0;
        info!("Session pool closed");
    }

    /// 配置的池大小
    pub fn size(&self) -> usize {
        self.settings.size
    }

    /// 当前已构建的客户端数量（用于监控）
    pub fn active_sessions(&self) -> usize {
        self.inner.lock().clients.len()
    }

    /// 当前轮询游标位置（用于监控）
    pub fn cursor(&self) -> usize {
        self.inner.lock().cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(size: usize) -> SessionPool {
        SessionPool::new(PoolSettings {
            size,
            max_idle_per_host: 4,
            idle_timeout: 30,
        })
    }

    #[test]
    fn lazily_builds_on_first_use() {
        let pool = pool(3);
        assert_eq!(pool.active_sessions(), 0);

        pool.session().expect("client should build");
        assert_eq!(pool.active_sessions(), 3);
    }

    #[test]
    fn hands_out_sessions_round_robin() {
        let pool = pool(3);
        pool.session().expect("client should build");
        assert_eq!(pool.cursor(), 1);
        pool.session().expect("client should build");
        pool.session().expect("client should build");
        assert_eq!(pool.cursor(), 0);
        pool.session().expect("client should build");
        assert_eq!(pool.cursor(), 1);
    }

    #[test]
    fn close_all_clears_clients() {
        let pool = pool(2);
        pool.session().expect("client should build");
        assert_eq!(pool.active_sessions(), 2);

        pool.close_all();
        assert_eq!(pool.active_sessions(), 0);
        assert_eq!(pool.cursor(), 0);
    }
}
