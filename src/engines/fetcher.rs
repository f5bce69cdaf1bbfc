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

use crate::engines::rate_limiter::RateLimiter;
use crate::engines::EngineError;
use crate::utils::text_decode;
use metrics::counter;
use rand::Rng;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, USER_AGENT};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
];

/// 抓取结果页面
///
/// 一次成功抓取产生的不可变快照，由发起抓取的调用方持有
#[derive(Debug, Clone)]
pub struct FetchPage {
    /// 解码后的页面文本
    pub content: String,
    /// HTTP状态码
    pub status_code: u16,
    /// 响应头（键为小写）
    pub headers: HashMap<String, String>,
    /// 重定向后的最终URL
    pub final_url: String,
    /// 最终URL是否为HTTPS
    pub is_https: bool,
}

/// 页面抓取引擎
///
/// 对裸域名按HTTPS→HTTP的顺序逐个尝试候选URL，首个建立成功的
/// 连接即胜出；HTTP错误状态码也算抓取成功，只有连接/超时/协议
/// 级错误才会落到下一个候选。每次尝试都持有限流许可。
pub struct Fetcher {
    limiter: Arc<RateLimiter>,
}

impl Fetcher {
    /// 创建新的抓取引擎实例
    ///
    /// # 参数
    ///
    /// * `limiter` - 出站请求限流器
    pub fn new(limiter: Arc<RateLimiter>) -> Self {
        Self { limiter }
    }

    /// 抓取一个域名的页面
    ///
    /// # 参数
    ///
    /// * `client` - 会话池分发的HTTP客户端
    /// * `domain` - 域名或完整URL
    /// * `timeout` - 单次请求超时
    ///
    /// # 返回值
    ///
    /// * `Ok(FetchPage)` - 首个成功候选的页面
    /// * `Err(EngineError)` - 所有候选URL都失败，携带最后一次错误
    pub async fn fetch(
        &self,
        client: &Client,
        domain: &str,
        timeout: Duration,
    ) -> Result<FetchPage, EngineError> {
        let headers = browser_headers();
        let mut last_error: Option<String> = None;

        for url in candidate_urls(domain) {
            counter!("scoutrs_fetch_attempts_total").increment(1);
            let _permit = self.limiter.acquire().await;

            let response = match client
                .get(&url)
                .headers(headers.clone())
                .timeout(timeout)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    warn!("Error accessing {}: {}", url, e);
                    last_error = Some(format!("Error for {}: {}", url, e));
                    continue;
                }
            };

            // Any HTTP status counts as success; only transport-level
            // failures fall through to the next candidate.
            let status_code = response.status().as_u16();
            let final_url = response.url().clone();
            let is_https = final_url.scheme() == "https";

            let mut response_headers = HashMap::new();
            for (name, value) in response.headers() {
                if let Ok(value) = value.to_str() {
                    response_headers.insert(name.as_str().to_string(), value.to_string());
                }
            }

            let body = match response.bytes().await {
                Ok(body) => body,
                Err(e) => {
                    warn!("Error reading body from {}: {}", url, e);
                    last_error = Some(format!("Read error for {}: {}", url, e));
                    continue;
                }
            };

            counter!("scoutrs_fetch_success_total").increment(1);
            return Ok(FetchPage {
                content: text_decode::decode_body(&body),
                status_code,
                headers: response_headers,
                final_url: final_url.to_string(),
                is_https,
            });
        }

        counter!("scoutrs_fetch_failed_total").increment(1);
        Err(EngineError::AllCandidatesFailed(last_error.unwrap_or_else(
            || format!("Failed to access {} with any protocol", domain),
        )))
    }
}

/// 构造候选URL列表
///
/// 已带协议的输入按原样尝试，裸域名先HTTPS后HTTP
fn candidate_urls(domain: &str) -> Vec<String> {
    if domain.starts_with("http://") || domain.starts_with("https://") {
        vec![domain.to_string()]
    } else {
        vec![format!("https://{}", domain), format!("http://{}", domain)]
    }
}

/// 构造拟真浏览器请求头
///
/// 降低最简单的反爬拦截概率；Accept-Encoding由客户端自身管理
fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    let agent = USER_AGENTS[rand::rng().random_range(0..USER_AGENTS.len())];
    headers.insert(USER_AGENT, HeaderValue::from_static(agent));
    headers.insert(
        ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers.insert("DNT", HeaderValue::from_static("1"));
    headers.insert("Upgrade-Insecure-Requests", HeaderValue::from_static("1"));
    headers
}
