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

use crate::domain::models::analysis::ContactPage;
use crate::domain::services::email_extractor::EmailExtractor;
use crate::utils::text_decode;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

/// 联系页关键词，命中链接文本即视为联系链接
const CONTACT_KEYWORDS: &[&str] = &[
    "contact",
    "contact us",
    "contact-us",
    "get in touch",
    "reach out",
    "connect",
    "inquiry",
    "support",
    "help",
];

/// 常见联系页路径，发现的链接之外的保底猜测
const CONTACT_PATHS: &[&str] = &[
    "/contact",
    "/contact/",
    "/contact-us",
    "/contact-us/",
    "/get-in-touch",
    "/reach-out",
    "/about/contact",
    "/pages/contact",
];

/// 从首页标记中发现联系页链接
///
/// 扫描所有锚元素，href含"contact"或链接文本命中关键词的视为
/// 联系链接；跳过mailto/tel/javascript和锚点链接；相对地址基于
/// 最终URL解析为绝对地址；按去除尾部斜杠后的URL去重。
///
/// # 参数
///
/// * `html` - 首页标记文本
/// * `base_url` - 抓取后的最终URL
///
/// # 返回值
///
/// 发现顺序的联系页链接列表
pub fn extract_contact_pages(html: &str, base_url: &str) -> Vec<ContactPage> {
    let document = Html::parse_document(html);
    let selector = match Selector::parse("a[href]") {
        Ok(selector) => selector,
        Err(_) => return Vec::new(),
    };
    let base = Url::parse(base_url).ok();

    let mut seen = HashSet::new();
    let mut pages = Vec::new();

    for element in document.select(&selector) {
        let href = match element.value().attr("href") {
            Some(href) => href.trim(),
            None => continue,
        };
        let text = element.text().collect::<Vec<_>>().join(" ").trim().to_string();

        let href_lower = href.to_lowercase();
        let text_lower = text.to_lowercase();
        let is_contact = href_lower.contains("contact")
            || CONTACT_KEYWORDS
                .iter()
                .any(|keyword| text_lower.contains(keyword));
        if !is_contact {
            continue;
        }
        if ["mailto:", "tel:", "javascript:", "#"]
            .iter()
            .any(|skip| href.contains(skip))
        {
            continue;
        }

        let full_url = if href.starts_with("http://") || href.starts_with("https://") {
            href.to_string()
        } else if let Some(base) = &base {
            match base.join(href) {
                Ok(resolved) => resolved.to_string(),
                Err(_) => continue,
            }
        } else {
            continue;
        };

        let normalized = full_url.trim_end_matches('/').to_string();
        if seen.insert(normalized) {
            pages.push(ContactPage {
                url: full_url,
                link_text: text,
            });
        }
    }

    pages
}

/// 联系页回退解析器
///
/// 首页没有邮箱时，依次尝试候选联系页：先按发现顺序使用首页上的
/// 联系链接，再补上两种协议下的常见路径猜测。逐个顺序抓取，单个
/// 候选失败只记录并继续；第一个返回200且提取到邮箱的候选即终止。
pub struct ContactPageResolver {
    extractor: Arc<EmailExtractor>,
}

impl ContactPageResolver {
    /// 创建新的联系页解析器实例
    ///
    /// # 参数
    ///
    /// * `extractor` - 邮箱提取器
    pub fn new(extractor: Arc<EmailExtractor>) -> Self {
        Self { extractor }
    }

    /// 从联系页提取邮箱
    ///
    /// # 参数
    ///
    /// * `client` - HTTP客户端
    /// * `domain` - 裸域名
    /// * `timeout` - 单次请求超时
    /// * `discovered` - 首页上发现的联系链接
    /// * `priority_rules` - 可选的邮箱优先规则
    ///
    /// # 返回值
    ///
    /// 去重后的邮箱列表（顺序不保证）；没有可用候选时为空
    pub async fn resolve(
        &self,
        client: &Client,
        domain: &str,
        timeout: Duration,
        discovered: &[ContactPage],
        priority_rules: Option<&[String]>,
    ) -> Vec<String> {
        let mut candidates: Vec<String> = discovered.iter().map(|page| page.url.clone()).collect();
        for scheme in ["https", "http"] {
            for path in CONTACT_PATHS {
                let guess = format!("{}://{}{}", scheme, domain, path);
                if !candidates.contains(&guess) {
                    candidates.push(guess);
                }
            }
        }

        for candidate in candidates {
            let response = match client
                .get(&candidate)
                .headers(plain_headers())
                .timeout(timeout)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    debug!("Failed to fetch contact page {}: {}", candidate, e);
                    continue;
                }
            };

            if response.status().as_u16() != 200 {
                debug!(
                    "Contact page returned {}: {}",
                    response.status().as_u16(),
                    candidate
                );
                continue;
            }

            let body = match response.bytes().await {
                Ok(body) => body,
                Err(e) => {
                    debug!("Failed to read contact page {}: {}", candidate, e);
                    continue;
                }
            };

            let content = text_decode::decode_body(&body);
            let emails = self.extractor.extract(&content, priority_rules);
            if !emails.is_empty() {
                info!(
                    "Found {} emails on contact page {}",
                    emails.len(),
                    candidate
                );
                let unique: HashSet<String> = emails.into_iter().collect();
                return unique.into_iter().collect();
            }
        }

        Vec::new()
    }
}

fn plain_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        USER_AGENT,
        HeaderValue::from_static(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
        ),
    );
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers
}
