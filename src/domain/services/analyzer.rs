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

use crate::domain::models::analysis::{yes_no, AnalysisReport};
use crate::domain::services::contact_pages::{extract_contact_pages, ContactPageResolver};
use crate::domain::services::email_extractor::EmailExtractor;
use crate::domain::services::phone_extractor::extract_phones;
use crate::domain::services::platform::detect_platform;
use crate::domain::services::seo_analyzer::{analyze_seo, seo_score};
use crate::domain::services::social_extractor::extract_social_links;
use crate::engines::fetcher::Fetcher;
use crate::engines::session_pool::SessionPool;
use chrono::Utc;
use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// 域名分析器
///
/// 编排抓取引擎和各提取器，对单个域名产出一条完整的分析报告。
/// 任何失败路径都会转换为status/error字段填充的报告，分析调用
/// 永远不会向调用方抛出错误。
pub struct DomainAnalyzer {
    pool: Arc<SessionPool>,
    fetcher: Fetcher,
    extractor: Arc<EmailExtractor>,
    resolver: ContactPageResolver,
    max_phones: usize,
}

impl DomainAnalyzer {
    /// 创建新的域名分析器实例
    ///
    /// # 参数
    ///
    /// * `pool` - HTTP会话池
    /// * `fetcher` - 页面抓取引擎
    /// * `extractor` - 邮箱提取器
    /// * `resolver` - 联系页回退解析器
    /// * `max_phones` - 返回的电话数量上限
    pub fn new(
        pool: Arc<SessionPool>,
        fetcher: Fetcher,
        extractor: Arc<EmailExtractor>,
        resolver: ContactPageResolver,
        max_phones: usize,
    ) -> Self {
        Self {
            pool,
            fetcher,
            extractor,
            resolver,
            max_phones,
        }
    }

    /// 分析一个域名
    ///
    /// 抓取 → 抓取失败则短路为错误报告 → 平台识别、安全头检查、
    /// SEO分析、邮箱/电话/联系链接/社交链接提取 → 首页无邮箱时
    /// 回退到联系页 → 组装最终报告
    ///
    /// # 参数
    ///
    /// * `domain` - 域名或完整URL
    /// * `timeout` - 单次请求超时
    /// * `priority_rules` - 可选的邮箱优先规则
    ///
    /// # 返回值
    ///
    /// 该域名的分析报告，永不失败
    pub async fn analyze(
        &self,
        domain: &str,
        timeout: Duration,
        priority_rules: Option<&[String]>,
    ) -> AnalysisReport {
        counter!("scoutrs_analyses_total").increment(1);

        let client = match self.pool.session() {
            Ok(client) => client,
            Err(e) => return AnalysisReport::error_report(domain, "Error", e.to_string()),
        };

        let page = match self.fetcher.fetch(&client, domain, timeout).await {
            Ok(page) => page,
            Err(e) => {
                counter!("scoutrs_analyses_failed_total").increment(1);
                return AnalysisReport::error_report(domain, "Error", e.to_string());
            }
        };

        let platform = detect_platform(&page.content);
        let has_hsts = page.headers.contains_key("strict-transport-security");
        let has_csp = page.headers.contains_key("content-security-policy");
        let has_x_frame_options = page.headers.contains_key("x-frame-options");

        let seo = analyze_seo(&page.content);
        let (seo_score_value, seo_grade) = seo_score(&seo);

        let mut emails = self.extractor.extract(&page.content, priority_rules);
        let phones = extract_phones(&page.content, self.max_phones);
        let contact_pages = extract_contact_pages(&page.content, &page.final_url);

        if emails.is_empty() {
            info!(
                "No emails found on homepage of {}, trying contact pages",
                domain
            );
            let contact_emails = self
                .resolver
                .resolve(&client, domain, timeout, &contact_pages, priority_rules)
                .await;
            emails.extend(contact_emails);
        }

        let social_links = extract_social_links(&page.content);
        let total_social_links = social_links.values().map(Vec::len).sum();
        let has_platform_links = |platform: &str| {
            social_links
                .get(platform)
                .is_some_and(|links| !links.is_empty())
        };

        let status = if page.status_code == 200 {
            "Active".to_string()
        } else {
            format!("Not Accessible ({})", page.status_code)
        };

        AnalysisReport {
            domain: domain.to_string(),
            platform: platform.to_string(),
            purpose: "General".to_string(),
            is_https: yes_no(page.is_https),
            has_hsts: yes_no(has_hsts),
            has_csp: yes_no(has_csp),
            has_x_frame_options: yes_no(has_x_frame_options),
            has_title: yes_no(seo.has_title),
            title_length: seo.title_length,
            title_optimal: yes_no(seo.title_optimal),
            has_description: yes_no(seo.has_description),
            description_length: seo.description_length,
            description_optimal: yes_no(seo.description_optimal),
            has_h1: yes_no(seo.has_h1),
            h1_count: seo.h1_count,
            has_h2: yes_no(seo.has_h2),
            has_viewport: yes_no(seo.has_viewport),
            has_canonical: yes_no(seo.has_canonical),
            has_robots: yes_no(seo.has_robots),
            has_structured_data: yes_no(seo.has_structured_data),
            has_open_graph: yes_no(seo.has_open_graph),
            has_twitter_card: yes_no(seo.has_twitter_card),
            has_lazy_loading: yes_no(seo.has_lazy_loading),
            has_preload: yes_no(seo.has_preload),
            has_alt_tags: yes_no(seo.has_alt_tags),
            has_lang: yes_no(seo.has_lang),
            email_count: emails.len(),
            emails,
            phone_count: phones.len(),
            phones,
            contact_page_count: contact_pages.len(),
            has_contact_page: yes_no(!contact_pages.is_empty()),
            contact_pages,
            total_social_links,
            has_facebook: yes_no(has_platform_links("facebook")),
            has_twitter: yes_no(has_platform_links("twitter")),
            has_linkedin: yes_no(has_platform_links("linkedin")),
            has_instagram: yes_no(has_platform_links("instagram")),
            has_youtube: yes_no(has_platform_links("youtube")),
            has_pinterest: yes_no(has_platform_links("pinterest")),
            has_tiktok: yes_no(has_platform_links("tiktok")),
            has_whatsapp: yes_no(has_platform_links("whatsapp")),
            social_links,
            seo_score: seo_score_value,
            seo_grade: seo_grade.to_string(),
            status,
            analyzed_at: Utc::now().to_rfc3339(),
            error: None,
        }
    }
}
