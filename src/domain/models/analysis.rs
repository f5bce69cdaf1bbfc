// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 布尔标志的对外表示
///
/// 接口沿用历史上的"Yes"/"No"字符串格式
pub fn yes_no(value: bool) -> String {
    if value { "Yes" } else { "No" }.to_string()
}

/// 联系页链接
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContactPage {
    /// 联系页绝对URL
    pub url: String,
    /// 链接显示文本
    pub link_text: String,
}

/// 域名分析报告
///
/// 表示对单个域名的一次完整分析结果，构造后不可变，
/// 不会跨域名合并。每个请求的域名总会产生恰好一条报告，
/// 失败以`status`/`error`字段表达而不是抛出错误。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// 被分析的域名（按请求原样回显）
    pub domain: String,
    /// 识别出的建站平台
    pub platform: String,
    /// 网站用途分类
    pub purpose: String,
    /// 最终URL是否为HTTPS
    pub is_https: String,
    /// 是否带有HSTS响应头
    #[serde(rename = "hasHSTS")]
    pub has_hsts: String,
    /// 是否带有CSP响应头
    #[serde(rename = "hasCSP")]
    pub has_csp: String,
    /// 是否带有X-Frame-Options响应头
    pub has_x_frame_options: String,
    pub has_title: String,
    pub title_length: usize,
    pub title_optimal: String,
    pub has_description: String,
    pub description_length: usize,
    pub description_optimal: String,
    pub has_h1: String,
    pub h1_count: usize,
    pub has_h2: String,
    pub has_viewport: String,
    pub has_canonical: String,
    pub has_robots: String,
    pub has_structured_data: String,
    pub has_open_graph: String,
    pub has_twitter_card: String,
    pub has_lazy_loading: String,
    pub has_preload: String,
    pub has_alt_tags: String,
    pub has_lang: String,
    /// 发现的邮箱，按评分降序，最多5个
    pub emails: Vec<String>,
    pub email_count: usize,
    /// 发现的电话号码，最多2个
    pub phones: Vec<String>,
    pub phone_count: usize,
    /// 首页上发现的联系页链接
    pub contact_pages: Vec<ContactPage>,
    pub contact_page_count: usize,
    pub has_contact_page: String,
    /// 各平台的社交链接
    pub social_links: HashMap<String, Vec<String>>,
    pub total_social_links: usize,
    pub has_facebook: String,
    pub has_twitter: String,
    pub has_linkedin: String,
    pub has_instagram: String,
    pub has_youtube: String,
    pub has_pinterest: String,
    pub has_tiktok: String,
    pub has_whatsapp: String,
    pub seo_score: u32,
    pub seo_grade: String,
    /// 人类可读的分析状态
    pub status: String,
    /// 分析完成时间（ISO 8601）
    pub analyzed_at: String,
    /// 失败原因，仅失败路径填充
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AnalysisReport {
    /// 构造错误报告
    ///
    /// 所有失败路径都产出一条字段完整的报告，错误作为数据而非异常传播
    ///
    /// # 参数
    ///
    /// * `domain` - 被分析的域名
    /// * `status` - 状态描述（如"Error"、"Analysis Failed"）
    /// * `error` - 错误消息
    pub fn error_report(domain: &str, status: &str, error: String) -> Self {
        Self {
            domain: domain.to_string(),
            platform: "Error".to_string(),
            purpose: "Error".to_string(),
            is_https: yes_no(false),
            has_hsts: yes_no(false),
            has_csp: yes_no(false),
            has_x_frame_options: yes_no(false),
            has_title: yes_no(false),
            title_length: 0,
            title_optimal: yes_no(false),
            has_description: yes_no(false),
            description_length: 0,
            description_optimal: yes_no(false),
            has_h1: yes_no(false),
            h1_count: 0,
            has_h2: yes_no(false),
            has_viewport: yes_no(false),
            has_canonical: yes_no(false),
            has_robots: yes_no(false),
            has_structured_data: yes_no(false),
            has_open_graph: yes_no(false),
            has_twitter_card: yes_no(false),
            has_lazy_loading: yes_no(false),
            has_preload: yes_no(false),
            has_alt_tags: yes_no(false),
            has_lang: yes_no(false),
            emails: Vec::new(),
            email_count: 0,
            phones: Vec::new(),
            phone_count: 0,
            contact_pages: Vec::new(),
            contact_page_count: 0,
            has_contact_page: yes_no(false),
            social_links: HashMap::new(),
            total_social_links: 0,
            has_facebook: yes_no(false),
            has_twitter: yes_no(false),
            has_linkedin: yes_no(false),
            has_instagram: yes_no(false),
            has_youtube: yes_no(false),
            has_pinterest: yes_no(false),
            has_tiktok: yes_no(false),
            has_whatsapp: yes_no(false),
            seo_score: 0,
            seo_grade: "F".to_string(),
            status: status.to_string(),
            analyzed_at: Utc::now().to_rfc3339(),
            error: Some(error),
        }
    }
}
