// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;

static TITLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<title[^>]*>([^<]*)</title>").expect("title pattern"));
static DESCRIPTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<meta[^>]*name=["']description["'][^>]*content=["']([^"']*)["']"#)
        .expect("description pattern")
});
static H1_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<h1[^>]*>").expect("h1 pattern"));
static H2_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<h2[^>]*>").expect("h2 pattern"));
static VIEWPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)name=["']viewport["']"#).expect("viewport pattern"));
static CANONICAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)rel=["']canonical["']"#).expect("canonical pattern"));
static ROBOTS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)name=["']robots["']"#).expect("robots pattern"));
static STRUCTURED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)application/ld\+json|schema\.org").expect("structured pattern"));
static OPEN_GRAPH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)property=["']og:"#).expect("open graph pattern"));
static TWITTER_CARD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)name=["']twitter:"#).expect("twitter card pattern"));
static LAZY_LOADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)loading=["']lazy["']"#).expect("lazy loading pattern"));
static PRELOAD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)rel=["']preload["']"#).expect("preload pattern"));
static ALT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)alt=").expect("alt pattern"));
static LANG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)lang=").expect("lang pattern"));

/// SEO要素检查结果
#[derive(Debug, Clone, Default)]
pub struct SeoAnalysis {
    pub has_title: bool,
    pub title_length: usize,
    pub title_optimal: bool,
    pub has_description: bool,
    pub description_length: usize,
    pub description_optimal: bool,
    pub has_h1: bool,
    pub h1_count: usize,
    pub has_h2: bool,
    pub has_viewport: bool,
    pub has_canonical: bool,
    pub has_robots: bool,
    pub has_structured_data: bool,
    pub has_open_graph: bool,
    pub has_twitter_card: bool,
    pub has_lazy_loading: bool,
    pub has_preload: bool,
    pub has_alt_tags: bool,
    pub has_lang: bool,
}

/// 分析页面的SEO要素
///
/// 全部为对标记文本的存在性检查；标题长度30-60、描述长度120-160
/// 视为理想区间
pub fn analyze_seo(html: &str) -> SeoAnalysis {
    let title = TITLE_RE
        .captures(html)
        .map(|c| c[1].trim().to_string())
        .unwrap_or_default();
    let description = DESCRIPTION_RE
        .captures(html)
        .map(|c| c[1].trim().to_string())
        .unwrap_or_default();

    let has_title = TITLE_RE.is_match(html);
    let has_description = DESCRIPTION_RE.is_match(html);
    let title_length = title.chars().count();
    let description_length = description.chars().count();
    let h1_count = H1_RE.find_iter(html).count();

    SeoAnalysis {
        has_title,
        title_length,
        title_optimal: (30..=60).contains(&title_length),
        has_description,
        description_length,
        description_optimal: (120..=160).contains(&description_length),
        has_h1: h1_count > 0,
        h1_count,
        has_h2: H2_RE.is_match(html),
        has_viewport: VIEWPORT_RE.is_match(html),
        has_canonical: CANONICAL_RE.is_match(html),
        has_robots: ROBOTS_RE.is_match(html),
        has_structured_data: STRUCTURED_RE.is_match(html),
        has_open_graph: OPEN_GRAPH_RE.is_match(html),
        has_twitter_card: TWITTER_CARD_RE.is_match(html),
        has_lazy_loading: LAZY_LOADING_RE.is_match(html),
        has_preload: PRELOAD_RE.is_match(html),
        has_alt_tags: ALT_RE.is_match(html),
        has_lang: LANG_RE.is_match(html),
    }
}

/// 计算SEO评分与等级
///
/// # 返回值
///
/// (评分, 等级)，等级按 A≥80 / B≥60 / C≥40 / D 划分
pub fn seo_score(seo: &SeoAnalysis) -> (u32, &'static str) {
    let mut score = 0;

    if seo.has_title {
        score += 15;
    }
    if seo.title_optimal {
        score += 10;
    }
    if seo.has_description {
        score += 15;
    }
    if seo.description_optimal {
        score += 10;
    }
    if seo.has_h1 {
        score += 10;
    }
    if seo.h1_count == 1 {
        score += 5;
    }
    if seo.has_h2 {
        score += 5;
    }
    if seo.has_canonical {
        score += 5;
    }
    if seo.has_open_graph {
        score += 10;
    }
    if seo.has_twitter_card {
        score += 5;
    }
    if seo.has_structured_data {
        score += 10;
    }

    let grade = if score >= 80 {
        "A"
    } else if score >= 60 {
        "B"
    } else if score >= 40 {
        "C"
    } else {
        "D"
    };
    (score, grade)
}
