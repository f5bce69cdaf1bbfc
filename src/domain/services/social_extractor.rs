// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

/// 支持的社交平台及其链接形态
const SOCIAL_PATTERNS: &[(&str, &str)] = &[
    (
        "facebook",
        r"(?i)https?://(?:www\.)?(?:facebook\.com|fb\.com)/[a-zA-Z0-9._-]+",
    ),
    (
        "twitter",
        r"(?i)https?://(?:www\.)?(?:twitter\.com|x\.com)/[a-zA-Z0-9._-]+",
    ),
    (
        "linkedin",
        r"(?i)https?://(?:www\.)?linkedin\.com/(?:in|company)/[a-zA-Z0-9._-]+",
    ),
    (
        "instagram",
        r"(?i)https?://(?:www\.)?instagram\.com/[a-zA-Z0-9._-]+",
    ),
    (
        "youtube",
        r"(?i)https?://(?:www\.)?(?:youtube\.com/(?:channel/|user/|c/)?|youtu\.be/)[a-zA-Z0-9._-]+",
    ),
    (
        "pinterest",
        r"(?i)https?://(?:www\.)?pinterest\.com/[a-zA-Z0-9._-]+",
    ),
    (
        "tiktok",
        r"(?i)https?://(?:www\.)?tiktok\.com/@[a-zA-Z0-9._-]+",
    ),
    ("whatsapp", r"(?i)https?://(?:wa\.me|api\.whatsapp\.com)/[0-9]+"),
];

static COMPILED: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    SOCIAL_PATTERNS
        .iter()
        .map(|(platform, pattern)| {
            (
                *platform,
                Regex::new(pattern).expect("social pattern must compile"),
            )
        })
        .collect()
});

/// 提取社交媒体链接
///
/// # 参数
///
/// * `html` - 页面文本
///
/// # 返回值
///
/// 平台名到去重链接列表的映射，每个已知平台都有键
pub fn extract_social_links(html: &str) -> HashMap<String, Vec<String>> {
    let mut links = HashMap::new();

    for (platform, pattern) in COMPILED.iter() {
        let mut seen = HashSet::new();
        let mut urls = Vec::new();
        for found in pattern.find_iter(html) {
            let url = found.as_str().to_string();
            if seen.insert(url.clone()) {
                urls.push(url);
            }
        }
        links.insert(platform.to_string(), urls);
    }

    links
}
