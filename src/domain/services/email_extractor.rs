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

use crate::domain::services::cloudflare;
use crate::domain::services::email_rules::EmailRules;
use crate::domain::services::email_scorer::{EmailScorer, DEFAULT_PRIORITY_RULES};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b[a-zA-Z0-9](?:[a-zA-Z0-9._%-]*[a-zA-Z0-9])?@[a-zA-Z0-9](?:[a-zA-Z0-9.-]*[a-zA-Z0-9])?\.[a-zA-Z]{2,}\b",
    )
    .expect("email pattern must compile")
});

static AT_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\[at\]|\(at\)").expect("at marker pattern must compile"));
static DOT_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\[dot\]|\(dot\)").expect("dot marker pattern must compile"));

static SPACED_AT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\w+)\s{1,2}@\s{1,2}(\w+(?:\.\w+)*)").expect("spaced at pattern must compile")
});
static SPACED_DOT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\w+@\w+)\s{1,2}\.\s{1,2}(\w+)").expect("spaced dot pattern must compile")
});

static TAG_SPLIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([a-zA-Z0-9._%-]+)</[^>]+>@<[^>]+>([a-zA-Z0-9.-]+\.[a-zA-Z]{2,})")
        .expect("tag split pattern must compile")
});
static NESTED_TAGS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"<[^>]*>([a-zA-Z0-9._%-]*)</[^>]*>([&#@.]*)<[^>]*>([a-zA-Z0-9._%-]*)</[^>]*>([&#@.]*)<[^>]*>([a-zA-Z0-9._%-]*)</[^>]*>",
    )
    .expect("nested tags pattern must compile")
});

static JS_CONCAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""([a-zA-Z0-9._%-]+)"\s*\+\s*"@"\s*\+\s*"([a-zA-Z0-9.-]+\.[a-zA-Z]{2,})""#)
        .expect("concat pattern must compile")
});

static ATTRIBUTE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r#"(?i)placeholder=["']([^"']*@[^"']*)["']"#,
        r#"(?i)value=["']([^"']*@[^"']*)["']"#,
        r#"(?i)data-email=["']([^"']*@[^"']*)["']"#,
        r#"(?i)data-contact=["']([^"']*@[^"']*)["']"#,
    ]
    .iter()
    .map(|p| Regex::new(p).expect("attribute pattern must compile"))
    .collect()
});

static JSON_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r#"(?i)"email"\s*:\s*"([^"]*@[^"]*)""#,
        r#"(?i)"contactPoint"\s*:.*?"email"\s*:\s*"([^"]*@[^"]*)""#,
        r#"(?i)email\s*=\s*["']([^"']*@[^"']*)["']"#,
    ]
    .iter()
    .map(|p| Regex::new(p).expect("json pattern must compile"))
    .collect()
});

static UNICODE_REMNANT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"u[0-9a-fA-F]{4}").expect("unicode remnant pattern must compile"));
static MARKUP_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]+>").expect("markup tag pattern must compile"));

/// 清洗时按次剥离的首尾噪声记号
const NOISE_TOKENS: &[&str] = &[
    "mailto:", "email:", "contact:", "send:", "write:", "u003e", "u003c", "%3e", "%3c", ">", "<",
    "]", "[", ")", "(",
];

/// 邮箱提取器
///
/// 对输入文本依次执行一组纯重写变换以还原各类混淆，再用单个正则
/// 收集所有邮箱形态的子串，去重、清洗、校验、评分后返回排名靠前
/// 的结果。
pub struct EmailExtractor {
    rules: EmailRules,
    scorer: EmailScorer,
    max_results: usize,
}

impl EmailExtractor {
    /// 创建新的邮箱提取器实例
    ///
    /// # 参数
    ///
    /// * `rules` - 校验规则表
    /// * `scorer` - 评分器
    /// * `max_results` - 返回的邮箱数量上限
    pub fn new(rules: EmailRules, scorer: EmailScorer, max_results: usize) -> Self {
        Self {
            rules,
            scorer,
            max_results,
        }
    }

    /// 从页面文本提取邮箱
    ///
    /// # 参数
    ///
    /// * `html` - 页面文本
    /// * `priority_rules` - 可选的有序优先规则，缺省使用内置默认
    ///
    /// # 返回值
    ///
    /// 评分降序的邮箱列表，至多`max_results`个；同分时保持发现顺序
    pub fn extract(&self, html: &str, priority_rules: Option<&[String]>) -> Vec<String> {
        let default_rules: Vec<String> = DEFAULT_PRIORITY_RULES
            .iter()
            .map(|s| s.to_string())
            .collect();
        let priority = priority_rules.unwrap_or(&default_rules);

        let rewritten = rewrite_obfuscations(html);
        let candidates = collect_candidates(&rewritten);

        let mut valid = Vec::new();
        for candidate in candidates {
            let cleaned = clean_email(&candidate);
            if cleaned.is_empty() {
                continue;
            }
            if self.rules.is_valid_business_email(&cleaned) {
                valid.push(cleaned);
            }
        }

        let mut scored: Vec<(String, i32)> = valid
            .into_iter()
            .map(|email| {
                let score = self.scorer.score(&email, priority);
                (email, score)
            })
            .collect();
        // Stable sort keeps the earlier-found address on score ties
        scored.sort_by(|a, b| b.1.cmp(&a.1));
        scored.truncate(self.max_results);
        scored.into_iter().map(|(email, _)| email).collect()
    }
}

/// 按固定顺序组合全部重写变换
///
/// 每一步都在前一步的输出上运行；追加类变换只扩充文本，不移除原文
fn rewrite_obfuscations(html: &str) -> String {
    let text = decode_entities(html);
    let text = replace_obfuscation_markers(&text);
    let text = collapse_spaced_emails(&text);
    let text = rejoin_tag_split_emails(&text);
    let text = append_concatenated_emails(&text);
    let text = append_attribute_emails(&text);
    append_cfemail_decodes(&text)
}

/// 解码HTML/XML字符实体（命名与数字），以及非标准的&at;/&dot;
pub fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text)
        .replace("&at;", "@")
        .replace("&dot;", ".")
}

/// 替换文本式混淆记号：[at]/(at) → @，[dot]/(dot) → .
pub fn replace_obfuscation_markers(text: &str) -> String {
    let text = AT_MARKER.replace_all(text, "@");
    DOT_MARKER.replace_all(&text, ".").into_owned()
}

/// 压缩被空格拆开的邮箱（@和.两侧最多2个空格）
pub fn collapse_spaced_emails(text: &str) -> String {
    let text = SPACED_AT.replace_all(text, "${1}@${2}");
    SPACED_DOT.replace_all(&text, "${1}.${2}").into_owned()
}

/// 重组被行内标签拆开的邮箱
///
/// 先处理`local</tag>@<tag>domain`形态，再把三段嵌套标签的
/// 文本段连同分隔符拼接回去
pub fn rejoin_tag_split_emails(text: &str) -> String {
    let text = TAG_SPLIT.replace_all(text, "${1}@${2}");
    NESTED_TAGS
        .replace_all(&text, "${1}${2}${3}${4}${5}")
        .into_owned()
}

/// 重建字符串拼接式邮箱并追加到文本末尾（保留原文）
pub fn append_concatenated_emails(text: &str) -> String {
    let mut out = text.to_string();
    for captures in JS_CONCAT.captures_iter(text) {
        out.push_str(&format!(" {}@{} ", &captures[1], &captures[2]));
    }
    out
}

/// 扫描属性与JSON风格的藏匿点，把含@的捕获值追加到文本末尾
pub fn append_attribute_emails(text: &str) -> String {
    let mut out = text.to_string();
    for pattern in ATTRIBUTE_PATTERNS.iter().chain(JSON_PATTERNS.iter()) {
        for captures in pattern.captures_iter(text) {
            out.push_str(&format!(" {} ", &captures[1]));
        }
    }
    out
}

/// 解码CloudFlare保护标记并把结果追加到文本末尾
pub fn append_cfemail_decodes(text: &str) -> String {
    let mut out = text.to_string();
    for email in cloudflare::decode_cfemail_attributes(text) {
        out.push_str(&format!(" {} ", email));
    }
    out
}

/// 收集邮箱形态的子串并做大小写不敏感去重
///
/// 去重键为小写形式（剥离mailto:前缀与引号/尖括号字符），
/// 保留首次出现的大小写与顺序
fn collect_candidates(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for found in EMAIL_RE.find_iter(text) {
        let raw = found.as_str();
        let mut normalized = raw.trim().to_lowercase();
        if let Some(stripped) = normalized.strip_prefix("mailto:") {
            normalized = stripped.to_string();
        }
        normalized.retain(|c| !matches!(c, '<' | '>' | '"' | '\''));

        if !normalized.is_empty() && seen.insert(normalized) {
            candidates.push(raw.to_string());
        }
    }

    candidates
}

/// 清洗单个候选邮箱
///
/// 剥离Unicode转义残留、标记残片、引号实体与首尾噪声记号，然后
/// 在剩余文本上重新匹配邮箱形态，只保留首个匹配。没有邮箱形态的
/// 子串残留时返回空串，表示丢弃该候选。
pub fn clean_email(email: &str) -> String {
    if !email.contains('@') {
        return String::new();
    }

    let mut email = email.trim().to_string();
    email = UNICODE_REMNANT.replace_all(&email, "").into_owned();
    email = MARKUP_TAG.replace_all(&email, "").into_owned();
    for entity in ["&lt;", "&gt;", "&quot;", "&#34;", "&apos;", "&#39;"] {
        email = email.replace(entity, "");
    }
    email = email.trim_matches(|c| c == '\'' || c == '"').to_string();

    for token in NOISE_TOKENS {
        if email.to_lowercase().starts_with(token) {
            email = email[token.len()..].trim().to_string();
        }
        if email.len() >= token.len() && email.to_lowercase().ends_with(token) {
            email = email[..email.len() - token.len()].trim().to_string();
        }
    }

    match EMAIL_RE.find(&email) {
        Some(found) => found.as_str().to_string(),
        None => String::new(),
    }
}
