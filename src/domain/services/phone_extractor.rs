// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:\+?1[-.\s]?)?\(?([0-9]{3})\)?[-.\s]?([0-9]{3})[-.\s]?([0-9]{4})|(?:\+[1-9]\d{0,3}[-.\s]?)?(?:\([0-9]{1,4}\)[-.\s]?)?[0-9]{1,4}[-.\s]?[0-9]{1,9}",
    )
    .expect("phone pattern must compile")
});

/// 从页面文本提取电话号码
///
/// 北美号码按区号/局号/线号三段捕获并拼接为纯数字；国际形态参与
/// 匹配但不产出结果，避免把时间戳等长数字串当成号码。校验：长度
/// 10-15，不含`1234567890`序列，不允许单一数字重复。
///
/// # 参数
///
/// * `html` - 页面文本
/// * `max_results` - 返回数量上限
///
/// # 返回值
///
/// 去重后的号码列表，保持发现顺序
pub fn extract_phones(html: &str, max_results: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut phones = Vec::new();

    for captures in PHONE_RE.captures_iter(html) {
        let phone = match (captures.get(1), captures.get(2), captures.get(3)) {
            (Some(area), Some(exchange), Some(line)) => {
                format!("{}{}{}", area.as_str(), exchange.as_str(), line.as_str())
            }
            _ => continue,
        };

        let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.len() < 10 || digits.len() > 15 {
            continue;
        }
        if digits.contains("1234567890") {
            continue;
        }
        let mut chars = digits.chars();
        if let Some(first) = chars.next() {
            if chars.all(|c| c == first) {
                continue;
            }
        }

        if seen.insert(phone.clone()) {
            phones.push(phone);
        }
        if phones.len() >= max_results {
            break;
        }
    }

    phones
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_formatted_north_american_numbers() {
        let html = "Call us: (415) 555-2671 or 415.555.2672";
        let phones = extract_phones(html, 2);
        assert_eq!(
            phones,
            vec!["4155552671".to_string(), "4155552672".to_string()]
        );
    }

    #[test]
    fn rejects_sequential_and_repeated_digits() {
        let html = "Fake: 123-456-7890 and 111-111-1111";
        assert!(extract_phones(html, 2).is_empty());
    }

    #[test]
    fn deduplicates_and_caps_results() {
        let html = "(415) 555-2671, (415) 555-2671, (415) 555-2672, (415) 555-2673";
        let phones = extract_phones(html, 2);
        assert_eq!(phones.len(), 2);
    }
}
