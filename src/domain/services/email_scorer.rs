// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;

/// 默认的邮箱优先规则
pub const DEFAULT_PRIORITY_RULES: &[&str] = &["info@", "sales@", "@gmail.com"];

/// 通用账号名，命中时轻度减分
const GENERIC_USERNAMES: &[&str] = &[
    "info",
    "admin",
    "support",
    "contact",
    "help",
    "sales",
    "service",
    "team",
    "hello",
    "mail",
    "email",
    "newsletter",
    "webmaster",
];

/// 通用邮箱服务商，公司自有域名之外不加分
const GENERIC_PROVIDERS: &[&str] = &["gmail.com", "yahoo.com", "hotmail.com", "outlook.com"];

/// 无优先规则命中时仍然加分的业务性账号词
const BUSINESS_HINTS: &[&str] = &["contact", "info", "sales", "support", "hello"];

static TRAILING_DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{3,}$").expect("trailing digits pattern must compile"));
static PERSONAL_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z]+\.[a-z]+$").expect("personal name pattern must compile"));

/// 邮箱质量评分器
///
/// 基础分100，先按调用方给出的有序优先规则加分（仅首个命中规则
/// 生效，规则越靠前加分越高），再叠加与优先级无关的启发项。
pub struct EmailScorer;

impl EmailScorer {
    /// 为一个已通过校验的邮箱打分
    ///
    /// # 参数
    ///
    /// * `email` - 候选邮箱
    /// * `priority_rules` - 有序优先规则：`prefix@`按本地部分前缀匹配，
    ///   `@suffix`按域名匹配，其余按全地址子串匹配
    ///
    /// # 返回值
    ///
    /// 最终评分，越高越优先
    pub fn score(&self, email: &str, priority_rules: &[String]) -> i32 {
        let mut score = 100;
        let email_lower = email.to_lowercase();
        let (username, domain) = match email_lower.split_once('@') {
            Some(parts) => parts,
            None => return score,
        };

        // First matching rule wins; lower index, higher bonus
        let mut priority_bonus = 0;
        for (index, rule) in priority_rules.iter().enumerate() {
            let matched = if let Some(suffix) = rule.strip_prefix('@') {
                domain == suffix || domain.ends_with(&format!(".{}", suffix))
            } else if let Some(prefix) = rule.strip_suffix('@') {
                username == prefix || username.starts_with(prefix)
            } else {
                email_lower.contains(rule.as_str())
            };
            if matched {
                priority_bonus = 100 - (index as i32 * 10);
                break;
            }
        }
        score += priority_bonus;

        if GENERIC_USERNAMES.contains(&username) {
            score -= 20;
        }
        if TRAILING_DIGITS.is_match(username) {
            score -= 10;
        }
        if PERSONAL_NAME.is_match(username) && username.len() > 3 {
            score += 30;
        }
        if !GENERIC_PROVIDERS.contains(&domain) {
            score += 25;
        }
        if priority_bonus == 0 && BUSINESS_HINTS.iter().any(|hint| username.contains(hint)) {
            score += 15;
        }

        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(patterns: &[&str]) -> Vec<String> {
        patterns.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn first_matching_rule_outranks_later_ones() {
        let scorer = EmailScorer;
        let priority = rules(DEFAULT_PRIORITY_RULES);
        let info = scorer.score("info@acme.com", &priority);
        let sales = scorer.score("sales@acme.com", &priority);
        assert!(info > sales);
    }

    #[test]
    fn prefix_rule_matches_local_part() {
        let scorer = EmailScorer;
        let priority = rules(&["sales@"]);
        assert!(scorer.score("sales@acme.com", &priority) > scorer.score("dev@acme.com", &priority));
        // Prefix matching, not just equality
        assert!(
            scorer.score("sales.emea@acme.com", &priority)
                > scorer.score("dev@acme.com", &priority)
        );
    }

    #[test]
    fn domain_rule_matches_domain_and_subdomains() {
        let scorer = EmailScorer;
        let priority = rules(&["@gmail.com"]);
        assert!(
            scorer.score("someone@gmail.com", &priority)
                > scorer.score("someone@acme.com", &priority)
        );
    }

    #[test]
    fn substring_rule_matches_anywhere() {
        let scorer = EmailScorer;
        let priority = rules(&["business"]);
        assert!(
            scorer.score("ceo@business-hub.com", &priority)
                > scorer.score("ceo@acme.com", &priority)
        );
    }

    #[test]
    fn personal_names_get_a_bonus() {
        let scorer = EmailScorer;
        let empty = rules(&[]);
        assert!(
            scorer.score("jane.doe@acme.com", &empty) > scorer.score("jdoe@acme.com", &empty)
        );
    }

    #[test]
    fn company_domains_beat_generic_providers() {
        let scorer = EmailScorer;
        let empty = rules(&[]);
        assert!(
            scorer.score("jane.doe@acme.com", &empty) > scorer.score("jane.doe@gmail.com", &empty)
        );
    }

    #[test]
    fn trailing_digit_runs_are_penalized() {
        let scorer = EmailScorer;
        let empty = rules(&[]);
        assert!(
            scorer.score("frontdesk@acme.com", &empty) > scorer.score("frontdesk123@acme.com", &empty)
        );
    }
}
