// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use regex::Regex;
use std::collections::HashSet;

/// 本地部分黑名单模式
///
/// 文件扩展名后缀、占位词前缀、纯数字、长数字串、十六进制/UUID/
/// Base64形态的跟踪标识。文件扩展名在这里和域名模式表中各查一次，
/// 两处都保留。
const USERNAME_PATTERNS: &[&str] = &[
    r"\.(png|jpg|jpeg|gif|svg|webp|ico|css|js|json|xml|pdf|doc|docx|xls|xlsx|zip|rar)$",
    r"^(example|test|demo|sample|placeholder|dummy|fake|mock|temp)",
    r"^[0-9]{4,}$",
    r"[0-9]{8,}",
    r"^[a-f0-9]{16,}$",
    r"^[a-f0-9]{8}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{4}-[a-f0-9]{12}$",
    r"^[A-Za-z0-9+/]{20,}$",
];

/// 域名精确黑名单
const BLOCKED_DOMAINS: &[&str] = &[
    // Placeholder domains
    "example.com",
    "example.org",
    "example.net",
    "test.com",
    "test.org",
    "test.net",
    "domain.com",
    "website.com",
    "site.com",
    "email.com",
    "mail.com",
    "mysite.com",
    "yoursite.com",
    "yourdomain.com",
    "mydomain.com",
    "company.com",
    "business.com",
    "sample.com",
    // System/tracking domains
    "localhost",
    "127.0.0.1",
    "local.com",
    "sentry.io",
    "tracking.com",
    "analytics.com",
    "google-analytics.com",
    "googletagmanager.com",
    "facebook.com",
    "twitter.com",
    "instagram.com",
    // Error tracking vendors
    "sentry-next.wixpress.com",
    "sentry.wixpress.com",
    "bugsnag.com",
    "rollbar.com",
    "airbrake.io",
    "honeybadger.io",
    "raygun.com",
    "crashlytics.com",
    // No-reply style
    "noreply.com",
    "donotreply.com",
    "no-reply.com",
    // File-like domains
    "png.com",
    "jpg.com",
    "gif.com",
    "webp.com",
];

/// 域名黑名单模式
const DOMAIN_PATTERNS: &[&str] = &[
    r"\.(png|jpg|jpeg|gif|svg|webp|ico)$",
    r"^(example|test|demo|sample|placeholder|dummy|fake)",
    r"(localhost|127\.0\.0\.1)",
    r"sentry.*\.wixpress\.com$",
    r"\.sentry\.io$",
    r"\.(bugsnag|rollbar|airbrake|honeybadger|raygun|crashlytics)\.com$",
];

/// 本地部分精确黑名单（系统账号、占位账号、营销/跟踪账号）
const BLOCKED_USERNAMES: &[&str] = &[
    "example",
    "test",
    "demo",
    "sample",
    "placeholder",
    "dummy",
    "fake",
    "user",
    "admin",
    "root",
    "guest",
    "anonymous",
    "unknown",
    "domain",
    "website",
    "site",
    "email",
    "mail",
    "noreply",
    "no-reply",
    "donotreply",
    "do-not-reply",
    "mailer-daemon",
    "postmaster",
    "bounce",
    "return",
    "system",
    "daemon",
    "nobody",
    "www",
    "ftp",
    "apache",
    "nginx",
    "mysql",
    "postgres",
    "redis",
    "mongodb",
    "tracking",
    "analytics",
    "pixel",
    "tag",
    "monitor",
    "newsletter",
    "marketing",
    "promotion",
    "promo",
    "deals",
    "offer",
    "discount",
];

/// 整体地址可疑模式
const SUSPICIOUS_PATTERNS: &[&str] = &[
    r"@domain\.com$",
    r"@email\.com$",
    r"email@domain",
    r"user@domain",
    r"^[^@]+@[^@]+@",
    r"\.{2,}",
    r#"[<>"\\\[\]]"#,
];

/// 跟踪前缀，与错误跟踪厂商域名组合判定
const TRACKING_PREFIXES: &[&str] = &[
    "tracking",
    "monitor",
    "analytics",
    "metric",
    "log",
    "debug",
    "error",
    "crash",
    "report",
];

const TRACKING_VENDORS: &[&str] = &["sentry", "bugsnag", "rollbar", "airbrake"];

/// 邮箱校验规则
///
/// 黑名单以数据表形式在启动时编译，便于独立扩展和测试
pub struct EmailRules {
    strict_shape: Regex,
    username_patterns: Vec<Regex>,
    blocked_domains: HashSet<&'static str>,
    domain_patterns: Vec<Regex>,
    blocked_usernames: HashSet<&'static str>,
    suspicious_patterns: Vec<Regex>,
}

impl Default for EmailRules {
    fn default() -> Self {
        Self::new()
    }
}

impl EmailRules {
    /// 从内置数据表编译校验规则
    pub fn new() -> Self {
        let compile = |patterns: &[&str]| {
            patterns
                .iter()
                .map(|p| Regex::new(p).expect("blacklist pattern must compile"))
                .collect::<Vec<_>>()
        };

        Self {
            strict_shape: Regex::new(
                r"^[a-zA-Z0-9](?:[a-zA-Z0-9._%-]*[a-zA-Z0-9])?@[a-zA-Z0-9](?:[a-zA-Z0-9.-]*[a-zA-Z0-9])?\.[a-zA-Z]{2,}$",
            )
            .expect("email shape pattern must compile"),
            username_patterns: compile(USERNAME_PATTERNS),
            blocked_domains: BLOCKED_DOMAINS.iter().copied().collect(),
            domain_patterns: compile(DOMAIN_PATTERNS),
            blocked_usernames: BLOCKED_USERNAMES.iter().copied().collect(),
            suspicious_patterns: compile(SUSPICIOUS_PATTERNS),
        }
    }

    /// 判断是否为真实的业务邮箱
    ///
    /// 所有检查在小写副本上进行，调用方保留原始大小写
    ///
    /// # 参数
    ///
    /// * `email` - 清洗后的候选邮箱
    ///
    /// # 返回值
    ///
    /// 通过全部黑名单与形态检查时返回true
    pub fn is_valid_business_email(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        if !email.contains('@') {
            return false;
        }
        if email.len() < 5 || email.len() > 100 {
            return false;
        }
        if !self.strict_shape.is_match(&email) {
            return false;
        }

        let (username, domain) = match email.split_once('@') {
            Some(parts) => parts,
            None => return false,
        };

        if self.username_patterns.iter().any(|p| p.is_match(username)) {
            return false;
        }

        // Tracking-word local part on an error-tracking vendor domain
        if TRACKING_PREFIXES.iter().any(|p| username.starts_with(p))
            && TRACKING_VENDORS.iter().any(|v| domain.contains(v))
        {
            return false;
        }

        if self.blocked_domains.contains(domain) {
            return false;
        }
        if self.domain_patterns.iter().any(|p| p.is_match(domain)) {
            return false;
        }
        if self.blocked_usernames.contains(username) {
            return false;
        }
        if self.suspicious_patterns.iter().any(|p| p.is_match(&email)) {
            return false;
        }

        true
    }
}
