// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use once_cell::sync::Lazy;
use regex::Regex;

static CFEMAIL_ATTR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)data-cfemail="([a-f0-9]+)""#).expect("cfemail pattern must compile")
});

/// 解码CloudFlare邮箱保护标记
///
/// `data-cfemail`属性的前两个十六进制字符是8位XOR密钥，其后每对
/// 十六进制字符与密钥异或还原一个字节，仅保留可打印ASCII范围
/// [32,126]内的字符。解码结果必须同时包含`@`和`.`才被采纳。
/// 单个候选的畸形十六进制（非法字符、奇数长度）只跳过该候选，
/// 不中断整体解码。
///
/// # 参数
///
/// * `html` - 页面标记文本
///
/// # 返回值
///
/// 按出现顺序解码出的邮箱列表
pub fn decode_cfemail_attributes(html: &str) -> Vec<String> {
    let mut emails = Vec::new();

    for captures in CFEMAIL_ATTR.captures_iter(html) {
        let encoded = &captures[1];
        if encoded.len() < 2 {
            continue;
        }

        let key = match u8::from_str_radix(&encoded[..2], 16) {
            Ok(key) => key,
            Err(_) => continue,
        };
        let payload = match hex::decode(&encoded[2..]) {
            Ok(payload) => payload,
            Err(_) => continue,
        };

        let decoded: String = payload
            .iter()
            .map(|byte| byte ^ key)
            .filter(|code| (32..=126).contains(code))
            .map(char::from)
            .collect();

        if decoded.contains('@') && decoded.contains('.') {
            emails.push(decoded);
        }
    }

    emails
}
