// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chardetng::EncodingDetector;
use tracing::debug;

/// 将响应体字节解码为UTF-8文本
///
/// 解码链：严格UTF-8 → 自动检测编码转换 → 无效字节替换 → 空字符串。
/// 网页声明的编码经常与实际内容不符，因此以内容检测为准。
///
/// # 参数
///
/// * `input` - 响应体原始字节
///
/// # 返回值
///
/// 解码后的文本，永不失败
pub fn decode_body(input: &[u8]) -> String {
    if input.is_empty() {
        return String::new();
    }

    // Fast path: most pages are already valid UTF-8
    if let Ok(text) = std::str::from_utf8(input) {
        return text.to_string();
    }

    // Detect the actual encoding from content
    let mut detector = EncodingDetector::new();
    detector.feed(input, true);
    let encoding = detector.guess(None, true);
    debug!("Detected non-UTF-8 body, decoding as {}", encoding.name());

    let (text, _, had_errors) = encoding.decode(input);
    if !had_errors {
        return text.into_owned();
    }

    // Substitute invalid bytes rather than dropping the page
    String::from_utf8_lossy(input).into_owned()
}
