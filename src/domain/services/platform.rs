// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 识别建站平台
///
/// 按固定顺序对小写页面文本做子串检查，先命中者胜出
///
/// # 参数
///
/// * `html` - 页面文本
///
/// # 返回值
///
/// 平台名称，无法识别时返回"Unknown"
pub fn detect_platform(html: &str) -> &'static str {
    let html = html.to_lowercase();

    if html.contains("wp-content") || html.contains("wordpress") || html.contains("/wp-json/") {
        "WordPress"
    } else if html.contains("shopify") || html.contains("cdn.shopify.com") {
        "Shopify"
    } else if html.contains("wix.com") || html.contains("_wix") {
        "Wix"
    } else if html.contains("squarespace") || html.contains("squarespace.com") {
        "Squarespace"
    } else if html.contains("webflow") || html.contains("webflow.com") {
        "Webflow"
    } else if html.contains("react") || html.contains("next.js") || html.contains("_next/") {
        "React/Next.js"
    } else if html.contains("drupal") {
        "Drupal"
    } else if html.contains("joomla") {
        "Joomla"
    } else if html.contains("magento") || html.contains("mage/") {
        "Magento"
    } else {
        "Unknown"
    }
}
