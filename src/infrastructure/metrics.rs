// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::info;

/// 安装Prometheus指标导出器
///
/// 端口已被占用时只告警不中断启动，便于开发环境多实例共存
///
/// # 参数
///
/// * `port` - 导出器HTTP监听端口
pub fn init_metrics(port: u16) {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let builder = PrometheusBuilder::new().with_http_listener(addr);

    if let Err(e) = builder.install() {
        tracing::warn!(
            "Failed to install Prometheus recorder on {}: {}",
            addr,
            e
        );
        return;
    }

    info!("Metrics exporter listening on {}", addr);
}
