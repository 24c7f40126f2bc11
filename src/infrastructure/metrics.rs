// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::info;

/// 安装全局 Prometheus 记录器
///
/// 一次运行结束后进程即退出，因此不启动 HTTP 监听，
/// 由调用方通过返回的句柄渲染指标快照。
///
/// # 返回值
///
/// * `Ok(PrometheusHandle)` - 用于渲染当前指标的句柄
/// * `Err(BuildError)` - 记录器构建失败或已安装过其他全局记录器
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    info!("Prometheus metrics recorder installed");
    Ok(handle)
}
