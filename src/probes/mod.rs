// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

pub mod head;
pub mod http;
pub mod icmp;
pub mod plain_get;
pub mod range_get;
#[cfg(test)]
mod test_server;
pub mod traits;

use crate::config::settings::{ProbeMethod, ProbeSettings};
use std::sync::Arc;

pub use traits::{ProbeError, ProbeStrategy};

/// 根据配置构建探测策略
///
/// # 参数
///
/// * `settings` - 探测配置
///
/// # 返回值
///
/// * `Ok(Arc<dyn ProbeStrategy>)` - 可在工作器之间共享的探测策略
/// * `Err(ProbeError)` - HTTP 客户端构建失败
pub fn build_probe(settings: &ProbeSettings) -> Result<Arc<dyn ProbeStrategy>, ProbeError> {
    let probe: Arc<dyn ProbeStrategy> = match settings.method {
        ProbeMethod::RangeGet => Arc::new(range_get::RangeGetProbe::new()?),
        ProbeMethod::Head => Arc::new(head::HeadProbe::new()?),
        ProbeMethod::Icmp => Arc::new(icmp::IcmpProbe::new(settings.icmp_count)),
        ProbeMethod::PlainGet => Arc::new(plain_get::PlainGetProbe::new()?),
    };
    Ok(probe)
}
