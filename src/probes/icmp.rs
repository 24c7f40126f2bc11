// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::{ErrorKind, ProbeOutcome};
use crate::probes::traits::{run_with_deadline, ProbeError, ProbeStrategy};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::debug;
use url::Url;

static ADDRESS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^PING\s+\S+\s+\(([^)]+)\)").expect("valid regex"));

static PACKETS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(\d+) packets transmitted, (\d+) (?:packets )?received(?:, \+\d+ errors)?, ([\d.]+)% packet loss",
    )
    .expect("valid regex")
});

static RTT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"= ([\d.]+)/([\d.]+)/([\d.]+)(?:/([\d.]+))? ms").expect("valid regex")
});

/// 往返时延统计（毫秒）
#[derive(Debug, Clone, PartialEq)]
pub struct RttStats {
    pub min: f64,
    pub avg: f64,
    pub max: f64,
    pub stddev: Option<f64>,
}

/// `ping` 输出中的统计信息
#[derive(Debug, Clone, PartialEq)]
pub struct PingStats {
    pub address: Option<String>,
    pub transmitted: u32,
    pub received: u32,
    pub loss_percent: f64,
    pub rtt: Option<RttStats>,
}

impl PingStats {
    /// 单行摘要，写入持久日志
    pub fn summary(&self, host: &str) -> String {
        let rtt = match &self.rtt {
            Some(rtt) => format!(
                "round-trip min/avg/max/stddev = {:.3}/{:.3}/{:.3}/{} ms",
                rtt.min,
                rtt.avg,
                rtt.max,
                rtt.stddev
                    .map(|s| format!("{:.3}", s))
                    .unwrap_or_else(|| "n/a".to_string())
            ),
            None => "round-trip n/a".to_string(),
        };

        format!(
            "{} ({}): {} packets transmitted, {} packets received, {:.1}% packet loss, {}",
            host,
            self.address.as_deref().unwrap_or(host),
            self.transmitted,
            self.received,
            self.loss_percent,
            rtt
        )
    }
}

/// 解析 `ping` 的统计输出
///
/// 兼容 iputils、BSD/macOS 与 busybox 的输出格式，无法识别时返回 `None`
pub fn parse_ping_output(output: &str) -> Option<PingStats> {
    let packets = PACKETS_RE.captures(output)?;
    let transmitted = packets[1].parse().ok()?;
    let received = packets[2].parse().ok()?;
    let loss_percent = packets[3].parse().ok()?;

    let rtt = RTT_RE.captures(output).and_then(|caps| {
        Some(RttStats {
            min: caps[1].parse().ok()?,
            avg: caps[2].parse().ok()?,
            max: caps[3].parse().ok()?,
            stddev: caps.get(4).and_then(|m| m.as_str().parse().ok()),
        })
    });

    let address = ADDRESS_RE
        .captures(output)
        .map(|caps| caps[1].to_string());

    Some(PingStats {
        address,
        transmitted,
        received,
        loss_percent,
        rtt,
    })
}

/// 从 URL 或裸主机名中提取要 ping 的主机
pub fn target_host(target: &str) -> String {
    if let Ok(url) = Url::parse(target) {
        if let Some(host) = url.host_str() {
            return host.trim_start_matches('[').trim_end_matches(']').to_string();
        }
    }

    let host = target.trim().split('/').next().unwrap_or_default();
    match host.rsplit_once(':') {
        Some((name, port)) if !name.contains(':') && port.parse::<u16>().is_ok() => {
            name.to_string()
        }
        _ => host.to_string(),
    }
}

/// ICMP 回显探测
///
/// 调用系统 `ping` 发送固定数量的回显请求，全部收到视为成功。
/// 每次探测都会产生一行统计摘要作为诊断日志。
pub struct IcmpProbe {
    count: u32,
}

impl IcmpProbe {
    pub fn new(count: u32) -> Self {
        Self { count: count.max(1) }
    }

    async fn attempt(&self, url: &str) -> Result<ProbeOutcome, ProbeError> {
        let host = target_host(url);
        if host.is_empty() {
            return Err(ProbeError::Other(format!("no host in {}", url)));
        }

        let start = Instant::now();
        let output = Command::new("ping")
            .arg("-n")
            .arg("-c")
            .arg(self.count.to_string())
            .arg(&host)
            .kill_on_drop(true)
            .output()
            .await?;
        let duration = start.elapsed();

        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!("ping {} exited with {}", host, output.status);

        let Some(stats) = parse_ping_output(&stdout) else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Ok(ProbeOutcome::failure(
                ErrorKind::NetworkError,
                format!("ping {} failed ({}): {}", host, output.status, stderr.trim()),
                duration,
            ));
        };

        let summary = stats.summary(&host);
        let outcome = if stats.transmitted > 0 && stats.transmitted == stats.received {
            ProbeOutcome::success(None, duration)
        } else if stats.received == 0 {
            ProbeOutcome::failure(
                ErrorKind::NetworkError,
                format!("no echo replies from {}", host),
                duration,
            )
        } else {
            ProbeOutcome::failure(
                ErrorKind::PartialLoss,
                format!(
                    "{} of {} echo replies lost from {}",
                    stats.transmitted - stats.received.min(stats.transmitted),
                    stats.transmitted,
                    host
                ),
                duration,
            )
        };

        Ok(outcome.with_diagnostic(summary))
    }
}

#[async_trait]
impl ProbeStrategy for IcmpProbe {
    async fn probe(&self, url: &str, deadline: Duration) -> ProbeOutcome {
        run_with_deadline(deadline, self.attempt(url)).await
    }

    fn name(&self) -> &'static str {
        "icmp"
    }
}
