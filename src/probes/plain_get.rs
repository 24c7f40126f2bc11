// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::{ErrorKind, ProbeOutcome};
use crate::probes::http::build_client;
use crate::probes::traits::{run_with_deadline, ProbeError, ProbeStrategy};
use async_trait::async_trait;
use reqwest::redirect::Policy;
use std::time::{Duration, Instant};
use tracing::debug;

/// 完整 GET 探测
///
/// 不设置客户端超时，也不限制响应体大小，是最宽松的基线策略。
/// 截止时间仍然由外层统一控制。
pub struct PlainGetProbe {
    client: reqwest::Client,
}

impl PlainGetProbe {
    pub fn new() -> Result<Self, ProbeError> {
        Ok(Self {
            client: build_client(Policy::default())?,
        })
    }

    async fn attempt(&self, url: &str) -> Result<ProbeOutcome, ProbeError> {
        let start = Instant::now();
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        debug!("GET {} returned {} ({} bytes)", url, status, body.len());

        if status.is_success() {
            Ok(ProbeOutcome::success(Some(status.as_u16()), start.elapsed()))
        } else {
            Ok(ProbeOutcome::failure(
                ErrorKind::NonSuccessStatus,
                format!("GET {} returned {}", url, status),
                start.elapsed(),
            )
            .with_status(status.as_u16()))
        }
    }
}

#[async_trait]
impl ProbeStrategy for PlainGetProbe {
    async fn probe(&self, url: &str, deadline: Duration) -> ProbeOutcome {
        run_with_deadline(deadline, self.attempt(url)).await
    }

    fn name(&self) -> &'static str {
        "plain_get"
    }
}
