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

/// 最多跟随的重定向次数
pub const MAX_REDIRECTS: usize = 10;

/// HEAD 探测
///
/// 最多跟随 10 次重定向，最终状态码在 [200, 300) 内视为成功。
/// 无论成功与否都记录本次尝试的耗时。
pub struct HeadProbe {
    client: reqwest::Client,
}

impl HeadProbe {
    pub fn new() -> Result<Self, ProbeError> {
        Ok(Self {
            client: build_client(Policy::limited(MAX_REDIRECTS))?,
        })
    }

    async fn attempt(&self, url: &str) -> Result<ProbeOutcome, ProbeError> {
        let start = Instant::now();
        let response = self.client.head(url).send().await?;
        let status = response.status();
        let duration = start.elapsed();
        debug!("HEAD {} returned {} in {:?}", url, status, duration);

        if status.is_success() {
            Ok(ProbeOutcome::success(Some(status.as_u16()), duration))
        } else {
            Ok(ProbeOutcome::failure(
                ErrorKind::NonSuccessStatus,
                format!("HEAD {} returned {}", url, status),
                duration,
            )
            .with_status(status.as_u16()))
        }
    }
}

#[async_trait]
impl ProbeStrategy for HeadProbe {
    async fn probe(&self, url: &str, deadline: Duration) -> ProbeOutcome {
        run_with_deadline(deadline, self.attempt(url)).await
    }

    fn name(&self) -> &'static str {
        "head"
    }
}
