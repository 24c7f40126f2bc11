// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::models::{ErrorKind, ProbeOutcome};
use crate::probes::http::{
    build_client, discard_body, forbidden_diagnostic, BROWSER_ACCEPT, BROWSER_USER_AGENT,
};
use crate::probes::traits::{run_with_deadline, ProbeError, ProbeStrategy};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, RANGE, USER_AGENT};
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use std::time::{Duration, Instant};
use tracing::debug;

/// 请求的最大字节数
pub const RANGE_LIMIT: usize = 512;

/// Range GET 探测
///
/// 使用浏览器请求头发送 `Range: bytes=0-511` 的 GET 请求，
/// 200 或 206 视为成功，最多读取 512 字节响应体后丢弃。
pub struct RangeGetProbe {
    client: reqwest::Client,
}

impl RangeGetProbe {
    pub fn new() -> Result<Self, ProbeError> {
        Ok(Self {
            client: build_client(Policy::default())?,
        })
    }

    async fn attempt(&self, url: &str) -> Result<ProbeOutcome, ProbeError> {
        let start = Instant::now();
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .header(ACCEPT, BROWSER_ACCEPT)
            .header(RANGE, format!("bytes=0-{}", RANGE_LIMIT - 1))
            .send()
            .await?;

        let status = response.status();
        debug!("Range GET {} returned {}", url, status);

        if status != StatusCode::OK && status != StatusCode::PARTIAL_CONTENT {
            let mut outcome = ProbeOutcome::failure(
                ErrorKind::NonSuccessStatus,
                format!("Non-200 HTTP response for {}: {}", url, status),
                start.elapsed(),
            )
            .with_status(status.as_u16());

            if status == StatusCode::FORBIDDEN {
                outcome = outcome.with_diagnostic(forbidden_diagnostic(url, response.headers()));
            }
            return Ok(outcome);
        }

        discard_body(response, RANGE_LIMIT).await?;

        Ok(ProbeOutcome::success(Some(status.as_u16()), start.elapsed()))
    }
}

#[async_trait]
impl ProbeStrategy for RangeGetProbe {
    async fn probe(&self, url: &str, deadline: Duration) -> ProbeOutcome {
        run_with_deadline(deadline, self.attempt(url)).await
    }

    fn name(&self) -> &'static str {
        "range_get"
    }
}

#[cfg(test)]
#[path = "range_get_test.rs"]
mod tests;
