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
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

/// 探测错误类型
///
/// 只在探测策略内部使用，最终都会被转换为 `ProbeOutcome`。
#[derive(Error, Debug)]
pub enum ProbeError {
    /// 请求失败
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// 外部命令执行失败
    #[error("Command failed: {0}")]
    Command(#[from] std::io::Error),
    /// 超时
    #[error("Timeout")]
    Timeout,
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

impl ProbeError {
    /// 对错误进行分类
    ///
    /// 客户端自身报告的超时同样归为 `Timeout`，而不是网络错误
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProbeError::Request(e) if e.is_timeout() => ErrorKind::Timeout,
            ProbeError::Timeout => ErrorKind::Timeout,
            ProbeError::Request(_) | ProbeError::Command(_) | ProbeError::Other(_) => {
                ErrorKind::NetworkError
            }
        }
    }
}

/// 探测策略特质
///
/// 所有实现都必须是无状态的，可以被多个工作器并发调用。
#[async_trait]
pub trait ProbeStrategy: Send + Sync {
    /// 在截止时间内对 URL 执行一次探测
    async fn probe(&self, url: &str, deadline: Duration) -> ProbeOutcome;

    /// 策略名称
    fn name(&self) -> &'static str;
}

/// 在截止时间内执行一次探测尝试
///
/// 超过截止时间时丢弃尝试并返回 `Timeout`；尝试本身的错误按 `ProbeError::kind` 分类。
pub async fn run_with_deadline<F>(deadline: Duration, attempt: F) -> ProbeOutcome
where
    F: Future<Output = Result<ProbeOutcome, ProbeError>>,
{
    let start = Instant::now();
    match tokio::time::timeout(deadline, attempt).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(e)) => ProbeOutcome::failure(e.kind(), e.to_string(), start.elapsed()),
        Err(_) => ProbeOutcome::failure(
            ErrorKind::Timeout,
            format!("deadline of {:?} exceeded", deadline),
            start.elapsed(),
        ),
    }
}
