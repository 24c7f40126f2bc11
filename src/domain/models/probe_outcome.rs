// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// 探测失败类型
///
/// 对单次探测失败的原因进行分类，便于在日志中离线诊断。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// 超过探测截止时间
    Timeout,
    /// 连接、DNS 或 TLS 失败
    NetworkError,
    /// 收到了格式正确但状态不符合预期的响应
    NonSuccessStatus,
    /// ICMP 探测部分丢包
    PartialLoss,
}

impl ErrorKind {
    /// 指标标签使用的静态名称
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Timeout => "timeout",
            ErrorKind::NetworkError => "network_error",
            ErrorKind::NonSuccessStatus => "non_success_status",
            ErrorKind::PartialLoss => "partial_loss",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ErrorKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "timeout" => Ok(ErrorKind::Timeout),
            "network_error" => Ok(ErrorKind::NetworkError),
            "non_success_status" => Ok(ErrorKind::NonSuccessStatus),
            "partial_loss" => Ok(ErrorKind::PartialLoss),
            _ => Err(()),
        }
    }
}

/// 探测结果
///
/// 由探测策略在每次尝试后创建，创建后不再修改，只由产生它的工作器消费。
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeOutcome {
    /// 是否探测成功
    pub success: bool,
    /// HTTP 状态码（ICMP 探测时为空）
    pub status: Option<u16>,
    /// 本次尝试耗时
    pub duration: Duration,
    /// 失败类型，成功时为空
    pub error_kind: Option<ErrorKind>,
    /// 失败原因的可读描述
    pub detail: Option<String>,
    /// 需要写入持久日志的附加诊断信息
    pub diagnostics: Vec<String>,
}

impl ProbeOutcome {
    pub fn success(status: Option<u16>, duration: Duration) -> Self {
        Self {
            success: true,
            status,
            duration,
            error_kind: None,
            detail: None,
            diagnostics: Vec::new(),
        }
    }

    pub fn failure(kind: ErrorKind, detail: impl Into<String>, duration: Duration) -> Self {
        Self {
            success: false,
            status: None,
            duration,
            error_kind: Some(kind),
            detail: Some(detail.into()),
            diagnostics: Vec::new(),
        }
    }

    /// 附加状态码
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    /// 附加一条诊断信息
    pub fn with_diagnostic(mut self, line: impl Into<String>) -> Self {
        self.diagnostics.push(line.into());
        self
    }
}
