// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 持久日志记录
///
/// 入队后所有权转移给日志接收器，由其决定缓冲与刷新时机。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    /// 日志内容（不含换行符）
    pub message: String,
}

impl LogRecord {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for LogRecord {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for LogRecord {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}
