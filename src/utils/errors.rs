// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::path::PathBuf;
use thiserror::Error;

/// URL 来源错误类型
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to open URL list {}: {}", .path.display(), .source)]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read URL list {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 日志接收器错误类型
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Failed to open log file {}: {}", .path.display(), .source)]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write log buffer: {0}")]
    Write(#[source] std::io::Error),

    #[error("Failed to flush log buffer: {0}")]
    Flush(#[source] std::io::Error),
}

/// 运行错误类型
///
/// 只有 URL 来源加载失败和日志接收器打开失败会中止整次运行，
/// 单个 URL 的探测错误不会出现在这里。
#[derive(Error, Debug)]
pub enum RunError {
    #[error("URL source error: {0}")]
    Source(#[from] SourceError),

    #[error("Log sink error: {0}")]
    Sink(#[from] SinkError),
}
