// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::utils::errors::SourceError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

/// URL 来源特质
#[async_trait]
pub trait UrlSource: Send + Sync {
    /// 按顺序加载全部 URL
    async fn load(&self) -> Result<Vec<String>, SourceError>;
}

/// 文本文件 URL 来源
///
/// 每行一个 URL，去除首尾空白，跳过空行和 `#` 开头的注释行
pub struct FileUrlSource {
    path: PathBuf,
}

impl FileUrlSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl UrlSource for FileUrlSource {
    async fn load(&self) -> Result<Vec<String>, SourceError> {
        let file = File::open(&self.path)
            .await
            .map_err(|source| SourceError::Open {
                path: self.path.clone(),
                source,
            })?;

        let mut lines = BufReader::new(file).lines();
        let mut urls = Vec::new();
        while let Some(line) = lines.next_line().await.map_err(|source| SourceError::Read {
            path: self.path.clone(),
            source,
        })? {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            urls.push(line.to_string());
        }

        debug!("Loaded {} URLs from {}", urls.len(), self.path.display());
        Ok(urls)
    }
}

/// 内存 URL 来源
pub struct StaticUrlSource {
    urls: Vec<String>,
}

impl StaticUrlSource {
    pub fn new<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            urls: urls.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl UrlSource for StaticUrlSource {
    async fn load(&self) -> Result<Vec<String>, SourceError> {
        Ok(self.urls.clone())
    }
}
