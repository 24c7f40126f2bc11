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

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

/// 配置错误类型
#[derive(Error, Debug)]
pub enum SettingsError {
    /// 配置加载失败
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ConfigError),
    /// 配置校验失败
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ValidationErrors),
}

/// 应用程序配置设置
///
/// 包含 URL 来源、探测策略和持久日志等所有配置项
#[derive(Debug, Deserialize, Validate)]
pub struct Settings {
    /// URL 来源配置
    #[validate(nested)]
    pub source: SourceSettings,
    /// 探测配置
    #[validate(nested)]
    pub probe: ProbeSettings,
    /// 持久日志配置
    #[validate(nested)]
    pub log: LogSettings,
}

/// URL 来源配置设置
#[derive(Debug, Deserialize, Validate)]
pub struct SourceSettings {
    /// URL 列表文件路径，每行一个 URL
    #[validate(length(min = 1))]
    pub path: String,
}

/// 探测方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProbeMethod {
    /// 带 Range 头的 GET，只读取前 512 字节
    #[default]
    RangeGet,
    /// HEAD 请求，最多跟随 10 次重定向
    Head,
    /// ICMP 回显
    Icmp,
    /// 完整 GET，无客户端超时与响应体限制
    PlainGet,
}

impl fmt::Display for ProbeMethod {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ProbeMethod::RangeGet => write!(f, "range_get"),
            ProbeMethod::Head => write!(f, "head"),
            ProbeMethod::Icmp => write!(f, "icmp"),
            ProbeMethod::PlainGet => write!(f, "plain_get"),
        }
    }
}

/// 探测配置设置
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProbeSettings {
    /// 探测方式
    pub method: ProbeMethod,
    /// 单次探测截止时间（秒）
    #[validate(range(min = 1, max = 3600))]
    pub timeout_secs: u64,
    /// 工作器数量
    #[validate(range(min = 1, max = 256))]
    pub workers: usize,
    /// ICMP 回显次数
    #[validate(range(min = 1, max = 100))]
    pub icmp_count: u32,
}

impl ProbeSettings {
    /// 单次探测截止时间
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// 持久日志配置设置
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LogSettings {
    /// 日志文件路径（追加写入）
    #[validate(length(min = 1))]
    pub path: String,
    /// 定时刷新间隔（毫秒）
    #[validate(range(min = 1))]
    pub flush_interval_ms: u64,
    /// 日志队列容量
    #[validate(range(min = 1))]
    pub queue_capacity: usize,
}

impl LogSettings {
    /// 定时刷新间隔
    pub fn flush_interval(&self) -> Duration {
        Duration::from_millis(self.flush_interval_ms)
    }
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次叠加默认值、`config/default`、`config/{APP_ENVIRONMENT}` 和 `PINGRS__*` 环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载并通过校验的配置
    /// * `Err(SettingsError)` - 配置加载或校验失败
    pub fn new() -> Result<Self, SettingsError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("PINGRS").separator("__"));

        Self::load(builder)
    }

    /// 仅包含默认值的配置构建器
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            // Default source settings
            .set_default("source.path", "urls.txt")?
            // Default probe settings
            .set_default("probe.method", "range_get")?
            .set_default("probe.timeout_secs", 10)?
            .set_default("probe.workers", 5)?
            .set_default("probe.icmp_count", 3)?
            // Default log sink settings
            .set_default("log.path", "pingrs.log")?
            .set_default("log.flush_interval_ms", 10_000)?
            .set_default("log.queue_capacity", 100)
    }

    /// 从构建器加载并校验配置
    pub fn load(builder: ConfigBuilder<DefaultState>) -> Result<Self, SettingsError> {
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }
}
