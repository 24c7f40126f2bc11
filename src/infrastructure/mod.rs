// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施模块
///
/// 提供外部协作方的实现：URL 来源与指标记录器
pub mod metrics;
pub mod url_source;

pub use url_source::{FileUrlSource, StaticUrlSource, UrlSource};
