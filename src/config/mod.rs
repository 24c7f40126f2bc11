// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理 URL 来源、探测策略、工作器数量和持久日志等配置
pub mod settings;
