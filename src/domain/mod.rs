// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 包含探测流水线的核心数据类型，不依赖任何网络或文件实现。
pub mod models;
