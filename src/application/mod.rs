// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含编排一次完整探测运行的调度器
pub mod dispatcher;

pub use dispatcher::{DispatchConfig, Dispatcher};
