// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含编排一次完整探测运行的调度器
pub mod application;

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 包含探测结果、日志记录和运行统计等核心数据类型
pub mod domain;

/// 基础设施模块
///
/// 提供 URL 来源等外部协作方的实现
pub mod infrastructure;

/// 探测模块
///
/// 实现可插拔的探测策略（Range GET、HEAD、ICMP、完整 GET）
pub mod probes;

/// 工具模块
///
/// 提供错误类型和诊断日志初始化
pub mod utils;

/// 工作器模块
///
/// 实现探测工作器池和持久日志接收器
pub mod workers;
