//! 工具模块
//!
//! - logger: 日志系统初始化与结构化日志宏
//! - time_utils: 时间戳与日历日期转换

pub mod logger;
pub mod time_utils;
