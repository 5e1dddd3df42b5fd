//! # 通用类型和工具
//!
//! 时间戳规范化相关的类型转换和工具函数

pub mod timestamp;

pub use timestamp::{ConvertToUtc, SOURCE_TZ, normalize, range_bounds};
