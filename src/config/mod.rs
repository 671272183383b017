//! 配置管理
//!
//! 配置来源优先级（低 → 高）：内置默认值、`config.toml`、`config.{APP_ENV}.toml`、
//! `LMS_` 前缀环境变量、常用环境变量覆盖。

mod r#impl;
mod structs;

pub use structs::*;
