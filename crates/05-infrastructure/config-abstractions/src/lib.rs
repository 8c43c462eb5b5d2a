//! # Configuration Abstractions
//! 
//! 配置访问抽象层，桥接层通过它读取外部配置（扫描包、排序值、命名策略等）。
//! 
//! ## 核心接口
//! 
//! - [`ConfigProvider`] - 配置提供者接口

pub mod provider;

pub use provider::*;
