//! # Configuration Implementation
//! 
//! 配置提供者的具体实现。
//! 
//! ## 主要组件
//! 
//! - [`TomlConfigProvider`] - TOML 配置提供者
//! - [`JsonConfigProvider`] - JSON 配置提供者
//! - [`EnvironmentConfigProviderImpl`] - 环境变量配置提供者
//! - [`MemoryConfigProvider`] - 内存配置提供者

pub mod providers;

pub use providers::*;
