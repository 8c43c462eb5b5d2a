//! 配置提供者抽象接口

use infrastructure_common::{ConfigError, ConfigSection};
use serde_json::Value;
use std::collections::HashMap;

/// 配置提供者 trait
///
/// 定义从不同数据源获取配置的统一接口，所有调用都在启动阶段同步完成
pub trait ConfigProvider: Send + Sync {
    /// 获取配置值，键使用 `.` 分隔层级
    fn get_configuration(&self, key: &str) -> Result<Value, ConfigError>;

    /// 获取配置节
    fn get_section(&self, section_name: &str) -> Result<ConfigSection, ConfigError>;

    /// 检查配置键是否存在
    fn contains_key(&self, key: &str) -> bool;

    /// 获取所有配置键
    fn get_all_keys(&self) -> Vec<String>;

    /// 获取提供者名称
    fn name(&self) -> &str;

    /// 获取提供者优先级
    fn priority(&self) -> i32 {
        0
    }
}

/// 文件配置提供者 trait
pub trait FileConfigProvider: ConfigProvider {
    /// 获取文件路径
    fn file_path(&self) -> &str;

    /// 重新读取文件
    fn reload(&mut self) -> Result<(), ConfigError>;
}

/// 环境变量配置提供者 trait
pub trait EnvironmentConfigProvider: ConfigProvider {
    /// 获取环境变量前缀
    fn prefix(&self) -> &str;

    /// 获取分隔符
    fn separator(&self) -> &str;

    /// 获取所有匹配的环境变量（已转换为配置键）
    fn get_matching_env_vars(&self) -> HashMap<String, String>;
}
