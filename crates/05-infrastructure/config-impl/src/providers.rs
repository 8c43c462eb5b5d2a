//! 配置提供者实现

use config_abstractions::{
    ConfigProvider, EnvironmentConfigProvider as EnvironmentConfigProviderTrait,
    FileConfigProvider,
};
use infrastructure_common::{ConfigError, ConfigSection};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 从嵌套路径获取值
fn get_nested_value<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(root, |current, part| current.get(part))
}

/// 递归收集所有键
fn collect_keys(obj: &serde_json::Map<String, Value>, prefix: &str, keys: &mut Vec<String>) {
    for (key, value) in obj {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        keys.push(full_key.clone());

        if let Value::Object(nested_obj) = value {
            collect_keys(nested_obj, &full_key, keys);
        }
    }
}

/// 将对象值转换为配置节
fn section_from_value(section_name: &str, value: Option<&Value>) -> Result<ConfigSection, ConfigError> {
    match value {
        Some(Value::Object(obj)) => {
            let mut section = ConfigSection::new();
            for (key, value) in obj {
                section.insert(key.clone(), value.clone());
            }
            Ok(section)
        }
        Some(_) => Err(ConfigError::TypeConversionError {
            message: format!("配置节 {} 不是对象类型", section_name),
        }),
        None => Err(ConfigError::KeyNotFound {
            key: section_name.to_string(),
        }),
    }
}

/// 将 TOML 值转换为 JSON 值
fn toml_to_json(value: &toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s.clone()),
        toml::Value::Integer(i) => Value::Number(serde_json::Number::from(*i)),
        toml::Value::Float(f) => Value::Number(
            serde_json::Number::from_f64(*f).unwrap_or_else(|| serde_json::Number::from(0)),
        ),
        toml::Value::Boolean(b) => Value::Bool(*b),
        toml::Value::Array(arr) => Value::Array(arr.iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .iter()
                .map(|(k, v)| (k.clone(), toml_to_json(v)))
                .collect(),
        ),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
    }
}

/// 将环境变量字符串解析为最合适的 JSON 值
fn parse_env_value(value: &str) -> Value {
    if let Ok(bool_val) = value.parse::<bool>() {
        Value::Bool(bool_val)
    } else if let Ok(int_val) = value.parse::<i64>() {
        Value::Number(serde_json::Number::from(int_val))
    } else if let Ok(float_val) = value.parse::<f64>() {
        serde_json::Number::from_f64(float_val)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(value.to_string()))
    } else {
        Value::String(value.to_string())
    }
}

/// TOML 配置提供者
#[derive(Debug)]
pub struct TomlConfigProvider {
    file_path: PathBuf,
    config: Value,
    priority: i32,
}

impl TomlConfigProvider {
    /// 创建新的 TOML 配置提供者
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut provider = Self {
            file_path: path.as_ref().to_path_buf(),
            config: Value::Null,
            priority: 100, // TOML 文件默认高优先级
        };

        provider.load_config()?;
        Ok(provider)
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// 加载配置文件
    fn load_config(&mut self) -> Result<(), ConfigError> {
        debug!("加载 TOML 配置文件: {}", self.file_path.display());

        if !self.file_path.exists() {
            return Err(ConfigError::FileNotFound {
                path: self.file_path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(&self.file_path)?;
        let parsed: toml::Value = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            source: Box::new(e),
        })?;
        self.config = toml_to_json(&parsed);

        debug!("TOML 配置文件加载完成");
        Ok(())
    }
}

impl ConfigProvider for TomlConfigProvider {
    fn get_configuration(&self, key: &str) -> Result<Value, ConfigError> {
        get_nested_value(&self.config, key)
            .cloned()
            .ok_or_else(|| ConfigError::KeyNotFound { key: key.to_string() })
    }

    fn get_section(&self, section_name: &str) -> Result<ConfigSection, ConfigError> {
        section_from_value(section_name, get_nested_value(&self.config, section_name))
    }

    fn contains_key(&self, key: &str) -> bool {
        get_nested_value(&self.config, key).is_some()
    }

    fn get_all_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        if let Value::Object(obj) = &self.config {
            collect_keys(obj, "", &mut keys);
        }
        keys
    }

    fn name(&self) -> &str {
        "TomlConfigProvider"
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

impl FileConfigProvider for TomlConfigProvider {
    fn file_path(&self) -> &str {
        self.file_path.to_str().unwrap_or("unknown")
    }

    fn reload(&mut self) -> Result<(), ConfigError> {
        self.load_config()
    }
}

/// JSON 配置提供者
#[derive(Debug)]
pub struct JsonConfigProvider {
    file_path: PathBuf,
    config: Value,
    priority: i32,
}

impl JsonConfigProvider {
    /// 创建新的 JSON 配置提供者
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut provider = Self {
            file_path: path.as_ref().to_path_buf(),
            config: Value::Null,
            priority: 90, // JSON 文件中等优先级
        };

        provider.load_config()?;
        Ok(provider)
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// 加载配置文件
    fn load_config(&mut self) -> Result<(), ConfigError> {
        debug!("加载 JSON 配置文件: {}", self.file_path.display());

        if !self.file_path.exists() {
            return Err(ConfigError::FileNotFound {
                path: self.file_path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(&self.file_path)?;
        self.config = serde_json::from_str(&content)?;

        debug!("JSON 配置文件加载完成");
        Ok(())
    }
}

impl ConfigProvider for JsonConfigProvider {
    fn get_configuration(&self, key: &str) -> Result<Value, ConfigError> {
        get_nested_value(&self.config, key)
            .cloned()
            .ok_or_else(|| ConfigError::KeyNotFound { key: key.to_string() })
    }

    fn get_section(&self, section_name: &str) -> Result<ConfigSection, ConfigError> {
        section_from_value(section_name, get_nested_value(&self.config, section_name))
    }

    fn contains_key(&self, key: &str) -> bool {
        get_nested_value(&self.config, key).is_some()
    }

    fn get_all_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        if let Value::Object(obj) = &self.config {
            collect_keys(obj, "", &mut keys);
        }
        keys
    }

    fn name(&self) -> &str {
        "JsonConfigProvider"
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

impl FileConfigProvider for JsonConfigProvider {
    fn file_path(&self) -> &str {
        self.file_path.to_str().unwrap_or("unknown")
    }

    fn reload(&mut self) -> Result<(), ConfigError> {
        self.load_config()
    }
}

/// 环境变量配置提供者
///
/// `LEGACY_BRIDGE_ORDER` 在前缀为 `LEGACY` 时映射为配置键 `bridge.order`
#[derive(Debug)]
pub struct EnvironmentConfigProviderImpl {
    prefix: String,
    separator: String,
    priority: i32,
    env_vars: HashMap<String, String>,
}

impl EnvironmentConfigProviderImpl {
    /// 从当前进程环境变量创建提供者
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::from_vars(prefix, std::env::vars())
    }

    /// 从给定的变量集合创建提供者
    pub fn from_vars<I, K, V>(prefix: impl Into<String>, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut provider = Self {
            prefix: prefix.into(),
            separator: "_".to_string(),
            priority: 200, // 环境变量最高优先级
            env_vars: HashMap::new(),
        };

        for (key, value) in vars {
            let key = key.into();
            if key.starts_with(&provider.prefix) {
                let config_key = provider.env_key_to_config_key(&key);
                provider.env_vars.insert(config_key, value.into());
            }
        }

        debug!("加载了 {} 个环境变量，前缀: {}", provider.env_vars.len(), provider.prefix);
        provider
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// 将环境变量键转换为配置键
    fn env_key_to_config_key(&self, env_key: &str) -> String {
        let key = env_key
            .strip_prefix(&self.prefix)
            .unwrap_or(env_key)
            .trim_start_matches(&self.separator);

        // 将下划线转换为点分隔符，并转换为小写
        key.replace(&self.separator, ".").to_lowercase()
    }
}

impl ConfigProvider for EnvironmentConfigProviderImpl {
    fn get_configuration(&self, key: &str) -> Result<Value, ConfigError> {
        self.env_vars
            .get(&key.to_lowercase())
            .map(|value| parse_env_value(value))
            .ok_or_else(|| ConfigError::KeyNotFound { key: key.to_string() })
    }

    fn get_section(&self, section_name: &str) -> Result<ConfigSection, ConfigError> {
        let mut section = ConfigSection::new();
        let section_prefix = format!("{}.", section_name.to_lowercase());

        for (key, value) in &self.env_vars {
            if let Some(sub_key) = key.strip_prefix(&section_prefix) {
                section.insert(sub_key.to_string(), parse_env_value(value));
            }
        }

        if section.is_empty() {
            Err(ConfigError::KeyNotFound {
                key: section_name.to_string(),
            })
        } else {
            Ok(section)
        }
    }

    fn contains_key(&self, key: &str) -> bool {
        self.env_vars.contains_key(&key.to_lowercase())
    }

    fn get_all_keys(&self) -> Vec<String> {
        self.env_vars.keys().cloned().collect()
    }

    fn name(&self) -> &str {
        "EnvironmentConfigProvider"
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}

impl EnvironmentConfigProviderTrait for EnvironmentConfigProviderImpl {
    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn separator(&self) -> &str {
        &self.separator
    }

    fn get_matching_env_vars(&self) -> HashMap<String, String> {
        self.env_vars.clone()
    }
}

/// 内存配置提供者，主要用于程序化配置和测试
#[derive(Debug, Clone)]
pub struct MemoryConfigProvider {
    config: Value,
    priority: i32,
}

impl MemoryConfigProvider {
    /// 使用 JSON 值创建提供者
    pub fn new(config: Value) -> Self {
        Self {
            config,
            priority: 0,
        }
    }

    /// 设置优先级
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }
}

impl ConfigProvider for MemoryConfigProvider {
    fn get_configuration(&self, key: &str) -> Result<Value, ConfigError> {
        get_nested_value(&self.config, key)
            .cloned()
            .ok_or_else(|| ConfigError::KeyNotFound { key: key.to_string() })
    }

    fn get_section(&self, section_name: &str) -> Result<ConfigSection, ConfigError> {
        section_from_value(section_name, get_nested_value(&self.config, section_name))
    }

    fn contains_key(&self, key: &str) -> bool {
        get_nested_value(&self.config, key).is_some()
    }

    fn get_all_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        if let Value::Object(obj) = &self.config {
            collect_keys(obj, "", &mut keys);
        }
        keys
    }

    fn name(&self) -> &str {
        "MemoryConfigProvider"
    }

    fn priority(&self) -> i32 {
        self.priority
    }
}
