//! 桥接配置
//!
//! [`BridgeOptions`] 是可以从配置提供者读取的外部选项，
//! [`BridgeConfig`] 是构造注册器时传入的完整配置

use crate::filter::{CapabilityFilter, StaticFieldFilter, StaticMethodFilter};
use crate::predicates::{any_constant, any_getter};
use config_abstractions::ConfigProvider;
use di_abstractions::{FactoryScanner, NameGenerator, LOWEST_PRECEDENCE};
use di_impl::{QualifiedNameGenerator, SimpleNameGenerator};
use infrastructure_common::{ConfigError, ConfigSection};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// 默认配置节名称
pub const DEFAULT_SECTION: &str = "bridge";

/// 组件命名策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingStrategy {
    /// 首字母小写的简单类型名称
    #[default]
    Simple,
    /// 带编号的完全限定类型名称
    Qualified,
}

impl NamingStrategy {
    /// 对应的名称生成器
    pub fn generator(self) -> Arc<dyn NameGenerator> {
        match self {
            Self::Simple => Arc::new(SimpleNameGenerator),
            Self::Qualified => Arc::new(QualifiedNameGenerator),
        }
    }
}

/// 工厂组件缺失时的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingFactoryPolicy {
    /// 中止整个阶段
    #[default]
    Abort,
    /// 跳过该工厂扫描器并记录日志
    Skip,
}

/// 外部配置选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeOptions {
    /// 基础包，接受数组或逗号分隔的字符串
    #[serde(default, alias = "basepackages", deserialize_with = "string_or_list")]
    pub base_packages: Vec<String>,
    /// 排序值
    #[serde(default = "default_order")]
    pub order: i32,
    /// 命名策略
    #[serde(default, alias = "beannaming")]
    pub bean_naming: NamingStrategy,
    /// 工厂组件缺失时的处理策略
    #[serde(default, alias = "missingfactory")]
    pub missing_factory: MissingFactoryPolicy,
}

fn default_order() -> i32 {
    LOWEST_PRECEDENCE
}

fn string_or_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Packages {
        One(String),
        Many(Vec<String>),
    }

    let packages = match Packages::deserialize(deserializer)? {
        Packages::One(value) => value.split(',').map(str::to_string).collect(),
        Packages::Many(values) => values,
    };
    Ok(packages
        .into_iter()
        .map(|package| package.trim().to_string())
        .filter(|package| !package.is_empty())
        .collect())
}

impl Default for BridgeOptions {
    fn default() -> Self {
        Self {
            base_packages: Vec::new(),
            order: default_order(),
            bean_naming: NamingStrategy::default(),
            missing_factory: MissingFactoryPolicy::default(),
        }
    }
}

impl BridgeOptions {
    /// 从单个配置提供者读取选项，配置节不存在时使用默认值
    pub fn from_provider(provider: &dyn ConfigProvider, section: &str) -> Result<Self, ConfigError> {
        Self::from_providers(&[provider], section)
    }

    /// 从多个配置提供者读取选项，优先级高的提供者覆盖优先级低的
    pub fn from_providers(
        providers: &[&dyn ConfigProvider],
        section: &str,
    ) -> Result<Self, ConfigError> {
        let mut ordered: Vec<&dyn ConfigProvider> = providers.to_vec();
        ordered.sort_by_key(|provider| provider.priority());

        let mut merged = ConfigSection::new();
        for provider in ordered {
            match provider.get_section(section) {
                Ok(found) => {
                    debug!("从 {} 读取配置节 {}", provider.name(), section);
                    for (key, value) in found.data {
                        merged.insert(key, value);
                    }
                }
                Err(ConfigError::KeyNotFound { .. }) => {
                    debug!("{} 中没有配置节 {}", provider.name(), section);
                }
                Err(e) => return Err(e),
            }
        }

        merged.bind()
    }
}

/// 注册器配置
pub struct BridgeConfig {
    /// 扫描的基础包
    pub base_packages: Vec<String>,
    /// 排序值
    pub order: i32,
    /// 名称生成器
    pub name_generator: Arc<dyn NameGenerator>,
    /// 能力过滤器，按配置顺序匹配
    pub filters: Vec<Arc<dyn CapabilityFilter>>,
    /// 工厂扫描器，按配置顺序执行
    pub factories: Vec<Arc<dyn FactoryScanner>>,
    /// 工厂组件缺失时的处理策略
    pub missing_factory: MissingFactoryPolicy,
}

impl BridgeConfig {
    /// 使用基础包创建配置
    pub fn new<I, S>(base_packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            base_packages: base_packages.into_iter().map(Into::into).collect(),
            order: LOWEST_PRECEDENCE,
            name_generator: Arc::new(SimpleNameGenerator),
            filters: Vec::new(),
            factories: Vec::new(),
            missing_factory: MissingFactoryPolicy::Abort,
        }
    }

    /// 从外部选项创建配置，过滤器和工厂扫描器需要另外添加
    pub fn from_options(options: &BridgeOptions) -> Self {
        Self {
            order: options.order,
            name_generator: options.bean_naming.generator(),
            missing_factory: options.missing_factory,
            ..Self::new(options.base_packages.iter().cloned())
        }
    }

    /// 设置排序值
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    /// 设置名称生成器
    pub fn with_name_generator(mut self, name_generator: Arc<dyn NameGenerator>) -> Self {
        self.name_generator = name_generator;
        self
    }

    /// 添加能力过滤器
    pub fn with_filter(mut self, filter: Arc<dyn CapabilityFilter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// 添加工厂扫描器
    pub fn with_factory(mut self, factory: Arc<dyn FactoryScanner>) -> Self {
        self.factories.push(factory);
        self
    }

    /// 设置工厂组件缺失时的处理策略
    pub fn with_missing_factory_policy(mut self, policy: MissingFactoryPolicy) -> Self {
        self.missing_factory = policy;
        self
    }
}

impl fmt::Debug for BridgeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeConfig")
            .field("base_packages", &self.base_packages)
            .field("order", &self.order)
            .field(
                "filters",
                &self.filters.iter().map(|filter| filter.describe()).collect::<Vec<_>>(),
            )
            .field(
                "factories",
                &self.factories.iter().map(|factory| factory.factory_type()).collect::<Vec<_>>(),
            )
            .field("missing_factory", &self.missing_factory)
            .finish()
    }
}

/// 没有配置任何过滤器时使用的默认过滤器
///
/// 依次为：单例 getter 静态方法，常量风格的静态字段
pub fn default_filters() -> Vec<Arc<dyn CapabilityFilter>> {
    vec![
        Arc::new(StaticMethodFilter::singletons(any_getter())),
        Arc::new(StaticFieldFilter::fields(any_constant())),
    ]
}
