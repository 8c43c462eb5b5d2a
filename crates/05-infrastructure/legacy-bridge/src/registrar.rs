//! 幂等的遗留组件注册器
//!
//! 每个注册表标识依次经历 `未开始 -> 已扫描 -> 工厂就绪` 三个状态，
//! 每个生命周期钩子对同一个注册表只能调用一次。
//!
//! 外部注册表在启动期间只有一个写入者，注册器不对注册表加锁。

use crate::config::{default_filters, BridgeConfig, MissingFactoryPolicy};
use crate::filter::CapabilityFilter;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use di_abstractions::{
    ComponentRegistry, PhaseReport, RegistryId, RegistryPostProcessor, TypeSource,
    TypeUniverseScanner,
};
use infrastructure_common::{RegistrationDescriptor, RegistrationError, TypeMetadata};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 注册表阶段的钩子名称
const REGISTRY_PHASE: &str = "post_process_registry";

/// 工厂阶段的钩子名称
const FACTORY_PHASE: &str = "post_process_factory";

/// 注册表的处理进度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgePhase {
    /// 尚未处理
    Unstarted,
    /// 已完成类型扫描
    Scanned,
    /// 已完成工厂扫描
    FactoryReady,
}

/// 遗留组件注册器
pub struct LegacyComponentRegistrar {
    /// 注册器配置
    config: BridgeConfig,
    /// 生效的能力过滤器
    filters: Vec<Arc<dyn CapabilityFilter>>,
    /// 类型解析器
    types: Arc<dyn TypeSource>,
    /// 候选类型扫描器
    scanner: Arc<dyn TypeUniverseScanner>,
    /// 已处理的注册表
    phases: DashMap<RegistryId, BridgePhase>,
}

impl LegacyComponentRegistrar {
    /// 创建注册器，没有配置过滤器时使用 [`default_filters`]
    pub fn new(
        config: BridgeConfig,
        types: Arc<dyn TypeSource>,
        scanner: Arc<dyn TypeUniverseScanner>,
    ) -> Self {
        let filters = if config.filters.is_empty() {
            info!("未配置能力过滤器，使用默认的 getter 方法和常量字段过滤器");
            default_filters()
        } else {
            config.filters.clone()
        };

        Self {
            config,
            filters,
            types,
            scanner,
            phases: DashMap::new(),
        }
    }

    /// 注册器配置
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// 指定注册表的处理进度
    pub fn phase_of(&self, registry: RegistryId) -> BridgePhase {
        self.phases
            .get(&registry)
            .map_or(BridgePhase::Unstarted, |phase| *phase)
    }

    /// 扫描基础包并注册满足任一过滤器的类型
    fn scan_phase(
        &self,
        registry: &mut dyn ComponentRegistry,
    ) -> Result<PhaseReport, RegistrationError> {
        info!("开始扫描遗留组件，基础包: {:?}", self.config.base_packages);

        let types = self.types.as_ref();
        let include = |metadata: &TypeMetadata| {
            self.filters
                .iter()
                .any(|filter| filter.matches_metadata(types, metadata))
        };
        let candidates = self
            .scanner
            .scan_candidates(&self.config.base_packages, &include)?;

        let mut report = PhaseReport::default();
        for metadata in candidates {
            let mut descriptor = RegistrationDescriptor::for_type(metadata.name.as_str());
            if let Some(filter) = self
                .filters
                .iter()
                .find(|filter| filter.matches_descriptor(types, &descriptor))
            {
                filter.customize(types, &mut descriptor);
            }
            self.register(registry, descriptor, &mut report)?;
        }

        info!(
            "遗留组件扫描完成，注册 {} 个，跳过 {} 个",
            report.registered.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    /// 执行所有工厂扫描器并注册产生的组件
    fn factory_phase(
        &self,
        registry: &mut dyn ComponentRegistry,
    ) -> Result<PhaseReport, RegistrationError> {
        let mut report = PhaseReport::default();

        for factory in &self.config.factories {
            let descriptors = match factory.scan(&*registry) {
                Ok(descriptors) => descriptors,
                Err(e @ RegistrationError::MissingFactoryDeclaration { .. })
                    if self.config.missing_factory == MissingFactoryPolicy::Skip =>
                {
                    warn!("跳过工厂 {}: {}", factory.factory_type(), e);
                    continue;
                }
                Err(e) => return Err(e),
            };

            for descriptor in descriptors {
                self.register(registry, descriptor, &mut report)?;
            }
        }

        info!(
            "工厂方法扫描完成，注册 {} 个，跳过 {} 个",
            report.registered.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    /// 生成名称并插入描述符，名称已存在时跳过
    fn register(
        &self,
        registry: &mut dyn ComponentRegistry,
        descriptor: RegistrationDescriptor,
        report: &mut PhaseReport,
    ) -> Result<(), RegistrationError> {
        let name = self.config.name_generator.generate(&descriptor, &*registry);
        if registry.contains(&name) {
            debug!("组件名称 {} 已存在，跳过", name);
            report.skipped.push(name);
            return Ok(());
        }

        debug!(
            "注册遗留组件 {} (类型 {:?}，作用域 {}，延迟 {})",
            name, descriptor.owner_type, descriptor.scope, descriptor.lazy
        );
        registry.insert(&name, descriptor)?;
        report.registered.push(name);
        Ok(())
    }

    fn duplicate_invocation(phase: &str, registry: RegistryId) -> RegistrationError {
        RegistrationError::DuplicateInvocation {
            phase: phase.to_string(),
            registry: registry.to_string(),
        }
    }
}

impl RegistryPostProcessor for LegacyComponentRegistrar {
    fn post_process_registry(
        &self,
        registry: &mut dyn ComponentRegistry,
    ) -> Result<PhaseReport, RegistrationError> {
        let id = registry.id();
        match self.phases.entry(id) {
            Entry::Occupied(entry) => {
                let phase = if *entry.get() == BridgePhase::FactoryReady {
                    FACTORY_PHASE
                } else {
                    REGISTRY_PHASE
                };
                return Err(Self::duplicate_invocation(phase, id));
            }
            Entry::Vacant(entry) => {
                entry.insert(BridgePhase::Scanned);
            }
        }

        self.scan_phase(registry)
    }

    fn post_process_factory(
        &self,
        registry: &mut dyn ComponentRegistry,
    ) -> Result<PhaseReport, RegistrationError> {
        let id = registry.id();
        let needs_scan = match self.phases.entry(id) {
            Entry::Occupied(mut entry) => {
                if *entry.get() == BridgePhase::FactoryReady {
                    return Err(Self::duplicate_invocation(FACTORY_PHASE, id));
                }
                entry.insert(BridgePhase::FactoryReady);
                false
            }
            Entry::Vacant(entry) => {
                entry.insert(BridgePhase::FactoryReady);
                true
            }
        };

        let mut report = if needs_scan {
            info!("注册表 {} 未经过注册表阶段，先执行扫描", id);
            self.scan_phase(registry)?
        } else {
            PhaseReport::default()
        };
        report.merge(self.factory_phase(registry)?);
        Ok(report)
    }

    fn order(&self) -> i32 {
        self.config.order
    }
}

impl fmt::Debug for LegacyComponentRegistrar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LegacyComponentRegistrar")
            .field("config", &self.config)
            .field("scanner", &self.scanner.name())
            .field("processed", &self.phases.len())
            .finish()
    }
}
