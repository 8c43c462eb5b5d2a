//! 容器启动器

use crate::registry::DefaultComponentRegistry;
use di_abstractions::{PhaseReport, RegistryPostProcessor};
use infrastructure_common::InfrastructureError;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info};

/// 容器启动器
///
/// 模拟外部容器的启动过程：按排序值依次执行所有后置处理器的注册表阶段，
/// 再依次执行工厂阶段，最后预实例化非延迟单例
pub struct ContainerBootstrapper {
    /// 后置处理器列表
    processors: Vec<Arc<dyn RegistryPostProcessor>>,
    /// 宿主是否提供注册表阶段钩子
    registry_phase_enabled: bool,
    /// 是否预实例化非延迟单例
    eager_singletons: bool,
}

impl ContainerBootstrapper {
    /// 创建新的容器启动器
    pub fn new() -> Self {
        Self {
            processors: Vec::new(),
            registry_phase_enabled: true,
            eager_singletons: true,
        }
    }

    /// 添加后置处理器
    pub fn with_processor(mut self, processor: Arc<dyn RegistryPostProcessor>) -> Self {
        self.processors.push(processor);
        self
    }

    /// 设置宿主是否提供注册表阶段钩子
    ///
    /// 关闭后只调用工厂阶段，用于只支持工厂阶段钩子的宿主
    pub fn with_registry_phase(mut self, enabled: bool) -> Self {
        self.registry_phase_enabled = enabled;
        self
    }

    /// 设置是否预实例化非延迟单例
    pub fn with_eager_singletons(mut self, enabled: bool) -> Self {
        self.eager_singletons = enabled;
        self
    }

    /// 启动容器，返回所有阶段合并后的结果
    pub fn bootstrap(
        &self,
        registry: &mut DefaultComponentRegistry,
    ) -> Result<PhaseReport, InfrastructureError> {
        info!("开始启动容器，共 {} 个后置处理器", self.processors.len());

        let mut ordered: Vec<&Arc<dyn RegistryPostProcessor>> = self.processors.iter().collect();
        ordered.sort_by_key(|processor| processor.order());

        let mut report = PhaseReport::default();

        if self.registry_phase_enabled {
            for processor in &ordered {
                debug!("执行注册表阶段，排序值 {}", processor.order());
                let phase = processor.post_process_registry(registry).map_err(|e| {
                    error!("注册表阶段失败: {}", e);
                    e
                })?;
                report.merge(phase);
            }
        }

        for processor in &ordered {
            debug!("执行工厂阶段，排序值 {}", processor.order());
            let phase = processor.post_process_factory(registry).map_err(|e| {
                error!("工厂阶段失败: {}", e);
                e
            })?;
            report.merge(phase);
        }

        if self.eager_singletons {
            registry.pre_instantiate_singletons()?;
        }

        info!(
            "容器启动完成，注册 {} 个组件，跳过 {} 个",
            report.registered.len(),
            report.skipped.len()
        );
        Ok(report)
    }
}

impl Default for ContainerBootstrapper {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ContainerBootstrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerBootstrapper")
            .field("processors", &self.processors.len())
            .field("registry_phase_enabled", &self.registry_phase_enabled)
            .field("eager_singletons", &self.eager_singletons)
            .finish()
    }
}
