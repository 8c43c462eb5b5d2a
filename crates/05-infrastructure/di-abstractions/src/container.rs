//! 容器生命周期钩子抽象接口
//!
//! 外部容器在启动时按顺序调用两个钩子：先注册表阶段，再工厂阶段

use crate::registry::ComponentRegistry;
use infrastructure_common::RegistrationError;

/// 最高优先级
pub const HIGHEST_PRECEDENCE: i32 = i32::MIN;

/// 最低优先级（默认值）
pub const LOWEST_PRECEDENCE: i32 = i32::MAX;

/// 单个生命周期阶段的执行结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseReport {
    /// 本阶段新插入的组件名称
    pub registered: Vec<String>,
    /// 因名称已存在而跳过的组件名称
    pub skipped: Vec<String>,
}

impl PhaseReport {
    /// 合并另一个阶段的结果
    pub fn merge(&mut self, other: PhaseReport) {
        self.registered.extend(other.registered);
        self.skipped.extend(other.skipped);
    }

    /// 本阶段是否没有任何效果
    pub fn is_empty(&self) -> bool {
        self.registered.is_empty() && self.skipped.is_empty()
    }
}

/// 注册表后置处理器 trait
///
/// 每个钩子对同一注册表只能调用一次
pub trait RegistryPostProcessor: Send + Sync {
    /// 注册表阶段：扫描并注册组件
    fn post_process_registry(
        &self,
        registry: &mut dyn ComponentRegistry,
    ) -> Result<PhaseReport, RegistrationError>;

    /// 工厂阶段：注册由工厂组件产生的组件
    fn post_process_factory(
        &self,
        registry: &mut dyn ComponentRegistry,
    ) -> Result<PhaseReport, RegistrationError>;

    /// 排序值，数值越小越先执行
    fn order(&self) -> i32 {
        LOWEST_PRECEDENCE
    }
}
