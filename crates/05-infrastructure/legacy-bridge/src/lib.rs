//! # 遗留组件桥接层
//!
//! 这个 crate 在不触发遗留代码副作用的前提下，发现遗留类型中的静态单例字段、
//! 静态工厂方法以及已注册工厂组件的实例方法，并把它们注册到外部组件容器中。
//!
//! ## 主要功能
//!
//! - **成员谓词**: 可组合的成员判定条件
//! - **能力过滤器**: 按成员种类参数化的类型过滤与描述符定制
//! - **工厂方法扫描**: 从已注册的工厂组件产生依赖于它的组件
//! - **幂等注册**: 两阶段、每个注册表只执行一次的注册流程
//! - **遗留代码访问**: 启动完成后供遗留代码获取组件的句柄
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use di_impl::{ContainerBootstrapper, DefaultComponentRegistry, InMemoryTypeUniverse};
//! use legacy_bridge::{predicates, BridgeConfig, LegacyAccess, LegacyComponentRegistrar, StaticFieldFilter};
//! use std::sync::Arc;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let universe = Arc::new(InMemoryTypeUniverse::new());
//!     let config = BridgeConfig::new(["example.legacy"])
//!         .with_filter(Arc::new(StaticFieldFilter::fields(predicates::all())));
//!     let registrar = LegacyComponentRegistrar::new(config, universe.clone(), universe);
//!
//!     let mut registry = DefaultComponentRegistry::new();
//!     ContainerBootstrapper::new()
//!         .with_processor(Arc::new(registrar))
//!         .bootstrap(&mut registry)?;
//!
//!     let access = LegacyAccess::new();
//!     access.install(Arc::new(registry))?;
//!     Ok(())
//! }
//! ```

pub mod access;
pub mod config;
pub mod factory_scanner;
pub mod filter;
pub mod predicates;
pub mod registrar;

#[cfg(test)]
mod tests;

// 重新导出主要类型
pub use access::{AccessError, DeferredComponent, LegacyAccess};
pub use config::{
    default_filters, BridgeConfig, BridgeOptions, MissingFactoryPolicy, NamingStrategy,
    DEFAULT_SECTION,
};
pub use factory_scanner::FactoryMethodScanner;
pub use filter::{
    AccessDescriptor, AccessRule, CapabilityFilter, CustomizingTypeFilter, StaticFieldFilter,
    StaticMethodFilter,
};
pub use predicates::{AccessKind, FieldAccess, MemberPredicate, MethodAccess};
pub use registrar::{BridgePhase, LegacyComponentRegistrar};
