//! # Dependency Injection Abstractions
//! 
//! 依赖注入抽象层，定义桥接层与外部容器之间的协作接口。
//! 
//! ## 核心接口
//! 
//! - [`ComponentRegistry`] - 组件注册表接口
//! - [`TypeSource`] / [`TypeUniverseScanner`] - 类型解析与候选类型扫描
//! - [`NameGenerator`] - 组件命名
//! - [`FactoryScanner`] - 工厂方法扫描
//! - [`ComponentResolver`] - 组件解析
//! - [`RegistryPostProcessor`] - 容器生命周期钩子

pub mod registry;
pub mod scanner;
pub mod naming;
pub mod resolver;
pub mod factory;
pub mod container;

pub use registry::*;
pub use scanner::*;
pub use naming::*;
pub use resolver::*;
pub use factory::*;
pub use container::*;
