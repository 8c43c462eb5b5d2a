//! # 依赖注入具体实现
//! 
//! 提供外部容器协作者的参考实现：内存组件注册表、内存类型全集、名称生成器和容器启动器

pub mod bootstrap;
pub mod naming;
pub mod registry;
pub mod universe;

pub use bootstrap::ContainerBootstrapper;
pub use naming::{QualifiedNameGenerator, SimpleNameGenerator};
pub use registry::DefaultComponentRegistry;
pub use universe::{InMemoryTypeUniverse, TypeLoader};
