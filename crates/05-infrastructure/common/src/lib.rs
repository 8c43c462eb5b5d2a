//! # Infrastructure Common
//!
//! 遗留组件桥接层的公共基础 crate，提供反射模型、注册描述符和错误类型。
//!
//! ## 核心类型
//!
//! - [`TypeMetadata`] / [`LegacyType`] - 轻量类型元数据与已加载的类型
//! - [`MemberInfo`] - 字段或方法成员（带访问器）
//! - [`RegistrationDescriptor`] - 组件注册描述符
//! - [`ComponentScope`] - 组件作用域
//! - [`ConfigSection`] - 配置节
//!
//! ## 设计原则
//!
//! - 发现阶段只读取元数据，绝不调用遗留代码
//! - 软失败（类型无法解析）用 `Result` 表达，由调用方吸收为"不匹配"
//! - 致命错误同步向上传播

pub mod component;
pub mod configuration;
pub mod errors;
pub mod metadata;
pub mod reflection;

pub use component::*;
pub use configuration::*;
pub use errors::*;
pub use metadata::*;
pub use reflection::*;
