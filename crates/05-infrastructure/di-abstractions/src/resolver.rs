//! 组件解析器抽象接口
//!
//! 提供按名称解析组件实例的能力

use infrastructure_common::{DependencyError, Instance};
use std::any::Any;
use std::sync::Arc;

/// 组件解析器 trait
///
/// 负责解析组件依赖并创建组件实例
pub trait ComponentResolver: Send + Sync {
    /// 解析指定名称的组件
    fn resolve_by_name(&self, name: &str) -> Result<Instance, DependencyError>;

    /// 检查是否可以解析指定名称的组件
    fn can_resolve_by_name(&self, name: &str) -> bool;
}

/// 带类型转换的解析扩展
pub trait ComponentResolverExt: ComponentResolver {
    /// 解析组件并转换为具体类型
    fn resolve_typed<T>(&self, name: &str) -> Result<Arc<T>, DependencyError>
    where
        T: Any + Send + Sync,
    {
        self.resolve_by_name(name)?
            .downcast::<T>()
            .map_err(|_| DependencyError::TypeMismatch {
                name: name.to_string(),
                expected: std::any::type_name::<T>().to_string(),
            })
    }
}

impl<R: ComponentResolver + ?Sized> ComponentResolverExt for R {}
