//! 组件命名抽象接口

use crate::registry::ComponentRegistry;
use infrastructure_common::RegistrationDescriptor;

/// 组件名称生成器 trait
pub trait NameGenerator: Send + Sync {
    /// 为描述符生成注册名称
    fn generate(&self, descriptor: &RegistrationDescriptor, registry: &dyn ComponentRegistry) -> String;
}

impl<F> NameGenerator for F
where
    F: Fn(&RegistrationDescriptor, &dyn ComponentRegistry) -> String + Send + Sync,
{
    fn generate(&self, descriptor: &RegistrationDescriptor, registry: &dyn ComponentRegistry) -> String {
        self(descriptor, registry)
    }
}
