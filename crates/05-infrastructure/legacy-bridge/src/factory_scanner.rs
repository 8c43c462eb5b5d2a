//! 工厂方法扫描器
//!
//! 从已注册的工厂组件的实例方法产生依赖于该工厂的组件描述符

use crate::predicates::{MemberPredicate, MethodAccess};
use di_abstractions::{ComponentRegistry, DescriptorIter, FactoryScanner, TypeSource};
use infrastructure_common::{
    ComponentScope, InstantiationStrategy, LegacyType, MemberInfo, MemberKind, RegistrationDescriptor,
    RegistrationError, ROOT_TYPE_NAME,
};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// 工厂方法扫描器
pub struct FactoryMethodScanner {
    /// 类型解析器
    types: Arc<dyn TypeSource>,
    /// 工厂类型的完全限定名称
    factory_type: String,
    /// 调用方附加的方法条件
    predicate: MemberPredicate<MethodAccess>,
    /// 产生的组件的作用域
    scope: ComponentScope,
}

impl FactoryMethodScanner {
    /// 创建产生单例的工厂方法扫描器
    pub fn new(
        types: Arc<dyn TypeSource>,
        factory_type: impl Into<String>,
        predicate: MemberPredicate<MethodAccess>,
    ) -> Self {
        Self {
            types,
            factory_type: factory_type.into(),
            predicate,
            scope: ComponentScope::Singleton,
        }
    }

    /// 设置产生的组件的作用域
    pub fn with_scope(mut self, scope: ComponentScope) -> Self {
        self.scope = scope;
        self
    }

    /// 工厂方法的固有条件：非静态、可见、无参、不是根类型声明的方法，返回类型可以作为组件
    fn is_factory_method(member: &MemberInfo) -> bool {
        member.kind == MemberKind::Method
            && !member.is_static()
            && member.is_visible()
            && member.parameter_count == 0
            && member.declaring_type != ROOT_TYPE_NAME
            && member.value_type.is_component_type()
    }
}

impl FactoryScanner for FactoryMethodScanner {
    fn scan<'a>(
        &'a self,
        registry: &dyn ComponentRegistry,
    ) -> Result<DescriptorIter<'a>, RegistrationError> {
        let legacy_type = self
            .types
            .resolve(&self.factory_type)
            .map_err(|e| RegistrationError::missing_factory(&self.factory_type, e.to_string()))?;

        let factory_name = registry.find_by_owner_type(&self.factory_type).ok_or_else(|| {
            RegistrationError::missing_factory(&self.factory_type, "工厂组件尚未注册")
        })?;

        debug!("扫描工厂 {} 的工厂方法", factory_name);
        Ok(Box::new(FactoryMethods {
            scanner: self,
            legacy_type,
            factory_name,
            position: 0,
        }))
    }

    fn factory_type(&self) -> &str {
        &self.factory_type
    }
}

impl fmt::Debug for FactoryMethodScanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FactoryMethodScanner")
            .field("factory_type", &self.factory_type)
            .field("scope", &self.scope)
            .finish()
    }
}

/// 惰性的工厂方法序列
struct FactoryMethods<'a> {
    scanner: &'a FactoryMethodScanner,
    legacy_type: Arc<LegacyType>,
    factory_name: String,
    position: usize,
}

impl Iterator for FactoryMethods<'_> {
    type Item = RegistrationDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(member) = self.legacy_type.members().get(self.position) {
            self.position += 1;
            if !FactoryMethodScanner::is_factory_method(member) || !self.scanner.predicate.test(member) {
                continue;
            }
            let Some(product_type) = member.value_type.type_name() else {
                continue;
            };

            let mut descriptor = RegistrationDescriptor::for_type(product_type)
                .with_scope(self.scanner.scope)
                .with_depends_on(self.factory_name.clone());
            descriptor.strategy = InstantiationStrategy::InvokeFactoryMethod {
                factory: self.factory_name.clone(),
                method: Arc::new(member.clone()),
            };
            return Some(descriptor);
        }
        None
    }
}
