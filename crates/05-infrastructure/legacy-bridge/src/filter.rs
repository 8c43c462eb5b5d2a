//! 能力过滤器
//!
//! 过滤器既是扫描时的类型包含条件，也是描述符的定制器。
//! 同一个类型和过滤器最多产生一个访问描述符：按声明顺序取第一个满足条件的成员。

use crate::predicates::{AccessKind, FieldAccess, MemberPredicate, MethodAccess};
use di_abstractions::TypeSource;
use infrastructure_common::{
    ComponentScope, InstantiationStrategy, LegacyType, MemberInfo, RegistrationDescriptor,
    TypeMetadata,
};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// 能力过滤器 trait
pub trait CapabilityFilter: Send + Sync {
    /// 按轻量元数据判定类型是否存在满足条件的成员
    ///
    /// 无法解析的类型视为不匹配
    fn matches_metadata(&self, types: &dyn TypeSource, metadata: &TypeMetadata) -> bool;

    /// 按已有描述符的组件类型判定
    fn matches_descriptor(&self, types: &dyn TypeSource, descriptor: &RegistrationDescriptor) -> bool;

    /// 根据满足条件的成员修改描述符，没有满足条件的成员时不做任何修改
    fn customize(&self, types: &dyn TypeSource, descriptor: &mut RegistrationDescriptor);

    /// 过滤器描述，用于日志
    fn describe(&self) -> String;
}

/// 访问描述符：过滤器为某个类型选中的唯一成员
#[derive(Debug, Clone)]
pub struct AccessDescriptor<K> {
    /// 所属类型
    pub owner_type: String,
    /// 选中的成员
    pub member: MemberInfo,
    _kind: PhantomData<fn() -> K>,
}

impl<K> AccessDescriptor<K> {
    fn new(owner_type: &str, member: &MemberInfo) -> Self {
        Self {
            owner_type: owner_type.to_string(),
            member: member.clone(),
            _kind: PhantomData,
        }
    }
}

/// 成员种类相关的访问规则
pub trait AccessRule: AccessKind + Sized {
    /// 成员种类固有的条件
    fn qualifies(member: &MemberInfo, owner: &LegacyType) -> bool;

    /// 把选中的成员写入描述符
    fn apply(access: &AccessDescriptor<Self>, scope: ComponentScope, descriptor: &mut RegistrationDescriptor);
}

impl AccessRule for FieldAccess {
    /// 静态、可见，且字段类型可以作为所属类型的组件
    fn qualifies(member: &MemberInfo, owner: &LegacyType) -> bool {
        member.is_static()
            && member.is_visible()
            && member.value_type.is_component_type()
            && member.value_type.is_assignable_to(owner.name())
    }

    /// 字段总是延迟单例，直接读取字段值
    fn apply(access: &AccessDescriptor<Self>, _scope: ComponentScope, descriptor: &mut RegistrationDescriptor) {
        descriptor.scope = ComponentScope::Singleton;
        descriptor.lazy = true;
        descriptor.strategy = InstantiationStrategy::ReadStaticField(Arc::new(access.member.clone()));
    }
}

impl AccessRule for MethodAccess {
    /// 静态、可见、无参，且返回类型可以作为所属类型的组件
    fn qualifies(member: &MemberInfo, owner: &LegacyType) -> bool {
        member.is_static()
            && member.is_visible()
            && member.parameter_count == 0
            && member.value_type.is_component_type()
            && member.value_type.is_assignable_to(owner.name())
    }

    fn apply(access: &AccessDescriptor<Self>, scope: ComponentScope, descriptor: &mut RegistrationDescriptor) {
        descriptor.scope = scope;
        descriptor.lazy = scope == ComponentScope::Singleton;
        descriptor.strategy = InstantiationStrategy::InvokeStaticMethod(Arc::new(access.member.clone()));
    }
}

/// 按成员种类参数化的定制过滤器
pub struct CustomizingTypeFilter<K> {
    predicate: MemberPredicate<K>,
    scope: ComponentScope,
}

/// 静态字段过滤器，产生单例注册
pub type StaticFieldFilter = CustomizingTypeFilter<FieldAccess>;

/// 静态方法过滤器，按配置的作用域产生单例或原型注册
pub type StaticMethodFilter = CustomizingTypeFilter<MethodAccess>;

impl CustomizingTypeFilter<FieldAccess> {
    /// 创建静态字段过滤器，附加条件与固有条件同时生效
    pub fn fields(predicate: MemberPredicate<FieldAccess>) -> Self {
        Self {
            predicate,
            scope: ComponentScope::Singleton,
        }
    }
}

impl CustomizingTypeFilter<MethodAccess> {
    /// 创建指定作用域的静态方法过滤器
    pub fn methods(scope: ComponentScope, predicate: MemberPredicate<MethodAccess>) -> Self {
        Self { predicate, scope }
    }

    /// 单例方法过滤器
    pub fn singletons(predicate: MemberPredicate<MethodAccess>) -> Self {
        Self::methods(ComponentScope::Singleton, predicate)
    }

    /// 原型方法过滤器
    pub fn prototypes(predicate: MemberPredicate<MethodAccess>) -> Self {
        Self::methods(ComponentScope::Prototype, predicate)
    }
}

impl<K: AccessRule> CustomizingTypeFilter<K> {
    /// 配置的作用域
    pub fn scope(&self) -> ComponentScope {
        self.scope
    }

    /// 在已加载的类型中查找访问描述符
    pub fn find_access(&self, legacy_type: &LegacyType) -> Option<AccessDescriptor<K>> {
        legacy_type
            .declared_members(K::KIND)
            .find(|member| K::qualifies(member, legacy_type) && self.predicate.test(member))
            .map(|member| AccessDescriptor::new(legacy_type.name(), member))
    }

    /// 解析类型并查找访问描述符，解析失败视为没有
    fn access_for(&self, types: &dyn TypeSource, type_name: &str) -> Option<AccessDescriptor<K>> {
        match types.resolve(type_name) {
            Ok(legacy_type) => self.find_access(&legacy_type),
            Err(e) => {
                debug!("类型无法解析，视为不匹配: {}", e);
                None
            }
        }
    }
}

impl<K: AccessRule> CapabilityFilter for CustomizingTypeFilter<K> {
    fn matches_metadata(&self, types: &dyn TypeSource, metadata: &TypeMetadata) -> bool {
        self.access_for(types, &metadata.name).is_some()
    }

    fn matches_descriptor(&self, types: &dyn TypeSource, descriptor: &RegistrationDescriptor) -> bool {
        descriptor
            .owner_type_name()
            .is_some_and(|type_name| self.access_for(types, type_name).is_some())
    }

    fn customize(&self, types: &dyn TypeSource, descriptor: &mut RegistrationDescriptor) {
        let Some(type_name) = descriptor.owner_type_name() else {
            return;
        };
        if let Some(access) = self.access_for(types, type_name) {
            debug!(
                "定制组件 {}: 使用成员 {}，作用域 {}",
                access.owner_type,
                access.member.identity(),
                self.scope
            );
            K::apply(&access, self.scope, descriptor);
        }
    }

    fn describe(&self) -> String {
        format!("{}({})", K::KIND, self.scope)
    }
}

impl<K> fmt::Debug for CustomizingTypeFilter<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomizingTypeFilter")
            .field("predicate", &self.predicate)
            .field("scope", &self.scope)
            .finish()
    }
}
