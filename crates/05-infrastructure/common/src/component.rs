//! 组件注册描述符
//!
//! 描述符在插入注册表之前可以被过滤器定制，插入之后不再修改

use crate::reflection::{BoxError, Instance, MemberInfo};
use std::fmt;
use std::sync::Arc;

/// 组件作用域
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ComponentScope {
    /// 单例模式，全局唯一实例
    #[default]
    Singleton,
    /// 原型模式，每次请求创建新实例
    Prototype,
}

impl fmt::Display for ComponentScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Singleton => f.write_str("singleton"),
            Self::Prototype => f.write_str("prototype"),
        }
    }
}

/// 外部提供的实例工厂
pub type InstanceSupplier = Arc<dyn Fn() -> Result<Instance, BoxError> + Send + Sync>;

/// 实例化策略
#[derive(Clone, Default)]
pub enum InstantiationStrategy {
    /// 尚未定制
    #[default]
    Unspecified,
    /// 直接读取所属类型的静态字段
    ReadStaticField(Arc<MemberInfo>),
    /// 按名称调用静态无参工厂方法
    InvokeStaticMethod(Arc<MemberInfo>),
    /// 在已解析的工厂组件上调用实例方法
    InvokeFactoryMethod {
        /// 工厂组件的注册名称
        factory: String,
        method: Arc<MemberInfo>,
    },
    /// 由容器外部提供的实例工厂
    Supplier(InstanceSupplier),
}

impl InstantiationStrategy {
    /// 策略使用的成员
    pub fn member(&self) -> Option<&MemberInfo> {
        match self {
            Self::ReadStaticField(member)
            | Self::InvokeStaticMethod(member)
            | Self::InvokeFactoryMethod { method: member, .. } => Some(member),
            Self::Unspecified | Self::Supplier(_) => None,
        }
    }

    /// 是否已经指定策略
    pub fn is_specified(&self) -> bool {
        !matches!(self, Self::Unspecified)
    }
}

impl fmt::Debug for InstantiationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unspecified => f.write_str("Unspecified"),
            Self::ReadStaticField(member) => write!(f, "ReadStaticField({})", member.identity()),
            Self::InvokeStaticMethod(member) => {
                write!(f, "InvokeStaticMethod({})", member.identity())
            }
            Self::InvokeFactoryMethod { factory, method } => {
                write!(f, "InvokeFactoryMethod({} -> {})", factory, method.name)
            }
            Self::Supplier(_) => f.write_str("Supplier(<function>)"),
        }
    }
}

impl PartialEq for InstantiationStrategy {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Unspecified, Self::Unspecified) => true,
            (Self::ReadStaticField(a), Self::ReadStaticField(b))
            | (Self::InvokeStaticMethod(a), Self::InvokeStaticMethod(b)) => a == b,
            (
                Self::InvokeFactoryMethod {
                    factory: fa,
                    method: ma,
                },
                Self::InvokeFactoryMethod {
                    factory: fb,
                    method: mb,
                },
            ) => fa == fb && ma == mb,
            (Self::Supplier(a), Self::Supplier(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// 组件注册描述符
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationDescriptor {
    /// 组件类型的完全限定名称，工厂方法产生的组件为方法返回值类型
    pub owner_type: Option<String>,
    /// 组件作用域
    pub scope: ComponentScope,
    /// 是否延迟到首次请求时构造
    pub lazy: bool,
    /// 实例化策略
    pub strategy: InstantiationStrategy,
    /// 构造前必须先解析的组件名称
    pub depends_on: Option<String>,
}

impl RegistrationDescriptor {
    /// 为扫描到的类型创建默认描述符（单例、非延迟、未定制）
    pub fn for_type(owner_type: impl Into<String>) -> Self {
        Self {
            owner_type: Some(owner_type.into()),
            scope: ComponentScope::Singleton,
            lazy: false,
            strategy: InstantiationStrategy::Unspecified,
            depends_on: None,
        }
    }

    /// 使用外部实例工厂创建描述符
    pub fn with_supplier<F>(owner_type: impl Into<String>, supplier: F) -> Self
    where
        F: Fn() -> Result<Instance, BoxError> + Send + Sync + 'static,
    {
        Self {
            strategy: InstantiationStrategy::Supplier(Arc::new(supplier)),
            ..Self::for_type(owner_type)
        }
    }

    /// 设置作用域
    pub fn with_scope(mut self, scope: ComponentScope) -> Self {
        self.scope = scope;
        self
    }

    /// 设置延迟初始化
    pub fn with_lazy(mut self, lazy: bool) -> Self {
        self.lazy = lazy;
        self
    }

    /// 设置依赖
    pub fn with_depends_on(mut self, name: impl Into<String>) -> Self {
        self.depends_on = Some(name.into());
        self
    }

    /// 组件类型名称
    pub fn owner_type_name(&self) -> Option<&str> {
        self.owner_type.as_deref()
    }

    /// 是否为单例
    pub fn is_singleton(&self) -> bool {
        self.scope == ComponentScope::Singleton
    }
}
